//! Enumerated `type` values used by structure nodes and capture steps

use crate::wire::wire_enum;

/// Reserved order number of terminal iteration-review phases and steps
pub const TERMINAL_ORDER_NUMBER: u32 = 1000;

wire_enum! {
    /// Finer-grained kind of a structure node
    pub enum NodeType {
        Parent => "PARENT",
        DataEntry => "DATA_ENTRY",
        Correction => "CORRECTION",
        IterationReview => "ITERATION_REVIEW",
    }
}

wire_enum! {
    /// Kind of a data capture step
    pub enum CaptureType {
        SignOff => "SIGN_OFF",
        GeneralText => "GENERAL_TEXT",
        GeneralNumeric => "GENERAL_NUMERIC",
        Notes => "NOTES",
        CorrectionStart => "CORRECTION_START",
        CorrectionEnd => "CORRECTION_END",
        CorrectionCancel => "CORRECTION_CANCEL",
        IterationReadyForReview => "ITERATION_READY_FOR_REVIEW",
        IterationComplete => "ITERATION_COMPLETE",
        PhaseCompleteButton => "PHASE_COMPLETE_BUTTON",
        StructureComplete => "STRUCTURE_COMPLETE",
        TrainingOverride => "TRAINING_OVERRIDE",
        PredecessorOverride => "PREDECESSOR_OVERRIDE",
    }
}

wire_enum! {
    /// Sign-off flavour
    pub enum SignOffType {
        /// Second person observes; may be the performer's peer
        Witness => "WITNESS",
        /// Independent check; must be a distinct user
        Verify => "VERIFY",
    }
}

wire_enum! {
    /// What a correction sub-step corrects
    pub enum CorrectionType {
        PrimaryDataEntry => "PRIMARY_DATA_ENTRY",
    }
}

wire_enum! {
    /// Condition that fires an action trigger
    pub enum TriggerType {
        OutOfNumericRange => "OUT_OF_NUMERIC_RANGE",
    }
}

wire_enum! {
    /// Action executed when a trigger fires
    pub enum ActionType {
        Reject => "REJECT",
    }
}

wire_enum! {
    /// Rounding used for numeric entry
    pub enum PrecisionMethod {
        Down => "DOWN",
        Up => "UP",
        HalfUp => "HALF_UP",
    }
}

impl CaptureType {
    /// Check if this is one of the three correction bookkeeping kinds
    #[must_use]
    pub fn is_correction(&self) -> bool {
        matches!(
            self,
            Self::CorrectionStart | Self::CorrectionEnd | Self::CorrectionCancel
        )
    }
}

//! `mxt`: list, inspect, derive and validate master templates

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use mxt_engine::{validate, EngineConfig, TemplateEngine};
use mxt_library::{output_file_name, save, TemplateLibrary};
use mxt_model::Document;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn cli() -> Command {
    Command::new("mxt")
        .version(mxt_engine::VERSION)
        .about("Mx master template mutation engine")
        .subcommand_required(true)
        .arg(
            Arg::new("templates")
                .long("templates")
                .global(true)
                .default_value("templates")
                .value_parser(value_parser!(PathBuf))
                .help("Template library directory"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(Command::new("list").about("List templates in the library"))
        .subcommand(
            Command::new("show")
                .about("Print the outline of a template")
                .arg(Arg::new("id").required(true).help("Template id"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the full document instead of the outline"),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Derive a new template from a baseline")
                .arg(Arg::new("id").required(true).help("Baseline template id"))
                .arg(
                    Arg::new("request")
                        .long("request")
                        .required(true)
                        .help("Edit request, e.g. \"add phase QC Check with witness\""),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .default_value("generated")
                        .value_parser(value_parser!(PathBuf))
                        .help("Output directory"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Engine config file (.toml, .yaml or .yml)"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a template file against the ISA-88 structure")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Template file"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match run(&matches).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(matches: &ArgMatches) -> Result<ExitCode> {
    let root = required::<PathBuf>(matches, "templates")?;
    let library = TemplateLibrary::new(root.clone());

    match matches.subcommand() {
        Some(("list", _)) => list(&library).await,
        Some(("show", args)) => {
            let id = required::<String>(args, "id")?;
            show(&library, id, args.get_flag("json")).await
        }
        Some(("generate", args)) => {
            let id = required::<String>(args, "id")?;
            let request = required::<String>(args, "request")?;
            let out = required::<PathBuf>(args, "out")?;
            let config = args.get_one::<PathBuf>("config").map(PathBuf::as_path);
            generate(&library, id, request, out, config).await
        }
        Some(("validate", args)) => validate_file(required::<PathBuf>(args, "file")?).await,
        Some((other, _)) => bail!("unknown command {other}"),
        None => bail!("no command given"),
    }
}

fn required<'a, T: Clone + Send + Sync + 'static>(args: &'a ArgMatches, name: &str) -> Result<&'a T> {
    args.get_one::<T>(name)
        .with_context(|| format!("missing argument --{name}"))
}

async fn list(library: &TemplateLibrary) -> Result<ExitCode> {
    let entries = library
        .list()
        .await
        .with_context(|| format!("failed to list {}", library.root().display()))?;

    if entries.is_empty() {
        println!("No templates in {}", library.root().display());
    }
    for entry in entries {
        println!("{:<45} {}", entry.id, entry.name);
    }
    Ok(ExitCode::SUCCESS)
}

async fn show(library: &TemplateLibrary, id: &str, json: bool) -> Result<ExitCode> {
    let document = library
        .load(id)
        .await
        .with_context(|| format!("failed to load template {id}"))?;

    if json {
        println!("{}", document.to_json_pretty()?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", document.title());
    if let Some(product) = document.product_id() {
        println!("Product: {product}");
    }
    println!("Shape: {}", document.shape_fingerprint().short());
    for operation in document.operations() {
        println!("  [{}] {}", operation.id, operation.title);
        for phase in &operation.children {
            let order = phase
                .phase_order_number
                .map_or_else(|| "-".to_string(), |n| n.to_string());
            println!("    {order:>5}  [{}] {}", phase.id, phase.title);
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn generate(
    library: &TemplateLibrary,
    id: &str,
    request: &str,
    out: &Path,
    config: Option<&Path>,
) -> Result<ExitCode> {
    let config = match config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let engine = TemplateEngine::new(config);

    let baseline = library
        .load(id)
        .await
        .with_context(|| format!("failed to load template {id}"))?;
    let outcome = engine
        .mutate(&baseline, request)
        .with_context(|| format!("failed to apply {request:?} to {id}"))?;

    println!("{}", outcome.message);
    if !outcome.applied {
        tracing::warn!("Request not recognized, writing an unchanged copy");
    }

    let name = output_file_name(id, chrono::Utc::now());
    let path = save(out, &name, &outcome.document)
        .await
        .with_context(|| format!("failed to save {name}"))?;
    println!("Wrote {}", path.display());
    Ok(ExitCode::SUCCESS)
}

async fn validate_file(path: &Path) -> Result<ExitCode> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document = Document::from_slice(&bytes)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let report = validate(&document);
    if report.valid {
        println!("{}: valid", path.display());
        return Ok(ExitCode::SUCCESS);
    }
    println!("{}: {} error(s)", path.display(), report.errors.len());
    for error in &report.errors {
        println!("  - {error}");
    }
    Ok(ExitCode::FAILURE)
}

//! `apiseq` command line

use anyhow::{Context, Result};
use apiseq_model::load_model;
use apiseq_report::{AnalysisConfig, Analyzer, Report};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn file_arg() -> Arg {
    Arg::new("file")
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("OpenAPI 3.0/3.1 document (.json, .yaml, .yml)")
}

fn build_cli() -> Command {
    Command::new("apiseq")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Derive CRUD maps and test-call sequences from an OpenAPI document")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("analyze")
                .about("Analyse a document and write object_list.json, object_crud.json and endpoint_list.json")
                .arg(file_arg())
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_name("TOML")
                        .value_parser(value_parser!(PathBuf))
                        .help("Analysis configuration file"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_name("DIR")
                        .default_value(".")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory for the exported views"),
                )
                .arg(
                    Arg::new("max-orderings")
                        .long("max-orderings")
                        .value_parser(value_parser!(usize))
                        .help("Valid orderings kept per endpoint (0 for no cap)"),
                )
                .arg(
                    Arg::new("max-plans")
                        .long("max-plans")
                        .value_parser(value_parser!(usize))
                        .help("Plans kept per endpoint and direction (0 for no cap)"),
                )
                .arg(
                    Arg::new("sequential")
                        .long("sequential")
                        .action(ArgAction::SetTrue)
                        .help("Synthesize endpoints on one thread"),
                ),
        )
        .subcommand(
            Command::new("info")
                .about("Print the API identity and object/endpoint counts")
                .arg(file_arg()),
        )
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// File configuration with command line overrides applied
fn analysis_config(args: &ArgMatches) -> Result<AnalysisConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(&max) = args.get_one::<usize>("max-orderings") {
        config = config.with_max_orderings(max);
    }
    if let Some(&max) = args.get_one::<usize>("max-plans") {
        config = config.with_max_plans(max);
    }
    if args.get_flag("sequential") {
        config = config.with_parallel(false);
    }
    Ok(config)
}

fn required_path<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a Path> {
    args.get_one::<PathBuf>(id)
        .map(PathBuf::as_path)
        .with_context(|| format!("missing argument <{id}>"))
}

fn print_summary(report: &Report) {
    println!(
        "{} {} (OpenAPI {})",
        report.info.name, report.info.version, report.info.openapi_version
    );
    println!("  objects:    {}", report.object_count());
    println!("  endpoints:  {}", report.endpoint_count());
    println!("  no object:  {}", report.unresolved_endpoints().len());
    if !report.overruns.is_empty() {
        println!("  truncated:  {}", report.overruns.len());
        for endpoint in &report.overruns {
            println!("    {endpoint}");
        }
    }
}

fn run_analyze(args: &ArgMatches) -> Result<()> {
    let file = required_path(args, "file")?;
    let out = required_path(args, "out")?;
    let analyzer = Analyzer::new(analysis_config(args)?);

    let report = analyzer
        .analyze_path(file)
        .with_context(|| format!("analysing {}", file.display()))?;
    let written = analyzer
        .export(&report, out)
        .with_context(|| format!("exporting to {}", out.display()))?;

    print_summary(&report);
    for path in written {
        println!("  wrote {}", path.display());
    }
    Ok(())
}

fn run_info(args: &ArgMatches) -> Result<()> {
    let file = required_path(args, "file")?;
    let model = load_model(file).with_context(|| format!("loading {}", file.display()))?;
    let info = model.info();
    println!("title:    {}", info.name);
    println!("version:  {}", info.version);
    println!("openapi:  {}", info.openapi_version);
    println!("objects:  {}", model.schema_count());
    println!("endpoints: {}", model.operations().len());
    Ok(())
}

fn json_logs(matches: &ArgMatches) -> bool {
    matches.get_flag("json-logs")
        || matches
            .subcommand()
            .is_some_and(|(_, sub)| sub.get_flag("json-logs"))
}

fn main() {
    let matches = build_cli().get_matches();
    init_logging(json_logs(&matches));

    let result = match matches.subcommand() {
        Some(("analyze", args)) => run_analyze(args),
        Some(("info", args)) => run_info(args),
        _ => Ok(()),
    };

    if let Err(err) = result {
        tracing::error!(error = %format!("{err:#}"), "command failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

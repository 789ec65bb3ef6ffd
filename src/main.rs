use clap::Parser;
use jsonmorph::output::{read_json, render, write_output};
use jsonmorph::{CliError, Engine, EngineConfig, run_batch};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Applies a jsonmorph script to one or more JSON documents.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The script: a JSON array of commands
    script: PathBuf,

    /// Documents to transform
    #[arg(required = true)]
    documents: Vec<PathBuf>,

    /// Write the result here instead of stdout (single document only)
    #[arg(short, long, conflicts_with = "in_place")]
    output: Option<PathBuf>,

    /// Overwrite each input document with its result
    #[arg(short, long)]
    in_place: bool,

    /// Engine configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(args: &Args) -> Result<(), CliError> {
    if args.output.is_some() && args.documents.len() > 1 {
        return Err(CliError::Usage(
            "--output takes a single document; use --in-place for several".to_string(),
        ));
    }

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            EngineConfig::from_json(&text)?
        }
        None => EngineConfig::default(),
    };
    let engine = Engine::builder().with_config(config).build();

    let script = read_json(&args.script)?;
    let documents = args
        .documents
        .iter()
        .map(|path| read_json(path))
        .collect::<Result<Vec<_>, _>>()?;

    // Diagnostics are forwarded to the logger as they happen.
    let batch = run_batch(&engine, &script, documents)?;

    for (path, output) in args.documents.iter().zip(&batch.outputs) {
        if !output.success {
            log::error!("Script failed for '{}'", path.display());
        }
        let rendered = render(&output.document, args.pretty);
        if args.in_place {
            write_output(path, &rendered)?;
        } else if let Some(target) = &args.output {
            write_output(target, &rendered)?;
        } else {
            println!("{}", rendered);
        }
    }

    if batch.success() {
        Ok(())
    } else {
        Err(CliError::ScriptFailed {
            failed: batch.failed(),
            total: batch.outputs.len(),
        })
    }
}

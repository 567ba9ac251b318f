//! minic - checks a program and prints its annotated syntax tree
//!
//! Usage: minic [OPTIONS] <input>

use anyhow::Context;
use clap::Parser as ClapParser;
use minic::common::DiagnosticReporter;
use minic::{FrontendConfig, Pipeline};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "minic")]
#[command(version)]
#[command(about = "Front end for a small C-like language", long_about = None)]
struct Args {
    /// Input source file
    #[arg(required = true)]
    input: PathBuf,

    /// Program whose declarations become built-in identifiers
    #[arg(short, long)]
    bootstrap: Option<PathBuf>,

    /// Stop after parsing
    #[arg(long)]
    no_check: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump the raw AST before analysis (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let filename = args.input.display().to_string();

    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(&filename, &source);

    let config = FrontendConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        verbose: args.verbose,
    };

    let pipeline = match &args.bootstrap {
        Some(path) => {
            let bootstrap = fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let bootstrap_id = reporter.add_file(path.display().to_string(), &bootstrap);
            Pipeline::with_bootstrap(&bootstrap, config)
                .inspect_err(|e| reporter.report_error(bootstrap_id, e))?
        }
        None => Pipeline::new(config),
    };

    if args.verbose {
        eprintln!("Compiling {}", filename);
    }

    let result = if args.no_check {
        pipeline.parse(&source)
    } else {
        pipeline.compile(&source)
    };
    let ast = result.inspect_err(|e| reporter.report_error(file_id, e))?;

    for line in ast.dump() {
        println!("{}", line);
    }

    if args.verbose {
        eprintln!("Checked {} nodes", ast.len());
    }

    Ok(())
}

// Copyright 2025 Diivanand Ramalingam
// Licensed under the Apache License, Version 2.0

//! `coolc`: lex, parse and semantically check COOL source files.
//!
//! Each file is analysed on its own. The process exits with the total number
//! of semantic errors, or 1 if a file could not be read, lexed or parsed.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process,
};

use clap::Parser;
use cool_frontend::{
    analyze_program_with, lex, parse_program, AnalysisOptions, Diagnostics, LexError,
    SemanticError,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "coolc", version, about = "Semantic checker for COOL programs")]
struct Cli {
    /// Source files; each one is checked independently
    #[arg(required = true, value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print only the summary line, not each error
    #[arg(short, long)]
    quiet: bool,

    /// Skip the operator operand-shape checks
    #[arg(long)]
    no_operand_checks: bool,
}

/// Failures that stop a file before semantic analysis starts.
#[derive(Debug, Error)]
enum DriverError {
    #[error("can not open file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("lexical error in {}: {source}", .path.display())]
    Lex {
        path: PathBuf,
        #[source]
        source: LexError,
    },

    #[error("parse errors in {}:\n{details}", .path.display())]
    Parse { path: PathBuf, details: String },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(count) => {
            eprintln!("# Detected {count} semantic errors");
            process::exit(exit_status(count));
        }
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Largest status every platform reports intact.
const MAX_STATUS: usize = 255;

/// Error count as a process status. Clamped so a count that is a multiple of
/// 256 never reads as success.
fn exit_status(count: usize) -> i32 {
    count.min(MAX_STATUS) as i32
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn run(cli: &Cli) -> Result<usize, DriverError> {
    let options = AnalysisOptions {
        operand_checks: !cli.no_operand_checks,
    };

    let mut total = 0;
    for path in &cli.files {
        let diags = check_file(path, &options)?;
        if !cli.quiet {
            render(&diags);
        }
        total += diags.error_count();
    }
    Ok(total)
}

fn check_file(path: &Path, options: &AnalysisOptions) -> Result<Diagnostics, DriverError> {
    let src = fs::read_to_string(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let toks = lex(&src).map_err(|source| DriverError::Lex {
        path: path.to_path_buf(),
        source,
    })?;
    let prog = parse_program(&toks).map_err(|errs| DriverError::Parse {
        path: path.to_path_buf(),
        details: errs
            .iter()
            .map(|e| format!("  {e:?}"))
            .collect::<Vec<_>>()
            .join("\n"),
    })?;

    tracing::info!(path = %path.display(), classes = prog.classes.len(), "parsed");
    Ok(analyze_program_with(&prog, options))
}

fn render(diags: &Diagnostics) {
    for error in diags {
        eprintln!("# semantic error: {error}");
        if let SemanticError::InheritanceCycle { hierarchy, .. } = error {
            eprintln!("\\ program classes' hierarchy (child : parent)");
            for (child, parent) in hierarchy {
                eprintln!("\t{child} : {parent}");
            }
        }
    }
}

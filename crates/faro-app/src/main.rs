// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Faro, PQRS document redaction
//
// Entry point. Loads configuration, initialises logging, and dispatches one
// command against the redaction service.

mod logging;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use faro_core::error::{FaroError, Result};
use faro_core::human_errors::humanize_error;
use faro_core::{FaroConfig, RedactionOutcome};
use faro_pipeline::{DocumentTools, RedactionService};
use faro_privacy::Redactor;

#[derive(Debug, Parser)]
#[command(name = "faro", version, about = "Redact personal data from PQRS complaint documents")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, env = "FARO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// OCR, scrub, and re-render a document into its case directory.
    Redact { document: PathBuf },
    /// Print every page of a PDF as base64 PNG (JSON array on stdout).
    Pages { pdf: PathBuf },
    /// Scrub plain text from a file or stdin.
    Scrub {
        #[arg(long)]
        input: Option<PathBuf>,
        /// Print per-rule replacement counts to stderr.
        #[arg(long)]
        stats: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match FaroConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("faro: {err}");
            return ExitCode::from(2);
        }
    };

    let _guard = match logging::init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("faro: {err}");
            return ExitCode::from(2);
        }
    };

    tracing::info!(command = ?cli.command, "Faro starting");

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let human = humanize_error(&err);
            tracing::error!(error = %err, retriable = human.retriable, "Command failed");
            eprintln!("faro: {}", human.message);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &FaroConfig) -> Result<()> {
    match command {
        Command::Redact { document } => redact(&document, config),
        Command::Pages { pdf } => {
            let pages = RedactionService::from_config(config)?.encode_pages_as_images(&pdf)?;
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer(&mut stdout, &pages)?;
            writeln!(stdout)?;
            Ok(())
        }
        Command::Scrub { input, stats } => scrub(input.as_deref(), stats),
    }
}

fn redact(document: &Path, config: &FaroConfig) -> Result<()> {
    if !document.is_file() {
        return Err(FaroError::Extraction(format!(
            "{} is not a readable file",
            document.display()
        )));
    }
    let service = RedactionService::from_config(config)?;
    match service.redact_outcome(document)? {
        (_, RedactionOutcome::Fresh(path)) => {
            println!("{}", path.display());
            Ok(())
        }
        (_, RedactionOutcome::Cached(path)) => {
            tracing::info!(path = %path.display(), "Served from cache");
            println!("{}", path.display());
            Ok(())
        }
        (case, RedactionOutcome::Failed) => Err(FaroError::PipelineFailed { case }),
    }
}

fn scrub(input: Option<&Path>, stats: bool) -> Result<()> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let (redacted, counts) = Redactor::new()?.redact_with_stats(&text);
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(redacted.as_bytes())?;
    stdout.flush()?;

    if stats {
        eprintln!("{}", serde_json::to_string_pretty(&counts)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_scrub_with_input() {
        let cli = Cli::try_parse_from(["faro", "scrub", "--input", "carta.txt", "--stats"]).unwrap();
        match cli.command {
            Command::Scrub { input, stats } => {
                assert_eq!(input, Some(PathBuf::from("carta.txt")));
                assert!(stats);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["faro", "redact", "queja.pdf", "--config", "faro.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("faro.toml")));
    }

    #[test]
    fn redact_rejects_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let err = redact(&dir.path().join("nada.pdf"), &FaroConfig::default()).unwrap_err();
        assert!(matches!(err, FaroError::Extraction(_)));
    }

    #[test]
    fn scrub_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("carta.txt");
        std::fs::write(&input, "escribir a ana@correo.co").unwrap();
        scrub(Some(&input), false).unwrap();
    }
}

//! Pivotstream CLI - documents to RSVP tokens.

mod config;

use clap::{ArgAction, Parser, Subcommand};
use pivotstream::epub::extract_epub_with_options;
use pivotstream::pdf::{extract_pdf_sections_with_options, extract_pdf_with_options};
use pivotstream::{
    ChapterMarker, ExtractWarning, Extracted, Token, run_with_deadline, tokenize_with_weights,
};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "pivotstream")]
#[command(author, version, about = "Turn documents into RSVP tokens", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file with [extract] and [pause] tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Give up on a document after this many seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    /// Log more (repeat for more detail)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Split plain text into display tokens
    Tokenize {
        /// Input file (use - or omit for stdin)
        input: Option<PathBuf>,
    },

    /// Extract text and chapters from an EPUB
    Epub {
        /// EPUB file
        file: PathBuf,
    },

    /// Extract text, pages and inferred sections from a PDF
    Pdf {
        /// PDF file
        file: PathBuf,
    },

    /// Infer numbered section headings in plain text
    Sections {
        /// Input file (use - or omit for stdin)
        input: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct TokensOutput<'a> {
    tokens: &'a [Token],
}

#[derive(Serialize)]
struct EpubOutput<'a> {
    text: &'a str,
    chapters: &'a [ChapterMarker],
}

#[derive(Serialize)]
struct PdfOutput<'a> {
    text: &'a str,
    page_count: usize,
    pages: &'a [ChapterMarker],
    sections: &'a [ChapterMarker],
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let timeout = Duration::from_secs(cli.timeout);

    match cli.command {
        Commands::Tokenize { input } => {
            let text = read_text(input.as_deref())?;
            let tokens = tokenize_with_weights(&text, &config.pause);
            print_json(&TokensOutput { tokens: &tokens }, cli.pretty)?;
        }
        Commands::Epub { file } => {
            let bytes = fs::read(&file)?;
            let options = config.extract.clone();
            let result =
                run_with_deadline(timeout, move || extract_epub_with_options(&bytes, &options))?;
            let book = report(result);
            print_json(
                &EpubOutput {
                    text: &book.text,
                    chapters: &book.chapters,
                },
                cli.pretty,
            )?;
        }
        Commands::Pdf { file } => {
            let bytes = fs::read(&file)?;
            let options = config.extract.clone();
            let result =
                run_with_deadline(timeout, move || extract_pdf_with_options(&bytes, &options))?;
            let doc = report(result);
            let sections = extract_pdf_sections_with_options(&doc.text, &config.extract);
            print_json(
                &PdfOutput {
                    text: &doc.text,
                    page_count: doc.page_count,
                    pages: &doc.pages,
                    sections: &sections,
                },
                cli.pretty,
            )?;
        }
        Commands::Sections { input } => {
            let text = read_text(input.as_deref())?;
            let sections = extract_pdf_sections_with_options(&text, &config.extract);
            print_json(&sections, cli.pretty)?;
        }
    }

    Ok(())
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

fn read_text(input: Option<&Path>) -> io::Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Print warnings to stderr and unwrap the value.
fn report<T>(result: Extracted<T>) -> T {
    for ExtractWarning { message, .. } in &result.warnings {
        eprintln!("warning: {message}");
    }
    result.value
}

fn print_json<T: Serialize + ?Sized>(
    value: &T,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}

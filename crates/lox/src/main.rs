use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, ValueEnum};
use log::debug;

use lox_common::manifest::{self, LoxManifest, ManifestError};
use lox_common::{Diagnostic, OutputFormat};
use lox_scanner::{ScanError, Scanner, Token};

/// Malformed input (sysexits `EX_DATAERR`).
const EXIT_DATA_ERR: i32 = 65;
/// Reading the source or writing tokens failed (`EX_IOERR`).
const EXIT_IO_ERR: i32 = 74;
/// Bad Lox.toml (`EX_CONFIG`).
const EXIT_CONFIG_ERR: i32 = 78;

/// Lox scanner.
///
/// Tokenizes a .lox file, or each line typed at an interactive prompt.
#[derive(Parser)]
#[command(
    name = "lox",
    version,
    about,
    long_about = "Lox scanner.\n\nTokenizes a Lox source file and prints the token stream. Without a\nfile argument, starts an interactive prompt that scans one line at a time.\n\nExamples:\n  lox hello.lox                  Print tokens, one per line\n  lox hello.lox --format json    Print tokens as a JSON array\n  lox hello.lox --no-trivia      Hide whitespace and comment tokens\n  lox                            Start the prompt"
)]
struct Cli {
    /// Lox source file. Starts the interactive prompt when omitted.
    file: Option<PathBuf>,

    /// Output format (default from Lox.toml, else text).
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Do not print whitespace and comment tokens.
    #[arg(long = "no-trivia")]
    no_trivia: bool,

    /// Append the EOF token.
    #[arg(long)]
    eof: bool,

    /// Path to a Lox.toml (default: searched upward from the source file).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Suppress the summary line.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Debug,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::Debug => OutputFormat::Debug,
        }
    }
}

/// Effective options: Lox.toml values overridden by command-line flags.
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    format: OutputFormat,
    trivia: bool,
    eof: bool,
    prompt: String,
    quiet: bool,
}

impl Settings {
    fn merge(manifest: LoxManifest, cli: &Cli) -> Self {
        Self {
            format: cli.format.map_or(manifest.output.format, OutputFormat::from),
            trivia: manifest.output.trivia && !cli.no_trivia,
            eof: manifest.output.eof || cli.eof,
            prompt: manifest.prompt.prompt,
            quiet: cli.quiet,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(EXIT_CONFIG_ERR);
        }
    };
    debug!("settings: {:?}", settings);

    let code = {
        let mut out = io::stdout().lock();
        match &cli.file {
            Some(path) => run_file(path, &mut out, &settings),
            None => run_prompt(&mut io::stdin().lock(), &mut out, &settings),
        }
    };
    process::exit(code);
}

fn load_settings(cli: &Cli) -> Result<Settings, ManifestError> {
    let manifest = match &cli.config {
        Some(path) => manifest::load_manifest(path)?,
        None => {
            let start_dir = match &cli.file {
                Some(file) => {
                    let abs = fs::canonicalize(file).unwrap_or_else(|_| file.clone());
                    abs.parent()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| PathBuf::from("."))
                }
                None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            };
            manifest::discover_manifest(&start_dir)?
        }
    };
    Ok(Settings::merge(manifest, cli))
}

fn scan<'src>(source: &'src str, settings: &Settings) -> Result<Vec<Token<'src>>, ScanError> {
    let scanner = Scanner::new(source);
    if settings.eof {
        scanner.scan_tokens_with_eof()
    } else {
        scanner.scan_tokens()
    }
}

fn run_file(path: &Path, out: &mut impl Write, settings: &Settings) -> i32 {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: could not read '{}': {}", path.display(), e);
            return EXIT_IO_ERR;
        }
    };

    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let tokens = match scan(&source, settings) {
        Ok(tokens) => tokens,
        Err(e) => {
            print_diagnostic(&e.to_diagnostic(), &source, &file_name);
            return EXIT_DATA_ERR;
        }
    };

    if let Err(e) = print_tokens(&mut *out, &tokens, settings) {
        eprintln!("error: could not write tokens: {}", e);
        return EXIT_IO_ERR;
    }

    if !settings.quiet {
        eprintln!("Scanned {} ({} tokens)", path.display(), tokens.len());
    }
    0
}

/// Scan each input line independently until end of input. Lexical errors
/// are reported and the prompt carries on.
fn run_prompt(input: &mut impl BufRead, out: &mut impl Write, settings: &Settings) -> i32 {
    let mut line = String::new();

    loop {
        if let Err(e) = write!(out, "{}", settings.prompt).and_then(|()| out.flush()) {
            eprintln!("error: could not write prompt: {}", e);
            return EXIT_IO_ERR;
        }

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => {
                if let Err(e) = writeln!(out) {
                    eprintln!("error: could not write prompt: {}", e);
                    return EXIT_IO_ERR;
                }
                return 0;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("error: could not read input: {}", e);
                return EXIT_IO_ERR;
            }
        }

        let source = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
        match scan(source, settings) {
            Ok(tokens) => {
                if let Err(e) = print_tokens(&mut *out, &tokens, settings) {
                    eprintln!("error: could not write tokens: {}", e);
                    return EXIT_IO_ERR;
                }
            }
            Err(e) => print_diagnostic(&e.to_diagnostic(), source, "<stdin>"),
        }
    }
}

fn print_tokens(out: &mut impl Write, tokens: &[Token<'_>], settings: &Settings) -> io::Result<()> {
    let shown: Vec<&Token<'_>> = tokens
        .iter()
        .filter(|t| settings.trivia || !t.kind.is_trivia())
        .collect();

    match settings.format {
        OutputFormat::Text => {
            for token in shown {
                writeln!(out, "{}", token)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &shown)?;
            writeln!(out)?;
        }
        OutputFormat::Debug => {
            for token in shown {
                writeln!(
                    out,
                    "{:>4}:{:<3} {:<15} {:?}",
                    token.line, token.column, token.kind, token.lexeme,
                )?;
            }
        }
    }
    Ok(())
}

/// ariadne 0.4 spans count characters, diagnostics carry byte offsets.
fn char_index(source: &str, byte: usize) -> usize {
    source
        .get(..byte)
        .map_or_else(|| source.chars().count(), |prefix| prefix.chars().count())
}

fn print_diagnostic(diag: &Diagnostic, source: &str, file_name: &str) {
    let Some(ref span) = diag.span else {
        eprintln!("{}", diag);
        return;
    };

    let range = span.range();
    let start = char_index(source, range.start);
    // Zero-width spans still get a one-column caret.
    let end = if span.is_empty() {
        start + 1
    } else {
        char_index(source, range.end)
    };

    let mut report = Report::build(ReportKind::Error, file_name, start)
        .with_message(&diag.message)
        .with_label(
            Label::new((file_name, start..end))
                .with_message(&diag.message)
                .with_color(Color::Red),
        );

    if let Some(ref suggestion) = diag.suggestion {
        report = report.with_help(suggestion);
    }

    if report
        .finish()
        .eprint((file_name, Source::from(source)))
        .is_err()
    {
        eprintln!("{}", diag);
    }
}

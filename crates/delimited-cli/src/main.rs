//! delim - inspect and convert delimited files

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use delimited::prelude::*;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "delim")]
#[command(author, version, about = "Delimited text inspection and conversion tool")]
struct Cli {
    /// Log progress at debug level (RUST_LOG overrides)
    #[arg(short = 'v', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the header, record count and guessed column types
    Info {
        /// Input file
        input: PathBuf,

        #[command(flatten)]
        format: InputFormat,
    },

    /// Print the first records of a file
    Head {
        /// Input file
        input: PathBuf,

        /// Number of records to print
        #[arg(short = 'n', long, default_value = "10")]
        lines: usize,

        /// Show each field with its type
        #[arg(long)]
        verbose: bool,

        #[command(flatten)]
        format: InputFormat,
    },

    /// Re-emit a file with a different output format
    Convert {
        /// Input file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output column delimiter
        #[arg(long, value_parser = parse_char)]
        out_delimiter: Option<char>,

        /// Output text qualifier
        #[arg(long, value_parser = parse_char)]
        out_quote: Option<char>,

        /// Output record delimiter
        #[arg(long, value_parser = parse_char)]
        out_record_delimiter: Option<char>,

        /// Quote every non-empty field
        #[arg(long)]
        quote_all: bool,

        #[command(flatten)]
        format: InputFormat,
    },
}

/// How the input file is laid out
#[derive(Args, Default)]
struct InputFormat {
    /// Column delimiter, repeat for several (`\t` or `tab` for tabs)
    #[arg(short, long = "delimiter", action = ArgAction::Append, value_parser = parse_char)]
    delimiters: Vec<char>,

    /// Text qualifier
    #[arg(long, value_parser = parse_char)]
    quote: Option<char>,

    /// Escape character
    #[arg(long, value_parser = parse_char)]
    escape: Option<char>,

    /// Comment character
    #[arg(long, value_parser = parse_char)]
    comment: Option<char>,

    /// Treat comment characters as data
    #[arg(long)]
    no_comments: bool,

    /// Keep leading and trailing whitespace
    #[arg(long)]
    no_trim: bool,

    /// Keep runs of whitespace inside fields
    #[arg(long)]
    no_compact: bool,

    /// Read blank lines as empty records
    #[arg(long)]
    keep_empty_lines: bool,

    /// Record delimiter
    #[arg(long, value_parser = parse_char)]
    record_delimiter: Option<char>,

    /// JSON file holding a stored format; the flags above override it
    #[arg(long = "format", value_name = "JSON")]
    format_file: Option<PathBuf>,
}

impl InputFormat {
    fn build(&self) -> Result<CsvFormat> {
        let mut format = match &self.format_file {
            Some(path) => load_format(path)?,
            None => CsvFormat::default(),
        };

        if let Some((first, rest)) = self.delimiters.split_first() {
            format.set_column_delimiter(*first);
            for &c in rest {
                format.add_column_delimiter(c);
            }
        }
        if let Some(c) = self.quote {
            format.set_text_qualifier(c);
        }
        if let Some(c) = self.escape {
            format.set_escape_char(c);
        }
        if let Some(c) = self.comment {
            format.set_comment_char(c);
        }
        if let Some(c) = self.record_delimiter {
            format.set_record_delimiter(c);
            format.set_record_delimiter_is_default(false);
        }
        if self.no_comments {
            format.set_use_comments(false);
        }
        if self.no_trim {
            format.set_trim_spaces(false);
        }
        if self.no_compact {
            format.set_compact_spaces(false);
        }
        if self.keep_empty_lines {
            format.set_skip_empty_lines(false);
        }
        Ok(format)
    }
}

fn load_format(path: &Path) -> Result<CsvFormat> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read format '{}'", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse format '{}'", path.display()))
}

/// Accept a single character or one of the usual spellings of a control character
fn parse_char(s: &str) -> std::result::Result<char, String> {
    match s {
        "\\t" | "tab" => return Ok('\t'),
        "\\n" => return Ok('\n'),
        "\\r" => return Ok('\r'),
        "\\0" => return Ok('\0'),
        _ => {}
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("expected a single character, got '{s}'")),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Info { input, format } => show_info(&input, format.build()?),
        Commands::Head {
            input,
            lines,
            verbose,
            format,
        } => show_head(&input, format.build()?, lines, verbose),
        Commands::Convert {
            input,
            output,
            out_delimiter,
            out_quote,
            out_record_delimiter,
            quote_all,
            format,
        } => {
            let in_format = format.build()?;
            let mut out_format = in_format.clone();
            if let Some(c) = out_delimiter {
                out_format.set_column_delimiter(c);
            }
            if let Some(c) = out_quote {
                out_format.set_text_qualifier(c);
            }
            if let Some(c) = out_record_delimiter {
                out_format.set_record_delimiter(c);
                out_format.set_record_delimiter_is_default(false);
            }
            if quote_all {
                out_format.set_use_text_qualifier(true);
            }
            convert(&input, output.as_deref(), in_format, out_format, quote_all)
        }
    }
}

fn open(input: &Path, format: CsvFormat) -> Result<CsvReader> {
    let mut reader = CsvReader::new(format);
    reader
        .open_from_path(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;
    Ok(reader)
}

fn show_info(input: &Path, format: CsvFormat) -> Result<()> {
    let mut reader = open(input, format)?;
    let count = reader
        .read_n_lines(usize::MAX, true)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    let types = reader.guess_column_types().to_vec();

    println!("File: {}", input.display());
    println!("Records: {}", count);
    println!("Columns: {}", reader.header().len());
    for (i, field) in reader.header().iter().enumerate() {
        let data_type = types.get(i).copied().unwrap_or_default();
        println!("  {}: \"{}\" ({})", i, field.value(), data_type);
    }
    if !reader.warnings().is_empty() {
        println!("Warnings: {}", reader.warnings().len());
        for warning in reader.warnings() {
            println!("  {}", warning);
        }
    }

    Ok(())
}

fn show_head(input: &Path, format: CsvFormat, lines: usize, verbose: bool) -> Result<()> {
    let mut reader = open(input, format)?;
    for record in reader.records().take(lines) {
        let record = record.with_context(|| format!("Failed to read '{}'", input.display()))?;
        println!("{}", record.describe(!verbose));
    }
    Ok(())
}

fn convert(
    input: &Path,
    output: Option<&Path>,
    in_format: CsvFormat,
    out_format: CsvFormat,
    quote_all: bool,
) -> Result<()> {
    let mut reader = open(input, in_format)?;

    let mut writer = CsvWriter::new(out_format);
    match output {
        Some(path) => writer
            .open_to_path(path)
            .with_context(|| format!("Failed to create '{}'", path.display()))?,
        None => writer.open_to_writer(io::stdout()),
    }

    let mut written = 0usize;
    for record in reader.records() {
        let mut record = record.with_context(|| format!("Failed to read '{}'", input.display()))?;
        if quote_all {
            record.iter_mut().for_each(|f| f.set_qualified(true));
        }
        writer.write_record(&record, true).context("Failed to write record")?;
        written += 1;
    }
    writer.close().context("Failed to flush output")?;

    if let Some(path) = output {
        eprintln!("Wrote {} records to '{}'", written, path.display());
    }
    Ok(())
}

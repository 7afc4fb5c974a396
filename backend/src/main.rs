//! textprep CLI - Validate and apply text preprocessing instructions to CSV files
//!
//! # Main Commands
//!
//! ```bash
//! textprep run reviews.csv instructions.json -o out.csv   # Validate then preprocess
//! textprep check reviews.csv instructions.json            # Validate only
//! textprep serve                                          # Start HTTP server (port 3000)
//! ```
//!
//! # Helper Commands
//!
//! ```bash
//! textprep parse reviews.csv       # Just parse CSV to JSON
//! textprep instructions            # Show available instructions
//! textprep example                 # Show an example instruction document
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use textprep::api::logs::{redirect_to_stderr, set_quiet};
use textprep::{
    check_csv, example_document, parse_csv_file_auto, preprocess_csv, PipelineError, Registry,
    Settings, ValidationReport,
};

#[derive(Parser)]
#[command(name = "textprep")]
#[command(about = "Validate and apply JSON text preprocessing instructions to CSV files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an instruction document, then apply it to a CSV file
    Run {
        /// Input CSV file
        table: PathBuf,

        /// Instruction document (JSON)
        instructions: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: OutputFormat,
    },

    /// Validate an instruction document against a CSV file
    Check {
        /// Input CSV file
        table: PathBuf,

        /// Instruction document (JSON)
        instructions: PathBuf,
    },

    /// Parse a CSV file and output JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show available instructions
    Instructions,

    /// Show an example instruction document
    Example,

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: TEXTPREP_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    let settings = Settings::from_env();
    set_quiet(settings.quiet);

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            table,
            instructions,
            output,
            format,
        } => cmd_run(&table, &instructions, output.as_deref(), format),

        Commands::Check { table, instructions } => cmd_check(&table, &instructions),

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Instructions => cmd_instructions(),

        Commands::Example => cmd_example(),

        Commands::Serve { port } => cmd_serve(settings.with_port(port)).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

/// Print a failed validation to stdout and exit with status 1.
fn exit_invalid(report: &ValidationReport) -> ! {
    println!("{}", report);
    std::process::exit(1);
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn cmd_run(
    table: &Path,
    instructions: &Path,
    output: Option<&Path>,
    format: OutputFormat,
) -> CliResult {
    // keep stdout for the table; progress and rankings go to stderr
    if output.is_none() {
        redirect_to_stderr();
    }

    let outcome = match preprocess_csv(table, instructions) {
        Ok(outcome) => outcome,
        Err(PipelineError::Validation(report)) => exit_invalid(&report),
        Err(e) => return Err(e.into()),
    };

    let delimiter = outcome.csv_info.delimiter as u8;
    let content = match format {
        OutputFormat::Csv => {
            let mut buffer = Vec::new();
            outcome.table.write_csv(&mut buffer, delimiter)?;
            String::from_utf8(buffer)?
        }
        OutputFormat::Json => serde_json::to_string_pretty(&outcome.table.to_records())?,
    };

    write_output(content.trim_end(), output)?;
    Ok(())
}

fn cmd_check(table: &Path, instructions: &Path) -> CliResult {
    let report = check_csv(table, instructions)?;
    if !report.is_empty() {
        exit_invalid(&report);
    }
    println!("✅ Instructions are valid");
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> CliResult {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = parse_csv_file_auto(input)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Delimiter: '{}'", result.delimiter);
    eprintln!("   Columns: {}", result.headers().join(", "));
    eprintln!("   Rows: {}", result.table.row_count());

    let json = serde_json::to_string_pretty(&result.table.to_records())?;
    write_output(&json, output)?;
    Ok(())
}

fn cmd_instructions() -> CliResult {
    println!("{}", Registry::builtin().description());
    Ok(())
}

fn cmd_example() -> CliResult {
    println!("{}", serde_json::to_string_pretty(&example_document())?);
    Ok(())
}

async fn cmd_serve(settings: Settings) -> CliResult {
    textprep::server::start_server(&settings).await?;
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> CliResult {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

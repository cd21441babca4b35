//! pdf-outline CLI - batch PDF outline extraction

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_outline::batch::{collect_inputs, process_directory_with_progress, DocumentStatus};
use pdf_outline::render::{to_json, write_json_file};
use pdf_outline::{JsonFormat, OutlineConfig, OutlineExtractor};

#[derive(Parser)]
#[command(name = "pdf-outline")]
#[command(version)]
#[command(about = "Extract titles and H1-H3 outlines from PDF documents", long_about = None)]
struct Cli {
    #[command(flatten)]
    batch: BatchArgs,

    #[command(flatten)]
    tuning: TuningArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct BatchArgs {
    /// Input directory of PDFs (or a single PDF)
    #[arg(long, env = "PDF_OUTLINE_INPUT", default_value = "/app/input", value_name = "DIR")]
    input: PathBuf,

    /// Output directory for JSON results (or a .json file for a single PDF)
    #[arg(long, env = "PDF_OUTLINE_OUTPUT", default_value = "/app/output", value_name = "DIR")]
    output: PathBuf,
}

#[derive(Args)]
struct TuningArgs {
    /// Threshold configuration file (JSON; omitted fields keep defaults)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Worker threads (default: available cores)
    #[arg(short, long, global = true, value_name = "N")]
    jobs: Option<usize>,

    /// Per-document time budget in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    budget_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every PDF in the input directory (default)
    Batch,

    /// Extract the outline of a single PDF
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = load_config(&cli.tuning).and_then(|config| match cli.command {
        None | Some(Commands::Batch) => cmd_batch(&cli.batch.input, &cli.batch.output, &config),
        Some(Commands::Extract {
            input,
            output,
            compact,
        }) => cmd_extract(&input, output.as_deref(), compact, config),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &TuningArgs) -> Result<OutlineConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => OutlineConfig::from_json_file(path)?,
        None => OutlineConfig::default(),
    };
    if let Some(jobs) = args.jobs {
        config = config.with_jobs(jobs);
    }
    if let Some(ms) = args.budget_ms {
        config = config.with_time_budget(Duration::from_millis(ms));
    }
    config.validate()?;
    log::debug!("configuration: {:?}", config);
    Ok(config)
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    config: &OutlineConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("input path does not exist: {}", input.display()).into());
    }

    let total = collect_inputs(input)?.len() as u64;
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let summary = process_directory_with_progress(input, output, config, |report| {
        let name = report
            .path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        match report.status {
            DocumentStatus::Complete => pb.set_message(name),
            DocumentStatus::Partial => pb.println(format!("{} {}", "partial".yellow(), name)),
            DocumentStatus::Degraded => pb.println(format!("{} {}", "degraded".red(), name)),
        }
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    eprintln!("{}", "Batch complete".green().bold());
    eprintln!("  {} {} processed", "├─".dimmed(), summary.processed);
    eprintln!("  {} {} partial", "├─".dimmed(), summary.partial);
    eprintln!("  {} {} degraded", "├─".dimmed(), summary.degraded);
    eprintln!("  {} {} write failures", "└─".dimmed(), summary.write_failures);
    eprintln!("{} {}", "Results in".green(), output.display());

    Ok(())
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    config: OutlineConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let outline = OutlineExtractor::new()
        .with_config(config)
        .extract_file_lenient(input);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    if let Some(path) = output {
        write_json_file(&outline, format, path)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", to_json(&outline, format)?);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf-outline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Offline PDF title and outline extraction");
    println!();
    println!("License: MIT");
}

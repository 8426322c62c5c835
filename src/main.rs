// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use docqa::exporter::load_table;
use docqa::hub::{DatasetPublisher, DatasetSplit, HuggingFaceHub, SplitDataset};
use docqa::utils::logging::{format_error, format_info, format_success, format_warning};
use docqa::{Config, ExportFormat, InputFilter, PipelineOrchestrator, RunRequest, Validator};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "docqa")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Generate question/answer datasets from documents with an LLM", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml",
        global = true
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set, global = true)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract QA pairs from a file or directory and export them as a dataset
    Process {
        /// Input file or directory
        #[arg(short, long, value_name = "PATH")]
        input: PathBuf,

        /// Input file type; `auto` accepts every supported type
        #[arg(
            short,
            long,
            default_value = "auto",
            value_parser = ["auto", "csv", "pdf", "doc", "docx", "ppt", "pptx"]
        )]
        format: String,

        /// Model identifier passed to the completion endpoint
        #[arg(short, long)]
        model: String,

        /// Output path; a timestamp is appended to the file name
        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,

        #[arg(short, long, default_value = "jsonl", value_parser = ["jsonl", "csv", "parquet"])]
        export: String,

        /// Number of QA pairs to request per file
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
        num_qa: Option<u32>,

        #[arg(long)]
        no_progress: bool,
    },

    /// Publish an exported dataset file to the Hugging Face Hub
    PushToHf {
        /// CSV, JSONL or Parquet file
        #[arg(long, value_name = "PATH")]
        input_file: PathBuf,

        /// Target dataset repository, `namespace/name`
        #[arg(long)]
        repo_id: String,

        #[arg(long, default_value = "train", value_parser = ["train", "validation", "test"])]
        split: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    docqa::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format_error(&format!("{:#}", e)));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Process {
            input,
            format,
            model,
            output,
            export,
            num_qa,
            no_progress,
        } => {
            let request = RunRequest {
                input_path: input,
                input_filter: format.parse::<InputFilter>()?,
                model,
                output_path: output,
                export_format: export.parse::<ExportFormat>()?,
                requested_count: num_qa.map(|n| n as usize),
            };
            cmd_process(&config, &request, !no_progress, cli.color).await
        }
        Commands::PushToHf {
            input_file,
            repo_id,
            split,
        } => cmd_push(&config, input_file, &repo_id, split.parse()?).await,
    }
}

async fn cmd_process(
    config: &Config,
    request: &RunRequest,
    show_progress: bool,
    colored: bool,
) -> Result<()> {
    let orchestrator = PipelineOrchestrator::from_config(config)
        .context("Failed to initialize the completion backend")?
        .with_progress(show_progress && config.pipeline.show_progress, colored);

    let stats = orchestrator
        .run(request)
        .await
        .with_context(|| format!("Processing {} failed", request.input_path.display()))?;

    match &stats.output_path {
        Some(path) => println!(
            "{}",
            format_success(&format!(
                "Exported {} QA pairs from {} file(s) to {}",
                stats.pairs_extracted,
                stats.files_processed,
                path.display()
            ))
        ),
        None => println!(
            "{}",
            format_warning("No QA pairs were extracted; no dataset was written")
        ),
    }

    if stats.files_failed > 0 {
        println!(
            "{}",
            format_warning(&format!("{} file(s) failed; see the log for details", stats.files_failed))
        );
    }

    Ok(())
}

async fn cmd_push(config: &Config, input_file: PathBuf, repo_id: &str, split: DatasetSplit) -> Result<()> {
    Validator::validate_repo_id(repo_id)?;

    let table = tokio::task::spawn_blocking({
        let input_file = input_file.clone();
        move || load_table(&input_file)
    })
    .await
    .context("Dataset loading task failed")?
    .with_context(|| format!("Failed to load dataset from {}", input_file.display()))?;

    if table.is_empty() {
        println!("{}", format_warning("Dataset is empty; publishing an empty split"));
    }
    println!(
        "{}",
        format_info(&format!(
            "Loaded {} row(s) with columns: {}",
            table.len(),
            table.columns().join(", ")
        ))
    );

    let hub = HuggingFaceHub::from_config(&config.hub);
    let receipt = hub
        .publish(&SplitDataset { split, table }, repo_id)
        .await
        .with_context(|| format!("Failed to publish to {}", repo_id))?;

    println!(
        "{}",
        format_success(&format!("Published {} split to {}", split, receipt.repo_url))
    );
    if let Some(commit_url) = receipt.commit_url {
        println!("{}", format_info(&format!("Commit: {}", commit_url)));
    }

    Ok(())
}

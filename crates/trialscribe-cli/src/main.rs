//! TrialScribe command-line interface.
//!
//! The index is in-memory and scoped to the process, so `run` and `search`
//! rebuild it from the guidance directory on startup; `ingest` validates
//! the corpus and reports what a run would index.

use std::collections::HashSet;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use trialscribe_core::{graph, RuleRegistry};
use trialscribe_runtime::{
    load_directory, AnthropicProvider, CachedEmbedder, EventRecord, HashEmbedder, IngestError,
    JobCoordinator, JobEvent, Pipeline, RuntimeConfig, SharedIndex,
};

/// Demo task used when `run` is invoked without `--task`.
const DEFAULT_TASK: &str = "Write a \"Protocol Synopsis\" paragraph for an interventional \
     Phase II oncology trial. Mention design, key eligibility, primary endpoint, \
     AE reporting basics, data protection, and informed consent.";

#[derive(Parser)]
#[command(
    name = "trialscribe",
    version,
    about = "Draft compliance-checked clinical-trial documents from ingested guidance"
)]
struct Cli {
    /// Optional YAML config file with runtime tunables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the guidance corpus and report what a run would index
    Ingest {
        /// Directory of .txt/.md guidance documents
        #[arg(long, default_value = "./guidance")]
        source_dir: PathBuf,
    },

    /// Draft a document through the retrieve/compose/check/revise pipeline
    Run {
        /// Drafting task; defaults to a protocol-synopsis demo task
        #[arg(long)]
        task: Option<String>,

        /// Cap on revise/check round-trips (defaults from config)
        #[arg(long)]
        max_iterations: Option<u32>,

        /// Print node-by-node progress to stderr
        #[arg(long)]
        stream: bool,

        /// Append each event as a JSON line to this file
        #[arg(long)]
        events: Option<PathBuf>,

        /// Directory of .txt/.md guidance documents
        #[arg(long, default_value = "./guidance")]
        source_dir: PathBuf,
    },

    /// Query the guidance index directly
    Search {
        /// Query text
        query: String,

        /// Number of results
        #[arg(short, default_value_t = 4)]
        k: usize,

        /// Directory of .txt/.md guidance documents
        #[arg(long, default_value = "./guidance")]
        source_dir: PathBuf,
    },

    /// Print the pipeline's states and edges
    Graph,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => RuntimeConfig::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RuntimeConfig::default(),
    };

    match cli.command {
        Command::Ingest { source_dir } => ingest(&source_dir),
        Command::Run {
            task,
            max_iterations,
            stream,
            events,
            source_dir,
        } => {
            run(
                config,
                task,
                max_iterations,
                stream,
                events.as_deref(),
                &source_dir,
            )
            .await
        }
        Command::Search {
            query,
            k,
            source_dir,
        } => search(&query, k, &source_dir).await,
        Command::Graph => {
            print_graph();
            Ok(())
        }
    }
}

fn ingest(source_dir: &Path) -> Result<()> {
    let payloads = load_directory(source_dir)?;
    let sources: HashSet<&str> = payloads
        .iter()
        .map(|p| p.metadata.source_id.as_str())
        .collect();

    println!(
        "{} chunks from {} documents under {}",
        payloads.len(),
        sources.len(),
        source_dir.display()
    );
    Ok(())
}

async fn run(
    config: RuntimeConfig,
    task: Option<String>,
    max_iterations: Option<u32>,
    stream: bool,
    events_path: Option<&Path>,
    source_dir: &Path,
) -> Result<()> {
    let index = build_index(source_dir, true).await?;
    let provider = Arc::new(
        AnthropicProvider::from_env().context("the run command needs a generation backend")?,
    );

    let max_iterations = max_iterations.unwrap_or(config.default_max_iterations);
    let pipeline = Arc::new(Pipeline::new(
        index,
        provider,
        RuleRegistry::standard(),
        config,
    ));
    let coordinator = JobCoordinator::new(pipeline);

    let job = coordinator.submit(task.unwrap_or_else(|| DEFAULT_TASK.to_string()), max_iterations);
    tracing::info!(%job, "job submitted");

    let mut events_file = match events_path {
        Some(path) => Some(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening events file {}", path.display()))?,
        ),
        None => None,
    };

    let mut events = coordinator.subscribe(&job);
    let mut failure: Option<String> = None;
    while let Some(record) = events.recv().await {
        if let Some(file) = events_file.as_mut() {
            writeln!(file, "{}", serde_json::to_string(&record)?)?;
        }
        if stream {
            render(&record);
        }
        if let JobEvent::Error { message } = &record.event {
            failure = Some(message.clone());
        }
    }

    if let Some(message) = failure {
        bail!("job failed: {message}");
    }

    match coordinator.result(&job).and_then(|state| state.draft) {
        Some(draft) => {
            println!("\n=== FINAL OUTPUT ===\n");
            println!("{draft}");
            Ok(())
        }
        None => bail!("job completed without a draft"),
    }
}

async fn search(query: &str, k: usize, source_dir: &Path) -> Result<()> {
    let index = build_index(source_dir, false).await?;
    let hits = index.search(query, k).await?;

    if hits.is_empty() {
        println!("no results");
        return Ok(());
    }
    for (i, hit) in hits.iter().enumerate() {
        println!(
            "[{}] {:.4} ({} #{}) {}",
            i + 1,
            hit.score,
            hit.metadata.source_id,
            hit.metadata.chunk_index,
            preview(&hit.text, 120)
        );
    }
    Ok(())
}

fn print_graph() {
    println!("entry: {}", graph::ENTRY);
    println!("terminal: {}", graph::END);
    for (from, to, condition) in graph::EDGES {
        match condition {
            Some(condition) => println!("  {from} -> {to}  [{condition}]"),
            None => println!("  {from} -> {to}"),
        }
    }
    println!("\n{}", graph::to_mermaid());
}

/// Build the in-process retrieval index from a guidance directory.
///
/// With `tolerate_empty`, a missing or empty corpus logs a warning and
/// leaves the index empty (runs proceed with no retrieved context);
/// otherwise it is an error.
async fn build_index(source_dir: &Path, tolerate_empty: bool) -> Result<Arc<SharedIndex>> {
    let embedder = Arc::new(CachedEmbedder::with_defaults(HashEmbedder::default()));
    let index = Arc::new(SharedIndex::new(embedder));

    match load_directory(source_dir) {
        Ok(payloads) => {
            index.rebuild(payloads).await?;
        }
        Err(error @ IngestError::NoInputMaterial(_)) if tolerate_empty => {
            tracing::warn!(%error, "proceeding with an empty guidance index");
        }
        Err(error) => return Err(error.into()),
    }

    Ok(index)
}

fn render(record: &EventRecord) {
    match &record.event {
        JobEvent::Node { node, delta } => {
            let mut parts = Vec::new();
            if let Some(context) = &delta.context {
                parts.push(format!("context: {}", preview(context, 120)));
            }
            if let Some(draft) = &delta.draft {
                parts.push(format!("draft: {}", preview(draft, 160)));
            }
            if let Some(issues) = &delta.issues {
                let rules: Vec<&str> = issues.iter().map(|i| i.rule.as_str()).collect();
                parts.push(format!(
                    "issues: {}",
                    if rules.is_empty() {
                        "none".to_string()
                    } else {
                        rules.join(", ")
                    }
                ));
            }
            if let Some(iteration) = delta.iteration {
                parts.push(format!("iteration: {iteration}"));
            }
            let body = if parts.is_empty() {
                "(no changes)".to_string()
            } else {
                parts.join(" | ")
            };
            eprintln!("[{node}] {body}");
        }
        JobEvent::Final { .. } => eprintln!("[final] result ready"),
        JobEvent::Done => eprintln!("[done]"),
        JobEvent::Error { message } => eprintln!("[error] {message}"),
    }
}

fn preview(text: &str, budget: usize) -> String {
    let flat = text.replace(['\n', '\r'], " ");
    if flat.chars().count() <= budget {
        flat
    } else {
        let truncated: String = flat.chars().take(budget).collect();
        format!("{truncated}...")
    }
}

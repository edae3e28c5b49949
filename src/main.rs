use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use topical::config::Config;
use topical::corpus;
use topical::output::terminal;
use topical::topics::TopicModel;

/// Topical: interactive LDA topic modeling for small text corpora.
///
/// Each corpus line is one document, either plain text or
/// `id<TAB>date<TAB>text`.
#[derive(Parser)]
#[command(name = "topical", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the model and show each topic's top words
    Topics {
        #[command(flatten)]
        model: ModelArgs,

        /// Words to show per topic
        #[arg(long, default_value = "10")]
        top_words: usize,
    },

    /// Train the model and show each document's topic assignments
    Documents {
        #[command(flatten)]
        model: ModelArgs,

        /// Max documents to show
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Train the model and show correlated topic pairs
    Correlations {
        #[command(flatten)]
        model: ModelArgs,

        /// Only link topic pairs scoring above this (default: TOPICAL_CORRELATION_CUTOFF or 0)
        #[arg(long)]
        cutoff: Option<f64>,

        /// Print the graph as JSON (nodes + links) instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Arguments shared by every subcommand that builds a model.
#[derive(Args)]
struct ModelArgs {
    /// Corpus file, one document per line
    corpus: PathBuf,

    /// Stopword file, one word per line (default: TOPICAL_STOPWORDS)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Also use the built-in English stopword list
    #[arg(long)]
    english_stopwords: bool,

    /// Number of topics (default: TOPICAL_NUM_TOPICS or 10)
    #[arg(long)]
    topics: Option<usize>,

    /// Gibbs sweeps to run (default: TOPICAL_SWEEPS or 100)
    #[arg(long)]
    sweeps: Option<u64>,

    /// Seed for a reproducible run (default: TOPICAL_SEED, else random)
    #[arg(long)]
    seed: Option<u64>,

    /// Recheck every count invariant after each sweep
    #[arg(long)]
    verify: bool,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topical=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Topics { model, top_words } => {
            let model = train(&model, &config)?;
            terminal::display_topics(&model, top_words);
        }

        Commands::Documents { model, limit } => {
            let model = train(&model, &config)?;
            terminal::display_documents(model.documents(), limit);
        }

        Commands::Correlations {
            model,
            cutoff,
            json,
        } => {
            let model = train(&model, &config)?;
            let cutoff = cutoff.unwrap_or(config.correlation_cutoff);
            let matrix = model.topic_correlations();
            let graph = model.correlation_graph(&matrix, cutoff);

            if json {
                println!("{}", serde_json::to_string_pretty(&graph)?);
            } else {
                terminal::display_correlation_graph(&graph, cutoff);
            }
        }
    }

    Ok(())
}

/// Build a model from the corpus and run the requested number of sweeps.
fn train(args: &ModelArgs, config: &Config) -> Result<TopicModel> {
    let mut model = match args.seed.or(config.seed) {
        Some(seed) => {
            info!(seed, "Using fixed seed");
            TopicModel::seeded(seed)
        }
        None => TopicModel::default(),
    };
    model.set_num_topics(args.topics.unwrap_or(config.num_topics))?;

    let mut stopwords = Vec::new();
    if let Some(path) = args.stopwords.as_ref().or(config.stopwords_path.as_ref()) {
        stopwords.extend(corpus::read_stopwords(path)?);
    }
    if args.english_stopwords {
        stopwords.extend(corpus::default_stopwords());
    }

    let lines = corpus::read_lines(&args.corpus)?;
    model.process_corpus(&stopwords, &lines)?;

    if model.documents().is_empty() {
        anyhow::bail!(
            "No documents found in {}: every line was empty or had no word tokens",
            args.corpus.display()
        );
    }

    let sweeps = args.sweeps.unwrap_or(config.sweeps);
    model.set_requested_sweeps(sweeps);

    info!(
        topics = model.num_topics(),
        documents = model.documents().len(),
        sweeps,
        "Sampling"
    );

    let pb = ProgressBar::new(sweeps);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Sweeps [{bar:30}] {pos}/{len} ({eta}) {msg}")
            .unwrap(),
    );

    for _ in 0..sweeps {
        let stats = model.sweep();
        if args.verify {
            model.verify_counts()?;
        }
        pb.set_message(format!("{} reassigned", stats.topics_changed));
        pb.inc(1);
    }
    pb.finish_and_clear();

    if args.verify {
        eprintln!("{}", "All count invariants hold.".green());
    }

    Ok(model)
}

//! `glimpse-rsa` entrypoint: rerank a summaries CSV and write the JSON results.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use mimalloc::MiMalloc;

use glimpse::config::Config;
use glimpse::input::{group_summaries, load_summaries};
use glimpse::model::{DevicePreference, Seq2SeqScorer};
use glimpse::output::{RerankOutput, output_path, write_json};
use glimpse::pipeline::rerank_groups;
use glimpse::rsa::ConsensualityPenalty;
use glimpse::scoring::{LexicalScorer, LikelihoodScorer};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(
    name = "glimpse-rsa",
    version,
    about = "Rerank multi-document summary candidates with Rational Speech Acts"
)]
struct Cli {
    /// Summaries CSV with columns index, id, text, gold, summary, id_candidate
    #[arg(long)]
    summaries: PathBuf,

    /// Directory for the results file [env: GLIMPSE_OUTPUT_DIR]
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Scorer identifier recorded in metadata and the output name [env: GLIMPSE_MODEL_NAME]
    #[arg(long)]
    model_name: Option<String>,

    /// Local encoder-decoder checkpoint; without one the lexical stub scores pairs [env: GLIMPSE_MODEL_PATH]
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// auto, cpu, cuda or metal [env: GLIMPSE_DEVICE]
    #[arg(long)]
    device: Option<DevicePreference>,

    /// Speaker rationality [env: GLIMPSE_RATIONALITY]
    #[arg(long)]
    rationality: Option<f64>,

    /// Pragmatic rounds [env: GLIMPSE_RSA_ITERATIONS]
    #[arg(long)]
    iterations: Option<usize>,

    /// Pairs per scorer call [env: GLIMPSE_BATCH_SIZE]
    #[arg(long)]
    batch_size: Option<usize>,

    /// disabled, additive[:w] or multiplicative[:w] [env: GLIMPSE_CONSENSUALITY_PENALTY]
    #[arg(long)]
    penalty: Option<ConsensualityPenalty>,

    /// Groups reranked concurrently [env: GLIMPSE_WORKERS]
    #[arg(long)]
    workers: Option<usize>,

    /// Only run when this substring occurs in the summaries file stem
    #[arg(long)]
    filter: Option<String>,

    /// Print the output path to stdout when done
    #[arg(long)]
    scripted_run: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(name) = &self.model_name {
            config.model.model_name = name.clone();
        }
        if let Some(path) = &self.model_path {
            config.model.model_path = Some(path.clone());
        }
        if let Some(device) = self.device {
            config.model.device = device;
        }
        if let Some(rationality) = self.rationality {
            config.rsa.rationality = rationality;
        }
        if let Some(iterations) = self.iterations {
            config.rsa.iterations = iterations;
        }
        if let Some(batch_size) = self.batch_size {
            config.rsa.batch_size = batch_size;
        }
        if let Some(penalty) = self.penalty {
            config.rsa.penalty = penalty;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
    }

    fn filtered_out(&self) -> bool {
        let Some(filter) = &self.filter else {
            return false;
        };
        let stem = self
            .summaries
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        !stem.contains(filter.as_str())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if cli.filtered_out() {
        tracing::info!(
            summaries = %cli.summaries.display(),
            filter = cli.filter.as_deref().unwrap_or_default(),
            "Summaries file does not match filter, nothing to do"
        );
        return Ok(());
    }

    let mut config = Config::from_env()?;
    cli.apply(&mut config);
    config.validate()?;

    let scorer: Arc<dyn LikelihoodScorer> = if config.model.model_path.is_some() {
        Arc::new(Seq2SeqScorer::load(config.model.clone())?)
    } else {
        tracing::warn!("No GLIMPSE_MODEL_PATH configured, scoring with the lexical stub");
        Arc::new(LexicalScorer::new())
    };
    let model_name = scorer.name().to_string();

    tracing::info!(
        summaries = %cli.summaries.display(),
        model = %model_name,
        rationality = config.rsa.rationality,
        iterations = config.rsa.iterations,
        "glimpse-rsa starting"
    );

    let records = load_summaries(&cli.summaries)?;
    let groups = group_summaries(records)?;

    let report = rerank_groups(groups, scorer, config.rsa.clone(), config.workers).await?;
    let failures = report.failure_records();
    let output =
        RerankOutput::new(report.records, &model_name, config.rsa.iterations).with_failures(failures);

    let path = output_path(
        &config.output_dir,
        &cli.summaries,
        config.rsa.rationality,
        &model_name,
    );
    write_json(&path, &output)?;

    if cli.scripted_run {
        println!("{}", path.display());
    }

    Ok(())
}

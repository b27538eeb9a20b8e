//! Command implementations.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use aspect_embeddings::KeyedVectors;
use aspect_lexicon::{VaderLexicon, WordNetStore};
use aspect_topics::{TopicExtractor, TopicReport, TopicsConfig};
use aspect_types::{load_section, AspectOccurrence, Settings};

use crate::cli::ExtractArgs;

const TOPICS_FILE: &str = "topics.json";
const ASPECTS_FILE: &str = "aspects.json";

/// Apply CLI overrides on top of the loaded settings.
fn apply_overrides(settings: &mut Settings, args: &ExtractArgs, log_level: Option<&str>) {
    if let Some(path) = &args.embeddings {
        settings.embeddings_path = path.clone();
    }
    if let Some(path) = &args.ontology {
        settings.ontology_path = path.clone();
    }
    if let Some(path) = &args.sentiment {
        settings.sentiment_path = Some(path.clone());
    }
    if let Some(dir) = &args.output {
        settings.output_dir = dir.clone();
    }
    if let Some(level) = log_level {
        settings.log_level = level.to_string();
    }
}

fn init_logging(level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Run a full extraction and write the topic and aspect tables.
pub fn run_extract(
    config_path: Option<&str>,
    log_level_override: Option<&str>,
    args: ExtractArgs,
) -> Result<()> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;
    apply_overrides(&mut settings, &args, log_level_override);
    let topics_config: TopicsConfig =
        load_section(config_path, "topics").context("Failed to load topics configuration")?;

    init_logging(&settings.log_level)?;

    info!("Aspect topic extraction starting...");
    info!("  Aspects: {}", args.aspects);
    info!("  Embeddings: {}", settings.embeddings_path);
    info!("  Ontology: {}", settings.ontology_path);
    info!("  Output: {}", settings.output_dir);

    let occurrences = AspectOccurrence::load_json(&args.aspects)
        .with_context(|| format!("Failed to read aspects from {}", args.aspects))?;
    let embeddings = KeyedVectors::load_text(&settings.embeddings_path)
        .with_context(|| format!("Failed to load embeddings from {}", settings.embeddings_path))?;
    let ontology = WordNetStore::load_json(&settings.ontology_path)
        .with_context(|| format!("Failed to load ontology from {}", settings.ontology_path))?;
    let lexicon = match &settings.sentiment_path {
        Some(path) => VaderLexicon::load(path)
            .with_context(|| format!("Failed to load sentiment lexicon from {path}"))?,
        None => VaderLexicon::default(),
    };
    info!(
        occurrences = occurrences.len(),
        vocabulary = embeddings.len(),
        senses = ontology.len(),
        sentiment_words = lexicon.len(),
        "Inputs loaded"
    );

    let extractor = TopicExtractor::new(Arc::new(embeddings), Arc::new(ontology), topics_config)
        .context("Invalid topics configuration")?;
    let report = extractor
        .extract(&occurrences, &lexicon)
        .context("Topic extraction failed")?;

    let written = write_report(&report, Path::new(&settings.output_dir))?;
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write `topics.json` and `aspects.json` into `dir`, creating it if needed.
pub fn write_report(report: &TopicReport, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).context("Failed to create output directory")?;

    let topics_path = dir.join(TOPICS_FILE);
    write_json(&topics_path, &report.topics)?;
    let aspects_path = dir.join(ASPECTS_FILE);
    write_json(&aspects_path, &report.aspects)?;

    info!(
        run_id = %report.run_id,
        topics = report.topics.len(),
        aspects = report.aspects.len(),
        "Report written"
    );
    Ok(vec![topics_path, aspects_path])
}

#[derive(Serialize)]
struct EffectiveConfig {
    #[serde(flatten)]
    settings: Settings,
    topics: TopicsConfig,
}

/// Print the settings and topic configuration after all layers are applied.
pub fn show_config(config_path: Option<&str>) -> Result<()> {
    let settings = Settings::load(config_path).context("Failed to load configuration")?;
    let topics: TopicsConfig =
        load_section(config_path, "topics").context("Failed to load topics configuration")?;
    let effective = EffectiveConfig { settings, topics };
    println!("{}", serde_json::to_string_pretty(&effective)?);
    Ok(())
}

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::{Config, LogFormat};
use engine::{parse_candles, Pipeline};
use strategy::AnalysisConfig;

fn main() -> anyhow::Result<()> {
    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env().context("Failed to read environment configuration")?;

    // ── Logging ───────────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match cfg.log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.init(),
    }

    // ── Analysis settings ─────────────────────────────────────────────────────
    let analysis_cfg = match &cfg.analysis_config_path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load analysis config from {path}"))?,
        None => AnalysisConfig::default(),
    };
    let pipeline = Pipeline::new(analysis_cfg).context("Invalid analysis config")?;

    // ── Candles ───────────────────────────────────────────────────────────────
    let raw = std::fs::read_to_string(&cfg.candles_path)
        .with_context(|| format!("Failed to read candles from {}", cfg.candles_path))?;
    let candles = parse_candles(&raw)
        .with_context(|| format!("Failed to parse candles in {}", cfg.candles_path))?;
    info!(path = %cfg.candles_path, candles = candles.len(), "Candles loaded");

    // ── Run ───────────────────────────────────────────────────────────────────
    let analysis = pipeline.run(&candles);
    info!(status = %analysis.status, direction = %analysis.signal.direction, "Done");

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

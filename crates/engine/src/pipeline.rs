use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use common::{Candle, Error, Report, Result, Signal};
use risk::SignalSynthesizer;
use strategy::{AnalysisConfig, MarketAnalyzer};

use crate::validate::validate_candles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    Ok,
    InsufficientData,
    InvalidInput,
    Fault,
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisStatus::Ok => write!(f, "OK"),
            AnalysisStatus::InsufficientData => write!(f, "INSUFFICIENT_DATA"),
            AnalysisStatus::InvalidInput => write!(f, "INVALID_INPUT"),
            AnalysisStatus::Fault => write!(f, "FAULT"),
        }
    }
}

/// Result of one pipeline run. `report` is present only when every stage ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub status: AnalysisStatus,
    pub signal: Signal,
    pub report: Option<Report>,
}

impl Analysis {
    fn rejected(err: &Error) -> Self {
        let (status, reason) = match err {
            Error::InvalidInput { .. } => (AnalysisStatus::InvalidInput, err.to_string()),
            Error::InsufficientData { .. } => (AnalysisStatus::InsufficientData, err.to_string()),
            _ => (AnalysisStatus::Fault, format!("Internal fault: {err}")),
        };
        Self {
            status,
            signal: Signal::wait(reason),
            report: None,
        }
    }
}

/// Candles in, signal and diagnostics out.
///
/// Holds only immutable settings, so one instance can serve any number of
/// threads. `run` never panics and never returns an error.
#[derive(Debug, Clone)]
pub struct Pipeline {
    min_candles: usize,
    analyzer: MarketAnalyzer,
    synthesizer: SignalSynthesizer,
}

impl Pipeline {
    /// Build from a validated configuration.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: AnalysisConfig) -> Self {
        Self {
            min_candles: config.min_candles,
            analyzer: MarketAnalyzer::new(&config),
            synthesizer: SignalSynthesizer::new(config.signal),
        }
    }

    pub fn run(&self, candles: &[Candle]) -> Analysis {
        if let Err(e) = validate_candles(candles) {
            warn!(error = %e, "Rejected candle input");
            return Analysis::rejected(&e);
        }
        if candles.len() < self.min_candles {
            let e = Error::InsufficientData {
                required: self.min_candles,
                actual: candles.len(),
            };
            warn!(error = %e, "Not enough candles to analyze");
            return Analysis::rejected(&e);
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let report = self.analyzer.analyze(candles);
            let signal = self.synthesizer.synthesize(&report);
            (report, signal)
        }));

        match outcome {
            Ok((report, signal)) => {
                debug!(
                    swing_highs = report.structure.swing_highs.len(),
                    swing_lows = report.structure.swing_lows.len(),
                    zones = report.zones.len(),
                    gaps = report.gaps.len(),
                    trend = %report.structure.trend,
                    bias = %report.bias.direction,
                    "Stages complete"
                );
                info!(
                    candles = candles.len(),
                    last = ?candles.last().and_then(Candle::datetime),
                    direction = %signal.direction,
                    confidence = report.confluence.confidence,
                    "Analysis complete"
                );
                Analysis {
                    status: AnalysisStatus::Ok,
                    signal,
                    report: Some(report),
                }
            }
            Err(payload) => {
                let e = Error::Other(panic_message(payload.as_ref()));
                error!(error = %e, "Analysis stage faulted");
                Analysis::rejected(&e)
            }
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::from_valid(AnalysisConfig::default())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_config() {
        let mut cfg = AnalysisConfig::default();
        cfg.indicators.macd_fast = 30;
        assert!(matches!(Pipeline::new(cfg), Err(Error::Config(_))));
    }

    #[test]
    fn short_input_is_insufficient() {
        let candles: Vec<Candle> = (0..5)
            .map(|i| Candle::new(i * 60, 10.0, 11.0, 9.0, 10.0, 1.0))
            .collect();
        let analysis = Pipeline::default().run(&candles);
        assert_eq!(analysis.status, AnalysisStatus::InsufficientData);
        assert!(analysis.signal.is_wait());
        assert!(analysis.signal.rationale.starts_with("Insufficient data"));
        assert!(analysis.report.is_none());
    }

    #[test]
    fn panic_payloads_become_messages() {
        let payload = panic::catch_unwind(|| panic!("boom {}", 7)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom 7");
        let payload = panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static");
    }

    #[test]
    fn faults_map_to_wait() {
        let analysis = Analysis::rejected(&Error::Other("index out of bounds".into()));
        assert_eq!(analysis.status, AnalysisStatus::Fault);
        assert!(analysis.signal.is_wait());
        assert!(analysis.signal.rationale.contains("index out of bounds"));
    }

    #[test]
    fn status_serializes_upper_case() {
        let json = serde_json::to_string(&AnalysisStatus::InsufficientData).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_DATA\"");
    }
}

pub mod bias;
pub mod config;
pub mod confluence;
pub mod gaps;
pub mod indicators;
pub mod levels;
pub mod structure;
pub mod swings;
pub mod zones;

#[cfg(test)]
mod test_support;

pub use bias::BiasScorer;
pub use config::AnalysisConfig;
pub use confluence::ConfluenceScorer;
pub use gaps::GapDetector;
pub use indicators::IndicatorCalculator;
pub use levels::KeyLevelResolver;
pub use structure::StructureAnalyzer;
pub use swings::SwingDetector;
pub use zones::ZoneDetector;

use common::{Candle, Report};

/// Runs the analysis stages left to right, each reading only the candles and
/// the outputs of earlier stages.
#[derive(Debug, Clone)]
pub struct MarketAnalyzer {
    indicators: IndicatorCalculator,
    structure: StructureAnalyzer,
    zones: ZoneDetector,
    gaps: GapDetector,
    levels: KeyLevelResolver,
    bias: BiasScorer,
    confluence: ConfluenceScorer,
}

impl MarketAnalyzer {
    pub fn new(cfg: &AnalysisConfig) -> Self {
        Self {
            indicators: IndicatorCalculator::new(cfg.indicators.clone()),
            structure: StructureAnalyzer::new(cfg.structure.clone()),
            zones: ZoneDetector::new(cfg.zones.clone()),
            gaps: GapDetector::new(cfg.gaps.clone()),
            levels: KeyLevelResolver::new(cfg.levels.clone()),
            bias: BiasScorer::new(cfg.bias.clone()),
            confluence: ConfluenceScorer::new(cfg.confluence.clone()),
        }
    }

    pub fn analyze(&self, candles: &[Candle]) -> Report {
        let indicators = self.indicators.snapshot(candles);
        let structure = self.structure.analyze(candles);
        let zones = self.zones.detect(candles, indicators.atr);
        let gaps = self.gaps.detect(candles);
        let levels = self.levels.resolve(candles, &structure);
        let bias = self.bias.score(&indicators, &structure);
        let confluence = self
            .confluence
            .score(&bias, &indicators, &structure, &zones, &gaps);

        Report {
            indicators,
            structure,
            zones,
            gaps,
            levels,
            bias,
            confluence,
        }
    }
}

impl Default for MarketAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

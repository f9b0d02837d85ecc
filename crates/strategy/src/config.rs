use serde::{Deserialize, Serialize};

use common::{Error, Result};

/// Every threshold and weight the analysis pipeline uses.
///
/// Loaded from TOML; each section and field falls back to its default, so a
/// file only needs to name what it overrides.
///
/// Example `config/analysis.toml`:
/// ```toml
/// min_candles = 20
///
/// [zones]
/// impulse_atr_multiple = 1.5
///
/// [signal]
/// min_confidence = 40
/// target_multiples = [1.5, 2.5, 3.5]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum candles for a full pipeline run.
    pub min_candles: usize,
    pub indicators: IndicatorSettings,
    pub structure: StructureSettings,
    pub zones: ZoneSettings,
    pub gaps: GapSettings,
    pub levels: LevelSettings,
    pub bias: BiasSettings,
    pub confluence: ConfluenceSettings,
    pub signal: SignalSettings,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_candles: 20,
            indicators: IndicatorSettings::default(),
            structure: StructureSettings::default(),
            zones: ZoneSettings::default(),
            gaps: GapSettings::default(),
            levels: LevelSettings::default(),
            bias: BiasSettings::default(),
            confluence: ConfluenceSettings::default(),
            signal: SignalSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub ema_fast: usize,
    pub ema_mid: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
    pub atr_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            ema_fast: 20,
            ema_mid: 50,
            ema_slow: 200,
            rsi_period: 14,
            atr_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StructureSettings {
    /// Bars on each side a swing must dominate.
    pub swing_lookback: usize,
    pub min_candles: usize,
    pub max_breaks: usize,
    pub max_reversals: usize,
}

impl Default for StructureSettings {
    fn default() -> Self {
        Self {
            swing_lookback: 3,
            min_candles: 5,
            max_breaks: 5,
            max_reversals: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ZoneSettings {
    /// Body size, in ATRs, that makes a candle impulsive.
    pub impulse_atr_multiple: f64,
    /// Fractional tolerance past the zone's outer edge (0.02 = 2%).
    pub proximity_pct: f64,
    /// Distance, in ATRs, from the nearer boundary that still counts as active.
    pub proximity_atr: f64,
    pub min_candles: usize,
    pub max_zones: usize,
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self {
            impulse_atr_multiple: 1.5,
            proximity_pct: 0.02,
            proximity_atr: 2.0,
            min_candles: 10,
            max_zones: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GapSettings {
    /// Fractional tolerance past the gap's far boundary (0.01 = 1%).
    pub proximity_pct: f64,
    pub min_candles: usize,
    pub max_gaps: usize,
}

impl Default for GapSettings {
    fn default() -> Self {
        Self {
            proximity_pct: 0.01,
            min_candles: 3,
            max_gaps: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LevelSettings {
    /// Trailing candles used when no swing point is available.
    pub range_window: usize,
    /// Swing highs and swing lows kept, each.
    pub max_levels: usize,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            range_window: 30,
            max_levels: 5,
        }
    }
}

/// Points awarded by the bias scorer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BiasSettings {
    pub ema_fast_vs_mid: u32,
    pub ema_mid_vs_slow: u32,
    pub price_vs_fast: u32,
    pub price_vs_slow: u32,
    pub structure: u32,
    pub rsi: u32,
    pub macd: u32,
    pub reversal: u32,
    pub rsi_bullish_above: f64,
    pub rsi_bearish_below: f64,
}

impl Default for BiasSettings {
    fn default() -> Self {
        Self {
            ema_fast_vs_mid: 2,
            ema_mid_vs_slow: 1,
            price_vs_fast: 1,
            price_vs_slow: 1,
            structure: 3,
            rsi: 1,
            macd: 1,
            reversal: 2,
            rsi_bullish_above: 55.0,
            rsi_bearish_below: 45.0,
        }
    }
}

/// Weight table and partial-credit rules of the confluence scorer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfluenceSettings {
    pub ema_weight: u32,
    pub structure_weight: u32,
    pub order_block_weight: u32,
    pub gap_weight: u32,
    pub rsi_weight: u32,
    pub macd_weight: u32,

    /// EMA fast/mid agreement credit; the rest of `ema_weight` needs price past the slow EMA.
    pub ema_alignment_score: u32,
    /// Trend match credit; the rest of `structure_weight` needs a matching BOS.
    pub structure_trend_score: u32,
    pub structure_reversal_score: u32,
    /// Order-block credit for proximity below `near_atr`, below `mid_atr`, and beyond.
    pub order_block_near_atr: f64,
    pub order_block_mid_atr: f64,
    pub order_block_mid_score: u32,
    pub order_block_far_score: u32,
    pub gap_inactive_score: u32,
    /// RSI band `[core_low, core_high]` for a bullish lean; mirrored around 50 for bearish.
    pub rsi_core_low: f64,
    pub rsi_core_high: f64,
    /// Half credit band edges beyond the core band.
    pub rsi_outer_low: f64,
    pub rsi_outer_high: f64,
    pub rsi_partial_score: u32,
    /// Confidence needed to label the outcome with the bias direction.
    pub label_threshold: u8,
}

impl ConfluenceSettings {
    pub fn max_score(&self) -> u32 {
        self.ema_weight
            + self.structure_weight
            + self.order_block_weight
            + self.gap_weight
            + self.rsi_weight
            + self.macd_weight
    }
}

impl Default for ConfluenceSettings {
    fn default() -> Self {
        Self {
            ema_weight: 20,
            structure_weight: 25,
            order_block_weight: 20,
            gap_weight: 15,
            rsi_weight: 10,
            macd_weight: 10,
            ema_alignment_score: 15,
            structure_trend_score: 20,
            structure_reversal_score: 15,
            order_block_near_atr: 0.5,
            order_block_mid_atr: 1.5,
            order_block_mid_score: 15,
            order_block_far_score: 5,
            gap_inactive_score: 5,
            rsi_core_low: 50.0,
            rsi_core_high: 70.0,
            rsi_outer_low: 40.0,
            rsi_outer_high: 80.0,
            rsi_partial_score: 5,
            label_threshold: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalSettings {
    /// Confidence below which no trade is proposed.
    pub min_confidence: u8,
    /// ATRs placed beyond a zone or swing for the stop.
    pub stop_buffer_atr: f64,
    /// ATRs from price for the stop when no zone or swing qualifies.
    pub fallback_stop_atr: f64,
    /// Risk multiples for tp1, tp2, tp3.
    pub target_multiples: [f64; 3],
    pub enforce_min_reward_risk: bool,
    /// Smallest reward:risk `tp1` may offer when enforcement is on.
    pub min_reward_risk: f64,
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            min_confidence: 40,
            stop_buffer_atr: 0.3,
            fallback_stop_atr: 1.5,
            target_multiples: [1.5, 2.5, 3.5],
            enforce_min_reward_risk: true,
            min_reward_risk: 1.5,
        }
    }
}

impl AnalysisConfig {
    /// Load from a TOML file and validate.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings that would make a stage meaningless.
    pub fn validate(&self) -> Result<()> {
        let ind = &self.indicators;
        let periods = [
            ("indicators.ema_fast", ind.ema_fast),
            ("indicators.ema_mid", ind.ema_mid),
            ("indicators.ema_slow", ind.ema_slow),
            ("indicators.rsi_period", ind.rsi_period),
            ("indicators.atr_period", ind.atr_period),
            ("indicators.macd_fast", ind.macd_fast),
            ("indicators.macd_slow", ind.macd_slow),
            ("indicators.macd_signal", ind.macd_signal),
            ("structure.swing_lookback", self.structure.swing_lookback),
            ("levels.range_window", self.levels.range_window),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, v)| *v == 0) {
            return Err(Error::Config(format!("{name} must be greater than zero")));
        }
        if ind.macd_fast >= ind.macd_slow {
            return Err(Error::Config(
                "MACD fast period must be less than slow period".into(),
            ));
        }
        if self.confluence.max_score() == 0 {
            return Err(Error::Config("confluence weights sum to zero".into()));
        }
        if self.zones.impulse_atr_multiple <= 0.0 || self.signal.fallback_stop_atr <= 0.0 {
            return Err(Error::Config("ATR multiples must be positive".into()));
        }
        let tps = self.signal.target_multiples;
        if tps[0] <= 0.0 || tps[0] > tps[1] || tps[1] > tps[2] {
            return Err(Error::Config(
                "signal.target_multiples must be positive and ascending".into(),
            ));
        }
        if self.signal.min_confidence > 100 || self.confluence.label_threshold > 100 {
            return Err(Error::Config("confidence thresholds must be within 0..=100".into()));
        }
        Ok(())
    }
}

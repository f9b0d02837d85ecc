use common::{Bias, IndicatorSnapshot, Side, StructureState, Trend};

use crate::config::BiasSettings;

/// Additive bullish-versus-bearish point system over indicators and structure.
#[derive(Debug, Clone)]
pub struct BiasScorer {
    settings: BiasSettings,
}

impl BiasScorer {
    pub fn new(settings: BiasSettings) -> Self {
        Self { settings }
    }

    pub fn score(&self, ind: &IndicatorSnapshot, structure: &StructureState) -> Bias {
        let s = &self.settings;
        let mut bull = 0u32;
        let mut bear = 0u32;

        // Either/or comparisons: ties go to the bearish side.
        let mut either = |cond: bool, pts: u32| {
            if cond {
                bull += pts;
            } else {
                bear += pts;
            }
        };
        either(ind.ema_fast > ind.ema_mid, s.ema_fast_vs_mid);
        either(ind.ema_mid > ind.ema_slow, s.ema_mid_vs_slow);
        either(ind.price > ind.ema_fast, s.price_vs_fast);
        either(ind.price > ind.ema_slow, s.price_vs_slow);

        match structure.trend {
            Trend::Bullish => bull += s.structure,
            Trend::Bearish => bear += s.structure,
            Trend::Neutral => {}
        }

        if ind.rsi > s.rsi_bullish_above {
            bull += s.rsi;
        } else if ind.rsi < s.rsi_bearish_below {
            bear += s.rsi;
        }

        if ind.macd.histogram > 0.0 {
            bull += s.macd;
        } else if ind.macd.histogram < 0.0 {
            bear += s.macd;
        }

        match structure.latest_reversal().map(|r| r.direction) {
            Some(Side::Bullish) => bull += s.reversal,
            Some(Side::Bearish) => bear += s.reversal,
            None => {}
        }

        let total = bull + bear;
        let strength = if total == 0 {
            0
        } else {
            (bull.abs_diff(bear) as f64 / total as f64 * 100.0).round() as u8
        };
        let direction = match bull.cmp(&bear) {
            std::cmp::Ordering::Greater => Trend::Bullish,
            std::cmp::Ordering::Less => Trend::Bearish,
            std::cmp::Ordering::Equal => Trend::Neutral,
        };

        Bias {
            direction,
            strength,
            bullish_points: bull,
            bearish_points: bear,
        }
    }
}

impl Default for BiasScorer {
    fn default() -> Self {
        Self::new(BiasSettings::default())
    }
}

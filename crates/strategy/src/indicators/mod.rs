pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use atr::{atr, true_ranges};
pub use ema::{ema, ema_series};
pub use macd::MacdIndicator;
pub use rsi::{RsiIndicator, RSI_NEUTRAL};

use common::{Candle, IndicatorSnapshot};

use crate::config::IndicatorSettings;

/// Computes every indicator the later stages read, at the latest candle.
#[derive(Debug, Clone)]
pub struct IndicatorCalculator {
    settings: IndicatorSettings,
    rsi: RsiIndicator,
    macd: MacdIndicator,
}

impl IndicatorCalculator {
    pub fn new(settings: IndicatorSettings) -> Self {
        Self {
            rsi: RsiIndicator::new(settings.rsi_period),
            macd: MacdIndicator::new(settings.macd_fast, settings.macd_slow, settings.macd_signal),
            settings,
        }
    }

    pub fn snapshot(&self, candles: &[Candle]) -> IndicatorSnapshot {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
        let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();

        IndicatorSnapshot {
            price: closes.last().copied().unwrap_or_default(),
            ema_fast: ema(&closes, self.settings.ema_fast),
            ema_mid: ema(&closes, self.settings.ema_mid),
            ema_slow: ema(&closes, self.settings.ema_slow),
            rsi: self.rsi.compute(&closes),
            atr: atr(&highs, &lows, &closes, self.settings.atr_period),
            macd: self.macd.compute(&closes),
        }
    }
}

impl Default for IndicatorCalculator {
    fn default() -> Self {
        Self::new(IndicatorSettings::default())
    }
}

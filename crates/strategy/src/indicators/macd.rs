use common::{MacdResult, MacdTrend};

use super::ema::ema_series;

/// MACD (Moving Average Convergence/Divergence) indicator.
///
/// Computes: MACD line = EMA(fast) − EMA(slow), Signal = EMA(macd_line, signal_period),
/// histogram = line − signal. The trend reading compares the last two histogram values.
#[derive(Debug, Clone)]
pub struct MacdIndicator {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl MacdIndicator {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(
            fast < slow,
            "MACD fast period must be less than slow period"
        );
        assert!(fast > 0 && signal > 0, "MACD periods must be positive");
        Self { fast, slow, signal }
    }

    /// Compute MACD from a slice of close prices (oldest first).
    /// Needs at least `slow + signal` prices; below that the result is zeroed and neutral.
    pub fn compute(&self, closes: &[f64]) -> MacdResult {
        if closes.len() < self.slow + self.signal {
            return MacdResult::default();
        }

        let fast_series = ema_series(closes, self.fast);
        let slow_series = ema_series(closes, self.slow);

        // Align both series on the candle index: slow starts later.
        let offset = fast_series.len() - slow_series.len();
        let macd_line: Vec<f64> = slow_series
            .iter()
            .enumerate()
            .map(|(i, slow)| fast_series[i + offset] - slow)
            .collect();

        let signal_line = ema_series(&macd_line, self.signal);
        if signal_line.len() < 2 {
            return MacdResult::default();
        }

        let n = signal_line.len();
        let m = macd_line.len();
        let line = macd_line[m - 1];
        let signal = signal_line[n - 1];
        let histogram = line - signal;
        let prev_histogram = macd_line[m - 2] - signal_line[n - 2];

        MacdResult {
            line,
            signal,
            histogram,
            prev_histogram,
            trend: classify(histogram, prev_histogram),
        }
    }
}

impl Default for MacdIndicator {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

fn classify(current: f64, previous: f64) -> MacdTrend {
    if current > 0.0 {
        if current > previous {
            MacdTrend::Bullish
        } else {
            MacdTrend::BullishWeakening
        }
    } else if current < 0.0 {
        if current < previous {
            MacdTrend::Bearish
        } else {
            MacdTrend::BearishWeakening
        }
    } else {
        MacdTrend::Neutral
    }
}

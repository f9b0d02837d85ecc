use common::{Candle, Gap, Side};
use tracing::debug;

use crate::config::GapSettings;

/// Detects fair value gaps across every run of three consecutive candles.
#[derive(Debug, Clone)]
pub struct GapDetector {
    settings: GapSettings,
}

impl GapDetector {
    pub fn new(settings: GapSettings) -> Self {
        Self { settings }
    }

    /// Gaps ordered most recent first, with flags evaluated at the last close.
    pub fn detect(&self, candles: &[Candle]) -> Vec<Gap> {
        let n = candles.len();
        if n < self.settings.min_candles.max(3) {
            return Vec::new();
        }
        let price = candles[n - 1].close;

        let mut gaps: Vec<Gap> = candles
            .windows(3)
            .enumerate()
            .filter_map(|(i, w)| {
                let (first, third) = (&w[0], &w[2]);
                let (kind, top, bottom) = if third.low > first.high {
                    (Side::Bullish, third.low, first.high)
                } else if third.high < first.low {
                    (Side::Bearish, first.low, third.high)
                } else {
                    return None;
                };
                let mut gap = Gap {
                    kind,
                    top,
                    bottom,
                    size: top - bottom,
                    index: i + 1,
                    active: false,
                    filled: false,
                };
                self.refresh(&mut gap, price);
                Some(gap)
            })
            .collect();

        gaps.sort_by(|a, b| b.index.cmp(&a.index));
        gaps.truncate(self.settings.max_gaps);

        debug!(
            gaps = gaps.len(),
            active = gaps.iter().filter(|g| g.active).count(),
            "Fair value gaps detected"
        );
        gaps
    }

    /// Recompute `filled` and `active` from price and the gap's boundaries alone.
    ///
    /// A bullish gap is filled once price closes below its bottom and stays
    /// active while price is inside it or within `proximity_pct` above its top.
    /// Bearish gaps mirror this.
    pub fn refresh(&self, gap: &mut Gap, price: f64) {
        let pct = self.settings.proximity_pct;
        let (filled, near) = match gap.kind {
            Side::Bullish => (price < gap.bottom, price <= gap.top * (1.0 + pct)),
            Side::Bearish => (price > gap.top, price >= gap.bottom * (1.0 - pct)),
        };
        gap.filled = filled;
        gap.active = !filled && near;
    }
}

impl Default for GapDetector {
    fn default() -> Self {
        Self::new(GapSettings::default())
    }
}

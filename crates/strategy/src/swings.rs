use common::{Candle, SwingKind, SwingPoint};

/// Finds local extrema over a symmetric window.
///
/// A swing high is a bar whose high is strictly greater than every other high
/// within `lookback` bars on either side; swing lows mirror this on lows. A bar
/// can be both.
#[derive(Debug, Clone)]
pub struct SwingDetector {
    lookback: usize,
}

impl SwingDetector {
    pub fn new(lookback: usize) -> Self {
        Self {
            lookback: lookback.max(1),
        }
    }

    /// All swing points ordered by index. When a bar is both, its high comes first.
    pub fn find_swings(&self, candles: &[Candle]) -> Vec<SwingPoint> {
        let n = candles.len();
        let lb = self.lookback;
        let mut swings = Vec::new();
        if n < 2 * lb + 1 {
            return swings;
        }

        for i in lb..n - lb {
            let window = (i - lb..=i + lb).filter(|&j| j != i);

            if window.clone().all(|j| candles[i].high > candles[j].high) {
                swings.push(SwingPoint {
                    index: i,
                    price: candles[i].high,
                    kind: SwingKind::High,
                });
            }
            if window.clone().all(|j| candles[i].low < candles[j].low) {
                swings.push(SwingPoint {
                    index: i,
                    price: candles[i].low,
                    kind: SwingKind::Low,
                });
            }
        }
        swings
    }

}

impl Default for SwingDetector {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Reading reported when there are too few closes to seed the averages.
pub const RSI_NEUTRAL: f64 = 50.0;

/// Wilder RSI. The first `period` close-to-close changes seed plain averages;
/// later changes are folded in with Wilder's `(prev * (n - 1) + x) / n`.
#[derive(Debug, Clone)]
pub struct RsiIndicator {
    pub period: usize,
}

impl RsiIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self { period }
    }

    /// Closes oldest first. Always within `0..=100`.
    pub fn compute(&self, closes: &[f64]) -> f64 {
        if closes.len() <= self.period {
            return RSI_NEUTRAL;
        }
        let n = self.period as f64;
        let mut moves = closes.windows(2).map(|w| split(w[1] - w[0]));

        let (up, down) = moves
            .by_ref()
            .take(self.period)
            .fold((0.0, 0.0), |(u, d), (g, l)| (u + g, d + l));
        let (avg_up, avg_down) = moves.fold((up / n, down / n), |(u, d), (g, l)| {
            ((u * (n - 1.0) + g) / n, (d * (n - 1.0) + l) / n)
        });

        if avg_down == 0.0 {
            return 100.0;
        }
        (100.0 - 100.0 / (1.0 + avg_up / avg_down)).clamp(0.0, 100.0)
    }
}

impl Default for RsiIndicator {
    fn default() -> Self {
        Self::new(14)
    }
}

/// (gain, loss) magnitudes of one change.
fn split(change: f64) -> (f64, f64) {
    (change.max(0.0), (-change).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_series_is_neutral() {
        assert_eq!(RsiIndicator::default().compute(&[100.0; 14]), RSI_NEUTRAL);
        assert_eq!(RsiIndicator::new(3).compute(&[]), RSI_NEUTRAL);
    }

    #[test]
    fn one_way_series_hit_the_bounds() {
        let rsi = RsiIndicator::new(3);
        assert_eq!(rsi.compute(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), 100.0);
        assert!(rsi.compute(&[6.0, 5.0, 4.0, 3.0, 2.0, 1.0]).abs() < 1e-9);
    }

    #[test]
    fn unchanged_closes_read_100() {
        // No losses at all, so the zero-loss rule applies.
        assert_eq!(RsiIndicator::default().compute(&[50.0; 30]), 100.0);
    }

    #[test]
    fn matches_wilder_reference() {
        // Seed averages: gain 0.2386, loss 0.1000
        let closes = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            45.61, 46.28, 46.28,
        ];
        let v = RsiIndicator::new(14).compute(&closes);
        assert!((v - 70.46).abs() < 0.05, "got {v}");
    }

    #[test]
    fn smoothing_follows_wilder_recurrence() {
        // period 2: seed from +2, -1 => up 1.0, down 0.5; then +1 => up 1.0, down 0.25
        let v = RsiIndicator::new(2).compute(&[10.0, 12.0, 11.0, 12.0]);
        assert!((v - 80.0).abs() < 1e-9, "got {v}");
    }
}

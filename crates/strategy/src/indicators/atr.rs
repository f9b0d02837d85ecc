use super::ema::mean;

/// True range of each bar against the previous close, starting at bar 1.
pub fn true_ranges(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = highs.len().min(lows.len()).min(closes.len());
    (1..n)
        .map(|i| {
            let prev_close = closes[i - 1];
            (highs[i] - lows[i])
                .max((highs[i] - prev_close).abs())
                .max((lows[i] - prev_close).abs())
        })
        .collect()
}

/// Average True Range with Wilder smoothing.
///
/// Returns 0 for fewer than two bars, and the plain mean of the true ranges
/// while there are fewer than `period` of them.
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> f64 {
    let trs = true_ranges(highs, lows, closes);
    if trs.is_empty() {
        return 0.0;
    }
    if period == 0 || trs.len() < period {
        return mean(&trs);
    }

    let n = period as f64;
    trs[period..]
        .iter()
        .fold(mean(&trs[..period]), |prev, &tr| (prev * (n - 1.0) + tr) / n)
}

/// Exponential Moving Average at the last value of `data`.
///
/// Seeded with the SMA of the first `period` values. With fewer than `period`
/// values the plain mean of `data` is returned instead.
pub fn ema(data: &[f64], period: usize) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    if period == 0 || data.len() < period {
        return mean(data);
    }
    ema_series(data, period).last().copied().unwrap_or_default()
}

/// Full EMA series, one value per input from index `period - 1` onward.
/// Empty when there are fewer than `period` values.
pub fn ema_series(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return Vec::new();
    }
    let k = 2.0 / (period as f64 + 1.0);

    let mut ema_val = mean(&data[..period]);
    let mut out = Vec::with_capacity(data.len() - period + 1);
    out.push(ema_val);

    for &price in &data[period..] {
        ema_val = (price - ema_val) * k + ema_val;
        out.push(ema_val);
    }
    out
}

pub(crate) fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

use common::Candle;

pub fn bar(open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle::new(0, open, high, low, close, 1.0)
}

/// Bars with one-minute spacing.
pub fn series(bars: &[(f64, f64, f64, f64)]) -> Vec<Candle> {
    bars.iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| Candle::new(i as i64 * 60, o, h, l, c, 1.0))
        .collect()
}

pub fn flat(n: usize, price: f64) -> Vec<Candle> {
    (0..n)
        .map(|i| Candle::new(i as i64 * 60, price, price, price, price, 1.0))
        .collect()
}

/// Closes rise 0.5 per bar; every sixth bar spikes the high (offset 3) or
/// dips the low (offset 0), producing higher highs and higher lows.
pub fn rising_zigzag(n: usize) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let close = 100.0 + 0.5 * i as f64;
            let high = close + if i % 6 == 3 { 3.0 } else { 0.2 };
            let low = close - 0.2 - if i % 6 == 0 { 3.0 } else { 0.0 };
            Candle::new(i as i64 * 60, close - 0.1, high, low, close, 1.0)
        })
        .collect()
}

/// Mirror image of [`rising_zigzag`]: lower highs and lower lows.
pub fn falling_zigzag(n: usize) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let close = 200.0 - 0.5 * i as f64;
            let high = close + 0.2 + if i % 6 == 0 { 3.0 } else { 0.0 };
            let low = close - if i % 6 == 3 { 3.0 } else { 0.2 };
            Candle::new(i as i64 * 60, close + 0.1, high, low, close, 1.0)
        })
        .collect()
}

/// Closes rise exactly 1.0 per bar with wicks well inside one step, so no
/// strict swing ever forms.
pub fn rising_steady(n: usize) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let close = 100.0 + i as f64;
            let wick = 0.1 * (i % 4) as f64;
            Candle::new(i as i64 * 60, close - 0.5, close + 0.2 + wick, close - 0.7 - wick, close, 1.0)
        })
        .collect()
}

/// Mirror image of [`rising_steady`].
pub fn falling_steady(n: usize) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let close = 200.0 - i as f64;
            let wick = 0.1 * (i % 4) as f64;
            Candle::new(i as i64 * 60, close + 0.5, close + 0.7 + wick, close - 0.2 - wick, close, 1.0)
        })
        .collect()
}

use common::{Candle, Error, Result};

/// Decode a JSON array of candles.
pub fn parse_candles(json: &str) -> Result<Vec<Candle>> {
    Ok(serde_json::from_str(json)?)
}

/// Eager contract check run before any stage sees the candles.
///
/// Fails on the first offending candle, reporting its index.
pub fn validate_candles(candles: &[Candle]) -> Result<()> {
    let mut prev_time: Option<i64> = None;

    for (i, c) in candles.iter().enumerate() {
        let fields = [
            ("open", c.open),
            ("high", c.high),
            ("low", c.low),
            ("close", c.close),
            ("volume", c.volume),
        ];
        if let Some((name, v)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::invalid(i, format!("{name} is not a finite number ({v})")));
        }
        if c.volume < 0.0 {
            return Err(Error::invalid(i, "volume is negative"));
        }
        if c.high < c.low {
            return Err(Error::invalid(i, "high is below low"));
        }
        if c.open > c.high || c.open < c.low || c.close > c.high || c.close < c.low {
            return Err(Error::invalid(i, "open/close outside the high-low range"));
        }
        if let Some(prev) = prev_time {
            if c.time < prev {
                return Err(Error::invalid(
                    i,
                    format!("time {} precedes previous candle at {prev}", c.time),
                ));
            }
        }
        prev_time = Some(c.time);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(time: i64, o: f64, h: f64, l: f64, c: f64) -> Candle {
        Candle::new(time, o, h, l, c, 10.0)
    }

    fn index_of(err: Error) -> usize {
        match err {
            Error::InvalidInput { index, .. } => index,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn accepts_well_formed_and_empty() {
        assert!(validate_candles(&[]).is_ok());
        let ok = [candle(0, 10.0, 11.0, 9.0, 10.5), candle(0, 10.5, 10.5, 10.5, 10.5)];
        assert!(validate_candles(&ok).is_ok(), "equal timestamps are tolerated");
    }

    #[test]
    fn rejects_non_finite() {
        let bad = [candle(0, 10.0, 11.0, 9.0, 10.0), candle(60, f64::NAN, 11.0, 9.0, 10.0)];
        let err = validate_candles(&bad).unwrap_err();
        assert!(err.to_string().contains("open"));
        assert_eq!(index_of(err), 1);
    }

    #[test]
    fn rejects_broken_ohlc() {
        assert_eq!(index_of(validate_candles(&[candle(0, 10.0, 9.0, 11.0, 10.0)]).unwrap_err()), 0);
        assert_eq!(index_of(validate_candles(&[candle(0, 12.0, 11.0, 9.0, 10.0)]).unwrap_err()), 0);
        assert_eq!(index_of(validate_candles(&[candle(0, 10.0, 11.0, 9.0, 8.0)]).unwrap_err()), 0);
    }

    #[test]
    fn rejects_negative_volume() {
        let c = Candle::new(0, 1.0, 1.0, 1.0, 1.0, -1.0);
        assert!(validate_candles(&[c]).is_err());
    }

    #[test]
    fn rejects_time_going_backwards() {
        let bad = [
            candle(120, 10.0, 11.0, 9.0, 10.0),
            candle(180, 10.0, 11.0, 9.0, 10.0),
            candle(60, 10.0, 11.0, 9.0, 10.0),
        ];
        assert_eq!(index_of(validate_candles(&bad).unwrap_err()), 2);
    }

    #[test]
    fn parses_json_array() {
        let json = r#"[{"time":0,"open":1,"high":2,"low":0.5,"close":1.5,"volume":3}]"#;
        let candles = parse_candles(json).unwrap();
        assert_eq!(candles, vec![Candle::new(0, 1.0, 2.0, 0.5, 1.5, 3.0)]);

        let missing = r#"[{"time":0,"open":1,"high":2,"low":0.5,"close":1.5}]"#;
        assert!(matches!(parse_candles(missing), Err(Error::Json(_))));
    }
}

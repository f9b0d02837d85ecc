use common::{Candle, Side, Zone};
use tracing::debug;

use crate::config::ZoneSettings;

/// Detects order blocks: the opposing candle right before an impulsive move.
///
/// A bullish block forms when a bearish candle is followed, one bar later, by
/// a bullish candle whose body exceeds `impulse_atr_multiple * ATR`. Bearish
/// blocks mirror this.
#[derive(Debug, Clone)]
pub struct ZoneDetector {
    settings: ZoneSettings,
}

impl ZoneDetector {
    pub fn new(settings: ZoneSettings) -> Self {
        Self { settings }
    }

    /// Zones ordered most recent first, with flags evaluated at the last close.
    pub fn detect(&self, candles: &[Candle], atr: f64) -> Vec<Zone> {
        let n = candles.len();
        if n < self.settings.min_candles.max(3) {
            return Vec::new();
        }
        let threshold = atr * self.settings.impulse_atr_multiple;
        let price = candles[n - 1].close;

        let mut zones: Vec<Zone> = (1..n - 1)
            .filter_map(|i| {
                let origin = &candles[i - 1];
                let impulse = &candles[i + 1];
                let kind = if origin.is_bearish() && impulse.is_bullish() && impulse.body() > threshold {
                    Side::Bullish
                } else if origin.is_bullish() && impulse.is_bearish() && -impulse.body() > threshold {
                    Side::Bearish
                } else {
                    return None;
                };
                let (top, bottom) = match kind {
                    Side::Bullish => (origin.body_top(), origin.low),
                    Side::Bearish => (origin.high, origin.body_bottom()),
                };
                let mut zone = Zone {
                    kind,
                    top,
                    bottom,
                    index: i - 1,
                    active: false,
                    mitigated: false,
                };
                self.refresh(&mut zone, price, atr);
                Some(zone)
            })
            .collect();

        zones.sort_by(|a, b| b.index.cmp(&a.index));
        zones.truncate(self.settings.max_zones);

        debug!(
            zones = zones.len(),
            active = zones.iter().filter(|z| z.active).count(),
            threshold,
            "Order blocks detected"
        );
        zones
    }

    /// Recompute `active` and `mitigated` from price and the zone's boundaries alone.
    pub fn refresh(&self, zone: &mut Zone, price: f64, atr: f64) {
        let pct = self.settings.proximity_pct;
        let (mitigated, in_band) = match zone.kind {
            Side::Bullish => (
                price < zone.bottom,
                price >= zone.bottom && price <= zone.top * (1.0 + pct),
            ),
            Side::Bearish => (
                price > zone.top,
                price >= zone.bottom * (1.0 - pct) && price <= zone.top,
            ),
        };
        let near = zone.distance_to(price) <= self.settings.proximity_atr * atr;

        zone.mitigated = mitigated;
        zone.active = !mitigated && (in_band || near);
    }
}

impl Default for ZoneDetector {
    fn default() -> Self {
        Self::new(ZoneSettings::default())
    }
}

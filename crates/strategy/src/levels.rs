use common::{Candle, KeyLevels, Level, LevelKind, LevelSource, StructureState};

use crate::config::LevelSettings;

/// Resolves current support and resistance from swings, falling back to the
/// trailing range when no swing exists.
#[derive(Debug, Clone)]
pub struct KeyLevelResolver {
    settings: LevelSettings,
}

impl KeyLevelResolver {
    pub fn new(settings: LevelSettings) -> Self {
        Self { settings }
    }

    pub fn resolve(&self, candles: &[Candle], structure: &StructureState) -> KeyLevels {
        let Some(last) = candles.last() else {
            return KeyLevels::default();
        };
        let price = last.close;
        let window = &candles[candles.len().saturating_sub(self.settings.range_window)..];
        let max = self.settings.max_levels;

        let mut levels: Vec<Level> = structure
            .swing_highs
            .iter()
            .rev()
            .take(max)
            .map(|s| Level {
                price: s.price,
                kind: LevelKind::Resistance,
                source: LevelSource::Swing { index: s.index },
            })
            .collect();
        levels.extend(structure.swing_lows.iter().rev().take(max).map(|s| Level {
            price: s.price,
            kind: LevelKind::Support,
            source: LevelSource::Swing { index: s.index },
        }));

        let resistance = match structure.swing_highs.last() {
            Some(s) => s.price,
            None => {
                let high = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
                levels.push(Level {
                    price: high,
                    kind: LevelKind::Resistance,
                    source: LevelSource::Range,
                });
                high
            }
        };
        let support = match structure.swing_lows.last() {
            Some(s) => s.price,
            None => {
                let low = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
                levels.push(Level {
                    price: low,
                    kind: LevelKind::Support,
                    source: LevelSource::Range,
                });
                low
            }
        };

        let position_pct = if resistance == support {
            50.0
        } else {
            (price - support) / (resistance - support) * 100.0
        };

        KeyLevels {
            support,
            resistance,
            midpoint: (support + resistance) / 2.0,
            position_pct,
            levels,
        }
    }
}

impl Default for KeyLevelResolver {
    fn default() -> Self {
        Self::new(LevelSettings::default())
    }
}

use common::{BreakEvent, Candle, ReversalEvent, Side, StructureState, SwingKind, SwingPoint, Trend};
use tracing::debug;

use crate::config::StructureSettings;
use crate::swings::SwingDetector;

/// Derives trend, Break of Structure and Change of Character events from swings.
#[derive(Debug, Clone)]
pub struct StructureAnalyzer {
    settings: StructureSettings,
    swings: SwingDetector,
}

impl StructureAnalyzer {
    pub fn new(settings: StructureSettings) -> Self {
        Self {
            swings: SwingDetector::new(settings.swing_lookback),
            settings,
        }
    }

    pub fn analyze(&self, candles: &[Candle]) -> StructureState {
        if candles.len() < self.settings.min_candles {
            return StructureState::default();
        }

        let swings = self.swings.find_swings(candles);
        let (swing_highs, swing_lows): (Vec<SwingPoint>, Vec<SwingPoint>) =
            swings.iter().copied().partition(|s| s.kind == SwingKind::High);

        let trend = swing_trend(&swing_highs, &swing_lows)
            .unwrap_or_else(|| self.range_trend(candles));
        let breaks = self.breaks(&swing_highs, &swing_lows);
        let reversals = self.reversals(&swings);

        debug!(
            highs = swing_highs.len(),
            lows = swing_lows.len(),
            breaks = breaks.len(),
            reversals = reversals.len(),
            %trend,
            "Structure analyzed"
        );

        StructureState {
            trend,
            swing_highs,
            swing_lows,
            breaks,
            reversals,
        }
    }

    /// Trend from bar extremes when there are too few swings to compare.
    ///
    /// A steady climb never produces a strict swing, so the last
    /// `2 * lookback + 1` bars are compared against the block before them:
    /// higher high and higher low is bullish, lower high and lower low bearish.
    fn range_trend(&self, candles: &[Candle]) -> Trend {
        let block = 2 * self.settings.swing_lookback.max(1) + 1;
        if candles.len() < 2 * block {
            return Trend::Neutral;
        }
        let (earlier, latest) = candles[candles.len() - 2 * block..].split_at(block);
        let (h0, l0) = extremes(earlier);
        let (h1, l1) = extremes(latest);
        classify(h0, h1, l0, l1)
    }

    /// Every consecutive swing pair where the later one extends past the earlier.
    fn breaks(&self, highs: &[SwingPoint], lows: &[SwingPoint]) -> Vec<BreakEvent> {
        let bullish = highs.windows(2).filter(|w| w[1].price > w[0].price).map(|w| BreakEvent {
            direction: Side::Bullish,
            level: w[0].price,
            index: w[1].index,
        });
        let bearish = lows.windows(2).filter(|w| w[1].price < w[0].price).map(|w| BreakEvent {
            direction: Side::Bearish,
            level: w[0].price,
            index: w[1].index,
        });

        let mut events: Vec<BreakEvent> = bullish.chain(bearish).collect();
        events.sort_by_key(|e| e.index);
        keep_last(events, self.settings.max_breaks)
    }

    /// Walks swings in order and flags each one that contradicts the trend
    /// established by the swings before it.
    fn reversals(&self, swings: &[SwingPoint]) -> Vec<ReversalEvent> {
        let mut highs: Vec<SwingPoint> = Vec::new();
        let mut lows: Vec<SwingPoint> = Vec::new();
        let mut events = Vec::new();

        for swing in swings {
            let prevailing = trend_of(&highs, &lows);
            match swing.kind {
                SwingKind::High => {
                    if prevailing == Trend::Bullish
                        && highs.last().is_some_and(|prev| swing.price < prev.price)
                    {
                        events.push(ReversalEvent {
                            direction: Side::Bearish,
                            level: swing.price,
                            index: swing.index,
                        });
                    }
                    highs.push(*swing);
                }
                SwingKind::Low => {
                    if prevailing == Trend::Bearish
                        && lows.last().is_some_and(|prev| swing.price > prev.price)
                    {
                        events.push(ReversalEvent {
                            direction: Side::Bullish,
                            level: swing.price,
                            index: swing.index,
                        });
                    }
                    lows.push(*swing);
                }
            }
        }
        keep_last(events, self.settings.max_reversals)
    }
}

impl Default for StructureAnalyzer {
    fn default() -> Self {
        Self::new(StructureSettings::default())
    }
}

/// Higher high plus higher low is bullish, lower high plus lower low is bearish.
pub fn trend_of(highs: &[SwingPoint], lows: &[SwingPoint]) -> Trend {
    swing_trend(highs, lows).unwrap_or_default()
}

/// `None` until there are two swings of each kind.
fn swing_trend(highs: &[SwingPoint], lows: &[SwingPoint]) -> Option<Trend> {
    let [h0, h1] = last_two(highs)?;
    let [l0, l1] = last_two(lows)?;
    Some(classify(h0.price, h1.price, l0.price, l1.price))
}

fn classify(h0: f64, h1: f64, l0: f64, l1: f64) -> Trend {
    if h1 > h0 && l1 > l0 {
        Trend::Bullish
    } else if h1 < h0 && l1 < l0 {
        Trend::Bearish
    } else {
        Trend::Neutral
    }
}

/// Highest high and lowest low of a block.
fn extremes(candles: &[Candle]) -> (f64, f64) {
    candles.iter().fold((f64::MIN, f64::MAX), |(h, l), c| (h.max(c.high), l.min(c.low)))
}

fn last_two(points: &[SwingPoint]) -> Option<[SwingPoint; 2]> {
    match points {
        [.., a, b] => Some([*a, *b]),
        _ => None,
    }
}

fn keep_last<T>(mut items: Vec<T>, max: usize) -> Vec<T> {
    if items.len() > max {
        items.drain(..items.len() - max);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{falling_steady, falling_zigzag, flat, rising_steady, rising_zigzag, series};

    fn swing(index: usize, price: f64, kind: SwingKind) -> SwingPoint {
        SwingPoint { index, price, kind }
    }

    #[test]
    fn rising_zigzag_is_bullish_with_bullish_breaks() {
        let state = StructureAnalyzer::default().analyze(&rising_zigzag(40));
        assert_eq!(state.trend, Trend::Bullish);
        assert!(state.swing_highs.len() >= 2);
        assert!(state.swing_lows.len() >= 2);
        assert!(state.has_break(Side::Bullish));
        assert!(!state.has_break(Side::Bearish));
        assert!(state.breaks.len() <= 5);
        assert!(state.reversals.is_empty());
    }

    #[test]
    fn falling_zigzag_is_bearish() {
        let state = StructureAnalyzer::default().analyze(&falling_zigzag(40));
        assert_eq!(state.trend, Trend::Bearish);
        assert!(state.has_break(Side::Bearish));
    }

    #[test]
    fn steady_rise_without_swings_is_bullish() {
        let state = StructureAnalyzer::default().analyze(&rising_steady(40));
        assert!(state.swing_highs.is_empty());
        assert!(state.swing_lows.is_empty());
        assert_eq!(state.trend, Trend::Bullish);
        assert!(state.breaks.is_empty());
    }

    #[test]
    fn steady_fall_without_swings_is_bearish() {
        let state = StructureAnalyzer::default().analyze(&falling_steady(40));
        assert!(state.swing_highs.is_empty());
        assert_eq!(state.trend, Trend::Bearish);
    }

    #[test]
    fn range_fallback_needs_two_blocks() {
        // 13 bars is one short of two 7-bar blocks
        let state = StructureAnalyzer::default().analyze(&rising_steady(13));
        assert_eq!(state.trend, Trend::Neutral);
        let state = StructureAnalyzer::default().analyze(&rising_steady(14));
        assert_eq!(state.trend, Trend::Bullish);
    }

    #[test]
    fn flat_series_is_neutral_without_swings() {
        let state = StructureAnalyzer::default().analyze(&flat(40, 10.0));
        assert_eq!(state.trend, Trend::Neutral);
        assert!(state.swing_highs.is_empty());
        assert!(state.swing_lows.is_empty());
        assert!(state.breaks.is_empty());
    }

    #[test]
    fn below_minimum_returns_empty_state() {
        let candles = series(&[(1.0, 2.0, 0.5, 1.5); 4]);
        assert_eq!(StructureAnalyzer::default().analyze(&candles), StructureState::default());
    }

    #[test]
    fn mixed_swings_are_neutral() {
        let highs = [swing(2, 10.0, SwingKind::High), swing(8, 12.0, SwingKind::High)];
        let lows = [swing(5, 8.0, SwingKind::Low), swing(11, 7.0, SwingKind::Low)];
        assert_eq!(trend_of(&highs, &lows), Trend::Neutral);
        assert_eq!(trend_of(&highs[..1], &lows), Trend::Neutral);
    }

    #[test]
    fn lower_high_after_uptrend_is_bearish_reversal() {
        let analyzer = StructureAnalyzer::default();
        let swings = [
            swing(2, 10.0, SwingKind::High),
            swing(5, 5.0, SwingKind::Low),
            swing(8, 12.0, SwingKind::High),
            swing(11, 6.0, SwingKind::Low),
            swing(14, 11.0, SwingKind::High), // lower high in an uptrend
        ];
        let events = analyzer.reversals(&swings);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].direction, Side::Bearish);
        assert_eq!(events[0].level, 11.0);
        assert_eq!(events[0].index, 14);
    }

    #[test]
    fn higher_low_after_downtrend_is_bullish_reversal() {
        let analyzer = StructureAnalyzer::default();
        let swings = [
            swing(2, 20.0, SwingKind::High),
            swing(5, 15.0, SwingKind::Low),
            swing(8, 18.0, SwingKind::High),
            swing(11, 12.0, SwingKind::Low),
            swing(14, 13.0, SwingKind::Low),
        ];
        let events = analyzer.reversals(&swings);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].direction, Side::Bullish);
        assert_eq!(events[0].level, 13.0);
    }

    #[test]
    fn break_history_is_capped() {
        let analyzer = StructureAnalyzer::default();
        let highs: Vec<SwingPoint> = (0..10)
            .map(|i| swing(i * 4, 100.0 + i as f64, SwingKind::High))
            .collect();
        let events = analyzer.breaks(&highs, &[]);
        assert_eq!(events.len(), 5);
        assert_eq!(events.last().map(|e| e.index), Some(36));
        assert_eq!(events.last().map(|e| e.level), Some(108.0));
    }
}

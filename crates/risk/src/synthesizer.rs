use tracing::{debug, info};

use common::{Action, Report, Side, Signal, Trend};
use strategy::config::SignalSettings;

/// Where the protective stop was anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopSource {
    OrderBlock,
    Swing,
    Atr,
}

impl StopSource {
    fn describe(self, side: Side) -> &'static str {
        match (self, side) {
            (StopSource::OrderBlock, Side::Bullish) => "Stop below bullish order block",
            (StopSource::OrderBlock, Side::Bearish) => "Stop above bearish order block",
            (StopSource::Swing, Side::Bullish) => "Stop below latest swing low",
            (StopSource::Swing, Side::Bearish) => "Stop above latest swing high",
            (StopSource::Atr, _) => "ATR-based stop",
        }
    }
}

/// Turns a scored report into a concrete entry/stop/targets proposal.
///
/// Every signal passes the confidence gate here; nothing downstream sees a
/// BUY or SELL that did not.
#[derive(Debug, Clone)]
pub struct SignalSynthesizer {
    settings: SignalSettings,
}

impl SignalSynthesizer {
    pub fn new(settings: SignalSettings) -> Self {
        Self { settings }
    }

    pub fn synthesize(&self, report: &Report) -> Signal {
        let confluence = &report.confluence;

        if confluence.confidence < self.settings.min_confidence {
            return Signal::wait(format!(
                "Confidence {}% below {}% threshold",
                confluence.confidence, self.settings.min_confidence
            ));
        }
        let Some(side) = confluence.lean.side() else {
            return Signal::wait("No directional bias");
        };

        let entry = report.indicators.price;
        let (stop_loss, source) = self.stop(side, report);
        let risk = (entry - stop_loss).abs();
        if risk <= 0.0 || !risk.is_finite() {
            debug!(entry, stop_loss, "Degenerate stop distance");
            return Signal::wait("Stop distance is zero");
        }

        let sign = match side {
            Side::Bullish => 1.0,
            Side::Bearish => -1.0,
        };
        let [m1, m2, m3] = self.settings.target_multiples;
        let mut tp1 = entry + sign * risk * m1;
        let tp2 = entry + sign * risk * m2;
        let tp3 = entry + sign * risk * m3;

        // Nearest opposing level caps the first target.
        let barrier = match side {
            Side::Bullish => report.levels.resistance,
            Side::Bearish => report.levels.support,
        };
        if strictly_between(barrier, entry, tp2) {
            tp1 = barrier;
        }

        if self.settings.enforce_min_reward_risk
            && (tp1 - entry).abs() / risk < self.settings.min_reward_risk
        {
            tp1 = entry + sign * risk * self.settings.min_reward_risk;
        }

        let signal = Signal {
            direction: match side {
                Side::Bullish => Action::Buy,
                Side::Bearish => Action::Sell,
            },
            entry,
            stop_loss,
            tp1,
            tp2,
            tp3,
            risk_reward: (tp2 - entry).abs() / risk,
            rationale: format!(
                "{} | Structure: {} | RSI {:.1}",
                source.describe(side),
                report.structure.trend,
                report.indicators.rsi
            ),
        };

        info!(
            direction = %signal.direction,
            entry,
            stop_loss,
            tp1,
            risk_reward = signal.risk_reward,
            confidence = confluence.confidence,
            "Signal synthesized"
        );
        signal
    }

    fn stop(&self, side: Side, report: &Report) -> (f64, StopSource) {
        let price = report.indicators.price;
        let atr = report.indicators.atr;
        let buffer = atr * self.settings.stop_buffer_atr;

        let zone = report
            .zones
            .iter()
            .filter(|z| z.kind == side && !z.mitigated)
            .filter(|z| match side {
                Side::Bullish => z.bottom < price,
                Side::Bearish => z.top > price,
            })
            .min_by(|a, b| a.distance_to(price).total_cmp(&b.distance_to(price)));
        if let Some(z) = zone {
            return match side {
                Side::Bullish => (z.bottom - buffer, StopSource::OrderBlock),
                Side::Bearish => (z.top + buffer, StopSource::OrderBlock),
            };
        }

        let swing = match side {
            Side::Bullish => report.structure.swing_lows.last().filter(|s| s.price < price),
            Side::Bearish => report.structure.swing_highs.last().filter(|s| s.price > price),
        };
        if let Some(s) = swing {
            return match side {
                Side::Bullish => (s.price - buffer, StopSource::Swing),
                Side::Bearish => (s.price + buffer, StopSource::Swing),
            };
        }

        let fallback = atr * self.settings.fallback_stop_atr;
        match side {
            Side::Bullish => (price - fallback, StopSource::Atr),
            Side::Bearish => (price + fallback, StopSource::Atr),
        }
    }
}

impl Default for SignalSynthesizer {
    fn default() -> Self {
        Self::new(SignalSettings::default())
    }
}

fn strictly_between(x: f64, a: f64, b: f64) -> bool {
    x > a.min(b) && x < a.max(b)
}

/// Output direction implied by a bias direction.
pub fn action_for(trend: Trend) -> Action {
    match trend {
        Trend::Bullish => Action::Buy,
        Trend::Bearish => Action::Sell,
        Trend::Neutral => Action::Wait,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{
        ConfluenceResult, IndicatorSnapshot, KeyLevels, Outlook, StructureState, SwingKind,
        SwingPoint, Zone,
    };

    fn report(lean: Trend, confidence: u8) -> Report {
        Report {
            indicators: IndicatorSnapshot {
                price: 100.0,
                rsi: 58.0,
                atr: 2.0,
                ..IndicatorSnapshot::default()
            },
            levels: KeyLevels {
                support: 80.0,
                resistance: 130.0,
                midpoint: 105.0,
                position_pct: 40.0,
                levels: vec![],
            },
            confluence: ConfluenceResult {
                direction: Outlook::Wait,
                lean,
                confidence,
                breakdown: vec![],
            },
            ..Report::default()
        }
    }

    fn zone(kind: Side, bottom: f64, top: f64) -> Zone {
        Zone { kind, top, bottom, index: 3, active: true, mitigated: false }
    }

    fn swing(kind: SwingKind, price: f64, index: usize) -> SwingPoint {
        SwingPoint { index, price, kind }
    }

    #[test]
    fn low_confidence_waits_with_reason() {
        let signal = SignalSynthesizer::default().synthesize(&report(Trend::Bullish, 39));
        assert!(signal.is_wait());
        assert_eq!(signal.entry, 0.0);
        assert_eq!(signal.stop_loss, 0.0);
        assert!(signal.rationale.contains("39%"));
    }

    #[test]
    fn neutral_lean_waits() {
        let signal = SignalSynthesizer::default().synthesize(&report(Trend::Neutral, 90));
        assert!(signal.is_wait());
    }

    #[test]
    fn confidence_at_threshold_trades() {
        let signal = SignalSynthesizer::default().synthesize(&report(Trend::Bullish, 40));
        assert_eq!(signal.direction, Action::Buy);
    }

    #[test]
    fn bullish_stop_prefers_nearest_zone() {
        let mut r = report(Trend::Bullish, 70);
        r.zones = vec![zone(Side::Bullish, 90.0, 92.0), zone(Side::Bullish, 95.0, 97.0)];
        r.structure.swing_lows = vec![swing(SwingKind::Low, 93.0, 8)];

        let signal = SignalSynthesizer::default().synthesize(&r);
        assert_eq!(signal.direction, Action::Buy);
        assert!((signal.stop_loss - 94.4).abs() < 1e-9);
        assert!(signal.rationale.starts_with("Stop below bullish order block"));
        assert!(signal.rationale.contains("RSI 58.0"));
    }

    #[test]
    fn mitigated_zone_falls_back_to_swing_low() {
        let mut r = report(Trend::Bullish, 70);
        r.zones = vec![Zone { mitigated: true, active: false, ..zone(Side::Bullish, 95.0, 97.0) }];
        r.structure.swing_lows = vec![swing(SwingKind::Low, 90.0, 4), swing(SwingKind::Low, 96.0, 9)];

        let signal = SignalSynthesizer::default().synthesize(&r);
        assert!((signal.stop_loss - 95.4).abs() < 1e-9);
        assert!(signal.rationale.contains("swing low"));
    }

    #[test]
    fn atr_fallback_and_targets() {
        let signal = SignalSynthesizer::default().synthesize(&report(Trend::Bullish, 70));
        // risk = 1.5 * 2 = 3
        assert_eq!(signal.stop_loss, 97.0);
        assert!((signal.tp1 - 104.5).abs() < 1e-9);
        assert!((signal.tp2 - 107.5).abs() < 1e-9);
        assert!((signal.tp3 - 110.5).abs() < 1e-9);
        assert!((signal.risk_reward - 2.5).abs() < 1e-9);
        assert!(signal.rationale.starts_with("ATR-based stop"));
    }

    #[test]
    fn resistance_between_entry_and_tp2_replaces_tp1() {
        let mut r = report(Trend::Bullish, 70);
        r.levels.resistance = 106.0;
        let signal = SignalSynthesizer::default().synthesize(&r);
        // 6 / 3 = 2R clears the 1.5R floor
        assert_eq!(signal.tp1, 106.0);
        assert!((signal.tp2 - 107.5).abs() < 1e-9);
    }

    #[test]
    fn close_resistance_is_lifted_to_min_reward_risk() {
        let mut r = report(Trend::Bullish, 70);
        r.levels.resistance = 101.0;
        let signal = SignalSynthesizer::default().synthesize(&r);
        assert!((signal.tp1 - 104.5).abs() < 1e-9);

        let mut settings = SignalSettings::default();
        settings.enforce_min_reward_risk = false;
        let relaxed = SignalSynthesizer::new(settings).synthesize(&r);
        assert_eq!(relaxed.tp1, 101.0);
    }

    #[test]
    fn bearish_mirrors_with_support() {
        let mut r = report(Trend::Bearish, 65);
        r.zones = vec![zone(Side::Bearish, 103.0, 105.0), zone(Side::Bullish, 96.0, 98.0)];
        r.levels.support = 90.0;

        let signal = SignalSynthesizer::default().synthesize(&r);
        assert_eq!(signal.direction, Action::Sell);
        // 105 + 0.6
        assert!((signal.stop_loss - 105.6).abs() < 1e-9);
        let risk = 5.6;
        assert!((signal.tp2 - (100.0 - risk * 2.5)).abs() < 1e-9);
        assert_eq!(signal.tp1, 90.0);
        assert!(signal.tp3 < signal.tp2 && signal.tp2 < signal.entry);
        assert!(signal.rationale.contains("bearish order block"));
    }

    #[test]
    fn bearish_swing_high_below_price_is_ignored() {
        let mut r = report(Trend::Bearish, 65);
        r.structure = StructureState {
            swing_highs: vec![swing(SwingKind::High, 99.0, 12)],
            ..StructureState::default()
        };
        let signal = SignalSynthesizer::default().synthesize(&r);
        assert_eq!(signal.stop_loss, 103.0);
    }

    #[test]
    fn zero_atr_without_anchors_waits() {
        let mut r = report(Trend::Bullish, 80);
        r.indicators.atr = 0.0;
        let signal = SignalSynthesizer::default().synthesize(&r);
        assert!(signal.is_wait());
    }

    #[test]
    fn action_mapping() {
        assert_eq!(action_for(Trend::Bullish), Action::Buy);
        assert_eq!(action_for(Trend::Bearish), Action::Sell);
        assert_eq!(action_for(Trend::Neutral), Action::Wait);
    }
}

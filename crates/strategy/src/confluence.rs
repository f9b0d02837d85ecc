use common::{
    Bias, ConfluenceResult, Factor, FactorScore, Gap, IndicatorSnapshot, Outlook, Side,
    StructureState, Trend, Zone,
};
use tracing::debug;

use crate::config::ConfluenceSettings;

/// Weighs independent evidence for the bias direction into a 0-100 confidence.
#[derive(Debug, Clone)]
pub struct ConfluenceScorer {
    settings: ConfluenceSettings,
}

impl ConfluenceScorer {
    pub fn new(settings: ConfluenceSettings) -> Self {
        Self { settings }
    }

    pub fn score(
        &self,
        bias: &Bias,
        ind: &IndicatorSnapshot,
        structure: &StructureState,
        zones: &[Zone],
        gaps: &[Gap],
    ) -> ConfluenceResult {
        let Some(side) = bias.direction.side() else {
            return ConfluenceResult {
                direction: Outlook::Wait,
                lean: Trend::Neutral,
                confidence: 0,
                breakdown: self.unscored("No directional bias"),
            };
        };

        let breakdown = vec![
            self.ema_alignment(side, ind),
            self.structure(side, structure),
            self.order_block(side, ind, zones),
            self.fair_value_gap(side, gaps),
            self.rsi(side, ind.rsi),
            self.macd(side, ind.macd.histogram),
        ];

        let score: u32 = breakdown.iter().map(|f| f.score).sum();
        let max = self.settings.max_score();
        let confidence = if max == 0 {
            0
        } else {
            (score as f64 / max as f64 * 100.0).round().min(100.0) as u8
        };

        let direction = if confidence >= self.settings.label_threshold {
            match side {
                Side::Bullish => Outlook::Bullish,
                Side::Bearish => Outlook::Bearish,
            }
        } else {
            Outlook::Wait
        };

        debug!(%side, score, max, confidence, %direction, "Confluence scored");

        ConfluenceResult {
            direction,
            lean: side.into(),
            confidence,
            breakdown,
        }
    }

    fn ema_alignment(&self, side: Side, ind: &IndicatorSnapshot) -> FactorScore {
        let c = &self.settings;
        let (aligned, beyond_slow) = match side {
            Side::Bullish => (ind.ema_fast > ind.ema_mid, ind.price > ind.ema_slow),
            Side::Bearish => (ind.ema_fast < ind.ema_mid, ind.price < ind.ema_slow),
        };
        let (score, detail) = match (aligned, beyond_slow) {
            (true, true) => (c.ema_weight, format!("Fast/mid EMAs {side} and price beyond slow EMA")),
            (true, false) => (c.ema_alignment_score, format!("Fast/mid EMAs {side}")),
            (false, _) => (0, "EMAs not aligned".to_string()),
        };
        factor(Factor::EmaAlignment, score, c.ema_weight, detail)
    }

    fn structure(&self, side: Side, structure: &StructureState) -> FactorScore {
        let c = &self.settings;
        let matching_reversal = structure
            .latest_reversal()
            .is_some_and(|r| r.direction == side);

        let (score, detail) = if structure.trend == Trend::from(side) {
            if structure.has_break(side) {
                (c.structure_weight, format!("{side} trend with break of structure"))
            } else {
                (c.structure_trend_score, format!("{side} trend"))
            }
        } else if matching_reversal {
            (c.structure_reversal_score, format!("{side} change of character"))
        } else {
            (0, format!("Structure is {}", structure.trend))
        };
        factor(Factor::Structure, score, c.structure_weight, detail)
    }

    fn order_block(&self, side: Side, ind: &IndicatorSnapshot, zones: &[Zone]) -> FactorScore {
        let c = &self.settings;
        let nearest = zones
            .iter()
            .filter(|z| z.kind == side && z.active)
            .map(|z| z.distance_to(ind.price))
            .min_by(|a, b| a.total_cmp(b));

        let (score, detail) = match nearest {
            None => (0, "No active order block".to_string()),
            Some(distance) => {
                let atrs = atr_units(distance, ind.atr);
                let score = if atrs < c.order_block_near_atr {
                    c.order_block_weight
                } else if atrs < c.order_block_mid_atr {
                    c.order_block_mid_score
                } else {
                    c.order_block_far_score
                };
                (score, format!("{side} order block {atrs:.2} ATR away"))
            }
        };
        factor(Factor::OrderBlock, score, c.order_block_weight, detail)
    }

    fn fair_value_gap(&self, side: Side, gaps: &[Gap]) -> FactorScore {
        let c = &self.settings;
        let (score, detail) = if gaps.iter().any(|g| g.kind == side && g.active) {
            (c.gap_weight, format!("Active {side} fair value gap"))
        } else if gaps.iter().any(|g| g.kind == side && !g.filled) {
            (c.gap_inactive_score, format!("{side} fair value gap out of reach"))
        } else {
            (0, "No open fair value gap".to_string())
        };
        factor(Factor::FairValueGap, score, c.gap_weight, detail)
    }

    fn rsi(&self, side: Side, rsi: f64) -> FactorScore {
        let c = &self.settings;
        // Bearish readings are scored on the mirrored scale.
        let r = match side {
            Side::Bullish => rsi,
            Side::Bearish => 100.0 - rsi,
        };
        let score = if (c.rsi_core_low..=c.rsi_core_high).contains(&r) {
            c.rsi_weight
        } else if (c.rsi_outer_low..=c.rsi_outer_high).contains(&r) {
            c.rsi_partial_score
        } else {
            0
        };
        factor(Factor::Rsi, score, c.rsi_weight, format!("RSI {rsi:.1}"))
    }

    fn macd(&self, side: Side, histogram: f64) -> FactorScore {
        let c = &self.settings;
        let agrees = match side {
            Side::Bullish => histogram > 0.0,
            Side::Bearish => histogram < 0.0,
        };
        let score = if agrees { c.macd_weight } else { 0 };
        factor(Factor::Macd, score, c.macd_weight, format!("Histogram {histogram:.4}"))
    }

    fn unscored(&self, detail: &str) -> Vec<FactorScore> {
        let c = &self.settings;
        [
            (Factor::EmaAlignment, c.ema_weight),
            (Factor::Structure, c.structure_weight),
            (Factor::OrderBlock, c.order_block_weight),
            (Factor::FairValueGap, c.gap_weight),
            (Factor::Rsi, c.rsi_weight),
            (Factor::Macd, c.macd_weight),
        ]
        .into_iter()
        .map(|(f, max)| factor(f, 0, max, detail.to_string()))
        .collect()
    }
}

impl Default for ConfluenceScorer {
    fn default() -> Self {
        Self::new(ConfluenceSettings::default())
    }
}

fn factor(factor: Factor, score: u32, max: u32, detail: String) -> FactorScore {
    FactorScore {
        factor,
        score: score.min(max),
        max,
        detail,
    }
}

fn atr_units(distance: f64, atr: f64) -> f64 {
    if atr > 0.0 {
        distance / atr
    } else if distance == 0.0 {
        0.0
    } else {
        f64::INFINITY
    }
}

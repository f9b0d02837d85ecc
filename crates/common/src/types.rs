use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Input ────────────────────────────────────────────────────────────────────

/// One OHLCV price bar. Sequences are ordered oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar open time in Unix seconds.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self { time, open, high, low, close, volume }
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Signed body size: positive for bullish bars.
    pub fn body(&self) -> f64 {
        self.close - self.open
    }

    pub fn body_top(&self) -> f64 {
        self.open.max(self.close)
    }

    pub fn body_bottom(&self) -> f64 {
        self.open.min(self.close)
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }
}

// ─── Directions ───────────────────────────────────────────────────────────────

/// Polarity of a zone, gap or structural event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Bullish,
    Bearish,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Bullish => write!(f, "BULLISH"),
            Side::Bearish => write!(f, "BEARISH"),
        }
    }
}

/// Directional reading of structure or bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl Trend {
    pub fn side(self) -> Option<Side> {
        match self {
            Trend::Bullish => Some(Side::Bullish),
            Trend::Bearish => Some(Side::Bearish),
            Trend::Neutral => None,
        }
    }
}

impl From<Side> for Trend {
    fn from(side: Side) -> Self {
        match side {
            Side::Bullish => Trend::Bullish,
            Side::Bearish => Trend::Bearish,
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Bullish => write!(f, "BULLISH"),
            Trend::Bearish => write!(f, "BEARISH"),
            Trend::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Labeled confluence outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outlook {
    Bullish,
    Bearish,
    #[default]
    Wait,
}

impl std::fmt::Display for Outlook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outlook::Bullish => write!(f, "BULLISH"),
            Outlook::Bearish => write!(f, "BEARISH"),
            Outlook::Wait => write!(f, "WAIT"),
        }
    }
}

/// Action carried by the final signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Buy,
    Sell,
    #[default]
    Wait,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Wait => write!(f, "WAIT"),
        }
    }
}

// ─── Indicators ───────────────────────────────────────────────────────────────

/// Momentum reading derived from the last two MACD histogram values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MacdTrend {
    Bullish,
    BullishWeakening,
    Bearish,
    BearishWeakening,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacdResult {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
    pub prev_histogram: f64,
    pub trend: MacdTrend,
}

/// Indicator values at the latest candle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub price: f64,
    pub ema_fast: f64,
    pub ema_mid: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    pub atr: f64,
    pub macd: MacdResult,
}

// ─── Structure ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwingKind {
    High,
    Low,
}

/// A candle whose high (or low) is strictly extremal within its window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub index: usize,
    pub price: f64,
    pub kind: SwingKind,
}

/// Break of Structure: a swing level exceeded in the prevailing direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakEvent {
    pub direction: Side,
    pub level: f64,
    pub index: usize,
}

/// Change of Character: a swing contradicting the prevailing trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReversalEvent {
    pub direction: Side,
    pub level: f64,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructureState {
    pub trend: Trend,
    pub swing_highs: Vec<SwingPoint>,
    pub swing_lows: Vec<SwingPoint>,
    pub breaks: Vec<BreakEvent>,
    pub reversals: Vec<ReversalEvent>,
}

impl StructureState {
    pub fn latest_reversal(&self) -> Option<&ReversalEvent> {
        self.reversals.iter().max_by_key(|r| r.index)
    }

    pub fn has_break(&self, side: Side) -> bool {
        self.breaks.iter().any(|b| b.direction == side)
    }
}

// ─── Zones and gaps ───────────────────────────────────────────────────────────

/// Order block: the origin candle of an impulsive move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(rename = "type")]
    pub kind: Side,
    pub top: f64,
    pub bottom: f64,
    pub index: usize,
    pub active: bool,
    pub mitigated: bool,
}

impl Zone {
    pub fn contains(&self, price: f64) -> bool {
        price >= self.bottom && price <= self.top
    }

    /// Zero inside the zone, else the distance to the nearer boundary.
    pub fn distance_to(&self, price: f64) -> f64 {
        if self.contains(price) {
            0.0
        } else {
            (price - self.top).abs().min((price - self.bottom).abs())
        }
    }
}

/// Fair value gap: a range skipped between the first and third of three bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    #[serde(rename = "type")]
    pub kind: Side,
    pub top: f64,
    pub bottom: f64,
    pub size: f64,
    /// Index of the middle candle.
    pub index: usize,
    pub active: bool,
    pub filled: bool,
}

// ─── Levels ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevelKind {
    Support,
    Resistance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind")]
pub enum LevelSource {
    /// A detected swing point at the given candle index.
    Swing { index: usize },
    /// Extreme of the trailing range window.
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub price: f64,
    #[serde(rename = "type")]
    pub kind: LevelKind,
    pub source: LevelSource,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyLevels {
    pub support: f64,
    pub resistance: f64,
    pub midpoint: f64,
    /// Where price sits inside `[support, resistance]`, in percent.
    pub position_pct: f64,
    pub levels: Vec<Level>,
}

// ─── Scoring ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bias {
    pub direction: Trend,
    pub strength: u8,
    pub bullish_points: u32,
    pub bearish_points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Factor {
    EmaAlignment,
    Structure,
    OrderBlock,
    FairValueGap,
    Rsi,
    Macd,
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Factor::EmaAlignment => write!(f, "EMA alignment"),
            Factor::Structure => write!(f, "Structure"),
            Factor::OrderBlock => write!(f, "Order block"),
            Factor::FairValueGap => write!(f, "Fair value gap"),
            Factor::Rsi => write!(f, "RSI"),
            Factor::Macd => write!(f, "MACD"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub factor: Factor,
    pub score: u32,
    pub max: u32,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfluenceResult {
    pub direction: Outlook,
    /// Bias direction the factors were scored against, before labeling.
    pub lean: Trend,
    pub confidence: u8,
    pub breakdown: Vec<FactorScore>,
}

/// Every intermediate artifact of one pipeline run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    pub indicators: IndicatorSnapshot,
    pub structure: StructureState,
    pub zones: Vec<Zone>,
    pub gaps: Vec<Gap>,
    pub levels: KeyLevels,
    pub bias: Bias,
    pub confluence: ConfluenceResult,
}

// ─── Output ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Signal {
    pub direction: Action,
    pub entry: f64,
    pub stop_loss: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub tp3: f64,
    pub risk_reward: f64,
    pub rationale: String,
}

impl Signal {
    /// A `WAIT` signal with zeroed price fields.
    pub fn wait(reason: impl Into<String>) -> Self {
        Self {
            rationale: reason.into(),
            ..Self::default()
        }
    }

    pub fn is_wait(&self) -> bool {
        self.direction == Action::Wait
    }
}

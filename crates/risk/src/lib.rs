pub mod synthesizer;

pub use synthesizer::{action_for, SignalSynthesizer};

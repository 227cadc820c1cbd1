//! Numeric features derived from a thread and its signals

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Number of lead-authored messages
    pub depth: usize,
    /// Mean gap between consecutive messages (both senders), hours
    pub velocity_hours: f64,
    /// velocity_hours < 24
    pub is_consistent: bool,
    /// Evaluative categories present (max 4)
    pub eval_signals: u32,
    /// Constraint categories present (max 4)
    pub constraint_count: u32,
    pub questions_per_reply: f64,
    /// Timeline category count, used by the tiebreaker
    pub timeline_urgency: u32,
    pub avg_words_per_reply: f64,
    pub pain_count: u32,
    pub analytical_count: u32,
    /// Wall-clock hours since the newest lead message
    pub hours_since_last_lead: f64,
    /// Largest gap between consecutive lead messages, hours
    pub max_gap_hours: f64,
}

//! Metrics calculator: numeric features from the thread and its signals

use crate::types::{
    gaps, lead_messages, sorted_timestamps, Category, Message, Metrics, Signals, SECS_PER_HOUR,
};

/// Velocity reported when fewer than two messages carry a timestamp
const UNKNOWN_VELOCITY_HOURS: f64 = 24.0;

/// Mean gap below this many hours counts as a consistent thread
const CONSISTENT_BELOW_HOURS: f64 = 24.0;

#[derive(Debug, Clone, Default)]
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Create new calculator
    pub fn new() -> Self {
        Self
    }

    /// `now` is epoch seconds, used only for staleness
    pub fn calculate(&self, thread: &[Message], signals: &Signals, now: f64) -> Metrics {
        let leads: Vec<&Message> = lead_messages(thread).collect();
        let depth = leads.len();

        // Both senders count toward velocity
        let all_ts = sorted_timestamps(thread);
        let all_gaps = gaps(&all_ts);
        let velocity_hours = if all_gaps.is_empty() {
            UNKNOWN_VELOCITY_HOURS
        } else {
            all_gaps.iter().sum::<f64>() / all_gaps.len() as f64 / SECS_PER_HOUR
        };

        let eval_signals = Category::EVALUATIVE.iter().filter(|c| signals.has(**c)).count() as u32;
        let constraint_count =
            Category::CONSTRAINTS.iter().filter(|c| signals.has(**c)).count() as u32;

        let questions_per_reply = if depth > 0 {
            signals.question_count as f64 / depth as f64
        } else {
            0.0
        };

        let lead_ts = sorted_timestamps(leads.iter().copied());
        let hours_since_last_lead = lead_ts
            .last()
            .map(|last| ((now - last) / SECS_PER_HOUR).max(0.0))
            .unwrap_or(0.0);
        let max_gap_hours = gaps(&lead_ts)
            .into_iter()
            .fold(0.0_f64, f64::max)
            / SECS_PER_HOUR;

        Metrics {
            depth,
            velocity_hours,
            is_consistent: velocity_hours < CONSISTENT_BELOW_HOURS,
            eval_signals,
            constraint_count,
            questions_per_reply,
            timeline_urgency: signals.timeline,
            avg_words_per_reply: signals.avg_words_per_reply,
            pain_count: signals.business_pain,
            analytical_count: signals.analytical,
            hours_since_last_lead,
            max_gap_hours,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

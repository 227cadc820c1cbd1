//! Momentum & decay analyzer
//!
//! Re-evaluated from scratch on every call, nothing carried between calls:
//!
//! ```text
//! disengaging ──────────────────────────────▶ Cooling
//! one lead reply ── eval+pain >= 10 ────────▶ Rising   (else Stable)
//! many replies ──── second half > first*1.3 ▶ Rising
//!              ──── first half > second*1.3 ▶ Cooling  (else Stable)
//! silent > 48h ─────────────────────────────▶ Cooling  (overrides all)
//! ```
//!
//! Cooling threads lose a share of their score by staleness band.

use crate::config::MomentumConfig;
use crate::core::composer::round_half_even;
use crate::core::patterns::{count_distinct, PatternSet};
use crate::types::{
    combined_lead_text, lead_messages, Category, CliffFlag, Message, Metrics, Momentum,
    ScoreBreakdown, Signals, SECS_PER_HOUR,
};

const SECS_PER_DAY: f64 = 24.0 * SECS_PER_HOUR;

#[derive(Debug, Clone, Default)]
pub struct MomentumAnalyzer {
    config: MomentumConfig,
}

impl MomentumAnalyzer {
    pub fn new(config: MomentumConfig) -> Self {
        Self { config }
    }

    /// Trend of the thread, including the staleness override
    pub fn momentum(
        &self,
        thread: &[Message],
        signals: &Signals,
        breakdown: &ScoreBreakdown,
        metrics: &Metrics,
        patterns: &PatternSet,
    ) -> Momentum {
        if metrics.hours_since_last_lead > self.config.stale_after_hours {
            return Momentum::Cooling;
        }
        self.trend(thread, signals, breakdown, patterns)
    }

    /// Trend from content alone
    fn trend(
        &self,
        thread: &[Message],
        signals: &Signals,
        breakdown: &ScoreBreakdown,
        patterns: &PatternSet,
    ) -> Momentum {
        if signals.is_disengaging {
            return Momentum::Cooling;
        }

        let leads: Vec<&Message> = lead_messages(thread).collect();
        if leads.len() == 1 {
            let richness = breakdown.evaluative_depth + breakdown.business_pain;
            return if richness >= self.config.single_reply_rising_min {
                Momentum::Rising
            } else {
                Momentum::Stable
            };
        }

        let mid = leads.len() / 2;
        let q1 = half_quality(&leads[..mid], patterns) as f64;
        let q2 = half_quality(&leads[mid..], patterns) as f64;
        let ratio = self.config.rise_ratio;

        if q2 > q1 * ratio {
            Momentum::Rising
        } else if q1 > q2 * ratio {
            Momentum::Cooling
        } else {
            Momentum::Stable
        }
    }

    /// Points removed from a Cooling score
    pub fn decay(&self, score: u32, metrics: &Metrics) -> u32 {
        let staleness = metrics.hours_since_last_lead.max(metrics.max_gap_hours);
        let fraction = self
            .config
            .decay_bands
            .iter()
            .find(|band| staleness > band.above_hours)
            .map(|band| band.fraction)
            .unwrap_or(0.0);
        round_half_even(score as f64 * fraction).clamp(0, score as i32) as u32
    }

    /// Flag threads whose newest message is older than the cliff window
    pub fn cliff(&self, thread: &[Message], now: f64) -> Option<CliffFlag> {
        if thread.len() < 2 {
            return None;
        }
        let newest = thread.iter().filter_map(|m| m.timestamp).reduce(f64::max)?;
        let days_since = (now - newest) / SECS_PER_DAY;
        (days_since > self.config.cliff_after_days).then_some(CliffFlag::PausedOrInternalBlocker)
    }
}

/// 4 per question mark, 1 per word, 6 per evaluative pattern hit
fn half_quality(messages: &[&Message], patterns: &PatternSet) -> u32 {
    let text = combined_lead_text(messages.iter().copied());
    let questions = text.matches('?').count() as u32;
    let words = text.split_whitespace().count() as u32;
    let hits: u32 = Category::EVALUATIVE
        .iter()
        .map(|c| count_distinct(patterns.category(*c), &text))
        .sum();
    questions * 4 + words + hits * 6
}

// =============================================================================
// TESTS
// =============================================================================

//! Score composer: signals and metrics into a capped, signed breakdown
//!
//! Components are computed in a fixed order. Later adjustments (spam, jargon,
//! sarcasm, contradiction) rewrite earlier components, and the closing boost
//! reads the running sum of everything before it.

use crate::config::Caps;
use crate::types::{Metrics, ScoreBreakdown, Signals};

/// Growth factor of the engagement compound per extra lead reply
const ENGAGEMENT_GROWTH: f64 = 1.7;

#[derive(Debug, Clone, Default)]
pub struct ScoreComposer {
    caps: Caps,
}

impl ScoreComposer {
    pub fn new(caps: Caps) -> Self {
        Self { caps }
    }

    pub fn compose(&self, signals: &Signals, metrics: &Metrics) -> ScoreBreakdown {
        let caps = &self.caps;
        let depth = metrics.depth;
        let qc = signals.question_count;

        // 1. Evaluative depth
        let mut eval_base = question_tier(qc);
        if signals.implementation > 0 {
            eval_base += 10;
        }
        if signals.competitor > 0 {
            eval_base += 10;
        }
        if signals.problem_desc > 0 {
            eval_base += 5;
        }
        let evaluative_depth = eval_base.min(caps.evaluative_depth);

        // 2. Business pain, competitor switching, analytical depth
        let pain_score = tier(signals.business_pain, &[(4, 35), (3, 30), (2, 22), (1, 14)]);
        let business_pain = pain_score.min(caps.business_pain);
        let competitor_switch_bonus =
            tier(signals.competitor, &[(3, 20), (2, 16), (1, 12)]).min(caps.competitor_switch_bonus);
        let analytical_depth =
            tier(signals.analytical, &[(3, 12), (2, 8), (1, 5)]).min(caps.analytical_depth);

        // 3. Engagement compound, gated on content
        let engagement_compound = if depth >= 1 {
            let mut raw = 5.0 * ENGAGEMENT_GROWTH.powi(depth as i32 - 1);
            let has_eval_content = eval_base > 0
                || pain_score > 0
                || competitor_switch_bonus > 0
                || analytical_depth > 0
                || metrics.constraint_count > 0;
            let avg = metrics.avg_words_per_reply;
            let content_mult = if avg < 8.0 && !has_eval_content {
                0.3
            } else if avg < 12.0 && !has_eval_content {
                0.5
            } else {
                1.0
            };
            if depth >= 3 && (eval_base >= 15 || pain_score >= 14) {
                raw *= 1.5;
            }
            if depth >= 4 && (eval_base >= 20 || competitor_switch_bonus >= 12) {
                raw *= 1.3;
            }
            round_half_even(raw * content_mult)
                .min(caps.engagement_compound)
                .max(caps.engagement_floor)
        } else {
            0
        };

        // 4. Constraints scaled by depth
        let mut raw_constraint = 0;
        if signals.budget > 0 {
            raw_constraint += 7;
            if signals.business_pain >= 1 {
                raw_constraint += 8;
            }
        }
        if signals.timeline > 0 {
            raw_constraint += 5;
        }
        if signals.pricing > 0 {
            raw_constraint += 4;
        }
        if signals.stakeholder > 0 {
            raw_constraint += 4;
        }
        let depth_mult = match depth {
            0 => 0.0,
            1 if raw_constraint >= 10 || signals.business_pain >= 2 => 0.7,
            1 => 0.3,
            2 => 0.6,
            3 => 0.9,
            _ => 1.0,
        };
        let constraint_x_depth =
            round_half_even(raw_constraint as f64 * depth_mult).min(caps.constraint_x_depth);

        // 5-7. Velocity, question density, consistency
        let vh = metrics.velocity_hours;
        let velocity = velocity_points(vh).min(caps.velocity);
        let qpr = metrics.questions_per_reply;
        let question_density = if qpr >= 2.0 {
            7
        } else if qpr >= 1.0 {
            5
        } else if qpr >= 0.5 {
            3
        } else {
            0
        }
        .min(caps.question_density);
        let consistency = if metrics.is_consistent { caps.consistency } else { 0 };

        // 8. Content richness for short, dense threads
        let richness_input = evaluative_depth + business_pain + competitor_switch_bonus + analytical_depth;
        let content_richness = if depth <= 2 {
            tier(richness_input as u32, &[(35, 15), (25, 12), (18, 10), (12, 8), (8, 5)])
                .min(caps.content_richness)
        } else {
            0
        };

        // 9. Shallow replies with nothing in them
        let has_substance = qc > 0
            || eval_base > 0
            || pain_score > 0
            || raw_constraint > 0
            || competitor_switch_bonus > 0
            || analytical_depth > 0;
        let avg = metrics.avg_words_per_reply;
        let shallow_penalty = if depth >= 2 && !has_substance && avg < 5.0 {
            if vh < 1.0 { -15 } else { -12 }
        } else if depth >= 2 && !has_substance && avg < 8.0 {
            if vh < 1.0 { -4 } else { -2 }
        } else {
            0
        };

        let mut b = ScoreBreakdown {
            evaluative_depth,
            business_pain,
            competitor_switch_bonus,
            analytical_depth,
            engagement_compound,
            constraint_x_depth,
            content_richness,
            velocity,
            question_density,
            consistency,
            shallow_penalty,
            ..ScoreBreakdown::default()
        };

        // 10. Spam keeps nothing
        if signals.is_keyword_spam {
            b = ScoreBreakdown {
                shallow_penalty,
                spam_penalty: -caps.spam_penalty,
                ..ScoreBreakdown::default()
            };
        }

        if signals.is_jargon && !signals.is_keyword_spam {
            b.evaluative_depth /= 2;
            b.content_richness /= 2;
            b.business_pain /= 2;
            b.analytical_depth /= 2;
        }

        // 11. Disengagement
        if signals.is_disengaging {
            b.disengage_penalty = -caps.disengage_penalty;
        }

        // 12. Sarcasm halves the evidence, then penalizes
        if signals.is_sarcastic {
            b.evaluative_depth /= 2;
            b.business_pain /= 2;
            b.competitor_switch_bonus /= 2;
            b.content_richness /= 2;
            b.analytical_depth /= 2;
            b.sarcasm_penalty = -caps.sarcasm_penalty;
        }

        if signals.is_contradictory {
            b.competitor_switch_bonus /= 2;
            b.content_richness /= 2;
            b.evaluative_depth /= 2;
        }

        // 13. Vendor selection mode
        if b.competitor_switch_bonus > 0 && signals.has_pilot_intent && signals.has_fast_action {
            b.vendor_eval_bonus = caps.vendor_eval_bonus;
        }

        // 14. Explicit contract language floors the sum
        if signals.has_closing_intent && !signals.is_keyword_spam && !signals.is_disengaging {
            let running = b.total();
            if running < caps.closing_floor {
                b.closing_boost = caps.closing_floor - running;
            }
        }

        b
    }
}

fn question_tier(qc: usize) -> i32 {
    match qc {
        0 => 0,
        1 => 3,
        2 => 7,
        3 => 12,
        _ => 18,
    }
}

/// First (min_count, points) row whose minimum is met, highest first
fn tier(count: u32, table: &[(u32, i32)]) -> i32 {
    table
        .iter()
        .find(|(min, _)| count >= *min)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

fn velocity_points(vh: f64) -> i32 {
    if vh < 1.0 {
        3
    } else if vh < 3.0 {
        5
    } else if vh < 12.0 {
        3
    } else if vh < 24.0 {
        1
    } else {
        0
    }
}

/// Banker's rounding to an integer score
pub fn round_half_even(value: f64) -> i32 {
    value.round_ties_even() as i32
}

// =============================================================================
// TESTS
// =============================================================================

//! Explanation generator
//!
//! Two views of the same breakdown: a short ranked list of reasons for
//! people, and every fired signal with its literal points for debugging.

use crate::types::{Metrics, Reason, ScoreBreakdown, SignalContribution, Signals};

/// Reasons shown in the short explanation
pub const MAX_REASONS: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct ExplanationGenerator;

impl ExplanationGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Weighted candidates in generation order
    pub fn candidates(&self, signals: &Signals, metrics: &Metrics, b: &ScoreBreakdown) -> Vec<(f64, Reason)> {
        let mut out: Vec<(f64, Reason)> = Vec::new();

        match signals.business_pain {
            0 => {}
            1 => out.push((8.0, Reason::OperationalPain)),
            n => out.push((b.business_pain as f64, Reason::BusinessPain { signals: n })),
        }

        match signals.question_count {
            0 => {}
            1 => out.push((3.0, Reason::DirectQuestion)),
            n => out.push((b.evaluative_depth as f64 * 0.5, Reason::SpecificQuestions { count: n })),
        }

        if signals.implementation > 0 {
            out.push((10.0, Reason::Implementation));
        }
        if signals.competitor > 0 {
            out.push((10.0, Reason::Competitors));
        }
        if signals.problem_desc > 0 {
            out.push((5.0, Reason::ProblemDescribed));
        }

        let cxd = b.constraint_x_depth as f64;
        if signals.budget > 0 {
            out.push((cxd * 0.4, Reason::Budget));
        }
        if signals.timeline > 0 {
            out.push((cxd * 0.3, Reason::Timeline));
        }
        if signals.pricing > 0 {
            out.push((cxd * 0.2, Reason::Pricing));
        }
        if signals.stakeholder > 0 {
            out.push((4.0, Reason::Stakeholder));
        }

        if metrics.depth >= 3 {
            out.push((b.engagement_compound as f64 * 0.3, Reason::Exchanges { depth: metrics.depth }));
        }
        if (1.0..3.0).contains(&metrics.velocity_hours) {
            out.push((1.0, Reason::Responsive { hours: metrics.velocity_hours }));
        }

        if b.shallow_penalty < 0 {
            out.push((0.0, Reason::ShallowReplies));
        }
        if b.spam_penalty < 0 {
            out.push((100.0, Reason::KeywordSpam));
        }
        if b.disengage_penalty < 0 {
            out.push((100.0, Reason::Disengaging));
        }
        if b.sarcasm_penalty < 0 {
            out.push((50.0, Reason::Sarcasm));
        }
        if b.vendor_eval_bonus > 0 {
            out.push((45.0, Reason::VendorEvaluation));
        }
        if b.closing_boost > 0 {
            out.push((200.0, Reason::ClosingRequested));
        }

        out
    }

    /// Up to three distinct reasons: pinned ones first, then by weight
    pub fn explain(&self, signals: &Signals, metrics: &Metrics, b: &ScoreBreakdown) -> Vec<Reason> {
        let mut candidates = self.candidates(signals, metrics, b);
        // Stable: equal weights keep generation order
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

        let (pinned, rest): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|(_, r)| r.is_pinned());

        let mut result: Vec<Reason> = Vec::with_capacity(MAX_REASONS);
        for (_, reason) in pinned.into_iter().chain(rest) {
            if result.len() >= MAX_REASONS {
                break;
            }
            if !result.contains(&reason) {
                result.push(reason);
            }
        }
        result
    }

    /// Every fired signal with its points, largest magnitude first
    pub fn full(&self, signals: &Signals, metrics: &Metrics, b: &ScoreBreakdown) -> Vec<SignalContribution> {
        let mut items = Vec::new();

        if signals.business_pain > 0 {
            items.push(SignalContribution::new(
                "business_pain",
                format!("Operational pain detected ({})", plural(signals.business_pain as usize, "signal")),
                b.business_pain,
            ));
        }
        if signals.competitor > 0 {
            items.push(SignalContribution::new(
                "competitor_switch",
                format!("Vendor comparison/switching language ({})", plural(signals.competitor as usize, "signal")),
                b.competitor_switch_bonus,
            ));
        }
        if signals.implementation > 0 {
            items.push(SignalContribution::new(
                "implementation",
                "Asked about implementation, integration, or setup",
                10,
            ));
        }
        if signals.question_count > 0 {
            let n = signals.question_count;
            items.push(SignalContribution::new(
                "questions",
                format!("Asked {} specific {}", n, if n > 1 { "questions" } else { "question" }),
                b.question_density,
            ));
        }
        if signals.problem_desc > 0 {
            items.push(SignalContribution::new(
                "problem_description",
                "Described a specific problem or challenge",
                5,
            ));
        }
        if b.closing_boost > 0 {
            items.push(SignalContribution::new(
                "closing_intent",
                "Explicit closing signal (contract, MSA or signature)",
                b.closing_boost,
            ));
        }
        if signals.analytical > 0 {
            items.push(SignalContribution::new(
                "analytical_depth",
                format!("Data-driven inquiry ({} referenced)", plural(signals.analytical as usize, "metric")),
                b.analytical_depth,
            ));
        }
        if signals.budget > 0 {
            items.push(SignalContribution::new("budget", "Budget mentioned or approved", 7));
        }
        if signals.timeline > 0 {
            items.push(SignalContribution::new("timeline", "Timeline or urgency referenced", 5));
        }
        if signals.pricing > 0 {
            items.push(SignalContribution::new("pricing", "Asked about pricing or cost", 4));
        }
        if signals.stakeholder > 0 {
            items.push(SignalContribution::new(
                "stakeholder",
                "Referenced decision-maker or internal stakeholder",
                4,
            ));
        }
        if metrics.depth >= 2 {
            items.push(SignalContribution::new(
                "engagement_depth",
                format!("Conversation depth: {} replies", metrics.depth),
                b.engagement_compound,
            ));
        }
        if b.content_richness > 0 {
            items.push(SignalContribution::new(
                "content_richness",
                "High-density evaluative content in early replies",
                b.content_richness,
            ));
        }
        if b.shallow_penalty < 0 {
            items.push(SignalContribution::new(
                "shallow_penalty",
                "Low-effort or vague replies detected",
                b.shallow_penalty,
            ));
        }
        if b.spam_penalty < 0 {
            items.push(SignalContribution::new(
                "spam_penalty",
                "Keyword stuffing detected: unnatural keyword density without coherent language",
                b.spam_penalty,
            ));
        }
        if b.disengage_penalty < 0 {
            items.push(SignalContribution::new(
                "disengage_penalty",
                "Lead explicitly disengaged (revisit later, other priorities)",
                b.disengage_penalty,
            ));
        }
        if b.sarcasm_penalty < 0 {
            items.push(SignalContribution::new(
                "sarcasm_penalty",
                "Sarcastic tone detected, signals may be inverted",
                b.sarcasm_penalty,
            ));
        }
        if b.vendor_eval_bonus > 0 {
            items.push(SignalContribution::new(
                "vendor_eval_bonus",
                "Active vendor selection: comparing tools with pilot intent and a fast timeline",
                b.vendor_eval_bonus,
            ));
        }

        items.sort_by(|a, b| b.contribution.abs().cmp(&a.contribution.abs()));
        items
    }
}

fn plural(n: usize, noun: &str) -> String {
    if n > 1 {
        format!("{} {}s", n, noun)
    } else {
        format!("{} {}", n, noun)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(n: usize) -> Metrics {
        Metrics { depth: n, velocity_hours: 24.0, ..Metrics::default() }
    }

    #[test]
    fn test_closing_ranks_first() {
        let s = Signals { budget: 1, ..Signals::zero() };
        let b = ScoreBreakdown { closing_boost: 70, constraint_x_depth: 2, ..Default::default() };
        let reasons = ExplanationGenerator::new().explain(&s, &depth(1), &b);
        assert_eq!(reasons[0], Reason::ClosingRequested);
        assert!(reasons.contains(&Reason::Budget));
    }

    #[test]
    fn test_pinned_reasons_beat_heavier_ones() {
        let s = Signals {
            business_pain: 1,
            question_count: 5,
            budget: 1,
            timeline: 1,
            ..Signals::zero()
        };
        let b = ScoreBreakdown {
            evaluative_depth: 30,
            constraint_x_depth: 15,
            closing_boost: 10,
            ..Default::default()
        };
        let reasons = ExplanationGenerator::new().explain(&s, &depth(1), &b);
        assert_eq!(reasons.len(), 3);
        assert_eq!(reasons[0], Reason::OperationalPain);
        assert_eq!(reasons[1], Reason::ClosingRequested);
        assert_eq!(reasons[2], Reason::SpecificQuestions { count: 5 });
    }

    #[test]
    fn test_no_signals_no_reasons() {
        let reasons = ExplanationGenerator::new().explain(&Signals::zero(), &depth(1), &ScoreBreakdown::default());
        assert!(reasons.is_empty());
    }

    #[test]
    fn test_full_explanation_sorted_by_magnitude() {
        let s = Signals { implementation: 1, pricing: 1, is_disengaging: true, ..Signals::zero() };
        let b = ScoreBreakdown { disengage_penalty: -30, ..Default::default() };
        let items = ExplanationGenerator::new().full(&s, &depth(1), &b);
        let signals: Vec<&str> = items.iter().map(|i| i.signal.as_str()).collect();
        assert_eq!(signals, vec!["disengage_penalty", "implementation", "pricing"]);
        assert_eq!(items[0].contribution, -30);
    }

    #[test]
    fn test_full_explanation_pluralizes() {
        let s = Signals { business_pain: 1, competitor: 2, ..Signals::zero() };
        let items = ExplanationGenerator::new().full(&s, &depth(1), &ScoreBreakdown::default());
        assert_eq!(items[0].detail, "Operational pain detected (1 signal)");
        assert_eq!(items[1].detail, "Vendor comparison/switching language (2 signals)");
    }
}

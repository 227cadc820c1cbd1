//! State classifier: score plus override flags to a tier

use crate::config::{TierScheme, Thresholds, TriageThresholds};
use crate::types::{LeadState, Signals, TerminalKind};

#[derive(Debug, Clone, Default)]
pub struct StateClassifier {
    scheme: TierScheme,
    thresholds: Thresholds,
    triage: TriageThresholds,
}

impl StateClassifier {
    pub fn new(scheme: TierScheme, thresholds: Thresholds, triage: TriageThresholds) -> Self {
        Self { scheme, thresholds, triage }
    }

    pub fn scheme(&self) -> TierScheme {
        self.scheme
    }

    /// Tier for a score alone
    pub fn tier_for_score(&self, score: u32) -> LeadState {
        match self.scheme {
            TierScheme::Intent => {
                let t = &self.thresholds;
                if score >= t.ready_now_min {
                    LeadState::ReadyNow
                } else if score >= t.high_intent_min {
                    LeadState::HighIntent
                } else if score >= t.evaluating_min {
                    LeadState::Evaluating
                } else if score >= t.light_interest_min {
                    LeadState::LightInterest
                } else {
                    LeadState::Noise
                }
            }
            TierScheme::Triage => {
                if score >= self.triage.ready_now_min {
                    LeadState::ReadyNow
                } else if score >= self.triage.right_icp_min {
                    LeadState::RightIcpWrongTiming
                } else {
                    LeadState::Deprioritize
                }
            }
        }
    }

    /// Full classification. `terminal` is the pre-filter match, if enabled.
    pub fn classify(&self, score: u32, signals: &Signals, terminal: Option<TerminalKind>) -> LeadState {
        if terminal == Some(TerminalKind::Noise) {
            return LeadState::Noise;
        }

        match self.scheme {
            TierScheme::Intent => {
                if signals.is_disengaging || signals.is_keyword_spam {
                    return LeadState::Noise;
                }
                if terminal == Some(TerminalKind::Ready) {
                    return LeadState::ReadyNow;
                }
                self.tier_for_score(score)
            }
            TierScheme::Triage => {
                if signals.is_disengaging {
                    return LeadState::Deprioritize;
                }
                if signals.is_keyword_spam {
                    return LeadState::Noise;
                }
                if terminal == Some(TerminalKind::Ready) {
                    return LeadState::ReadyNow;
                }
                if signals.word_count <= self.triage.short_reply_max_words && !signals.has_closing_intent {
                    return LeadState::Noise;
                }
                self.tier_for_score(score)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn intent() -> StateClassifier {
        StateClassifier::default()
    }

    fn triage() -> StateClassifier {
        StateClassifier::new(TierScheme::Triage, Thresholds::default(), TriageThresholds::default())
    }

    fn words(n: usize) -> Signals {
        Signals { word_count: n, lead_message_count: 1, ..Signals::zero() }
    }

    #[test]
    fn test_intent_band_edges() {
        let c = intent();
        assert_eq!(c.tier_for_score(0), LeadState::Noise);
        assert_eq!(c.tier_for_score(30), LeadState::Noise);
        assert_eq!(c.tier_for_score(31), LeadState::LightInterest);
        assert_eq!(c.tier_for_score(50), LeadState::LightInterest);
        assert_eq!(c.tier_for_score(51), LeadState::Evaluating);
        assert_eq!(c.tier_for_score(70), LeadState::Evaluating);
        assert_eq!(c.tier_for_score(71), LeadState::HighIntent);
        assert_eq!(c.tier_for_score(84), LeadState::HighIntent);
        assert_eq!(c.tier_for_score(85), LeadState::ReadyNow);
        assert_eq!(c.tier_for_score(100), LeadState::ReadyNow);
    }

    #[test]
    fn test_intent_overrides() {
        let c = intent();
        let s = Signals { is_disengaging: true, ..words(10) };
        assert_eq!(c.classify(90, &s, None), LeadState::Noise);
        let s = Signals { is_keyword_spam: true, ..words(10) };
        assert_eq!(c.classify(60, &s, None), LeadState::Noise);
    }

    #[test]
    fn test_triage_order() {
        let c = triage();
        let s = Signals { is_disengaging: true, ..words(10) };
        assert_eq!(c.classify(95, &s, None), LeadState::Deprioritize);
        assert_eq!(c.classify(95, &words(2), None), LeadState::Noise);
        assert_eq!(c.classify(90, &words(10), None), LeadState::ReadyNow);
        assert_eq!(c.classify(40, &words(10), None), LeadState::RightIcpWrongTiming);
        assert_eq!(c.classify(10, &words(10), None), LeadState::Deprioritize);
    }

    #[test]
    fn test_short_closing_reply_is_not_noise() {
        let s = Signals { has_closing_intent: true, ..words(2) };
        assert_eq!(triage().classify(85, &s, None), LeadState::ReadyNow);
    }

    #[test]
    fn test_terminal_matches() {
        let c = triage();
        assert_eq!(c.classify(90, &words(10), Some(TerminalKind::Noise)), LeadState::Noise);
        assert_eq!(c.classify(5, &words(10), Some(TerminalKind::Ready)), LeadState::ReadyNow);
        let s = Signals { is_disengaging: true, ..words(10) };
        assert_eq!(c.classify(5, &s, Some(TerminalKind::Ready)), LeadState::Deprioritize);
        assert_eq!(intent().classify(5, &words(10), Some(TerminalKind::Ready)), LeadState::ReadyNow);
    }
}

//! Comparative explanation: why each lead outranks the next one down

use crate::types::{LeadComparison, LeadSummary};

/// Categories counted as evaluation depth when comparing
fn eval_depth(lead: &LeadSummary) -> u32 {
    [lead.signals.implementation, lead.signals.competitor, lead.signals.problem_desc]
        .iter()
        .filter(|n| **n > 0)
        .count() as u32
}

/// Sort by score descending and explain every adjacent pair.
/// Fewer than two leads gives nothing to compare.
pub fn compare_leads(leads: &[LeadSummary]) -> Vec<LeadComparison> {
    if leads.len() < 2 {
        return Vec::new();
    }

    let mut sorted: Vec<&LeadSummary> = leads.iter().collect();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));

    sorted
        .windows(2)
        .map(|pair| {
            let (higher, lower) = (pair[0], pair[1]);
            let mut reasons = Vec::new();

            let (hp, lp) = (higher.signals.business_pain, lower.signals.business_pain);
            if hp > lp {
                reasons.push(format!("stronger business pain ({} vs {} signals)", hp, lp));
            }
            let (he, le) = (eval_depth(higher), eval_depth(lower));
            if he > le {
                reasons.push(format!("deeper evaluation ({} vs {} eval signals)", he, le));
            }
            let (hd, ld) = (higher.metrics.depth, lower.metrics.depth);
            if hd > ld {
                reasons.push(format!("more engagement ({} vs {} replies)", hd, ld));
            }
            let (hq, lq) = (higher.signals.question_count, lower.signals.question_count);
            if hq > lq {
                reasons.push(format!("asked more questions ({} vs {})", hq, lq));
            }
            if reasons.is_empty() {
                reasons.push(format!("higher overall intent ({} vs {})", higher.score, lower.score));
            }

            LeadComparison {
                higher: higher.id.clone(),
                lower: lower.id.clone(),
                reasons,
            }
        })
        .collect()
}

impl LeadComparison {
    /// One-line sentence for display
    pub fn summary(&self) -> String {
        format!("{} outranks {} because: {}", self.higher, self.lower, self.reasons.join("; "))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Metrics, Signals};
    use pretty_assertions::assert_eq;

    fn lead(id: &str, score: u32, pain: u32, depth: usize, questions: usize) -> LeadSummary {
        LeadSummary {
            id: id.to_string(),
            score,
            signals: Signals { business_pain: pain, question_count: questions, ..Signals::zero() },
            metrics: Metrics { depth, ..Metrics::default() },
        }
    }

    #[test]
    fn test_fewer_than_two() {
        assert!(compare_leads(&[]).is_empty());
        assert!(compare_leads(&[lead("a", 50, 0, 1, 0)]).is_empty());
    }

    #[test]
    fn test_pairs_sorted_by_score() {
        let leads = vec![lead("low", 20, 0, 1, 0), lead("high", 80, 2, 3, 2), lead("mid", 50, 1, 3, 2)];
        let out = compare_leads(&leads);
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].higher.as_str(), out[0].lower.as_str()), ("high", "mid"));
        assert_eq!(out[0].reasons, vec!["stronger business pain (2 vs 1 signals)".to_string()]);
        assert_eq!((out[1].higher.as_str(), out[1].lower.as_str()), ("mid", "low"));
        assert_eq!(out[1].reasons.len(), 3);
    }

    #[test]
    fn test_fallback_reason() {
        let out = compare_leads(&[lead("a", 60, 0, 1, 0), lead("b", 40, 0, 1, 0)]);
        assert_eq!(out[0].reasons, vec!["higher overall intent (60 vs 40)".to_string()]);
        assert_eq!(out[0].summary(), "a outranks b because: higher overall intent (60 vs 40)");
    }
}

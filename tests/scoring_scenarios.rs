//! End-to-end scoring scenarios and whole-engine properties

use pretty_assertions::assert_eq;
use replyscore::core::IntentEngine;
use replyscore::types::{Action, LeadState, Message, Momentum};

const NOW: f64 = 1_700_000_000.0;
const HOUR: f64 = 3600.0;

fn engine() -> IntentEngine {
    IntentEngine::with_defaults().unwrap()
}

fn single(text: &str) -> Vec<Message> {
    vec![Message::lead(text, NOW)]
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn test_one_letter_reply_is_noise() {
    let r = engine().analyze_thread_at(&single("k"), NOW);
    assert_eq!(r.state, LeadState::Noise);
    assert_eq!(r.action, Action::DoNotRespond);
    assert!(r.score <= 10, "score {}", r.score);
}

#[test]
fn test_budget_approved_is_ready_now() {
    let r = engine().analyze_thread_at(&single("Budget approved, let's move forward."), NOW);
    assert_eq!(r.state, LeadState::ReadyNow);
    assert_eq!(r.action, Action::RespondNow);
    assert!(r.score >= 85, "score {}", r.score);
    assert!(r.signals.has_closing_intent);
}

#[test]
fn test_keyword_stuffing_capped() {
    let r = engine().analyze_thread_at(
        &single(
            "Scaling hiring SDR drowning switching Apollo integration churn pricing budget timeline implementation competitor HubSpot pain bottleneck urgency demo onboarding seats migrate",
        ),
        NOW,
    );
    assert!(r.signals.is_keyword_spam);
    assert!(r.score <= 15, "score {}", r.score);
    assert_eq!(r.state, LeadState::Noise);
}

#[test]
fn test_escalating_thread_rises() {
    let t0 = NOW - 5.0 * HOUR;
    let thread = vec![
        Message::lead("Hi, got your email. Tell me more.", t0),
        Message::agent("Happy to. We help outbound teams book more meetings.", t0 + HOUR),
        Message::lead(
            "We're currently using Outreach for sequences but our SDRs are wasting hours on manual follow-ups.",
            t0 + 2.0 * HOUR,
        ),
        Message::agent("That is exactly what we fix. Want the technical overview?", t0 + 3.0 * HOUR),
        Message::lead(
            "How does the API integration work with Salesforce? How long does migration take, and what is pricing for 15 seats? Can we run a pilot this week?",
            t0 + 4.0 * HOUR,
        ),
    ];
    let r = engine().analyze_thread_at(&thread, NOW);
    assert_eq!(r.momentum, Momentum::Rising);
    assert!(r.score >= 60, "score {}", r.score);
    assert_eq!(r.metrics.depth, 3);
    assert!(r.signals.competitor > 0);
    assert!(r.signals.implementation > 0);
    assert_eq!(r.cooling_decay, 0);
}

#[test]
fn test_stale_thread_cools_and_decays() {
    let thread = vec![
        Message::lead(
            "What does the API integration involve? We're struggling with manual data entry.",
            NOW - 130.0 * HOUR,
        ),
        Message::agent("Here is an overview.", NOW - 129.0 * HOUR),
    ];
    let r = engine().analyze_thread_at(&thread, NOW);
    assert_eq!(r.momentum, Momentum::Cooling);
    assert!(r.cooling_decay > 0);
    assert!(r.cliff_flag.is_some());

    let fresh = engine().analyze_thread_at(&thread, NOW - 128.0 * HOUR);
    assert_eq!(fresh.cooling_decay, 0);
    assert_eq!(r.score, fresh.score - r.cooling_decay);
}

#[test]
fn test_happy_but_exploring_is_contradictory() {
    let e = engine();
    let hedged = e.analyze_thread_at(
        &single("We're happy with our current setup but exploring alternatives."),
        NOW,
    );
    let plain = e.analyze_thread_at(&single("We're exploring alternatives."), NOW);

    assert!(hedged.signals.is_contradictory);
    assert!(!plain.signals.is_contradictory);

    let (h, p) = (&hedged.score_breakdown, &plain.score_breakdown);
    assert!(h.competitor_switch_bonus < p.competitor_switch_bonus);
    assert!(h.evaluative_depth < p.evaluative_depth);
    assert!(h.content_richness < p.content_richness);
}

// =============================================================================
// PROPERTIES
// =============================================================================

#[test]
fn test_score_always_bounded() {
    let long = "We need this now. ".repeat(400);
    let inputs = [
        "",
        "   ",
        "?????????????????????",
        "🚀🚀🚀 $$$ !!!",
        "Send the contract, we're ready to sign. Budget approved. Legal approved. Where do I sign?",
        long.as_str(),
    ];
    let e = engine();
    for text in inputs {
        let r = e.analyze_thread_at(&single(text), NOW);
        assert!(r.score <= 100, "{:?} scored {}", text, r.score);
    }
}

#[test]
fn test_analysis_is_idempotent() {
    let thread = vec![
        Message::lead("We're losing deals. What does onboarding involve?", NOW - 50.0 * HOUR),
        Message::agent("Two weeks, usually.", NOW - 49.0 * HOUR),
        Message::lead("What about pricing for 30 reps?", NOW - 48.5 * HOUR),
    ];
    let e = engine();
    let first = e.analyze_thread_at(&thread, NOW);
    let second = e.analyze_thread_at(&thread, NOW);
    assert_eq!(first, second);
}

#[test]
fn test_single_reply_never_above_ceiling() {
    let text = "We're drowning in manual work, scaling fast and losing deals to churn. \
                We currently use Outreach but are evaluating other vendors. How does the API integration work? \
                What is the pricing for 50 seats? Our CTO and finance team need a proposal this week, budget is allocated. \
                Can we start a pilot tomorrow?";
    let r = engine().analyze_thread_at(&single(text), NOW);
    assert!(r.score <= 90, "score {}", r.score);
}

#[test]
fn test_negated_switch_not_counted() {
    let r = engine().analyze_thread_at(&single("We're not looking to switch from Apollo"), NOW);
    assert_eq!(r.signals.competitor, 0);
    assert_eq!(r.score_breakdown.competitor_switch_bonus, 0);
}

#[test]
fn test_disengagement_overrides_earlier_interest() {
    let thread = vec![
        Message::lead(
            "We're drowning in manual prospecting. How does the API integration work?",
            NOW - 3.0 * HOUR,
        ),
        Message::agent("Happy to walk you through it.", NOW - 2.0 * HOUR),
        Message::lead("Thanks. Let's revisit next quarter, we have other priorities.", NOW - HOUR),
    ];
    let r = engine().analyze_thread_at(&thread, NOW);
    assert!(r.signals.is_disengaging);
    assert_eq!(r.state, LeadState::Noise);
    assert_eq!(r.action, Action::DoNotRespond);
    assert_eq!(r.momentum, Momentum::Cooling);
}

#[test]
fn test_contract_language_floors_score() {
    let r = engine().analyze_thread_at(&single("Send the contract, we're ready to sign."), NOW);
    assert!(r.score >= 85, "score {}", r.score);
    assert_eq!(r.state, LeadState::ReadyNow);
    assert!(!r.explanation.is_empty());
}

#[test]
fn test_decay_never_raises_score() {
    let thread = vec![Message::lead(
        "We're drowning in manual reporting. How does the API integration work? What's the pricing for 20 seats?",
        NOW,
    )];
    let e = engine();
    let scores: Vec<u32> = [1.0, 30.0, 50.0, 100.0, 130.0, 200.0]
        .iter()
        .map(|h| e.analyze_thread_at(&thread, NOW + h * HOUR).score)
        .collect();
    for pair in scores.windows(2) {
        assert!(pair[1] <= pair[0], "scores rose: {:?}", scores);
    }
    assert!(scores[5] < scores[0]);
}

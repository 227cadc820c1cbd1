//! Inputs built to fool a keyword counter

use replyscore::config::EngineConfig;
use replyscore::core::IntentEngine;
use replyscore::types::{LeadState, Message, Sender, TerminalKind};

const NOW: f64 = 1_700_000_000.0;
const HOUR: f64 = 3600.0;

fn analyze(text: &str) -> replyscore::types::AnalysisResult {
    IntentEngine::with_defaults()
        .unwrap()
        .analyze_thread_at(&[Message::lead(text, NOW)], NOW)
}

#[test]
fn test_buzzwords_without_numbers_are_jargon() {
    let r = analyze("We need a scalable, holistic framework to operationalize synergy across our ecosystem.");
    assert!(r.signals.is_jargon);

    let concrete = analyze(
        "We need a scalable, holistic framework to operationalize synergy across our ecosystem for 40 reps.",
    );
    assert!(!concrete.signals.is_jargon);
}

#[test]
fn test_sarcasm_penalized() {
    let r = analyze("Oh yeah, totally going to buy this lol");
    assert!(r.signals.is_sarcastic);
    assert_eq!(r.score_breakdown.sarcasm_penalty, -20);
    assert_eq!(r.state, LeadState::Noise);
}

#[test]
fn test_budget_next_quarter_is_not_a_brush_off() {
    let r = analyze("We'll have budget next quarter for this.");
    assert!(!r.signals.is_disengaging);
    assert!(r.signals.budget > 0);
}

#[test]
fn test_polite_close_only_disengages_without_a_meeting() {
    assert!(analyze("Appreciate your time.").signals.is_disengaging);
    assert!(!analyze("Appreciate your time, let's schedule a demo call.").signals.is_disengaging);
}

#[test]
fn test_disengagement_checked_on_last_reply_only() {
    let thread = vec![
        Message::lead("Maybe later.", NOW - 2.0 * HOUR),
        Message::lead("Actually, how does the API integration work?", NOW - HOUR),
    ];
    let r = IntentEngine::with_defaults().unwrap().analyze_thread_at(&thread, NOW);
    assert!(!r.signals.is_disengaging);
}

#[test]
fn test_no_plans_to_switch() {
    let r = analyze("We have no plans to switch vendors.");
    assert_eq!(r.signals.competitor, 0);
}

#[test]
fn test_degenerate_messages_do_not_panic() {
    let thread = vec![
        Message { sender: None, body: "orphan".into(), timestamp: None },
        Message { sender: Some(Sender::Other), body: "bot".into(), timestamp: Some(NOW) },
        Message { sender: Some(Sender::Lead), body: String::new(), timestamp: None },
        Message::lead("😂😂😂", NOW),
    ];
    let r = IntentEngine::with_defaults().unwrap().analyze_thread_at(&thread, NOW);
    assert!(r.score <= 100);
    assert_eq!(r.signals.lead_message_count, 2);
}

#[test]
fn test_agent_only_thread_is_noise() {
    let thread = vec![
        Message::agent("Following up on my last note.", NOW - HOUR),
        Message::agent("Bumping this to the top of your inbox.", NOW),
    ];
    let r = IntentEngine::with_defaults().unwrap().analyze_thread_at(&thread, NOW);
    assert_eq!(r.state, LeadState::Noise);
    assert_eq!(r.metrics.depth, 0);
}

#[test]
fn test_terminal_noise_beats_ready_in_triage() {
    let engine = IntentEngine::new(EngineConfig::triage()).unwrap();
    let r = engine.analyze_thread_at(
        &[Message::lead("Budget approved elsewhere, but we're not interested in this one.", NOW)],
        NOW,
    );
    let terminal = r.terminal.unwrap();
    assert_eq!(terminal.kind, TerminalKind::Noise);
    assert_eq!(r.state, LeadState::Noise);
}

#[test]
fn test_terminal_ready_in_triage() {
    let engine = IntentEngine::new(EngineConfig::triage()).unwrap();
    let r = engine.analyze_thread_at(&[Message::lead("Sounds good, let's talk Thursday at 2pm.", NOW)], NOW);
    assert_eq!(r.terminal.unwrap().kind, TerminalKind::Ready);
    assert_eq!(r.state, LeadState::ReadyNow);
}

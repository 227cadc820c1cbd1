//! Signal extractor: scans lead-authored text for buying signals
//!
//! Category counts are the number of distinct patterns that hit, so a
//! category is bounded by the length of its pattern list. Competitor, pain
//! and implementation are matched against a negation-stripped copy of the
//! text so "not looking to switch" does not read as a switch.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::patterns::{any_match, count_distinct, PatternSet};
use crate::types::{combined_lead_text, lead_messages, Category, Message, Signals};

lazy_static! {
    // =========================================================================
    // Structure checks for spam: real sentences have verbs and pronouns
    // =========================================================================
    static ref RE_VERBS: Regex = Regex::new(
        r"\b(is|are|was|were|have|has|had|do|does|did|will|would|could|can|should|need|want|like|use|using|looking|trying|think|know|see|get|make|take|give|help|work|run|go|come|tell|ask|seem|feel|keep|let|begin|show|hear|play|move|live|believe)\b"
    ).unwrap();

    static ref RE_PUNCTUATION: Regex = Regex::new(r"[.!?]").unwrap();

    static ref RE_PRONOUNS: Regex = Regex::new(r"\b(we|our|i|my|you|your)\b").unwrap();

    // =========================================================================
    // Concrete detail: a number with a unit. Jargon without one is fluff.
    // =========================================================================
    static ref RE_CONCRETE: Regex = Regex::new(
        r"\d+\s*(?:reps?|sdrs?|seats?|users?|people|%|hours?|mins?|days?|weeks?|months?|\$|k\b)"
    ).unwrap();

    // =========================================================================
    // Budget talk turns "next quarter" into timeline, not a brush-off
    // =========================================================================
    static ref RE_FINANCIAL: Regex = Regex::new(r"\b(?:budgets?|fiscal|funding)\b").unwrap();
}

// Spam thresholds: hits per word and absolute hits
const SPAM_HARD_DENSITY: f64 = 0.4;
const SPAM_SOFT_DENSITY: f64 = 0.3;
const SPAM_MIN_HITS: u32 = 8;
const SPAM_LIST_HITS: u32 = 12;
const SPAM_LIST_MAX_WORDS: usize = 30;

const JARGON_MIN_HITS: u32 = 2;

// Sarcasm: a single marker only counts in a short reply
const SARCASM_SHORT_WORDS: usize = 25;

/// Signal extractor over a compiled pattern set
#[derive(Debug, Clone)]
pub struct SignalExtractor {
    patterns: PatternSet,
}

impl SignalExtractor {
    pub fn new(patterns: PatternSet) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Extract every signal from the lead messages of a thread
    pub fn extract(&self, thread: &[Message]) -> Signals {
        let leads: Vec<&Message> = lead_messages(thread).collect();
        let combined = combined_lead_text(leads.iter().copied());
        let negated = self.patterns.strip_negations(&combined);

        let mut signals = Signals::zero();
        for category in Category::ALL {
            let text = if category.uses_negated_text() { &negated } else { &combined };
            signals.set_count(category, count_distinct(self.patterns.category(category), text));
        }

        let total_words = combined.split_whitespace().count();
        signals.word_count = total_words;
        signals.question_count = combined.matches('?').count();
        signals.lead_message_count = leads.len();
        signals.avg_words_per_reply = if leads.is_empty() {
            0.0
        } else {
            leads.iter().map(|m| m.word_count()).sum::<usize>() as f64 / leads.len() as f64
        };

        let single_reply = leads.len() <= 1;

        // Keyword stuffing
        let hits = signals.total_category_hits();
        let density = hits as f64 / total_words.max(1) as f64;
        signals.keyword_density = (density * 1000.0).round_ties_even() / 1000.0;
        signals.is_keyword_spam = single_reply && is_stuffed(&combined, hits, density, total_words);

        // Buzzwords with nothing concrete behind them
        let jargon_hits = count_distinct(&self.patterns.jargon, &combined);
        signals.is_jargon = jargon_hits >= JARGON_MIN_HITS
            && !RE_CONCRETE.is_match(&combined)
            && single_reply
            && !signals.is_keyword_spam;

        // Only the latest reply decides disengagement
        let last = leads.last().map(|m| m.body.to_lowercase()).unwrap_or_default();
        signals.is_disengaging = self.patterns.is_disengaging(&last) && !is_financial_context(&last);

        let sarcasm_hits = count_distinct(&self.patterns.sarcasm, &combined) as usize;
        signals.is_sarcastic =
            sarcasm_hits >= 2 || (sarcasm_hits >= 1 && total_words < SARCASM_SHORT_WORDS);

        signals.has_pilot_intent = any_match(&self.patterns.pilot, &combined);
        signals.has_fast_action = any_match(&self.patterns.fast_action, &combined);

        // "happy with X but exploring Y"
        signals.is_contradictory = any_match(&self.patterns.contradiction_positive, &combined)
            && any_match(&self.patterns.contradiction_pivot, &combined);

        signals.has_closing_intent = any_match(&self.patterns.closing, &combined);

        signals
    }
}

fn is_stuffed(text: &str, hits: u32, density: f64, words: usize) -> bool {
    if density > SPAM_HARD_DENSITY && hits >= SPAM_MIN_HITS {
        return true;
    }
    let has_verbs = RE_VERBS.is_match(text);
    let has_sentences = RE_PUNCTUATION.is_match(text) || RE_PRONOUNS.is_match(text);
    if density > SPAM_SOFT_DENSITY && hits >= SPAM_MIN_HITS && (!has_verbs || !has_sentences) {
        return true;
    }
    density > SPAM_SOFT_DENSITY && hits >= SPAM_LIST_HITS && words < SPAM_LIST_MAX_WORDS
}

fn is_financial_context(text: &str) -> bool {
    (text.contains("quarter") || text.contains("year")) && RE_FINANCIAL.is_match(text)
}

// =============================================================================
// TESTS
// =============================================================================

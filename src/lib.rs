//! replyscore: buying-intent scoring for inbound sales-lead replies
//!
//! Pipeline: thread → extractor → metrics → composer → classifier →
//! momentum/decay → explanation → `AnalysisResult`.
//!
//! The engine itself is pure. Persistence and transport live in
//! `core::store`, `core::desk` and `core::api`.

pub mod config;
pub mod core;
pub mod types;

// =============================================================================
// TIER THRESHOLDS [C] - five-tier intent scheme
// =============================================================================

/// Highest score still classified as Noise
pub const NOISE_MAX: u32 = 30;

/// Light Interest band: 31-50
pub const LIGHT_INTEREST_MIN: u32 = 31;

/// Evaluating band: 51-70
pub const EVALUATING_MIN: u32 = 51;

/// High Intent band: 71-84
pub const HIGH_INTENT_MIN: u32 = 71;

/// Ready Now: 85+, also the closing-intent floor
pub const READY_NOW_MIN: u32 = 85;

// =============================================================================
// TRIAGE THRESHOLDS [C] - four-tier scheme
// =============================================================================

/// Lowest score for Right ICP / Wrong Timing
pub const TRIAGE_RIGHT_ICP_MIN: u32 = 31;

/// Replies with at most this many words are Noise in the triage scheme
pub const TRIAGE_SHORT_REPLY_MAX_WORDS: usize = 2;

// =============================================================================
// GLOBAL CAPS [C]
// =============================================================================

/// Single-reply threads never exceed this, leaving headroom for multi-turn buyers
pub const SINGLE_REPLY_CEILING: u32 = 90;

/// Keyword-stuffed threads never exceed this
pub const SPAM_CEILING: u32 = 15;

// =============================================================================
// MOMENTUM & DECAY [C]
// =============================================================================

/// Half-over-half growth needed to call a thread Rising (or Cooling)
pub const MOMENTUM_RATIO: f64 = 1.3;

/// Hours of lead silence after which momentum is forced to Cooling
pub const STALE_AFTER_HOURS: f64 = 48.0;

/// Days since the newest message before the engagement cliff flag fires
pub const CLIFF_AFTER_DAYS: f64 = 3.0;

/// Cooling decay bands: (staleness strictly above hours, fraction removed)
pub const DECAY_BANDS: [(f64, f64); 4] = [(120.0, 0.35), (96.0, 0.25), (48.0, 0.15), (24.0, 0.05)];

// =============================================================================
// DESK [C]
// =============================================================================

/// Score delta that raises an intent jump alert
pub const INTENT_JUMP_DELTA: i64 = 20;

/// Same-action recommendations inside this window are suppressed
pub const RECOMMENDATION_WINDOW_SECS: f64 = 48.0 * 3600.0;

/// Webhook retries with identical body inside this window are ignored
pub const DUPLICATE_WINDOW_SECS: f64 = 300.0;

/// How many trailing messages the duplicate check looks at
pub const DUPLICATE_LOOKBACK: usize = 5;

/// Leads untouched for longer than this are re-scored on read
pub const LAZY_RESCORE_AFTER_SECS: f64 = 4.0 * 3600.0;

/// Leads at or above this score count toward response-time SLA
pub const SLA_SCORE_MIN: u32 = 60;

/// Agent reply within this many minutes meets the SLA
pub const SLA_RESPONSE_MINUTES: f64 = 30.0;

/// Minutes of triage saved per lead reply filtered to Noise
pub const MINUTES_SAVED_PER_NOISE_REPLY: usize = 5;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";

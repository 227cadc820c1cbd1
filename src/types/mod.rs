//! Core types for replyscore

mod breakdown;
mod error;
mod lead;
mod message;
mod metrics;
mod output;
mod reason;
mod signals;
mod state;

pub use breakdown::{Component, ScoreBreakdown};
pub use error::{ConfigError, StoreError};
pub use lead::{
    DisagreeDirection, Disagreement, IngestOutcome, IngestStatus, IntentJump, LeadComparison,
    DeskStats, LeadRecord, LeadRow, LeadSummary, Outcome, RankedLeads, Recommendation, Section,
    SlaCounts,
};
pub use message::{
    combined_lead_text, gaps, lead_messages, sorted_timestamps, Message, Sender, SECS_PER_HOUR,
};
pub use metrics::Metrics;
pub use output::{AnalysisResult, CliffFlag, TerminalKind, TerminalMatch, Tiebreaker};
pub use reason::{Reason, SignalContribution};
pub use signals::{Category, Signals};
pub use state::{Action, LeadState, Momentum};

//! Message model for reply threads
//!
//! - Message = one email in a thread, authored by the lead or by our agent
//! - Thread = ordered slice of messages for one lead, owned by the caller
//!
//! Every field is optional on the wire. A message without a sender is never
//! counted as a lead reply, and one without a timestamp is left out of every
//! timing calculation.

use serde::{Deserialize, Serialize};

/// Seconds per hour, used by every timing calculation
pub const SECS_PER_HOUR: f64 = 3600.0;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The prospect
    Lead,
    /// Our side of the conversation
    Agent,
    /// Anything else the caller sent
    #[serde(other)]
    Other,
}

/// A single email in a thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub sender: Option<Sender>,
    #[serde(default)]
    pub body: String,
    /// Unix epoch seconds
    #[serde(default)]
    pub timestamp: Option<f64>,
}

impl Message {
    /// Create a message with every field present
    pub fn new(sender: Sender, body: impl Into<String>, timestamp: f64) -> Self {
        Self {
            sender: Some(sender),
            body: body.into(),
            timestamp: Some(timestamp),
        }
    }

    /// Reply from the lead
    pub fn lead(body: impl Into<String>, timestamp: f64) -> Self {
        Self::new(Sender::Lead, body, timestamp)
    }

    /// Message from our agent
    pub fn agent(body: impl Into<String>, timestamp: f64) -> Self {
        Self::new(Sender::Agent, body, timestamp)
    }

    pub fn is_lead(&self) -> bool {
        self.sender == Some(Sender::Lead)
    }

    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }
}

/// Lead-authored messages, in thread order
pub fn lead_messages(thread: &[Message]) -> impl Iterator<Item = &Message> {
    thread.iter().filter(|m| m.is_lead())
}

/// Lowercased lead bodies joined by a single space
pub fn combined_lead_text<'a>(messages: impl IntoIterator<Item = &'a Message>) -> String {
    messages
        .into_iter()
        .map(|m| m.body.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sorted timestamps of the given messages, skipping any without one
pub fn sorted_timestamps<'a>(messages: impl IntoIterator<Item = &'a Message>) -> Vec<f64> {
    let mut ts: Vec<f64> = messages.into_iter().filter_map(|m| m.timestamp).collect();
    ts.sort_by(|a, b| a.total_cmp(b));
    ts
}

/// Gaps between consecutive sorted timestamps, in seconds
pub fn gaps(sorted: &[f64]) -> Vec<f64> {
    sorted.windows(2).map(|w| w[1] - w[0]).collect()
}

// =============================================================================
// TESTS
// =============================================================================

//! Per-lead records kept by the decision desk

use serde::{Deserialize, Serialize};

use crate::types::{
    Action, AnalysisResult, CliffFlag, LeadState, Message, Metrics, Momentum, Sender,
    SignalContribution, Signals, Tiebreaker,
};

/// Score rose sharply on a lead reply
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentJump {
    pub from: u32,
    pub to: u32,
    pub delta: i64,
    pub timestamp: f64,
}

/// An action handed to the sales team
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: Action,
    pub timestamp: f64,
}

/// SDR-reported result of working the lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Meeting,
    NoMeeting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisagreeDirection {
    Higher,
    Lower,
}

/// SDR thinks the score should be different
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disagreement {
    pub direction: DisagreeDirection,
    pub reason: Option<String>,
    pub timestamp: f64,
    pub score_at_time: u32,
}

/// Everything remembered about one lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: String,
    pub thread: Vec<Message>,
    pub score: u32,
    pub state: LeadState,
    pub action: Action,
    pub momentum: Momentum,
    pub explanation: Vec<String>,
    pub full_explanation: Vec<SignalContribution>,
    pub cliff_flag: Option<CliffFlag>,
    pub tiebreaker: Tiebreaker,
    pub signals: Signals,
    pub metrics: Metrics,
    pub last_updated: f64,
    pub score_history: Vec<u32>,
    pub intent_jump_alert: Option<IntentJump>,
    /// Seconds between a lead reply and the agent's answer
    pub response_times: Vec<f64>,
    pub avg_response_time_min: Option<f64>,
    pub last_lead_reply_at: Option<f64>,
    pub last_recommendation: Option<Recommendation>,
    pub outcome: Option<Outcome>,
    pub disagreements: Vec<Disagreement>,
}

impl LeadRecord {
    pub fn new(id: &str, now: f64) -> Self {
        Self {
            id: id.to_string(),
            thread: Vec::new(),
            score: 0,
            state: LeadState::Noise,
            action: Action::DoNotRespond,
            momentum: Momentum::Stable,
            explanation: Vec::new(),
            full_explanation: Vec::new(),
            cliff_flag: None,
            tiebreaker: Tiebreaker::default(),
            signals: Signals::zero(),
            metrics: Metrics::default(),
            last_updated: now,
            score_history: Vec::new(),
            intent_jump_alert: None,
            response_times: Vec::new(),
            avg_response_time_min: None,
            last_lead_reply_at: None,
            last_recommendation: None,
            outcome: None,
            disagreements: Vec::new(),
        }
    }

    /// Copy the engine output onto the record
    pub fn apply(&mut self, result: &AnalysisResult, now: f64) {
        self.score = result.score;
        self.state = result.state;
        self.action = result.action;
        self.momentum = result.momentum;
        self.explanation = result.explanation.clone();
        self.full_explanation = result.full_explanation.clone();
        self.cliff_flag = result.cliff_flag;
        self.tiebreaker = result.tiebreaker;
        self.signals = result.signals.clone();
        self.metrics = result.metrics.clone();
        self.last_updated = now;
    }

    /// Identical body and sender among the last few messages, close in time
    pub fn is_duplicate(&self, message: &Message, lookback: usize, window_secs: f64) -> bool {
        let start = self.thread.len().saturating_sub(lookback);
        self.thread[start..].iter().any(|m| {
            m.body == message.body
                && m.sender == message.sender
                && match (m.timestamp, message.timestamp) {
                    (Some(a), Some(b)) => (a - b).abs() < window_secs,
                    _ => false,
                }
        })
    }

    /// Track agent response time against the pending lead reply
    pub fn track_response_time(&mut self, sender: Option<Sender>, timestamp: f64) {
        match sender {
            Some(Sender::Agent) => {
                if let Some(lead_at) = self.last_lead_reply_at.take() {
                    let gap = timestamp - lead_at;
                    if gap > 0.0 {
                        self.response_times.push(gap);
                        let avg = self.response_times.iter().sum::<f64>()
                            / self.response_times.len() as f64;
                        self.avg_response_time_min = Some((avg / 60.0 * 10.0).round() / 10.0);
                    }
                }
            }
            Some(Sender::Lead) => self.last_lead_reply_at = Some(timestamp),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStatus {
    Scored,
    IgnoredDuplicate,
}

/// What happened when a message reached the desk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestOutcome {
    pub status: IngestStatus,
    pub analysis: Option<AnalysisResult>,
    pub intent_jump: Option<IntentJump>,
    /// None when the same action was recommended recently
    pub recommendation: Option<Action>,
    pub persisted: bool,
}

impl IngestOutcome {
    pub fn duplicate() -> Self {
        Self {
            status: IngestStatus::IgnoredDuplicate,
            analysis: None,
            intent_jump: None,
            recommendation: None,
            persisted: false,
        }
    }
}

/// Input row for lead comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSummary {
    pub id: String,
    pub score: u32,
    pub signals: Signals,
    pub metrics: Metrics,
}

impl LeadSummary {
    pub fn from_record(record: &LeadRecord) -> Self {
        Self {
            id: record.id.clone(),
            score: record.score,
            signals: record.signals.clone(),
            metrics: record.metrics.clone(),
        }
    }
}

/// Why one lead outranks the next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadComparison {
    pub higher: String,
    pub lower: String,
    pub reasons: Vec<String>,
}

// =============================================================================
// RANKED VIEW
// =============================================================================

/// One lead as shown in the ranked view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRow {
    pub id: String,
    pub score: u32,
    pub state: LeadState,
    pub momentum: Momentum,
    pub explanation: Vec<String>,
    pub cliff_flag: Option<CliffFlag>,
    pub tiebreaker: Tiebreaker,
    pub score_history: Vec<u32>,
    pub intent_jump_alert: Option<IntentJump>,
    pub avg_response_time_min: Option<f64>,
    pub outcome: Option<Outcome>,
    /// Timestamp of the newest message
    pub last_reply: Option<f64>,
    pub lead_replies: usize,
}

impl LeadRow {
    pub fn from_record(record: &LeadRecord) -> Self {
        Self {
            id: record.id.clone(),
            score: record.score,
            state: record.state,
            momentum: record.momentum,
            explanation: record.explanation.clone(),
            cliff_flag: record.cliff_flag,
            tiebreaker: record.tiebreaker,
            score_history: record.score_history.clone(),
            intent_jump_alert: record.intent_jump_alert,
            avg_response_time_min: record.avg_response_time_min,
            outcome: record.outcome,
            last_reply: record.thread.last().and_then(|m| m.timestamp),
            lead_replies: record.thread.iter().filter(|m| m.is_lead()).count(),
        }
    }
}

/// Leads in view columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    ReadyNow,
    Evaluating,
    Curious,
    Noise,
}

impl Section {
    pub fn for_state(state: LeadState) -> Self {
        match state {
            LeadState::ReadyNow => Section::ReadyNow,
            LeadState::HighIntent | LeadState::Evaluating | LeadState::RightIcpWrongTiming => {
                Section::Evaluating
            }
            LeadState::LightInterest => Section::Curious,
            LeadState::Noise | LeadState::Deprioritize => Section::Noise,
        }
    }
}

/// Agent response times on leads scoring at least the SLA floor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaCounts {
    pub responded_under_30m: usize,
    pub responded_over_30m: usize,
    pub no_response_yet: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskStats {
    pub total_replies: usize,
    pub ready_count: usize,
    pub evaluating_count: usize,
    /// Five minutes per lead reply that landed in Noise
    pub time_saved_minutes: usize,
}

/// Every stored lead, grouped and ordered for the sales team
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedLeads {
    /// Ordered by tiebreaker
    pub ready_now: Vec<LeadRow>,
    /// Score descending
    pub evaluating: Vec<LeadRow>,
    /// Score descending
    pub curious: Vec<LeadRow>,
    /// Score ascending
    pub noise: Vec<LeadRow>,
    /// Why each Ready Now lead outranks the next
    pub comparative: Vec<LeadComparison>,
    pub stats: DeskStats,
    pub sla: SlaCounts,
}

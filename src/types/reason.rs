//! Reason codes surfaced in explanations
//!
//! R1xx: pain, R2xx: evaluation, R3xx: constraints, R4xx: engagement,
//! R5xx: penalties, R6xx: bonuses

use serde::{Deserialize, Serialize};

/// One human-readable reason a thread scored the way it did
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Reason {
    // =========================================================================
    // R1xx: Business pain
    // =========================================================================
    /// Two or more distinct pain patterns
    BusinessPain { signals: u32 },
    /// Exactly one pain pattern
    OperationalPain,

    // =========================================================================
    // R2xx: Evaluation
    // =========================================================================
    SpecificQuestions { count: usize },
    DirectQuestion,
    Implementation,
    Competitors,
    ProblemDescribed,

    // =========================================================================
    // R3xx: Constraints
    // =========================================================================
    Budget,
    Timeline,
    Pricing,
    Stakeholder,

    // =========================================================================
    // R4xx: Engagement
    // =========================================================================
    Exchanges { depth: usize },
    Responsive { hours: f64 },

    // =========================================================================
    // R5xx: Penalties
    // =========================================================================
    ShallowReplies,
    KeywordSpam,
    Disengaging,
    Sarcasm,

    // =========================================================================
    // R6xx: Bonuses
    // =========================================================================
    VendorEvaluation,
    ClosingRequested,
}

impl Reason {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::BusinessPain { .. } => "R101_BUSINESS_PAIN",
            Self::OperationalPain => "R102_OPERATIONAL_PAIN",
            Self::SpecificQuestions { .. } => "R201_SPECIFIC_QUESTIONS",
            Self::DirectQuestion => "R202_DIRECT_QUESTION",
            Self::Implementation => "R203_IMPLEMENTATION",
            Self::Competitors => "R204_COMPETITORS",
            Self::ProblemDescribed => "R205_PROBLEM_DESCRIBED",
            Self::Budget => "R301_BUDGET",
            Self::Timeline => "R302_TIMELINE",
            Self::Pricing => "R303_PRICING",
            Self::Stakeholder => "R304_STAKEHOLDER",
            Self::Exchanges { .. } => "R401_EXCHANGES",
            Self::Responsive { .. } => "R402_RESPONSIVE",
            Self::ShallowReplies => "R501_SHALLOW",
            Self::KeywordSpam => "R502_KEYWORD_SPAM",
            Self::Disengaging => "R503_DISENGAGING",
            Self::Sarcasm => "R504_SARCASM",
            Self::VendorEvaluation => "R601_VENDOR_EVALUATION",
            Self::ClosingRequested => "R602_CLOSING_REQUESTED",
        }
    }

    /// Get human-readable label
    pub fn label(&self) -> String {
        match self {
            Self::BusinessPain { signals } => format!("Articulated business pain ({} signals)", signals),
            Self::OperationalPain => "Expressed operational pain".to_string(),
            Self::SpecificQuestions { count } => format!("Asked {} specific questions", count),
            Self::DirectQuestion => "Asked a direct question".to_string(),
            Self::Implementation => "Discussed implementation details".to_string(),
            Self::Competitors => "Comparing with competitors".to_string(),
            Self::ProblemDescribed => "Described specific problem".to_string(),
            Self::Budget => "Mentioned budget".to_string(),
            Self::Timeline => "Mentioned timeline".to_string(),
            Self::Pricing => "Asked about pricing".to_string(),
            Self::Stakeholder => "Referenced stakeholder".to_string(),
            Self::Exchanges { depth } => format!("{} back-and-forth exchanges", depth),
            Self::Responsive { hours } => format!("Responsive ({:.0}h avg)", hours),
            Self::ShallowReplies => "Shallow replies detected".to_string(),
            Self::KeywordSpam => "Keyword spam detected, score penalized".to_string(),
            Self::Disengaging => "Lead disengaging: revisit later / other priorities".to_string(),
            Self::Sarcasm => "Sarcastic tone detected, signals discounted".to_string(),
            Self::VendorEvaluation => "Active vendor evaluation with pilot intent and timeline".to_string(),
            Self::ClosingRequested => "Contract or closing requested".to_string(),
        }
    }

    /// Pinned reasons are always shown, whatever their rank
    pub fn is_pinned(&self) -> bool {
        matches!(
            self,
            Self::BusinessPain { .. }
                | Self::OperationalPain
                | Self::Competitors
                | Self::Implementation
                | Self::KeywordSpam
                | Self::Disengaging
                | Self::Sarcasm
        )
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.label())
    }
}

/// One fired signal and its literal point contribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalContribution {
    pub signal: String,
    pub detail: String,
    pub contribution: i32,
}

impl SignalContribution {
    pub fn new(signal: &str, detail: impl Into<String>, contribution: i32) -> Self {
        Self {
            signal: signal.to_string(),
            detail: detail.into(),
            contribution,
        }
    }
}

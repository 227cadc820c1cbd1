//! Analysis result and its display forms

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::types::{
    Action, LeadState, Metrics, Momentum, ScoreBreakdown, SignalContribution, Signals,
};

/// Secondary ordering keys for leads sharing a tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tiebreaker {
    pub eval_signals: u32,
    pub constraint_count: u32,
    pub timeline_urgency: u32,
    pub velocity_hours: f64,
}

impl Default for Tiebreaker {
    fn default() -> Self {
        Self {
            eval_signals: 0,
            constraint_count: 0,
            timeline_urgency: 0,
            velocity_hours: 999.0,
        }
    }
}

impl Tiebreaker {
    pub fn from_metrics(metrics: &Metrics) -> Self {
        Self {
            eval_signals: metrics.eval_signals,
            constraint_count: metrics.constraint_count,
            timeline_urgency: metrics.timeline_urgency,
            velocity_hours: metrics.velocity_hours,
        }
    }

    /// Descending priority: more signals first, then faster replies
    pub fn cmp_priority(&self, other: &Self) -> std::cmp::Ordering {
        other
            .eval_signals
            .cmp(&self.eval_signals)
            .then(other.constraint_count.cmp(&self.constraint_count))
            .then(other.timeline_urgency.cmp(&self.timeline_urgency))
            .then(self.velocity_hours.total_cmp(&other.velocity_hours))
    }
}

/// Thread went quiet after real engagement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CliffFlag {
    #[serde(rename = "Paused or Internal Blocker")]
    PausedOrInternalBlocker,
}

impl std::fmt::Display for CliffFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliffFlag::PausedOrInternalBlocker => write!(f, "Paused or Internal Blocker"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalKind {
    Ready,
    Noise,
}

/// A terminal phrase found in the last lead message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalMatch {
    pub kind: TerminalKind,
    pub pattern: String,
    /// Whether the match changed the tier
    pub applied: bool,
}

/// Complete engine output for one thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u32,
    pub score_breakdown: ScoreBreakdown,
    pub state: LeadState,
    pub action: Action,
    pub explanation: Vec<String>,
    pub full_explanation: Vec<SignalContribution>,
    pub signals: Signals,
    pub metrics: Metrics,
    pub cliff_flag: Option<CliffFlag>,
    pub momentum: Momentum,
    pub tiebreaker: Tiebreaker,
    pub cooling_decay: u32,
    pub terminal: Option<TerminalMatch>,
}

impl Default for AnalysisResult {
    /// Result for an empty thread
    fn default() -> Self {
        Self {
            score: 0,
            score_breakdown: ScoreBreakdown::default(),
            state: LeadState::Noise,
            action: LeadState::Noise.action(),
            explanation: Vec::new(),
            full_explanation: Vec::new(),
            signals: Signals::zero(),
            metrics: Metrics::default(),
            cliff_flag: None,
            momentum: Momentum::Stable,
            tiebreaker: Tiebreaker::default(),
            cooling_decay: 0,
            terminal: None,
        }
    }
}

impl AnalysisResult {
    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let headline = format!(
            "{} score={} | state={} | action={} | momentum={} {}",
            self.state.emoji(),
            self.score,
            self.state,
            self.action,
            self.momentum.arrow(),
            self.momentum
        );
        let mut out = headline.color(self.state.color()).bold().to_string();
        if self.cooling_decay > 0 {
            out.push_str(&format!(" (decay -{})", self.cooling_decay).dimmed().to_string());
        }
        if let Some(flag) = self.cliff_flag {
            out.push_str(&format!("\n  ⚠ {}", flag).yellow().to_string());
        }
        for reason in &self.explanation {
            out.push_str(&format!("\n  • {}", reason));
        }
        out
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "score={} | state={} | action={} | momentum={} | decay={} | reasons={}",
            self.score,
            self.state,
            self.action,
            self.momentum,
            self.cooling_decay,
            self.explanation.join("; ")
        )
    }
}

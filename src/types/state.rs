//! Tier, action and momentum definitions

use colored::Color;
use serde::{Deserialize, Serialize};

/// Priority tier of a thread.
///
/// The intent scheme uses Noise, Light Interest, Evaluating, High Intent and
/// Ready Now. The triage scheme uses Noise, Right ICP / Wrong Timing,
/// Ready Now and Deprioritize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadState {
    #[serde(rename = "Noise")]
    Noise,
    #[serde(rename = "Light Interest")]
    LightInterest,
    #[serde(rename = "Evaluating")]
    Evaluating,
    #[serde(rename = "High Intent")]
    HighIntent,
    #[serde(rename = "Ready Now")]
    ReadyNow,
    #[serde(rename = "Right ICP / Wrong Timing")]
    RightIcpWrongTiming,
    #[serde(rename = "Deprioritize")]
    Deprioritize,
}

impl LeadState {
    /// What the sales team should do with a thread in this tier
    pub fn action(&self) -> Action {
        match self {
            LeadState::ReadyNow | LeadState::HighIntent => Action::RespondNow,
            LeadState::Evaluating | LeadState::LightInterest | LeadState::RightIcpWrongTiming => {
                Action::RespondLater
            }
            LeadState::Noise | LeadState::Deprioritize => Action::DoNotRespond,
        }
    }

    /// Lowest-priority tiers are never lazily re-scored
    pub fn is_active(&self) -> bool {
        self.action() != Action::DoNotRespond
    }

    pub fn name(&self) -> &'static str {
        match self {
            LeadState::Noise => "Noise",
            LeadState::LightInterest => "Light Interest",
            LeadState::Evaluating => "Evaluating",
            LeadState::HighIntent => "High Intent",
            LeadState::ReadyNow => "Ready Now",
            LeadState::RightIcpWrongTiming => "Right ICP / Wrong Timing",
            LeadState::Deprioritize => "Deprioritize",
        }
    }

    /// Terminal color for display
    pub fn color(&self) -> Color {
        match self {
            LeadState::ReadyNow => Color::Green,
            LeadState::HighIntent => Color::BrightGreen,
            LeadState::Evaluating => Color::Yellow,
            LeadState::LightInterest | LeadState::RightIcpWrongTiming => Color::Cyan,
            LeadState::Noise | LeadState::Deprioritize => Color::BrightBlack,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LeadState::ReadyNow => "🔥",
            LeadState::HighIntent => "🟢",
            LeadState::Evaluating => "🔶",
            LeadState::LightInterest | LeadState::RightIcpWrongTiming => "🔹",
            LeadState::Noise | LeadState::Deprioritize => "⏳",
        }
    }
}

impl std::fmt::Display for LeadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Recommended response action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    RespondNow,
    RespondLater,
    #[serde(alias = "dont_respond")]
    DoNotRespond,
}

impl Action {
    pub fn code(&self) -> &'static str {
        match self {
            Action::RespondNow => "respond_now",
            Action::RespondLater => "respond_later",
            Action::DoNotRespond => "do_not_respond",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Trend of evaluative quality across the thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Momentum {
    Rising,
    Stable,
    Cooling,
}

impl Momentum {
    pub fn arrow(&self) -> &'static str {
        match self {
            Momentum::Rising => "↑",
            Momentum::Stable => "→",
            Momentum::Cooling => "↓",
        }
    }
}

impl std::fmt::Display for Momentum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Momentum::Rising => "Rising",
            Momentum::Stable => "Stable",
            Momentum::Cooling => "Cooling",
        };
        write!(f, "{}", name)
    }
}

//! Per-component score contributions

use serde::{Deserialize, Serialize};

/// Named score components, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    EvaluativeDepth,
    BusinessPain,
    CompetitorSwitchBonus,
    AnalyticalDepth,
    EngagementCompound,
    ConstraintXDepth,
    ContentRichness,
    Velocity,
    QuestionDensity,
    Consistency,
    ShallowPenalty,
    SpamPenalty,
    DisengagePenalty,
    SarcasmPenalty,
    VendorEvalBonus,
    ClosingBoost,
}

impl Component {
    pub const ALL: [Component; 16] = [
        Component::EvaluativeDepth,
        Component::BusinessPain,
        Component::CompetitorSwitchBonus,
        Component::AnalyticalDepth,
        Component::EngagementCompound,
        Component::ConstraintXDepth,
        Component::ContentRichness,
        Component::Velocity,
        Component::QuestionDensity,
        Component::Consistency,
        Component::ShallowPenalty,
        Component::SpamPenalty,
        Component::DisengagePenalty,
        Component::SarcasmPenalty,
        Component::VendorEvalBonus,
        Component::ClosingBoost,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Component::EvaluativeDepth => "evaluative_depth",
            Component::BusinessPain => "business_pain",
            Component::CompetitorSwitchBonus => "competitor_switch_bonus",
            Component::AnalyticalDepth => "analytical_depth",
            Component::EngagementCompound => "engagement_compound",
            Component::ConstraintXDepth => "constraint_x_depth",
            Component::ContentRichness => "content_richness",
            Component::Velocity => "velocity",
            Component::QuestionDensity => "question_density",
            Component::Consistency => "consistency",
            Component::ShallowPenalty => "shallow_penalty",
            Component::SpamPenalty => "spam_penalty",
            Component::DisengagePenalty => "disengage_penalty",
            Component::SarcasmPenalty => "sarcasm_penalty",
            Component::VendorEvalBonus => "vendor_eval_bonus",
            Component::ClosingBoost => "closing_boost",
        }
    }
}

/// Signed contribution of every component. The clamped sum is the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub evaluative_depth: i32,
    pub business_pain: i32,
    pub competitor_switch_bonus: i32,
    pub analytical_depth: i32,
    pub engagement_compound: i32,
    pub constraint_x_depth: i32,
    pub content_richness: i32,
    pub velocity: i32,
    pub question_density: i32,
    pub consistency: i32,
    pub shallow_penalty: i32,
    pub spam_penalty: i32,
    pub disengage_penalty: i32,
    pub sarcasm_penalty: i32,
    pub vendor_eval_bonus: i32,
    pub closing_boost: i32,
}

impl ScoreBreakdown {
    pub fn get(&self, component: Component) -> i32 {
        match component {
            Component::EvaluativeDepth => self.evaluative_depth,
            Component::BusinessPain => self.business_pain,
            Component::CompetitorSwitchBonus => self.competitor_switch_bonus,
            Component::AnalyticalDepth => self.analytical_depth,
            Component::EngagementCompound => self.engagement_compound,
            Component::ConstraintXDepth => self.constraint_x_depth,
            Component::ContentRichness => self.content_richness,
            Component::Velocity => self.velocity,
            Component::QuestionDensity => self.question_density,
            Component::Consistency => self.consistency,
            Component::ShallowPenalty => self.shallow_penalty,
            Component::SpamPenalty => self.spam_penalty,
            Component::DisengagePenalty => self.disengage_penalty,
            Component::SarcasmPenalty => self.sarcasm_penalty,
            Component::VendorEvalBonus => self.vendor_eval_bonus,
            Component::ClosingBoost => self.closing_boost,
        }
    }

    /// Raw, unclamped sum of every component
    pub fn total(&self) -> i32 {
        Component::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Components with a non-zero contribution, in evaluation order
    pub fn nonzero(&self) -> Vec<(Component, i32)> {
        Component::ALL
            .iter()
            .map(|c| (*c, self.get(*c)))
            .filter(|(_, v)| *v != 0)
            .collect()
    }
}

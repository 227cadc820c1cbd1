//! Signal structures produced by the extractor

use serde::{Deserialize, Serialize};

/// Pattern categories scanned in lead text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Pricing,
    Timeline,
    Budget,
    Stakeholder,
    Competitor,
    ProblemDesc,
    Implementation,
    BusinessPain,
    Analytical,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Pricing,
        Category::Timeline,
        Category::Budget,
        Category::Stakeholder,
        Category::Competitor,
        Category::ProblemDesc,
        Category::Implementation,
        Category::BusinessPain,
        Category::Analytical,
    ];

    /// Categories that count toward `eval_signals` and half quality
    pub const EVALUATIVE: [Category; 4] = [
        Category::Implementation,
        Category::Competitor,
        Category::ProblemDesc,
        Category::BusinessPain,
    ];

    /// Categories that count toward `constraint_count`
    pub const CONSTRAINTS: [Category; 4] = [
        Category::Pricing,
        Category::Timeline,
        Category::Budget,
        Category::Stakeholder,
    ];

    /// Key used in config files and logs
    pub fn key(&self) -> &'static str {
        match self {
            Category::Pricing => "pricing",
            Category::Timeline => "timeline",
            Category::Budget => "budget",
            Category::Stakeholder => "stakeholder",
            Category::Competitor => "competitor",
            Category::ProblemDesc => "problem_desc",
            Category::Implementation => "implementation",
            Category::BusinessPain => "business_pain",
            Category::Analytical => "analytical",
        }
    }

    /// Matched against the negation-stripped copy of the text.
    /// These are the categories most often asserted and then denied.
    pub fn uses_negated_text(&self) -> bool {
        matches!(
            self,
            Category::Competitor | Category::BusinessPain | Category::Implementation
        )
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Everything the extractor knows about a thread
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    // Category hit counts: number of distinct patterns that matched
    pub pricing: u32,
    pub timeline: u32,
    pub budget: u32,
    pub stakeholder: u32,
    pub competitor: u32,
    pub problem_desc: u32,
    pub implementation: u32,
    pub business_pain: u32,
    pub analytical: u32,

    // Text shape
    pub word_count: usize,
    pub question_count: usize,
    pub lead_message_count: usize,
    pub avg_words_per_reply: f64,
    /// Category hits per word (only meaningful for spam detection)
    pub keyword_density: f64,

    // Derived flags
    pub is_keyword_spam: bool,
    pub is_jargon: bool,
    pub is_disengaging: bool,
    pub is_sarcastic: bool,
    pub has_pilot_intent: bool,
    pub has_fast_action: bool,
    pub is_contradictory: bool,
    pub has_closing_intent: bool,
}

impl Signals {
    /// Create zero signals
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn count(&self, category: Category) -> u32 {
        match category {
            Category::Pricing => self.pricing,
            Category::Timeline => self.timeline,
            Category::Budget => self.budget,
            Category::Stakeholder => self.stakeholder,
            Category::Competitor => self.competitor,
            Category::ProblemDesc => self.problem_desc,
            Category::Implementation => self.implementation,
            Category::BusinessPain => self.business_pain,
            Category::Analytical => self.analytical,
        }
    }

    pub fn set_count(&mut self, category: Category, value: u32) {
        let slot = match category {
            Category::Pricing => &mut self.pricing,
            Category::Timeline => &mut self.timeline,
            Category::Budget => &mut self.budget,
            Category::Stakeholder => &mut self.stakeholder,
            Category::Competitor => &mut self.competitor,
            Category::ProblemDesc => &mut self.problem_desc,
            Category::Implementation => &mut self.implementation,
            Category::BusinessPain => &mut self.business_pain,
            Category::Analytical => &mut self.analytical,
        };
        *slot = value;
    }

    pub fn has(&self, category: Category) -> bool {
        self.count(category) > 0
    }

    /// Sum of all category hit counts
    pub fn total_category_hits(&self) -> u32 {
        Category::ALL.iter().map(|c| self.count(*c)).sum()
    }
}

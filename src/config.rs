//! Engine configuration
//!
//! Every threshold, cap and pattern list the engine uses lives here as data.
//! Defaults reproduce the built-in behavior; a YAML (or JSON) file may
//! override any subset of keys.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{Category, ConfigError};

/// Which tier set the classifier produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierScheme {
    /// Noise, Light Interest, Evaluating, High Intent, Ready Now
    #[default]
    Intent,
    /// Noise, Right ICP / Wrong Timing, Ready Now, Deprioritize
    Triage,
}

impl std::str::FromStr for TierScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "intent" => Ok(TierScheme::Intent),
            "triage" => Ok(TierScheme::Triage),
            other => Err(ConfigError::InvalidValue {
                field: "scheme".to_string(),
                message: format!("unknown scheme '{}'", other),
            }),
        }
    }
}

// =============================================================================
// THRESHOLDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub noise_max: u32,
    pub light_interest_min: u32,
    pub evaluating_min: u32,
    pub high_intent_min: u32,
    pub ready_now_min: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            noise_max: crate::NOISE_MAX,
            light_interest_min: crate::LIGHT_INTEREST_MIN,
            evaluating_min: crate::EVALUATING_MIN,
            high_intent_min: crate::HIGH_INTENT_MIN,
            ready_now_min: crate::READY_NOW_MIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageThresholds {
    pub ready_now_min: u32,
    pub right_icp_min: u32,
    pub short_reply_max_words: usize,
}

impl Default for TriageThresholds {
    fn default() -> Self {
        Self {
            ready_now_min: crate::READY_NOW_MIN,
            right_icp_min: crate::TRIAGE_RIGHT_ICP_MIN,
            short_reply_max_words: crate::TRIAGE_SHORT_REPLY_MAX_WORDS,
        }
    }
}

// =============================================================================
// CAPS
// =============================================================================

/// Per-component caps and global score limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Caps {
    pub evaluative_depth: i32,
    pub business_pain: i32,
    pub competitor_switch_bonus: i32,
    pub analytical_depth: i32,
    pub engagement_compound: i32,
    pub engagement_floor: i32,
    pub constraint_x_depth: i32,
    pub content_richness: i32,
    pub velocity: i32,
    pub question_density: i32,
    pub consistency: i32,
    pub vendor_eval_bonus: i32,
    pub disengage_penalty: i32,
    pub sarcasm_penalty: i32,
    pub spam_penalty: i32,
    pub single_reply_ceiling: u32,
    pub spam_ceiling: u32,
    pub closing_floor: i32,
}

impl Default for Caps {
    fn default() -> Self {
        Self {
            evaluative_depth: 30,
            business_pain: 35,
            competitor_switch_bonus: 20,
            analytical_depth: 12,
            engagement_compound: 22,
            engagement_floor: 5,
            constraint_x_depth: 15,
            content_richness: 15,
            velocity: 5,
            question_density: 7,
            consistency: 3,
            vendor_eval_bonus: 10,
            disengage_penalty: 30,
            sarcasm_penalty: 20,
            spam_penalty: 5,
            single_reply_ceiling: crate::SINGLE_REPLY_CEILING,
            spam_ceiling: crate::SPAM_CEILING,
            closing_floor: crate::READY_NOW_MIN as i32,
        }
    }
}

// =============================================================================
// MOMENTUM
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayBand {
    /// Band applies when staleness is strictly above this many hours
    pub above_hours: f64,
    /// Fraction of the score removed
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    pub rise_ratio: f64,
    /// eval + pain points needed for a single reply to read as Rising
    pub single_reply_rising_min: i32,
    pub stale_after_hours: f64,
    pub cliff_after_days: f64,
    /// Checked in order, first match wins
    pub decay_bands: Vec<DecayBand>,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            rise_ratio: crate::MOMENTUM_RATIO,
            single_reply_rising_min: 10,
            stale_after_hours: crate::STALE_AFTER_HOURS,
            cliff_after_days: crate::CLIFF_AFTER_DAYS,
            decay_bands: crate::DECAY_BANDS
                .iter()
                .map(|&(above_hours, fraction)| DecayBand { above_hours, fraction })
                .collect(),
        }
    }
}

// =============================================================================
// PATTERNS
// =============================================================================

/// A disengagement phrase, optionally cancelled by what follows it on the
/// same line ("appreciate your time" is fine when a call is being booked)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisengagePattern {
    Plain(String),
    Guarded {
        pattern: String,
        unless_followed_by: String,
    },
}

impl DisengagePattern {
    pub fn pattern(&self) -> &str {
        match self {
            DisengagePattern::Plain(p) => p,
            DisengagePattern::Guarded { pattern, .. } => pattern,
        }
    }

    pub fn guard(&self) -> Option<&str> {
        match self {
            DisengagePattern::Plain(_) => None,
            DisengagePattern::Guarded { unless_followed_by, .. } => Some(unless_followed_by),
        }
    }
}

/// Regex lists per category. A category's count is the number of its
/// patterns that match at least once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryPatterns {
    pub pricing: Vec<String>,
    pub timeline: Vec<String>,
    pub budget: Vec<String>,
    pub stakeholder: Vec<String>,
    pub competitor: Vec<String>,
    pub problem_desc: Vec<String>,
    pub implementation: Vec<String>,
    pub business_pain: Vec<String>,
    pub analytical: Vec<String>,
}

impl CategoryPatterns {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Pricing => &self.pricing,
            Category::Timeline => &self.timeline,
            Category::Budget => &self.budget,
            Category::Stakeholder => &self.stakeholder,
            Category::Competitor => &self.competitor,
            Category::ProblemDesc => &self.problem_desc,
            Category::Implementation => &self.implementation,
            Category::BusinessPain => &self.business_pain,
            Category::Analytical => &self.analytical,
        }
    }
}

const EVAL_TARGETS: &str = r"(?:vendors?|platforms?|solutions?|options?)";

impl Default for CategoryPatterns {
    fn default() -> Self {
        Self {
            pricing: owned(&["price", "cost", "quote", "pricing", "how much", r"\$", "rate"]),
            timeline: owned(&[
                "when", "soon", "asap", "timeline", "schedule", "deadline", "launch",
                "this week", "this month", "next quarter", "next month",
            ]),
            budget: owned(&["budget", "afford", "fund", "approv", "allocat", "spend"]),
            stakeholder: owned(&[
                "boss", "manager", "team", "colleague", "partner", "approv", "legal",
                "finance", "cto", "ceo", "vp",
            ]),
            competitor: {
                let mut list = owned(&[
                    "competitor", "other tool", "comparison", "switch", "vendor",
                    "alternative", r"vs\b", "compared to", "currently using",
                    "switched from", "moving from", "replacing", "instead of",
                    r"using .+ for", "considering leaving", r"currently use .+ but",
                    r"leaving .+ for", "better than", r"what makes .+ different",
                ]);
                list.push(format!(r"evaluat(?:ing|e|ion)\s+(?:.{{0,20}}\s+)?{}", EVAL_TARGETS));
                list.push(format!(r"looking\s+at\s+(?:.{{0,20}}\s+)?{}", EVAL_TARGETS));
                list.push(format!(r"compar(?:e|ing)\s+(?:.{{0,20}}\s+)?{}", EVAL_TARGETS));
                list
            },
            problem_desc: owned(&[
                "problem", "issue", "struggle", "pain", "need", "fix", "solve", "help",
                "challenge", "blocker",
            ]),
            implementation: owned(&[
                "api", "integrat", "setup", "install", "config", "sdk", "webhook", "deploy",
                "migration", "onboard", "plug", "retrain", "sequence", "automat", "workflow",
                "pipeline", "connect", r"move\s+forward", "proceed", r"next\s+steps",
            ]),
            business_pain: owned(&[
                "scaling", r"scale\b", "growing fast", "growth", "wasting", "waste",
                "drowning", "overwhelm", "overload", "bottleneck", "inefficien", "manual",
                "hiring", "recruit", "new reps", "new team", r"sdrs?\b", "churn", "losing",
                "retention", "valuable", r"game.?changer", "critical", "replac", "behind",
                "burning",
            ]),
            analytical: owned(&[
                r"win.?rate", "delta", "metric", "accuracy", "benchmark", r"data.?driven",
                "signal", "stabiliz", r"roi\b", "performance", "measur", "kpi", "conversion",
                r"retention.?rate", r"false.?positive", r"false.?negative", "precision",
                "recall", "improvement", "uplift", "variance", r"sample.?size",
            ]),
        }
    }
}

/// Every pattern list the extractor and classifier consult
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub categories: CategoryPatterns,
    /// Lead-ins whose following words are blanked before matching the
    /// competitor, pain and implementation categories
    pub negation_lead_ins: Vec<String>,
    /// Words removed after each negation lead-in
    pub negation_span_words: usize,
    pub jargon: Vec<String>,
    pub disengagement: Vec<DisengagePattern>,
    pub sarcasm: Vec<String>,
    pub pilot: Vec<String>,
    pub fast_action: Vec<String>,
    pub closing: Vec<String>,
    pub contradiction_positive: Vec<String>,
    pub contradiction_pivot: Vec<String>,
    pub terminal_ready: Vec<String>,
    pub terminal_noise: Vec<String>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            categories: CategoryPatterns::default(),
            negation_lead_ins: owned(&[
                r"not\s+(?:looking\s+to\s+|planning\s+to\s+|going\s+to\s+)?",
                r"n't\s+(?:looking\s+to\s+|planning\s+to\s+|going\s+to\s+)?",
                r"no\s+(?:plans?\s+(?:to|for)\s+)?",
                r"never\s+",
                r"don't\s+(?:want\s+to\s+|need\s+to\s+)?",
                r"won't\s+",
                r"aren't\s+",
                r"we're\s+not\s+",
                r"we\s+are\s+not\s+",
                r"we\s+don't\s+",
                r"happy\s+with\s+(?:what\s+we\s+have|our\s+current)\s+",
            ]),
            negation_span_words: 8,
            jargon: owned(&[
                r"\b(?:scalable|orchestrat\w+|prioritiz\w+|optimiz\w+|streamlin\w+)\b",
                r"\b(?:throughput|velocity|synerg\w+|leverage\w*|alignment)\b",
                r"\b(?:holistic|paradigm|ecosystem|framework|methodology)\b",
                r"\b(?:actionable|transformative|disruptive|innovative|cutting.edge)\b",
                r"\b(?:empower\w*|enablement|operationalize|verticalize)\b",
            ]),
            disengagement: vec![
                DisengagePattern::Plain(r"revisit\s+(?:this\s+)?(?:next|later|in\s+q[1-4])".into()),
                DisengagePattern::Plain(r"next\s+quarter".into()),
                DisengagePattern::Plain(r"next\s+year".into()),
                DisengagePattern::Plain(r"not\s+(?:right\s+now|at\s+this\s+time|a\s+priority)".into()),
                DisengagePattern::Plain(r"other\s+priorities".into()),
                DisengagePattern::Plain(r"put\s+(?:this\s+)?on\s+hold".into()),
                DisengagePattern::Plain(r"circle\s+back\s+later".into()),
                DisengagePattern::Plain(r"table\s+this".into()),
                DisengagePattern::Plain(r"shelv(?:e|ing)\s+(?:this|the)".into()),
                DisengagePattern::Plain(
                    r"we(?:'ve|\s+have)\s+decided\s+(?:to\s+)?(?:wait|hold|pause|revisit)".into(),
                ),
                DisengagePattern::Plain(r"not\s+(?:the\s+right|a\s+good)\s+time".into()),
                DisengagePattern::Plain(r"maybe\s+(?:later|next|down\s+the\s+road)".into()),
                DisengagePattern::Guarded {
                    pattern: r"appreciate\s+your\s+time\b".into(),
                    unless_followed_by: r"\b(?:demo|call|meeting|schedule)".into(),
                },
            ],
            sarcasm: owned(&[
                "[😂🤣😏😅🙄💀😜😹]",
                r"(?:totally|sure|oh\s+yeah|right|very funny)",
                r"(?:lol|lmao|rofl|haha)",
            ]),
            pilot: owned(&[
                r"\b(?:pilot|trial|poc|proof\s+of\s+concept)\b",
                r"\b(?:test|try)\s+(?:it|this|with)\b",
            ]),
            fast_action: owned(&[
                r"\b(?:this\s+week|tomorrow|today|immediately|right\s+away)\b",
                r"\b(?:asap|as\s+soon\s+as)\b",
            ]),
            closing: owned(&[
                r"\b(?:send|review|sign|forward)\s+(?:the\s+)?(?:contract|msa|dpa|agreement|paperwork)\b",
                r"\b(?:ready|want|like|will)\s+to\s+(?:sign|countersign|execute)\b",
                r"\b(?:where|how)\s+do\s+i\s+sign\b",
                r"\b(?:legal|contract|agreement)\s+(?:has\s+)?approved\b",
                r"\b(?:sent|signed)\s+(?:the\s+)?(?:contract|msa|dpa)\b",
                r"\bsign\s+by\b",
                r"\bcan\s+(?:we|i)\s+sign\b",
                r"\b(?:execute|final)\s+contract\b",
                r"\bagreement\s+attached\b",
                r"\bbudget\s+(?:is\s+|has\s+been\s+)?approved\b",
            ]),
            contradiction_positive: owned(&[
                r"\b(?:happy|satisfied|content|pleased|good|fine|great|love|like)\b.*\b(?:with|about)\b",
            ]),
            contradiction_pivot: owned(&[
                r"\b(?:but|however|though|although)\b.*\b(?:explor|look|evaluat|consider|open\s+to|curious|alternatives?)\b",
            ]),
            terminal_ready: owned(&[
                r"\bbudget\s+(?:is\s+|has\s+been\s+)?approved\b",
                r"\bsend\s+(?:over\s+)?(?:the\s+)?contract\b",
                r"\blet'?s\s+talk\b",
                r"\blooping\s+in\s+(?:our\s+)?(?:cto|ceo|cfo|vp|head\s+of)\b",
                r"\b(?:forwarded|sent|passed)\s+this\s+to\s+(?:our\s+)?(?:cto|ceo|cfo|vp|head\s+of)\b",
                r"\block\s+this\s+in\b",
                r"\bdecision\s+this\s+week\b",
                r"\bavailable\s+this\s+week\b",
                r"\bdemo\s+this\s+week\b",
                r"\bfinali[sz]e\s+vendor\b",
                r"\bi\s+make\s+the\s+(?:call|decision)\b",
            ]),
            terminal_noise: owned(&[
                r"\bnot\s+interested\b",
                r"\bunsubscribe\b",
                r"\bremove\s+me\b",
                r"\bstop\s+emailing\b",
                r"\bout\s+of\s+(?:the\s+)?office\b",
                r"\bwrong\s+fit\b",
                r"\bnot\s+a\s+fit\b",
                r"\bnot\s+relevant\b",
                r"\bno\s+thanks\b",
                r"\bpass\s+on\s+this\b",
                r"\bcold\s+outreach\b",
                r"\bnot\s+doing\s+outbound\b",
            ]),
        }
    }
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// ENGINE CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scheme: TierScheme,
    pub thresholds: Thresholds,
    pub triage: TriageThresholds,
    pub caps: Caps,
    pub momentum: MomentumConfig,
    pub patterns: PatternConfig,
    /// Let terminal phrases in the last lead reply override the tier
    pub terminal_prefilter: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scheme: TierScheme::Intent,
            thresholds: Thresholds::default(),
            triage: TriageThresholds::default(),
            caps: Caps::default(),
            momentum: MomentumConfig::default(),
            patterns: PatternConfig::default(),
            terminal_prefilter: false,
        }
    }
}

impl EngineConfig {
    /// Four-tier triage preset with the terminal pre-filter on
    pub fn triage() -> Self {
        Self {
            scheme: TierScheme::Triage,
            terminal_prefilter: true,
            ..Self::default()
        }
    }

    /// Load and validate a YAML or JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound(path.display().to_string()),
            _ => ConfigError::ParseError(format!("{}: {}", path.display(), e)),
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check threshold ordering and numeric ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        let ladder = [
            ("thresholds.noise_max", t.noise_max),
            ("thresholds.light_interest_min", t.light_interest_min),
            ("thresholds.evaluating_min", t.evaluating_min),
            ("thresholds.high_intent_min", t.high_intent_min),
            ("thresholds.ready_now_min", t.ready_now_min),
        ];
        for pair in ladder.windows(2) {
            if pair[1].1 <= pair[0].1 {
                return Err(invalid(
                    pair[1].0,
                    format!("{} must be above {} ({})", pair[1].1, pair[0].0, pair[0].1),
                ));
            }
        }
        if t.ready_now_min > 100 {
            return Err(invalid("thresholds.ready_now_min", "must be at most 100".to_string()));
        }
        if self.triage.right_icp_min >= self.triage.ready_now_min {
            return Err(invalid(
                "triage.right_icp_min",
                "must be below triage.ready_now_min".to_string(),
            ));
        }
        if self.momentum.rise_ratio < 1.0 {
            return Err(invalid("momentum.rise_ratio", "must be at least 1.0".to_string()));
        }
        for band in &self.momentum.decay_bands {
            if !(0.0..=1.0).contains(&band.fraction) {
                return Err(invalid(
                    "momentum.decay_bands",
                    format!("fraction {} outside 0..=1", band.fraction),
                ));
            }
        }
        if self.caps.spam_ceiling > 100 || self.caps.single_reply_ceiling > 100 {
            return Err(invalid("caps", "ceilings must be at most 100".to_string()));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_validate() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(EngineConfig::triage().validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_overrides_only_named_keys() {
        let config = EngineConfig::from_yaml_str(
            "scheme: triage\nthresholds:\n  ready_now_min: 90\ncaps:\n  spam_ceiling: 10\n",
        )
        .unwrap();
        assert_eq!(config.scheme, TierScheme::Triage);
        assert_eq!(config.thresholds.ready_now_min, 90);
        assert_eq!(config.thresholds.noise_max, crate::NOISE_MAX);
        assert_eq!(config.caps.spam_ceiling, 10);
        assert_eq!(config.caps.business_pain, 35);
        assert_eq!(config.patterns, PatternConfig::default());
    }

    #[test]
    fn test_json_is_accepted() {
        let config = EngineConfig::from_yaml_str(r#"{"terminal_prefilter": true}"#).unwrap();
        assert!(config.terminal_prefilter);
    }

    #[test]
    fn test_unordered_thresholds_rejected() {
        let err = EngineConfig::from_yaml_str("thresholds:\n  evaluating_min: 20\n").unwrap_err();
        match err {
            ConfigError::InvalidValue { field, .. } => assert_eq!(field, "thresholds.evaluating_min"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load("/nonexistent/replyscore.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_disengage_pattern_accepts_plain_and_guarded() {
        let yaml = "patterns:\n  disengagement:\n    - 'on\\s+hold'\n    - pattern: 'thanks\\s+anyway'\n      unless_followed_by: 'call'\n";
        let config = EngineConfig::from_yaml_str(yaml).unwrap();
        let list = &config.patterns.disengagement;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].guard(), None);
        assert_eq!(list[1].pattern(), r"thanks\s+anyway");
        assert_eq!(list[1].guard(), Some("call"));
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("Triage".parse::<TierScheme>().unwrap(), TierScheme::Triage);
        assert!("five".parse::<TierScheme>().is_err());
    }
}

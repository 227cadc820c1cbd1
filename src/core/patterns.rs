//! Compiled pattern lists
//!
//! Built once from `PatternConfig` when the engine is constructed. Every
//! later match is infallible.

use regex::Regex;

use crate::config::PatternConfig;
use crate::types::{Category, ConfigError, TerminalKind};

/// A disengagement phrase plus its optional cancelling follow-up
#[derive(Debug, Clone)]
pub struct DisengageRule {
    pattern: Regex,
    unless_followed_by: Option<Regex>,
}

impl DisengageRule {
    /// True when some occurrence is not followed, on the same line, by the guard
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.find_iter(text).any(|m| match &self.unless_followed_by {
            None => true,
            Some(guard) => {
                let rest = &text[m.end()..];
                let line = rest.split('\n').next().unwrap_or("");
                !guard.is_match(line)
            }
        })
    }
}

/// Terminal phrase with its source text kept for reporting
#[derive(Debug, Clone)]
pub struct TerminalRule {
    pub source: String,
    regex: Regex,
}

#[derive(Debug, Clone)]
pub struct PatternSet {
    categories: Vec<(Category, Vec<Regex>)>,
    negations: Vec<Regex>,
    pub jargon: Vec<Regex>,
    pub disengagement: Vec<DisengageRule>,
    pub sarcasm: Vec<Regex>,
    pub pilot: Vec<Regex>,
    pub fast_action: Vec<Regex>,
    pub closing: Vec<Regex>,
    pub contradiction_positive: Vec<Regex>,
    pub contradiction_pivot: Vec<Regex>,
    terminal_noise: Vec<TerminalRule>,
    terminal_ready: Vec<TerminalRule>,
}

impl PatternSet {
    /// Compile every list, naming the first bad pattern on failure
    pub fn compile(config: &PatternConfig) -> Result<Self, ConfigError> {
        let categories = Category::ALL
            .iter()
            .map(|c| {
                let list = compile_list(&format!("categories.{}", c.key()), config.categories.get(*c))?;
                Ok((*c, list))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let span = negation_span(config.negation_span_words);
        let negations = config
            .negation_lead_ins
            .iter()
            .map(|lead_in| compile_one("negation_lead_ins", lead_in, &format!("{}{}", lead_in, span)))
            .collect::<Result<Vec<_>, _>>()?;

        let disengagement = config
            .disengagement
            .iter()
            .map(|d| {
                let pattern = compile_one("disengagement", d.pattern(), d.pattern())?;
                let unless_followed_by = match d.guard() {
                    Some(g) => Some(compile_one("disengagement", g, g)?),
                    None => None,
                };
                Ok(DisengageRule { pattern, unless_followed_by })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            categories,
            negations,
            jargon: compile_list("jargon", &config.jargon)?,
            disengagement,
            sarcasm: compile_list("sarcasm", &config.sarcasm)?,
            pilot: compile_list("pilot", &config.pilot)?,
            fast_action: compile_list("fast_action", &config.fast_action)?,
            closing: compile_list("closing", &config.closing)?,
            contradiction_positive: compile_list("contradiction_positive", &config.contradiction_positive)?,
            contradiction_pivot: compile_list("contradiction_pivot", &config.contradiction_pivot)?,
            terminal_noise: compile_terminal("terminal_noise", &config.terminal_noise)?,
            terminal_ready: compile_terminal("terminal_ready", &config.terminal_ready)?,
        })
    }

    pub fn category(&self, category: Category) -> &[Regex] {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&[])
    }

    /// Remove each negation lead-in and the words after it, one list entry at a time
    pub fn strip_negations(&self, text: &str) -> String {
        self.negations
            .iter()
            .fold(text.to_string(), |acc, re| re.replace_all(&acc, "").into_owned())
    }

    pub fn is_disengaging(&self, text: &str) -> bool {
        self.disengagement.iter().any(|rule| rule.matches(text))
    }

    /// Noise phrases win over ready phrases
    pub fn terminal(&self, text: &str) -> Option<(TerminalKind, &str)> {
        if let Some(rule) = self.terminal_noise.iter().find(|r| r.regex.is_match(text)) {
            return Some((TerminalKind::Noise, rule.source.as_str()));
        }
        self.terminal_ready
            .iter()
            .find(|r| r.regex.is_match(text))
            .map(|r| (TerminalKind::Ready, r.source.as_str()))
    }
}

/// Number of patterns that match at least once
pub fn count_distinct(patterns: &[Regex], text: &str) -> u32 {
    patterns.iter().filter(|re| re.is_match(text)).count() as u32
}

pub fn any_match(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|re| re.is_match(text))
}

fn negation_span(words: usize) -> String {
    match words {
        0 => String::new(),
        n => format!(r"(\S+(?:\s+\S+){{0,{}}})", n - 1),
    }
}

fn compile_one(list: &str, shown: &str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        list: list.to_string(),
        pattern: shown.to_string(),
        message: e.to_string(),
    })
}

fn compile_list(list: &str, patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns.iter().map(|p| compile_one(list, p, p)).collect()
}

fn compile_terminal(list: &str, patterns: &[String]) -> Result<Vec<TerminalRule>, ConfigError> {
    patterns
        .iter()
        .map(|p| {
            Ok(TerminalRule {
                source: p.clone(),
                regex: compile_one(list, p, p)?,
            })
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisengagePattern;

    fn defaults() -> PatternSet {
        PatternSet::compile(&PatternConfig::default()).unwrap()
    }

    #[test]
    fn test_builtin_patterns_compile() {
        let set = defaults();
        for c in Category::ALL {
            assert!(!set.category(c).is_empty(), "{} has no patterns", c);
        }
    }

    #[test]
    fn test_bad_pattern_names_its_list() {
        let mut config = PatternConfig::default();
        config.closing.push("(unclosed".to_string());
        match PatternSet::compile(&config) {
            Err(ConfigError::InvalidPattern { list, pattern, .. }) => {
                assert_eq!(list, "closing");
                assert_eq!(pattern, "(unclosed");
            }
            other => panic!("expected InvalidPattern, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_negation_removes_following_words() {
        let set = defaults();
        let stripped = set.strip_negations("we're not looking to switch from apollo at all");
        assert!(!stripped.contains("switch"));
        assert!(!stripped.contains("apollo"));
    }

    #[test]
    fn test_negation_span_is_eight_words() {
        let set = defaults();
        let stripped = set.strip_negations("never one two three four five six seven eight nine");
        assert_eq!(stripped.trim(), "nine");
    }

    #[test]
    fn test_hedged_satisfaction_is_stripped() {
        let set = defaults();
        let stripped = set.strip_negations("we're happy with our current setup but exploring alternatives.");
        assert_eq!(stripped.trim(), "we're");
        let stripped = set.strip_negations("happy with what we have for onboarding, thanks");
        assert!(!stripped.contains("onboarding"));
    }

    #[test]
    fn test_count_distinct_counts_patterns_not_occurrences() {
        let set = defaults();
        let n = count_distinct(set.category(Category::Pricing), "price price price");
        assert_eq!(n, 1);
    }

    #[test]
    fn test_guard_cancels_disengagement_on_same_line() {
        let set = defaults();
        assert!(set.is_disengaging("thanks, appreciate your time."));
        assert!(!set.is_disengaging("appreciate your time, can we schedule a call?"));
        assert!(set.is_disengaging("appreciate your time.\nwe might schedule later"));
    }

    #[test]
    fn test_custom_guarded_rule() {
        let mut config = PatternConfig::default();
        config.disengagement = vec![DisengagePattern::Guarded {
            pattern: r"thanks\s+anyway".into(),
            unless_followed_by: "pricing".into(),
        }];
        let set = PatternSet::compile(&config).unwrap();
        assert!(set.is_disengaging("thanks anyway"));
        assert!(!set.is_disengaging("thanks anyway, send pricing"));
    }

    #[test]
    fn test_terminal_noise_wins() {
        let set = defaults();
        let (kind, _) = set.terminal("not interested, no thanks").unwrap();
        assert_eq!(kind, TerminalKind::Noise);
        let (kind, src) = set.terminal("budget approved, let's move forward.").unwrap();
        assert_eq!(kind, TerminalKind::Ready);
        assert!(src.contains("budget"));
        assert!(set.terminal("sounds interesting").is_none());
    }
}

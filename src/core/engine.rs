//! Intent engine: the full pipeline behind one call
//!
//! The engine holds only compiled configuration. `analyze_thread` reads its
//! input, allocates fresh structures and returns; it is safe to share one
//! engine across threads.

use tracing::debug;

use crate::config::EngineConfig;
use crate::core::classifier::StateClassifier;
use crate::core::composer::ScoreComposer;
use crate::core::explain::ExplanationGenerator;
use crate::core::extractor::SignalExtractor;
use crate::core::metrics::MetricsCalculator;
use crate::core::momentum::MomentumAnalyzer;
use crate::core::patterns::PatternSet;
use crate::types::{
    lead_messages, AnalysisResult, ConfigError, Message, Momentum, TerminalMatch, Tiebreaker,
};

#[derive(Debug, Clone)]
pub struct IntentEngine {
    config: EngineConfig,
    extractor: SignalExtractor,
    metrics: MetricsCalculator,
    composer: ScoreComposer,
    classifier: StateClassifier,
    momentum: MomentumAnalyzer,
    explainer: ExplanationGenerator,
}

impl IntentEngine {
    /// Validate the config and compile every pattern list
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let patterns = PatternSet::compile(&config.patterns)?;
        Ok(Self {
            extractor: SignalExtractor::new(patterns),
            metrics: MetricsCalculator::new(),
            composer: ScoreComposer::new(config.caps.clone()),
            classifier: StateClassifier::new(
                config.scheme,
                config.thresholds.clone(),
                config.triage.clone(),
            ),
            momentum: MomentumAnalyzer::new(config.momentum.clone()),
            explainer: ExplanationGenerator::new(),
            config,
        })
    }

    /// Engine with the built-in configuration
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze against the current wall clock
    pub fn analyze_thread(&self, thread: &[Message]) -> AnalysisResult {
        self.analyze_thread_at(thread, now_secs())
    }

    /// Score a single lead reply sent just now
    pub fn analyze_text(&self, text: &str) -> AnalysisResult {
        let now = now_secs();
        self.analyze_thread_at(&[Message::lead(text, now)], now)
    }

    /// Analyze with an explicit "now" (epoch seconds) for staleness
    pub fn analyze_thread_at(&self, thread: &[Message], now: f64) -> AnalysisResult {
        if thread.is_empty() {
            return AnalysisResult::default();
        }

        let signals = self.extractor.extract(thread);
        let metrics = self.metrics.calculate(thread, &signals, now);
        let breakdown = self.composer.compose(&signals, &metrics);

        let caps = &self.config.caps;
        let mut score = breakdown.total().clamp(0, 100) as u32;
        if signals.lead_message_count <= 1 {
            score = score.min(caps.single_reply_ceiling);
        }
        if signals.is_keyword_spam {
            score = score.min(caps.spam_ceiling);
        }

        let terminal_hit = if self.config.terminal_prefilter {
            let last = lead_messages(thread).last().map(|m| m.body.to_lowercase()).unwrap_or_default();
            self.extractor
                .patterns()
                .terminal(&last)
                .map(|(kind, pattern)| (kind, pattern.to_string()))
        } else {
            None
        };
        let terminal_kind = terminal_hit.as_ref().map(|(kind, _)| *kind);

        let mut state = self.classifier.classify(score, &signals, terminal_kind);
        let explanation: Vec<String> = self
            .explainer
            .explain(&signals, &metrics, &breakdown)
            .iter()
            .map(|r| r.label())
            .collect();
        let cliff_flag = self.momentum.cliff(thread, now);
        let momentum = self.momentum.momentum(
            thread,
            &signals,
            &breakdown,
            &metrics,
            self.extractor.patterns(),
        );
        let tiebreaker = Tiebreaker::from_metrics(&metrics);

        let mut cooling_decay = 0;
        if momentum == Momentum::Cooling {
            cooling_decay = self.momentum.decay(score, &metrics);
            score = score.saturating_sub(cooling_decay);
            state = self.classifier.classify(score, &signals, terminal_kind);
        }

        let full_explanation = self.explainer.full(&signals, &metrics, &breakdown);

        let terminal = terminal_hit.map(|(kind, pattern)| TerminalMatch {
            kind,
            pattern,
            applied: self.classifier.classify(score, &signals, None) != state,
        });

        debug!(
            score,
            state = %state,
            momentum = %momentum,
            cooling_decay,
            lead_messages = signals.lead_message_count,
            spam = signals.is_keyword_spam,
            disengaging = signals.is_disengaging,
            "Thread analyzed"
        );

        AnalysisResult {
            score,
            score_breakdown: breakdown,
            state,
            action: state.action(),
            explanation,
            full_explanation,
            signals,
            metrics,
            cliff_flag,
            momentum,
            tiebreaker,
            cooling_decay,
            terminal,
        }
    }
}

/// Current wall clock as epoch seconds
pub fn now_secs() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

// =============================================================================
// TESTS
// =============================================================================

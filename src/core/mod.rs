//! Core modules for replyscore

pub mod patterns;
pub mod extractor;
pub mod metrics;
pub mod composer;
pub mod classifier;
pub mod momentum;
pub mod explain;
pub mod compare;
pub mod engine;
pub mod store;
pub mod desk;
pub mod api;

pub use patterns::PatternSet;
pub use extractor::SignalExtractor;
pub use metrics::MetricsCalculator;
pub use composer::ScoreComposer;
pub use classifier::StateClassifier;
pub use momentum::MomentumAnalyzer;
pub use explain::ExplanationGenerator;
pub use compare::compare_leads;
pub use engine::{now_secs, IntentEngine};
pub use store::{InMemoryLeadStore, JsonFileLeadStore, LeadStore};
pub use desk::LeadDesk;
pub use api::{create_router, run_server, AppState};

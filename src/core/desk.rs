//! Decision desk: the stateful layer around the pure engine
//!
//! Every incoming message for a lead goes through `ingest`, which loads the
//! record, filters webhook retries, re-scores the whole thread and persists.
//! Work on the same lead id is serialized; different leads run in parallel.
//! A store failure never blocks scoring: the result is still returned with
//! `persisted = false`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::core::compare::compare_leads;
use crate::core::engine::IntentEngine;
use crate::core::store::LeadStore;
use crate::types::{
    DisagreeDirection, Disagreement, IngestOutcome, IngestStatus, IntentJump, LeadComparison,
    LeadRecord, LeadRow, LeadSummary, Message, Outcome, RankedLeads, Recommendation, Section,
    StoreError,
};
use crate::{
    DUPLICATE_LOOKBACK, DUPLICATE_WINDOW_SECS, INTENT_JUMP_DELTA, LAZY_RESCORE_AFTER_SECS,
    MINUTES_SAVED_PER_NOISE_REPLY, RECOMMENDATION_WINDOW_SECS, SLA_RESPONSE_MINUTES, SLA_SCORE_MIN,
};

pub struct LeadDesk {
    engine: IntentEngine,
    store: Box<dyn LeadStore>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LeadDesk {
    pub fn new(engine: IntentEngine, store: Box<dyn LeadStore>) -> Self {
        Self {
            engine,
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &IntentEngine {
        &self.engine
    }

    /// Run `work` holding the lead's mutex. The mutex is dropped from the map
    /// once nobody else holds or waits on it.
    fn with_lead<T>(&self, lead_id: &str, work: impl FnOnce() -> T) -> T {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(lead_id.to_string()).or_default().clone()
        };
        let out = {
            let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
            work()
        };
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // The map's handle plus ours
        if Arc::strong_count(&lock) == 2 {
            locks.remove(lead_id);
        }
        out
    }

    /// Load a record, starting fresh when the store cannot be read
    fn load_or_new(&self, lead_id: &str, now: f64) -> LeadRecord {
        match self.store.get(lead_id) {
            Ok(Some(record)) => record,
            Ok(None) => LeadRecord::new(lead_id, now),
            Err(e) => {
                warn!(lead_id, error = %e, "Lead store read failed, starting fresh record");
                LeadRecord::new(lead_id, now)
            }
        }
    }

    fn persist(&self, record: &LeadRecord) -> bool {
        match self.store.put(record) {
            Ok(()) => true,
            Err(e) => {
                warn!(lead_id = %record.id, error = %e, "Lead store write failed");
                false
            }
        }
    }

    /// Add one message to a lead's thread and re-score it
    pub fn ingest(&self, lead_id: &str, message: Message, now: f64) -> IngestOutcome {
        self.with_lead(lead_id, || self.ingest_locked(lead_id, message, now))
    }

    fn ingest_locked(&self, lead_id: &str, mut message: Message, now: f64) -> IngestOutcome {
        let mut record = self.load_or_new(lead_id, now);
        let timestamp = *message.timestamp.get_or_insert(now);

        if record.is_duplicate(&message, DUPLICATE_LOOKBACK, DUPLICATE_WINDOW_SECS) {
            info!(lead_id, "Duplicate message ignored");
            return IngestOutcome::duplicate();
        }

        record.track_response_time(message.sender, timestamp);

        let is_lead = message.is_lead();
        let prev_score = record.score;
        record.thread.push(message);

        let analysis = self.engine.analyze_thread_at(&record.thread, now);
        record.apply(&analysis, now);

        let mut intent_jump = None;
        if is_lead {
            record.score_history.push(analysis.score);

            let delta = analysis.score as i64 - prev_score as i64;
            if prev_score > 0 && delta >= INTENT_JUMP_DELTA {
                let jump = IntentJump { from: prev_score, to: analysis.score, delta, timestamp: now };
                info!(lead_id, from = prev_score, to = analysis.score, delta, "Intent jump");
                record.intent_jump_alert = Some(jump);
                intent_jump = Some(jump);
            }
        }

        let recommendation = match record.last_recommendation {
            Some(last)
                if last.action == analysis.action
                    && now - last.timestamp < RECOMMENDATION_WINDOW_SECS =>
            {
                debug!(lead_id, action = analysis.action.code(), "Recommendation suppressed");
                None
            }
            _ => {
                record.last_recommendation = Some(Recommendation { action: analysis.action, timestamp: now });
                Some(analysis.action)
            }
        };

        let persisted = self.persist(&record);

        IngestOutcome {
            status: IngestStatus::Scored,
            analysis: Some(analysis),
            intent_jump,
            recommendation,
            persisted,
        }
    }

    /// Stored record, as-is
    pub fn get(&self, lead_id: &str) -> Result<Option<LeadRecord>, StoreError> {
        self.store.get(lead_id)
    }

    /// Stored record, re-scored first if it went stale while still active
    pub fn refresh(&self, lead_id: &str, now: f64) -> Result<Option<LeadRecord>, StoreError> {
        self.with_lead(lead_id, || self.refresh_locked(lead_id, now))
    }

    fn refresh_locked(&self, lead_id: &str, now: f64) -> Result<Option<LeadRecord>, StoreError> {
        let Some(mut record) = self.store.get(lead_id)? else {
            return Ok(None);
        };
        if now - record.last_updated > LAZY_RESCORE_AFTER_SECS && record.state.is_active() {
            let analysis = self.engine.analyze_thread_at(&record.thread, now);
            debug!(lead_id, from = record.score, to = analysis.score, "Lazy re-score");
            record.apply(&analysis, now);
            self.persist(&record);
        }
        Ok(Some(record))
    }

    /// Record the SDR-reported outcome. None when the lead is unknown.
    pub fn set_outcome(&self, lead_id: &str, outcome: Outcome) -> Result<Option<LeadRecord>, StoreError> {
        self.update(lead_id, |record| record.outcome = Some(outcome))
    }

    /// Record that an SDR thinks the score is off. None when the lead is unknown.
    pub fn record_disagreement(
        &self,
        lead_id: &str,
        direction: DisagreeDirection,
        reason: Option<String>,
        now: f64,
    ) -> Result<Option<LeadRecord>, StoreError> {
        self.update(lead_id, |record| {
            let score_at_time = record.score;
            record.disagreements.push(Disagreement { direction, reason, timestamp: now, score_at_time });
        })
    }

    fn update(
        &self,
        lead_id: &str,
        change: impl FnOnce(&mut LeadRecord),
    ) -> Result<Option<LeadRecord>, StoreError> {
        self.with_lead(lead_id, || -> Result<Option<LeadRecord>, StoreError> {
            let Some(mut record) = self.store.get(lead_id)? else {
                return Ok(None);
            };
            change(&mut record);
            self.store.put(&record)?;
            Ok(Some(record))
        })
    }

    /// Explain the ordering of the given leads; unknown ids are skipped
    pub fn compare(&self, lead_ids: &[&str]) -> Result<Vec<LeadComparison>, StoreError> {
        let mut summaries = Vec::with_capacity(lead_ids.len());
        for id in lead_ids {
            if let Some(record) = self.store.get(id)? {
                summaries.push(LeadSummary::from_record(&record));
            }
        }
        Ok(compare_leads(&summaries))
    }

    /// Every stored lead, stale ones re-scored first, grouped by tier and
    /// ordered. A record that cannot be read is logged and left out.
    pub fn ranked(&self, now: f64) -> Result<RankedLeads, StoreError> {
        let mut board = RankedLeads::default();
        let mut ready = Vec::new();

        for id in self.store.ids()? {
            let record = match self.refresh(&id, now) {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(e) => {
                    warn!(lead_id = %id, error = %e, "Skipping unreadable lead");
                    continue;
                }
            };
            let row = LeadRow::from_record(&record);
            board.stats.total_replies += row.lead_replies;

            if record.score >= SLA_SCORE_MIN {
                match record.avg_response_time_min {
                    Some(avg) if avg <= SLA_RESPONSE_MINUTES => board.sla.responded_under_30m += 1,
                    Some(_) => board.sla.responded_over_30m += 1,
                    None if record.last_lead_reply_at.is_some() => board.sla.no_response_yet += 1,
                    None => {}
                }
            }

            match Section::for_state(record.state) {
                Section::ReadyNow => {
                    ready.push(LeadSummary::from_record(&record));
                    board.ready_now.push(row);
                }
                Section::Evaluating => board.evaluating.push(row),
                Section::Curious => board.curious.push(row),
                Section::Noise => {
                    board.stats.time_saved_minutes += row.lead_replies * MINUTES_SAVED_PER_NOISE_REPLY;
                    board.noise.push(row);
                }
            }
        }

        board.ready_now.sort_by(|a, b| a.tiebreaker.cmp_priority(&b.tiebreaker));
        board.evaluating.sort_by(|a, b| b.score.cmp(&a.score));
        board.curious.sort_by(|a, b| b.score.cmp(&a.score));
        board.noise.sort_by(|a, b| a.score.cmp(&b.score));
        board.comparative = compare_leads(&ready);
        board.stats.ready_count = board.ready_now.len();
        board.stats.evaluating_count = board.evaluating.len();

        debug!(
            ready = board.ready_now.len(),
            evaluating = board.evaluating.len(),
            curious = board.curious.len(),
            noise = board.noise.len(),
            "Ranked leads"
        );
        Ok(board)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::InMemoryLeadStore;
    use crate::types::{Action, DeskStats, LeadState, SlaCounts, Tiebreaker};

    const NOW: f64 = 1_700_000_000.0;
    const HOUR: f64 = 3600.0;

    fn desk() -> LeadDesk {
        LeadDesk::new(IntentEngine::with_defaults().unwrap(), Box::new(InMemoryLeadStore::new()))
    }

    /// Store whose writes always fail
    struct BrokenStore;

    impl LeadStore for BrokenStore {
        fn get(&self, _id: &str) -> Result<Option<LeadRecord>, StoreError> {
            Err(StoreError::Poisoned)
        }
        fn put(&self, _record: &LeadRecord) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
        fn ids(&self) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    #[test]
    fn test_ingest_scores_and_persists() {
        let desk = desk();
        let out = desk.ingest("l1", Message::lead("What does the API integration look like?", NOW), NOW);
        assert_eq!(out.status, IngestStatus::Scored);
        assert!(out.persisted);
        let record = desk.get("l1").unwrap().unwrap();
        assert_eq!(record.thread.len(), 1);
        assert_eq!(record.score_history, vec![out.analysis.unwrap().score]);
    }

    #[test]
    fn test_duplicate_within_window_ignored() {
        let desk = desk();
        desk.ingest("l1", Message::lead("Can we see pricing?", NOW), NOW);
        let out = desk.ingest("l1", Message::lead("Can we see pricing?", NOW + 60.0), NOW + 60.0);
        assert_eq!(out.status, IngestStatus::IgnoredDuplicate);
        assert!(out.analysis.is_none());
        assert_eq!(desk.get("l1").unwrap().unwrap().thread.len(), 1);

        // Outside the window it counts again
        let later = NOW + 600.0;
        let out = desk.ingest("l1", Message::lead("Can we see pricing?", later), later);
        assert_eq!(out.status, IngestStatus::Scored);
    }

    #[test]
    fn test_missing_timestamp_filled_with_now() {
        let desk = desk();
        let msg = Message { sender: Some(crate::types::Sender::Lead), body: "Hello".into(), timestamp: None };
        desk.ingest("l1", msg, NOW);
        assert_eq!(desk.get("l1").unwrap().unwrap().thread[0].timestamp, Some(NOW));
    }

    #[test]
    fn test_response_time_tracked() {
        let desk = desk();
        desk.ingest("l1", Message::lead("Question about setup?", NOW), NOW);
        desk.ingest("l1", Message::agent("Sure, here it is.", NOW + 30.0 * 60.0), NOW + 30.0 * 60.0);
        let record = desk.get("l1").unwrap().unwrap();
        assert_eq!(record.response_times, vec![1800.0]);
        assert_eq!(record.avg_response_time_min, Some(30.0));
        // Agent messages do not add to the score history
        assert_eq!(record.score_history.len(), 1);
    }

    #[test]
    fn test_intent_jump_alert() {
        let desk = desk();
        desk.ingest("l1", Message::lead("Thanks for reaching out, tell me more.", NOW), NOW);
        let before = desk.get("l1").unwrap().unwrap().score;
        assert!(before > 0);

        let out = desk.ingest(
            "l1",
            Message::lead("Budget approved, send the contract and the MSA for signature.", NOW + HOUR),
            NOW + HOUR,
        );
        let jump = out.intent_jump.unwrap();
        assert_eq!(jump.from, before);
        assert!(jump.delta >= INTENT_JUMP_DELTA);
        assert_eq!(desk.get("l1").unwrap().unwrap().intent_jump_alert, Some(jump));
    }

    #[test]
    fn test_repeat_recommendation_suppressed() {
        let desk = desk();
        let first = desk.ingest("l1", Message::lead("ok", NOW), NOW);
        assert_eq!(first.recommendation, Some(Action::DoNotRespond));
        let second = desk.ingest("l1", Message::lead("k", NOW + HOUR), NOW + HOUR);
        assert_eq!(second.analysis.unwrap().action, Action::DoNotRespond);
        assert_eq!(second.recommendation, None);
    }

    #[test]
    fn test_store_failure_still_scores() {
        let desk = LeadDesk::new(IntentEngine::with_defaults().unwrap(), Box::new(BrokenStore));
        let out = desk.ingest("l1", Message::lead("How much does it cost?", NOW), NOW);
        assert_eq!(out.status, IngestStatus::Scored);
        assert!(out.analysis.is_some());
        assert!(!out.persisted);
    }

    #[test]
    fn test_refresh_decays_stale_active_lead() {
        let desk = desk();
        desk.ingest(
            "l1",
            Message::lead(
                "We're drowning in manual reporting and losing deals. How does the API integration work with Salesforce? What's pricing for 20 seats?",
                NOW,
            ),
            NOW,
        );
        let fresh = desk.get("l1").unwrap().unwrap();
        assert!(fresh.state.is_active());

        // Within the lazy window nothing changes
        let same = desk.refresh("l1", NOW + HOUR).unwrap().unwrap();
        assert_eq!(same.last_updated, NOW);

        let later = NOW + 130.0 * HOUR;
        let decayed = desk.refresh("l1", later).unwrap().unwrap();
        assert_eq!(decayed.last_updated, later);
        assert!(decayed.score < fresh.score);
        assert!(desk.refresh("missing", later).unwrap().is_none());
    }

    #[test]
    fn test_refresh_skips_lowest_tier() {
        let desk = desk();
        desk.ingest("l1", Message::lead("no", NOW), NOW);
        let record = desk.refresh("l1", NOW + 200.0 * HOUR).unwrap().unwrap();
        assert_eq!(record.state, LeadState::Noise);
        assert_eq!(record.last_updated, NOW);
    }

    #[test]
    fn test_feedback_stored() {
        let desk = desk();
        assert!(desk.set_outcome("nobody", Outcome::Meeting).unwrap().is_none());

        desk.ingest("l1", Message::lead("Send me details on pricing?", NOW), NOW);
        let r = desk.set_outcome("l1", Outcome::Meeting).unwrap().unwrap();
        assert_eq!(r.outcome, Some(Outcome::Meeting));

        let r = desk
            .record_disagreement("l1", DisagreeDirection::Higher, Some("CFO cc'd".into()), NOW + 5.0)
            .unwrap()
            .unwrap();
        assert_eq!(r.disagreements.len(), 1);
        assert_eq!(r.disagreements[0].score_at_time, r.score);
        assert_eq!(desk.get("l1").unwrap().unwrap().disagreements, r.disagreements);
    }

    #[test]
    fn test_compare_skips_unknown_ids() {
        let desk = desk();
        desk.ingest("hot", Message::lead("Budget approved, send the contract.", NOW), NOW);
        desk.ingest("cold", Message::lead("ok", NOW), NOW);
        let out = desk.compare(&["cold", "ghost", "hot"]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].higher, "hot");
        assert_eq!(out[0].lower, "cold");
    }

    #[test]
    fn test_lock_entries_released() {
        let desk = desk();
        desk.ingest("l1", Message::lead("What does onboarding involve?", NOW), NOW);
        desk.set_outcome("l1", Outcome::Meeting).unwrap();
        desk.refresh("l1", NOW).unwrap();
        assert!(desk.locks.lock().unwrap().is_empty());
    }

    fn seeded(
        id: &str,
        state: LeadState,
        score: u32,
        lead_replies: usize,
        avg_response_min: Option<f64>,
    ) -> LeadRecord {
        let mut r = LeadRecord::new(id, NOW);
        for i in 0..lead_replies {
            r.thread.push(Message::lead(format!("reply {}", i), NOW - 60.0 * (i + 1) as f64));
        }
        r.state = state;
        r.score = score;
        r.avg_response_time_min = avg_response_min;
        r
    }

    fn with_tiebreaker(mut r: LeadRecord, eval_signals: u32, velocity_hours: f64) -> LeadRecord {
        r.tiebreaker = Tiebreaker { eval_signals, constraint_count: 1, timeline_urgency: 0, velocity_hours };
        r
    }

    #[test]
    fn test_ranked_groups_and_orders_leads() {
        let store = InMemoryLeadStore::new();
        let mut slow = with_tiebreaker(seeded("slow", LeadState::ReadyNow, 92, 1, None), 2, 5.0);
        slow.last_lead_reply_at = Some(NOW - 60.0);
        let records = [
            slow,
            with_tiebreaker(seeded("fast", LeadState::ReadyNow, 88, 1, Some(45.0)), 2, 1.0),
            with_tiebreaker(seeded("rich", LeadState::ReadyNow, 86, 1, Some(20.0)), 3, 10.0),
            seeded("e1", LeadState::Evaluating, 60, 1, None),
            seeded("e2", LeadState::HighIntent, 75, 1, Some(10.0)),
            seeded("c1", LeadState::LightInterest, 40, 1, None),
            seeded("n1", LeadState::Noise, 10, 2, None),
            seeded("n2", LeadState::Deprioritize, 5, 1, None),
        ];
        for r in &records {
            store.put(r).unwrap();
        }
        let desk = LeadDesk::new(IntentEngine::with_defaults().unwrap(), Box::new(store));

        let board = desk.ranked(NOW).unwrap();
        let ids = |rows: &[LeadRow]| rows.iter().map(|r| r.id.clone()).collect::<Vec<_>>();

        assert_eq!(ids(&board.ready_now), vec!["rich", "fast", "slow"]);
        assert_eq!(ids(&board.evaluating), vec!["e2", "e1"]);
        assert_eq!(ids(&board.curious), vec!["c1"]);
        assert_eq!(ids(&board.noise), vec!["n2", "n1"]);

        assert_eq!(board.comparative.len(), 2);
        assert_eq!(board.comparative[0].higher, "slow");
        assert_eq!(board.comparative[0].lower, "fast");

        assert_eq!(
            board.stats,
            DeskStats { total_replies: 9, ready_count: 3, evaluating_count: 2, time_saved_minutes: 15 }
        );
        assert_eq!(
            board.sla,
            SlaCounts { responded_under_30m: 2, responded_over_30m: 1, no_response_yet: 1 }
        );
    }

    #[test]
    fn test_ranked_rescores_stale_leads() {
        let desk = desk();
        desk.ingest(
            "l1",
            Message::lead(
                "We're drowning in manual reporting and losing deals. How does the API integration work with Salesforce? What's pricing for 20 seats?",
                NOW,
            ),
            NOW,
        );
        let before = desk.get("l1").unwrap().unwrap().score;
        let later = NOW + 130.0 * HOUR;
        let board = desk.ranked(later).unwrap();
        let row = board
            .ready_now
            .iter()
            .chain(&board.evaluating)
            .chain(&board.curious)
            .chain(&board.noise)
            .find(|r| r.id == "l1")
            .unwrap();
        assert!(row.score < before);
        assert_eq!(desk.get("l1").unwrap().unwrap().last_updated, later);
    }

    #[test]
    fn test_ranked_empty_store() {
        assert_eq!(desk().ranked(NOW).unwrap(), RankedLeads::default());
    }

    #[test]
    fn test_section_for_every_state() {
        assert_eq!(Section::for_state(LeadState::ReadyNow), Section::ReadyNow);
        assert_eq!(Section::for_state(LeadState::RightIcpWrongTiming), Section::Evaluating);
        assert_eq!(Section::for_state(LeadState::LightInterest), Section::Curious);
        assert_eq!(Section::for_state(LeadState::Deprioritize), Section::Noise);
    }
}

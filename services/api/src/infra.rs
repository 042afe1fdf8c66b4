use handset_advisor::advisory::{AdvisoryId, AdvisoryRecord, AdvisoryStore, AdvisoryStoreError};
use handset_advisor::config::AdvisoryConfig;
use handset_advisor::pricing::{BudgetTier, UsageTier};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Bounded in-memory advisory store. Once `capacity` records are held, each
/// insert evicts the oldest completed record, or the oldest record outright
/// when every held advisory is still pending.
#[derive(Clone)]
pub(crate) struct InMemoryAdvisoryStore {
    capacity: usize,
    records: Arc<Mutex<AdvisoryRing>>,
}

#[derive(Default)]
struct AdvisoryRing {
    by_id: HashMap<AdvisoryId, AdvisoryRecord>,
    arrival: VecDeque<AdvisoryId>,
}

impl AdvisoryRing {
    fn evict_one(&mut self) {
        let position = self
            .arrival
            .iter()
            .position(|id| {
                self.by_id
                    .get(id)
                    .map_or(true, |record| !record.outcome.is_pending())
            })
            .unwrap_or(0);

        if let Some(id) = self.arrival.remove(position) {
            self.by_id.remove(&id);
        }
    }
}

impl InMemoryAdvisoryStore {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: Arc::new(Mutex::new(AdvisoryRing::default())),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.records.lock().map(|ring| ring.by_id.len()).unwrap_or(0)
    }
}

impl Default for InMemoryAdvisoryStore {
    fn default() -> Self {
        Self::with_capacity(AdvisoryConfig::DEFAULT_STORE_CAPACITY)
    }
}

impl AdvisoryStore for InMemoryAdvisoryStore {
    fn insert(&self, record: AdvisoryRecord) -> Result<AdvisoryRecord, AdvisoryStoreError> {
        let mut ring = self.records.lock().map_err(poisoned)?;
        if ring.by_id.contains_key(&record.id) {
            return Err(AdvisoryStoreError::Conflict);
        }
        while ring.by_id.len() >= self.capacity {
            ring.evict_one();
        }
        ring.arrival.push_back(record.id.clone());
        ring.by_id.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AdvisoryRecord) -> Result<(), AdvisoryStoreError> {
        let mut ring = self.records.lock().map_err(poisoned)?;
        match ring.by_id.get_mut(&record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(AdvisoryStoreError::NotFound),
        }
    }

    fn fetch(&self, id: &AdvisoryId) -> Result<Option<AdvisoryRecord>, AdvisoryStoreError> {
        let ring = self.records.lock().map_err(poisoned)?;
        Ok(ring.by_id.get(id).cloned())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> AdvisoryStoreError {
    AdvisoryStoreError::Unavailable("advisory store mutex poisoned".to_string())
}

pub(crate) fn parse_usage_tier(raw: &str) -> Result<UsageTier, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "low" => Ok(UsageTier::Low),
        "medium" => Ok(UsageTier::Medium),
        "high" => Ok(UsageTier::High),
        _ => Err(format!("'{raw}' is not a data usage tier (low, medium, high)")),
    }
}

pub(crate) fn parse_budget_tier(raw: &str) -> Result<BudgetTier, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "low" => Ok(BudgetTier::Low),
        "medium" => Ok(BudgetTier::Medium),
        "high" => Ok(BudgetTier::High),
        _ => Err(format!("'{raw}' is not a budget tier (low, medium, high)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handset_advisor::advisory::{AdvisoryOutcome, AdvisoryRequest};
    use handset_advisor::pricing::{compute, ContractTerm, MonthlyFee, UserProfile};

    fn record(id: &str) -> AdvisoryRecord {
        let breakdown = compute(
            29900,
            MonthlyFee::new(999).expect("fee"),
            ContractTerm::new(30).expect("term"),
            false,
        );
        let request = AdvisoryRequest::new(
            "iPhone 16 128GB",
            "中華電信 999/月 (30個月)",
            &breakdown,
            UserProfile::default(),
        );
        AdvisoryRecord::pending(AdvisoryId(id.to_string()), &request)
    }

    #[test]
    fn store_rejects_duplicates_and_unknown_updates() {
        let store = InMemoryAdvisoryStore::default();
        store.insert(record("adv-1")).expect("first insert");
        assert!(matches!(
            store.insert(record("adv-1")),
            Err(AdvisoryStoreError::Conflict)
        ));
        assert!(matches!(
            store.update(record("adv-2")),
            Err(AdvisoryStoreError::NotFound)
        ));

        let mut done = record("adv-1");
        done.complete(AdvisoryOutcome::Succeeded("ok".to_string()));
        store.update(done).expect("update stored");
        let fetched = store
            .fetch(&AdvisoryId("adv-1".to_string()))
            .expect("fetch works")
            .expect("record present");
        assert_eq!(fetched.outcome.label(), "succeeded");
    }

    #[test]
    fn parses_profile_tiers_case_insensitively() {
        assert_eq!(parse_usage_tier(" HIGH "), Ok(UsageTier::High));
        assert_eq!(parse_budget_tier("low"), Ok(BudgetTier::Low));
        assert!(parse_usage_tier("unlimited").is_err());
    }

    fn completed(id: &str) -> AdvisoryRecord {
        let mut record = record(id);
        record.complete(AdvisoryOutcome::Succeeded("ok".to_string()));
        record
    }

    #[test]
    fn completed_advisories_are_evicted_oldest_first() {
        let store = InMemoryAdvisoryStore::with_capacity(64);
        for index in 0..50_000 {
            let id = format!("adv-{index}");
            store.insert(record(&id)).expect("insert");
            store.update(completed(&id)).expect("complete");
        }

        assert_eq!(store.len(), 64);
        let oldest = store
            .fetch(&AdvisoryId("adv-0".to_string()))
            .expect("fetch works");
        assert!(oldest.is_none());
        let newest = store
            .fetch(&AdvisoryId("adv-49999".to_string()))
            .expect("fetch works");
        assert!(newest.is_some());
    }

    #[test]
    fn pending_advisories_outlive_older_completed_ones() {
        let store = InMemoryAdvisoryStore::with_capacity(2);
        store.insert(record("adv-pending")).expect("insert pending");
        store.insert(completed("adv-done")).expect("insert done");
        store.insert(record("adv-next")).expect("insert next");

        let lookup = |id: &str| {
            store
                .fetch(&AdvisoryId(id.to_string()))
                .expect("fetch works")
        };
        assert!(lookup("adv-pending").is_some());
        assert!(lookup("adv-done").is_none());
        assert!(lookup("adv-next").is_some());

        // With nothing completed left to drop, the oldest pending record goes.
        store.insert(record("adv-last")).expect("insert last");
        assert!(lookup("adv-pending").is_none());
        assert_eq!(store.len(), 2);
    }
}

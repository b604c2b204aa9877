use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::dns::question::Question;
use crate::dns::record::ResourceRecord;
use crate::dns::{QClass, QType};

/// Handle for sharing one cache between resolvers. Writers are serialized
/// by the mutex; readers get a consistent snapshot as cloned records.
pub type SharedCache = Arc<Mutex<Cache>>;

#[derive(Debug, Clone)]
struct CachedRecord {
    record: ResourceRecord,
    // None marks a seeded record that never expires.
    expires_at: Option<DateTime<Utc>>,
}

impl CachedRecord {
    fn live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expires_at| now < expires_at)
    }
}

/// Records keyed by the question they answer, each with its own expiry.
/// Insertion order within a question is kept; re-seen records refresh their
/// expiry in place instead of duplicating.
#[derive(Debug)]
pub struct Cache {
    entries: HashMap<Question, Vec<CachedRecord>>,
}

impl Cache {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        // The root-hints slot exists from the start and is filled by seeding.
        entries.insert(Self::root_question(), Vec::new());
        Self { entries }
    }

    /// The question whose cached answer is the set of root nameservers.
    pub fn root_question() -> Question {
        Question::new(".", QType::NS, QClass::IN)
    }

    pub fn into_shared(self) -> SharedCache {
        Arc::new(Mutex::new(self))
    }

    /// All unexpired records for the question. A lookup for a non-CNAME type
    /// also surfaces live CNAME records under the same name, which is how an
    /// alias shows up as the answer to an address query.
    pub fn get_valid(&self, question: &Question) -> Vec<ResourceRecord> {
        self.valid_at(question, Utc::now())
    }

    /// `get_valid` against an explicit clock.
    pub fn valid_at(&self, question: &Question, now: DateTime<Utc>) -> Vec<ResourceRecord> {
        let mut records = self.live_for(question, now);
        if question.qtype != QType::CNAME {
            let alias = Question::new(question.qname.clone(), QType::CNAME, question.qclass);
            records.extend(self.live_for(&alias, now));
        }
        records
    }

    fn live_for(&self, question: &Question, now: DateTime<Utc>) -> Vec<ResourceRecord> {
        self.entries
            .get(question)
            .map(|slot| {
                slot.iter()
                    .filter(|cached| cached.live_at(now))
                    .map(|cached| cached.record.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Everything stored under the question, expired or not. Used for root
    /// hints and bootstrap, where staleness is better than nothing.
    pub fn get_raw(&self, question: &Question) -> Vec<ResourceRecord> {
        self.entries
            .get(question)
            .map(|slot| slot.iter().map(|cached| cached.record.clone()).collect())
            .unwrap_or_default()
    }

    /// Stores a record with an expiry of now + TTL. Re-inserting a record
    /// already present refreshes its TTL and expiry without moving it.
    pub fn insert(&mut self, record: ResourceRecord) {
        self.insert_at(record, Utc::now());
    }

    /// `insert` against an explicit clock.
    pub fn insert_at(&mut self, record: ResourceRecord, now: DateTime<Utc>) {
        let expires_at = now + Duration::seconds(i64::from(record.ttl));
        self.store(record, Some(expires_at));
    }

    /// Stores a record that never expires. Root hints go in this way.
    pub fn seed(&mut self, record: ResourceRecord) {
        self.store(record, None);
    }

    fn store(&mut self, record: ResourceRecord, expires_at: Option<DateTime<Utc>>) {
        let slot = self.entries.entry(record.question.clone()).or_default();
        match slot.iter_mut().find(|cached| cached.record == record) {
            Some(existing) => {
                existing.record.ttl = record.ttl;
                // A permanent record stays permanent even when the same data
                // shows up again in a response with a TTL.
                if existing.expires_at.is_some() || expires_at.is_none() {
                    existing.expires_at = expires_at;
                }
            }
            None => slot.push(CachedRecord { record, expires_at }),
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

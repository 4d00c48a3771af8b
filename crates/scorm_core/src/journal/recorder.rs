//! Element journal fed from the notification bus.

use crate::model::element::TimestampedElement;
use crate::notify::bus::NotificationBus;
use log::{debug, warn};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

pub type JournalResult<T> = Result<T, JournalError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalError {
    UnknownBatch(u64),
}

impl Display for JournalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBatch(id) => write!(f, "batch is not awaiting confirmation: {id}"),
        }
    }
}

impl Error for JournalError {}

/// Source of Unix epoch milliseconds.
pub type Clock = fn() -> i64;

/// Wall clock in Unix epoch milliseconds; `0` if the system clock is before
/// the epoch.
pub fn system_clock_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Sealed group of elements sent together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingBatch {
    pub id: u64,
    pub elements: Vec<TimestampedElement>,
}

#[derive(Debug)]
pub struct ElementJournal {
    clock: Clock,
    next_counter: u64,
    next_batch_id: u64,
    pending: Vec<TimestampedElement>,
    sent: BTreeMap<u64, OutgoingBatch>,
}

impl Default for ElementJournal {
    fn default() -> Self {
        Self::with_clock(system_clock_ms)
    }
}

impl ElementJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batch ids start from the clock reading at construction.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            next_counter: 0,
            next_batch_id: u64::try_from(clock()).unwrap_or(0),
            pending: Vec::new(),
            sent: BTreeMap::new(),
        }
    }

    /// Subscribes `journal` to `SetValue` and `Commit` on `bus`.
    ///
    /// Unchanged writes are not recorded.
    pub fn attach(journal: &Rc<RefCell<Self>>, bus: &mut NotificationBus) {
        let on_set = Rc::clone(journal);
        bus.on_set_value(move |key, value, changed| {
            if changed {
                on_set.borrow_mut().record(key, value);
            }
        });
        let on_commit = Rc::clone(journal);
        bus.on_commit(move || {
            on_commit.borrow_mut().seal();
        });
    }

    pub fn record(&mut self, key: &str, value: &str) {
        let element = TimestampedElement::new(key, value, (self.clock)(), self.next_counter);
        self.next_counter += 1;
        self.pending.push(element);
    }

    /// Moves pending elements into a new batch. Returns its id, or `None`
    /// when nothing was pending.
    pub fn seal(&mut self) -> Option<u64> {
        if self.pending.is_empty() {
            return None;
        }
        let id = self.next_batch_id;
        self.next_batch_id += 1;
        let elements = std::mem::take(&mut self.pending);
        debug!(
            "event=journal_seal module=journal status=ok batch_id={id} elements={}",
            elements.len()
        );
        self.sent.insert(id, OutgoingBatch { id, elements });
        Some(id)
    }

    pub fn pending(&self) -> &[TimestampedElement] {
        &self.pending
    }

    /// Batches sealed but not yet confirmed, oldest first.
    pub fn unacknowledged(&self) -> impl Iterator<Item = &OutgoingBatch> {
        self.sent.values()
    }

    pub fn batch(&self, id: u64) -> Option<&OutgoingBatch> {
        self.sent.get(&id)
    }

    /// Confirms delivery of one batch and releases it.
    pub fn acknowledge(&mut self, id: u64) -> JournalResult<OutgoingBatch> {
        match self.sent.remove(&id) {
            Some(batch) => Ok(batch),
            None => {
                warn!("event=journal_ack module=journal status=error batch_id={id}");
                Err(JournalError::UnknownBatch(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ElementJournal, JournalError};

    fn fixed_clock() -> i64 {
        1_700_000_000_000
    }

    #[test]
    fn seal_without_pending_is_none() {
        let mut journal = ElementJournal::with_clock(fixed_clock);
        assert_eq!(journal.seal(), None);
        assert_eq!(journal.unacknowledged().count(), 0);
    }

    #[test]
    fn counters_continue_across_batches() {
        let mut journal = ElementJournal::with_clock(fixed_clock);
        journal.record("cmi.location", "p1");
        journal.record("cmi.location", "p2");
        let first = journal.seal().expect("first batch");
        journal.record("cmi.exit", "suspend");
        let second = journal.seal().expect("second batch");

        assert_eq!(first, 1_700_000_000_000);
        assert_eq!(second, first + 1);
        let counters: Vec<u64> = journal
            .unacknowledged()
            .flat_map(|batch| batch.elements.iter().map(|element| element.counter()))
            .collect();
        assert_eq!(counters, vec![0, 1, 2]);
    }

    #[test]
    fn acknowledge_releases_batch_once() {
        let mut journal = ElementJournal::with_clock(fixed_clock);
        journal.record("cmi.location", "p1");
        let id = journal.seal().expect("batch");

        let batch = journal.acknowledge(id).expect("known batch");
        assert_eq!(batch.elements.len(), 1);
        assert!(journal.batch(id).is_none());
        assert_eq!(
            journal.acknowledge(id).unwrap_err(),
            JournalError::UnknownBatch(id)
        );
    }
}

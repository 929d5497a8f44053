//! Persisted to-do list.
//!
//! Completing an item feeds the `checklistItemCompleted` daily counter.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::game::{CounterKind, Ledger};
use crate::storage::{load_json, save_json, KvStore};

pub const CHECKLIST_KEY: &str = "checklist";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: u64,
    pub text: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub done_at: Option<DateTime<Utc>>,
}

pub struct Checklist {
    items: Mutex<Vec<ChecklistItem>>,
    store: Arc<dyn KvStore>,
    ledger: Arc<Ledger>,
    clock: Arc<dyn Clock>,
}

impl Checklist {
    pub fn open(store: Arc<dyn KvStore>, ledger: Arc<Ledger>, clock: Arc<dyn Clock>) -> Self {
        let items: Vec<ChecklistItem> = match load_json(store.as_ref(), CHECKLIST_KEY) {
            Ok(found) => found.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable checklist, starting empty");
                Vec::new()
            }
        };
        Self {
            items: Mutex::new(items),
            store,
            ledger,
            clock,
        }
    }

    pub fn add(&self, text: impl Into<String>) -> u64 {
        let mut items = self.lock();
        let id = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        items.push(ChecklistItem {
            id,
            text: text.into(),
            done: false,
            created_at: self.clock.now(),
            done_at: None,
        });
        self.persist(&items);
        id
    }

    pub fn remove(&self, id: u64) -> bool {
        let mut items = self.lock();
        let before = items.len();
        items.retain(|i| i.id != id);
        let removed = items.len() != before;
        if removed {
            self.persist(&items);
        }
        removed
    }

    pub fn list(&self) -> Vec<ChecklistItem> {
        self.lock().clone()
    }

    /// Mark an item done. Only the first completion of an item counts
    /// toward the daily quest.
    pub fn mark_done(&self, id: u64) -> Option<ChecklistItem> {
        let (item, newly_done) = {
            let mut items = self.lock();
            let item = items.iter_mut().find(|i| i.id == id)?;
            let newly_done = !item.done;
            if newly_done {
                item.done = true;
                item.done_at = Some(self.clock.now());
            }
            let snapshot = item.clone();
            if newly_done {
                self.persist(&items);
            }
            (snapshot, newly_done)
        };
        if newly_done {
            self.ledger.bump_counter(CounterKind::ChecklistItemCompleted);
        }
        Some(item)
    }

    fn persist(&self, items: &[ChecklistItem]) {
        if let Err(e) = save_json(self.store.as_ref(), CHECKLIST_KEY, items) {
            tracing::warn!(error = %e, "failed to persist checklist");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ChecklistItem>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::events::MemorySink;
    use crate::storage::MemoryStore;

    fn checklist() -> (Checklist, Arc<Ledger>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let ledger = Arc::new(Ledger::open(
            store.clone(),
            Arc::new(MemorySink::new()),
            clock.clone(),
        ));
        (Checklist::open(store.clone(), ledger.clone(), clock), ledger, store)
    }

    #[test]
    fn add_list_remove() {
        let (c, ..) = checklist();
        let a = c.add("read chapter 4");
        let b = c.add("lab report");
        assert_eq!(b, a + 1);
        assert!(c.remove(a));
        assert!(!c.remove(a));
        assert_eq!(c.list().len(), 1);
    }

    #[test]
    fn completion_counts_once_per_item() {
        let (c, ledger, _) = checklist();
        let id = c.add("flashcards");
        let item = c.mark_done(id).unwrap();
        assert!(item.done);
        assert!(item.done_at.is_some());
        c.mark_done(id);
        assert_eq!(ledger.daily().todos_done, 1);
        assert!(c.mark_done(999).is_none());
    }

    #[test]
    fn third_completion_finishes_quest() {
        let (c, ledger, _) = checklist();
        for n in 0..3 {
            let id = c.add(format!("task {n}"));
            c.mark_done(id);
        }
        let daily = ledger.daily();
        assert!(daily.quests["checklist3"].done);
        assert_eq!(ledger.game_state().total_xp, 15);
    }

    #[test]
    fn items_persist() {
        let (c, ledger, store) = checklist();
        c.add("persist me");
        let reopened = Checklist::open(store, ledger, Arc::new(SystemClock));
        assert_eq!(reopened.list()[0].text, "persist me");
    }
}

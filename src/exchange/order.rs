use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::transcript::Entry;

/// When bot replies are appended to the transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyOrder {
    /// As each response arrives. Overlapping exchanges may finish in any order.
    #[default]
    Arrival,
    /// In the order the messages were submitted.
    Submission,
}

impl fmt::Display for ReplyOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arrival => f.write_str("arrival"),
            Self::Submission => f.write_str("submission"),
        }
    }
}

/// Holds back replies until every earlier submission has resolved.
#[derive(Debug, Default)]
pub(crate) struct Sequencer {
    state: Mutex<SequencerState>,
}

#[derive(Debug, Default)]
struct SequencerState {
    next_ticket: u64,
    next_to_apply: u64,
    // Resolved exchanges waiting on an earlier one. `None` releases the slot
    // without producing an entry.
    resolved: BTreeMap<u64, Option<Entry>>,
}

impl Sequencer {
    pub(crate) fn ticket(&self) -> u64 {
        let mut state = self.lock();
        let ticket = state.next_ticket;
        state.next_ticket += 1;
        ticket
    }

    /// Records the result for `ticket` and hands every entry that is now in
    /// order to `apply`.
    ///
    /// `apply` runs under the sequencer lock so releases from different
    /// exchanges cannot interleave.
    pub(crate) fn complete(
        &self,
        ticket: u64,
        entry: Option<Entry>,
        mut apply: impl FnMut(Entry),
    ) {
        let mut state = self.lock();
        state.resolved.insert(ticket, entry);

        loop {
            let next = state.next_to_apply;
            let Some(entry) = state.resolved.remove(&next) else {
                break;
            };
            state.next_to_apply += 1;
            if let Some(entry) = entry {
                apply(entry);
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SequencerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// src/state.rs

use crate::domain::Listing;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Where the current collection came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Annonces,
    File(String),
}

impl fmt::Display for LoadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadSource::Annonces => write!(f, "annonces"),
            LoadSource::File(name) => write!(f, "file:{name}"),
        }
    }
}

/// The full fetched array. Never mutated: a new load replaces it wholesale.
#[derive(Debug)]
pub struct ListingCollection {
    pub listings: Vec<Listing>,
    pub source: LoadSource,
    pub loaded_at: DateTime<Utc>,
    /// Generation of the load that produced it. Detail links carry it so a
    /// row rendered from an older collection cannot open a newer listing.
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied(usize),
    /// A newer load started after this one; its result was dropped.
    Stale,
}

/// UI state shared by every worker.
///
/// Readers take an `Arc` snapshot of the collection and filter/render it
/// without holding any lock.
#[derive(Debug, Default)]
pub struct AppState {
    collection: RwLock<Option<Arc<ListingCollection>>>,
    generation: AtomicU64,
    in_flight: AtomicUsize,
    status: Mutex<Option<StatusMessage>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<Arc<ListingCollection>> {
        self.collection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Starts a load. Any ticket issued earlier becomes stale.
    pub fn begin_load(&self, source: LoadSource) -> LoadTicket<'_> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadTicket {
            state: self,
            generation,
            source,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Installs the result of `ticket` unless a newer load has started since.
    pub fn commit(&self, ticket: LoadTicket<'_>, listings: Vec<Listing>) -> CommitOutcome {
        let mut slot = self
            .collection
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        // Checked under the write lock so two commits cannot interleave.
        if !self.is_current(ticket.generation) {
            log::warn!(
                "discarding stale load #{} from {}",
                ticket.generation,
                ticket.source
            );
            return CommitOutcome::Stale;
        }

        let count = listings.len();
        *slot = Some(Arc::new(ListingCollection {
            listings,
            source: ticket.source.clone(),
            loaded_at: Utc::now(),
            generation: ticket.generation,
        }));
        self.set_status(StatusMessage::success(format!(
            "{count} annonces chargées"
        )));
        CommitOutcome::Applied(count)
    }

    /// Records a failed load. The collection is left as it was.
    pub fn fail(&self, ticket: LoadTicket<'_>, message: impl Into<String>) {
        let message = message.into();
        if self.is_current(ticket.generation) {
            self.set_status(StatusMessage::error(message));
        } else {
            log::debug!(
                "ignoring failure of stale load #{}: {message}",
                ticket.generation
            );
        }
    }

    pub fn status(&self) -> Option<StatusMessage> {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_status(&self, message: StatusMessage) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = Some(message);
    }
}

/// Proof that a load was started. Dropping it ends the in-flight period.
#[derive(Debug)]
pub struct LoadTicket<'a> {
    state: &'a AppState,
    generation: u64,
    source: LoadSource,
}

impl LoadTicket<'_> {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for LoadTicket<'_> {
    fn drop(&mut self) {
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

//! Stale-response guard for catalog fetches.
//!
//! A catalog fetch is fire-and-forget per page visit and not cancellable. If
//! the user navigates away while a slow fetch is in flight, the late result
//! must not be written into state that belongs to a newer visit. Each visit
//! takes a [`LoadTicket`]; completing a ticket whose generation is no longer
//! current yields [`LoadOutcome::Stale`] and the result is discarded.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

/// Generation counter handing out load tickets.
#[derive(Debug, Default)]
pub struct CatalogLoader {
    generation: AtomicU64,
}

/// Ticket identifying one load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Result of completing a load ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome<T> {
    /// The ticket was still current; the value may be applied.
    Fresh(T),
    /// A newer load started in the meantime; discard the value.
    Stale,
}

impl<T> LoadOutcome<T> {
    /// The fresh value, or `None` when stale.
    pub fn into_fresh(self) -> Option<T> {
        match self {
            Self::Fresh(value) => Some(value),
            Self::Stale => None,
        }
    }

    /// Whether this outcome is stale.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

impl CatalogLoader {
    /// Create a loader with no loads in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load, invalidating every earlier ticket.
    pub fn begin(&self) -> LoadTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        LoadTicket { generation }
    }

    /// Whether the ticket still belongs to the latest load.
    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Complete a load: the value is kept only when the ticket is current.
    pub fn complete<T>(&self, ticket: LoadTicket, value: T) -> LoadOutcome<T> {
        if self.is_current(ticket) {
            LoadOutcome::Fresh(value)
        } else {
            debug!(
                generation = ticket.generation,
                current = self.generation.load(Ordering::SeqCst),
                "Discarding stale catalog response"
            );
            LoadOutcome::Stale
        }
    }
}

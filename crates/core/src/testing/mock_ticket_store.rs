//! In-memory ticket store for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::ticket::{NewTicket, Ticket, TicketError, TicketFilter, TicketStore};

#[derive(Debug, Default)]
struct Inner {
    tickets: BTreeMap<i64, Ticket>,
    last_id: i64,
}

/// Mock implementation of the TicketStore trait.
///
/// Provides controllable behavior for testing:
/// - Inject a failure into the next write
/// - Count successful writes, to assert that rejected operations wrote nothing
///
/// Listing follows the SQLite store's order: newest first, then highest id.
#[derive(Debug, Default)]
pub struct MockTicketStore {
    inner: Mutex<Inner>,
    /// If set, the next add, update or delete fails with this error.
    next_error: Mutex<Option<TicketError>>,
    writes: AtomicUsize,
}

impl MockTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next write with `error`.
    pub fn set_next_error(&self, error: TicketError) {
        *self.next_error.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Number of writes that went through.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Store `ticket` as-is, bypassing validation and the write counter.
    pub fn insert(&self, ticket: Ticket) {
        let mut inner = self.inner();
        inner.last_id = inner.last_id.max(ticket.id);
        inner.tickets.insert(ticket.id, ticket);
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take_error(&self) -> Result<(), TicketError> {
        match self
            .next_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn wrote(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

impl TicketStore for MockTicketStore {
    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketError> {
        let mut tickets: Vec<Ticket> = self
            .inner()
            .tickets
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| {
            b.date_created
                .cmp(&a.date_created)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(tickets)
    }

    fn count(&self, filter: &TicketFilter) -> Result<i64, TicketError> {
        let count = self
            .inner()
            .tickets
            .values()
            .filter(|t| filter.matches(t))
            .count();
        Ok(count as i64)
    }

    fn get(&self, id: i64) -> Result<Option<Ticket>, TicketError> {
        Ok(self.inner().tickets.get(&id).cloned())
    }

    fn add(&self, ticket: NewTicket) -> Result<Ticket, TicketError> {
        self.take_error()?;

        let mut inner = self.inner();
        inner.last_id += 1;
        let ticket = ticket.into_ticket(inner.last_id);
        inner.tickets.insert(ticket.id, ticket.clone());
        self.wrote();
        Ok(ticket)
    }

    fn update(&self, ticket: &Ticket) -> Result<(), TicketError> {
        self.take_error()?;

        let mut inner = self.inner();
        match inner.tickets.get_mut(&ticket.id) {
            Some(stored) => {
                *stored = ticket.clone();
                self.wrote();
                Ok(())
            }
            None => Err(TicketError::NotFound(ticket.id)),
        }
    }

    fn delete(&self, id: i64) -> Result<Ticket, TicketError> {
        self.take_error()?;

        let removed = self
            .inner()
            .tickets
            .remove(&id)
            .ok_or(TicketError::NotFound(id))?;
        self.wrote();
        Ok(removed)
    }
}

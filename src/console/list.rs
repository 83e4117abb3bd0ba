use crate::errors::AppError;
use crate::models::{Booking, Category, NailDesign, RecordId, Service, WaitlistEntry};

pub trait Keyed {
    fn key(&self) -> &RecordId;
}

impl Keyed for Booking {
    fn key(&self) -> &RecordId {
        &self.id
    }
}

impl Keyed for Service {
    fn key(&self) -> &RecordId {
        &self.id
    }
}

impl Keyed for NailDesign {
    fn key(&self) -> &RecordId {
        &self.id
    }
}

impl Keyed for Category {
    fn key(&self) -> &RecordId {
        &self.id
    }
}

impl Keyed for WaitlistEntry {
    fn key(&self) -> &RecordId {
        &self.id
    }
}

/// Issued when a fetch starts; identifies how recent its response is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Point-in-time copy of a server list plus the loading/error flags around it.
///
/// Fetches replace the list wholesale. A response that resolves after a newer
/// one has already been applied is dropped, so a slow early fetch cannot
/// overwrite fresher data.
#[derive(Debug)]
pub struct HeldList<T> {
    items: Vec<T>,
    in_flight: usize,
    error: Option<String>,
    issued: u64,
    applied: u64,
}

impl<T> Default for HeldList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            in_flight: 0,
            error: None,
            issued: 0,
            applied: 0,
        }
    }
}

impl<T> HeldList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin_fetch(&mut self) -> Ticket {
        self.in_flight += 1;
        self.issued += 1;
        self.error = None;
        Ticket(self.issued)
    }

    /// Returns false when the response was stale and discarded.
    pub fn finish_fetch(&mut self, ticket: Ticket, result: Result<Vec<T>, AppError>) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        if ticket.0 < self.applied {
            return false;
        }
        self.applied = ticket.0;

        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(e) => {
                self.items.clear();
                self.error = Some(e.to_string());
            }
        }
        true
    }

    pub fn begin_write(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    pub fn finish_write(&mut self, error: Option<String>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if error.is_some() {
            self.error = error;
        }
    }
}

impl<T: Keyed> HeldList<T> {
    pub fn find(&self, id: &RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.key() == id)
    }

    /// Drop the record with `id`, leaving every other record in place.
    pub fn remove(&mut self, id: &RecordId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.key() != id);
        self.items.len() != before
    }
}

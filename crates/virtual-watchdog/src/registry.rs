//! Client registry: a generational slot map of active watchdog clients.
//!
//! The registry owns its records outright; client handles refer to them
//! through a stable [`ClientId`]. Generations protect against stale ids:
//! once a slot is freed and reused, ids minted for the old occupant are
//! rejected. Duplicate registration is impossible by construction since
//! every insert mints a fresh id.

use crate::error::{VirtualWatchdogError, VirtualWatchdogResult};

/// Stable identity of a registered client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct ClientRecord {
    name: String,
    budget_ticks: u32,
    remaining_ticks: u32,
    generation: u32,
}

#[derive(Debug)]
enum Slot {
    Occupied(ClientRecord),
    Free {
        next_free: Option<u32>,
        generation: u32,
    },
}

/// Outcome of one supervision tick over the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Number of registered clients at the time of the tick.
    pub active: usize,
    /// Number of clients whose countdown sits at zero.
    pub starved: usize,
}

impl TickReport {
    /// Whether every registered client proved liveness in time.
    #[must_use]
    pub fn all_alive(&self) -> bool {
        self.starved == 0
    }
}

/// Slot map of active client records with a free list and generation
/// counters.
#[derive(Debug, Default)]
pub struct Registry {
    slots: Vec<Slot>,
    free_head: Option<u32>,
    active: usize,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active
    }

    /// Check whether no clients are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Register a client with a full countdown budget.
    pub fn insert(&mut self, name: impl Into<String>, budget_ticks: u32) -> ClientId {
        let budget_ticks = budget_ticks.max(1);
        let record = |generation| ClientRecord {
            name: name.into(),
            budget_ticks,
            remaining_ticks: budget_ticks,
            generation,
        };

        self.active += 1;
        if let Some(index) = self.free_head {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                if let Slot::Free {
                    next_free,
                    generation,
                } = *slot
                {
                    self.free_head = next_free;
                    *slot = Slot::Occupied(record(generation));
                    return ClientId { index, generation };
                }
            }
        }

        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot::Occupied(record(0)));
        ClientId {
            index,
            generation: 0,
        }
    }

    /// Deregister a client by identity.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualWatchdogError::StaleClient`] if the id does not
    /// refer to a live entry.
    pub fn remove(&mut self, id: ClientId) -> VirtualWatchdogResult<()> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .ok_or(VirtualWatchdogError::StaleClient)?;
        match slot {
            Slot::Occupied(record) if record.generation == id.generation => {
                *slot = Slot::Free {
                    next_free: self.free_head,
                    generation: id.generation.wrapping_add(1),
                };
                self.free_head = Some(id.index);
                self.active -= 1;
                Ok(())
            }
            _ => Err(VirtualWatchdogError::StaleClient),
        }
    }

    /// Reset a client's countdown to its full budget.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualWatchdogError::StaleClient`] if the id does not
    /// refer to a live entry.
    pub fn kick(&mut self, id: ClientId) -> VirtualWatchdogResult<()> {
        match self.slots.get_mut(id.index as usize) {
            Some(Slot::Occupied(record)) if record.generation == id.generation => {
                record.remaining_ticks = record.budget_ticks;
                Ok(())
            }
            _ => Err(VirtualWatchdogError::StaleClient),
        }
    }

    /// Check whether an id refers to a live entry.
    #[must_use]
    pub fn contains(&self, id: ClientId) -> bool {
        matches!(
            self.slots.get(id.index as usize),
            Some(Slot::Occupied(record)) if record.generation == id.generation
        )
    }

    /// Remaining ticks for a client, if live.
    #[must_use]
    pub fn remaining_ticks(&self, id: ClientId) -> Option<u32> {
        match self.slots.get(id.index as usize) {
            Some(Slot::Occupied(record)) if record.generation == id.generation => {
                Some(record.remaining_ticks)
            }
            _ => None,
        }
    }

    /// Name of a client, if live.
    #[must_use]
    pub fn name(&self, id: ClientId) -> Option<&str> {
        match self.slots.get(id.index as usize) {
            Some(Slot::Occupied(record)) if record.generation == id.generation => {
                Some(record.name.as_str())
            }
            _ => None,
        }
    }

    /// Age every client's countdown by one tick.
    ///
    /// Countdowns saturate at zero: a stalled client keeps reporting as
    /// starved tick after tick until it kicks or the device resets. One
    /// in-memory pass, O(registered clients).
    pub fn age_all(&mut self) -> TickReport {
        let mut starved = 0;
        for slot in &mut self.slots {
            if let Slot::Occupied(record) = slot {
                record.remaining_ticks = record.remaining_ticks.saturating_sub(1);
                if record.remaining_ticks == 0 {
                    starved += 1;
                }
            }
        }
        TickReport {
            active: self.active,
            starved,
        }
    }
}

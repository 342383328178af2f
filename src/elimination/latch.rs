//! Re-armable countdown latch used as the barrier between phases.
//!
//! The scheduler arms the latch with the number of workers it is about to
//! activate, signals them, then waits for the generation to advance. Each
//! worker arrives exactly once per activation. Unlike a fixed-party
//! barrier the participant count changes on every arm.

use parking_lot::{Condvar, Mutex};

#[derive(Debug)]
struct LatchState {
    pending: usize,
    generation: u64,
    poisoned: bool,
}

#[derive(Debug)]
pub struct PhaseLatch {
    state: Mutex<LatchState>,
    released: Condvar,
}

/// Ticket returned by [`PhaseLatch::arm`], consumed by [`PhaseLatch::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Generation(u64);

/// How a generation was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Completed,
    /// At least one participant arrived while panicking.
    Poisoned,
}

impl PhaseLatch {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LatchState {
                pending: 0,
                generation: 0,
                poisoned: false,
            }),
            released: Condvar::new(),
        }
    }

    /// Starts a new generation expecting `participants` arrivals.
    ///
    /// # Panics
    /// Panics if the previous generation has not been released yet.
    pub fn arm(&self, participants: usize) -> Generation {
        let mut state = self.state.lock();
        assert_eq!(state.pending, 0, "latch re-armed before release");
        state.poisoned = false;
        if participants == 0 {
            state.generation = state.generation.wrapping_add(1);
            return Generation(state.generation.wrapping_sub(1));
        }
        state.pending = participants;
        Generation(state.generation)
    }

    pub fn arrive(&self) {
        self.arrive_with(false)
    }

    pub fn arrive_poisoned(&self) {
        self.arrive_with(true)
    }

    fn arrive_with(&self, poisoned: bool) {
        let mut state = self.state.lock();
        debug_assert!(state.pending > 0, "arrival on an unarmed latch");
        state.poisoned |= poisoned;
        state.pending = state.pending.saturating_sub(1);
        if state.pending == 0 {
            state.generation = state.generation.wrapping_add(1);
            self.released.notify_all();
        }
    }

    /// Blocks until `generation` has been released.
    pub fn wait(&self, generation: Generation) -> Release {
        let mut state = self.state.lock();
        while state.generation == generation.0 {
            self.released.wait(&mut state);
        }
        if state.poisoned {
            Release::Poisoned
        } else {
            Release::Completed
        }
    }
}

impl Default for PhaseLatch {
    fn default() -> Self {
        Self::new()
    }
}

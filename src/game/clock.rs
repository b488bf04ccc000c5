//! Animation Clock
//!
//! Drives every time-based transition in the simulation: the global and
//! teleport phases plus one cancellable periodic task per armed door or
//! elevator. The host owns the real timers and calls the tick entry
//! points at a fixed cadence; nothing here blocks.
//!
//! A task is removed, not merely flagged, when its machine reaches a
//! terminal state or the session resets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::game::grid::GridCoord;
use crate::game::mechanism::{InteractionState, MechanismTick};

/// Scheduler of per-mechanism periodic tasks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationClock {
    armed: BTreeSet<GridCoord>,
}

impl AnimationClock {
    /// Create a clock with no scheduled tasks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a mechanism's periodic task. Idempotent.
    pub fn arm(&mut self, coord: GridCoord) -> bool {
        self.armed.insert(coord)
    }

    /// Remove a mechanism's task.
    pub fn cancel(&mut self, coord: GridCoord) {
        let _ = self.armed.remove(&coord);
    }

    /// Remove every task.
    pub fn cancel_all(&mut self) {
        self.armed.clear();
    }

    /// Whether a mechanism currently has a scheduled task.
    pub fn is_armed(&self, coord: GridCoord) -> bool {
        self.armed.contains(&coord)
    }

    /// Number of scheduled tasks.
    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    /// One world tick: advance the global phase, then every armed
    /// mechanism in coordinate order. The global phase moves first so a
    /// renderer reading after the tick sees a consistent frame.
    ///
    /// Returns the doors that finished opening this tick.
    pub(crate) fn tick(&mut self, interaction: &mut InteractionState) -> Vec<GridCoord> {
        interaction.advance_global();

        let mut finished = Vec::new();
        let scheduled: Vec<GridCoord> = self.armed.iter().copied().collect();
        for coord in scheduled {
            match interaction.advance_mechanism(coord) {
                MechanismTick::Running => {}
                MechanismTick::Finished => {
                    self.cancel(coord);
                    finished.push(coord);
                }
                // Stale task (machine no longer ticking): drop it
                MechanismTick::Idle => self.cancel(coord),
            }
        }
        finished
    }

    /// One teleport tick: advance the shared teleport visual phase.
    pub(crate) fn teleport_tick(&mut self, interaction: &mut InteractionState) {
        interaction.advance_teleport();
    }
}

//! Mechanism State
//!
//! Mutable per-mechanism state (keys, switches, doors, elevators) keyed by
//! grid coordinate, plus the two global animation phases. All state here
//! initializes to zero at load, is mutated only by pickup triggers and
//! clock ticks, and is restored wholesale by `reset_all`.

use std::collections::BTreeMap;
use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::game::grid::{CellKind, GridCoord, GridModel};
use crate::CUBE_SIZE;

/// Door slide distance added per tick.
pub const DOOR_SLIDE_STEP: f32 = CUBE_SIZE / 60.0;

/// Slide distance at which a door counts as fully open.
pub const DOOR_SLIDE_LIMIT: f32 = CUBE_SIZE + 0.1;

/// Sentinel progress for a fully open door: negative means "stop
/// rendering this door".
pub const DOOR_OPEN: f32 = -1.0;

/// Elevator phase advance per tick.
pub const ELEVATOR_PHASE_STEP: f32 = PI / 180.0;

/// Global phase advance per world tick.
pub const GLOBAL_PHASE_STEP: f32 = 1.0;

/// Teleport visual phase advance per teleport tick.
pub const TELEPORT_PHASE_STEP: f32 = PI / 90.0;

// =============================================================================
// MECHANISM STATE
// =============================================================================

/// Which machine a mechanism entry runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MechanismKind {
    /// Slides open once its paired key is collected, then stops for good
    Door,
    /// Oscillates forever once its paired switch is collected
    Elevator,
    /// Collectible; no ticking
    Key,
    /// Collectible; no ticking
    Switch,
}

impl MechanismKind {
    fn from_cell(kind: CellKind) -> Option<Self> {
        match kind {
            CellKind::Door => Some(MechanismKind::Door),
            CellKind::Elevator => Some(MechanismKind::Elevator),
            CellKind::Key => Some(MechanismKind::Key),
            CellKind::Switch => Some(MechanismKind::Switch),
            _ => None,
        }
    }
}

/// Outcome of advancing one mechanism by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MechanismTick {
    /// Advanced; wants the next tick.
    Running,
    /// Reached a terminal state; the ticker must be cancelled.
    Finished,
    /// Nothing to advance.
    Idle,
}

/// State of a single mechanism.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MechanismState {
    /// Which machine this entry runs
    pub kind: MechanismKind,
    /// Keys/switches: picked up. Irreversible except by reset.
    pub collected: bool,
    /// Door slide offset or elevator phase; [`DOOR_OPEN`] once a door
    /// finishes
    pub progress: f32,
    /// Whether a periodic ticker is currently scheduled for this entry
    pub timer_active: bool,
}

impl MechanismState {
    fn new(kind: MechanismKind) -> Self {
        Self {
            kind,
            collected: false,
            progress: 0.0,
            timer_active: false,
        }
    }

    /// Whether a door has fully opened (negative progress sentinel).
    #[inline]
    pub fn door_open(&self) -> bool {
        self.progress < 0.0
    }

    /// Advance this mechanism's machine by one tick.
    pub(crate) fn tick(&mut self) -> MechanismTick {
        if !self.timer_active {
            return MechanismTick::Idle;
        }

        match self.kind {
            MechanismKind::Door => {
                self.progress += DOOR_SLIDE_STEP;
                if self.progress >= DOOR_SLIDE_LIMIT {
                    self.progress = DOOR_OPEN;
                    self.timer_active = false;
                    MechanismTick::Finished
                } else {
                    MechanismTick::Running
                }
            }
            MechanismKind::Elevator => {
                // Unbounded; the renderer folds this through a sinusoid
                self.progress += ELEVATOR_PHASE_STEP;
                MechanismTick::Running
            }
            MechanismKind::Key | MechanismKind::Switch => {
                self.timer_active = false;
                MechanismTick::Idle
            }
        }
    }
}

// =============================================================================
// INTERACTION STATE
// =============================================================================

/// All mutable interaction state of a session: one [`MechanismState`] per
/// interactive cell plus the global and teleport animation phases.
///
/// Uses BTreeMap for deterministic iteration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionState {
    states: BTreeMap<GridCoord, MechanismState>,
    global_phase: f32,
    teleport_phase: f32,
}

impl InteractionState {
    /// Create one zeroed entry per mechanism cell in the grid.
    pub fn from_grid(grid: &GridModel) -> Self {
        let states = grid
            .iter()
            .filter_map(|(coord, cell)| {
                MechanismKind::from_cell(cell.kind).map(|kind| (coord, MechanismState::new(kind)))
            })
            .collect();

        Self {
            states,
            global_phase: 0.0,
            teleport_phase: 0.0,
        }
    }

    /// Mark a key/switch as collected. Idempotent; returns true only on
    /// the first call for a coordinate.
    pub fn mark_collected(&mut self, coord: GridCoord) -> bool {
        match self.states.get_mut(&coord) {
            Some(state) if !state.collected => {
                state.collected = true;
                true
            }
            _ => false,
        }
    }

    /// Whether the mechanism at a coordinate has been collected.
    pub fn is_collected(&self, coord: GridCoord) -> bool {
        self.states.get(&coord).is_some_and(|s| s.collected)
    }

    /// Read-only copy of a mechanism's state for draw-time decisions.
    pub fn snapshot(&self, coord: GridCoord) -> Option<MechanismState> {
        self.states.get(&coord).copied()
    }

    /// Number of tracked mechanisms.
    pub fn mechanism_count(&self) -> usize {
        self.states.len()
    }

    /// Current global animation phase.
    pub fn global_phase(&self) -> f32 {
        self.global_phase
    }

    /// Current teleport visual phase.
    pub fn teleport_phase(&self) -> f32 {
        self.teleport_phase
    }

    /// Restore every mechanism and both phases to their load-time values.
    pub fn reset_all(&mut self) {
        for state in self.states.values_mut() {
            *state = MechanismState::new(state.kind);
        }
        self.global_phase = 0.0;
        self.teleport_phase = 0.0;
    }

    /// Flag a door/elevator ticker as scheduled. Returns true only when
    /// the entry exists, ticks, and was not already armed.
    pub(crate) fn arm(&mut self, coord: GridCoord) -> bool {
        match self.states.get_mut(&coord) {
            Some(state)
                if matches!(state.kind, MechanismKind::Door | MechanismKind::Elevator)
                    && !state.timer_active
                    && !state.door_open() =>
            {
                state.timer_active = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn advance_global(&mut self) {
        self.global_phase += GLOBAL_PHASE_STEP;
    }

    pub(crate) fn advance_teleport(&mut self) {
        self.teleport_phase += TELEPORT_PHASE_STEP;
    }

    pub(crate) fn advance_mechanism(&mut self, coord: GridCoord) -> MechanismTick {
        match self.states.get_mut(&coord) {
            Some(state) => state.tick(),
            None => MechanismTick::Idle,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

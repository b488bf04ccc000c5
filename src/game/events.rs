//! World Events
//!
//! Tick-stamped notifications the host loop drains after each entry-point
//! call: pickups, door/elevator transitions, teleports, death.

use serde::{Deserialize, Serialize};

use crate::game::grid::GridCoord;

/// Event payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEventData {
    /// A key was picked up
    KeyCollected {
        /// The key's cell
        coord: GridCoord,
    },
    /// A switch was picked up
    SwitchCollected {
        /// The switch's cell
        coord: GridCoord,
    },
    /// A door finished opening and left the scene
    DoorOpened {
        /// The door's cell
        coord: GridCoord,
    },
    /// An elevator began oscillating
    ElevatorStarted {
        /// The elevator's cell
        coord: GridCoord,
    },
    /// The player teleported between paired pads
    Teleported {
        /// Pad the player stood on
        from: GridCoord,
        /// Pad the player arrived at
        to: GridCoord,
    },
    /// The player entered lava; the session is over
    PlayerDied {
        /// The lava cell
        coord: GridCoord,
    },
    /// The player reached a goal cell
    GoalReached {
        /// The goal cell
        coord: GridCoord,
    },
    /// The session was restored to its load-time state
    SessionReset,
}

/// A world event with the tick it occurred on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldEvent {
    /// World tick when the event occurred
    pub tick: u64,
    /// Event payload
    pub data: WorldEventData,
}

impl WorldEvent {
    /// Create a new event.
    pub fn new(tick: u64, data: WorldEventData) -> Self {
        Self { tick, data }
    }

    /// Key pickup.
    pub fn key_collected(tick: u64, coord: GridCoord) -> Self {
        Self::new(tick, WorldEventData::KeyCollected { coord })
    }

    /// Switch pickup.
    pub fn switch_collected(tick: u64, coord: GridCoord) -> Self {
        Self::new(tick, WorldEventData::SwitchCollected { coord })
    }

    /// Door fully open.
    pub fn door_opened(tick: u64, coord: GridCoord) -> Self {
        Self::new(tick, WorldEventData::DoorOpened { coord })
    }

    /// Elevator armed.
    pub fn elevator_started(tick: u64, coord: GridCoord) -> Self {
        Self::new(tick, WorldEventData::ElevatorStarted { coord })
    }

    /// Teleport relocation.
    pub fn teleported(tick: u64, from: GridCoord, to: GridCoord) -> Self {
        Self::new(tick, WorldEventData::Teleported { from, to })
    }

    /// Death outcome.
    pub fn player_died(tick: u64, coord: GridCoord) -> Self {
        Self::new(tick, WorldEventData::PlayerDied { coord })
    }

    /// Goal cell entered.
    pub fn goal_reached(tick: u64, coord: GridCoord) -> Self {
        Self::new(tick, WorldEventData::GoalReached { coord })
    }

    /// Session reset.
    pub fn session_reset(tick: u64) -> Self {
        Self::new(tick, WorldEventData::SessionReset)
    }
}

//! Game Simulation Module
//!
//! All world-state simulation code. Single-threaded and tick-driven.
//!
//! ## Module Structure
//!
//! - `grid`: immutable maze topology and connection resolution
//! - `mechanism`: per-mechanism state machines and the shared phases
//! - `player`: camera pose, movement and look integration
//! - `trigger`: position-to-effect predicates
//! - `clock`: periodic task scheduling for doors and elevators
//! - `session`: the owning aggregate and its input entry points
//! - `events`: notifications for the host loop
//! - `scene`: read-only render boundary

pub mod clock;
pub mod events;
pub mod grid;
pub mod mechanism;
pub mod player;
pub mod scene;
pub mod session;
pub mod trigger;

// Re-export key types
pub use clock::AnimationClock;
pub use events::{WorldEvent, WorldEventData};
pub use grid::{Cell, CellKind, ColorTag, GridCoord, GridModel, LinkRecord, MalformedMapError};
pub use mechanism::{InteractionState, MechanismKind, MechanismState};
pub use player::{MoveDirection, PlayerState};
pub use scene::{CameraView, CellDraw, CellView, SceneView};
pub use session::{GameSession, SessionConfig, SessionPhase};

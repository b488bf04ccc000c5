//! # Labyrinth Core
//!
//! World-state simulation core for a first-person maze-exploration game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      LABYRINTH CORE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Math primitives                           │
//! │  ├── vec3.rs     - f32 world-space vector                    │
//! │  └── angles.rs   - Yaw/pitch and look-direction helpers      │
//! │                                                              │
//! │  game/           - Simulation (single-threaded, tick-driven) │
//! │  ├── grid.rs     - Maze topology and connection resolution   │
//! │  ├── mechanism.rs- Door/elevator/key/switch state machines   │
//! │  ├── player.rs   - Camera pose and movement integration      │
//! │  ├── trigger.rs  - Position-to-effect predicates             │
//! │  ├── clock.rs    - Periodic mechanism task scheduling        │
//! │  ├── session.rs  - The owning aggregate and entry points     │
//! │  ├── events.rs   - Notifications for the host loop           │
//! │  └── scene.rs    - Read-only render boundary                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cooperative Tick Model
//!
//! Everything mutable is owned by one [`GameSession`] and mutated only
//! through its `on_*` entry points, invoked one at a time by the host's
//! input and timer callbacks. There is no internal threading and nothing
//! blocks: "waiting" is just the gap until the host's next call. The
//! renderer is an external collaborator that reads the
//! [`game::scene::SceneView`] each frame; map parsing is likewise
//! external and hands the core plain records.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::vec3::Vec3;
pub use crate::game::events::{WorldEvent, WorldEventData};
pub use crate::game::grid::{
    Cell, CellKind, ColorTag, GridCoord, GridModel, LinkRecord, MalformedMapError,
};
pub use crate::game::player::MoveDirection;
pub use crate::game::session::{GameSession, SessionConfig, SessionPhase};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Edge length of one maze cube; every other world dimension is relative
/// to this.
pub const CUBE_SIZE: f32 = 3.6;

/// Geometric tolerance shared by the animation formulas.
pub const EPS: f32 = 0.01;

/// World tick period in milliseconds: global phase and armed mechanisms.
pub const TICK_INTERVAL_MS: u64 = 20;

/// Teleport visual phase tick period in milliseconds.
pub const TELEPORT_TICK_INTERVAL_MS: u64 = 11;

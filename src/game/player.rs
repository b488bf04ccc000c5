//! Player State
//!
//! Camera position and look direction, integrated from movement commands
//! and pointer deltas. Movement is unconstrained by walls; only the
//! position triggers evaluated by the session react to where the player
//! ends up.

use serde::{Deserialize, Serialize};

use crate::core::angles::{clamp_pitch, look_direction, yaw_of};
use crate::core::vec3::Vec3;
use crate::game::grid::GridModel;
use crate::CUBE_SIZE;

/// Default movement speed in world units per command.
pub const DEFAULT_MOVE_SPEED: f32 = 0.2;

/// Default pointer sensitivity in degrees per pixel.
pub const DEFAULT_LOOK_SENSITIVITY: f32 = 0.5;

/// A movement command, resolved against the current look vectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    /// Along the look vector
    Forward,
    /// Against the look vector
    Backward,
    /// Along the negated right vector
    StrafeLeft,
    /// Along the right vector
    StrafeRight,
}

/// The player's pose: position plus the yaw/pitch pair the look vector is
/// derived from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    position: Vec3,
    look: Vec3,
    yaw: f32,
    pitch: f32,
}

impl PlayerState {
    /// Spawn pose for a grid: centered on the Start cell at eye height,
    /// facing away from the near edge. Maps without a Start marker get
    /// the fallback pose above the origin corner.
    pub fn at_start(grid: &GridModel) -> Self {
        match grid.start() {
            Some(coord) => {
                let (x, z) = grid.cell_center(coord);
                let y = grid.cell(coord).height as f32 * CUBE_SIZE;
                Self::with_pose(Vec3::new(x, y, z), -90.0, 0.0)
            }
            None => {
                let look = Vec3::new(1.0, 0.0, -1.0).normalize();
                Self::with_pose(Vec3::new(0.0, 8.0 * CUBE_SIZE, 0.0), yaw_of(look), 0.0)
            }
        }
    }

    fn with_pose(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            look: look_direction(yaw, pitch),
            yaw,
            pitch,
        }
    }

    /// Current position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current unit look vector.
    pub fn look(&self) -> Vec3 {
        self.look
    }

    /// World up vector.
    pub fn up(&self) -> Vec3 {
        Vec3::UP
    }

    /// Unit right vector, perpendicular to look and up.
    pub fn right(&self) -> Vec3 {
        self.look.cross(Vec3::UP).normalize()
    }

    /// Current yaw in degrees.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Current pitch in degrees, always within the clamp range.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Step the position along a movement command. The forward axis is
    /// the full look vector, vertical component included.
    pub(crate) fn apply_move(&mut self, direction: MoveDirection, speed: f32) {
        let step = match direction {
            MoveDirection::Forward => self.look.scale(speed),
            MoveDirection::Backward => self.look.scale(-speed),
            MoveDirection::StrafeLeft => self.right().scale(-speed),
            MoveDirection::StrafeRight => self.right().scale(speed),
        };
        self.position = self.position.add(step);
    }

    /// Integrate a pointer delta into yaw/pitch and recompute the look
    /// vector. Pitch clamps at +/-89 degrees.
    pub(crate) fn apply_look(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw += dx * sensitivity;
        self.pitch = clamp_pitch(self.pitch + dy * sensitivity);
        self.look = look_direction(self.yaw, self.pitch);
    }

    /// Jump to an absolute position, keeping the look direction.
    pub(crate) fn relocate(&mut self, position: Vec3) {
        self.position = position;
    }
}

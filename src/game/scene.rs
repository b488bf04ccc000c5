//! Scene Boundary
//!
//! Read-only view the renderer queries each frame. All animation
//! parameters (door slide, elevator lift, collectible bob/spin, teleport
//! angles) are computed here from mechanism state and the shared phases,
//! so the drawing side stays a dumb consumer of numbers.

use crate::core::angles::{DEG_TO_RAD, RAD_TO_DEG};
use crate::core::vec3::Vec3;
use crate::game::grid::{CellKind, ColorTag, GridCoord};
use crate::game::mechanism::MechanismKind;
use crate::game::session::GameSession;
use crate::{CUBE_SIZE, EPS};

/// Elevator platform thickness as a fraction of a cube.
pub const ELEVATOR_SCALE: f32 = 0.15;

/// Vertical travel of a rising elevator.
pub const ELEVATOR_TRAVEL: f32 = (1.0 - ELEVATOR_SCALE + EPS) * CUBE_SIZE;

/// Camera parameters for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    /// Eye position
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
}

/// Per-frame draw parameters for one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellDraw {
    /// No animation; draw from the static cell data
    Static,
    /// Door sliding down by `slide` world units
    Door {
        /// Current downward offset
        slide: f32,
    },
    /// Fully open door; skip drawing it
    DoorGone,
    /// Elevator platform lifted by `lift` world units
    Elevator {
        /// Current vertical offset
        lift: f32,
    },
    /// Key or switch hovering in place
    Collectible {
        /// Vertical bob offset
        bob: f32,
        /// Spin angle in degrees
        spin_deg: f32,
    },
    /// Collected key/switch; skip drawing it
    CollectibleGone,
    /// Teleport pad animation
    Teleport {
        /// Rotation of the inner line fan, degrees
        line_angle_deg: f32,
        /// Rotation of the outer rings, degrees
        ring_angle_deg: f32,
        /// Vertical shimmer of the rings
        ring_bob: f32,
    },
}

/// Everything the renderer needs for one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellView {
    /// What to draw
    pub kind: CellKind,
    /// Stacked cube height
    pub height: u32,
    /// Grouping color, if any
    pub color: Option<ColorTag>,
    /// Frame-specific parameters
    pub draw: CellDraw,
}

/// Read-only scene accessor borrowed from a session.
pub struct SceneView<'a> {
    session: &'a GameSession,
}

impl<'a> SceneView<'a> {
    pub(crate) fn new(session: &'a GameSession) -> Self {
        Self { session }
    }

    /// Grid rows, for iteration.
    pub fn rows(&self) -> usize {
        self.session.grid().rows()
    }

    /// Grid columns, for iteration.
    pub fn cols(&self) -> usize {
        self.session.grid().cols()
    }

    /// Camera parameters from the player pose.
    pub fn camera(&self) -> CameraView {
        let player = self.session.player();
        CameraView {
            position: player.position(),
            target: player.position().add(player.look()),
            up: player.up(),
        }
    }

    /// Draw parameters for a cell this frame.
    pub fn cell(&self, coord: GridCoord) -> CellView {
        let cell = self.session.grid().cell(coord);
        let global = self.session.interaction().global_phase();
        let teleport = self.session.interaction().teleport_phase();

        let draw = match cell.kind {
            CellKind::Door => match self.session.interaction().snapshot(coord) {
                Some(state) if state.door_open() => CellDraw::DoorGone,
                Some(state) => CellDraw::Door { slide: state.progress },
                None => CellDraw::Static,
            },
            CellKind::Elevator => {
                let phase = self
                    .session
                    .interaction()
                    .snapshot(coord)
                    .map(|s| s.progress)
                    .unwrap_or(0.0);
                // Rest position at phase 0, full travel at phase pi
                let sweep = (1.0 + (phase - std::f32::consts::FRAC_PI_2).sin()) / 2.0;
                CellDraw::Elevator { lift: ELEVATOR_TRAVEL * sweep }
            }
            CellKind::Key | CellKind::Switch => {
                match self.session.interaction().snapshot(coord) {
                    Some(state) if state.collected => CellDraw::CollectibleGone,
                    _ => match cell.kind {
                        CellKind::Key => CellDraw::Collectible {
                            bob: CUBE_SIZE / 5.0 * (2.0 * global * DEG_TO_RAD).sin(),
                            spin_deg: -2.0 * global,
                        },
                        _ => CellDraw::Collectible {
                            bob: 0.0,
                            spin_deg: 2.0 * global,
                        },
                    },
                }
            }
            CellKind::Teleport => CellDraw::Teleport {
                line_angle_deg: 0.5 * teleport * RAD_TO_DEG,
                ring_angle_deg: -global,
                ring_bob: 0.005 * teleport.sin(),
            },
            CellKind::Wall | CellKind::Lava | CellKind::Goal | CellKind::Start => CellDraw::Static,
        };

        CellView {
            kind: cell.kind,
            height: cell.height,
            color: cell.color,
            draw,
        }
    }

    /// Mechanism kind under a coordinate, if any. Convenience for hosts
    /// drawing debug overlays.
    pub fn mechanism_kind(&self, coord: GridCoord) -> Option<MechanismKind> {
        self.session.interaction().snapshot(coord).map(|s| s.kind)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::{GridModel, LinkRecord};
    use crate::game::mechanism::ELEVATOR_PHASE_STEP;

    fn session() -> GameSession {
        let mut cells = vec![('w', 0u32); 9];
        cells[1] = ('k', 1); // (0, 1)
        cells[3] = ('d', 2); // (1, 0)
        cells[5] = ('s', 1); // (1, 2)
        cells[7] = ('e', 2); // (2, 1)
        cells[8] = ('b', 0); // (2, 2)
        let grid = GridModel::from_records(
            3,
            3,
            &cells,
            &[
                LinkRecord::new('y', 0, 1, 1, 0),
                LinkRecord::new('g', 1, 2, 2, 1),
            ],
        )
        .unwrap();
        GameSession::new(grid)
    }

    #[test]
    fn test_camera_targets_along_look() {
        let session = session();
        let view = session.scene().camera();
        let look = view.target.sub(view.position);
        assert!((look.length() - 1.0).abs() < 1e-4);
        assert_eq!(view.up, Vec3::UP);
    }

    #[test]
    fn test_closed_door_draws_at_zero_slide() {
        let session = session();
        let view = session.scene().cell(GridCoord::new(1, 0));
        assert_eq!(view.draw, CellDraw::Door { slide: 0.0 });
    }

    #[test]
    fn test_opening_door_slides_then_disappears() {
        let mut session = session();
        session.grant(GridCoord::new(0, 1));

        session.on_tick();
        match session.scene().cell(GridCoord::new(1, 0)).draw {
            CellDraw::Door { slide } => assert!(slide > 0.0),
            other => panic!("unexpected draw: {other:?}"),
        }

        for _ in 0..100 {
            session.on_tick();
        }
        assert_eq!(
            session.scene().cell(GridCoord::new(1, 0)).draw,
            CellDraw::DoorGone
        );
    }

    #[test]
    fn test_elevator_rests_until_started() {
        let mut session = session();
        let coord = GridCoord::new(2, 1);

        match session.scene().cell(coord).draw {
            CellDraw::Elevator { lift } => assert!(lift.abs() < 1e-5),
            other => panic!("unexpected draw: {other:?}"),
        }

        session.grant(GridCoord::new(1, 2));
        // Quarter period: phase pi/2, half travel
        let quarter = (std::f32::consts::FRAC_PI_2 / ELEVATOR_PHASE_STEP) as usize;
        for _ in 0..quarter {
            session.on_tick();
        }
        match session.scene().cell(coord).draw {
            CellDraw::Elevator { lift } => {
                assert!((lift - ELEVATOR_TRAVEL / 2.0).abs() < 0.1);
            }
            other => panic!("unexpected draw: {other:?}"),
        }
    }

    #[test]
    fn test_collected_key_disappears() {
        let mut session = session();
        let key = GridCoord::new(0, 1);

        assert!(matches!(
            session.scene().cell(key).draw,
            CellDraw::Collectible { .. }
        ));

        session.grant(key);
        assert_eq!(session.scene().cell(key).draw, CellDraw::CollectibleGone);
    }

    #[test]
    fn test_key_and_switch_spin_opposite_ways() {
        let mut session = session();
        for _ in 0..10 {
            session.on_tick();
        }

        let key_spin = match session.scene().cell(GridCoord::new(0, 1)).draw {
            CellDraw::Collectible { spin_deg, .. } => spin_deg,
            other => panic!("unexpected draw: {other:?}"),
        };
        let switch_spin = match session.scene().cell(GridCoord::new(1, 2)).draw {
            CellDraw::Collectible { spin_deg, .. } => spin_deg,
            other => panic!("unexpected draw: {other:?}"),
        };
        assert_eq!(key_spin, -switch_spin);
        assert!(switch_spin > 0.0);
    }

    #[test]
    fn test_teleport_animation_follows_phases() {
        let mut session = session();
        let pad = GridCoord::new(2, 2);

        let before = session.scene().cell(pad).draw;
        session.on_teleport_tick();
        session.on_tick();
        let after = session.scene().cell(pad).draw;
        assert_ne!(before, after);

        match after {
            CellDraw::Teleport { line_angle_deg, ring_angle_deg, .. } => {
                assert!(line_angle_deg > 0.0);
                assert!(ring_angle_deg < 0.0);
            }
            other => panic!("unexpected draw: {other:?}"),
        }
    }

    #[test]
    fn test_static_cells() {
        let session = session();
        assert_eq!(session.scene().cell(GridCoord::new(0, 0)).draw, CellDraw::Static);
    }
}

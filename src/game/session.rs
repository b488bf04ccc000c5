//! Game Session
//!
//! The single owner of all simulation state: grid, interaction state,
//! animation clock and player pose. Constructed once per map, passed by
//! reference to the host's input and timer callbacks. Every mutation
//! enters through the `on_*` entry points, one at a time, on one thread.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::vec3::Vec3;
use crate::game::clock::AnimationClock;
use crate::game::events::WorldEvent;
use crate::game::grid::{CellKind, GridCoord, GridModel};
use crate::game::mechanism::InteractionState;
use crate::game::player::{
    MoveDirection, PlayerState, DEFAULT_LOOK_SENSITIVITY, DEFAULT_MOVE_SPEED,
};
use crate::game::scene::SceneView;
use crate::game::trigger::{within_band, within_teleport_radius};
use crate::CUBE_SIZE;

/// Whether the session is still playable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Accepting movement and interaction commands
    Running,
    /// The player died; only reset revives the session
    GameOver,
}

/// Tunable session parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// World units moved per movement command
    pub move_speed: f32,
    /// Degrees of rotation per pointer pixel
    pub look_sensitivity: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            look_sensitivity: DEFAULT_LOOK_SENSITIVITY,
        }
    }
}

/// A complete in-memory game session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    grid: GridModel,
    interaction: InteractionState,
    clock: AnimationClock,
    player: PlayerState,
    phase: SessionPhase,
    config: SessionConfig,
    tick: u64,
    goal_reached: bool,
    pending_events: Vec<WorldEvent>,
}

impl GameSession {
    /// Create a session over a loaded grid with default parameters.
    pub fn new(grid: GridModel) -> Self {
        Self::with_config(grid, SessionConfig::default())
    }

    /// Create a session with explicit parameters.
    pub fn with_config(grid: GridModel, config: SessionConfig) -> Self {
        let interaction = InteractionState::from_grid(&grid);
        let player = PlayerState::at_start(&grid);
        info!(
            rows = grid.rows(),
            cols = grid.cols(),
            mechanisms = interaction.mechanism_count(),
            "session created"
        );

        Self {
            grid,
            interaction,
            clock: AnimationClock::new(),
            player,
            phase: SessionPhase::Running,
            config,
            tick: 0,
            goal_reached: false,
            pending_events: Vec::new(),
        }
    }

    /// The maze topology.
    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    /// Mechanism and phase state.
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Scheduled mechanism tasks.
    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Player pose.
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether the death outcome has been reached.
    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// World ticks elapsed since load or last reset.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Read-only view for the renderer.
    pub fn scene(&self) -> SceneView<'_> {
        SceneView::new(self)
    }

    /// Drain the events generated since the last call.
    pub fn take_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn push_event(&mut self, event: WorldEvent) {
        self.pending_events.push(event);
    }

    // =========================================================================
    // INPUT ENTRY POINTS
    // =========================================================================

    /// Movement key: step the player and evaluate position triggers.
    pub fn on_move_command(&mut self, direction: MoveDirection) {
        if self.is_over() {
            return;
        }
        self.player.apply_move(direction, self.config.move_speed);
        self.check_position();
    }

    /// Pointer delta: update the look direction.
    pub fn on_look_delta(&mut self, dx: f32, dy: f32) {
        if self.is_over() {
            return;
        }
        self.player.apply_look(dx, dy, self.config.look_sensitivity);
    }

    /// Teleport key: relocate through the pad under the player, if the
    /// player stands within the pad's inner radius and vertical band.
    pub fn on_teleport_command(&mut self) {
        if self.is_over() {
            return;
        }

        let pos = self.player.position();
        let coord = self.grid.locate(pos.x, pos.z);
        let cell = *self.grid.cell(coord);
        if cell.kind != CellKind::Teleport {
            return;
        }
        if !within_teleport_radius(pos.x, pos.z, self.grid.cell_center(coord)) {
            return;
        }
        if !within_band(pos.y, self.grid.teleport_band(coord)) {
            return;
        }
        let Some(dest) = cell.link else {
            return;
        };

        // Destination: pad center, half a cube above its floor plane
        let (x, z) = self.grid.cell_center(dest);
        let y = (self.grid.cell(dest).height as f32 - 1.0) * CUBE_SIZE + CUBE_SIZE / 2.0;
        self.player.relocate(Vec3::new(x, y, z));
        self.push_event(WorldEvent::teleported(self.tick, coord, dest));
        info!(from = %coord, to = %dest, "teleported");
    }

    /// Restart key: restore the load-time state of everything.
    pub fn on_reset_command(&mut self) {
        self.interaction.reset_all();
        self.clock.cancel_all();
        self.player = PlayerState::at_start(&self.grid);
        self.phase = SessionPhase::Running;
        self.goal_reached = false;
        self.tick = 0;
        self.push_event(WorldEvent::session_reset(0));
        info!("session reset");
    }

    /// World tick (every [`crate::TICK_INTERVAL_MS`] ms): global phase
    /// plus every armed mechanism.
    pub fn on_tick(&mut self) {
        self.tick += 1;
        let finished = self.clock.tick(&mut self.interaction);
        for coord in finished {
            self.push_event(WorldEvent::door_opened(self.tick, coord));
            debug!(coord = %coord, "door fully open");
        }
    }

    /// Teleport visual tick (every [`crate::TELEPORT_TICK_INTERVAL_MS`]
    /// ms).
    pub fn on_teleport_tick(&mut self) {
        self.clock.teleport_tick(&mut self.interaction);
    }

    /// Collect a key/switch directly, as if picked up. Backs the debug
    /// number-key shortcuts; no-op for any other cell kind.
    pub fn grant(&mut self, coord: GridCoord) {
        if self.is_over() {
            return;
        }
        self.collect(coord);
    }

    // =========================================================================
    // POSITION TRIGGERS
    // =========================================================================

    /// Evaluate world effects of the cell under the player.
    fn check_position(&mut self) {
        let pos = self.player.position();
        let coord = self.grid.locate(pos.x, pos.z);
        if !within_band(pos.y, self.grid.trigger_band(coord)) {
            return;
        }

        let kind = self.grid.cell(coord).kind;
        match kind {
            CellKind::Lava => {
                self.phase = SessionPhase::GameOver;
                self.push_event(WorldEvent::player_died(self.tick, coord));
                info!(coord = %coord, "player fell into lava");
            }
            CellKind::Key | CellKind::Switch => self.collect(coord),
            CellKind::Goal if !self.goal_reached => {
                self.goal_reached = true;
                self.push_event(WorldEvent::goal_reached(self.tick, coord));
                info!(coord = %coord, "goal reached");
            }
            _ => {}
        }
    }

    /// Mark a collectible as gathered and arm whatever it controls.
    fn collect(&mut self, coord: GridCoord) {
        let cell = *self.grid.cell(coord);
        if !matches!(cell.kind, CellKind::Key | CellKind::Switch) {
            return;
        }
        if !self.interaction.mark_collected(coord) {
            return;
        }

        let event = match cell.kind {
            CellKind::Key => WorldEvent::key_collected(self.tick, coord),
            _ => WorldEvent::switch_collected(self.tick, coord),
        };
        self.push_event(event);
        debug!(coord = %coord, kind = ?cell.kind, "collected");

        if let Some(target) = cell.link {
            if self.interaction.arm(target) {
                self.clock.arm(target);
                let target_kind = self.grid.cell(target).kind;
                if target_kind == CellKind::Elevator {
                    self.push_event(WorldEvent::elevator_started(self.tick, target));
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::WorldEventData;
    use crate::game::mechanism::DOOR_OPEN;
    use crate::game::trigger::TELEPORT_INNER_RADIUS;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    /// 4x4 fixture:
    ///
    /// ```text
    /// row 0:  w  w  w  X
    /// row 1:  w  d  e  w
    /// row 2:  s  k  l  b
    /// row 3:  b  w  @  w
    /// ```
    ///
    /// Key (2,1) opens door (1,1); switch (2,0) starts elevator (1,2);
    /// the blue pads (2,3) and (3,0) are paired.
    fn fixture() -> GameSession {
        let mut cells = vec![('w', 0u32); 16];
        cells[3] = ('X', 0); // (0, 3)
        cells[5] = ('d', 1); // (1, 1)
        cells[6] = ('e', 1); // (1, 2)
        cells[8] = ('s', 0); // (2, 0)
        cells[9] = ('k', 0); // (2, 1)
        cells[10] = ('l', 0); // (2, 2)
        cells[11] = ('b', 0); // (2, 3)
        cells[12] = ('b', 0); // (3, 0)
        cells[14] = ('@', 0); // (3, 2)

        let grid = GridModel::from_records(
            4,
            4,
            &cells,
            &[
                crate::game::grid::LinkRecord::new('y', 2, 1, 1, 1),
                crate::game::grid::LinkRecord::new('g', 2, 0, 1, 2),
                crate::game::grid::LinkRecord::new('b', 2, 3, 3, 0),
            ],
        )
        .unwrap();
        GameSession::new(grid)
    }

    fn steps(session: &mut GameSession, direction: MoveDirection, count: usize) {
        for _ in 0..count {
            session.on_move_command(direction);
        }
    }

    #[test]
    fn test_walking_onto_key_collects_and_arms_door() {
        let mut session = fixture();
        let key = GridCoord::new(2, 1);
        let door = GridCoord::new(1, 1);

        // One cell left of spawn, then forward into the key cell
        steps(&mut session, MoveDirection::StrafeLeft, 18);
        steps(&mut session, MoveDirection::Forward, 10);

        assert!(session.interaction().is_collected(key));
        assert!(session.interaction().snapshot(door).unwrap().timer_active);
        assert!(session.clock().is_armed(door));

        let events = session.take_events();
        assert!(events
            .iter()
            .any(|e| e.data == WorldEventData::KeyCollected { coord: key }));

        // No other mechanism moved
        assert!(!session.interaction().is_collected(GridCoord::new(2, 0)));
        assert!(!session
            .interaction()
            .snapshot(GridCoord::new(1, 2))
            .unwrap()
            .timer_active);
    }

    #[test]
    fn test_door_opens_after_enough_ticks() {
        let mut session = fixture();
        let door = GridCoord::new(1, 1);

        session.grant(GridCoord::new(2, 1));
        for _ in 0..100 {
            session.on_tick();
        }

        let snap = session.interaction().snapshot(door).unwrap();
        assert_eq!(snap.progress, DOOR_OPEN);
        assert!(!snap.timer_active);
        assert!(!session.clock().is_armed(door));
        assert!(session
            .take_events()
            .iter()
            .any(|e| e.data == WorldEventData::DoorOpened { coord: door }));
    }

    #[test]
    fn test_switch_starts_elevator_forever() {
        let mut session = fixture();
        let elevator = GridCoord::new(1, 2);

        session.grant(GridCoord::new(2, 0));
        assert!(session
            .take_events()
            .iter()
            .any(|e| e.data == WorldEventData::ElevatorStarted { coord: elevator }));

        for _ in 0..500 {
            session.on_tick();
        }
        let snap = session.interaction().snapshot(elevator).unwrap();
        assert!(snap.timer_active);
        assert!(snap.progress > 0.0);
    }

    #[test]
    fn test_lava_kills_exactly_once() {
        let mut session = fixture();

        // Forward from spawn runs straight into the lava cell
        steps(&mut session, MoveDirection::Forward, 10);

        assert!(session.is_over());
        let deaths = session
            .take_events()
            .iter()
            .filter(|e| matches!(e.data, WorldEventData::PlayerDied { .. }))
            .count();
        assert_eq!(deaths, 1);

        // Terminal: commands no longer move the player
        let frozen = session.player().position();
        steps(&mut session, MoveDirection::Forward, 5);
        session.on_teleport_command();
        assert_eq!(session.player().position(), frozen);
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_teleport_relocates_to_paired_pad_center() {
        let mut session = fixture();
        let from = GridCoord::new(3, 0);
        let to = GridCoord::new(2, 3);

        // Two cells left of spawn lands exactly on the pad center
        steps(&mut session, MoveDirection::StrafeLeft, 36);
        session.on_teleport_command();

        let (x, z) = session.grid().cell_center(to);
        let expected = Vec3::new(x, -CUBE_SIZE + CUBE_SIZE / 2.0, z);
        let pos = session.player().position();
        assert!((pos.x - expected.x).abs() < 1e-4);
        assert!((pos.y - expected.y).abs() < 1e-4);
        assert!((pos.z - expected.z).abs() < 1e-4);

        assert!(session
            .take_events()
            .iter()
            .any(|e| e.data == WorldEventData::Teleported { from, to }));
    }

    #[test]
    fn test_teleport_refused_outside_inner_radius() {
        let mut session = fixture();

        // 28 steps leaves the player inside the pad's cell but more than
        // the inner radius from its center
        steps(&mut session, MoveDirection::StrafeLeft, 28);
        let pos = session.player().position();
        let coord = session.grid().locate(pos.x, pos.z);
        assert_eq!(coord, GridCoord::new(3, 0));
        let (cx, cz) = session.grid().cell_center(coord);
        let dist = ((pos.x - cx).powi(2) + (pos.z - cz).powi(2)).sqrt();
        assert!(dist > TELEPORT_INNER_RADIUS);

        session.on_teleport_command();
        assert_eq!(session.player().position(), pos);
        assert!(session
            .take_events()
            .iter()
            .all(|e| !matches!(e.data, WorldEventData::Teleported { .. })));
    }

    #[test]
    fn test_teleport_refused_above_band() {
        let mut session = fixture();

        // Walk onto the pad center, then climb just above the pad band
        steps(&mut session, MoveDirection::StrafeLeft, 36);
        session.on_look_delta(0.0, 178.0); // pitch to +89 at default sensitivity
        session.on_move_command(MoveDirection::Forward);
        assert!(session.player().position().y > 0.0);

        session.on_teleport_command();
        assert!(session
            .take_events()
            .iter()
            .all(|e| !matches!(e.data, WorldEventData::Teleported { .. })));
    }

    #[test]
    fn test_goal_event_emitted_once() {
        let mut cells = vec![('w', 0u32); 4];
        cells[0] = ('X', 0); // (0, 0)
        cells[2] = ('@', 0); // (1, 0)
        let grid = GridModel::from_records(2, 2, &cells, &[]).unwrap();
        let mut session = GameSession::new(grid);

        steps(&mut session, MoveDirection::Forward, 10);
        steps(&mut session, MoveDirection::Forward, 5);

        let goals = session
            .take_events()
            .iter()
            .filter(|e| matches!(e.data, WorldEventData::GoalReached { .. }))
            .count();
        assert_eq!(goals, 1);
    }

    #[test]
    fn test_reset_restores_load_time_state() {
        let mut session = fixture();
        let pristine = fixture();

        session.grant(GridCoord::new(2, 1));
        session.grant(GridCoord::new(2, 0));
        for _ in 0..40 {
            session.on_tick();
            session.on_teleport_tick();
        }
        steps(&mut session, MoveDirection::Forward, 10); // dies in lava
        assert!(session.is_over());

        session.on_reset_command();
        let _ = session.take_events();

        assert_eq!(session.interaction(), pristine.interaction());
        assert_eq!(session.clock(), pristine.clock());
        assert_eq!(session.player(), pristine.player());
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.tick(), 0);
    }

    #[test]
    fn test_ticks_keep_running_after_death() {
        let mut session = fixture();
        session.grant(GridCoord::new(2, 0));
        steps(&mut session, MoveDirection::Forward, 10);
        assert!(session.is_over());

        let before = session.interaction().global_phase();
        session.on_tick();
        session.on_teleport_tick();
        assert!(session.interaction().global_phase() > before);
        assert!(session.interaction().teleport_phase() > 0.0);
    }

    #[test]
    fn test_random_walk_only_flips_visited_cells() {
        let mut session = fixture();
        let mut rng = StdRng::seed_from_u64(7);
        let mut visited = BTreeSet::new();

        for _ in 0..400 {
            if session.is_over() {
                break;
            }
            let direction = match rng.gen_range(0..4) {
                0 => MoveDirection::Forward,
                1 => MoveDirection::Backward,
                2 => MoveDirection::StrafeLeft,
                _ => MoveDirection::StrafeRight,
            };
            session.on_move_command(direction);
            let pos = session.player().position();
            visited.insert(session.grid().locate(pos.x, pos.z));
        }

        for (coord, cell) in session.grid().iter() {
            if session.interaction().is_collected(coord) {
                assert!(matches!(cell.kind, CellKind::Key | CellKind::Switch));
                assert!(visited.contains(&coord), "collected unvisited {coord}");
            }
        }
    }
}

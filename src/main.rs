//! Labyrinth Demo Driver
//!
//! Builds a small maze, then plays a scripted session against it the way
//! a windowing host would: movement and teleport commands interleaved
//! with fixed-cadence ticks, draining and logging world events as they
//! happen.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use labyrinth::{
    game::{
        grid::{GridCoord, GridModel, LinkRecord},
        scene::CellDraw,
        session::GameSession,
        events::WorldEventData,
        player::MoveDirection,
    },
    TELEPORT_TICK_INTERVAL_MS, TICK_INTERVAL_MS, VERSION,
};

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Labyrinth Core v{}", VERSION);
    info!(
        "World tick: {} ms, teleport tick: {} ms",
        TICK_INTERVAL_MS, TELEPORT_TICK_INTERVAL_MS
    );

    let grid = demo_grid()?;
    demo_session(grid);

    Ok(())
}

/// A 6x6 maze exercising every mechanism:
///
/// ```text
/// row 0:  w  w  w  w  w  w
/// row 1:  w  X  w  d  w  w
/// row 2:  w  l  w  e  b  w
/// row 3:  w  w  k  s  w  w
/// row 4:  w  b  w  @  w  w
/// row 5:  w  w  w  w  w  w
/// ```
fn demo_grid() -> Result<GridModel, labyrinth::MalformedMapError> {
    let rows = 6;
    let cols = 6;
    let mut cells = vec![('w', 0u32); rows * cols];
    let set = |cells: &mut Vec<(char, u32)>, r: usize, c: usize, code: char, h: u32| {
        cells[r * cols + c] = (code, h);
    };

    // Border walls
    for c in 0..cols {
        set(&mut cells, 0, c, 'w', 2);
        set(&mut cells, rows - 1, c, 'w', 2);
    }
    for r in 0..rows {
        set(&mut cells, r, 0, 'w', 2);
        set(&mut cells, r, cols - 1, 'w', 2);
    }

    set(&mut cells, 1, 1, 'X', 0);
    set(&mut cells, 1, 3, 'd', 1);
    set(&mut cells, 2, 1, 'l', 0);
    set(&mut cells, 2, 3, 'e', 1);
    set(&mut cells, 2, 4, 'b', 0);
    set(&mut cells, 3, 2, 'k', 0);
    set(&mut cells, 3, 3, 's', 0);
    set(&mut cells, 4, 1, 'b', 0);
    set(&mut cells, 4, 3, '@', 0);

    let links = [
        LinkRecord::new('y', 3, 2, 1, 3), // key -> door
        LinkRecord::new('g', 3, 3, 2, 3), // switch -> elevator
        LinkRecord::new('b', 2, 4, 4, 1), // teleport pair
    ];

    GridModel::from_records(rows, cols, &cells, &links)
}

/// Play a scripted session against the demo maze.
fn demo_session(grid: GridModel) {
    info!("=== Starting Demo Session ===");
    let mut session = GameSession::new(grid);

    let camera = session.scene().camera();
    info!("Spawned at {} looking toward {}", camera.position, camera.target);

    // Walk forward onto the switch, then sidestep onto the key
    walk(&mut session, MoveDirection::Forward, 18);
    walk(&mut session, MoveDirection::StrafeLeft, 18);
    drain_events(&mut session);

    // Let the timers run: the door slides open, the elevator oscillates
    for _ in 0..80 {
        session.on_tick();
        session.on_teleport_tick();
        session.on_teleport_tick();
    }
    drain_events(&mut session);

    let elevator = GridCoord::new(2, 3);
    if let CellDraw::Elevator { lift } = session.scene().cell(elevator).draw {
        info!("Elevator at {} lifted {:.2} units", elevator, lift);
    }

    // Back to the corridor, onto the blue pad, and through it
    walk(&mut session, MoveDirection::Backward, 18);
    walk(&mut session, MoveDirection::StrafeLeft, 18);
    session.on_teleport_command();
    drain_events(&mut session);

    info!("=== Session Summary ===");
    let summary = serde_json::json!({
        "ticks": session.tick(),
        "phase": format!("{:?}", session.phase()),
        "mechanisms": session.interaction().mechanism_count(),
        "armed_timers": session.clock().armed_count(),
        "global_phase": session.interaction().global_phase(),
        "position": format!("{}", session.player().position()),
    });
    info!("{}", summary);

    // Restart and walk into the lava to show the death outcome
    session.on_reset_command();
    drain_events(&mut session);

    walk(&mut session, MoveDirection::Forward, 36);
    walk(&mut session, MoveDirection::StrafeLeft, 36);
    drain_events(&mut session);

    if session.is_over() {
        info!("Session over after {} ticks", session.tick());
    }
}

fn walk(session: &mut GameSession, direction: MoveDirection, count: usize) {
    for _ in 0..count {
        session.on_move_command(direction);
    }
}

fn drain_events(session: &mut GameSession) {
    for event in session.take_events() {
        match event.data {
            WorldEventData::KeyCollected { coord } => {
                info!("Picked up the key at {}", coord);
            }
            WorldEventData::SwitchCollected { coord } => {
                info!("Flipped the switch at {}", coord);
            }
            WorldEventData::DoorOpened { coord } => {
                info!("Door at {} is fully open", coord);
            }
            WorldEventData::ElevatorStarted { coord } => {
                info!("Elevator at {} started", coord);
            }
            WorldEventData::Teleported { from, to } => {
                info!("Teleported {} -> {}", from, to);
            }
            WorldEventData::PlayerDied { coord } => {
                info!("You died! (lava at {})", coord);
            }
            WorldEventData::GoalReached { coord } => {
                info!("Goal reached at {}", coord);
            }
            WorldEventData::SessionReset => {
                info!("Session reset");
            }
        }
    }
}

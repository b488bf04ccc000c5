//! Maze Grid Model
//!
//! Immutable maze topology: a row-major matrix of cells plus the paired
//! connections between them (teleport-teleport, key-door, switch-elevator).
//! Built once from parsed map records; read-only to every other component.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CUBE_SIZE;

// =============================================================================
// COORDINATES
// =============================================================================

/// Position of a cell in the grid.
///
/// Row 0 is the far edge of the maze. Implements Ord for deterministic
/// BTreeMap ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    /// Row index (0 = far edge)
    pub row: usize,
    /// Column index
    pub col: usize,
}

impl GridCoord {
    /// Create a new coordinate.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// =============================================================================
// CELL KINDS AND COLORS
// =============================================================================

/// What a cell is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    /// Solid terrain; height 0 is bare floor
    Wall,
    /// Deadly floor
    Lava,
    /// Sliding door, opened by its paired key
    Door,
    /// Oscillating platform, started by its paired switch
    Elevator,
    /// Collectible that opens a door
    Key,
    /// Collectible that starts an elevator
    Switch,
    /// Teleport pad, paired with another pad of the same color
    Teleport,
    /// Goal marker
    Goal,
    /// Player starting position marker
    Start,
}

impl CellKind {
    /// Parse a map record code. Color letters denote teleport pads.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'w' => Some(CellKind::Wall),
            'l' => Some(CellKind::Lava),
            'd' => Some(CellKind::Door),
            'e' => Some(CellKind::Elevator),
            'k' => Some(CellKind::Key),
            's' => Some(CellKind::Switch),
            'X' => Some(CellKind::Goal),
            '@' => Some(CellKind::Start),
            c => ColorTag::from_code(c).map(|_| CellKind::Teleport),
        }
    }

    /// Whether cells of this kind carry interaction state.
    pub fn is_mechanism(self) -> bool {
        matches!(
            self,
            CellKind::Door | CellKind::Elevator | CellKind::Key | CellKind::Switch
        )
    }
}

/// Teleport pairing and visual grouping color, distinct from the cell kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTag {
    /// 'r'
    Red,
    /// 'g'
    Green,
    /// 'b'
    Blue,
    /// 'y'
    Yellow,
    /// 'o'
    Orange,
    /// 'p'
    Purple,
    /// 'c'
    Cyan,
    /// 'm'
    Magenta,
}

impl ColorTag {
    /// Parse a color letter.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'r' => Some(ColorTag::Red),
            'g' => Some(ColorTag::Green),
            'b' => Some(ColorTag::Blue),
            'y' => Some(ColorTag::Yellow),
            'o' => Some(ColorTag::Orange),
            'p' => Some(ColorTag::Purple),
            'c' => Some(ColorTag::Cyan),
            'm' => Some(ColorTag::Magenta),
            _ => None,
        }
    }

    /// The letter this color is coded as in map records.
    pub fn code(self) -> char {
        match self {
            ColorTag::Red => 'r',
            ColorTag::Green => 'g',
            ColorTag::Blue => 'b',
            ColorTag::Yellow => 'y',
            ColorTag::Orange => 'o',
            ColorTag::Purple => 'p',
            ColorTag::Cyan => 'c',
            ColorTag::Magenta => 'm',
        }
    }
}

// =============================================================================
// CELLS
// =============================================================================

/// One grid unit of the maze.
///
/// Immutable after load except `color` and `link`, which are filled in
/// during connection resolution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// What this cell is
    pub kind: CellKind,
    /// Stacked cube height; 0 means floor level, no vertical obstruction
    pub height: u32,
    /// Pairing/grouping color, if any
    pub color: Option<ColorTag>,
    /// The other end of this cell's connection: the paired teleport pad,
    /// the door/elevator a key/switch controls, or back again
    pub link: Option<GridCoord>,
}

/// Connection record from the map loader: `tag` plus both endpoints.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Color letter grouping the pair
    pub tag: char,
    /// First endpoint
    pub a: GridCoord,
    /// Second endpoint
    pub b: GridCoord,
}

impl LinkRecord {
    /// Create a record from raw tuple fields.
    pub const fn new(tag: char, row1: usize, col1: usize, row2: usize, col2: usize) -> Self {
        Self {
            tag,
            a: GridCoord::new(row1, col1),
            b: GridCoord::new(row2, col2),
        }
    }
}

// =============================================================================
// LOAD ERRORS
// =============================================================================

/// Fatal map-construction failure. Surfaced to the caller at load; the
/// simulation itself has no runtime error paths.
#[derive(Debug, Error)]
pub enum MalformedMapError {
    /// Zero rows or columns declared.
    #[error("map dimensions must be positive, got {rows}x{cols}")]
    EmptyGrid {
        /// Declared row count
        rows: usize,
        /// Declared column count
        cols: usize,
    },

    /// Cell record count does not match the declared dimensions.
    #[error("map declares {expected} cells but {found} records were supplied")]
    CellCountMismatch {
        /// rows * cols
        expected: usize,
        /// Records actually supplied
        found: usize,
    },

    /// A cell record's code maps to no kind.
    #[error("unknown cell code '{code}' at ({row}, {col})")]
    UnknownCellCode {
        /// The offending code
        code: char,
        /// Record row
        row: usize,
        /// Record column
        col: usize,
    },

    /// A connection record references coordinates outside the grid.
    #[error("link {index} ('{tag}') references cell ({row}, {col}) outside the {rows}x{cols} grid")]
    LinkOutOfBounds {
        /// Index of the record in the connection list
        index: usize,
        /// The record's tag
        tag: char,
        /// Offending row
        row: usize,
        /// Offending column
        col: usize,
        /// Grid rows
        rows: usize,
        /// Grid columns
        cols: usize,
    },

    /// A connection record's tag is not a known color letter.
    #[error("link {index} uses unknown tag '{tag}'")]
    UnknownLinkTag {
        /// Index of the record in the connection list
        index: usize,
        /// The offending tag
        tag: char,
    },
}

// =============================================================================
// GRID MODEL
// =============================================================================

/// The maze: a `rows x cols` matrix of cells, row-major, row 0 at the far
/// edge. Created once at load and never resized.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridModel {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl GridModel {
    /// Build a grid from parsed map records.
    ///
    /// `cells` holds one `(code, height)` pair per cell in row-major
    /// order; `links` establishes symmetric connections, writing the tag
    /// color and the opposite coordinate onto both endpoints.
    pub fn from_records(
        rows: usize,
        cols: usize,
        cells: &[(char, u32)],
        links: &[LinkRecord],
    ) -> Result<Self, MalformedMapError> {
        if rows == 0 || cols == 0 {
            return Err(MalformedMapError::EmptyGrid { rows, cols });
        }

        let expected = rows * cols;
        if cells.len() != expected {
            return Err(MalformedMapError::CellCountMismatch {
                expected,
                found: cells.len(),
            });
        }

        let mut grid = Vec::with_capacity(expected);
        for (i, &(code, height)) in cells.iter().enumerate() {
            let kind = CellKind::from_code(code).ok_or(MalformedMapError::UnknownCellCode {
                code,
                row: i / cols,
                col: i % cols,
            })?;
            grid.push(Cell {
                kind,
                height,
                // Teleport pads are coded by their color letter
                color: ColorTag::from_code(code),
                link: None,
            });
        }

        let mut model = Self { rows, cols, cells: grid };

        for (index, record) in links.iter().enumerate() {
            let tag = ColorTag::from_code(record.tag)
                .ok_or(MalformedMapError::UnknownLinkTag { index, tag: record.tag })?;

            for endpoint in [record.a, record.b] {
                if endpoint.row >= rows || endpoint.col >= cols {
                    return Err(MalformedMapError::LinkOutOfBounds {
                        index,
                        tag: record.tag,
                        row: endpoint.row,
                        col: endpoint.col,
                        rows,
                        cols,
                    });
                }
            }

            // Symmetric: each endpoint points at the other
            let idx_a = record.a.row * cols + record.a.col;
            let idx_b = record.b.row * cols + record.b.col;
            model.cells[idx_a].color = Some(tag);
            model.cells[idx_a].link = Some(record.b);
            model.cells[idx_b].color = Some(tag);
            model.cells[idx_b].link = Some(record.a);
        }

        Ok(model)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at a coordinate. The coordinate must be in range; use
    /// [`GridModel::get`] for unchecked inputs.
    pub fn cell(&self, coord: GridCoord) -> &Cell {
        &self.cells[coord.row * self.cols + coord.col]
    }

    /// Cell at a coordinate, or None if out of range.
    pub fn get(&self, coord: GridCoord) -> Option<&Cell> {
        if coord.row < self.rows && coord.col < self.cols {
            Some(self.cell(coord))
        } else {
            None
        }
    }

    /// Iterate all cells with their coordinates in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &Cell)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (GridCoord::new(i / cols, i % cols), cell))
    }

    /// Map a continuous world position to the grid cell under it.
    ///
    /// `col = floor(x / CUBE_SIZE)`, `row = rows + floor(z / CUBE_SIZE)`.
    /// The row clamps at the near edge (`rows - 1`); negative
    /// intermediates saturate to zero. Columns clamp at the side edges
    /// the same way. Out-of-range positions therefore resolve to an edge
    /// cell rather than an error.
    pub fn locate(&self, x: f32, z: f32) -> GridCoord {
        let col = (x / CUBE_SIZE).floor() as i64;
        let row = self.rows as i64 + (z / CUBE_SIZE).floor() as i64;

        let row = row.min(self.rows as i64 - 1).max(0) as usize;
        let col = col.min(self.cols as i64 - 1).max(0) as usize;
        GridCoord::new(row, col)
    }

    /// World-space center of a cell's floor plane.
    pub fn cell_center(&self, coord: GridCoord) -> (f32, f32) {
        let x = coord.col as f32 * CUBE_SIZE + CUBE_SIZE / 2.0;
        let z = -((self.rows - 1 - coord.row) as f32) * CUBE_SIZE - CUBE_SIZE / 2.0;
        (x, z)
    }

    /// Vertical band within which the player counts as standing at this
    /// cell for pickup and lava purposes: `[(h-1)*C, h*C + C]`.
    pub fn trigger_band(&self, coord: GridCoord) -> (f32, f32) {
        let h = self.cell(coord).height as f32;
        ((h - 1.0) * CUBE_SIZE, h * CUBE_SIZE + CUBE_SIZE)
    }

    /// Vertical band for teleport activation. Narrower than the trigger
    /// band: `[(h-1)*C, h*C]`.
    pub fn teleport_band(&self, coord: GridCoord) -> (f32, f32) {
        let h = self.cell(coord).height as f32;
        ((h - 1.0) * CUBE_SIZE, h * CUBE_SIZE)
    }

    /// First Start cell in row-major order, if the map declares one.
    pub fn start(&self) -> Option<GridCoord> {
        self.iter()
            .find(|(_, cell)| cell.kind == CellKind::Start)
            .map(|(coord, _)| coord)
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! Piece module - tetromino shapes and the active falling piece
//!
//! Shapes are stored once in their spawn orientation; other orientations are
//! derived by applying the quarter-turn transform (x, y) -> (y, -x) about the
//! shape origin. Offsets are not renormalised after rotation, so a rotation
//! can move cells above the current origin row.

use crate::core::Board;
use crate::types::{PieceKind, Rotation};

/// Offset of a single cell relative to the piece origin
pub type CellOffset = (i32, i32);

/// A piece occupies exactly four cells
pub type PieceCells = [CellOffset; 4];

/// Canonical spawn-orientation offsets, origin at the top-left bounding cell,
/// (column, row) with row increasing downward.
pub fn canonical_cells(kind: PieceKind) -> PieceCells {
    match kind {
        PieceKind::I => [(0, 0), (1, 0), (2, 0), (3, 0)],
        PieceKind::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
        PieceKind::T => [(0, 0), (1, 0), (2, 0), (1, 1)],
        PieceKind::L => [(0, 0), (1, 0), (2, 0), (2, 1)],
        PieceKind::J => [(0, 0), (1, 0), (2, 0), (0, 1)],
        PieceKind::S => [(1, 0), (2, 0), (0, 1), (1, 1)],
        PieceKind::Z => [(0, 0), (1, 0), (1, 1), (2, 1)],
    }
}

/// One clockwise quarter turn about the origin: (x, y) -> (y, -x).
#[inline]
fn rotate_offset(offset: CellOffset) -> CellOffset {
    (offset.1, -offset.0)
}

/// Local offsets for a kind at a given rotation state.
pub fn local_cells(kind: PieceKind, rotation: Rotation) -> PieceCells {
    let mut cells = canonical_cells(kind);
    for _ in 0..rotation.turns() {
        for cell in &mut cells {
            *cell = rotate_offset(*cell);
        }
    }
    cells
}

/// Bounding box of a set of local offsets: (min_x, max_x, min_y, max_y).
pub fn bounds(cells: &PieceCells) -> (i32, i32, i32, i32) {
    let mut min_x = i32::MAX;
    let mut max_x = i32::MIN;
    let mut min_y = i32::MAX;
    let mut max_y = i32::MIN;
    for &(x, y) in cells {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    (min_x, max_x, min_y, max_y)
}

/// Bounding-box width of a kind at a rotation state.
pub fn piece_width(kind: PieceKind, rotation: Rotation) -> usize {
    let (min_x, max_x, _, _) = bounds(&local_cells(kind, rotation));
    (max_x - min_x + 1) as usize
}

/// The active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Spawn at the top row, bounding box horizontally centered
    /// (integer floor division).
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        let width = piece_width(kind, Rotation::R0) as i32;
        let x = (board_width as i32 - width) / 2;
        Self {
            kind,
            rotation: Rotation::R0,
            x,
            y: 0,
        }
    }

    /// Local offsets for the current rotation
    pub fn local_cells(&self) -> PieceCells {
        local_cells(self.kind, self.rotation)
    }

    /// Absolute world cells occupied on the board
    pub fn cells(&self) -> PieceCells {
        let mut cells = self.local_cells();
        for cell in &mut cells {
            cell.0 += self.x;
            cell.1 += self.y;
        }
        cells
    }

    /// Leftmost column of the bounding box in world coordinates
    pub fn left_col(&self) -> i32 {
        let (min_x, _, _, _) = bounds(&self.local_cells());
        self.x + min_x
    }

    /// Bounding-box width in the current rotation
    pub fn width(&self) -> usize {
        piece_width(self.kind, self.rotation)
    }

    /// Check that every world cell is inside the board and unoccupied
    pub fn is_valid(&self, board: &Board) -> bool {
        board.can_place(&self.cells())
    }
}

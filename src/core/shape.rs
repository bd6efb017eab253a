//! Shape matrices - minimal bounding-box views of a piece
//!
//! The planner and the wire protocol both work on normalized 0/1 matrices
//! rather than on offset sets: `shape[row][col]` is 1 where the piece has a
//! cell. Rotating a matrix here agrees with the live piece transform
//! (x, y) -> (y, -x) up to the translation that renormalizes the box.

use crate::core::piece::{bounds, local_cells};
use crate::types::{PieceKind, Rotation};

pub type ShapeMatrix = Vec<Vec<u8>>;

/// Minimal bounding-box matrix of a kind at a rotation state.
pub fn piece_matrix(kind: PieceKind, rotation: Rotation) -> ShapeMatrix {
    let cells = local_cells(kind, rotation);
    let (min_x, max_x, min_y, max_y) = bounds(&cells);
    let width = (max_x - min_x + 1) as usize;
    let height = (max_y - min_y + 1) as usize;

    let mut matrix = vec![vec![0u8; width]; height];
    for (x, y) in cells {
        matrix[(y - min_y) as usize][(x - min_x) as usize] = 1;
    }
    matrix
}

/// One quarter turn of a shape matrix, matching the piece transform
/// (x, y) -> (y, -x) followed by renormalization to a non-negative box.
pub fn rotated(shape: &ShapeMatrix) -> ShapeMatrix {
    let rows = shape.len();
    let cols = if rows == 0 { 0 } else { shape[0].len() };

    let mut out = vec![vec![0u8; rows]; cols];
    for (y, row) in shape.iter().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            if v != 0 {
                out[cols - 1 - x][y] = 1;
            }
        }
    }
    out
}

/// Shape rotated `turns` quarter turns.
pub fn rotated_times(shape: &ShapeMatrix, turns: u8) -> ShapeMatrix {
    let mut out = shape.clone();
    for _ in 0..turns % 4 {
        out = rotated(&out);
    }
    out
}

pub fn width(shape: &ShapeMatrix) -> usize {
    shape.first().map(Vec::len).unwrap_or(0)
}

pub fn height(shape: &ShapeMatrix) -> usize {
    shape.len()
}

//! Read-only planner snapshot
//!
//! What a move source sees: occupancy only (no color tags), plus the current
//! and next piece as minimal bounding-box matrices in their current rotation.
//! The piece id lets the host discard replies that arrive after the piece
//! has already locked.

use crate::core::shape::ShapeMatrix;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerSnapshot {
    pub piece_id: u32,
    pub width: usize,
    pub height: usize,
    /// `cells[y][x]` is 0 (empty) or 1 (occupied)
    pub cells: Vec<Vec<u8>>,
    pub current: ShapeMatrix,
    pub next: Option<ShapeMatrix>,
}

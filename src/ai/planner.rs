//! Move planner - exhaustive placement search
//!
//! Evaluates every (rotation, column) placement of the current shape by
//! hard-dropping it against a copy of the board, scoring the settled result,
//! and adding a discounted one-ply lookahead over the next shape. Pure over
//! its inputs: identical snapshots always produce identical plans.

use crate::ai::heuristic::{evaluate, Weights};
use crate::core::shape::{self, ShapeMatrix};
use crate::core::snapshot::PlannerSnapshot;
use crate::types::MovePlan;

/// Find the best placement for the snapshot's current piece.
///
/// Iteration order is rotation ascending, then column ascending; the running
/// maximum is only replaced on a strictly greater score, so the first-found
/// placement wins ties. Returns None when no placement is feasible at all,
/// in which case the caller leaves the piece to gravity.
pub fn plan_move(snapshot: &PlannerSnapshot, weights: &Weights, discount: f64) -> Option<MovePlan> {
    let mut best: Option<(f64, MovePlan)> = None;
    let mut current = snapshot.current.clone();

    for rotations in 0..4u8 {
        if rotations > 0 {
            current = shape::rotated(&current);
        }
        let piece_width = shape::width(&current);
        if piece_width == 0 || piece_width > snapshot.width {
            continue;
        }

        for x in 0..=(snapshot.width - piece_width) {
            let Some((settled, cleared)) = drop_shape(&snapshot.cells, &current, x) else {
                continue;
            };

            let mut score = evaluate(&settled, cleared, weights);
            if let Some(next) = &snapshot.next {
                if let Some(next_score) = best_placement_score(&settled, next, weights) {
                    score += discount * next_score;
                }
            }

            let improved = match &best {
                None => true,
                Some((best_score, _)) => score > *best_score,
            };
            if improved {
                best = Some((
                    score,
                    MovePlan {
                        rotations,
                        target_col: x as i32,
                    },
                ));
            }
        }
    }

    best.map(|(_, plan)| plan)
}

/// Best heuristic score over all placements of `piece` on `cells`, without
/// further lookahead. None when nothing fits (its lookahead contribution is
/// then zero).
fn best_placement_score(cells: &[Vec<u8>], piece: &ShapeMatrix, weights: &Weights) -> Option<f64> {
    let board_width = cells.first().map(Vec::len).unwrap_or(0);
    let mut best: Option<f64> = None;
    let mut current = piece.clone();

    for rotations in 0..4u8 {
        if rotations > 0 {
            current = shape::rotated(&current);
        }
        let piece_width = shape::width(&current);
        if piece_width == 0 || piece_width > board_width {
            continue;
        }

        for x in 0..=(board_width - piece_width) {
            let Some((settled, cleared)) = drop_shape(cells, &current, x) else {
                continue;
            };
            let score = evaluate(&settled, cleared, weights);
            if best.map_or(true, |b| score > b) {
                best = Some(score);
            }
        }
    }

    best
}

/// True when the shape placed with its bounding box at (x, y) overlaps an
/// occupied cell or leaves the board.
fn collides(cells: &[Vec<u8>], piece: &ShapeMatrix, x: usize, y: usize) -> bool {
    let board_height = cells.len();
    for (sy, row) in piece.iter().enumerate() {
        for (sx, &v) in row.iter().enumerate() {
            if v == 0 {
                continue;
            }
            let by = y + sy;
            if by >= board_height {
                return true;
            }
            if cells[by][x + sx] != 0 {
                return true;
            }
        }
    }
    false
}

/// Hard-drop simulation: fall from the top row until the next row down
/// collides, merge into a copy, clear full rows. None when the shape cannot
/// even start (immediate collision at the top).
pub fn drop_shape(
    cells: &[Vec<u8>],
    piece: &ShapeMatrix,
    x: usize,
) -> Option<(Vec<Vec<u8>>, usize)> {
    if collides(cells, piece, x, 0) {
        return None;
    }

    let mut y = 0usize;
    while !collides(cells, piece, x, y + 1) {
        y += 1;
    }

    let mut settled = cells.to_vec();
    for (sy, row) in piece.iter().enumerate() {
        for (sx, &v) in row.iter().enumerate() {
            if v != 0 {
                settled[y + sy][x + sx] = 1;
            }
        }
    }

    let cleared = clear_full_rows(&mut settled);
    Some((settled, cleared))
}

fn clear_full_rows(grid: &mut Vec<Vec<u8>>) -> usize {
    let width = grid.first().map(Vec::len).unwrap_or(0);
    let before = grid.len();
    grid.retain(|row| row.iter().any(|&c| c == 0));
    let cleared = before - grid.len();
    for _ in 0..cleared {
        grid.insert(0, vec![0u8; width]);
    }
    cleared
}

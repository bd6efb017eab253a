//! Rotation rule - clockwise quarter turn with horizontal wall kicks
//!
//! Deliberately simpler than the standard rotation system: on a blocked
//! rotation the piece is nudged sideways through a fixed ordered candidate
//! list and the first fit wins. There are no vertical kicks, so a rotation
//! whose cells would rise above the top wall stays blocked until the piece
//! has fallen far enough.

use crate::core::{Board, Piece};

/// Horizontal nudges tried in order: in place, then near, then far.
pub const KICK_OFFSETS: [i32; 5] = [0, -1, 1, -2, 2];

/// Try to rotate the piece one quarter turn clockwise against the board.
/// On success the piece is updated (rotation plus any accepted nudge) and
/// `true` is returned; on failure the piece is left untouched.
pub fn try_rotate_cw(piece: &mut Piece, board: &Board) -> bool {
    let candidate = Piece {
        rotation: piece.rotation.rotate_cw(),
        ..*piece
    };

    for dx in KICK_OFFSETS {
        let nudged = Piece {
            x: candidate.x + dx,
            ..candidate
        };
        if nudged.is_valid(board) {
            *piece = nudged;
            return true;
        }
    }

    false
}

//! Agent protocol - line-delimited JSON move delegation
//!
//! One JSON object per line in each direction. The request carries occupancy
//! only (no color tags) plus the current and next piece as minimal
//! bounding-box matrices in their current rotation:
//!
//! ```text
//! {"width":10,"height":20,"cells":[[0,1,...],...],"currentShape":[[1,1],[1,1]],"nextShape":[[...]]}
//! {"opX":4,"opRotate":1}
//! ```
//!
//! `opX` is the desired leftmost column of the bounding box after rotation;
//! `opRotate` counts clockwise quarter turns. Both are sanitised on the core
//! side: `opX` clamped into `[0, width - piece_width]`, `opRotate` taken
//! modulo 4.

use serde::{Deserialize, Serialize};

use crate::core::shape::{self, ShapeMatrix};
use crate::core::PlannerSnapshot;
use crate::types::MovePlan;

/// Move-snapshot request (core -> agent)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub width: usize,
    pub height: usize,
    /// `cells[y][x]` is 0 (empty) or 1 (occupied)
    pub cells: Vec<Vec<u8>>,
    #[serde(rename = "currentShape")]
    pub current_shape: Vec<Vec<u8>>,
    #[serde(rename = "nextShape", default, skip_serializing_if = "Option::is_none")]
    pub next_shape: Option<Vec<Vec<u8>>>,
}

/// Move response (agent -> core)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    #[serde(rename = "opX")]
    pub op_x: i64,
    #[serde(rename = "opRotate")]
    pub op_rotate: i64,
}

impl MoveRequest {
    pub fn from_snapshot(snapshot: &PlannerSnapshot) -> Self {
        Self {
            width: snapshot.width,
            height: snapshot.height,
            cells: snapshot.cells.clone(),
            current_shape: snapshot.current.clone(),
            next_shape: snapshot.next.clone(),
        }
    }

    /// Rebuild a snapshot on the agent side. The piece id is meaningless off
    /// the core's timeline and is fixed at zero.
    pub fn into_snapshot(self) -> PlannerSnapshot {
        PlannerSnapshot {
            piece_id: 0,
            width: self.width,
            height: self.height,
            cells: self.cells,
            current: self.current_shape,
            next: self.next_shape,
        }
    }
}

/// Sanitise an agent response into an executable plan: rotation modulo 4,
/// column clamped into bounds for the rotated bounding box.
pub fn resolve_response(
    response: &MoveResponse,
    board_width: usize,
    current_shape: &ShapeMatrix,
) -> MovePlan {
    let rotations = response.op_rotate.rem_euclid(4) as u8;
    let rotated = shape::rotated_times(current_shape, rotations);
    let piece_width = shape::width(&rotated);
    let max_col = board_width.saturating_sub(piece_width) as i64;

    MovePlan {
        rotations,
        target_col: response.op_x.clamp(0, max_col) as i32,
    }
}

/// Encode a message as one protocol line (newline included).
pub fn encode_line<T: Serialize>(message: &T) -> serde_json::Result<String> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shape::piece_matrix;
    use crate::types::{PieceKind, Rotation};

    fn snapshot_2x2() -> PlannerSnapshot {
        PlannerSnapshot {
            piece_id: 9,
            width: 10,
            height: 20,
            cells: vec![vec![0u8; 10]; 20],
            current: piece_matrix(PieceKind::O, Rotation::R0),
            next: Some(piece_matrix(PieceKind::T, Rotation::R0)),
        }
    }

    #[test]
    fn test_request_wire_field_names() {
        let request = MoveRequest {
            width: 4,
            height: 2,
            cells: vec![vec![0, 1, 0, 0], vec![1, 1, 0, 0]],
            current_shape: vec![vec![1, 1], vec![1, 0]],
            next_shape: Some(vec![vec![1, 1, 1, 1]]),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"currentShape\":[[1,1],[1,0]]"));
        assert!(json.contains("\"nextShape\":[[1,1,1,1]]"));
        assert!(json.contains("\"cells\":[[0,1,0,0],[1,1,0,0]]"));

        let back: MoveRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_request_without_next_shape() {
        let json = r#"{"width":10,"height":20,"cells":[],"currentShape":[[1,1],[1,1]]}"#;
        let request: MoveRequest = serde_json::from_str(json).unwrap();
        assert!(request.next_shape.is_none());
    }

    #[test]
    fn test_response_wire_field_names() {
        let response: MoveResponse = serde_json::from_str(r#"{"opX":4,"opRotate":1}"#).unwrap();
        assert_eq!(response.op_x, 4);
        assert_eq!(response.op_rotate, 1);
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"opX":4,"opRotate":1}"#
        );
    }

    #[test]
    fn test_resolve_accepts_in_range_response() {
        let snapshot = snapshot_2x2();
        let response = MoveResponse {
            op_x: 4,
            op_rotate: 1,
        };
        let plan = resolve_response(&response, snapshot.width, &snapshot.current);
        assert_eq!(plan.rotations, 1);
        assert_eq!(plan.target_col, 4);
    }

    #[test]
    fn test_resolve_clamps_column() {
        let snapshot = snapshot_2x2();
        // A 2-wide piece on a 10-wide board can sit no further right than 8.
        let plan = resolve_response(
            &MoveResponse {
                op_x: 99,
                op_rotate: 0,
            },
            snapshot.width,
            &snapshot.current,
        );
        assert_eq!(plan.target_col, 8);

        let plan = resolve_response(
            &MoveResponse {
                op_x: -7,
                op_rotate: 0,
            },
            snapshot.width,
            &snapshot.current,
        );
        assert_eq!(plan.target_col, 0);
    }

    #[test]
    fn test_resolve_wraps_rotation() {
        let snapshot = snapshot_2x2();
        let plan = resolve_response(
            &MoveResponse {
                op_x: 0,
                op_rotate: 5,
            },
            snapshot.width,
            &snapshot.current,
        );
        assert_eq!(plan.rotations, 1);

        let plan = resolve_response(
            &MoveResponse {
                op_x: 0,
                op_rotate: -3,
            },
            snapshot.width,
            &snapshot.current,
        );
        assert_eq!(plan.rotations, 1);
    }

    #[test]
    fn test_resolve_uses_rotated_width_for_clamping() {
        // Horizontal I (width 4) rotated once becomes width 1, so the
        // rightmost legal column moves from 6 to 9.
        let current = piece_matrix(PieceKind::I, Rotation::R0);
        let plan = resolve_response(
            &MoveResponse {
                op_x: 99,
                op_rotate: 0,
            },
            10,
            &current,
        );
        assert_eq!(plan.target_col, 6);

        let plan = resolve_response(
            &MoveResponse {
                op_x: 99,
                op_rotate: 1,
            },
            10,
            &current,
        );
        assert_eq!(plan.target_col, 9);
    }

    #[test]
    fn test_encode_line_is_newline_terminated() {
        let line = encode_line(&MoveResponse {
            op_x: 1,
            op_rotate: 2,
        })
        .unwrap();
        assert!(line.ends_with('\n'));
        assert!(!line[..line.len() - 1].contains('\n'));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let snapshot = snapshot_2x2();
        let request = MoveRequest::from_snapshot(&snapshot);
        let rebuilt = request.into_snapshot();
        assert_eq!(rebuilt.width, snapshot.width);
        assert_eq!(rebuilt.cells, snapshot.cells);
        assert_eq!(rebuilt.current, snapshot.current);
        assert_eq!(rebuilt.next, snapshot.next);
    }
}

//! Core module - pure game logic
//!
//! Board, pieces, rotation, piece stream, scoring, and the authoritative
//! simulation. No networking or I/O lives here.

pub mod board;
pub mod game;
pub mod piece;
pub mod rng;
pub mod rotation;
pub mod scoring;
pub mod shape;
pub mod snapshot;

pub use board::Board;
pub use game::Game;
pub use piece::Piece;
pub use rng::PieceQueue;
pub use rotation::try_rotate_cw;
pub use snapshot::PlannerSnapshot;

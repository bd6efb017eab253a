//! AI module - heuristic board evaluation and the placement search

pub mod heuristic;
pub mod planner;

pub use heuristic::Weights;
pub use planner::plan_move;

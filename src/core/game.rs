//! Game module - the authoritative simulation
//!
//! Owns one board and one active piece, runs the timestamp-driven drop loop,
//! applies player intents, executes delivered move plans incrementally, and
//! handles locking, line clears, scoring, spawning, and game over. All
//! mutation happens here, on the host's single timeline; move sources only
//! ever see read-only snapshots.

use arrayvec::ArrayVec;

use crate::config::{ConfigError, GameConfig};
use crate::core::piece::piece_width;
use crate::core::rotation::try_rotate_cw;
use crate::core::scoring::{drop_interval_ms, level_for_lines, line_clear_points};
use crate::core::shape::piece_matrix;
use crate::core::snapshot::PlannerSnapshot;
use crate::core::{Board, Piece, PieceQueue};
use crate::types::{
    ControlMode, GameAction, LockEvent, MovePlan, PieceKind, Rotation, SessionRecord,
    PLAN_ROTATE_RETRY_LIMIT,
};

const EVENT_BUFFER: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlanPhase {
    Rotate,
    Shift,
}

/// In-flight execution state for a delivered move plan, consumed one step
/// per tick and discarded on lock.
#[derive(Debug, Clone, Copy)]
struct PlanState {
    phase: PlanPhase,
    rotations_left: u8,
    target_col: i32,
    rotate_retries: u8,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    queue: PieceQueue,
    active: Option<Piece>,
    next: PieceKind,
    plan: Option<PlanState>,
    /// A move request is outstanding for the current piece; human intents
    /// are rejected until the reply (or its failure) arrives.
    plan_pending: bool,
    /// Monotonic id for spawned pieces; stale plan replies are matched
    /// against this and discarded.
    piece_id: u32,
    score: u32,
    lines: u32,
    paused: bool,
    game_over: bool,
    started: bool,
    /// None forces a pacing reset: the next tick records its timestamp
    /// without dropping.
    last_drop_ms: Option<u64>,
    events: ArrayVec<LockEvent, EVENT_BUFFER>,
}

impl Game {
    /// Create a new game. The configuration is validated here; zero
    /// dimensions are rejected before any board exists.
    pub fn new(config: GameConfig, seed: u32) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        Ok(Self::with_valid_config(config, seed))
    }

    fn with_valid_config(config: GameConfig, seed: u32) -> Self {
        let mut queue = PieceQueue::new(seed);
        let next = queue.draw();
        Self {
            config,
            board: Board::new(config.width, config.height),
            queue,
            active: None,
            next,
            plan: None,
            plan_pending: false,
            piece_id: 0,
            score: 0,
            lines: 0,
            paused: false,
            game_over: false,
            started: false,
            last_drop_ms: None,
            events: ArrayVec::new(),
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.last_drop_ms = None;
        self.spawn_next();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        level_for_lines(self.config.start_level, self.lines)
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    /// True while a plan is outstanding or executing for the current piece
    pub fn under_plan_control(&self) -> bool {
        self.plan_pending || self.plan.is_some()
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Replace the active piece with a fresh spawn of `kind` (scenario tests)
    #[cfg(test)]
    pub fn force_active_kind(&mut self, kind: PieceKind) {
        self.active = Some(Piece::spawn(kind, self.board.width()));
    }

    /// Read-only snapshot for move sources. None without an active piece.
    pub fn planner_snapshot(&self) -> Option<PlannerSnapshot> {
        let active = self.active?;
        Some(PlannerSnapshot {
            piece_id: self.piece_id,
            width: self.board.width(),
            height: self.board.height(),
            cells: self.board.occupancy(),
            current: piece_matrix(active.kind, active.rotation),
            next: Some(piece_matrix(self.next, Rotation::R0)),
        })
    }

    /// Snapshot for an asynchronous move request. Marks the current piece as
    /// non-human-controlled until the reply (or its failure) arrives.
    pub fn request_plan_snapshot(&mut self) -> Option<PlannerSnapshot> {
        if self.paused || self.game_over {
            return None;
        }
        let snapshot = self.planner_snapshot()?;
        self.plan_pending = true;
        Some(snapshot)
    }

    /// Deliver a plan computed for `piece_id`. Late replies for a piece that
    /// has already locked are discarded. The target column is clamped to
    /// `[0, width - piece_width]` for the planned rotation.
    pub fn deliver_plan(&mut self, piece_id: u32, plan: MovePlan) -> bool {
        if piece_id != self.piece_id {
            return false;
        }
        let Some(active) = self.active else {
            self.plan_pending = false;
            return false;
        };
        if self.game_over {
            self.plan_pending = false;
            return false;
        }

        let rotations = plan.rotations % 4;
        let target_rotation = active.rotation.advanced(rotations);
        let width = piece_width(active.kind, target_rotation) as i32;
        let max_col = (self.board.width() as i32 - width).max(0);

        self.plan = Some(PlanState {
            phase: PlanPhase::Rotate,
            rotations_left: rotations,
            target_col: plan.target_col.clamp(0, max_col),
            rotate_retries: 0,
        });
        self.plan_pending = false;
        true
    }

    /// A move request for `piece_id` failed; release the piece back to
    /// gravity-only control.
    pub fn plan_failed(&mut self, piece_id: u32) {
        if piece_id == self.piece_id {
            self.plan_pending = false;
        }
    }

    /// Drain pending lock/line-clear events (score observers)
    pub fn take_events(&mut self) -> ArrayVec<LockEvent, EVENT_BUFFER> {
        std::mem::take(&mut self.events)
    }

    /// Record for the external high-score collaborator
    pub fn session_record(&self, name: &str, mode: ControlMode) -> SessionRecord {
        SessionRecord {
            name: name.to_string(),
            score: self.score,
            mode,
            width: self.board.width(),
            height: self.board.height(),
            level: self.level(),
        }
    }

    /// Main tick. `now_ms` is the host's clock; `soft_drop` reflects a held
    /// human soft-drop key. No-op while paused, over, or not started. The
    /// first tick after a pacing reset records its timestamp without acting.
    pub fn tick(&mut self, now_ms: u64, soft_drop: bool) {
        if !self.started || self.paused || self.game_over {
            return;
        }

        let Some(last_drop) = self.last_drop_ms else {
            self.last_drop_ms = Some(now_ms);
            return;
        };

        if self.active.is_some() {
            self.step_plan();
        }

        let boosted = soft_drop || self.plan.is_some();
        let interval = if boosted {
            self.config.boost_drop_ms
        } else {
            drop_interval_ms(self.config.base_drop_ms, self.level())
        };

        if now_ms.saturating_sub(last_drop) >= interval {
            self.last_drop_ms = Some(now_ms);
            if !self.try_move(0, 1) {
                self.lock_active();
            }
        }
    }

    /// Advance the executing plan by at most one rotation or one column.
    fn step_plan(&mut self) {
        let Some(mut plan) = self.plan else {
            return;
        };

        match plan.phase {
            PlanPhase::Rotate => {
                if plan.rotations_left == 0 {
                    plan.phase = PlanPhase::Shift;
                } else if self.try_rotate_active() {
                    plan.rotations_left -= 1;
                    if plan.rotations_left == 0 {
                        plan.phase = PlanPhase::Shift;
                    }
                } else {
                    plan.rotate_retries += 1;
                    if plan.rotate_retries >= PLAN_ROTATE_RETRY_LIMIT {
                        // Give up on rotating and line up as-is.
                        plan.phase = PlanPhase::Shift;
                    }
                }
            }
            PlanPhase::Shift => {
                if let Some(active) = self.active {
                    let left = active.left_col();
                    if left < plan.target_col {
                        self.try_move(1, 0);
                    } else if left > plan.target_col {
                        self.try_move(-1, 0);
                    }
                    // Aligned: gravity finishes the descent.
                }
            }
        }

        self.plan = Some(plan);
    }

    /// Apply a player intent. Movement, rotation, and drops are rejected
    /// while the piece is under non-human control, while paused, and after
    /// game over.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Pause => {
                if !self.started || self.game_over {
                    return false;
                }
                self.paused = !self.paused;
                if !self.paused {
                    self.last_drop_ms = None;
                }
                true
            }
            GameAction::Restart => {
                let seed = self.queue.seed();
                // Piece ids stay monotonic across restarts so a reply from
                // before the restart can never match a fresh piece.
                let piece_seq = self.piece_id;
                *self = Self::with_valid_config(self.config, seed);
                self.piece_id = piece_seq;
                self.start();
                true
            }
            _ => {
                if !self.started || self.paused || self.game_over || self.under_plan_control() {
                    return false;
                }
                match action {
                    GameAction::MoveLeft => self.try_move(-1, 0),
                    GameAction::MoveRight => self.try_move(1, 0),
                    GameAction::RotateCw => self.try_rotate_active(),
                    GameAction::SoftDrop => self.try_move(0, 1),
                    GameAction::HardDrop => self.hard_drop(),
                    GameAction::Pause | GameAction::Restart => unreachable!(),
                }
            }
        }
    }

    /// Try to move the active piece; rejected moves leave it untouched.
    pub(crate) fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let moved = Piece {
            x: active.x + dx,
            y: active.y + dy,
            ..active
        };
        if moved.is_valid(&self.board) {
            self.active = Some(moved);
            return true;
        }
        false
    }

    pub(crate) fn try_rotate_active(&mut self) -> bool {
        let Some(mut active) = self.active else {
            return false;
        };
        if try_rotate_cw(&mut active, &self.board) {
            self.active = Some(active);
            return true;
        }
        false
    }

    /// Drop the active piece to its resting row and lock immediately
    fn hard_drop(&mut self) -> bool {
        if self.active.is_none() {
            return false;
        }
        while self.try_move(0, 1) {}
        self.lock_active();
        true
    }

    /// Commit the active piece, clear lines, score, and spawn the next piece
    fn lock_active(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.board.lock(&active.cells(), active.kind);
        let cleared = self.board.clear_lines();
        let points = line_clear_points(cleared);
        self.score += points;
        self.lines += cleared as u32;

        self.plan = None;
        self.plan_pending = false;

        let locked_id = self.piece_id;
        self.spawn_next();

        self.push_event(LockEvent {
            piece_id: locked_id,
            lines_cleared: cleared as u32,
            points,
            game_over: self.game_over,
        });
    }

    /// Spawn the previewed piece. A spawn that does not fit is the sole
    /// path to game over.
    fn spawn_next(&mut self) {
        let piece = Piece::spawn(self.next, self.board.width());
        if !piece.is_valid(&self.board) {
            self.game_over = true;
            self.active = None;
            return;
        }
        self.next = self.queue.draw();
        self.active = Some(piece);
        self.piece_id = self.piece_id.wrapping_add(1);
    }

    fn push_event(&mut self, event: LockEvent) {
        if self.events.is_full() {
            self.events.remove(0);
        }
        self.events.push(event);
    }
}

//! Core types shared across the engine
//! Pure data types with no external dependencies

/// Default board dimensions
pub const DEFAULT_BOARD_WIDTH: usize = 10;
pub const DEFAULT_BOARD_HEIGHT: usize = 20;

/// Game timing constants (in milliseconds)
pub const TICK_MS: u64 = 16;
pub const BASE_DROP_MS: u64 = 800;
/// Forced drop interval while soft-dropping or while a plan steers the piece.
/// Three ticks per row lets a spawned I fall clear of the top wall before
/// the plan's rotation retries run out.
pub const BOOST_DROP_MS: u64 = 40;

/// How many ticks a pending rotation step may fail before the plan gives up
/// on rotating and falls through to shifting.
pub const PLAN_ROTATE_RETRY_LIMIT: u8 = 12;

/// Discount applied to the next-piece lookahead score in the planner.
pub const LOOKAHEAD_DISCOUNT: f64 = 0.9;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::L => "l",
            PieceKind::J => "j",
            PieceKind::S => "s",
            PieceKind::Z => "z",
        }
    }
}

/// Rotation states as clockwise quarter turns from spawn orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    R0,
    R1,
    R2,
    R3,
}

impl Rotation {
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::R0 => Rotation::R1,
            Rotation::R1 => Rotation::R2,
            Rotation::R2 => Rotation::R3,
            Rotation::R3 => Rotation::R0,
        }
    }

    /// Number of clockwise quarter turns from spawn orientation
    pub fn turns(&self) -> u8 {
        match self {
            Rotation::R0 => 0,
            Rotation::R1 => 1,
            Rotation::R2 => 2,
            Rotation::R3 => 3,
        }
    }

    pub fn from_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Rotation::R0,
            1 => Rotation::R1,
            2 => Rotation::R2,
            _ => Rotation::R3,
        }
    }

    /// Rotate clockwise `turns` times
    pub fn advanced(&self, turns: u8) -> Self {
        Self::from_turns(self.turns().wrapping_add(turns % 4))
    }
}

/// Player intents applied to the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    RotateCw,
    SoftDrop,
    HardDrop,
    Pause,
    Restart,
}

/// Cell on the board (None = empty, Some = locked with owner tag)
pub type Cell = Option<PieceKind>;

/// Intended placement for the active piece: clockwise quarter turns to
/// apply, then the target leftmost column of the bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlan {
    pub rotations: u8,
    pub target_col: i32,
}

/// Which move source drives the current session (reported in session records)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Human,
    Search,
    Remote,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Human => "human",
            ControlMode::Search => "search",
            ControlMode::Remote => "remote",
        }
    }
}

/// Lock/line-clear event (consumed by score observers via `take_last_event`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub piece_id: u32,
    pub lines_cleared: u32,
    pub points: u32,
    pub game_over: bool,
}

/// Finished-session record handed to the external high-score collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub name: String,
    pub score: u32,
    pub mode: ControlMode,
    pub width: usize,
    pub height: usize,
    pub level: u32,
}

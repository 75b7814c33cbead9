use thiserror::Error;

/// Board geometry or timing values that cannot host a game.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("board width {width}px is narrower than the {columns} columns it is divided into")]
    BoardTooNarrow { width: u32, columns: u32 },

    #[error("board height {height}px yields {rows} rows, at least {min} are needed")]
    BoardTooShort { height: u32, rows: u32, min: u32 },

    #[error("board {width}x{height}px is too large: each side must fit in i32 and give at most {max_rows} rows")]
    BoardTooLarge { width: u32, height: u32, max_rows: u32 },

    #[error("unit must be a finite, non-negative number (got {0})")]
    InvalidUnit(f32),

    #[error("tick interval must be non-zero")]
    ZeroTickInterval,

    #[error("minimum tick interval {min_ms}ms exceeds the tick interval {tick_ms}ms")]
    TickFloorAboveInterval { min_ms: u64, tick_ms: u64 },

    /// A resumed game must have a head
    #[error("snake has no segments")]
    EmptySnake,

    #[error("food at ({x}, {y}) lies under the snake")]
    FoodUnderSnake { x: i32, y: i32 },
}

//! Error types for the game core and the learning core
//!
//! Terminal episodes are not errors; they are reported through
//! [`StepResult::terminated`](crate::game::StepResult).

use thiserror::Error;

/// Invalid configuration, detected before an engine, memory or agent is built
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Grid width or height is zero or negative
    #[error("grid must be positive, got {width}x{height}")]
    EmptyGrid { width: i32, height: i32 },

    /// Block size is zero or negative
    #[error("block_size must be positive, got {0}")]
    InvalidBlockSize(i32),

    /// Grid dimension is not a whole number of blocks
    #[error("{dimension} ({value}) is not a multiple of block_size ({block_size})")]
    MisalignedGrid {
        dimension: &'static str,
        value: i32,
        block_size: i32,
    },

    /// Grid is too narrow to hold the initial snake
    #[error("grid has {columns} columns, initial snake needs {needed}")]
    GridTooSmall { columns: i32, needed: usize },

    /// Initial snake shorter than the minimum length
    #[error("initial_snake_length must be at least {min}, got {got}")]
    SnakeTooShort { min: usize, got: usize },

    /// Replay memory built with zero capacity
    #[error("replay memory capacity must be at least 1")]
    ZeroCapacity,

    /// A hyperparameter is out of range
    #[error("{name} {reason}, got {value}")]
    OutOfRange {
        name: &'static str,
        reason: &'static str,
        value: f64,
    },
}

/// Errors raised while simulating the game
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// Action vector is not one of the three canonical one-hot forms
    #[error("invalid action vector {0:?}")]
    InvalidAction([f32; 3]),

    /// No free cell is left for food
    #[error("no free cell left for food on a {columns}x{rows} grid")]
    BoardFull { columns: i32, rows: i32 },
}

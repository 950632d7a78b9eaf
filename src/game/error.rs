use thiserror::Error;

/// Contract violations from the board core. A rejected swap request
/// (adjacent cells that produce no match) is not an error; these are
/// caller bugs that must not pass undetected into gameplay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cell index {index} outside board of {size} cells")]
    OutOfBounds { index: usize, size: usize },
    #[error("cells {a} and {b} are not adjacent")]
    IllegalSwap { a: usize, b: usize },
}

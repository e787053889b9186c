use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board needs at least one row and one column")]
    InvalidSize,
    #[error("Too many mines, at least one cell must be safe")]
    TooManyMines,
}

pub type Result<T> = core::result::Result<T, GameError>;

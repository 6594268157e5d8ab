use crate::io::{ItemId, UserId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("division by zero: the actual ratings have a zero range")]
    DivideByZero,

    #[error("no prediction for user {user_id} and item {item_id}")]
    LookupMiss { user_id: UserId, item_id: ItemId },

    #[error("malformed record in {path} at line {line}: {reason}")]
    Malformed {
        path: String,
        line: u64,
        reason: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid time value: {0}")]
    InvalidTime(String),

    #[error("No slot at {0} in the computed schedule")]
    SlotNotFound(String),
}

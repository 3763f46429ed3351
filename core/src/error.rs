use thiserror::Error;

#[derive(Error, Debug)]
pub enum RollupError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Reporting cycle detected at employee '{employee_name}' ({employee_id})")]
    ManagerCycle {
        employee_id: String,
        employee_name: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RollupResult<T> = Result<T, RollupError>;

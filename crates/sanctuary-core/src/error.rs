use thiserror::Error;

#[derive(Debug, Error)]
pub enum SanctuaryError {
    #[error("no site config found: run 'sanctuary init'")]
    NotInitialized,

    #[error("invalid reference '{0}': expected a form like 'John 3:16'")]
    InvalidReference(String),

    #[error("empty reference: enter a passage such as 'John 3:16'")]
    EmptyReference,

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("invalid weekly schedule: {0}")]
    InvalidSchedule(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SanctuaryError>;

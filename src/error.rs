use thiserror::Error;

use crate::action::ActionError;

pub type Result<T> = std::result::Result<T, AffinityError>;

#[derive(Debug, Error)]
pub enum AffinityError {
    #[error("Invalid weights: {reason}")]
    InvalidWeights { reason: String },

    #[error("Invalid team size {team_size} for {member_count} members")]
    InvalidTeamSize { team_size: usize, member_count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Team assignment failed: {0}")]
    Assignment(#[from] ActionError),
}

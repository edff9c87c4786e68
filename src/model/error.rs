use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AffinityError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
    #[error(
        "invalid couple index at position {position}: ({first}, {second}) for {num_users} users"
    )]
    InvalidCoupleIndex {
        position: usize,
        first: usize,
        second: usize,
        num_users: usize,
    },
    #[error("insufficient population: {num_users} users, at least {required} required to rank")]
    InsufficientPopulation { num_users: usize, required: usize },
}

impl AffinityError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        AffinityError::InvalidInput {
            reason: reason.into(),
        }
    }
}

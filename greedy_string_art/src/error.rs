use crate::Sequence;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid value `{value}` for `{parameter}`: {reason}")]
    Configuration {
        parameter: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("no eligible nail left at iteration {iteration}")]
    NoCandidate {
        iteration: usize,
        /// Nails chosen before the scan came up empty.
        partial: Sequence,
    },

    #[error("run cancelled after {completed} iterations")]
    Cancelled { completed: usize },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn configuration(
        parameter: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        Self::Configuration {
            parameter,
            value: value.to_string(),
            reason,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("image data must be a 2-D single-channel array, found {ndim} dimensions")]
    InvalidRank { ndim: usize },

    #[error("image data must be single-channel, found {channels} channels")]
    UnsupportedChannels { channels: usize },

    #[error("unknown beam type `{0}` (expected ELECTRON or ION)")]
    UnknownBeamType(String),

    #[error("{record}: missing required key `{key}`")]
    MissingKey {
        record: &'static str,
        key: &'static str,
    },

    #[error("{record}: invalid value for `{key}`: {reason}")]
    InvalidValue {
        record: &'static str,
        key: &'static str,
        reason: String,
    },

    #[error("{record}: cannot decode mapping: {reason}")]
    Decode {
        record: &'static str,
        reason: String,
    },

    #[error("{record}: cannot encode mapping: {reason}")]
    Encode {
        record: &'static str,
        reason: String,
    },

    #[error("array shape failure: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl CoreError {
    pub(crate) fn invalid(record: &'static str, key: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            record,
            key,
            reason: reason.into(),
        }
    }
}

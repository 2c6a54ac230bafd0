/// Errors that can occur while marshaling or unmarshaling a message body.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The codec cannot convert the given body representation.
    #[error("{codec} codec: {detail} can not be directly converted")]
    UnsupportedBody {
        codec: &'static str,
        detail: String,
    },

    /// The payload is not valid for the body representation it was asked to fill.
    #[error("{codec} codec: payload is not valid {expected}: {source}")]
    InvalidPayload {
        codec: &'static str,
        expected: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, CodecError>;

use canwire_codec::CodecError;

/// Errors that can occur while packing or unpacking wire frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// An I/O error occurred on the underlying stream.
    ///
    /// Truncation mid-frame surfaces here as `UnexpectedEof`.
    #[error("proto I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A length field implies a negative remaining size or a header field
    /// overruns the frame.
    #[error("bad package: malformed frame layout")]
    BadPackage,

    /// The sequence field is not valid base-36 ASCII for a 32-bit integer.
    #[error("bad package: invalid base-36 sequence {0:?}")]
    BadSequence(String),

    /// The route does not fit its 1-byte length prefix.
    #[error("not support route longer than 255 bytes (got {len})")]
    RouteTooLong { len: usize },

    /// A 2-byte length-prefixed header field exceeds `u16::MAX`.
    #[error("{field} too long ({len} bytes, max {max})")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// The total frame size exceeds the configured maximum.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// The route is not a decimal transaction id (canet pack).
    #[error("route {route:?} is not a valid transaction id")]
    InvalidTransactionId { route: String },

    /// The frame references a transform filter that is not registered.
    #[error("unknown transform filter id {id}")]
    UnknownXferFilter { id: u8 },

    /// The frame references a body codec tag that is not registered.
    #[error("unknown body codec tag {id}")]
    UnknownBodyCodec { id: u8 },

    /// A transform filter failed while encoding or decoding the payload.
    #[error("transform filter {name} failed: {detail}")]
    XferFailed { name: &'static str, detail: String },

    /// The body codec rejected the payload or body value.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub type Result<T> = std::result::Result<T, ProtoError>;

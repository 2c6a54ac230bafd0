//! Body codec layer for canwire.
//!
//! Every message carries a one-byte codec tag next to its payload. This crate
//! defines the [`Body`] value model, the [`BodyCodec`] strategy trait selected
//! by that tag, and an explicitly constructed [`CodecRegistry`] mapping tags to
//! strategies. Registries are plain values handed to the framers — there is no
//! global registration at process start.

pub mod body;
pub mod canet;
pub mod error;
pub mod registry;

pub use body::Body;
pub use canet::{CanetCodec, CANET_CODEC_ID, CANET_CODEC_NAME};
pub use error::{CodecError, Result};
pub use registry::{BodyCodec, CodecRegistry};

//! Wire-framing codecs for canwire.
//!
//! Two framers serialize an RPC [`Message`] onto a blocking byte stream and
//! parse bytes back:
//!
//! - [`RawProto`] — self-describing length-prefixed frames with an optional
//!   transform pipeline, a structured header, and a tagged body.
//! - [`CanetProto`] — fixed 13-byte fragmenting frames for a CAN-bus-style
//!   link limited to 8 payload bytes per physical frame.
//!
//! Framers own no business logic, spawn no tasks, and never log or retry on
//! failure; every error returns to the hosting session, which decides
//! connection-level consequences.

pub mod canet;
pub mod error;
pub mod message;
pub mod meta;
pub mod pool;
pub mod proto;
pub mod query;
pub mod raw;
pub mod status;
pub mod xfer;

pub use canet::{CanetConfig, CanetProto, CANET_PROTO_ID, CANET_PROTO_NAME, CANET_ROUTE};
pub use error::{ProtoError, Result};
pub use message::{Message, Mtype};
pub use meta::Meta;
pub use pool::{BufferPool, PooledBuf};
pub use proto::WireCodec;
pub use raw::{RawConfig, RawProto, DEFAULT_MAX_FRAME_SIZE, RAW_PROTO_ID, RAW_PROTO_NAME};
pub use status::{Status, CODE_OK};
pub use xfer::{XferFilter, XferPipe, XferRegistry};

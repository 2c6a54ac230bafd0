//! Wire-framing codecs for RPC messages.
//!
//! canwire serializes an RPC message (sequence, type, route, status,
//! metadata, body) onto a blocking byte stream and parses bytes back, in one
//! of two wire formats: a self-describing length-prefixed frame with an
//! optional transform pipeline, or fixed 13-byte fragmenting frames for a
//! CAN-bus-style link.
//!
//! # Crate Structure
//!
//! - [`codec`] — Body value model and tag-keyed body codec registry
//! - [`proto`] — Message model, buffer pool, and the two wire framers
//!
//! # Example
//!
//! ```
//! use canwire::codec::{Body, CodecRegistry, CANET_CODEC_ID};
//! use canwire::proto::{Message, Mtype, RawProto, WireCodec};
//!
//! let mut proto = RawProto::new(
//!     std::io::Cursor::new(Vec::new()),
//!     Vec::new(),
//!     CodecRegistry::with_builtin(),
//! );
//!
//! let mut m = Message::new();
//! m.set_seq(5);
//! m.set_mtype(Mtype::Call);
//! m.set_route("/math/add");
//! m.set_body_codec(CANET_CODEC_ID);
//! m.set_body(Body::from(vec![1u8, 2, 3]));
//! proto.pack(&mut m).unwrap();
//!
//! assert_eq!(m.size() as usize, proto.into_inner().1.len());
//! ```

/// Re-export body codec types.
pub mod codec {
    pub use canwire_codec::*;
}

/// Re-export wire protocol types.
pub mod proto {
    pub use canwire_proto::*;
}

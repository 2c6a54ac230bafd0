//! Fixed-frame fragmenting framer ("canet" protocol).
//!
//! Models a CAN-bus-style link that carries at most 8 payload bytes per
//! physical frame. Pack splits the body into 13-byte frames
//! `[chunkLen:1][txnID:4 BE][chunk zero-padded to 8]`; the transaction id is
//! the message route parsed as a decimal integer. Unpack reads exactly one
//! 13-byte frame and produces one route-less push message — no reassembly
//! across frames happens at this layer.
//!
//! Historic peers of this protocol ignored the chunk-length byte on receipt
//! and passed all 8 payload bytes through, zero-padding included. This
//! implementation honors the declared length by default;
//! [`CanetConfig::pass_through_padding`] restores the legacy behavior for
//! wire compatibility with deployed peers.

use std::io::{Read, Write};

use tracing::trace;

use canwire_codec::{CodecRegistry, CANET_CODEC_ID};

use crate::error::{ProtoError, Result};
use crate::message::{Message, Mtype};
use crate::proto::WireCodec;

/// Identity byte of the canet protocol.
pub const CANET_PROTO_ID: u8 = b'c';

/// Identity name of the canet protocol.
pub const CANET_PROTO_NAME: &str = "canet";

/// Route literal stamped on every unpacked frame; this link carries no
/// service routing.
pub const CANET_ROUTE: &str = "/canet";

/// Payload capacity of one physical frame.
pub const CHUNK_CAPACITY: usize = 8;

/// Wire size of one physical frame: 1 length byte + 4 txn-id bytes + 8 payload.
pub const FRAME_SIZE: usize = 1 + 4 + CHUNK_CAPACITY;

/// Configuration for [`CanetProto`].
#[derive(Debug, Clone, Default)]
pub struct CanetConfig {
    /// Ignore the declared chunk-length byte on unpack and take all 8
    /// payload bytes verbatim, padding included. Off by default; turn on
    /// only for compatibility with peers that expect the padded body.
    pub pass_through_padding: bool,
}

/// The fixed 13-byte fragmenting framer.
pub struct CanetProto<R, W> {
    reader: R,
    writer: W,
    codecs: CodecRegistry,
    config: CanetConfig,
}

impl<R: Read, W: Write> CanetProto<R, W> {
    /// Create a framer with default configuration.
    pub fn new(reader: R, writer: W, codecs: CodecRegistry) -> Self {
        Self::with_config(reader, writer, codecs, CanetConfig::default())
    }

    /// Create a framer with explicit configuration.
    pub fn with_config(reader: R, writer: W, codecs: CodecRegistry, config: CanetConfig) -> Self {
        Self {
            reader,
            writer,
            codecs,
            config,
        }
    }

    /// Consume the framer and return the reader/writer halves.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Current configuration.
    pub fn config(&self) -> &CanetConfig {
        &self.config
    }
}

impl<R: Read, W: Write> WireCodec for CanetProto<R, W> {
    fn id(&self) -> u8 {
        CANET_PROTO_ID
    }

    fn name(&self) -> &'static str {
        CANET_PROTO_NAME
    }

    fn pack(&mut self, m: &mut Message) -> Result<()> {
        // Fail-fast: nothing is written unless the route is a transaction id
        // and the body marshals.
        let txn_id: u32 = m
            .route()
            .parse()
            .map_err(|_| ProtoError::InvalidTransactionId {
                route: m.route().to_owned(),
            })?;

        let tag = m.body_codec();
        let codec = self
            .codecs
            .get(tag)
            .ok_or(ProtoError::UnknownBodyCodec { id: tag })?;
        let body = codec.marshal(m.body())?;

        trace!(
            proto = CANET_PROTO_NAME,
            txn_id,
            body_len = body.len(),
            frames = body.len().div_ceil(CHUNK_CAPACITY),
            "packing frames"
        );

        // One independent write per physical frame; an empty body emits none.
        for chunk in body.chunks(CHUNK_CAPACITY) {
            let mut frame = [0u8; FRAME_SIZE];
            frame[0] = chunk.len() as u8;
            frame[1..5].copy_from_slice(&txn_id.to_be_bytes());
            frame[5..5 + chunk.len()].copy_from_slice(chunk);

            self.writer.write_all(&frame)?;
            m.set_size(FRAME_SIZE as u32);
        }
        self.writer.flush()?;
        Ok(())
    }

    fn unpack(&mut self, m: &mut Message) -> Result<()> {
        let mut frame = [0u8; FRAME_SIZE];
        self.reader.read_exact(&mut frame)?;

        m.set_size(FRAME_SIZE as u32);
        m.set_mtype(Mtype::Push);
        m.set_route(CANET_ROUTE);
        m.set_body_codec(CANET_CODEC_ID);

        let payload = if self.config.pass_through_padding {
            &frame[5..]
        } else {
            let declared = (frame[0] as usize).min(CHUNK_CAPACITY);
            &frame[5..5 + declared]
        };

        let codec = self
            .codecs
            .get(CANET_CODEC_ID)
            .ok_or(ProtoError::UnknownBodyCodec { id: CANET_CODEC_ID })?;
        codec.unmarshal(payload, m.body_mut())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use canwire_codec::{Body, CodecRegistry};

    use super::*;
    use crate::error::ProtoError;

    fn packer() -> CanetProto<Cursor<Vec<u8>>, Vec<u8>> {
        CanetProto::new(
            Cursor::new(Vec::new()),
            Vec::new(),
            CodecRegistry::with_builtin(),
        )
    }

    fn unpacker(wire: Vec<u8>) -> CanetProto<Cursor<Vec<u8>>, Vec<u8>> {
        CanetProto::new(
            Cursor::new(wire),
            Vec::new(),
            CodecRegistry::with_builtin(),
        )
    }

    fn push_message(route: &str, body: Vec<u8>) -> Message {
        let mut m = Message::new();
        m.set_mtype(Mtype::Push);
        m.set_route(route);
        m.set_body_codec(CANET_CODEC_ID);
        m.set_body(Body::from(body));
        m
    }

    #[test]
    fn identity() {
        let proto = packer();
        assert_eq!(proto.id(), b'c');
        assert_eq!(proto.name(), "canet");
    }

    #[test]
    fn four_byte_body_emits_one_known_frame() {
        let mut m = push_message("38", vec![0x27, 0x09, 0x01, 0x1D]);

        let mut proto = packer();
        proto.pack(&mut m).unwrap();
        let wire = proto.into_inner().1;

        assert_eq!(
            wire,
            vec![0x04, 0x00, 0x00, 0x00, 0x26, 0x27, 0x09, 0x01, 0x1D, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(m.size() as usize, FRAME_SIZE);
    }

    #[test]
    fn fragment_count_is_ceil_of_body_over_eight() {
        for (body_len, want_frames, want_last_chunk) in
            [(1usize, 1usize, 1u8), (8, 1, 8), (9, 2, 1), (16, 2, 8), (20, 3, 4)]
        {
            let mut m = push_message("42", vec![0xEE; body_len]);

            let mut proto = packer();
            proto.pack(&mut m).unwrap();
            let wire = proto.into_inner().1;

            assert_eq!(wire.len(), want_frames * FRAME_SIZE, "body_len={body_len}");
            let last_frame = &wire[(want_frames - 1) * FRAME_SIZE..];
            assert_eq!(last_frame[0], want_last_chunk, "body_len={body_len}");
        }
    }

    #[test]
    fn empty_body_emits_no_frames() {
        let mut m = push_message("42", Vec::new());

        let mut proto = packer();
        proto.pack(&mut m).unwrap();
        assert!(proto.into_inner().1.is_empty());
    }

    #[test]
    fn non_numeric_route_fails_before_writing() {
        let mut m = push_message("abc", vec![1, 2, 3]);

        let mut proto = packer();
        let err = proto.pack(&mut m).unwrap_err();
        assert!(matches!(err, ProtoError::InvalidTransactionId { route } if route == "abc"));
        assert!(proto.into_inner().1.is_empty());
    }

    #[test]
    fn negative_route_fails_before_writing() {
        let mut m = push_message("-1", vec![1]);

        let mut proto = packer();
        assert!(proto.pack(&mut m).is_err());
        assert!(proto.into_inner().1.is_empty());
    }

    #[test]
    fn unpack_forces_push_route_and_codec_tag() {
        // Frame with a nonsense chunk-length byte: identity fields are still
        // forced regardless of what the length byte declares.
        let mut wire = vec![0xFFu8];
        wire.extend_from_slice(&[0, 0, 0, 1]);
        wire.extend_from_slice(&[7; 8]);

        let mut m = Message::new();
        let mut proto = unpacker(wire);
        proto.unpack(&mut m).unwrap();

        assert_eq!(m.mtype(), Mtype::Push);
        assert_eq!(m.route(), CANET_ROUTE);
        assert_eq!(m.body_codec(), CANET_CODEC_ID);
        assert_eq!(m.size() as usize, FRAME_SIZE);
    }

    #[test]
    fn unpack_honors_declared_chunk_length() {
        let mut m = push_message("38", vec![0x27, 0x09, 0x01, 0x1D]);
        let mut proto = packer();
        proto.pack(&mut m).unwrap();
        let wire = proto.into_inner().1;

        let mut out = Message::new();
        let mut proto = unpacker(wire);
        proto.unpack(&mut out).unwrap();

        assert_eq!(out.body(), &Body::from(vec![0x27, 0x09, 0x01, 0x1D]));
    }

    #[test]
    fn pass_through_padding_keeps_all_eight_bytes() {
        let mut m = push_message("38", vec![0x27, 0x09, 0x01, 0x1D]);
        let mut proto = packer();
        proto.pack(&mut m).unwrap();
        let wire = proto.into_inner().1;

        let mut out = Message::new();
        let mut proto = CanetProto::with_config(
            Cursor::new(wire),
            Vec::new(),
            CodecRegistry::with_builtin(),
            CanetConfig {
                pass_through_padding: true,
            },
        );
        proto.unpack(&mut out).unwrap();

        assert_eq!(
            out.body(),
            &Body::from(vec![0x27, 0x09, 0x01, 0x1D, 0, 0, 0, 0])
        );
    }

    #[test]
    fn each_frame_unpacks_as_one_logical_push() {
        let body: Vec<u8> = (0u8..20).collect();
        let mut m = push_message("7", body.clone());
        let mut proto = packer();
        proto.pack(&mut m).unwrap();
        let wire = proto.into_inner().1;

        let mut proto = unpacker(wire);
        let mut reassembled = Vec::new();
        for _ in 0..3 {
            let mut out = Message::new();
            proto.unpack(&mut out).unwrap();
            match out.body() {
                Body::Bytes(b) => reassembled.extend_from_slice(b),
                other => panic!("unexpected body {other:?}"),
            }
        }
        assert_eq!(reassembled, body);

        // The stream holds exactly three frames.
        let mut out = Message::new();
        let err = proto.unpack(&mut out).unwrap_err();
        assert!(matches!(
            err,
            ProtoError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof
        ));
    }

    #[test]
    fn truncated_frame_is_io_error() {
        let wire = vec![0x01, 0x00, 0x00]; // 3 of 13 bytes
        let mut proto = unpacker(wire);
        let err = proto.unpack(&mut Message::new()).unwrap_err();
        assert!(matches!(
            err,
            ProtoError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof
        ));
    }

    #[test]
    fn declared_length_above_capacity_is_clamped() {
        let mut wire = vec![0x0Du8]; // claims 13, link carries at most 8
        wire.extend_from_slice(&[0, 0, 0, 5]);
        wire.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);

        let mut m = Message::new();
        let mut proto = unpacker(wire);
        proto.unpack(&mut m).unwrap();
        assert_eq!(m.body(), &Body::from(vec![1u8, 2, 3, 4, 5, 6, 7, 8]));
    }
}

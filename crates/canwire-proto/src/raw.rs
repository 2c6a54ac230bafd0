//! Length-prefixed general framer ("raw" protocol).
//!
//! Every message is one self-describing frame:
//!
//! ```text
//! [size:4][xferCount:1][xferIDs:xferCount]
//! [seqLen:1][seq base-36 ASCII:seqLen][mtype:1]
//! [routeLen:1][route:routeLen]
//! [statusLen:2][status query:statusLen]
//! [metaLen:2][meta query:metaLen]
//! [bodyTag:1][body:*]
//! ```
//!
//! Multi-byte fields are big-endian. The region after the transform ids may
//! be transform-encoded: the pipeline is applied forward over header+body on
//! pack and reversed on unpack.

use std::io::{Read, Write};

use bytes::{BufMut, BytesMut};
use tracing::trace;

use canwire_codec::CodecRegistry;

use crate::error::{ProtoError, Result};
use crate::message::{Message, Mtype};
use crate::pool::BufferPool;
use crate::proto::WireCodec;
use crate::status::Status;
use crate::xfer::XferRegistry;

/// Default identity byte of the raw protocol.
pub const RAW_PROTO_ID: u8 = b'r';

/// Default identity name of the raw protocol.
pub const RAW_PROTO_NAME: &str = "raw";

/// Default maximum total frame size: 16 MiB.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Configuration for [`RawProto`].
#[derive(Debug, Clone)]
pub struct RawConfig {
    /// Protocol identity byte reported by [`WireCodec::id`].
    pub id: u8,
    /// Protocol identity name reported by [`WireCodec::name`].
    pub name: &'static str,
    /// Maximum total frame size accepted on pack and unpack.
    pub max_frame_size: usize,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            id: RAW_PROTO_ID,
            name: RAW_PROTO_NAME,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

/// The length-prefixed general framer.
///
/// Owns the reader and writer halves of one connection plus the explicit
/// registries resolving body-codec tags and transform ids. `&mut self` on
/// pack/unpack makes single-reader (and single-writer) discipline a
/// compile-time guarantee.
pub struct RawProto<R, W> {
    reader: R,
    writer: W,
    codecs: CodecRegistry,
    xfers: XferRegistry,
    pool: BufferPool,
    config: RawConfig,
}

impl<R: Read, W: Write> RawProto<R, W> {
    /// Create a framer with default configuration and no transform filters.
    pub fn new(reader: R, writer: W, codecs: CodecRegistry) -> Self {
        Self::with_parts(
            reader,
            writer,
            codecs,
            XferRegistry::new(),
            BufferPool::new(),
            RawConfig::default(),
        )
    }

    /// Create a framer from explicit parts, sharing a buffer pool.
    pub fn with_parts(
        reader: R,
        writer: W,
        codecs: CodecRegistry,
        xfers: XferRegistry,
        pool: BufferPool,
        config: RawConfig,
    ) -> Self {
        Self {
            reader,
            writer,
            codecs,
            xfers,
            pool,
            config,
        }
    }

    /// Consume the framer and return the reader/writer halves.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// The buffer pool backing this framer's scratch buffers.
    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    /// Current configuration.
    pub fn config(&self) -> &RawConfig {
        &self.config
    }

    fn write_header(bb: &mut BytesMut, m: &Message) -> Result<()> {
        let seq = format_base36(i64::from(m.seq()));
        bb.put_u8(seq.len() as u8);
        bb.put_slice(seq.as_bytes());

        bb.put_u8(m.mtype().to_byte());

        let route = m.route().as_bytes();
        if route.len() > u8::MAX as usize {
            return Err(ProtoError::RouteTooLong { len: route.len() });
        }
        bb.put_u8(route.len() as u8);
        bb.put_slice(route);

        let status = m.status().encode_query();
        put_u16_field(bb, "status", &status)?;

        let meta = m.meta().encode_query();
        put_u16_field(bb, "meta", &meta)?;

        Ok(())
    }

    fn write_body(&self, bb: &mut BytesMut, m: &Message) -> Result<()> {
        let tag = m.body_codec();
        bb.put_u8(tag);
        let codec = self
            .codecs
            .get(tag)
            .ok_or(ProtoError::UnknownBodyCodec { id: tag })?;
        let body = codec.marshal(m.body())?;
        bb.put_slice(&body);
        Ok(())
    }

    fn read_header<'a>(data: &'a [u8], m: &mut Message) -> Result<&'a [u8]> {
        let mut cur = FieldCursor { data };

        let seq_len = cur.take_u8()? as usize;
        let seq_ascii = cur.take(seq_len)?;
        let seq = parse_base36(seq_ascii).ok_or_else(|| {
            ProtoError::BadSequence(String::from_utf8_lossy(seq_ascii).into_owned())
        })?;
        m.set_seq(seq);

        m.set_mtype(Mtype::from_byte(cur.take_u8()?));

        let route_len = cur.take_u8()? as usize;
        m.set_route(String::from_utf8_lossy(cur.take(route_len)?).into_owned());

        let status_len = cur.take_u16_be()? as usize;
        m.set_status(Status::decode_query(cur.take(status_len)?));

        let meta_len = cur.take_u16_be()? as usize;
        m.meta_mut().parse_bytes(cur.take(meta_len)?);

        Ok(cur.data)
    }

    fn read_body(&self, data: &[u8], m: &mut Message) -> Result<()> {
        let (&tag, payload) = data.split_first().ok_or(ProtoError::BadPackage)?;
        m.set_body_codec(tag);
        let codec = self
            .codecs
            .get(tag)
            .ok_or(ProtoError::UnknownBodyCodec { id: tag })?;
        codec.unmarshal(payload, m.body_mut())?;
        Ok(())
    }
}

impl<R: Read, W: Write> WireCodec for RawProto<R, W> {
    fn id(&self) -> u8 {
        self.config.id
    }

    fn name(&self) -> &'static str {
        self.config.name
    }

    fn pack(&mut self, m: &mut Message) -> Result<()> {
        let mut bb = self.pool.acquire();

        // Size prefix, patched once the total is known.
        bb.put_u32(0);

        let pipe = m.xfer_pipe();
        if pipe.len() > u8::MAX as usize {
            return Err(ProtoError::FieldTooLong {
                field: "xfer pipe",
                len: pipe.len(),
                max: u8::MAX as usize,
            });
        }
        bb.put_u8(pipe.len() as u8);
        bb.put_slice(pipe.ids());
        let prefix_len = bb.len();

        Self::write_header(&mut bb, m)?;
        self.write_body(&mut bb, m)?;

        let payload = self.xfers.on_pack(m.xfer_pipe(), &bb[prefix_len..])?;
        bb.truncate(prefix_len);
        bb.extend_from_slice(&payload);

        let size = bb.len();
        if size > self.config.max_frame_size.min(u32::MAX as usize) {
            return Err(ProtoError::FrameTooLarge {
                size,
                max: self.config.max_frame_size,
            });
        }
        m.set_size(size as u32);
        bb[..4].copy_from_slice(&m.size().to_be_bytes());

        trace!(proto = self.config.name, size, "packing frame");
        self.writer.write_all(&bb)?;
        self.writer.flush()?;
        Ok(())
    }

    fn unpack(&mut self, m: &mut Message) -> Result<()> {
        let mut bb = self.pool.acquire();

        // Frame size.
        let mut prefix = [0u8; 4];
        self.reader.read_exact(&mut prefix)?;
        let size = u32::from_be_bytes(prefix);
        if size as usize > self.config.max_frame_size {
            return Err(ProtoError::FrameTooLarge {
                size: size as usize,
                max: self.config.max_frame_size,
            });
        }
        m.set_size(size);
        let remaining = (size as usize)
            .checked_sub(4)
            .ok_or(ProtoError::BadPackage)?;

        // Transform pipe descriptor.
        let mut count = [0u8; 1];
        self.reader.read_exact(&mut count)?;
        let xfer_len = count[0] as usize;
        let remaining = remaining
            .checked_sub(1 + xfer_len)
            .ok_or(ProtoError::BadPackage)?;
        if xfer_len > 0 {
            bb.resize(xfer_len, 0);
            self.reader.read_exact(&mut bb)?;
            m.xfer_pipe_mut().append(&bb);
        }

        // Everything after the descriptor, possibly transform-encoded.
        bb.resize(remaining, 0);
        self.reader.read_exact(&mut bb)?;
        let data = self.xfers.on_unpack(m.xfer_pipe(), &bb)?;

        trace!(proto = self.config.name, size, "unpacked frame");
        let rest = Self::read_header(&data, m)?;
        self.read_body(rest, m)
    }
}

fn put_u16_field(bb: &mut BytesMut, field: &'static str, data: &[u8]) -> Result<()> {
    if data.len() > u16::MAX as usize {
        return Err(ProtoError::FieldTooLong {
            field,
            len: data.len(),
            max: u16::MAX as usize,
        });
    }
    bb.put_u16(data.len() as u16);
    bb.put_slice(data);
    Ok(())
}

/// Bounds-checked cursor over a decoded frame; slices fields in place.
struct FieldCursor<'a> {
    data: &'a [u8],
}

impl<'a> FieldCursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.data.len() < n {
            return Err(ProtoError::BadPackage);
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }

    fn take_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn take_u16_be(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }
}

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn format_base36(v: i64) -> String {
    if v == 0 {
        return "0".to_owned();
    }
    let negative = v < 0;
    let mut v = v.unsigned_abs();
    let mut digits = [0u8; 14];
    let mut i = digits.len();
    while v > 0 {
        i -= 1;
        digits[i] = BASE36_DIGITS[(v % 36) as usize];
        v /= 36;
    }
    let mut out = String::with_capacity(digits.len() - i + 1);
    if negative {
        out.push('-');
    }
    for &digit in &digits[i..] {
        out.push(digit as char);
    }
    out
}

fn parse_base36(ascii: &[u8]) -> Option<i32> {
    let text = std::str::from_utf8(ascii).ok()?;
    let wide = i64::from_str_radix(text, 36).ok()?;
    i32::try_from(wide).ok()
}

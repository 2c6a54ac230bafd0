use canwire_codec::Body;

use crate::meta::Meta;
use crate::status::Status;
use crate::xfer::XferPipe;

/// Message type discriminator, one byte on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mtype {
    /// Request expecting a reply.
    Call,
    /// Response to a call.
    Reply,
    /// One-way, fire-and-forget.
    Push,
    /// Any byte outside the known set; preserved verbatim.
    Unknown(u8),
}

impl Mtype {
    pub fn to_byte(self) -> u8 {
        match self {
            Mtype::Call => 1,
            Mtype::Reply => 2,
            Mtype::Push => 3,
            Mtype::Unknown(b) => b,
        }
    }

    pub fn from_byte(b: u8) -> Self {
        match b {
            1 => Mtype::Call,
            2 => Mtype::Reply,
            3 => Mtype::Push,
            other => Mtype::Unknown(other),
        }
    }
}

impl Default for Mtype {
    fn default() -> Self {
        Mtype::Call
    }
}

/// One RPC message, the unit a wire codec packs to or unpacks from a stream.
///
/// A message is supplied and owned by the calling session for the duration of
/// one pack or unpack call; the codec never retains it beyond that call. The
/// body slot's current [`Body`] variant selects the representation unmarshal
/// fills, so receivers pre-seed it with the shape they expect.
#[derive(Debug, Clone, Default)]
pub struct Message {
    size: u32,
    seq: i32,
    mtype: Mtype,
    route: String,
    status: Status,
    meta: Meta,
    body_codec: u8,
    body: Body,
    xfer_pipe: XferPipe,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total encoded frame length. Set by pack; populated from the wire on
    /// unpack. For the fixed-frame protocol it reflects only the last
    /// physical frame written.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn set_size(&mut self, size: u32) {
        self.size = size;
    }

    /// Sequence id correlating a call with its reply.
    pub fn seq(&self) -> i32 {
        self.seq
    }

    pub fn set_seq(&mut self, seq: i32) {
        self.seq = seq;
    }

    pub fn mtype(&self) -> Mtype {
        self.mtype
    }

    pub fn set_mtype(&mut self, mtype: Mtype) {
        self.mtype = mtype;
    }

    /// Service/method path, or the decimal transaction-id string for the
    /// fixed-frame protocol.
    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn set_route(&mut self, route: impl Into<String>) {
        self.route = route.into();
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    /// Wire tag of the body codec that produced or consumes the payload.
    pub fn body_codec(&self) -> u8 {
        self.body_codec
    }

    pub fn set_body_codec(&mut self, tag: u8) {
        self.body_codec = tag;
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn set_body(&mut self, body: Body) {
        self.body = body;
    }

    pub fn xfer_pipe(&self) -> &XferPipe {
        &self.xfer_pipe
    }

    pub fn xfer_pipe_mut(&mut self) -> &mut XferPipe {
        &mut self.xfer_pipe
    }

    /// Clear every field back to its default, keeping allocations where the
    /// underlying types allow. Lets a session reuse one message value across
    /// calls.
    pub fn reset(&mut self) {
        self.size = 0;
        self.seq = 0;
        self.mtype = Mtype::default();
        self.route.clear();
        self.status = Status::default();
        self.meta = Meta::new();
        self.body_codec = 0;
        self.body = Body::default();
        self.xfer_pipe.clear();
    }
}

use crate::error::Result;
use crate::message::Message;

/// The contract both wire framers implement.
///
/// `pack` encodes one message and writes it to the sink in full; `unpack`
/// blocks until exactly one frame has been read from the source and
/// populates the supplied message. Both take `&mut self`: exclusive access
/// is the interface-level replacement for a per-instance read lock, so
/// single-reader discipline holds at compile time. Callers that share one
/// codec across threads wrap it in their own synchronization, and callers
/// that share a sink between codec instances must serialize their packs to
/// avoid interleaved frames.
///
/// Cancellation and timeouts belong to the underlying stream; the codec has
/// no timeout logic of its own.
pub trait WireCodec {
    /// Static identity byte of this wire protocol.
    fn id(&self) -> u8;

    /// Static identity name of this wire protocol.
    fn name(&self) -> &'static str;

    /// Encode `m` and write it to the sink.
    ///
    /// On any error raised before the final sink write, nothing has been
    /// written; an error from the write itself may leave a partial frame on
    /// the stream, which the caller handles as connection-fatal.
    fn pack(&mut self, m: &mut Message) -> Result<()>;

    /// Read exactly one frame from the source (may block) into `m`.
    fn unpack(&mut self, m: &mut Message) -> Result<()>;
}

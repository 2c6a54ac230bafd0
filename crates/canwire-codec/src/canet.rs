use bytes::Bytes;

use crate::body::Body;
use crate::error::{CodecError, Result};
use crate::registry::BodyCodec;

/// Canet body codec name.
pub const CANET_CODEC_NAME: &str = "canet";

/// Canet body codec wire tag.
pub const CANET_CODEC_ID: u8 = b'c';

/// Pass-through body codec for canet payloads.
///
/// Bytes and text map to the wire unchanged (bytes without copying). A
/// [`Body::Json`] value is carried as its compact JSON text form. Anything
/// the target slot cannot represent fails with an explicit conversion error
/// rather than being coerced.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanetCodec;

impl BodyCodec for CanetCodec {
    fn id(&self) -> u8 {
        CANET_CODEC_ID
    }

    fn name(&self) -> &'static str {
        CANET_CODEC_NAME
    }

    fn marshal(&self, body: &Body) -> Result<Bytes> {
        match body {
            Body::None => Ok(Bytes::new()),
            Body::Bytes(b) => Ok(b.clone()),
            Body::Text(s) => Ok(Bytes::copy_from_slice(s.as_bytes())),
            Body::Json(v) => Ok(Bytes::from(v.to_string().into_bytes())),
        }
    }

    fn unmarshal(&self, data: &[u8], body: &mut Body) -> Result<()> {
        match body {
            Body::None => Ok(()),
            Body::Bytes(b) => {
                *b = Bytes::copy_from_slice(data);
                Ok(())
            }
            Body::Text(s) => {
                *s = String::from_utf8(data.to_vec()).map_err(|err| {
                    CodecError::UnsupportedBody {
                        codec: CANET_CODEC_NAME,
                        detail: format!("non-UTF-8 payload ({err})"),
                    }
                })?;
                Ok(())
            }
            Body::Json(v) => {
                *v = serde_json::from_slice(data).map_err(|source| {
                    CodecError::InvalidPayload {
                        codec: CANET_CODEC_NAME,
                        expected: "JSON",
                        source,
                    }
                })?;
                Ok(())
            }
        }
    }
}

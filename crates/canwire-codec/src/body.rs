use bytes::Bytes;

/// A message body, as seen by the wire codecs.
///
/// This is a closed set of supported representations. The variant of the slot
/// drives unmarshaling: a receiver that expects text pre-seeds the slot with
/// `Body::Text` and the codec fills it, the same way a typed argument pointer
/// would in a dynamic runtime — without open-ended runtime type inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// No payload; marshals to zero bytes, unmarshal discards the payload.
    None,
    /// Raw bytes, passed through unchanged.
    Bytes(Bytes),
    /// UTF-8 text.
    Text(String),
    /// Structured data carried as compact JSON text.
    Json(serde_json::Value),
}

impl Body {
    /// Payload length in bytes once marshaled by a pass-through codec.
    pub fn len(&self) -> usize {
        match self {
            Body::None => 0,
            Body::Bytes(b) => b.len(),
            Body::Text(s) => s.len(),
            Body::Json(v) => v.to_string().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::Bytes(Bytes::new())
    }
}

impl From<Bytes> for Body {
    fn from(b: Bytes) -> Self {
        Body::Bytes(b)
    }
}

impl From<Vec<u8>> for Body {
    fn from(b: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(b))
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::Text(s.to_owned())
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Text(s)
    }
}

impl From<serde_json::Value> for Body {
    fn from(v: serde_json::Value) -> Self {
        Body::Json(v)
    }
}

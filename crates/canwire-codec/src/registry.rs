use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;

use crate::body::Body;
use crate::canet::CanetCodec;
use crate::error::Result;

/// A body marshal/unmarshal strategy, selected by a one-byte tag.
pub trait BodyCodec: Send + Sync {
    /// The wire tag identifying this codec.
    fn id(&self) -> u8;

    /// Human-readable codec name.
    fn name(&self) -> &'static str;

    /// Encode the body into payload bytes.
    fn marshal(&self, body: &Body) -> Result<Bytes>;

    /// Decode payload bytes into the body slot.
    ///
    /// The current variant of `body` selects the target representation.
    fn unmarshal(&self, data: &[u8], body: &mut Body) -> Result<()>;
}

/// Tag-keyed registry of body codecs.
///
/// A registry is an explicit value passed into the framers at construction.
/// Registration is append-only; registering a codec under an already-taken
/// tag replaces the prior entry (last writer wins).
#[derive(Clone, Default)]
pub struct CodecRegistry {
    codecs: HashMap<u8, Arc<dyn BodyCodec>>,
}

impl CodecRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in canet codec pre-registered.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CanetCodec));
        registry
    }

    /// Register a codec under its own tag. Last writer wins on collision.
    pub fn register(&mut self, codec: Arc<dyn BodyCodec>) {
        self.codecs.insert(codec.id(), codec);
    }

    /// Look up the codec for a tag.
    pub fn get(&self, id: u8) -> Option<&Arc<dyn BodyCodec>> {
        self.codecs.get(&id)
    }

    /// Number of registered codecs.
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<u8> = self.codecs.keys().copied().collect();
        tags.sort_unstable();
        f.debug_struct("CodecRegistry").field("tags", &tags).finish()
    }
}

//! Transform pipeline: ordered, reversible payload passes (compression,
//! encryption) applied after header/body serialization and reversed before
//! parsing.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ProtoError, Result};

/// A reversible payload transformation, selected by a one-byte id.
pub trait XferFilter: Send + Sync {
    /// The wire id identifying this filter.
    fn id(&self) -> u8;

    /// Human-readable filter name.
    fn name(&self) -> &'static str;

    /// Forward pass, applied when packing.
    fn on_pack(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Reverse pass, applied when unpacking.
    fn on_unpack(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Id-keyed registry of transform filters.
///
/// Like the body-codec registry, this is an explicit value handed to the
/// framer at construction. Last writer wins on id collision.
#[derive(Clone, Default)]
pub struct XferRegistry {
    filters: HashMap<u8, Arc<dyn XferFilter>>,
}

impl XferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, filter: Arc<dyn XferFilter>) {
        self.filters.insert(filter.id(), filter);
    }

    pub fn get(&self, id: u8) -> Option<&Arc<dyn XferFilter>> {
        self.filters.get(&id)
    }

    /// Apply the pipeline forward (pack direction) over `data`.
    pub fn on_pack(&self, pipe: &XferPipe, data: &[u8]) -> Result<Vec<u8>> {
        let mut payload = data.to_vec();
        for &id in pipe.ids() {
            let filter = self.get(id).ok_or(ProtoError::UnknownXferFilter { id })?;
            payload = filter.on_pack(&payload)?;
        }
        Ok(payload)
    }

    /// Apply the pipeline in reverse (unpack direction) over `data`.
    pub fn on_unpack(&self, pipe: &XferPipe, data: &[u8]) -> Result<Vec<u8>> {
        let mut payload = data.to_vec();
        for &id in pipe.ids().iter().rev() {
            let filter = self.get(id).ok_or(ProtoError::UnknownXferFilter { id })?;
            payload = filter.on_unpack(&payload)?;
        }
        Ok(payload)
    }
}

impl std::fmt::Debug for XferRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<u8> = self.filters.keys().copied().collect();
        ids.sort_unstable();
        f.debug_struct("XferRegistry").field("ids", &ids).finish()
    }
}

/// The per-message ordered list of transform filter ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XferPipe {
    ids: Vec<u8>,
}

impl XferPipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append filter ids to the end of the pipeline.
    pub fn append(&mut self, ids: &[u8]) {
        self.ids.extend_from_slice(ids);
    }

    pub fn ids(&self) -> &[u8] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

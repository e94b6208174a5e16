use std::collections::HashMap;
use std::sync::Arc;

use crate::compressor::{GzipCompressor, NoneCompressor, ZlibCompressor, ZstdCompressor};
use crate::{CodecError, CompressorTraitsArc};

/// A mapping from algorithm names to [`CompressorTraits`](crate::CompressorTraits) implementations.
///
/// [`CodecRegistry::default`] registers the built-in `none`, `gzip`, `zlib` and `zstd` algorithms.
#[derive(Clone, Debug)]
pub struct CodecRegistry {
    compressors: HashMap<String, CompressorTraitsArc>,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        let mut registry = Self::new_empty();
        registry.register(Arc::new(NoneCompressor));
        registry.register(Arc::new(GzipCompressor));
        registry.register(Arc::new(ZlibCompressor));
        registry.register(Arc::new(ZstdCompressor));
        registry
    }
}

impl CodecRegistry {
    /// Create a registry with no algorithms.
    #[must_use]
    pub fn new_empty() -> Self {
        Self {
            compressors: HashMap::new(),
        }
    }

    /// Register `compressor` under its name, returning the compressor it replaces, if any.
    pub fn register(&mut self, compressor: CompressorTraitsArc) -> Option<CompressorTraitsArc> {
        let name = compressor.name();
        let replaced = self.compressors.insert(name.to_string(), compressor);
        if replaced.is_some() {
            log::debug!("replaced the registered {name} compressor");
        }
        replaced
    }

    /// Register `compressor`, returning the registry.
    #[must_use]
    pub fn with(mut self, compressor: CompressorTraitsArc) -> Self {
        self.register(compressor);
        self
    }

    /// Returns true if an algorithm named `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.compressors.contains_key(name)
    }

    /// Return the compressor named `name`.
    ///
    /// # Errors
    /// Returns [`CodecError::UnsupportedCodec`] if no algorithm named `name` is registered.
    pub fn get(&self, name: &str) -> Result<&CompressorTraitsArc, CodecError> {
        self.compressors
            .get(name)
            .ok_or_else(|| CodecError::UnsupportedCodec(name.to_string()))
    }

    /// Return the sorted names of the registered algorithms.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.compressors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_default() {
        let registry = CodecRegistry::default();
        assert_eq!(registry.names(), vec!["gzip", "none", "zlib", "zstd"]);
        assert!(registry.contains("zstd"));
        assert!(matches!(
            registry.get("lz4"),
            Err(CodecError::UnsupportedCodec(name)) if name == "lz4"
        ));
    }

    #[test]
    fn registry_register() {
        let mut registry = CodecRegistry::new_empty();
        assert!(registry.names().is_empty());
        assert!(registry.register(Arc::new(GzipCompressor)).is_none());
        assert!(registry.register(Arc::new(GzipCompressor)).is_some());
        assert_eq!(registry.names(), vec!["gzip"]);
    }
}

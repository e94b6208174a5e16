//! Global configuration options.

use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tessera_codec::CodecOptions;

/// Global configuration options for the tessera crate.
///
/// Retrieve the global [`Config`] with [`global_config`] and modify it with [`global_config_mut`].
///
/// ## Validate Checksums
///  > default: [`true`]
///
/// If enabled, chunks encoded with a checksum are validated against it when decoded.
///
/// ## Store Empty Chunks
///  > default: [`false`]
///
/// If disabled, a chunk whose elements all equal the fill value is erased from the store instead of being written.
///
/// ## Chunk Concurrency
///  > default: [`rayon::current_num_threads`]`()`
///
/// The number of chunks retrieved and decoded concurrently by a multi-chunk read.
/// Bounds the number of decoded chunks held in memory at once.
///
/// ## Compare and Swap Attempts
///  > default: `8`
///
/// The number of times a read-modify-write of a partially overwritten chunk is retried when the store supports compare-and-set and a concurrent writer changed the chunk.
#[derive(Debug)]
pub struct Config {
    validate_checksums: bool,
    store_empty_chunks: bool,
    chunk_concurrency: usize,
    compare_and_swap_attempts: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            validate_checksums: true,
            store_empty_chunks: false,
            chunk_concurrency: rayon::current_num_threads(),
            compare_and_swap_attempts: 8,
        }
    }
}

impl Config {
    /// Get the [validate checksums](#validate-checksums) configuration.
    #[must_use]
    pub fn validate_checksums(&self) -> bool {
        self.validate_checksums
    }

    /// Set the [validate checksums](#validate-checksums) configuration.
    pub fn set_validate_checksums(&mut self, validate_checksums: bool) -> &mut Self {
        self.validate_checksums = validate_checksums;
        self
    }

    /// Get the [store empty chunks](#store-empty-chunks) configuration.
    #[must_use]
    pub fn store_empty_chunks(&self) -> bool {
        self.store_empty_chunks
    }

    /// Set the [store empty chunks](#store-empty-chunks) configuration.
    pub fn set_store_empty_chunks(&mut self, store_empty_chunks: bool) -> &mut Self {
        self.store_empty_chunks = store_empty_chunks;
        self
    }

    /// Get the [chunk concurrency](#chunk-concurrency) configuration.
    #[must_use]
    pub fn chunk_concurrency(&self) -> usize {
        self.chunk_concurrency
    }

    /// Set the [chunk concurrency](#chunk-concurrency) configuration.
    ///
    /// A value of zero is treated as one.
    pub fn set_chunk_concurrency(&mut self, chunk_concurrency: usize) -> &mut Self {
        self.chunk_concurrency = chunk_concurrency.max(1);
        self
    }

    /// Get the [compare and swap attempts](#compare-and-swap-attempts) configuration.
    #[must_use]
    pub fn compare_and_swap_attempts(&self) -> usize {
        self.compare_and_swap_attempts
    }

    /// Set the [compare and swap attempts](#compare-and-swap-attempts) configuration.
    ///
    /// A value of zero is treated as one.
    pub fn set_compare_and_swap_attempts(&mut self, attempts: usize) -> &mut Self {
        self.compare_and_swap_attempts = attempts.max(1);
        self
    }

    /// Return the [`CodecOptions`] implied by this configuration.
    #[must_use]
    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions::default()
            .with_validate_checksums(self.validate_checksums)
            .with_store_empty_chunks(self.store_empty_chunks)
            .with_concurrent_target(self.chunk_concurrency)
    }
}

static CONFIG: LazyLock<RwLock<Config>> = LazyLock::new(|| RwLock::new(Config::default()));

/// Returns a reference to the global tessera configuration.
///
/// The configuration remains usable if a thread panicked while holding the lock.
pub fn global_config() -> RwLockReadGuard<'static, Config> {
    CONFIG.read().unwrap_or_else(PoisonError::into_inner)
}

/// Returns a mutable reference to the global tessera configuration.
///
/// Do not call while holding the guard returned by [`global_config`] on the same thread.
pub fn global_config_mut() -> RwLockWriteGuard<'static, Config> {
    CONFIG.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn config_validate_checksums() {
        assert!(global_config().validate_checksums());
        global_config_mut().set_validate_checksums(false);
        assert!(!global_config().validate_checksums());
        assert!(!global_config().codec_options().validate_checksums());
        global_config_mut().set_validate_checksums(true);
    }

    #[test]
    fn config_zero_is_one() {
        let mut config = Config::default();
        config.set_chunk_concurrency(0).set_compare_and_swap_attempts(0);
        assert_eq!(config.chunk_concurrency(), 1);
        assert_eq!(config.compare_and_swap_attempts(), 1);
    }
}

//! Optional cache of extracted pages keyed by the SHA-1 of a document's bytes.
//!
//! Only extraction is cached: vectors and rankings are rebuilt on every query.
//! Changed bytes hash to a new key, so a stale entry is never returned.

use crate::extract::ExtractError;
use lru::LruCache;
use parking_lot::Mutex;
use sha1::{Digest, Sha1};
use std::num::NonZeroUsize;
use std::sync::Arc;

pub struct PageCache {
    inner: Mutex<LruCache<String, Arc<Vec<String>>>>,
}

impl PageCache {
    pub fn new(capacity: NonZeroUsize) -> Self { Self { inner: Mutex::new(LruCache::new(capacity)) } }

    pub fn key(bytes: &[u8]) -> String {
        let mut hasher = Sha1::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }

    pub fn len(&self) -> usize { self.inner.lock().len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Cached pages for `bytes`, or the result of `extract`. Failures are not stored.
    pub fn get_or_extract<F>(&self, bytes: &[u8], extract: F) -> Result<Arc<Vec<String>>, ExtractError>
    where
        F: FnOnce(&[u8]) -> Result<Vec<String>, ExtractError>,
    {
        let key = Self::key(bytes);
        if let Some(pages) = self.inner.lock().get(&key) {
            tracing::debug!(%key, "page cache hit");
            return Ok(Arc::clone(pages));
        }
        // extraction runs unlocked; two racing misses both extract and the last insert wins
        let pages = Arc::new(extract(bytes)?);
        self.inner.lock().put(key, Arc::clone(&pages));
        Ok(pages)
    }
}

//! # Storage Traits
//!
//! Abstraction over the key-value store so the repositories can run against
//! any backend that can get and set strings by key.

use anyhow::Result;
use async_trait::async_trait;

/// Key-value storage of serialized blobs
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Retrieve the value stored under `key`
    async fn get_value(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn put_value(&self, key: &str, value: &str) -> Result<()>;
}

/// Errors returned by the chapter store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Chapter being updated does not exist
    #[error("chapter not found: {0}")]
    ChapterNotFound(crate::ChapterId),

    /// Backend connection could not be established
    #[error("store connection failed: {0}")]
    Connection(String),

    /// Redis command failed
    #[error("store backend error: {0}")]
    Backend(#[from] redis::RedisError),

    /// Stored document could not be decoded
    #[error("corrupt document under {key}: {source}")]
    Corrupt {
        /// Store key holding the document
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Player profile records and their storage codec.
pub mod models;
/// Ranked key-value store abstraction and its backends.
pub mod ranked_store;
/// Storage error shared by every backend.
pub mod storage;

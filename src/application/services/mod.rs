//! Application Services

mod voice_fetcher;

pub use voice_fetcher::{CleanupResult, FetchPolicy, VoiceFetcher};

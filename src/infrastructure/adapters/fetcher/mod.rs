//! Content Fetcher Adapters

mod http_content_fetcher;

pub use http_content_fetcher::{HttpContentFetcher, HttpContentFetcherConfig};

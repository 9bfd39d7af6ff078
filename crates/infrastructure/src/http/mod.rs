//! HTTP adapters

mod fetcher;

pub use fetcher::ReqwestFetcher;

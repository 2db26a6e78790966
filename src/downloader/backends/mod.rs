// Page-fetch backends

pub mod http;

pub use http::HttpFetcher;

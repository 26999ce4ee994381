pub mod client;
pub mod error;
pub mod service;

pub use client::SearchClient;
pub use error::SearchError;
pub use service::SearchService;

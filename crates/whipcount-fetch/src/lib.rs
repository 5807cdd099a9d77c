pub mod client;
pub mod dto;

pub use client::{DEFAULT_BASE_URL, DEFAULT_CONCURRENCY, FetchError, FetchedVotes, HtvClient};

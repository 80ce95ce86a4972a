//! HTTP implementation of the remote collaborators.

mod client;

pub use client::HttpApiClient;

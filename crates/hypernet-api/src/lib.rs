// Real network access for the page script and the cache worker
pub mod client;

pub use client::ReqwestClient;

pub mod client;

pub use client::{status_url, CometClient};

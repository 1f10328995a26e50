pub mod client;
pub mod digest;

pub use client::*;

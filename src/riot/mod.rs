mod client;
mod endpoints;
mod region;

pub mod metrics;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use client::RiotClient;
pub use region::Region;
pub use traits::{AccountApi, LolApi, MatchApi};

//! Match history and group leaderboards for League of Legends players.
//!
//! Users sign up with their Riot game name, sync their recent matches from the
//! Riot API into a local store, and compare KDA and win rate inside groups.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod riot;
pub mod stats;
pub mod sync;

pub mod auth;
pub mod groups;
pub mod leaderboard;
pub mod matches;

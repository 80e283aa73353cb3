pub mod health;
pub mod leaderboard;
pub mod player;
pub mod validation;

pub mod leaderboard_service;

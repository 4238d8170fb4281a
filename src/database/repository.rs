pub mod competitions_repository;
pub mod games_repository;
pub mod players_repository;
pub mod scores_repository;
pub mod teams_repository;

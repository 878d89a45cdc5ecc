mod routes;

pub use routes::{
    GameQuery, GameResponse, GameScoreRequest, GameScoreResponse, LeaderboardQuery, routes,
};

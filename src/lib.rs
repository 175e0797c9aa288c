pub mod api;
pub mod config;
pub mod daily;
pub mod feedback;
pub mod game;
pub mod http_client;
pub mod ingest;
pub mod player;
pub mod position;
pub mod refresh;
pub mod search;
pub mod store;

pub use feedback::{Feedback, compare};
pub use player::{Player, PlayerSummary, Popularity};
pub use position::normalize_position;

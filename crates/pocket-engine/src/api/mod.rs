pub mod game;
pub mod traits;
pub mod types;

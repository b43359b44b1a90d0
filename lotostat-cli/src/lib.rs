pub mod analysis;
pub mod display;
pub mod game;
pub mod import;

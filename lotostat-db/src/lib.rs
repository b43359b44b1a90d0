pub mod db;
pub mod models;
pub mod presets;

pub use rusqlite;

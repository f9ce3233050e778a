pub mod db;
pub mod history;
pub mod models;
pub mod state;

pub use rusqlite;

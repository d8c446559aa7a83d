pub mod config;
pub mod error;
pub mod params;
pub mod snapshot;
pub mod state;
pub mod stream_id;

pub mod activation;
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod scoring;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod week;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_data;

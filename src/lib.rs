pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod progress;
pub mod quarter;
pub mod state;
pub mod store;

pub use app::router;
pub use config::Config;
pub use quarter::QuarterPolicy;
pub use state::AppState;
pub use store::Store;

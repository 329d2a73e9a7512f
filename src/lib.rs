pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod plan;
pub mod services;
pub mod session;
pub mod state;
pub mod ui;
pub mod validation;

pub use app::router;
pub use client::ApiClient;
pub use config::Config;
pub use session::{Session, SessionEvent, SessionEvents};
pub use state::AppState;

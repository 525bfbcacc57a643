//! HTTP API handlers for xpanel

pub mod auth;
pub mod health;
pub mod index;
pub mod msg;
pub mod server;
pub mod setting;

pub use auth::require_login;
pub use health::health_routes;
pub use index::index_routes;
pub use msg::Msg;
pub use server::server_routes;
pub use setting::setting_routes;

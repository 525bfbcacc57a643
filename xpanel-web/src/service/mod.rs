//! Services the controllers delegate to

pub mod panel;
pub mod server;
pub mod setting;
pub mod user;

pub use panel::{PanelService, RESTART_GRACE};
pub use server::{ConnectionCounter, SystemConnectionCounter};
pub use setting::SettingService;
pub use user::UserService;

pub mod requests;
pub mod responses;

pub use requests::{AuthCallbackQuery, LoginRequest, MagicLinkRequest};
pub use responses::{LoginResponse, MagicLinkResponse, PendingLogin};

mod handler;
mod model;

pub use handler::{login, logout, me, register};
pub use model::{AuthResponse, MeResponse, UserProfile};

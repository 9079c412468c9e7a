mod handler;

pub use handler::{admin_page, dashboard, home, login_page, not_found, register_page};

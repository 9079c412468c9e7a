mod error_handler;
mod gate;

pub use error_handler::log_errors;
pub use gate::route_gate;

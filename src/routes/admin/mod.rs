mod handler;
mod model;

pub use handler::{clear_cache, overview_stats};
pub use model::OverviewStats;

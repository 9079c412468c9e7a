mod handler;
mod model;

pub use handler::{course_enrollments, enroll, my_enrollments, update_progress};

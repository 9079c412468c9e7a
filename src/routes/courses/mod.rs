mod handler;
mod model;

pub use handler::{
    create_course, delete_course, get_course, list_categories, list_courses, update_course,
};
pub use model::{Course, CoursePage};

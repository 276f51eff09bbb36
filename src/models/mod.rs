pub mod course;
pub mod student;

pub use course::{Course, NewCourseRequest, DEFAULT_CREDITS, DEFAULT_INSTRUCTOR};
pub use student::{EnrollStudentRequest, GradeUpdateRequest, Student};

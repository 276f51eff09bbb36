use std::env;
use std::path::PathBuf;

/// Runtime configuration, read once at startup and passed where needed.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub courses_file: PathBuf,
    pub students_file: PathBuf,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let courses_file = env::var("COURSEBOARD_COURSES_FILE")
            .unwrap_or_else(|_| "courses.csv".to_string());
        let students_file = env::var("COURSEBOARD_STUDENTS_FILE")
            .unwrap_or_else(|_| "students.csv".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self {
            courses_file: PathBuf::from(courses_file),
            students_file: PathBuf::from(students_file),
            port,
        }
    }
}

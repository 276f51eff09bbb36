use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::Student;

pub const DEFAULT_INSTRUCTOR: &str = "Unknown";
pub const DEFAULT_CREDITS: i64 = 3;

/// A course offering with its enrolled students embedded.
///
/// Timestamps are RFC 3339 strings; `updated_at` is refreshed on every
/// mutation of the course or of any of its students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub credits: i64,
    pub students: Vec<Student>,
    pub created_at: String,
    pub updated_at: String,
}

impl Course {
    /// Builds a fresh course. The id comes from the service's counter;
    /// missing instructor/credits fall back to their defaults.
    pub fn new(
        id: i64,
        title: String,
        description: String,
        instructor: Option<String>,
        credits: Option<i64>,
    ) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id,
            title,
            description,
            instructor: instructor.unwrap_or_else(|| DEFAULT_INSTRUCTOR.to_string()),
            credits: credits.unwrap_or(DEFAULT_CREDITS),
            students: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }

    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }

    pub fn student_mut(&mut self, student_id: &str) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.id == student_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCourseRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub instructor: Option<String>,
    pub credits: Option<i64>,
}

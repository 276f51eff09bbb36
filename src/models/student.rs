use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One student's enrollment in a single course. Owned by its course;
/// there is no standalone student record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub enrolled_at: String,
    pub grade: Option<String>,
}

impl Student {
    pub fn new(id: String, name: String, email: String) -> Self {
        Self {
            id,
            name,
            email,
            enrolled_at: Utc::now().to_rfc3339(),
            grade: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrollStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub student_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradeUpdateRequest {
    pub grade: Option<String>,
}

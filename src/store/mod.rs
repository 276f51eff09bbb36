use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::AppConfig;
use crate::models::{Course, Student};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

const COURSE_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "description",
    "instructor",
    "credits",
    "created_at",
    "updated_at",
];
const STUDENT_COLUMNS: [&str; 6] = [
    "course_id",
    "student_id",
    "name",
    "email",
    "grade",
    "enrolled_at",
];

/// One row of the courses table. Column order is the on-disk column order.
#[derive(Debug, Serialize, Deserialize)]
struct CourseRow {
    id: i64,
    title: String,
    description: String,
    instructor: String,
    credits: i64,
    created_at: String,
    updated_at: String,
}

impl CourseRow {
    fn from_course(course: &Course) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            description: course.description.clone(),
            instructor: course.instructor.clone(),
            credits: course.credits,
            created_at: course.created_at.clone(),
            updated_at: course.updated_at.clone(),
        }
    }

    fn into_course(self) -> Course {
        Course {
            id: self.id,
            title: self.title,
            description: self.description,
            instructor: self.instructor,
            credits: self.credits,
            students: Vec::new(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// One row of the enrollments table; `course_id` joins back to the courses
/// table. An empty `grade` field round-trips as `None`.
#[derive(Debug, Serialize, Deserialize)]
struct StudentRow {
    course_id: i64,
    student_id: String,
    name: String,
    email: String,
    grade: Option<String>,
    enrolled_at: String,
}

impl StudentRow {
    fn from_student(course_id: i64, student: &Student) -> Self {
        Self {
            course_id,
            student_id: student.id.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            grade: student.grade.clone(),
            enrolled_at: student.enrolled_at.clone(),
        }
    }

    fn into_student(self) -> Student {
        Student {
            id: self.student_id,
            name: self.name,
            email: self.email,
            enrolled_at: self.enrolled_at,
            grade: self.grade,
        }
    }
}

/// Persists the course list across two correlated CSV files. Holds no cache;
/// it is a pure transform between the in-memory list and the files.
pub struct CsvStore {
    courses_file: PathBuf,
    students_file: PathBuf,
}

impl CsvStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            courses_file: config.courses_file.clone(),
            students_file: config.students_file.clone(),
        }
    }

    /// Best-effort load. A missing courses file means no data; a malformed
    /// row stops parsing of that file but keeps the rows already read.
    /// Enrollment rows whose course id has no match are dropped.
    pub fn load(&self) -> Vec<Course> {
        let mut courses = Vec::new();

        let mut reader = match csv::Reader::from_path(&self.courses_file) {
            Ok(reader) => reader,
            Err(_) => return courses,
        };
        for row in reader.deserialize::<CourseRow>() {
            match row {
                Ok(row) => courses.push(row.into_course()),
                Err(err) => {
                    warn!("skipping rest of {:?}: {}", self.courses_file, err);
                    break;
                }
            }
        }

        if let Ok(mut reader) = csv::Reader::from_path(&self.students_file) {
            for row in reader.deserialize::<StudentRow>() {
                let row = match row {
                    Ok(row) => row,
                    Err(err) => {
                        warn!("skipping rest of {:?}: {}", self.students_file, err);
                        break;
                    }
                };
                if let Some(course) = courses.iter_mut().find(|c| c.id == row.course_id) {
                    course.students.push(row.into_student());
                }
            }
        }

        courses
    }

    /// Full rewrite of both files, headers included. Not atomic: a crash
    /// between the two writes leaves them inconsistent.
    pub fn save(&self, courses: &[Course]) -> Result<(), StoreError> {
        // Headers are written by hand so an empty list still leaves a valid
        // file behind; auto-headers only appear with the first record.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.courses_file)?;
        writer.write_record(COURSE_COLUMNS)?;
        for course in courses {
            writer.serialize(CourseRow::from_course(course))?;
        }
        writer.flush()?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.students_file)?;
        writer.write_record(STUDENT_COLUMNS)?;
        for course in courses {
            for student in &course.students {
                writer.serialize(StudentRow::from_student(course.id, student))?;
            }
        }
        writer.flush()?;

        Ok(())
    }
}

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::models::{Course, Student};
use crate::notify::{CourseEvent, NotificationSink};
use crate::store::{CsvStore, StoreError};

/// The authoritative in-memory record manager. Owns the course list and the
/// id counter; every mutation rewrites the store and then fans out to the
/// registered sinks.
pub struct CourseService {
    store: CsvStore,
    courses: Vec<Course>,
    next_id: i64,
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl CourseService {
    /// Loads persisted state once and seeds the id counter at
    /// `max(loaded ids) + 1`, so ids keep increasing across restarts.
    pub fn new(store: CsvStore) -> Self {
        let courses = store.load();
        let next_id = courses.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        info!("loaded {} courses, next id {}", courses.len(), next_id);
        Self {
            store,
            courses,
            next_id,
            sinks: Vec::new(),
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    fn take_next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn notify_sinks(&self, course: &Course, event: CourseEvent) {
        for sink in &self.sinks {
            if let Err(err) = sink.notify(course, event) {
                warn!("notification sink failed for '{}': {}", event.as_str(), err);
            }
        }
    }

    pub fn add_course(
        &mut self,
        title: String,
        description: String,
        instructor: Option<String>,
        credits: Option<i64>,
    ) -> Result<Course, StoreError> {
        let id = self.take_next_id();
        let course = Course::new(id, title, description, instructor, credits);
        info!("created course {} '{}'", course.id, course.title);
        self.courses.push(course.clone());
        self.store.save(&self.courses)?;
        self.notify_sinks(&course, CourseEvent::Created);
        Ok(course)
    }

    pub fn course(&self, id: i64) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn courses_by_instructor(&self, instructor: &str) -> Vec<Course> {
        self.courses
            .iter()
            .filter(|c| c.instructor == instructor)
            .cloned()
            .collect()
    }

    /// Applies the recognized mutable fields from an arbitrary JSON object.
    /// Unknown names, managed fields (`id`, `students`, timestamps), and
    /// mistyped values are ignored rather than rejected. `updated_at` is
    /// refreshed even when no field matched.
    pub fn update_course(
        &mut self,
        id: i64,
        changes: &Map<String, Value>,
    ) -> Result<Option<Course>, StoreError> {
        let Some(idx) = self.courses.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        {
            let course = &mut self.courses[idx];
            for (key, value) in changes {
                match key.as_str() {
                    "title" => {
                        if let Some(v) = value.as_str() {
                            course.title = v.to_string();
                        }
                    }
                    "description" => {
                        if let Some(v) = value.as_str() {
                            course.description = v.to_string();
                        }
                    }
                    "instructor" => {
                        if let Some(v) = value.as_str() {
                            course.instructor = v.to_string();
                        }
                    }
                    "credits" => {
                        if let Some(v) = value.as_i64() {
                            course.credits = v;
                        }
                    }
                    _ => {}
                }
            }
            course.touch();
        }
        self.store.save(&self.courses)?;
        let course = self.courses[idx].clone();
        self.notify_sinks(&course, CourseEvent::Updated);
        Ok(Some(course))
    }

    /// Removes the course with the given id. Remaining courses keep their
    /// ids and relative order; ids are never reassigned.
    pub fn delete_course(&mut self, id: i64) -> Result<bool, StoreError> {
        let Some(idx) = self.courses.iter().position(|c| c.id == id) else {
            return Ok(false);
        };
        let removed = self.courses.remove(idx);
        info!("deleted course {} '{}'", removed.id, removed.title);
        self.store.save(&self.courses)?;
        self.notify_sinks(&removed, CourseEvent::Deleted);
        Ok(true)
    }

    /// Enrolls a student into an existing course. No duplicate-id check is
    /// performed; the caller supplies the student id.
    pub fn enroll_student(
        &mut self,
        course_id: i64,
        name: String,
        email: String,
        student_id: String,
    ) -> Result<Option<Student>, StoreError> {
        let Some(idx) = self.courses.iter().position(|c| c.id == course_id) else {
            return Ok(None);
        };
        let student = Student::new(student_id, name, email);
        let enrolled = student.clone();
        let course = &mut self.courses[idx];
        info!("enrolling student {} in course {}", enrolled.id, course.id);
        course.students.push(student);
        course.touch();
        self.store.save(&self.courses)?;
        self.notify_sinks(&self.courses[idx], CourseEvent::StudentEnrolled);
        Ok(Some(enrolled))
    }

    /// Sets (or clears) a student's grade. Deliberately fires no
    /// notification, unlike every other mutation.
    pub fn update_student_grade(
        &mut self,
        course_id: i64,
        student_id: &str,
        grade: Option<String>,
    ) -> Result<Option<Student>, StoreError> {
        let Some(idx) = self.courses.iter().position(|c| c.id == course_id) else {
            return Ok(None);
        };
        let course = &mut self.courses[idx];
        let Some(student) = course.student_mut(student_id) else {
            return Ok(None);
        };
        student.grade = grade;
        let updated = student.clone();
        course.touch();
        self.store.save(&self.courses)?;
        Ok(Some(updated))
    }

    /// Drops the student from the course's roster. Returns `true` whenever
    /// the course exists, even if no student id matched; callers cannot tell
    /// the two apart (see DESIGN.md).
    pub fn remove_student(
        &mut self,
        course_id: i64,
        student_id: &str,
    ) -> Result<bool, StoreError> {
        let Some(idx) = self.courses.iter().position(|c| c.id == course_id) else {
            return Ok(false);
        };
        let course = &mut self.courses[idx];
        course.students.retain(|s| s.id != student_id);
        course.touch();
        self.store.save(&self.courses)?;
        self.notify_sinks(&self.courses[idx], CourseEvent::StudentRemoved);
        Ok(true)
    }
}

//! Data access for courses and their exercises.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// An exercise row as stored, content still encoded.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ExerciseRecord {
    pub id: i32,
    pub course_id: i32,
    pub name: String,
    pub slug: String,
    pub sequence_num: i32,
    pub content: String,
}

/// A course with its exercises ordered by `sequence_num`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseExercises {
    pub id: i32,
    pub name: String,
    pub exercises: Vec<ExerciseRecord>,
}

/// Source of course exercises.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Load a course and its exercises ordered by `sequence_num`.
    ///
    /// Returns `Ok(None)` if the course does not exist.
    async fn course_exercises(&self, course_id: i32) -> Result<Option<CourseExercises>>;
}

/// Repository over courses held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCourseRepository {
    courses: HashMap<i32, CourseExercises>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a course.
    pub fn insert(&mut self, course: CourseExercises) {
        self.courses.insert(course.id, course);
    }

    pub fn with_course(mut self, course: CourseExercises) -> Self {
        self.insert(course);
        self
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn course_exercises(&self, course_id: i32) -> Result<Option<CourseExercises>> {
        Ok(self.courses.get(&course_id).map(|course| {
            let mut course = course.clone();
            course.exercises.sort_by_key(|e| e.sequence_num);
            course
        }))
    }
}

//! PostgreSQL-backed course repository.

use crate::repository::{CourseExercises, CourseRepository, ExerciseRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: i32,
    name: String,
}

/// Course repository backed by PostgreSQL.
#[derive(Clone)]
pub struct PgCourseRepository {
    pool: PgPool,
}

impl PgCourseRepository {
    /// Connect to the database at `database_url`
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;

        info!("✓ Connected to database (max {} connections)", max_connections);
        Ok(Self::new(pool))
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    async fn course_exercises(&self, course_id: i32) -> Result<Option<CourseExercises>> {
        let course: Option<CourseRow> =
            sqlx::query_as("SELECT id, name FROM courses WHERE id = $1")
                .bind(course_id)
                .fetch_optional(&self.pool)
                .await
                .context(format!("Failed to load course {}", course_id))?;

        let Some(course) = course else {
            return Ok(None);
        };

        // Exercises with no stored content decode as raw empty content
        let exercises: Vec<ExerciseRecord> = sqlx::query_as(
            "SELECT id, course_id, name, slug, sequence_num, COALESCE(content, '') AS content
             FROM exercises
             WHERE course_id = $1
             ORDER BY sequence_num, id",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .context(format!("Failed to load exercises for course {}", course_id))?;

        debug!(
            "Loaded course {} ('{}') with {} exercises",
            course.id,
            course.name,
            exercises.len()
        );

        Ok(Some(CourseExercises {
            id: course.id,
            name: course.name,
            exercises,
        }))
    }
}

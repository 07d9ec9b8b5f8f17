//! Exercise rendering: a course's exercises with glossaries resolved and applied.

use crate::content::ExerciseContent;
use crate::error::{RenderError, SlugError};
use crate::glossary::{transform, GlossaryIndex, PathResolver, Resolution};
use crate::repository::{CourseRepository, ExerciseRecord};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which glossary localized an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GlossaryOutcome {
    Resolved {
        path: String,
        language: String,
        fallback: bool,
    },
    /// Placeholders were left as stored
    None,
}

impl From<Resolution<'_>> for GlossaryOutcome {
    fn from(resolution: Resolution<'_>) -> Self {
        match resolution {
            Resolution::Resolved(resolved) => GlossaryOutcome::Resolved {
                path: resolved.path.to_string(),
                language: resolved.language.to_string(),
                fallback: resolved.fallback,
            },
            Resolution::NoGlossary => GlossaryOutcome::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedExercise {
    pub id: i32,
    pub course_id: i32,
    pub name: String,
    pub slug: String,
    pub sequence_num: i32,
    pub content: ExerciseContent,
    pub glossary: GlossaryOutcome,
}

/// An exercise whose slug could not be mapped to a glossary path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseFailure {
    pub id: i32,
    pub slug: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: SlugError,
}

fn serialize_display<S: serde::Serializer>(
    error: &SlugError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Per-exercise render result. A failed exercise never fails its siblings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderedExercise {
    Localized(LocalizedExercise),
    Failed(ExerciseFailure),
}

impl RenderedExercise {
    pub fn localized(&self) -> Option<&LocalizedExercise> {
        match self {
            RenderedExercise::Localized(exercise) => Some(exercise),
            RenderedExercise::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RenderedExercise::Failed(_))
    }
}

/// A course rendered in one language, exercises in `sequence_num` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCourse {
    pub id: i32,
    pub name: String,
    pub lang: String,
    pub exercises: Vec<RenderedExercise>,
}

impl RenderedCourse {
    /// All exercises, or the first slug failure for callers that cannot
    /// accept a partially localized course.
    pub fn into_complete(self) -> Result<Vec<LocalizedExercise>, RenderError> {
        self.exercises
            .into_iter()
            .map(|exercise| match exercise {
                RenderedExercise::Localized(exercise) => Ok(exercise),
                RenderedExercise::Failed(failure) => Err(RenderError::from(failure.error)),
            })
            .collect()
    }
}

/// Localize one exercise against `index`.
///
/// Content that fails to decode, or has no glossary, is returned unchanged.
pub fn localize_exercise(
    index: &GlossaryIndex,
    course_name: &str,
    record: &ExerciseRecord,
    language: &str,
) -> Result<LocalizedExercise, SlugError> {
    let resolution = PathResolver::new(index).resolve(course_name, &record.slug, language)?;

    let stored = ExerciseContent::decode(&record.content);
    if matches!(stored, ExerciseContent::Raw(_)) {
        debug!("Exercise {} content did not decode, passing it through", record.id);
    }
    let content = transform(&stored, resolution.glossary());

    Ok(LocalizedExercise {
        id: record.id,
        course_id: record.course_id,
        name: record.name.clone(),
        slug: record.slug.clone(),
        sequence_num: record.sequence_num,
        content,
        glossary: resolution.into(),
    })
}

/// Renders courses from a repository against a shared, read-only glossary index.
#[derive(Clone)]
pub struct ExerciseRenderer {
    index: Arc<GlossaryIndex>,
    repository: Arc<dyn CourseRepository>,
}

impl ExerciseRenderer {
    pub fn new(index: Arc<GlossaryIndex>, repository: Arc<dyn CourseRepository>) -> Self {
        Self { index, repository }
    }

    /// Render every exercise of `course_id` in `language`.
    ///
    /// `language` is tried as given before falling back. Fails only when the
    /// course cannot be loaded; exercises with bad slugs are reported in place.
    pub async fn render(&self, course_id: i32, language: &str) -> Result<RenderedCourse, RenderError> {
        let course = self
            .repository
            .course_exercises(course_id)
            .await
            .map_err(RenderError::DataAccess)?
            .ok_or(RenderError::CourseNotFound(course_id))?;

        let mut records = course.exercises;
        records.sort_by_key(|e| e.sequence_num);

        let exercises: Vec<RenderedExercise> = records
            .iter()
            .map(|record| {
                match localize_exercise(&self.index, &course.name, record, language) {
                    Ok(exercise) => RenderedExercise::Localized(exercise),
                    Err(error) => {
                        warn!("Exercise {} of course {}: {}", record.id, course_id, error);
                        RenderedExercise::Failed(ExerciseFailure {
                            id: record.id,
                            slug: record.slug.clone(),
                            error,
                        })
                    }
                }
            })
            .collect();

        let unresolved = exercises
            .iter()
            .filter_map(RenderedExercise::localized)
            .filter(|e| e.glossary == GlossaryOutcome::None)
            .count();
        info!(
            "Rendered course {} ('{}') in '{}': {} exercises, {} without glossary",
            course_id,
            course.name,
            language,
            exercises.len(),
            unresolved
        );

        Ok(RenderedCourse {
            id: course.id,
            name: course.name,
            lang: language.to_string(),
            exercises,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentBlock;
    use crate::glossary::Glossary;
    use crate::repository::{CourseExercises, InMemoryCourseRepository};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use serde_json::json;

    fn record(id: i32, slug: &str, sequence_num: i32, content: &str) -> ExerciseRecord {
        ExerciseRecord {
            id,
            course_id: 1,
            name: format!("Exercise {}", id),
            slug: slug.to_string(),
            sequence_num,
            content: content.to_string(),
        }
    }

    fn markdown_content(text: &str) -> String {
        json!([json!({"type": "markdown", "value": text}).to_string()]).to_string()
    }

    fn sum_index() -> Arc<GlossaryIndex> {
        Arc::new(GlossaryIndex::from_entries([(
            "/PROPERTIES_FILES/unit1/algebra-101_step2_te",
            Glossary::from_pairs([("SUM", "योग")]),
        )]))
    }

    fn renderer_with(exercises: Vec<ExerciseRecord>) -> ExerciseRenderer {
        let repo = InMemoryCourseRepository::new().with_course(CourseExercises {
            id: 1,
            name: "algebra-101".to_string(),
            exercises,
        });
        ExerciseRenderer::new(sum_index(), Arc::new(repo))
    }

    // ==================== localize_exercise Tests ====================

    #[test]
    fn test_localize_exercise_scenario_te() {
        let index = sum_index();
        let exercise = record(1, "grp__unit1/step2", 1, &markdown_content("compute the SUM"));

        let localized = localize_exercise(&index, "algebra-101", &exercise, "te").unwrap();

        assert_eq!(
            localized.content,
            ExerciseContent::Blocks(vec![ContentBlock::markdown("compute the योग")])
        );
        assert!(matches!(
            localized.glossary,
            GlossaryOutcome::Resolved { ref language, fallback: false, .. } if language == "te"
        ));
    }

    #[test]
    fn test_localize_exercise_scenario_fr_unresolved() {
        let index = sum_index();
        let exercise = record(1, "grp__unit1/step2", 1, &markdown_content("compute the SUM"));

        let localized = localize_exercise(&index, "algebra-101", &exercise, "fr").unwrap();

        assert_eq!(
            localized.content,
            ExerciseContent::Blocks(vec![ContentBlock::markdown("compute the SUM")])
        );
        assert_eq!(localized.glossary, GlossaryOutcome::None);
    }

    #[test]
    fn test_localize_exercise_raw_content_passthrough() {
        let index = sum_index();
        let exercise = record(1, "grp__unit1/step2", 1, "SUM but not json");

        let localized = localize_exercise(&index, "algebra-101", &exercise, "te").unwrap();
        assert_eq!(localized.content, ExerciseContent::Raw("SUM but not json".to_string()));
    }

    // ==================== render Tests ====================

    #[tokio::test]
    async fn test_render_orders_by_sequence_num() {
        let renderer = renderer_with(vec![
            record(3, "grp__unit1/step2", 30, "[]"),
            record(1, "grp__unit1/step2", 10, "[]"),
            record(2, "grp__unit1/step2", 20, "[]"),
        ]);

        let course = renderer.render(1, "te").await.unwrap();
        let ids: Vec<i32> = course
            .exercises
            .iter()
            .filter_map(RenderedExercise::localized)
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(course.lang, "te");
    }

    #[tokio::test]
    async fn test_render_invalid_slug_does_not_abort_siblings() {
        let renderer = renderer_with(vec![
            record(1, "", 1, &markdown_content("SUM")),
            record(2, "grp__unit1/step2", 2, &markdown_content("SUM")),
        ]);

        let course = renderer.render(1, "te").await.unwrap();

        assert_eq!(course.exercises.len(), 2);
        assert!(course.exercises[0].is_failed());
        let second = course.exercises[1].localized().unwrap();
        assert_eq!(
            second.content,
            ExerciseContent::Blocks(vec![ContentBlock::markdown("योग")])
        );

        assert!(matches!(
            course.into_complete(),
            Err(RenderError::InvalidSlug(SlugError::InvalidSlug { .. }))
        ));
    }

    #[tokio::test]
    async fn test_render_course_not_found() {
        let renderer = renderer_with(vec![]);
        let err = renderer.render(404, "te").await.unwrap_err();
        assert!(matches!(err, RenderError::CourseNotFound(404)));
    }

    struct FailingRepository;

    #[async_trait]
    impl CourseRepository for FailingRepository {
        async fn course_exercises(&self, _course_id: i32) -> anyhow::Result<Option<CourseExercises>> {
            Err(anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_render_data_access_failure() {
        let renderer = ExerciseRenderer::new(sum_index(), Arc::new(FailingRepository));
        let err = renderer.render(1, "te").await.unwrap_err();
        assert!(matches!(err, RenderError::DataAccess(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_failed_exercise_serializes_error_message() {
        let failure = RenderedExercise::Failed(ExerciseFailure {
            id: 9,
            slug: "a/".to_string(),
            error: SlugError::InvalidSlug {
                slug: "a/".to_string(),
                reason: "slug names an empty group or unit",
            },
        });

        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(value["id"], json!(9));
        assert_eq!(
            value["error"],
            json!("invalid slug 'a/': slug names an empty group or unit")
        );
    }

    #[test]
    fn test_glossary_outcome_serialization() {
        let resolved = GlossaryOutcome::Resolved {
            path: "/PROPERTIES_FILES/x_en.json".to_string(),
            language: "en".to_string(),
            fallback: true,
        };
        assert_eq!(
            serde_json::to_value(&resolved).unwrap(),
            json!({"status": "resolved", "path": "/PROPERTIES_FILES/x_en.json", "language": "en", "fallback": true})
        );
        assert_eq!(
            serde_json::to_value(&GlossaryOutcome::None).unwrap(),
            json!({"status": "none"})
        );
    }
}

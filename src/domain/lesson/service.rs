use super::collector::collect_segments;
use super::error::{LanguageError, LessonAudioError};
use crate::domain::tts::{Segment, SynthesisServiceApi};
use crate::infrastructure::audio::Concatenator;
use crate::infrastructure::repositories::LessonRepository;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of one run over a lesson date
#[derive(Debug)]
pub enum RunOutcome {
    /// No record exists for the date; nothing was synthesized
    NoEntry { date: NaiveDate },
    Processed {
        date: NaiveDate,
        reports: Vec<LanguageReport>,
    },
}

impl RunOutcome {
    pub fn has_failures(&self) -> bool {
        match self {
            Self::NoEntry { .. } => false,
            Self::Processed { reports, .. } => reports
                .iter()
                .any(|report| matches!(report.status, LanguageStatus::Failed(_))),
        }
    }
}

#[derive(Debug)]
pub struct LanguageReport {
    pub language: String,
    pub segment_count: usize,
    pub status: LanguageStatus,
}

#[derive(Debug)]
pub enum LanguageStatus {
    Written(PathBuf),
    /// The lesson has no text in this language or its fallbacks
    Empty,
    Failed(LanguageError),
}

/// Segments that would be synthesized for one language
#[derive(Debug)]
pub struct LanguagePlan {
    pub language: String,
    pub segments: Vec<Segment>,
    pub destination: PathBuf,
}

pub struct LessonAudioService {
    lesson_repo: Arc<dyn LessonRepository>,
    synthesis: Arc<dyn SynthesisServiceApi>,
    concatenator: Arc<dyn Concatenator>,
    output_dir: PathBuf,
}

impl LessonAudioService {
    pub fn new(
        lesson_repo: Arc<dyn LessonRepository>,
        synthesis: Arc<dyn SynthesisServiceApi>,
        concatenator: Arc<dyn Concatenator>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            lesson_repo,
            synthesis,
            concatenator,
            output_dir: output_dir.into(),
        }
    }

    /// `{output_dir}/{date}/{language}.mp3`
    pub fn artifact_path(&self, date: NaiveDate, language: &str) -> PathBuf {
        artifact_path(&self.output_dir, date, language)
    }

    /// Build the segment plan per language without calling the provider
    pub async fn plan(
        &self,
        date: NaiveDate,
        languages: &[String],
    ) -> Result<Option<Vec<LanguagePlan>>, LessonAudioError> {
        if languages.is_empty() {
            return Err(LessonAudioError::NoLanguages);
        }
        let Some(entry) = self.lesson_repo.find_by_date(date).await? else {
            return Ok(None);
        };

        Ok(Some(
            languages
                .iter()
                .map(|language| LanguagePlan {
                    language: language.clone(),
                    segments: collect_segments(&entry, language),
                    destination: self.artifact_path(date, language),
                })
                .collect(),
        ))
    }

    /// Produce one audio file per language for the lesson of `date`
    ///
    /// Languages are processed in the given order. A failed language is
    /// reported and the remaining ones still run.
    pub async fn run(
        &self,
        date: NaiveDate,
        languages: &[String],
    ) -> Result<RunOutcome, LessonAudioError> {
        let Some(plans) = self.plan(date, languages).await? else {
            tracing::info!(date = %date, "No lesson entry for date, nothing to synthesize");
            return Ok(RunOutcome::NoEntry { date });
        };

        let mut reports = Vec::with_capacity(plans.len());
        for plan in plans {
            let segment_count = plan.segments.len();
            let status = self.render_language(&plan).await;

            match &status {
                LanguageStatus::Written(path) => tracing::info!(
                    language = %plan.language,
                    segment_count,
                    path = %path.display(),
                    "Lesson audio written"
                ),
                LanguageStatus::Empty => tracing::warn!(
                    language = %plan.language,
                    "Lesson has no text for language, skipping"
                ),
                LanguageStatus::Failed(e) => tracing::error!(
                    language = %plan.language,
                    segment_count,
                    error = %e,
                    "Lesson audio failed"
                ),
            }

            reports.push(LanguageReport {
                language: plan.language,
                segment_count,
                status,
            });
        }

        Ok(RunOutcome::Processed { date, reports })
    }

    async fn render_language(&self, plan: &LanguagePlan) -> LanguageStatus {
        if plan.segments.is_empty() {
            return LanguageStatus::Empty;
        }

        let fragments = match self
            .synthesis
            .synthesize_segments(&plan.segments, &plan.language)
            .await
        {
            Ok(fragments) => fragments,
            Err(e) => return LanguageStatus::Failed(e.into()),
        };

        match self.concatenator.join(&fragments, &plan.destination).await {
            Ok(path) => LanguageStatus::Written(path),
            Err(e) => LanguageStatus::Failed(e.into()),
        }
    }
}

pub fn artifact_path(output_dir: &Path, date: NaiveDate, language: &str) -> PathBuf {
    output_dir
        .join(date.format("%Y-%m-%d").to_string())
        .join(format!("{}.mp3", language))
}

use chrono::NaiveDate;
use clap::Parser;
use daily_lesson_tts::domain::lesson::{
    LanguagePlan, LanguageStatus, LessonAudioService, RunOutcome,
};
use daily_lesson_tts::domain::tts::{language::parse_language_list, RetryPolicy, SynthesisService};
use daily_lesson_tts::error::{AppError, AppResult};
use daily_lesson_tts::infrastructure::audio::{ByteConcatenator, Concatenator, FfmpegConcatenator};
use daily_lesson_tts::infrastructure::config::{ConcatKind, Config, LogFormat};
use daily_lesson_tts::infrastructure::repositories::{build_tts_repository, JsonLessonRepository};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Render the daily lesson into one MP3 per language
#[derive(Parser, Debug)]
#[command(name = "daily-lesson-tts")]
#[command(author, version, about = "Daily lesson text-to-speech renderer", long_about = None)]
struct Cli {
    /// Lesson date (YYYY-MM-DD), defaults to today in local time
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Comma separated language codes
    #[arg(long, default_value = "zh,en,es")]
    langs: String,

    /// Path to the lesson JSON file (overrides LESSON_DATA_PATH)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Output root directory (overrides LESSON_OUTPUT_DIR)
    #[arg(long)]
    out: Option<PathBuf>,

    /// TTS provider: dashscope, openai, polly or mock (overrides TTS_PROVIDER)
    #[arg(long)]
    provider: Option<String>,

    /// Load environment variables from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Print the segment plan without calling the provider
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Values given on the command line, keyed like the environment
    fn overrides(&self) -> HashMap<&'static str, String> {
        let mut overrides = HashMap::new();
        if let Some(data) = &self.data {
            overrides.insert("LESSON_DATA_PATH", data.display().to_string());
        }
        if let Some(out) = &self.out {
            overrides.insert("LESSON_OUTPUT_DIR", out.display().to_string());
        }
        if let Some(provider) = &self.provider {
            overrides.insert("TTS_PROVIDER", provider.clone());
        }
        if self.dry_run && !overrides.contains_key("TTS_PROVIDER") {
            // no provider call happens in a dry run, so credentials are not needed
            overrides.insert("TTS_PROVIDER", "mock".to_string());
        }
        overrides
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got {:?}: {}", raw, e))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // logging may not be initialized yet when configuration fails
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> AppResult<ExitCode> {
    // Load .env without overriding variables already set in the shell
    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path).map_err(|source| AppError::EnvFile {
                path: path.clone(),
                source,
            })?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    // Load configuration
    let overrides = cli.overrides();
    let config = Config::from_lookup(|key| {
        overrides
            .get(key)
            .cloned()
            .or_else(|| std::env::var(key).ok())
    })?;

    // Initialize logging
    init_logging(&config);

    let date = cli
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let languages = parse_language_list(&cli.langs);
    if languages.is_empty() {
        return Err(AppError::BadRequest("--langs lists no language".to_string()));
    }

    tracing::info!(
        date = %date,
        languages = ?languages,
        provider = config.provider.name(),
        data_path = %config.data_path.display(),
        output_dir = %config.output_dir.display(),
        dry_run = cli.dry_run,
        "Starting daily lesson TTS"
    );

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    let lesson_repo = Arc::new(JsonLessonRepository::new(config.data_path.clone()));
    let tts_repo = build_tts_repository(&config.provider).await?;

    // 2. Instantiate infrastructure collaborators
    let concatenator: Arc<dyn Concatenator> = match config.concat {
        ConcatKind::Ffmpeg => Arc::new(FfmpegConcatenator::new(config.ffmpeg_bin.clone())),
        ConcatKind::Bytes => Arc::new(ByteConcatenator::new()),
    };

    // 3. Instantiate services
    let synthesis_service = Arc::new(
        SynthesisService::new(
            tts_repo,
            RetryPolicy::new(config.max_attempts, config.retry_backoff),
        )
        .with_concurrency(config.concurrency),
    );
    let lesson_service = LessonAudioService::new(
        lesson_repo,
        synthesis_service,
        concatenator,
        config.output_dir.clone(),
    );

    if cli.dry_run {
        match lesson_service.plan(date, &languages).await? {
            Some(plans) => print_plans(&plans),
            None => println!("No lesson entry for {}", date),
        }
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = lesson_service.run(date, &languages).await?;
    print_summary(&outcome);

    if outcome.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_plans(plans: &[LanguagePlan]) {
    for plan in plans {
        println!(
            "[{}] {} segment(s) -> {}",
            plan.language,
            plan.segments.len(),
            plan.destination.display()
        );
        for segment in &plan.segments {
            println!(
                "  {:03} {:<13} {:>3} chars  {}",
                segment.index,
                segment.kind,
                segment.char_count(),
                segment.text
            );
        }
    }
}

fn print_summary(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::NoEntry { date } => println!("No lesson entry for {}", date),
        RunOutcome::Processed { date, reports } => {
            println!("Lesson {}:", date);
            for report in reports {
                match &report.status {
                    LanguageStatus::Written(path) => println!(
                        "  [{}] ok, {} segment(s) -> {}",
                        report.language,
                        report.segment_count,
                        path.display()
                    ),
                    LanguageStatus::Empty => {
                        println!("  [{}] skipped, no text", report.language)
                    }
                    LanguageStatus::Failed(e) => {
                        println!("  [{}] failed: {}", report.language, e)
                    }
                }
            }
        }
    }
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "daily_lesson_tts=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "daily_lesson_tts=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

//! Capture a coding question and ask the model to solve it.

use chrono::{DateTime, Local};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::capture::{self, CaptureError, CapturedImage, Region, Screenshot};
use crate::config::{build_solver_prompt, DEFAULT_SOLUTION_LANGUAGE};
use crate::model::{MessageBuilder, ModelClient, ModelError};
use crate::settings::AppSettings;

/// Solver errors.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("OPENAI_API_KEY is not set. Add it to your environment or .env file")]
    MissingApiKey,
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

/// Configuration for the Solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Language the implementation step should use.
    pub solution_language: String,
    /// Wait before grabbing the screen.
    pub capture_delay: Duration,
    /// Width limit for uploaded images (0 disables scaling).
    pub max_image_width: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            solution_language: DEFAULT_SOLUTION_LANGUAGE.to_string(),
            capture_delay: Duration::from_millis(capture::DEFAULT_CAPTURE_DELAY_MS),
            max_image_width: 2048,
        }
    }
}

impl SolverConfig {
    pub fn with_solution_language(mut self, language: impl Into<String>) -> Self {
        self.solution_language = language.into();
        self
    }

    pub fn with_capture_delay(mut self, delay: Duration) -> Self {
        self.capture_delay = delay;
        self
    }

    pub fn with_max_image_width(mut self, max_width: u32) -> Self {
        self.max_image_width = max_width;
        self
    }
}

impl From<&AppSettings> for SolverConfig {
    fn from(settings: &AppSettings) -> Self {
        Self {
            solution_language: settings.solution_language.clone(),
            capture_delay: Duration::from_millis(settings.capture_delay_ms),
            max_image_width: settings.max_image_width,
        }
    }
}

/// The model's answer to one screenshot.
#[derive(Debug, Clone)]
pub struct Answer {
    pub content: String,
    pub model: String,
    pub image_width: u32,
    pub image_height: u32,
    pub elapsed: Duration,
    pub timestamp: DateTime<Local>,
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Result:\n{}", self.content)
    }
}

/// Sends question screenshots to a vision-language model.
///
/// # Example
///
/// ```rust,no_run
/// use coding_helper::{AppSettings, Solver};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let solver = Solver::from_settings(&AppSettings::load_with_env());
///     let answer = solver.capture_screen_and_solve().await?;
///     println!("{}", answer);
///     Ok(())
/// }
/// ```
pub struct Solver {
    model_client: ModelClient,
    config: SolverConfig,
}

impl Solver {
    /// Create a new Solver from a model client and solver configuration.
    pub fn new(model_client: ModelClient, config: SolverConfig) -> Self {
        Self {
            model_client,
            config,
        }
    }

    /// Create a Solver for the given settings.
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(
            ModelClient::new(settings.to_model_config()),
            SolverConfig::from(settings),
        )
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Build the request messages for an image.
    pub fn build_messages(&self, image: &CapturedImage) -> Vec<Value> {
        let prompt = build_solver_prompt(&self.config.solution_language);
        vec![MessageBuilder::create_vision_message(
            &prompt,
            &image.to_data_url(),
            &self.model_client.config().image_detail,
        )]
    }

    /// Ask the model to solve the question shown in `image`.
    pub async fn solve_image(&self, image: &CapturedImage) -> Result<Answer, SolverError> {
        if self.model_client.config().api_key.trim().is_empty() {
            return Err(SolverError::MissingApiKey);
        }

        tracing::info!(
            "Analyzing {}x{} screenshot ({} bytes PNG)",
            image.width,
            image.height,
            image.png.len()
        );

        let started = Instant::now();
        let response = self.model_client.request(&self.build_messages(image)).await?;
        let elapsed = started.elapsed();

        tracing::info!(
            "Answer received from {} in {:.1}s ({} chars)",
            response.model,
            elapsed.as_secs_f64(),
            response.content.len()
        );
        if let Some(reason) = response.finish_reason.as_deref().filter(|r| *r != "stop") {
            tracing::warn!("Answer may be incomplete, finish reason: {}", reason);
        }

        Ok(Answer {
            content: response.content,
            model: response.model,
            image_width: image.width,
            image_height: image.height,
            elapsed,
            timestamp: Local::now(),
        })
    }

    /// Crop `region` out of an already captured frame, then solve it.
    pub async fn solve_selection(
        &self,
        screenshot: &Screenshot,
        region: Region,
    ) -> Result<Answer, SolverError> {
        let cropped = screenshot.crop(region)?;
        let image = CapturedImage::from_rgba(cropped, self.config.max_image_width)?;
        self.solve_image(&image).await
    }

    /// Capture `region` of the screen after the configured delay, then solve it.
    pub async fn capture_region_and_solve(&self, region: Region) -> Result<Answer, SolverError> {
        let delay = self.config.capture_delay;
        let max_width = self.config.max_image_width;

        let image = tokio::task::spawn_blocking(move || {
            let cropped = capture::capture_region(region, delay)?;
            CapturedImage::from_rgba(cropped, max_width)
        })
        .await
        .map_err(|e| SolverError::TaskFailed(e.to_string()))??;

        self.solve_image(&image).await
    }

    /// Capture the whole screen after the configured delay, then solve it.
    pub async fn capture_screen_and_solve(&self) -> Result<Answer, SolverError> {
        let image = capture_full_screen(self.config.capture_delay, self.config.max_image_width)
            .await?;
        self.solve_image(&image).await
    }

    /// Solve a question saved as an image file.
    pub async fn solve_file(&self, path: &Path) -> Result<Answer, SolverError> {
        let path: PathBuf = path.to_path_buf();
        let max_width = self.config.max_image_width;

        let image = tokio::task::spawn_blocking(move || capture::load_image_file(&path, max_width))
            .await
            .map_err(|e| SolverError::TaskFailed(e.to_string()))??;

        self.solve_image(&image).await
    }
}

/// Grab the whole screen after `delay` and encode it.
pub async fn capture_full_screen(
    delay: Duration,
    max_width: u32,
) -> Result<CapturedImage, SolverError> {
    let shot = freeze_screen(delay).await?;
    Ok(CapturedImage::from_rgba(shot.image, max_width)?)
}

/// Grab the whole screen after `delay` without encoding it.
pub async fn freeze_screen(delay: Duration) -> Result<Screenshot, SolverError> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let shot = tokio::task::spawn_blocking(capture::capture_screen)
        .await
        .map_err(|e| SolverError::TaskFailed(e.to_string()))??;
    Ok(shot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelConfig;
    use image::{Rgba, RgbaImage};

    fn sample_image() -> CapturedImage {
        CapturedImage::from_rgba(RgbaImage::from_pixel(8, 4, Rgba([10, 20, 30, 255])), 0).unwrap()
    }

    fn solver_with_key(key: &str) -> Solver {
        Solver::new(
            ModelClient::new(ModelConfig::default().with_api_key(key).with_image_detail("low")),
            SolverConfig::default().with_solution_language("Rust"),
        )
    }

    #[test]
    fn test_solver_config_from_settings() {
        let settings = AppSettings {
            capture_delay_ms: 250,
            max_image_width: 1280,
            solution_language: "Java".to_string(),
            ..AppSettings::default()
        };
        let config = SolverConfig::from(&settings);
        assert_eq!(config.capture_delay, Duration::from_millis(250));
        assert_eq!(config.max_image_width, 1280);
        assert_eq!(config.solution_language, "Java");
    }

    #[test]
    fn test_build_messages() {
        let solver = solver_with_key("sk-test");
        let messages = solver.build_messages(&sample_image());

        assert_eq!(messages.len(), 1);
        let content = &messages[0]["content"];
        assert!(content[0]["text"]
            .as_str()
            .unwrap()
            .contains("Implementation in Rust"));
        assert!(content[1]["image_url"]["url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,"));
        assert_eq!(content[1]["image_url"]["detail"], "low");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let solver = solver_with_key("   ");
        let result = solver.solve_image(&sample_image()).await;
        assert!(matches!(result, Err(SolverError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_empty_selection_is_rejected() {
        let solver = solver_with_key("sk-test");
        let shot = Screenshot {
            image: RgbaImage::new(50, 50),
        };
        let result = solver.solve_selection(&shot, Region::new(10, 10, 0, 0)).await;
        assert!(matches!(
            result,
            Err(SolverError::Capture(CaptureError::EmptyRegion(_)))
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let solver = solver_with_key("sk-test");
        let result = solver
            .solve_file(Path::new("/nonexistent/question.png"))
            .await;
        assert!(matches!(
            result,
            Err(SolverError::Capture(CaptureError::ImageReadFailed(_)))
        ));
    }

    #[test]
    fn test_answer_display() {
        let answer = Answer {
            content: "Use a hash map.".to_string(),
            model: "gpt-4o-mini".to_string(),
            image_width: 10,
            image_height: 10,
            elapsed: Duration::from_secs(1),
            timestamp: Local::now(),
        };
        assert_eq!(answer.to_string(), "Result:\nUse a hash map.");
    }
}

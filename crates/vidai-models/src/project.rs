//! Video project records and generation status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::plan::VideoLimit;

/// Generation pipeline status.
///
/// A linear flow: pending → processing → generating_script →
/// generating_images → completed, with failed as the single error terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    #[default]
    Pending,
    Processing,
    GeneratingScript,
    GeneratingImages,
    Completed,
    Failed,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Pending => "pending",
            VideoStatus::Processing => "processing",
            VideoStatus::GeneratingScript => "generating_script",
            VideoStatus::GeneratingImages => "generating_images",
            VideoStatus::Completed => "completed",
            VideoStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoStatus::Completed | VideoStatus::Failed)
    }
}

impl std::fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One narrated scene of a generated video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub scene_number: u32,
    /// Brief visual description.
    pub description: String,
    /// Narration text spoken over the scene.
    pub narration: String,
    /// Prompt handed to the image generator.
    pub image_prompt: String,
    /// Populated once the image generator has run.
    #[serde(default)]
    pub image_url: Option<String>,
    pub duration_seconds: u32,
}

/// A video project owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoProject {
    pub id: String,
    pub user_id: String,
    pub title: String,
    /// Source text the script is generated from.
    pub input_text: String,
    pub status: VideoStatus,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Total duration across scenes, filled in on completion.
    #[serde(default)]
    pub duration_seconds: u32,
    /// Plan the project was admitted under.
    pub subscription_plan: String,
    /// Quota left at admission time, after this project.
    pub videos_remaining: VideoLimit,
    #[serde(default)]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoProject {
    /// Create a freshly admitted project in `pending` state.
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        input_text: impl Into<String>,
        subscription_plan: impl Into<String>,
        videos_remaining: VideoLimit,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title: title.into(),
            input_text: input_text.into(),
            status: VideoStatus::Pending,
            scenes: Vec::new(),
            video_url: None,
            thumbnail_url: None,
            duration_seconds: 0,
            subscription_plan: subscription_plan.into(),
            videos_remaining,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sum of scene durations.
    pub fn total_scene_duration(&self) -> u32 {
        self.scenes.iter().map(|s| s.duration_seconds).sum()
    }
}

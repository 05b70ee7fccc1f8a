//! Asynchronous video generation pipeline.
//!
//! One background task per admitted project, sequential RPC chaining through
//! the generator ports: processing → generating_script → generating_images →
//! completed, with failed as the single error terminal. No retry policy and
//! no cancellation; a failed stage writes `failed` plus the error message.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use vidai_models::{Scene, VideoStatus};
use vidai_store::ProjectStore;

/// Default number of scenes per video.
const DEFAULT_SCENE_COUNT: usize = 5;

/// Default narration length per scene in seconds.
const DEFAULT_SCENE_DURATION_SECONDS: u32 = 5;

/// Script generation port. Production deployments plug their LLM vendor
/// client in here.
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// Break `input_text` into narrated scenes.
    async fn generate_scenes(&self, input_text: &str) -> anyhow::Result<Vec<Scene>>;
}

/// Image generation port. Returns a URL for the rendered scene image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Deterministic script generator: splits the input into sentences and turns
/// the first few into scenes. Stands in for the vendor LLM client.
#[derive(Debug, Default, Clone)]
pub struct OutlineScriptGenerator;

#[async_trait]
impl ScriptGenerator for OutlineScriptGenerator {
    async fn generate_scenes(&self, input_text: &str) -> anyhow::Result<Vec<Scene>> {
        let sentences: Vec<&str> = input_text
            .split_inclusive(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        anyhow::ensure!(!sentences.is_empty(), "input text has no usable sentences");

        let scenes = sentences
            .chunks(sentences.len().div_ceil(DEFAULT_SCENE_COUNT).max(1))
            .take(DEFAULT_SCENE_COUNT)
            .enumerate()
            .map(|(i, chunk)| {
                let narration = chunk.join(" ");
                Scene {
                    scene_number: (i + 1) as u32,
                    description: format!("Scene {} illustrating: {}", i + 1, ellipsize(&narration, 80)),
                    image_prompt: format!(
                        "Cinematic illustration, high detail: {}",
                        ellipsize(&narration, 200)
                    ),
                    narration,
                    image_url: None,
                    duration_seconds: DEFAULT_SCENE_DURATION_SECONDS,
                }
            })
            .collect();
        Ok(scenes)
    }
}

/// Image generator that links placeholder assets. Stands in for the vendor
/// image API client.
#[derive(Debug, Clone)]
pub struct PlaceholderImageGenerator {
    base_url: String,
}

impl Default for PlaceholderImageGenerator {
    fn default() -> Self {
        Self {
            base_url: "https://assets.videoai.dev/scenes".to_string(),
        }
    }
}

#[async_trait]
impl ImageGenerator for PlaceholderImageGenerator {
    async fn generate_image(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok(format!("{}/{}.png", self.base_url, Uuid::new_v4()))
    }
}

/// Drives a project through the generation status flow.
#[derive(Clone)]
pub struct GenerationPipeline {
    projects: Arc<dyn ProjectStore>,
    script: Arc<dyn ScriptGenerator>,
    image: Arc<dyn ImageGenerator>,
}

impl GenerationPipeline {
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        script: Arc<dyn ScriptGenerator>,
        image: Arc<dyn ImageGenerator>,
    ) -> Self {
        Self {
            projects,
            script,
            image,
        }
    }

    /// Fire-and-forget generation for an admitted project.
    pub fn spawn(&self, project_id: String, input_text: String, max_duration_seconds: u32) {
        let pipeline = self.clone();
        tokio::spawn(async move {
            if let Err(e) = pipeline
                .run(&project_id, &input_text, max_duration_seconds)
                .await
            {
                warn!(project_id = %project_id, error = %e, "Video generation failed");
                if let Err(write_err) = pipeline
                    .projects
                    .update_status(&project_id, VideoStatus::Failed, Some(e.to_string()))
                    .await
                {
                    warn!(
                        project_id = %project_id,
                        error = %write_err,
                        "Failed to record failure status"
                    );
                }
            }
        });
    }

    /// Run the full pipeline. Exposed so tests can await it deterministically.
    pub async fn run(
        &self,
        project_id: &str,
        input_text: &str,
        max_duration_seconds: u32,
    ) -> anyhow::Result<()> {
        self.projects
            .update_status(project_id, VideoStatus::Processing, None)
            .await?;

        self.projects
            .update_status(project_id, VideoStatus::GeneratingScript, None)
            .await?;
        let mut scenes = self
            .script
            .generate_scenes(input_text)
            .await
            .context("script generation")?;
        clamp_scene_durations(&mut scenes, max_duration_seconds);
        self.projects.set_scenes(project_id, &scenes).await?;

        self.projects
            .update_status(project_id, VideoStatus::GeneratingImages, None)
            .await?;
        for scene in &mut scenes {
            // A single failed image does not fail the video.
            match self.image.generate_image(&scene.image_prompt).await {
                Ok(url) => scene.image_url = Some(url),
                Err(e) => {
                    warn!(
                        project_id = %project_id,
                        scene = scene.scene_number,
                        error = %e,
                        "Scene image generation failed"
                    );
                    scene.image_url = None;
                }
            }
        }

        let total_duration: u32 = scenes.iter().map(|s| s.duration_seconds).sum();
        let thumbnail = scenes.iter().find_map(|s| s.image_url.clone());
        self.projects
            .complete_project(project_id, &scenes, total_duration, thumbnail)
            .await?;

        info!(
            project_id = %project_id,
            scenes = scenes.len(),
            duration_seconds = total_duration,
            "Video generation completed"
        );
        Ok(())
    }
}

/// Clamp scene durations so the total never exceeds the plan ceiling.
/// Scenes past the ceiling are dropped.
fn clamp_scene_durations(scenes: &mut Vec<Scene>, max_total_seconds: u32) {
    let mut remaining = max_total_seconds;
    scenes.retain_mut(|scene| {
        if remaining == 0 {
            return false;
        }
        scene.duration_seconds = scene.duration_seconds.min(remaining);
        remaining -= scene.duration_seconds;
        scene.duration_seconds > 0
    });
}

fn ellipsize(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}…")
    }
}

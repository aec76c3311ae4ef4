//! Deploy models

use serde::{Deserialize, Serialize};

/// A deploy as returned by the Render API
///
/// The trigger endpoint may answer with a partial object while the deploy is
/// still being queued, so every field defaults rather than failing the parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deploy {
    /// Unique deploy ID
    #[serde(default)]
    pub id: String,

    /// Current status, e.g. "created", "build_in_progress", "live"
    #[serde(default)]
    pub status: String,

    /// Commit behind the deploy, for git-backed services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<Commit>,

    /// Image behind the deploy, for image-backed services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

/// Commit reference attached to a deploy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Commit message
    #[serde(default)]
    pub message: String,
}

/// Image reference attached to a deploy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Image reference
    #[serde(rename = "ref", default)]
    pub image_ref: String,

    /// Image digest
    #[serde(default)]
    pub sha: String,
}

/// Entry of the deploy list endpoint; deploys come wrapped with a paging cursor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployListEntry {
    pub deploy: Deploy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl Deploy {
    /// Human-readable description of what is being deployed
    pub fn source_description(&self) -> String {
        if let Some(commit) = &self.commit {
            format!("git commit: {}", commit.message)
        } else if let Some(image) = &self.image {
            format!("image: {} SHA: {}", image.image_ref, image.sha)
        } else {
            "unknown".to_string()
        }
    }
}

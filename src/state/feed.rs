//! Image feed loading
//!
//! The gallery does not fetch images itself. It reads a JSON feed produced
//! by the data layer: a list of groups, each optionally owned by a
//! connection, each holding image descriptors.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use super::data::{Connection, EntityType, ImageDescriptor};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read feed {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed feed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Images rendered together, e.g. one model card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedGroup {
    #[serde(default)]
    pub title: Option<String>,
    /// Owner of the images, if they are managed as a group
    #[serde(default)]
    pub connect: Option<Connection>,
    #[serde(default)]
    pub images: Vec<ImageDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    #[serde(default)]
    pub groups: Vec<FeedGroup>,
}

impl Feed {
    /// Parse a feed from JSON text
    pub fn from_json(json: &str) -> Result<Self, FeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a feed file
    pub fn load(path: &Path) -> Result<Self, FeedError> {
        let json = std::fs::read_to_string(path).map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let feed = Self::from_json(&json)?;

        info!(path = %path.display(), groups = feed.groups.len(), "loaded feed");
        Ok(feed)
    }

    /// Total number of descriptors across all groups
    pub fn image_count(&self) -> usize {
        self.groups.iter().map(|group| group.images.len()).sum()
    }

    /// Small built-in feed used when no feed file is configured
    pub fn demo() -> Self {
        Self {
            groups: vec![
                FeedGroup {
                    title: Some("Model #7".to_string()),
                    connect: Some(Connection::new(EntityType::Model, 7)),
                    images: vec![
                        ImageDescriptor::new(70, true).with_name("Cover"),
                        ImageDescriptor::new(71, false).with_name("Sample 1"),
                        ImageDescriptor::new(72, true).with_name("Sample 2"),
                    ],
                },
                FeedGroup {
                    title: Some("Review #3".to_string()),
                    connect: Some(Connection::new(EntityType::Review, 3)),
                    images: vec![ImageDescriptor::new(30, true).with_name("Review shot")],
                },
                FeedGroup {
                    title: Some("Gallery".to_string()),
                    connect: None,
                    images: vec![
                        ImageDescriptor::new(42, true).with_name("Portrait"),
                        ImageDescriptor::new(43, false).with_name("Landscape"),
                        ImageDescriptor::new(44, true).with_name("Figure study"),
                    ],
                },
            ],
        }
    }
}

/// Load a feed file off the UI thread
pub async fn load_feed_async(path: PathBuf) -> Result<Feed, FeedError> {
    let json = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| FeedError::Io {
            path: path.clone(),
            source,
        })?;
    let feed = Feed::from_json(&json)?;

    info!(path = %path.display(), groups = feed.groups.len(), "loaded feed");
    Ok(feed)
}

//! Startup-built registry of one pipeline per direction

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::config::ServiceConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::model::ModelLoader;
use crate::core::models::{Direction, ModelSnapshot};
use crate::core::pipeline::TranslationPipeline;

/// Pipelines for every supported direction
///
/// Built once before the server accepts requests and never mutated after,
/// so handlers share it through an `Arc` without locking.
#[derive(Debug)]
pub struct ModelRegistry {
    pipelines: HashMap<Direction, Arc<TranslationPipeline>>,
}

impl ModelRegistry {
    /// Load every direction, reading cached snapshots where present
    pub async fn initialize(loader: &dyn ModelLoader, config: &ServiceConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.cache_dir)
            .await
            .map_err(|e| {
                TranslationError::model_unavailable(
                    config.cache_dir.display().to_string(),
                    format!("cannot create cache directory: {}", e),
                )
            })?;

        let mut pipelines = HashMap::new();

        for direction in Direction::ALL {
            let path = config.snapshot_path(direction);
            let snapshot = match read_snapshot(&path, direction).await? {
                Some(snapshot) => {
                    info!("Loaded {} model from cache {}", direction, path.display());
                    snapshot
                }
                None => {
                    info!("No cached {} model, fetching", direction);
                    let snapshot = loader.fetch(direction).await?;
                    write_snapshot(&path, &snapshot).await?;
                    info!("Cached {} model at {}", direction, path.display());
                    snapshot
                }
            };

            let model = loader.instantiate(&snapshot).await?;
            let pipeline = TranslationPipeline::new(direction, model, config.generation.clone())?;
            pipelines.insert(direction, Arc::new(pipeline));
        }

        info!("Model registry ready with {} directions", pipelines.len());

        Ok(Self { pipelines })
    }

    /// Look up the pipeline for a wire direction string
    pub fn get(&self, direction: &str) -> Result<Arc<TranslationPipeline>> {
        let direction: Direction = direction.parse()?;
        self.pipelines
            .get(&direction)
            .cloned()
            .ok_or_else(|| TranslationError::InvalidDirection {
                direction: direction.to_string(),
            })
    }

    /// Directions held by the registry
    pub fn directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| self.pipelines.contains_key(d))
            .collect()
    }
}

async fn read_snapshot(path: &Path, direction: Direction) -> Result<Option<ModelSnapshot>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(TranslationError::model_unavailable(
                path.display().to_string(),
                format!("cannot read snapshot: {}", e),
            ))
        }
    };

    let snapshot: ModelSnapshot = serde_json::from_str(&content).map_err(|e| {
        TranslationError::model_unavailable(
            path.display().to_string(),
            format!("corrupt snapshot: {}", e),
        )
    })?;

    if snapshot.direction != direction {
        warn!(
            "Snapshot {} is for {}, expected {}",
            path.display(),
            snapshot.direction,
            direction
        );
        return Err(TranslationError::model_unavailable(
            snapshot.model_id,
            format!("snapshot {} belongs to direction {}", path.display(), snapshot.direction),
        ));
    }

    Ok(Some(snapshot))
}

async fn write_snapshot(path: &Path, snapshot: &ModelSnapshot) -> Result<()> {
    let content = serde_json::to_string_pretty(snapshot).map_err(|e| {
        TranslationError::model_unavailable(&snapshot.model_id, format!("cannot serialize snapshot: {}", e))
    })?;

    tokio::fs::write(path, content).await.map_err(|e| {
        TranslationError::model_unavailable(
            &snapshot.model_id,
            format!("cannot write {}: {}", path.display(), e),
        )
    })
}

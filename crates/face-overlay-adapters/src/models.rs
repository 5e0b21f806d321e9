//! Model bundle downloading and caching adapter.
//!
//! Two bundles make up readiness: the face-locator network consumed by the
//! detector backend, and the expression network, which is fetched and
//! verified for parity with the upstream surface but not consumed anywhere.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Placeholder checksum indicating verification should be skipped.
const PLACEHOLDER_CHECKSUM: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Name of the face-locator bundle.
pub const FACE_LOCATOR: &str = "face-locator";

/// Name of the expression bundle.
pub const EXPRESSION_NET: &str = "expression-net";

/// Model bundle metadata.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Bundle name/identifier.
    pub name: &'static str,
    /// Download URL.
    pub url: &'static str,
    /// Expected SHA256 hash. Set to all zeros to skip verification during development.
    pub sha256: &'static str,
    /// Filename in the models directory.
    pub filename: &'static str,
}

/// Known model bundles.
pub const MODELS: &[ModelInfo] = &[
    ModelInfo {
        name: FACE_LOCATOR,
        url: "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin",
        sha256: PLACEHOLDER_CHECKSUM,
        filename: "seeta_fd_frontal_v1.0.bin",
    },
    ModelInfo {
        name: EXPRESSION_NET,
        url: "https://github.com/face-overlay/face-overlay/releases/download/models-v1/face_expression.bin",
        sha256: PLACEHOLDER_CHECKSUM,
        filename: "face_expression.bin",
    },
];

/// Byte-level download progress: bundle name, bytes downloaded, total if known.
pub type ProgressCallback = Box<dyn Fn(&str, u64, Option<u64>) + Send + Sync>;

static MODELS_DIR_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Overrides the models directory, or restores the default with `None`.
pub fn set_models_dir(dir: Option<PathBuf>) {
    *MODELS_DIR_OVERRIDE
        .write()
        .unwrap_or_else(PoisonError::into_inner) = dir;
}

/// Returns the models directory path.
///
/// Uses the override set via [`set_models_dir`] if present, otherwise
/// `XDG_DATA_HOME/face-overlay/models` or the platform equivalent.
#[must_use]
pub fn models_dir() -> PathBuf {
    if let Some(dir) = MODELS_DIR_OVERRIDE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
    {
        return dir;
    }

    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("face-overlay")
        .join("models")
}

/// Ensures all required model bundles are downloaded.
///
/// # Errors
///
/// Returns an error if:
/// - The models directory cannot be created
/// - A bundle download fails
/// - A bundle's checksum doesn't match
pub fn ensure_models() -> Result<()> {
    ensure_models_with_progress(None)
}

/// Like [`ensure_models`], reporting byte-level progress per bundle.
///
/// # Errors
///
/// Same failure modes as [`ensure_models`].
pub fn ensure_models_with_progress(progress: Option<&ProgressCallback>) -> Result<()> {
    let dir = models_dir();
    fs::create_dir_all(&dir).context("Failed to create models directory")?;

    for model in MODELS {
        let path = dir.join(model.filename);
        if path.exists() {
            debug!("Model bundle {} already exists", model.name);
        } else {
            download_model(model, &path, progress)?;
        }
    }

    Ok(())
}

/// Downloads a model bundle from its URL.
fn download_model(
    model: &ModelInfo,
    path: &PathBuf,
    progress: Option<&ProgressCallback>,
) -> Result<()> {
    info!("Downloading model bundle: {}", model.name);

    let mut response = reqwest::blocking::get(model.url)
        .with_context(|| format!("Failed to download {}", model.name))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status: {}", response.status());
    }

    let total = response.content_length();
    let mut bytes = Vec::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = response
            .read(&mut buf)
            .with_context(|| format!("Failed to read response for {}", model.name))?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&buf[..n]);
        if let Some(callback) = progress {
            callback(model.name, bytes.len() as u64, total);
        }
    }

    // Verify checksum (skip if placeholder)
    if model.sha256 == PLACEHOLDER_CHECKSUM {
        debug!(
            "Skipping checksum verification for {} (placeholder checksum)",
            model.name
        );
    } else {
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = format!("{:x}", hasher.finalize());

        if hash != model.sha256 {
            anyhow::bail!(
                "Checksum mismatch for {}: expected {}, got {}. \
                 Try deleting {} and re-running to download a fresh copy.",
                model.name,
                model.sha256,
                hash,
                path.display()
            );
        }
    }

    fs::write(path, &bytes).with_context(|| format!("Failed to write {}", model.name))?;

    info!("Downloaded {} ({} bytes)", model.name, bytes.len());
    Ok(())
}

/// Returns the path to a specific model bundle.
#[must_use]
pub fn model_path(name: &str) -> Option<PathBuf> {
    MODELS
        .iter()
        .find(|m| m.name == name)
        .map(|m| models_dir().join(m.filename))
}

/// Checks if all model bundles are installed.
#[must_use]
pub fn all_models_installed() -> bool {
    missing_models().is_empty()
}

/// Returns the names of bundles not present in the models directory.
#[must_use]
pub fn missing_models() -> Vec<&'static str> {
    let dir = models_dir();
    MODELS
        .iter()
        .filter(|m| !dir.join(m.filename).exists())
        .map(|m| m.name)
        .collect()
}

/// Lists model bundles with their installed status.
#[must_use]
pub fn list_models() -> Vec<(String, bool)> {
    let dir = models_dir();
    MODELS
        .iter()
        .map(|m| (m.name.to_string(), dir.join(m.filename).exists()))
        .collect()
}

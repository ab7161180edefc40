use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{CASCADE_FILE_NAME, CASCADE_URL};
use crate::shared::error::TrifaceError;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("cascade file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("download of {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("failed to write cascade to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

impl ModelResolveError {
    /// Every resolution failure means the classifier cannot be loaded.
    pub fn into_model_load(self, requested: &Path) -> TrifaceError {
        TrifaceError::ModelLoad {
            path: requested.to_path_buf(),
            reason: self.to_string(),
        }
    }
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Resolves the cascade file to load.
///
/// An explicitly chosen path must exist. The built-in default path falls
/// back to the user cache, then to downloading the stock OpenCV cascade.
pub fn resolve_cascade(
    requested: &Path,
    is_default: bool,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, TrifaceError> {
    if requested.is_file() {
        return Ok(requested.to_path_buf());
    }
    if !is_default {
        return Err(ModelResolveError::NotFound(requested.to_path_buf()).into_model_load(requested));
    }

    log::info!(
        "Default cascade {} not present, using cache",
        requested.display()
    );
    let cache_dir = cascade_cache_dir().map_err(|e| e.into_model_load(requested))?;
    resolve_in(&cache_dir, CASCADE_FILE_NAME, CASCADE_URL, progress)
        .map_err(|e| e.into_model_load(requested))
}

/// Returns `dir/name` if cached, otherwise downloads it there first.
pub fn resolve_in(
    dir: &Path,
    name: &str,
    url: &str,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let cached_path = dir.join(name);
    if cached_path.is_file() {
        return Ok(cached_path);
    }

    fs::create_dir_all(dir).map_err(ModelResolveError::CacheDir)?;
    log::info!("Downloading {url}");
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific cache directory for cascade files.
///
/// - macOS: `~/Library/Application Support/triface/cascades/`
/// - Linux: `$XDG_CACHE_HOME/triface/cascades/` or `~/.cache/triface/cascades/`
/// - Windows: `%LOCALAPPDATA%/triface/cascades/`
pub fn cascade_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "macos"))]
    let base = dirs::cache_dir();

    base.map(|d| d.join("triface").join("cascades"))
        .ok_or(ModelResolveError::NoCacheDir)
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let response = reqwest::blocking::get(url).map_err(|e| ModelResolveError::Download {
        url: url.to_string(),
        source: e,
    })?;
    if !response.status().is_success() {
        return Err(ModelResolveError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let total = response.content_length().unwrap_or(0);
    let bytes = response.bytes().map_err(|e| ModelResolveError::Download {
        url: url.to_string(),
        source: e,
    })?;

    // Written under a temporary name and renamed once complete
    let part_path = dest.with_extension("part");
    let mut file = fs::File::create(&part_path).map_err(write_error(&part_path))?;

    let mut downloaded: u64 = 0;
    for chunk in bytes.chunks(256 * 1024) {
        file.write_all(chunk).map_err(write_error(&part_path))?;
        downloaded += chunk.len() as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }
    file.flush().map_err(write_error(&part_path))?;
    drop(file);

    fs::rename(&part_path, dest).map_err(write_error(dest))?;
    Ok(())
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> ModelResolveError {
    let path = path.to_path_buf();
    move |source| ModelResolveError::Write { path, source }
}

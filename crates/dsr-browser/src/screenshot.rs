//! Screenshot evidence for submitted records

use crate::driver::FormDriver;
use crate::error::{BrowserError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Capture the current page and store it as `<dir>/<name>.png`
///
/// # Arguments
/// * `driver` - Driver whose page is captured
/// * `dir` - Output directory, created if missing
/// * `name` - File stem; characters unsafe in file names are replaced with `_`
///
/// # Returns
/// Path of the written PNG
pub async fn save_screenshot<D>(driver: &D, dir: &Path, name: &str) -> Result<PathBuf>
where
    D: FormDriver + ?Sized,
{
    debug!("Capturing screenshot '{}'", name);
    let data = driver.capture_screenshot().await?;

    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        BrowserError::ScreenshotFailed(format!("Failed to create {}: {}", dir.display(), e))
    })?;

    let path = dir.join(format!("{}.png", file_stem(name)));
    tokio::fs::write(&path, &data).await.map_err(|e| {
        BrowserError::ScreenshotFailed(format!("Failed to write {}: {}", path.display(), e))
    })?;

    info!("Screenshot stored: {} ({} bytes)", path.display(), data.len());
    Ok(path)
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "screenshot".to_string()
    } else {
        stem
    }
}

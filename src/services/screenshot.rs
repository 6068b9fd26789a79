//! Screenshot capturer - clipped capture of the robot preview image.

use std::fs;
use std::path::PathBuf;

use base64::Engine as _;
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams, Viewport,
};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::infrastructure::PageDriver;

/// Selector of the rendered robot preview image on the order page
const ROBOT_PREVIEW_SELECTOR: &str = "#robot-preview-image";

/// Captures a PNG of the robot preview element, clipped to its bounding box.
pub struct ScreenshotCapturer {
    preview_dir: PathBuf,
}

impl ScreenshotCapturer {
    pub fn new(preview_dir: impl Into<PathBuf>) -> Self {
        Self {
            preview_dir: preview_dir.into(),
        }
    }

    /// Save `robot_preview_<n>.png` to the preview directory.
    ///
    /// Fails if the preview element is absent or has an empty bounding box.
    pub async fn capture(&self, driver: &PageDriver, order_number: u32) -> Result<PathBuf> {
        let rect = driver.bounding_box(ROBOT_PREVIEW_SELECTOR).await?;
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Err(AppError::Screenshot(format!(
                "{} has an empty bounding box",
                ROBOT_PREVIEW_SELECTOR
            )));
        }
        debug!(
            "capturing {} at ({}, {}) {}x{}",
            ROBOT_PREVIEW_SELECTOR, rect.x, rect.y, rect.width, rect.height
        );

        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .clip(Viewport {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                scale: 1.0,
            })
            .build();

        let resp = driver.page().execute(params).await?;
        let data_b64: &str = resp.data.as_ref();
        let data = base64::engine::general_purpose::STANDARD
            .decode(data_b64.as_bytes())
            .map_err(|e| AppError::Screenshot(format!("base64 decode failed: {}", e)))?;

        let output = self
            .preview_dir
            .join(format!("robot_preview_{}.png", order_number));
        fs::write(&output, &data)?;

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screenshot_path_is_keyed_by_order_number() {
        let capturer = ScreenshotCapturer::new("output/preview");
        assert_eq!(
            capturer
                .preview_dir
                .join(format!("robot_preview_{}.png", 12)),
            PathBuf::from("output/preview/robot_preview_12.png")
        );
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::controller::GestureOptions;
use crate::scan::ScanOptions;
use crate::slideshow::SlideshowOptions;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Directory to scan for images.
    pub photo_library_path: PathBuf,
    /// Cross-fade duration between two images.
    #[serde(with = "humantime_serde")]
    pub fade_duration: Duration,
    /// Time an image stays fully visible before the slideshow advances.
    #[serde(with = "humantime_serde")]
    pub hold_duration: Duration,
    /// Start with slideshow auto-advance enabled.
    pub slideshow: bool,
    /// Open a borderless fullscreen window instead of a normal one.
    pub fullscreen: bool,
    /// Inner size of the window when not fullscreen, in logical pixels.
    pub window_size: [u32; 2],
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional maximum recursion depth. `None` or `Some(0)` means unlimited.
    pub max_depth: Option<usize>,
    /// Accepted file extensions, matched case-insensitively, without the dot.
    pub extensions: Vec<String>,
    /// Pointer travel before a press becomes a drag instead of a click.
    pub drag_threshold_px: f64,
    /// Horizontal zoom-drag distance that doubles the zoom.
    pub zoom_drag_px: f64,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(mut self) -> Result<Self> {
        ensure!(
            !self.extensions.is_empty(),
            "extensions must list at least one file extension"
        );
        for ext in &mut self.extensions {
            *ext = ext.trim_start_matches('.').to_ascii_lowercase();
        }
        ensure!(
            self.extensions.iter().all(|e| !e.is_empty()),
            "extensions must not contain empty entries"
        );
        ensure!(
            self.window_size[0] > 0 && self.window_size[1] > 0,
            "window-size must be positive in both dimensions"
        );
        ensure!(
            self.drag_threshold_px >= 0.0,
            "drag-threshold-px must not be negative"
        );
        ensure!(self.zoom_drag_px > 0.0, "zoom-drag-px must be positive");
        ensure!(
            !self.hold_duration.is_zero(),
            "hold-duration must be greater than zero"
        );
        Ok(self)
    }

    #[must_use]
    pub fn slideshow_options(&self) -> SlideshowOptions {
        SlideshowOptions {
            fade: self.fade_duration,
            hold: self.hold_duration,
            auto_advance: self.slideshow,
        }
    }

    #[must_use]
    pub fn gesture_options(&self) -> GestureOptions {
        GestureOptions {
            drag_threshold_px: self.drag_threshold_px,
            zoom_drag_px: self.zoom_drag_px,
        }
    }

    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            recursive: self.recursive,
            max_depth: self.max_depth,
            exts: self.extensions.clone(),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        let gestures = GestureOptions::default();
        Self {
            photo_library_path: PathBuf::from("."),
            fade_duration: Duration::from_millis(500),
            hold_duration: Duration::from_secs(5),
            slideshow: false,
            fullscreen: true,
            window_size: [800, 600],
            recursive: true,
            max_depth: None,
            extensions: ScanOptions::default().exts,
            drag_threshold_px: gestures.drag_threshold_px,
            zoom_drag_px: gestures.zoom_drag_px,
        }
    }
}

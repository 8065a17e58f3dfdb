//! Toolkit-independent input handling.
//!
//! The windowing shell translates its native events into calls on
//! [`InputHandler`] and carries out the [`Command`]s that come back. All
//! slideshow, pan/zoom and gesture state lives in [`Controller`].

use std::f64::consts::SQRT_2;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::events::{Command, Key, PointerButton};
use crate::playlist::Playlist;
use crate::slideshow::{Slideshow, SlideshowOptions};
use crate::view::{ViewTransform, drag_zoom_factor};

/// Suffix of every window title.
pub const TITLE_SUFFIX: &str = "Slideshow";

/// Wheel lines needed to double the zoom.
const WHEEL_LINES_PER_DOUBLING: f64 = 4.0;

/// Callbacks a windowing shell drives. Positions are physical pixels relative
/// to the top-left of the window.
pub trait InputHandler {
    /// Returns `true` if the view changed and needs a redraw.
    fn on_pointer_move(&mut self, pos: [f64; 2]) -> bool;
    fn on_pointer_down(&mut self, button: PointerButton, pos: [f64; 2]);
    fn on_pointer_up(
        &mut self,
        button: PointerButton,
        pos: [f64; 2],
        now: Instant,
    ) -> Option<Command>;
    /// `lines` is positive when scrolling up/away from the user.
    fn on_scroll(&mut self, lines: f64, pos: [f64; 2]) -> bool;
    fn on_key(&mut self, key: Key, now: Instant) -> Option<Command>;
    fn on_timer(&mut self, now: Instant) -> Option<Command>;
}

/// Pointer gesture tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureOptions {
    /// Movement (from the press position) below which a press/release is a click.
    pub drag_threshold_px: f64,
    /// Horizontal secondary-button drag distance that doubles the zoom.
    pub zoom_drag_px: f64,
}

impl Default for GestureOptions {
    fn default() -> Self {
        Self {
            drag_threshold_px: 3.0,
            zoom_drag_px: 150.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    button: PointerButton,
    start: [f64; 2],
    last: [f64; 2],
    dragging: bool,
}

pub struct Controller {
    directory: PathBuf,
    show: Slideshow,
    view: ViewTransform,
    gestures: GestureOptions,
    drag: Option<Drag>,
    viewport: (u32, u32),
}

impl Controller {
    #[must_use]
    pub fn new(
        directory: PathBuf,
        images: Vec<PathBuf>,
        opts: SlideshowOptions,
        gestures: GestureOptions,
        now: Instant,
    ) -> Self {
        Self {
            directory: absolute_dir(directory),
            show: Slideshow::new(Playlist::new(images), opts, now),
            view: ViewTransform::default(),
            gestures,
            drag: None,
            viewport: (1, 1),
        }
    }

    /// Select the first image of the current directory.
    pub fn start(&mut self, now: Instant) -> Option<Command> {
        if self.show.playlist().is_empty() {
            warn!(dir = %self.directory.display(), "no images in directory");
        }
        let idx = self.show.first(now);
        self.navigated(idx)
    }

    /// Replace the image list after a directory change and show its first image.
    pub fn set_directory(
        &mut self,
        directory: PathBuf,
        images: Vec<PathBuf>,
        now: Instant,
    ) -> Option<Command> {
        let directory = absolute_dir(directory);
        info!(dir = %directory.display(), count = images.len(), "showing images in directory");
        self.directory = directory;
        self.show.replace_playlist(Playlist::new(images), now);
        self.drag = None;
        self.view.reset();
        self.start(now)
    }

    /// The texture for the pending navigation is bound.
    pub fn image_ready(&mut self, now: Instant) -> bool {
        self.show.image_ready(now)
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
    }

    #[must_use]
    pub const fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    #[must_use]
    pub const fn slideshow(&self) -> &Slideshow {
        &self.show
    }

    #[must_use]
    pub const fn view(&self) -> &ViewTransform {
        &self.view
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Window title for the current state.
    #[must_use]
    pub fn title(&self) -> String {
        match self.show.playlist().current_path() {
            Some(path) => {
                let name = path
                    .file_name()
                    .map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy());
                format!("{name} - {TITLE_SUFFIX}")
            }
            None => format!("{} - {TITLE_SUFFIX}", self.directory.display()),
        }
    }

    /// Whether the fade is still running and frames must keep coming.
    #[must_use]
    pub fn is_animating(&self, now: Instant) -> bool {
        self.show.is_fading(now)
    }

    /// Next instant at which [`InputHandler::on_timer`] has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.show.next_deadline()
    }

    fn navigated(&mut self, idx: Option<usize>) -> Option<Command> {
        let index = idx?;
        self.view.reset();
        let path = self.show.playlist().get(index)?.to_path_buf();
        debug!(index, path = %path.display(), "navigated");
        Some(Command::Load { index, path })
    }

    fn viewport_centre(&self) -> [f64; 2] {
        [
            f64::from(self.viewport.0) / 2.0,
            f64::from(self.viewport.1) / 2.0,
        ]
    }
}

/// Resolve `dir` for display: symlink-free when it exists, otherwise just
/// anchored at the working directory.
fn absolute_dir(dir: PathBuf) -> PathBuf {
    dir.canonicalize()
        .or_else(|_| std::path::absolute(&dir))
        .unwrap_or(dir)
}

impl InputHandler for Controller {
    fn on_pointer_move(&mut self, pos: [f64; 2]) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let sdx = pos[0] - drag.start[0];
        let sdy = pos[1] - drag.start[1];
        let threshold = self.gestures.drag_threshold_px;
        drag.dragging = drag.dragging || sdx * sdx + sdy * sdy > threshold * threshold;

        let mut changed = false;
        if drag.dragging {
            let dx = pos[0] - drag.last[0];
            let dy = pos[1] - drag.last[1];
            match drag.button {
                PointerButton::Primary => {
                    self.view.pan_by(dx, dy);
                    changed = true;
                }
                PointerButton::Secondary => {
                    let factor = drag_zoom_factor(dx, self.gestures.zoom_drag_px);
                    self.view.zoom_by(factor, drag.start);
                    changed = true;
                }
                PointerButton::Middle => {}
            }
        }
        drag.last = pos;
        changed
    }

    fn on_pointer_down(&mut self, button: PointerButton, pos: [f64; 2]) {
        self.drag = match button {
            PointerButton::Primary | PointerButton::Secondary => Some(Drag {
                button,
                start: pos,
                last: pos,
                dragging: false,
            }),
            PointerButton::Middle => None,
        };
    }

    fn on_pointer_up(
        &mut self,
        button: PointerButton,
        _pos: [f64; 2],
        now: Instant,
    ) -> Option<Command> {
        let drag = self.drag.take();
        match button {
            PointerButton::Middle => Some(Command::ChooseDirectory),
            PointerButton::Primary | PointerButton::Secondary => {
                let drag = drag.filter(|d| d.button == button)?;
                if drag.dragging {
                    return None;
                }
                let idx = if button == PointerButton::Primary {
                    self.show.next(now)
                } else {
                    self.show.previous(now)
                };
                self.navigated(idx)
            }
        }
    }

    fn on_scroll(&mut self, lines: f64, pos: [f64; 2]) -> bool {
        if lines == 0.0 {
            return false;
        }
        self.view
            .zoom_by(drag_zoom_factor(lines, WHEEL_LINES_PER_DOUBLING), pos);
        true
    }

    fn on_key(&mut self, key: Key, now: Instant) -> Option<Command> {
        match key {
            Key::Next => {
                let idx = self.show.next(now);
                self.navigated(idx)
            }
            Key::Previous => {
                let idx = self.show.previous(now);
                self.navigated(idx)
            }
            Key::First => {
                let idx = self.show.first(now);
                self.navigated(idx)
            }
            Key::Last => {
                let idx = self.show.last(now);
                self.navigated(idx)
            }
            Key::ToggleSlideshow => {
                let enabled = self.show.toggle_auto_advance(now);
                info!(enabled, "slideshow auto-advance toggled");
                None
            }
            Key::ResetView => {
                self.view.reset();
                None
            }
            Key::ZoomIn => {
                let centre = self.viewport_centre();
                self.view.zoom_by(SQRT_2, centre);
                None
            }
            Key::ZoomOut => {
                let centre = self.viewport_centre();
                self.view.zoom_by(1.0 / SQRT_2, centre);
                None
            }
            Key::ToggleFullscreen => Some(Command::ToggleFullscreen),
            Key::OpenDirectory => Some(Command::ChooseDirectory),
            Key::Quit => Some(Command::Quit),
        }
    }

    fn on_timer(&mut self, now: Instant) -> Option<Command> {
        let idx = self.show.advance_if_due(now);
        if idx.is_some() {
            debug!("slideshow auto-advance");
        }
        self.navigated(idx)
    }
}

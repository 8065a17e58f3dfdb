//! Pan/zoom transform and fit-to-window geometry.
//!
//! Coordinates are physical pixels with the origin at the top-left of the
//! window. "World" coordinates are the unzoomed layout in which each image is
//! fitted to the viewport; `screen = (world - pan) * zoom`.

/// Zoom never goes below "image fits the window".
pub const MIN_ZOOM: f64 = 1.0;

/// Pan offset and zoom factor applied on top of the fitted image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pan: [f64; 2],
    zoom: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan: [0.0, 0.0],
            zoom: MIN_ZOOM,
        }
    }
}

impl ViewTransform {
    #[must_use]
    pub const fn pan(&self) -> [f64; 2] {
        self.pan
    }

    #[must_use]
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Move the view with the pointer: a screen delta is divided by the zoom
    /// so the image tracks the cursor.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan[0] -= dx / self.zoom;
        self.pan[1] -= dy / self.zoom;
    }

    /// Set the zoom to `zoom` (clamped to [`MIN_ZOOM`]) keeping the world point
    /// under the screen position `anchor` fixed.
    pub fn zoom_to(&mut self, zoom: f64, anchor: [f64; 2]) {
        let old = self.zoom;
        let new = zoom.max(MIN_ZOOM);
        let ratio = old / new;
        for axis in 0..2 {
            let a = anchor[axis] / old + self.pan[axis];
            self.pan[axis] = a - (a - self.pan[axis]) * ratio;
        }
        self.zoom = new;
    }

    /// Multiply the current zoom by `factor` around `anchor`.
    pub fn zoom_by(&mut self, factor: f64, anchor: [f64; 2]) {
        self.zoom_to(self.zoom * factor, anchor);
    }

    #[must_use]
    pub fn to_screen(&self, world: [f64; 2]) -> [f64; 2] {
        [
            (world[0] - self.pan[0]) * self.zoom,
            (world[1] - self.pan[1]) * self.zoom,
        ]
    }

    #[must_use]
    pub fn to_world(&self, screen: [f64; 2]) -> [f64; 2] {
        [
            screen[0] / self.zoom + self.pan[0],
            screen[1] / self.zoom + self.pan[1],
        ]
    }
}

/// Zoom multiplier for a horizontal drag of `dx` pixels: doubles every
/// `px_per_doubling` to the right, halves every `px_per_doubling` to the left.
#[must_use]
pub fn drag_zoom_factor(dx: f64, px_per_doubling: f64) -> f64 {
    if px_per_doubling <= 0.0 {
        return 1.0;
    }
    2f64.powf(dx / px_per_doubling)
}

/// Axis-aligned rectangle as `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.x0 as f32,
            self.y0 as f32,
            self.x1 as f32,
            self.y1 as f32,
        ]
    }
}

/// Largest rectangle with the image's aspect ratio that fits the viewport,
/// centred. Small images are scaled up.
#[must_use]
pub fn fit_rect(image: (u32, u32), viewport: (u32, u32)) -> Rect {
    let (iw, ih) = (f64::from(image.0), f64::from(image.1));
    let (vw, vh) = (f64::from(viewport.0), f64::from(viewport.1));
    if iw == 0.0 || ih == 0.0 || vw == 0.0 || vh == 0.0 {
        return Rect {
            x0: 0.0,
            y0: 0.0,
            x1: 0.0,
            y1: 0.0,
        };
    }
    let scale = (vw / iw).min(vh / ih);
    let (w, h) = (iw * scale, ih * scale);
    let x0 = (vw - w) / 2.0;
    let y0 = (vh - h) / 2.0;
    Rect {
        x0,
        y0,
        x1: x0 + w,
        y1: y0 + h,
    }
}

/// Where the fitted image lands on screen under `view`.
#[must_use]
pub fn screen_rect(view: &ViewTransform, image: (u32, u32), viewport: (u32, u32)) -> Rect {
    let fitted = fit_rect(image, viewport);
    let [x0, y0] = view.to_screen([fitted.x0, fitted.y0]);
    let [x1, y1] = view.to_screen([fitted.x1, fitted.y1]);
    Rect { x0, y0, x1, y1 }
}

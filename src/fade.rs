//! Cross-fade opacity curves.

use std::time::Duration;

/// Opacity of the incoming image `elapsed` into a fade of length `duration`.
///
/// Linear ramp from 0 to 1, saturating once `elapsed >= duration`. A zero
/// duration is an instant cut.
#[must_use]
pub fn fade_in_opacity(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

/// Opacity of the outgoing image; the complement of [`fade_in_opacity`].
#[must_use]
pub fn fade_out_opacity(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 0.0;
    }
    (1.0 - elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

/// Opacities for the two bound images of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossFade {
    pub incoming: f32,
    pub outgoing: f32,
}

impl CrossFade {
    /// Fade finished: only the incoming image is visible.
    pub const SETTLED: Self = Self {
        incoming: 1.0,
        outgoing: 0.0,
    };

    #[must_use]
    pub fn at(elapsed: Duration, duration: Duration) -> Self {
        Self {
            incoming: fade_in_opacity(elapsed, duration),
            outgoing: fade_out_opacity(elapsed, duration),
        }
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.incoming >= 1.0 && self.outgoing <= 0.0
    }
}

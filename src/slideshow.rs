//! Navigation, fade clock and auto-advance timer.
//!
//! Every method takes the current `Instant` explicitly so the whole state
//! machine can be driven from tests without a clock or a window.

use std::time::{Duration, Instant};

use crate::fade::CrossFade;
use crate::playlist::Playlist;

/// Which images are bound and when the fade between them began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub previous: Option<usize>,
    pub current: Option<usize>,
    pub started_at: Instant,
    /// Set between navigation and the decoded image becoming available.
    pub loading: bool,
}

impl Transition {
    fn idle(now: Instant) -> Self {
        Self {
            previous: None,
            current: None,
            started_at: now,
            loading: false,
        }
    }
}

/// Timing knobs for a [`Slideshow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideshowOptions {
    pub fade: Duration,
    pub hold: Duration,
    pub auto_advance: bool,
}

#[derive(Debug, Clone)]
pub struct Slideshow {
    playlist: Playlist,
    transition: Transition,
    opts: SlideshowOptions,
    /// Start of the hold countdown; `None` until an image has finished loading.
    countdown_from: Option<Instant>,
}

impl Slideshow {
    #[must_use]
    pub fn new(playlist: Playlist, opts: SlideshowOptions, now: Instant) -> Self {
        Self {
            playlist,
            transition: Transition::idle(now),
            opts,
            countdown_from: None,
        }
    }

    #[must_use]
    pub const fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    #[must_use]
    pub const fn transition(&self) -> &Transition {
        &self.transition
    }

    #[must_use]
    pub const fn options(&self) -> &SlideshowOptions {
        &self.opts
    }

    #[must_use]
    pub const fn auto_advance(&self) -> bool {
        self.opts.auto_advance
    }

    /// Swap in a freshly scanned list. Nothing is selected afterwards.
    pub fn replace_playlist(&mut self, playlist: Playlist, now: Instant) {
        self.playlist = playlist;
        self.transition = Transition::idle(now);
        self.countdown_from = None;
    }

    /// Select `idx` (wrapping). Restarts the fade clock and cancels any
    /// pending auto-advance. Returns the selected index, or `None` when the
    /// list is empty.
    pub fn goto(&mut self, idx: isize, now: Instant) -> Option<usize> {
        let previous = self.playlist.current();
        let current = self.playlist.goto(idx)?;
        self.begin(previous, current, now);
        Some(current)
    }

    pub fn next(&mut self, now: Instant) -> Option<usize> {
        let previous = self.playlist.current();
        let current = self.playlist.next()?;
        self.begin(previous, current, now);
        Some(current)
    }

    pub fn previous(&mut self, now: Instant) -> Option<usize> {
        let previous = self.playlist.current();
        let current = self.playlist.previous()?;
        self.begin(previous, current, now);
        Some(current)
    }

    pub fn first(&mut self, now: Instant) -> Option<usize> {
        self.goto(0, now)
    }

    pub fn last(&mut self, now: Instant) -> Option<usize> {
        self.goto(-1, now)
    }

    fn begin(&mut self, previous: Option<usize>, current: usize, now: Instant) {
        self.transition = Transition {
            previous,
            current: Some(current),
            started_at: now,
            loading: true,
        };
        self.countdown_from = None;
    }

    /// The image for the current transition is bound; start fading it in.
    ///
    /// Returns `false` if no navigation was waiting for an image.
    pub fn image_ready(&mut self, now: Instant) -> bool {
        if !self.transition.loading {
            return false;
        }
        self.transition.loading = false;
        self.transition.started_at = now;
        self.countdown_from = Some(now + self.opts.fade);
        true
    }

    /// Opacities of the incoming and outgoing image at `now`.
    #[must_use]
    pub fn opacities(&self, now: Instant) -> CrossFade {
        if self.transition.loading || self.transition.current.is_none() {
            return CrossFade::SETTLED;
        }
        CrossFade::at(
            now.saturating_duration_since(self.transition.started_at),
            self.opts.fade,
        )
    }

    /// Whether frames still need to be produced for the running fade.
    #[must_use]
    pub fn is_fading(&self, now: Instant) -> bool {
        !self.transition.loading
            && self.transition.current.is_some()
            && now.saturating_duration_since(self.transition.started_at) < self.opts.fade
    }

    pub fn set_auto_advance(&mut self, enabled: bool, now: Instant) {
        self.opts.auto_advance = enabled;
        if enabled {
            // the hold restarts from the moment auto-advance is switched on
            self.countdown_from = self.countdown_from.map(|from| from.max(now));
        }
    }

    /// Flip auto-advance; returns the new setting.
    pub fn toggle_auto_advance(&mut self, now: Instant) -> bool {
        let enabled = !self.opts.auto_advance;
        self.set_auto_advance(enabled, now);
        enabled
    }

    /// When the next auto-advance is scheduled, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        if !self.opts.auto_advance || self.transition.loading {
            return None;
        }
        self.countdown_from.map(|from| from + self.opts.hold)
    }

    /// Whether auto-advance should move to the next image at `now`.
    #[must_use]
    pub fn due(&self, now: Instant) -> bool {
        self.next_deadline().is_some_and(|deadline| now >= deadline)
    }

    /// Advance if the hold has elapsed; returns the newly selected index.
    pub fn advance_if_due(&mut self, now: Instant) -> Option<usize> {
        if self.due(now) {
            self.next(now)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const FADE: Duration = Duration::from_millis(500);
    const HOLD: Duration = Duration::from_secs(3);

    fn show(auto_advance: bool, now: Instant) -> Slideshow {
        let list = Playlist::new(vec![
            PathBuf::from("1.png"),
            PathBuf::from("2.png"),
            PathBuf::from("3.png"),
        ]);
        Slideshow::new(
            list,
            SlideshowOptions {
                fade: FADE,
                hold: HOLD,
                auto_advance,
            },
            now,
        )
    }

    #[test]
    fn navigation_records_previous_and_current() {
        let t0 = Instant::now();
        let mut s = show(false, t0);
        assert_eq!(s.next(t0), Some(0));
        assert_eq!(s.next(t0), Some(1));
        let tr = s.transition();
        assert_eq!((tr.previous, tr.current), (Some(0), Some(1)));
        assert!(tr.loading);
        assert_eq!(s.goto(-1, t0), Some(2));
        assert_eq!(s.goto(3, t0), Some(0));
    }

    #[test]
    fn opacities_hold_while_loading_then_fade() {
        let t0 = Instant::now();
        let mut s = show(false, t0);
        s.next(t0);
        assert_eq!(s.opacities(t0 + FADE / 2), CrossFade::SETTLED);
        assert!(!s.is_fading(t0));

        let ready = t0 + Duration::from_millis(100);
        assert!(s.image_ready(ready));
        let start = s.opacities(ready);
        assert_eq!((start.incoming, start.outgoing), (0.0, 1.0));
        assert!(s.is_fading(ready + FADE / 2));
        assert_eq!(s.opacities(ready + FADE), CrossFade::SETTLED);
        assert!(!s.is_fading(ready + FADE));
        assert!(!s.image_ready(ready + FADE));
    }

    #[test]
    fn auto_advance_after_fade_plus_hold() {
        let t0 = Instant::now();
        let mut s = show(true, t0);
        s.next(t0);
        assert!(!s.due(t0 + FADE + HOLD), "no countdown while loading");
        s.image_ready(t0);
        assert_eq!(s.next_deadline(), Some(t0 + FADE + HOLD));
        assert!(!s.due(t0 + FADE + HOLD - Duration::from_millis(1)));
        assert_eq!(s.advance_if_due(t0 + FADE + HOLD), Some(1));
    }

    #[test]
    fn manual_navigation_cancels_pending_advance() {
        let t0 = Instant::now();
        let mut s = show(true, t0);
        s.next(t0);
        s.image_ready(t0);
        let nav = t0 + HOLD;
        s.previous(nav);
        assert_eq!(s.playlist().current(), Some(2));
        assert!(!s.due(t0 + FADE + HOLD));
        s.image_ready(nav);
        assert!(!s.due(t0 + FADE + HOLD + Duration::from_millis(10)));
        assert!(s.due(nav + FADE + HOLD));
    }

    #[test]
    fn disabled_auto_advance_never_fires() {
        let t0 = Instant::now();
        let mut s = show(false, t0);
        s.next(t0);
        s.image_ready(t0);
        assert_eq!(s.next_deadline(), None);
        assert_eq!(s.advance_if_due(t0 + Duration::from_secs(3600)), None);
    }

    #[test]
    fn enabling_auto_advance_restarts_the_hold() {
        let t0 = Instant::now();
        let mut s = show(false, t0);
        s.next(t0);
        s.image_ready(t0);
        let later = t0 + Duration::from_secs(60);
        assert!(s.toggle_auto_advance(later));
        assert!(!s.due(later));
        assert_eq!(s.next_deadline(), Some(later + HOLD));
    }

    #[test]
    fn empty_playlist_is_inert() {
        let t0 = Instant::now();
        let mut s = Slideshow::new(
            Playlist::new(Vec::new()),
            SlideshowOptions {
                fade: FADE,
                hold: HOLD,
                auto_advance: true,
            },
            t0,
        );
        assert_eq!(s.next(t0), None);
        assert_eq!(s.previous(t0), None);
        assert_eq!(s.opacities(t0), CrossFade::SETTLED);
        assert!(!s.due(t0 + Duration::from_secs(60)));
    }
}

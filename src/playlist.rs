//! Ordered image list with a wrapping "current image" pointer.

use std::path::{Path, PathBuf};

/// Wrap a possibly negative or out-of-range index into `0..len`.
///
/// Returns `None` when `len` is zero.
#[must_use]
pub fn wrap_index(idx: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len = isize::try_from(len).unwrap_or(isize::MAX);
    // rem_euclid is never negative for a positive modulus
    usize::try_from(idx.rem_euclid(len)).ok()
}

/// The images of one directory, in display order.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    items: Vec<PathBuf>,
    current: Option<usize>,
}

impl Playlist {
    /// Construct a playlist from an already ordered list of paths. Nothing is
    /// selected until the first navigation.
    #[must_use]
    pub fn new(items: Vec<PathBuf>) -> Self {
        Self {
            items,
            current: None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the image currently selected, if any.
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn current_path(&self) -> Option<&Path> {
        self.current.and_then(|i| self.get(i))
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&Path> {
        self.items.get(idx).map(PathBuf::as_path)
    }

    /// Select `idx`, wrapping modulo the list length. No-op on an empty list.
    pub fn goto(&mut self, idx: isize) -> Option<usize> {
        let wrapped = wrap_index(idx, self.items.len())?;
        self.current = Some(wrapped);
        Some(wrapped)
    }

    /// Step forward; from "nothing selected" this selects the first image.
    pub fn next(&mut self) -> Option<usize> {
        let target = self.current.map_or(0, |i| as_signed(i).saturating_add(1));
        self.goto(target)
    }

    /// Step backward; from "nothing selected" this selects the last image.
    pub fn previous(&mut self) -> Option<usize> {
        let target = self.current.map_or(-1, |i| as_signed(i) - 1);
        self.goto(target)
    }

    pub fn first(&mut self) -> Option<usize> {
        self.goto(0)
    }

    pub fn last(&mut self) -> Option<usize> {
        self.goto(-1)
    }
}

fn as_signed(idx: usize) -> isize {
    isize::try_from(idx).unwrap_or(isize::MAX)
}

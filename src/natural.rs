//! Natural ("human") ordering for file names.
//!
//! The trailing run of ASCII digits in the file name is compared by value, so
//! `img2.png` sorts before `img10.png`, and a name without digits sorts ahead
//! of its numbered siblings (`img.png` before `img1.png`). Everything around
//! the run compares case-insensitively. Names are reduced to a key that is compared field by
//! field, which keeps the ordering total and safe for `sort_by`.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Digit run with leading zeros stripped; compared by magnitude without parsing,
/// so runs of any length are fine.
#[derive(Debug, PartialEq, Eq)]
struct Digits<'a>(&'a str);

impl<'a> Digits<'a> {
    fn new(run: &'a str) -> Self {
        Self(run.trim_start_matches('0'))
    }
}

impl Ord for Digits<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(other.0))
    }
}

impl PartialOrd for Digits<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Field order is the comparison order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct NaturalKey<'a> {
    prefix: String,
    number: Option<Digits<'a>>,
    tail: String,
    folded: String,
    raw: &'a str,
}

impl<'a> NaturalKey<'a> {
    fn new(raw: &'a str) -> Self {
        let name_start = raw.rfind(['/', '\\']).map_or(0, |i| i + 1);
        let name = &raw[name_start..];
        let (prefix, number, tail) = match trailing_digits(name) {
            Some((start, end)) => (
                &raw[..name_start + start],
                Some(Digits::new(&name[start..end])),
                &raw[name_start + end..],
            ),
            // "cover.jpg" keys like "cover<none>.jpg", ahead of "cover2.jpg"
            None => match name.rfind('.').filter(|&dot| dot > 0) {
                Some(dot) => (&raw[..name_start + dot], None, &raw[name_start + dot..]),
                None => (raw, None, ""),
            },
        };
        Self {
            prefix: prefix.to_lowercase(),
            number,
            tail: tail.to_lowercase(),
            folded: raw.to_lowercase(),
            raw,
        }
    }
}

/// Byte range of the last run of ASCII digits in `s`.
fn trailing_digits(s: &str) -> Option<(usize, usize)> {
    let last = s.rfind(|c: char| c.is_ascii_digit())?;
    let end = last + 1;
    let start = s[..end]
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(0, |(i, c)| i + c.len_utf8());
    Some((start, end))
}

/// Compare two names in natural order.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    NaturalKey::new(a).cmp(&NaturalKey::new(b))
}

/// Compare two paths in natural order using their full (lossy) string form.
#[must_use]
pub fn compare_paths(a: &Path, b: &Path) -> Ordering {
    natural_cmp(&a.to_string_lossy(), &b.to_string_lossy())
}

/// Sort `paths` in place in natural order.
pub fn sort_paths(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| compare_paths(a, b));
}

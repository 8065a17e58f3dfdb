//! Request-driven background image loader.
//! Receives decode jobs, decodes off-thread, and returns RGBA8 mip chains
//! without blocking the render loop.
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use image::RgbaImage;
use image::imageops::{self, FilterType};
use tracing::{debug, warn};

use crate::error::Error;

/// Message sent to the background loader thread.
#[derive(Debug)]
pub enum LoaderMsg {
    Decode(DecodeRequest),
    /// Stop the loader.
    Quit,
}

#[derive(Debug, Clone)]
pub struct DecodeRequest {
    /// Monotonically increasing id; replies echo it so stale ones can be dropped.
    pub generation: u64,
    pub path: PathBuf,
    /// Largest width/height the GPU accepts; larger images are scaled down.
    pub max_dim: u32,
}

/// One RGBA8 level of a mip chain.
#[derive(Debug, Clone)]
pub struct MipLevel {
    pub size: (u32, u32),
    pub pixels: Vec<u8>,
}

/// An image decoded on CPU and ready for GPU upload.
#[derive(Debug)]
pub struct PreparedImage {
    pub generation: u64,
    pub path: PathBuf,
    /// Dimensions (width, height) of the full-size level.
    pub size: (u32, u32),
    /// Full mip chain, largest first, ending at 1x1.
    pub levels: Vec<MipLevel>,
}

#[derive(Debug)]
pub enum LoaderReply {
    Ready(PreparedImage),
    Failed {
        generation: u64,
        path: PathBuf,
        error: String,
    },
}

/// Decode `path` into RGBA8, scaling down (aspect preserved) if either side
/// exceeds `max_dim`.
///
/// # Errors
/// Returns [`Error::Decode`] if the file cannot be opened or decoded.
pub fn decode(path: &Path, max_dim: u32) -> Result<RgbaImage, Error> {
    let img = image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let max_dim = max_dim.max(1);
    let img = if img.width() > max_dim || img.height() > max_dim {
        debug!(
            path = %path.display(),
            width = img.width(),
            height = img.height(),
            max_dim,
            "downscaling oversized image"
        );
        img.resize(max_dim, max_dim, FilterType::Triangle)
    } else {
        img
    };
    Ok(img.to_rgba8())
}

/// Levels in a full mip chain for a `width` x `height` image.
#[must_use]
pub const fn mip_level_count(width: u32, height: u32) -> u32 {
    let larger = if width > height { width } else { height };
    if larger == 0 {
        1
    } else {
        u32::BITS - larger.leading_zeros()
    }
}

/// Build the mip chain for `base`. Each level halves the previous one
/// (rounding down, never below 1), matching the GPU's level sizes.
#[must_use]
pub fn mip_chain(base: RgbaImage) -> Vec<MipLevel> {
    let count = mip_level_count(base.width(), base.height());
    let mut levels = Vec::with_capacity(count as usize);
    let mut current = base;
    for _ in 1..count {
        let w = (current.width() / 2).max(1);
        let h = (current.height() / 2).max(1);
        let next = imageops::resize(&current, w, h, FilterType::Triangle);
        levels.push(MipLevel {
            size: current.dimensions(),
            pixels: current.into_raw(),
        });
        current = next;
    }
    levels.push(MipLevel {
        size: current.dimensions(),
        pixels: current.into_raw(),
    });
    levels
}

/// Spawn the request-driven loader. `wake` runs after every reply so an idle
/// event loop notices it.
///
/// Queued requests are coalesced: only the newest pending decode runs, since
/// the viewer would discard the older ones anyway.
///
/// # Errors
/// Returns an error if the OS refuses to create the thread.
pub fn spawn_loader<F>(
    rx: Receiver<LoaderMsg>,
    tx: Sender<LoaderReply>,
    wake: F,
) -> std::io::Result<JoinHandle<()>>
where
    F: Fn() + Send + 'static,
{
    thread::Builder::new()
        .name("image-loader".into())
        .spawn(move || {
            while let Ok(msg) = rx.recv() {
                let mut latest = match msg {
                    LoaderMsg::Quit => break,
                    LoaderMsg::Decode(req) => req,
                };
                let mut quit = false;
                for queued in rx.try_iter() {
                    match queued {
                        LoaderMsg::Quit => {
                            quit = true;
                            break;
                        }
                        LoaderMsg::Decode(req) => {
                            debug!(skipped = %latest.path.display(), "superseded decode request");
                            latest = req;
                        }
                    }
                }
                if quit {
                    break;
                }

                let reply = match decode(&latest.path, latest.max_dim) {
                    Ok(rgba) => LoaderReply::Ready(PreparedImage {
                        generation: latest.generation,
                        path: latest.path,
                        size: rgba.dimensions(),
                        levels: mip_chain(rgba),
                    }),
                    Err(err) => {
                        warn!(error = %err, "image decode failed");
                        LoaderReply::Failed {
                            generation: latest.generation,
                            path: latest.path,
                            error: err.to_string(),
                        }
                    }
                };
                if tx.send(reply).is_err() {
                    break;
                }
                wake();
            }
            debug!("loader thread exiting");
        })
}

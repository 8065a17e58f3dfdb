use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};
use rust_slideshow::controller::{Controller, GestureOptions, InputHandler};
use rust_slideshow::events::{Command, Key, PointerButton};
use rust_slideshow::render::loader::{decode, mip_chain};
use rust_slideshow::scan::{ScanOptions, scan_directory};
use rust_slideshow::slideshow::SlideshowOptions;
use rust_slideshow::view::screen_rect;
use tempfile::tempdir;

const FADE: Duration = Duration::from_millis(300);
const HOLD: Duration = Duration::from_secs(1);

fn write_png(dir: &std::path::Path, name: &str, w: u32, h: u32) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(w, h, Rgba([200, 100, 50, 255]))
        .save(&path)
        .unwrap();
    path
}

fn loaded(cmd: Option<Command>) -> PathBuf {
    match cmd {
        Some(Command::Load { path, .. }) => path,
        other => panic!("expected a load, got {other:?}"),
    }
}

#[test]
fn scanned_directory_drives_navigation_and_auto_advance() {
    let tmp = tempdir().unwrap();
    write_png(tmp.path(), "shot10.png", 8, 4);
    write_png(tmp.path(), "shot2.png", 4, 8);
    write_png(tmp.path(), "shot1.png", 4, 4);
    fs::write(tmp.path().join("readme.md"), b"skip me").unwrap();

    let images = scan_directory(tmp.path(), &ScanOptions::default()).unwrap();
    let t0 = Instant::now();
    let mut c = Controller::new(
        tmp.path().to_path_buf(),
        images,
        SlideshowOptions {
            fade: FADE,
            hold: HOLD,
            auto_advance: true,
        },
        GestureOptions::default(),
        t0,
    );
    c.set_viewport(400, 200);

    let first = loaded(c.start(t0));
    assert!(first.ends_with("shot1.png"));
    let rgba = decode(&first, 4096).unwrap();
    let size = rgba.dimensions();
    assert_eq!(size, (4, 4));
    let levels = mip_chain(rgba);
    assert_eq!(levels.len(), 3);
    assert_eq!(levels[2].size, (1, 1));

    // image fitted and centred in a 400x200 viewport
    let rect = screen_rect(c.view(), size, c.viewport());
    assert_eq!((rect.x0, rect.y0, rect.x1, rect.y1), (100.0, 0.0, 300.0, 200.0));

    // no auto-advance until the image is bound and fade + hold have elapsed
    assert_eq!(c.on_timer(t0 + FADE + HOLD), None);
    let t1 = t0 + Duration::from_millis(50);
    assert!(c.image_ready(t1));
    let fade = c.slideshow().opacities(t1 + FADE / 2);
    assert!(fade.incoming > 0.0 && fade.incoming < 1.0);
    assert!((fade.incoming + fade.outgoing - 1.0).abs() < 1e-6);
    assert_eq!(c.on_timer(t1 + FADE), None);
    assert!(loaded(c.on_timer(t1 + FADE + HOLD)).ends_with("shot2.png"));

    // manual navigation wraps both ways
    let t2 = t1 + FADE + HOLD;
    c.image_ready(t2);
    assert!(loaded(c.on_key(Key::Next, t2)).ends_with("shot10.png"));
    c.image_ready(t2);
    assert!(loaded(c.on_key(Key::Next, t2)).ends_with("shot1.png"));
    c.image_ready(t2);
    c.on_pointer_down(PointerButton::Secondary, [5.0, 5.0]);
    assert!(loaded(c.on_pointer_up(PointerButton::Secondary, [5.0, 5.0], t2)).ends_with("shot10.png"));
}

#[test]
fn switching_to_an_empty_directory_clears_the_playlist() {
    let tmp = tempdir().unwrap();
    write_png(tmp.path(), "only.png", 2, 2);
    let empty = tempdir().unwrap();

    let t0 = Instant::now();
    let images = scan_directory(tmp.path(), &ScanOptions::default()).unwrap();
    let mut c = Controller::new(
        tmp.path().to_path_buf(),
        images,
        SlideshowOptions {
            fade: FADE,
            hold: HOLD,
            auto_advance: false,
        },
        GestureOptions::default(),
        t0,
    );
    loaded(c.start(t0));
    assert!(c.title().starts_with("only.png"));

    let none = scan_directory(empty.path(), &ScanOptions::default()).unwrap();
    assert_eq!(c.set_directory(empty.path().to_path_buf(), none, t0), None);
    assert!(c.slideshow().playlist().is_empty());
    assert_eq!(c.on_key(Key::Next, t0), None);
    assert_eq!(c.on_key(Key::Last, t0), None);
    assert!(c.title().ends_with(" - Slideshow"));
}

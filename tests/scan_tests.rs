use std::fs;
use std::path::Path;

use rust_slideshow::error::Error;
use rust_slideshow::scan::{ScanOptions, is_supported_image, scan_directory};
use tempfile::tempdir;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"x").unwrap();
}

fn names(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn scan_sorts_naturally_and_filters_extensions() {
    let tmp = tempdir().unwrap();
    for name in ["img10.png", "img2.jpg", "img1.PNG", "notes.txt", "img3.gif"] {
        touch(&tmp.path().join(name));
    }

    let found = scan_directory(tmp.path(), &ScanOptions::default()).unwrap();
    assert_eq!(names(&found), vec!["img1.PNG", "img2.jpg", "img10.png"]);
    assert!(found.iter().all(|p| p.is_absolute()));
}

#[test]
fn scan_recurses_but_skips_hidden_directories() {
    let tmp = tempdir().unwrap();
    touch(&tmp.path().join("a1.jpg"));
    touch(&tmp.path().join("sub/a2.jpg"));
    touch(&tmp.path().join(".thumbs/a3.jpg"));

    let found = scan_directory(tmp.path(), &ScanOptions::default()).unwrap();
    assert_eq!(names(&found), vec!["a1.jpg", "a2.jpg"]);
}

#[test]
fn non_recursive_scan_stays_at_top_level() {
    let tmp = tempdir().unwrap();
    touch(&tmp.path().join("top.png"));
    touch(&tmp.path().join("sub/deep.png"));

    let opts = ScanOptions {
        recursive: false,
        ..ScanOptions::default()
    };
    let found = scan_directory(tmp.path(), &opts).unwrap();
    assert_eq!(names(&found), vec!["top.png"]);
}

#[test]
fn max_depth_limits_recursion() {
    let tmp = tempdir().unwrap();
    touch(&tmp.path().join("one/a.png"));
    touch(&tmp.path().join("one/two/b.png"));

    let opts = ScanOptions {
        max_depth: Some(2),
        ..ScanOptions::default()
    };
    let found = scan_directory(tmp.path(), &opts).unwrap();
    assert_eq!(names(&found), vec!["a.png"]);
}

#[test]
fn empty_directory_yields_no_images() {
    let tmp = tempdir().unwrap();
    let found = scan_directory(tmp.path(), &ScanOptions::default()).unwrap();
    assert!(found.is_empty());
}

#[test]
fn missing_directory_is_bad_dir() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("nope");
    assert!(matches!(
        scan_directory(&missing, &ScanOptions::default()),
        Err(Error::BadDir(_))
    ));
}

#[test]
fn file_path_is_bad_dir() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("img.png");
    touch(&file);
    assert!(matches!(
        scan_directory(&file, &ScanOptions::default()),
        Err(Error::BadDir(_))
    ));
}

#[test]
fn supported_image_matching_is_case_insensitive() {
    let exts = vec!["jpg".to_string(), "png".to_string()];
    assert!(is_supported_image(Path::new("a.JPG"), &exts));
    assert!(is_supported_image(Path::new("dir/b.Png"), &exts));
    assert!(!is_supported_image(Path::new("c.jpeg"), &exts));
    assert!(!is_supported_image(Path::new("png"), &exts));
}

//! End-to-end tree builds over real source directories.

mod common;

use common::*;
use shrinkfs::cache::{ContentHash, DEFAULT_MAX_DIMENSION};
use shrinkfs::dispatch::FailurePolicy;
use shrinkfs::fuse::{InodeTable, ROOT_INODE};
use shrinkfs::service::{ServiceConfig, ShrinkService};
use shrinkfs::tree::EntryKind;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_large_jpeg_is_downsized_and_text_passes_through() {
    let src = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    write_jpeg(src.path(), "pic.jpg", 4000, 3000, 0);
    write_file(src.path(), "notes.txt", b"hello");

    let transcoder = CountingTranscoder::new();
    let service = service(src.path(), cache.path(), transcoder.clone());
    let built = service.build_tree().unwrap();

    assert_eq!(built.tree.len(), 2);
    let names: Vec<_> = built.tree.root().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["notes.txt", "pic.jpg"]);

    let pic = built.tree.lookup(Path::new("pic.jpg")).unwrap();
    let served = pic.read_all().unwrap();
    assert_eq!(jpeg_dimensions(&served), (2000, 1500));
    assert_eq!(pic.attributes().size, served.len() as u64);

    // Repeated reads serve the same artifact bytes.
    assert_eq!(pic.read_all().unwrap(), served);

    let notes = built.tree.lookup(Path::new("notes.txt")).unwrap();
    assert_eq!(notes.read_all().unwrap(), b"hello");
    assert_eq!(notes.attributes().size, 5);
    assert_eq!(transcoder.calls(), 1);
}

#[test]
fn test_aspect_ratio_and_no_upscaling() {
    let src = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    write_jpeg(src.path(), "portrait.JPEG", 1000, 3000, 1);
    write_jpeg(src.path(), "small/thumb.jpg", 640, 480, 2);
    write_jpeg(src.path(), "square.jpe", 2500, 2500, 3);

    let built = service(src.path(), cache.path(), CountingTranscoder::new())
        .build_tree()
        .unwrap();

    let dims = |rel: &str| {
        let node = built.tree.lookup(Path::new(rel)).unwrap();
        jpeg_dimensions(&node.read_all().unwrap())
    };
    assert_eq!(dims("portrait.JPEG"), (667, 2000));
    assert_eq!(dims("small/thumb.jpg"), (640, 480));
    assert_eq!(dims("square.jpe"), (DEFAULT_MAX_DIMENSION, DEFAULT_MAX_DIMENSION));
}

#[test]
fn test_corrupt_jpeg_is_omitted() {
    let src = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    write_jpeg(src.path(), "good.jpg", 300, 200, 0);
    write_file(src.path(), "bad.jpg", b"\xff\xd8 definitely not a jpeg");
    write_file(src.path(), "readme.md", b"# photos");

    let built = service(src.path(), cache.path(), CountingTranscoder::new())
        .build_tree()
        .unwrap();

    assert!(built.tree.lookup(Path::new("bad.jpg")).is_none());
    assert!(built.tree.lookup(Path::new("good.jpg")).is_some());
    assert!(built.tree.lookup(Path::new("readme.md")).is_some());
    assert_eq!(built.report.dropped, 1);

    // Nothing was published for the bad file.
    let artifacts: Vec<_> = fs::read_dir(cache.path()).unwrap().collect();
    assert_eq!(artifacts.len(), 1);
}

#[test]
fn test_corrupt_jpeg_served_unchanged_with_passthrough() {
    let src = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    write_file(src.path(), "bad.jpg", b"garbage");

    let config = ServiceConfig::builder()
        .source(src.path())
        .cache_directory(cache.path())
        .on_failure(FailurePolicy::Passthrough)
        .build()
        .unwrap();
    let built = ShrinkService::new(config, logger()).build_tree().unwrap();

    let node = built.tree.lookup(Path::new("bad.jpg")).unwrap();
    assert_eq!(node.read_all().unwrap(), b"garbage");
    assert_eq!(built.report.fallbacks, 1);
}

#[test]
fn test_paths_mirror_source_structure() {
    let src = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    write_jpeg(src.path(), "2019/summer/beach.jpg", 120, 80, 0);
    write_file(src.path(), "2019/summer/notes.txt", b"sand");
    write_file(src.path(), "2020/index.html", b"<html>");
    fs::create_dir_all(src.path().join("empty")).unwrap();

    let built = service(src.path(), cache.path(), CountingTranscoder::new())
        .build_tree()
        .unwrap();

    let mut paths: Vec<_> = built
        .tree
        .iter()
        .map(|(path, _)| path.to_string_lossy().into_owned())
        .collect();
    paths.sort();
    assert_eq!(
        paths,
        vec![
            "2019/summer/beach.jpg",
            "2019/summer/notes.txt",
            "2020/index.html"
        ]
    );

    // Empty source directories contain no files and so do not appear.
    let root = built.tree.root();
    assert!(root.iter().all(|entry| entry.kind == EntryKind::Directory));
    assert!(!built.tree.is_dir(Path::new("empty")));
}

#[test]
fn test_artifact_named_by_source_hash() {
    let src = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    let original = write_jpeg(src.path(), "pic.jpg", 2400, 1600, 9);

    let service = service(src.path(), cache.path(), CountingTranscoder::new());
    service.build_tree().unwrap();

    let hex = ContentHash::of(&original).to_hex();
    assert_eq!(hex.len(), 64);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    let artifact = cache.path().join(format!("{hex}.jpg"));
    assert_eq!(jpeg_dimensions(&fs::read(artifact).unwrap()), (2000, 1333));
}

#[test]
fn test_source_timestamps_and_permissions_kept() {
    let src = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    write_jpeg(src.path(), "pic.jpg", 100, 100, 0);
    let source_meta = fs::metadata(src.path().join("pic.jpg")).unwrap();

    let built = service(src.path(), cache.path(), CountingTranscoder::new())
        .build_tree()
        .unwrap();
    let attrs = built.tree.lookup(Path::new("pic.jpg")).unwrap().attributes();

    assert_eq!(attrs.mtime, source_meta.modified().unwrap());
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        assert_eq!(attrs.mode, source_meta.mode());
        assert_eq!(attrs.uid, source_meta.uid());
    }
    assert_eq!(attrs.crtime, attrs.ctime);
}

#[test]
fn test_inode_table_over_built_tree() {
    let src = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    write_file(src.path(), "a/one.txt", b"1");
    write_file(src.path(), "b.txt", b"2");

    let built = service(src.path(), cache.path(), CountingTranscoder::new())
        .build_tree()
        .unwrap();
    let inodes = InodeTable::from_tree(&built.tree);

    assert_eq!(inodes.len(), 4);
    let a = inodes.lookup(ROOT_INODE, OsStr::new("a")).unwrap();
    assert!(inodes.lookup(a, OsStr::new("one.txt")).is_some());
    assert!(inodes.lookup(ROOT_INODE, OsStr::new("one.txt")).is_none());
}

#[cfg(unix)]
#[test]
fn test_unreadable_entry_does_not_hide_others() {
    let src = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    for i in 0..5 {
        write_file(src.path(), &format!("file{i}.txt"), b"x");
    }
    std::os::unix::fs::symlink(src.path().join("nowhere"), src.path().join("dangling.txt"))
        .unwrap();

    let built = service(src.path(), cache.path(), CountingTranscoder::new())
        .build_tree()
        .unwrap();

    assert_eq!(built.tree.len(), 5);
    assert_eq!(built.report.skipped, 1);
    assert!(built.tree.lookup(Path::new("dangling.txt")).is_none());
}

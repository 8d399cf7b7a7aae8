//! Rename Integration Tests
//!
//! Matching downloaded files by identifier, copying and renaming them.

mod common;

use common::{file_names, touch};
use filetime::FileTime;
use grayjay_export::core::renamer::rename_matches;
use grayjay_export::ProjectedVideo;
use tempfile::TempDir;

fn dirs() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("downloads");
    let dest = temp.path().join("music");
    std::fs::create_dir_all(&source).unwrap();
    std::fs::create_dir_all(&dest).unwrap();
    (temp, source, dest)
}

#[test]
fn test_copy_and_rename_single_match() {
    let (_temp, source, dest) = dirs();
    let original = touch(&source, "abc123_raw.webma", b"webm audio");
    let mtime_before = FileTime::from_last_modification_time(&std::fs::metadata(&original).unwrap());

    let videos = vec![ProjectedVideo::new("My:Song", "abc123")];
    let report = rename_matches(&videos, &source, &dest).unwrap();

    assert_eq!(file_names(&dest), vec!["My_Song.webma"]);
    assert_eq!(report.copied.len(), 1);
    assert_eq!(report.copied[0].source, original);
    assert_eq!(report.copied[0].destination, dest.join("My_Song.webma"));
    assert_eq!(std::fs::read(dest.join("My_Song.webma")).unwrap(), b"webm audio");

    // Source untouched
    assert_eq!(file_names(&source), vec!["abc123_raw.webma"]);
    assert_eq!(std::fs::read(&original).unwrap(), b"webm audio");
    let mtime_after = FileTime::from_last_modification_time(&std::fs::metadata(&original).unwrap());
    assert_eq!(mtime_before, mtime_after);
}

#[test]
fn test_substring_matches_overwrite_last_writer_wins() {
    let (_temp, source, dest) = dirs();
    touch(&source, "file_12.webma", b"first");
    touch(&source, "file_123.webma", b"second");

    let videos = vec![ProjectedVideo::new("Twelve", "12")];
    let report = rename_matches(&videos, &source, &dest).unwrap();

    // Both match; sorted listing means file_123 is copied last
    assert_eq!(report.copied.len(), 2);
    assert_eq!(file_names(&dest), vec!["Twelve.webma"]);
    assert_eq!(std::fs::read(dest.join("Twelve.webma")).unwrap(), b"second");
    assert_eq!(file_names(&source).len(), 2);
}

#[test]
fn test_multiple_videos_and_extensions() {
    let (_temp, source, dest) = dirs();
    touch(&source, "aaa.webma", b"a");
    touch(&source, "bbb.mp4a", b"b");
    touch(&source, "ccc.webma", b"c");

    let videos = vec![
        ProjectedVideo::new("Alpha", "aaa"),
        ProjectedVideo::new("Beta?", "bbb"),
        ProjectedVideo::new("Missing", "zzz"),
    ];
    let report = rename_matches(&videos, &source, &dest).unwrap();

    assert_eq!(file_names(&dest), vec!["Alpha.webma", "Beta_.mp4a"]);
    assert_eq!(report.unmatched, 1);
    assert_eq!(report.skipped, 0);
}

#[test]
fn test_no_temporary_files_left_behind() {
    let (_temp, source, dest) = dirs();
    for i in 0..5 {
        touch(&source, &format!("id{}.webma", i), b"x");
    }

    let videos: Vec<_> = (0..5)
        .map(|i| ProjectedVideo::new(format!("Song {}", i), format!("id{}", i)))
        .collect();
    rename_matches(&videos, &source, &dest).unwrap();

    let names = file_names(&dest);
    assert_eq!(names.len(), 5);
    assert!(names.iter().all(|n| n.starts_with("Song ")));
}

#[cfg(unix)]
#[test]
fn test_non_utf8_source_name_is_copied() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let (_temp, source, dest) = dirs();
    let original = source.join(OsStr::from_bytes(b"abc123_\xff.webma"));
    std::fs::write(&original, b"raw bytes name").unwrap();

    let videos = vec![ProjectedVideo::new("Song", "abc123")];
    let report = rename_matches(&videos, &source, &dest).unwrap();

    assert!(report.failed.is_empty());
    assert_eq!(report.copied.len(), 1);
    assert_eq!(report.copied[0].source, original);
    assert_eq!(file_names(&dest), vec!["Song.webma"]);
    assert_eq!(std::fs::read(dest.join("Song.webma")).unwrap(), b"raw bytes name");
    assert!(original.exists());
}

#[cfg(unix)]
#[test]
fn test_copy_keeps_source_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, source, dest) = dirs();
    let readable = touch(&source, "abc123.webma", b"a");
    let private = touch(&source, "def456.webma", b"b");
    std::fs::set_permissions(&readable, std::fs::Permissions::from_mode(0o644)).unwrap();
    std::fs::set_permissions(&private, std::fs::Permissions::from_mode(0o600)).unwrap();

    let videos = vec![
        ProjectedVideo::new("Shared", "abc123"),
        ProjectedVideo::new("Private", "def456"),
    ];
    rename_matches(&videos, &source, &dest).unwrap();

    let mode = |name: &str| std::fs::metadata(dest.join(name)).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode("Shared.webma"), 0o644);
    assert_eq!(mode("Private.webma"), 0o600);
}

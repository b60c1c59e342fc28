//! Integration tests for the INI store, exercising files on disk through the
//! public API together with the shared diagnostics context.

use std::fs;
use std::path::PathBuf;

use keybind_core::{ConfigFile, Diagnostics, IniDocument, IniError};
use uuid::Uuid;

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("keybind_ini_it_{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn test_settings_ini_created_written_disabled_and_reactivated() {
    // Arrange
    let dir = temp_dir();
    let path = dir.join("settings.ini");
    let diagnostics = Diagnostics::new();

    // Act / Assert: opening a missing file creates it empty
    let mut ini = ConfigFile::open(&path, &diagnostics);
    assert!(ini.section_names().is_empty());
    assert_eq!(fs::read(&path).unwrap(), b"");
    assert_eq!(diagnostics.last_error().unwrap().kind, "FileMissing");

    // Act / Assert: first write
    assert_eq!(ini.write("Audio", "SFX", "1"), 1);
    assert_eq!(fs::read(&path).unwrap(), b"[Audio]\r\nSFX=1\r\n");

    // Act / Assert: soft delete
    assert_eq!(ini.comment_out("Audio", "SFX", "1"), 1);
    assert_eq!(fs::read(&path).unwrap(), b"[Audio]\r\n;SFX=1\r\n");

    // Act / Assert: reactivated in place, not duplicated
    assert_eq!(ini.write("Audio", "SFX", "0"), 1);
    assert_eq!(fs::read(&path).unwrap(), b"[Audio]\r\nSFX=0\r\n");
    assert_eq!(ini.read("Audio", "SFX", "none"), "0");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_settings_ini_soft_delete_and_restore() {
    // Arrange
    let dir = temp_dir();
    let path = dir.join("settings.ini");
    fs::write(&path, b"[Audio]\r\nSFX=1\r\n").unwrap();
    let diagnostics = Diagnostics::new();
    let mut ini = ConfigFile::open(&path, &diagnostics);

    // Act
    ini.comment_out("Audio", "SFX", "0");
    let after_comment = fs::read(&path).unwrap();
    ini.write("Audio", "SFX", "0");
    let after_write = fs::read(&path).unwrap();

    // Assert
    assert_eq!(after_comment, b"[Audio]\r\n;SFX=1\r\n");
    assert_eq!(after_write, b"[Audio]\r\nSFX=0\r\n");
    assert!(!diagnostics.has_error());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_reopening_a_written_file_reads_back_values() {
    let dir = temp_dir();
    let path = dir.join("Game.ini");
    let diagnostics = Diagnostics::new();

    {
        let mut ini = ConfigFile::open(&path, &diagnostics);
        ini.write("Game", "Title", "Dwarven Mine");
        ini.write("Game", "Scale", 2);
        ini.comment_out("Game", "Fullscreen", 1);
    }
    diagnostics.flush_error();
    let ini = ConfigFile::open(&path, &diagnostics);

    assert!(!diagnostics.has_error());
    assert_eq!(ini.read("Game", "Title", ""), "Dwarven Mine");
    assert_eq!(ini.read("Game", "Scale", "1"), "2");
    assert_eq!(ini.read("Game", "Fullscreen", "0"), "0");
    assert_eq!(ini.section_names(), vec!["Game".to_string()]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_diagnostics_follow_the_last_opened_file() {
    // Arrange
    let dir = temp_dir();
    let diagnostics = Diagnostics::new();

    // Act
    let _first = ConfigFile::open(dir.join("a.ini"), &diagnostics);
    let second = ConfigFile::open(dir.join("b.ini"), &diagnostics);

    // Assert
    assert_eq!(diagnostics.last_opened().unwrap(), dir.join("b.ini"));
    assert_eq!(second.path(), dir.join("b.ini"));
    let message = diagnostics.error_message();
    assert!(message.starts_with("FileMissing\n"));
    assert!(message.contains("b.ini file could not be found!"));
    assert!(message.ends_with("Backtrace:\nConfigFile::open"));

    diagnostics.flush_error();
    assert_eq!(
        diagnostics.error_message(),
        "NoError\nEverything is working fine.\n"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_last_opened_without_any_file_is_an_error() {
    let diagnostics = Diagnostics::new();
    let err = diagnostics.last_opened().unwrap_err();
    assert!(matches!(err, IniError::NothingOpened));
    assert_eq!(
        err.to_string(),
        "Failed to load INI data!\nDid you forget to open that file first?"
    );
}

#[test]
fn test_document_api_works_without_a_file() {
    let mut doc = IniDocument::parse("[Video]\nWidth=640\n");
    doc.set("Video", "Height", "480");
    assert_eq!(doc.render(), "[Video]\r\nWidth=640\nHeight=480\r\n");
}

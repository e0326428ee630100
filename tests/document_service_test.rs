//! Tests for DocumentService and the Viewer session

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use qlist::application::services::DocumentService;
use qlist::application::{ApplicationError, TreeDataSource, Viewer};
use qlist::domain::DocumentShape;
use qlist::infrastructure::traits::{FileSystem, RealFileSystem};

const DICT_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleName</key>
    <string>Demo</string>
    <key>LSRequiresIPhoneOS</key>
    <true/>
    <key>UIRequiredDeviceCapabilities</key>
    <array>
        <string>armv7</string>
        <string>metal</string>
    </array>
</dict>
</plist>
"#;

const ARRAY_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<array>
    <integer>1</integer>
    <dict>
        <key>name</key>
        <string>second</string>
    </dict>
</array>
</plist>
"#;

/// Helper to create temp plist files for testing
fn create_plist_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write plist file");
    path
}

fn service() -> DocumentService {
    DocumentService::new(Arc::new(RealFileSystem), vec!["plist".into()])
}

/// In-memory filesystem keyed by path.
#[derive(Default)]
struct MemoryFileSystem {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryFileSystem {
    fn with_file(mut self, path: &str, content: &[u8]) -> Self {
        self.files.insert(PathBuf::from(path), content.to_vec());
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "missing"))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(path.to_path_buf())
    }
}

#[test]
fn given_dictionary_plist_when_opening_then_root_children_match_top_level_keys() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_plist_file(&temp, "Info.plist", DICT_PLIST.as_bytes());

    // Act
    let document = service().open(&path).unwrap();

    // Assert
    assert_eq!(document.shape(), DocumentShape::Dictionary);
    assert_eq!(
        document.children_keys(""),
        ["CFBundleName", "LSRequiresIPhoneOS", "UIRequiredDeviceCapabilities"]
    );
    assert_eq!(
        document.children_keys("UIRequiredDeviceCapabilities"),
        ["UIRequiredDeviceCapabilities/0", "UIRequiredDeviceCapabilities/1"]
    );
    assert!(document.source().is_some());
}

#[test]
fn given_array_plist_when_opening_then_falls_back_to_array_shape() {
    let temp = TempDir::new().unwrap();
    let path = create_plist_file(&temp, "list.plist", ARRAY_PLIST.as_bytes());

    let document = service().open(&path).unwrap();

    assert_eq!(document.shape(), DocumentShape::Array);
    assert_eq!(document.entry_count(), 2);
    assert_eq!(document.row("").value, "2 items");
    assert_eq!(document.row("1/name").value, "second");
}

#[test]
fn given_binary_plist_when_opening_then_decodes_like_xml() {
    // Arrange: re-encode the XML fixture as a binary plist
    let value = plist::Value::from_reader_xml(DICT_PLIST.as_bytes()).unwrap();
    let mut binary = Vec::new();
    value.to_writer_binary(&mut binary).unwrap();
    let temp = TempDir::new().unwrap();
    let path = create_plist_file(&temp, "binary.plist", &binary);

    // Act
    let document = service().open(&path).unwrap();

    // Assert
    assert_eq!(document.shape(), DocumentShape::Dictionary);
    assert_eq!(document.row("LSRequiresIPhoneOS").value, "true");
    assert_eq!(document.row("UIRequiredDeviceCapabilities").value, "2 items");
}

#[test]
fn given_missing_file_when_opening_then_not_found() {
    let temp = TempDir::new().unwrap();
    let err = service().open(&temp.path().join("nope.plist")).unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[test]
fn given_directory_when_opening_then_not_a_file() {
    let temp = TempDir::new().unwrap();
    let err = service().open(temp.path()).unwrap_err();
    assert!(matches!(err, ApplicationError::NotAFile(_)));
}

#[test]
fn given_non_plist_bytes_when_opening_then_decode_failure_lists_both_attempts() {
    let fs = MemoryFileSystem::default().with_file("/docs/bad.plist", b"<html></html>");
    let service = DocumentService::new(Arc::new(fs), vec!["plist".into()]);

    let err = service.open(Path::new("/docs/bad.plist")).unwrap_err();

    match err {
        ApplicationError::DecodeFailure { attempts } => {
            let shapes: Vec<_> = attempts.iter().map(|a| a.shape).collect();
            assert_eq!(shapes, [DocumentShape::Dictionary, DocumentShape::Array]);
        }
        other => panic!("expected decode failure, got {other:?}"),
    }
}

#[test]
fn given_unknown_extension_when_opening_then_still_decodes() {
    let fs = MemoryFileSystem::default().with_file("/docs/settings.xml", ARRAY_PLIST.as_bytes());
    let service = DocumentService::new(Arc::new(fs), vec!["plist".into()]);

    assert!(!service.has_known_extension(Path::new("/docs/settings.xml")));
    assert!(service.has_known_extension(Path::new("/docs/Info.PLIST")));
    let document = service.open(Path::new("/docs/settings.xml")).unwrap();
    assert_eq!(document.shape(), DocumentShape::Array);
}

#[test]
fn given_loaded_viewer_when_open_fails_then_previous_document_stays_visible() {
    // Arrange
    let fs = MemoryFileSystem::default()
        .with_file("/a.plist", DICT_PLIST.as_bytes())
        .with_file("/broken.plist", b"not a plist at all {");
    let service = DocumentService::new(Arc::new(fs), vec!["plist".into()]);
    let mut viewer = Viewer::new();
    viewer.open(&service, Path::new("/a.plist")).unwrap();

    // Act
    let result = viewer.open(&service, Path::new("/broken.plist"));

    // Assert
    assert!(result.is_err());
    assert_eq!(viewer.title().as_deref(), Some("/a.plist"));
    assert_eq!(viewer.row("CFBundleName").value, "Demo");
}

#[test]
fn given_two_documents_when_reloading_then_no_node_from_first_remains() {
    let fs = MemoryFileSystem::default()
        .with_file("/a.plist", DICT_PLIST.as_bytes())
        .with_file("/b.plist", ARRAY_PLIST.as_bytes());
    let service = DocumentService::new(Arc::new(fs), vec!["plist".into()]);
    let mut viewer = Viewer::new();

    viewer.open(&service, Path::new("/a.plist")).unwrap();
    let paths_in_a = ["CFBundleName", "UIRequiredDeviceCapabilities/1"];
    for path in paths_in_a {
        assert!(!viewer.row(path).is_placeholder());
    }

    viewer.open(&service, Path::new("/b.plist")).unwrap();
    for path in paths_in_a {
        assert!(viewer.row(path).is_placeholder(), "{path} still resolves");
    }
    assert_eq!(viewer.title().as_deref(), Some("/b.plist"));
}

#[test]
fn given_document_when_publishing_then_previous_is_returned() {
    let service = service();
    let first = service.decode(DICT_PLIST.as_bytes()).unwrap();
    let second = service.decode(ARRAY_PLIST.as_bytes()).unwrap();
    let mut viewer = Viewer::new();

    assert!(viewer.publish(first).is_none());
    let previous = viewer.publish(second).unwrap();

    assert_eq!(previous.shape(), DocumentShape::Dictionary);
    assert_eq!(viewer.current().unwrap().shape(), DocumentShape::Array);
    assert!(viewer.close().is_some());
    assert!(!viewer.is_loaded());
}

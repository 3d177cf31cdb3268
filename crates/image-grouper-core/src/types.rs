use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Anything that can hand out a fresh reader over its bytes.
///
/// The grouping operations never resolve names themselves: callers map their
/// own addressing (paths, uploaded blobs) onto a `ByteSource` first. Sources
/// are shared between fingerprinting threads, hence the `Sync` bound.
pub trait ByteSource: Sync {
    /// Open a new reader positioned at the first byte
    fn open(&self) -> io::Result<Box<dyn Read + '_>>;
}

impl ByteSource for Path {
    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(self)?))
    }
}

impl ByteSource for PathBuf {
    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        self.as_path().open()
    }
}

impl ByteSource for [u8] {
    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(self))
    }
}

impl ByteSource for Vec<u8> {
    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        self.as_slice().open()
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &T {
    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        (**self).open()
    }
}

/// One input to a grouping call: the caller's identifier plus its bytes
#[derive(Debug, Clone)]
pub struct SourceItem<S> {
    /// Identifier echoed back in groups, matches and errors
    pub id: String,

    /// Where the bytes come from
    pub source: S,
}

impl<S> SourceItem<S> {
    pub fn new(id: impl Into<String>, source: S) -> Self {
        Self {
            id: id.into(),
            source,
        }
    }
}

impl SourceItem<PathBuf> {
    /// Use the path itself as the identifier
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            id: path.display().to_string(),
            source: path,
        }
    }
}

/// A single item that could not be fingerprinted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingError {
    /// Identifier of the failed item
    pub identifier: String,

    /// Human readable cause
    pub message: String,
}

impl ProcessingError {
    pub fn new(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn read_all(source: &dyn ByteSource) -> Vec<u8> {
        let mut buf = Vec::new();
        source.open().unwrap().read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_slice_and_vec_sources() {
        let bytes = vec![1u8, 2, 3];
        assert_eq!(read_all(&bytes), vec![1, 2, 3]);
        assert_eq!(read_all(&&bytes[..2]), vec![1, 2]);
    }

    #[test]
    fn test_sources_reopen_from_start() {
        let bytes = b"abc".to_vec();
        assert_eq!(read_all(&bytes), read_all(&bytes));
    }

    #[test]
    fn test_path_source() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"image bytes").unwrap();

        let path = file.path().to_path_buf();
        assert_eq!(read_all(&path), b"image bytes".to_vec());
    }

    #[test]
    fn test_missing_path_fails_on_open() {
        let path = PathBuf::from("/path/that/does/not/exist.jpg");
        assert!(path.open().is_err());
    }

    #[test]
    fn test_item_from_path_uses_display_name() {
        let item = SourceItem::from_path("photos/a.jpg");
        assert_eq!(item.id, "photos/a.jpg");
        assert_eq!(item.source, PathBuf::from("photos/a.jpg"));
    }
}

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions treated as images when walking directories
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp"];

/// True when the extension is one of [`IMAGE_EXTENSIONS`], ignoring case
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Resolve command line arguments into an ordered list of files.
///
/// Files named explicitly are kept whatever their extension, so the core can
/// report them if they turn out not to be images. Directories are walked in
/// file-name order and only image files are kept. A path that does not exist
/// is an error.
pub fn expand_paths(paths: &[PathBuf], max_depth: Option<usize>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            bail!("Path does not exist: {}", path.display());
        }

        if path.is_file() {
            files.push(path.clone());
            continue;
        }

        let walker = WalkDir::new(path)
            .max_depth(max_depth.unwrap_or(usize::MAX))
            .sort_by_file_name();

        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() && is_image_path(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    fn create_test_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap().write_all(b"not decoded").unwrap();
        path
    }

    fn photo_tree() -> (tempfile::TempDir, Vec<PathBuf>) {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("holiday");
        fs::create_dir(&nested).unwrap();

        let files = vec![
            create_test_file(dir.path(), "cat.jpg"),
            create_test_file(dir.path(), "dog.PNG"),
            create_test_file(&nested, "beach.webp"),
        ];
        create_test_file(dir.path(), "notes.txt");

        (dir, files)
    }

    #[test]
    fn test_is_image_path() {
        for name in ["a.jpg", "b.JPEG", "c.tiff", "d.webp"] {
            assert!(is_image_path(Path::new(name)), "{}", name);
        }
        for name in ["a.txt", "noext", "archive.jpg.zip"] {
            assert!(!is_image_path(Path::new(name)), "{}", name);
        }
    }

    #[test]
    fn test_expand_directory() {
        let (dir, files) = photo_tree();

        let found = expand_paths(&[dir.path().to_path_buf()], None).unwrap();

        assert_eq!(found.len(), 3);
        for file in &files {
            assert!(found.contains(file));
        }
        assert!(!found.contains(&dir.path().join("notes.txt")));
    }

    #[test]
    fn test_expand_with_depth_limit() {
        let (dir, _) = photo_tree();

        let found = expand_paths(&[dir.path().to_path_buf()], Some(1)).unwrap();

        assert_eq!(found.len(), 2);
        for file in &found {
            assert_eq!(file.parent().unwrap(), dir.path());
        }
    }

    #[test]
    fn test_explicit_file_kept_regardless_of_extension() {
        let (dir, _) = photo_tree();
        let doc = dir.path().join("notes.txt");

        let found = expand_paths(&[doc.clone()], None).unwrap();

        assert_eq!(found, vec![doc]);
    }

    #[test]
    fn test_order_is_stable() {
        let (dir, _) = photo_tree();
        let root = dir.path().to_path_buf();

        let first = expand_paths(&[root.clone()], None).unwrap();
        let second = expand_paths(&[root], None).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_path_is_error() {
        let result = expand_paths(&[PathBuf::from("/path/that/does/not/exist")], None);
        assert!(result.is_err());
    }
}

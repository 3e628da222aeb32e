//! Override layer: serve files from a real directory when present.
//!
//! Useful during development: point the override at the asset source tree and
//! edits show up without rebuilding, while anything missing on disk still
//! comes from the embedded data.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{trace, warn};

use super::FileSystem;
use crate::error::{FsError, Result};
use crate::file::{DiskFile, File};
use crate::store::clean_path;

/// Wrap `fs` so a real directory takes precedence over embedded data.
///
/// If `fs` is already overridden it is returned unchanged.
///
/// # Example
///
/// ```ignore
/// let fs = Config::new(PayloadStore::from_static_bytes(ASSETS), false).build();
/// let fs = if cfg!(debug_assertions) { override_with("assets", fs)? } else { fs };
/// ```
pub fn override_with(
    root: impl AsRef<Path>,
    fs: Box<dyn FileSystem>,
) -> Result<Box<dyn FileSystem>> {
    let root = root.as_ref();
    if let Some(existing) = fs.override_root() {
        if existing != root {
            warn!(
                existing = %existing.display(),
                requested = %root.display(),
                "filesystem already overridden, keeping existing directory"
            );
        }
        return Ok(fs);
    }
    Ok(Box::new(OverrideFs::new(root, fs)?))
}

/// Filesystem that prefers files under `root` over the wrapped backend.
pub struct OverrideFs<F = Box<dyn FileSystem>> {
    root: PathBuf,
    inner: F,
}

impl<F> std::fmt::Debug for OverrideFs<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideFs").field("root", &self.root).finish_non_exhaustive()
    }
}

impl<F: FileSystem> OverrideFs<F> {
    /// Wrap `inner`, checking that `root` is an existing directory.
    ///
    /// Unlike [`override_with`], this always creates a new layer.
    pub fn new(root: impl Into<PathBuf>, inner: F) -> Result<Self> {
        let root = root.into();
        let metadata = fs::metadata(&root).map_err(|source| FsError::OverrideRoot {
            path: root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(FsError::NotADirectory { path: root });
        }
        Ok(Self { root, inner })
    }

    /// Override directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Wrapped backend.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Map a logical path below `root`.
    ///
    /// Returns `None` for paths that would leave the directory.
    fn real_path(&self, name: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for part in name.split('/') {
            if part.is_empty() || part == "." {
                continue;
            }
            let mut components = Path::new(part).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(part)), None) => path.push(part),
                _ => return None,
            }
        }
        Some(path)
    }
}

impl<F: FileSystem> FileSystem for OverrideFs<F> {
    fn open(&self, path: &str) -> Result<File> {
        let name = clean_path(path);
        let Some(real) = self.real_path(name) else {
            trace!(path = name, "path escapes override directory, using embedded data");
            return self.inner.open(name);
        };

        match fs::File::open(&real) {
            Ok(file) => match DiskFile::new(name, real.clone(), file) {
                Ok(disk) => Ok(File::Disk(disk)),
                Err(source) => Err(FsError::Io { path: real, source }),
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                trace!(path = name, "not in override directory, using embedded data");
                self.inner.open(name)
            }
            Err(source) => Err(FsError::Io { path: real, source }),
        }
    }

    fn preload(&self) -> Result<Box<dyn FileSystem>> {
        let inner = self.inner.preload()?;
        Ok(Box::new(OverrideFs {
            root: self.root.clone(),
            inner,
        }))
    }

    fn override_root(&self) -> Option<&Path> {
        Some(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::EagerFs;
    use crate::store::Content;
    use rustc_hash::FxHashMap;
    use tempfile::TempDir;

    fn embedded() -> Box<dyn FileSystem> {
        let mut files = FxHashMap::default();
        files.insert("f.txt".to_string(), Content::Static(b"embedded"));
        files.insert("only/embedded.txt".to_string(), Content::Static(b"inner only"));
        files.insert("f.txt/child".to_string(), Content::Static(b"unreachable"));
        Box::new(EagerFs::new(files))
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = OverrideFs::new(dir.path().join("absent"), embedded()).unwrap_err();
        match err {
            FsError::OverrideRoot { source, .. } => assert_eq!(source.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_file_root_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            override_with(&file, embedded()),
            Err(FsError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_disk_takes_precedence_then_falls_back() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("f.txt");
        fs::write(&real, "from disk").unwrap();

        let vfs = override_with(dir.path(), embedded()).unwrap();
        let file = vfs.open("/f.txt").unwrap();
        assert!(file.is_disk());
        assert_eq!(file.size(), 9);
        assert_eq!(vfs.read_file("f.txt").unwrap(), b"from disk");

        fs::remove_file(&real).unwrap();
        let file = vfs.open("f.txt").unwrap();
        assert!(!file.is_disk());
        assert_eq!(vfs.read_file("f.txt").unwrap(), b"embedded");
    }

    #[test]
    fn test_nested_paths_and_not_found() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("css/site.css"), "body{}").unwrap();

        let vfs = override_with(dir.path(), embedded()).unwrap();
        assert_eq!(vfs.read_file("css/site.css").unwrap(), b"body{}");
        assert_eq!(vfs.read_file("only/embedded.txt").unwrap(), b"inner only");
        assert!(vfs.open("nowhere.txt").unwrap_err().is_not_found());
    }

    #[test]
    fn test_parent_components_stay_inside_root() {
        let outer = TempDir::new().unwrap();
        let root = outer.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(outer.path().join("secret.txt"), "secret").unwrap();

        let vfs = override_with(&root, embedded()).unwrap();
        assert!(vfs.open("../secret.txt").unwrap_err().is_not_found());
    }

    #[cfg(unix)]
    #[test]
    fn test_other_os_errors_do_not_fall_through() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("f.txt"), "a file, not a directory").unwrap();

        // embedded data has "f.txt/child", but the OS error must win
        let vfs = override_with(dir.path(), embedded()).unwrap();
        let err = vfs.open("f.txt/child").unwrap_err();
        assert!(matches!(err, FsError::Io { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_preload_keeps_override() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("f.txt"), "from disk").unwrap();

        let vfs = override_with(dir.path(), embedded()).unwrap();
        let preloaded = vfs.preload().unwrap();
        assert_eq!(preloaded.override_root(), Some(dir.path()));
        assert_eq!(preloaded.read_file("f.txt").unwrap(), b"from disk");
        assert_eq!(preloaded.read_file("only/embedded.txt").unwrap(), b"inner only");
    }

    #[test]
    fn test_override_is_idempotent() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();

        let vfs = override_with(first.path(), embedded()).unwrap();
        let vfs = override_with(second.path(), vfs).unwrap();
        assert_eq!(vfs.override_root(), Some(first.path()));
    }
}

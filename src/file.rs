//! Opened file handles.
//!
//! Every `open` returns a fresh [`File`]. Embedded files are independent
//! cursors over shared immutable bytes, so concurrent handles to the same
//! path never see each other's position.

use std::fs;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::PathBuf;

use crate::store::Content;

// =============================================================================
// FileInfo
// =============================================================================

/// Name, size and kind of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Logical path for embedded files, file name for disk entries.
    pub name: String,
    /// Size in bytes (decoded length for embedded files).
    pub size: u64,
    /// Whether this entry is a directory. Never true for embedded files.
    pub is_dir: bool,
}

// =============================================================================
// MemoryFile - Embedded Data
// =============================================================================

/// Read-only handle over decoded embedded bytes.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    cursor: Cursor<Content>,
}

impl MemoryFile {
    /// Wrap decoded bytes in a new handle positioned at the start.
    pub fn new(name: impl Into<String>, data: Content) -> Self {
        Self {
            name: name.into(),
            cursor: Cursor::new(data),
        }
    }

    /// Logical path this handle was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total decoded length.
    pub fn size(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    /// Underlying bytes, independent of the cursor position.
    pub fn contents(&self) -> &[u8] {
        self.cursor.get_ref()
    }
}

impl Read for MemoryFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for MemoryFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

// =============================================================================
// DiskFile - Override Hit
// =============================================================================

/// Handle to a real file served by an override directory.
#[derive(Debug)]
pub struct DiskFile {
    name: String,
    path: PathBuf,
    file: fs::File,
    metadata: fs::Metadata,
}

impl DiskFile {
    pub(crate) fn new(name: impl Into<String>, path: PathBuf, file: fs::File) -> io::Result<Self> {
        let metadata = file.metadata()?;
        Ok(Self {
            name: name.into(),
            path,
            file,
            metadata,
        })
    }

    /// Logical path this handle was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Real path on disk.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Size reported by the OS at open time.
    pub fn size(&self) -> u64 {
        self.metadata.len()
    }

    /// Whether the override entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.metadata.is_dir()
    }

    /// List a directory's entries; empty for regular files.
    pub fn read_dir(&self) -> io::Result<Vec<FileInfo>> {
        if !self.is_dir() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            entries.push(FileInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                is_dir: metadata.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

impl Read for DiskFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for DiskFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

// =============================================================================
// File
// =============================================================================

/// A file opened from a [`FileSystem`](crate::FileSystem).
///
/// Closing is dropping.
#[derive(Debug)]
pub enum File {
    /// Embedded data.
    Memory(MemoryFile),
    /// Real file from an override directory.
    Disk(DiskFile),
}

impl File {
    /// Logical path this handle was opened with.
    pub fn name(&self) -> &str {
        match self {
            Self::Memory(f) => f.name(),
            Self::Disk(f) => f.name(),
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        match self {
            Self::Memory(f) => f.size(),
            Self::Disk(f) => f.size(),
        }
    }

    /// Embedded files are always leaves.
    pub fn is_dir(&self) -> bool {
        match self {
            Self::Memory(_) => false,
            Self::Disk(f) => f.is_dir(),
        }
    }

    /// Whether this handle was served from an override directory.
    pub fn is_disk(&self) -> bool {
        matches!(self, Self::Disk(_))
    }

    /// Describe this file.
    pub fn stat(&self) -> FileInfo {
        FileInfo {
            name: self.name().to_string(),
            size: self.size(),
            is_dir: self.is_dir(),
        }
    }

    /// Directory entries. Always empty for embedded files.
    pub fn read_dir(&self) -> io::Result<Vec<FileInfo>> {
        match self {
            Self::Memory(_) => Ok(Vec::new()),
            Self::Disk(f) => f.read_dir(),
        }
    }
}

impl Read for File {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Memory(f) => f.read(buf),
            Self::Disk(f) => f.read(buf),
        }
    }
}

impl Seek for File {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::Memory(f) => f.seek(pos),
            Self::Disk(f) => f.seek(pos),
        }
    }
}

impl From<MemoryFile> for File {
    fn from(file: MemoryFile) -> Self {
        Self::Memory(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn memory(data: &'static [u8]) -> File {
        MemoryFile::new("f.txt", Content::Static(data)).into()
    }

    #[test]
    fn test_seek_to_start_rereads_prefix() {
        let mut file = memory(b"0123456789");
        let mut head = [0u8; 4];
        file.read_exact(&mut head).unwrap();
        assert_eq!(&head, b"0123");

        assert_eq!(file.seek(SeekFrom::Start(0)).unwrap(), 0);
        let mut again = [0u8; 4];
        file.read_exact(&mut again).unwrap();
        assert_eq!(again, head);
    }

    #[test]
    fn test_seek_current_and_end() {
        let mut file = memory(b"0123456789");
        file.seek(SeekFrom::Start(2)).unwrap();
        assert_eq!(file.seek(SeekFrom::Current(3)).unwrap(), 5);
        assert_eq!(file.seek(SeekFrom::End(-2)).unwrap(), 8);

        let mut rest = Vec::new();
        file.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"89");
    }

    #[test]
    fn test_seek_before_start_fails() {
        let mut file = memory(b"abc");
        assert!(file.seek(SeekFrom::Current(-1)).is_err());
    }

    #[test]
    fn test_handles_are_independent() {
        let data = Content::from(b"shared".to_vec());
        let mut a = MemoryFile::new("x", data.clone());
        let mut b = MemoryFile::new("x", data);

        let mut buf = [0u8; 3];
        a.read_exact(&mut buf).unwrap();

        let mut all = Vec::new();
        b.read_to_end(&mut all).unwrap();
        assert_eq!(all, b"shared");
    }

    #[test]
    fn test_memory_stat() {
        let file = memory(b"12345");
        let info = file.stat();
        assert_eq!(info.name, "f.txt");
        assert_eq!(info.size, 5);
        assert!(!info.is_dir);
        assert!(file.read_dir().unwrap().is_empty());
    }

    #[test]
    fn test_disk_directory_listing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "bb").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let handle = fs::File::open(dir.path()).unwrap();
        let file = File::Disk(DiskFile::new("", dir.path().to_path_buf(), handle).unwrap());
        assert!(file.is_dir());

        let names: Vec<_> = file.read_dir().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }
}

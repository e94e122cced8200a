//! Byte sources - where container buffers come from.

use std::collections::HashMap;
use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::util::{Error, Result};

/// A fetched container buffer.
pub enum SourceBytes {
    /// Bytes read into memory
    Owned(Vec<u8>),
    /// Memory-mapped file (preferred for large files)
    Mapped(Mmap),
}

impl Deref for SourceBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Owned(bytes) => bytes,
            Self::Mapped(mmap) => mmap,
        }
    }
}

impl std::fmt::Debug for SourceBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Owned(_) => "Owned",
            Self::Mapped(_) => "Mapped",
        };
        write!(f, "SourceBytes::{kind}({} bytes)", self.len())
    }
}

/// Delivers the raw bytes of a container, or fails with [`Error::Fetch`].
pub trait ByteSource: Send + Sync {
    fn fetch(&self, src: &str) -> Result<SourceBytes>;
}

/// Reads containers from the filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: Option<PathBuf>,
    use_mmap: bool,
}

impl Default for FileSource {
    fn default() -> Self {
        Self { root: None, use_mmap: true }
    }
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative sources against `root`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Read files into memory instead of mapping them.
    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    fn resolve(&self, src: &str) -> PathBuf {
        match &self.root {
            Some(root) if Path::new(src).is_relative() => root.join(src),
            _ => PathBuf::from(src),
        }
    }
}

impl ByteSource for FileSource {
    fn fetch(&self, src: &str) -> Result<SourceBytes> {
        let path = self.resolve(src);
        let file = File::open(&path).map_err(|e| Error::fetch(src, e.to_string()))?;
        let size = file.metadata().map_err(|e| Error::fetch(src, e.to_string()))?.len();

        if self.use_mmap && size > 0 {
            // Safety: the file is opened read-only and the map lives only for this load
            let mmap = unsafe { Mmap::map(&file) }
                .map_err(|e| Error::fetch(src, format!("memory mapping failed: {e}")))?;
            tracing::trace!(path = %path.display(), size, "mapped container");
            return Ok(SourceBytes::Mapped(mmap));
        }

        let bytes = std::fs::read(&path).map_err(|e| Error::fetch(src, e.to_string()))?;
        Ok(SourceBytes::Owned(bytes))
    }
}

/// Serves containers from memory, keyed by source name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    buffers: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, src: impl Into<String>, bytes: Vec<u8>) -> &mut Self {
        self.buffers.insert(src.into(), bytes);
        self
    }
}

impl ByteSource for MemorySource {
    fn fetch(&self, src: &str) -> Result<SourceBytes> {
        self.buffers
            .get(src)
            .map(|bytes| SourceBytes::Owned(bytes.clone()))
            .ok_or_else(|| Error::fetch(src, "no such buffer"))
    }
}

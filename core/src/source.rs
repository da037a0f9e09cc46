//! Where document bytes come from.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use walkdir::WalkDir;

/// Lists the fixed set of document identifiers and fetches their bytes.
pub trait DocumentSource: Send + Sync {
    /// Human-readable location, e.g. the folder being served.
    fn describe(&self) -> String;
    fn list(&self) -> Result<Vec<String>>;
    fn fetch(&self, id: &str) -> Result<Vec<u8>>;
}

/// Every visible `*.pdf` directly inside a folder, sorted by path.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self { Self { root: root.as_ref().to_path_buf() } }
    pub fn root(&self) -> &Path { &self.root }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name().and_then(|s| s.to_str()).is_some_and(|name| name.starts_with('.'))
}

fn is_pdf(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()).is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

impl DocumentSource for DirectorySource {
    fn describe(&self) -> String { self.root.display().to_string() }

    fn list(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            bail!("PDF folder not found: {}", self.root.display());
        }
        let mut files: Vec<String> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_pdf(e.path()) && !is_hidden(e.path()))
            .map(|e| e.path().to_string_lossy().to_string())
            .collect();
        files.sort();
        Ok(files)
    }

    fn fetch(&self, id: &str) -> Result<Vec<u8>> {
        fs::read(id).with_context(|| format!("reading {id}"))
    }
}

/// An explicit list of files, kept in the configured order.
#[derive(Debug, Clone)]
pub struct StaticSource {
    paths: Vec<PathBuf>,
}

impl StaticSource {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self { paths: paths.into_iter().map(Into::into).collect() }
    }
}

impl DocumentSource for StaticSource {
    fn describe(&self) -> String { format!("{} configured files", self.paths.len()) }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.paths.iter().map(|p| p.to_string_lossy().to_string()).collect())
    }

    fn fetch(&self, id: &str) -> Result<Vec<u8>> {
        fs::read(id).with_context(|| format!("reading {id}"))
    }
}

/// Documents held in memory. Counts fetches so callers can observe them.
#[derive(Debug, Default)]
pub struct MemorySource {
    docs: Vec<(String, Vec<u8>)>,
    fetches: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, id: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.docs.push((id.into(), bytes.into()));
        self
    }

    pub fn fetch_count(&self) -> usize { self.fetches.load(Ordering::SeqCst) }
}

impl DocumentSource for MemorySource {
    fn describe(&self) -> String { "memory".to_string() }

    fn list(&self) -> Result<Vec<String>> { Ok(self.docs.iter().map(|(id, _)| id.clone()).collect()) }

    fn fetch(&self, id: &str) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.docs.iter().find(|(d, _)| d == id) {
            Some((_, bytes)) => Ok(bytes.clone()),
            None => bail!("no such document: {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn directory_lists_sorted_pdfs_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.pdf"), b"b").unwrap();
        fs::write(dir.path().join("a.PDF"), b"a").unwrap();
        fs::write(dir.path().join("notes.txt"), b"n").unwrap();
        fs::write(dir.path().join(".~lock.pdf"), b"l").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.pdf"), b"c").unwrap();

        let source = DirectorySource::new(dir.path());
        let ids = source.list().unwrap();
        let names: Vec<_> = ids.iter().map(|p| Path::new(p).file_name().unwrap().to_string_lossy().to_string()).collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
        assert_eq!(source.fetch(&ids[1]).unwrap(), b"b");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let source = DirectorySource::new("/definitely/not/here");
        let err = source.list().unwrap_err();
        assert!(err.to_string().contains("PDF folder not found"));
    }

    #[test]
    fn memory_source_counts_fetches() {
        let source = MemorySource::new().with("x.pdf", b"bytes".to_vec());
        assert_eq!(source.fetch_count(), 0);
        assert!(source.fetch("x.pdf").is_ok());
        assert!(source.fetch("y.pdf").is_err());
        assert_eq!(source.fetch_count(), 2);
    }
}

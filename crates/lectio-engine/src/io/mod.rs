//! Storage access for chapter content and note files.
//!
//! A [`Library`] is built once with an ordered list of [`Backend`]s (for
//! example a user data directory, then bundled sample data) and passed to
//! whatever needs chapter or note content. Each lookup tries the backends in
//! order and the first one holding the file wins.
//!
//! Layout, relative to each backend root:
//!
//! ```text
//! Scripture/{TRANSLATION}/{BOOK}.{CHAPTER}       chapter content (JSON)
//! notes/{GROUP}/{BOOK}/{CHAPTER}/{NOTE_ID}       one note binding per file
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use lectio_syntax::BookCode;
use log::debug;
use relative_path::{RelativePath, RelativePathBuf};

use crate::passage::{AnnotationBinding, Chapter, Token, flatten_chapter};

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Chapter not found: {translation} {book} {chapter}")]
    ChapterNotFound {
        translation: String,
        book: BookCode,
        chapter: u32,
    },
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// In-memory file tree keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    files: BTreeMap<RelativePathBuf, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl AsRef<RelativePath>, content: impl Into<String>) {
        self.files.insert(path.as_ref().normalize(), content.into());
    }

    pub fn with_file(mut self, path: impl AsRef<RelativePath>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    fn read(&self, path: &RelativePath) -> Option<&str> {
        self.files.get(&path.normalize()).map(String::as_str)
    }

    /// Files directly inside `dir`, or None when nothing lives under it.
    fn list(&self, dir: &RelativePath) -> Option<Vec<String>> {
        let dir = dir.normalize();
        let mut found = false;
        let mut names = Vec::new();
        for path in self.files.keys() {
            let Ok(rest) = path.strip_prefix(&dir) else {
                continue;
            };
            found = true;
            let mut components = rest.components();
            if let (Some(name), None) = (components.next(), components.next()) {
                names.push(name.as_str().to_string());
            }
        }
        found.then_some(names)
    }
}

/// Where a [`Library`] looks for files.
#[derive(Debug, Clone)]
pub enum Backend {
    Directory(PathBuf),
    Memory(MemoryBackend),
}

impl Backend {
    fn read(&self, path: &RelativePath) -> Result<Option<String>, LibraryError> {
        match self {
            Backend::Directory(root) => {
                let absolute = path.to_path(root);
                if !absolute.is_file() {
                    return Ok(None);
                }
                fs::read_to_string(&absolute)
                    .map(Some)
                    .map_err(|source| LibraryError::Io {
                        path: absolute.display().to_string(),
                        source,
                    })
            }
            Backend::Memory(memory) => Ok(memory.read(path).map(str::to_string)),
        }
    }

    fn list(&self, dir: &RelativePath) -> Result<Option<Vec<String>>, LibraryError> {
        match self {
            Backend::Directory(root) => {
                let absolute = dir.to_path(root);
                if !absolute.is_dir() {
                    return Ok(None);
                }
                list_directory(&absolute).map(Some)
            }
            Backend::Memory(memory) => Ok(memory.list(dir)),
        }
    }

    fn describe(&self) -> String {
        match self {
            Backend::Directory(root) => root.display().to_string(),
            Backend::Memory(_) => "memory".to_string(),
        }
    }
}

fn list_directory(dir: &Path) -> Result<Vec<String>, LibraryError> {
    let io_error = |source| LibraryError::Io {
        path: dir.display().to_string(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

/// Ordered set of storage backends for scripture and notes.
#[derive(Debug, Clone, Default)]
pub struct Library {
    backends: Vec<Backend>,
}

impl Library {
    pub fn new(backends: Vec<Backend>) -> Self {
        Self { backends }
    }

    pub fn backends(&self) -> &[Backend] {
        &self.backends
    }

    pub fn chapter_path(translation: &str, book: BookCode, chapter: u32) -> RelativePathBuf {
        RelativePathBuf::from(format!("Scripture/{translation}/{book}.{chapter}"))
    }

    pub fn notes_dir(group: &str, book: BookCode, chapter: u32) -> RelativePathBuf {
        RelativePathBuf::from(format!("notes/{group}/{book}/{chapter}"))
    }

    /// Read chapter content from the first backend that has it.
    pub fn load_chapter(
        &self,
        translation: &str,
        book: BookCode,
        chapter: u32,
    ) -> Result<Chapter, LibraryError> {
        let path = Self::chapter_path(translation, book, chapter);
        match self.read_first(&path)? {
            Some(content) => parse_json(&path, &content),
            None => Err(LibraryError::ChapterNotFound {
                translation: translation.to_string(),
                book,
                chapter,
            }),
        }
    }

    /// Load a chapter and flatten it into render-order tokens.
    pub fn load_tokens(
        &self,
        translation: &str,
        book: BookCode,
        chapter: u32,
    ) -> Result<Vec<Token>, LibraryError> {
        let content = self.load_chapter(translation, book, chapter)?;
        Ok(flatten_chapter(book, chapter, &content))
    }

    /// Read every note binding for a chapter, ordered by note id.
    ///
    /// Only the first backend holding the notes directory is used. No
    /// directory anywhere means no notes.
    pub fn load_notes(
        &self,
        group: &str,
        book: BookCode,
        chapter: u32,
    ) -> Result<Vec<AnnotationBinding>, LibraryError> {
        let dir = Self::notes_dir(group, book, chapter);

        for backend in &self.backends {
            let Some(mut names) = backend.list(&dir)? else {
                debug!("No notes at {dir} in {}", backend.describe());
                continue;
            };
            names.sort();

            let mut notes = Vec::with_capacity(names.len());
            for name in names {
                let path = dir.join(&name);
                let Some(content) = backend.read(&path)? else {
                    continue;
                };
                let binding: AnnotationBinding = parse_json(&path, &content)?;
                notes.push(binding.with_id(name));
            }
            return Ok(notes);
        }

        Ok(Vec::new())
    }

    fn read_first(&self, path: &RelativePath) -> Result<Option<String>, LibraryError> {
        for backend in &self.backends {
            if let Some(content) = backend.read(path)? {
                return Ok(Some(content));
            }
            debug!("{path} not found in {}, trying next backend", backend.describe());
        }
        Ok(None)
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(
    path: &RelativePath,
    content: &str,
) -> Result<T, LibraryError> {
    serde_json::from_str(content).map_err(|source| LibraryError::Json {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectio_syntax::BookTable;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn jhn() -> BookCode {
        BookTable::standard().code("JHN").unwrap()
    }

    fn create_test_file(dir: &TempDir, relative: &str, content: &str) {
        let path = RelativePath::new(relative).to_path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    const CHAPTER: &str = r#"{"16": {"type": "p", "content": "For God so loved the world"}}"#;

    #[test]
    fn loads_chapter_from_directory() {
        let dir = TempDir::new().unwrap();
        create_test_file(&dir, "Scripture/WEBBE/JHN.3", CHAPTER);
        let library = Library::new(vec![Backend::Directory(dir.path().to_path_buf())]);

        let tokens = library.load_tokens("WEBBE", jhn(), 3).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, "label p");
        assert_eq!(tokens[1].id.as_ref().map(|id| id.as_str()), Some("JHN.3.16"));
    }

    #[test]
    fn falls_through_to_later_backends() {
        let empty = TempDir::new().unwrap();
        let memory = MemoryBackend::new().with_file("Scripture/WEBBE/JHN.3", CHAPTER);
        let library = Library::new(vec![
            Backend::Directory(empty.path().to_path_buf()),
            Backend::Memory(memory),
        ]);

        assert!(library.load_chapter("WEBBE", jhn(), 3).is_ok());
    }

    #[test]
    fn first_backend_wins() {
        let first = MemoryBackend::new().with_file(
            "Scripture/WEBBE/JHN.3",
            r#"{"1": {"type": "", "content": "first"}}"#,
        );
        let second = MemoryBackend::new().with_file("Scripture/WEBBE/JHN.3", CHAPTER);
        let library = Library::new(vec![Backend::Memory(first), Backend::Memory(second)]);

        let tokens = library.load_tokens("WEBBE", jhn(), 3).unwrap();
        assert_eq!(tokens[1].content, "first");
    }

    #[test]
    fn missing_chapter_is_an_error() {
        let library = Library::new(vec![Backend::Memory(MemoryBackend::new())]);
        let result = library.load_chapter("WEBBE", jhn(), 99);
        assert!(matches!(
            result,
            Err(LibraryError::ChapterNotFound { chapter: 99, .. })
        ));
    }

    #[test]
    fn malformed_chapter_reports_path() {
        let memory = MemoryBackend::new().with_file("Scripture/WEBBE/JHN.3", "{not json");
        let library = Library::new(vec![Backend::Memory(memory)]);
        let err = library.load_chapter("WEBBE", jhn(), 3).unwrap_err();
        assert!(matches!(err, LibraryError::Json { .. }));
        assert!(err.to_string().contains("Scripture/WEBBE/JHN.3"));
    }

    #[test]
    fn notes_sorted_by_file_name_with_ids() {
        let dir = TempDir::new().unwrap();
        create_test_file(&dir, "notes/default/JHN/3/b-note", r#"{"tokens": ["JHN.3.17"]}"#);
        create_test_file(
            &dir,
            "notes/default/JHN/3/a-note",
            r#"{"tokens": ["JHN.3.16"], "contents": "love"}"#,
        );
        let library = Library::new(vec![Backend::Directory(dir.path().to_path_buf())]);

        let notes = library.load_notes("default", jhn(), 3).unwrap();
        let ids: Vec<&str> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a-note", "b-note"]);
        assert_eq!(notes[0].contents, "love");
    }

    #[test]
    fn notes_come_from_first_backend_with_directory() {
        let first = MemoryBackend::new().with_file("notes/g/JHN/3/one", r#"{"tokens": []}"#);
        let second = MemoryBackend::new()
            .with_file("notes/g/JHN/3/two", r#"{"tokens": []}"#)
            .with_file("notes/g/JHN/3/three", r#"{"tokens": []}"#);
        let library = Library::new(vec![Backend::Memory(first), Backend::Memory(second)]);

        let notes = library.load_notes("g", jhn(), 3).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "one");
    }

    #[test]
    fn memory_listing_skips_nested_entries() {
        let memory = MemoryBackend::new()
            .with_file("notes/g/JHN/3/one", "{}")
            .with_file("notes/g/JHN/3/sub/two", "{}");
        assert_eq!(
            memory.list(RelativePath::new("notes/g/JHN/3")),
            Some(vec!["one".to_string()])
        );
        assert_eq!(memory.list(RelativePath::new("notes/g/JHN/4")), None);
    }

    #[test]
    fn no_notes_anywhere_is_empty() {
        let library = Library::new(vec![Backend::Memory(MemoryBackend::new())]);
        assert_eq!(library.load_notes("g", jhn(), 3).unwrap(), vec![]);
    }
}

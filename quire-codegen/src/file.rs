//! Flushing root writers to disk.

use std::path::{Path, PathBuf};

use quire_core::{FileRules, GeneratedFile};

use crate::writer::Writer;

/// A root writer bound to the file it renders into.
///
/// The path is relative to the base directory passed to
/// [`GeneratedFile::write`].
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    writer: Writer,
    rules: FileRules,
}

impl SourceFile {
    pub fn new(writer: Writer) -> Self {
        Self {
            path: PathBuf::from(writer.path()),
            writer,
            rules: FileRules::default(),
        }
    }

    /// Only create the file when it does not exist yet.
    pub fn if_missing(mut self) -> Self {
        self.rules = FileRules::if_missing();
        self
    }

    pub fn writer(&self) -> &Writer {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut Writer {
        &mut self.writer
    }
}

impl GeneratedFile for SourceFile {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(&self.path)
    }

    fn rules(&self) -> FileRules {
        self.rules.clone()
    }

    fn render(&self) -> eyre::Result<String> {
        Ok(self.writer.render()?)
    }
}

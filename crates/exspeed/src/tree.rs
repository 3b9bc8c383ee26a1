//! Materialized program text.

use crate::emit::EmissionVariant;
use std::path::Path;

/// Role of a file inside a [`SourceTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// The `main` translation unit.
    Entry,
    /// The translation unit defining one node function.
    Node(u32),
    /// The shared header declaring every node function.
    Interface,
    /// The build system descriptor.
    BuildDescriptor,
}

impl FileKind {
    /// Whether the file is handed to the compiler as a translation unit.
    pub fn is_compile_unit(&self) -> bool {
        matches!(self, FileKind::Entry | FileKind::Node(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub kind: FileKind,
    pub contents: String,
}

/// One self-contained, independently buildable program.
///
/// Files are kept in emission order: entry point, nodes `0..=depth`, the
/// interface header, then the build descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    pub variant: EmissionVariant,
    pub executable: String,
    pub files: Vec<SourceFile>,
}

impl SourceTree {
    pub fn file(&self, name: &str) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn files_of(&self, kind: FileKind) -> impl Iterator<Item = &SourceFile> {
        self.files.iter().filter(move |f| f.kind == kind)
    }

    /// Entry point followed by every node file, in order.
    pub fn compile_units(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter().filter(|f| f.kind.is_compile_unit())
    }

    pub fn node_files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files
            .iter()
            .filter(|f| matches!(f.kind, FileKind::Node(_)))
    }

    pub fn node_count(&self) -> usize {
        self.node_files().count()
    }

    pub fn interface(&self) -> Option<&SourceFile> {
        self.files_of(FileKind::Interface).next()
    }

    pub fn build_descriptor(&self) -> Option<&SourceFile> {
        self.files_of(FileKind::BuildDescriptor).next()
    }

    /// Total size of all file contents in bytes.
    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.contents.len()).sum()
    }

    /// Write every file into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(dir)?;
        for file in &self.files {
            std::fs::write(dir.join(&file.name), &file.contents)?;
        }
        Ok(())
    }
}

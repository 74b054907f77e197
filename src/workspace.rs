//! Workspace — the set of loaded schema files and import resolution over it.
//!
//! The workspace is the "file database": it assigns stable [`FileId`]s to
//! paths and owns one [`ProtoFile`] tree per loaded file. Imports are
//! resolved as on-demand lookups into this mapping, never as ownership
//! transfer, so unloading a file cannot leave dangling owners elsewhere.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use thiserror::Error;

use crate::base::FileId;
use crate::model::descriptor::{DESCRIPTOR_PATH, descriptor_file};
use crate::model::{ImportDecl, ProtoFile, Syntax};

// ============================================================================
// IMPORT RESOLUTION
// ============================================================================

/// Classification of an import statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportKind {
    /// An ordinary file import, resolved through the workspace.
    Normal,
    /// An import of the built-in descriptor set; never resolved to a
    /// workspace file.
    Descriptor,
}

/// Resolves import statements to loaded files.
///
/// The resolution engine is written against this trait; [`Workspace`]
/// provides the default implementation. A language server can substitute its
/// own (e.g. to apply configured import roots) without touching the engine.
pub trait ImportResolver {
    /// Classify an import as a normal file import or a descriptor import.
    fn classify(&self, import: &ImportDecl) -> ImportKind;

    /// Resolve an import to a loaded file. `None` means the path does not
    /// resolve; the engine treats that as "contributes no candidates".
    fn resolve(&self, import: &ImportDecl) -> Option<FileId>;

    /// Whether the engine may walk this file. Files of another syntax level
    /// are treated the same as unresolved imports.
    fn is_supported_syntax(&self, file: &ProtoFile) -> bool;
}

// ============================================================================
// ERRORS
// ============================================================================

/// Errors raised by workspace registration.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorkspaceError {
    #[error("file id {0:?} is reserved for the built-in descriptor model")]
    ReservedFileId(FileId),

    #[error("file id {id:?} is already registered for `{existing}`")]
    FileIdInUse { id: FileId, existing: Arc<str> },
}

// ============================================================================
// WORKSPACE
// ============================================================================

/// Manages the mapping between file paths, [`FileId`]s and loaded models.
///
/// Re-inserting a file under the same path replaces the previous tree
/// (reparse semantics). Thread-safe via internal locking; a single `find`
/// call sees a consistent snapshot because file trees are immutable once
/// inserted.
#[derive(Debug, Default)]
pub struct Workspace {
    inner: RwLock<WorkspaceInner>,
}

#[derive(Debug, Default)]
struct WorkspaceInner {
    /// Path → FileId mapping
    path_to_id: IndexMap<Arc<str>, FileId>,
    /// FileId → loaded model
    files: IndexMap<FileId, Arc<ProtoFile>>,
    /// Next FileId to assign
    next_id: u32,
}

impl Workspace {
    /// Create a new empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a FileId for a path.
    ///
    /// If the path already has a FileId, returns it. Otherwise assigns a new
    /// one. The id is stable across reparses of the same path.
    pub fn file_id(&self, path: &str) -> FileId {
        // Fast path: read lock
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.path_to_id.get(path) {
                return id;
            }
        }

        // Slow path: write lock
        let mut inner = self.inner.write();

        // Double-check
        if let Some(&id) = inner.path_to_id.get(path) {
            return id;
        }

        let id = FileId::new(inner.next_id);
        inner.next_id += 1;
        inner.path_to_id.insert(Arc::from(path), id);
        id
    }

    /// Insert a loaded file model, replacing any previous model for the same
    /// path.
    pub fn insert(&self, file: ProtoFile) -> Result<Arc<ProtoFile>, WorkspaceError> {
        let id = file.id();
        if id == FileId::DESCRIPTOR {
            return Err(WorkspaceError::ReservedFileId(id));
        }

        let mut inner = self.inner.write();
        if let Some(existing) = inner.files.get(&id) {
            if existing.path() != file.path() {
                return Err(WorkspaceError::FileIdInUse {
                    id,
                    existing: Arc::from(existing.path()),
                });
            }
            tracing::debug!(path = file.path(), "replacing reparsed file model");
        }
        let path: Arc<str> = Arc::from(file.path());
        inner.path_to_id.insert(path, id);
        inner.next_id = inner.next_id.max(id.index() + 1);
        let file = Arc::new(file);
        inner.files.insert(id, file.clone());
        Ok(file)
    }

    /// Get the model for a file id.
    ///
    /// [`FileId::DESCRIPTOR`] always resolves to the built-in descriptor
    /// model, so descriptor-backed [`crate::resolve::SymbolDescription`]s
    /// can be dereferenced like any other.
    pub fn file(&self, id: FileId) -> Option<Arc<ProtoFile>> {
        if id == FileId::DESCRIPTOR {
            return Some(descriptor_file().clone());
        }
        self.inner.read().files.get(&id).cloned()
    }

    /// Get the model registered under a path.
    pub fn by_path(&self, path: &str) -> Option<Arc<ProtoFile>> {
        let inner = self.inner.read();
        let id = inner.path_to_id.get(path)?;
        inner.files.get(id).cloned()
    }

    /// Unload a file. Its id stays reserved for the path.
    pub fn remove(&self, id: FileId) {
        self.inner.write().files.swap_remove(&id);
    }

    /// Number of loaded files.
    pub fn len(&self) -> usize {
        self.inner.read().files.len()
    }

    /// Check if no files are loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all loaded files.
    pub fn files(&self) -> Vec<FileId> {
        self.inner.read().files.keys().copied().collect()
    }
}

impl ImportResolver for Workspace {
    fn classify(&self, import: &ImportDecl) -> ImportKind {
        if import.path == DESCRIPTOR_PATH {
            ImportKind::Descriptor
        } else {
            ImportKind::Normal
        }
    }

    fn resolve(&self, import: &ImportDecl) -> Option<FileId> {
        let inner = self.inner.read();
        let id = *inner.path_to_id.get(import.path.as_str())?;
        // A path whose model was unloaded is as unresolved as an unknown one.
        inner.files.contains_key(&id).then_some(id)
    }

    fn is_supported_syntax(&self, file: &ProtoFile) -> bool {
        file.syntax() == Syntax::Proto2
    }
}

//! Name resolution — finding the declarations a reference could bind to.
//!
//! The entry point is [`ModelElementFinder`]: given a start element (or a
//! file root) and a [`FinderStrategy`], it walks the local nesting hierarchy
//! and the import graph and returns every matching declaration as a deduped
//! set of [`SymbolDescription`]s.
//!
//! The engine is best-effort and total: unresolved imports and files of an
//! unsupported syntax level contribute zero candidates, and import cycles are
//! truncated instead of looping, because this backs always-on editor features
//! that must not crash on malformed input.

mod strategy;

pub use strategy::{EnumValueStrategy, FinderStrategy, OptionFieldStrategy, TypeNameStrategy};

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::base::FileId;
use crate::model::{ElementRef, ImportDecl, NodeId, PackageName, ProtoFile, are_related};
use crate::workspace::{ImportKind, ImportResolver, Workspace};

// ============================================================================
// SYMBOL DESCRIPTIONS
// ============================================================================

/// An immutable description of one reachable declaration.
///
/// Carries the qualified name under which the declaration was found, a weak
/// (lookup-only) reference to the element it describes, and the context the
/// matching strategy attached. Produced by the engine, never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolDescription {
    /// The qualified name the match was made under.
    pub qualified_name: SmolStr,
    /// The described element. Resolve through [`Workspace::file`].
    pub element: ElementRef,
    /// Nesting depth for same-file candidates (0 = top level of the scope
    /// the walk started from).
    pub level: Option<u32>,
    /// Package the declaration came from, for candidates found through an
    /// unrelated-package import.
    pub origin: Option<PackageName>,
}

impl SymbolDescription {
    /// A candidate found in the local scope walk.
    pub fn local(qualified_name: impl Into<SmolStr>, element: ElementRef, level: u32) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            element,
            level: Some(level),
            origin: None,
        }
    }

    /// A candidate found in an unrelated-package imported file.
    pub fn imported(
        qualified_name: impl Into<SmolStr>,
        element: ElementRef,
        origin: Option<PackageName>,
    ) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            element,
            level: None,
            origin,
        }
    }

    /// A candidate from the built-in descriptor model.
    pub fn descriptor(qualified_name: impl Into<SmolStr>, element: ElementRef) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            element,
            level: None,
            origin: None,
        }
    }
}

// ============================================================================
// DEDUP COLLECTOR
// ============================================================================

/// Collects descriptions, keeping one per described element.
///
/// Keyed by [`ElementRef`] — declaration identity, not name — so a
/// declaration reachable through several paths (directly imported and
/// re-exported, say) appears exactly once. Insertion order is irrelevant;
/// the first description for an element wins.
#[derive(Debug, Default)]
pub struct UniqueDescriptions {
    by_element: FxHashMap<ElementRef, SymbolDescription>,
}

impl UniqueDescriptions {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one description.
    pub fn add(&mut self, description: SymbolDescription) {
        self.by_element.entry(description.element).or_insert(description);
    }

    /// Add a batch of descriptions.
    pub fn add_all(&mut self, batch: impl IntoIterator<Item = SymbolDescription>) {
        for description in batch {
            self.add(description);
        }
    }

    /// Number of distinct elements collected.
    pub fn len(&self) -> usize {
        self.by_element.len()
    }

    /// Check if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.by_element.is_empty()
    }

    /// Consume the collector, yielding the deduped result set.
    pub fn into_values(self) -> Vec<SymbolDescription> {
        self.by_element.into_values().collect()
    }
}

// ============================================================================
// RESOLUTION ENGINE
// ============================================================================

/// The resolution engine.
///
/// Holds no state across calls; everything a single `find` needs (the dedup
/// collector, the visited-file set) is local to that call, so repeated calls
/// are independent and idempotent on an unchanged workspace.
pub struct ModelElementFinder<'a, R: ImportResolver + ?Sized = Workspace> {
    workspace: &'a Workspace,
    resolver: &'a R,
}

impl<'a> ModelElementFinder<'a> {
    /// Create a finder resolving imports through the workspace itself.
    pub fn new(workspace: &'a Workspace) -> Self {
        Self { workspace, resolver: workspace }
    }
}

impl<'a, R: ImportResolver + ?Sized> ModelElementFinder<'a, R> {
    /// Create a finder with a custom import resolver.
    pub fn with_resolver(workspace: &'a Workspace, resolver: &'a R) -> Self {
        Self { workspace, resolver }
    }

    /// Find every declaration visible from `start`'s position.
    ///
    /// Walks the ancestors of `start` (each ancestor scope including its
    /// nested containers, but not descendants of `start` itself), then the
    /// enclosing file's imports. Returns a deduped, possibly empty set.
    pub fn find_from<S: FinderStrategy>(
        &self,
        start: ElementRef,
        strategy: &S,
        criteria: &S::Criteria,
    ) -> Vec<SymbolDescription> {
        let Some(file) = self.workspace.file(start.file) else {
            tracing::debug!(file = ?start.file, "start element in unloaded file");
            return Vec::new();
        };
        let mut found = UniqueDescriptions::new();
        let mut current = file.parent(start.node);
        while let Some(ancestor) = current {
            self.local_scope(&file, ancestor, strategy, criteria, 0, &mut found);
            current = file.parent(ancestor);
        }
        let mut visited = FxHashSet::default();
        visited.insert(file.id());
        self.imported(&file, strategy, criteria, &mut found, &mut visited);
        found.into_values()
    }

    /// Find every declaration visible from the top level of a file.
    pub fn find_in_file<S: FinderStrategy>(
        &self,
        file: FileId,
        strategy: &S,
        criteria: &S::Criteria,
    ) -> Vec<SymbolDescription> {
        let Some(file) = self.workspace.file(file) else {
            return Vec::new();
        };
        let mut found = UniqueDescriptions::new();
        self.local_scope(&file, file.root(), strategy, criteria, 0, &mut found);
        let mut visited = FxHashSet::default();
        visited.insert(file.id());
        self.imported(&file, strategy, criteria, &mut found, &mut visited);
        found.into_values()
    }

    /// Local scope walk: every direct child of `scope` is offered to the
    /// strategy at `level`; containers are entered at `level + 1`.
    fn local_scope<S: FinderStrategy>(
        &self,
        file: &ProtoFile,
        scope: NodeId,
        strategy: &S,
        criteria: &S::Criteria,
        level: u32,
        found: &mut UniqueDescriptions,
    ) {
        for &child in file.children(scope) {
            found.add_all(strategy.local(file, child, criteria, level));
            if file.node(child).kind.is_container() {
                self.local_scope(file, child, strategy, criteria, level + 1, found);
            }
        }
    }

    /// Import walk from a file root.
    fn imported<S: FinderStrategy>(
        &self,
        file: &ProtoFile,
        strategy: &S,
        criteria: &S::Criteria,
        found: &mut UniqueDescriptions,
        visited: &mut FxHashSet<FileId>,
    ) {
        let imports = file.imports();
        if imports.is_empty() {
            return;
        }
        self.walk_imports(&imports, file.package(), strategy, criteria, found, visited);
    }

    fn walk_imports<S: FinderStrategy>(
        &self,
        imports: &[ImportDecl],
        from_importer: Option<&PackageName>,
        strategy: &S,
        criteria: &S::Criteria,
        found: &mut UniqueDescriptions,
        visited: &mut FxHashSet<FileId>,
    ) {
        for import in imports {
            if self.resolver.classify(import) == ImportKind::Descriptor {
                found.add_all(strategy.in_descriptor(import, criteria));
                continue;
            }
            let Some(target) = self.resolver.resolve(import) else {
                tracing::debug!(path = %import.path, "skipping unresolved import");
                continue;
            };
            let Some(imported) = self.workspace.file(target) else {
                tracing::debug!(path = %import.path, "skipping import of unloaded file");
                continue;
            };
            if !self.resolver.is_supported_syntax(&imported) {
                tracing::debug!(path = %import.path, "skipping import with unsupported syntax");
                continue;
            }
            self.public_imported(&imported, strategy, criteria, found, visited);
            if are_related(from_importer, imported.package()) {
                // Related packages: imported declarations are visible as if
                // they were local.
                self.local_scope(&imported, imported.root(), strategy, criteria, 0, found);
                continue;
            }
            self.qualified_walk(from_importer, &imported, strategy, criteria, found);
        }
    }

    /// Follow only the `import public` statements of `file`, so re-exported
    /// declarations stay visible across multiple hops. Private imports are
    /// never followed transitively.
    ///
    /// The visited set guards this descent only: a file's re-export chain is
    /// followed once per call, which bounds cyclic import graphs, while the
    /// relation-gated walk of the file itself happens at every import site
    /// (each site may sit under a different relation gate; the collector
    /// absorbs the duplicates).
    fn public_imported<S: FinderStrategy>(
        &self,
        file: &ProtoFile,
        strategy: &S,
        criteria: &S::Criteria,
        found: &mut UniqueDescriptions,
        visited: &mut FxHashSet<FileId>,
    ) {
        if !visited.insert(file.id()) {
            tracing::debug!(path = %file.path(), "re-exports already followed, truncating");
            return;
        }
        if !self.resolver.is_supported_syntax(file) {
            return;
        }
        let imports = file.public_imports();
        if imports.is_empty() {
            return;
        }
        // Relation gating at each hop uses that hop's own package.
        self.walk_imports(&imports, file.package(), strategy, criteria, found, visited);
    }

    /// Unrelated packages: offer every element of the imported file to the
    /// strategy with both package identifiers, for qualified-name matching.
    fn qualified_walk<S: FinderStrategy>(
        &self,
        from_importer: Option<&PackageName>,
        imported: &ProtoFile,
        strategy: &S,
        criteria: &S::Criteria,
        found: &mut UniqueDescriptions,
    ) {
        for node in imported.contents() {
            found.add_all(strategy.imported(from_importer, imported.package(), imported, node, criteria));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileBuilder, NodeKind};

    fn desc(file: u32, node: u32) -> SymbolDescription {
        SymbolDescription::local("X", ElementRef::new(FileId::new(file), NodeId::new(node)), 0)
    }

    #[test]
    fn test_collector_dedups_by_element() {
        let mut collector = UniqueDescriptions::new();
        collector.add(desc(0, 1));
        collector.add(desc(0, 1)); // same element, different path
        collector.add(desc(0, 2));
        collector.add(desc(1, 1));

        assert_eq!(collector.len(), 3);
    }

    #[test]
    fn test_collector_first_insertion_wins() {
        let mut collector = UniqueDescriptions::new();
        let element = ElementRef::new(FileId::new(0), NodeId::new(1));
        collector.add(SymbolDescription::local("first", element, 0));
        collector.add(SymbolDescription::local("second", element, 1));

        let values = collector.into_values();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].qualified_name, "first");
    }

    #[test]
    fn test_find_in_unloaded_file_is_empty() {
        let workspace = Workspace::new();
        let finder = ModelElementFinder::new(&workspace);
        let found = finder.find_in_file(FileId::new(42), &TypeNameStrategy, "Anything");
        assert!(found.is_empty());
    }

    #[test]
    fn test_local_walk_tags_nesting_levels() {
        let workspace = Workspace::new();
        let id = workspace.file_id("t.proto");
        let mut builder = FileBuilder::new(id, "t.proto");
        builder.begin_message("Outer");
        builder.begin_message("Inner");
        builder.end();
        builder.end();
        workspace.insert(builder.finish().unwrap()).unwrap();

        let finder = ModelElementFinder::new(&workspace);

        let outer = finder.find_in_file(id, &TypeNameStrategy, "Outer");
        assert_eq!(outer.len(), 1);
        assert_eq!(outer[0].level, Some(0));

        let inner = finder.find_in_file(id, &TypeNameStrategy, "Inner");
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].level, Some(1));
    }

    #[test]
    fn test_find_from_walks_ancestor_scopes() {
        let workspace = Workspace::new();
        let id = workspace.file_id("t.proto");
        let mut builder = FileBuilder::new(id, "t.proto");
        builder.begin_message("Sibling");
        builder.end();
        builder.begin_message("Holder");
        builder.field("site");
        builder.begin_message("Below");
        builder.end();
        builder.end();
        workspace.insert(builder.finish().unwrap()).unwrap();

        let file = workspace.file(id).unwrap();
        let site = file
            .contents()
            .find(|&n| file.node(n).name == "site")
            .unwrap();

        let finder = ModelElementFinder::new(&workspace);
        let start = file.element(site);

        // Sibling of an ancestor is visible.
        assert_eq!(finder.find_from(start, &TypeNameStrategy, "Sibling").len(), 1);
        // The enclosing message itself is visible (a child of the file root).
        assert_eq!(finder.find_from(start, &TypeNameStrategy, "Holder").len(), 1);
        // Nested inside Holder: visible too, the ancestor walk re-enters it.
        assert_eq!(finder.find_from(start, &TypeNameStrategy, "Below").len(), 1);
    }

    #[test]
    fn test_descriptor_node_kinds() {
        // The synthetic descriptor model is a normal file as far as the
        // engine is concerned.
        let desc = crate::model::descriptor::descriptor_file();
        assert!(desc.contents().any(|n| desc.node(n).kind == NodeKind::Message));
    }
}

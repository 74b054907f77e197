//! Schema model — the containment tree of a parsed `.proto` file.
//!
//! Each loaded file is a [`ProtoFile`]: an arena of [`Node`]s with explicit
//! parent back-references. Nodes are owned exclusively by their file; identity
//! is structural (position in the arena), not name-based. Cross-file identity
//! is an [`ElementRef`] (file + node index).
//!
//! Parsing text into this model is out of scope for the crate; front ends
//! populate it through [`FileBuilder`].

mod builder;
pub mod descriptor;
mod package;

pub use builder::FileBuilder;
pub use package::{PackageName, are_related};

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::FileId;

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// A file-local index into a [`ProtoFile`]'s node arena.
///
/// Stable for the lifetime of the file tree; invalidated when the file is
/// reparsed and replaced.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A globally unique reference to a model element.
///
/// Combines the file containing the element with its file-local node index.
/// This is the declaration-identity key used for deduplication: two
/// declarations can share a simple name in different scopes, but never an
/// `ElementRef`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ElementRef {
    /// The file containing this element
    pub file: FileId,
    /// The node within the file's arena
    pub node: NodeId,
}

impl ElementRef {
    /// Create a new ElementRef.
    #[inline]
    pub const fn new(file: FileId, node: NodeId) -> Self {
        Self { file, node }
    }
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementRef({:?}:{})", self.file, self.node.0)
    }
}

// ============================================================================
// NODES
// ============================================================================

/// The kind of a model element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The file root. Exactly one per file, always at index 0.
    File,
    /// A `package` statement.
    Package,
    /// An `import` statement. `public` imports re-export their target.
    Import { public: bool },
    /// A `message` declaration.
    Message,
    /// A `group` field declaration (proto2).
    Group,
    /// An `enum` declaration.
    Enum,
    /// A value inside an `enum`.
    EnumValue,
    /// A field inside a message or group.
    Field,
    /// An option attached to a field.
    FieldOption,
}

impl NodeKind {
    /// Whether the local-scope walk recurses into this element.
    ///
    /// Only messages and groups open a nested naming scope; enums do not
    /// (their values are surfaced by the matching strategy instead).
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Message | NodeKind::Group)
    }

    /// Whether this element declares a type usable in a type reference.
    pub fn is_type(self) -> bool {
        matches!(self, NodeKind::Message | NodeKind::Group | NodeKind::Enum)
    }
}

/// One element in a file's containment tree.
#[derive(Clone, Debug)]
pub struct Node {
    /// What this element is.
    pub kind: NodeKind,
    /// Simple name. For imports this is the target path; empty for the root.
    pub name: SmolStr,
    /// Containing element. `None` only for the root.
    pub parent: Option<NodeId>,
    /// Direct children, in declaration order.
    pub children: Vec<NodeId>,
}

// ============================================================================
// SYNTAX LEVEL
// ============================================================================

/// The syntax level a file declares.
///
/// The resolution engine only walks proto2 files; anything else is treated
/// the same as an unresolved import.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Syntax {
    #[default]
    Proto2,
    Proto3,
    Unknown,
}

// ============================================================================
// ERRORS
// ============================================================================

/// Structural errors detected while building a file model.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("{path}: package is declared more than once")]
    DuplicatePackage { path: Arc<str> },

    #[error("{path}: unclosed container `{name}`")]
    UnclosedContainer { path: Arc<str>, name: SmolStr },

    #[error("{path}: end() called with no open container")]
    UnbalancedEnd { path: Arc<str> },

    #[error("{path}: {what} must be declared at file scope")]
    MisplacedStatement { path: Arc<str>, what: &'static str },
}

// ============================================================================
// IMPORT DECLARATIONS
// ============================================================================

/// An `import` statement extracted from a file root.
///
/// Points at a file path string; resolution to an actual file is lazy and
/// may fail (see [`crate::workspace::ImportResolver`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDecl {
    /// The import statement element itself.
    pub element: ElementRef,
    /// The imported file path, as written.
    pub path: SmolStr,
    /// Whether this is an `import public` (re-exported to importers).
    pub public: bool,
}

// ============================================================================
// PROTO FILE
// ============================================================================

/// The root model of one parsed `.proto` file.
///
/// Owns its node arena. Lives as long as the loaded resource; replaced
/// wholesale when the file is reparsed.
#[derive(Clone, Debug)]
pub struct ProtoFile {
    id: FileId,
    path: Arc<str>,
    syntax: Syntax,
    package: Option<PackageName>,
    nodes: Vec<Node>,
}

impl ProtoFile {
    pub(crate) fn from_parts(
        id: FileId,
        path: Arc<str>,
        syntax: Syntax,
        package: Option<PackageName>,
        nodes: Vec<Node>,
    ) -> Self {
        Self { id, path, syntax, package, nodes }
    }

    /// The file's workspace id.
    pub fn id(&self) -> FileId {
        self.id
    }

    /// The path this file was loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The declared syntax level.
    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// The file's package declaration, if any.
    pub fn package(&self) -> Option<&PackageName> {
        self.package.as_ref()
    }

    /// The root node of the containment tree.
    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Access a node by id.
    ///
    /// # Panics
    /// Panics if the id did not come from this file's arena.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    /// The containing element of a node, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Direct children of a node, in declaration order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Total number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the file contains nothing but the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// An [`ElementRef`] for a node of this file.
    pub fn element(&self, id: NodeId) -> ElementRef {
        ElementRef::new(self.id, id)
    }

    /// Every element transitively contained in the file, excluding the root.
    ///
    /// Arena order is construction order, which is a preorder traversal.
    pub fn contents(&self) -> impl Iterator<Item = NodeId> + '_ {
        (1..self.nodes.len() as u32).map(NodeId::new)
    }

    /// All import statements, in declaration order.
    pub fn imports(&self) -> Vec<ImportDecl> {
        self.collect_imports(false)
    }

    /// Only the `import public` statements.
    pub fn public_imports(&self) -> Vec<ImportDecl> {
        self.collect_imports(true)
    }

    fn collect_imports(&self, public_only: bool) -> Vec<ImportDecl> {
        self.children(self.root())
            .iter()
            .filter_map(|&child| {
                let node = self.node(child);
                match node.kind {
                    NodeKind::Import { public } if public || !public_only => Some(ImportDecl {
                        element: self.element(child),
                        path: node.name.clone(),
                        public,
                    }),
                    _ => None,
                }
            })
            .collect()
    }

    /// The dotted qualified name of a node: package segments, then the names
    /// of named ancestors, then the node's own name.
    pub fn qualified_name(&self, id: NodeId) -> SmolStr {
        let mut segments: Vec<&str> = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if !node.name.is_empty() && node.kind != NodeKind::File {
                segments.push(node.name.as_str());
            }
            current = node.parent;
        }
        if let Some(package) = &self.package {
            for segment in package.segments().iter().rev() {
                segments.push(segment.as_str());
            }
        }
        segments.reverse();
        SmolStr::from(segments.join("."))
    }
}

//! Programmatic construction of file models.

use std::sync::Arc;

use smol_str::SmolStr;

use super::{ModelError, Node, NodeId, NodeKind, PackageName, ProtoFile, Syntax};
use crate::base::FileId;

/// Builds a [`ProtoFile`] containment tree.
///
/// Containers (`begin_message`, `begin_group`, `begin_enum`) nest until the
/// matching [`end`](Self::end); leaves attach to the innermost open container.
/// Structural mistakes are recorded and reported by [`finish`](Self::finish),
/// so call sites can chain without checking every step.
///
/// # Example
///
/// ```
/// use protoscope::base::FileId;
/// use protoscope::model::FileBuilder;
///
/// let mut builder = FileBuilder::new(FileId::new(0), "a.proto");
/// builder.package("acme");
/// builder.begin_message("Foo");
/// builder.field("bar");
/// builder.end();
/// let file = builder.finish().unwrap();
/// assert_eq!(file.package().unwrap().to_string(), "acme");
/// ```
pub struct FileBuilder {
    id: FileId,
    path: Arc<str>,
    syntax: Syntax,
    package: Option<PackageName>,
    nodes: Vec<Node>,
    open: Vec<NodeId>,
    error: Option<ModelError>,
}

impl FileBuilder {
    /// Start building a file model for the given id and path.
    pub fn new(id: FileId, path: impl Into<Arc<str>>) -> Self {
        let root = Node {
            kind: NodeKind::File,
            name: SmolStr::default(),
            parent: None,
            children: Vec::new(),
        };
        Self {
            id,
            path: path.into(),
            syntax: Syntax::default(),
            package: None,
            nodes: vec![root],
            open: Vec::new(),
            error: None,
        }
    }

    /// Set the declared syntax level (defaults to proto2).
    pub fn syntax(&mut self, syntax: Syntax) -> &mut Self {
        self.syntax = syntax;
        self
    }

    /// Declare the file's package. At most one per file, at file scope.
    pub fn package(&mut self, name: &str) -> &mut Self {
        if !self.open.is_empty() {
            self.record(ModelError::MisplacedStatement { path: self.path.clone(), what: "package" });
            return self;
        }
        if self.package.is_some() {
            self.record(ModelError::DuplicatePackage { path: self.path.clone() });
            return self;
        }
        self.package = Some(PackageName::parse(name));
        self.push(NodeKind::Package, name);
        self
    }

    /// Declare an `import`.
    pub fn import(&mut self, path: &str) -> &mut Self {
        self.import_node(path, false)
    }

    /// Declare an `import public`.
    pub fn public_import(&mut self, path: &str) -> &mut Self {
        self.import_node(path, true)
    }

    fn import_node(&mut self, path: &str, public: bool) -> &mut Self {
        if !self.open.is_empty() {
            self.record(ModelError::MisplacedStatement { path: self.path.clone(), what: "import" });
            return self;
        }
        self.push(NodeKind::Import { public }, path);
        self
    }

    /// Open a `message` declaration.
    pub fn begin_message(&mut self, name: &str) -> &mut Self {
        let id = self.push(NodeKind::Message, name);
        self.open.push(id);
        self
    }

    /// Open a `group` declaration.
    pub fn begin_group(&mut self, name: &str) -> &mut Self {
        let id = self.push(NodeKind::Group, name);
        self.open.push(id);
        self
    }

    /// Open an `enum` declaration.
    pub fn begin_enum(&mut self, name: &str) -> &mut Self {
        let id = self.push(NodeKind::Enum, name);
        self.open.push(id);
        self
    }

    /// Close the innermost open container.
    pub fn end(&mut self) -> &mut Self {
        if self.open.pop().is_none() {
            self.record(ModelError::UnbalancedEnd { path: self.path.clone() });
        }
        self
    }

    /// Declare a field in the current scope.
    pub fn field(&mut self, name: &str) -> &mut Self {
        self.push(NodeKind::Field, name);
        self
    }

    /// Declare an enum value in the current scope.
    pub fn enum_value(&mut self, name: &str) -> &mut Self {
        self.push(NodeKind::EnumValue, name);
        self
    }

    /// Declare a field option in the current scope.
    pub fn field_option(&mut self, name: &str) -> &mut Self {
        self.push(NodeKind::FieldOption, name);
        self
    }

    /// Finish the file, validating structure.
    pub fn finish(self) -> Result<ProtoFile, ModelError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if let Some(&unclosed) = self.open.first() {
            return Err(ModelError::UnclosedContainer {
                path: self.path.clone(),
                name: self.nodes[unclosed.0 as usize].name.clone(),
            });
        }
        Ok(ProtoFile::from_parts(self.id, self.path, self.syntax, self.package, self.nodes))
    }

    fn push(&mut self, kind: NodeKind, name: &str) -> NodeId {
        let parent = self.open.last().copied().unwrap_or(NodeId::new(0));
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            name: SmolStr::new(name),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    fn record(&mut self, error: ModelError) {
        // First structural error wins; later ones are usually knock-on effects.
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_nesting() {
        let mut builder = FileBuilder::new(FileId::new(0), "t.proto");
        builder.begin_message("Outer");
        builder.begin_message("Inner");
        builder.field("leaf");
        builder.end();
        builder.end();
        let file = builder.finish().unwrap();

        let outer = NodeId::new(1);
        let inner = NodeId::new(2);
        let leaf = NodeId::new(3);
        assert_eq!(file.children(file.root()), &[outer]);
        assert_eq!(file.children(outer), &[inner]);
        assert_eq!(file.children(inner), &[leaf]);
    }

    #[test]
    fn test_duplicate_package_is_an_error() {
        let mut builder = FileBuilder::new(FileId::new(0), "t.proto");
        builder.package("a");
        builder.package("b");
        assert!(matches!(builder.finish(), Err(ModelError::DuplicatePackage { .. })));
    }

    #[test]
    fn test_unclosed_container_is_an_error() {
        let mut builder = FileBuilder::new(FileId::new(0), "t.proto");
        builder.begin_message("Dangling");
        assert!(matches!(builder.finish(), Err(ModelError::UnclosedContainer { .. })));
    }

    #[test]
    fn test_unbalanced_end_is_an_error() {
        let mut builder = FileBuilder::new(FileId::new(0), "t.proto");
        builder.end();
        assert!(matches!(builder.finish(), Err(ModelError::UnbalancedEnd { .. })));
    }

    #[test]
    fn test_import_inside_message_is_rejected() {
        let mut builder = FileBuilder::new(FileId::new(0), "t.proto");
        builder.begin_message("M");
        builder.import("other.proto");
        builder.end();
        assert!(matches!(builder.finish(), Err(ModelError::MisplacedStatement { what: "import", .. })));
    }
}

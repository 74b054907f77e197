//! Matching strategies — pluggable policies for what counts as a candidate.
//!
//! The engine owns the traversal; each lookup kind (type reference, enum
//! value, option field) supplies a [`FinderStrategy`] deciding which elements
//! match. One strategy per lookup kind, selected explicitly by the caller —
//! no traversal logic is duplicated across lookups.

use smol_str::SmolStr;

use super::SymbolDescription;
use crate::model::descriptor::descriptor_file;
use crate::model::{ImportDecl, NodeId, NodeKind, PackageName, ProtoFile};

/// Decides what counts as a match during a resolution walk.
///
/// Stateless per invocation; the criteria type is strategy-specific (a name
/// token for the strategies in this module).
pub trait FinderStrategy {
    /// What the caller supplies to describe the thing being looked up.
    type Criteria: ?Sized;

    /// Match a candidate found in the local scope walk (same file, or an
    /// imported file whose package is related to the importer's). `level` is
    /// the candidate's nesting depth relative to the scope walked.
    fn local(
        &self,
        file: &ProtoFile,
        node: NodeId,
        criteria: &Self::Criteria,
        level: u32,
    ) -> Vec<SymbolDescription>;

    /// Match a candidate from an imported file whose package is unrelated to
    /// the importer's. Both packages are supplied for qualified-name
    /// construction.
    fn imported(
        &self,
        from_importer: Option<&PackageName>,
        from_imported: Option<&PackageName>,
        file: &ProtoFile,
        node: NodeId,
        criteria: &Self::Criteria,
    ) -> Vec<SymbolDescription>;

    /// Match against the built-in descriptor model for a descriptor import.
    fn in_descriptor(&self, import: &ImportDecl, criteria: &Self::Criteria)
    -> Vec<SymbolDescription>;
}

// ============================================================================
// TYPE LOOKUP
// ============================================================================

/// Finds message, group and enum declarations for a type reference.
///
/// Local candidates match on simple name; candidates from unrelated packages
/// only match their fully qualified name. Descriptor types answer to either,
/// since option positions reference them both ways.
pub struct TypeNameStrategy;

impl FinderStrategy for TypeNameStrategy {
    type Criteria = str;

    fn local(
        &self,
        file: &ProtoFile,
        node: NodeId,
        criteria: &str,
        level: u32,
    ) -> Vec<SymbolDescription> {
        let candidate = file.node(node);
        if candidate.kind.is_type() && candidate.name == criteria {
            vec![SymbolDescription::local(file.qualified_name(node), file.element(node), level)]
        } else {
            Vec::new()
        }
    }

    fn imported(
        &self,
        _from_importer: Option<&PackageName>,
        from_imported: Option<&PackageName>,
        file: &ProtoFile,
        node: NodeId,
        criteria: &str,
    ) -> Vec<SymbolDescription> {
        let candidate = file.node(node);
        if !candidate.kind.is_type() {
            return Vec::new();
        }
        let qualified = file.qualified_name(node);
        if qualified == criteria {
            vec![SymbolDescription::imported(qualified, file.element(node), from_imported.cloned())]
        } else {
            Vec::new()
        }
    }

    fn in_descriptor(&self, _import: &ImportDecl, criteria: &str) -> Vec<SymbolDescription> {
        descriptor_matches(criteria, |kind| kind.is_type())
    }
}

// ============================================================================
// ENUM VALUE LOOKUP
// ============================================================================

/// Finds enum values, e.g. for resolving a field's default.
///
/// Enums do not open a naming scope, so the local walk offers the `enum`
/// element itself and this strategy surfaces the matching values inside it.
pub struct EnumValueStrategy;

impl FinderStrategy for EnumValueStrategy {
    type Criteria = str;

    fn local(
        &self,
        file: &ProtoFile,
        node: NodeId,
        criteria: &str,
        level: u32,
    ) -> Vec<SymbolDescription> {
        if file.node(node).kind != NodeKind::Enum {
            return Vec::new();
        }
        file.children(node)
            .iter()
            .filter(|&&value| {
                let value = file.node(value);
                value.kind == NodeKind::EnumValue && value.name == criteria
            })
            .map(|&value| {
                SymbolDescription::local(file.qualified_name(value), file.element(value), level)
            })
            .collect()
    }

    fn imported(
        &self,
        _from_importer: Option<&PackageName>,
        from_imported: Option<&PackageName>,
        file: &ProtoFile,
        node: NodeId,
        criteria: &str,
    ) -> Vec<SymbolDescription> {
        let candidate = file.node(node);
        if candidate.kind != NodeKind::EnumValue {
            return Vec::new();
        }
        let qualified = file.qualified_name(node);
        if qualified == criteria {
            vec![SymbolDescription::imported(qualified, file.element(node), from_imported.cloned())]
        } else {
            Vec::new()
        }
    }

    fn in_descriptor(&self, _import: &ImportDecl, criteria: &str) -> Vec<SymbolDescription> {
        descriptor_matches(criteria, |kind| kind == NodeKind::EnumValue)
    }
}

// ============================================================================
// OPTION FIELD LOOKUP
// ============================================================================

/// Finds the field an option name refers to.
///
/// Standard options (`[packed = true]`) live on the descriptor `*Options`
/// messages; custom options are ordinary fields declared in user files.
pub struct OptionFieldStrategy;

impl FinderStrategy for OptionFieldStrategy {
    type Criteria = str;

    fn local(
        &self,
        file: &ProtoFile,
        node: NodeId,
        criteria: &str,
        level: u32,
    ) -> Vec<SymbolDescription> {
        let candidate = file.node(node);
        if candidate.kind == NodeKind::Field && candidate.name == criteria {
            vec![SymbolDescription::local(file.qualified_name(node), file.element(node), level)]
        } else {
            Vec::new()
        }
    }

    fn imported(
        &self,
        _from_importer: Option<&PackageName>,
        from_imported: Option<&PackageName>,
        file: &ProtoFile,
        node: NodeId,
        criteria: &str,
    ) -> Vec<SymbolDescription> {
        let candidate = file.node(node);
        if candidate.kind != NodeKind::Field {
            return Vec::new();
        }
        let qualified = file.qualified_name(node);
        if qualified == criteria {
            vec![SymbolDescription::imported(qualified, file.element(node), from_imported.cloned())]
        } else {
            Vec::new()
        }
    }

    fn in_descriptor(&self, _import: &ImportDecl, criteria: &str) -> Vec<SymbolDescription> {
        let desc = descriptor_file();
        desc.contents()
            .filter(|&node| {
                let candidate = desc.node(node);
                if candidate.kind != NodeKind::Field || candidate.name != criteria {
                    return false;
                }
                // Only fields of the *Options messages are addressable in
                // option position.
                desc.parent(node)
                    .is_some_and(|parent| desc.node(parent).name.ends_with("Options"))
            })
            .map(|node| SymbolDescription::descriptor(desc.qualified_name(node), desc.element(node)))
            .collect()
    }
}

/// Shared descriptor match: simple or fully qualified name, filtered by kind.
fn descriptor_matches(criteria: &str, accept: impl Fn(NodeKind) -> bool) -> Vec<SymbolDescription> {
    let desc = descriptor_file();
    desc.contents()
        .filter_map(|node| {
            let candidate = desc.node(node);
            if !accept(candidate.kind) {
                return None;
            }
            let qualified: SmolStr = desc.qualified_name(node);
            if candidate.name == criteria || qualified == criteria {
                Some(SymbolDescription::descriptor(qualified, desc.element(node)))
            } else {
                None
            }
        })
        .collect()
}

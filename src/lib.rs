//! # protoscope-base
//!
//! Core library for Protocol Buffers schema modeling and name resolution.
//!
//! This crate is the scoping engine behind IDE features (go-to-definition,
//! completion, validation) for `.proto` files: given a reference site inside
//! a loaded schema model, it finds every declaration that reference could
//! legally bind to, honoring lexical nesting, `import` visibility, transitive
//! `import public` re-export, and package-based visibility.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! resolve    → resolution engine, matching strategies, dedup collector
//!   ↓
//! workspace  → loaded-file registry + import resolution
//!   ↓
//! model      → containment tree, packages, builder, descriptor table
//!   ↓
//! base       → primitives (FileId)
//! ```
//!
//! Parsing `.proto` text into the model, editor UI, and compiler invocation
//! live outside this crate; the model is populated through [`model::FileBuilder`]
//! by whatever front end loads the files.

/// Foundation types: FileId
pub mod base;

/// Schema model: containment tree, packages, builder, descriptor table
pub mod model;

/// Name resolution: engine, matching strategies, dedup collector
pub mod resolve;

/// Workspace: loaded-file registry and import resolution
pub mod workspace;

// Re-export commonly needed items
pub use base::FileId;
pub use model::{ElementRef, NodeId, NodeKind, PackageName, ProtoFile, Syntax};
pub use resolve::{ModelElementFinder, SymbolDescription};
pub use workspace::{ImportResolver, Workspace};

//! Enum-value and option-field lookups through the resolution engine.

use protoscope::base::FileId;
use protoscope::model::FileBuilder;
use protoscope::resolve::{EnumValueStrategy, ModelElementFinder, OptionFieldStrategy};
use protoscope::workspace::Workspace;

fn load(workspace: &Workspace, path: &str, build: impl FnOnce(&mut FileBuilder)) -> FileId {
    let id = workspace.file_id(path);
    let mut builder = FileBuilder::new(id, path);
    build(&mut builder);
    workspace
        .insert(builder.finish().expect("test file must build"))
        .expect("test file must insert");
    id
}

#[test]
fn enum_value_resolves_in_local_scope() {
    let workspace = Workspace::new();
    let a = load(&workspace, "a.proto", |b| {
        b.package("x");
        b.begin_enum("Mode");
        b.enum_value("FAST");
        b.enum_value("SAFE");
        b.end();
    });

    let finder = ModelElementFinder::new(&workspace);
    let found = finder.find_in_file(a, &EnumValueStrategy, "FAST");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].qualified_name, "x.Mode.FAST");
}

#[test]
fn enum_value_resolves_through_related_import() {
    let workspace = Workspace::new();
    load(&workspace, "modes.proto", |b| {
        b.package("x.common");
        b.begin_enum("Mode");
        b.enum_value("FAST");
        b.end();
    });
    let a = load(&workspace, "a.proto", |b| {
        b.package("x");
        b.import("modes.proto");
    });

    let finder = ModelElementFinder::new(&workspace);
    let found = finder.find_in_file(a, &EnumValueStrategy, "FAST");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].qualified_name, "x.common.Mode.FAST");
}

#[test]
fn enum_value_from_unrelated_import_needs_qualified_name() {
    let workspace = Workspace::new();
    load(&workspace, "modes.proto", |b| {
        b.package("q");
        b.begin_enum("Mode");
        b.enum_value("FAST");
        b.end();
    });
    let a = load(&workspace, "a.proto", |b| {
        b.package("p");
        b.import("modes.proto");
    });

    let finder = ModelElementFinder::new(&workspace);
    assert!(finder.find_in_file(a, &EnumValueStrategy, "FAST").is_empty());

    let found = finder.find_in_file(a, &EnumValueStrategy, "q.Mode.FAST");
    assert_eq!(found.len(), 1);
}

#[test]
fn standard_option_resolves_via_descriptor_import() {
    let workspace = Workspace::new();
    let a = load(&workspace, "a.proto", |b| {
        b.package("x");
        b.import("google/protobuf/descriptor.proto");
    });

    let finder = ModelElementFinder::new(&workspace);
    let found = finder.find_in_file(a, &OptionFieldStrategy, "packed");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].qualified_name, "google.protobuf.FieldOptions.packed");
    assert_eq!(found[0].element.file, FileId::DESCRIPTOR);
}

#[test]
fn standard_option_unavailable_without_descriptor_import() {
    let workspace = Workspace::new();
    let a = load(&workspace, "a.proto", |b| {
        b.package("x");
    });

    let finder = ModelElementFinder::new(&workspace);
    assert!(finder.find_in_file(a, &OptionFieldStrategy, "packed").is_empty());
}

#[test]
fn custom_option_field_resolves_locally() {
    let workspace = Workspace::new();
    let a = load(&workspace, "a.proto", |b| {
        b.package("x");
        b.begin_message("MyOptions");
        b.field("trace_id");
        b.end();
    });

    let finder = ModelElementFinder::new(&workspace);
    let found = finder.find_in_file(a, &OptionFieldStrategy, "trace_id");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].qualified_name, "x.MyOptions.trace_id");
}

//! The built-in descriptor model.
//!
//! `import "google/protobuf/descriptor.proto";` gives a file access to the
//! reflection symbol table: the `*Options` messages whose fields appear in
//! option brackets, plus their nested enums. The editor must resolve those
//! names without a descriptor file being present on disk, so this module
//! materializes the table once as a synthetic [`ProtoFile`] under
//! [`FileId::DESCRIPTOR`]. Matches against it are ordinary [`super::ElementRef`]s
//! and can never dangle.

use std::sync::{Arc, OnceLock};

use super::{FileBuilder, ProtoFile};
use crate::base::FileId;

/// The import path that designates the built-in descriptor set.
pub const DESCRIPTOR_PATH: &str = "google/protobuf/descriptor.proto";

/// The shared descriptor model, built on first use.
pub fn descriptor_file() -> &'static Arc<ProtoFile> {
    static DESCRIPTOR: OnceLock<Arc<ProtoFile>> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| Arc::new(build_descriptor()))
}

fn build_descriptor() -> ProtoFile {
    let mut b = FileBuilder::new(FileId::DESCRIPTOR, DESCRIPTOR_PATH);
    b.package("google.protobuf");

    b.begin_message("FileOptions");
    b.field("java_package");
    b.field("java_outer_classname");
    b.field("java_multiple_files");
    b.field("optimize_for");
    b.field("go_package");
    b.field("deprecated");
    b.begin_enum("OptimizeMode");
    b.enum_value("SPEED");
    b.enum_value("CODE_SIZE");
    b.enum_value("LITE_RUNTIME");
    b.end();
    b.end();

    b.begin_message("MessageOptions");
    b.field("message_set_wire_format");
    b.field("no_standard_descriptor_accessor");
    b.field("deprecated");
    b.end();

    b.begin_message("FieldOptions");
    b.field("ctype");
    b.field("packed");
    b.field("lazy");
    b.field("deprecated");
    b.field("weak");
    b.begin_enum("CType");
    b.enum_value("STRING");
    b.enum_value("CORD");
    b.enum_value("STRING_PIECE");
    b.end();
    b.end();

    b.begin_message("EnumOptions");
    b.field("allow_alias");
    b.field("deprecated");
    b.end();

    b.begin_message("EnumValueOptions");
    b.field("deprecated");
    b.end();

    b.begin_message("ServiceOptions");
    b.field("deprecated");
    b.end();

    b.begin_message("MethodOptions");
    b.field("deprecated");
    b.end();

    // The builder input above is static; a failure here is a bug in this file.
    b.finish().expect("descriptor model must build")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;

    #[test]
    fn test_descriptor_identity() {
        let desc = descriptor_file();
        assert_eq!(desc.id(), FileId::DESCRIPTOR);
        assert_eq!(desc.path(), DESCRIPTOR_PATH);
        assert_eq!(desc.package().unwrap().to_string(), "google.protobuf");
    }

    #[test]
    fn test_descriptor_is_shared() {
        let a = descriptor_file();
        let b = descriptor_file();
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn test_descriptor_contains_field_options() {
        let desc = descriptor_file();
        let packed = desc
            .contents()
            .find(|&n| desc.node(n).kind == NodeKind::Field && desc.node(n).name == "packed")
            .expect("FieldOptions.packed present");
        assert_eq!(desc.qualified_name(packed), "google.protobuf.FieldOptions.packed");
    }

    #[test]
    fn test_descriptor_contains_ctype_values() {
        let desc = descriptor_file();
        let cord = desc
            .contents()
            .find(|&n| desc.node(n).kind == NodeKind::EnumValue && desc.node(n).name == "CORD");
        assert!(cord.is_some());
    }
}

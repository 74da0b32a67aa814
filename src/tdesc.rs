//! Rendering a catalog as a target-description document for the debugger
//! client.
//!
//! The document is the schema the client loads to interpret wire data (the
//! `target.xml` / `arc-registers.xml` style file a GDB expects for
//! architectures with auxiliary registers). It describes the architecture,
//! not one hardware instance: every declared register is advertised,
//! whether or not it is present on the attached silicon.

use alloc::string::String;
use core::fmt::Write;

use crate::catalog::Catalog;

/// Render `catalog` as a target-description XML document.
///
/// Registers appear in protocol-index order with their name, bit width, and
/// a group tag derived from the presence class, so clients can render
/// optional registers distinctly. Output is deterministic: an identical
/// catalog always yields a byte-identical document, which lets clients
/// cache it.
pub fn generate_description(catalog: &Catalog) -> String {
    let mut doc = String::new();

    // fmt::Write into a String cannot fail
    let _ = writeln!(doc, r#"<?xml version="1.0"?>"#);
    let _ = writeln!(doc, r#"<!DOCTYPE target SYSTEM "gdb-target.dtd">"#);
    let _ = writeln!(doc, r#"<target version="1.0">"#);
    let _ = writeln!(
        doc,
        "  <architecture>{}</architecture>",
        catalog.arch_name()
    );
    let _ = writeln!(
        doc,
        r#"  <feature name="org.gnu.gdb.{}.core">"#,
        catalog.arch_name()
    );

    for entry in catalog.entries() {
        let group = if entry.is_optional() {
            "optional"
        } else {
            "general"
        };
        let _ = writeln!(
            doc,
            r#"    <reg name="{}" bitsize="{}" group="{}"/>"#,
            entry.name,
            entry.byte_width * 8,
            group
        );
    }

    let _ = writeln!(doc, "  </feature>");
    let _ = writeln!(doc, "</target>");

    doc
}

// Licensed under the Apache-2.0 license

//! Generators that render a [`RegisterList`] into text artifacts.
//!
//! Every generator is a pure function of the register list and the banner:
//! rendering the same list twice yields the same text, apart from the
//! banner's provenance line. Generators share no state.
//!
//! | Generator                      | File                        |
//! |--------------------------------|-----------------------------|
//! | [`VhdlPackageGenerator`]       | `<module>_regs_pkg.vhd`     |
//! | [`CHeaderGenerator`]           | `<module>_regs.h`           |
//! | [`CppInterfaceGenerator`]      | `i_<module>.h`              |
//! | [`CppHeaderGenerator`]         | `<module>.h`                |
//! | [`CppImplementationGenerator`] | `<module>.cpp`              |
//! | [`HtmlPageGenerator`]          | `<module>_regs.html`        |
//! | [`HtmlTableGenerator`]         | `<module>_regs_table.html`  |

mod c_header;
mod cpp;
mod html;
mod vhdl;


use crate::model::RegisterList;
use crate::provenance::Banner;

pub use c_header::CHeaderGenerator;
pub use cpp::{
    accessors, CppAccessors, CppHeaderGenerator, CppImplementationGenerator,
    CppInterfaceGenerator, CPP_NAMESPACE,
};
pub use html::{HtmlPageGenerator, HtmlTableGenerator, HTML_STYLESHEET, HTML_STYLESHEET_NAME};
pub use vhdl::VhdlPackageGenerator;

/// A stateless transformation from a register list to one text artifact.
pub trait RegisterCodeGenerator {
    /// File name of the artifact for the module called `module_name`.
    fn file_name(&self, module_name: &str) -> String;

    /// Render the complete artifact.
    fn render(&self, register_list: &RegisterList, banner: &Banner) -> String;
}

// Licensed under the Apache-2.0 license

//! Standalone C header: register map struct, address constants and bit masks.

use super::RegisterCodeGenerator;
use crate::model::RegisterList;
use crate::provenance::Banner;
use crate::util::{bit_symbol, comment_lines, hex_const, macro_name, register_symbol, tweak_keywords};
use std::fmt::Write;

#[derive(Clone, Copy, Debug, Default)]
pub struct CHeaderGenerator;

impl RegisterCodeGenerator for CHeaderGenerator {
    fn file_name(&self, module_name: &str) -> String {
        format!("{module_name}_regs.h")
    }

    fn render(&self, register_list: &RegisterList, banner: &Banner) -> String {
        let name = register_list.name();
        let guard = macro_name(&format!("{name}_regs_h"));
        let mut output = banner.commented("//");

        writeln!(output, "#ifndef {guard}").unwrap();
        writeln!(output, "#define {guard}").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "#include <stdint.h>").unwrap();
        writeln!(output).unwrap();

        writeln!(output, "// Number of registers within this register map.").unwrap();
        writeln!(
            output,
            "#define {} ({}u)",
            macro_name(&format!("{name}_num_regs")),
            register_list.len()
        )
        .unwrap();
        writeln!(output).unwrap();

        self.generate_struct(register_list, &mut output);
        self.generate_constants(register_list, &mut output);

        writeln!(output, "#endif // {guard}").unwrap();
        output
    }
}

impl CHeaderGenerator {
    /// One `uint32_t` field per register, so that a pointer to the struct
    /// can be placed at the module base address.
    fn generate_struct(&self, register_list: &RegisterList, output: &mut String) {
        // An empty struct is not valid C.
        if register_list.is_empty() {
            return;
        }
        let name = register_list.name();
        writeln!(output, "// Type for this register map.").unwrap();
        writeln!(output, "typedef struct {name}_regs_t").unwrap();
        writeln!(output, "{{").unwrap();
        for register in register_list {
            writeln!(output, "  // Mode \"{}\".", register.mode_readable()).unwrap();
            writeln!(output, "  uint32_t {};", tweak_keywords(register.name())).unwrap();
        }
        writeln!(output, "}} {name}_regs_t;").unwrap();
        writeln!(output).unwrap();
    }

    fn generate_constants(&self, register_list: &RegisterList, output: &mut String) {
        let name = register_list.name();
        for register in register_list {
            writeln!(
                output,
                "// Address of the '{}' register (index {}).",
                register.name(),
                register.index()
            )
            .unwrap();
            writeln!(output, "// Mode '{}'.", register.mode_readable()).unwrap();
            if let Some(semantics) = register.mode().semantics() {
                writeln!(output, "// {semantics}").unwrap();
            }
            for line in comment_lines(register.description()) {
                writeln!(output, "// {line}").unwrap();
            }
            writeln!(
                output,
                "#define {} ({}u)",
                macro_name(&register_symbol(name, register.name())),
                hex_const(register.address() as u64)
            )
            .unwrap();

            for bit in register.bits() {
                writeln!(
                    output,
                    "// Mask for the '{}' bit of the '{}' register.",
                    bit.name(),
                    register.name()
                )
                .unwrap();
                for line in comment_lines(bit.description()) {
                    writeln!(output, "// {line}").unwrap();
                }
                writeln!(
                    output,
                    "#define {} (1u << {}u)",
                    macro_name(&bit_symbol(name, register.name(), bit.name())),
                    bit.index()
                )
                .unwrap();
            }
            writeln!(output).unwrap();
        }
    }
}

// Licensed under the Apache-2.0 license

//! VHDL package with register constants and a register file record type.
//!
//! For a module `test` with registers `config` and `data` the package looks
//! like:
//!
//! ```text
//! package test_regs_pkg is
//!   constant test_num_regs : natural := 2;
//!   subtype test_reg_range is natural range 0 to test_num_regs - 1;
//!   constant test_config : natural := 0;
//!   constant test_data : natural := 1;
//!   constant test_config_enable : natural := 0;
//!   type test_reg_mode_t is (mode_r, mode_w, mode_r_w, mode_wpulse, mode_r_wpulse);
//!   constant test_reg_modes : test_reg_mode_vec_t(test_reg_range) := (...);
//!   type test_regs_t is record ... end record;
//! end package;
//! ```
//!
//! Register constants hold the word index, which is the address decoded by
//! the HDL register file. Bit constants hold the bit index.

use super::RegisterCodeGenerator;
use crate::model::{Register, RegisterList, REGISTER_WIDTH};
use crate::provenance::Banner;
use crate::util::{bit_symbol, comment_lines, hex_const, register_symbol, tweak_vhdl_keywords};
use std::fmt::Write;

#[derive(Clone, Copy, Debug, Default)]
pub struct VhdlPackageGenerator;

impl RegisterCodeGenerator for VhdlPackageGenerator {
    fn file_name(&self, module_name: &str) -> String {
        format!("{module_name}_regs_pkg.vhd")
    }

    fn render(&self, register_list: &RegisterList, banner: &Banner) -> String {
        let name = register_list.name();
        let mut output = banner.commented("--");

        writeln!(output, "library ieee;").unwrap();
        writeln!(output, "use ieee.std_logic_1164.all;").unwrap();
        writeln!(output).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "package {name}_regs_pkg is").unwrap();
        writeln!(output).unwrap();

        writeln!(
            output,
            "  -- Number of registers within this register map."
        )
        .unwrap();
        writeln!(
            output,
            "  constant {name}_num_regs : natural := {};",
            register_list.len()
        )
        .unwrap();
        writeln!(
            output,
            "  subtype {name}_reg_range is natural range 0 to {name}_num_regs - 1;"
        )
        .unwrap();
        writeln!(output).unwrap();

        self.generate_register_constants(register_list, &mut output);
        self.generate_bit_constants(register_list, &mut output);
        self.generate_mode_table(register_list, &mut output);
        self.generate_record(register_list, &mut output);

        writeln!(output, "end package;").unwrap();
        output
    }
}

impl VhdlPackageGenerator {
    fn generate_register_constants(&self, register_list: &RegisterList, output: &mut String) {
        if register_list.is_empty() {
            return;
        }
        writeln!(output, "  -- Register indexes, in address order.").unwrap();
        for register in register_list {
            let symbol = register_symbol(register_list.name(), register.name());
            writeln!(
                output,
                "  constant {symbol} : natural := {}; -- Byte address {}. Mode \"{}\".",
                register.index(),
                hex_const(register.address() as u64),
                register.mode_readable()
            )
            .unwrap();
        }
        writeln!(output).unwrap();
    }

    fn generate_bit_constants(&self, register_list: &RegisterList, output: &mut String) {
        for register in register_list {
            if register.bits().is_empty() {
                continue;
            }
            writeln!(output, "  -- Bit indexes of the '{}' register.", register.name()).unwrap();
            for bit in register.bits() {
                for line in comment_lines(bit.description()) {
                    writeln!(output, "  -- {line}").unwrap();
                }
                let symbol = bit_symbol(register_list.name(), register.name(), bit.name());
                writeln!(output, "  constant {symbol} : natural := {};", bit.index()).unwrap();
            }
            writeln!(output).unwrap();
        }
    }

    fn generate_mode_table(&self, register_list: &RegisterList, output: &mut String) {
        let name = register_list.name();
        writeln!(output, "  -- Access mode of each register.").unwrap();
        writeln!(
            output,
            "  type {name}_reg_mode_t is (mode_r, mode_w, mode_r_w, mode_wpulse, mode_r_wpulse);"
        )
        .unwrap();
        writeln!(
            output,
            "  type {name}_reg_mode_vec_t is array (natural range <>) of {name}_reg_mode_t;"
        )
        .unwrap();
        if register_list.is_empty() {
            writeln!(output).unwrap();
            return;
        }
        writeln!(
            output,
            "  constant {name}_reg_modes : {name}_reg_mode_vec_t({name}_reg_range) := ("
        )
        .unwrap();
        let last = register_list.len() - 1;
        for register in register_list {
            let separator = if register.index() == last { "" } else { "," };
            writeln!(
                output,
                "    {} => mode_{}{separator}",
                register_symbol(name, register.name()),
                register.mode().as_ref()
            )
            .unwrap();
        }
        writeln!(output, "  );").unwrap();
        writeln!(output).unwrap();
    }

    fn generate_record(&self, register_list: &RegisterList, output: &mut String) {
        let name = register_list.name();
        writeln!(
            output,
            "  subtype {name}_reg_t is std_ulogic_vector({} downto 0);",
            REGISTER_WIDTH - 1
        )
        .unwrap();
        writeln!(output).unwrap();
        // VHDL does not allow a record without elements.
        if register_list.is_empty() {
            return;
        }
        writeln!(
            output,
            "  -- Register file layout, one field per register in address order."
        )
        .unwrap();
        writeln!(output, "  type {name}_regs_t is record").unwrap();
        for register in register_list {
            writeln!(output, "    -- {}", mode_comment(register)).unwrap();
            writeln!(
                output,
                "    {} : {name}_reg_t;",
                tweak_vhdl_keywords(register.name())
            )
            .unwrap();
        }
        writeln!(output, "  end record;").unwrap();
        writeln!(output).unwrap();
    }
}

fn mode_comment(register: &Register) -> String {
    let mode = register.mode_readable();
    match register.mode().semantics() {
        Some(semantics) => format!("Mode \"{mode}\". {semantics}"),
        None => format!("Mode \"{mode}\"."),
    }
}

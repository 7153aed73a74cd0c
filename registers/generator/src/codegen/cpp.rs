// Licensed under the Apache-2.0 license

//! C++ register access class: an abstract interface, a concrete class
//! header and its implementation.
//!
//! The concrete class does not touch memory itself. Word read and write
//! primitives are passed to its constructor as function pointers together
//! with the module base address, so the same class works on a bare-metal
//! target, under Linux through a mapped device, or against a test double.

use super::RegisterCodeGenerator;
use crate::model::{Bit, Mode, Register, RegisterList, REGISTER_BYTES};
use crate::provenance::Banner;
use crate::util::{camel_case, comment_lines};
use std::fmt::Write;

/// Namespace that all generated classes live in.
pub const CPP_NAMESPACE: &str = "fpga_regs";

/// Which accessor methods a register (and each of its bits) gets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CppAccessors {
    pub getter: bool,
    pub setter: bool,
    /// `read_and_clear_<register>()`: read the value, then write it back so
    /// that every set bit is cleared.
    pub read_and_clear: bool,
}

/// Accessors generated for a register of the given mode.
pub fn accessors(mode: Mode) -> CppAccessors {
    CppAccessors {
        getter: mode.is_readable(),
        setter: mode.is_writable(),
        read_and_clear: mode == Mode::ReadWritePulse,
    }
}

fn interface_name(module_name: &str) -> String {
    format!("I{}", camel_case(module_name))
}

fn class_name(module_name: &str) -> String {
    camel_case(module_name)
}

/// One member function of the generated class, without its body.
struct Method {
    return_type: &'static str,
    name: String,
    arguments: &'static str,
}

impl Method {
    fn declaration(&self) -> String {
        format!("{} {}({}) const", self.return_type, self.name, self.arguments)
    }

    fn definition(&self, class: &str) -> String {
        format!(
            "{} {class}::{}({}) const",
            self.return_type, self.name, self.arguments
        )
    }
}

fn register_methods(register: &Register) -> Vec<Method> {
    let access = accessors(register.mode());
    let mut methods = Vec::new();
    if access.getter {
        methods.push(Method {
            return_type: "uint32_t",
            name: format!("get_{}", register.name()),
            arguments: "",
        });
    }
    if access.setter {
        methods.push(Method {
            return_type: "void",
            name: format!("set_{}", register.name()),
            arguments: "uint32_t value",
        });
    }
    if access.read_and_clear {
        methods.push(Method {
            return_type: "uint32_t",
            name: format!("read_and_clear_{}", register.name()),
            arguments: "",
        });
    }
    methods
}

fn bit_methods(register: &Register, bit: &Bit) -> Vec<Method> {
    let access = accessors(register.mode());
    let mut methods = Vec::new();
    if access.getter {
        methods.push(Method {
            return_type: "bool",
            name: format!("get_{}_{}", register.name(), bit.name()),
            arguments: "",
        });
    }
    if access.setter {
        methods.push(Method {
            return_type: "void",
            name: format!("set_{}_{}", register.name(), bit.name()),
            arguments: "bool value",
        });
    }
    methods
}

fn register_comment(register: &Register, indent: &str, output: &mut String) {
    writeln!(
        output,
        "{indent}// Register '{}' at index {}. Mode \"{}\".",
        register.name(),
        register.index(),
        register.mode_readable()
    )
    .unwrap();
    if let Some(semantics) = register.mode().semantics() {
        writeln!(output, "{indent}// {semantics}").unwrap();
    }
    for line in comment_lines(register.description()) {
        writeln!(output, "{indent}// {line}").unwrap();
    }
}

fn bit_comment(register: &Register, bit: &Bit, indent: &str, output: &mut String) {
    writeln!(
        output,
        "{indent}// Bit '{}' of register '{}'.",
        bit.name(),
        register.name()
    )
    .unwrap();
    for line in comment_lines(bit.description()) {
        writeln!(output, "{indent}// {line}").unwrap();
    }
}

/// Abstract interface `I<Module>`, for mocking in unit tests of driver code.
#[derive(Clone, Copy, Debug, Default)]
pub struct CppInterfaceGenerator;

impl RegisterCodeGenerator for CppInterfaceGenerator {
    fn file_name(&self, module_name: &str) -> String {
        format!("i_{module_name}.h")
    }

    fn render(&self, register_list: &RegisterList, banner: &Banner) -> String {
        let interface = interface_name(register_list.name());
        let mut output = banner.commented("//");

        writeln!(output, "#pragma once").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "#include <stddef.h>").unwrap();
        writeln!(output, "#include <stdint.h>").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "namespace {CPP_NAMESPACE}").unwrap();
        writeln!(output, "{{").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "class {interface}").unwrap();
        writeln!(output, "{{").unwrap();
        writeln!(output, "public:").unwrap();
        writeln!(output, "  // Number of registers within this register map.").unwrap();
        writeln!(
            output,
            "  static const size_t num_registers = {}u;",
            register_list.len()
        )
        .unwrap();
        writeln!(output).unwrap();
        writeln!(output, "  virtual ~{interface}() {{ }}").unwrap();

        for register in register_list {
            writeln!(output).unwrap();
            register_comment(register, "  ", &mut output);
            for method in register_methods(register) {
                writeln!(output, "  virtual {} = 0;", method.declaration()).unwrap();
            }
            for bit in register.bits() {
                bit_comment(register, bit, "  ", &mut output);
                for method in bit_methods(register, bit) {
                    writeln!(output, "  virtual {} = 0;", method.declaration()).unwrap();
                }
            }
        }

        writeln!(output, "}};").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "}} /* namespace {CPP_NAMESPACE} */").unwrap();
        output
    }
}

/// Class declaration of the concrete `<Module>` implementing `I<Module>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CppHeaderGenerator;

impl RegisterCodeGenerator for CppHeaderGenerator {
    fn file_name(&self, module_name: &str) -> String {
        format!("{module_name}.h")
    }

    fn render(&self, register_list: &RegisterList, banner: &Banner) -> String {
        let name = register_list.name();
        let interface = interface_name(name);
        let class = class_name(name);
        let mut output = banner.commented("//");

        writeln!(output, "#pragma once").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "#include \"{}\"", CppInterfaceGenerator.file_name(name)).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "namespace {CPP_NAMESPACE}").unwrap();
        writeln!(output, "{{").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "class {class} : public {interface}").unwrap();
        writeln!(output, "{{").unwrap();
        writeln!(output, "public:").unwrap();
        writeln!(output, "  // Read one 32-bit word at a byte address.").unwrap();
        writeln!(
            output,
            "  typedef uint32_t (*read_function_t)(uintptr_t address);"
        )
        .unwrap();
        writeln!(output, "  // Write one 32-bit word at a byte address.").unwrap();
        writeln!(
            output,
            "  typedef void (*write_function_t)(uintptr_t address, uint32_t value);"
        )
        .unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "  {class}(uintptr_t base_address, read_function_t read_word, write_function_t write_word);"
        )
        .unwrap();
        writeln!(output).unwrap();
        writeln!(output, "  virtual ~{class}() {{ }}").unwrap();

        for register in register_list {
            writeln!(output).unwrap();
            register_comment(register, "  ", &mut output);
            for method in register_methods(register) {
                writeln!(output, "  virtual {} override;", method.declaration()).unwrap();
            }
            for bit in register.bits() {
                for method in bit_methods(register, bit) {
                    writeln!(output, "  virtual {} override;", method.declaration()).unwrap();
                }
            }
        }

        writeln!(output).unwrap();
        writeln!(output, "private:").unwrap();
        writeln!(output, "  uint32_t read_register(size_t index) const;").unwrap();
        writeln!(
            output,
            "  void write_register(size_t index, uint32_t value) const;"
        )
        .unwrap();
        writeln!(output).unwrap();
        writeln!(output, "  uintptr_t m_base_address;").unwrap();
        writeln!(output, "  read_function_t m_read_word;").unwrap();
        writeln!(output, "  write_function_t m_write_word;").unwrap();
        writeln!(output, "}};").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "}} /* namespace {CPP_NAMESPACE} */").unwrap();
        output
    }
}

/// Member function bodies of the concrete `<Module>` class.
#[derive(Clone, Copy, Debug, Default)]
pub struct CppImplementationGenerator;

impl RegisterCodeGenerator for CppImplementationGenerator {
    fn file_name(&self, module_name: &str) -> String {
        format!("{module_name}.cpp")
    }

    fn render(&self, register_list: &RegisterList, banner: &Banner) -> String {
        let name = register_list.name();
        let class = class_name(name);
        let mut output = banner.commented("//");

        writeln!(output, "#include \"{}\"", CppHeaderGenerator.file_name(name)).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "namespace {CPP_NAMESPACE}").unwrap();
        writeln!(output, "{{").unwrap();
        writeln!(output).unwrap();

        writeln!(
            output,
            "{class}::{class}(uintptr_t base_address, read_function_t read_word, write_function_t write_word)"
        )
        .unwrap();
        writeln!(
            output,
            "    : m_base_address(base_address), m_read_word(read_word), m_write_word(write_word)"
        )
        .unwrap();
        writeln!(output, "{{").unwrap();
        writeln!(output, "}}").unwrap();
        writeln!(output).unwrap();

        writeln!(
            output,
            "uint32_t {class}::read_register(size_t index) const"
        )
        .unwrap();
        writeln!(output, "{{").unwrap();
        writeln!(
            output,
            "  return m_read_word(m_base_address + index * {REGISTER_BYTES}u);"
        )
        .unwrap();
        writeln!(output, "}}").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "void {class}::write_register(size_t index, uint32_t value) const"
        )
        .unwrap();
        writeln!(output, "{{").unwrap();
        writeln!(
            output,
            "  m_write_word(m_base_address + index * {REGISTER_BYTES}u, value);"
        )
        .unwrap();
        writeln!(output, "}}").unwrap();

        for register in register_list {
            self.generate_register(&class, register, &mut output);
        }

        writeln!(output).unwrap();
        writeln!(output, "}} /* namespace {CPP_NAMESPACE} */").unwrap();
        output
    }
}

impl CppImplementationGenerator {
    fn generate_register(&self, class: &str, register: &Register, output: &mut String) {
        let index = register.index();
        let access = accessors(register.mode());

        writeln!(output).unwrap();
        register_comment(register, "", output);
        for method in register_methods(register) {
            writeln!(output, "{}", method.definition(class)).unwrap();
            writeln!(output, "{{").unwrap();
            match method.return_type {
                "void" => writeln!(output, "  write_register({index}u, value);").unwrap(),
                _ if method.name.starts_with("read_and_clear_") => {
                    writeln!(output, "  const uint32_t value = read_register({index}u);").unwrap();
                    writeln!(output, "  write_register({index}u, value);").unwrap();
                    writeln!(output, "  return value;").unwrap();
                }
                _ => writeln!(output, "  return read_register({index}u);").unwrap(),
            }
            writeln!(output, "}}").unwrap();
            writeln!(output).unwrap();
        }

        for bit in register.bits() {
            let mask = format!("(1u << {}u)", bit.index());
            bit_comment(register, bit, "", output);
            for method in bit_methods(register, bit) {
                writeln!(output, "{}", method.definition(class)).unwrap();
                writeln!(output, "{{").unwrap();
                if method.return_type == "bool" {
                    writeln!(
                        output,
                        "  return (read_register({index}u) & {mask}) != 0u;"
                    )
                    .unwrap();
                } else if access.getter && !register.mode().is_pulse() {
                    // Stored value: keep the other bits as they are.
                    writeln!(output, "  uint32_t register_value = read_register({index}u);").unwrap();
                    writeln!(output, "  if (value)").unwrap();
                    writeln!(output, "  {{").unwrap();
                    writeln!(output, "    register_value |= {mask};").unwrap();
                    writeln!(output, "  }}").unwrap();
                    writeln!(output, "  else").unwrap();
                    writeln!(output, "  {{").unwrap();
                    writeln!(output, "    register_value &= ~{mask};").unwrap();
                    writeln!(output, "  }}").unwrap();
                    writeln!(output, "  write_register({index}u, register_value);").unwrap();
                } else {
                    writeln!(
                        output,
                        "  write_register({index}u, value ? {mask} : 0u);"
                    )
                    .unwrap();
                }
                writeln!(output, "}}").unwrap();
                writeln!(output).unwrap();
            }
        }
    }
}

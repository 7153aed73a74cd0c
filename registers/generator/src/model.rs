// Licensed under the Apache-2.0 license

//! Register data model.
//!
//! ```text
//! RegisterList        # one per module, insertion order = address order
//! └── Register[]      # 32-bit word, address = 4 * index
//!     └── Bit[]       # named bit, index = insertion order
//! ```
//!
//! The model is built by the parser (or by static setup code calling
//! [`RegisterList::append`]) and is then only read by the generators.

use crate::error::{RegisterError, Result};
use crate::util::{tweak_keywords, tweak_vhdl_keywords};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// Number of bytes between two consecutive register addresses.
pub const REGISTER_BYTES: usize = 4;

/// Width of every register in bits.
pub const REGISTER_WIDTH: usize = 32;

/// Access mode of a register, as seen from the bus.
///
/// The string form (`r`, `w`, ...) is what appears in definition files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, AsRefStr, EnumIter)]
pub enum Mode {
    /// Bus can read a value that the fabric provides.
    #[strum(serialize = "r")]
    Read,
    /// Bus can write a value that is available to the fabric.
    #[strum(serialize = "w")]
    Write,
    /// Bus can write a value and read it back.
    #[strum(serialize = "r_w")]
    ReadWrite,
    /// A written '1' is asserted for one clock cycle, then cleared.
    #[strum(serialize = "wpulse")]
    WritePulse,
    /// Bus reads latched status from the fabric. A written '1' is asserted
    /// for one clock cycle, which clears the corresponding status bit.
    #[strum(serialize = "r_wpulse")]
    ReadWritePulse,
}

impl Mode {
    /// Human readable description of the mode, used in generated comments.
    pub fn readable(self) -> &'static str {
        match self {
            Mode::Read => "Read",
            Mode::Write => "Write",
            Mode::ReadWrite => "Read, Write",
            Mode::WritePulse => "Write-pulse",
            Mode::ReadWritePulse => "Read, Write-pulse",
        }
    }

    pub fn is_readable(self) -> bool {
        matches!(self, Mode::Read | Mode::ReadWrite | Mode::ReadWritePulse)
    }

    pub fn is_writable(self) -> bool {
        !matches!(self, Mode::Read)
    }

    pub fn is_pulse(self) -> bool {
        matches!(self, Mode::WritePulse | Mode::ReadWritePulse)
    }

    /// What a bus access does for the pulse modes, for generated comments.
    ///
    /// `None` for modes whose name already says it all.
    pub fn semantics(self) -> Option<&'static str> {
        match self {
            Mode::WritePulse => Some(
                "Written '1's are asserted for one clock cycle in the FPGA logic. \
                 The written value is not stored.",
            ),
            Mode::ReadWritePulse => Some(
                "Reads return status latched by the FPGA logic. Written '1's are asserted \
                 for one clock cycle and clear the corresponding status bits.",
            ),
            Mode::Read | Mode::Write | Mode::ReadWrite => None,
        }
    }
}

/// A single named bit within a register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bit {
    index: usize,
    name: String,
    description: String,
}

impl Bit {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Mask with only this bit set.
    pub fn mask(&self) -> u32 {
        1 << self.index
    }
}

/// An addressable 32-bit register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Register {
    name: String,
    index: usize,
    mode: Mode,
    description: String,
    bits: Vec<Bit>,
}

impl Register {
    fn new(name: &str, index: usize, mode: Mode, description: &str) -> Self {
        Self {
            name: name.to_string(),
            index,
            mode,
            description: description.to_string(),
            bits: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn bits(&self) -> &[Bit] {
        &self.bits
    }

    /// Byte address of the register relative to the module base address.
    pub fn address(&self) -> usize {
        REGISTER_BYTES * self.index
    }

    pub fn mode_readable(&self) -> &'static str {
        self.mode.readable()
    }

    pub fn get_bit(&self, name: &str) -> Option<&Bit> {
        self.bits.iter().find(|bit| bit.name == name)
    }

    /// Append a bit. Its index is the number of bits already present.
    pub fn append_bit(&mut self, name: &str, description: &str) -> Result<&Bit> {
        if self.get_bit(name).is_some() {
            return Err(RegisterError::DuplicateKey {
                key: name.to_string(),
                context: format!("register \"{}\"", self.name),
            });
        }
        if self.bits.len() >= REGISTER_WIDTH {
            return Err(RegisterError::TooManyBits {
                register: self.name.clone(),
            });
        }
        self.bits.push(Bit {
            index: self.bits.len(),
            name: name.to_string(),
            description: description.to_string(),
        });
        Ok(&self.bits[self.bits.len() - 1])
    }
}

/// The default registers as (name, mode, description), in address order.
pub const DEFAULT_REGISTERS: [(&str, Mode, &str); 5] = [
    ("config", Mode::ReadWrite, "Configuration register."),
    (
        "command",
        Mode::WritePulse,
        "When this register is written, all '1's in the written word will be asserted \
         for one clock cycle in the FPGA logic.",
    ),
    ("status", Mode::Read, "Status register."),
    (
        "irq_status",
        Mode::ReadWritePulse,
        "Reading a '1' in this register means the corresponding interrupt has triggered. \
         Writing to this register will clear the interrupts where there is a '1' in the \
         written word.",
    ),
    (
        "irq_mask",
        Mode::ReadWrite,
        "A '1' in this register means that the corresponding interrupt is enabled.",
    ),
];

/// Names taken by module-level symbols of the generated code
/// (`<module>_num_regs`, the `<module>_regs_h` include guard, ...).
///
/// A register with one of these names would define the same symbol twice.
pub const RESERVED_NAMES: [&str; 8] = [
    "num_regs",
    "reg_range",
    "reg_modes",
    "reg_mode_t",
    "reg_mode_vec_t",
    "reg_t",
    "regs_t",
    "regs_h",
];

/// All registers of one module, in address order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterList {
    name: String,
    source_definition_file: Option<PathBuf>,
    registers: Vec<Register>,
    has_default_registers: bool,
}

impl RegisterList {
    /// Create an empty register list.
    ///
    /// `name` prefixes every generated symbol and file name.
    pub fn new(name: &str, source_definition_file: Option<&Path>) -> Self {
        Self {
            name: name.to_string(),
            source_definition_file: source_definition_file.map(Path::to_path_buf),
            registers: Vec::new(),
            has_default_registers: false,
        }
    }

    /// Create a register list holding the five default registers at indices 0 to 4.
    pub fn from_default_registers(name: &str, source_definition_file: Option<&Path>) -> Self {
        let mut register_list = Self::new(name, source_definition_file);
        register_list.registers = DEFAULT_REGISTERS
            .iter()
            .enumerate()
            .map(|(index, (name, mode, description))| {
                Register::new(name, index, *mode, description)
            })
            .collect();
        register_list.has_default_registers = true;
        register_list
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_definition_file(&self) -> Option<&Path> {
        self.source_definition_file.as_deref()
    }

    pub(crate) fn set_source_definition_file(&mut self, path: &Path) {
        self.source_definition_file = Some(path.to_path_buf());
    }

    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Register> {
        self.registers.iter()
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    /// True if `name` is one of the default registers held by this list.
    pub fn is_default_register(&self, name: &str) -> bool {
        self.has_default_registers && DEFAULT_REGISTERS.iter().any(|(n, _, _)| *n == name)
    }

    /// Append a register after the existing ones and return it so bits can be added.
    ///
    /// Fails if `name` is taken by another register, is one of
    /// [`RESERVED_NAMES`] or produces the same symbol as an existing bit.
    pub fn append(&mut self, name: &str, mode: Mode) -> Result<&mut Register> {
        if self.get_register(name).is_some() {
            return Err(RegisterError::DuplicateKey {
                key: name.to_string(),
                context: format!("register list \"{}\"", self.name),
            });
        }
        if RESERVED_NAMES.iter().any(|reserved| reserved.eq_ignore_ascii_case(name)) {
            return Err(RegisterError::ReservedName {
                register: name.to_string(),
                register_list: self.name.clone(),
            });
        }
        let suffix = name.to_ascii_lowercase();
        if let Some((_, owner)) = self.symbol_suffixes().find(|(other, _)| *other == suffix) {
            return Err(self.symbol_clash(&suffix, owner, format!("register '{name}'")));
        }
        let index = self.registers.len();
        self.registers.push(Register::new(name, index, mode, ""));
        Ok(&mut self.registers[index])
    }

    pub fn get_register(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|register| register.name == name)
    }

    pub fn get_register_mut(&mut self, name: &str) -> Option<&mut Register> {
        self.registers
            .iter_mut()
            .find(|register| register.name == name)
    }

    /// Check that no two registers or bits generate the same symbol.
    ///
    /// Symbols are compared case-insensitively, since C macros are
    /// upper-cased and VHDL identifiers are case-insensitive. Register `a_b`
    /// and bit `b` of register `a` both give `<module>_a_b`, for example.
    pub fn check_symbols(&self) -> Result<()> {
        let mut owners: HashMap<String, String> = RESERVED_NAMES
            .iter()
            .map(|name| (name.to_string(), "a generated constant".to_string()))
            .collect();
        for (suffix, owner) in self.symbol_suffixes() {
            if let Some(first) = owners.get(&suffix) {
                return Err(self.symbol_clash(&suffix, first.clone(), owner));
            }
            owners.insert(suffix, owner);
        }

        // Register names are also element names of the C struct and the VHDL
        // record, with a suffix where they are keywords.
        let mut elements: HashMap<(&str, String), &str> = HashMap::new();
        for register in &self.registers {
            let names = [
                ("C", tweak_keywords(&register.name).to_string()),
                ("VHDL", tweak_vhdl_keywords(&register.name).to_ascii_lowercase()),
            ];
            for key in names {
                if let Some(first) = elements.insert(key.clone(), &register.name) {
                    return Err(RegisterError::SymbolClash {
                        symbol: format!("{}_regs_t.{}", self.name, key.1),
                        first: format!("register '{first}'"),
                        second: format!("register '{}'", register.name),
                    });
                }
            }
        }
        Ok(())
    }

    /// Lower-case `<suffix>` of every `<module>_<suffix>` symbol generated
    /// for a register or bit, with a description of its owner.
    fn symbol_suffixes(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.registers.iter().flat_map(|register| {
            let name = register.name.to_ascii_lowercase();
            let bits = register.bits.iter().map(move |bit| {
                (
                    format!("{}_{}", register.name, bit.name).to_ascii_lowercase(),
                    format!("bit '{}' of register '{}'", bit.name, register.name),
                )
            });
            std::iter::once((name, format!("register '{}'", register.name))).chain(bits)
        })
    }

    fn symbol_clash(&self, suffix: &str, first: String, second: String) -> RegisterError {
        RegisterError::SymbolClash {
            symbol: format!("{}_{suffix}", self.name),
            first,
            second,
        }
    }
}

impl<'a> IntoIterator for &'a RegisterList {
    type Item = &'a Register;
    type IntoIter = std::slice::Iter<'a, Register>;

    fn into_iter(self) -> Self::IntoIter {
        self.registers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_mode_strings() {
        assert_eq!(Mode::from_str("r_wpulse").unwrap(), Mode::ReadWritePulse);
        assert_eq!(Mode::ReadWrite.as_ref(), "r_w");
        assert_eq!(Mode::WritePulse.readable(), "Write-pulse");
        assert!(Mode::from_str("rw").is_err());
        assert!(Mode::ReadWrite.semantics().is_none());
        assert!(Mode::ReadWritePulse.semantics().unwrap().contains("clear"));
        assert_ne!(Mode::WritePulse.semantics(), Mode::ReadWritePulse.semantics());
        for mode in Mode::iter() {
            assert_eq!(Mode::from_str(mode.as_ref()).unwrap(), mode);
        }
    }

    #[test]
    fn test_mode_capabilities() {
        assert!(Mode::Read.is_readable() && !Mode::Read.is_writable());
        assert!(!Mode::Write.is_readable() && Mode::Write.is_writable());
        assert!(!Mode::WritePulse.is_readable() && Mode::WritePulse.is_pulse());
        assert!(Mode::ReadWritePulse.is_readable() && Mode::ReadWritePulse.is_pulse());
        assert!(!Mode::ReadWrite.is_pulse());
    }

    #[test]
    fn test_addresses_follow_index() {
        let mut register_list = RegisterList::new("test", None);
        for i in 0..256 {
            register_list
                .append(&format!("reg{i}"), Mode::ReadWrite)
                .unwrap();
        }
        for (i, register) in register_list.iter().enumerate() {
            assert_eq!(register.index(), i);
            assert_eq!(register.address(), 4 * i);
        }
    }

    #[test]
    fn test_default_registers() {
        let register_list = RegisterList::from_default_registers("test", None);
        let names: Vec<_> = register_list.iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            ["config", "command", "status", "irq_status", "irq_mask"]
        );
        assert_eq!(
            register_list.get_register("irq_status").unwrap().mode(),
            Mode::ReadWritePulse
        );
        assert_eq!(register_list.get_register("irq_mask").unwrap().address(), 16);
        assert!(register_list.is_default_register("status"));
        assert!(!RegisterList::new("test", None).is_default_register("status"));
    }

    #[test]
    fn test_append_after_default_registers() {
        let mut register_list = RegisterList::from_default_registers("test", None);
        let register = register_list.append("my_reg", Mode::ReadWrite).unwrap();
        assert_eq!(register.index(), 5);
        assert_eq!(register.address(), 0x14);
    }

    #[test]
    fn test_duplicate_register_rejected() {
        let mut register_list = RegisterList::new("test", None);
        register_list.append("conf", Mode::ReadWrite).unwrap();
        let err = register_list.append("conf", Mode::Read).unwrap_err();
        assert!(
            matches!(err, RegisterError::DuplicateKey { ref key, .. } if key == "conf"),
            "{err}"
        );
        assert_eq!(register_list.len(), 1);
    }

    #[test]
    fn test_reserved_names_rejected() {
        for reserved in RESERVED_NAMES {
            let mut register_list = RegisterList::from_default_registers("test", None);
            let err = register_list.append(reserved, Mode::ReadWrite).unwrap_err();
            assert!(
                matches!(err, RegisterError::ReservedName { ref register, .. } if register == reserved),
                "{err}"
            );
            let upper = reserved.to_ascii_uppercase();
            assert!(register_list.append(&upper, Mode::Read).is_err());
            assert_eq!(register_list.len(), 5);
        }
        // Only exact names are reserved.
        let mut register_list = RegisterList::new("test", None);
        register_list.append("num_regs_in_fifo", Mode::Read).unwrap();
    }

    #[test]
    fn test_register_clashes_with_bit_symbol() {
        let mut register_list = RegisterList::new("test", None);
        let register = register_list.append("a", Mode::ReadWrite).unwrap();
        register.append_bit("b", "").unwrap();
        let err = register_list.append("a_b", Mode::Read).unwrap_err();
        match err {
            RegisterError::SymbolClash { symbol, first, second } => {
                assert_eq!(symbol, "test_a_b");
                assert_eq!(first, "bit 'b' of register 'a'");
                assert_eq!(second, "register 'a_b'");
            }
            other => panic!("unexpected error {other}"),
        }
        assert!(matches!(
            register_list.append("A", Mode::Read),
            Err(RegisterError::SymbolClash { .. })
        ));
        assert_eq!(register_list.len(), 1);
    }

    #[test]
    fn test_check_symbols() {
        let mut register_list = RegisterList::from_default_registers("test", None);
        register_list.append("a_b", Mode::Read).unwrap();
        let register = register_list.append("conf", Mode::ReadWrite).unwrap();
        register.append_bit("enable", "").unwrap();
        register_list.check_symbols().unwrap();

        // Bits are added through the register, so the clash shows up here.
        let register = register_list.get_register_mut("config").unwrap();
        register.append_bit("x", "").unwrap();
        register_list.check_symbols().unwrap();
        register_list.append("a", Mode::ReadWrite).unwrap().append_bit("b", "").unwrap();
        let err = register_list.check_symbols().unwrap_err();
        assert!(
            matches!(err, RegisterError::SymbolClash { ref symbol, .. } if symbol == "test_a_b"),
            "{err}"
        );

        let mut register_list = RegisterList::new("test", None);
        register_list.append("num", Mode::Read).unwrap().append_bit("regs", "").unwrap();
        let err = register_list.check_symbols().unwrap_err();
        assert!(
            matches!(err, RegisterError::SymbolClash { ref symbol, ref first, .. } if symbol == "test_num_regs" && first == "a generated constant"),
            "{err}"
        );
    }

    #[test]
    fn test_keyword_element_clash() {
        let mut register_list = RegisterList::new("test", None);
        register_list.append("buffer", Mode::ReadWrite).unwrap();
        register_list.append("default", Mode::ReadWrite).unwrap();
        register_list.check_symbols().unwrap();

        let mut vhdl = register_list.clone();
        vhdl.append("buffer_reg", Mode::Read).unwrap();
        let err = vhdl.check_symbols().unwrap_err();
        assert!(
            matches!(err, RegisterError::SymbolClash { ref symbol, .. } if symbol == "test_regs_t.buffer_reg"),
            "{err}"
        );

        register_list.append("default_", Mode::Read).unwrap();
        let err = register_list.check_symbols().unwrap_err();
        assert!(
            matches!(err, RegisterError::SymbolClash { ref symbol, .. } if symbol == "test_regs_t.default_"),
            "{err}"
        );
    }

    #[test]
    fn test_bits() {
        let mut register_list = RegisterList::new("test", None);
        let register = register_list.append("conf", Mode::ReadWrite).unwrap();
        register.append_bit("enable", "Enable it.").unwrap();
        register.append_bit("flush", "").unwrap();
        assert!(matches!(
            register.append_bit("enable", ""),
            Err(RegisterError::DuplicateKey { .. })
        ));

        let register = register_list.get_register("conf").unwrap();
        assert_eq!(register.bits().len(), 2);
        let flush = register.get_bit("flush").unwrap();
        assert_eq!(flush.index(), 1);
        assert_eq!(flush.mask(), 0b10);
    }

    #[test]
    fn test_bit_limit() {
        let mut register_list = RegisterList::new("test", None);
        let register = register_list.append("wide", Mode::Read).unwrap();
        for i in 0..32 {
            register.append_bit(&format!("b{i}"), "").unwrap();
        }
        assert_eq!(register.get_bit("b31").unwrap().mask(), 0x8000_0000);
        assert!(register.append_bit("b32", "").is_err());
    }
}

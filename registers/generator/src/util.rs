// Licensed under the Apache-2.0 license

//! Utility functions for name conversion and formatting.
//!
//! Generated symbols follow one scheme across every output format:
//! `<module>_<register>` and `<module>_<register>_<bit>`, upper-cased for C
//! macros and kept as written for VHDL and HTML.

use std::borrow::Cow;

/// C++ class name for a module: words split at anything that is not an
/// ASCII letter or digit, each word capitalized.
///
/// # Examples
/// ```
/// use fpga_registers::util::camel_case;
/// assert_eq!(camel_case("my_register"), "MyRegister");
/// assert_eq!(camel_case("i2c_ctrl"), "I2cCtrl");
/// ```
pub fn camel_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let (first, rest) = word.split_at(1);
            first.to_ascii_uppercase() + &rest.to_ascii_lowercase()
        })
        .collect()
}

/// Register-level symbol: `<module>_<register>`.
pub fn register_symbol(module: &str, register: &str) -> String {
    format!("{module}_{register}")
}

/// Bit-level symbol: `<module>_<register>_<bit>`.
pub fn bit_symbol(module: &str, register: &str, bit: &str) -> String {
    format!("{module}_{register}_{bit}")
}

/// Upper-case form of a symbol, for C preprocessor constants.
pub fn macro_name(symbol: &str) -> String {
    symbol.to_ascii_uppercase()
}

/// Appends underscore suffix to C and C++ keywords so that register names
/// can be used as bare struct field names.
pub fn tweak_keywords(s: &str) -> &str {
    match s {
        "auto" => "auto_",
        "break" => "break_",
        "case" => "case_",
        "char" => "char_",
        "class" => "class_",
        "const" => "const_",
        "continue" => "continue_",
        "default" => "default_",
        "delete" => "delete_",
        "do" => "do_",
        "double" => "double_",
        "else" => "else_",
        "enum" => "enum_",
        "extern" => "extern_",
        "float" => "float_",
        "for" => "for_",
        "goto" => "goto_",
        "if" => "if_",
        "inline" => "inline_",
        "int" => "int_",
        "long" => "long_",
        "namespace" => "namespace_",
        "new" => "new_",
        "operator" => "operator_",
        "private" => "private_",
        "protected" => "protected_",
        "public" => "public_",
        "register" => "register_",
        "restrict" => "restrict_",
        "return" => "return_",
        "short" => "short_",
        "signed" => "signed_",
        "sizeof" => "sizeof_",
        "static" => "static_",
        "struct" => "struct_",
        "switch" => "switch_",
        "template" => "template_",
        "this" => "this_",
        "typedef" => "typedef_",
        "union" => "union_",
        "unsigned" => "unsigned_",
        "virtual" => "virtual_",
        "void" => "void_",
        "volatile" => "volatile_",
        "while" => "while_",
        s => s,
    }
}

/// Reserved words of VHDL-2008.
const VHDL_KEYWORDS: [&str; 113] = [
    "abs", "access", "after", "alias", "all", "and", "architecture", "array", "assert",
    "assume", "attribute", "begin", "block", "body", "buffer", "bus", "case", "component",
    "configuration", "constant", "context", "cover", "default", "disconnect", "downto", "else",
    "elsif", "end", "entity", "exit", "fairness", "file", "for", "force", "function",
    "generate", "generic", "group", "guarded", "if", "impure", "in", "inertial", "inout", "is",
    "label", "library", "linkage", "literal", "loop", "map", "mod", "nand", "new", "next",
    "nor", "not", "null", "of", "on", "open", "or", "others", "out", "package", "parameter",
    "port", "postponed", "procedure", "process", "property", "protected", "pure", "range",
    "record", "register", "reject", "release", "rem", "report", "restrict", "return", "rol",
    "ror", "select", "sequence", "severity", "shared", "signal", "sla", "sll", "sra", "srl",
    "strong", "subtype", "then", "to", "transport", "type", "unaffected", "units", "until",
    "use", "variable", "vmode", "vprop", "vunit", "wait", "when", "while", "with", "xnor",
    "xor",
];

/// Appends `_reg` to VHDL reserved words so that register names can be used
/// as record element names.
///
/// VHDL identifiers are case-insensitive and can not end with an underscore.
///
/// # Examples
/// ```
/// use fpga_registers::util::tweak_vhdl_keywords;
/// assert_eq!(tweak_vhdl_keywords("buffer"), "buffer_reg");
/// assert_eq!(tweak_vhdl_keywords("Next"), "Next_reg");
/// assert_eq!(tweak_vhdl_keywords("status"), "status");
/// ```
pub fn tweak_vhdl_keywords(s: &str) -> Cow<'_, str> {
    if VHDL_KEYWORDS.contains(&s.to_ascii_lowercase().as_str()) {
        Cow::Owned(format!("{s}_reg"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Formats an integer as an upper-case hex constant, e.g. `0x14`.
///
/// # Examples
/// ```
/// use fpga_registers::util::hex_const;
/// assert_eq!(hex_const(0), "0x0");
/// assert_eq!(hex_const(0x14), "0x14");
/// assert_eq!(hex_const(0x8000_0000), "0x80000000");
/// ```
pub fn hex_const(val: u64) -> String {
    format!("0x{val:X}")
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn html_escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            c => result.push(c),
        }
    }
    result
}

/// Yields the lines of a free-text description, skipping surrounding blank
/// lines, so it can be placed in line comments.
pub fn comment_lines(text: &str) -> impl Iterator<Item = &str> {
    text.trim().lines().map(str::trim_end)
}

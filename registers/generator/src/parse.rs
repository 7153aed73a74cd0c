// Licensed under the Apache-2.0 license

//! Parsing of register definition files (TOML or JSON) into a [`RegisterList`].
//!
//! A definition file maps register names to entries:
//!
//! ```toml
//! [conf]
//! mode = "r_w"
//! description = "Configuration."
//!
//! [conf.bits]
//! enable = "Enable the core."
//! ```
//!
//! Declaration order in the file is address order. Duplicate register or bit
//! names are reported after the file is traversed, before any register is
//! built.

use crate::error::{RegisterError, Result};
use crate::model::{Mode, RegisterList};
use log::debug;
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;
use std::str::FromStr;

/// Supported definition file formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefinitionFormat {
    Toml,
    Json,
}

impl DefinitionFormat {
    /// Select the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(DefinitionFormat::Toml),
            Some("json") => Ok(DefinitionFormat::Json),
            _ => Err(RegisterError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Build a register list named `name` from the definition file at `path`.
///
/// With `default_registers` the five default registers are placed at indices
/// 0 to 4 and the file's registers follow them.
pub fn register_list_from_file(
    name: &str,
    path: &Path,
    default_registers: bool,
) -> Result<RegisterList> {
    let register_list = if default_registers {
        RegisterList::from_default_registers(name, None)
    } else {
        RegisterList::new(name, None)
    };
    parse_file_into(register_list, path)
}

/// Add the registers of the definition file at `path` to `register_list`.
///
/// The list is consumed so that a failing parse never leaves a partially
/// extended list behind.
pub fn parse_file_into(mut register_list: RegisterList, path: &Path) -> Result<RegisterList> {
    let content =
        std::fs::read_to_string(path).map_err(|source| RegisterError::reading(path, source))?;
    let format = DefinitionFormat::from_path(path)?;
    register_list.set_source_definition_file(path);
    parse_str_into(register_list, &content, format, path)
}

/// Add the registers described by `content` to `register_list`.
///
/// `path` is only used in error messages.
pub fn parse_str_into(
    mut register_list: RegisterList,
    content: &str,
    format: DefinitionFormat,
    path: &Path,
) -> Result<RegisterList> {
    let definition = match format {
        DefinitionFormat::Toml => read_toml(content, path)?,
        DefinitionFormat::Json => serde_json::from_str::<UniqueEntries<RegisterEntry>>(content)
            .map_err(|err| malformed(&err.to_string(), path))?,
    };
    if let Some(key) = definition.first_duplicate() {
        return Err(RegisterError::DuplicateKey {
            key: key.to_string(),
            context: format!("{path:?}"),
        });
    }

    for (register_name, entry) in definition.entries {
        let mode = entry
            .mode
            .as_deref()
            .map(|mode| {
                Mode::from_str(mode).map_err(|_| RegisterError::InvalidMode {
                    register: register_name.clone(),
                    mode: mode.to_string(),
                })
            })
            .transpose()?;

        // A default register may be given bits and a description, but keeps its mode.
        let is_default = register_list.is_default_register(&register_name);
        let register = match register_list.get_register_mut(&register_name) {
            Some(register) if is_default => {
                if let Some(mode) = mode.filter(|mode| *mode != register.mode()) {
                    return Err(RegisterError::DefaultRegisterModeOverride {
                        register: register_name,
                        default_mode: register.mode().as_ref().to_string(),
                        mode: mode.as_ref().to_string(),
                        path: path.to_path_buf(),
                    });
                }
                register
            }
            _ => {
                let Some(mode) = mode else {
                    return Err(RegisterError::MissingMode {
                        register: register_name,
                        path: path.to_path_buf(),
                    });
                };
                register_list.append(&register_name, mode)?
            }
        };

        if let Some(description) = &entry.description {
            register.set_description(description);
        }
        for (bit_name, bit_description) in entry.bits.map(|bits| bits.entries).unwrap_or_default() {
            register.append_bit(&bit_name, &bit_description)?;
        }
        debug!(
            "Parsed register {} ({}) with {} bits",
            register.name(),
            register.mode().as_ref(),
            register.bits().len()
        );
    }

    register_list.check_symbols()?;
    Ok(register_list)
}

/// Start of the TOML parser's message for a key or table defined twice.
const TOML_DUPLICATE_KEY: &str = "duplicate key `";

/// Parse TOML in two passes.
///
/// The first pass only runs the TOML parser, so its errors never carry text
/// from string values. A repeated key or table is reported there. The second
/// pass builds the entries in declaration order.
fn read_toml(content: &str, path: &Path) -> Result<UniqueEntries<RegisterEntry>> {
    if let Err(err) = content.parse::<toml::Table>() {
        return Err(match toml_duplicate_key(err.message()) {
            Some(key) => RegisterError::DuplicateKey {
                key: key.to_string(),
                context: format!("{path:?}"),
            },
            None => malformed(&err.to_string(), path),
        });
    }
    toml::from_str(content).map_err(|err| malformed(&err.to_string(), path))
}

/// Key named by a TOML parser error such as
/// "duplicate key `conf` in document root".
fn toml_duplicate_key(message: &str) -> Option<&str> {
    // The cause comes last, after context lines like "invalid table header".
    let rest = message.lines().last()?.strip_prefix(TOML_DUPLICATE_KEY)?;
    let key = match rest.rsplit_once("` in ") {
        Some((key, _)) => key,
        None => rest.strip_suffix('`')?,
    };
    // Keys that are not bare are shown quoted.
    for quote in ['"', '\''] {
        if let Some(unquoted) = key.strip_prefix(quote).and_then(|key| key.strip_suffix(quote)) {
            return Some(unquoted);
        }
    }
    Some(key)
}

fn malformed(message: &str, path: &Path) -> RegisterError {
    RegisterError::MalformedInput {
        path: path.to_path_buf(),
        message: message.trim().to_string(),
    }
}

/// One register as written in the definition file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegisterEntry {
    mode: Option<String>,
    description: Option<String>,
    bits: Option<UniqueEntries<String>>,
}

/// Table entries in declaration order.
///
/// A repeated key does not fail deserialization. Its value is skipped and
/// the first repeated key is kept in `duplicate`, to be reported once the
/// whole file has been read.
#[derive(Debug)]
struct UniqueEntries<V> {
    entries: Vec<(String, V)>,
    duplicate: Option<String>,
}

impl UniqueEntries<RegisterEntry> {
    /// First repeated register name, or else the first repeated bit name.
    fn first_duplicate(&self) -> Option<&str> {
        self.duplicate.as_deref().or_else(|| {
            self.entries
                .iter()
                .find_map(|(_, entry)| entry.bits.as_ref()?.duplicate.as_deref())
        })
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for UniqueEntries<V> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = UniqueEntries<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a table of named entries")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, V)> = Vec::new();
                let mut duplicate = None;
                while let Some(key) = map.next_key::<String>()? {
                    if entries.iter().any(|(existing, _)| *existing == key) {
                        map.next_value::<IgnoredAny>()?;
                        if duplicate.is_none() {
                            duplicate = Some(key);
                        }
                        continue;
                    }
                    let value = map.next_value()?;
                    entries.push((key, value));
                }
                Ok(UniqueEntries { entries, duplicate })
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RESERVED_NAMES;
    use std::path::PathBuf;

    fn parse_toml(content: &str) -> Result<RegisterList> {
        parse_str_into(
            RegisterList::new("test", None),
            content,
            DefinitionFormat::Toml,
            Path::new("regs_test.toml"),
        )
    }

    fn parse_json(content: &str) -> Result<RegisterList> {
        parse_str_into(
            RegisterList::new("test", None),
            content,
            DefinitionFormat::Json,
            Path::new("regs_test.json"),
        )
    }

    #[test]
    fn test_toml_declaration_order() {
        let register_list = parse_toml(
            r#"
[zeta]
mode = "r_w"
description = "Declared first."

[zeta.bits]
b = "First bit."
a = "Second bit."

[alpha]
mode = "r"
"#,
        )
        .unwrap();

        let names: Vec<_> = register_list.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        let zeta = register_list.get_register("zeta").unwrap();
        assert_eq!(zeta.index(), 0);
        assert_eq!(zeta.description(), "Declared first.");
        assert_eq!(zeta.get_bit("b").unwrap().index(), 0);
        assert_eq!(zeta.get_bit("a").unwrap().index(), 1);
        assert_eq!(register_list.get_register("alpha").unwrap().address(), 4);
    }

    #[test]
    fn test_json_declaration_order() {
        let register_list = parse_json(
            r#"{
  "zeta": {"mode": "wpulse", "bits": {"go": "Start.", "abort": "Stop."}},
  "alpha": {"mode": "r_wpulse", "description": "Interrupts."}
}"#,
        )
        .unwrap();

        let zeta = &register_list.registers()[0];
        assert_eq!(zeta.name(), "zeta");
        assert_eq!(zeta.mode(), Mode::WritePulse);
        assert_eq!(zeta.description(), "");
        assert_eq!(zeta.bits()[1].name(), "abort");
        assert_eq!(register_list.registers()[1].mode(), Mode::ReadWritePulse);
    }

    #[test]
    fn test_json_duplicate_register() {
        let err = parse_json(
            r#"{
  "conf": {"mode": "r_w"},
  "status": {"mode": "r"},
  "conf": {"mode": "r"}
}"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, RegisterError::DuplicateKey { ref key, .. } if key == "conf"),
            "{err}"
        );
    }

    #[test]
    fn test_json_duplicate_bit() {
        let err = parse_json(
            r#"{"conf": {"mode": "r_w", "bits": {"enable": "a", "flush": "b", "enable": "c"}}}"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, RegisterError::DuplicateKey { ref key, .. } if key == "enable"),
            "{err}"
        );
    }

    #[test]
    fn test_toml_duplicate_register() {
        let err = parse_toml(
            r#"
[conf]
mode = "r_w"

[status]
mode = "r"

[conf]
mode = "r"
"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, RegisterError::DuplicateKey { ref key, .. } if key == "conf"),
            "{err}"
        );
    }

    #[test]
    fn test_toml_duplicate_bit() {
        let err = parse_toml(
            r#"
[conf]
mode = "r_w"

[conf.bits]
enable = "a"
enable = "b"
"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, RegisterError::DuplicateKey { ref key, .. } if key == "enable"),
            "{err}"
        );
    }

    #[test]
    fn test_duplicate_text_in_value_is_malformed() {
        let err = parse_json(
            r#"{"a": {"mode": "r"}, "b": {"mode": "r", "bits": "duplicate key `x`"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegisterError::MalformedInput { .. }), "{err}");

        let err = parse_toml("[b]\nmode = \"r\"\nbits = \"duplicate key `x`\"\n").unwrap_err();
        assert!(matches!(err, RegisterError::MalformedInput { .. }), "{err}");
    }

    #[test]
    fn test_duplicate_key_with_backtick() {
        let err = parse_json(r#"{"a`b": {"mode": "r"}, "a`b": {"mode": "w"}}"#).unwrap_err();
        assert!(
            matches!(err, RegisterError::DuplicateKey { ref key, .. } if key == "a`b"),
            "{err}"
        );

        let err = parse_toml("[\"a`b\"]\nmode = \"r\"\n\n[\"a`b\"]\nmode = \"w\"\n").unwrap_err();
        assert!(
            matches!(err, RegisterError::DuplicateKey { ref key, .. } if key == "a`b"),
            "{err}"
        );
    }

    #[test]
    fn test_toml_duplicate_key_message() {
        assert_eq!(
            toml_duplicate_key("invalid table header\nduplicate key `conf` in document root"),
            Some("conf")
        );
        assert_eq!(
            toml_duplicate_key("duplicate key `enable` in table `conf.bits`"),
            Some("enable")
        );
        assert_eq!(toml_duplicate_key("duplicate key `mode`"), Some("mode"));
        assert_eq!(toml_duplicate_key("expected `=`"), None);
    }

    #[test]
    fn test_reserved_register_names() {
        for reserved in RESERVED_NAMES {
            let toml = format!("[{reserved}]\nmode = \"r\"\n");
            let err = parse_toml(&toml).unwrap_err();
            assert!(
                matches!(err, RegisterError::ReservedName { ref register, .. } if register == reserved),
                "{reserved}: {err}"
            );

            let json = format!(r#"{{"conf": {{"mode": "r_w"}}, "{reserved}": {{"mode": "r"}}}}"#);
            let err = parse_json(&json).unwrap_err();
            assert!(
                matches!(err, RegisterError::ReservedName { ref register, .. } if register == reserved),
                "{reserved}: {err}"
            );
        }
    }

    #[test]
    fn test_register_bit_symbol_clash() {
        let err = parse_toml(
            r#"
[a]
mode = "r_w"

[a.bits]
b = "Bit b of a."

[a_b]
mode = "r"
"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, RegisterError::SymbolClash { ref symbol, .. } if symbol == "test_a_b"),
            "{err}"
        );

        // Also when the bit comes after the register.
        let err = parse_json(r#"{"a_b": {"mode": "r"}, "a": {"mode": "r_w", "bits": {"b": ""}}}"#)
            .unwrap_err();
        assert!(
            matches!(err, RegisterError::SymbolClash { ref symbol, .. } if symbol == "test_a_b"),
            "{err}"
        );
    }

    #[test]
    fn test_missing_mode() {
        let err = parse_toml(
            r#"
[conf]
mode = "r_w"

[data]
description = "No mode here."
"#,
        )
        .unwrap_err();
        match err {
            RegisterError::MissingMode { register, path } => {
                assert_eq!(register, "data");
                assert_eq!(path, PathBuf::from("regs_test.toml"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_invalid_mode() {
        let err = parse_json(r#"{"conf": {"mode": "rw"}}"#).unwrap_err();
        assert!(
            matches!(err, RegisterError::InvalidMode { ref register, ref mode } if register == "conf" && mode == "rw"),
            "{err}"
        );
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_json(r#"{"conf": {"mode": "r_w"},"#).unwrap_err();
        match err {
            RegisterError::MalformedInput { path, message } => {
                assert_eq!(path, PathBuf::from("regs_test.json"));
                assert!(message.contains("line 1"), "{message}");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_malformed_toml() {
        let err = parse_toml("[conf\nmode = \"r\"\n").unwrap_err();
        assert!(
            matches!(err, RegisterError::MalformedInput { .. }),
            "{err}"
        );
    }

    #[test]
    fn test_unknown_field() {
        let err = parse_toml("[conf]\nmode = \"r\"\nwidth = 16\n").unwrap_err();
        match err {
            RegisterError::MalformedInput { message, .. } => {
                assert!(message.contains("width"), "{message}")
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_default_register_extension() {
        let register_list = parse_str_into(
            RegisterList::from_default_registers("test", None),
            r#"
[irq_status.bits]
overflow = "FIFO overflow."

[config]
mode = "r_w"
description = "Core configuration."

[my_reg]
mode = "r_w"
"#,
            DefinitionFormat::Toml,
            Path::new("regs_test.toml"),
        )
        .unwrap();

        assert_eq!(register_list.len(), 6);
        let irq_status = register_list.get_register("irq_status").unwrap();
        assert_eq!(irq_status.index(), 3);
        assert_eq!(irq_status.get_bit("overflow").unwrap().index(), 0);
        assert_eq!(
            register_list.get_register("config").unwrap().description(),
            "Core configuration."
        );
        assert_eq!(register_list.get_register("my_reg").unwrap().index(), 5);
    }

    #[test]
    fn test_default_register_mode_override() {
        let err = parse_str_into(
            RegisterList::from_default_registers("test", None),
            "[status]\nmode = \"r_w\"\n",
            DefinitionFormat::Toml,
            Path::new("regs_test.toml"),
        )
        .unwrap_err();
        assert!(
            matches!(err, RegisterError::DefaultRegisterModeOverride { ref register, .. } if register == "status"),
            "{err}"
        );
    }

    #[test]
    fn test_file_not_found() {
        let err = register_list_from_file("test", Path::new("/does/not/exist.toml"), true)
            .unwrap_err();
        assert!(
            matches!(err, RegisterError::DefinitionNotFound { .. }),
            "{err}"
        );
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("regs_test.json");
        std::fs::write(&path, r#"{"my_reg": {"mode": "r_w"}}"#).unwrap();

        let register_list = register_list_from_file("test", &path, true).unwrap();
        assert_eq!(register_list.source_definition_file(), Some(path.as_path()));
        assert_eq!(register_list.get_register("my_reg").unwrap().address(), 0x14);

        let other = dir.path().join("regs_test.yaml");
        std::fs::write(&other, "my_reg: {}").unwrap();
        assert!(matches!(
            register_list_from_file("test", &other, true),
            Err(RegisterError::UnsupportedFormat { .. })
        ));
    }
}

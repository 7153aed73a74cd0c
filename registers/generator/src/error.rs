// Licensed under the Apache-2.0 license

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while building a register list or writing its artifacts.
///
/// None of these are recovered from inside the crate. The caller decides
/// whether a failing module aborts the whole run.
#[derive(Error, Debug)]
pub enum RegisterError {
    /// The register definition file does not exist.
    #[error("register definition file {path:?} does not exist")]
    DefinitionNotFound { path: PathBuf },

    /// The register definition file exists but could not be read.
    #[error("could not read register definition file {path:?}: {source}")]
    UnreadableDefinition {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported register definition format {path:?} (expected .toml or .json)")]
    UnsupportedFormat { path: PathBuf },

    /// Syntax or structure error reported by the JSON/TOML parser.
    #[error("error while parsing {path:?}: {message}")]
    MalformedInput { path: PathBuf, message: String },

    /// A register entry has no `mode` field.
    #[error("register \"{register}\" in {path:?} does not have a \"mode\" field")]
    MissingMode { register: String, path: PathBuf },

    /// Two registers, or two bits of one register, share a name.
    ///
    /// `context` names where the collision happened: the definition file or
    /// the register list/register that was being extended.
    #[error("duplicate key \"{key}\" in {context}")]
    DuplicateKey { key: String, context: String },

    /// A register name equals one of the module-level symbol names in
    /// [`crate::model::RESERVED_NAMES`].
    #[error(
        "register name \"{register}\" in register list \"{register_list}\" is reserved \
         for a generated constant"
    )]
    ReservedName {
        register: String,
        register_list: String,
    },

    /// Two registers or bits would generate the same symbol.
    #[error("{first} and {second} both generate the symbol \"{symbol}\"")]
    SymbolClash {
        symbol: String,
        first: String,
        second: String,
    },

    /// The mode string is not one of `r`, `w`, `r_w`, `wpulse`, `r_wpulse`.
    #[error(
        "register \"{register}\" has invalid mode \"{mode}\" \
         (expected one of r, w, r_w, wpulse, r_wpulse)"
    )]
    InvalidMode { register: String, mode: String },

    /// A register was given more bits than fit in its word.
    #[error("register \"{register}\" can not hold more than 32 bits")]
    TooManyBits { register: String },

    /// A definition file tried to change the mode of a default register.
    #[error(
        "register \"{register}\" in {path:?} is a default register with mode \"{default_mode}\" \
         and can not be given mode \"{mode}\""
    )]
    DefaultRegisterModeOverride {
        register: String,
        default_mode: String,
        mode: String,
        path: PathBuf,
    },

    /// A module root directory could not be listed.
    #[error("could not list module root {path:?}: {source}")]
    UnreadableModuleRoot {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// An output file or directory could not be created or written.
    #[error("could not write {path:?}: {source}")]
    UnwritableOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RegisterError {
    /// Error for a failed read of the definition file at `path`.
    pub(crate) fn reading(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            RegisterError::DefinitionNotFound {
                path: path.to_path_buf(),
            }
        } else {
            RegisterError::UnreadableDefinition {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Error for a failed write of `path`.
    pub(crate) fn writing(path: &Path, source: std::io::Error) -> Self {
        RegisterError::UnwritableOutput {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for register operations.
pub type Result<T> = std::result::Result<T, RegisterError>;

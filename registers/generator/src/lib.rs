// Licensed under the Apache-2.0 license

//! Register definitions for FPGA modules and code generation from them.
//!
//! A module describes its registers in a TOML or JSON file. This crate parses
//! that file into a [`RegisterList`] and renders the list into a VHDL
//! package, a C header, a C++ access class and HTML documentation, all
//! agreeing on register order, addresses and symbol names.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use fpga_registers::{register_list_from_file, ArtifactSelection, GitRevision, Registers};
//!
//! let register_list =
//!     register_list_from_file("uart", Path::new("uart/regs_uart.toml"), true).unwrap();
//! let registers = Registers::new(register_list, &GitRevision::new(Path::new(".")));
//! registers
//!     .create(Path::new("generated/uart"), &ArtifactSelection::all())
//!     .unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`model`]: [`RegisterList`], [`Register`], [`Bit`] and [`Mode`]
//! - [`parse`]: definition file parsing with duplicate detection
//! - [`codegen`]: one generator per output format
//! - [`registers`]: the [`Registers`] facade writing artifacts to disk
//! - [`module`]: discovery of module folders and per-module hooks
//! - [`provenance`]: the banner placed at the top of generated files
//! - [`config`]: selection of the artifacts to generate
//! - [`util`]: name conversion and formatting helpers

pub mod codegen;
pub mod config;
pub mod error;
pub mod model;
pub mod module;
pub mod parse;
pub mod provenance;
pub mod registers;
pub mod util;

pub use config::{ArtifactKind, ArtifactSelection};
pub use error::{RegisterError, Result};
pub use model::{Bit, Mode, Register, RegisterList, DEFAULT_REGISTERS, RESERVED_NAMES};
pub use module::{find_module_folders, get_modules, load_module, HookRegistry, Module, ModuleHooks};
pub use parse::{parse_file_into, register_list_from_file, DefinitionFormat};
pub use provenance::{Banner, GitRevision, NoRevision, RevisionProvider};
pub use registers::Registers;

// Licensed under the Apache-2.0 license

//! Discovery of modules in source trees.
//!
//! Every immediate sub-directory of a module root is a module named after the
//! directory:
//!
//! ```text
//! modules/
//! ├── uart/
//! │   ├── regs_uart.toml   # optional register definition
//! │   └── src/...
//! └── fifo/
//!     └── src/...          # no registers
//! ```
//!
//! A module with a `regs_<name>.toml` (or `regs_<name>.json`) file gets a
//! register list holding the default registers followed by the registers of
//! that file. Module specific adjustments are made through [`ModuleHooks`]
//! registered by name in a [`HookRegistry`].

use crate::config::ArtifactSelection;
use crate::error::{RegisterError, Result};
use crate::model::RegisterList;
use crate::parse::register_list_from_file;
use crate::provenance::RevisionProvider;
use crate::registers::Registers;
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Per-module customization, selected by module name at discovery time.
pub trait ModuleHooks {
    /// Adjust the register list after the definition file has been parsed,
    /// e.g. to append registers whose layout depends on generics.
    fn setup_registers(&self, _register_list: &mut RegisterList) -> Result<()> {
        Ok(())
    }

    /// Give the module a register list (default registers plus whatever
    /// [`ModuleHooks::setup_registers`] adds) even without a definition file.
    fn creates_registers(&self) -> bool {
        false
    }
}

/// [`ModuleHooks`] implementations keyed by module name.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<String, Box<dyn ModuleHooks>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `hooks` for the module called `module_name`, replacing any hooks
    /// registered before.
    pub fn register(&mut self, module_name: &str, hooks: Box<dyn ModuleHooks>) {
        self.hooks.insert(module_name.to_string(), hooks);
    }

    pub fn get(&self, module_name: &str) -> Option<&dyn ModuleHooks> {
        self.hooks.get(module_name).map(|hooks| &**hooks)
    }
}

/// A module folder and the register list built for it, if any.
#[derive(Clone, Debug)]
pub struct Module {
    name: String,
    library_name: String,
    path: PathBuf,
    register_list: Option<RegisterList>,
}

impl Module {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// HDL library the module is compiled into.
    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` if the module has no registers.
    pub fn registers(&self) -> Option<&RegisterList> {
        self.register_list.as_ref()
    }

    /// Write the selected register artifacts of this module into
    /// `output_dir`. Does nothing for a module without registers.
    pub fn create_register_artifacts(
        &self,
        output_dir: &Path,
        selection: &ArtifactSelection,
        provider: &dyn RevisionProvider,
    ) -> Result<Vec<PathBuf>> {
        let Some(register_list) = &self.register_list else {
            debug!("Module {} has no registers", self.name);
            return Ok(Vec::new());
        };
        Registers::new(register_list.clone(), provider).create(output_dir, selection)
    }
}

/// Definition file of the module in `path`, TOML preferred over JSON.
fn definition_file(path: &Path, name: &str) -> Option<PathBuf> {
    ["toml", "json"]
        .iter()
        .map(|ext| path.join(format!("regs_{name}.{ext}")))
        .find(|file| file.is_file())
}

/// Build the module in the folder `path`, parsing its definition file if
/// there is one.
pub fn load_module(path: &Path, name: &str, hooks: Option<&dyn ModuleHooks>) -> Result<Module> {
    let mut register_list = match definition_file(path, name) {
        Some(file) => Some(register_list_from_file(name, &file, true)?),
        None if hooks.is_some_and(|hooks| hooks.creates_registers()) => {
            Some(RegisterList::from_default_registers(name, None))
        }
        None => None,
    };
    if let (Some(register_list), Some(hooks)) = (register_list.as_mut(), hooks) {
        hooks.setup_registers(register_list)?;
        register_list.check_symbols()?;
    }

    Ok(Module {
        name: name.to_string(),
        library_name: name.to_string(),
        path: path.to_path_buf(),
        register_list,
    })
}

/// Module folders in `roots` as (name, path), sorted by name.
///
/// With a non-empty `include_names` only modules with one of those names are
/// returned. A module name found under two roots is an error.
pub fn find_module_folders(
    roots: &[PathBuf],
    include_names: &[String],
) -> Result<Vec<(String, PathBuf)>> {
    let mut folders: Vec<(String, PathBuf)> = Vec::new();
    for root in roots {
        for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|source| RegisterError::UnreadableModuleRoot {
                path: root.clone(),
                source,
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !include_names.is_empty() && !include_names.contains(&name) {
                continue;
            }
            if folders.iter().any(|(existing, _)| *existing == name) {
                return Err(RegisterError::DuplicateKey {
                    key: name,
                    context: format!("module roots {roots:?}"),
                });
            }
            folders.push((name, entry.into_path()));
        }
    }
    folders.sort();
    Ok(folders)
}

/// Discover and load the modules in `roots`, sorted by name.
///
/// Fails on the first module whose register definition is invalid.
pub fn get_modules(
    roots: &[PathBuf],
    include_names: &[String],
    hooks: &HookRegistry,
) -> Result<Vec<Module>> {
    let modules = find_module_folders(roots, include_names)?
        .into_iter()
        .map(|(name, path)| load_module(&path, &name, hooks.get(&name)))
        .collect::<Result<Vec<_>>>()?;
    info!(
        "Found {} modules, {} with registers",
        modules.len(),
        modules.iter().filter(|module| module.register_list.is_some()).count()
    );
    Ok(modules)
}

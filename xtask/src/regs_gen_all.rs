// Licensed under the Apache-2.0 license

//! Generate register artifacts for every module in a set of module roots.
//!
//! Artifacts of module `<name>` go to `<output>/<name>/`. A module whose
//! definition fails to parse or whose artifacts fail to write is reported in
//! the summary and the remaining modules are still generated.

use anyhow::{bail, Result};
use fpga_registers::{
    find_module_folders, load_module, ArtifactSelection, GitRevision, HookRegistry, Module,
    Registers,
};
use std::path::{Path, PathBuf};

/// Generate all modules below `roots` into `output`.
pub fn generate(roots: &[PathBuf], output: &Path, include: &[String], check: bool) -> Result<()> {
    let hooks = HookRegistry::new();
    let selection = ArtifactSelection::all();

    let mut generated_modules = Vec::new();
    let mut skipped_modules = Vec::new();
    let mut errors = Vec::new();

    for (name, path) in find_module_folders(roots, include)? {
        let module = match load_module(&path, &name, hooks.get(&name)) {
            Ok(module) => module,
            Err(e) => {
                errors.push(format!("Failed to load {name}: {e}"));
                continue;
            }
        };
        if module.registers().is_none() {
            skipped_modules.push(name);
            continue;
        }

        let provider = GitRevision::new(module.path());
        let result = if check {
            check_module(&module, &provider, &selection)
        } else {
            write_module(&module, &provider, &selection, output)
        };
        match result {
            Ok(()) => generated_modules.push(name),
            Err(e) => errors.push(format!("Failed to generate {name}: {e}")),
        }
    }

    // Report results
    println!("\n=== Generation Summary ===");
    if check {
        println!("Checked: {} modules", generated_modules.len());
    } else {
        println!("Generated: {} modules", generated_modules.len());
    }
    println!("Without registers: {} modules", skipped_modules.len());
    if !errors.is_empty() {
        println!("\nErrors ({}):", errors.len());
        for error in &errors {
            println!("  ✗ {}", error);
        }
        bail!("{} modules failed", errors.len());
    }

    Ok(())
}

/// In check mode, just verify we can generate.
fn check_module(
    module: &Module,
    provider: &GitRevision,
    selection: &ArtifactSelection,
) -> Result<()> {
    let Some(register_list) = module.registers() else {
        return Ok(());
    };
    let registers = Registers::new(register_list.clone(), provider);
    let bytes: usize = selection
        .iter()
        .filter_map(|kind| registers.render(kind))
        .map(|code| code.len())
        .sum();
    println!(
        "  ✓ Would generate {} ({} registers, {} bytes)",
        module.name(),
        register_list.len(),
        bytes
    );
    Ok(())
}

fn write_module(
    module: &Module,
    provider: &GitRevision,
    selection: &ArtifactSelection,
    output: &Path,
) -> Result<()> {
    let written =
        module.create_register_artifacts(&output.join(module.name()), selection, provider)?;
    println!("  ✓ Generated {} ({} files)", module.name(), written.len());
    Ok(())
}

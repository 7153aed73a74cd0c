// Licensed under the Apache-2.0 license

//! Generate register artifacts from a single definition file.

use anyhow::{Context, Result};
use fpga_registers::{
    register_list_from_file, ArtifactKind, ArtifactSelection, GitRevision, NoRevision, Registers,
    RevisionProvider,
};
use std::path::Path;

pub fn generate(
    file: &Path,
    name: &str,
    output: &Path,
    artifacts: &[ArtifactKind],
    default_registers: bool,
    git: bool,
) -> Result<()> {
    println!("Generating registers of {name} from: {}", file.display());

    let register_list = register_list_from_file(name, file, default_registers)
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    println!("Registers: {}", register_list.len());

    let selection = if artifacts.is_empty() {
        ArtifactSelection::all()
    } else {
        artifacts.iter().copied().collect()
    };

    let provider: Box<dyn RevisionProvider> = if git {
        let directory = file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        Box::new(GitRevision::new(directory))
    } else {
        Box::new(NoRevision)
    };

    let written = Registers::new(register_list, provider.as_ref())
        .create(output, &selection)
        .with_context(|| format!("Failed to write to {}", output.display()))?;
    for path in &written {
        println!("  ✓ Generated {}", path.display());
    }
    println!("Output written to: {}", output.display());

    Ok(())
}

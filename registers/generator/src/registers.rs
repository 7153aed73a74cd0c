// Licensed under the Apache-2.0 license

//! Facade that renders a register list with every generator and writes the
//! results to disk.

use crate::codegen::{
    CHeaderGenerator, CppHeaderGenerator, CppImplementationGenerator, CppInterfaceGenerator,
    HtmlPageGenerator, HtmlTableGenerator, RegisterCodeGenerator, VhdlPackageGenerator,
    HTML_STYLESHEET, HTML_STYLESHEET_NAME,
};
use crate::config::{ArtifactKind, ArtifactSelection};
use crate::error::{RegisterError, Result};
use crate::model::RegisterList;
use crate::provenance::{Banner, RevisionProvider};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// A register list together with the banner stamped on its artifacts.
///
/// Each `create_*` method writes one artifact into the given directory and
/// returns the path of the written file.
#[derive(Clone, Debug)]
pub struct Registers {
    register_list: RegisterList,
    banner: Banner,
}

impl Registers {
    /// Compute the banner once, from the revision reported by `provider`.
    pub fn new(register_list: RegisterList, provider: &dyn RevisionProvider) -> Self {
        let banner = Banner::new(&register_list, provider);
        Self::with_banner(register_list, banner)
    }

    pub fn with_banner(register_list: RegisterList, banner: Banner) -> Self {
        Self {
            register_list,
            banner,
        }
    }

    pub fn register_list(&self) -> &RegisterList {
        &self.register_list
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    /// Render one artifact. `None` for [`ArtifactKind::SourceCopy`], which is
    /// copied rather than rendered.
    pub fn render(&self, kind: ArtifactKind) -> Option<String> {
        kind.generator()
            .map(|generator| generator.render(&self.register_list, &self.banner))
    }

    /// Write the VHDL package into `output_dir`, which must already exist.
    pub fn create_vhdl_package(&self, output_dir: &Path) -> Result<PathBuf> {
        self.write(&VhdlPackageGenerator, output_dir)
    }

    pub fn create_c_header(&self, output_dir: &Path) -> Result<PathBuf> {
        create_dir(output_dir)?;
        self.write(&CHeaderGenerator, output_dir)
    }

    pub fn create_cpp_interface(&self, output_dir: &Path) -> Result<PathBuf> {
        create_dir(output_dir)?;
        self.write(&CppInterfaceGenerator, output_dir)
    }

    pub fn create_cpp_header(&self, output_dir: &Path) -> Result<PathBuf> {
        create_dir(output_dir)?;
        self.write(&CppHeaderGenerator, output_dir)
    }

    pub fn create_cpp_implementation(&self, output_dir: &Path) -> Result<PathBuf> {
        create_dir(output_dir)?;
        self.write(&CppImplementationGenerator, output_dir)
    }

    /// Write the HTML page and the stylesheet it links to.
    pub fn create_html_page(&self, output_dir: &Path) -> Result<PathBuf> {
        create_dir(output_dir)?;
        write_file(&output_dir.join(HTML_STYLESHEET_NAME), HTML_STYLESHEET.as_bytes())?;
        self.write(&HtmlPageGenerator, output_dir)
    }

    pub fn create_html_table(&self, output_dir: &Path) -> Result<PathBuf> {
        create_dir(output_dir)?;
        self.write(&HtmlTableGenerator, output_dir)
    }

    /// Copy the definition file the list was parsed from into `output_dir`.
    ///
    /// Returns `Ok(None)` without touching the file system if the list was
    /// not built from a file.
    pub fn copy_source_definition(&self, output_dir: &Path) -> Result<Option<PathBuf>> {
        let Some(source) = self.register_list.source_definition_file() else {
            debug!(
                "No source definition file for {}, nothing to copy",
                self.register_list.name()
            );
            return Ok(None);
        };
        let contents = std::fs::read(source).map_err(|err| RegisterError::reading(source, err))?;
        let file_name = source.file_name().ok_or_else(|| RegisterError::DefinitionNotFound {
            path: source.to_path_buf(),
        })?;

        create_dir(output_dir)?;
        let dest_file = output_dir.join(file_name);
        write_file(&dest_file, &contents)?;
        Ok(Some(dest_file))
    }

    /// Create every selected artifact in `output_dir`.
    ///
    /// The directory is created first, so the VHDL package can be written to
    /// it as well.
    pub fn create(&self, output_dir: &Path, selection: &ArtifactSelection) -> Result<Vec<PathBuf>> {
        if !selection.is_empty() {
            create_dir(output_dir)?;
        }
        let mut written = Vec::new();
        for kind in selection.iter() {
            let path = match kind {
                ArtifactKind::VhdlPackage => Some(self.create_vhdl_package(output_dir)?),
                ArtifactKind::CHeader => Some(self.create_c_header(output_dir)?),
                ArtifactKind::CppInterface => Some(self.create_cpp_interface(output_dir)?),
                ArtifactKind::CppHeader => Some(self.create_cpp_header(output_dir)?),
                ArtifactKind::CppImplementation => {
                    Some(self.create_cpp_implementation(output_dir)?)
                }
                ArtifactKind::HtmlPage => Some(self.create_html_page(output_dir)?),
                ArtifactKind::HtmlTable => Some(self.create_html_table(output_dir)?),
                ArtifactKind::SourceCopy => self.copy_source_definition(output_dir)?,
            };
            written.extend(path);
        }
        Ok(written)
    }

    fn write(&self, generator: &dyn RegisterCodeGenerator, output_dir: &Path) -> Result<PathBuf> {
        let dest_file = output_dir.join(generator.file_name(self.register_list.name()));
        let contents = generator.render(&self.register_list, &self.banner);
        write_file(&dest_file, contents.as_bytes())?;
        Ok(dest_file)
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|err| RegisterError::writing(dir, err))
}

fn write_file(dest_file: &Path, contents: &[u8]) -> Result<()> {
    info!("Writing to {dest_file:?}");
    std::fs::write(dest_file, contents).map_err(|err| RegisterError::writing(dest_file, err))
}

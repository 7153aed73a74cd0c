// Licensed under the Apache-2.0 license

//! Configuration of which artifacts are generated.
//!
//! [`ArtifactKind`] names every file the [`Registers`](crate::Registers)
//! facade can write and [`ArtifactSelection`] picks a subset of them.

use crate::codegen::{
    CHeaderGenerator, CppHeaderGenerator, CppImplementationGenerator, CppInterfaceGenerator,
    HtmlPageGenerator, HtmlTableGenerator, RegisterCodeGenerator, VhdlPackageGenerator,
};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// One generated (or copied) file per module.
///
/// The string form is what the command line accepts, e.g. `c-header`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ArtifactKind {
    VhdlPackage,
    CHeader,
    CppInterface,
    CppHeader,
    CppImplementation,
    HtmlPage,
    HtmlTable,
    /// Verbatim copy of the register definition file.
    SourceCopy,
}

impl ArtifactKind {
    /// The generator rendering this artifact, `None` for [`ArtifactKind::SourceCopy`].
    pub fn generator(self) -> Option<Box<dyn RegisterCodeGenerator>> {
        match self {
            ArtifactKind::VhdlPackage => Some(Box::new(VhdlPackageGenerator)),
            ArtifactKind::CHeader => Some(Box::new(CHeaderGenerator)),
            ArtifactKind::CppInterface => Some(Box::new(CppInterfaceGenerator)),
            ArtifactKind::CppHeader => Some(Box::new(CppHeaderGenerator)),
            ArtifactKind::CppImplementation => Some(Box::new(CppImplementationGenerator)),
            ArtifactKind::HtmlPage => Some(Box::new(HtmlPageGenerator)),
            ArtifactKind::HtmlTable => Some(Box::new(HtmlTableGenerator)),
            ArtifactKind::SourceCopy => None,
        }
    }
}

/// Set of artifacts to generate.
///
/// # Example
///
/// ```
/// use fpga_registers::config::{ArtifactKind, ArtifactSelection};
///
/// // Everything (the default)
/// let selection = ArtifactSelection::all();
/// assert!(selection.is_selected(ArtifactKind::HtmlTable));
///
/// // Only what firmware needs
/// let selection = ArtifactSelection::none()
///     .with(ArtifactKind::CHeader)
///     .with(ArtifactKind::CppHeader);
/// assert!(!selection.is_selected(ArtifactKind::VhdlPackage));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactSelection {
    kinds: Vec<ArtifactKind>,
}

impl Default for ArtifactSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl ArtifactSelection {
    /// Select every artifact.
    pub fn all() -> Self {
        Self {
            kinds: ArtifactKind::iter().collect(),
        }
    }

    /// Select nothing.
    pub fn none() -> Self {
        Self { kinds: Vec::new() }
    }

    /// Add an artifact to the selection.
    pub fn with(mut self, kind: ArtifactKind) -> Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
            self.kinds.sort();
        }
        self
    }

    /// Remove an artifact from the selection.
    pub fn without(mut self, kind: ArtifactKind) -> Self {
        self.kinds.retain(|k| *k != kind);
        self
    }

    pub fn is_selected(&self, kind: ArtifactKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Selected artifacts, in declaration order of [`ArtifactKind`].
    pub fn iter(&self) -> impl Iterator<Item = ArtifactKind> + '_ {
        self.kinds.iter().copied()
    }
}

impl FromIterator<ArtifactKind> for ArtifactSelection {
    fn from_iter<I: IntoIterator<Item = ArtifactKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

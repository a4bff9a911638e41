use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::config::Config;
use crate::error::{CmakePackageError, Result};
use crate::version::{self, Version};
use crate::warning::RecipeWarning;

/// File name of the manifest written into the package prefix.
pub const MANIFEST_FILE: &str = "package.toml";

/// Descriptor of the package being produced.
///
/// Identity fields come from configuration; the version starts unresolved and
/// is assigned exactly once by [`PackageDescriptor::set_version`] during the
/// version resolution phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
    pub name: String,
    pub license: String,
    pub description: String,
    pub topics: Vec<String>,
    pub exports: Vec<String>,
    version: Option<Version>,
}

/// Serialized form of the descriptor staged into the package prefix.
#[derive(Serialize)]
struct Manifest<'a> {
    name: &'a str,
    version: String,
    license: &'a str,
    description: &'a str,
    topics: &'a [String],
}

impl PackageDescriptor {
    pub fn from_config(config: &Config) -> Self {
        PackageDescriptor {
            name: config.package.name.clone(),
            license: config.package.license.clone(),
            description: config.package.description.clone(),
            topics: config.package.topics.clone(),
            exports: config.source.exports.clone(),
            version: None,
        }
    }

    /// Resolve the package version from the version source file.
    ///
    /// Extracts the three components and assigns the composed version to this
    /// descriptor; returns nothing otherwise. Extraction failures propagate
    /// unchanged and leave the descriptor unversioned.
    pub fn set_version(&mut self, version_file: &Path) -> Result<()> {
        self.version = Some(version::extract_version(version_file)?);
        Ok(())
    }

    /// The resolved version, or an error if version resolution has not run
    pub fn version(&self) -> Result<Version> {
        self.version.ok_or_else(|| {
            CmakePackageError::package(format!("Package '{}' has no resolved version", self.name))
        })
    }

    /// Copy the exported metadata files into the package root.
    ///
    /// Files listed in the recipe but absent from the source tree produce
    /// warnings rather than errors; the install step has already staged the
    /// build outputs and a missing README should not discard them.
    pub fn stage_exports(
        &self,
        source_root: &Path,
        package_dir: &Path,
    ) -> Result<Vec<RecipeWarning>> {
        fs::create_dir_all(package_dir)?;

        let mut warnings = Vec::new();
        for export in &self.exports {
            let from = source_root.join(export);
            if !from.is_file() {
                warnings.push(RecipeWarning::MissingExport {
                    file: export.clone(),
                });
                continue;
            }
            fs::copy(&from, package_dir.join(export))?;
        }
        Ok(warnings)
    }

    /// Write the package manifest into the package root.
    ///
    /// Requires a resolved version; the manifest makes the staged layout
    /// self-describing for whatever consumes it downstream.
    pub fn write_manifest(&self, package_dir: &Path) -> Result<()> {
        let manifest = Manifest {
            name: &self.name,
            version: self.version()?.to_string(),
            license: &self.license,
            description: &self.description,
            topics: &self.topics,
        };

        let rendered = toml::to_string_pretty(&manifest)
            .map_err(|e| CmakePackageError::package(format!("Cannot render manifest: {}", e)))?;

        fs::create_dir_all(package_dir)?;
        fs::write(package_dir.join(MANIFEST_FILE), rendered)?;
        Ok(())
    }
}

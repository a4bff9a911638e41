use std::path::PathBuf;
use std::str::FromStr;

use crate::cmake::CmakeDriver;
use crate::config::Config;
use crate::error::{CmakePackageError, Result};
use crate::package::PackageDescriptor;
use crate::toolchain::{Toolchain, TOOLCHAIN_FILE};
use crate::version::Version;
use crate::warning::RecipeWarning;

/// Lifecycle phases of the packaging recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Generate,
    Build,
    Package,
    Test,
}

impl Phase {
    /// Get the phase name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Generate => "generate",
            Phase::Build => "build",
            Phase::Package => "package",
            Phase::Test => "test",
        }
    }
}

impl FromStr for Phase {
    type Err = CmakePackageError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "generate" => Ok(Phase::Generate),
            "build" => Ok(Phase::Build),
            "package" => Ok(Phase::Package),
            "test" => Ok(Phase::Test),
            other => Err(CmakePackageError::config(format!(
                "Unknown phase '{}' (expected generate, build, package or test)",
                other
            ))),
        }
    }
}

/// Directory layout one recipe run operates on
#[derive(Debug, Clone, PartialEq)]
pub struct RecipePaths {
    /// Root of the library source tree
    pub source_dir: PathBuf,
    /// Build tree of the library itself
    pub build_dir: PathBuf,
    /// Prefix the package is staged into
    pub package_dir: PathBuf,
}

/// Executes the packaging lifecycle for one library source tree.
///
/// Phases are strictly sequential and single-attempt: each one either runs to
/// completion or surfaces its error, and nothing after a failed phase runs.
/// The caller decides which phases to run (see [`Pipeline::plan`]) and owns
/// all user-facing reporting.
pub struct Pipeline<'a> {
    config: &'a Config,
    paths: RecipePaths,
    descriptor: PackageDescriptor,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, paths: RecipePaths) -> Self {
        let descriptor = PackageDescriptor::from_config(config);
        Pipeline {
            config,
            paths,
            descriptor,
        }
    }

    pub fn descriptor(&self) -> &PackageDescriptor {
        &self.descriptor
    }

    /// Resolve the package version from the configured version source file.
    ///
    /// Must run before any phase; the package phase refuses to write a
    /// manifest for an unversioned descriptor.
    pub fn resolve_version(&mut self) -> Result<Version> {
        let version_file = self.paths.source_dir.join(&self.config.source.version_file);
        self.descriptor.set_version(&version_file)?;
        self.descriptor.version()
    }

    /// Compute the phases one run will execute, with any planning advisories.
    ///
    /// `only` restricts the run to a single phase (later phases trust whatever
    /// earlier runs materialized on disk). Otherwise the full sequence runs,
    /// with the consumer test phase subject to `skip_test` and configuration.
    pub fn plan(&self, only: Option<Phase>, skip_test: bool) -> (Vec<Phase>, Vec<RecipeWarning>) {
        let mut warnings = Vec::new();

        let phases = match only {
            Some(phase) => vec![phase],
            None => {
                let mut phases = vec![Phase::Generate, Phase::Build, Phase::Package];
                if skip_test {
                    warnings.push(RecipeWarning::TestsSkipped {
                        reason: "skipped on the command line".to_string(),
                    });
                } else if !self.config.test.enabled {
                    warnings.push(RecipeWarning::TestsSkipped {
                        reason: "disabled in configuration".to_string(),
                    });
                } else {
                    phases.push(Phase::Test);
                }
                phases
            }
        };

        if phases.contains(&Phase::Generate) && self.paths.build_dir.exists() {
            warnings.push(RecipeWarning::StaleBuildDir {
                path: self.paths.build_dir.display().to_string(),
            });
        }

        (phases, warnings)
    }

    /// Run a single phase to completion.
    ///
    /// # Returns
    /// * `Ok(warnings)` - Phase completed; non-fatal advisories it raised
    /// * `Err` - First failure, verbatim from the failing step
    pub fn run_phase(&self, phase: Phase) -> Result<Vec<RecipeWarning>> {
        match phase {
            Phase::Generate => self.generate(),
            Phase::Build => self.build(),
            Phase::Package => self.package(),
            Phase::Test => self.test(),
        }
    }

    /// Materialize the toolchain file into the build directory
    fn generate(&self) -> Result<Vec<RecipeWarning>> {
        let toolchain = Toolchain::for_package(self.config)?;
        toolchain.generate(&self.paths.build_dir)?;
        Ok(Vec::new())
    }

    /// Configure and build the library with the materialized toolchain
    fn build(&self) -> Result<Vec<RecipeWarning>> {
        let toolchain_file = self.paths.build_dir.join(TOOLCHAIN_FILE);
        if !toolchain_file.is_file() {
            return Err(CmakePackageError::toolchain(format!(
                "No materialized toolchain at {}; run the generate phase first",
                toolchain_file.display()
            )));
        }

        let driver = self.library_driver();
        driver.configure(Some(&toolchain_file), self.generator(), &[])?;
        driver.build(self.config.build.jobs)?;
        Ok(Vec::new())
    }

    /// Install build outputs into the package prefix and stage recipe metadata
    fn package(&self) -> Result<Vec<RecipeWarning>> {
        let driver = self.library_driver();
        driver.install(&self.paths.package_dir)?;

        let warnings = self
            .descriptor
            .stage_exports(&self.paths.source_dir, &self.paths.package_dir)?;
        self.descriptor.write_manifest(&self.paths.package_dir)?;
        Ok(warnings)
    }

    /// Configure, build and test the consumer project against the staged package
    fn test(&self) -> Result<Vec<RecipeWarning>> {
        let consumer_src = self.paths.source_dir.join(&self.config.test.consumer_dir);
        if !consumer_src.is_dir() {
            return Err(CmakePackageError::config(format!(
                "Consumer project directory not found: {}",
                consumer_src.display()
            )));
        }

        let consumer_build = consumer_src.join("build");
        let driver = CmakeDriver::new(
            &self.config.build.cmake_program,
            &consumer_src,
            &consumer_build,
        );

        let defines = vec![
            (
                "CMAKE_PREFIX_PATH".to_string(),
                self.paths.package_dir.display().to_string(),
            ),
            (
                "CMAKE_BUILD_TYPE".to_string(),
                self.config.build.build_type.clone(),
            ),
        ];
        driver.configure(None, self.generator(), &defines)?;
        driver.build(self.config.build.jobs)?;
        driver.ctest(&self.config.build.ctest_program)?;
        Ok(Vec::new())
    }

    fn library_driver(&self) -> CmakeDriver {
        CmakeDriver::new(
            &self.config.build.cmake_program,
            &self.paths.source_dir,
            &self.paths.build_dir,
        )
    }

    fn generator(&self) -> Option<&str> {
        if self.config.build.generator.is_empty() {
            None
        } else {
            Some(&self.config.build.generator)
        }
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::toolchain::VarValue;

/// Represents the complete configuration for cmake-package.
///
/// Contains the package identity, source layout, build tool settings, toolchain
/// variables, and consumer test settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub package: PackageConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub toolchain: ToolchainConfig,

    #[serde(default)]
    pub test: TestConfig,
}

/// Identity of the package being produced.
///
/// Mirrors the descriptor fields that end up in the staged package manifest.
/// The version is never configured here; it is always extracted from the
/// version source file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PackageConfig {
    #[serde(default = "default_package_name")]
    pub name: String,

    #[serde(default = "default_license")]
    pub license: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub topics: Vec<String>,
}

fn default_package_name() -> String {
    "library".to_string()
}

fn default_license() -> String {
    "MIT".to_string()
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            name: default_package_name(),
            license: default_license(),
            description: String::new(),
            topics: Vec::new(),
        }
    }
}

/// Source tree layout of the library being packaged.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SourceConfig {
    /// File the package version is extracted from, relative to the source root.
    #[serde(default = "default_version_file")]
    pub version_file: String,

    /// Recipe metadata files copied verbatim into the package root.
    #[serde(default = "default_exports")]
    pub exports: Vec<String>,
}

fn default_version_file() -> String {
    "CMakeLists.txt".to_string()
}

fn default_exports() -> Vec<String> {
    vec!["README.md".to_string(), "LICENSE".to_string()]
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            version_file: default_version_file(),
            exports: default_exports(),
        }
    }
}

/// Settings for the external build tool invocations.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BuildConfig {
    /// Build tool executable, resolved through PATH unless absolute.
    #[serde(default = "default_cmake_program")]
    pub cmake_program: String,

    /// Test runner executable used by the consumer verification phase.
    #[serde(default = "default_ctest_program")]
    pub ctest_program: String,

    #[serde(default = "default_build_type")]
    pub build_type: String,

    /// Optional generator passed as `-G`; empty means the tool's default.
    #[serde(default)]
    pub generator: String,

    /// Parallel build jobs; None lets the tool decide.
    #[serde(default)]
    pub jobs: Option<u32>,
}

fn default_cmake_program() -> String {
    "cmake".to_string()
}

fn default_ctest_program() -> String {
    "ctest".to_string()
}

fn default_build_type() -> String {
    "Release".to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            cmake_program: default_cmake_program(),
            ctest_program: default_ctest_program(),
            build_type: default_build_type(),
            generator: String::new(),
            jobs: None,
        }
    }
}

/// Cache variables materialized into the generated toolchain file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ToolchainConfig {
    /// Name of the library's CMake option controlling its example target.
    /// The recipe always forces it off; packages never ship the demo.
    #[serde(default = "default_example_option")]
    pub example_option: String,

    /// Additional cache variables, set after the built-in ones.
    #[serde(default)]
    pub variables: BTreeMap<String, VarValue>,
}

fn default_example_option() -> String {
    "LIB_BUILD_EXAMPLE".to_string()
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        ToolchainConfig {
            example_option: default_example_option(),
            variables: BTreeMap::new(),
        }
    }
}

/// Settings for the consumer verification phase.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TestConfig {
    #[serde(default = "default_test_enabled")]
    pub enabled: bool,

    /// Consumer project directory, relative to the source root.
    #[serde(default = "default_consumer_dir")]
    pub consumer_dir: String,
}

fn default_test_enabled() -> bool {
    true
}

fn default_consumer_dir() -> String {
    "test_package".to_string()
}

impl Default for TestConfig {
    fn default() -> Self {
        TestConfig {
            enabled: default_test_enabled(),
            consumer_dir: default_consumer_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            package: PackageConfig::default(),
            source: SourceConfig::default(),
            build: BuildConfig::default(),
            toolchain: ToolchainConfig::default(),
            test: TestConfig::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `cmakepackage.toml` in current directory
/// 3. `~/.config/.cmakepackage.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./cmakepackage.toml").exists() {
        fs::read_to_string("./cmakepackage.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".cmakepackage.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

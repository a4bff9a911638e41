use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{CmakePackageError, Result};

/// File name of the materialized toolchain, relative to the build directory.
pub const TOOLCHAIN_FILE: &str = "cmake_package_toolchain.cmake";

/// A value assignable to a CMake cache variable.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum VarValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl VarValue {
    /// CMake cache type tag for the `set(... CACHE <type> ...)` form
    fn cache_type(&self) -> &'static str {
        match self {
            VarValue::Bool(_) => "BOOL",
            VarValue::Int(_) | VarValue::Str(_) => "STRING",
        }
    }

    /// Render the value as a CMake literal
    fn cmake_literal(&self) -> String {
        match self {
            VarValue::Bool(true) => "ON".to_string(),
            VarValue::Bool(false) => "OFF".to_string(),
            VarValue::Int(n) => n.to_string(),
            VarValue::Str(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        }
    }
}

/// An ordered set of cache variables rendered to a toolchain file.
///
/// Variables keep insertion order; assigning a name twice replaces the earlier
/// value in place so the rendered file never carries conflicting entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Toolchain {
    variables: Vec<(String, VarValue)>,
}

impl Toolchain {
    pub fn new() -> Self {
        Toolchain::default()
    }

    /// Builds the toolchain the recipe materializes before configuring.
    ///
    /// Sets the build type and the extra variables from configuration, then
    /// forces the library's example target option off. The example option is
    /// assigned last: packages never ship the demo target, even if an extra
    /// variable names the same option.
    pub fn for_package(config: &Config) -> Result<Self> {
        let mut tc = Toolchain::new();
        tc.set("CMAKE_BUILD_TYPE", VarValue::Str(config.build.build_type.clone()))?;
        for (name, value) in &config.toolchain.variables {
            tc.set(name, value.clone())?;
        }
        tc.set(&config.toolchain.example_option, VarValue::Bool(false))?;
        Ok(tc)
    }

    /// Assign a cache variable, replacing any earlier assignment of the same name.
    ///
    /// # Returns
    /// * `Err` - If the variable name is empty or contains whitespace
    pub fn set(&mut self, name: &str, value: VarValue) -> Result<()> {
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(CmakePackageError::toolchain(format!(
                "Invalid cache variable name: '{}'",
                name
            )));
        }

        if let Some(entry) = self.variables.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value;
        } else {
            self.variables.push((name.to_string(), value));
        }
        Ok(())
    }

    /// Look up a variable by name
    pub fn get(&self, name: &str) -> Option<&VarValue> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Render the toolchain file content
    pub fn render(&self) -> String {
        let mut out = String::from("# Toolchain generated by cmake-package. Do not edit.\n");
        for (name, value) in &self.variables {
            out.push_str(&format!(
                "set({} {} CACHE {} \"\" FORCE)\n",
                name,
                value.cmake_literal(),
                value.cache_type()
            ));
        }
        out
    }

    /// Materialize the toolchain file inside the build directory.
    ///
    /// Creates the build directory if needed and returns nothing on success;
    /// the file lands at [`TOOLCHAIN_FILE`] under `build_dir`.
    pub fn generate(&self, build_dir: &Path) -> Result<()> {
        fs::create_dir_all(build_dir)?;
        fs::write(build_dir.join(TOOLCHAIN_FILE), self.render())?;
        Ok(())
    }
}

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::{CmakePackageError, Result};

/// Represents a package version with major, minor, and patch components.
///
/// Composed from the `set(LIB_VERSION_*)` entries of the library's CMake
/// build configuration (major.minor.patch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// The three version components recognized in the version source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionComponent {
    Major,
    Minor,
    Patch,
}

impl VersionComponent {
    /// Get the component name as written in the version source file
    pub fn name(&self) -> &'static str {
        match self {
            VersionComponent::Major => "MAJOR",
            VersionComponent::Minor => "MINOR",
            VersionComponent::Patch => "PATCH",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "MAJOR" => Some(VersionComponent::Major),
            "MINOR" => Some(VersionComponent::Minor),
            "PATCH" => Some(VersionComponent::Patch),
            _ => None,
        }
    }
}

impl Version {
    /// Creates a new Version with the specified major, minor, and patch components.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Extracts the package version from a CMake build configuration file.
///
/// Scans the whole file for `set(LIB_VERSION_<MAJOR|MINOR|PATCH> <digits>)`
/// occurrences. Surrounding content and ordering are irrelevant, but all three
/// components must be present exactly once. A component that appears more than
/// once is rejected rather than silently resolved, so a conflicting edit to the
/// version lines cannot produce an arbitrary version.
///
/// # Arguments
/// * `path` - Path to the version source file (typically `CMakeLists.txt`)
///
/// # Returns
/// * `Ok(Version)` - All three components found exactly once
/// * `Err` - File missing, not a regular file, a component missing or duplicated
///
/// # Example
/// ```ignore
/// let version = extract_version(Path::new("CMakeLists.txt"))?;
/// println!("packaging {}", version);
/// ```
pub fn extract_version(path: &Path) -> Result<Version> {
    if !path.is_file() {
        return Err(CmakePackageError::version(format!(
            "Missing file to read version from: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)?;
    let numbers = scan_version_lines(&content, path)?;

    let component = |c: VersionComponent| -> Result<u32> {
        numbers.get(&c).copied().ok_or_else(|| {
            CmakePackageError::version(format!(
                "Failed to read package version from {}: LIB_VERSION_{} not found",
                path.display(),
                c.name()
            ))
        })
    };

    Ok(Version::new(
        component(VersionComponent::Major)?,
        component(VersionComponent::Minor)?,
        component(VersionComponent::Patch)?,
    ))
}

/// Scan file content for version lines, building a component -> number mapping.
///
/// Fails closed: a second occurrence of a component is an error even if the
/// value is identical.
fn scan_version_lines(content: &str, path: &Path) -> Result<HashMap<VersionComponent, u32>> {
    // Unwrap is safe: the pattern is a compile-time constant
    let re = Regex::new(r"set\(LIB_VERSION_(MAJOR|MINOR|PATCH)\s+([0-9]+)\)").unwrap();

    let mut numbers = HashMap::new();
    for captures in re.captures_iter(content) {
        let component = VersionComponent::from_name(&captures[1]).unwrap();
        let digits = &captures[2];

        // A leading zero would be silently rewritten by the numeric parse;
        // reject it instead of composing a version that differs from the file
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(CmakePackageError::version(format!(
                "Version component LIB_VERSION_{} in {} has a leading zero: {}",
                component.name(),
                path.display(),
                digits
            )));
        }

        let number = digits.parse::<u32>().map_err(|_| {
            CmakePackageError::version(format!(
                "Version component LIB_VERSION_{} in {} is out of range: {}",
                component.name(),
                path.display(),
                digits
            ))
        })?;

        if numbers.insert(component, number).is_some() {
            return Err(CmakePackageError::version(format!(
                "Duplicate LIB_VERSION_{} entry in {}",
                component.name(),
                path.display()
            )));
        }
    }

    Ok(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(2, 5, 10).to_string(), "2.5.10");
        assert_eq!(Version::new(0, 0, 0).to_string(), "0.0.0");
    }

    #[test]
    fn test_version_ordering() {
        assert!(Version::new(1, 2, 3) < Version::new(1, 2, 4));
        assert!(Version::new(1, 9, 9) < Version::new(2, 0, 0));
    }

    #[test]
    fn test_component_names() {
        assert_eq!(VersionComponent::Major.name(), "MAJOR");
        assert_eq!(VersionComponent::Minor.name(), "MINOR");
        assert_eq!(VersionComponent::Patch.name(), "PATCH");
    }

    #[test]
    fn test_scan_complete_content() {
        let content = "set(LIB_VERSION_MAJOR 2)\nset(LIB_VERSION_MINOR 5)\nset(LIB_VERSION_PATCH 10)\n";
        let numbers = scan_version_lines(content, Path::new("CMakeLists.txt")).unwrap();
        assert_eq!(numbers.get(&VersionComponent::Major), Some(&2));
        assert_eq!(numbers.get(&VersionComponent::Minor), Some(&5));
        assert_eq!(numbers.get(&VersionComponent::Patch), Some(&10));
    }

    #[test]
    fn test_scan_ignores_surrounding_content() {
        let content = r#"
cmake_minimum_required(VERSION 3.16)
project(libdemo)
set(LIB_VERSION_MAJOR 1)
add_subdirectory(src)
set(LIB_VERSION_MINOR 0)
set(LIB_VERSION_PATCH 3)
"#;
        let numbers = scan_version_lines(content, Path::new("CMakeLists.txt")).unwrap();
        assert_eq!(numbers.len(), 3);
        assert_eq!(numbers.get(&VersionComponent::Patch), Some(&3));
    }

    #[test]
    fn test_scan_rejects_duplicates() {
        let content = "set(LIB_VERSION_MAJOR 1)\nset(LIB_VERSION_MAJOR 2)\n";
        let err = scan_version_lines(content, Path::new("CMakeLists.txt")).unwrap_err();
        assert!(err.to_string().contains("Duplicate LIB_VERSION_MAJOR"));
    }

    #[test]
    fn test_scan_rejects_identical_duplicates() {
        // Fail closed even when both entries agree
        let content = "set(LIB_VERSION_MINOR 4)\nset(LIB_VERSION_MINOR 4)\n";
        let err = scan_version_lines(content, Path::new("CMakeLists.txt")).unwrap_err();
        assert!(err.to_string().contains("Duplicate LIB_VERSION_MINOR"));
    }

    #[test]
    fn test_scan_skips_malformed_lines() {
        // Non-numeric values and unknown components never match the pattern
        let content = "set(LIB_VERSION_MAJOR one)\nset(LIB_VERSION_EXTRA 7)\n";
        let numbers = scan_version_lines(content, Path::new("CMakeLists.txt")).unwrap();
        assert!(numbers.is_empty());
    }

    #[test]
    fn test_scan_out_of_range_component() {
        let content = "set(LIB_VERSION_MAJOR 99999999999999999999)\n";
        let err = scan_version_lines(content, Path::new("CMakeLists.txt")).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_scan_rejects_leading_zero() {
        let content = "set(LIB_VERSION_PATCH 007)\n";
        let err = scan_version_lines(content, Path::new("CMakeLists.txt")).unwrap_err();
        assert!(err.to_string().contains("leading zero"));
    }

    #[test]
    fn test_scan_accepts_plain_zero() {
        let content = "set(LIB_VERSION_PATCH 0)\n";
        let numbers = scan_version_lines(content, Path::new("CMakeLists.txt")).unwrap();
        assert_eq!(numbers.get(&VersionComponent::Patch), Some(&0));
    }
}

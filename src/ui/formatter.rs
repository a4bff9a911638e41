//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Functions here are pure (no I/O side effects beyond printing) and testable.

use console::style;

use crate::pipeline::Phase;
use crate::version::Version;
use crate::warning::RecipeWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a non-fatal recipe warning.
pub fn display_warning(warning: &RecipeWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the resolved package identity before any phase runs.
///
/// # Arguments
/// * `name` - Package name from the recipe configuration
/// * `version` - Version resolved from the version source file
pub fn display_package_header(name: &str, version: Version) {
    println!(
        "\n{}",
        style(format!("Packaging {} {}", name, version)).bold()
    );
}

/// Display the phases one run will execute, in order.
pub fn display_phase_plan(phases: &[Phase]) {
    println!("{}", style("Phases:").bold());
    for (i, phase) in phases.iter().enumerate() {
        println!("  {}. {}", i + 1, phase.name());
    }
}

/// Display the banner printed when a phase starts.
pub fn display_phase_start(phase: Phase) {
    println!("\n{} {} phase", style("→").yellow(), style(phase.name()).bold());
}

/// Display the names of all recipe phases with a short description each.
///
/// Used by `--list`; order matches the full pipeline sequence.
pub fn display_available_phases() {
    println!("{}", style("Recipe phases:").bold());
    println!("  generate  materialize the CMake toolchain file");
    println!("  build     configure and build the library");
    println!("  package   install outputs and stage package metadata");
    println!("  test      build and run the consumer verification project");
}

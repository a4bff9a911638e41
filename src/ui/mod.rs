//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, Write};

use anyhow::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_available_phases, display_error, display_package_header, display_phase_plan,
    display_phase_start, display_status, display_success, display_warning,
};

/// Prompts user for a yes/no confirmation.
///
/// Defaults to "no" on empty input; only an explicit "y" or "yes" confirms.
///
/// # Arguments
/// * `prompt` - Question shown to the user
///
/// # Returns
/// * `Ok(true)` - User confirmed
/// * `Ok(false)` - User declined or pressed Enter
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

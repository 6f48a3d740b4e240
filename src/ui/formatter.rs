//! Pure formatting functions for UI output.
//!
//! Status lines go to stdout, errors to stderr. Styling is dropped
//! automatically when the stream is not a terminal.

use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display the recommendation and the version it leads to.
pub fn display_release_plan(release_type: &str, reason: &str, version: &str) {
    println!("\n{}", style("Release plan:").bold());
    println!("  Release type: {} ({})", style(release_type).cyan(), reason);
    println!("  Version:      {}", style(version).green());
}

/// Display the command to push a tag that was created but not pushed.
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To push this release later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} HEAD {}", remote, tag)).cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_functions_do_not_panic() {
        display_error("test error");
        display_success("test success");
        display_status("test status");
        display_release_plan("minor", "There are 0 BREAKING CHANGES and 1 features", "1.1.0");
        display_manual_push_instruction("v1.1.0", "origin");
    }
}

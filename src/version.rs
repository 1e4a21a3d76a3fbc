//! Build version reporting
//!
//! Commit and build date are stamped at compile time through the
//! `GIT_COMMIT` and `BUILD_DATE` environment variables.

/// Crate version from Cargo metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commit the binary was built from
pub const GIT_COMMIT: &str = match option_env!("GIT_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};

/// Date the binary was built
pub const BUILD_DATE: &str = match option_env!("BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

/// Format the version line printed by `seed`
pub fn print() -> String {
    format!(
        "version: {}, git commit: {}, build date: {}",
        VERSION, GIT_COMMIT, BUILD_DATE
    )
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;

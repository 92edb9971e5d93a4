//! `uv-cli theme` commands.

use std::io::Write;

use urban_vibe_core::Theme;
use urban_vibe_storefront::persistence::{CartStore, PersistenceSlot};

use super::CliError;

/// Print the saved theme.
///
/// # Errors
///
/// Returns `CliError` if writing the output fails.
pub fn show<S: PersistenceSlot>(store: &CartStore<S>, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "{}", store.load_theme())?;
    Ok(())
}

/// Save a theme.
///
/// # Errors
///
/// Returns `CliError::Persistence` if the theme could not be written.
pub fn set<S: PersistenceSlot>(
    store: &CartStore<S>,
    theme: Theme,
    out: &mut impl Write,
) -> Result<(), CliError> {
    store.save_theme(theme)?;
    writeln!(out, "Theme set to {theme}")?;
    Ok(())
}

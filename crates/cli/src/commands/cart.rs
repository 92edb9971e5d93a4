//! `uv-cli cart` commands.

use std::io::Write;

use urban_vibe_storefront::cart::CartManager;
use urban_vibe_storefront::persistence::{CartStore, PersistenceSlot};

use super::CliError;

/// Print the saved cart, either as a summary or as the stored JSON.
///
/// An unreadable or corrupt snapshot prints as an empty cart.
///
/// # Errors
///
/// Returns `CliError` if writing the output fails.
pub fn show<S: PersistenceSlot>(
    store: CartStore<S>,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let snapshot = CartManager::new(store).snapshot();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&snapshot.items)?)?;
        return Ok(());
    }

    if snapshot.is_empty() {
        writeln!(out, "Cart is empty")?;
        return Ok(());
    }

    for item in &snapshot.items {
        writeln!(
            out,
            "{:>3} x {:<32} {:>10} {:>10}",
            item.quantity,
            item.name,
            item.price.to_string(),
            item.line_total().to_string()
        )?;
    }
    writeln!(
        out,
        "{} item(s), subtotal {}",
        snapshot.total_count, snapshot.subtotal
    )?;
    Ok(())
}

/// Empty the saved cart.
///
/// # Errors
///
/// Returns `CliError::Persistence` if the empty cart could not be written.
pub fn clear<S: PersistenceSlot>(store: CartStore<S>, out: &mut impl Write) -> Result<(), CliError> {
    let mut cart = CartManager::new(store);
    let removed = cart.total_count();
    cart.clear()?;
    tracing::info!(removed, "cart cleared");
    writeln!(out, "Cleared {removed} item(s)")?;
    Ok(())
}

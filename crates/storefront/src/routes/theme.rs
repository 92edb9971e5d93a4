//! Theme route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;
use urban_vibe_core::Theme;

use crate::error::Result;
use crate::state::AppState;

/// Warning returned when the theme preference could not be saved.
pub const THEME_NOT_SAVED_WARNING: &str = "Theme changed but could not be saved on this device.";

/// JSON body of theme responses.
#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: Theme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Current theme.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<ThemeResponse>> {
    let theme = state.shop()?.theme();
    Ok(Json(ThemeResponse {
        theme,
        warning: None,
    }))
}

/// Switch between light and dark.
#[instrument(skip(state))]
pub async fn toggle(State(state): State<AppState>) -> Result<Json<ThemeResponse>> {
    let mut shop = state.shop()?;
    let response = match shop.toggle_theme() {
        Ok(theme) => ThemeResponse {
            theme,
            warning: None,
        },
        Err(err) => {
            tracing::warn!(error = %err, "theme not persisted");
            ThemeResponse {
                theme: shop.theme(),
                warning: Some(THEME_NOT_SAVED_WARNING.to_string()),
            }
        }
    };
    drop(shop);
    Ok(Json(response))
}

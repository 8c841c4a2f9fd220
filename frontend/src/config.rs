//! Build-time configuration for the frontend.

/// Prefix prepended to every `/api/...` path.
///
/// Empty by default so the app talks to the origin that served it. Set
/// `PRINT_LEDGER_API_BASE` at build time to point at another host, e.g.
/// `http://localhost:8000`.
pub const API_BASE_URL: &str = match option_env!("PRINT_LEDGER_API_BASE") {
    Some(url) => url,
    None => "",
};

/// `localStorage` key holding the admin bearer token.
pub const TOKEN_STORAGE_KEY: &str = "token";

pub const CURRENCY_LABEL: &str = "CHF";

/// Shown wherever a print has no usable image.
pub const PLACEHOLDER_GLYPH: &str = "🖨️";

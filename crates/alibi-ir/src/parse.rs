use crate::theme::{ThemeError, ThemePack};
use crate::types::Puzzle;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid theme: {0}")]
    Theme(#[from] ThemeError),
}

/// Parse and validate a theme pack.
pub fn parse_theme(json: &str) -> Result<ThemePack, ParseError> {
    let theme: ThemePack = serde_json::from_str(json)?;
    theme.validate()?;
    Ok(theme)
}

/// Parse a previously serialized puzzle (e.g. one cached by a host).
pub fn parse_puzzle(json: &str) -> Result<Puzzle, ParseError> {
    Ok(serde_json::from_str(json)?)
}

use alibi_ir::parse::{parse_puzzle, parse_theme, ParseError};
use alibi_ir::theme::{ThemeError, ThemePack};
use alibi_ir::types::LocationId;

#[test]
fn test_parse_theme_from_file() {
    let json = include_str!("fixtures/lantern_theme.json");
    let theme = parse_theme(json).unwrap();
    assert_eq!(theme.name, "lantern");
    assert_eq!(theme.locations.len(), 6);
    assert_eq!(theme.location_label(LocationId(1)), "Lighthouse");
    assert_eq!(theme.bell_label(5), "Sixth Watch");
    assert_eq!(theme.persona(3).unwrap().role, "customs clerk");
}

#[test]
fn test_parse_invalid_json() {
    let result = parse_theme("not json at all");
    assert!(matches!(result, Err(ParseError::Json(_))));
}

#[test]
fn test_parse_rejects_short_pool() {
    let mut value: serde_json::Value =
        serde_json::from_str(include_str!("fixtures/lantern_theme.json")).unwrap();
    value["bells"] = serde_json::json!(["Dawn", "Noon", "Dusk"]);
    let result = parse_theme(&value.to_string());
    match result {
        Err(ParseError::Theme(ThemeError::PoolSize { pool, actual, .. })) => {
            assert_eq!(pool, "bells");
            assert_eq!(actual, 3);
        }
        other => panic!("expected pool size error, got {other:?}"),
    }
}

#[test]
fn test_default_theme_roundtrips_through_json() {
    let theme = ThemePack::default();
    let json = serde_json::to_string(&theme).unwrap();
    assert_eq!(parse_theme(&json).unwrap(), theme);
}

#[test]
fn test_parse_puzzle_rejects_garbage() {
    assert!(parse_puzzle("{\"seed\": 3}").is_err());
}

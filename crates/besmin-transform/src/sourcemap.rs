//! Source-map adjustments for text envelopes.

/// Shift every generated position in a source map down by `lines` lines.
///
/// In the VLQ `mappings` encoding each `;` starts a new generated line, so
/// prepending `lines` semicolons re-aligns a body map after an envelope
/// prelude has been prepended to the code. Column positions are unaffected
/// because envelopes never indent the body.
pub fn offset_mappings(map_json: &str, lines: usize) -> Result<String, serde_json::Error> {
    if lines == 0 {
        return Ok(map_json.to_string());
    }
    let mut map: serde_json::Value = serde_json::from_str(map_json)?;
    if let Some(mappings) = map.get_mut("mappings") {
        if let Some(encoded) = mappings.as_str() {
            let mut shifted = ";".repeat(lines);
            shifted.push_str(encoded);
            *mappings = serde_json::Value::String(shifted);
        }
    }
    serde_json::to_string(&map)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r#"{"version":3,"sources":["a.js"],"names":[],"mappings":"AAAA;AACA"}"#;

    #[test]
    fn test_offset_prepends_line_separators() {
        let shifted = offset_mappings(MAP, 3).unwrap();
        let value: serde_json::Value = serde_json::from_str(&shifted).unwrap();
        assert_eq!(value["mappings"], ";;;AAAA;AACA");
        assert_eq!(value["version"], 3);
    }

    #[test]
    fn test_zero_offset_is_identity() {
        assert_eq!(offset_mappings(MAP, 0).unwrap(), MAP);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(offset_mappings("not a map", 1).is_err());
    }
}

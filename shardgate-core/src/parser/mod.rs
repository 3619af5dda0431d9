use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Auto,
}

/// An API description loaded as a JSON value, object key order preserved.
#[derive(Debug, Clone)]
pub struct ParsedDescription {
    pub document: serde_json::Value,
    pub format: DocumentFormat,
}

pub fn parse_description_str(
    input: &str,
    format: DocumentFormat,
) -> Result<ParsedDescription, ParseError> {
    match format {
        DocumentFormat::Json => Ok(ParsedDescription {
            document: serde_json::from_str(input)?,
            format,
        }),
        DocumentFormat::Yaml => Ok(ParsedDescription {
            document: yaml_to_json(input)?,
            format,
        }),
        DocumentFormat::Auto => parse_description_auto(input),
    }
}

fn parse_description_auto(input: &str) -> Result<ParsedDescription, ParseError> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return match serde_json::from_str::<serde_json::Value>(input) {
            Ok(document) => Ok(ParsedDescription {
                document,
                format: DocumentFormat::Json,
            }),
            // JSON is a YAML subset in practice, but report the JSON error.
            Err(e) => yaml_to_json(input)
                .map(|document| ParsedDescription {
                    document,
                    format: DocumentFormat::Yaml,
                })
                .map_err(|_| ParseError::Json(e)),
        };
    }

    match yaml_to_json(input) {
        Ok(document) => Ok(ParsedDescription {
            document,
            format: DocumentFormat::Yaml,
        }),
        Err(e) => match serde_json::from_str::<serde_json::Value>(input) {
            Ok(document) => Ok(ParsedDescription {
                document,
                format: DocumentFormat::Json,
            }),
            Err(_) => Err(e),
        },
    }
}

// Going through serde_yaml::Value lets non-string keys (e.g. `200:` under
// `responses`) survive as strings instead of failing the whole document.
fn yaml_to_json(input: &str) -> Result<serde_json::Value, ParseError> {
    let value = serde_yaml::from_str::<serde_yaml::Value>(input)?;
    serde_json::to_value(value).map_err(ParseError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_detects_json() {
        let parsed = parse_description_str(r#"{"paths": {}}"#, DocumentFormat::Auto).unwrap();
        assert_eq!(parsed.format, DocumentFormat::Json);
        assert!(parsed.document["paths"].is_object());
    }

    #[test]
    fn auto_detects_yaml_and_keeps_key_order() {
        let input = "paths:\n  /zeta:\n    get:\n      operationId: z\n  /alpha:\n    get:\n      operationId: a\n";
        let parsed = parse_description_str(input, DocumentFormat::Auto).unwrap();
        assert_eq!(parsed.format, DocumentFormat::Yaml);
        let keys: Vec<&String> = parsed.document["paths"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["/zeta", "/alpha"]);
    }

    #[test]
    fn yaml_integer_keys_become_strings() {
        let input = "paths:\n  /a:\n    get:\n      operationId: a\n      responses:\n        200:\n          description: ok\n";
        let parsed = parse_description_str(input, DocumentFormat::Yaml).unwrap();
        assert!(parsed.document["paths"]["/a"]["get"]["responses"]["200"].is_object());
    }

    #[test]
    fn broken_json_reports_json_error() {
        let err = parse_description_str("{\"paths\": ", DocumentFormat::Auto).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }
}

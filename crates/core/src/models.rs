use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultMetadata {
    /// Vector stores hand metadata numbers back as floats, so `42.0` is
    /// accepted as line 42.
    #[serde(deserialize_with = "integral_number")]
    pub line_number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// One ranked match as returned by the search endpoint.
///
/// `score` is nominally in `[0, 1]`. The client neither validates nor
/// re-sorts it: display order is whatever order the backend sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: String,
    pub score: f64,
    pub document: String,
    pub metadata: ResultMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

fn integral_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }

    match number.as_f64() {
        Some(value)
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        _ => Err(D::Error::custom(format!(
            "expected an integral line number, got {number}"
        ))),
    }
}

/// Body of a non-2xx response. Anything that is not a string under
/// `error` is treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
}

/// How the state holder treats a submission that arrives while a request
/// is still outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPolicy {
    #[default]
    RejectWhileLoading,
    /// Start the new request anyway; the older one is discarded when it lands.
    Supersede,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_without_source_still_parses() {
        let response: SearchResponse = serde_json::from_str(concat!(
            r#"{"results":[{"id":"1","score":0.873,"document":"Gymnastics began...","#,
            r#""metadata":{"line_number":42}}]}"#,
        ))
        .expect("valid payload");

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].metadata.line_number, 42);
        assert_eq!(response.results[0].metadata.source, None);
    }

    #[test]
    fn float_line_number_is_accepted() {
        let response: SearchResponse = serde_json::from_str(concat!(
            r#"{"results":[{"id":"7","score":0.5,"document":"Vault","#,
            r#""metadata":{"source":"paragraphs.txt","line_number":42.0}}]}"#,
        ))
        .expect("float line numbers come from the vector store");

        assert_eq!(response.results[0].metadata.line_number, 42);
        assert_eq!(
            response.results[0].metadata.source.as_deref(),
            Some("paragraphs.txt")
        );
    }

    #[test]
    fn fractional_line_number_is_rejected() {
        let parsed = serde_json::from_str::<ResultMetadata>(r#"{"line_number":4.5}"#);
        assert!(parsed.is_err());
        assert!(serde_json::from_str::<ResultMetadata>(r#"{"line_number":"42"}"#).is_err());
    }

    #[test]
    fn non_string_error_field_is_rejected() {
        assert!(serde_json::from_str::<ErrorPayload>(r#"{"error": 17}"#).is_err());
        let payload: ErrorPayload = serde_json::from_str("{}").expect("empty object");
        assert_eq!(payload.error, None);
    }
}

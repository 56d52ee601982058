//! `Content-Type` parsing.
//!
//! Only what response classification needs: the `type/subtype` essence
//! (lowercased) and its parameters, following the RFC 9110 grammar.

use std::fmt;

/// A parsed media type such as `application/json; charset=utf-8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    essence: String,
    params: Vec<(String, String)>,
}

/// Why a `Content-Type` value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaTypeError {
    /// The value is empty or blank.
    Empty,
    /// No `/` between type and subtype.
    MissingSubtype,
    /// A character outside the token set appeared in a name.
    InvalidToken(String),
    /// A parameter is not of the form `name=value`.
    InvalidParameter(String),
}

impl fmt::Display for MediaTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaTypeError::Empty => write!(f, "no media type"),
            MediaTypeError::MissingSubtype => write!(f, "expected type/subtype"),
            MediaTypeError::InvalidToken(token) => write!(f, "invalid token {token:?}"),
            MediaTypeError::InvalidParameter(param) => write!(f, "invalid parameter {param:?}"),
        }
    }
}

impl std::error::Error for MediaTypeError {}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

fn token(raw: &str) -> Result<String, MediaTypeError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(is_token_char) {
        return Err(MediaTypeError::InvalidToken(raw.to_string()));
    }
    Ok(raw.to_ascii_lowercase())
}

impl MediaType {
    /// Parse a header value.
    pub fn parse(value: &str) -> Result<Self, MediaTypeError> {
        let mut parts = value.split(';');
        let head = parts.next().unwrap_or_default().trim();
        if head.is_empty() {
            return Err(MediaTypeError::Empty);
        }

        let (kind, subtype) = head.split_once('/').ok_or(MediaTypeError::MissingSubtype)?;
        let essence = format!("{}/{}", token(kind)?, token(subtype)?);

        let mut params = Vec::new();
        for raw in parts {
            if raw.trim().is_empty() {
                continue;
            }
            let (name, value) = raw
                .split_once('=')
                .ok_or_else(|| MediaTypeError::InvalidParameter(raw.trim().to_string()))?;
            let name = token(name).map_err(|_| MediaTypeError::InvalidParameter(raw.trim().to_string()))?;
            let value = value.trim();
            let value = match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
                Some(quoted) => quoted.replace("\\\"", "\""),
                None => token(value)
                    .map(|_| value.to_string())
                    .map_err(|_| MediaTypeError::InvalidParameter(raw.trim().to_string()))?,
            };
            params.push((name, value));
        }

        Ok(Self { essence, params })
    }

    /// The lowercased `type/subtype`.
    pub fn essence(&self) -> &str {
        &self.essence
    }

    /// Value of a parameter, matched case-insensitively by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// `application/json`.
    pub fn is_json(&self) -> bool {
        self.essence == "application/json"
    }

    /// Media types used for binary report downloads.
    pub fn is_binary_blob(&self) -> bool {
        matches!(
            self.essence.as_str(),
            "application/octet-stream" | "application/zip" | "application/x-zip-compressed"
        )
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.essence)?;
        for (name, value) in &self.params {
            write!(f, "; {name}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_with_charset() {
        let media = MediaType::parse("Application/JSON; charset=UTF-8").unwrap();
        assert!(media.is_json());
        assert_eq!(media.param("Charset"), Some("UTF-8"));
    }

    #[test]
    fn test_parse_quoted_parameter() {
        let media = MediaType::parse(r#"application/zip; name="report 1.zip""#).unwrap();
        assert!(media.is_binary_blob());
        assert_eq!(media.param("name"), Some("report 1.zip"));
    }

    #[test]
    fn test_empty_value_rejected() {
        assert_eq!(MediaType::parse(""), Err(MediaTypeError::Empty));
        assert_eq!(MediaType::parse("  ; charset=utf-8"), Err(MediaTypeError::Empty));
    }

    #[test]
    fn test_malformed_values_rejected() {
        assert_eq!(MediaType::parse("json"), Err(MediaTypeError::MissingSubtype));
        assert!(matches!(
            MediaType::parse("application/"),
            Err(MediaTypeError::InvalidToken(_))
        ));
        assert!(matches!(
            MediaType::parse("text/plain; charset"),
            Err(MediaTypeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_text_plain_is_neither_json_nor_binary() {
        let media = MediaType::parse("text/plain").unwrap();
        assert!(!media.is_json());
        assert!(!media.is_binary_blob());
        assert_eq!(media.to_string(), "text/plain");
    }
}

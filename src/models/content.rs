//! Content key/value model
//!
//! Content entries are typed values addressed by a unique key, used for
//! editable site copy (headlines, images, feature flags, structured blocks).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of value stored in a content entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Text,
    Number,
    Boolean,
    Image,
    Json,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Image => "image",
            Self::Json => "json",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ContentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "image" => Ok(Self::Image),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!("Invalid content type: {}", s)),
        }
    }
}

impl ContentType {
    /// Check that `value` is well-formed for this type
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Text | Self::Image => true,
            Self::Number => value.trim().parse::<f64>().map(f64::is_finite).unwrap_or(false),
            Self::Boolean => matches!(value.trim(), "true" | "false"),
            Self::Json => serde_json::from_str::<serde_json::Value>(value).is_ok(),
        }
    }
}

/// Content entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: i64,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Content {
    pub fn new(key: String, value: String, content_type: ContentType) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            key,
            value,
            content_type,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a content entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContentInput {
    pub key: String,
    pub value: String,
    #[serde(default, rename = "type")]
    pub content_type: Option<ContentType>,
}

/// Input for updating a content entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContentInput {
    pub key: Option<String>,
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<ContentType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_roundtrip_through_str() {
        for ty in [
            ContentType::Text,
            ContentType::Number,
            ContentType::Boolean,
            ContentType::Image,
            ContentType::Json,
        ] {
            assert_eq!(ty.to_string().parse::<ContentType>().unwrap(), ty);
        }
        assert!("markdown".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_content_type_accepts() {
        assert!(ContentType::Number.accepts("42"));
        assert!(ContentType::Number.accepts(" -3.5 "));
        assert!(!ContentType::Number.accepts("forty-two"));
        assert!(!ContentType::Number.accepts("NaN"));
        assert!(ContentType::Boolean.accepts("true"));
        assert!(!ContentType::Boolean.accepts("yes"));
        assert!(ContentType::Json.accepts(r#"{"a": [1, 2]}"#));
        assert!(!ContentType::Json.accepts("{broken"));
        assert!(ContentType::Text.accepts("anything"));
    }

    #[test]
    fn test_content_serializes_type_field() {
        let content = Content::new("flag".to_string(), "true".to_string(), ContentType::Boolean);
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["type"], "boolean");
    }
}

//! Front-matter parsing

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::helpers::parse_date_string;

/// Marker line opening and closing a YAML front-matter block
const MARKER: &str = "---";

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<Scalar>()? {
                vec.push(item.0);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// A YAML scalar of any type, kept as its string form
struct Scalar(String);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match serde_yaml::Value::deserialize(deserializer)? {
            serde_yaml::Value::String(s) => Ok(Scalar(s)),
            serde_yaml::Value::Number(n) => Ok(Scalar(n.to_string())),
            serde_yaml::Value::Bool(b) => Ok(Scalar(b.to_string())),
            other => Err(D::Error::custom(format!(
                "expected a scalar, found {:?}",
                other
            ))),
        }
    }
}

/// `title: 2024` or `date: 2024-01-01` must not reject the whole block
fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| s.0))
}

/// Front-matter data from a content document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "optional_scalar")]
    pub title: Option<String>,
    #[serde(deserialize_with = "optional_scalar")]
    pub date: Option<String>,
    #[serde(deserialize_with = "optional_scalar")]
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "optional_scalar")]
    pub thumbnail: Option<String>,
    #[serde(deserialize_with = "optional_scalar")]
    pub cover: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "optional_scalar")]
    pub category: Option<String>,
    #[serde(deserialize_with = "optional_scalar")]
    pub author: Option<String>,

    /// Keys not recognized above, in document order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split a document into front-matter and body.
    ///
    /// The block must start on the very first line. A missing, unterminated or
    /// unparsable block yields the default front-matter and the whole input as
    /// body. Never fails.
    pub fn parse(content: &str) -> (Self, &str) {
        let Some((yaml, body)) = split_block(content) else {
            return (FrontMatter::default(), content);
        };

        if yaml.trim().is_empty() {
            return (FrontMatter::default(), body);
        }

        match serde_yaml::from_str::<FrontMatter>(yaml) {
            Ok(fm) => (fm, body),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse YAML front-matter, treating as content: {}",
                    e
                );
                (FrontMatter::default(), content)
            }
        }
    }

    /// Title, or `fallback` when the document has none
    pub fn title_or(&self, fallback: &str) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => fallback.to_string(),
        }
    }

    /// Card image: `thumbnail`, then `cover`
    pub fn image(&self) -> Option<&str> {
        self.thumbnail
            .as_deref()
            .or(self.cover.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Parse the date string
    pub fn parse_date(&self) -> Option<chrono::NaiveDateTime> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Find the YAML block and the body that follows its closing marker line
fn split_block(content: &str) -> Option<(&str, &str)> {
    let (first, mut rest) = next_line(content)?;
    if first.trim_end() != MARKER {
        return None;
    }

    let yaml_start = content.len() - rest.len();
    loop {
        let line_start = content.len() - rest.len();
        let (line, after) = next_line(rest)?;
        if line.trim_end() == MARKER {
            return Some((&content[yaml_start..line_start], after));
        }
        rest = after;
    }
}

/// Split off the first line; the returned line excludes its terminator
fn next_line(s: &str) -> Option<(&str, &str)> {
    if s.is_empty() {
        return None;
    }
    match s.find('\n') {
        Some(pos) => Some((s[..pos].trim_end_matches('\r'), &s[pos + 1..])),
        None => Some((s, "")),
    }
}

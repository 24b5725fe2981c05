use serde::Deserialize;

/// Canonical article identifier.
///
/// The backend serializes identifiers in three shapes depending on which
/// pipeline wrote the record: a plain `_id` string, a wrapped
/// `{"$oid": "..."}` object, or a legacy top-level `id` field holding a
/// string or a number. Normalization happens once, at deserialization, in
/// that priority order. A record exposing none of the three is `Missing`
/// and must be skipped wherever a key or an action target is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleId {
    Plain(String),
    Wrapped(String),
    Legacy(String),
    Missing,
}

impl ArticleId {
    /// The normalized identifier string, or `None` for `Missing`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArticleId::Plain(s) | ArticleId::Wrapped(s) | ArticleId::Legacy(s) => Some(s),
            ArticleId::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ArticleId::Missing)
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.as_str() == Some(candidate)
    }

    pub(crate) fn from_wire(primary: Option<RawPrimaryId>, legacy: Option<RawLegacyId>) -> Self {
        match primary {
            Some(RawPrimaryId::Plain(s)) => ArticleId::Plain(s),
            Some(RawPrimaryId::Wrapped { oid }) => ArticleId::Wrapped(oid),
            None => match legacy {
                Some(RawLegacyId::Text(s)) => ArticleId::Legacy(s),
                Some(RawLegacyId::Number(n)) => ArticleId::Legacy(n.to_string()),
                None => ArticleId::Missing,
            },
        }
    }
}

/// Shape of the `_id` field on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawPrimaryId {
    Plain(String),
    Wrapped {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

/// Shape of the legacy `id` field on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawLegacyId {
    Text(String),
    Number(serde_json::Number),
}

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct TagId(pub uuid::Uuid);

impl TagId {
    pub fn new() -> Self {
        TagId(uuid::Uuid::new_v4())
    }
}

impl Default for TagId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum TagTextError {
    #[error("tag must not be blank")]
    Blank,
    #[error("tag has {0} characters, the limit is {max}", max = TagText::MAX_LEN)]
    TooLong(usize),
}

/// Tag text in comparison form: trimmed, inner whitespace collapsed, lowercased.
///
/// Two raw inputs that normalize to the same `TagText` refer to the same tag row.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize)]
#[serde(transparent)]
pub struct TagText(String);

impl TagText {
    pub const MAX_LEN: usize = 64;

    /// Over-long text is rejected rather than cut, so distinct tags never merge.
    pub fn normalize(raw: &str) -> Result<Self, TagTextError> {
        let text = raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        if text.is_empty() {
            return Err(TagTextError::Blank);
        }
        let len = text.chars().count();
        if len > Self::MAX_LEN {
            return Err(TagTextError::TooLong(len));
        }
        Ok(Self(text))
    }

    /// Wraps text read back from storage, which only ever holds normalized text.
    pub(crate) fn from_stored(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Tag {
    pub tag_id: TagId,
    pub text: TagText,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_folds_case_and_whitespace() {
        let a = TagText::normalize("Hello").unwrap();
        let b = TagText::normalize("  hello ").unwrap();
        let c = TagText::normalize("Phrasal \t  VERBS").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "hello");
        assert_eq!(c.as_str(), "phrasal verbs");
    }

    #[test]
    fn blank_tags_are_rejected() {
        assert_eq!(TagText::normalize(""), Err(TagTextError::Blank));
        assert_eq!(TagText::normalize(" \n\t "), Err(TagTextError::Blank));
    }

    #[test]
    fn long_tags_are_rejected_not_cut() {
        let at_limit = "x".repeat(TagText::MAX_LEN);
        assert_eq!(TagText::normalize(&at_limit).unwrap().as_str(), at_limit);

        let raw = format!("{at_limit}apple");
        assert_eq!(
            TagText::normalize(&raw),
            Err(TagTextError::TooLong(TagText::MAX_LEN + 5))
        );
        // collapsing whitespace happens before the length check
        let padded = format!("  {}   {}  ", "y".repeat(31), "z".repeat(32));
        assert!(TagText::normalize(&padded).is_ok());
    }
}

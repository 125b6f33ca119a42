//! Hierarchical position keys

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors raised while parsing a dotted position key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionParseError {
    #[error("position key is empty")]
    Empty,

    #[error("invalid segment {segment:?} in position key {input:?}")]
    InvalidSegment { input: String, segment: String },
}

/// A position in a (possibly categorized) view listing, e.g. `2.3.1`.
///
/// Keys compare segment by segment as integers, so `2.3` sorts before
/// `2.10`, and a parent sorts before any of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionKey {
    segments: Vec<u32>,
}

impl PositionKey {
    /// The first position of any listing (`1`)
    pub fn first() -> Self {
        Self { segments: vec![1] }
    }

    /// Single-segment key for a flat, 1-based offset
    pub fn from_index(index: usize) -> Self {
        let index = u32::try_from(index.max(1)).unwrap_or(u32::MAX);
        Self { segments: vec![index] }
    }

    /// Build a key from raw segments. Returns `None` for an empty slice.
    pub fn from_segments(segments: &[u32]) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments: segments.to_vec() })
        }
    }

    /// Parse a dotted key such as `"2.3.1"`
    pub fn parse(text: &str) -> Result<Self, PositionParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(PositionParseError::Empty);
        }

        let mut segments = Vec::new();
        for segment in trimmed.split('.') {
            let valid = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
            let value = if valid { segment.parse::<u32>().ok() } else { None };
            match value {
                Some(value) => segments.push(value),
                None => {
                    return Err(PositionParseError::InvalidSegment {
                        input: trimmed.to_string(),
                        segment: segment.to_string(),
                    })
                }
            }
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    /// Number of levels in the key (`1` for a top-level entry)
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The containing category, if any
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() > 1 {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        } else {
            None
        }
    }

    /// The top-level segment of the key
    pub fn top_level(&self) -> u32 {
        self.segments[0]
    }

    /// True when `self` is `other` or one of its ancestors
    pub fn is_prefix_of(&self, other: &PositionKey) -> bool {
        other.segments.starts_with(&self.segments)
    }

    pub fn is_first(&self) -> bool {
        self.segments == [1]
    }

    /// Three-way comparison returning -1, 0 or 1
    pub fn compare(&self, other: &PositionKey) -> i8 {
        match self.cmp(other) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }
}

impl Default for PositionKey {
    fn default() -> Self {
        Self::first()
    }
}

impl Ord for PositionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Vec<u32> already orders element-wise with shorter prefixes first
        self.segments.cmp(&other.segments)
    }
}

impl PartialOrd for PositionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for PositionKey {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for PositionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PositionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(text: &str) -> PositionKey {
        PositionKey::parse(text).unwrap()
    }

    #[test]
    fn test_numeric_segment_ordering() {
        assert_eq!(key("2.3").compare(&key("2.10")), -1);
        assert_eq!(key("2").compare(&key("2.1")), -1);
        assert_eq!(key("1.9").compare(&key("2.1")), -1);
        assert_eq!(key("2.10").compare(&key("2.3")), 1);
        assert_eq!(key("3.1.4").compare(&key("3.1.4")), 0);
    }

    #[test]
    fn test_sorting_mixed_depths() {
        let mut keys = vec![key("2.10"), key("10"), key("2"), key("2.3.1"), key("1"), key("2.3")];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(rendered, vec!["1", "2", "2.3", "2.3.1", "2.10", "10"]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(PositionKey::parse(""), Err(PositionParseError::Empty));
        assert_eq!(PositionKey::parse("   "), Err(PositionParseError::Empty));
        assert!(PositionKey::parse("1..2").is_err());
        assert!(PositionKey::parse("1.a").is_err());
        assert!(PositionKey::parse("-1").is_err());
        assert!(PositionKey::parse("1.").is_err());
        assert!(PositionKey::parse("99999999999").is_err());
    }

    #[test]
    fn test_display_round_trips_text() {
        assert_eq!(key(" 2.3.1 ").to_string(), "2.3.1");
        assert_eq!("7".parse::<PositionKey>().unwrap(), PositionKey::from_index(7));
    }

    #[test]
    fn test_prefix_and_parent() {
        assert!(key("2").is_prefix_of(&key("2.3")));
        assert!(key("2.3").is_prefix_of(&key("2.3")));
        assert!(!key("2.3").is_prefix_of(&key("2.30")));
        assert!(!key("2.3.1").is_prefix_of(&key("2.3")));
        assert_eq!(key("2.3.1").parent(), Some(key("2.3")));
        assert_eq!(key("2").parent(), None);
        assert_eq!(key("4.1").depth(), 2);
    }

    #[test]
    fn test_from_index_floors_at_one() {
        assert!(PositionKey::from_index(0).is_first());
        assert_eq!(PositionKey::from_index(40).to_string(), "40");
    }

    #[test]
    fn test_serde_uses_dotted_text() {
        let json = serde_json::to_string(&key("2.10")).unwrap();
        assert_eq!(json, "\"2.10\"");
        let back: PositionKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key("2.10"));
        assert!(serde_json::from_str::<PositionKey>("\"x\"").is_err());
    }
}

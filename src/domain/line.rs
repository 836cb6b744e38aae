use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DiffError;

/// Classification of a line side or of a fragment within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiffType {
    /// Present on both sides, unchanged
    #[default]
    Default,
    Added,
    Removed,
    /// A modified line whose sides are rendered as one row
    Changed,
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
            Self::Changed => write!(f, "changed"),
        }
    }
}

impl FromStr for DiffType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" | "unchanged" => Ok(Self::Default),
            "added" | "insert" => Ok(Self::Added),
            "removed" | "delete" => Ok(Self::Removed),
            "changed" => Ok(Self::Changed),
            other => Err(format!("invalid diff type: {other}")),
        }
    }
}

/// One word or character run of a modified line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFragment {
    #[serde(rename = "type")]
    pub kind: DiffType,
    pub value: String,
}

impl LineFragment {
    pub fn new(kind: DiffType, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Content of one side of a row: the whole line, or the line split into
/// word diff fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineValue {
    Plain(String),
    Fragments(Vec<LineFragment>),
}

impl LineValue {
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            Self::Plain(text) => Some(text),
            Self::Fragments(_) => None,
        }
    }

    pub fn fragments(&self) -> Option<&[LineFragment]> {
        match self {
            Self::Plain(_) => None,
            Self::Fragments(fragments) => Some(fragments),
        }
    }

    /// The rendered text of this side, fragments concatenated.
    pub fn text(&self) -> String {
        match self {
            Self::Plain(text) => text.clone(),
            Self::Fragments(fragments) => fragments.iter().map(|f| f.value.as_str()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Plain(text) => text.is_empty(),
            Self::Fragments(fragments) => fragments.iter().all(|f| f.value.is_empty()),
        }
    }
}

impl From<&str> for LineValue {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_string())
    }
}

impl From<String> for LineValue {
    fn from(text: String) -> Self {
        Self::Plain(text)
    }
}

/// One side (left = old, right = new) of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SideInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
    #[serde(rename = "type", default)]
    pub kind: DiffType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<LineValue>,
}

impl SideInfo {
    pub fn new(line_number: usize, kind: DiffType, value: impl Into<LineValue>) -> Self {
        Self {
            line_number: Some(line_number),
            kind,
            value: Some(value.into()),
        }
    }

    /// True when this side has no content at the row.
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

/// A paired left/right display row. Its position in the row sequence is
/// its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LineRow {
    #[serde(default)]
    pub left: SideInfo,
    #[serde(default)]
    pub right: SideInfo,
}

impl LineRow {
    /// True for additions, removals and modifications.
    pub fn is_change(&self) -> bool {
        self.left.kind != DiffType::Default || self.right.kind != DiffType::Default
    }

    /// A removed line paired with its replacement.
    pub fn is_modification(&self) -> bool {
        self.left.kind == DiffType::Removed && self.right.kind == DiffType::Added
    }

    pub fn line_number(&self, side: Side) -> Option<usize> {
        match side {
            Side::Left => self.left.line_number,
            Side::Right => self.right.line_number,
        }
    }
}

/// Which column of the split view a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Old version
    Left,
    /// New version
    Right,
}

impl Side {
    fn prefix(self) -> char {
        match self {
            Self::Left => 'L',
            Self::Right => 'R',
        }
    }
}

/// A line on one side, written `L-12` or `R-3`. Used to force lines into
/// the diff set so they are never folded away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineId {
    pub side: Side,
    pub line_number: usize,
}

impl LineId {
    pub fn left(line_number: usize) -> Self {
        Self {
            side: Side::Left,
            line_number,
        }
    }

    pub fn right(line_number: usize) -> Self {
        Self {
            side: Side::Right,
            line_number,
        }
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.side.prefix(), self.line_number)
    }
}

impl FromStr for LineId {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DiffError::InvalidLineId(s.to_string());
        let (prefix, number) = s.split_once('-').ok_or_else(invalid)?;
        let side = match prefix {
            "L" => Side::Left,
            "R" => Side::Right,
            _ => return Err(invalid()),
        };
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let line_number = number.parse().map_err(|_| invalid())?;
        Ok(Self { side, line_number })
    }
}

impl TryFrom<String> for LineId {
    type Error = DiffError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LineId> for String {
    fn from(id: LineId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_id_display_parse() {
        assert_eq!(LineId::left(12).to_string(), "L-12");
        assert_eq!("R-3".parse::<LineId>().unwrap(), LineId::right(3));
        assert!("X-3".parse::<LineId>().is_err());
        assert!("L-".parse::<LineId>().is_err());
        assert!("L-+4".parse::<LineId>().is_err());
        assert!("L3".parse::<LineId>().is_err());
    }

    #[test]
    fn line_id_serializes_as_token() {
        let ids: Vec<LineId> = serde_json::from_str(r#"["L-1", "R-20"]"#).unwrap();
        assert_eq!(ids, vec![LineId::left(1), LineId::right(20)]);
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"["L-1","R-20"]"#);
        assert!(serde_json::from_str::<Vec<LineId>>(r#"["left-1"]"#).is_err());
    }

    #[test]
    fn line_value_is_untagged() {
        let plain: LineValue = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(plain.as_plain(), Some("abc"));

        let fragments: LineValue =
            serde_json::from_str(r#"[{"type":"removed","value":"a"},{"type":"default","value":"bc"}]"#)
                .unwrap();
        assert_eq!(fragments.text(), "abc");
        assert_eq!(fragments.fragments().map(<[_]>::len), Some(2));
    }

    #[test]
    fn diff_type_display_parse() {
        assert_eq!(DiffType::Removed.to_string(), "removed");
        assert_eq!("ADDED".parse::<DiffType>().unwrap(), DiffType::Added);
        assert!("moved".parse::<DiffType>().is_err());
    }
}

//! Intra-line differences for a modified line pair.
//!
//! A [`DiffMethod`] is a tokenizer plus a comparison key. Tokens are diffed
//! with `similar` and the resulting chunks are split into left (old) and
//! right (new) fragment lists.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::chunks::{ChangeChunk, TokenRun, diff_runs, diff_tokens, json_line_key};
use crate::domain::{DiffError, DiffType, LineFragment};

/// Built-in intra-line comparison strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DiffMethod {
    #[default]
    #[serde(alias = "diffChars")]
    Chars,
    /// Words, with whitespace differences ignored
    #[serde(alias = "diffWords")]
    Words,
    #[serde(alias = "diffWordsWithSpace")]
    WordsWithSpace,
    #[serde(alias = "diffLines")]
    Lines,
    #[serde(alias = "diffTrimmedLines")]
    TrimmedLines,
    #[serde(alias = "diffSentences")]
    Sentences,
    #[serde(alias = "diffCss")]
    Css,
    /// Lines, with trailing commas ignored
    #[serde(alias = "diffJson")]
    Json,
}

impl DiffMethod {
    pub const ALL: [DiffMethod; 8] = [
        Self::Chars,
        Self::Words,
        Self::WordsWithSpace,
        Self::Lines,
        Self::TrimmedLines,
        Self::Sentences,
        Self::Css,
        Self::Json,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chars => "chars",
            Self::Words => "words",
            Self::WordsWithSpace => "words-with-space",
            Self::Lines => "lines",
            Self::TrimmedLines => "trimmed-lines",
            Self::Sentences => "sentences",
            Self::Css => "css",
            Self::Json => "json",
        }
    }

    fn tokenize(self, text: &str) -> Vec<&str> {
        match self {
            Self::Chars => char_tokens(text),
            Self::Words | Self::WordsWithSpace => class_tokens(text, word_class),
            Self::Lines | Self::TrimmedLines | Self::Json => text.split_inclusive('\n').collect(),
            Self::Sentences => sentence_tokens(text),
            Self::Css => class_tokens(text, css_class),
        }
    }

    fn key(self, token: &str) -> Cow<'_, str> {
        match self {
            Self::Words if token.chars().all(char::is_whitespace) => Cow::Borrowed(""),
            Self::TrimmedLines => Cow::Borrowed(token.trim()),
            Self::Json => json_line_key(token),
            _ => Cow::Borrowed(token),
        }
    }

    /// Diffs two strings with this method.
    pub fn chunks(self, old: &str, new: &str) -> Vec<ChangeChunk> {
        let old_tokens = self.tokenize(old);
        let new_tokens = self.tokenize(new);
        diff_tokens(&old_tokens, &new_tokens, |token| self.key(token))
    }

    fn runs(self, old: &str, new: &str) -> Vec<TokenRun> {
        let old_tokens = self.tokenize(old);
        let new_tokens = self.tokenize(new);
        diff_runs(&old_tokens, &new_tokens, |token| self.key(token))
    }
}

impl fmt::Display for DiffMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffMethod {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chars" | "diffChars" => Ok(Self::Chars),
            "words" | "diffWords" => Ok(Self::Words),
            "words-with-space" | "diffWordsWithSpace" => Ok(Self::WordsWithSpace),
            "lines" | "diffLines" => Ok(Self::Lines),
            "trimmed-lines" | "diffTrimmedLines" => Ok(Self::TrimmedLines),
            "sentences" | "diffSentences" => Ok(Self::Sentences),
            "css" | "diffCss" => Ok(Self::Css),
            "json" | "diffJson" => Ok(Self::Json),
            other => Err(DiffError::UnknownCompareMode(other.to_string())),
        }
    }
}

/// Caller supplied intra-line differ.
pub type CustomDiffFn = Arc<dyn Fn(&str, &str) -> Vec<ChangeChunk> + Send + Sync>;

/// How a modified line pair is split into fragments.
#[derive(Clone)]
pub enum CompareMode {
    Preset(DiffMethod),
    Custom(CustomDiffFn),
}

impl CompareMode {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> Vec<ChangeChunk> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn chunks(&self, old: &str, new: &str) -> Vec<ChangeChunk> {
        match self {
            Self::Preset(method) => method.chunks(old, new),
            Self::Custom(f) => f(old, new),
        }
    }
}

impl Default for CompareMode {
    fn default() -> Self {
        Self::Preset(DiffMethod::default())
    }
}

impl From<DiffMethod> for CompareMode {
    fn from(method: DiffMethod) -> Self {
        Self::Preset(method)
    }
}

impl FromStr for CompareMode {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self::Preset)
    }
}

impl fmt::Debug for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preset(method) => f.debug_tuple("Preset").field(method).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for CompareMode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Preset(a), Self::Preset(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for CompareMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Preset(method) => method.serialize(serializer),
            Self::Custom(_) => Err(serde::ser::Error::custom(
                "a custom compare mode cannot be serialized",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for CompareMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Fragments of a modified line pair, one list per side.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordDiff {
    pub left: Vec<LineFragment>,
    pub right: Vec<LineFragment>,
}

/// Splits `old` and `new` into typed fragments. Unchanged text appears on
/// both sides, each side with its own text; removed text only on the left,
/// added text only on the right.
pub fn compute_word_diff(old: &str, new: &str, mode: &CompareMode) -> WordDiff {
    let mut diff = WordDiff::default();
    match mode {
        CompareMode::Preset(method) => {
            for run in method.runs(old, new) {
                match run {
                    TokenRun::Equal { old, new } => {
                        diff.left.push(LineFragment::new(DiffType::Default, old));
                        diff.right.push(LineFragment::new(DiffType::Default, new));
                    }
                    TokenRun::Removed(text) => {
                        diff.left.push(LineFragment::new(DiffType::Removed, text));
                    }
                    TokenRun::Added(text) => {
                        diff.right.push(LineFragment::new(DiffType::Added, text));
                    }
                }
            }
        }
        CompareMode::Custom(f) => {
            for chunk in f(old, new) {
                if chunk.added {
                    diff.right.push(LineFragment::new(DiffType::Added, chunk.value));
                } else if chunk.removed {
                    diff.left.push(LineFragment::new(DiffType::Removed, chunk.value));
                } else {
                    diff.left
                        .push(LineFragment::new(DiffType::Default, chunk.value.clone()));
                    diff.right
                        .push(LineFragment::new(DiffType::Default, chunk.value));
                }
            }
        }
    }
    diff
}

fn char_tokens(text: &str) -> Vec<&str> {
    text.char_indices()
        .map(|(i, ch)| &text[i..i + ch.len_utf8()])
        .collect()
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum CharClass {
    Run,
    Space,
    /// Always a token of its own
    Single,
}

fn word_class(ch: char) -> CharClass {
    if ch.is_alphanumeric() || ch == '_' {
        CharClass::Run
    } else if ch.is_whitespace() {
        CharClass::Space
    } else {
        CharClass::Single
    }
}

fn css_class(ch: char) -> CharClass {
    if matches!(ch, '{' | '}' | ':' | ';' | ',') {
        CharClass::Single
    } else if ch.is_whitespace() {
        CharClass::Space
    } else {
        CharClass::Run
    }
}

/// Splits into runs of the same class; `Single` characters stand alone.
fn class_tokens(text: &str, class: fn(char) -> CharClass) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        let current = class(ch);
        let mut end = start + ch.len_utf8();
        if current != CharClass::Single {
            while let Some(&(_, next)) = chars.peek() {
                if class(next) != current {
                    break;
                }
                end += next.len_utf8();
                chars.next();
            }
        }
        tokens.push(&text[start..end]);
    }

    tokens
}

/// Sentences end at `.`, `!` or `?` followed by whitespace; the whitespace
/// between sentences is a token of its own.
fn sentence_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let Some(&(gap_start, next)) = chars.peek() else {
            break;
        };
        if !next.is_whitespace() {
            continue;
        }
        tokens.push(&text[start..gap_start]);
        let mut gap_end = gap_start;
        while let Some(&(i, c)) = chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            gap_end = i + c.len_utf8();
            chars.next();
        }
        tokens.push(&text[gap_start..gap_end]);
        start = gap_end;
    }

    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

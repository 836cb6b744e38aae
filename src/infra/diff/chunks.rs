//! Line level change chunks.
//!
//! A chunk is a run of whole lines that were added, removed, or kept. Text
//! inputs are split into lines and diffed with `similar`; structured inputs
//! are pretty printed with `serde_json` first and then diffed the same way.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use similar::{DiffTag, TextDiff};
use std::borrow::Cow;

use crate::domain::{DiffError, DiffInput, Result};

/// A contiguous span from the raw diff. At most one of `added` and
/// `removed` is set; neither means unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChangeChunk {
    #[serde(default)]
    pub added: bool,
    #[serde(default)]
    pub removed: bool,
    pub value: String,
}

impl ChangeChunk {
    pub fn unchanged(value: impl Into<String>) -> Self {
        Self {
            added: false,
            removed: false,
            value: value.into(),
        }
    }

    pub fn added(value: impl Into<String>) -> Self {
        Self {
            added: true,
            removed: false,
            value: value.into(),
        }
    }

    pub fn removed(value: impl Into<String>) -> Self {
        Self {
            added: false,
            removed: true,
            value: value.into(),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        !self.added && !self.removed
    }

    /// The lines of this chunk. An empty value has no lines; otherwise one
    /// trailing newline is dropped before splitting.
    pub fn lines(&self) -> Vec<&str> {
        split_lines(&self.value)
    }
}

pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.strip_suffix('\n').unwrap_or(text).split('\n').collect()
}

/// Groups token level ops into chunks. Within a run of changes the removed
/// text always precedes the added text.
#[derive(Default)]
pub(crate) struct ChunkBuilder {
    chunks: Vec<ChangeChunk>,
    removed: String,
    added: String,
}

impl ChunkBuilder {
    pub(crate) fn unchanged(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.flush();
        match self.chunks.last_mut() {
            Some(last) if last.is_unchanged() => last.value.push_str(text),
            _ => self.chunks.push(ChangeChunk::unchanged(text)),
        }
    }

    pub(crate) fn removed(&mut self, text: &str) {
        self.removed.push_str(text);
    }

    pub(crate) fn added(&mut self, text: &str) {
        self.added.push_str(text);
    }

    fn flush(&mut self) {
        if !self.removed.is_empty() {
            self.chunks
                .push(ChangeChunk::removed(std::mem::take(&mut self.removed)));
        }
        if !self.added.is_empty() {
            self.chunks
                .push(ChangeChunk::added(std::mem::take(&mut self.added)));
        }
    }

    pub(crate) fn finish(mut self) -> Vec<ChangeChunk> {
        self.flush();
        self.chunks
    }
}

/// A run of tokens from a keyed diff. Equal runs keep both texts, which
/// differ when the key ignores part of the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenRun {
    Equal { old: String, new: String },
    Removed(String),
    Added(String),
}

pub(crate) fn diff_runs<'a, F>(old: &[&'a str], new: &[&'a str], key: F) -> Vec<TokenRun>
where
    F: Fn(&'a str) -> Cow<'a, str>,
{
    let old_keys: Vec<Cow<'a, str>> = old.iter().map(|&t| key(t)).collect();
    let new_keys: Vec<Cow<'a, str>> = new.iter().map(|&t| key(t)).collect();
    let old_refs: Vec<&str> = old_keys.iter().map(|k| k.as_ref()).collect();
    let new_refs: Vec<&str> = new_keys.iter().map(|k| k.as_ref()).collect();

    let diff = TextDiff::from_slices(&old_refs, &new_refs);
    let mut runs = Vec::new();

    for op in diff.ops() {
        let old_text = old[op.old_range()].concat();
        let new_text = new[op.new_range()].concat();
        match op.tag() {
            DiffTag::Equal => runs.push(TokenRun::Equal {
                old: old_text,
                new: new_text,
            }),
            DiffTag::Delete => runs.push(TokenRun::Removed(old_text)),
            DiffTag::Insert => runs.push(TokenRun::Added(new_text)),
            DiffTag::Replace => {
                runs.push(TokenRun::Removed(old_text));
                runs.push(TokenRun::Added(new_text));
            }
        }
    }

    runs
}

/// Diffs two token sequences compared through `key`. Unchanged chunks take
/// their text from the new side.
pub(crate) fn diff_tokens<'a, F>(old: &[&'a str], new: &[&'a str], key: F) -> Vec<ChangeChunk>
where
    F: Fn(&'a str) -> Cow<'a, str>,
{
    let mut builder = ChunkBuilder::default();
    for run in diff_runs(old, new, key) {
        match run {
            TokenRun::Equal { new, .. } => builder.unchanged(&new),
            TokenRun::Removed(text) => builder.removed(&text),
            TokenRun::Added(text) => builder.added(&text),
        }
    }
    builder.finish()
}

fn terminated_lines(text: &str) -> Vec<String> {
    split_lines(text)
        .into_iter()
        .map(|line| format!("{line}\n"))
        .collect()
}

/// Line diff of two texts. Each chunk line is newline terminated.
pub fn diff_lines(old: &str, new: &str) -> Vec<ChangeChunk> {
    let old_lines = terminated_lines(old);
    let new_lines = terminated_lines(new);
    let old_refs: Vec<&str> = old_lines.iter().map(String::as_str).collect();
    let new_refs: Vec<&str> = new_lines.iter().map(String::as_str).collect();
    diff_tokens(&old_refs, &new_refs, Cow::Borrowed)
}

/// Comparison key for a serialized JSON line: a trailing comma does not
/// make two lines different.
pub(crate) fn json_line_key(line: &str) -> Cow<'_, str> {
    let (body, newline) = match line.strip_suffix('\n') {
        Some(body) => (body, "\n"),
        None => (line, ""),
    };
    match body.strip_suffix(',') {
        Some(stripped) => Cow::Owned(format!("{stripped}{newline}")),
        None => Cow::Borrowed(line),
    }
}

/// Line diff of the pretty printed forms of two structured values.
pub fn diff_json(old: &Value, new: &Value) -> Result<Vec<ChangeChunk>> {
    let old_text = serde_json::to_string_pretty(old)?;
    let new_text = serde_json::to_string_pretty(new)?;
    let old_lines = terminated_lines(&old_text);
    let new_lines = terminated_lines(&new_text);
    let old_refs: Vec<&str> = old_lines.iter().map(String::as_str).collect();
    let new_refs: Vec<&str> = new_lines.iter().map(String::as_str).collect();
    Ok(diff_tokens(&old_refs, &new_refs, json_line_key))
}

/// The chunk sequence for a pair of inputs. Text is compared with text and
/// structured values with structured values; mixing the two is rejected.
pub fn chunks_for(old: &DiffInput, new: &DiffInput) -> Result<Vec<ChangeChunk>> {
    match (old, new) {
        (DiffInput::Text(old), DiffInput::Text(new)) => Ok(diff_lines(old, new)),
        (DiffInput::Structured(old), DiffInput::Structured(new)) => diff_json(old, new),
        _ => Err(DiffError::InputTypeMismatch {
            old: old.kind(),
            new: new.kind(),
        }),
    }
}

//! Tab completion over the command tree.

use picoshell_types::error::Result;

use crate::registry::{Entry, Registry, sorted_snapshot};
use crate::tokenizer::tokenize;

/// What a Tab press should do to the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Leave the line alone.
    None,
    /// Type these bytes at the cursor.
    Insert(String),
    /// Show these candidates below the line.
    List(Vec<String>),
}

/// Compute the completion for `line`, assuming the cursor sits at its end.
///
/// A trailing space means the last token is finished and its children are
/// offered; otherwise the last token is a prefix filter. Lines that do not
/// tokenize, or that walk off the tree, complete to nothing.
pub fn complete(registry: &Registry, line: &str, max_tokens: usize) -> Result<Completion> {
    let Ok(tokens) = tokenize(line, max_tokens) else {
        return Ok(Completion::None);
    };
    let top = registry.top_level()?;
    let ends_with_space = line.ends_with(' ');

    let candidates = match tokens.split_last() {
        None => top,
        Some(_) if ends_with_space => match find_latest(&top, &tokens) {
            Some(entry) if entry.has_children() => sorted_snapshot(entry.subcommands)?,
            _ => return Ok(Completion::None),
        },
        Some((&last, [])) => filter_prefix(top, last),
        Some((&last, parents)) => match find_latest(&top, parents) {
            Some(entry) if entry.has_children() => {
                filter_prefix(sorted_snapshot(entry.subcommands)?, last)
            },
            _ => return Ok(Completion::None),
        },
    };

    let typed_len = match tokens.last() {
        Some(last) if !ends_with_space => last.len(),
        _ => 0,
    };

    Ok(match candidates.as_slice() {
        [] => Completion::None,
        [only] => Completion::Insert(format!("{} ", only.name.get(typed_len..).unwrap_or(""))),
        many => {
            let common = common_prefix(many);
            if common.is_empty() || (common.len() == typed_len && !ends_with_space) {
                Completion::List(many.iter().map(|e| e.name.to_string()).collect())
            } else {
                Completion::Insert(common.get(typed_len..).unwrap_or("").to_string())
            }
        },
    })
}

/// Follow `tokens` as exact names from the top level down.
fn find_latest<'a>(top: &[Entry<'a>], tokens: &[&str]) -> Option<Entry<'a>> {
    let (first, rest) = tokens.split_first()?;
    let mut current = *top.iter().find(|e| e.name == *first)?;
    for token in rest {
        if !current.has_children() {
            return None;
        }
        current = current
            .subcommands
            .iter()
            .find(|c| c.name() == *token)
            .map(Entry::from)?;
    }
    Some(current)
}

fn filter_prefix<'a>(mut entries: Vec<Entry<'a>>, prefix: &str) -> Vec<Entry<'a>> {
    entries.retain(|e| e.name.starts_with(prefix));
    entries
}

/// Longest prefix shared by every candidate name.
fn common_prefix<'a>(entries: &[Entry<'a>]) -> &'a str {
    let Some((first, rest)) = entries.split_first() else {
        return "";
    };
    let mut len = first.name.len();
    for e in rest {
        len = first
            .name
            .bytes()
            .zip(e.name.bytes())
            .take(len)
            .take_while(|(a, b)| a == b)
            .count();
    }
    &first.name[..len]
}

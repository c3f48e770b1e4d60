//! `help` and `helptree` rendering.

use std::fmt::Write as _;

use picoshell_types::error::{Result, Severity, ShellError};

use crate::command::Command;
use crate::profile::{TAB, TerminalProfile};
use crate::registry::{Entry, Registry, sorted_snapshot};

/// Render `help <args...>` (or `helptree` when `tree` is set) into a string.
///
/// With no arguments, lists the whole top level. With a path, describes the
/// node at the end of it and lists its children, or its whole subtree for
/// `helptree`.
pub fn render(
    registry: &Registry,
    args: &[&str],
    tree: bool,
    profile: &TerminalProfile,
) -> Result<String> {
    let info = profile.message_begin(Severity::Info);
    let mut out = String::new();

    let Some((&first, rest)) = args.split_first() else {
        let _ = writeln!(out, "{info}Available commands:");
        for entry in registry.top_level()? {
            push_entry(&mut out, &info, profile, 1, &entry);
            if tree {
                push_subtree(&mut out, &info, profile, entry.subcommands, 2)?;
            }
        }
        return Ok(out);
    };

    let mut node = registry
        .find_top_level(first)
        .ok_or_else(|| ShellError::CommandNotFound(first.to_string()))?;
    let mut chain = first.to_string();

    for &arg in rest {
        if !node.has_children() {
            return Err(ShellError::NoHelpEntry(format!("{chain} {arg}")));
        }
        node = node
            .subcommands
            .iter()
            .find(|c| c.name() == arg)
            .map(Entry::from)
            .ok_or_else(|| ShellError::SubcommandNotFound {
                name: format!("{chain} {arg}"),
                parent: chain.clone(),
            })?;
        chain.push(' ');
        chain.push_str(arg);
    }

    let _ = writeln!(out, "{info}Description:");
    let _ = writeln!(out, "{info}{TAB}{}", node.help);
    let _ = writeln!(out, "{info}Available subcommands:");
    if !node.has_children() {
        let _ = writeln!(out, "{info}{TAB}no subcommands available for '{chain}'");
    } else if tree {
        push_subtree(&mut out, &info, profile, node.subcommands, 1)?;
    } else {
        for child in sorted_snapshot(node.subcommands)? {
            push_entry(&mut out, &info, profile, 1, &child);
        }
    }
    Ok(out)
}

fn push_entry(
    out: &mut String,
    info: &str,
    profile: &TerminalProfile,
    level: usize,
    entry: &Entry<'_>,
) {
    let _ = writeln!(
        out,
        "{info}{}{} - {}",
        TAB.repeat(level),
        profile.bold(entry.name),
        entry.help
    );
}

fn push_subtree(
    out: &mut String,
    info: &str,
    profile: &TerminalProfile,
    subcommands: &[Command],
    level: usize,
) -> Result<()> {
    for child in sorted_snapshot(subcommands)? {
        push_entry(out, info, profile, level, &child);
        push_subtree(out, info, profile, child.subcommands, level + 1)?;
    }
    Ok(())
}

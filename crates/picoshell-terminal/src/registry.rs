//! Command registration, validation and name resolution.

use picoshell_types::error::{Result, ShellError};

use crate::command::Command;

/// Built-in: list commands or describe one.
pub const HELP: &str = "help";
/// Built-in: like `help`, but recurses into subtrees.
pub const HELPTREE: &str = "helptree";

const HELP_TEXT: &str = "display help message for a specified command";
const HELPTREE_TEXT: &str = "display help message tree for a specified command";

/// A name/help pair as shown in listings. Built-ins appear here too, with no
/// subcommands.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub name: &'a str,
    pub help: &'a str,
    pub subcommands: &'a [Command],
}

impl<'a> From<&'a Command> for Entry<'a> {
    fn from(cmd: &'a Command) -> Self {
        Self {
            name: cmd.name(),
            help: cmd.help(),
            subcommands: cmd.subcommands(),
        }
    }
}

impl Entry<'_> {
    pub fn has_children(&self) -> bool {
        !self.subcommands.is_empty()
    }
}

/// Outcome of walking a token list down the tree.
#[derive(Debug)]
pub struct Resolved<'a> {
    /// The leaf the path ended on.
    pub command: &'a Command,
    /// Number of leading tokens consumed as the path.
    pub level: usize,
    /// The consumed tokens joined with single spaces.
    pub path: String,
}

/// The registered command tree.
#[derive(Debug, Default)]
pub struct Registry {
    commands: Vec<Command>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and install a command tree. Either the whole tree is
    /// accepted or nothing changes.
    pub fn register(&mut self, commands: Vec<Command>) -> Result<()> {
        if self.is_registered() {
            log::warn!("command registration rejected: already registered");
            return Err(ShellError::AlreadyRegistered);
        }
        if commands.is_empty() {
            log::warn!("command registration rejected: empty command set");
            return Err(ShellError::NoCommands);
        }
        if let Err(e) = validate_siblings(&commands, "") {
            log::warn!("command registration rejected: {e}");
            return Err(e);
        }
        log::info!("registered {} top-level commands", commands.len());
        self.commands = commands;
        Ok(())
    }

    pub fn is_registered(&self) -> bool {
        !self.commands.is_empty()
    }

    /// User-registered top-level commands, in registration order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Top-level listing including the built-ins, sorted by name.
    pub fn top_level(&self) -> Result<Vec<Entry<'_>>> {
        let builtins = [
            Entry {
                name: HELP,
                help: HELP_TEXT,
                subcommands: &[],
            },
            Entry {
                name: HELPTREE,
                help: HELPTREE_TEXT,
                subcommands: &[],
            },
        ];
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(self.commands.len() + builtins.len())
            .map_err(|_| ShellError::OutOfMemory)?;
        entries.extend(self.commands.iter().map(Entry::from));
        entries.extend(builtins);
        entries.sort_by(|a, b| a.name.cmp(b.name));
        Ok(entries)
    }

    /// Top-level lookup. `help` and `helptree` resolve to their built-in
    /// entries.
    pub fn find_top_level(&self, name: &str) -> Option<Entry<'_>> {
        match name {
            HELP => Some(Entry {
                name: HELP,
                help: HELP_TEXT,
                subcommands: &[],
            }),
            HELPTREE => Some(Entry {
                name: HELPTREE,
                help: HELPTREE_TEXT,
                subcommands: &[],
            }),
            _ => find_by_name(&self.commands, name).map(Entry::from),
        }
    }

    /// Walk `tokens` down the tree. Descent stops at the first leaf; every
    /// token after it is an argument, even if it happens to name a command.
    pub fn resolve(&self, tokens: &[&str]) -> Result<Resolved<'_>> {
        let Some((&first, _)) = tokens.split_first() else {
            return Err(ShellError::CommandNotFound(String::new()));
        };
        let mut command = find_by_name(&self.commands, first)
            .ok_or_else(|| ShellError::CommandNotFound(first.to_string()))?;
        let mut path = first.to_string();
        let mut level = 1;

        while command.has_children() {
            let Some(&next) = tokens.get(level) else {
                return Err(ShellError::Incomplete(path));
            };
            command = find_by_name(command.subcommands(), next).ok_or_else(|| {
                ShellError::SubcommandNotFound {
                    name: next.to_string(),
                    parent: path.clone(),
                }
            })?;
            path.push(' ');
            path.push_str(next);
            level += 1;
        }

        Ok(Resolved {
            command,
            level,
            path,
        })
    }
}

/// Linear scan of one sibling list.
pub fn find_by_name<'a>(siblings: &'a [Command], name: &str) -> Option<&'a Command> {
    siblings.iter().find(|c| c.name() == name)
}

/// Sorted view of one sibling list. The tree itself is never reordered.
pub fn sorted_snapshot(siblings: &[Command]) -> Result<Vec<Entry<'_>>> {
    let mut entries = Vec::new();
    entries
        .try_reserve_exact(siblings.len())
        .map_err(|_| ShellError::OutOfMemory)?;
    entries.extend(siblings.iter().map(Entry::from));
    entries.sort_by(|a, b| a.name.cmp(b.name));
    Ok(entries)
}

fn validate_siblings(siblings: &[Command], parent: &str) -> Result<()> {
    for (i, cmd) in siblings.iter().enumerate() {
        let path = if parent.is_empty() {
            cmd.name().to_string()
        } else {
            format!("{parent} {}", cmd.name())
        };
        validate_node(cmd, &path)?;

        if parent.is_empty() && (cmd.name() == HELP || cmd.name() == HELPTREE) {
            return Err(invalid(&path, "name collides with a built-in command"));
        }
        if siblings[..i].iter().any(|other| other.name() == cmd.name()) {
            return Err(invalid(&path, "duplicate name among siblings"));
        }

        validate_siblings(cmd.subcommands(), &path)?;
    }
    Ok(())
}

fn validate_node(cmd: &Command, path: &str) -> Result<()> {
    let name = cmd.name();
    if name.is_empty() {
        return Err(invalid(path, "empty name"));
    }
    if let Some(c) = name.chars().find(|c| !c.is_ascii_alphanumeric()) {
        return Err(invalid(path, &format!("invalid character '{c}' in name")));
    }
    if cmd.help().is_empty() {
        return Err(invalid(path, "empty help text"));
    }
    match (cmd.handler().is_some(), cmd.has_children()) {
        (true, true) => Err(invalid(path, "has both a handler and subcommands")),
        (false, false) => Err(invalid(path, "has neither a handler nor subcommands")),
        _ => Ok(()),
    }
}

fn invalid(path: &str, reason: &str) -> ShellError {
    ShellError::InvalidTree(format!("'{path}': {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> Command {
        Command::new(name, format!("{name} description")).with_handler(|_, _| Ok(()))
    }

    fn node(name: &str, children: Vec<Command>) -> Command {
        Command::new(name, format!("{name} description")).with_subcommands(children)
    }

    fn sample_tree() -> Vec<Command> {
        vec![
            leaf("command0"),
            node(
                "command1",
                vec![
                    leaf("subcommand10"),
                    node(
                        "subcommand11",
                        vec![
                            leaf("subcommand00"),
                            node("subcommand01", vec![leaf("subcommand")]),
                        ],
                    ),
                ],
            ),
        ]
    }

    #[test]
    fn register_valid_tree() {
        let mut reg = Registry::new();
        assert!(!reg.is_registered());
        reg.register(sample_tree()).unwrap();
        assert!(reg.is_registered());
        assert_eq!(reg.commands().len(), 2);
    }

    #[test]
    fn register_twice_rejected() {
        let mut reg = Registry::new();
        reg.register(sample_tree()).unwrap();
        let err = reg.register(vec![leaf("other")]).unwrap_err();
        assert!(matches!(err, ShellError::AlreadyRegistered));
        assert!(find_by_name(reg.commands(), "other").is_none());
    }

    #[test]
    fn register_empty_rejected() {
        let mut reg = Registry::new();
        assert!(matches!(
            reg.register(Vec::new()),
            Err(ShellError::NoCommands)
        ));
    }

    #[test]
    fn invalid_trees_rejected_atomically() {
        let cases: Vec<Vec<Command>> = vec![
            // duplicate top-level names
            vec![leaf("dup"), leaf("dup")],
            // duplicate nested names
            vec![node("outer", vec![leaf("a"), leaf("a")])],
            // non-alphanumeric name
            vec![leaf("bad-name")],
            vec![node("outer", vec![leaf("with space")])],
            // empty name
            vec![leaf("")],
            // handler and children
            vec![leaf("both").with_subcommands(vec![leaf("child")])],
            // neither
            vec![Command::new("neither", "nothing attached")],
            // deep violation
            vec![node("a", vec![node("b", vec![Command::new("c", "no handler")])])],
            // empty help
            vec![Command::new("quiet", "").with_handler(|_, _| Ok(()))],
            // built-in collisions
            vec![leaf("help")],
            vec![leaf("helptree")],
        ];

        for tree in cases {
            let mut reg = Registry::new();
            let err = reg.register(tree).unwrap_err();
            assert!(matches!(err, ShellError::InvalidTree(_)), "{err}");
            assert!(!reg.is_registered());
            // A failed attempt leaves the registry open for a valid one.
            reg.register(sample_tree()).unwrap();
        }
    }

    #[test]
    fn nested_help_name_allowed() {
        let mut reg = Registry::new();
        reg.register(vec![node("doc", vec![leaf("help")])]).unwrap();
    }

    #[test]
    fn invalid_tree_message_names_node() {
        let mut reg = Registry::new();
        let err = reg
            .register(vec![node("outer", vec![leaf("in-ner")])])
            .unwrap_err();
        assert_eq!(
            format!("{err}"),
            "invalid command tree: 'outer in-ner': invalid character '-' in name"
        );
    }

    #[test]
    fn top_level_includes_builtins_sorted() {
        let mut reg = Registry::new();
        reg.register(vec![leaf("zeta"), leaf("alpha"), leaf("helper")])
            .unwrap();
        let names: Vec<&str> = reg.top_level().unwrap().iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["alpha", "help", "helper", "helptree", "zeta"]);
    }

    #[test]
    fn sorted_snapshot_leaves_source_untouched() {
        let tree = vec![leaf("b"), leaf("c"), leaf("a")];
        let names: Vec<&str> = sorted_snapshot(&tree)
            .unwrap()
            .iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(tree[0].name(), "b");
    }

    #[test]
    fn sorting_is_bytewise() {
        let tree = vec![leaf("b"), leaf("B"), leaf("a1"), leaf("a")];
        let names: Vec<&str> = sorted_snapshot(&tree)
            .unwrap()
            .iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["B", "a", "a1", "b"]);
    }

    #[test]
    fn find_top_level_builtins() {
        let mut reg = Registry::new();
        reg.register(sample_tree()).unwrap();
        assert_eq!(reg.find_top_level("help").unwrap().help, HELP_TEXT);
        assert_eq!(reg.find_top_level("helptree").unwrap().help, HELPTREE_TEXT);
        assert!(reg.find_top_level("command1").unwrap().has_children());
        assert!(reg.find_top_level("command2").is_none());
    }

    #[test]
    fn resolve_leaf_and_args() {
        let mut reg = Registry::new();
        reg.register(sample_tree()).unwrap();

        let tokens = ["command1", "subcommand10", "extraArg"];
        let r = reg.resolve(&tokens).unwrap();
        assert_eq!(r.command.name(), "subcommand10");
        assert_eq!(r.level, 2);
        assert_eq!(r.path, "command1 subcommand10");
        assert_eq!(&tokens[r.level..], &["extraArg"]);
    }

    #[test]
    fn resolve_stops_at_first_leaf() {
        let mut reg = Registry::new();
        reg.register(sample_tree()).unwrap();

        let tokens = ["command0", "command1"];
        let r = reg.resolve(&tokens).unwrap();
        assert_eq!(r.command.name(), "command0");
        assert_eq!(r.level, 1);

        let tokens = ["command1", "subcommand10", "subcommand11"];
        let r = reg.resolve(&tokens).unwrap();
        assert_eq!(r.command.name(), "subcommand10");
        assert_eq!(&tokens[r.level..], &["subcommand11"]);
    }

    #[test]
    fn resolve_deep_path() {
        let mut reg = Registry::new();
        reg.register(sample_tree()).unwrap();
        let tokens = [
            "command1",
            "subcommand11",
            "subcommand01",
            "subcommand",
            "arg1",
            "arg2",
        ];
        let r = reg.resolve(&tokens).unwrap();
        assert_eq!(r.command.name(), "subcommand");
        assert_eq!(r.level, 4);
        assert_eq!(&tokens[r.level..], &["arg1", "arg2"]);
    }

    #[test]
    fn resolve_errors() {
        let mut reg = Registry::new();
        reg.register(sample_tree()).unwrap();

        match reg.resolve(&["single", "command"]).unwrap_err() {
            ShellError::CommandNotFound(name) => assert_eq!(name, "single"),
            e => panic!("unexpected {e:?}"),
        }

        match reg.resolve(&["command1", "subcommand12", "arg1"]).unwrap_err() {
            ShellError::SubcommandNotFound { name, parent } => {
                assert_eq!(name, "subcommand12");
                assert_eq!(parent, "command1");
            },
            e => panic!("unexpected {e:?}"),
        }

        match reg.resolve(&["command1", "subcommand11"]).unwrap_err() {
            ShellError::Incomplete(path) => assert_eq!(path, "command1 subcommand11"),
            e => panic!("unexpected {e:?}"),
        }

        match reg
            .resolve(&["command1", "subcommand11", "subcommand01", "arg1"])
            .unwrap_err()
        {
            ShellError::SubcommandNotFound { name, parent } => {
                assert_eq!(name, "arg1");
                assert_eq!(parent, "command1 subcommand11 subcommand01");
            },
            e => panic!("unexpected {e:?}"),
        }
    }

    #[test]
    fn resolve_top_level_incomplete() {
        let mut reg = Registry::new();
        reg.register(sample_tree()).unwrap();
        assert!(matches!(
            reg.resolve(&["command1"]),
            Err(ShellError::Incomplete(p)) if p == "command1"
        ));
    }
}

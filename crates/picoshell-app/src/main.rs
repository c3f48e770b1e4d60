//! picoshell interactive entry point.
//!
//! Reads stdin on its own thread and feeds the bytes to the shell, writing
//! the terminal to stdout. Runs until stdin closes. An optional TOML config
//! path comes from the first argument or `PICOSHELL_CONFIG`.

mod commands;

use std::io::{self, Read};
use std::sync::mpsc::Sender;
use std::thread;

use anyhow::Result;

use picoshell_runtime::{Shell, StdoutConsole, source};
use picoshell_types::config::ShellConfig;
use picoshell_types::input::ControlKey;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PICOSHELL_CONFIG").ok())
    {
        Some(path) => {
            log::info!("Loading config from {path}");
            ShellConfig::load(&path)?
        },
        None => ShellConfig::default(),
    };

    let mut shell = Shell::new(config)?;
    shell.register(commands::demo_commands())?;

    let (tx, input) = source::channel();
    let reader = thread::Builder::new()
        .name("picoshell-stdin".into())
        .spawn(move || read_stdin(&tx))?;

    let handle = shell.start(Box::new(input), Box::new(StdoutConsole))?;
    handle.join()?;

    if reader.join().is_err() {
        log::warn!("stdin reader panicked");
    }
    println!();
    Ok(())
}

/// Forward stdin byte by byte. A line-buffered terminal delivers `\n`, which
/// the editor knows as Enter.
fn read_stdin(tx: &Sender<u8>) {
    let mut stdin = io::stdin().lock();
    let mut buf = [0u8; 256];
    loop {
        let n = match stdin.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                log::warn!("stdin read failed: {e}");
                break;
            },
        };
        for &b in &buf[..n] {
            let b = if b == b'\n' { ControlKey::ENTER } else { b };
            if tx.send(b).is_err() {
                return;
            }
        }
    }
    log::debug!("stdin closed");
}

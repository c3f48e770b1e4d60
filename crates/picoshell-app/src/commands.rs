//! Demo command tree.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use picoshell_terminal::{Command, CommandHandler, MessageSink};
use picoshell_types::error::{Result, ShellError};

/// Build the demo tree: `ping`, `echo`, `led on|off|blink`, `sys info|uptime`
/// and `sleep`.
pub fn demo_commands() -> Vec<Command> {
    let led = Arc::new(Led::default());
    let started = Instant::now();
    vec![
        Command::new("ping", "reply with pong").with_handler_object(Arc::new(PingCmd)),
        Command::new("echo", "print the arguments").with_handler_object(Arc::new(EchoCmd)),
        Command::new("led", "control the status LED").with_subcommands(vec![
            Command::new("on", "turn the LED on").with_handler_object(Arc::new(LedCmd {
                led: Arc::clone(&led),
                action: LedAction::On,
            })),
            Command::new("off", "turn the LED off").with_handler_object(Arc::new(LedCmd {
                led: Arc::clone(&led),
                action: LedAction::Off,
            })),
            Command::new("blink", "blink the LED [count]").with_handler_object(Arc::new(
                LedCmd {
                    led,
                    action: LedAction::Blink,
                },
            )),
        ]),
        Command::new("sys", "system information").with_subcommands(vec![
            Command::new("info", "show build information").with_handler_object(Arc::new(InfoCmd)),
            Command::new("uptime", "show time since start")
                .with_handler_object(Arc::new(UptimeCmd { started })),
        ]),
        Command::new("sleep", "block the worker for <ms> milliseconds")
            .with_handler_object(Arc::new(SleepCmd)),
    ]
}

fn usage(text: &str) -> ShellError {
    ShellError::Command(format!("usage: {text}"))
}

// ---------------------------------------------------------------------------
// ping / echo
// ---------------------------------------------------------------------------

struct PingCmd;
impl CommandHandler for PingCmd {
    fn execute(&self, _args: &[&str], out: &dyn MessageSink) -> Result<()> {
        out.print("pong\n");
        Ok(())
    }
}

struct EchoCmd;
impl CommandHandler for EchoCmd {
    fn execute(&self, args: &[&str], out: &dyn MessageSink) -> Result<()> {
        out.print(&format!("{}\n", args.join(" ")));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// led
// ---------------------------------------------------------------------------

/// Stand-in for a GPIO pin.
#[derive(Default)]
struct Led {
    lit: AtomicBool,
}

impl Led {
    fn set(&self, on: bool) {
        self.lit.store(on, Ordering::Relaxed);
    }

    fn is_on(&self) -> bool {
        self.lit.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Copy)]
enum LedAction {
    On,
    Off,
    Blink,
}

const BLINK_DEFAULT: u32 = 3;
const BLINK_PERIOD: Duration = Duration::from_millis(100);

struct LedCmd {
    led: Arc<Led>,
    action: LedAction,
}

impl CommandHandler for LedCmd {
    fn execute(&self, args: &[&str], out: &dyn MessageSink) -> Result<()> {
        match self.action {
            LedAction::On => {
                self.led.set(true);
                out.print("led: on\n");
            },
            LedAction::Off => {
                self.led.set(false);
                out.print("led: off\n");
            },
            LedAction::Blink => {
                let count = match args.first() {
                    Some(n) => n.parse::<u32>().map_err(|_| usage("led blink [count]"))?,
                    None => BLINK_DEFAULT,
                };
                let initial = self.led.is_on();
                for _ in 0..count {
                    self.led.set(!initial);
                    thread::sleep(BLINK_PERIOD);
                    self.led.set(initial);
                    thread::sleep(BLINK_PERIOD);
                }
                out.print(&format!("led: blinked {count} times\n"));
            },
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// sys
// ---------------------------------------------------------------------------

struct InfoCmd;
impl CommandHandler for InfoCmd {
    fn execute(&self, _args: &[&str], out: &dyn MessageSink) -> Result<()> {
        out.print(&format!(
            "{} {} ({})\n",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            std::env::consts::ARCH
        ));
        Ok(())
    }
}

struct UptimeCmd {
    started: Instant,
}

impl CommandHandler for UptimeCmd {
    fn execute(&self, _args: &[&str], out: &dyn MessageSink) -> Result<()> {
        let uptime = self.started.elapsed().as_secs();
        let hours = uptime / 3600;
        let mins = (uptime % 3600) / 60;
        let secs = uptime % 60;
        out.print(&format!("Uptime: {hours}h {mins}m {secs}s\n"));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// sleep
// ---------------------------------------------------------------------------

struct SleepCmd;
impl CommandHandler for SleepCmd {
    fn execute(&self, args: &[&str], out: &dyn MessageSink) -> Result<()> {
        let [ms] = args else {
            return Err(usage("sleep <ms>"));
        };
        let ms: u64 = ms.parse().map_err(|_| usage("sleep <ms>"))?;
        thread::sleep(Duration::from_millis(ms));
        out.print(&format!("slept {ms} ms\n"));
        Ok(())
    }
}

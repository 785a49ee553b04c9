//! oxkeys entrypoint.
//!
//! Feeds keystrokes from the command line (batch) or the terminal
//! (interactive) through the interpreter and prints one transcript line per
//! settled key.
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use core_actions::{Interpreter, KeyOutcome};
use core_config::LogConfig;
use core_keymap::{KeyTrie, parse_keys};
use core_state::Mode;
use crossterm::event::{self, Event};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Once};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod session;
mod terminal;

use session::Session;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "oxkeys", version, about = "Vim key-sequence interpreter")]
struct Args {
    /// Key sequences in Vim notation, e.g. `3dw` `"ayy` `<C-\><C-n>`.
    pub keys: Vec<String>,
    /// Configuration file path (overrides discovery of `oxkeys.toml`).
    #[arg(long = "config")]
    pub config: Option<std::path::PathBuf>,
    /// Editor mode the session starts in.
    #[arg(long = "mode", value_enum, default_value_t = ModeArg::Command)]
    pub mode: ModeArg,
    /// Treat the document as read-only.
    #[arg(long = "read-only")]
    pub read_only: bool,
    /// Read keys from the terminal instead of the arguments.
    #[arg(long = "interactive")]
    pub interactive: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ModeArg {
    #[default]
    Command,
    Insert,
    Replace,
    Visual,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Command => Mode::Command,
            ModeArg::Insert => Mode::Insert,
            ModeArg::Replace => Mode::Replace,
            ModeArg::Visual => Mode::Visual,
        }
    }
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self, log: &LogConfig) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(&log.file);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        // RUST_LOG wins over the configured filter.
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&log.filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let file_appender = tracing_appender::rolling::never(log_dir, &log.file);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // A global subscriber is already installed; dropping the guard stops the writer.
            }
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// Transcript line for a settled keystroke; `None` while the command is pending.
fn describe(outcome: &KeyOutcome, session: &mut Session) -> Option<String> {
    match outcome {
        KeyOutcome::Pending => None,
        KeyOutcome::Inserted => Some(format!("insert {:?}", session.take_inserted())),
        KeyOutcome::Cancelled => Some("cancel".to_string()),
        KeyOutcome::Dispatched(cmd) => Some(format!("{cmd}  [{:?}]", session.mode())),
        KeyOutcome::Rejected(err) => Some(format!("error: {err}")),
    }
}

fn run_batch(interp: &mut Interpreter, session: &mut Session, sequences: &[String]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for notation in sequences {
        let keys =
            parse_keys(notation).with_context(|| format!("invalid key notation `{notation}`"))?;
        for key in keys {
            let outcome = interp.handle_key(session, key);
            if let Some(line) = describe(&outcome, session) {
                writeln!(out, "{line}")?;
            }
        }
    }
    let snapshot = interp.snapshot();
    if !snapshot.is_idle() {
        writeln!(out, "pending: {snapshot}")?;
    }
    writeln!(
        out,
        "mode: {:?}  register: {}  errors: {}",
        session.mode(),
        session.register(),
        session.errors()
    )?;
    Ok(())
}

fn run_interactive(interp: &mut Interpreter, session: &mut Session) -> Result<()> {
    let _guard = terminal::RawModeGuard::enter()?;
    let mut out = io::stdout();
    write!(out, "oxkeys: type Vim keys, Ctrl-Q quits\r\n")?;
    out.flush()?;
    loop {
        let Event::Key(raw) = event::read()? else {
            continue;
        };
        if terminal::is_quit(&raw) {
            break;
        }
        let Some(key) = terminal::translate_key(&raw) else {
            debug!(target: "runtime", ?raw, "untranslated_key");
            continue;
        };
        let outcome = interp.handle_key(session, key);
        match describe(&outcome, session) {
            Some(line) => write!(out, "{line}\r\n")?,
            None => write!(out, "  {}\r\n", interp.snapshot())?,
        }
        out.flush()?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    AppStartup::install_panic_hook();

    let config = core_config::load_from(args.config.clone())?;
    let mut startup = AppStartup::new();
    startup.configure_logging(&config.file.log)?;

    let specs = config.trie_specs()?;
    let mapping_count = specs.len();
    let trie = Arc::new(KeyTrie::build(specs));
    info!(
        target: "runtime",
        mappings = mapping_count,
        nodes = trie.node_count(),
        mode = ?args.mode,
        read_only = args.read_only,
        "startup"
    );

    let mut interp = Interpreter::new(Arc::clone(&trie)).with_max_count(config.max_count());
    let mut session = Session::new(args.mode.into(), trie.actions())
        .with_writable(!args.read_only)
        .with_bell(config.file.feedback.bell);

    let result = if args.interactive {
        run_interactive(&mut interp, &mut session)
    } else {
        run_batch(&mut interp, &mut session, &args.keys)
    };
    info!(target: "runtime", errors = session.errors(), "shutdown");
    drop(startup.log_guard.take());
    result
}

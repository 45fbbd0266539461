use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use pdfchat_core::{update, AppState, Msg};
use pdfchat_engine::{ensure_cache_dir, EngineHandle};
use pdfchat_logging::{pdfchat_debug, pdfchat_info};

use super::config::{AppConfig, LOG_FILE};
use super::effects::EffectRunner;
use super::input::{self, Action, HELP_TEXT};
use super::ui;

/// Everything the main loop waits on.
enum Inbound {
    Engine(Msg),
    Line(String),
    Closed,
}

impl From<Msg> for Inbound {
    fn from(msg: Msg) -> Self {
        Inbound::Engine(msg)
    }
}

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    pdfchat_logging::initialize(
        config.log_destination.into(),
        config.log_level.into(),
        Path::new(LOG_FILE),
    );
    pdfchat_info!("Starting pdfchat against {}", config.api_base_url);

    if let Some(dir) = &config.document_cache_dir {
        ensure_cache_dir(dir).with_context(|| format!("preparing cache dir {dir:?}"))?;
    }
    let engine = EngineHandle::new(config.engine_config()).context("starting engine")?;

    let (tx, rx) = mpsc::channel::<Inbound>();
    let mut session = Session::new(EffectRunner::new(engine, tx.clone()), io::stdout());

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Inbound::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Inbound::Closed);
    });

    session.start()?;
    for inbound in rx {
        let keep_going = match inbound {
            Inbound::Engine(msg) => {
                session.dispatch(msg)?;
                true
            }
            Inbound::Line(line) => session.handle_line(&line)?,
            Inbound::Closed => false,
        };
        if !keep_going {
            break;
        }
    }
    pdfchat_info!("pdfchat exiting");
    Ok(())
}

/// Owns the application state and writes every re-render to `out`.
struct Session<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
}

impl<W: Write> Session<W> {
    fn new(runner: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            out,
        }
    }

    fn start(&mut self) -> io::Result<()> {
        writeln!(self.out, "Type 'help' for commands.")?;
        self.render()
    }

    /// Returns `false` once the user asked to quit.
    fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        if line.trim().is_empty() {
            return Ok(true);
        }
        let view = self.state.view();
        match input::parse_command(line).and_then(|command| input::resolve(command, &view)) {
            Ok(Action::Dispatch(msgs)) => {
                for msg in msgs {
                    self.dispatch(msg)?;
                }
            }
            Ok(Action::Help) => writeln!(self.out, "{HELP_TEXT}")?,
            Ok(Action::Quit) => return Ok(false),
            Err(problem) => writeln!(self.out, "{problem}")?,
        }
        Ok(true)
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        pdfchat_debug!("dispatch {:?}", msg);
        let (state, effects) = update(std::mem::take(&mut self.state), msg);
        self.state = state;
        for prompt in self.runner.enqueue(effects) {
            writeln!(self.out, "! {prompt}")?;
        }
        if self.state.consume_dirty() {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        for line in ui::render::render(&self.state.view()) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use pdfchat_core::{ActiveView, ChatPhase, EMPTY_BATCH_STATUS};
    use pdfchat_engine::EngineConfig;

    use super::*;

    fn session() -> Session<Vec<u8>> {
        let engine = EngineHandle::new(EngineConfig::default()).unwrap();
        let (tx, _rx) = mpsc::channel::<Inbound>();
        Session::new(EffectRunner::new(engine, tx), Vec::new())
    }

    fn output(session: &mut Session<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(&mut session.out)).unwrap()
    }

    #[test]
    fn selecting_files_rerenders_the_upload_view() {
        let mut session = session();
        assert!(session.handle_line("files a.pdf b.pdf").unwrap());
        let text = output(&mut session);
        assert!(text.contains("  * a.pdf"));
        assert!(text.contains("  * b.pdf"));
    }

    #[test]
    fn empty_upload_shows_status_without_request() {
        let mut session = session();
        session.handle_line("upload").unwrap();
        assert!(output(&mut session).contains(EMPTY_BATCH_STATUS));
        assert!(!session.state.upload().is_busy());
    }

    #[test]
    fn chat_stays_gated_before_upload() {
        let mut session = session();
        session.handle_line("chat").unwrap();
        assert_eq!(session.state.active_view(), ActiveView::Upload);
    }

    #[test]
    fn questions_before_upload_never_reach_the_conversation() {
        let mut session = session();
        session.handle_line("ask hello").unwrap();
        assert!(output(&mut session).contains(input::UPLOAD_FIRST));
        assert!(session.state.conversation().messages().is_empty());
        assert_eq!(session.state.conversation().phase(), ChatPhase::Idle);
    }

    #[test]
    fn unknown_command_and_quit() {
        let mut session = session();
        assert!(session.handle_line("dance").unwrap());
        assert!(output(&mut session).contains("Unknown command 'dance'"));
        assert!(session.handle_line("   ").unwrap());
        assert!(!session.handle_line("quit").unwrap());
    }

    #[test]
    fn help_lists_commands() {
        let mut session = session();
        session.handle_line("help").unwrap();
        assert!(output(&mut session).contains("cite <n>"));
    }
}

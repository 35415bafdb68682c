use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use cardsearch_core::{update, AppState, Msg};
use client_logging::{client_info, client_warn};

use super::config::{self, API_URL_ENV};
use super::effects::{clock_hhmm, EffectRunner};
use super::ui::input::{self, Input, HELP};
use super::ui::render;

/// How long to wait for input before draining engine events.
const TICK: Duration = Duration::from_millis(75);

pub fn run_app() -> Result<()> {
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let config = config::load_config(&cwd, std::env::var(API_URL_ENV).ok())?;
    client_logging::initialize(config.log_target.into(), config.log_level());
    client_info!("cardsearch starting api_base_url={}", config.api_base_url);

    let runner = EffectRunner::new(config.api_base_url.clone())
        .context("failed to start the request engine")?;
    let input_rx = spawn_input_reader()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Card search against {} (type `help`)", config.api_base_url)?;

    let mut shell = Shell {
        state: AppState::new(),
        runner,
    };
    shell.dispatch(Msg::Started);
    // The search box starts with focus.
    shell.dispatch(Msg::InputFocused);

    loop {
        match input_rx.recv_timeout(TICK) {
            Ok(line) => match input::parse_line(&line, &clock_hhmm()) {
                Input::Msgs(msgs) => msgs.into_iter().for_each(|msg| shell.dispatch(msg)),
                Input::Help => writeln!(out, "{HELP}")?,
                Input::Quit => break,
                Input::Empty => {}
                Input::Invalid(reason) => writeln!(out, "{reason}")?,
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                client_info!("stdin closed");
                break;
            }
        }

        for msg in shell.runner.drain_events() {
            shell.dispatch(msg);
        }
        shell.dispatch(Msg::Tick);
        shell.render_if_dirty(&mut out)?;
    }

    shell.runner.shutdown();
    client_info!("cardsearch stopped");
    Ok(())
}

struct Shell {
    state: AppState,
    runner: EffectRunner,
}

impl Shell {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn render_if_dirty(&mut self, out: &mut impl Write) -> io::Result<()> {
        if !self.state.consume_dirty() {
            return Ok(());
        }
        let view = self.state.view();
        // Alerts are shown once.
        self.state.take_alerts();
        out.write_all(render::render(&view).as_bytes())?;
        out.flush()
    }
}

fn spawn_input_reader() -> Result<mpsc::Receiver<String>> {
    let (line_tx, line_rx) = mpsc::channel();
    thread::Builder::new()
        .name("cardsearch-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if line_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        client_warn!("failed to read stdin: {}", err);
                        break;
                    }
                }
            }
        })
        .context("failed to spawn input thread")?;
    Ok(line_rx)
}

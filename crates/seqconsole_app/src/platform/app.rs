use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use seqconsole_client::ApiSettings;
use seqconsole_core::{update, AppState, Msg};

use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::persistence;
use super::ui::{self, Outcome, UiState};

const TICK_INTERVAL: Duration = Duration::from_millis(250);
const INPUT_POLL: Duration = Duration::from_millis(50);

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::File);

    let state_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let settings = settings_from_env();

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(settings, msg_tx.clone())?;

    let mut state = AppState::new();
    // Restore persisted preferences first so the initial fetch already uses
    // the saved filter.
    if let Some(prefs) = persistence::load_preferences(&state_dir) {
        let (next, _) = update(std::mem::take(&mut state), Msg::RestorePreferences(prefs));
        state = next;
    }
    let (next, effects) = update(std::mem::take(&mut state), Msg::Started);
    state = next;
    runner.run(effects);

    // Background tick to throttle rendering and drive periodic probes.
    {
        let msg_tx = msg_tx.clone();
        thread::spawn(move || {
            while msg_tx.send(Msg::Tick).is_ok() {
                thread::sleep(TICK_INTERVAL);
            }
        });
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, &mut state, &runner, &msg_tx, &msg_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    persistence::save_preferences(&state_dir, &state.preferences_snapshot());
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    runner: &EffectRunner,
    msg_tx: &mpsc::Sender<Msg>,
    msg_rx: &mpsc::Receiver<Msg>,
) -> anyhow::Result<()> {
    let mut ui_state = UiState::default();
    let mut redraw = true;

    loop {
        if event::poll(INPUT_POLL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match ui_state.handle_key(key, &state.view()) {
                        Outcome::Quit => return Ok(()),
                        Outcome::Msg(msg) => {
                            let _ = msg_tx.send(msg);
                            redraw = true;
                        }
                        Outcome::Redraw => redraw = true,
                        Outcome::None => {}
                    }
                }
                Event::Resize(_, _) => redraw = true,
                _ => {}
            }
        }

        while let Ok(msg) = msg_rx.try_recv() {
            let (next, effects) = update(std::mem::take(state), msg);
            *state = next;
            runner.run(effects);
        }

        if state.consume_dirty() || redraw {
            redraw = false;
            let view = state.view();
            ui_state.clamp(&view);
            terminal.draw(|frame| ui::render::render(frame, &view, &ui_state))?;
        }
    }
}

fn settings_from_env() -> ApiSettings {
    let mut settings = ApiSettings::default();
    if let Ok(url) = std::env::var("SEQCONSOLE_URL") {
        if !url.trim().is_empty() {
            settings.base_url = url;
        }
    }
    settings
}

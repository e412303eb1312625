use std::io::{self, IsTerminal};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::api::ApiClient;
use crate::model::InvocationId;
use crate::poll::Poller;
use crate::state::{ActionGateway, AppState, Effect, PollEvent};
use crate::view::{self, DashboardView};

use super::input::Input;

const DRAIN_INTERVAL: Duration = Duration::from_millis(100);

/// User actions, decoupled from the keys that produced them. Input handling
/// emits intents; `dispatch` consumes them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Invoke(String),
    View(InvocationId),
    Reinvoke(InvocationId),
    Cancel,
    Quit,
}

/// Which list Up/Down and Enter act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Focus {
    History,
    Hosts,
}

pub(super) struct App {
    pub(super) state: AppState,
    api: ApiClient,
    poller: Poller,
    rx: mpsc::Receiver<PollEvent>,
    pub(super) input: Input,
    pub(super) focus: Focus,
    pub(super) history_sel: usize,
    pub(super) hosts_sel: usize,
    last_drain: Instant,
    synced_viewing: Option<InvocationId>,
    quit: bool,
}

pub(super) fn run(api: ApiClient) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("the dashboard requires an interactive terminal (TTY)");
    }

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let (tx, rx) = mpsc::channel();
    let poller = Poller::spawn(api.clone(), tx);
    let mut app = App {
        state: AppState::default(),
        api,
        poller,
        rx,
        input: Input::default(),
        focus: Focus::History,
        history_sel: 0,
        hosts_sel: 0,
        last_drain: Instant::now(),
        synced_viewing: None,
        quit: false,
    };

    let res = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        for event in app.rx.try_iter().collect::<Vec<_>>() {
            app.state.apply(event);
        }
        if app.last_drain.elapsed() >= DRAIN_INTERVAL {
            app.state.notifications.tick(Instant::now());
            app.last_drain = Instant::now();
        }
        app.sync_viewing();
        app.clamp_selections();

        let view = view::render(&app.state);
        terminal
            .draw(|frame| super::render::draw(frame, &view, app))
            .context("draw")?;
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(intent) = handle_key(app, &view, key) {
                        app.dispatch(intent);
                    }
                }
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, view: &DashboardView, key: KeyEvent) -> Option<Intent> {
    match key.code {
        KeyCode::Esc => Some(Intent::Quit),
        KeyCode::Char('q') if app.input.buf.is_empty() => Some(Intent::Quit),

        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::History => Focus::Hosts,
                Focus::Hosts => Focus::History,
            };
            None
        }
        KeyCode::Up => {
            match app.focus {
                Focus::History => app.history_sel = app.history_sel.saturating_sub(1),
                Focus::Hosts => app.hosts_sel = app.hosts_sel.saturating_sub(1),
            }
            None
        }
        KeyCode::Down => {
            match app.focus {
                Focus::History => app.history_sel += 1,
                Focus::Hosts => app.hosts_sel += 1,
            }
            app.clamp_selections();
            None
        }

        KeyCode::Enter => {
            let url = app.input.buf.trim().to_string();
            if !url.is_empty() {
                app.input.clear();
                return Some(Intent::Invoke(url));
            }
            match app.focus {
                Focus::History => view
                    .history
                    .get(app.history_sel)
                    .filter(|row| row.expandable)
                    .map(|row| Intent::View(row.id.clone())),
                Focus::Hosts => view
                    .hosts
                    .get(app.hosts_sel)
                    .and_then(|row| row.bound.clone())
                    .map(Intent::View),
            }
        }

        // Reinvoke is always available on a viewed invocation; cancel only
        // while its affordance is shown.
        KeyCode::Char('r') if app.input.buf.is_empty() => app
            .state
            .view
            .viewing
            .clone()
            .map(Intent::Reinvoke),
        KeyCode::Char('c')
            if app.input.buf.is_empty() && view.detail.as_ref().is_some_and(|d| d.can_cancel) =>
        {
            Some(Intent::Cancel)
        }

        KeyCode::Backspace => {
            app.input.backspace();
            None
        }
        KeyCode::Left => {
            app.input.move_left();
            None
        }
        KeyCode::Right => {
            app.input.move_right();
            None
        }
        KeyCode::Char(c) => {
            app.input.insert_char(c);
            None
        }
        _ => None,
    }
}

impl App {
    fn dispatch(&mut self, intent: Intent) {
        let gateway = ActionGateway::new(&self.api);
        let effect = match intent {
            Intent::Quit => {
                self.quit = true;
                None
            }
            Intent::Invoke(url) => gateway.invoke(&mut self.state, &url),
            Intent::View(id) => {
                gateway.view(&mut self.state, &id);
                None
            }
            Intent::Reinvoke(id) => gateway.reinvoke(&mut self.state, &id),
            Intent::Cancel => gateway.cancel(&mut self.state),
        };
        if effect == Some(Effect::RefreshCurrent) {
            self.poller.kick_current();
        }
        self.sync_viewing();
    }

    /// Keep the viewing refresher pointed at whatever is viewed now; prune
    /// and selection both change it.
    fn sync_viewing(&mut self) {
        if self.synced_viewing != self.state.view.viewing {
            self.synced_viewing = self.state.view.viewing.clone();
            self.poller.set_viewing(self.synced_viewing.clone());
        }
    }

    fn clamp_selections(&mut self) {
        let history_len = self.state.history.len();
        let hosts_len = self.state.host_order.len();
        self.history_sel = self.history_sel.min(history_len.saturating_sub(1));
        self.hosts_sel = self.hosts_sel.min(hosts_len.saturating_sub(1));
    }
}

#[cfg(test)]
#[path = "../tests/tui/app_tests.rs"]
mod tests;

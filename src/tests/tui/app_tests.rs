use super::*;

use crossterm::event::KeyModifiers;

use crate::model::InvocationSummary;
use crate::state::{Outcome, Resource};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn summary(id: &str) -> InvocationSummary {
    InvocationSummary {
        id: InvocationId(id.to_string()),
        name: Some(format!("run-{}", id)),
        url: "https://example.com/repo".to_string(),
        commit: "deadbeef".to_string(),
        start: "2026-08-30T10:00:00Z".to_string(),
    }
}

// The pollers target a closed port; their ticks fail as transport errors
// and never become events, so key handling runs against a quiet state.
fn app() -> App {
    let api = ApiClient::with_base("http://127.0.0.1:9").unwrap();
    let (tx, rx) = mpsc::channel();
    App {
        state: AppState::default(),
        api: api.clone(),
        poller: Poller::spawn(api, tx),
        rx,
        input: Input::default(),
        focus: Focus::History,
        history_sel: 0,
        hosts_sel: 0,
        last_drain: Instant::now(),
        synced_viewing: None,
        quit: false,
    }
}

fn type_str(app: &mut App, view: &DashboardView, s: &str) {
    for c in s.chars() {
        assert_eq!(handle_key(app, view, key(KeyCode::Char(c))), None);
    }
}

#[test]
fn enter_with_a_url_emits_invoke_and_clears_the_input() {
    let mut app = app();
    let view = view::render(&app.state);
    type_str(&mut app, &view, "  https://example.com/jobs/nightly ");

    let intent = handle_key(&mut app, &view, key(KeyCode::Enter));
    assert_eq!(
        intent,
        Some(Intent::Invoke(
            "https://example.com/jobs/nightly".to_string()
        ))
    );
    assert_eq!(app.input.buf, "");
    assert_eq!(app.input.cursor, 0);
}

#[test]
fn enter_with_an_empty_input_views_the_selected_history_row() {
    let mut app = app();
    app.state.apply(crate::state::PollEvent {
        resource: Resource::Invocations,
        seq: 1000,
        outcome: Outcome::Invocations(vec![summary("a"), summary("b")]),
    });
    app.history_sel = 1;

    let view = view::render(&app.state);
    let intent = handle_key(&mut app, &view, key(KeyCode::Enter));
    assert_eq!(intent, Some(Intent::View(InvocationId("b".to_string()))));
}

#[test]
fn quit_key_only_quits_while_the_input_is_empty() {
    let mut app = app();
    let view = view::render(&app.state);
    assert_eq!(
        handle_key(&mut app, &view, key(KeyCode::Char('q'))),
        Some(Intent::Quit)
    );

    // Mid-URL, 'q' is just another character.
    type_str(&mut app, &view, "https://example.com/quick");
    assert_eq!(app.input.buf, "https://example.com/quick");

    // Esc quits regardless of the buffer.
    assert_eq!(
        handle_key(&mut app, &view, key(KeyCode::Esc)),
        Some(Intent::Quit)
    );
}

#[test]
fn cancel_key_requires_a_visible_affordance() {
    let mut app = app();
    let view = view::render(&app.state);
    // No detail pane: 'c' is plain input.
    assert_eq!(handle_key(&mut app, &view, key(KeyCode::Char('c'))), None);
    assert_eq!(app.input.buf, "c");
}

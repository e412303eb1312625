use std::sync::OnceLock;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;

use crate::state::HostStatus;
use crate::view::{ActiveSlot, DashboardView, DetailPane, InvocationRow};

use super::app::{App, Focus};

pub(super) fn draw(frame: &mut Frame, view: &DashboardView, app: &App) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(frame, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(32),
            Constraint::Percentage(40),
            Constraint::Percentage(28),
        ])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(columns[0]);

    draw_active(frame, left[0], &view.active);
    draw_history(frame, left[1], view, app);
    draw_detail(frame, columns[1], view.detail.as_ref());
    draw_hosts(frame, columns[2], view, app);
    draw_input(frame, rows[2], app);
    draw_notice(frame, rows[3], view.notice.as_deref());
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let header = Line::from(vec![
        Span::styled(
            "clusterdash",
            Style::default().fg(Color::Black).bg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(
            "tab: switch list  enter: view/invoke  r: reinvoke  c: cancel  q: quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn draw_active(frame: &mut Frame, area: Rect, active: &ActiveSlot) {
    let block = Block::default().borders(Borders::ALL).title("active");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = match active {
        ActiveSlot::Idle => Line::from(Span::styled(
            "no active invocation",
            Style::default().fg(Color::DarkGray),
        )),
        ActiveSlot::Unreachable => Line::from(Span::styled(
            "cluster unreachable",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        ActiveSlot::Running(row) => invocation_line(row, true),
    };
    frame.render_widget(Paragraph::new(line), inner);
}

fn draw_history(frame: &mut Frame, area: Rect, view: &DashboardView, app: &App) {
    let focused = app.focus == Focus::History;
    let block = titled_block("history", focused);
    if view.history_placeholder {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(placeholder("no previous invocations"), inner);
        return;
    }

    let items: Vec<ListItem> = view
        .history
        .iter()
        .map(|row| ListItem::new(invocation_line(row, false)))
        .collect();
    let mut list_state = ListState::default().with_selected(Some(app.history_sel));
    frame.render_stateful_widget(
        List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
        area,
        &mut list_state,
    );
}

fn draw_hosts(frame: &mut Frame, area: Rect, view: &DashboardView, app: &App) {
    let focused = app.focus == Focus::Hosts;
    let block = titled_block("hosts", focused);
    if view.hosts_placeholder {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(placeholder("no hosts connected"), inner);
        return;
    }

    let items: Vec<ListItem> = view
        .hosts
        .iter()
        .map(|host| {
            ListItem::new(Line::from(vec![
                Span::raw(host.hostname.clone()),
                Span::raw("  "),
                Span::styled(
                    host.state_desc.clone(),
                    Style::default().fg(state_color(&host.state_desc)),
                ),
            ]))
        })
        .collect();
    let mut list_state = ListState::default().with_selected(Some(app.hosts_sel));
    frame.render_stateful_widget(
        List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
        area,
        &mut list_state,
    );
}

fn draw_detail(frame: &mut Frame, area: Rect, detail: Option<&DetailPane>) {
    let block = Block::default().borders(Borders::ALL).title("invocation");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(detail) = detail else {
        frame.render_widget(placeholder("select an invocation to inspect"), inner);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            detail.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            fmt_ts(&detail.start),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            detail.id.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(format!("{} @ {}", detail.url, detail.commit)),
        Line::default(),
    ];

    let mut affordances = vec![Span::styled(
        "[r]einvoke",
        Style::default().fg(Color::Cyan),
    )];
    if detail.can_cancel {
        affordances.push(Span::raw("  "));
        affordances.push(Span::styled("[c]ancel", Style::default().fg(Color::Red)));
    }
    lines.push(Line::from(affordances));
    lines.push(Line::default());

    if let Some(command) = &detail.global_command {
        lines.push(Line::from(Span::styled(
            "global setup",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        lines.push(Line::from(command.clone()));
        lines.push(Line::default());
    }

    lines.push(Line::from(Span::styled(
        "hosts",
        Style::default().add_modifier(Modifier::UNDERLINED),
    )));
    for host in &detail.hosts {
        let (label, color) = status_span(&host.status);
        lines.push(Line::from(vec![
            Span::raw(host.hostname.clone()),
            Span::raw("  "),
            Span::styled(label, Style::default().fg(color)),
        ]));
        if let Some(command) = &host.command {
            lines.push(Line::from(Span::styled(
                format!("  {}", command),
                Style::default().fg(Color::Gray),
            )));
        }
    }

    lines.push(Line::default());
    if detail.gen_logs {
        lines.push(Line::from(
            "log files will be generated from standard output",
        ));
    }
    lines.push(Line::from(format!(
        "log files on hosts will be uploaded from {}",
        detail.log_dir
    )));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_input(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("invoke repository url");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(app.input.buf.as_str()), inner);
    frame.set_cursor_position((inner.x + app.input.cursor_cols() as u16, inner.y));
}

fn draw_notice(frame: &mut Frame, area: Rect, notice: Option<&str>) {
    if let Some(msg) = notice {
        frame.render_widget(
            Paragraph::new(Span::styled(
                msg.to_string(),
                Style::default().fg(Color::Black).bg(Color::Yellow),
            )),
            area,
        );
    }
}

fn invocation_line(row: &InvocationRow, active: bool) -> Line<'static> {
    let name = match &row.name {
        Some(name) => Span::styled(
            name.clone(),
            if active {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            },
        ),
        None if row.commit_short.is_empty() => {
            // Summary not yet cached; show the id alone.
            return Line::from(Span::styled(
                row.id.to_string(),
                Style::default().fg(Color::DarkGray),
            ));
        }
        None => Span::styled("(failed)", Style::default().fg(Color::Red)),
    };
    let mut spans = vec![name, Span::raw("  ")];
    if !row.commit_short.is_empty() {
        spans.push(Span::styled(
            row.commit_short.clone(),
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
        fmt_ts(&row.start),
        Style::default().fg(Color::Gray),
    ));
    Line::from(spans)
}

fn titled_block(title: &str, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title.to_string(), style))
}

fn placeholder(text: &str) -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    ))
}

fn status_span(status: &HostStatus) -> (String, Color) {
    match status {
        HostStatus::Disconnected => ("disconnected".to_string(), Color::Red),
        HostStatus::Logs { url } => (format!("logs: {}", url), Color::Green),
        HostStatus::Reported(desc) => (desc.clone(), state_color(desc)),
        HostStatus::Busy => ("busy".to_string(), Color::Yellow),
        HostStatus::Abandoned => ("abandoned".to_string(), Color::Magenta),
    }
}

fn state_color(desc: &str) -> Color {
    match desc {
        "running" => Color::Green,
        "idle" => Color::Blue,
        _ => Color::White,
    }
}

fn ts_format() -> &'static [BorrowedFormatItem<'static>] {
    static FMT: OnceLock<Vec<BorrowedFormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse_borrowed::<2>(
            "[hour padding:zero]:[minute padding:zero]:[second padding:zero] [day]/[month repr:numerical]/[year]",
        )
        .expect("valid time format")
    })
}

fn fmt_ts(ts: &str) -> String {
    OffsetDateTime::parse(ts, &Rfc3339)
        .ok()
        .and_then(|dt| dt.format(ts_format()).ok())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
#[path = "../tests/tui/render_tests.rs"]
mod tests;

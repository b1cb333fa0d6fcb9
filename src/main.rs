use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use sel_terminal::config::{Config, SourceKind};
use sel_terminal::demo_feed::DemoRowSource;
use sel_terminal::export::export_view;
use sel_terminal::params::QueryParams;
use sel_terminal::persist;
use sel_terminal::provider::spawn_provider;
use sel_terminal::row_source::{HttpRowSource, RowSource};
use sel_terminal::sort::SortIndicator;
use sel_terminal::state::{AppState, Delta, Focus, ProviderCommand, TableView, UserEvent, apply_delta};
use sel_terminal::url_sync::UrlSync;

const MAX_COLUMN_WIDTH: usize = 24;
const CONSOLE_LINES: u16 = 3;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    export_dir: PathBuf,
    page_rows: usize,
}

impl App {
    fn new(state: AppState, cmd_tx: Option<mpsc::Sender<ProviderCommand>>, export_dir: PathBuf) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
            export_dir,
            page_rows: 10,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        let now = Instant::now();
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.state.focus == Focus::Search {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.state.focus = Focus::Table,
                KeyCode::Backspace => self.state.pop_search_char(now),
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.state.handle_event(now, UserEvent::ClearSearch)
                }
                KeyCode::Char(c) => self.state.push_search_char(now, c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            KeyCode::Char('/') => self.state.focus = Focus::Search,
            KeyCode::Char('x') => self.state.handle_event(now, UserEvent::ClearSearch),
            KeyCode::Char('[') => self.state.cycle_season(false),
            KeyCode::Char(']') => self.state.cycle_season(true),
            KeyCode::Char('h') | KeyCode::Left => self.state.move_column_cursor(false),
            KeyCode::Char('l') | KeyCode::Right => self.state.move_column_cursor(true),
            KeyCode::Char('s') | KeyCode::Enter => {
                if !self.state.sort_cursor_column() {
                    self.state.push_log("[INFO] rank is not sortable");
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::PageDown => self.state.page_down(self.page_rows),
            KeyCode::PageUp => self.state.page_up(self.page_rows),
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_rows(true),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export(),
            _ => {}
        }
    }

    fn request_rows(&mut self, announce: bool) {
        let Some(tx) = &self.cmd_tx else {
            if announce {
                self.state.push_log("[INFO] Row fetch unavailable");
            }
            return;
        };
        if !self.state.begin_fetch() {
            if announce {
                self.state.push_log("[INFO] Fetch already in progress");
            }
            return;
        }
        if tx.send(ProviderCommand::FetchRows).is_err() {
            self.state.loading = false;
            self.state.push_log("[WARN] Row request failed");
        } else if announce {
            self.state.push_log("[INFO] Reload requested");
        }
    }

    fn export(&mut self) {
        if self.state.rows.is_empty() {
            self.state.push_log("[INFO] Nothing to export");
            return;
        }
        match export_view(&self.state, &self.export_dir) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} rows x {} columns to {}",
                report.rows,
                report.columns,
                report.path.display()
            )),
            Err(err) => self.state.push_log(format!("[ERROR] Export failed: {err:#}")),
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = Config::from_env();

    let location = std::env::args()
        .nth(1)
        .or_else(|| config.location.clone())
        .or_else(persist::load_location)
        .unwrap_or_default();
    let params = QueryParams::parse(&location)?;

    let source: Box<dyn RowSource> = match config.source {
        SourceKind::Http => Box::new(HttpRowSource::new(&config.api_url, config.http_timeout)),
        SourceKind::Demo => Box::new(DemoRowSource::new()),
    };
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(source, tx, cmd_rx);

    let url = UrlSync::new(Box::new(params), config.search_debounce);
    let state = AppState::new(url, config.decimal_columns.clone());
    let mut app = App::new(state, Some(cmd_tx), config.export_dir.clone());
    app.request_rows(false);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    app.state.flush_location();
    persist::save_location(&app.state.location()).context("save location")?;
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }
        app.state.tick(Instant::now());

        let mut page_rows = app.page_rows;
        terminal.draw(|f| page_rows = ui(f, &app.state))?;
        app.page_rows = page_rows.max(1);

        // Wake for a pending debounce deadline as well as the regular tick.
        let mut timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if let Some(deadline) = app.state.next_deadline() {
            timeout = timeout.min(deadline.saturating_duration_since(Instant::now()));
        }
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Draws a frame; returns how many table rows fit.
fn ui(frame: &mut Frame, state: &AppState) -> usize {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(CONSOLE_LINES + 1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let view = state.view();
    frame.render_widget(controls_line(&view, state), chunks[1]);

    let body = chunks[2];
    let mut page_rows = body.height.saturating_sub(1) as usize;
    if view.loading {
        render_message(frame, body, "Loading data...", Style::default().fg(Color::DarkGray));
    } else if let Some(err) = view.error {
        render_message(frame, body, err, Style::default().fg(Color::Red));
    } else if state.rows.is_empty() {
        render_message(frame, body, "No data available", Style::default().fg(Color::DarkGray));
    } else {
        page_rows = render_table(frame, body, state, &view);
    }

    if !view.loading && view.error.is_none() && !state.rows.is_empty() {
        let status = Paragraph::new(state.summary(view.rows.len()))
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(status, chunks[3]);
    }

    render_console(frame, chunks[4], state);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[5]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
    page_rows
}

fn header_text(state: &AppState) -> String {
    let line1 = "  SEL | Season stats".to_string();
    let line2 = format!("  {}", state.location());
    format!("{line1}\n{line2}")
}

fn controls_line<'a>(view: &TableView<'a>, state: &AppState) -> Paragraph<'a> {
    let searching = state.focus == Focus::Search;
    let search_style = if searching {
        Style::default().fg(Color::Black).bg(Color::Gray)
    } else {
        Style::default()
    };
    let cursor = if searching { "▏" } else { "" };
    let pending = if state.search_pending() { " …" } else { "" };
    let seasons = format!("({} seasons)", view.seasons.len());
    let line = Line::from(vec![
        Span::styled("Season: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("◂ {} ▸ ", view.selected_season.label())),
        Span::styled(seasons, Style::default().fg(Color::DarkGray)),
        Span::raw("   "),
        Span::styled("Search: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {}{cursor} ", view.search_term), search_style),
        Span::styled(pending.to_string(), Style::default().fg(Color::DarkGray)),
    ]);
    Paragraph::new(line)
}

fn render_message(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text.to_string()).style(style);
    frame.render_widget(paragraph, area);
}

/// Frozen fragment on the left, scrollable fragment on the right; both draw
/// the same row window so rows stay aligned.
fn render_table(frame: &mut Frame, area: Rect, state: &AppState, view: &TableView) -> usize {
    let visible = area.height.saturating_sub(1) as usize;
    let (start, end) = visible_range(state.selected, view.rows.len(), visible);

    let frozen_widths: Vec<u16> = view
        .frozen_columns
        .iter()
        .map(|col| column_width(state, view, col, start, end))
        .collect();
    let frozen_total: u16 = frozen_widths.iter().map(|w| w + 1).sum();

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(frozen_total + 1), Constraint::Min(0)])
        .split(area);

    let frozen_count = view.frozen_columns.len();
    let frozen_cols: Vec<(usize, &String)> = view.frozen_columns.iter().enumerate().collect();
    render_fragment(frame, halves[0], state, view, &frozen_cols, &frozen_widths, start, end, true);

    // Fit as many scrollable columns as the remaining width allows.
    let fit_from = |first: usize| {
        let mut used = 0u16;
        let mut count = 0usize;
        for col in view.scrollable_columns.iter().skip(first) {
            let w = column_width(state, view, col, start, end) + 1;
            if used + w > halves[1].width && count > 0 {
                break;
            }
            used += w;
            count += 1;
        }
        count
    };
    let scroll_start = state.scroll_start(fit_from(state.scroll_offset));
    let count = fit_from(scroll_start);
    let scroll_cols: Vec<(usize, &String)> = view
        .scrollable_columns
        .iter()
        .enumerate()
        .skip(scroll_start)
        .take(count)
        .map(|(idx, col)| (frozen_count + idx, col))
        .collect();
    let scroll_widths: Vec<u16> = scroll_cols
        .iter()
        .map(|(_, col)| column_width(state, view, col, start, end))
        .collect();
    render_fragment(frame, halves[1], state, view, &scroll_cols, &scroll_widths, start, end, false);

    visible
}

#[allow(clippy::too_many_arguments)]
fn render_fragment(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    view: &TableView,
    columns: &[(usize, &String)],
    widths: &[u16],
    start: usize,
    end: usize,
    frozen: bool,
) {
    let header_cells = columns.iter().map(|(idx, col)| {
        let (mark, mark_style) = match view.sort.indicator(col) {
            SortIndicator::Unsorted => ("▾", Style::default().fg(Color::DarkGray)),
            SortIndicator::Ascending => ("▴", Style::default().add_modifier(Modifier::BOLD)),
            SortIndicator::Descending => ("▾", Style::default().add_modifier(Modifier::BOLD)),
        };
        let mut name_style = Style::default().add_modifier(Modifier::BOLD);
        if *idx == state.column_cursor && state.focus == Focus::Table {
            name_style = name_style.add_modifier(Modifier::REVERSED);
        }
        Cell::from(Line::from(vec![
            Span::styled(col.to_string(), name_style),
            Span::styled(format!(" {mark}"), mark_style),
        ]))
    });
    let header = Row::new(header_cells);

    let rows: Vec<Row> = (start..end)
        .map(|position| {
            let row = view.rows[position];
            let cells = columns
                .iter()
                .map(|(_, col)| Cell::from(state.cell_text(col, row, position)));
            let style = if position == state.selected {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Row::new(cells).style(style)
        })
        .collect();

    let constraints: Vec<Constraint> = widths.iter().map(|w| Constraint::Length(*w)).collect();
    let mut block = Block::default();
    if frozen {
        block = block
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray));
    }
    let inner = block.inner(area);
    let table = Table::new(rows, constraints)
        .header(header)
        .column_spacing(1)
        .block(block);
    frame.render_widget(table, area);

    // Headers stay; the notice goes on the first body line.
    if view.rows.is_empty() && !columns.is_empty() && inner.height > 1 {
        let notice_area = Rect {
            y: inner.y + 1,
            height: 1,
            ..inner
        };
        render_message(
            frame,
            notice_area,
            "No results found.",
            Style::default().fg(Color::DarkGray),
        );
    }
}

fn column_width(state: &AppState, view: &TableView, column: &str, start: usize, end: usize) -> u16 {
    let header = column.chars().count() + 2;
    let widest = (start..end)
        .map(|position| {
            state
                .cell_text(column, view.rows[position], position)
                .chars()
                .count()
        })
        .max()
        .unwrap_or(0);
    header.max(widest).min(MAX_COLUMN_WIDTH) as u16
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let lines: Vec<Line> = state
        .logs
        .iter()
        .rev()
        .take(CONSOLE_LINES as usize)
        .rev()
        .map(|msg| {
            let style = if msg.contains("[ERROR]") {
                Style::default().fg(Color::Red)
            } else if msg.contains("[WARN]") {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::styled(msg.clone(), style)
        })
        .collect();
    let console = Paragraph::new(lines).block(Block::default().borders(Borders::TOP));
    frame.render_widget(console, area);
}

fn footer_text(state: &AppState) -> String {
    match state.focus {
        Focus::Search => "type to search | Backspace delete | Ctrl-u clear | Enter/Esc done".to_string(),
        Focus::Table => {
            "[/] Season | / Search | x Clear | ←/→ Column | s Sort | j/k Move | r Reload | e Export | ? Help | q Quit".to_string()
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "SEL Terminal - Help",
        "",
        "Filter:",
        "  [ / ]        Previous / next season",
        "  /            Edit search",
        "  x            Clear search",
        "",
        "Table:",
        "  ←/→ or h/l   Column cursor",
        "  s / Enter    Sort column (asc, desc, off)",
        "  j/k or ↑/↓   Move",
        "  PgUp/PgDn    Page",
        "",
        "Global:",
        "  r            Reload data",
        "  e            Export view to xlsx",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

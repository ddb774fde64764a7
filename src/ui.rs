use crate::engine::{ReservationEngine, ReservationOutcome};
use crate::payment::PaymentProcessor;
use crate::storage::StateStore;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Rooms,
    Bookings,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Rooms => Page::Bookings,
            Page::Bookings => Page::Rooms,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Rooms => "Rooms",
            Page::Bookings => "Bookings",
        }
    }
}

pub struct App<'a, S: StateStore, P: PaymentProcessor> {
    pub engine: &'a mut ReservationEngine<S, P>,
    pub user_name: String,
    pub current_page: Page,
    pub rooms_state: TableState,
    pub bookings_state: TableState,
    pub status: Option<(String, bool)>,
}

impl<'a, S: StateStore, P: PaymentProcessor> App<'a, S, P> {
    pub fn new(engine: &'a mut ReservationEngine<S, P>, user_name: &str) -> Self {
        let mut rooms_state = TableState::default();
        if !engine.view_rooms().is_empty() {
            rooms_state.select(Some(0));
        }

        let mut bookings_state = TableState::default();
        if !engine.view_bookings().is_empty() {
            bookings_state.select(Some(0));
        }

        Self {
            engine,
            user_name: user_name.to_string(),
            current_page: Page::Rooms,
            rooms_state,
            bookings_state,
            status: None,
        }
    }

    fn active_len(&self) -> usize {
        match self.current_page {
            Page::Rooms => self.engine.view_rooms().len(),
            Page::Bookings => self.engine.view_bookings().len(),
        }
    }

    fn active_state(&mut self) -> &mut TableState {
        match self.current_page {
            Page::Rooms => &mut self.rooms_state,
            Page::Bookings => &mut self.bookings_state,
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn next(&mut self) {
        let len = self.active_len();
        if len == 0 {
            return;
        }
        let state = self.active_state();
        let i = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.active_len();
        if len == 0 {
            return;
        }
        let state = self.active_state();
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    /// Book the highlighted room for the session user
    pub fn book_selected(&mut self) {
        let number = match self
            .rooms_state
            .selected()
            .and_then(|i| self.engine.view_rooms().get(i))
        {
            Some(room) => room.number,
            None => return,
        };

        let outcome = self.engine.book_room(&self.user_name, number);
        self.record(&outcome);
        self.clamp_bookings();
    }

    /// Cancel the highlighted booking, if it belongs to the session user
    pub fn cancel_selected(&mut self) {
        let number = match self
            .bookings_state
            .selected()
            .and_then(|i| self.engine.view_bookings().get(i))
        {
            Some(booking) => booking.room_number,
            None => return,
        };

        let outcome = self.engine.cancel_booking(&self.user_name, number);
        self.record(&outcome);
        self.clamp_bookings();
    }

    fn record(&mut self, outcome: &ReservationOutcome) {
        let mut message = outcome.message();
        if outcome.is_success() {
            if let Some(err) = self.engine.last_save_error() {
                message = format!("{} (warning: {})", message, err);
            }
        }
        self.status = Some((message, outcome.is_success()));
    }

    fn clamp_bookings(&mut self) {
        let len = self.engine.view_bookings().len();
        match self.bookings_state.selected() {
            _ if len == 0 => self.bookings_state.select(None),
            Some(i) if i >= len => self.bookings_state.select(Some(len - 1)),
            None => self.bookings_state.select(Some(0)),
            _ => {}
        }
    }

    /// Apply one key press. Returns true when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Tab | KeyCode::BackTab => self.next_page(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Char('b') | KeyCode::Enter if self.current_page == Page::Rooms => {
                self.book_selected()
            }
            KeyCode::Char('c') | KeyCode::Delete if self.current_page == Page::Bookings => {
                self.cancel_selected()
            }
            _ => {}
        }
        false
    }
}

pub fn run_ui<S: StateStore, P: PaymentProcessor>(app: &mut App<'_, S, P>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend, S: StateStore, P: PaymentProcessor>(
    terminal: &mut Terminal<B>,
    app: &mut App<'_, S, P>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key.code, key.modifiers) {
                return Ok(());
            }
        }
    }
}

fn ui<S: StateStore, P: PaymentProcessor>(f: &mut Frame, app: &mut App<'_, S, P>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Rooms => render_rooms(f, chunks[1], app),
        Page::Bookings => render_bookings(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header<S: StateStore, P: PaymentProcessor>(
    f: &mut Frame,
    area: Rect,
    app: &App<'_, S, P>,
) {
    let pages = [Page::Rooms, Page::Bookings];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    let state = app.engine.state();
    let available = state.catalog.available().count();

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Guest: {}", app.user_name),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Available {}", available),
        Style::default().fg(Color::Green),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("Booked {}", state.catalog.len() - available),
        Style::default().fg(Color::Red),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    let cells = titles.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    Row::new(cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1)
}

fn render_rooms<S: StateStore, P: PaymentProcessor>(
    f: &mut Frame,
    area: Rect,
    app: &mut App<'_, S, P>,
) {
    let rows: Vec<Row> = app
        .engine
        .view_rooms()
        .iter()
        .map(|room| {
            let color = if room.is_booked() { Color::Red } else { Color::Green };

            Row::new(vec![
                Cell::from(room.number.to_string()),
                Cell::from(room.category.as_str()),
                Cell::from(format!("{:.2}", room.price)),
                Cell::from(room.status_label()).style(Style::default().fg(color)),
            ])
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header_row(&["Room", "Category", "Price", "Status"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Rooms "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.rooms_state);
}

fn render_bookings<S: StateStore, P: PaymentProcessor>(
    f: &mut Frame,
    area: Rect,
    app: &mut App<'_, S, P>,
) {
    let state = app.engine.state();
    let rows: Vec<Row> = state
        .ledger
        .list()
        .iter()
        .map(|booking| {
            let (category, price) = match state.room_for(booking) {
                Some(room) => (room.category.as_str().to_string(), format!("{:.2}", room.price)),
                None => ("?".to_string(), "-".to_string()),
            };
            let mine = booking.is_for_user(&app.user_name);
            let guest_style = if mine {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(truncate(&booking.user_name, 24)).style(guest_style),
                Cell::from(booking.room_number.to_string()),
                Cell::from(category),
                Cell::from(price),
                Cell::from(booking.booked_at.format("%Y-%m-%d %H:%M").to_string()),
            ])
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(26),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(18),
        ],
    )
    .header(header_row(&["Guest", "Room", "Category", "Price", "Booked At"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Bookings "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.bookings_state);
}

fn render_status_bar<S: StateStore, P: PaymentProcessor>(
    f: &mut Frame,
    area: Rect,
    app: &App<'_, S, P>,
) {
    let mut status_spans = vec![];

    if let Some((message, ok)) = &app.status {
        let color = if *ok { Color::Green } else { Color::Red };
        status_spans.push(Span::styled(format!(" {} ", message), Style::default().fg(color)));
        status_spans.push(Span::raw("| "));
    }

    let action = match app.current_page {
        Page::Rooms => ("b", " Book | "),
        Page::Bookings => ("c", " Cancel | "),
    };
    status_spans.push(Span::styled(action.0, Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(action.1));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

use std::{io, sync::Arc, thread, time::Duration};

use anyhow::{Context, Result};
use carcompare_core::{
    compare::ComparisonTable,
    models::{format_detail, CarRecord, CatalogSnapshot},
    view::MIN_COMPARISON_SIZE,
    CarGroup, Catalog, CatalogClient, ViewController, ViewMode,
};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info};

const TICK_RATE: Duration = Duration::from_millis(250);
const LABEL_COLUMN_WIDTH: u16 = 18;
const CAR_COLUMN_WIDTH: u16 = 22;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal frontend: grouped catalog plus side-by-side comparison.
pub struct CarCompareApp {
    client: CatalogClient,
    catalog: Catalog,
    view: ViewController,
    state: UiState,
    catalog_tx: mpsc::Sender<CatalogSnapshot>,
    catalog_rx: Option<mpsc::Receiver<CatalogSnapshot>>,
    theme: Theme,
}

impl CarCompareApp {
    pub fn new(client: CatalogClient, catalog: Catalog) -> Self {
        let (catalog_tx, catalog_rx) = mpsc::channel(4);
        Self {
            client,
            catalog,
            view: ViewController::new(),
            state: UiState::default(),
            catalog_tx,
            catalog_rx: Some(catalog_rx),
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let _ = self.request_catalog();

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        let mut catalog_rx = self.catalog_rx.take();

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            if let Some(rx) = catalog_rx.as_mut() {
                let mut catalog_closed = false;
                tokio::select! {
                    maybe_event = event_rx.recv() => {
                        if !self.process_app_event(maybe_event) {
                            break;
                        }
                    }
                    maybe_snapshot = rx.recv() => {
                        match maybe_snapshot {
                            Some(snapshot) => self.apply_snapshot(snapshot),
                            None => catalog_closed = true,
                        }
                    }
                }
                if catalog_closed {
                    catalog_rx = None;
                }
            } else {
                let maybe_event = event_rx.recv().await;
                if !self.process_app_event(maybe_event) {
                    break;
                }
            }

            if self.state.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)
    }

    /// Start a background fetch; the result arrives through the catalog channel.
    ///
    /// Returns `None` when a fetch is already pending.
    fn request_catalog(&mut self) -> Option<JoinHandle<()>> {
        if self.state.loading {
            self.state
                .set_status("Catalog is already loading".to_string());
            return None;
        }
        self.state.loading = true;
        self.state.set_status(format!(
            "Loading catalog from {}",
            self.client.endpoint()
        ));

        let client = self.client.clone();
        let sender = self.catalog_tx.clone();
        Some(tokio::spawn(async move {
            let snapshot = client.fetch_or_empty().await;
            if sender.send(snapshot).await.is_err() {
                debug!("catalog view closed before fetch completed");
            }
        }))
    }

    fn apply_snapshot(&mut self, snapshot: CatalogSnapshot) {
        self.state.loading = false;
        let fetched_at = snapshot.fetched_at;
        self.catalog.replace(snapshot);
        let groups = self.catalog.groups();
        info!(
            cars = self.catalog.len(),
            models = groups.len(),
            groupings = self.catalog.recomputations(),
            "catalog applied"
        );
        let models = groups.len();
        self.state.set_groups(groups);

        let status = match fetched_at {
            Some(at) if !self.catalog.is_empty() => format!(
                "Loaded {} cars in {} models at {}",
                self.catalog.len(),
                models,
                at.with_timezone(&Local).format("%H:%M:%S")
            ),
            _ => "No cars available".to_string(),
        };
        self.state.set_status(status);
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(Event::Key(key))) => {
                self.handle_key(key);
                true
            }
            Some(AppEvent::Input(_)) | Some(AppEvent::Tick) => true,
            None => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.view.mode() {
            ViewMode::Catalog => self.handle_catalog_key(key),
            ViewMode::Comparison => self.handle_comparison_key(key),
        }
    }

    fn handle_catalog_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc if key.modifiers.is_empty() => {
                self.state.should_quit = true
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_cursor(-1),
            KeyCode::Char('g') if key.modifiers.is_empty() => self.state.move_to(0),
            KeyCode::Char('G') => self.state.move_to_end(),
            KeyCode::Home => self.state.move_to(0),
            KeyCode::End => self.state.move_to_end(),
            KeyCode::PageDown => self.state.page_down(),
            KeyCode::PageUp => self.state.page_up(),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_current(),
            KeyCode::Char('c') if key.modifiers.is_empty() => self.open_comparison(),
            KeyCode::Char('x') if key.modifiers.is_empty() => {
                if self.view.clear() {
                    self.state.set_status("Selection cleared".to_string());
                }
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let _ = self.request_catalog();
            }
            _ => {}
        }
    }

    fn handle_comparison_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.state.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                self.view.leave_comparison();
                self.state.column_offset = 0;
                self.state.set_status(format!(
                    "Back to catalog; {} cars still selected",
                    self.view.selection().len()
                ));
            }
            KeyCode::Char('l') | KeyCode::Right => {
                let max = self.view.compared().len().saturating_sub(1);
                self.state.column_offset = (self.state.column_offset + 1).min(max);
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.state.column_offset = self.state.column_offset.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn toggle_current(&mut self) {
        let Some(car) = self.state.current_car().cloned() else {
            self.state.set_status("No car under the cursor".to_string());
            return;
        };
        if let Some(selected) = self.view.toggle(&car) {
            let verb = if selected { "Selected" } else { "Removed" };
            self.state.set_status(format!(
                "{verb} {} ({} selected)",
                car.display_name(),
                self.view.selection().len()
            ));
        }
    }

    fn open_comparison(&mut self) {
        if self.view.enter_comparison() {
            self.state.column_offset = 0;
            self.state
                .set_status(format!("Comparing {} cars", self.view.compared().len()));
        } else {
            self.state.set_status(format!(
                "Select at least {MIN_COMPARISON_SIZE} cars to compare ({} selected)",
                self.view.selection().len()
            ));
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        match self.view.comparison() {
            Some(table) => self.draw_comparison(frame, &table),
            None => self.draw_catalog(frame),
        }
    }

    fn draw_catalog(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(4)])
            .split(size);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[0]);
        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(body[1]);

        self.render_catalog_list(frame, body[0]);
        self.render_car_details(frame, side[0]);
        self.render_selection(frame, side[1]);
        self.render_status(frame, chunks[1]);
    }

    fn render_catalog_list(&mut self, frame: &mut Frame, area: Rect) {
        self.state.list_height = area.height.saturating_sub(2) as usize;

        let mut items = Vec::new();
        for group in self.state.groups.iter() {
            items.push(ListItem::new(Line::from(vec![
                Span::styled(
                    group.model_name.clone(),
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({} editions)", group.editions.len()),
                    Style::default().fg(self.theme.muted),
                ),
            ])));
            for car in &group.editions {
                let selected = self.view.is_selected(car);
                let marker = if selected {
                    Span::styled(
                        "  [x] ",
                        Style::default()
                            .fg(self.theme.success)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw("  [ ] ")
                };
                let label = Span::styled(
                    edition_label(car),
                    Style::default().fg(self.theme.primary_fg),
                );
                let id = Span::styled(
                    format!("  #{}", car.id),
                    Style::default().fg(self.theme.muted),
                );
                items.push(ListItem::new(Line::from(vec![marker, label, id])));
            }
        }

        let highlighted = self.state.display_index();
        self.state.list_state.select(highlighted);

        let title = if self.state.loading {
            "Catalog (loading…)".to_string()
        } else {
            format!(
                "Catalog · {} cars · {} models",
                self.state.entries.len(),
                self.state.groups.len()
            )
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(self.theme.selection_bg))
            .highlight_symbol("▶");
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }

    fn render_car_details(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Car Details");
        let Some(car) = self.state.current_car() else {
            let message = if self.state.loading {
                "Waiting for the catalog…"
            } else {
                "No cars available"
            };
            frame.render_widget(Paragraph::new(message).block(block), area);
            return;
        };

        let mut lines = vec![Line::from(Span::styled(
            car.display_name(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        lines.push(Line::from(format!("Id: {}", car.id)));
        lines.push(Line::from(format!("Maker: {}", car.maker)));
        lines.push(Line::from(format!("Model: {}", car.model)));
        if let Some(edition) = &car.edition {
            lines.push(Line::from(format!("Edition: {edition}")));
        }
        for (key, value) in &car.details {
            lines.push(Line::from(vec![
                Span::styled(format!("{key}: "), Style::default().fg(self.theme.muted)),
                Span::raw(format_detail(value)),
            ]));
        }

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_selection(&self, frame: &mut Frame, area: Rect) {
        let selection = self.view.selection();
        let title = format!("Selected ({})", selection.len());
        let mut lines: Vec<Line> = selection
            .iter()
            .enumerate()
            .map(|(idx, car)| Line::from(format!("{}. {}", idx + 1, car.display_name())))
            .collect();
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "Press space to pick cars",
                Style::default().fg(self.theme.muted),
            )));
        } else if self.view.can_compare() {
            lines.push(Line::from(Span::styled(
                "Press c to compare",
                Style::default()
                    .fg(self.theme.success)
                    .add_modifier(Modifier::BOLD),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                format!("Pick at least {MIN_COMPARISON_SIZE} cars to compare"),
                Style::default().fg(self.theme.warning),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_comparison(&mut self, frame: &mut Frame, table: &ComparisonTable) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(4)])
            .split(size);

        let area = chunks[0];
        let fit = (area.width.saturating_sub(LABEL_COLUMN_WIDTH + 2) / CAR_COLUMN_WIDTH).max(1);
        let start = self.state.column_offset.min(table.width().saturating_sub(1));
        let end = (start + fit as usize).min(table.width());

        let mut header_cells = vec![Cell::from("")];
        header_cells.extend(table.headers[start..end].iter().map(|title| {
            Cell::from(title.clone()).style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
        }));
        let header = Row::new(header_cells).bottom_margin(1);

        let rows: Vec<Row> = table
            .rows
            .iter()
            .map(|row| {
                let style = if row.is_uniform() {
                    Style::default().fg(self.theme.muted)
                } else {
                    Style::default().fg(self.theme.primary_fg)
                };
                let mut cells = vec![Cell::from(row.label.clone())
                    .style(Style::default().add_modifier(Modifier::BOLD))];
                cells.extend(
                    row.values[start..end]
                        .iter()
                        .map(|value| Cell::from(value.clone()).style(style)),
                );
                Row::new(cells)
            })
            .collect();

        let mut widths = vec![Constraint::Length(LABEL_COLUMN_WIDTH)];
        widths.extend((start..end).map(|_| Constraint::Length(CAR_COLUMN_WIDTH)));

        let title = if end - start < table.width() {
            format!(
                "Comparison · cars {}-{} of {}",
                start + 1,
                end,
                table.width()
            )
        } else {
            format!("Comparison · {} cars", table.width())
        };
        let widget = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(widget, area);
        self.render_status(frame, chunks[1]);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let hints = match self.view.mode() {
            ViewMode::Catalog => format!(
                "space select · c compare ({}/{MIN_COMPARISON_SIZE}) · x clear · ^R reload · q quit",
                self.view.selection().len()
            ),
            ViewMode::Comparison => "esc back · h/l scroll · q quit".to_string(),
        };
        let paragraph = Paragraph::new(vec![
            Line::from(self.state.status.clone()),
            Line::from(Span::styled(hints, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn edition_label(car: &CarRecord) -> String {
    match car.edition.as_deref() {
        Some(edition) if !edition.is_empty() => edition.to_string(),
        _ => "Standard".to_string(),
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct Entry {
    group: usize,
    car: CarRecord,
}

struct UiState {
    groups: Arc<Vec<CarGroup>>,
    entries: Vec<Entry>,
    cursor: usize,
    list_state: ListState,
    list_height: usize,
    column_offset: usize,
    status: String,
    loading: bool,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            groups: Arc::new(Vec::new()),
            entries: Vec::new(),
            cursor: 0,
            list_state: ListState::default(),
            list_height: 1,
            column_offset: 0,
            status: "Ready".to_string(),
            loading: false,
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_groups(&mut self, groups: Arc<Vec<CarGroup>>) {
        let previous = self.current_car().map(|car| car.id.clone());
        self.entries = groups
            .iter()
            .enumerate()
            .flat_map(|(group, g)| {
                g.editions.iter().map(move |car| Entry {
                    group,
                    car: car.clone(),
                })
            })
            .collect();
        self.groups = groups;

        self.cursor = previous
            .and_then(|id| self.entries.iter().position(|entry| entry.car.id == id))
            .unwrap_or(0);
        self.clamp_cursor();
    }

    fn current_car(&self) -> Option<&CarRecord> {
        self.entries.get(self.cursor).map(|entry| &entry.car)
    }

    /// Row of the cursor in the rendered list, which interleaves group headers.
    fn display_index(&self) -> Option<usize> {
        self.entries
            .get(self.cursor)
            .map(|entry| self.cursor + entry.group + 1)
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.entries.is_empty() {
            return;
        }
        let len = self.entries.len() as isize;
        let idx = (self.cursor as isize + delta).clamp(0, len - 1);
        self.cursor = idx as usize;
    }

    fn move_to(&mut self, index: usize) {
        if self.entries.is_empty() {
            return;
        }
        self.cursor = index.min(self.entries.len() - 1);
    }

    fn move_to_end(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.cursor = self.entries.len() - 1;
    }

    fn page_down(&mut self) {
        if self.entries.is_empty() || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(self.entries.len());
        self.move_cursor(delta as isize);
    }

    fn page_up(&mut self) {
        if self.entries.is_empty() || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(self.entries.len());
        self.move_cursor(-(delta as isize));
    }

    fn clamp_cursor(&mut self) {
        if self.entries.is_empty() {
            self.cursor = 0;
        } else if self.cursor >= self.entries.len() {
            self.cursor = self.entries.len() - 1;
        }
    }

    fn set_status(&mut self, message: String) {
        self.status = message;
    }
}

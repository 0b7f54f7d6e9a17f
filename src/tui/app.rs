//! Main application logic for the terminal user interface.
//!
//! `App` renders the single task screen (header, add prompt, filter tabs,
//! task table, status bar) and turns key presses into `Session` calls. It
//! never touches storage directly.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};

use crate::filter::{counts, select, FilterMode};
use crate::session::{Session, SessionSnapshot};
use crate::tui::{
    colors::Theme,
    enums::{AppState, InputMode},
    input::InputField,
    utils::centered_rect,
};

/// TUI state layered over a borrowed `Session`.
pub struct App<'a> {
    session: &'a mut Session,
    state: AppState,
    input_mode: InputMode,
    input: InputField,
    table_state: TableState,
    status_message: String,
    pending_delete: Option<String>,
}

impl<'a> App<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        let mut app = App {
            session,
            state: AppState::TaskList,
            input_mode: InputMode::None,
            input: InputField::new(),
            table_state: TableState::default(),
            status_message: String::new(),
            pending_delete: None,
        };
        app.clamp_selection();
        app
    }

    /// Id of the highlighted task in the filtered view.
    fn selected_id(&self) -> Option<String> {
        let idx = self.table_state.selected()?;
        self.session.visible_tasks().get(idx).map(|t| t.id.clone())
    }

    /// Keep the selection inside the filtered list after it changes.
    fn clamp_selection(&mut self) {
        let len = self.session.visible_tasks().len();
        let selected = match (len, self.table_state.selected()) {
            (0, _) => None,
            (_, None) => Some(0),
            (len, Some(i)) => Some(i.min(len - 1)),
        };
        self.table_state.select(selected);
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.session.visible_tasks().len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(len - 1)
        } else {
            current.saturating_sub(1)
        };
        self.table_state.select(Some(next));
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn set_filter(&mut self, mode: FilterMode) {
        self.session.set_filter(mode);
        self.table_state.select(None);
        self.clamp_selection();
        self.set_status_message(format!("Showing {} tasks", mode.label()));
    }

    /// Add the prompt's text as a task. Returns false for a blank title.
    fn submit_new_task(&mut self) -> bool {
        let title = self.input.take();
        let added = match self.session.add_task(&title) {
            Some(_) => {
                // New tasks are pending; jump to the end of views that show them.
                let len = self.session.visible_tasks().len();
                if self.session.filter() != FilterMode::Completed && len > 0 {
                    self.table_state.select(Some(len - 1));
                }
                self.set_status_message("Task added");
                true
            }
            None => {
                self.set_status_message("Title is required");
                false
            }
        };
        self.clamp_selection();
        added
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            self.set_status_message("No task selected");
            return;
        };
        if let Some(completed) = self.session.toggle_task(&id) {
            self.set_status_message(if completed {
                "Marked completed"
            } else {
                "Marked pending"
            });
        }
        self.clamp_selection();
    }

    fn confirm_delete(&mut self) {
        if let Some(id) = self.pending_delete.take() {
            if let Some(task) = self.session.delete_task(&id) {
                self.set_status_message(format!("Deleted '{}'", task.title));
            }
        }
        self.clamp_selection();
    }

    /// Handle keys on the main list. Returns true if the app should quit.
    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('x') => self.toggle_selected(),
            KeyCode::Char('a') | KeyCode::Char('i') => {
                self.state = AppState::AddTask;
                self.input_mode = InputMode::Text;
                self.set_status_message("Type a title, Enter to add, Esc to cancel");
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.pending_delete = Some(id);
                    self.state = AppState::Confirm;
                } else {
                    self.set_status_message("No task selected");
                }
            }
            KeyCode::Tab | KeyCode::Right => self.set_filter(self.session.filter().next()),
            KeyCode::BackTab | KeyCode::Left => self.set_filter(self.session.filter().prev()),
            KeyCode::Char('1') => self.set_filter(FilterMode::All),
            KeyCode::Char('2') => self.set_filter(FilterMode::Completed),
            KeyCode::Char('3') => self.set_filter(FilterMode::Pending),
            KeyCode::Char('m') => {
                let dark = self.session.toggle_dark_mode();
                self.set_status_message(if dark { "Dark mode on" } else { "Dark mode off" });
            }
            KeyCode::Char('h') | KeyCode::Char('?') | KeyCode::F(1) => {
                self.state = AppState::Help;
            }
            _ => {}
        }
        false
    }

    fn handle_add_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.input.clear();
                self.state = AppState::TaskList;
                self.input_mode = InputMode::None;
            }
            KeyCode::Enter => {
                if self.submit_new_task() {
                    self.state = AppState::TaskList;
                    self.input_mode = InputMode::None;
                }
            }
            KeyCode::Backspace => self.input.handle_backspace(),
            KeyCode::Delete => self.input.handle_delete(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Home => self.input.move_cursor_home(),
            KeyCode::End => self.input.move_cursor_end(),
            KeyCode::Char(c) => self.input.handle_char(c),
            _ => {}
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_delete = None;
                self.set_status_message("Delete cancelled");
            }
            _ => return,
        }
        self.state = AppState::TaskList;
    }

    /// Dispatch one key press. Returns true if the app should quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        self.status_message.clear();
        match self.state {
            AppState::TaskList => return self.handle_task_list_input(key, modifiers),
            AppState::AddTask => self.handle_add_input(key),
            AppState::Confirm => self.handle_confirm_input(key),
            AppState::Help => self.state = AppState::TaskList,
        }
        false
    }

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key.code, key.modifiers));
                }
            }
        }
        Ok(false)
    }

    fn render_header(&self, f: &mut Frame, area: Rect, snap: &SessionSnapshot, theme: &Theme) {
        let switch = if snap.dark_mode {
            Span::styled(" Dark ● ", Style::default().fg(theme.surface).bg(theme.accent))
        } else {
            Span::styled(" ○ Light ", Style::default().fg(theme.text).bg(theme.border))
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                "Task Manager",
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            switch,
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .style(Style::default().bg(theme.background))
        .alignment(Alignment::Left);
        f.render_widget(header, area);
    }

    fn render_input(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let editing = self.input_mode == InputMode::Text;
        let line = if self.input.value.is_empty() && !editing {
            Line::from(Span::styled(
                "Add a new task (press 'a')",
                Style::default().fg(theme.muted),
            ))
        } else {
            Line::from(Span::styled(
                self.input.value.as_str(),
                Style::default().fg(theme.text),
            ))
        };
        let border = if editing { theme.accent } else { theme.border };
        let input = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Add")
                .border_style(Style::default().fg(border))
                .style(Style::default().bg(theme.surface)),
        );
        f.render_widget(input, area);

        if editing {
            let prefix: String = self.input.value.chars().take(self.input.cursor).collect();
            let x = area.x + 1 + Line::from(prefix).width() as u16;
            f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
        }
    }

    fn render_filters(&self, f: &mut Frame, area: Rect, snap: &SessionSnapshot, theme: &Theme) {
        let titles: Vec<Line> = FilterMode::ALL.iter().map(|m| Line::from(m.label())).collect();
        let selected = FilterMode::ALL
            .iter()
            .position(|m| *m == snap.filter)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(selected)
            .style(Style::default().fg(theme.muted).bg(theme.background))
            .highlight_style(
                Style::default()
                    .fg(ratatui::style::Color::White)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .divider(" ");
        f.render_widget(tabs, area);
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect, snap: &SessionSnapshot, theme: &Theme) {
        let visible = select(&snap.tasks, snap.filter);
        let rows: Vec<Row> = visible
            .iter()
            .map(|t| {
                let (marker, marker_style) = if t.completed {
                    ("(●)", Style::default().fg(theme.accent))
                } else {
                    ("( )", Style::default().fg(theme.accent))
                };
                let title_style = if t.completed {
                    Style::default()
                        .fg(theme.muted)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(theme.text)
                };
                Row::new(vec![
                    Cell::from(Span::styled(marker, marker_style)),
                    Cell::from(Span::styled(t.title.clone(), title_style)),
                ])
            })
            .collect();
        let empty = rows.is_empty();

        let title = format!("{} tasks ({})", snap.filter.label(), visible.len());
        let table = Table::new(rows, [Constraint::Length(4), Constraint::Min(10)])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(theme.border))
                    .style(Style::default().bg(theme.surface)),
            )
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        f.render_stateful_widget(table, area, &mut self.table_state);

        if empty {
            let hint = Paragraph::new(Span::styled("No tasks", Style::default().fg(theme.muted)))
                .alignment(Alignment::Center);
            let inner = Rect {
                x: area.x + 1,
                y: area.y + area.height / 2,
                width: area.width.saturating_sub(2),
                height: 1,
            };
            f.render_widget(hint, inner);
        }
    }

    fn render_help(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(Span::styled("Task Manager Help", bold)),
            Line::from(""),
            Line::from("  ↑/↓, k/j          Move selection"),
            Line::from("  Enter/Space/x     Toggle completed"),
            Line::from("  a, i              Add a new task"),
            Line::from("  d, Del            Delete selected task"),
            Line::from("  Tab/→, Shift+Tab/← Cycle filter"),
            Line::from("  1 / 2 / 3         All / Completed / Pending"),
            Line::from("  m                 Toggle dark mode"),
            Line::from("  h, ?, F1          Show this help"),
            Line::from("  q, Esc, Ctrl+C    Quit"),
        ];
        let area = centered_rect(60, 60, area);
        f.render_widget(Clear, area);
        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return")
                    .style(Style::default().fg(theme.text).bg(theme.surface)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_confirm(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let title = self
            .pending_delete
            .as_deref()
            .and_then(|id| self.session.tasks().iter().find(|t| t.id == id))
            .map(|t| t.title.as_str())
            .unwrap_or("");
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Delete this task?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(title),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);
        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .title("Confirm Delete")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(ratatui::style::Color::White).bg(theme.danger)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect, snap: &SessionSnapshot, theme: &Theme) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            let c = counts(&snap.tasks);
            format!(
                "{} tasks | {} pending | {} completed | Press 'h' for help",
                c.total, c.pending, c.completed
            )
        };
        let status = Paragraph::new(text)
            .style(Style::default().bg(theme.accent).fg(ratatui::style::Color::White));
        f.render_widget(status, area);
    }

    fn render(&mut self, f: &mut Frame) {
        let snap = self.session.snapshot();
        let theme = Theme::for_mode(snap.dark_mode);
        f.render_widget(
            Block::default().style(Style::default().bg(theme.background)),
            f.area(),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Add prompt
                Constraint::Length(1), // Filter tabs
                Constraint::Min(0),    // Tasks
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0], &snap, &theme);
        self.render_input(f, chunks[1], &theme);
        self.render_filters(f, chunks[2], &snap, &theme);
        self.render_task_list(f, chunks[3], &snap, &theme);

        match self.state {
            AppState::Help => self.render_help(f, chunks[3], &theme),
            AppState::Confirm => self.render_confirm(f, chunks[3], &theme),
            AppState::TaskList | AppState::AddTask => {}
        }

        self.render_status_bar(f, chunks[4], &snap, &theme);
    }

    /// Main event loop. Returns when the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

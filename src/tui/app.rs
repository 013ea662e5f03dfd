use crate::controller::{SearchController, SearchStatus};
use crate::tui::search::SearchState;
use crate::tui::table::TableState;
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

pub struct App {
    pub controller: SearchController,

    // Sub-states
    pub search: SearchState,
    pub table: TableState,

    /// Shown in the title so the user knows which organizer is queried
    pub backend_label: String,

    // Quit flag
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: SearchController, backend_label: impl Into<String>) -> Self {
        Self {
            controller,
            search: SearchState::default(),
            table: TableState::default(),
            backend_label: backend_label.into(),
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> crate::Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout).unwrap_or(false) {
                if let Ok(Event::Key(key)) = event::read() {
                    self.handle_key(key);
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.tick();
                last_tick = Instant::now();
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Let the controller fire timers and apply responses
    pub fn tick(&mut self) {
        if self.controller.poll() && self.controller.results().status != SearchStatus::Loading {
            self.table.reset(self.controller.results().len());
        }
    }

    fn push_query(&mut self) {
        self.controller.set_query(self.search.query.clone());
        if self.controller.results().status == SearchStatus::Idle {
            self.table.reset(0);
        }
    }

    fn clear_query(&mut self) {
        self.search.clear();
        self.controller.clear();
        self.table.reset(0);
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.controller.refresh();
                return;
            }
            KeyCode::F(5) => {
                self.controller.refresh();
                return;
            }
            KeyCode::Esc => {
                if self.search.focused && !self.search.query.is_empty() {
                    self.clear_query();
                } else if self.search.focused {
                    self.search.focused = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            _ => {}
        }

        if self.search.focused {
            self.handle_search_key(key);
        } else {
            self.handle_table_key(key);
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.insert(c);
                self.push_query();
            }
            KeyCode::Backspace => {
                if self.search.backspace() {
                    self.push_query();
                }
            }
            KeyCode::Delete => {
                if self.search.delete() {
                    self.push_query();
                }
            }
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Home => self.search.home(),
            KeyCode::End => self.search.end(),
            KeyCode::Enter => {
                self.controller.flush();
                self.search.focused = false;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.search.focused = false;
            }
            _ => {}
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        let total = self.controller.results().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.table.select_prev(total),
            KeyCode::Down | KeyCode::Char('j') => self.table.select_next(total),
            KeyCode::PageUp => self.table.page_up(total),
            KeyCode::PageDown => self.table.page_down(total),
            KeyCode::Home => self.table.select_first(total),
            KeyCode::End => self.table.select_last(total),

            KeyCode::Tab | KeyCode::Char('/') => {
                self.search.focused = true;
            }

            // Any other printable char focuses search and types it
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.focused = true;
                self.search.end();
                self.search.insert(c);
                self.push_query();
            }

            _ => {}
        }
    }
}

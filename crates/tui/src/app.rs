use std::{cmp, io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::info;

use railway_core::{
    AppConfig, BookingRequest, Division, Passenger, RailwaySession, TrainRecord, TrainRecordDraft,
};

const MAX_FIELD_LEN: usize = 64;
// Passenger rows follow the seat-count field; the cap keeps a mistyped
// count from allocating an absurd form.
const MAX_PASSENGER_ROWS: usize = 1000;

const MENU_ITEMS: [&str; 5] = [
    "View Train Schedule",
    "Admin Panel",
    "Book Ticket",
    "Booking History",
    "Quit",
];

const INSERT_LABELS: [&str; 8] = [
    "Train Number",
    "Name",
    "Source",
    "Destination",
    "Start Time (HH:MM)",
    "Reach Time (HH:MM)",
    "Total Seats",
    "Balance",
];

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Menu,
    Schedule,
    Admin,
    Booking,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusTone {
    Info,
    Success,
    Error,
}

#[derive(Debug)]
enum AppEvent {
    Input(Event),
    Tick,
}

/// Single-line editable text field with an insertion cursor.
#[derive(Debug, Clone, Default)]
struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    fn insert(&mut self, ch: char) {
        if self.value.len() >= MAX_FIELD_LEN {
            return;
        }
        if ch.is_ascii() && !ch.is_ascii_control() {
            self.value.insert(self.cursor, ch);
            self.cursor += ch.len_utf8();
        }
    }

    fn backspace(&mut self) {
        if self.cursor > 0 && self.cursor <= self.value.len() {
            self.cursor -= 1;
            self.value.remove(self.cursor);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.value.len() as isize;
        let mut next = self.cursor as isize + delta;
        if next < 0 {
            next = 0;
        } else if next > len {
            next = len;
        }
        self.cursor = next as usize;
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.value.len();
    }

    fn text(&self) -> &str {
        &self.value
    }

    fn cursor(&self) -> usize {
        self.cursor
    }
}

/// Cursor and viewport state for a scrollable row list.
#[derive(Debug, Clone, Default)]
struct TableScroll {
    cursor: usize,
    offset: usize,
    height: usize,
}

impl TableScroll {
    fn move_cursor(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            self.offset = 0;
            return;
        }
        let max = len as isize - 1;
        let mut idx = self.cursor as isize + delta;
        if idx < 0 {
            idx = 0;
        } else if idx > max {
            idx = max;
        }
        self.cursor = idx as usize;
        self.ensure_visible(len);
    }

    fn move_to(&mut self, index: usize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            self.offset = 0;
            return;
        }
        self.cursor = index.min(len - 1);
        self.ensure_visible(len);
    }

    fn page_down(&mut self, len: usize) {
        if len == 0 || self.height == 0 {
            return;
        }
        self.move_cursor(self.height.min(len) as isize, len);
    }

    fn page_up(&mut self, len: usize) {
        if len == 0 || self.height == 0 {
            return;
        }
        self.move_cursor(-(self.height.min(len) as isize), len);
    }

    fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    fn ensure_visible(&mut self, len: usize) {
        if len == 0 || self.height == 0 {
            self.offset = 0;
            return;
        }
        let height = self.height;
        let max_offset = len.saturating_sub(height);

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }

        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ScheduleFocus {
    #[default]
    Source,
    Destination,
    Table,
}

/// Schedule browser: two filter inputs over a snapshot of the catalog.
#[derive(Debug, Default)]
struct ScheduleScreen {
    source: TextField,
    destination: TextField,
    focus: ScheduleFocus,
    rows: Vec<TrainRecord>,
    scroll: TableScroll,
}

impl ScheduleScreen {
    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            ScheduleFocus::Source => ScheduleFocus::Destination,
            ScheduleFocus::Destination => ScheduleFocus::Table,
            ScheduleFocus::Table => ScheduleFocus::Source,
        };
    }
}

/// Modal insert form: one free-text field per catalog column.
#[derive(Debug, Default)]
struct InsertForm {
    fields: [TextField; 8],
    focus: usize,
}

impl InsertForm {
    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    fn draft(&self) -> TrainRecordDraft {
        TrainRecordDraft {
            number: self.fields[0].text().to_string(),
            name: self.fields[1].text().to_string(),
            source: self.fields[2].text().to_string(),
            destination: self.fields[3].text().to_string(),
            start_time: self.fields[4].text().to_string(),
            reach_time: self.fields[5].text().to_string(),
            total_seats: self.fields[6].text().to_string(),
            balance: self.fields[7].text().to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct AdminScreen {
    scroll: TableScroll,
    form: Option<InsertForm>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BookingFocus {
    Source,
    Destination,
    Seats,
    Division,
    PassengerName(usize),
    PassengerAge(usize),
    Submit,
}

#[derive(Debug, Clone, Default)]
struct PassengerEntry {
    name: TextField,
    age: TextField,
}

/// Booking form with passenger rows derived from the seat count.
#[derive(Debug)]
struct BookingScreen {
    source: TextField,
    destination: TextField,
    seats: TextField,
    division_index: usize,
    passengers: Vec<PassengerEntry>,
    focus: BookingFocus,
    scroll: TableScroll,
}

impl Default for BookingScreen {
    fn default() -> Self {
        Self {
            source: TextField::default(),
            destination: TextField::default(),
            seats: TextField::default(),
            division_index: 0,
            passengers: Vec::new(),
            focus: BookingFocus::Source,
            scroll: TableScroll::default(),
        }
    }
}

impl BookingScreen {
    fn division(&self) -> Division {
        Division::ALL[self.division_index]
    }

    fn cycle_division(&mut self, delta: isize) {
        let len = Division::ALL.len() as isize;
        self.division_index = (self.division_index as isize + delta).rem_euclid(len) as usize;
    }

    /// Re-derive the passenger rows from the seat-count field.
    ///
    /// Typed prefixes survive a resize; an unparseable count collapses
    /// the form to zero rows, matching the original dialog.
    fn sync_passenger_rows(&mut self) {
        let count = self.seats.text().trim().parse::<usize>().unwrap_or(0);
        let count = count.min(MAX_PASSENGER_ROWS);
        if count < self.passengers.len() {
            self.passengers.truncate(count);
        } else {
            self.passengers.resize_with(count, PassengerEntry::default);
        }
        if let BookingFocus::PassengerName(idx) | BookingFocus::PassengerAge(idx) = self.focus {
            if idx >= self.passengers.len() {
                self.focus = BookingFocus::Seats;
            }
        }
    }

    fn focus_order(&self) -> Vec<BookingFocus> {
        let mut order = vec![
            BookingFocus::Source,
            BookingFocus::Destination,
            BookingFocus::Seats,
            BookingFocus::Division,
        ];
        for idx in 0..self.passengers.len() {
            order.push(BookingFocus::PassengerName(idx));
            order.push(BookingFocus::PassengerAge(idx));
        }
        order.push(BookingFocus::Submit);
        order
    }

    fn focus_next(&mut self) {
        let order = self.focus_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(pos + 1) % order.len()];
    }

    fn focus_prev(&mut self) {
        let order = self.focus_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(pos + order.len() - 1) % order.len()];
    }

    fn focused_field_mut(&mut self) -> Option<&mut TextField> {
        match self.focus {
            BookingFocus::Source => Some(&mut self.source),
            BookingFocus::Destination => Some(&mut self.destination),
            BookingFocus::Seats => Some(&mut self.seats),
            BookingFocus::PassengerName(idx) => {
                self.passengers.get_mut(idx).map(|entry| &mut entry.name)
            }
            BookingFocus::PassengerAge(idx) => {
                self.passengers.get_mut(idx).map(|entry| &mut entry.age)
            }
            BookingFocus::Division | BookingFocus::Submit => None,
        }
    }
}

/// High-level application state for the railway TUI.
pub struct RailwayApp {
    session: RailwaySession,
    screen: Screen,
    theme: Theme,
    status: String,
    status_tone: StatusTone,
    should_quit: bool,
    menu_cursor: usize,
    tick_rate: Duration,
    schedule: ScheduleScreen,
    admin: AdminScreen,
    booking: BookingScreen,
    history_offset: usize,
}

impl RailwayApp {
    pub fn new(session: RailwaySession, config: &AppConfig) -> Self {
        Self {
            session,
            screen: Screen::Menu,
            theme: Theme::default(),
            status: "Ready".to_string(),
            status_tone: StatusTone::Info,
            should_quit: false,
            menu_cursor: 0,
            tick_rate: Duration::from_millis(config.tick_rate_ms.max(50)),
            schedule: ScheduleScreen::default(),
            admin: AdminScreen::default(),
            booking: BookingScreen::default(),
            history_offset: 0,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.refresh_schedule_rows();
        self.set_status(
            StatusTone::Info,
            format!("Loaded {} trains", self.session.catalog().len()),
        );
        info!(trains = self.session.catalog().len(), "ui started");

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx, self.tick_rate);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }

            match event_rx.recv().await {
                Some(AppEvent::Input(event)) => {
                    if let Err(err) = self.handle_input(event) {
                        self.set_status(StatusTone::Error, format!("Error: {err}"));
                    }
                }
                Some(AppEvent::Tick) => {}
                None => break,
            }

            if self.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn set_status(&mut self, tone: StatusTone, message: impl Into<String>) {
        self.status = message.into();
        self.status_tone = tone;
    }

    fn back_to_menu(&mut self) {
        self.screen = Screen::Menu;
        self.set_status(StatusTone::Info, "Ready");
    }

    fn refresh_schedule_rows(&mut self) {
        let rows: Vec<TrainRecord> = self
            .session
            .catalog()
            .filter(self.schedule.source.text(), self.schedule.destination.text())
            .into_iter()
            .cloned()
            .collect();
        self.schedule.rows = rows;
        let len = self.schedule.rows.len();
        self.schedule.scroll.clamp(len);
    }

    // ---- input handling ----------------------------------------------------

    fn handle_input(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key(key),
            _ => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }
        match self.screen {
            Screen::Menu => self.handle_menu_key(key),
            Screen::Schedule => self.handle_schedule_key(key),
            Screen::Admin => self.handle_admin_key(key),
            Screen::Booking => self.handle_booking_key(key),
            Screen::History => self.handle_history_key(key),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_menu_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_menu_cursor(-1),
            KeyCode::Enter => self.open_menu_selection(),
            _ => {}
        }
        Ok(())
    }

    fn move_menu_cursor(&mut self, delta: isize) {
        let options = MENU_ITEMS.len() as isize;
        let mut idx = self.menu_cursor as isize + delta;
        if idx < 0 {
            idx = 0;
        } else if idx >= options {
            idx = options - 1;
        }
        self.menu_cursor = idx as usize;
    }

    fn open_menu_selection(&mut self) {
        match self.menu_cursor {
            0 => {
                self.refresh_schedule_rows();
                self.screen = Screen::Schedule;
                self.set_status(
                    StatusTone::Info,
                    "Type to search · Tab cycles focus · Esc returns",
                );
            }
            1 => {
                self.screen = Screen::Admin;
                self.set_status(StatusTone::Info, "i insert · d delete · Esc returns");
            }
            2 => {
                self.booking = BookingScreen::default();
                self.screen = Screen::Booking;
                self.set_status(StatusTone::Info, "Fill in the journey, then Book Ticket");
            }
            3 => {
                self.history_offset = 0;
                self.screen = Screen::History;
                self.set_status(
                    StatusTone::Info,
                    format!("{} bookings recorded", self.session.ledger().len()),
                );
            }
            _ => self.should_quit = true,
        }
    }

    fn handle_schedule_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.schedule.focus == ScheduleFocus::Table {
            return self.handle_schedule_table_key(key);
        }
        match key.code {
            KeyCode::Esc => self.back_to_menu(),
            KeyCode::Tab => self.schedule.cycle_focus(),
            KeyCode::Enter => {
                self.schedule.focus = ScheduleFocus::Table;
                self.set_status(
                    StatusTone::Info,
                    format!("{} trains match", self.schedule.rows.len()),
                );
            }
            KeyCode::Backspace => self.edit_schedule_field(|field| field.backspace()),
            KeyCode::Delete => self.edit_schedule_field(|field| field.delete()),
            KeyCode::Left => {
                if let Some(field) = self.schedule_focused_field_mut() {
                    field.move_cursor(-1);
                }
            }
            KeyCode::Right => {
                if let Some(field) = self.schedule_focused_field_mut() {
                    field.move_cursor(1);
                }
            }
            KeyCode::Home => {
                if let Some(field) = self.schedule_focused_field_mut() {
                    field.move_home();
                }
            }
            KeyCode::End => {
                if let Some(field) = self.schedule_focused_field_mut() {
                    field.move_end();
                }
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.edit_schedule_field(|field| field.insert(c));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn schedule_focused_field_mut(&mut self) -> Option<&mut TextField> {
        match self.schedule.focus {
            ScheduleFocus::Source => Some(&mut self.schedule.source),
            ScheduleFocus::Destination => Some(&mut self.schedule.destination),
            ScheduleFocus::Table => None,
        }
    }

    fn edit_schedule_field(&mut self, edit: impl FnOnce(&mut TextField)) {
        let Some(field) = self.schedule_focused_field_mut() else {
            return;
        };
        edit(field);
        self.refresh_schedule_rows();
        self.set_status(
            StatusTone::Info,
            format!("{} trains match", self.schedule.rows.len()),
        );
    }

    fn handle_schedule_table_key(&mut self, key: KeyEvent) -> Result<()> {
        let len = self.schedule.rows.len();
        match key.code {
            KeyCode::Esc => self.back_to_menu(),
            KeyCode::Tab | KeyCode::Char('/') => self.schedule.focus = ScheduleFocus::Source,
            KeyCode::Char('j') | KeyCode::Down => self.schedule.scroll.move_cursor(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.schedule.scroll.move_cursor(-1, len),
            KeyCode::Char('g') | KeyCode::Home => self.schedule.scroll.move_to(0, len),
            KeyCode::Char('G') | KeyCode::End => {
                self.schedule.scroll.move_to(len.saturating_sub(1), len)
            }
            KeyCode::PageDown => self.schedule.scroll.page_down(len),
            KeyCode::PageUp => self.schedule.scroll.page_up(len),
            _ => {}
        }
        Ok(())
    }

    fn handle_admin_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.admin.form.is_some() {
            return self.handle_insert_form_key(key);
        }
        let len = self.session.catalog().len();
        match key.code {
            KeyCode::Esc => self.back_to_menu(),
            KeyCode::Char('j') | KeyCode::Down => self.admin.scroll.move_cursor(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.admin.scroll.move_cursor(-1, len),
            KeyCode::Char('g') | KeyCode::Home => self.admin.scroll.move_to(0, len),
            KeyCode::Char('G') | KeyCode::End => {
                self.admin.scroll.move_to(len.saturating_sub(1), len)
            }
            KeyCode::PageDown => self.admin.scroll.page_down(len),
            KeyCode::PageUp => self.admin.scroll.page_up(len),
            KeyCode::Char('i') => {
                self.admin.form = Some(InsertForm::default());
                self.set_status(
                    StatusTone::Info,
                    "Insert: Enter advances · Ctrl+S saves · Esc cancels",
                );
            }
            KeyCode::Char('d') => self.delete_selected_train(),
            _ => {}
        }
        Ok(())
    }

    fn handle_insert_form_key(&mut self, key: KeyEvent) -> Result<()> {
        enum FormAction {
            None,
            Submit,
            Cancel,
        }

        let mut action = FormAction::None;
        if let Some(form) = self.admin.form.as_mut() {
            match key.code {
                KeyCode::Esc => action = FormAction::Cancel,
                KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    action = FormAction::Submit;
                }
                KeyCode::Tab | KeyCode::Down => form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
                KeyCode::Enter => {
                    if form.focus + 1 == form.fields.len() {
                        action = FormAction::Submit;
                    } else {
                        form.focus_next();
                    }
                }
                KeyCode::Backspace => form.fields[form.focus].backspace(),
                KeyCode::Delete => form.fields[form.focus].delete(),
                KeyCode::Left => form.fields[form.focus].move_cursor(-1),
                KeyCode::Right => form.fields[form.focus].move_cursor(1),
                KeyCode::Home => form.fields[form.focus].move_home(),
                KeyCode::End => form.fields[form.focus].move_end(),
                KeyCode::Char(c) => {
                    if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                        form.fields[form.focus].insert(c);
                    }
                }
                _ => {}
            }
        }

        match action {
            FormAction::Submit => self.submit_insert_form(),
            FormAction::Cancel => {
                self.admin.form = None;
                self.set_status(StatusTone::Info, "Insert cancelled");
            }
            FormAction::None => {}
        }
        Ok(())
    }

    fn submit_insert_form(&mut self) {
        let Some(form) = self.admin.form.as_ref() else {
            return;
        };
        let draft = form.draft();
        let outcome = self
            .session
            .catalog_mut()
            .insert(&draft)
            .map(|record| format!("Inserted train {} · {}", record.number, record.name));
        match outcome {
            Ok(message) => {
                self.admin.form = None;
                let len = self.session.catalog().len();
                self.admin.scroll.move_to(len.saturating_sub(1), len);
                self.refresh_schedule_rows();
                self.set_status(StatusTone::Success, message);
            }
            Err(err) => self.set_status(StatusTone::Error, err.to_string()),
        }
    }

    fn delete_selected_train(&mut self) {
        let Some(record) = self.session.catalog().list().get(self.admin.scroll.cursor) else {
            self.set_status(StatusTone::Info, "Select a train to delete");
            return;
        };
        let number = record.number;
        match self.session.catalog_mut().delete(number) {
            Ok(removed) => {
                let len = self.session.catalog().len();
                self.admin.scroll.clamp(len);
                self.refresh_schedule_rows();
                self.set_status(
                    StatusTone::Success,
                    format!("Deleted {removed} record(s) for train {number}"),
                );
            }
            Err(err) => self.set_status(StatusTone::Error, err.to_string()),
        }
    }

    fn handle_booking_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => self.back_to_menu(),
            KeyCode::Tab => self.booking.focus_next(),
            KeyCode::BackTab => self.booking.focus_prev(),
            KeyCode::Enter => match self.booking.focus {
                BookingFocus::Submit => self.submit_booking(),
                BookingFocus::Seats => {
                    self.booking.sync_passenger_rows();
                    self.booking.focus_next();
                }
                _ => self.booking.focus_next(),
            },
            KeyCode::Left => match self.booking.focus {
                BookingFocus::Division => self.booking.cycle_division(-1),
                _ => {
                    if let Some(field) = self.booking.focused_field_mut() {
                        field.move_cursor(-1);
                    }
                }
            },
            KeyCode::Right => match self.booking.focus {
                BookingFocus::Division => self.booking.cycle_division(1),
                _ => {
                    if let Some(field) = self.booking.focused_field_mut() {
                        field.move_cursor(1);
                    }
                }
            },
            KeyCode::Home => {
                if let Some(field) = self.booking.focused_field_mut() {
                    field.move_home();
                }
            }
            KeyCode::End => {
                if let Some(field) = self.booking.focused_field_mut() {
                    field.move_end();
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.booking.focused_field_mut() {
                    field.backspace();
                }
                if self.booking.focus == BookingFocus::Seats {
                    self.booking.sync_passenger_rows();
                }
            }
            KeyCode::Delete => {
                if let Some(field) = self.booking.focused_field_mut() {
                    field.delete();
                }
                if self.booking.focus == BookingFocus::Seats {
                    self.booking.sync_passenger_rows();
                }
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    match self.booking.focus {
                        BookingFocus::Division => {
                            if c == ' ' {
                                self.booking.cycle_division(1);
                            }
                        }
                        BookingFocus::Submit => {}
                        _ => {
                            if let Some(field) = self.booking.focused_field_mut() {
                                field.insert(c);
                            }
                            if self.booking.focus == BookingFocus::Seats {
                                self.booking.sync_passenger_rows();
                            }
                        }
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn submit_booking(&mut self) {
        let seats_text = self.booking.seats.text().trim().to_string();
        let seats = match seats_text.parse::<u32>() {
            Ok(value) => value,
            Err(_) => {
                self.set_status(
                    StatusTone::Error,
                    format!("invalid seats: '{seats_text}' is not a number"),
                );
                return;
            }
        };

        let passengers: Vec<Passenger> = self
            .booking
            .passengers
            .iter()
            .map(|entry| Passenger::new(entry.name.text().trim(), entry.age.text().trim()))
            .collect();
        let request = BookingRequest::new(seats, self.booking.division(), passengers);

        let source = self.booking.source.text().to_string();
        let destination = self.booking.destination.text().to_string();
        let outcome = self
            .session
            .book_route(&source, &destination, &request)
            .map(|record| {
                format!(
                    "Booking confirmed: {} seats {} to {}",
                    record.seats, record.source, record.destination
                )
            });
        match outcome {
            Ok(message) => {
                self.booking = BookingScreen::default();
                self.refresh_schedule_rows();
                self.screen = Screen::Menu;
                self.set_status(StatusTone::Success, message);
            }
            Err(err) => self.set_status(StatusTone::Error, err.to_string()),
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => self.back_to_menu(),
            KeyCode::Char('j') | KeyCode::Down => {
                self.history_offset = self.history_offset.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.history_offset = self.history_offset.saturating_sub(1);
            }
            KeyCode::PageDown => self.history_offset = self.history_offset.saturating_add(10),
            KeyCode::PageUp => self.history_offset = self.history_offset.saturating_sub(10),
            KeyCode::Char('g') | KeyCode::Home => self.history_offset = 0,
            _ => {}
        }
        Ok(())
    }

    // ---- rendering ---------------------------------------------------------

    fn draw(&mut self, frame: &mut Frame) {
        match self.screen {
            Screen::Menu => self.draw_menu(frame),
            Screen::Schedule => self.draw_schedule(frame),
            Screen::Admin => self.draw_admin(frame),
            Screen::Booking => self.draw_booking(frame),
            Screen::History => self.draw_history(frame),
        }
    }

    fn draw_menu(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(area);

        let heading = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "RAILWAY MANAGEMENT SYSTEM",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "browse · book · administer",
                Style::default().fg(self.theme.muted),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(heading, chunks[0]);

        let menu_height = (MENU_ITEMS.len() as u16 + 2).min(chunks[1].height.max(1));
        let menu_width = 32.min(chunks[1].width.max(1));
        let menu_area = centered_rect(menu_width, menu_height, chunks[1]);

        let menu_lines: Vec<Line> = MENU_ITEMS
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                if idx == self.menu_cursor {
                    Line::from(Span::styled(
                        format!("▶ {item}"),
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::styled(
                        format!("  {item}"),
                        Style::default().fg(self.theme.primary_fg),
                    ))
                }
            })
            .collect();

        let menu = Paragraph::new(menu_lines)
            .block(Block::default().borders(Borders::ALL).title("Menu"))
            .alignment(Alignment::Center);
        frame.render_widget(menu, menu_area);

        self.render_status(frame, chunks[2]);
    }

    fn draw_schedule(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(area);

        let inputs = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[0]);

        let len = self.schedule.rows.len();
        self.schedule.scroll.height = chunks[1].height.saturating_sub(3) as usize;
        self.schedule.scroll.clamp(len);
        self.schedule.scroll.ensure_visible(len);

        Self::render_query_input(
            &self.theme,
            frame,
            inputs[0],
            "Source",
            &self.schedule.source,
            self.schedule.focus == ScheduleFocus::Source,
        );
        Self::render_query_input(
            &self.theme,
            frame,
            inputs[1],
            "Destination",
            &self.schedule.destination,
            self.schedule.focus == ScheduleFocus::Destination,
        );

        let title = format!("Train Schedule ({len}) — / search · Tab cycle · Esc menu");
        Self::render_train_table(
            &self.theme,
            frame,
            chunks[1],
            &title,
            &self.schedule.rows,
            &self.schedule.scroll,
            self.schedule.focus == ScheduleFocus::Table,
        );
        self.render_status(frame, chunks[2]);
    }

    fn draw_admin(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(area);

        let len = self.session.catalog().len();
        self.admin.scroll.height = chunks[0].height.saturating_sub(3) as usize;
        self.admin.scroll.clamp(len);
        self.admin.scroll.ensure_visible(len);

        let title = format!("Admin Panel ({len} trains) — i insert · d delete · Esc menu");
        Self::render_train_table(
            &self.theme,
            frame,
            chunks[0],
            &title,
            self.session.catalog().list(),
            &self.admin.scroll,
            true,
        );
        self.render_status(frame, chunks[1]);

        if let Some(form) = &self.admin.form {
            Self::render_insert_form(&self.theme, frame, form);
        }
    }

    fn draw_booking(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(3)])
            .split(area);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(30)])
            .split(rows[0]);

        let focused_row = match self.booking.focus {
            BookingFocus::PassengerName(idx) | BookingFocus::PassengerAge(idx) => Some(idx),
            _ => None,
        };
        let len = self.booking.passengers.len();
        self.booking.scroll.height = body[1].height.saturating_sub(2) as usize;
        if let Some(idx) = focused_row {
            self.booking.scroll.move_to(idx, len);
        } else {
            self.booking.scroll.clamp(len);
            self.booking.scroll.ensure_visible(len);
        }

        self.render_booking_form(frame, body[0]);
        self.render_passenger_list(frame, body[1]);
        self.render_status(frame, rows[1]);
    }

    fn render_booking_form(&self, frame: &mut Frame, area: Rect) {
        let focus = self.booking.focus;
        let mut lines = vec![
            labeled_field_line(
                "Source",
                &self.booking.source,
                focus == BookingFocus::Source,
                &self.theme,
            ),
            labeled_field_line(
                "Destination",
                &self.booking.destination,
                focus == BookingFocus::Destination,
                &self.theme,
            ),
            labeled_field_line(
                "Seats",
                &self.booking.seats,
                focus == BookingFocus::Seats,
                &self.theme,
            ),
        ];

        let division_focused = focus == BookingFocus::Division;
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<12}", "Division"),
                field_label_style(division_focused, &self.theme),
            ),
            Span::styled(
                format!("◀ {} ▶", self.booking.division()),
                if division_focused {
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.primary_fg)
                },
            ),
        ]));

        lines.push(Line::from(""));
        let submit_focused = focus == BookingFocus::Submit;
        lines.push(Line::from(Span::styled(
            "[ Book Ticket ]",
            if submit_focused {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            },
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Tab next · Enter advance/submit",
            Style::default().fg(self.theme.muted),
        )));
        lines.push(Line::from(Span::styled(
            "←/→ division · Esc menu",
            Style::default().fg(self.theme.muted),
        )));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Book Ticket"))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_passenger_list(&self, frame: &mut Frame, area: Rect) {
        let len = self.booking.passengers.len();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Passengers ({len})"));

        let height = area.height.saturating_sub(2) as usize;
        let end = cmp::min(self.booking.scroll.offset + height.max(1), len);
        let items: Vec<ListItem> = if len == 0 {
            vec![ListItem::new(Line::from(Span::styled(
                "Enter a seat count to add passenger rows.",
                Style::default().fg(self.theme.muted),
            )))]
        } else {
            self.booking.passengers[self.booking.scroll.offset..end]
                .iter()
                .enumerate()
                .map(|(visible_idx, entry)| {
                    let idx = self.booking.scroll.offset + visible_idx;
                    let name_focused = self.booking.focus == BookingFocus::PassengerName(idx);
                    let age_focused = self.booking.focus == BookingFocus::PassengerAge(idx);

                    let mut spans = vec![Span::styled(
                        format!("{:>3}. ", idx + 1),
                        Style::default().fg(self.theme.muted),
                    )];
                    spans.push(Span::styled(
                        "Name ",
                        field_label_style(name_focused, &self.theme),
                    ));
                    spans.extend(field_value_spans(&entry.name, name_focused));
                    spans.push(Span::raw("  "));
                    spans.push(Span::styled(
                        "Age ",
                        field_label_style(age_focused, &self.theme),
                    ));
                    spans.extend(field_value_spans(&entry.age, age_focused));
                    ListItem::new(Line::from(spans))
                })
                .collect()
        };

        frame.render_widget(List::new(items).block(block), area);
    }

    fn draw_history(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(area);

        let history = self.session.ledger().history();
        let mut lines: Vec<Line> = Vec::new();
        if history.is_empty() {
            lines.push(Line::from("No bookings recorded yet."));
        }
        for (idx, entry) in history.iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!(
                    "#{} · {} · {} · {} seats",
                    idx + 1,
                    entry.booked_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    entry.division,
                    entry.seats
                ),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(entry.to_string()));
            lines.push(Line::from(""));
        }

        let view_height = chunks[0].height.saturating_sub(2) as usize;
        let max_offset = lines.len().saturating_sub(view_height.max(1));
        if self.history_offset > max_offset {
            self.history_offset = max_offset;
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Booking History ({}) — j/k scroll · Esc menu",
                history.len()
            )))
            .wrap(Wrap { trim: false })
            .scroll((self.history_offset as u16, 0));
        frame.render_widget(paragraph, chunks[0]);
        self.render_status(frame, chunks[1]);
    }

    fn render_query_input(
        theme: &Theme,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        field: &TextField,
        focused: bool,
    ) {
        let border_style = if focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.muted)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(border_style);
        let content = Line::from(field_value_spans(field, focused));
        frame.render_widget(Paragraph::new(content).block(block), area);
    }

    fn render_train_table(
        theme: &Theme,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        rows: &[TrainRecord],
        scroll: &TableScroll,
        active: bool,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title.to_string());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height < 2 {
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);

        let header = Paragraph::new(Line::from(Span::styled(
            train_table_header(),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(header, chunks[0]);

        if rows.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "No trains match.",
                    Style::default().fg(theme.muted),
                ))),
                chunks[1],
            );
            return;
        }

        let height = chunks[1].height as usize;
        let end = cmp::min(scroll.offset + height.max(1), rows.len());
        let visible = &rows[scroll.offset..end];

        let mut list_state = ListState::default();
        if active && !visible.is_empty() {
            let selected = scroll
                .cursor
                .saturating_sub(scroll.offset)
                .min(visible.len() - 1);
            list_state.select(Some(selected));
        }

        let items: Vec<ListItem> = visible
            .iter()
            .map(|record| ListItem::new(Line::from(format_train_row(record))))
            .collect();
        let list = List::new(items).highlight_style(
            Style::default()
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    fn render_insert_form(theme: &Theme, frame: &mut Frame, form: &InsertForm) {
        let frame_area = frame.size();
        let width = cmp::min(64_u16, frame_area.width.saturating_sub(4)).max(30);
        let height = (INSERT_LABELS.len() as u16 + 4).min(frame_area.height.saturating_sub(2));
        let area = centered_rect(width, height, frame_area);

        frame.render_widget(Clear, area);

        let mut lines: Vec<Line> = INSERT_LABELS
            .iter()
            .enumerate()
            .map(|(idx, label)| {
                let focused = idx == form.focus;
                let mut spans = vec![Span::styled(
                    format!("{label:<20} "),
                    field_label_style(focused, theme),
                )];
                spans.extend(field_value_spans(&form.fields[idx], focused));
                Line::from(spans)
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter next · Ctrl+S save · Esc cancel",
            Style::default().fg(theme.muted),
        )));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Insert Train"))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let style = match self.status_tone {
            StatusTone::Info => Style::default().fg(self.theme.primary_fg),
            StatusTone::Success => Style::default().fg(self.theme.success),
            StatusTone::Error => Style::default().fg(self.theme.danger),
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(self.status.clone(), style)))
            .block(Block::default().borders(Borders::ALL).title("Status"));
        frame.render_widget(paragraph, area);
    }
}

fn field_label_style(focused: bool, theme: &Theme) -> Style {
    if focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.primary_fg)
    }
}

/// Render a field value, with a reversed cursor cell when focused.
///
/// Fields only accept ASCII input, so the one-byte split at the cursor
/// is always on a character boundary.
fn field_value_spans(field: &TextField, focused: bool) -> Vec<Span<'_>> {
    if !focused {
        return vec![Span::raw(field.text())];
    }
    let value = field.text();
    let cursor = field.cursor().min(value.len());
    let (before, rest) = value.split_at(cursor);
    let (at, after) = if rest.is_empty() {
        (" ", "")
    } else {
        rest.split_at(1)
    };
    vec![
        Span::raw(before),
        Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)),
        Span::raw(after),
    ]
}

fn labeled_field_line<'a>(
    label: &'a str,
    field: &'a TextField,
    focused: bool,
    theme: &Theme,
) -> Line<'a> {
    let mut spans = vec![Span::styled(
        format!("{label:<12}"),
        field_label_style(focused, theme),
    )];
    spans.extend(field_value_spans(field, focused));
    Line::from(spans)
}

fn train_table_header() -> String {
    format!(
        "{:>6}  {:<30}  {:<18}  {:<18}  {:>5}  {:>5}  {:>6}  {:>7}",
        "No.", "Name", "Source", "Destination", "Dep", "Arr", "Seats", "Avail"
    )
}

fn format_train_row(record: &TrainRecord) -> String {
    format!(
        "{:>6}  {:<30}  {:<18}  {:<18}  {:>5}  {:>5}  {:>6}  {:>7}",
        record.number,
        clip(&record.name, 30),
        clip(&record.source, 18),
        clip(&record.destination, 18),
        record.start_time.to_string(),
        record.reach_time.to_string(),
        record.total_seats,
        record.balance,
    )
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
        clipped.push('…');
        clipped
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>, tick_rate: Duration) {
    thread::spawn(move || loop {
        match event::poll(tick_rate) {
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

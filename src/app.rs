//! Interactive terminal UI: a CSV file picker plus a results view.
//!
//! All UI state lives in the `App` struct created at launch and dropped on
//! quit; key presses are translated into discrete `Action`s which a single
//! dispatch point applies to the state.

use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event as CEvent, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use tui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{BarChart, Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};

use crate::aggregate::{self, AggregateResult};
use crate::loader;
use crate::report;

enum Event<I> {
    Input(I),
    Tick,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum MenuItem {
    Files,
    Results,
}

impl From<MenuItem> for usize {
    fn from(input: MenuItem) -> usize {
        match input {
            MenuItem::Files => 0,
            MenuItem::Results => 1,
        }
    }
}

/// One discrete user action, decoded from a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Action {
    NextFile,
    PrevFile,
    SelectFile,
    RunAnalysis,
    ShowFiles,
    ShowResults,
    Quit,
}

fn action_for(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Down => Some(Action::NextFile),
        KeyCode::Up => Some(Action::PrevFile),
        KeyCode::Enter => Some(Action::SelectFile),
        KeyCode::Char('r') => Some(Action::RunAnalysis),
        KeyCode::Char('f') => Some(Action::ShowFiles),
        KeyCode::Char('s') => Some(Action::ShowResults),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

struct App {
    files: Vec<PathBuf>,
    list_state: ListState,
    selected: Option<PathBuf>,
    result: Option<AggregateResult>,
    status: String,
    active_menu_item: MenuItem,
}

impl App {
    fn new(files: Vec<PathBuf>) -> Self {
        let mut list_state = ListState::default();
        if !files.is_empty() {
            list_state.select(Some(0));
        }
        App {
            files,
            list_state,
            selected: None,
            result: None,
            status: String::from("Pick a CSV file, then press r to run"),
            active_menu_item: MenuItem::Files,
        }
    }

    /// Apply one action. Returns false when the app should exit.
    fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::NextFile => self.move_cursor(1),
            Action::PrevFile => self.move_cursor(-1),
            Action::SelectFile => self.select_highlighted(),
            Action::RunAnalysis => self.run_analysis(),
            Action::ShowFiles => self.active_menu_item = MenuItem::Files,
            Action::ShowResults => {
                if self.result.is_some() {
                    self.active_menu_item = MenuItem::Results;
                }
            }
            Action::Quit => return false,
        }
        true
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.files.is_empty() {
            return;
        }
        let len = self.files.len() as isize;
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.list_state.select(Some(next));
    }

    fn select_highlighted(&mut self) {
        if let Some(index) = self.list_state.selected() {
            if let Some(path) = self.files.get(index) {
                self.selected = Some(path.clone());
                self.status = format!("Selected {}", path.display());
            }
        }
    }

    /// Run action is a no-op until a file has been selected; loader and
    /// aggregator failures become a status message, never a crash.
    fn run_analysis(&mut self) {
        let path = match &self.selected {
            Some(path) => path.clone(),
            None => {
                self.status = String::from("No file selected; pick one with Enter first");
                return;
            }
        };
        match loader::load_csv(&path).map_err(Box::<dyn Error>::from).and_then(|table| {
            aggregate::compute(&table).map_err(Box::<dyn Error>::from)
        }) {
            Ok(result) => {
                self.status = format!("Analyzed {}", path.display());
                self.result = Some(result);
                self.active_menu_item = MenuItem::Results;
            }
            Err(e) => {
                self.status = format!("Analysis failed: {}", e);
            }
        }
    }
}

/// Only CSV-suffixed files in the data directory are selectable.
fn csv_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn run_tui(data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let files = csv_files(data_dir)?;
    let mut app = App::new(files);

    enable_raw_mode().expect("can run in raw mode");

    let (tx, rx) = mpsc::channel();
    let tick_rate = Duration::from_millis(200);
    thread::spawn(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));

            if event::poll(timeout).expect("poll works") {
                if let CEvent::Key(key) = event::read().expect("can read events") {
                    tx.send(Event::Input(key)).expect("can send events");
                }
            }

            if last_tick.elapsed() >= tick_rate {
                if let Ok(_) = tx.send(Event::Tick) {
                    last_tick = Instant::now();
                }
            }
        }
    });

    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    loop {
        terminal.draw(|rect| draw(rect, &mut app))?;

        match rx.recv()? {
            Event::Input(event) => {
                if let Some(action) = action_for(event.code) {
                    if !app.dispatch(action) {
                        disable_raw_mode()?;
                        terminal.show_cursor()?;
                        break;
                    }
                }
            }
            Event::Tick => {}
        }
    }

    Ok(())
}

fn draw<B: Backend>(rect: &mut Frame<B>, app: &mut App) {
    let size = rect.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Percentage(20), Constraint::Percentage(80)].as_ref())
        .split(size);

    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[0]);

    let menu_titles = vec!["Files", "Run", "Show results", "Quit"];
    let menu = menu_titles
        .iter()
        .map(|t| {
            let (first, rest) = t.split_at(1);
            Spans::from(vec![
                Span::styled(
                    first,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::UNDERLINED),
                ),
                Span::styled(rest, Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let tabs = Tabs::new(menu)
        .select(app.active_menu_item.into())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Cyan))
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw("|"));
    rect.render_widget(tabs, header_chunks[0]);

    let status = Paragraph::new(app.status.as_str())
        .block(Block::default().title("Status").borders(Borders::ALL))
        .style(Style::default().fg(Color::Green))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    rect.render_widget(status, header_chunks[1]);

    match app.active_menu_item {
        MenuItem::Files => draw_file_picker(rect, app, chunks[1]),
        MenuItem::Results => draw_results(rect, app, chunks[1]),
    }
}

fn draw_file_picker<B: Backend>(rect: &mut Frame<B>, app: &mut App, area: tui::layout::Rect) {
    let items: Vec<ListItem> = app
        .files
        .iter()
        .map(|path| ListItem::new(path.display().to_string()))
        .collect();
    let list = List::new(items)
        .block(Block::default().title("CSV files").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );
    rect.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_results<B: Backend>(rect: &mut Frame<B>, app: &mut App, area: tui::layout::Rect) {
    let result = match &app.result {
        Some(result) => result,
        None => {
            let placeholder = Paragraph::new("No results yet; run an analysis with r")
                .block(Block::default().title("Results").borders(Borders::ALL));
            rect.render_widget(placeholder, area);
            return;
        }
    };

    let result_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(area);

    let lines: Vec<Spans> = report::render_lines(result)
        .into_iter()
        .map(|line| Spans::from(Span::raw(line)))
        .collect();
    let summary = Paragraph::new(lines)
        .block(Block::default().title("Summary").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    rect.render_widget(summary, result_chunks[0]);

    let race_counts = report::race_counts_sorted(result);
    let chart = BarChart::default()
        .block(Block::default().title("Race counts").borders(Borders::ALL))
        .data(&race_counts)
        .bar_width(8)
        .bar_style(Style::default().fg(Color::Yellow))
        .value_style(Style::default().fg(Color::Black).bg(Color::Yellow));
    rect.render_widget(chart, result_chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(action_for(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(action_for(KeyCode::Enter), Some(Action::SelectFile));
        assert_eq!(action_for(KeyCode::Char('x')), None);
    }

    #[test]
    fn run_without_selection_is_refused() {
        let mut app = App::new(vec![PathBuf::from("a.csv")]);
        assert!(app.dispatch(Action::RunAnalysis));
        assert!(app.result.is_none());
        assert!(app.status.contains("No file selected"));
    }

    #[test]
    fn cursor_wraps_around_the_file_list() {
        let mut app = App::new(vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
        app.dispatch(Action::PrevFile);
        assert_eq!(app.list_state.selected(), Some(1));
        app.dispatch(Action::NextFile);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn results_view_is_unreachable_without_results() {
        let mut app = App::new(vec![]);
        app.dispatch(Action::ShowResults);
        assert_eq!(app.active_menu_item, MenuItem::Files);
    }

    #[test]
    fn only_csv_files_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "age\n1\n").unwrap();
        fs::write(dir.path().join("b.txt"), "nope").unwrap();
        fs::write(dir.path().join("c.CSV"), "age\n2\n").unwrap();
        let files = csv_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.csv", "c.CSV"]);
    }
}

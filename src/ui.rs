use crate::app::{AppState, MainView};
use crate::db::KeyValueStore;
use crate::entities::{Category, Entity};
use crate::filter::FilterField;
use crate::modal::{detail_rows, ClickTarget};
use crate::render::{Action, Card, CardList};
use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::Title, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;

/// Which list has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Characters,
    Favorites,
}

impl Panel {
    pub fn next(&self) -> Self {
        match self {
            Panel::Characters => Panel::Favorites,
            Panel::Favorites => Panel::Characters,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Panel::Characters => "Characters",
            Panel::Favorites => "Favorites",
        }
    }
}

/// Pending filter criterion and text, edited before being applied
#[derive(Debug, Clone, Default)]
pub struct FilterInput {
    pub field: FilterField,
    pub text: String,
    pub editing: bool,
}

/// Result of handling one input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal color for a category; cards and the modal border both use it
pub fn category_color(category: Category) -> Color {
    match category {
        Category::Gryffindor => Color::Red,
        Category::Slytherin => Color::Green,
        Category::Hufflepuff => Color::Yellow,
        Category::Ravenclaw => Color::Blue,
        Category::Unknown => Color::Gray,
    }
}

pub struct App<S: KeyValueStore> {
    pub state: AppState<S>,
    pub focus: Panel,
    pub characters_state: ListState,
    pub favorites_state: ListState,
    pub input: FilterInput,
    /// Modal content rectangle from the last draw, for mouse hit-testing
    pub modal_area: Option<Rect>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(state: AppState<S>) -> Self {
        let mut app = Self {
            state,
            focus: Panel::Characters,
            characters_state: ListState::default(),
            favorites_state: ListState::default(),
            input: FilterInput::default(),
            modal_area: None,
        };
        app.clamp_selection();
        app
    }

    fn list_len(&self, panel: Panel) -> usize {
        match panel {
            Panel::Characters => self.state.characters().len(),
            Panel::Favorites => self.state.favorites_list().len(),
        }
    }

    fn list_state_mut(&mut self, panel: Panel) -> &mut ListState {
        match panel {
            Panel::Characters => &mut self.characters_state,
            Panel::Favorites => &mut self.favorites_state,
        }
    }

    /// Keep both selections inside their lists after a re-render
    fn clamp_selection(&mut self) {
        for panel in [Panel::Characters, Panel::Favorites] {
            let len = self.list_len(panel);
            let list_state = self.list_state_mut(panel);
            match (len, list_state.selected()) {
                (0, _) => list_state.select(None),
                (_, None) => list_state.select(Some(0)),
                (len, Some(i)) if i >= len => list_state.select(Some(len - 1)),
                _ => {}
            }
        }
    }

    pub fn selected_card(&self) -> Option<&Card> {
        match self.focus {
            Panel::Characters => self
                .characters_state
                .selected()
                .and_then(|i| self.state.characters().get(i)),
            Panel::Favorites => self
                .favorites_state
                .selected()
                .and_then(|i| self.state.favorites_list().get(i)),
        }
    }

    pub fn next(&mut self) {
        let len = self.list_len(self.focus);
        if len == 0 {
            return;
        }
        let list_state = self.list_state_mut(self.focus);
        let i = match list_state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.list_len(self.focus);
        if len == 0 {
            return;
        }
        let list_state = self.list_state_mut(self.focus);
        let i = match list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        list_state.select(Some(i));
    }

    fn perform(&mut self, action: Action) {
        self.state.perform(action);
        self.clamp_selection();
    }

    /// Dispatch a key to exactly one handler: modal first, then the filter
    /// input, then the lists. Ctrl+C always quits; other control chords are ignored.
    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Flow::Quit,
                _ => Flow::Continue,
            };
        }
        if self.state.modal().is_open() {
            self.handle_modal_key(key);
            return Flow::Continue;
        }
        if self.input.editing {
            self.handle_input_key(key);
            return Flow::Continue;
        }
        self.handle_list_key(key)
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('x') | KeyCode::Char('q') | KeyCode::Enter => {
                self.perform(Action::CloseModal)
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.input.editing = false;
                self.apply_filter();
            }
            KeyCode::Esc => self.input.editing = false,
            KeyCode::Backspace => {
                self.input.text.pop();
            }
            KeyCode::Tab => self.input.field = self.input.field.next(),
            KeyCode::Char(c) => self.input.text.push(c),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Tab | KeyCode::BackTab => self.focus = self.focus.next(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Enter | KeyCode::Char('i') => {
                if let Some(action) = self.selected_card().map(Card::on_image_click) {
                    self.perform(action);
                }
            }
            KeyCode::Char('f') | KeyCode::Char(' ') => {
                if let Some(action) = self.selected_card().map(Card::on_favorite_click) {
                    self.perform(action);
                }
            }
            KeyCode::Char('/') => {
                self.input.editing = true;
                self.focus = Panel::Characters;
            }
            KeyCode::Char('s') => self.input.field = self.input.field.next(),
            KeyCode::Char('c') => {
                self.input.text.clear();
                self.perform(Action::ClearFilter);
            }
            _ => {}
        }
        Flow::Continue
    }

    fn apply_filter(&mut self) {
        self.perform(Action::ApplyFilter {
            field: self.input.field,
            text: self.input.text.clone(),
        });
        self.characters_state
            .select(if self.state.characters().is_empty() { None } else { Some(0) });
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if let (true, Some(area)) = (self.state.modal().is_open(), self.modal_area) {
            let target = click_target(area, mouse.column, mouse.row);
            if self.state.click_modal(target) {
                self.modal_area = None;
            }
        }
    }
}

/// Classify a click against the modal content rectangle. The close control
/// is the `[x]` drawn at the right end of the top border.
pub fn click_target(content: Rect, column: u16, row: u16) -> ClickTarget {
    let inside = column >= content.x
        && column < content.x.saturating_add(content.width)
        && row >= content.y
        && row < content.y.saturating_add(content.height);
    if !inside {
        return ClickTarget::Backdrop;
    }

    let close_start = content.x + content.width.saturating_sub(CLOSE_CONTROL.len() as u16 + 1);
    if row == content.y && column >= close_start {
        ClickTarget::CloseControl
    } else {
        ClickTarget::Content
    }
}

const CLOSE_CONTROL: &str = "[x]";

/// Rectangle of the given size centered in `area`, clamped to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

pub fn run_ui<S: KeyValueStore>(app: &mut App<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal UI failed");
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if app.handle_key(key) == Flow::Quit {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }
}

fn ui<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with filter
            Constraint::Min(0),    // Lists
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_list(
        f,
        content_chunks[0],
        app.state.characters(),
        Panel::Characters,
        app.focus == Panel::Characters,
        &mut app.characters_state,
    );
    render_list(
        f,
        content_chunks[1],
        app.state.favorites_list(),
        Panel::Favorites,
        app.focus == Panel::Favorites,
        &mut app.favorites_state,
    );

    render_status_bar(f, chunks[2], app);

    app.modal_area = match app.state.modal().entity() {
        Some(entity) => {
            let area = centered_rect(60, 16, f.size());
            render_modal(f, area, entity, app.state.placeholder_image());
            Some(area)
        }
        None => None,
    };
}

fn render_header<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let catalog = app.state.catalog();

    let mut spans = vec![
        Span::styled(
            "Hogwarts Catalog",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Loaded: {}", catalog.len()),
            Style::default().fg(Color::White),
        ),
    ];

    if let Some(fetched_at) = catalog.fetched_at() {
        spans.push(Span::styled(
            format!(" @ {}", fetched_at.with_timezone(&Local).format("%H:%M")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("♥ {}", app.state.favorites().len()),
        Style::default().fg(Color::Red),
    ));
    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("Filter by {}: ", app.input.field),
        Style::default().fg(Color::Cyan),
    ));

    let text_style = if app.input.editing {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if app.input.editing { "▏" } else { "" };
    spans.push(Span::styled(format!("{}{}", app.input.text, cursor), text_style));

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_list(
    f: &mut Frame,
    area: Rect,
    list: &CardList,
    panel: Panel,
    focused: bool,
    state: &mut ListState,
) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ({}) ", panel.title(), list.len()));

    if let Some(message) = list.message() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format!("  {}", message),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )))
        .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = list
        .cards()
        .iter()
        .map(|card| {
            ListItem::new(Line::from(vec![
                Span::styled(card.glyph(), Style::default().fg(Color::Red)),
                Span::raw(" "),
                Span::styled(
                    truncate(&card.name, 40),
                    Style::default().fg(category_color(card.category)),
                ),
            ]))
        })
        .collect();

    let widget = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(widget, area, state);
}

fn render_status_bar<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let mut status_spans = vec![];

    if let Some(err) = app.state.last_error() {
        status_spans.push(Span::styled(
            format!(" Not saved: {} ", err),
            Style::default().fg(Color::Red),
        ));
        status_spans.push(Span::raw(" | "));
    }

    if app.input.editing {
        status_spans.extend([
            key("Enter"),
            Span::raw(" Apply | "),
            key("Tab"),
            Span::raw(" Field | "),
            key("Esc"),
            Span::raw(" Cancel"),
        ]);
    } else if app.state.modal().is_open() {
        status_spans.extend([
            key("Esc"),
            Span::raw("/"),
            key("x"),
            Span::raw(" Close | click outside to close"),
        ]);
    } else {
        if let MainView::Filtered { field, text } = app.state.view() {
            status_spans.push(Span::styled(
                format!("Filter: {} ~ \"{}\"", field, text),
                Style::default().fg(Color::Green),
            ));
            status_spans.push(Span::raw(" ("));
            status_spans.push(key("c"));
            status_spans.push(Span::raw(" clear) | "));
        }
        status_spans.extend([
            key("Enter"),
            Span::raw(" Details | "),
            key("f"),
            Span::raw(" Favorite | "),
            key("/"),
            Span::raw(" Filter | "),
            key("s"),
            Span::raw(" Field | "),
            key("Tab"),
            Span::raw(" Panel | "),
            Span::styled("q", Style::default().fg(Color::Red)),
            Span::raw(" Quit"),
        ]);
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_modal(f: &mut Frame, area: Rect, entity: &Entity, placeholder_image: &str) {
    let category = entity.category();
    let color = category_color(category);
    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let mut content = vec![
        Line::from(vec![
            Span::styled("  Image: ", label),
            Span::styled(
                entity.image_or(placeholder_image).to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
    ];
    for (name, value) in detail_rows(entity) {
        content.push(Line::from(vec![
            Span::styled(format!("  {}: ", name), label),
            Span::raw(value),
        ]));
    }
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        format!("  {}", category.class_name()),
        Style::default().fg(color).add_modifier(Modifier::ITALIC),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", entity.name))
        .title(Title::from(CLOSE_CONTROL).alignment(Alignment::Right));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(content).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::db::MemoryStore;
    use crate::favorites::FavoritesStore;

    fn app() -> App<MemoryStore> {
        let catalog = Catalog::from_entities(vec![
            Entity::new("Harry Potter").with_house("Gryffindor"),
            Entity::new("Draco Malfoy").with_house("Slytherin"),
            Entity::new("Hedwig").with_species("owl"),
        ]);
        let state = AppState::new(
            catalog,
            FavoritesStore::load_persisted(MemoryStore::new()),
            &Config::default(),
        );
        App::new(state)
    }

    fn press(app: &mut App<MemoryStore>, code: KeyCode) -> Flow {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App<MemoryStore>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn click(app: &mut App<MemoryStore>, column: u16, row: u16) {
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    #[test]
    fn test_favorite_key_toggles_selected_card() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('f'));

        assert!(app.state.favorites().is_favorite("Draco Malfoy"));
        assert!(!app.state.modal().is_open());
        assert_eq!(app.favorites_state.selected(), Some(0));
    }

    #[test]
    fn test_enter_opens_modal_and_captures_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.state.modal().entity().map(|e| e.name.as_str()),
            Some("Harry Potter")
        );

        // While open, list keys do not reach the list
        press(&mut app, KeyCode::Char('f'));
        assert!(app.state.favorites().is_empty());
        assert_eq!(press(&mut app, KeyCode::Esc), Flow::Continue);
        assert!(!app.state.modal().is_open());
    }

    #[test]
    fn test_filter_input_flow() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.input.field, FilterField::Species);
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "OWL");
        // 'q' while editing is text, not quit
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Continue);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);

        assert!(!app.input.editing);
        let names: Vec<&str> = app
            .state
            .characters()
            .cards()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Hedwig"]);

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.state.characters().len(), 3);
        assert!(app.input.text.is_empty());
    }

    #[test]
    fn test_filter_with_no_results_clears_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "voldemort");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.characters_state.selected(), None);
        assert!(app.selected_card().is_none());
    }

    #[test]
    fn test_control_chords_are_not_typed_or_treated_as_plain_keys() {
        let mut app = app();
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "dra");
        assert_eq!(app.handle_key(ctrl('u')), Flow::Continue);
        assert_eq!(app.input.text, "dra");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.characters().len(), 1);

        // Ctrl+C quits instead of clearing the filter
        assert_eq!(app.handle_key(ctrl('c')), Flow::Quit);
        assert_eq!(app.state.characters().len(), 1);

        // Shifted characters are still typed
        press(&mut app, KeyCode::Char('/'));
        app.handle_key(KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT));
        assert_eq!(app.input.text, "draD");
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_card().map(|c| c.name.as_str()), Some("Hedwig"));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_card().map(|c| c.name.as_str()), Some("Harry Potter"));
    }

    #[test]
    fn test_backdrop_click_closes_modal() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        app.modal_area = Some(Rect::new(10, 5, 40, 12));

        click(&mut app, 20, 8);
        assert!(app.state.modal().is_open());

        click(&mut app, 2, 2);
        assert!(!app.state.modal().is_open());
        assert_eq!(app.modal_area, None);
    }

    #[test]
    fn test_click_target_regions() {
        let content = Rect::new(10, 5, 40, 12);
        assert_eq!(click_target(content, 0, 0), ClickTarget::Backdrop);
        assert_eq!(click_target(content, 50, 5), ClickTarget::Backdrop);
        assert_eq!(click_target(content, 10, 5), ClickTarget::Content);
        assert_eq!(click_target(content, 20, 10), ClickTarget::Content);
        assert_eq!(click_target(content, 47, 5), ClickTarget::CloseControl);
        assert_eq!(click_target(content, 47, 6), ClickTarget::Content);
    }

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(60, 16, area), Rect::new(20, 12, 60, 16));
        assert_eq!(centered_rect(60, 16, Rect::new(0, 0, 30, 10)), Rect::new(0, 0, 30, 10));
    }

    #[test]
    fn test_card_and_modal_share_color() {
        for category in Category::ALL {
            let entity = Entity::new("Someone").with_house(category.as_str());
            assert_eq!(category_color(entity.category()), category_color(category));
        }
        assert_eq!(category_color(Category::of(Some("ravenclaw"))), Color::Gray);
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Harry", 10), "Harry");
        assert_eq!(truncate("Ænima Potterson", 8), "Ænima...");
    }
}

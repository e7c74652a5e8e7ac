use std::io;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Chart, Clear, Dataset, GraphType, List, ListItem, Paragraph, Tabs,
        Wrap,
    },
    Frame, Terminal,
};
use tokio::sync::mpsc;
use wellness_core::mood::RECENT_WINDOW;
use wellness_core::resources::{
    Resource, CRISIS_ALERT_ACK, CRISIS_ALERT_INTRO, CRISIS_LINES, DISCLAIMER_LIMITS, FOOTER,
    NOT_MEDICAL_ADVICE, PROFESSIONAL_HELP, SELF_CARE_TIPS, SUPPORT_LINES,
};
use wellness_core::{reduce, Action, AppState, Effect, Reply, ResponseResolver};
use wellness_schema::{MoodLevel, Role, Tab, ViewState};

const EMPTY_CHAT_PROMPT: &str = "How are you feeling today?";
const EMPTY_CHAT_HINT: &str = "I'm here to listen and support you.";
const CHAT_PAGE: u16 = 10;

struct App {
    state: AppState,
    assistant_name: String,
    input: String,
    mood_cursor: usize,
    chat_scroll: u16,
    resources_scroll: u16,
    should_quit: bool,
}

impl App {
    fn new(assistant_name: impl Into<String>) -> Self {
        Self {
            state: AppState::new(),
            assistant_name: assistant_name.into(),
            input: String::new(),
            mood_cursor: 2,
            chat_scroll: 0,
            resources_scroll: 0,
            should_quit: false,
        }
    }

    fn dispatch(&mut self, action: Action) -> Option<Effect> {
        let state = std::mem::take(&mut self.state);
        let (next, effect) = reduce(state, action);
        self.state = next;
        effect
    }

    fn on_reply(&mut self, reply: Reply) {
        tracing::debug!(source = ?reply.source, "reply delivered to chat");
        self.chat_scroll = 0;
        self.dispatch(Action::ReplyReceived(reply.text));
    }

    fn selected_mood(&self) -> MoodLevel {
        MoodLevel::ALL[self.mood_cursor]
    }

    fn log_mood(&mut self, mood: MoodLevel) {
        self.mood_cursor = (mood.value() - 1) as usize;
        self.dispatch(Action::LogMood {
            mood,
            at: Local::now(),
        });
    }

    fn on_key(&mut self, key: KeyEvent) -> Option<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        if self.state.crisis_alert {
            if key.code == KeyCode::Enter {
                self.dispatch(Action::DismissCrisisAlert);
            }
            return None;
        }

        let Some(tab) = self.state.view.tab() else {
            match key.code {
                KeyCode::Enter => {
                    self.dispatch(Action::AcknowledgeDisclaimer);
                }
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                _ => {}
            }
            return None;
        };

        match key.code {
            KeyCode::Tab => {
                self.dispatch(Action::SelectTab(tab.next()));
                return None;
            }
            KeyCode::BackTab => {
                self.dispatch(Action::SelectTab(tab.prev()));
                return None;
            }
            _ => {}
        }

        match tab {
            Tab::Chat => self.on_chat_key(key),
            Tab::Mood => {
                self.on_mood_key(key.code);
                None
            }
            Tab::Resources => {
                self.on_resources_key(key.code);
                None
            }
        }
    }

    fn on_chat_key(&mut self, key: KeyEvent) -> Option<Effect> {
        match key.code {
            KeyCode::Enter => {
                if !self.state.can_submit(&self.input) {
                    return None;
                }
                let input = std::mem::take(&mut self.input);
                self.chat_scroll = 0;
                self.dispatch(Action::Submit(input))
            }
            KeyCode::Up => {
                self.chat_scroll = self.chat_scroll.saturating_add(1);
                None
            }
            KeyCode::Down => {
                self.chat_scroll = self.chat_scroll.saturating_sub(1);
                None
            }
            KeyCode::PageUp => {
                self.chat_scroll = self.chat_scroll.saturating_add(CHAT_PAGE);
                None
            }
            KeyCode::PageDown => {
                self.chat_scroll = self.chat_scroll.saturating_sub(CHAT_PAGE);
                None
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
                None
            }
            _ => None,
        }
    }

    fn on_mood_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c @ '1'..='5') => {
                let value = c as u8 - b'0';
                if let Ok(mood) = MoodLevel::try_from(value) {
                    self.log_mood(mood);
                }
            }
            KeyCode::Left => {
                self.mood_cursor = self.mood_cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.mood_cursor < MoodLevel::ALL.len() - 1 {
                    self.mood_cursor += 1;
                }
            }
            KeyCode::Enter => self.log_mood(self.selected_mood()),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn on_resources_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => {
                self.resources_scroll = self.resources_scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                self.resources_scroll = self.resources_scroll.saturating_add(1);
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }
}

/// Runs the full-screen frontend until the user quits.
pub async fn run_tui(resolver: ResponseResolver, assistant_name: &str) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(assistant_name);
    let run_result = run_app(&mut terminal, &mut app, resolver);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    resolver: ResponseResolver,
) -> Result<()> {
    let (reply_tx, mut reply_rx) = mpsc::channel::<Reply>(8);

    loop {
        while let Ok(reply) = reply_rx.try_recv() {
            app.on_reply(reply);
        }

        terminal.draw(|frame| ui(frame, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(effect) = app.on_key(key) {
                        spawn_effect(effect, &resolver, &reply_tx);
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn spawn_effect(effect: Effect, resolver: &ResponseResolver, reply_tx: &mpsc::Sender<Reply>) {
    match effect {
        Effect::RequestReply(text) => {
            let resolver = resolver.clone();
            let reply_tx = reply_tx.clone();
            tokio::spawn(async move {
                let reply = resolver.resolve(&text).await;
                if reply_tx.send(reply).await.is_err() {
                    tracing::debug!("frontend closed before reply arrived");
                }
            });
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if app.state.view == ViewState::Disclaimer {
        render_disclaimer(frame, area);
        return;
    }

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, main_layout[0], app);

    let banner = Paragraph::new(NOT_MEDICAL_ADVICE)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    frame.render_widget(banner, main_layout[1]);

    match app.state.view.tab() {
        Some(Tab::Chat) => render_chat(frame, main_layout[2], app),
        Some(Tab::Mood) => render_mood(frame, main_layout[2], app),
        Some(Tab::Resources) => render_resources(frame, main_layout[2], app.resources_scroll),
        None => {}
    }

    render_status(frame, main_layout[3], app);

    if app.state.crisis_alert {
        render_crisis_modal(frame, area);
    }
}

fn render_disclaimer(frame: &mut Frame, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled("Welcome to Wellness Companion", bold.fg(Color::Cyan))),
        Line::from(""),
        Line::from(Span::styled("⚠️ Important Disclaimer", bold.fg(Color::Yellow))),
        Line::from("This AI companion is designed to provide emotional support and wellness tips, but it does NOT:"),
    ];
    lines.extend(
        DISCLAIMER_LIMITS
            .iter()
            .map(|item| Line::from(format!("  • {item}"))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "If you're in crisis, please contact:",
        bold.fg(Color::Red),
    )));
    lines.extend(
        CRISIS_LINES
            .iter()
            .map(|line| Line::from(format!("  {}: {}", line.name, line.contact))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[Enter]", bold.fg(Color::White)),
        Span::styled(" I Understand, Continue", Style::default().fg(Color::Green)),
        Span::styled("   [q] quit", Style::default().fg(Color::DarkGray)),
    ]));

    let card = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Wellness Companion ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(card, centered_rect(80, 80, area));
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let selected = app
        .state
        .view
        .tab()
        .and_then(|tab| Tab::ALL.iter().position(|t| *t == tab))
        .unwrap_or(0);
    let tabs = Tabs::new(Tab::ALL.iter().map(|tab| tab.title()))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .title(" Wellness Companion ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(tabs, area);
}

fn message_style(role: Role) -> (Style, Alignment) {
    match role {
        Role::User => (Style::default().fg(Color::Cyan), Alignment::Right),
        Role::Assistant => (Style::default().fg(Color::White), Alignment::Left),
        Role::SystemNotice => (
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::ITALIC),
            Alignment::Center,
        ),
    }
}

fn render_chat(frame: &mut Frame, area: Rect, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let transcript_block = Block::default()
        .title(" Chat ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = transcript_block.inner(layout[0]);
    frame.render_widget(transcript_block, layout[0]);

    if app.state.messages.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                EMPTY_CHAT_PROMPT,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                EMPTY_CHAT_HINT,
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
    } else {
        render_transcript(frame, inner, app);
    }

    let (title, border) = if app.state.loading {
        (" Waiting for reply... ", Color::DarkGray)
    } else {
        (" Share your thoughts... [Enter] send [↑↓] scroll ", Color::Cyan)
    };
    let input = Paragraph::new(app.input.as_str()).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(input, layout[1]);

    if !app.state.crisis_alert {
        let input_width = Line::from(app.input.as_str()).width() as u16;
        let cursor_x = layout[1].x + 1 + input_width;
        let max_x = layout[1].right().saturating_sub(2);
        frame.set_cursor_position((cursor_x.min(max_x), layout[1].y + 1));
    }
}

fn transcript_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in &app.state.messages {
        let (style, alignment) = message_style(message.role);
        let text = match message.role {
            Role::Assistant => format!("{}: {}", app.assistant_name, message.text),
            _ => message.text.clone(),
        };
        for line in text.lines() {
            lines.push(
                Line::from(line.to_string())
                    .style(style)
                    .alignment(alignment),
            );
        }
        lines.push(Line::from(""));
    }
    if app.state.loading {
        lines.push(Line::from(Span::styled(
            format!("{} is typing...", app.assistant_name),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn render_transcript(frame: &mut Frame, area: Rect, app: &App) {
    let paragraph = Paragraph::new(transcript_lines(app)).wrap(Wrap { trim: false });

    // pinned to the bottom unless the user scrolled back
    let total = paragraph.line_count(area.width) as u16;
    let bottom = total.saturating_sub(area.height);
    let offset = bottom.saturating_sub(app.chat_scroll.min(bottom));

    frame.render_widget(paragraph.scroll((offset, 0)), area);
}

fn render_mood(frame: &mut Frame, area: Rect, app: &App) {
    let moods = &app.state.moods;
    let constraints = if moods.is_empty() {
        vec![Constraint::Length(4), Constraint::Min(0)]
    } else {
        vec![
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(RECENT_WINDOW as u16 + 2),
        ]
    };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut buttons = Vec::new();
    for (idx, mood) in MoodLevel::ALL.iter().enumerate() {
        let style = if idx == app.mood_cursor {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        buttons.push(Span::styled(
            format!(" [{}] {} {} ", mood.value(), mood.emoji(), mood.label()),
            style,
        ));
        buttons.push(Span::raw(" "));
    }
    let picker = Paragraph::new(vec![
        Line::from(buttons),
        Line::from(Span::styled(
            "[1-5] log directly  [←→] choose  [Enter] log selection",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(" How are you feeling right now? ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    frame.render_widget(picker, layout[0]);

    if moods.is_empty() {
        let empty = Paragraph::new("No moods logged yet. Pick one above to start tracking.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, layout[1]);
        return;
    }

    let insight = Paragraph::new(app.state.insight())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" 💡 Insights ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(insight, layout[1]);

    let window = moods.chart_window();
    let points: Vec<(f64, f64)> = window
        .iter()
        .enumerate()
        .map(|(idx, entry)| (idx as f64, f64::from(entry.value())))
        .collect();
    let x_max = (window.len().saturating_sub(1)).max(1) as f64;
    let x_labels: Vec<String> = match (window.first(), window.last()) {
        (Some(first), Some(last)) => vec![first.date_label.clone(), last.date_label.clone()],
        _ => Vec::new(),
    };
    let dataset = Dataset::default()
        .name("Mood")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);
    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title(" Mood Trend ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, 6.0])
                .labels(["0", "3", "6"]),
        );
    frame.render_widget(chart, layout[2]);

    let recent: Vec<ListItem> = moods
        .recent_newest_first()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} {:<10}", entry.mood.emoji(), entry.mood.label())),
                Span::styled(
                    format!("{} {}", entry.date_label, entry.time_label),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    let recent_list = List::new(recent).block(
        Block::default()
            .title(" Recent Entries ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(recent_list, layout[3]);
}

fn resource_lines<'a>(title: &'a str, color: Color, items: &[Resource]) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(Span::styled(
        title,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];
    for item in items {
        let mut spans = vec![Span::styled(
            format!("  {}", item.name),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if !item.contact.is_empty() {
            spans.push(Span::raw(format!("  {}", item.contact)));
        }
        if !item.note.is_empty() {
            spans.push(Span::styled(
                format!("  {}", item.note),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines
}

fn render_resources(frame: &mut Frame, area: Rect, scroll: u16) {
    let mut lines = resource_lines("🆘 Crisis Support (24/7)", Color::Red, &CRISIS_LINES);
    lines.extend(resource_lines(
        "💙 Mental Health Support",
        Color::Blue,
        &SUPPORT_LINES,
    ));
    lines.push(Line::from(Span::styled(
        "🌱 Self-Care Tips",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )));
    lines.extend(SELF_CARE_TIPS.iter().map(|tip| Line::from(format!("  • {tip}"))));
    lines.push(Line::from(""));
    lines.extend(resource_lines(
        "🔍 Find Professional Help",
        Color::Magenta,
        &PROFESSIONAL_HELP,
    ));

    let resources = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title(" Resources [↑↓] scroll ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(resources, area);
}

fn render_crisis_modal(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 50, area);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled("🆘 Immediate Help Available", bold.fg(Color::Red))),
        Line::from(""),
        Line::from(CRISIS_ALERT_INTRO),
        Line::from(""),
    ];
    lines.extend(CRISIS_LINES.iter().map(|line| {
        Line::from(vec![
            Span::styled(format!("{}: ", line.name), bold),
            Span::raw(line.contact),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[Enter] ", bold.fg(Color::White)),
        Span::styled(CRISIS_ALERT_ACK, Style::default().fg(Color::Green)),
    ]));

    let modal = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Crisis Support ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(modal, popup);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let hint_style = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled(" [Tab]", key_style),
        Span::styled(" switch ", hint_style),
        Span::styled("[Ctrl-C]", key_style),
        Span::styled(" quit ", hint_style),
    ];
    if app.state.view != ViewState::Chat {
        spans.push(Span::styled("[q]", key_style));
        spans.push(Span::styled(" quit ", hint_style));
    }
    spans.push(Span::styled(
        format!("| {FOOTER} "),
        Style::default().fg(Color::Red),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
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
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use wellness_core::ReplySource;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.on_key(press(KeyCode::Char(c)));
        }
    }

    fn acknowledged() -> App {
        let mut app = App::new("Wellness AI");
        app.on_key(press(KeyCode::Enter));
        app
    }

    fn screen_text(app: &App) -> String {
        screen_text_sized(app, 120, 40)
    }

    fn screen_text_sized(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| ui(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn enter_acknowledges_disclaimer() {
        let mut app = App::new("Wellness AI");
        assert_eq!(app.state.view, ViewState::Disclaimer);
        app.on_key(press(KeyCode::Tab));
        assert_eq!(app.state.view, ViewState::Disclaimer);
        app.on_key(press(KeyCode::Enter));
        assert_eq!(app.state.view, ViewState::Chat);
    }

    #[test]
    fn tab_and_back_tab_cycle_screens() {
        let mut app = acknowledged();
        app.on_key(press(KeyCode::Tab));
        assert_eq!(app.state.view, ViewState::Mood);
        app.on_key(press(KeyCode::Tab));
        assert_eq!(app.state.view, ViewState::Resources);
        app.on_key(press(KeyCode::Tab));
        assert_eq!(app.state.view, ViewState::Chat);
        app.on_key(press(KeyCode::BackTab));
        assert_eq!(app.state.view, ViewState::Resources);
    }

    #[test]
    fn typing_and_enter_submits_trimmed_message() {
        let mut app = acknowledged();
        type_text(&mut app, " hello ");
        let effect = app.on_key(press(KeyCode::Enter));

        assert_eq!(effect, Some(Effect::RequestReply("hello".into())));
        assert!(app.input.is_empty());
        assert!(app.state.loading);
    }

    #[test]
    fn enter_is_disabled_while_loading_or_blank() {
        let mut app = acknowledged();
        type_text(&mut app, "   ");
        assert_eq!(app.on_key(press(KeyCode::Enter)), None);
        assert_eq!(app.input, "   ");

        app.input.clear();
        type_text(&mut app, "first");
        app.on_key(press(KeyCode::Enter));
        type_text(&mut app, "second");
        assert_eq!(app.on_key(press(KeyCode::Enter)), None);
        assert_eq!(app.input, "second");
        assert_eq!(app.state.messages.len(), 1);
    }

    #[test]
    fn q_is_text_in_chat_but_quits_elsewhere() {
        let mut app = acknowledged();
        type_text(&mut app, "q");
        assert!(!app.should_quit);
        assert_eq!(app.input, "q");

        app.on_key(press(KeyCode::Tab));
        app.on_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_from_chat() {
        let mut app = acknowledged();
        app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert!(app.input.is_empty());
    }

    #[test]
    fn backspace_edits_input() {
        let mut app = acknowledged();
        type_text(&mut app, "hey");
        app.on_key(press(KeyCode::Backspace));
        assert_eq!(app.input, "he");
    }

    #[test]
    fn digit_keys_log_moods_on_mood_screen() {
        let mut app = acknowledged();
        app.on_key(press(KeyCode::Tab));
        app.on_key(press(KeyCode::Char('4')));
        app.on_key(press(KeyCode::Char('9')));

        assert_eq!(app.state.moods.len(), 1);
        assert_eq!(app.state.moods.entries()[0].mood, MoodLevel::Good);
        assert_eq!(app.state.messages.len(), 1);
        assert_eq!(app.state.messages[0].role, Role::SystemNotice);
    }

    #[test]
    fn arrow_selection_logs_on_enter() {
        let mut app = acknowledged();
        app.on_key(press(KeyCode::Tab));
        assert_eq!(app.selected_mood(), MoodLevel::Neutral);

        app.on_key(press(KeyCode::Left));
        app.on_key(press(KeyCode::Left));
        app.on_key(press(KeyCode::Left));
        assert_eq!(app.selected_mood(), MoodLevel::VerySad);
        for _ in 0..10 {
            app.on_key(press(KeyCode::Right));
        }
        assert_eq!(app.selected_mood(), MoodLevel::Great);

        app.on_key(press(KeyCode::Enter));
        assert_eq!(app.state.moods.entries()[0].mood, MoodLevel::Great);
    }

    #[test]
    fn crisis_modal_swallows_keys_until_enter() {
        let mut app = acknowledged();
        type_text(&mut app, "I want to die");
        app.on_key(press(KeyCode::Enter));
        assert!(app.state.crisis_alert);

        app.on_key(press(KeyCode::Tab));
        app.on_key(press(KeyCode::Char('x')));
        assert_eq!(app.state.view, ViewState::Chat);
        assert!(app.input.is_empty());

        app.on_key(press(KeyCode::Enter));
        assert!(!app.state.crisis_alert);
    }

    #[test]
    fn reply_lands_in_transcript() {
        let mut app = acknowledged();
        type_text(&mut app, "hi");
        app.on_key(press(KeyCode::Enter));
        app.on_reply(Reply {
            text: "Hello, I'm glad you reached out.".into(),
            source: ReplySource::Remote,
        });

        assert!(!app.state.loading);
        assert_eq!(app.state.messages.len(), 2);
        assert_eq!(app.state.messages[1].role, Role::Assistant);
    }

    #[test]
    fn disclaimer_screen_renders_limits_and_crisis_numbers() {
        let screen = screen_text(&App::new("Wellness AI"));
        assert!(screen.contains("Important Disclaimer"));
        assert!(screen.contains("988"));
    }

    #[test]
    fn empty_chat_shows_prompt_banner_and_footer() {
        let screen = screen_text(&acknowledged());
        assert!(screen.contains(EMPTY_CHAT_PROMPT));
        assert!(screen.contains("This is not medical advice"));
        assert!(screen.contains("please call 988"));
    }

    #[test]
    fn loading_chat_shows_typing_indicator() {
        let mut app = acknowledged();
        type_text(&mut app, "hello");
        app.on_key(press(KeyCode::Enter));
        let screen = screen_text(&app);
        assert!(screen.contains("Wellness AI is typing..."));
        assert!(screen.contains("Waiting for reply"));
    }

    #[test]
    fn mood_screen_shows_insight_and_recent_entries() {
        let mut app = acknowledged();
        app.on_key(press(KeyCode::Tab));
        for key in ['5', '5', '5'] {
            app.on_key(press(KeyCode::Char(key)));
        }
        let screen = screen_text(&app);
        assert!(screen.contains("Insights"));
        assert!(screen.contains("Recent Entries"));
        assert!(screen.contains("Mood Trend"));
    }

    #[tokio::test]
    async fn spawned_effect_delivers_offline_reply() {
        let resolver = ResponseResolver::new(None, &wellness_core::Persona::default());
        let (tx, mut rx) = mpsc::channel(1);
        spawn_effect(Effect::RequestReply("so tired".into()), &resolver, &tx);

        let reply = rx.recv().await.unwrap();
        assert_eq!(reply.source, ReplySource::Offline);
    }

    fn exchange(app: &mut App, said: &str, reply: &str) {
        type_text(app, said);
        app.on_key(press(KeyCode::Enter));
        app.on_reply(Reply {
            text: reply.into(),
            source: ReplySource::Remote,
        });
    }

    #[test]
    fn wrapped_reply_keeps_its_last_word() {
        let mut app = acknowledged();
        let reply = format!("{} {} {}END", "a".repeat(60), "b".repeat(60), "c".repeat(57));
        exchange(&mut app, "hi", &reply);

        let screen = screen_text_sized(&app, 100, 40);
        assert!(screen.contains(&"c".repeat(57)));
        assert!(screen.contains("END"));
    }

    #[test]
    fn offline_notice_stays_visible_after_long_reply() {
        let mut app = acknowledged();
        let reply = wellness_core::fallback_reply("I feel so anxious about tomorrow");
        exchange(&mut app, "I feel so anxious about tomorrow", &reply);

        let screen = screen_text_sized(&app, 60, 30);
        assert!(screen.contains("Using offline mode"));
    }

    #[test]
    fn chat_scrolls_back_to_earlier_messages() {
        let mut app = acknowledged();
        exchange(&mut app, "very first note", "welcome");
        for i in 0..15 {
            exchange(&mut app, &format!("message {i}"), "ok");
        }
        assert!(!screen_text_sized(&app, 100, 20).contains("very first note"));

        for _ in 0..10 {
            app.on_key(press(KeyCode::PageUp));
        }
        assert!(app.input.is_empty());
        assert!(screen_text_sized(&app, 100, 20).contains("very first note"));

        type_text(&mut app, "back to the bottom");
        app.on_key(press(KeyCode::Enter));
        assert_eq!(app.chat_scroll, 0);
        assert!(!screen_text_sized(&app, 100, 20).contains("very first note"));
    }

    #[test]
    fn up_and_down_adjust_chat_scroll() {
        let mut app = acknowledged();
        app.on_key(press(KeyCode::Up));
        app.on_key(press(KeyCode::Up));
        app.on_key(press(KeyCode::Down));
        assert_eq!(app.chat_scroll, 1);
        app.on_key(press(KeyCode::Down));
        app.on_key(press(KeyCode::Down));
        assert_eq!(app.chat_scroll, 0);
    }

    #[test]
    fn cursor_follows_display_width_of_wide_characters() {
        let mut app = acknowledged();
        type_text(&mut app, "hi😊");

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| ui(frame, &app)).unwrap();
        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!(cursor.x, 1 + 4);
    }
}

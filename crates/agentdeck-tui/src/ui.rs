use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use agentdeck_core::{Message, Tab};
use crate::app::{App, InputMode, GRID_COLUMNS};

/// Preferred height of one agent card, borders included
const CARD_HEIGHT: u16 = 12;

/// Wrap text to fit within a given width, returning multiple lines.
/// Breaks on word boundaries; words longer than the width are split.
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        // Hard-split anything that can never fit on a line
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current_line));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let word_len = word.len();
        if word_len == 0 {
            continue;
        }

        if current_len == 0 {
            current_line = word.into_iter().collect();
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current_line.push(' ');
            current_line.extend(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::replace(&mut current_line, word.into_iter().collect()));
            current_len = word_len;
        }
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// Last `width` characters of an input, so the end being typed stays visible
fn visible_tail(text: &str, width: usize) -> String {
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(width)).collect()
}

/// Label line plus wrapped text for one chat message
fn message_lines(msg: &Message, agent_name: &str, width: usize) -> Vec<Line<'static>> {
    let (label, color, alignment) = if msg.is_from_user() {
        ("You:".to_string(), Color::Cyan, Alignment::Right)
    } else {
        (format!("{}:", agent_name), Color::Yellow, Alignment::Left)
    };

    let mut lines = vec![Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(alignment)];
    for wrapped in wrap_text_to_width(&msg.text, width) {
        lines.push(Line::from(wrapped).alignment(alignment));
    }
    lines
}

/// The `height` lines of a conversation that sit `back` lines above its
/// newest line. Only messages reaching into that window are wrapped, so the
/// cost does not grow with the length of the log.
fn chat_window(
    messages: &[Message],
    agent_name: &str,
    width: usize,
    height: usize,
    back: usize,
    footer: Option<Line<'static>>,
) -> Vec<Line<'static>> {
    let needed = height + back;
    let mut chunks: Vec<Vec<Line<'static>>> = Vec::new();
    let mut collected = 0;

    if let Some(line) = footer {
        chunks.push(vec![line]);
        collected += 1;
    }

    for msg in messages.iter().rev() {
        if collected >= needed {
            break;
        }
        let lines = message_lines(msg, agent_name, width);
        collected += lines.len();
        chunks.push(lines);
    }

    let mut window: Vec<Line<'static>> = chunks.into_iter().rev().flatten().collect();
    if window.len() > needed {
        window.drain(..window.len() - needed);
    }
    window.truncate(height);
    window
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.tab() {
        Tab::Agents => render_agents_tab(app, frame, body_area),
        Tab::Google => render_search_tab(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &mut App, frame: &mut Frame, area: Rect) {
    let header_style = Style::default().bg(Color::DarkGray);
    let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
    let [tabs_area, version_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(version.chars().count() as u16),
    ])
    .areas(area);

    let active = app.tab();
    let mut spans = vec![Span::raw(" ")];
    let mut x = tabs_area.x + 1;

    app.tab_areas.clear();
    for (i, tab) in Tab::all().into_iter().enumerate() {
        let label = format!(" [{}] {} ", i + 1, tab.title());
        let width = label.chars().count() as u16;
        let style = if tab == active {
            Style::default().bg(Color::Cyan).fg(Color::Black).bold()
        } else {
            Style::default().fg(Color::White)
        };

        let visible = width.min(tabs_area.right().saturating_sub(x));
        app.tab_areas.push((tab, Rect::new(x, area.y, visible, 1)));
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
        x = x.saturating_add(width + 1);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(header_style), tabs_area);
    frame.render_widget(
        Paragraph::new(version)
            .style(header_style.fg(Color::Gray))
            .alignment(Alignment::Right),
        version_area,
    );
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.tab() {
        Tab::Agents => " AGENTS ",
        Tab::Google => " SEARCH ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints: &[(&str, &str)] = match (app.tab(), app.input_mode) {
        (Tab::Agents, InputMode::Normal) => &[
            (" h/j/k/l ", " select "),
            (" i ", " type "),
            (" PgUp/PgDn ", " history "),
            (" Tab ", " search tab "),
            (" q ", " quit "),
        ],
        (Tab::Google, InputMode::Normal) => &[
            (" / ", " search "),
            (" Tab ", " agents tab "),
            (" q ", " quit "),
        ],
        (Tab::Agents, InputMode::Editing) => &[(" Enter ", " send "), (" Esc ", " done ")],
        (Tab::Google, InputMode::Editing) => &[(" Enter ", " search "), (" Esc ", " cancel ")],
    };

    let mut spans = vec![
        Span::styled(mode_text, mode_style.add_modifier(Modifier::BOLD)),
        Span::raw(" "),
    ];
    for (key, label) in hints {
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(*label, label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_agents_tab(app: &mut App, frame: &mut Frame, area: Rect) {
    let count = app.card_count();
    let total_rows = count.div_ceil(GRID_COLUMNS).max(1);
    let visible_rows = ((area.height / CARD_HEIGHT) as usize).clamp(1, total_rows);

    app.visible_rows = visible_rows;
    app.ensure_selected_visible();
    app.grid_offset = app.grid_offset.min(total_rows - visible_rows);
    app.card_areas.clear();

    let row_constraints = vec![Constraint::Ratio(1, visible_rows as u32); visible_rows];
    let column_constraints = vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS];

    let rows = Layout::vertical(row_constraints).split(area);
    for (r, row_area) in rows.iter().enumerate() {
        let columns = Layout::horizontal(column_constraints.clone()).split(*row_area);
        for (c, card_area) in columns.iter().enumerate() {
            let index = (app.grid_offset + r) * GRID_COLUMNS + c;
            if index >= count {
                break;
            }
            app.card_areas.push((index, *card_area));
            render_card(app, frame, *card_area, index);
        }
    }
}

fn render_card(app: &App, frame: &mut Frame, area: Rect, index: usize) {
    let card = &app.home.agents()[index];
    let selected = index == app.selected_card;
    let editing = selected && app.input_mode == InputMode::Editing;

    let border_color = if editing {
        Color::Yellow
    } else if selected {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Line::from(format!(" {} ", card.name())).bold().centered());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    let typing = card.is_awaiting_reply().then(|| {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        Line::from(Span::styled(
            format!("typing{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
    });

    let back = app.card_scroll.get(index).copied().unwrap_or(0) as usize;
    let lines = chat_window(
        card.messages(),
        card.name(),
        chat_area.width as usize,
        chat_area.height as usize,
        back,
        typing,
    );
    frame.render_widget(Paragraph::new(Text::from(lines)), chat_area);

    let prompt_width = input_area.width.saturating_sub(2) as usize;
    let input_line = if card.input.is_empty() && !editing {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::DarkGray)),
            Span::styled("Type your message...", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(border_color)),
            Span::styled(
                visible_tail(&card.input, prompt_width.saturating_sub(1)),
                Style::default().fg(Color::Cyan),
            ),
        ])
    };
    frame.render_widget(Paragraph::new(input_line), input_area);

    if editing {
        let typed = card.input.chars().count().min(prompt_width.saturating_sub(1)) as u16;
        frame.set_cursor_position((input_area.x + 2 + typed, input_area.y));
    }
}

fn render_search_tab(app: &App, frame: &mut Frame, area: Rect) {
    let Some(tab) = app.home.search() else {
        return;
    };
    let editing = app.input_mode == InputMode::Editing;

    // Layout: search input at top, status line, results below
    let [input_area, status_area, results_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing { Color::Yellow } else { Color::DarkGray }))
        .title(" Search Google ");

    let inner_width = input_area.width.saturating_sub(2) as usize;
    let input = if tab.query.is_empty() && !editing {
        Paragraph::new("Search Google...").style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(visible_tail(&tab.query, inner_width.saturating_sub(1)))
            .style(Style::default().fg(Color::Cyan))
    };
    let input = input.block(input_block);

    frame.render_widget(input, input_area);

    // Show cursor when editing
    if editing {
        let typed = tab.query.chars().count().min(inner_width.saturating_sub(1)) as u16;
        frame.set_cursor_position((input_area.x + typed + 1, input_area.y + 1));
    }

    if tab.is_loading() {
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        let status = Paragraph::new(format!("Searching{}", dots))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        frame.render_widget(status, status_area);
    } else if let Some(error) = tab.error() {
        let status = Paragraph::new(error)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        frame.render_widget(status, status_area);
    }

    if tab.results().is_empty() {
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for result in tab.results() {
        lines.push(Line::from(Span::styled(
            result.title.as_str(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
        lines.push(Line::from(Span::styled(
            result.link.as_str(),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(Span::styled(
            result.snippet.as_str(),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::default());
    }

    let results_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Results ({}) ", tab.results().len()));

    let results = Paragraph::new(Text::from(lines))
        .block(results_block)
        .wrap(Wrap { trim: true });

    frame.render_widget(results, results_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdeck_core::{DemoEvent, Home, Scheduler, Settings};
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn app() -> App {
        let (scheduler, _rx) = Scheduler::channel();
        App::new(Home::new(Settings::default()), scheduler)
    }

    fn deliver_to_first_card(app: &mut App, message: Message) {
        let mount = app.home.mount_id();
        app.apply_demo_event(DemoEvent::AgentReply { mount, card: 0, message });
    }

    #[test]
    fn test_wrap_on_word_boundaries() {
        let lines = wrap_text_to_width("the quick brown fox", 10);
        assert_eq!(lines, vec!["the quick", "brown fox"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap_text_to_width("abcdefghij xy", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn test_wrap_empty_text_keeps_one_line() {
        assert_eq!(wrap_text_to_width("", 8), vec![String::new()]);
    }

    #[test]
    fn test_visible_tail_keeps_end() {
        assert_eq!(visible_tail("hello world", 5), "world");
        assert_eq!(visible_tail("hi", 5), "hi");
    }

    #[test]
    fn test_render_agents_grid() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();

        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("[1] AI Agents"));
        assert!(text.contains("GPT-4 Turbo"));
        assert_eq!(app.visible_rows, 3);
        assert_eq!(app.card_areas.len(), 12);
        assert_eq!(app.tab_areas.len(), 2);
    }

    #[test]
    fn test_messages_are_labelled_by_sender() {
        let mut app = app();
        deliver_to_first_card(&mut app, Message::user("hello there"));
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();

        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("GPT-4 Turbo:"));
        assert!(text.contains("You:"));
        assert!(!text.contains("AI:"));
    }

    #[test]
    fn test_chat_window_takes_lines_from_the_end() {
        let messages: Vec<Message> = (0..10).map(|i| Message::agent(format!("m{}", i))).collect();

        let newest: Vec<String> = chat_window(&messages, "Bot", 20, 4, 0, None)
            .iter()
            .map(line_text)
            .collect();
        assert_eq!(newest, vec!["Bot:", "m8", "Bot:", "m9"]);

        let scrolled: Vec<String> = chat_window(&messages, "Bot", 20, 4, 2, None)
            .iter()
            .map(line_text)
            .collect();
        assert_eq!(scrolled, vec!["Bot:", "m7", "Bot:", "m8"]);

        // Scrolling past the top stops at the first message
        let top: Vec<String> = chat_window(&messages, "Bot", 20, 4, 500, None)
            .iter()
            .map(line_text)
            .collect();
        assert_eq!(top, vec!["Bot:", "m0", "Bot:", "m1"]);
    }

    #[test]
    fn test_typing_line_sits_below_newest_message() {
        let messages = vec![Message::user("hi")];
        let typing = Some(Line::from("typing."));

        let lines: Vec<String> = chat_window(&messages, "Bot", 20, 3, 0, typing)
            .iter()
            .map(line_text)
            .collect();
        assert_eq!(lines, vec!["You:", "hi", "typing."]);
    }

    #[test]
    fn test_very_long_history_still_shows_newest_message() {
        let mut app = app();
        for i in 0..33_000 {
            deliver_to_first_card(&mut app, Message::agent(format!("old {}", i)));
        }
        deliver_to_first_card(&mut app, Message::agent("NEWEST"));
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();

        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        assert!(buffer_text(&terminal).contains("NEWEST"));
    }

    #[test]
    fn test_version_is_right_aligned_in_header() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();

        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let header: String = buffer_text(&terminal).chars().take(120).collect();
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        assert!(header.trim_end().ends_with(&version));
        assert!(header.trim_start().starts_with("[1] AI Agents"));
    }

    #[test]
    fn test_render_empty_search_tab() {
        let (scheduler, _rx) = Scheduler::channel();
        let mut app = App::new(Home::new(Settings::default()), scheduler);
        app.select_tab(Tab::Google);
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();

        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Search Google..."));
        assert!(app.card_areas.is_empty());
    }
}

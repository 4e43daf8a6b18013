use kumtanesi_core::{
    format_message, ChatRole, MessageElement, MessageTable, NotificationLevel, RenderSurface,
    Segment,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use crate::app::App;

const SPINNER: [&str; 3] = ["◐", "◓", "◑"];

fn segment_span(segment: &Segment) -> Span<'static> {
    let mut style = Style::default();
    if segment.style.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if segment.style.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if segment.style.code {
        style = style.fg(Color::Green).bg(Color::Black);
    }
    Span::styled(segment.text.clone(), style)
}

/// Role line plus the formatted body of one element
fn element_lines(element: &MessageElement, messages: &MessageTable) -> Vec<Line<'static>> {
    let (label, color) = match element.role() {
        ChatRole::User => (messages.user_label.as_str(), Color::Cyan),
        ChatRole::Assistant if element.is_error => (messages.assistant_label.as_str(), Color::Red),
        ChatRole::Assistant => (messages.assistant_label.as_str(), Color::Yellow),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{}:", label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}", element.message.timestamp),
            Style::default().fg(Color::DarkGray),
        ),
    ])];

    for line in format_message(element.content()).lines {
        let mut spans: Vec<Span<'static>> = line.segments.iter().map(segment_span).collect();
        if element.is_error {
            spans = spans.into_iter().map(|s| s.fg(Color::Red)).collect();
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let input_lines = app.pane().input.split('\n').count().clamp(1, 4) as u16;

    // Main layout: header, chat, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(input_lines + 2),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);

    if app.show_clear_confirm {
        render_clear_confirm(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let header = Line::from(vec![
        Span::styled(
            " KumTanesi ",
            Style::default().bg(Color::Yellow).fg(Color::Black).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {} ", app.base_url), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store chat area dimensions for scroll calculations (inner size minus borders)
    {
        let pane = app.pane_mut();
        let resized = pane.chat_height != area.height.saturating_sub(2)
            || pane.chat_width != area.width.saturating_sub(2);
        pane.chat_height = area.height.saturating_sub(2);
        pane.chat_width = area.width.saturating_sub(2);
        if resized {
            pane.scroll_to_bottom();
        }
    }

    let pane = app.pane();
    let messages = app.controller.messages();

    let mut lines: Vec<Line> = Vec::new();
    for element in pane.elements() {
        lines.extend(element_lines(element, messages));
    }

    if pane.typing {
        lines.push(Line::from(Span::styled(
            format!("{}:", messages.assistant_label),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((pane.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("{}{}", messages.typing, dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: false })
        .scroll((pane.scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let pane = app.pane();

    let (border_color, title) = if pane.form_enabled {
        let color = if pane.input_focused { Color::Yellow } else { Color::DarkGray };
        (color, " Mesaj (Enter) ".to_string())
    } else {
        let spinner = SPINNER[pane.animation_frame as usize % SPINNER.len()];
        (Color::DarkGray, format!(" {} ", spinner))
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let text_style = if pane.form_enabled {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    // Keep the line holding the cursor visible
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let before_cursor: String = pane.input.chars().take(pane.cursor).collect();
    let cursor_row = before_cursor.matches('\n').count();
    let cursor_col = before_cursor.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0);
    let row_offset = (cursor_row + 1).saturating_sub(inner_height.max(1));
    let col_offset = if inner_width == 0 {
        0
    } else {
        (cursor_col + 1).saturating_sub(inner_width)
    };

    let visible: Vec<Line> = pane
        .input
        .split('\n')
        .skip(row_offset)
        .map(|line| Line::from(line.chars().skip(col_offset).collect::<String>()))
        .collect();

    let input = Paragraph::new(Text::from(visible))
        .style(text_style)
        .block(input_block);

    frame.render_widget(input, area);

    if pane.form_enabled && pane.input_focused && !app.show_clear_confirm {
        frame.set_cursor_position((
            area.x + (cursor_col - col_offset) as u16 + 1,
            area.y + (cursor_row - row_offset) as u16 + 1,
        ));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let pane = app.pane();

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().fg(Color::White);

    let mut spans = vec![
        Span::styled(" Enter ", key_style),
        Span::styled(" send ", label_style),
        Span::styled(" Alt+Enter ", key_style),
        Span::styled(" newline ", label_style),
        Span::styled(" ↑/↓ ", key_style),
        Span::styled(" scroll ", label_style),
        Span::styled(" Ctrl+L ", key_style),
        Span::styled(" clear ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" quit ", label_style),
    ];

    let count = pane.char_count();
    let counter = match app.controller.max_message_chars() {
        Some(limit) => {
            let color = if count > limit { Color::Red } else { Color::DarkGray };
            Span::styled(format!("  {}/{}", count, limit), Style::default().fg(color))
        }
        None => Span::styled(format!("  {}", count), Style::default().fg(Color::DarkGray)),
    };
    spans.push(counter);

    if let Some(toast) = pane.latest_toast() {
        let (fg, bg) = match toast.notification.level {
            NotificationLevel::Info => (Color::Black, Color::Cyan),
            NotificationLevel::Success => (Color::Black, Color::Green),
            NotificationLevel::Warning => (Color::Black, Color::Yellow),
            NotificationLevel::Danger => (Color::White, Color::Red),
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(" {} ", toast.notification.text),
            Style::default().fg(fg).bg(bg),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_clear_confirm(app: &App, frame: &mut Frame, area: Rect) {
    let prompt = &app.controller.messages().clear_confirm;

    // Calculate popup size and position (centered)
    let popup_width = 50.min(area.width.saturating_sub(4));
    let popup_height = 5.min(area.height.saturating_sub(2));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" (y/n) ");

    let popup = Paragraph::new(prompt.as_str())
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(popup, popup_area);
}

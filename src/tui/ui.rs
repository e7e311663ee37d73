use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, NotificationKind};
use crate::tui::InputMode;

pub fn draw(frame: &mut Frame, app: &App) {
    // Main horizontal split: summarizer on the left, saved list on the right
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(frame.area());

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(1), // Success banner
            Constraint::Length(3), // URL input
            Constraint::Min(0),    // Summary + translation
            Constraint::Length(1), // Status line
        ])
        .split(main_chunks[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search box
            Constraint::Min(0),    // Saved summaries
            Constraint::Length(1), // Key hints
        ])
        .split(main_chunks[1]);

    render_header(frame, app, left_chunks[0]);
    render_banner(frame, app, left_chunks[1]);
    render_url_input(frame, app, left_chunks[2]);
    render_result(frame, app, left_chunks[3]);
    render_notification(frame, app, left_chunks[4]);

    render_search(frame, app, right_chunks[0]);
    render_saved_list(frame, app, right_chunks[1]);
    render_hints(frame, app, right_chunks[2]);

    match app.input_mode {
        InputMode::Token => render_token_input(frame, app),
        InputMode::ConfirmDelete => render_delete_confirm(frame, app),
        _ => {}
    }

    if app.show_help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let user = match (&app.current_user, app.sign_in_enabled()) {
        (Some(user), _) => format!(" Signed in as {}", user.display_name()),
        (None, true) => " Not signed in (l: sign in)".to_string(),
        (None, false) => " Local mode".to_string(),
    };

    let block = Block::default()
        .title(" Nexium Summarizer ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(user).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_banner(frame: &mut Frame, app: &App, area: Rect) {
    if !app.banner_visible() {
        return;
    }
    let paragraph = Paragraph::new(" ✅ Blog summarized and saved successfully!")
        .style(Style::default().fg(Color::Black).bg(Color::Green));
    frame.render_widget(paragraph, area);
}

fn render_url_input(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::Url;
    let border = if editing { Color::Yellow } else { Color::DarkGray };

    let text = if editing {
        format!("{}_", app.url_input)
    } else if app.url_input.is_empty() {
        "Press i to enter a blog URL (1/2: demo URLs)".to_string()
    } else {
        app.url_input.clone()
    };

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .title(" 🔗 Blog URL ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(paragraph, area);
}

fn render_result(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" 📝 AI Summary ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let lines = if app.is_submitting {
        vec![Line::from(format!("{} Summarizing...", app.spinner()))]
    } else if let Some(result) = &app.last_result {
        vec![
            Line::from(result.summary.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "🌐 Urdu Translation:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(result.urdu.clone()),
        ]
    } else {
        vec![Line::from(Span::styled(
            "Start by entering a blog URL and hitting Enter!",
            Style::default().fg(Color::DarkGray),
        ))]
    };

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_notification(frame: &mut Frame, app: &App, area: Rect) {
    let Some(notification) = &app.notification else {
        return;
    };

    let color = match notification.kind {
        NotificationKind::Success => Color::Green,
        NotificationKind::Warning => Color::Yellow,
        NotificationKind::Error => Color::Red,
    };

    let paragraph =
        Paragraph::new(notification.message.as_str()).style(Style::default().fg(color));
    frame.render_widget(paragraph, area);
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let searching = app.input_mode == InputMode::Search;
    let border = if searching { Color::Yellow } else { Color::DarkGray };
    let text = if searching {
        format!("{}_", app.search_query)
    } else {
        app.search_query.clone()
    };

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .title(" / Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(paragraph, area);
}

fn render_saved_list(frame: &mut Frame, app: &App, area: Rect) {
    let summaries = app.filtered_summaries();

    let items: Vec<ListItem> = summaries
        .iter()
        .map(|summary| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    summary.url.as_str(),
                    Style::default().fg(Color::Blue),
                )),
                Line::from(Span::styled(
                    summary.summary.as_str(),
                    Style::default().fg(Color::White),
                )),
            ])
        })
        .collect();

    let title = format!(" 📚 Saved Summaries ({}) ", summaries.len());
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !summaries.is_empty() {
        state.select(Some(app.selected_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_hints(frame: &mut Frame, app: &App, area: Rect) {
    let hints = if app.writes_enabled() {
        "i:url  Enter:summarize  j/k:nav  d:delete  /:search  ?:help  q:quit"
    } else {
        "Sign in to summarize or delete  l:sign in  /:search  ?:help  q:quit"
    };

    let paragraph = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_token_input(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 20, frame.area());

    let block = Block::default()
        .title(" Paste access token from the sign-in page ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    // Tokens are secrets; only show how much has been pasted
    let input_text = format!("> {}_", "•".repeat(app.token_input.chars().count().min(40)));
    let paragraph = Paragraph::new(input_text).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_delete_confirm(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 20, frame.area());
    let url = app
        .selected_summary()
        .map(|s| s.url.as_str())
        .unwrap_or_default();

    let block = Block::default()
        .title(" Delete summary? ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(format!("{url}\n\ny: delete   n: keep"))
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        "",
        " Summarize:",
        "   i        Edit blog URL",
        "   1 / 2    Use a demo URL",
        "   Enter    Summarize and save",
        "",
        " Saved summaries:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   /        Search url and summary",
        "   Esc      Clear search",
        "   d        Delete summary",
        "   o        Open in browser",
        "   r        Reload list",
        "",
        " Account:",
        "   l        Sign in",
        "   x        Sign out",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

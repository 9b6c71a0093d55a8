//! Ratatui drawing for both client variants. Pure: reads state, draws, nothing else.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::core::view::{Area, Outcome, ViewState};
use crate::practice::session::PracticeView;

fn input_block(title: &str, enabled: bool) -> Block<'_> {
    let style = if enabled {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default().borders(Borders::ALL).title(title).border_style(style)
}

fn history_list<'a>(title: &'a str, rows: &'a [String]) -> List<'a> {
    let items: Vec<ListItem> = rows.iter().map(|r| ListItem::new(r.as_str())).collect();
    List::new(items).block(Block::default().borders(Borders::ALL).title(title))
}

fn message_style(message: &str) -> Style {
    if message.starts_with("Error:") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    }
}

fn draw_header(f: &mut Frame, area: Rect, title: &str, game_id: Option<&str>, indicator: &str) {
    let mut text = title.to_string();
    if let Some(id) = game_id {
        text.push('\n');
        text.push_str(id);
    }
    let header = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {indicator} "))
                .title_style(Style::default().add_modifier(Modifier::BOLD)),
        );
    f.render_widget(header, area);
}

pub fn draw_realtime(f: &mut Frame, view: &ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(
        f,
        chunks[0],
        "BULLS & COWS",
        view.game_id_label.as_deref(),
        &view.turn_indicator,
    );

    f.render_widget(
        Paragraph::new(view.message.as_str())
            .style(message_style(&view.message))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" MESSAGE ")),
        chunks[1],
    );

    match view.area {
        Area::Setup => {
            let text = "create [secret]          start a match (secret: 3 different digits)\n\
                        join <game-id> <secret>  join a friend's match";
            f.render_widget(
                Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" SETUP ")),
                chunks[2],
            );
        }
        Area::Game => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[2]);
            f.render_widget(history_list(" MY GUESSES ", &view.my_guesses), columns[0]);

            let opponent_title = match &view.opponent_secret_label {
                Some(label) => format!(" OPPONENT'S GUESSES | {label} "),
                None => " OPPONENT'S GUESSES ".to_string(),
            };
            f.render_widget(history_list(&opponent_title, &view.opponent_guesses), columns[1]);
        }
    }

    let (title, enabled) = match view.area {
        Area::Setup => (" SETUP INPUT ", view.setup_enabled),
        Area::Game => (" GUESS ", view.guess_enabled),
    };
    f.render_widget(
        Paragraph::new(format!("> {}", view.input)).block(input_block(title, enabled)),
        chunks[3],
    );

    let footer = match view.outcome {
        Some(Outcome::Won) => "You won! Type 'new' for another match, Esc to quit.",
        Some(Outcome::Lost) => "Type 'new' for another match, Esc to quit.",
        None => "Enter to submit | 'help' for commands | Esc to quit",
    };
    f.render_widget(
        Paragraph::new(footer)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray)),
        chunks[4],
    );
}

pub fn draw_practice(f: &mut Frame, view: &PracticeView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let indicator = if view.won { "Solved" } else { "Practice" };
    draw_header(f, chunks[0], "BULLS & COWS", view.game_id_label.as_deref(), indicator);

    f.render_widget(
        Paragraph::new(view.message.as_str())
            .style(message_style(&view.message))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" MESSAGE ")),
        chunks[1],
    );
    f.render_widget(history_list(" GUESSES (newest first) ", &view.history), chunks[2]);
    f.render_widget(
        Paragraph::new(format!("> {}", view.input)).block(input_block(" GUESS ", view.guess_enabled)),
        chunks[3],
    );
    f.render_widget(
        Paragraph::new("Enter to submit | 'new' for a new game | Esc to quit")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray)),
        chunks[4],
    );
}

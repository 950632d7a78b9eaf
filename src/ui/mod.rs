use std::time::{SystemTime, UNIX_EPOCH};

use ratatui::prelude::*;
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::app::Session;
use crate::{Phase, BOARD_H, BOARD_W, MIN_PANE_WIDTH, PLAY_H, PLAY_W};

pub fn draw_game(frame: &mut Frame, session: &Session) {
    let area = frame.size();

    if area.width < MIN_PANE_WIDTH {
        let msg = Paragraph::new(format!("RESIZE PANE (min width: {})", MIN_PANE_WIDTH))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("CRUNCH"));
        frame.render_widget(msg, area);
        return;
    }

    // Outer "cabinet" frame.
    let cabinet = Block::default()
        .title("CRUNCH")
        .border_type(BorderType::Thick)
        .borders(Borders::ALL)
        .title_alignment(Alignment::Left);
    let cabinet_inner = cabinet.inner(area);
    frame.render_widget(cabinet, area);

    let well_w = PLAY_W as u16;
    let well_h = PLAY_H as u16;

    let col_rect = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(well_w),
            Constraint::Min(0),
        ])
        .split(cabinet_inner)[1];

    let info_h = 5u16;
    let controls_h = 5u16;
    let stack = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(info_h),
            Constraint::Length(well_h),
            Constraint::Length(controls_h),
            Constraint::Min(0),
        ])
        .split(col_rect);

    let mut info_rect = stack[1];
    let well_rect = stack[2];
    let mut controls_rect = stack[3];
    // Widen info/controls boxes while keeping them centered in the cabinet.
    let expand = 4u16;
    let max_right = cabinet_inner.x + cabinet_inner.width;
    let new_x = info_rect.x.saturating_sub(expand);
    let mut new_w = info_rect.width.saturating_add(expand * 2);
    if new_x + new_w > max_right {
        new_w = max_right.saturating_sub(new_x);
    }
    info_rect.x = new_x;
    info_rect.width = new_w;
    controls_rect.x = new_x;
    controls_rect.width = new_w;

    draw_info(frame, session, info_rect);
    draw_playfield(frame, session, well_rect);
    draw_controls(frame, controls_rect);
}

fn token_color(value: u8) -> Color {
    match value {
        1 => Color::Red,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Blue,
        5 => Color::Magenta,
        _ => Color::Cyan,
    }
}

fn draw_playfield(frame: &mut Frame, session: &Session, play_rect: Rect) {
    let board = session.game.board();
    let mut lines: Vec<Line> = Vec::with_capacity(PLAY_H);

    lines.push(Line::raw(format!("┌{}┐", "─".repeat(PLAY_W - 2))));
    for y in 0..BOARD_H {
        let mut spans: Vec<Span> = Vec::with_capacity(BOARD_W + 2);
        spans.push(Span::raw("│"));
        for x in 0..BOARD_W {
            let i = y * BOARD_W + x;
            let value = board.get(i).unwrap_or(0);
            // Flagged cells only show between a detection and its clear,
            // but when they do they get the burst glyph.
            let glyph = if board.is_matched(i).unwrap_or(false) {
                "✶ "
            } else if session.selected == Some(i) {
                "◆ "
            } else if value == 0 {
                "  "
            } else {
                "● "
            };
            let mut style = Style::default().fg(token_color(value));
            if session.cursor == i {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if session.selected == Some(i) {
                style = style.add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(glyph, style));
        }
        spans.push(Span::raw("│"));
        lines.push(Line::from(spans));
    }
    lines.push(Line::raw(format!("└{}┘", "═".repeat(PLAY_W - 2))));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Left);
    frame.render_widget(paragraph, play_rect);

    if session.game_over() {
        let overlay_w = (PLAY_W as u16 + 6).max(16);
        let overlay_h = 5u16;
        let popup = Rect {
            x: play_rect.x + (play_rect.width.saturating_sub(overlay_w)) / 2,
            y: play_rect.y + (play_rect.height.saturating_sub(overlay_h)) / 2,
            width: overlay_w,
            height: overlay_h,
        };
        let overlay = Paragraph::new("GAME OVER\nno moves left\nPress q")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(overlay, popup);
    }
}

fn draw_info(frame: &mut Frame, session: &Session, area: Rect) {
    let status = if session.game_over() {
        "OVER".to_string()
    } else if session.game.phase() == Phase::Resolving {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        if (millis / 300) % 2 == 0 {
            "CASCADE".to_string()
        } else {
            "       ".to_string()
        }
    } else {
        "IDLE".to_string()
    };

    let flash = if session.flash_frames > 0 {
        format!("+{}", session.last_matches)
    } else {
        String::new()
    };

    let block = Block::default().title("INFO").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner);

    let left = Paragraph::new(vec![
        Line::raw(format!("{:<7} {}", "SCORE:", session.game.score())),
        Line::raw(format!("{:<7} {}", "STATUS:", status)),
    ])
    .alignment(Alignment::Left);
    frame.render_widget(left, cols[0]);

    let right = Paragraph::new(vec![Line::raw(flash)]).alignment(Alignment::Left);
    frame.render_widget(right, cols[1]);
}

fn draw_controls(frame: &mut Frame, area: Rect) {
    let block = Block::default().title("CONTROLS").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner);

    let left = Paragraph::new(vec![
        Line::raw("←↑↓→ cursor"),
        Line::raw("enter/space pick"),
    ])
    .alignment(Alignment::Left);
    frame.render_widget(left, cols[0]);

    let right = Paragraph::new(vec![
        Line::raw("pick 2 to swap"),
        Line::raw("q/esc quit"),
    ])
    .alignment(Alignment::Left);
    frame.render_widget(right, cols[1]);
}

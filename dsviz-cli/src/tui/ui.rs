//! UI rendering using ratatui

use dsviz_core::array_game::Phase;
use dsviz_core::graph::EdgeStyle;
use dsviz_core::hash_table::{Field, Operation};
use dsviz_core::maze::{Cell, Pos};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use super::app::{App, MainTab, Mode};

/// Primary accent color
const ACCENT: Color = Color::Cyan;
/// Secondary color for less important elements
const SECONDARY: Color = Color::DarkGray;
/// Highlight color for selected items
const HIGHLIGHT: Color = Color::Yellow;
/// Success color
const SUCCESS: Color = Color::Green;
/// Failure / worst-choice color
const DANGER: Color = Color::Red;
/// Dim text color
const DIM: Color = Color::Rgb(100, 100, 100);

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab header
            Constraint::Min(10),   // Content area
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0]);

    match app.main_tab {
        MainTab::Array => render_array(frame, app, chunks[1]),
        MainTab::Hash => render_hash(frame, app, chunks[1]),
        MainTab::Maze => render_maze(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);

    if app.help_text.is_some() {
        render_help_overlay(frame, app);
    }
}

/// Render the tab header
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<String> = MainTab::ALL
        .iter()
        .map(|tab| format!("{}:{}", tab.index() + 1, tab.title()))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(" dsviz ")
                .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(SECONDARY)),
        )
        .select(app.main_tab.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}

fn panel(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .title(title.into())
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
}

// === Array game ===

fn render_array(frame: &mut Frame, app: &App, area: Rect) {
    let game = &app.array;
    let block = panel(" Sushi Array ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Stats
            Constraint::Length(2), // Target + message
            Constraint::Length(3), // Slots + indices
            Constraint::Min(0),    // Hints
        ])
        .split(inner);

    let hearts = "♥ ".repeat(game.lives() as usize);
    let stats = Line::from(vec![
        Span::styled("Score: ", Style::default().fg(DIM)),
        Span::styled(game.score().to_string(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled("Streak: ", Style::default().fg(DIM)),
        Span::styled(game.streak().to_string(), Style::default().fg(SUCCESS)),
        Span::raw("   "),
        Span::styled("Lives: ", Style::default().fg(DIM)),
        Span::styled(hearts, Style::default().fg(DANGER)),
        Span::raw("   "),
        Span::styled("Time: ", Style::default().fg(DIM)),
        Span::styled(format!("{}s", game.time_left()), time_style(game.time_left())),
    ]);
    frame.render_widget(Paragraph::new(stats), chunks[0]);

    let target = match game.target() {
        Some(target) => Line::from(vec![
            Span::styled("Place ", Style::default().fg(DIM)),
            Span::styled(
                format!("{} {}", target.dish.symbol, target.dish.name),
                Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" at index ", Style::default().fg(DIM)),
            Span::styled(
                format!("[{}]", target.index),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  (+{})", target.dish.points), Style::default().fg(DIM)),
        ]),
        None => Line::from(Span::styled("No order yet", Style::default().fg(DIM))),
    };
    let message = Line::from(Span::styled(game.message().to_string(), Style::default().fg(Color::White)));
    frame.render_widget(Paragraph::new(vec![target, message]), chunks[1]);

    // Every slot is 6 columns wide so the index row lines up under it
    let mut slots = Vec::new();
    let mut indices = Vec::new();
    for (i, slot) in game.slots().iter().enumerate() {
        let symbol = slot.map_or("  ", |dish| dish.symbol);
        let style = if i == game.cursor() && game.is_playing() {
            Style::default().fg(Color::Black).bg(ACCENT).add_modifier(Modifier::BOLD)
        } else if slot.is_some() {
            Style::default().fg(SUCCESS)
        } else {
            Style::default().fg(SECONDARY)
        };
        slots.push(Span::styled(format!("[ {symbol} ]"), style));
        slots.push(Span::raw(" "));

        let index_style = if game.target().is_some_and(|t| t.index == i) {
            Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DIM)
        };
        indices.push(Span::styled(format!("{i:^6}"), index_style));
        indices.push(Span::raw(" "));
    }
    frame.render_widget(
        Paragraph::new(vec![Line::from(slots), Line::from(indices)]),
        chunks[2],
    );

    let hint = match game.phase() {
        Phase::Idle => Line::from(Span::styled(
            "Press s to start serving",
            Style::default().fg(ACCENT),
        )),
        Phase::Playing => Line::from(Span::styled(
            "←/→ move  Space place  x remove",
            Style::default().fg(DIM),
        )),
        Phase::GameOver => Line::from(vec![
            Span::styled("GAME OVER", Style::default().fg(DANGER).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  Final score {}. Press s to play again", game.score()),
                Style::default().fg(Color::White),
            ),
        ]),
    };
    frame.render_widget(Paragraph::new(hint), chunks[3]);
}

fn time_style(seconds: u32) -> Style {
    match seconds {
        0..=5 => Style::default().fg(DANGER).add_modifier(Modifier::BOLD),
        6..=10 => Style::default().fg(HIGHLIGHT),
        _ => Style::default().fg(Color::White),
    }
}

// === Hash table ===

fn render_hash(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Inputs
            Constraint::Length(4), // Collision notice or operation log
            Constraint::Min(4),    // Buckets
        ])
        .split(area);

    render_hash_inputs(frame, app, chunks[0]);
    render_hash_notice(frame, app, chunks[1]);
    render_buckets(frame, app, chunks[2]);
}

fn render_hash_inputs(frame: &mut Frame, app: &App, area: Rect) {
    let hash = &app.hash;
    let editing = app.mode == Mode::Edit;

    let field = |label: &'static str, value: &str, active: bool| -> Vec<Span<'static>> {
        let style = if active {
            Style::default().fg(Color::Black).bg(SUCCESS)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if active { "|" } else { "" };
        vec![
            Span::styled(label, Style::default().fg(DIM)),
            Span::styled(format!(" {value}{cursor} "), style),
            Span::raw("   "),
        ]
    };

    let mut spans = field("Key:", &hash.key_input, editing && hash.field == Field::Key);
    spans.extend(field("Value:", &hash.value_input, editing && hash.field == Field::Value));

    let title = if editing { " Insert [EDIT] " } else { " Insert (i to edit) " };
    let border = if editing { SUCCESS } else { SECONDARY };
    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(border).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_hash_notice(frame: &mut Frame, app: &App, area: Rect) {
    let hash = &app.hash;

    if let Some(collision) = hash.collision() {
        let lines = vec![
            Line::from(Span::styled(
                format!(
                    "Pod {} already contains: {}",
                    collision.index,
                    collision.existing_keys.join(", ")
                ),
                Style::default().fg(Color::White),
            )),
            Line::from(Span::styled(
                format!(
                    "New key \"{}\" hashed to the same location: {}",
                    collision.new_key, collision.trace
                ),
                Style::default().fg(Color::White),
            )),
        ];
        let block = Block::default()
            .title(" ⚡ Collision Detected! ⚡ ")
            .title_style(Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(HIGHLIGHT));
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
        return;
    }

    let lines = match hash.visible_operation() {
        Some(Operation::Insert { index, key, value, trace, updated }) => vec![
            Line::from(Span::styled(
                format!(
                    "{} \"{key}\" = \"{value}\" into pod {index}",
                    if *updated { "Updated" } else { "Inserted" }
                ),
                Style::default().fg(SUCCESS),
            )),
            Line::from(Span::styled(trace.to_string(), Style::default().fg(DIM))),
        ],
        Some(Operation::Delete { index, key }) => vec![Line::from(Span::styled(
            format!("Deleted \"{key}\" from pod {index}"),
            Style::default().fg(DANGER),
        ))],
        None => vec![Line::from(Span::styled(
            "hash(key) = sum of character codes % buckets",
            Style::default().fg(DIM),
        ))],
    };

    let block = Block::default()
        .title(" Last operation ")
        .title_style(Style::default().fg(SECONDARY))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SECONDARY));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_buckets(frame: &mut Frame, app: &App, area: Rect) {
    let table = app.hash.table();
    let highlighted = app.hash.highlighted();
    let selected = app.hash_selected_entry();

    let items: Vec<ListItem> = (0..table.bucket_count())
        .map(|index| {
            let is_hot = highlighted == Some(index);
            let label_style = if is_hot {
                Style::default().fg(Color::Black).bg(HIGHLIGHT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(ACCENT)
            };
            let mut spans = vec![Span::styled(format!(" [{index}] "), label_style), Span::raw(" ")];

            match table.bucket(index) {
                Some(chain) => {
                    for (n, entry) in chain.iter().enumerate() {
                        if n > 0 {
                            spans.push(Span::styled(" → ", Style::default().fg(DIM)));
                        }
                        let is_selected = selected
                            .as_ref()
                            .is_some_and(|(bucket, key)| *bucket == index && *key == entry.key);
                        let style = if is_selected && app.mode == Mode::Normal {
                            Style::default().fg(Color::Black).bg(ACCENT)
                        } else if chain.len() > 1 {
                            Style::default().fg(HIGHLIGHT)
                        } else {
                            Style::default().fg(Color::White)
                        };
                        spans.push(Span::styled(format!("{}: {}", entry.key, entry.value), style));
                    }
                }
                None => spans.push(Span::styled("(empty pod)", Style::default().fg(DIM))),
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" Pods ({} entries, {} buckets) ", table.len(), table.bucket_count());
    frame.render_widget(List::new(items).block(panel(title)), area);
}

// === Maze ===

/// Width of one rendered cell, not counting the connector after it
const CELL_WIDTH: usize = 7;

fn render_maze(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(30)])
        .split(area);

    let maze = &app.maze;
    let grid = maze.grid();
    let mut lines = Vec::new();

    for y in 0..grid.height() {
        let mut row = Vec::new();
        let mut below = Vec::new();
        for x in 0..grid.width() {
            let pos = Pos::new(x, y);
            row.push(cell_span(app, pos));

            if let Some(right) = grid.neighbor(pos, dsviz_core::Direction::Right) {
                row.push(connector(app, pos, right, "──"));
            }
            match grid.neighbor(pos, dsviz_core::Direction::Down) {
                Some(down) => {
                    let bar = connector(app, pos, down, "│");
                    below.push(Span::styled(format!("{:^CELL_WIDTH$}  ", bar.content), bar.style));
                }
                None => below.push(Span::raw(" ".repeat(CELL_WIDTH + 2))),
            }
        }
        lines.push(Line::from(row));
        if y + 1 < grid.height() {
            lines.push(Line::from(below));
        }
    }

    let title = if maze.is_moving() { " Thorne's Galaxy (moving...) " } else { " Thorne's Galaxy " };
    frame.render_widget(Paragraph::new(lines).block(panel(title)), chunks[0]);

    render_maze_sidebar(frame, app, chunks[1]);
}

fn cell_span(app: &App, pos: Pos) -> Span<'static> {
    let maze = &app.maze;
    let Some(cell) = maze.grid().cell(pos) else {
        return Span::raw(" ".repeat(CELL_WIDTH));
    };

    if pos == maze.agent() {
        return Span::styled(
            format!("{:^CELL_WIDTH$}", "◆ you"),
            Style::default().fg(Color::Black).bg(ACCENT).add_modifier(Modifier::BOLD),
        );
    }

    let label = match cell {
        Cell::Hazard => "░░░░░".to_string(),
        _ => format!("{}{:.2}", cell.as_char(), maze.weight(pos)),
    };
    let style = match cell {
        Cell::Hazard => Style::default().fg(DANGER),
        Cell::Goal => Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD),
        Cell::Start => Style::default().fg(ACCENT),
        Cell::Portal(_) => Style::default().fg(Color::Magenta),
        Cell::Open => Style::default().fg(Color::White),
    };
    Span::styled(format!("{label:^CELL_WIDTH$}"), style)
}

fn connector(app: &App, a: Pos, b: Pos, glyph: &'static str) -> Span<'static> {
    let grid = app.maze.grid();
    let passable = |pos| grid.cell(pos).is_some_and(Cell::is_passable);
    if !passable(a) || !passable(b) {
        return Span::raw(" ".repeat(glyph.chars().count()));
    }
    let style = match app.maze.edge_style(a, b) {
        EdgeStyle::Best => Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD),
        EdgeStyle::Worst => Style::default().fg(DANGER).add_modifier(Modifier::BOLD),
        EdgeStyle::Plain => Style::default().fg(SECONDARY),
    };
    Span::styled(glyph, style)
}

fn render_maze_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let maze = &app.maze;
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Position: ", Style::default().fg(DIM)),
            Span::styled(maze.agent().to_string(), Style::default().fg(ACCENT)),
        ]),
        Line::from(""),
    ];

    if let Some(step) = maze.pending_step() {
        lines.push(Line::from(Span::styled(
            format!("Heading {} to {}", step.best.direction.as_str(), step.best.pos),
            Style::default().fg(ACCENT).add_modifier(Modifier::ITALIC),
        )));
    }

    match maze.last_step() {
        Some(step) => {
            lines.push(Line::from(Span::styled(
                format!("Best: {} {:.3}", step.best.direction.as_str(), step.best.weight),
                Style::default().fg(SUCCESS),
            )));
            if let Some(worst) = step.worst {
                lines.push(Line::from(Span::styled(
                    format!("Worst: {} {:.3}", worst.direction.as_str(), worst.weight),
                    Style::default().fg(DANGER),
                )));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Press Space to move",
            Style::default().fg(DIM),
        ))),
    }

    if maze.at_goal() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "★ Star gate reached!",
            Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD),
        )));
    }

    lines.extend([
        Line::from(""),
        Line::from(Span::styled("Legend", Style::default().fg(DIM).add_modifier(Modifier::BOLD))),
        Line::from(Span::styled("T start  S star gate", Style::default().fg(DIM))),
        Line::from(Span::styled("1-9 portal  ░ asteroids", Style::default().fg(DIM))),
        Line::from(vec![
            Span::styled("── ", Style::default().fg(SUCCESS)),
            Span::styled("best  ", Style::default().fg(DIM)),
            Span::styled("── ", Style::default().fg(DANGER)),
            Span::styled("worst", Style::default().fg(DIM)),
        ]),
    ]);

    let block = Block::default()
        .title(" Navigator ")
        .title_style(Style::default().fg(SECONDARY))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SECONDARY));
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode_indicator = match app.mode {
        Mode::Normal => Span::styled(" NORMAL ", Style::default().bg(ACCENT).fg(Color::Black)),
        Mode::Edit => Span::styled(" EDIT ", Style::default().bg(SUCCESS).fg(Color::Black)),
    };

    let help_text = match (app.mode, app.main_tab) {
        (Mode::Edit, _) => "Esc:exit  Tab:field  Enter:insert",
        (Mode::Normal, MainTab::Array) => "s:start  h/l:move  Space:place  x:remove  ?:help  q:quit",
        (Mode::Normal, MainTab::Hash) => "i:edit  j/k:select  d:delete  ?:help  q:quit",
        (Mode::Normal, MainTab::Maze) => "Space:step  r:reset  ?:help  q:quit",
    };

    let status = app.status_message.as_deref().unwrap_or("");

    let line = Line::from(vec![
        mode_indicator,
        Span::raw(" "),
        Span::styled(help_text, Style::default().fg(DIM)),
        Span::raw(" "),
        Span::styled(status, Style::default().fg(HIGHLIGHT)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if let Some(ref help_text) = app.help_text {
        let height = (help_text.lines().count() + 4).min(area.height.saturating_sub(4) as usize) as u16;
        let width = 70.min(area.width.saturating_sub(4));

        let popup_area = Rect {
            x: (area.width.saturating_sub(width)) / 2,
            y: (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Help (press any key to close) ")
            .title_style(Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(SUCCESS));

        let paragraph = Paragraph::new(help_text.as_str())
            .block(block)
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(Color::White));

        frame.render_widget(paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use dsviz_core::DsvizConfig;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_every_tab_renders() {
        let now = Instant::now();
        let mut app = App::new(&DsvizConfig::default(), Some(3), MainTab::Array).unwrap();
        assert!(draw(&app).contains("Press s to start"));

        app.switch_tab(MainTab::Hash);
        app.hash.insert("cat", "x", now);
        app.hash.insert("act", "y", now);
        let screen = draw(&app);
        assert!(screen.contains("Collision Detected"));
        assert!(screen.contains("cat: x"));

        app.switch_tab(MainTab::Maze);
        assert!(draw(&app).contains("Thorne's Galaxy"));
    }

    #[test]
    fn test_help_overlay_on_tiny_terminal() {
        let mut app = App::new(&DsvizConfig::default(), Some(3), MainTab::Maze).unwrap();
        app.show_help(super::super::event::help_text());
        let mut terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
    }
}

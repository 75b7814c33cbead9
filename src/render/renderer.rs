use std::borrow::Cow;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::{Cell, Grid, Phase, Snapshot};
use crate::metrics::GameMetrics;

/// Terminal columns per board cell
const CELL_COLUMNS: u16 = 2;

/// Draws snapshots. Holds no game state of its own.
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        grid: &Grid,
        snapshot: &Snapshot,
        metrics: &GameMetrics,
        paused: bool,
    ) {
        let [header, game_area, footer] = split_screen(frame.area());

        let stats = self.render_stats(snapshot, metrics, paused);
        frame.render_widget(stats, header);

        let board = board_rect(game_area, grid);
        match snapshot.phase() {
            Phase::Playing => frame.render_widget(self.render_grid(grid, snapshot), board),
            Phase::Lost => frame.render_widget(self.render_game_over(metrics), board),
            Phase::Won => frame.render_widget(self.render_escape(snapshot), board),
        }

        let controls = self.render_controls();
        frame.render_widget(controls, footer);
    }

    /// Board cell under a terminal position, if the position is on the board
    pub fn cell_at(&self, area: Rect, grid: &Grid, column: u16, row: u16) -> Option<Cell> {
        let [_, game_area, _] = split_screen(area);
        let inner = Block::default()
            .borders(Borders::ALL)
            .inner(board_rect(game_area, grid));

        let inside = column >= inner.x
            && column < inner.x + inner.width
            && row >= inner.y
            && row < inner.y + inner.height;
        if !inside {
            return None;
        }

        let cell_size = grid.cell_size();
        let x = i32::from((column - inner.x) / CELL_COLUMNS) * cell_size;
        let y = i32::from(row - inner.y) * cell_size;
        Some(Cell::new(x, y))
    }

    fn render_grid(&self, grid: &Grid, snapshot: &Snapshot) -> Paragraph<'_> {
        let cell_size = grid.cell_size();
        let head = snapshot.head();

        let lines: Vec<Line> = (0..grid.field_rows())
            .map(|row| {
                let spans: Vec<Span> = (0..grid.horizontal_cells())
                    .map(|column| {
                        let cell = Cell::new(column * cell_size, row * cell_size);
                        if Some(cell) == head {
                            bold("██", Color::Cyan)
                        } else if snapshot.snake.contains(&cell) {
                            plain("██", Color::Green)
                        } else if Some(cell) == snapshot.food {
                            bold("██", Color::Red)
                        } else if Some(cell) == snapshot.exit {
                            bold("[]", Color::White)
                        } else if grid.is_wall(cell) {
                            plain("▓▓", Color::Red)
                        } else {
                            Span::raw("  ")
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(
        &self,
        snapshot: &Snapshot,
        metrics: &GameMetrics,
        paused: bool,
    ) -> Paragraph<'_> {
        let best = metrics.high_score.max(snapshot.score);
        let fields = [
            ("SCORE: ", snapshot.score.to_string()),
            ("Best: ", best.to_string()),
            ("Length: ", snapshot.snake.len().to_string()),
            ("Time: ", metrics.format_time()),
        ];

        let mut spans = Vec::new();
        for (label, value) in fields {
            if !spans.is_empty() {
                spans.push(Span::raw("    "));
            }
            spans.push(plain(label, Color::Yellow));
            spans.push(bold(value, Color::White));
        }
        if paused {
            spans.push(Span::raw("    "));
            spans.push(bold("PAUSED", Color::Magenta));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(&self, metrics: &GameMetrics) -> Paragraph<'_> {
        panel(
            vec![
                Line::from(bold("Game Over", Color::Red)),
                Line::from(""),
                Line::from(vec![
                    plain("Best score: ", Color::Yellow),
                    bold(metrics.high_score.to_string(), Color::White),
                ]),
                Line::from(vec![
                    plain("Lasted: ", Color::Yellow),
                    bold(metrics.format_time(), Color::White),
                    plain("   Longest snake: ", Color::Yellow),
                    bold(metrics.longest_snake.to_string(), Color::White),
                ]),
                Line::from(""),
                Line::from(plain("Touch or steer to try again", Color::Gray)),
            ],
            Color::Red,
        )
    }

    fn render_escape(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        panel(
            vec![
                Line::from(bold("You escaped!", Color::Green)),
                Line::from(""),
                Line::from(vec![
                    plain("Final score: ", Color::Yellow),
                    bold(snapshot.score.to_string(), Color::White),
                    plain(format!("   in {} ticks", snapshot.ticks), Color::Yellow),
                ]),
                Line::from(""),
                Line::from(vec![
                    plain("R", Color::Green),
                    plain(" plays again, ", Color::Gray),
                    plain("Q", Color::Red),
                    plain(" quits", Color::Gray),
                ]),
            ],
            Color::Green,
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let keys = [
            ("arrows/WASD/click", Color::Cyan, " turn"),
            ("Space", Color::Magenta, " pause"),
            ("R", Color::Green, " restart"),
            ("Q", Color::Red, " quit"),
        ];

        let mut spans = Vec::new();
        for (key, color, what) in keys {
            if !spans.is_empty() {
                spans.push(Span::raw(" | "));
            }
            spans.push(plain(key, color));
            spans.push(Span::raw(what));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

fn plain<'a>(text: impl Into<Cow<'a, str>>, color: Color) -> Span<'a> {
    Span::styled(text, Style::default().fg(color))
}

fn bold<'a>(text: impl Into<Cow<'a, str>>, color: Color) -> Span<'a> {
    Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

/// Centered message box drawn in place of the board
fn panel(mut lines: Vec<Line<'_>>, border: Color) -> Paragraph<'_> {
    lines.insert(0, Line::from(""));
    Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    )
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn split_screen(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Game area
            Constraint::Length(3), // Footer
        ])
        .split(area);

    [chunks[0], chunks[1], chunks[2]]
}

/// The bordered board, centered in `area` and clipped to it
fn board_rect(area: Rect, grid: &Grid) -> Rect {
    let wanted_width = terminal_len(grid.horizontal_cells())
        .saturating_mul(CELL_COLUMNS)
        .saturating_add(2);
    let wanted_height = terminal_len(grid.field_rows()).saturating_add(2);

    let width = wanted_width.min(area.width);
    let height = wanted_height.min(area.height);

    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Cell count as a terminal length, clamped to what a terminal can address
fn terminal_len(cells: i32) -> u16 {
    u16::try_from(cells.max(0)).unwrap_or(u16::MAX)
}

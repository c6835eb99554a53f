use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameState, Point};
use crate::metrics::GameMetrics;

/// What a single grid cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Head,
    Body,
    Food,
    Empty,
}

/// Which key hints the footer shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Controls {
    Human,
    Watch,
}

pub struct Renderer {
    controls: Controls,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            controls: Controls::Human,
        }
    }

    /// Renderer for watching a trained agent play
    pub fn for_watch() -> Self {
        Self {
            controls: Controls::Watch,
        }
    }

    /// Draw the header, the board (or game over panel) and the footer.
    ///
    /// `status` is an extra header line, e.g. playback speed.
    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        metrics: &GameMetrics,
        status: Option<&str>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(chunks[0], state, metrics, status);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if state.is_alive {
            let grid = self.render_grid(game_area, state);
            frame.render_widget(grid, game_area);
        } else {
            let game_over = self.render_game_over(game_area, state, metrics);
            frame.render_widget(game_over, game_area);
        }

        let controls = self.render_controls(chunks[2]);
        frame.render_widget(controls, chunks[2]);
    }

    /// Classify the cell at `(column, row)`
    pub fn cell_at(state: &GameState, column: i32, row: i32) -> Cell {
        let point = Point::new(column * state.block_size, row * state.block_size);

        if point == state.snake.head() {
            Cell::Head
        } else if state.snake.body.contains(&point) {
            Cell::Body
        } else if point == state.food {
            Cell::Food
        } else {
            Cell::Empty
        }
    }

    fn render_grid(&self, _area: Rect, state: &GameState) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(state.rows() as usize);

        for row in 0..state.rows() {
            let spans: Vec<Span> = (0..state.columns())
                .map(|column| match Self::cell_at(state, column, row) {
                    Cell::Head => Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Cell::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
                    Cell::Food => Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                })
                .collect();

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        _area: Rect,
        state: &GameState,
        metrics: &GameMetrics,
        status: Option<&str>,
    ) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let mut stats = vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Record: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Games: ", label),
            Span::styled(metrics.games_played.to_string(), value),
            Span::raw("    "),
            Span::styled("Frames: ", label),
            Span::styled(state.frame_iteration.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ];

        if let Some(last) = metrics.last_score {
            stats.extend([
                Span::raw("    "),
                Span::styled("Last: ", label),
                Span::styled(last.to_string(), value),
            ]);
        }

        let mut text = vec![Line::from(stats)];

        if let Some(status) = status {
            text.push(Line::from(Span::styled(
                status.to_string(),
                Style::default().fg(Color::Magenta),
            )));
        }

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(
        &self,
        _area: Rect,
        state: &GameState,
        metrics: &GameMetrics,
    ) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if state.score > 0 && state.score >= metrics.high_score {
            text.push(Line::from(Span::styled(
                "New record!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        if self.controls == Controls::Human {
            text.push(Line::from(""));
            text.push(Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]));
        }

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, _area: Rect) -> Paragraph<'_> {
        let spans = match self.controls {
            Controls::Human => vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("R", Style::default().fg(Color::Green)),
                Span::raw(" to restart | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ],
            Controls::Watch => vec![
                Span::styled("Space", Style::default().fg(Color::Cyan)),
                Span::raw(" pause | "),
                Span::styled("1-4", Style::default().fg(Color::Cyan)),
                Span::raw(" speed | "),
                Span::styled("R", Style::default().fg(Color::Green)),
                Span::raw(" new game | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ],
        };

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction as Heading, Snake};
    use ratatui::{Terminal, backend::TestBackend};

    fn sample_state() -> GameState {
        let snake = Snake::new(Point::new(60, 40), Heading::Right, 3, 20);
        GameState::new(snake, Point::new(120, 100), 200, 200, 20)
    }

    fn draw(
        renderer: &Renderer,
        state: &GameState,
        metrics: &GameMetrics,
        status: Option<&str>,
    ) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        terminal
            .draw(|frame| renderer.render(frame, state, metrics, status))
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_cell_classification() {
        let state = sample_state();

        assert_eq!(Renderer::cell_at(&state, 3, 2), Cell::Head);
        assert_eq!(Renderer::cell_at(&state, 2, 2), Cell::Body);
        assert_eq!(Renderer::cell_at(&state, 1, 2), Cell::Body);
        assert_eq!(Renderer::cell_at(&state, 6, 5), Cell::Food);
        assert_eq!(Renderer::cell_at(&state, 0, 0), Cell::Empty);
    }

    #[test]
    fn test_render_shows_stats() {
        let metrics = GameMetrics::with_high_score(7);
        let text = draw(&Renderer::new(), &sample_state(), &metrics, None);

        assert!(text.contains("Score:"));
        assert!(text.contains("Record:"));
        assert!(text.contains("WASD"));
        assert!(!text.contains("Last:"));
    }

    #[test]
    fn test_render_last_score() {
        let mut metrics = GameMetrics::new();
        metrics.on_game_over(4);

        let text = draw(&Renderer::new(), &sample_state(), &metrics, None);
        assert!(text.contains("Last: 4"));
    }

    #[test]
    fn test_render_status_line() {
        let text = draw(
            &Renderer::for_watch(),
            &sample_state(),
            &GameMetrics::new(),
            Some("PAUSED"),
        );

        assert!(text.contains("PAUSED"));
        assert!(text.contains("speed"));
    }

    #[test]
    fn test_render_game_over() {
        let mut state = sample_state();
        state.is_alive = false;

        let text = draw(&Renderer::new(), &state, &GameMetrics::new(), None);
        assert!(text.contains("GAME OVER"));
    }
}

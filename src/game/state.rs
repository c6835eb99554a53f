use super::action::Direction;

/// A position on the game field, in pixels
///
/// Valid positions are multiples of the block size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move point by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move point one block in a direction
    pub fn moved_in_direction(&self, direction: Direction, block_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * block_size, dy * block_size)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Point>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given head, direction and length
    ///
    /// Segments trail behind the head, one block apart.
    pub fn new(head: Point, direction: Direction, length: usize, block_size: i32) -> Self {
        let mut body = vec![head];

        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx * block_size, -dy * block_size);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Point {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Point] {
        &self.body[1..]
    }

    /// Check if a point lies on the body (excluding head)
    pub fn collides_with_body(&self, point: Point) -> bool {
        self.body_segments().contains(&point)
    }

    /// Prepend a new head
    pub fn push_head(&mut self, head: Point) {
        self.body.insert(0, head);
    }

    /// Drop the last segment
    pub fn pop_tail(&mut self) -> Option<Point> {
        self.body.pop()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake ran out of frames without eating
    Starvation,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Point,
    /// Field width in pixels
    pub width: i32,
    /// Field height in pixels
    pub height: i32,
    pub block_size: i32,
    pub score: u32,
    /// Frames since the last reset
    pub frame_iteration: u32,
    pub is_alive: bool,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Point, width: i32, height: i32, block_size: i32) -> Self {
        Self {
            snake,
            food,
            width,
            height,
            block_size,
            score: 0,
            frame_iteration: 0,
            is_alive: true,
        }
    }

    /// Check if a point is within the field
    pub fn is_in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.x <= self.width - self.block_size
            && point.y >= 0
            && point.y <= self.height - self.block_size
    }

    /// True when a head placed at `point` would end the game
    ///
    /// Covers the walls and every segment after the head, the current tail
    /// included.
    pub fn is_collision(&self, point: Point) -> bool {
        !self.is_in_bounds(point) || self.snake.collides_with_body(point)
    }

    /// Check if a point is occupied by any part of the snake
    pub fn is_occupied_by_snake(&self, point: Point) -> bool {
        self.snake.body.contains(&point)
    }

    pub fn columns(&self) -> i32 {
        self.width / self.block_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.block_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: i32 = 20;

    #[test]
    fn test_point_movement() {
        let p = Point::new(100, 100);
        assert_eq!(p.moved_in_direction(Direction::Right, BLOCK), Point::new(120, 100));
        assert_eq!(p.moved_in_direction(Direction::Left, BLOCK), Point::new(80, 100));
        assert_eq!(p.moved_in_direction(Direction::Down, BLOCK), Point::new(100, 120));
        assert_eq!(p.moved_in_direction(Direction::Up, BLOCK), Point::new(100, 80));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Point::new(100, 100), Direction::Right, 3, BLOCK);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Point::new(100, 100));
        assert_eq!(snake.body[1], Point::new(80, 100));
        assert_eq!(snake.body[2], Point::new(60, 100));
    }

    #[test]
    fn test_push_and_pop() {
        let mut snake = Snake::new(Point::new(100, 100), Direction::Right, 3, BLOCK);
        snake.push_head(Point::new(120, 100));
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.pop_tail(), Some(Point::new(60, 100)));
        assert_eq!(snake.head(), Point::new(120, 100));
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(
            Snake::new(Point::new(100, 100), Direction::Right, 3, BLOCK),
            Point::new(200, 200),
            400,
            400,
            BLOCK,
        );

        assert!(state.is_in_bounds(Point::new(0, 0)));
        assert!(state.is_in_bounds(Point::new(380, 380)));
        assert!(!state.is_in_bounds(Point::new(-20, 0)));
        assert!(!state.is_in_bounds(Point::new(400, 0)));
        assert!(!state.is_in_bounds(Point::new(0, 400)));
    }

    #[test]
    fn test_collision_detection() {
        let state = GameState::new(
            Snake::new(Point::new(100, 100), Direction::Right, 3, BLOCK),
            Point::new(200, 200),
            400,
            400,
            BLOCK,
        );

        assert!(!state.is_collision(Point::new(100, 100))); // head
        assert!(state.is_collision(Point::new(80, 100))); // body
        assert!(state.is_collision(Point::new(60, 100))); // tail
        assert!(state.is_collision(Point::new(400, 100))); // wall
        assert!(!state.is_collision(Point::new(300, 300)));
    }
}

use crate::error::GameError;

/// Number of relative actions the agent can choose from
pub const NUM_ACTIONS: usize = 3;

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Clockwise order used for relative turning
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the unit delta (dx, dy) for moving in this direction
    ///
    /// Screen coordinates: y grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    fn clockwise_index(&self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Next direction clockwise (right turn)
    pub fn turn_right(&self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 1) % 4]
    }

    /// Next direction counter-clockwise (left turn)
    pub fn turn_left(&self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 3) % 4]
    }

    /// Absolute direction after applying a relative action
    pub fn apply(&self, action: RelativeAction) -> Direction {
        match action {
            RelativeAction::Straight => *self,
            RelativeAction::TurnRight => self.turn_right(),
            RelativeAction::TurnLeft => self.turn_left(),
        }
    }
}

/// Action relative to the current heading
///
/// This is the agent's action space. The one-hot encoding is
/// `[straight, right, left]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeAction {
    /// Keep the current heading
    Straight,
    /// Turn clockwise
    TurnRight,
    /// Turn counter-clockwise
    TurnLeft,
}

impl RelativeAction {
    pub const ALL: [RelativeAction; NUM_ACTIONS] = [
        RelativeAction::Straight,
        RelativeAction::TurnRight,
        RelativeAction::TurnLeft,
    ];

    /// Position of this action in the network output
    pub fn index(&self) -> usize {
        match self {
            RelativeAction::Straight => 0,
            RelativeAction::TurnRight => 1,
            RelativeAction::TurnLeft => 2,
        }
    }

    /// Action for a network output index, `None` when out of range
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn one_hot(&self) -> [f32; NUM_ACTIONS] {
        let mut v = [0.0; NUM_ACTIONS];
        v[self.index()] = 1.0;
        v
    }

    /// Decode a one-hot action vector
    ///
    /// Only the three canonical forms are accepted.
    pub fn from_one_hot(v: &[f32; NUM_ACTIONS]) -> Result<Self, GameError> {
        match v {
            [a, b, c] if *a == 1.0 && *b == 0.0 && *c == 0.0 => Ok(RelativeAction::Straight),
            [a, b, c] if *a == 0.0 && *b == 1.0 && *c == 0.0 => Ok(RelativeAction::TurnRight),
            [a, b, c] if *a == 0.0 && *b == 0.0 && *c == 1.0 => Ok(RelativeAction::TurnLeft),
            _ => Err(GameError::InvalidAction(*v)),
        }
    }
}

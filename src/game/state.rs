use super::action::Heading;

/// A position on the field, in coordinate units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move one cell of `cell_size` in `heading`
    pub fn stepped(&self, heading: Heading, cell_size: i32) -> Self {
        let (dx, dy) = heading.delta();
        self.moved_by(dx * cell_size, dy * cell_size)
    }

    /// Euclidean distance to `other`
    pub fn distance_to(&self, other: Position) -> f64 {
        let dx = f64::from(other.x - self.x);
        let dy = f64::from(other.y - self.y);
        dx.hypot(dy)
    }
}

/// Type of collision that ended an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head left the field
    Wall,
    /// Head ran into the body
    SelfCollision,
}

/// Authoritative simulation state
///
/// `body` is ordered tail first, head last. The body never holds more than
/// `target_length` cells; it grows one cell per tick until it reaches that
/// length.
#[derive(Debug, Clone, PartialEq)]
pub struct SnakeState {
    /// Never empty; the last cell is the head
    pub body: Vec<Position>,
    pub heading: Heading,
    pub food: Position,
    pub target_length: usize,
    pub terminated: bool,
}

impl SnakeState {
    /// Single-cell snake at `head`
    pub fn new(head: Position, heading: Heading, food: Position) -> Self {
        Self {
            body: vec![head],
            heading,
            food,
            target_length: 1,
            terminated: false,
        }
    }

    /// Snake with an explicit body, ordered tail first
    ///
    /// `target_length` is set to the body length so the snake keeps its size.
    /// Returns `None` for an empty body, since a snake always has a head.
    pub fn with_body(body: Vec<Position>, heading: Heading, food: Position) -> Option<Self> {
        if body.is_empty() {
            return None;
        }
        let target_length = body.len();
        Some(Self {
            body,
            heading,
            food,
            target_length,
            terminated: false,
        })
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Body cells behind the head
    pub fn trailing_segments(&self) -> &[Position] {
        &self.body[..self.body.len() - 1]
    }

    /// Check if `pos` hits the body, excluding the head
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.trailing_segments().contains(&pos)
    }

    /// Food eaten so far
    pub fn score(&self) -> usize {
        self.target_length - 1
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_stepping() {
        let pos = Position::new(40, 30);
        assert_eq!(pos.stepped(Heading::Up, 10), Position::new(40, 20));
        assert_eq!(pos.stepped(Heading::Down, 10), Position::new(40, 40));
        assert_eq!(pos.stepped(Heading::Left, 10), Position::new(30, 30));
        assert_eq!(pos.stepped(Heading::Right, 10), Position::new(50, 30));
    }

    #[test]
    fn test_distance() {
        let a = Position::new(0, 0);
        assert_eq!(a.distance_to(Position::new(30, 40)), 50.0);
        assert_eq!(a.distance_to(a), 0.0);
    }

    #[test]
    fn test_head_is_last() {
        let state = SnakeState::with_body(
            vec![
                Position::new(20, 30),
                Position::new(30, 30),
                Position::new(40, 30),
            ],
            Heading::Right,
            Position::new(0, 0),
        )
        .unwrap();
        assert_eq!(state.head(), Position::new(40, 30));
        assert_eq!(state.target_length, 3);
        assert_eq!(state.score(), 2);
    }

    #[test]
    fn test_collision_excludes_head() {
        let state = SnakeState::with_body(
            vec![Position::new(20, 30), Position::new(30, 30)],
            Heading::Right,
            Position::new(0, 0),
        )
        .unwrap();
        assert!(state.collides_with_body(Position::new(20, 30)));
        assert!(!state.collides_with_body(Position::new(30, 30)));
        assert!(!state.collides_with_body(Position::new(70, 50)));
    }

    #[test]
    fn test_empty_body_rejected() {
        assert!(SnakeState::with_body(vec![], Heading::Up, Position::new(0, 0)).is_none());

        let state =
            SnakeState::with_body(vec![Position::new(10, 10)], Heading::Up, Position::new(0, 0))
                .unwrap();
        assert_eq!(state.head(), Position::new(10, 10));
        assert!(state.trailing_segments().is_empty());
    }
}

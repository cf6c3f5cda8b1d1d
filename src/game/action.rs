/// Axis-aligned heading of the snake
///
/// Coordinates grow rightwards on x and downwards on y, so `Up` is `(0, -1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    /// Returns true if `other` points the exact opposite way
    pub fn is_opposite(&self, other: Heading) -> bool {
        self.reversed() == other
    }

    /// The heading pointing the opposite way
    pub fn reversed(&self) -> Heading {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    /// Unit vector (dx, dy) of this heading
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    /// Heading for a unit vector, if it is axis-aligned
    pub fn from_delta(dx: i32, dy: i32) -> Option<Heading> {
        match (dx, dy) {
            (0, -1) => Some(Heading::Up),
            (0, 1) => Some(Heading::Down),
            (-1, 0) => Some(Heading::Left),
            (1, 0) => Some(Heading::Right),
            _ => None,
        }
    }

    /// Quarter turn mapping `(x, y)` to `(y, -x)`
    pub fn rotated_right(&self) -> Heading {
        match self {
            Heading::Up => Heading::Left,
            Heading::Left => Heading::Down,
            Heading::Down => Heading::Right,
            Heading::Right => Heading::Up,
        }
    }

    /// Quarter turn mapping `(x, y)` to `(-y, x)`
    pub fn rotated_left(&self) -> Heading {
        match self {
            Heading::Up => Heading::Right,
            Heading::Right => Heading::Down,
            Heading::Down => Heading::Left,
            Heading::Left => Heading::Up,
        }
    }
}

/// Relative action chosen by the agent
///
/// The discriminant is the action id used in the value table and in the
/// persisted table format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Straight = 0,
    Right = 1,
    Left = 2,
}

impl Action {
    /// All actions in enumeration order; greedy ties resolve to the earliest
    pub const ALL: [Action; 3] = [Action::Straight, Action::Right, Action::Left];

    /// Numeric id of the action
    pub fn id(&self) -> usize {
        *self as usize
    }

    /// Action for a numeric id
    pub fn from_id(id: usize) -> Option<Action> {
        Self::ALL.get(id).copied()
    }

    /// Heading that results from taking this action while facing `heading`
    pub fn apply(&self, heading: Heading) -> Heading {
        match self {
            Action::Straight => heading,
            Action::Right => heading.rotated_right(),
            Action::Left => heading.rotated_left(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADINGS: [Heading; 4] = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

    #[test]
    fn test_opposite_headings() {
        assert!(Heading::Up.is_opposite(Heading::Down));
        assert!(Heading::Down.is_opposite(Heading::Up));
        assert!(Heading::Left.is_opposite(Heading::Right));
        assert!(Heading::Right.is_opposite(Heading::Left));

        assert!(!Heading::Up.is_opposite(Heading::Left));
        assert!(!Heading::Up.is_opposite(Heading::Up));
    }

    #[test]
    fn test_rotations_match_vector_maps() {
        for heading in HEADINGS {
            let (x, y) = heading.delta();
            assert_eq!(Heading::from_delta(y, -x), Some(heading.rotated_right()));
            assert_eq!(Heading::from_delta(-y, x), Some(heading.rotated_left()));
        }
    }

    #[test]
    fn test_rotations_never_reverse() {
        for heading in HEADINGS {
            for action in Action::ALL {
                assert!(!heading.is_opposite(action.apply(heading)));
            }
            assert_eq!(heading.rotated_right().rotated_left(), heading);
        }
    }

    #[test]
    fn test_action_ids() {
        assert_eq!(Action::Straight.id(), 0);
        assert_eq!(Action::Right.id(), 1);
        assert_eq!(Action::Left.id(), 2);
        assert_eq!(Action::from_id(1), Some(Action::Right));
        assert_eq!(Action::from_id(3), None);
    }
}

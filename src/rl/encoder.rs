use std::fmt;
use std::str::FromStr;

use crate::game::{Environment, Heading, Position};

/// Food lies ahead of the head
pub const FOOD_FRONT: u8 = 1 << 0;
/// Food lies behind (or beside) the head
pub const FOOD_BACK: u8 = 1 << 1;
/// Food lies to the right of the heading
pub const FOOD_RIGHT: u8 = 1 << 2;
/// Food lies to the left of (or on) the heading axis
pub const FOOD_LEFT: u8 = 1 << 3;

/// Moving straight on collides next tick
pub const DANGER_STRAIGHT: u8 = 1 << 0;
/// Turning right collides next tick
pub const DANGER_RIGHT: u8 = 1 << 1;
/// Turning left collides next tick
pub const DANGER_LEFT: u8 = 1 << 2;

const DANGER_SHIFT: u8 = 4;

/// Discretized environment state, packed into one byte
///
/// The low nibble holds the food bits, bits 4..=6 the danger bits. Its
/// `Display` form is `"(food_bits, danger_bits)"`, the key format of the
/// persisted value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(u8);

impl StateKey {
    pub fn new(food_bits: u8, danger_bits: u8) -> Self {
        Self((food_bits & 0x0f) | ((danger_bits & 0x07) << DANGER_SHIFT))
    }

    pub fn food_bits(&self) -> u8 {
        self.0 & 0x0f
    }

    pub fn danger_bits(&self) -> u8 {
        self.0 >> DANGER_SHIFT
    }

    /// The packed representation
    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn food_ahead(&self) -> bool {
        self.food_bits() & FOOD_FRONT != 0
    }

    pub fn food_right(&self) -> bool {
        self.food_bits() & FOOD_RIGHT != 0
    }

    pub fn danger_straight(&self) -> bool {
        self.danger_bits() & DANGER_STRAIGHT != 0
    }

    pub fn danger_right(&self) -> bool {
        self.danger_bits() & DANGER_RIGHT != 0
    }

    pub fn danger_left(&self) -> bool {
        self.danger_bits() & DANGER_LEFT != 0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.food_bits(), self.danger_bits())
    }
}

impl FromStr for StateKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| format!("state key {s:?} is not a parenthesised pair"))?;

        let (food, danger) = inner
            .split_once(',')
            .ok_or_else(|| format!("state key {s:?} is missing a comma"))?;

        let food: u8 = food
            .trim()
            .parse()
            .map_err(|e| format!("bad food bits in {s:?}: {e}"))?;
        let danger: u8 = danger
            .trim()
            .parse()
            .map_err(|e| format!("bad danger bits in {s:?}: {e}"))?;

        if food > 0x0f || danger > 0x07 {
            return Err(format!("state key {s:?} is out of range"));
        }

        Ok(Self::new(food, danger))
    }
}

/// Project the environment onto its discretized state
///
/// Food direction comes from the signs of the dot and 2D cross products of
/// the heading with the head-to-food vector; zero resolves to back/left.
/// Food on the head itself counts as ahead.
pub fn encode(env: &Environment) -> StateKey {
    let heading = env.heading();
    let head = env.head();

    StateKey::new(
        food_bits(heading, head, env.food()),
        danger_bits(env, heading, head),
    )
}

fn food_bits(heading: Heading, head: Position, food: Position) -> u8 {
    let (dx, dy) = heading.delta();
    let fx = i64::from(food.x - head.x);
    let fy = i64::from(food.y - head.y);
    let (dx, dy) = (i64::from(dx), i64::from(dy));

    let forward = dx * fx + dy * fy;
    let lateral = dx * fy - dy * fx;
    let on_head = fx == 0 && fy == 0;

    let mut bits = 0;
    bits |= if forward > 0 || on_head {
        FOOD_FRONT
    } else {
        FOOD_BACK
    };
    bits |= if lateral > 0 { FOOD_RIGHT } else { FOOD_LEFT };
    bits
}

fn danger_bits(env: &Environment, heading: Heading, head: Position) -> u8 {
    let cell_size = env.config().cell_size;
    let neighbours = [
        (heading, DANGER_STRAIGHT),
        (heading.rotated_right(), DANGER_RIGHT),
        (heading.rotated_left(), DANGER_LEFT),
    ];

    neighbours
        .into_iter()
        .filter(|(toward, _)| env.collision_at(head.stepped(*toward, cell_size)).is_some())
        .fold(0, |bits, (_, flag)| bits | flag)
}

use super::{
    action::Heading,
    config::GridConfig,
    state::{CollisionType, Position, SnakeState},
};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game environment that handles all game logic
///
/// Food placement draws from an owned `StdRng`; everything else is a
/// deterministic function of the requested headings.
pub struct Environment {
    config: GridConfig,
    state: SnakeState,
    rng: StdRng,
}

impl Environment {
    /// Create a new environment seeded from system entropy
    pub fn new(config: GridConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a new environment with reproducible food placement
    pub fn with_seed(config: GridConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GridConfig, mut rng: StdRng) -> Self {
        let state = initial_state(&config, &mut rng);
        Self { config, state, rng }
    }

    /// Create an environment around an existing state
    pub fn from_state(config: GridConfig, state: SnakeState, seed: u64) -> Self {
        Self {
            config,
            state,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Reset the game to its initial state
    pub fn reset(&mut self) {
        self.state = initial_state(&self.config, &mut self.rng);
    }

    /// Execute one tick, steering towards `requested` first
    pub fn step(&mut self, requested: Heading) -> StepResult {
        if self.state.terminated {
            return StepResult {
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: None,
                },
            };
        }

        // A request to turn back onto the body is ignored
        if !self.state.heading.is_opposite(requested) {
            self.state.heading = requested;
        }

        let new_head = self
            .state
            .head()
            .stepped(self.state.heading, self.config.cell_size);

        if let Some(collision_type) = self.collision_at(new_head) {
            self.state.terminated = true;

            return StepResult {
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                },
            };
        }

        self.state.body.push(new_head);
        while self.state.body.len() > self.state.target_length {
            self.state.body.remove(0);
        }

        let ate_food = new_head == self.state.food;
        if ate_food {
            self.state.target_length += 1;
            self.state.food = random_cell(&self.config, &mut self.rng);
        }

        StepResult {
            terminated: false,
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        }
    }

    /// Collision a head at `pos` would cause against the current body
    pub fn collision_at(&self, pos: Position) -> Option<CollisionType> {
        if !self.config.contains(pos) {
            return Some(CollisionType::Wall);
        }

        if self.state.collides_with_body(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Euclidean distance from the head to the food
    pub fn distance_to_food(&self) -> f64 {
        self.state.head().distance_to(self.state.food)
    }

    pub fn head(&self) -> Position {
        self.state.head()
    }

    pub fn heading(&self) -> Heading {
        self.state.heading
    }

    pub fn food(&self) -> Position {
        self.state.food
    }

    pub fn score(&self) -> usize {
        self.state.score()
    }

    pub fn is_terminated(&self) -> bool {
        self.state.terminated
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn state(&self) -> &SnakeState {
        &self.state
    }

    /// Mutable access to the state, for setting up scenarios
    pub fn state_mut(&mut self) -> &mut SnakeState {
        &mut self.state
    }
}

fn initial_state(config: &GridConfig, rng: &mut StdRng) -> SnakeState {
    let head = config.center();
    let food = free_cell(config, &[head], rng).unwrap_or(head);
    SnakeState::new(head, Heading::Up, food)
}

/// Uniformly random cell outside `occupied`; `None` when the field is full
fn free_cell(config: &GridConfig, occupied: &[Position], rng: &mut StdRng) -> Option<Position> {
    let free: Vec<Position> = (0..config.rows())
        .flat_map(|row| (0..config.columns()).map(move |col| config.cell(col, row)))
        .filter(|cell| !occupied.contains(cell))
        .collect();
    free.choose(rng).copied()
}

/// Uniformly random cell; the snake's body is not excluded
fn random_cell(config: &GridConfig, rng: &mut StdRng) -> Position {
    let col = rng.gen_range(0..config.columns());
    let row = rng.gen_range(0..config.rows());
    config.cell(col, row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(body: Vec<Position>, heading: Heading, food: Position) -> Environment {
        Environment::from_state(
            GridConfig::small(),
            SnakeState::with_body(body, heading, food).unwrap(),
            7,
        )
    }

    #[test]
    fn test_reset() {
        let mut env = Environment::with_seed(GridConfig::small(), 1);
        env.step(Heading::Left);
        env.reset();

        let state = env.state();
        assert!(!state.terminated);
        assert_eq!(state.target_length, 1);
        assert_eq!(state.body, vec![Position::new(40, 30)]);
        assert_eq!(state.heading, Heading::Up);
        assert!(env.config().contains(state.food));
        assert_eq!(state.food.x % 10, 0);
        assert_eq!(state.food.y % 10, 0);
    }

    #[test]
    fn test_initial_food_never_on_snake() {
        for seed in 0..500 {
            let mut env = Environment::with_seed(GridConfig::small(), seed);
            for _ in 0..5 {
                assert_ne!(env.food(), env.head(), "seed {seed}");
                assert!(GridConfig::small().contains(env.food()));
                env.step(Heading::Left);
                env.reset();
            }
        }
    }

    #[test]
    fn test_two_cell_field_puts_food_beside_head() {
        let config = GridConfig::new(20, 10, 10);
        for seed in 0..20 {
            let env = Environment::with_seed(config, seed);
            assert_eq!(env.head(), Position::new(10, 0));
            assert_eq!(env.food(), Position::new(0, 0));
        }
    }

    #[test]
    fn test_basic_movement() {
        let mut env = env_with(vec![Position::new(40, 30)], Heading::Up, Position::new(0, 0));

        let result = env.step(Heading::Up);

        assert!(!result.terminated);
        assert!(!result.info.ate_food);
        assert_eq!(env.state().body, vec![Position::new(40, 20)]);
    }

    #[test]
    fn test_food_consumption() {
        let mut env = env_with(vec![Position::new(40, 30)], Heading::Up, Position::new(40, 20));

        let result = env.step(Heading::Up);

        assert!(result.info.ate_food);
        assert_eq!(env.score(), 1);
        assert_eq!(env.state().target_length, 2);
        // Growth happens over the following ticks
        assert_eq!(env.state().len(), 1);

        env.step(Heading::Up);
        assert_eq!(env.state().len(), 2);
        assert_eq!(
            env.state().body,
            vec![Position::new(40, 20), Position::new(40, 10)]
        );
    }

    #[test]
    fn test_wall_collision_leaves_body() {
        let mut env = env_with(vec![Position::new(0, 30)], Heading::Left, Position::new(50, 50));
        let before = env.state().clone();

        let result = env.step(Heading::Left);

        assert!(result.terminated);
        assert!(env.is_terminated());
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        assert_eq!(env.state().body, before.body);
        assert_eq!(env.state().food, before.food);
    }

    #[test]
    fn test_self_collision() {
        // Tail at (30,40), bent up to (30,30), head at (40,30) moving down
        let mut env = env_with(
            vec![
                Position::new(30, 40),
                Position::new(30, 30),
                Position::new(40, 30),
            ],
            Heading::Down,
            Position::new(70, 50),
        );

        let result = env.step(Heading::Left);

        assert!(result.terminated);
        assert_eq!(result.info.collision_type, Some(CollisionType::SelfCollision));
    }

    #[test]
    fn test_prevent_reversal() {
        let mut env = env_with(vec![Position::new(40, 30)], Heading::Right, Position::new(0, 0));

        env.step(Heading::Left);

        assert_eq!(env.heading(), Heading::Right);
        assert_eq!(env.head(), Position::new(50, 30));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut env = env_with(vec![Position::new(0, 30)], Heading::Left, Position::new(50, 50));
        env.step(Heading::Left);
        let snapshot = env.state().clone();

        for heading in [Heading::Up, Heading::Right, Heading::Down] {
            let result = env.step(heading);
            assert!(result.terminated);
            assert_eq!(result.info.collision_type, None);
        }

        assert_eq!(env.state(), &snapshot);
    }

    #[test]
    fn test_length_invariants_on_random_walk() {
        let mut env = Environment::with_seed(GridConfig::small(), 99);
        let mut rng = StdRng::seed_from_u64(5);
        let headings = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

        for _ in 0..20 {
            env.reset();
            let mut last_target = env.state().target_length;
            let mut ticks = 0;
            while !env.is_terminated() && ticks < 10_000 {
                ticks += 1;
                let food_before = env.food();
                let result = env.step(headings[rng.gen_range(0..4)]);
                let state = env.state();

                assert!(state.body.len() <= state.target_length);
                assert!(state.target_length >= last_target);
                if result.info.ate_food {
                    assert_eq!(state.target_length, last_target + 1);
                } else {
                    assert_eq!(state.target_length, last_target);
                    assert_eq!(state.food, food_before);
                }
                last_target = state.target_length;
            }
        }
    }

    #[test]
    fn test_seeded_environments_agree() {
        let mut a = Environment::with_seed(GridConfig::default(), 42);
        let mut b = Environment::with_seed(GridConfig::default(), 42);
        assert_eq!(a.state(), b.state());

        for _ in 0..5 {
            a.reset();
            b.reset();
            assert_eq!(a.food(), b.food());
        }
    }
}

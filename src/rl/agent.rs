//! Epsilon-greedy tabular Q-learning agent

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::encoder::StateKey;
use super::table::{greedy_action, max_value, QTable};
use crate::game::Action;

/// How the last action was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Uniformly random action
    Explore,
    /// Highest-valued action from the table
    Exploit,
}

impl Selection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Selection::Explore => "explore",
            Selection::Exploit => "exploit",
        }
    }
}

/// Q-learning agent owning the value table
///
/// The exploration rate is not stored here; the caller passes it to every
/// `select_action` call and decays it between episodes.
pub struct QAgent {
    table: QTable,
    rng: StdRng,
    last_selection: Selection,
}

impl QAgent {
    /// Create an agent with an empty table and an entropy-seeded RNG
    pub fn new() -> Self {
        Self::with_table(QTable::new(), StdRng::from_entropy())
    }

    /// Create an agent with an empty table and reproducible exploration
    pub fn with_seed(seed: u64) -> Self {
        Self::with_table(QTable::new(), StdRng::seed_from_u64(seed))
    }

    /// Create an agent around a previously learned table
    pub fn with_table(table: QTable, rng: StdRng) -> Self {
        Self {
            table,
            rng,
            last_selection: Selection::Explore,
        }
    }

    /// Choose an action for `state`
    ///
    /// With probability `exploration_rate` the action is uniformly random,
    /// otherwise it is the greedy action of the (possibly new) table row.
    pub fn select_action(&mut self, state: StateKey, exploration_rate: f64) -> Action {
        if self.rng.gen::<f64>() < exploration_rate {
            self.last_selection = Selection::Explore;
            return Action::ALL[self.rng.gen_range(0..Action::ALL.len())];
        }

        self.last_selection = Selection::Exploit;
        greedy_action(self.table.row_mut(state))
    }

    /// One-step Q-learning update for the transition `state -action-> next_state`
    pub fn update(
        &mut self,
        state: StateKey,
        action: Action,
        reward: f64,
        next_state: StateKey,
        learning_rate: f64,
        discount_factor: f64,
    ) {
        let max_next = max_value(self.table.row_mut(next_state));
        let current = &mut self.table.row_mut(state)[action.id()];
        *current += learning_rate * (reward + discount_factor * max_next - *current);
    }

    pub fn last_selection(&self) -> Selection {
        self.last_selection
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut QTable {
        &mut self.table
    }

    pub fn into_table(self) -> QTable {
        self.table
    }
}

impl Default for QAgent {
    fn default() -> Self {
        Self::new()
    }
}

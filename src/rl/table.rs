use std::collections::HashMap;

use super::encoder::StateKey;
use crate::game::Action;

/// Values of the three actions in one state, indexed by action id
pub type ActionValues = [f64; 3];

/// Tabular action-value estimates
///
/// Rows are created on first visit with every action at zero and are never
/// removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    rows: HashMap<StateKey, ActionValues>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row for `state`, materialising a zero row if it has not been seen
    pub fn row_mut(&mut self, state: StateKey) -> &mut ActionValues {
        self.rows.entry(state).or_insert([0.0; 3])
    }

    /// Row for `state` if it has been visited
    pub fn row(&self, state: StateKey) -> Option<&ActionValues> {
        self.rows.get(&state)
    }

    /// Value of `action` in `state`; unseen states read as zero
    pub fn value(&self, state: StateKey, action: Action) -> f64 {
        self.row(state).map_or(0.0, |row| row[action.id()])
    }

    /// Replace a whole row
    pub fn insert(&mut self, state: StateKey, values: ActionValues) {
        self.rows.insert(state, values);
    }

    /// Number of materialised rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in key order
    pub fn sorted_rows(&self) -> Vec<(StateKey, ActionValues)> {
        let mut rows: Vec<_> = self.rows.iter().map(|(k, v)| (*k, *v)).collect();
        rows.sort_by_key(|(key, _)| *key);
        rows
    }
}

/// Action with the highest value; ties go to the earliest in `Action::ALL`
pub fn greedy_action(values: &ActionValues) -> Action {
    let mut best = Action::ALL[0];
    for action in Action::ALL.into_iter().skip(1) {
        if values[action.id()] > values[best.id()] {
            best = action;
        }
    }
    best
}

/// Largest value in a row
pub fn max_value(values: &ActionValues) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_zero_rows() {
        let mut table = QTable::new();
        let key = StateKey::new(5, 0);

        assert!(table.row(key).is_none());
        assert_eq!(table.value(key, Action::Left), 0.0);
        assert!(table.is_empty());

        assert_eq!(*table.row_mut(key), [0.0, 0.0, 0.0]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_greedy_tie_break() {
        assert_eq!(greedy_action(&[0.0, 0.0, 0.0]), Action::Straight);
        assert_eq!(greedy_action(&[0.0, 1.0, 1.0]), Action::Right);
        assert_eq!(greedy_action(&[-1.0, -2.0, -1.0]), Action::Straight);
        assert_eq!(greedy_action(&[-1.0, -2.0, 3.0]), Action::Left);
    }

    #[test]
    fn test_max_value() {
        assert_eq!(max_value(&[-3.0, -1.0, -2.0]), -1.0);
        assert_eq!(max_value(&[0.0, 4.5, 4.5]), 4.5);
    }

    #[test]
    fn test_sorted_rows() {
        let mut table = QTable::new();
        table.insert(StateKey::new(10, 1), [1.0, 2.0, 3.0]);
        table.insert(StateKey::new(5, 0), [0.5, 0.0, 0.0]);

        let rows = table.sorted_rows();
        assert_eq!(rows[0].0, StateKey::new(5, 0));
        assert_eq!(rows[1].1, [1.0, 2.0, 3.0]);
    }
}

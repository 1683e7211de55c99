//! Single-level savepoints over a table's row set.
//!
//! A table is either `Clean` or `Savepointed`. Taking a savepoint copies the
//! live rows; rollback swaps the copy back in, commit drops it. There is no
//! nesting: a second savepoint replaces the first.

use crate::value::Row;

/// Observable transaction state of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// No snapshot held.
    Clean,
    /// A snapshot is held and can be rolled back to.
    Savepointed,
}

/// Holder for at most one snapshot of a row set.
#[derive(Debug, Clone, Default)]
pub struct Savepoint {
    snapshot: Option<Vec<Row>>,
}

impl Savepoint {
    /// Current state.
    pub fn state(&self) -> TransactionState {
        if self.snapshot.is_some() {
            TransactionState::Savepointed
        } else {
            TransactionState::Clean
        }
    }

    /// Copy `rows` as the new snapshot. Returns true if an earlier snapshot
    /// was discarded.
    pub fn capture(&mut self, rows: &[Row]) -> bool {
        self.snapshot.replace(rows.to_vec()).is_some()
    }

    /// Take the snapshot for restoring. `None` when clean.
    pub fn take_for_rollback(&mut self) -> Option<Vec<Row>> {
        self.snapshot.take()
    }

    /// Drop the snapshot. Returns false when there was nothing to drop.
    pub fn release(&mut self) -> bool {
        self.snapshot.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[test]
    fn test_state_transitions() {
        let mut sp = Savepoint::default();
        assert_eq!(sp.state(), TransactionState::Clean);

        let rows = vec![row![1, "Alice"]];
        assert!(!sp.capture(&rows));
        assert_eq!(sp.state(), TransactionState::Savepointed);

        // A second capture replaces the first.
        assert!(sp.capture(&[]));
        assert_eq!(sp.take_for_rollback(), Some(vec![]));
        assert_eq!(sp.state(), TransactionState::Clean);
        assert_eq!(sp.take_for_rollback(), None);
    }

    #[test]
    fn test_release() {
        let mut sp = Savepoint::default();
        assert!(!sp.release());

        sp.capture(&[row![1]]);
        assert!(sp.release());
        assert_eq!(sp.state(), TransactionState::Clean);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut rows = vec![row![1, "Alice"]];
        let mut sp = Savepoint::default();
        sp.capture(&rows);

        rows[0][1] = "Changed".into();
        rows.push(row![2, "Bob"]);

        assert_eq!(sp.take_for_rollback(), Some(vec![row![1, "Alice"]]));
    }
}

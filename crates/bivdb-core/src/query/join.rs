//! Outer joins between two tables.
//!
//! All three joins share one nested-loop matching routine. A left join probes
//! the right table for each left row; a right join is the same probe with the
//! tables swapped; a full join is a left join followed by the right rows that
//! were never matched.
//!
//! Output layout is fixed regardless of join kind: every column of the left
//! table, then the right table's columns minus its join key. Rows that exist
//! only on the right carry their key in the left table's key column and nulls
//! in the other left columns.

use tracing::debug;

use crate::error::{Error, Result};
use crate::table::Table;
use crate::value::{Row, Value};

/// Kind of outer join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Every left row, padded with nulls when unmatched.
    Left,
    /// Every right row, padded with nulls when unmatched.
    Right,
    /// Every row from both sides.
    Full,
}

/// A join request: kind plus an optional right-hand key column.
///
/// The left side always joins on its primary key. The right side joins on
/// its primary key unless `right_key` names another column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    pub kind: JoinKind,
    pub right_key: Option<String>,
}

impl JoinSpec {
    /// Join on both primary keys.
    pub fn new(kind: JoinKind) -> Self {
        Self {
            kind,
            right_key: None,
        }
    }

    /// Join the left primary key against a named right column.
    pub fn on(mut self, right_key: impl Into<String>) -> Self {
        self.right_key = Some(right_key.into());
        self
    }

    /// Run the join. Neither table is modified.
    pub fn execute(&self, left: &Table, right: &Table) -> Result<JoinedRows> {
        let right_key = match &self.right_key {
            Some(name) => right
                .schema()
                .index_of(name)
                .ok_or_else(|| Error::ColumnNotFound {
                    table: right.name().to_string(),
                    column: name.clone(),
                })?,
            None => right.primary_key_index(),
        };

        Ok(run(self.kind, left, right, right_key))
    }
}

/// Left join of `left` and `right` on their primary keys.
///
/// Keys match by value equality, except that a null key matches nothing:
/// a left row with a null key comes out once, padded with nulls.
pub fn left_join(left: &Table, right: &Table) -> JoinedRows {
    run(JoinKind::Left, left, right, right.primary_key_index())
}

/// Right join of `left` and `right` on their primary keys.
///
/// Null keys match nothing, so a right row with a null key comes out
/// unmatched.
pub fn right_join(left: &Table, right: &Table) -> JoinedRows {
    run(JoinKind::Right, left, right, right.primary_key_index())
}

/// Full outer join of `left` and `right` on their primary keys.
///
/// Null keys match nothing: null-keyed rows from either side each appear
/// once, unmatched. Right-only rows keep their key in the left key column
/// (see [`JoinedRows`]).
pub fn full_join(left: &Table, right: &Table) -> JoinedRows {
    run(JoinKind::Full, left, right, right.primary_key_index())
}

fn run(kind: JoinKind, left: &Table, right: &Table, right_key: usize) -> JoinedRows {
    let layout = Layout::new(left, right, right_key);
    let rows = match kind {
        JoinKind::Left => left_pass(left, right, &layout).0,
        JoinKind::Right => probe(right.rows(), layout.right_key, left.rows(), layout.left_key)
            .into_iter()
            .map(|(r, l)| match l {
                Some(l) => layout.pair(&left.rows()[l], &right.rows()[r]),
                None => layout.right_only(&right.rows()[r]),
            })
            .collect(),
        JoinKind::Full => {
            let (mut rows, matched) = left_pass(left, right, &layout);
            rows.extend(
                right
                    .rows()
                    .iter()
                    .zip(matched)
                    .filter(|(_, hit)| !hit)
                    .map(|(row, _)| layout.right_only(row)),
            );
            rows
        }
    };

    debug!(
        kind = ?kind,
        left = left.name(),
        right = right.name(),
        rows = rows.len(),
        "join executed"
    );

    JoinedRows {
        columns: layout.columns,
        rows,
    }
}

/// Derived rows produced by a join. Not a table: no schema checks, no
/// identity, no link back to the inputs.
///
/// A row found only in the right table carries its key in the left table's
/// key column, as SQL `USING (key)` does, with nulls in the other left
/// columns. It is not padded with a null for every left column followed by
/// the whole right row.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRows {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl JoinedRows {
    /// Column labels. Right-hand labels that clash with a left label are
    /// qualified as `table.column`.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Joined rows in output order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the join produced nothing.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Take ownership of the rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl IntoIterator for JoinedRows {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// For each outer row, the positions of inner rows with an equal key, or a
/// single `None` when nothing matches. Null keys never match.
fn probe(
    outer: &[Row],
    outer_key: usize,
    inner: &[Row],
    inner_key: usize,
) -> Vec<(usize, Option<usize>)> {
    let mut out = Vec::with_capacity(outer.len());

    for (o, outer_row) in outer.iter().enumerate() {
        let key = &outer_row[outer_key];
        let before = out.len();

        if !key.is_null() {
            for (i, inner_row) in inner.iter().enumerate() {
                if &inner_row[inner_key] == key {
                    out.push((o, Some(i)));
                }
            }
        }

        if out.len() == before {
            out.push((o, None));
        }
    }

    out
}

/// Left join rows plus, per right row, whether it was matched.
fn left_pass(left: &Table, right: &Table, layout: &Layout) -> (Vec<Row>, Vec<bool>) {
    let mut matched = vec![false; right.len()];
    let rows = probe(left.rows(), layout.left_key, right.rows(), layout.right_key)
        .into_iter()
        .map(|(l, r)| match r {
            Some(r) => {
                matched[r] = true;
                layout.pair(&left.rows()[l], &right.rows()[r])
            }
            None => layout.left_only(&left.rows()[l]),
        })
        .collect();
    (rows, matched)
}

struct Layout {
    columns: Vec<String>,
    left_width: usize,
    left_key: usize,
    right_key: usize,
    right_width: usize,
}

impl Layout {
    fn new(left: &Table, right: &Table, right_key: usize) -> Self {
        let mut columns: Vec<String> = left.schema().column_names().map(String::from).collect();
        for (i, name) in right.schema().column_names().enumerate() {
            if i == right_key {
                continue;
            }
            if columns.iter().any(|c| c == name) {
                columns.push(format!("{}.{}", right.name(), name));
            } else {
                columns.push(name.to_string());
            }
        }

        Self {
            columns,
            left_width: left.schema().len(),
            left_key: left.primary_key_index(),
            right_key,
            right_width: right.schema().len(),
        }
    }

    fn right_rest<'r>(&self, right: &'r Row) -> impl Iterator<Item = Value> + 'r {
        let key = self.right_key;
        right
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != key)
            .map(|(_, v)| v.clone())
    }

    fn pair(&self, left: &Row, right: &Row) -> Row {
        let mut row = Vec::with_capacity(self.columns.len());
        row.extend(left.iter().cloned());
        row.extend(self.right_rest(right));
        row
    }

    fn left_only(&self, left: &Row) -> Row {
        let mut row = Vec::with_capacity(self.columns.len());
        row.extend(left.iter().cloned());
        row.resize(self.left_width + self.right_width - 1, Value::Null);
        row
    }

    fn right_only(&self, right: &Row) -> Row {
        let mut row = vec![Value::Null; self.left_width];
        row[self.left_key] = right[self.right_key].clone();
        row.extend(self.right_rest(right));
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ScalarType, TableDef};
    use crate::database::Database;
    use crate::row;

    fn setup(left: Vec<Row>, right: Vec<Row>) -> Database {
        let mut db = Database::new("joins");
        let mut people = db
            .create_table(
                TableDef::new("people", "id")
                    .column("id", ScalarType::Integer)
                    .column("name", ScalarType::Text),
            )
            .unwrap();
        for r in left {
            people.insert(r).unwrap();
        }
        let mut langs = db
            .create_table(
                TableDef::new("langs", "id")
                    .column("id", ScalarType::Integer)
                    .column("language", ScalarType::Text),
            )
            .unwrap();
        for r in right {
            langs.insert(r).unwrap();
        }
        db
    }

    #[test]
    fn test_left_join_fan_out_and_padding() {
        let db = setup(
            vec![row![1, "Alice"], row![2, "Bob"]],
            vec![row![1, "Py"], row![1, "Java"]],
        );
        let joined = left_join(db.table("people").unwrap(), db.table("langs").unwrap());

        assert_eq!(joined.columns(), ["id", "name", "language"]);
        assert_eq!(
            joined.rows(),
            &[
                row![1, "Alice", "Py"],
                row![1, "Alice", "Java"],
                row![2, "Bob", Value::Null],
            ]
        );
    }

    #[test]
    fn test_right_join_mirrors_left() {
        let db = setup(
            vec![row![1, "Alice"], row![3, "Cindy"]],
            vec![row![1, "Python"], row![2, "Java"], row![4, "C++"]],
        );
        let joined = right_join(db.table("people").unwrap(), db.table("langs").unwrap());

        assert_eq!(
            joined.rows(),
            &[
                row![1, "Alice", "Python"],
                row![2, Value::Null, "Java"],
                row![4, Value::Null, "C++"],
            ]
        );
    }

    #[test]
    fn test_full_join_completeness() {
        let db = setup(vec![row![1, "Alice"]], vec![row![2, "Java"]]);
        let joined = full_join(db.table("people").unwrap(), db.table("langs").unwrap());

        assert_eq!(
            joined.rows(),
            &[row![1, "Alice", Value::Null], row![2, Value::Null, "Java"]]
        );
    }

    #[test]
    fn test_full_join_no_duplicates_for_matched_fan_out() {
        let db = setup(
            vec![row![1, "Alice"], row![2, "Bob"]],
            vec![row![1, "Py"], row![1, "Java"], row![5, "Go"]],
        );
        let joined = full_join(db.table("people").unwrap(), db.table("langs").unwrap());

        assert_eq!(joined.len(), 4);
        assert_eq!(joined.rows()[3], row![5, Value::Null, "Go"]);
    }

    #[test]
    fn test_null_keys_never_match() {
        let db = setup(
            vec![row![Value::Null, "Nobody"]],
            vec![row![Value::Null, "Ghost"]],
        );
        let joined = full_join(db.table("people").unwrap(), db.table("langs").unwrap());

        assert_eq!(
            joined.rows(),
            &[
                row![Value::Null, "Nobody", Value::Null],
                row![Value::Null, Value::Null, "Ghost"],
            ]
        );
    }

    #[test]
    fn test_explicit_right_key() {
        let mut db = setup(vec![row![1, "Alice"]], vec![]);
        let mut pets = db
            .create_table(
                TableDef::new("pets", "pet_id")
                    .column("pet_id", ScalarType::Integer)
                    .column("owner", ScalarType::Integer)
                    .column("name", ScalarType::Text),
            )
            .unwrap();
        pets.insert(row![10, 1, "Rex"]).unwrap();
        pets.insert(row![11, 1, "Tom"]).unwrap();

        let spec = JoinSpec::new(JoinKind::Left).on("owner");
        let joined = spec
            .execute(db.table("people").unwrap(), db.table("pets").unwrap())
            .unwrap();

        assert_eq!(joined.columns(), ["id", "name", "pet_id", "pets.name"]);
        assert_eq!(
            joined.rows(),
            &[row![1, "Alice", 10, "Rex"], row![1, "Alice", 11, "Tom"]]
        );

        let missing = JoinSpec::new(JoinKind::Left).on("nope");
        assert!(matches!(
            missing.execute(db.table("people").unwrap(), db.table("pets").unwrap()),
            Err(Error::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_empty_sides() {
        let db = setup(vec![], vec![row![1, "Py"]]);
        let people = db.table("people").unwrap();
        let langs = db.table("langs").unwrap();

        assert!(left_join(people, langs).is_empty());
        assert_eq!(right_join(people, langs).len(), 1);
        assert_eq!(full_join(people, langs).len(), 1);
    }
}

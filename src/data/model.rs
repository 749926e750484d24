use std::collections::HashSet;
use std::fmt;

use crate::error::SchemaError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a survey table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, typed on load.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Hash so distinct values can go through a HashSet --

impl Eq for CellValue {}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            // -0.0 == 0.0, so both must hash alike.
            CellValue::Float(f) => (f + 0.0).to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Type a raw text cell: empty → Null, then integer, float, bool, string.
    pub fn parse(s: &str) -> CellValue {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        match s {
            "true" | "True" | "TRUE" => CellValue::Bool(true),
            "false" | "False" | "FALSE" => CellValue::Bool(false),
            _ => CellValue::String(s.to_string()),
        }
    }

    /// Try to interpret the value as an `f64` (depths, coordinates, rates).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Integer view used by the numeric selection keys.
    /// Floats qualify only when they carry no fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – one loaded sheet
// ---------------------------------------------------------------------------

/// A rectangular table: every row holds exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table, padding short rows with `Null` and truncating long ones.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        Table { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `row` in the named column.
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Numeric cell at `row` in the named column.
    pub fn f64_at(&self, row: usize, column: &str) -> Option<f64> {
        self.cell(row, column)?.as_f64()
    }

    /// Distinct values of a column, in the order they first appear.
    pub fn distinct_values(&self, column: &str) -> Vec<CellValue> {
        let Some(idx) = self.column_index(column) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter_map(|row| row.get(idx))
            .filter(|v| seen.insert((*v).clone()))
            .cloned()
            .collect()
    }

    /// Column names starting with `prefix`, in column order.
    pub fn columns_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// New table with the rows for which `keep` returns true.
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// New table with only the given columns, in the given order.
    /// Returns `None` if any column is unknown.
    pub fn project(&self, columns: &[&str]) -> Option<Table> {
        let indices: Vec<usize> = columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Option<_>>()?;
        Some(Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// DatasetKind
// ---------------------------------------------------------------------------

pub const WELL_PREFIX: &str = "Well";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatasetKind {
    Well,
    Soil,
    Precipitation,
    Infiltration,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Well,
        DatasetKind::Soil,
        DatasetKind::Precipitation,
        DatasetKind::Infiltration,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DatasetKind::Well => "Well",
            DatasetKind::Soil => "Soil",
            DatasetKind::Precipitation => "Precipitation",
            DatasetKind::Infiltration => "Infiltration",
        }
    }

    /// Columns a table must carry to be stored as this kind.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            DatasetKind::Well => &["Timestamp", "Xpos", "Ypos"],
            DatasetKind::Soil => &["Soil Name", "Soil Index Lower", "Soil Index Higher"],
            DatasetKind::Precipitation => &["Region"],
            DatasetKind::Infiltration => &["Timeseries", "Infiltration Rate"],
        }
    }

    /// Check `table` against the column requirements of this kind.
    pub fn validate(self, table: &Table) -> Result<(), SchemaError> {
        let missing: Vec<String> = self
            .required_columns()
            .iter()
            .filter(|c| !table.has_column(c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns {
                kind: self,
                columns: missing,
            });
        }
        if self == DatasetKind::Well && table.columns_with_prefix(WELL_PREFIX).is_empty() {
            return Err(SchemaError::MissingColumnPrefix {
                kind: self,
                prefix: WELL_PREFIX,
            });
        }
        Ok(())
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// DataStore – the loaded datasets
// ---------------------------------------------------------------------------

/// One optional table per dataset kind. Tables enter only through [`DataStore::set`].
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    well: Option<Table>,
    soil: Option<Table>,
    precipitation: Option<Table>,
    infiltration: Option<Table>,
}

impl DataStore {
    pub fn get(&self, kind: DatasetKind) -> Option<&Table> {
        self.slot(kind).as_ref()
    }

    /// Validate `table` for `kind`, then replace the stored table wholesale.
    /// On error the previous table is left untouched.
    pub fn set(&mut self, kind: DatasetKind, table: Table) -> Result<(), SchemaError> {
        kind.validate(&table)?;
        *self.slot_mut(kind) = Some(table);
        Ok(())
    }

    fn slot(&self, kind: DatasetKind) -> &Option<Table> {
        match kind {
            DatasetKind::Well => &self.well,
            DatasetKind::Soil => &self.soil,
            DatasetKind::Precipitation => &self.precipitation,
            DatasetKind::Infiltration => &self.infiltration,
        }
    }

    fn slot_mut(&mut self, kind: DatasetKind) -> &mut Option<Table> {
        match kind {
            DatasetKind::Well => &mut self.well,
            DatasetKind::Soil => &mut self.soil,
            DatasetKind::Precipitation => &mut self.precipitation,
            DatasetKind::Infiltration => &mut self.infiltration,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn table(columns: &[&str], rows: Vec<Vec<CellValue>>) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    pub(crate) fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    pub(crate) fn well_table() -> Table {
        use CellValue::*;
        table(
            &["Timestamp", "Xpos", "Ypos", "Well1", "Well2"],
            vec![
                vec![Integer(100), Integer(1), Integer(2), Integer(-5), Float(-6.5)],
                vec![Integer(200), Integer(1), Integer(2), Float(-5.5), Float(-6.0)],
                vec![Integer(100), Integer(3), Integer(4), Integer(-4), Null],
            ],
        )
    }

    #[test]
    fn parse_types_cells() {
        assert_eq!(CellValue::parse(""), CellValue::Null);
        assert_eq!(CellValue::parse(" 42 "), CellValue::Integer(42));
        assert_eq!(CellValue::parse("-6.33"), CellValue::Float(-6.33));
        assert_eq!(CellValue::parse("true"), CellValue::Bool(true));
        assert_eq!(CellValue::parse("Sandy Loam"), s("Sandy Loam"));
    }

    #[test]
    fn as_i64_rejects_fractional_floats() {
        assert_eq!(CellValue::Float(100.0).as_i64(), Some(100));
        assert_eq!(CellValue::Float(100.5).as_i64(), None);
        assert_eq!(s("100").as_i64(), None);
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let t = well_table();
        assert_eq!(
            t.distinct_values("Timestamp"),
            vec![CellValue::Integer(100), CellValue::Integer(200)]
        );
        assert!(t.distinct_values("Nope").is_empty());
    }

    #[test]
    fn distinct_values_merge_signed_zero() {
        use CellValue::*;
        let t = table(
            &["Timestamp"],
            vec![vec![Float(0.0)], vec![Float(-0.0)], vec![Float(60.0)]],
        );
        assert_eq!(t.distinct_values("Timestamp"), vec![Float(0.0), Float(60.0)]);
    }

    #[test]
    fn new_pads_short_rows() {
        let t = table(&["a", "b"], vec![vec![CellValue::Integer(1)]]);
        assert_eq!(t.rows[0], vec![CellValue::Integer(1), CellValue::Null]);
    }

    #[test]
    fn project_rejects_unknown_column() {
        let t = well_table();
        assert!(t.project(&["Timestamp", "Missing"]).is_none());
        let p = t.project(&["Well2", "Timestamp"]).unwrap();
        assert_eq!(p.columns, vec!["Well2", "Timestamp"]);
        assert_eq!(p.rows[1][1], CellValue::Integer(200));
    }

    #[test]
    fn set_validates_before_replacing() {
        let mut store = DataStore::default();
        store.set(DatasetKind::Well, well_table()).unwrap();

        let bad = table(&["Timestamp", "Xpos"], vec![]);
        let err = store.set(DatasetKind::Well, bad).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumns {
                kind: DatasetKind::Well,
                columns: vec!["Ypos".to_string()],
            }
        );
        assert_eq!(store.get(DatasetKind::Well), Some(&well_table()));
    }

    #[test]
    fn well_requires_a_well_column() {
        let t = table(&["Timestamp", "Xpos", "Ypos"], vec![]);
        assert!(matches!(
            DatasetKind::Well.validate(&t),
            Err(SchemaError::MissingColumnPrefix { .. })
        ));
    }

    #[test]
    fn set_replaces_wholesale() {
        let mut store = DataStore::default();
        store.set(DatasetKind::Well, well_table()).unwrap();
        let smaller = well_table().filter_rows(|r| r[0] == CellValue::Integer(200));
        store.set(DatasetKind::Well, smaller).unwrap();
        assert_eq!(store.get(DatasetKind::Well).map(Table::len), Some(1));
        assert!(store.get(DatasetKind::Soil).is_none());
    }
}

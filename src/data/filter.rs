use crate::error::FilterError;

use super::model::{CellValue, DataStore, DatasetKind, Table};

// ---------------------------------------------------------------------------
// Selection: the four user-chosen keys
// ---------------------------------------------------------------------------

/// Raw UI selection. `None` is the "unselected" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub timestamp: Option<String>,
    pub region: Option<String>,
    pub timeseries: Option<String>,
    pub month: Option<String>,
}

/// Which selection key a menu drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKey {
    Timestamp,
    Region,
    Timeseries,
    Month,
}

impl SelectionKey {
    pub const ALL: [SelectionKey; 4] = [
        SelectionKey::Timestamp,
        SelectionKey::Region,
        SelectionKey::Timeseries,
        SelectionKey::Month,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SelectionKey::Timestamp => "timestamp",
            SelectionKey::Region => "region",
            SelectionKey::Timeseries => "timeseries",
            SelectionKey::Month => "month",
        }
    }

    /// Keys whose menu is fed by a dataset of this kind.
    pub fn fed_by(kind: DatasetKind) -> &'static [SelectionKey] {
        match kind {
            DatasetKind::Well => &[SelectionKey::Timestamp],
            DatasetKind::Precipitation => &[SelectionKey::Region, SelectionKey::Month],
            DatasetKind::Infiltration => &[SelectionKey::Timeseries],
            DatasetKind::Soil => &[],
        }
    }
}

impl Selection {
    pub fn get(&self, key: SelectionKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    pub fn set(&mut self, key: SelectionKey, value: Option<String>) {
        *self.slot_mut(key) = value;
    }

    fn slot(&self, key: SelectionKey) -> &Option<String> {
        match key {
            SelectionKey::Timestamp => &self.timestamp,
            SelectionKey::Region => &self.region,
            SelectionKey::Timeseries => &self.timeseries,
            SelectionKey::Month => &self.month,
        }
    }

    fn slot_mut(&mut self, key: SelectionKey) -> &mut Option<String> {
        match key {
            SelectionKey::Timestamp => &mut self.timestamp,
            SelectionKey::Region => &mut self.region,
            SelectionKey::Timeseries => &mut self.timeseries,
            SelectionKey::Month => &mut self.month,
        }
    }
}

/// Parse a numeric selection key. Never coerces bad input.
pub fn parse_int_key(key: &'static str, value: &str) -> Result<i64, FilterError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| FilterError::InvalidKey {
            key,
            value: value.to_string(),
        })
}

/// Fully selected, typed keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionKeys {
    pub timestamp: i64,
    pub region: String,
    pub timeseries: i64,
    pub month: String,
}

impl SelectionKeys {
    /// All four keys must be chosen; numeric keys must parse.
    pub fn from_selection(selection: &Selection) -> Result<Self, FilterError> {
        let missing: Vec<&'static str> = SelectionKey::ALL
            .iter()
            .filter(|k| selection.get(**k).is_none())
            .map(|k| k.name())
            .collect();
        if !missing.is_empty() {
            return Err(FilterError::MissingSelection(missing));
        }

        let value = |key: SelectionKey| selection.get(key).unwrap_or_default();
        Ok(SelectionKeys {
            timestamp: parse_int_key("timestamp", value(SelectionKey::Timestamp))?,
            region: value(SelectionKey::Region).to_string(),
            timeseries: parse_int_key("timeseries", value(SelectionKey::Timeseries))?,
            month: value(SelectionKey::Month).to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Per-dataset filters
// ---------------------------------------------------------------------------

fn matches_int(cell: Option<&CellValue>, key: i64) -> bool {
    cell.and_then(CellValue::as_i64) == Some(key)
}

/// Rows whose `column` holds `key` as an integer.
fn filter_by_int(table: &Table, column: &str, key: i64) -> Table {
    match table.column_index(column) {
        Some(idx) => table.filter_rows(|row| matches_int(row.get(idx), key)),
        None => table.filter_rows(|_| false),
    }
}

/// Well rows at exactly `timestamp`. No match yields an empty table.
pub fn filter_well(table: &Table, timestamp: i64) -> Table {
    filter_by_int(table, "Timestamp", timestamp)
}

/// Infiltration rows at exactly `timeseries`.
pub fn filter_infiltration(table: &Table, timeseries: i64) -> Table {
    filter_by_int(table, "Timeseries", timeseries)
}

/// Precipitation rows for `region`.
///
/// With a `month` that names a column the result is `[Region, month]`;
/// otherwise every month column is kept.
pub fn filter_precipitation(table: &Table, region: &str, month: Option<&str>) -> Table {
    let rows = match table.column_index("Region") {
        Some(idx) => table.filter_rows(|row| region_matches(&row[idx], region)),
        None => table.filter_rows(|_| false),
    };

    match month.filter(|m| *m != "Region" && rows.has_column(m)) {
        Some(m) => rows.project(&["Region", m]).unwrap_or(rows),
        None => {
            if let Some(m) = month {
                log::debug!("month '{m}' is not a precipitation column, keeping all months");
            }
            rows
        }
    }
}

fn region_matches(cell: &CellValue, region: &str) -> bool {
    match cell {
        CellValue::String(s) => s == region,
        CellValue::Null => false,
        other => other.to_string() == region,
    }
}

/// Soil has no selection key.
pub fn filter_soil(table: &Table) -> Table {
    table.clone()
}

// ---------------------------------------------------------------------------
// FilteredBundle
// ---------------------------------------------------------------------------

/// Filtered view per dataset. `None` marks a dataset that was never loaded;
/// `Some(empty)` marks a loaded dataset with no matching rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredBundle {
    pub well: Option<Table>,
    pub soil: Option<Table>,
    pub precipitation: Option<Table>,
    pub infiltration: Option<Table>,
}

impl FilteredBundle {
    pub fn get(&self, kind: DatasetKind) -> Option<&Table> {
        match kind {
            DatasetKind::Well => self.well.as_ref(),
            DatasetKind::Soil => self.soil.as_ref(),
            DatasetKind::Precipitation => self.precipitation.as_ref(),
            DatasetKind::Infiltration => self.infiltration.as_ref(),
        }
    }

    /// Datasets that were never loaded.
    pub fn absent_kinds(&self) -> Vec<DatasetKind> {
        DatasetKind::ALL
            .into_iter()
            .filter(|k| self.get(*k).is_none())
            .collect()
    }

    /// Loaded datasets whose filtered view has no rows.
    pub fn empty_kinds(&self) -> Vec<DatasetKind> {
        DatasetKind::ALL
            .into_iter()
            .filter(|k| self.get(*k).is_some_and(Table::is_empty))
            .collect()
    }
}

/// Apply every filter to whatever is loaded. Never touches `store`.
pub fn filtered_bundle(store: &DataStore, keys: &SelectionKeys) -> FilteredBundle {
    FilteredBundle {
        well: store
            .get(DatasetKind::Well)
            .map(|t| filter_well(t, keys.timestamp)),
        soil: store.get(DatasetKind::Soil).map(filter_soil),
        precipitation: store
            .get(DatasetKind::Precipitation)
            .map(|t| filter_precipitation(t, &keys.region, Some(&keys.month))),
        infiltration: store
            .get(DatasetKind::Infiltration)
            .map(|t| filter_infiltration(t, keys.timeseries)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{s, table, well_table};
    use CellValue::*;

    fn rain_table() -> Table {
        table(
            &["Region", "January", "February", "April"],
            vec![
                vec![s("North"), Float(41.5), Float(38.0), Integer(20)],
                vec![s("South"), Float(12.0), Float(3.25), Integer(7)],
            ],
        )
    }

    fn keys() -> SelectionKeys {
        SelectionKeys {
            timestamp: 100,
            region: "North".to_string(),
            timeseries: 60,
            month: "February".to_string(),
        }
    }

    #[test]
    fn well_filter_returns_exactly_matching_rows() {
        let t = table(
            &["Timestamp", "Xpos", "Ypos", "Well1"],
            vec![
                vec![Integer(100), Integer(1), Integer(2), Integer(-5)],
                vec![Integer(200), Integer(1), Integer(2), Integer(-6)],
            ],
        );
        let ts = parse_int_key("timestamp", "100").unwrap();
        let out = filter_well(&t, ts);
        assert_eq!(out.rows, vec![t.rows[0].clone()]);
        assert_eq!(out.columns, t.columns);
    }

    #[test]
    fn unknown_timestamp_is_empty_not_error() {
        let out = filter_well(&well_table(), 999);
        assert!(out.is_empty());
        assert_eq!(out.columns.len(), 5);
    }

    #[test]
    fn float_timestamps_match_integer_keys() {
        let t = table(&["Timestamp", "Xpos"], vec![vec![Float(100.0), Integer(1)]]);
        assert_eq!(filter_well(&t, 100).len(), 1);
    }

    #[test]
    fn precipitation_with_month_projects_two_columns() {
        let out = filter_precipitation(&rain_table(), "North", Some("February"));
        assert_eq!(out.columns, vec!["Region", "February"]);
        assert_eq!(out.rows, vec![vec![s("North"), Float(38.0)]]);
    }

    #[test]
    fn precipitation_unknown_month_keeps_all_months() {
        let out = filter_precipitation(&rain_table(), "South", Some("March"));
        assert_eq!(out.columns, rain_table().columns);
        assert_eq!(out.len(), 1);
        let none = filter_precipitation(&rain_table(), "South", None);
        assert_eq!(none, out);
    }

    #[test]
    fn infiltration_filter_matches_timeseries() {
        let t = table(
            &["Timeseries", "Infiltration Rate"],
            vec![vec![Integer(0), Float(10.0)], vec![Integer(60), Float(20.0)]],
        );
        let out = filter_infiltration(&t, 60);
        assert_eq!(out.rows, vec![vec![Integer(60), Float(20.0)]]);
    }

    #[test]
    fn bundle_marks_absent_soil() {
        let mut store = DataStore::default();
        store.set(DatasetKind::Well, well_table()).unwrap();
        let bundle = filtered_bundle(&store, &keys());
        assert!(bundle.get(DatasetKind::Soil).is_none());
        assert_eq!(bundle.well.as_ref().map(Table::len), Some(2));
        assert_eq!(
            bundle.absent_kinds(),
            vec![
                DatasetKind::Soil,
                DatasetKind::Precipitation,
                DatasetKind::Infiltration
            ]
        );
    }

    #[test]
    fn bundle_reports_empty_results_and_leaves_source() {
        let mut store = DataStore::default();
        store.set(DatasetKind::Well, well_table()).unwrap();
        store.set(DatasetKind::Precipitation, rain_table()).unwrap();
        let mut k = keys();
        k.timestamp = 5;
        let bundle = filtered_bundle(&store, &k);
        assert_eq!(bundle.empty_kinds(), vec![DatasetKind::Well]);
        assert_eq!(store.get(DatasetKind::Well), Some(&well_table()));
    }

    #[test]
    fn missing_selection_names_every_key() {
        let selection = Selection {
            region: Some("North".into()),
            ..Default::default()
        };
        assert_eq!(
            SelectionKeys::from_selection(&selection),
            Err(FilterError::MissingSelection(vec![
                "timestamp",
                "timeseries",
                "month"
            ]))
        );
    }

    #[test]
    fn non_numeric_key_is_an_error() {
        let selection = Selection {
            timestamp: Some("noon".into()),
            region: Some("North".into()),
            timeseries: Some(" 60 ".into()),
            month: Some("January".into()),
        };
        assert_eq!(
            SelectionKeys::from_selection(&selection),
            Err(FilterError::InvalidKey {
                key: "timestamp",
                value: "noon".into()
            })
        );

        let ok = Selection {
            timestamp: Some("100".into()),
            ..selection
        };
        let keys = SelectionKeys::from_selection(&ok).unwrap();
        assert_eq!(keys.timeseries, 60);
    }
}

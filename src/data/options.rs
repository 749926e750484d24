use super::filter::SelectionKey;
use super::model::{DatasetKind, Table};

/// Selectable values for each dependent menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionMenus {
    pub timestamps: Vec<String>,
    pub regions: Vec<String>,
    pub timeseries: Vec<String>,
    pub months: Vec<String>,
}

impl OptionMenus {
    pub fn options(&self, key: SelectionKey) -> &[String] {
        match key {
            SelectionKey::Timestamp => &self.timestamps,
            SelectionKey::Region => &self.regions,
            SelectionKey::Timeseries => &self.timeseries,
            SelectionKey::Month => &self.months,
        }
    }

    /// Replace the menus fed by `kind` with the values found in `table`.
    pub fn refresh(&mut self, kind: DatasetKind, table: &Table) {
        match kind {
            DatasetKind::Well => self.timestamps = distinct_labels(table, "Timestamp"),
            DatasetKind::Precipitation => {
                self.regions = distinct_labels(table, "Region");
                self.months = month_columns(table);
            }
            DatasetKind::Infiltration => self.timeseries = distinct_labels(table, "Timeseries"),
            DatasetKind::Soil => {}
        }
    }
}

/// Distinct non-null values of `column` as labels, in first-seen order.
pub fn distinct_labels(table: &Table, column: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for value in table.distinct_values(column) {
        let label = value.to_string();
        // 1 and 1.0 are distinct cells but render to the same label
        if !label.is_empty() && !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}

/// Every precipitation column except `Region`, in column order.
pub fn month_columns(table: &Table) -> Vec<String> {
    table
        .columns
        .iter()
        .filter(|c| c.as_str() != "Region")
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{s, table, well_table};
    use crate::data::model::CellValue::*;

    #[test]
    fn well_load_fills_timestamps_in_first_seen_order() {
        let mut menus = OptionMenus::default();
        let t = table(
            &["Timestamp", "Xpos", "Ypos", "Well1"],
            vec![
                vec![Integer(300), Integer(0), Integer(0), Integer(-1)],
                vec![Integer(100), Integer(0), Integer(0), Integer(-1)],
                vec![Integer(300), Integer(0), Integer(0), Integer(-1)],
            ],
        );
        menus.refresh(DatasetKind::Well, &t);
        assert_eq!(menus.timestamps, vec!["300", "100"]);
        assert!(menus.regions.is_empty());
    }

    #[test]
    fn reload_replaces_instead_of_merging() {
        let mut menus = OptionMenus::default();
        menus.refresh(DatasetKind::Well, &well_table());
        let first = menus.clone();
        menus.refresh(DatasetKind::Well, &well_table());
        assert_eq!(menus, first);

        let other = table(
            &["Timestamp", "Xpos", "Ypos", "Well1"],
            vec![vec![Integer(900), Integer(0), Integer(0), Integer(-1)]],
        );
        menus.refresh(DatasetKind::Well, &other);
        assert_eq!(menus.timestamps, vec!["900"]);
    }

    #[test]
    fn precipitation_fills_regions_and_months() {
        let mut menus = OptionMenus::default();
        let t = table(
            &["Region", "January", "February"],
            vec![
                vec![s("North"), Float(1.0), Float(2.0)],
                vec![s("South"), Float(1.0), Float(2.0)],
                vec![Null, Float(1.0), Float(2.0)],
            ],
        );
        menus.refresh(DatasetKind::Precipitation, &t);
        assert_eq!(menus.regions, vec!["North", "South"]);
        assert_eq!(menus.options(SelectionKey::Month), ["January", "February"]);
    }

    #[test]
    fn soil_load_touches_no_menu() {
        let mut menus = OptionMenus::default();
        menus.refresh(DatasetKind::Well, &well_table());
        let before = menus.clone();
        let soil = table(&["Soil Name", "Soil Index Lower", "Soil Index Higher"], vec![]);
        menus.refresh(DatasetKind::Soil, &soil);
        assert_eq!(menus, before);
    }
}

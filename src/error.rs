use thiserror::Error;

use crate::data::model::DatasetKind;

/// A table does not have the shape its dataset kind requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{kind} data is missing required column(s): {}", .columns.join(", "))]
    MissingColumns {
        kind: DatasetKind,
        columns: Vec<String>,
    },
    #[error("{kind} data has no column starting with '{prefix}'")]
    MissingColumnPrefix {
        kind: DatasetKind,
        prefix: &'static str,
    },
}

/// Errors raised while turning the UI selection into filter keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Please select a valid {}.", .0.join(", "))]
    MissingSelection(Vec<&'static str>),
    #[error("'{value}' is not a valid {key}: expected an integer")]
    InvalidKey { key: &'static str, value: String },
}

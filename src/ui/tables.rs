use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{CellValue, DatasetKind, Table};
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Tables view (central panel)
// ---------------------------------------------------------------------------

/// Tab strip over the four datasets plus the selected table.
pub fn tables_view(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for kind in DatasetKind::ALL {
            let label = match state.table(kind) {
                Some(t) => format!("{kind} ({})", t.len()),
                None => kind.to_string(),
            };
            ui.selectable_value(&mut state.table_tab, kind, label);
        }
    });
    ui.separator();

    let kind = state.table_tab;
    match state.table(kind) {
        Some(table) => ui.push_id(kind.label(), |ui: &mut Ui| data_table(ui, table)).inner,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(format!("No {kind} data loaded  (File → Load {kind}…)"));
            });
        }
    }
}

fn data_table(ui: &mut Ui, table: &Table) {
    egui::ScrollArea::horizontal()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .columns(Column::auto().at_least(60.0), table.columns.len())
                .header(ROW_HEIGHT + 2.0, |mut header| {
                    for name in &table.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, table.len(), |mut row| {
                        let cells = &table.rows[row.index()];
                        for cell in cells {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell_text(cell));
                            });
                        }
                    });
                });
        });
}

fn cell_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Float(v) => format!("{v:.3}"),
        CellValue::Null => "—".to_string(),
        other => other.to_string(),
    }
}

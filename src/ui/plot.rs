use eframe::egui::{Stroke, Ui};
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, Points, Polygon};

use crate::scene::section::{SectionScene, HALF_WIDTH};

// ---------------------------------------------------------------------------
// 2D cross-section (central panel)
// ---------------------------------------------------------------------------

/// Render a built cross-section.
pub fn section_plot(ui: &mut Ui, scene: &SectionScene) {
    ui.label(&scene.title);

    Plot::new("section_plot")
        .legend(Legend::default())
        .x_axis_label("X Position")
        .y_axis_label("Depth")
        .include_x(-HALF_WIDTH)
        .include_x(HALF_WIDTH)
        .include_y(10.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for band in &scene.bands {
                let corners: PlotPoints = vec![
                    [-HALF_WIDTH, band.top],
                    [HALF_WIDTH, band.top],
                    [HALF_WIDTH, band.bottom],
                    [-HALF_WIDTH, band.bottom],
                ]
                .into();
                plot_ui.polygon(
                    Polygon::new(corners)
                        .name(&band.name)
                        .fill_color(band.color)
                        .stroke(Stroke::NONE),
                );
            }

            for path in &scene.infiltration_paths {
                plot_ui.line(
                    Line::new(PlotPoints::from(path.clone()))
                        .name("Infiltration")
                        .color(SectionScene::PATH_COLOR)
                        .width(1.2),
                );
            }

            for segment in &scene.segments {
                let kind = segment.kind;
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![segment.from, segment.to]))
                        .name(kind.label())
                        .color(kind.color())
                        .width(kind.width()),
                );
            }

            for fountain in &scene.fountains {
                plot_ui.line(
                    Line::new(PlotPoints::from(fountain.clone()))
                        .name("Fountain")
                        .color(SectionScene::DROP_COLOR)
                        .width(1.5),
                );
            }

            if !scene.pumped.is_empty() {
                plot_ui.points(
                    Points::new(PlotPoints::from(scene.pumped.clone()))
                        .name("Pumped Water")
                        .color(SectionScene::PATH_COLOR)
                        .radius(4.0),
                );
            }

            if !scene.drops.is_empty() {
                plot_ui.points(
                    Points::new(PlotPoints::from(scene.drops.clone()))
                        .name("Rain Drops")
                        .color(SectionScene::DROP_COLOR)
                        .radius(1.5),
                );
            }

            if !scene.puddles.is_empty() {
                plot_ui.points(
                    Points::new(PlotPoints::from(scene.puddles.clone()))
                        .name("Puddle")
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .color(SectionScene::PUDDLE_COLOR)
                        .radius(9.0),
                );
            }
        });
}

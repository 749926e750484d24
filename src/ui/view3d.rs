use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2};

use crate::scene::camera::{mean_depth, OrbitCamera};
use crate::scene::ModelScene;

const EDGE: Color32 = Color32::from_black_alpha(40);

// ---------------------------------------------------------------------------
// 3D model view (central panel)
// ---------------------------------------------------------------------------

/// Paint a built 3D model. Drag to orbit, scroll to zoom, double-click resets.
pub fn model_view(ui: &mut Ui, scene: &ModelScene, camera: &mut OrbitCamera) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(&scene.title);
        if ui.small_button("Reset view").clicked() {
            camera.reset();
        }
    });

    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
    let rect = response.rect;

    if response.dragged() {
        let delta = response.drag_delta();
        camera.orbit(delta.x, delta.y);
    }
    if response.double_clicked() {
        camera.reset();
    }
    if response.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            camera.zoom_by((1.0 + scroll as f64 * 0.002).max(0.5));
        }
    }

    painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);

    let px_per_unit = rect.width().min(rect.height()) as f64 / (scene.radius * 3.0);
    let to_screen = |p: [f64; 3]| -> Pos2 {
        let (xy, _) = camera.project(p);
        rect.center() + Vec2::new((xy[0] * px_per_unit) as f32, (-xy[1] * px_per_unit) as f32)
    };

    // Painter's algorithm: farthest faces first.
    let mut faces: Vec<(f64, _)> = scene
        .faces()
        .into_iter()
        .map(|face| (mean_depth(camera, &face.points), face))
        .collect();
    faces.sort_by(|a, b| b.0.total_cmp(&a.0));

    for (_, face) in faces {
        let points: Vec<Pos2> = face.points.iter().map(|p| to_screen(*p)).collect();
        painter.add(Shape::convex_polygon(points, face.color, Stroke::new(0.5, EDGE)));
    }

    legend(&painter, rect, scene);
}

fn legend(painter: &egui::Painter, rect: Rect, scene: &ModelScene) {
    let font = FontId::proportional(12.0);
    let mut pos = rect.right_top() + Vec2::new(-160.0, 10.0);
    for (label, color) in &scene.legend {
        painter.rect_filled(
            Rect::from_min_size(pos, Vec2::splat(10.0)),
            2.0,
            color.to_opaque(),
        );
        painter.text(
            pos + Vec2::new(16.0, -2.0),
            Align2::LEFT_TOP,
            label,
            font.clone(),
            Color32::LIGHT_GRAY,
        );
        pos.y += 16.0;
    }
}

use std::f64::consts::TAU;

use eframe::egui::Color32;

use crate::color::{self, INFILTRATION, LIGHT_WATER, WATER};
use crate::config::SceneConfig;
use crate::data::filter::{FilteredBundle, SelectionKeys};
use crate::data::model::Table;

use super::{lerp, linspace, precipitation_value, spread, well_columns};

/// Layers used when no soil profile is loaded: (name, thickness).
pub const DEFAULT_PROFILE: [(&str, f64); 6] = [
    ("Organic", 2.0),
    ("Surface", 3.0),
    ("Subsoil", 4.0),
    ("Unconfined Aquifer", 5.0),
    ("Confined Layer", 4.0),
    ("Bedrock", 6.0),
];

const WELL_SPAN: f64 = 25.0;
const PUDDLE_SPAN: f64 = 10.0;
const MAX_PUDDLES: usize = 12;
const DEFAULT_INFILTRATION_SPEED: f64 = 0.5;

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// A 3D primitive in world units, z up.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Cuboid { min: [f64; 3], max: [f64; 3] },
    /// Vertical cylinder from `base` up by `height`.
    Cylinder { base: [f64; 3], radius: f64, height: f64 },
    /// Horizontal disc.
    Disc { center: [f64; 3], radius: f64 },
    /// Horizontal square.
    Plane { center: [f64; 3], half_size: f64 },
}

fn ring(center: [f64; 3], radius: f64, segments: usize) -> Vec<[f64; 3]> {
    (0..segments)
        .map(|i| {
            let a = TAU * i as f64 / segments as f64;
            [
                center[0] + radius * a.cos(),
                center[1] + radius * a.sin(),
                center[2],
            ]
        })
        .collect()
}

impl Primitive {
    /// Planar polygon faces. Curved primitives use `segments` sides.
    pub fn faces(&self, segments: usize) -> Vec<Vec<[f64; 3]>> {
        let segments = segments.max(3);
        match *self {
            Primitive::Cuboid { min, max } => {
                let [x0, y0, z0] = min;
                let [x1, y1, z1] = max;
                vec![
                    vec![[x0, y0, z0], [x1, y0, z0], [x1, y1, z0], [x0, y1, z0]],
                    vec![[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]],
                    vec![[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]],
                    vec![[x0, y1, z0], [x1, y1, z0], [x1, y1, z1], [x0, y1, z1]],
                    vec![[x0, y0, z0], [x0, y1, z0], [x0, y1, z1], [x0, y0, z1]],
                    vec![[x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1]],
                ]
            }
            Primitive::Cylinder {
                base,
                radius,
                height,
            } => {
                let bottom = ring(base, radius, segments);
                let top = ring([base[0], base[1], base[2] + height], radius, segments);
                let mut faces: Vec<Vec<[f64; 3]>> = (0..segments)
                    .map(|i| {
                        let j = (i + 1) % segments;
                        vec![bottom[i], bottom[j], top[j], top[i]]
                    })
                    .collect();
                faces.push(bottom);
                faces.push(top);
                faces
            }
            Primitive::Disc { center, radius } => vec![ring(center, radius, segments)],
            Primitive::Plane { center, half_size } => {
                let [x, y, z] = center;
                vec![vec![
                    [x - half_size, y - half_size, z],
                    [x + half_size, y - half_size, z],
                    [x + half_size, y + half_size, z],
                    [x - half_size, y + half_size, z],
                ]]
            }
        }
    }
}

/// A coloured primitive with a legend label.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub primitive: Primitive,
    pub color: Color32,
    pub label: String,
}

/// A polygon ready for projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub points: Vec<[f64; 3]>,
    pub color: Color32,
}

/// One soil layer in world z (surface at 0, depth negative).
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub top: f64,
    pub bottom: f64,
}

// ---------------------------------------------------------------------------
// ModelScene
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelScene {
    pub title: String,
    pub shapes: Vec<Shape>,
    pub legend: Vec<(String, Color32)>,
    pub water_table: Option<f64>,
    pub segments: usize,
    /// Largest absolute coordinate, for fitting the view.
    pub radius: f64,
}

impl ModelScene {
    /// All faces of all shapes, in shape order.
    pub fn faces(&self) -> Vec<Face> {
        self.shapes
            .iter()
            .flat_map(|shape| {
                shape
                    .primitive
                    .faces(self.segments)
                    .into_iter()
                    .map(|points| Face {
                        points,
                        color: shape.color,
                    })
            })
            .collect()
    }

    fn push(&mut self, primitive: Primitive, color: Color32, label: impl Into<String>) {
        let label = label.into();
        if !self.legend.iter().any(|(l, _)| *l == label) {
            self.legend.push((label.clone(), color));
        }
        self.shapes.push(Shape {
            primitive,
            color,
            label,
        });
    }

    fn fit_radius(&mut self) {
        self.radius = self
            .faces()
            .iter()
            .flat_map(|f| f.points.iter())
            .flat_map(|p| p.iter())
            .fold(1.0_f64, |acc, v| acc.max(v.abs()));
    }
}

/// Build the 3D model for the selected keys.
pub fn build_model(
    bundle: &FilteredBundle,
    keys: &SelectionKeys,
    config: &SceneConfig,
) -> ModelScene {
    let mut scene = ModelScene {
        title: format!("{} · {} · t={}", keys.region, keys.month, keys.timeseries),
        segments: config.cylinder_segments,
        ..Default::default()
    };
    let e = config.extent;

    let layers = layers(bundle.soil.as_ref());
    for layer in &layers {
        let color = color::with_alpha(color::soil_color(&layer.name), 0.35);
        scene.push(
            Primitive::Cuboid {
                min: [-e, -e, layer.bottom],
                max: [e, e, layer.top],
            },
            color,
            layer.name.clone(),
        );
    }

    let levels = add_wells(&mut scene, bundle.well.as_ref(), &layers, config);
    if !levels.is_empty() {
        let mean = levels.iter().sum::<f64>() / levels.len() as f64;
        scene.water_table = Some(mean);
        scene.push(
            Primitive::Plane {
                center: [0.0, 0.0, mean],
                half_size: e,
            },
            color::with_alpha(WATER, 0.3),
            "Water table",
        );
    }

    if bundle.precipitation.is_some() {
        let value = precipitation_value(bundle.precipitation.as_ref(), &keys.month);
        let puddles = puddles(value);
        let speed = bundle.infiltration.as_ref().and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(
                    t.f64_at(0, "Infiltration Speed")
                        .unwrap_or(DEFAULT_INFILTRATION_SPEED),
                )
            }
        });

        for (center, radius) in &puddles {
            scene.push(
                Primitive::Disc {
                    center: *center,
                    radius: *radius,
                },
                color::with_alpha(LIGHT_WATER, 0.6),
                "Puddle",
            );
            if let Some(speed) = speed {
                for depth in infiltration_depths(&layers, speed, scene.water_table) {
                    scene.push(
                        Primitive::Disc {
                            center: [center[0], center[1], depth],
                            radius: *radius,
                        },
                        color::with_alpha(INFILTRATION, 0.2),
                        "Infiltration",
                    );
                }
            }
        }
    }

    scene.fit_radius();
    log::debug!(
        "model: {} layers, {} shapes, water table {:?}",
        layers.len(),
        scene.shapes.len(),
        scene.water_table
    );
    scene
}

/// Layers from the soil table, or the default profile when soil is absent.
pub fn layers(soil: Option<&Table>) -> Vec<Layer> {
    let Some(soil) = soil else {
        log::warn!("no soil data, using the default profile");
        let mut top = 0.0;
        return DEFAULT_PROFILE
            .iter()
            .map(|(name, thickness)| {
                let layer = Layer {
                    name: name.to_string(),
                    top,
                    bottom: top - thickness,
                };
                top -= thickness;
                layer
            })
            .collect();
    };
    (0..soil.len())
        .filter_map(|row| {
            let name = soil.cell(row, "Soil Name")?.to_string();
            let lower = soil.f64_at(row, "Soil Index Lower")?;
            let higher = soil.f64_at(row, "Soil Index Higher")?;
            Some(Layer {
                name,
                top: -lower.min(higher),
                bottom: -lower.max(higher),
            })
        })
        .collect()
}

/// Depth the shafts reach: the confined layer's top, else the top of the
/// deepest layer, else that layer's bottom.
pub fn well_floor(layers: &[Layer]) -> f64 {
    if let Some(confined) = layers.iter().find(|l| l.name == "Confined Layer") {
        return confined.top;
    }
    let Some(deepest) = layers.iter().min_by(|a, b| a.bottom.total_cmp(&b.bottom)) else {
        return -10.0;
    };
    if deepest.top < 0.0 {
        deepest.top
    } else {
        deepest.bottom
    }
}

/// Adds a shaft and a water-level disc per well; returns the valid readings.
fn add_wells(
    scene: &mut ModelScene,
    well: Option<&Table>,
    layers: &[Layer],
    config: &SceneConfig,
) -> Vec<f64> {
    let Some(well) = well.filter(|t| !t.is_empty()) else {
        return Vec::new();
    };
    let columns = well_columns(Some(well));
    let palette = color::generate_palette(columns.len());
    let floor = well_floor(layers);
    let e = config.extent;
    // keep shafts inside the layer block
    let x0 = well.f64_at(0, "Xpos").unwrap_or(0.0).clamp(-e, e);
    let y0 = well.f64_at(0, "Ypos").unwrap_or(0.0).clamp(-e, e);

    let mut levels = Vec::new();
    for ((col, offset), color) in columns
        .iter()
        .zip(linspace(-WELL_SPAN, WELL_SPAN, columns.len()))
        .zip(palette)
    {
        let Some(level) = well.f64_at(0, col).filter(|v| v.is_finite()) else {
            log::warn!("{col} has no reading at this timestamp, skipped");
            continue;
        };
        let x = (x0 + offset).clamp(-e, e);
        scene.push(
            Primitive::Cylinder {
                base: [x, y0, floor],
                radius: config.well_radius,
                height: -floor,
            },
            color,
            col.clone(),
        );
        scene.push(
            Primitive::Disc {
                center: [x, y0, level],
                radius: config.well_radius * 2.0,
            },
            WATER,
            "Water level",
        );
        levels.push(level);
    }
    levels
}

/// Puddle discs for a month's precipitation: (center, radius).
pub fn puddles(value: f64) -> Vec<([f64; 3], f64)> {
    if value <= 0.0 {
        return Vec::new();
    }
    let n = ((value / 10.0).ceil() as usize).min(MAX_PUDDLES);
    let radius = (0.3 + 0.01 * value).clamp(0.3, 3.0);
    (0..n)
        .map(|i| {
            (
                [
                    lerp(-PUDDLE_SPAN, PUDDLE_SPAN, spread(i, 0.17)),
                    lerp(-PUDDLE_SPAN, PUDDLE_SPAN, spread(i * 3 + 1, 0.61)),
                    0.05,
                ],
                radius,
            )
        })
        .collect()
}

/// Depths of the infiltration discs under a puddle, one per layer,
/// stopping at the water table.
pub fn infiltration_depths(layers: &[Layer], speed: f64, water_table: Option<f64>) -> Vec<f64> {
    let mut depth = 0.0;
    let mut out = Vec::new();
    for layer in layers {
        depth -= (layer.top - layer.bottom) * speed;
        if water_table.is_some_and(|wt| depth <= wt) {
            break;
        }
        out.push(depth);
    }
    out
}

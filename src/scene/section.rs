use eframe::egui::Color32;

use crate::color::{self, GRAVEL_FUNNEL, INFILTRATION, LIGHT_WATER, SANDY_FUNNEL, WATER};
use crate::data::filter::{FilteredBundle, SelectionKeys};
use crate::data::model::Table;

use super::{lerp, precipitation_value, spread, well_columns};

/// The section spans x in [-HALF_WIDTH, HALF_WIDTH].
pub const HALF_WIDTH: f64 = 50.0;

const MAX_DROPS: usize = 2000;
const MAX_PATHS: usize = 200;
const PATH_POINTS: usize = 20;
const SHAFT_TOP: f64 = 3.0;
const SHAFT_BOTTOM: f64 = 80.0;
const PUDDLE_COUNT: usize = 7;

/// Rain stops after this step.
const RAIN_CUTOFF: i64 = 180;
/// Infiltration paths are drawn before this step; pumping starts here.
const PUMPING_START: i64 = 480;
const PUDDLE_CUTOFF: i64 = 420;

/// A horizontal soil band. `top`/`bottom` are y values (depth is negative).
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub name: String,
    pub top: f64,
    pub bottom: f64,
    pub color: Color32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Shaft,
    SandyFunnel,
    GravelFunnel,
    WaterLevel,
}

impl SegmentKind {
    pub fn label(self) -> &'static str {
        match self {
            SegmentKind::Shaft => "Well",
            SegmentKind::SandyFunnel => "Sandy Funnel",
            SegmentKind::GravelFunnel => "Gravel Funnel",
            SegmentKind::WaterLevel => "Water Level",
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            SegmentKind::Shaft => Color32::BLACK,
            SegmentKind::SandyFunnel => SANDY_FUNNEL,
            SegmentKind::GravelFunnel => GRAVEL_FUNNEL,
            SegmentKind::WaterLevel => WATER,
        }
    }

    pub fn width(self) -> f32 {
        match self {
            SegmentKind::Shaft | SegmentKind::WaterLevel => 2.0,
            SegmentKind::SandyFunnel | SegmentKind::GravelFunnel => 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub from: [f64; 2],
    pub to: [f64; 2],
}

/// Everything the 2D view draws.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionScene {
    pub title: String,
    pub bands: Vec<Band>,
    pub segments: Vec<Segment>,
    pub infiltration_paths: Vec<Vec<[f64; 2]>>,
    pub drops: Vec<[f64; 2]>,
    pub puddles: Vec<[f64; 2]>,
    pub fountains: Vec<Vec<[f64; 2]>>,
    pub pumped: Vec<[f64; 2]>,
}

impl SectionScene {
    pub const DROP_COLOR: Color32 = WATER;
    pub const PUDDLE_COLOR: Color32 = LIGHT_WATER;
    pub const PATH_COLOR: Color32 = INFILTRATION;
}

/// Build the cross-section for the selected month and timeseries step.
pub fn build_section(bundle: &FilteredBundle, keys: &SelectionKeys) -> SectionScene {
    let ts = keys.timeseries;
    let mut scene = SectionScene {
        title: format!("{} · {} · t={}", keys.region, keys.month, ts),
        bands: soil_bands(bundle.soil.as_ref()),
        ..Default::default()
    };

    if bundle.precipitation.is_some() {
        let value = precipitation_value(bundle.precipitation.as_ref(), &keys.month);
        let n = rain_drop_count(value, ts);
        scene.drops = (0..n)
            .map(|i| {
                [
                    lerp(-HALF_WIDTH, HALF_WIDTH, spread(i, 0.11)),
                    lerp(0.0, 10.0, spread(i * 7 + 3, 0.53)),
                ]
            })
            .collect();
    }

    if let Some(rate) = bundle
        .infiltration
        .as_ref()
        .and_then(|t| t.f64_at(0, "Infiltration Rate"))
    {
        if ts < PUMPING_START {
            scene.infiltration_paths = (0..infiltration_path_count(rate))
                .map(infiltration_path)
                .collect();
        }
    }

    if bundle.well.is_some() {
        add_wells(&mut scene, bundle.well.as_ref(), ts);
    }

    let puddle_count = if ts <= PUDDLE_CUTOFF { PUDDLE_COUNT } else { 0 };
    scene.puddles = (0..puddle_count)
        .map(|i| [lerp(-HALF_WIDTH, HALF_WIDTH, spread(i, 0.71)), 0.0])
        .collect();

    log::debug!(
        "section: {} bands, {} drops, {} paths, {} segments, {} puddles",
        scene.bands.len(),
        scene.drops.len(),
        scene.infiltration_paths.len(),
        scene.segments.len(),
        scene.puddles.len()
    );
    scene
}

fn soil_bands(soil: Option<&Table>) -> Vec<Band> {
    let Some(soil) = soil else {
        return Vec::new();
    };
    (0..soil.len())
        .filter_map(|row| {
            let name = soil.cell(row, "Soil Name")?.to_string();
            let (Some(lower), Some(higher)) = (
                soil.f64_at(row, "Soil Index Lower"),
                soil.f64_at(row, "Soil Index Higher"),
            ) else {
                log::warn!("soil row {row} ({name}) has no numeric depth bounds, skipped");
                return None;
            };
            Some(Band {
                color: color::with_alpha(color::soil_color(&name), 0.5),
                name,
                top: -lower,
                bottom: -higher,
            })
        })
        .collect()
}

/// Raindrops for a month's precipitation, thinning out after step 60.
pub fn rain_drop_count(value: f64, timeseries: i64) -> usize {
    if timeseries > RAIN_CUTOFF || value <= 0.0 {
        return 0;
    }
    let intensity = (1.0 - (timeseries - 60).max(0) as f64 / 120.0).max(0.0);
    let base = (value * 10.0).floor();
    ((base * intensity).floor() as usize).min(MAX_DROPS)
}

/// Lower rates give more paths.
pub fn infiltration_path_count(rate: f64) -> usize {
    if rate <= 0.0 || !rate.is_finite() {
        return MAX_PATHS;
    }
    ((5000.0 / rate).floor() as usize).clamp(5, MAX_PATHS)
}

fn infiltration_path(i: usize) -> Vec<[f64; 2]> {
    let mut x = lerp(-HALF_WIDTH, HALF_WIDTH, spread(i, 0.27));
    (0..PATH_POINTS)
        .map(|j| {
            let depth = 5.0 + 30.0 * j as f64 / (PATH_POINTS - 1) as f64;
            x += lerp(-1.0, 1.0, spread(i * PATH_POINTS + j, 0.91));
            [x, -depth]
        })
        .collect()
}

/// x positions of `n` evenly spaced shafts.
pub fn well_x_positions(n: usize) -> Vec<f64> {
    let spacing = 2.0 * HALF_WIDTH / (n + 1) as f64;
    (0..n)
        .map(|i| -HALF_WIDTH + (i + 1) as f64 * spacing)
        .collect()
}

fn add_wells(scene: &mut SectionScene, well: Option<&Table>, ts: i64) {
    let columns = well_columns(well);
    for (i, (col, x)) in columns
        .iter()
        .zip(well_x_positions(columns.len()))
        .enumerate()
    {
        let seg = |kind, from, to| Segment { kind, from, to };
        scene
            .segments
            .push(seg(SegmentKind::Shaft, [x, -SHAFT_TOP], [x, -SHAFT_BOTTOM]));
        scene
            .segments
            .push(seg(SegmentKind::SandyFunnel, [x - 2.0, -10.0], [x + 2.0, -15.0]));
        scene
            .segments
            .push(seg(SegmentKind::GravelFunnel, [x - 3.0, -20.0], [x + 3.0, -25.0]));

        if let Some(level) = well
            .and_then(|t| t.f64_at(0, col))
            .filter(|v| v.is_finite())
        {
            scene
                .segments
                .push(seg(SegmentKind::WaterLevel, [x - 2.5, level], [x + 2.5, level]));
        }

        if ts >= PUMPING_START {
            scene.fountains.push(
                (0..10)
                    .map(|k| {
                        let h = 5.0 * k as f64 / 9.0;
                        [x + lerp(-2.0, 2.0, spread(i * 10 + k, 0.37)), h]
                    })
                    .collect(),
            );
            scene.pumped.extend((0..5).map(|k| {
                [
                    x + lerp(-5.0, 5.0, spread(i * 5 + k, 0.19)),
                    -lerp(3.0, 10.0, spread(i * 5 + k, 0.83)),
                ]
            }));
        }
    }
}

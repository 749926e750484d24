use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eframe::egui;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::state::{AppState, Notice};

// ---------------------------------------------------------------------------
// View export: save dialog → viewport screenshot → image file
// ---------------------------------------------------------------------------

/// Ask for an output file; the capture happens on the next frame.
pub fn choose_export_path(state: &mut AppState) {
    let default_name = format!(
        "hydroscope_{}.png",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let path = rfd::FileDialog::new()
        .set_title("Export view")
        .set_file_name(default_name)
        .add_filter("PNG", &["png"])
        .add_filter("JPEG", &["jpg", "jpeg"])
        .add_filter("GIF", &["gif"])
        .save_file();
    state.pending_export = path;
}

/// Request the screenshot for a pending export and save it when it arrives.
pub fn handle_export(ctx: &egui::Context, state: &mut AppState) {
    if let Some(path) = state.pending_export.take() {
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::new(path)));
    }

    let events = ctx.input(|i| i.events.clone());
    for event in events {
        let egui::Event::Screenshot { image, user_data, .. } = event else {
            continue;
        };
        let Some(path) = user_data
            .data
            .as_ref()
            .and_then(|u| u.downcast_ref::<PathBuf>().cloned())
        else {
            continue;
        };
        match save_color_image(&image, &path) {
            Ok(()) => {
                log::info!("Exported view to {}", path.display());
                state.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.notices.push(Notice::error(format!("Export failed: {e:#}")));
            }
        }
    }
}

/// Write an egui image; the format follows the file extension.
pub fn save_color_image(image: &egui::ColorImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("unknown image format for {}", path.display()))?;
    let [w, h] = image.size;
    let rgba = RgbaImage::from_raw(w as u32, h as u32, image.as_raw().to_vec())
        .context("screenshot buffer has the wrong size")?;

    let out = match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8()),
        ImageFormat::Png | ImageFormat::Gif => DynamicImage::ImageRgba8(rgba),
        other => anyhow::bail!("unsupported export format {other:?}"),
    };
    out.save_with_format(path, format)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{Color32, ColorImage};

    #[test]
    fn saves_png_jpeg_and_gif() {
        let dir = tempfile::tempdir().unwrap();
        let image = ColorImage::new([4, 3], Color32::from_rgb(30, 90, 220));
        for name in ["view.png", "view.jpg", "view.gif"] {
            let path = dir.path().join(name);
            save_color_image(&image, &path).unwrap();
            let back = image::open(&path).unwrap();
            assert_eq!((back.width(), back.height()), (4, 3));
        }
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let image = ColorImage::new([1, 1], Color32::WHITE);
        assert!(save_color_image(&image, &dir.path().join("view.xyz")).is_err());
        assert!(save_color_image(&image, &dir.path().join("view.bmp")).is_err());
    }
}

use std::sync::Arc;

use eframe::egui;
use egui::epaint::{Galley, Shape};

/// Runs `draw` for two frames (grids and windows settle their size on the
/// first) and returns every text galley painted in the second.
pub fn painted_galleys(mut draw: impl FnMut(&egui::Context)) -> Vec<Arc<Galley>> {
    let ctx = egui::Context::default();
    let _ = ctx.run(egui::RawInput::default(), &mut draw);
    let output = ctx.run(egui::RawInput::default(), &mut draw);

    let mut galleys = Vec::new();
    for clipped in &output.shapes {
        collect(&clipped.shape, &mut galleys);
    }
    galleys
}

pub fn painted_text(draw: impl FnMut(&egui::Context)) -> Vec<String> {
    painted_galleys(draw)
        .iter()
        .map(|g| g.text().to_string())
        .collect()
}

fn collect(shape: &Shape, out: &mut Vec<Arc<Galley>>) {
    match shape {
        Shape::Text(text) => out.push(text.galley.clone()),
        Shape::Vec(shapes) => shapes.iter().for_each(|s| collect(s, out)),
        _ => {}
    }
}

use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, Painter, Pos2, Sense, Shape, Stroke, Ui, vec2};

use crate::color;
use crate::data::views::CategoryMark;

const RADIUS: f32 = 150.0;
/// Maximum angle covered by one triangle of a wedge.
const ARC_STEP: f32 = 0.04;
const SWATCH: f32 = 15.0;

// ---------------------------------------------------------------------------
// Race/ethnicity pie chart
// ---------------------------------------------------------------------------

/// Draw the pie with its legend. Returns the label of a slice clicked this
/// frame.
pub fn race_pie_chart(ui: &mut Ui, slices: &[CategoryMark]) -> Option<String> {
    if slices.is_empty() {
        ui.label("No race/ethnicity values to show.");
        return None;
    }

    let palette = color::generate_palette(slices.len());
    let fills: Vec<Color32> = slices
        .iter()
        .zip(&palette)
        .map(|(s, &c)| if s.selected { color::SELECTED } else { c })
        .collect();

    let (response, painter) = ui.allocate_painter(vec2(RADIUS * 2.0, RADIUS * 2.0), Sense::click());
    let center = response.rect.center();

    // Angular span of each slice, starting at twelve o'clock.
    let mut spans = Vec::with_capacity(slices.len());
    let mut start = -FRAC_PI_2;
    for (slice, &fill) in slices.iter().zip(&fills) {
        let sweep = slice.share as f32 * TAU;
        draw_wedge(&painter, center, start, sweep, fill);
        spans.push((start, start + sweep));
        start += sweep;
    }
    if slices.len() > 1 {
        for &(from, _) in &spans {
            painter.line_segment(
                [center, center + RADIUS * vec2(from.cos(), from.sin())],
                Stroke::new(2.0, Color32::WHITE),
            );
        }
    }

    let hovered = response
        .hover_pos()
        .and_then(|pos| slice_at(center, pos, &spans));
    let clicked = response.clicked();

    if let Some(idx) = hovered {
        if let Some(slice) = slices.get(idx) {
            response.on_hover_text_at_pointer(slice.tooltip());
        }
    }

    ui.add_space(8.0);
    for (slice, &fill) in slices.iter().zip(&palette) {
        ui.horizontal(|ui: &mut Ui| {
            let (rect, _) = ui.allocate_exact_size(vec2(SWATCH, SWATCH), Sense::hover());
            ui.painter().rect_filled(rect, 2.0, fill);
            let text = egui::RichText::new(&slice.label);
            ui.label(if slice.selected { text.strong() } else { text });
        });
    }

    if clicked {
        hovered.and_then(|idx| slices.get(idx)).map(|s| s.label.clone())
    } else {
        None
    }
}

/// Fill a circular sector as a fan of thin triangles (a wedge wider than a
/// half-turn is not convex).
fn draw_wedge(painter: &Painter, center: Pos2, start: f32, sweep: f32, fill: Color32) {
    if sweep <= 0.0 {
        return;
    }
    let steps = (sweep / ARC_STEP).ceil().max(1.0) as usize;
    let point = |a: f32| center + RADIUS * vec2(a.cos(), a.sin());
    for i in 0..steps {
        let a0 = start + sweep * i as f32 / steps as f32;
        let a1 = start + sweep * (i + 1) as f32 / steps as f32;
        painter.add(Shape::convex_polygon(
            vec![center, point(a0), point(a1)],
            fill,
            Stroke::NONE,
        ));
    }
}

/// Index of the slice under `pos`, if `pos` lies inside the disc.
fn slice_at(center: Pos2, pos: Pos2, spans: &[(f32, f32)]) -> Option<usize> {
    let offset = pos - center;
    if offset.length() > RADIUS {
        return None;
    }
    let mut angle = offset.y.atan2(offset.x);
    if angle < -FRAC_PI_2 {
        angle += TAU;
    }
    spans
        .iter()
        .position(|&(from, to)| angle >= from && angle < to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn test_slice_at_quadrants() {
        let center = pos2(0.0, 0.0);
        // Two halves: right half first (clockwise from twelve o'clock), then left.
        let spans = [(-FRAC_PI_2, FRAC_PI_2), (FRAC_PI_2, FRAC_PI_2 + std::f32::consts::PI)];
        assert_eq!(slice_at(center, pos2(10.0, 0.0), &spans), Some(0));
        assert_eq!(slice_at(center, pos2(-10.0, 0.0), &spans), Some(1));
        assert_eq!(slice_at(center, pos2(-10.0, -10.0), &spans), Some(1));
        assert_eq!(slice_at(center, pos2(RADIUS + 1.0, 0.0), &spans), None);
    }
}

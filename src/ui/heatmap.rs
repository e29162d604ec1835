//! Age group × race/ethnicity heatmap, drawn directly with the painter.

use std::f32::consts::FRAC_PI_4;

use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, StrokeKind, Ui, pos2, vec2,
};

use crate::color;
use crate::data::views::{HeatmapCell, HeatmapGrid};

const CELL: f32 = 44.0;
/// Space left of the grid for race labels.
const ROW_LABEL_WIDTH: f32 = 260.0;
/// Space below the grid for rotated age labels.
const COLUMN_LABEL_HEIGHT: f32 = 90.0;
const LEGEND_WIDTH: f32 = 300.0;
const LEGEND_HEIGHT: f32 = 20.0;
const LEGEND_STEPS: usize = 60;

/// Geometry of the drawn grid.
struct Layout {
    origin: Pos2,
    columns: usize,
    rows: usize,
}

impl Layout {
    fn cell_rect(&self, column: usize, row: usize) -> Rect {
        Rect::from_min_size(
            self.origin + vec2(column as f32 * CELL, row as f32 * CELL),
            vec2(CELL, CELL),
        )
    }

    /// `(column, row)` of the cell under `pos`.
    fn cell_at(&self, pos: Pos2) -> Option<(usize, usize)> {
        let local = pos - self.origin;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let column = (local.x / CELL) as usize;
        let row = (local.y / CELL) as usize;
        (column < self.columns && row < self.rows).then_some((column, row))
    }
}

/// Draw the heatmap and its colour legend.
pub fn heatmap(ui: &mut Ui, grid: &HeatmapGrid) {
    if grid.age_groups.is_empty() || grid.races.is_empty() {
        ui.label("No age group / race combinations to show.");
        return;
    }

    let layout_size = vec2(
        ROW_LABEL_WIDTH + grid.age_groups.len() as f32 * CELL,
        grid.races.len() as f32 * CELL + COLUMN_LABEL_HEIGHT,
    );
    let (response, painter) = ui.allocate_painter(layout_size, Sense::hover());
    let layout = Layout {
        origin: response.rect.min + vec2(ROW_LABEL_WIDTH, 0.0),
        columns: grid.age_groups.len(),
        rows: grid.races.len(),
    };
    let font = FontId::proportional(12.0);
    let text_color = ui.visuals().text_color();

    // Background for every slot, so empty combinations stay visible.
    for row in 0..layout.rows {
        for column in 0..layout.columns {
            painter.rect_filled(layout.cell_rect(column, row).shrink(1.0), 0.0, ui.visuals().faint_bg_color);
        }
    }

    for cell in &grid.cells {
        let rect = layout.cell_rect(cell.column, cell.row).shrink(1.0);
        painter.rect_filled(rect, 0.0, color::count_color(cell.count, grid.max_count));
        if cell.highlighted {
            painter.rect_stroke(
                rect,
                0.0,
                Stroke::new(2.5, color::HIGHLIGHT_STROKE),
                StrokeKind::Inside,
            );
        }
    }

    for (row, race) in grid.races.iter().enumerate() {
        painter.text(
            pos2(layout.origin.x - 6.0, layout.cell_rect(0, row).center().y),
            Align2::RIGHT_CENTER,
            race,
            font.clone(),
            text_color,
        );
    }

    // Column labels rotated 45° like a slanted axis.
    let bottom = layout.origin.y + layout.rows as f32 * CELL + 6.0;
    for (column, age) in grid.age_groups.iter().enumerate() {
        let galley = painter.layout_no_wrap(age.clone(), font.clone(), text_color);
        let anchor = pos2(layout.cell_rect(column, 0).center().x, bottom);
        // Text runs up-right from `start` and ends at the column anchor.
        let width = galley.size().x;
        let start = anchor + vec2(-width * FRAC_PI_4.cos(), width * FRAC_PI_4.sin());
        painter.add(Shape::Text(
            egui::epaint::TextShape::new(start, galley, text_color).with_angle(-FRAC_PI_4),
        ));
    }

    if let Some(cell) = response
        .hover_pos()
        .and_then(|pos| layout.cell_at(pos))
        .and_then(|(column, row)| find_cell(grid, column, row))
    {
        response.on_hover_text_at_pointer(grid.tooltip(cell));
    }

    ui.add_space(8.0);
    legend(ui, grid.max_count);
}

fn find_cell(grid: &HeatmapGrid, column: usize, row: usize) -> Option<&HeatmapCell> {
    grid.cells
        .iter()
        .find(|c| c.column == column && c.row == row)
}

/// Horizontal gradient bar labelled `0 … max`.
fn legend(ui: &mut Ui, max_count: usize) {
    let (rect, _) = ui.allocate_exact_size(vec2(LEGEND_WIDTH, LEGEND_HEIGHT + 16.0), Sense::hover());
    let painter = ui.painter();
    let step = LEGEND_WIDTH / LEGEND_STEPS as f32;
    for i in 0..LEGEND_STEPS {
        let t = i as f32 / (LEGEND_STEPS - 1) as f32;
        let slot = Rect::from_min_size(
            rect.min + vec2(i as f32 * step, 0.0),
            vec2(step + 0.5, LEGEND_HEIGHT),
        );
        painter.rect_filled(slot, 0.0, color::viridis(t));
    }

    let font = FontId::proportional(11.0);
    let text_color = ui.visuals().text_color();
    let baseline = rect.min.y + LEGEND_HEIGHT + 2.0;
    painter.text(pos2(rect.min.x, baseline), Align2::LEFT_TOP, "0", font.clone(), text_color);
    painter.text(
        pos2(rect.max.x, baseline),
        Align2::RIGHT_TOP,
        max_count.to_string(),
        font,
        text_color,
    );
    if max_count == 0 {
        painter.text(
            rect.center() - vec2(0.0, 8.0),
            Align2::CENTER_CENTER,
            "no matching records",
            FontId::proportional(11.0),
            Color32::WHITE,
        );
    }
}

use std::f64::consts::TAU;
use std::path::Path;

use boxoffice_core::{Dataset, YearlyAggregate};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::select::{pie_slices, PieSlice};
use super::{draw_err, render_to, ChartError, ChartKind, ChartRenderer};

type Pixel = (i32, i32);

/// Point at `radius` and `angle` from `center`, angles counter-clockwise.
fn polar(center: Pixel, radius: f64, angle: f64) -> Pixel {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 - (radius * angle.sin()).round() as i32,
    )
}

/// Closed outline of one wedge, roughly one vertex per degree of arc.
fn wedge(center: Pixel, radius: f64, slice: &PieSlice) -> Vec<Pixel> {
    let sweep = slice.end - slice.start;
    let steps = ((sweep / TAU) * 360.0).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for k in 0..=steps {
        let angle = slice.start + sweep * k as f64 / steps as f64;
        points.push(polar(center, radius, angle));
    }
    points
}

impl ChartRenderer {
    /// Yearly share of total box office, one wedge per year.
    ///
    /// With no positive yearly total the image holds only the title and a notice.
    pub(super) fn render_yearly_share(&self, dataset: &Dataset, path: &Path) -> Result<(), ChartError> {
        ChartKind::YearlyShare.check_input(dataset)?;

        // Empty when no record is dated or every yearly total is zero.
        let slices = pie_slices(&YearlyAggregate::from_dataset(dataset));

        let text = self.text_enabled();
        let (width, height) = self.config.square_size;
        let title_room = if text { self.config.title_font_size as i32 } else { 0 };
        let center = ((width / 2) as i32, (height / 2) as i32 + title_room / 2);
        let radius = f64::from(width.min(height)) * 0.35;

        render_to(path, self.config.square_size, |root| {
            for (i, slice) in slices.iter().enumerate() {
                root.draw(&Polygon::new(
                    wedge(center, radius, slice),
                    Palette99::pick(i).filled(),
                ))
                .map_err(draw_err)?;
            }

            if !text {
                return Ok(());
            }

            if slices.is_empty() {
                self.draw_notice(root, "没有可统计的年度票房")?;
            }

            let centered = Pos::new(HPos::Center, VPos::Center);
            let label_style = self.label_style().pos(centered);
            for slice in &slices {
                let mid = slice.mid_angle();
                root.draw(&Text::new(
                    slice.percent_label(),
                    polar(center, radius * 0.6, mid),
                    label_style.clone(),
                ))
                .map_err(draw_err)?;
                root.draw(&Text::new(
                    slice.label(),
                    polar(center, radius * 1.1, mid),
                    label_style.clone(),
                ))
                .map_err(draw_err)?;
            }

            root.draw(&Text::new(
                ChartKind::YearlyShare.title(),
                ((width / 2) as i32, 20),
                self.title_style().pos(Pos::new(HPos::Center, VPos::Top)),
            ))
            .map_err(draw_err)?;
            Ok(())
        })
    }
}

use std::path::Path;

use boxoffice_core::Dataset;
use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;

use super::{draw_err, padded_range, render_to, ChartError, ChartKind, ChartRenderer};

/// Days since 0001-01-01, the x coordinate used for release dates.
fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn day_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

impl ChartRenderer {
    /// Box office over release date, one labeled marker per dated movie.
    ///
    /// Undated records are skipped; with none dated the axes are drawn empty.
    pub(super) fn render_release_line(&self, dataset: &Dataset, path: &Path) -> Result<(), ChartError> {
        ChartKind::ReleaseLine.check_input(dataset)?;

        // Dataset order is release order.
        let points: Vec<(f64, f64, &str)> = dataset
            .dated()
            .map(|(rec, date)| (day_number(date), rec.box_office, rec.name.as_str()))
            .collect();

        let x_range = padded_range(points.iter().map(|p| p.0));
        let y_range = padded_range(points.iter().map(|p| p.1));
        let text = self.text_enabled();
        let color = Palette99::pick(0);

        render_to(path, self.config.wide_size, |root| {
            let mut builder = ChartBuilder::on(root);
            builder
                .margin(20)
                .x_label_area_size(if text { 60 } else { 10 })
                .y_label_area_size(if text { 100 } else { 10 });
            if text {
                builder.caption(ChartKind::ReleaseLine.title(), self.title_style());
            }
            let mut chart = builder
                .build_cartesian_2d(x_range, y_range)
                .map_err(draw_err)?;

            // Without a font the axes carry no text, so the mesh is skipped.
            if text {
                let date_fmt = |x: &f64| day_label(*x);
                chart
                    .configure_mesh()
                    .x_desc("上映日期")
                    .y_desc("总票房（万元）")
                    .x_labels(8)
                    .x_label_formatter(&date_fmt)
                    .label_style(self.label_style())
                    .draw()
                    .map_err(draw_err)?;
                if points.is_empty() {
                    self.draw_notice(root, "没有可解析的上映日期")?;
                }
            }

            chart
                .draw_series(LineSeries::new(
                    points.iter().map(|&(x, y, _)| (x, y)),
                    color.stroke_width(2),
                ))
                .map_err(draw_err)?;
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y, _)| Circle::new((x, y), 4, color.filled())),
                )
                .map_err(draw_err)?;

            if text {
                let style = self.label_style();
                let offset = self.annotation_offset();
                chart
                    .draw_series(points.iter().map(|&(x, y, name)| {
                        EmptyElement::at((x, y)) + Text::new(name.to_string(), offset, style.clone())
                    }))
                    .map_err(draw_err)?;
            }
            Ok(())
        })
    }
}

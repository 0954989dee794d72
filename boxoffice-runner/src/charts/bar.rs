use std::path::Path;

use boxoffice_core::{Dataset, MovieRecord};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::select::top_n_by;
use super::{draw_err, render_to, zero_based_range, ChartError, ChartKind, ChartRenderer};

/// One bar: movie name and its value.
#[derive(Debug, Clone, PartialEq)]
struct Bar {
    name: String,
    value: f64,
}

fn bars(records: &[MovieRecord], n: usize, metric: fn(&MovieRecord) -> f64) -> Vec<Bar> {
    top_n_by(records, n, metric)
        .into_iter()
        .map(|r| Bar {
            name: r.name.clone(),
            value: metric(r),
        })
        .collect()
}

impl ChartRenderer {
    pub(super) fn render_top_ticket_price(&self, dataset: &Dataset, path: &Path) -> Result<(), ChartError> {
        self.render_top_bars(
            ChartKind::TopTicketPrice,
            dataset,
            path,
            |r| r.avg_ticket_price,
            "平均票价（元）",
        )
    }

    pub(super) fn render_top_audience(&self, dataset: &Dataset, path: &Path) -> Result<(), ChartError> {
        self.render_top_bars(
            ChartKind::TopAudience,
            dataset,
            path,
            |r| r.avg_audience_per_showing,
            "平均场次观众数",
        )
    }

    fn render_top_bars(
        &self,
        kind: ChartKind,
        dataset: &Dataset,
        path: &Path,
        metric: fn(&MovieRecord) -> f64,
        value_desc: &str,
    ) -> Result<(), ChartError> {
        kind.check_input(dataset)?;

        let bars = bars(dataset.records(), self.config.bar_top_n, metric);
        let y_range = zero_based_range(bars.iter().map(|b| b.value));
        let text = self.text_enabled();

        render_to(path, self.config.wide_size, |root| {
            let mut builder = ChartBuilder::on(root);
            builder
                .margin(20)
                .x_label_area_size(if text { 180 } else { 10 })
                .y_label_area_size(if text { 90 } else { 10 });
            if text {
                builder.caption(kind.title(), self.title_style());
            }
            let mut chart = builder
                .build_cartesian_2d((0..bars.len()).into_segmented(), y_range)
                .map_err(draw_err)?;

            if text {
                let name_fmt = |v: &SegmentValue<usize>| match v {
                    SegmentValue::CenterOf(i) => {
                        bars.get(*i).map(|b| b.name.clone()).unwrap_or_default()
                    }
                    _ => String::new(),
                };
                chart
                    .configure_mesh()
                    .disable_x_mesh()
                    .x_desc("电影")
                    .y_desc(value_desc)
                    .x_labels(bars.len())
                    .x_label_formatter(&name_fmt)
                    .x_label_style(
                        self.label_style()
                            .transform(FontTransform::Rotate90)
                            .pos(Pos::new(HPos::Left, VPos::Center)),
                    )
                    .y_label_style(self.label_style())
                    .axis_desc_style(self.label_style())
                    .draw()
                    .map_err(draw_err)?;
            }

            chart
                .draw_series(
                    Histogram::vertical(&chart)
                        .style(Palette99::pick(0).filled())
                        .margin(10)
                        .data(bars.iter().enumerate().map(|(i, b)| (i, b.value))),
                )
                .map_err(draw_err)?;
            Ok(())
        })
    }
}

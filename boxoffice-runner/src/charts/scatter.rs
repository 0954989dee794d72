use std::path::Path;

use boxoffice_core::Dataset;
use plotters::prelude::*;

use super::select::notable_records;
use super::{draw_err, padded_range, render_to, ChartError, ChartKind, ChartRenderer};

impl ChartRenderer {
    /// Ticket price against box office for every record.
    ///
    /// Only the notable records (top box office and top price) get a name
    /// label, so the plot stays readable with a full ranking.
    pub(super) fn render_price_vs_revenue(&self, dataset: &Dataset, path: &Path) -> Result<(), ChartError> {
        ChartKind::PriceVsRevenue.check_input(dataset)?;

        let records = dataset.records();
        let notable = notable_records(records, self.config.scatter_top_n);
        let x_range = padded_range(records.iter().map(|r| r.avg_ticket_price));
        let y_range = padded_range(records.iter().map(|r| r.box_office));
        let text = self.text_enabled();
        let color = Palette99::pick(0);

        render_to(path, self.config.wide_size, |root| {
            let mut builder = ChartBuilder::on(root);
            builder
                .margin(20)
                .x_label_area_size(if text { 60 } else { 10 })
                .y_label_area_size(if text { 100 } else { 10 });
            if text {
                builder.caption(ChartKind::PriceVsRevenue.title(), self.title_style());
            }
            let mut chart = builder
                .build_cartesian_2d(x_range, y_range)
                .map_err(draw_err)?;

            if text {
                chart
                    .configure_mesh()
                    .x_desc("平均票价（元）")
                    .y_desc("总票房（万元）")
                    .label_style(self.label_style())
                    .draw()
                    .map_err(draw_err)?;
            }

            chart
                .draw_series(records.iter().map(|r| {
                    Circle::new((r.avg_ticket_price, r.box_office), 5, color.filled())
                }))
                .map_err(draw_err)?;

            if text {
                let style = self.label_style();
                let offset = self.annotation_offset();
                chart
                    .draw_series(notable.iter().map(|r| {
                        EmptyElement::at((r.avg_ticket_price, r.box_office))
                            + Text::new(r.name.clone(), offset, style.clone())
                    }))
                    .map_err(draw_err)?;
            }
            Ok(())
        })
    }
}

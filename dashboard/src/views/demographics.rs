use analytics_api_caller::{json::CameraId, query::DemographicsQuery};

use super::View;
use crate::demographics::{chart::BarChart, distribution::DemographicsDistributions};

#[must_use]
pub struct DemographicsView<'a> {
    camera_id: CameraId,
    result_count: usize,
    distributions: &'a DemographicsDistributions,
}

impl<'a> DemographicsView<'a> {
    pub fn new(
        query: &DemographicsQuery,
        result_count: usize,
        distributions: &'a DemographicsDistributions,
    ) -> Self {
        Self {
            camera_id: query.camera_id,
            result_count,
            distributions,
        }
    }
}

impl View for DemographicsView<'_> {
    fn render(&self) -> String {
        let charts = [
            BarChart::new("Gender", &self.distributions.gender),
            BarChart::new("Age", &self.distributions.age),
            BarChart::new("Emotion", &self.distributions.emotion),
            BarChart::new("Ethnicity", &self.distributions.ethnicity),
        ];

        let mut out = format!(
            "Demographics for camera #{} ({} results)\n",
            self.camera_id, self.result_count
        );
        for chart in charts {
            out.push('\n');
            out.push_str(&chart.render());
        }
        out
    }
}

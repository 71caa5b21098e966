use analytics_api_caller::json::{
    categories::{AgeGroup, Emotion, Ethnicity, Gender},
    demographics::{CategoryCounts, DemographicsResult, DemographicsResults},
};

/// Counts per category label. Known categories come first in their natural order, then any
/// label the backend sent that we don't know, alphabetically.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct Distribution {
    entries: Vec<(String, u64)>,
}

impl Distribution {
    pub fn from_counts<'a>(
        counts: &CategoryCounts,
        known_order: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let known_order = known_order.into_iter().collect::<Vec<_>>();

        let mut entries = known_order
            .iter()
            .filter_map(|label| counts.get(*label).map(|count| ((*label).to_string(), *count)))
            .collect::<Vec<_>>();

        // BTreeMap iteration is already alphabetical
        entries.extend(
            counts
                .iter()
                .filter(|(label, _)| !known_order.contains(&label.as_str()))
                .map(|(label, count)| (label.clone(), *count)),
        );

        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |total, (_, count)| total.saturating_add(*count))
    }

    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.entries.iter().map(|(_, count)| *count).max().unwrap_or(0)
    }

    #[must_use]
    pub fn count(&self, label: &str) -> u64 {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0, |(_, count)| *count)
    }

    /// Share of `label` in percent, `None` if there is no data at all
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self, label: &str) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.count(label) as f64 * 100.0 / total as f64)
    }
}

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct DemographicsDistributions {
    pub gender: Distribution,
    pub age: Distribution,
    pub emotion: Distribution,
    pub ethnicity: Distribution,
}

impl DemographicsDistributions {
    /// Uses the backend's aggregates when present, otherwise sums up the result buckets
    pub fn from_results(results: &DemographicsResults) -> Self {
        match &results.analytics {
            Some(analytics) => Self::from_counts(
                &analytics.gender_distribution,
                &analytics.age_distribution,
                &analytics.emotion_distribution,
                &analytics.ethnicity_distribution,
            ),
            None => {
                tracing::debug!(
                    "No aggregates in response, aggregating {} results",
                    results.items.len()
                );
                Self::from_counts(
                    &aggregate(&results.items, |r| &r.gender),
                    &aggregate(&results.items, |r| &r.age),
                    &aggregate(&results.items, |r| &r.emotion),
                    &aggregate(&results.items, |r| &r.ethnicity),
                )
            }
        }
    }

    fn from_counts(
        gender: &CategoryCounts,
        age: &CategoryCounts,
        emotion: &CategoryCounts,
        ethnicity: &CategoryCounts,
    ) -> Self {
        Self {
            gender: Distribution::from_counts(gender, Gender::ALL.iter().map(|c| c.label())),
            age: Distribution::from_counts(age, AgeGroup::ALL.iter().map(|c| c.label())),
            emotion: Distribution::from_counts(emotion, Emotion::ALL.iter().map(|c| c.label())),
            ethnicity: Distribution::from_counts(
                ethnicity,
                Ethnicity::ALL.iter().map(|c| c.label()),
            ),
        }
    }
}

fn aggregate(
    items: &[DemographicsResult],
    bucket: impl Fn(&DemographicsResult) -> &CategoryCounts,
) -> CategoryCounts {
    let mut totals = CategoryCounts::new();
    for (label, count) in items.iter().flat_map(|item| bucket(item)) {
        let total = totals.entry(label.clone()).or_default();
        *total = total.saturating_add(*count);
    }
    totals
}

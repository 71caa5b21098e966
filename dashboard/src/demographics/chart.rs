use std::fmt::Write;

use super::distribution::Distribution;

const DEFAULT_BAR_WIDTH: u64 = 40;
const BAR_CHAR: char = '█';

/// A horizontal bar chart of a distribution, bars scaled to the largest count
#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct BarChart<'a> {
    title: &'a str,
    distribution: &'a Distribution,
    bar_width: u64,
}

impl<'a> BarChart<'a> {
    pub fn new(title: &'a str, distribution: &'a Distribution) -> Self {
        Self {
            title,
            distribution,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }

    pub fn with_bar_width(self, bar_width: u64) -> Self {
        Self { bar_width, ..self }
    }

    fn bar_length(&self, count: u64) -> usize {
        let max = self.distribution.max_count();
        if max == 0 {
            return 0;
        }
        // Rounded to the nearest cell
        let cells = (u128::from(count) * u128::from(self.bar_width) + u128::from(max / 2))
            / u128::from(max);
        usize::try_from(cells).unwrap_or(usize::MAX)
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} (total {})", self.title, self.distribution.total());

        if self.distribution.is_empty() {
            let _ = writeln!(out, "  No data");
            return out;
        }

        let label_width = self
            .distribution
            .entries()
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        for (label, count) in self.distribution.entries() {
            let bar = BAR_CHAR.to_string().repeat(self.bar_length(*count));
            let percentage = self.distribution.percentage(label).unwrap_or(0.0);
            let _ = writeln!(
                out,
                "  {label:<label_width$}  {bar} {count} ({percentage:.1}%)"
            );
        }

        out
    }
}

//! First-author × last-author gender tallies.

use std::fmt;

use super::{
    gender::{Gender, label},
    orchestrator::ResolvedRecord,
};

/// Labels in report order: `M`, `F`, then unresolved.
pub const LABEL_ORDER: [Option<Gender>; 3] = [Some(Gender::Male), Some(Gender::Female), None];

/// A (first author, last author) gender combination, e.g. `MF` or `NoneF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category {
    pub first: Option<Gender>,
    pub last: Option<Gender>,
}

impl Category {
    /// All nine categories in product order `M,F,None × M,F,None`.
    pub fn all() -> [Category; 9] {
        let mut categories = [Category {
            first: None,
            last: None,
        }; 9];
        for (i, first) in LABEL_ORDER.iter().enumerate() {
            for (j, last) in LABEL_ORDER.iter().enumerate() {
                categories[i * LABEL_ORDER.len() + j] = Category {
                    first: *first,
                    last: *last,
                };
            }
        }
        categories
    }

    fn index(self) -> usize {
        let position = |gender: Option<Gender>| match gender {
            Some(Gender::Male) => 0,
            Some(Gender::Female) => 1,
            None => 2,
        };
        position(self.first) * LABEL_ORDER.len() + position(self.last)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", label(self.first), label(self.last))
    }
}

/// Record counts for each of the nine categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenderReport {
    counts: [usize; 9],
}

impl GenderReport {
    pub fn from_records(records: &[ResolvedRecord]) -> Self {
        let mut report = Self::default();
        for record in records {
            let category = Category {
                first: record.first.gender,
                last: record.last.gender,
            };
            report.counts[category.index()] += 1;
        }
        report
    }

    pub fn count(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Categories with their counts, in report order.
    pub fn rows(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::all().into_iter().map(|c| (c, self.count(c)))
    }

    pub fn stats(&self) -> Stats {
        Stats::from_report(self)
    }
}

/// Share of records per category.
#[derive(Debug, Clone, PartialEq)]
pub enum Stats {
    Ratios(Vec<(Category, f64)>),
    /// The report holds no records, so ratios are undefined.
    NoData,
}

impl Stats {
    pub fn from_report(report: &GenderReport) -> Self {
        let total = report.total();
        if total == 0 {
            return Stats::NoData;
        }
        Stats::Ratios(
            report
                .rows()
                .map(|(category, count)| (category, count as f64 / total as f64))
                .collect(),
        )
    }

    /// Ratio per category in report order; `None` when there is no data.
    pub fn rows(&self) -> Vec<(Category, Option<f64>)> {
        match self {
            Stats::Ratios(ratios) => ratios.iter().map(|(c, r)| (*c, Some(*r))).collect(),
            Stats::NoData => Category::all().into_iter().map(|c| (c, None)).collect(),
        }
    }
}

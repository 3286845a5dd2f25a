use crate::{Error, Result};

/// A selectable population series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Total,      // Combined population
    Male,       // Male-identified population
    Female,     // Female-identified population
}

impl Metric {
    /// Column name in the tabular source.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Total => "total_population",
            Metric::Male => "population_male",
            Metric::Female => "population_female",
        }
    }

    /// Label used in status and tooltip text.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Total => "total population",
            Metric::Male => "population male",
            Metric::Female => "population female",
        }
    }

    pub fn order() -> [Metric; 3] {
        [Metric::Total, Metric::Male, Metric::Female]
    }

    /// Resolve a tabular column name back to its metric.
    pub fn from_column(name: &str) -> Result<Metric> {
        Metric::order()
            .into_iter()
            .find(|metric| metric.column() == name)
            .ok_or_else(|| Error::UnknownMetric(name.to_string()))
    }
}

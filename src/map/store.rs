use ahash::AHashMap;
use polars::prelude::{DataFrame, DataType, Float64Chunked};

use crate::{Error, Result};
use super::{Metric, RegionId};

/// Per-region values, one slot per selectable metric. Immutable after load.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegionRecord {
    pub total: f64,
    pub male: f64,
    pub female: f64,
}

impl RegionRecord {
    #[inline]
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Total => self.total,
            Metric::Male => self.male,
            Metric::Female => self.female,
        }
    }
}

/// Parsed per-region metric attributes, keyed by normalized region id.
#[derive(Debug, Clone, Default)]
pub struct MetricStore {
    records: AHashMap<RegionId, RegionRecord>,
}

impl MetricStore {
    /// Parse tabular rows into region records.
    ///
    /// `region_column` holds the region names; every metric column must be
    /// present and numeric for every row. Duplicate region rows keep the
    /// last occurrence.
    pub fn from_frame(df: &DataFrame, region_column: &str) -> Result<Self> {
        let names = df
            .column(region_column)
            .map_err(|_| Error::MissingColumn(region_column.to_string()))?
            .cast(&DataType::String)
            .map_err(|_| Error::Parse {
                region: "*".to_string(),
                column: region_column.to_string(),
            })?;
        let names = names.str().map_err(|_| Error::Parse {
            region: "*".to_string(),
            column: region_column.to_string(),
        })?;

        // Cast each metric column up front; unparseable entries surface as
        // nulls and are rejected row by row below.
        let mut columns = Vec::with_capacity(Metric::order().len());
        for metric in Metric::order() {
            let column = df
                .column(metric.column())
                .map_err(|_| Error::MissingColumn(metric.column().to_string()))?
                .cast(&DataType::Float64)
                .map_err(|_| Error::Parse {
                    region: "*".to_string(),
                    column: metric.column().to_string(),
                })?;
            columns.push(column);
        }
        let values: Vec<&Float64Chunked> = columns
            .iter()
            .map(|column| {
                column.f64().map_err(|_| Error::Parse {
                    region: "*".to_string(),
                    column: column.name().to_string(),
                })
            })
            .collect::<Result<_>>()?;

        let mut records = AHashMap::with_capacity(df.height());
        for idx in 0..df.height() {
            let name = names.get(idx).ok_or_else(|| Error::Parse {
                region: format!("row {idx}"),
                column: region_column.to_string(),
            })?;

            let mut slots = [0.0f64; 3];
            for (slot, (metric, column)) in Metric::order().iter().zip(&values).enumerate() {
                slots[slot] = column.get(idx).ok_or_else(|| Error::Parse {
                    region: name.to_string(),
                    column: metric.column().to_string(),
                })?;
            }

            records.insert(
                RegionId::new(name),
                RegionRecord { total: slots[0], male: slots[1], female: slots[2] },
            );
        }

        Ok(Self { records })
    }

    /// Build a store directly from records (no tabular source).
    pub fn from_records(records: impl IntoIterator<Item = (RegionId, RegionRecord)>) -> Self {
        Self { records: records.into_iter().collect() }
    }

    /// Stored value for `id`, or 0 when the region is unknown. Never fails.
    #[inline]
    pub fn get(&self, id: &RegionId, metric: Metric) -> f64 {
        self.records.get(id).map(|record| record.get(metric)).unwrap_or(0.0)
    }

    #[inline]
    pub fn record(&self, id: &RegionId) -> Option<&RegionRecord> {
        self.records.get(id)
    }

    #[inline]
    pub fn contains(&self, id: &RegionId) -> bool {
        self.records.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Full value distribution of `metric` across all regions.
    pub fn values(&self, metric: Metric) -> Vec<f64> {
        self.records.values().map(|record| record.get(metric)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RegionId, &RegionRecord)> {
        self.records.iter()
    }
}

//! Run configuration and the explicit pipeline context.
//!
//! The context carries everything one normalization run needs: the raw
//! dataset handle, the options, and the dimension tables built so far.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use hcn_ingest::RawDataset;
use hcn_model::Dimension;

use crate::dimension::DimensionTable;
use crate::status::{DEFAULT_ACTIVITY_CUTOFF, StatusRule};

/// Options for one normalization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Visits must fall strictly after this date for a patient to be active.
    pub activity_cutoff: NaiveDate,
    /// Build dimensions on the rayon thread pool.
    pub parallel: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            activity_cutoff: DEFAULT_ACTIVITY_CUTOFF,
            parallel: true,
        }
    }
}

impl NormalizeOptions {
    /// Set the activity cutoff date.
    #[must_use]
    pub fn with_activity_cutoff(mut self, cutoff: NaiveDate) -> Self {
        self.activity_cutoff = cutoff;
        self
    }

    /// Enable or disable parallel dimension builds.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn status_rule(&self) -> StatusRule {
        StatusRule::new(self.activity_cutoff)
    }
}

/// State of one normalization run.
#[derive(Debug)]
pub struct PipelineContext<'a> {
    raw: &'a RawDataset,
    options: NormalizeOptions,
    dimensions: BTreeMap<Dimension, DimensionTable>,
}

impl<'a> PipelineContext<'a> {
    pub fn new(raw: &'a RawDataset) -> Self {
        Self {
            raw,
            options: NormalizeOptions::default(),
            dimensions: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn raw(&self) -> &'a RawDataset {
        self.raw
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionTable> {
        self.dimensions.get(&dimension)
    }

    pub fn dimension_mut(&mut self, dimension: Dimension) -> Option<&mut DimensionTable> {
        self.dimensions.get_mut(&dimension)
    }

    pub fn dimensions(&self) -> &BTreeMap<Dimension, DimensionTable> {
        &self.dimensions
    }

    /// Stores a built dimension, replacing any earlier build of it.
    pub fn insert_dimension(&mut self, table: DimensionTable) {
        self.dimensions.insert(table.dimension, table);
    }

    pub(crate) fn into_dimensions(self) -> BTreeMap<Dimension, DimensionTable> {
        self.dimensions
    }
}

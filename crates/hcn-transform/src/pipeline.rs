//! The normalization pipeline.
//!
//! Order: every dimension is built (independently, in parallel by default),
//! then patient status is derived and merged into DimPatient, then the fact
//! table is assembled from the raw dataset and the finished lookups.

use std::collections::BTreeMap;
use std::time::Instant;

use polars::prelude::DataFrame;
use rayon::prelude::*;
use tracing::{Span, info, info_span};

use hcn_ingest::RawDataset;
use hcn_model::{Dimension, FACT_TABLE};

use crate::context::{NormalizeOptions, PipelineContext};
use crate::dimension::{BuildStats, DimensionTable, build_dimension};
use crate::error::{Result, TransformError};
use crate::fact::{FactTable, assemble_fact};
use crate::status::{attach_status, derive_statuses};

/// The complete dimensional schema produced by one run.
#[derive(Debug, Clone)]
pub struct NormalizedSchema {
    pub dimensions: BTreeMap<Dimension, DimensionTable>,
    pub fact: FactTable,
    pub options: NormalizeOptions,
}

impl NormalizedSchema {
    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionTable> {
        self.dimensions.get(&dimension)
    }

    /// All eleven tables in output order: dimensions, then `FactVisit`.
    pub fn tables(&self) -> Vec<(&'static str, &DataFrame)> {
        let mut tables: Vec<(&'static str, &DataFrame)> = self
            .dimensions
            .values()
            .map(|table| (table.table_name(), &table.frame))
            .collect();
        tables.push((FACT_TABLE, &self.fact.frame));
        tables
    }

    pub fn stats(&self, dimension: Dimension) -> Option<BuildStats> {
        self.dimension(dimension).map(|table| table.stats)
    }
}

/// Builds every dimension into the context.
///
/// Builds run on the rayon pool unless the options disable parallelism; each
/// build reads only the raw dataset, so the result does not depend on the mode.
pub fn build_dimensions(ctx: &mut PipelineContext<'_>) -> Result<()> {
    let raw = ctx.raw();
    let tables: Vec<DimensionTable> = if ctx.options().parallel {
        let span = Span::current();
        Dimension::ALL
            .par_iter()
            .map(|dimension| {
                let _guard = span.enter();
                build_dimension(*dimension, raw)
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        Dimension::ALL
            .iter()
            .map(|dimension| build_dimension(*dimension, raw))
            .collect::<Result<Vec<_>>>()?
    };
    for table in tables {
        ctx.insert_dimension(table);
    }
    Ok(())
}

/// Derives patient status and merges it into the built DimPatient.
pub fn apply_patient_status(ctx: &mut PipelineContext<'_>) -> Result<()> {
    let rule = ctx.options().status_rule();
    let statuses = derive_statuses(ctx.raw(), &rule);
    let patients = ctx
        .dimension_mut(Dimension::Patient)
        .ok_or(TransformError::MissingDimension(Dimension::Patient))?;
    attach_status(patients, &statuses)
}

impl PipelineContext<'_> {
    /// Runs the remaining stages and returns the finished schema.
    pub fn run(mut self) -> Result<NormalizedSchema> {
        let span = info_span!("normalize", records = self.raw().height());
        let _guard = span.enter();
        let start = Instant::now();

        let missing = Dimension::ALL
            .iter()
            .any(|dimension| self.dimension(*dimension).is_none());
        if missing {
            build_dimensions(&mut self)?;
        }
        apply_patient_status(&mut self)?;
        let fact = assemble_fact(self.raw(), self.dimensions())?;
        let options = *self.options();
        let dimensions = self.into_dimensions();

        info!(
            dimensions = dimensions.len(),
            fact_rows = fact.row_count(),
            duration_ms = start.elapsed().as_millis(),
            "normalization complete"
        );
        Ok(NormalizedSchema {
            dimensions,
            fact,
            options,
        })
    }
}

/// Normalizes a raw dataset into the dimensional schema.
pub fn normalize(raw: &RawDataset, options: NormalizeOptions) -> Result<NormalizedSchema> {
    PipelineContext::new(raw).with_options(options).run()
}

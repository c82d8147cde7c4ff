use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

impl IssueSeverity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

/// What a validation issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Fact rows whose foreign key is null (excluded identity in the source).
    NullForeignKey,
    /// Fact rows whose foreign key does not exist in the dimension.
    OrphanForeignKey,
    /// Referenced dimension row does not match the raw record it came from.
    RoundTripMismatch,
    /// The same surrogate key appears on several rows of one dimension.
    DuplicateDimensionKey,
    /// Distinct visit counts differ between raw input and fact table.
    VisitCountMismatch,
    /// The same `visit_id` appears on several raw rows.
    DuplicateVisitId,
}

impl IssueKind {
    pub fn severity(self) -> IssueSeverity {
        match self {
            Self::NullForeignKey | Self::DuplicateVisitId => IssueSeverity::Warning,
            Self::OrphanForeignKey
            | Self::RoundTripMismatch
            | Self::DuplicateDimensionKey
            | Self::VisitCountMismatch => IssueSeverity::Error,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::NullForeignKey => "FK001",
            Self::OrphanForeignKey => "FK002",
            Self::RoundTripMismatch => "FK003",
            Self::DuplicateDimensionKey => "DK001",
            Self::VisitCountMismatch => "FV001",
            Self::DuplicateVisitId => "FV002",
        }
    }
}

/// A single finding of the join validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub severity: IssueSeverity,
    /// Table the issue was found in.
    pub table: String,
    /// Column the issue was found in (if applicable).
    pub column: Option<String>,
    pub message: String,
    /// Number of affected rows.
    pub count: u64,
    /// A few offending values, for inspection.
    pub samples: Vec<String>,
}

impl ValidationIssue {
    pub fn new(kind: IssueKind, table: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            table: table.into(),
            column: None,
            message: message.into(),
            count: 0,
            samples: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn with_samples(mut self, samples: Vec<String>) -> Self {
        self.samples = samples;
        self
    }
}

/// Referential coverage of one fact foreign-key column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionCoverage {
    pub dimension: Dimension,
    pub fact_rows: usize,
    pub null_foreign_keys: usize,
    pub orphan_foreign_keys: usize,
    /// Dimension rows whose surrogate key was already used by an earlier row.
    pub duplicate_dimension_keys: usize,
    /// Rows compared against the raw record (0 when no raw dataset was given).
    pub checked_rows: usize,
    pub mismatched_rows: usize,
}

impl DimensionCoverage {
    pub fn resolved_foreign_keys(&self) -> usize {
        self.fact_rows
            .saturating_sub(self.null_foreign_keys)
            .saturating_sub(self.orphan_foreign_keys)
    }
}

/// Advisory report produced by the join validator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub coverage: Vec<DimensionCoverage>,
    pub issues: Vec<ValidationIssue>,
    pub raw_rows: Option<usize>,
    pub fact_rows: usize,
}

impl ValidationReport {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn coverage_for(&self, dimension: Dimension) -> Option<&DimensionCoverage> {
        self.coverage.iter().find(|c| c.dimension == dimension)
    }

    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }
}

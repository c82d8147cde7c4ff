mod completeness;
mod referential;

pub(crate) use completeness::check_visits;
pub(crate) use referential::{ReferentialResult, check_dimension};

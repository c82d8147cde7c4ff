//! Shared fixtures for transform integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use hcn_common::text_cell;
use hcn_ingest::RawDataset;
use hcn_model::columns::RAW_COLUMNS;

/// One raw visit row under construction.
#[derive(Debug, Clone)]
pub struct VisitRow {
    values: BTreeMap<&'static str, Option<String>>,
}

/// A fully populated visit row; every cell is derived from `visit`.
pub fn visit(visit: &str) -> VisitRow {
    let values = RAW_COLUMNS
        .iter()
        .map(|name| (*name, Some(format!("{name}-{visit}"))))
        .collect();
    VisitRow { values }
        .set("visit_id", visit)
        .set("visit_datetime", "2022-03-01 09:30:00")
        .set("visit_type", "Outpatient")
}

impl VisitRow {
    pub fn set(mut self, column: &'static str, value: &str) -> Self {
        self.values.insert(column, Some(value.to_string()));
        self
    }

    pub fn null(mut self, column: &'static str) -> Self {
        self.values.insert(column, None);
        self
    }

    pub fn provider(self, name: &str, title: &str, department: &str) -> Self {
        self.set("doctor_name", name)
            .set("doctor_title", title)
            .set("doctor_department", department)
    }

    pub fn location(self, clinic: &str, room: &str) -> Self {
        self.set("clinic_name", clinic).set("room_number", room)
    }
}

/// Builds a raw dataset from rows, in order.
pub fn dataset(rows: &[VisitRow]) -> RawDataset {
    let columns: Vec<Column> = RAW_COLUMNS
        .iter()
        .map(|name| {
            let values: Vec<Option<String>> = rows
                .iter()
                .map(|row| row.values.get(name).cloned().flatten())
                .collect();
            Series::new((*name).into(), values).into_column()
        })
        .collect();
    RawDataset::from_frame(DataFrame::new(columns).unwrap(), "fixture").unwrap()
}

/// Trimmed text value of a frame cell.
pub fn text(frame: &DataFrame, column: &str, row: usize) -> Option<String> {
    text_cell(frame.column(column).unwrap(), row)
}

/// Integer value of a frame cell.
pub fn integer(frame: &DataFrame, column: &str, row: usize) -> Option<i64> {
    frame.column(column).unwrap().i64().unwrap().get(row)
}

pub fn column_names(frame: &DataFrame) -> Vec<String> {
    frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

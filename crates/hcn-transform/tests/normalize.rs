//! End-to-end behavior of the normalization pipeline on in-memory inputs.

mod common;

use chrono::NaiveDate;

use hcn_model::{Dimension, PatientStatus, fact_manifest};
use hcn_transform::{
    NormalizeOptions, PipelineContext, StatusRule, build_dimensions, derive_status, normalize,
};

use common::{column_names, dataset, integer, text, visit};

fn sequential() -> NormalizeOptions {
    NormalizeOptions::default().with_parallel(false)
}

#[test]
fn shared_provider_and_location_collapse_to_one_row() {
    let raw = dataset(&[
        visit("V1")
            .set("patient_id", "P1")
            .provider("Dr. Lee", "MD", "Cardiology")
            .location("West Clinic", "12"),
        visit("V2")
            .set("patient_id", "P2")
            .provider("Dr. Lee", "MD", "Cardiology")
            .location("West Clinic", "12"),
    ]);
    let schema = normalize(&raw, sequential()).unwrap();

    let providers = schema.dimension(Dimension::Provider).unwrap();
    let locations = schema.dimension(Dimension::Location).unwrap();
    assert_eq!(providers.row_count(), 1);
    assert_eq!(locations.row_count(), 1);

    let fact = &schema.fact.frame;
    assert_eq!(fact.height(), 2);
    assert_eq!(integer(fact, "provider_id", 0), Some(1));
    assert_eq!(
        integer(fact, "provider_id", 0),
        integer(fact, "provider_id", 1)
    );
    assert_eq!(
        integer(fact, "location_id", 0),
        integer(fact, "location_id", 1)
    );
    assert_eq!(text(fact, "patient_id", 0).as_deref(), Some("P1"));
    assert_eq!(text(fact, "patient_id", 1).as_deref(), Some("P2"));
}

#[test]
fn missing_provider_name_gives_null_key_and_keeps_row() {
    let raw = dataset(&[
        visit("V1").null("doctor_name"),
        visit("V2").provider("Dr. Ahn", "DO", "Oncology"),
    ]);
    let schema = normalize(&raw, sequential()).unwrap();

    assert_eq!(schema.fact.row_count(), 2);
    assert_eq!(integer(&schema.fact.frame, "provider_id", 0), None);
    assert_eq!(integer(&schema.fact.frame, "provider_id", 1), Some(1));
    assert_eq!(schema.fact.null_foreign_keys_for(Dimension::Provider), 1);

    let stats = schema.stats(Dimension::Provider).unwrap();
    assert_eq!(stats.excluded_null_identity, 1);
    assert_eq!(schema.dimension(Dimension::Provider).unwrap().row_count(), 1);
}

#[test]
fn blank_identity_is_treated_as_missing() {
    let raw = dataset(&[visit("V1").set("room_number", "   ")]);
    let schema = normalize(&raw, sequential()).unwrap();

    assert_eq!(schema.dimension(Dimension::Location).unwrap().row_count(), 0);
    assert_eq!(integer(&schema.fact.frame, "location_id", 0), None);
}

#[test]
fn patient_without_recent_visits_is_inactive() {
    let raw = dataset(&[
        visit("V1")
            .set("patient_id", "P1")
            .set("visit_datetime", "2021-06-01 10:00:00"),
        visit("V2")
            .set("patient_id", "P1")
            .set("visit_datetime", "2021-12-31 23:59:59"),
    ]);
    let schema = normalize(&raw, sequential()).unwrap();
    let patients = &schema.dimension(Dimension::Patient).unwrap().frame;

    assert_eq!(patients.height(), 1);
    assert_eq!(
        text(patients, "patient_status", 0).as_deref(),
        Some("Inactive")
    );
}

#[test]
fn one_recent_visit_makes_patient_active() {
    let raw = dataset(&[
        visit("V1")
            .set("patient_id", "P1")
            .set("visit_datetime", "2021-06-01 10:00:00"),
        visit("V2")
            .set("patient_id", "P1")
            .set("visit_datetime", "2022-01-01 00:00:00"),
    ]);
    let schema = normalize(&raw, sequential()).unwrap();
    let patients = &schema.dimension(Dimension::Patient).unwrap().frame;

    assert_eq!(text(patients, "patient_status", 0).as_deref(), Some("Active"));
}

#[test]
fn unknown_visit_dates_make_patient_inactive() {
    let raw = dataset(&[
        visit("V1").set("patient_id", "P1").null("visit_datetime"),
        visit("V2")
            .set("patient_id", "P1")
            .set("visit_datetime", "not a date"),
    ]);
    let rule = StatusRule::default();
    assert_eq!(derive_status("P1", &raw, &rule), PatientStatus::Inactive);

    let schema = normalize(&raw, sequential()).unwrap();
    let patients = &schema.dimension(Dimension::Patient).unwrap().frame;
    assert_eq!(
        text(patients, "patient_status", 0).as_deref(),
        Some("Inactive")
    );
}

#[test]
fn activity_cutoff_is_configurable() {
    let raw = dataset(&[visit("V1")
        .set("patient_id", "P1")
        .set("visit_datetime", "2022-03-01 09:30:00")]);
    let options =
        sequential().with_activity_cutoff(NaiveDate::from_ymd_opt(2022, 12, 31).unwrap());
    let schema = normalize(&raw, options).unwrap();
    let patients = &schema.dimension(Dimension::Patient).unwrap().frame;

    assert_eq!(
        text(patients, "patient_status", 0).as_deref(),
        Some("Inactive")
    );
}

#[test]
fn fact_columns_follow_manifest_order() {
    let raw = dataset(&[visit("V1")]);
    let schema = normalize(&raw, sequential()).unwrap();

    let expected: Vec<String> = fact_manifest()
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(column_names(&schema.fact.frame), expected);
}

#[test]
fn visit_date_is_normalized_to_iso() {
    let raw = dataset(&[
        visit("V1").set("visit_datetime", "03/14/2022 09:30:00"),
        visit("V2").set("visit_datetime", "unknown"),
    ]);
    let schema = normalize(&raw, sequential()).unwrap();

    assert_eq!(
        text(&schema.fact.frame, "visit_date", 0).as_deref(),
        Some("2022-03-14T09:30:00")
    );
    assert_eq!(text(&schema.fact.frame, "visit_date", 1), None);
}

#[test]
fn first_seen_patient_attributes_win() {
    let raw = dataset(&[
        visit("V1")
            .set("patient_id", "P1")
            .set("patient_city", "Boston"),
        visit("V2")
            .set("patient_id", "P1")
            .set("patient_city", "Cambridge"),
    ]);
    let schema = normalize(&raw, sequential()).unwrap();
    let table = schema.dimension(Dimension::Patient).unwrap();

    assert_eq!(table.row_count(), 1);
    assert_eq!(text(&table.frame, "patient_city", 0).as_deref(), Some("Boston"));
    assert_eq!(table.stats.inconsistent_keys, 1);
    assert_eq!(schema.fact.row_count(), 2);
}

#[test]
fn every_foreign_key_round_trips_to_the_raw_record() {
    let raw = dataset(&[
        visit("V1").provider("Dr. Lee", "MD", "Cardiology"),
        visit("V2").provider("Dr. Ahn", "DO", "Oncology"),
        visit("V3").provider("Dr. Lee", "MD", "Cardiology"),
        visit("V4").null("doctor_department"),
    ]);
    let schema = normalize(&raw, sequential()).unwrap();
    let providers = &schema.dimension(Dimension::Provider).unwrap().frame;
    let fact = &schema.fact.frame;

    for row in 0..raw.height() {
        let Some(id) = integer(fact, "provider_id", row) else {
            assert_eq!(raw.value("doctor_department", row), None);
            continue;
        };
        let matches: Vec<usize> = (0..providers.height())
            .filter(|idx| integer(providers, "provider_id", *idx) == Some(id))
            .collect();
        assert_eq!(matches.len(), 1);
        for column in Dimension::Provider.identity_columns() {
            assert_eq!(
                text(providers, column, matches[0]).as_deref(),
                raw.value(column, row)
            );
        }
    }
}

#[test]
fn repeated_runs_assign_identical_surrogates() {
    let rows = vec![
        visit("V1")
            .provider("Dr. Zhu", "MD", "Surgery")
            .location("North", "3"),
        visit("V2")
            .provider("Dr. Abel", "MD", "Surgery")
            .location("South", "1"),
        visit("V3")
            .provider("Dr. Zhu", "MD", "Surgery")
            .location("East", "7"),
    ];
    let raw = dataset(&rows);
    let first = normalize(&raw, NormalizeOptions::default()).unwrap();
    let second = normalize(&raw, sequential()).unwrap();

    assert!(first.fact.frame.equals_missing(&second.fact.frame));
    for dimension in Dimension::ALL {
        let a = &first.dimension(dimension).unwrap().frame;
        let b = &second.dimension(dimension).unwrap().frame;
        assert!(a.equals_missing(b), "{dimension} differs between runs");
    }
    // Sorted key order: Dr. Abel before Dr. Zhu.
    assert_eq!(integer(&first.fact.frame, "provider_id", 1), Some(1));
    assert_eq!(integer(&first.fact.frame, "provider_id", 0), Some(2));
}

#[test]
fn empty_input_produces_empty_tables() {
    let raw = dataset(&[]);
    let schema = normalize(&raw, sequential()).unwrap();

    assert_eq!(schema.fact.row_count(), 0);
    assert_eq!(schema.tables().len(), 11);
    for (name, frame) in schema.tables() {
        assert_eq!(frame.height(), 0, "{name} should be empty");
    }
    let patients = &schema.dimension(Dimension::Patient).unwrap().frame;
    assert!(patients.column("patient_status").is_ok());
}

#[test]
fn context_stages_can_run_separately() {
    let raw = dataset(&[visit("V1"), visit("V2")]);
    let mut ctx = PipelineContext::new(&raw).with_options(sequential());
    build_dimensions(&mut ctx).unwrap();
    assert_eq!(ctx.dimensions().len(), 10);
    assert!(
        ctx.dimension(Dimension::Patient)
            .unwrap()
            .frame
            .column("patient_status")
            .is_err()
    );

    let schema = ctx.run().unwrap();
    assert_eq!(schema.fact.row_count(), 2);
    let patients = &schema.dimension(Dimension::Patient).unwrap().frame;
    assert_eq!(patients.height(), 2);
    assert!(patients.column("patient_status").is_ok());
}

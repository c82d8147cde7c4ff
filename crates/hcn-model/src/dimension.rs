//! Dimension registry.
//!
//! Each [`Dimension`] names the raw columns it owns, the columns that define an
//! entity's identity, and how its surrogate key is obtained. The registry is the
//! single source of truth shared by key derivation, dimension building, fact
//! assembly and validation, so the four stages can never disagree on identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::columns::{
    BILLING_AMOUNT_PAID, BILLING_DATE, BILLING_ID, BILLING_PAYMENT_STATUS, BILLING_TOTAL_CHARGE,
    CLINIC_NAME, DOCTOR_DEPARTMENT, DOCTOR_NAME, DOCTOR_TITLE, INSURANCE_GROUP_NUMBER,
    INSURANCE_ID, INSURANCE_PAYER_NAME, INSURANCE_PLAN_TYPE, INSURANCE_POLICY_NUMBER,
    LAB_NAME, LAB_ORDER_ID, LAB_RESULT_DATE, LAB_RESULT_UNITS, LAB_RESULT_VALUE, LAB_TEST_CODE,
    LOCATION_ID, PATIENT_ADDRESS_LINE1, PATIENT_ADDRESS_LINE2, PATIENT_CITY,
    PATIENT_DATE_OF_BIRTH, PATIENT_EMAIL, PATIENT_FIRST_NAME, PATIENT_GENDER, PATIENT_ID,
    PATIENT_LAST_NAME, PATIENT_PHONE, PATIENT_STATE, PATIENT_STATUS, PATIENT_ZIP,
    PRESCRIPTION_DOSAGE, PRESCRIPTION_DRUG_NAME, PRESCRIPTION_DURATION_DAYS,
    PRESCRIPTION_FREQUENCY, PRESCRIPTION_ID, PRIMARY_DIAGNOSIS_CODE, PRIMARY_DIAGNOSIS_DESC,
    PRIMARY_DIAGNOSIS_ID, PROVIDER_ID, ROOM_NUMBER, SECONDARY_DIAGNOSIS_CODE,
    SECONDARY_DIAGNOSIS_DESC, SECONDARY_DIAGNOSIS_ID, TREATMENT_CODE, TREATMENT_DESC,
    TREATMENT_ID,
};
use crate::error::ModelError;

/// How a dimension obtains its surrogate key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPolicy {
    /// The raw natural identifier is reused as the surrogate key.
    Reused,
    /// A dense integer key is generated from the composite identity.
    Generated,
}

/// The ten dimensions of the visit schema, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Patient,
    Insurance,
    Billing,
    Provider,
    Location,
    PrimaryDiagnosis,
    SecondaryDiagnosis,
    Treatment,
    Prescription,
    LabOrder,
}

impl Dimension {
    /// All dimensions in declaration order. Fact foreign keys follow this order.
    pub const ALL: [Dimension; 10] = [
        Dimension::Patient,
        Dimension::Insurance,
        Dimension::Billing,
        Dimension::Provider,
        Dimension::Location,
        Dimension::PrimaryDiagnosis,
        Dimension::SecondaryDiagnosis,
        Dimension::Treatment,
        Dimension::Prescription,
        Dimension::LabOrder,
    ];

    /// Output table name (e.g. `DimProvider`).
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Patient => "DimPatient",
            Self::Insurance => "DimInsurance",
            Self::Billing => "DimBilling",
            Self::Provider => "DimProvider",
            Self::Location => "DimLocation",
            Self::PrimaryDiagnosis => "DimPrimaryDiagnosis",
            Self::SecondaryDiagnosis => "DimSecondaryDiagnosis",
            Self::Treatment => "DimTreatment",
            Self::Prescription => "DimPrescription",
            Self::LabOrder => "DimLabOrder",
        }
    }

    pub fn policy(self) -> KeyPolicy {
        match self {
            Self::Patient
            | Self::Insurance
            | Self::Billing
            | Self::Prescription
            | Self::LabOrder => KeyPolicy::Reused,
            Self::Provider
            | Self::Location
            | Self::PrimaryDiagnosis
            | Self::SecondaryDiagnosis
            | Self::Treatment => KeyPolicy::Generated,
        }
    }

    /// Name of the surrogate key column, both in the dimension and in `FactVisit`.
    pub fn surrogate_column(self) -> &'static str {
        match self {
            Self::Patient => PATIENT_ID,
            Self::Insurance => INSURANCE_ID,
            Self::Billing => BILLING_ID,
            Self::Provider => PROVIDER_ID,
            Self::Location => LOCATION_ID,
            Self::PrimaryDiagnosis => PRIMARY_DIAGNOSIS_ID,
            Self::SecondaryDiagnosis => SECONDARY_DIAGNOSIS_ID,
            Self::Treatment => TREATMENT_ID,
            Self::Prescription => PRESCRIPTION_ID,
            Self::LabOrder => LAB_ORDER_ID,
        }
    }

    /// Raw columns whose values together define an entity's identity.
    pub fn identity_columns(self) -> &'static [&'static str] {
        match self {
            Self::Patient => &[PATIENT_ID],
            Self::Insurance => &[INSURANCE_ID],
            Self::Billing => &[BILLING_ID],
            Self::Provider => &[DOCTOR_NAME, DOCTOR_TITLE, DOCTOR_DEPARTMENT],
            Self::Location => &[CLINIC_NAME, ROOM_NUMBER],
            Self::PrimaryDiagnosis => &[PRIMARY_DIAGNOSIS_CODE, PRIMARY_DIAGNOSIS_DESC],
            Self::SecondaryDiagnosis => &[SECONDARY_DIAGNOSIS_CODE, SECONDARY_DIAGNOSIS_DESC],
            Self::Treatment => &[TREATMENT_CODE, TREATMENT_DESC],
            Self::Prescription => &[PRESCRIPTION_ID],
            Self::LabOrder => &[LAB_ORDER_ID],
        }
    }

    /// Raw columns copied into the dimension table after the surrogate key.
    ///
    /// For generated-key dimensions these are the identity columns; for reused-key
    /// dimensions the natural identifier is already the surrogate column and is
    /// not repeated.
    pub fn attribute_columns(self) -> &'static [&'static str] {
        match self {
            Self::Patient => &[
                PATIENT_FIRST_NAME,
                PATIENT_LAST_NAME,
                PATIENT_DATE_OF_BIRTH,
                PATIENT_GENDER,
                PATIENT_ADDRESS_LINE1,
                PATIENT_ADDRESS_LINE2,
                PATIENT_CITY,
                PATIENT_STATE,
                PATIENT_ZIP,
                PATIENT_PHONE,
                PATIENT_EMAIL,
            ],
            Self::Insurance => &[
                PATIENT_ID,
                INSURANCE_PAYER_NAME,
                INSURANCE_POLICY_NUMBER,
                INSURANCE_GROUP_NUMBER,
                INSURANCE_PLAN_TYPE,
            ],
            Self::Billing => &[
                INSURANCE_ID,
                BILLING_TOTAL_CHARGE,
                BILLING_AMOUNT_PAID,
                BILLING_DATE,
                BILLING_PAYMENT_STATUS,
            ],
            Self::Prescription => &[
                PRESCRIPTION_DRUG_NAME,
                PRESCRIPTION_DOSAGE,
                PRESCRIPTION_FREQUENCY,
                PRESCRIPTION_DURATION_DAYS,
            ],
            Self::LabOrder => &[
                LAB_TEST_CODE,
                LAB_NAME,
                LAB_RESULT_VALUE,
                LAB_RESULT_UNITS,
                LAB_RESULT_DATE,
            ],
            Self::Provider
            | Self::Location
            | Self::PrimaryDiagnosis
            | Self::SecondaryDiagnosis
            | Self::Treatment => self.identity_columns(),
        }
    }

    /// Columns appended after the raw attributes by later pipeline stages.
    pub fn derived_columns(self) -> &'static [&'static str] {
        match self {
            Self::Patient => &[PATIENT_STATUS],
            _ => &[],
        }
    }

    /// Full output column order: surrogate key, attributes, derived columns.
    pub fn output_columns(self) -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(
            1 + self.attribute_columns().len() + self.derived_columns().len(),
        );
        columns.push(self.surrogate_column());
        columns.extend_from_slice(self.attribute_columns());
        columns.extend_from_slice(self.derived_columns());
        columns
    }

    /// Resolve a dimension from its output table name (case-insensitive).
    pub fn from_table_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dimension| dimension.table_name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for Dimension {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_table_name(s).ok_or_else(|| ModelError::UnknownTable(s.to_string()))
    }
}

//! Raw input column names.
//!
//! The names form a fixed external contract with the legacy visit export.

pub const PATIENT_ID: &str = "patient_id";
pub const PATIENT_FIRST_NAME: &str = "patient_first_name";
pub const PATIENT_LAST_NAME: &str = "patient_last_name";
pub const PATIENT_DATE_OF_BIRTH: &str = "patient_date_of_birth";
pub const PATIENT_GENDER: &str = "patient_gender";
pub const PATIENT_ADDRESS_LINE1: &str = "patient_address_line1";
pub const PATIENT_ADDRESS_LINE2: &str = "patient_address_line2";
pub const PATIENT_CITY: &str = "patient_city";
pub const PATIENT_STATE: &str = "patient_state";
pub const PATIENT_ZIP: &str = "patient_zip";
pub const PATIENT_PHONE: &str = "patient_phone";
pub const PATIENT_EMAIL: &str = "patient_email";

pub const INSURANCE_ID: &str = "insurance_id";
pub const INSURANCE_PAYER_NAME: &str = "insurance_payer_name";
pub const INSURANCE_POLICY_NUMBER: &str = "insurance_policy_number";
pub const INSURANCE_GROUP_NUMBER: &str = "insurance_group_number";
pub const INSURANCE_PLAN_TYPE: &str = "insurance_plan_type";

pub const BILLING_ID: &str = "billing_id";
pub const BILLING_TOTAL_CHARGE: &str = "billing_total_charge";
pub const BILLING_AMOUNT_PAID: &str = "billing_amount_paid";
pub const BILLING_DATE: &str = "billing_date";
pub const BILLING_PAYMENT_STATUS: &str = "billing_payment_status";

pub const DOCTOR_NAME: &str = "doctor_name";
pub const DOCTOR_TITLE: &str = "doctor_title";
pub const DOCTOR_DEPARTMENT: &str = "doctor_department";

pub const CLINIC_NAME: &str = "clinic_name";
pub const ROOM_NUMBER: &str = "room_number";

pub const PRIMARY_DIAGNOSIS_CODE: &str = "primary_diagnosis_code";
pub const PRIMARY_DIAGNOSIS_DESC: &str = "primary_diagnosis_desc";
pub const SECONDARY_DIAGNOSIS_CODE: &str = "secondary_diagnosis_code";
pub const SECONDARY_DIAGNOSIS_DESC: &str = "secondary_diagnosis_desc";

pub const TREATMENT_CODE: &str = "treatment_code";
pub const TREATMENT_DESC: &str = "treatment_desc";

pub const PRESCRIPTION_ID: &str = "prescription_id";
pub const PRESCRIPTION_DRUG_NAME: &str = "prescription_drug_name";
pub const PRESCRIPTION_DOSAGE: &str = "prescription_dosage";
pub const PRESCRIPTION_FREQUENCY: &str = "prescription_frequency";
pub const PRESCRIPTION_DURATION_DAYS: &str = "prescription_duration_days";

pub const LAB_ORDER_ID: &str = "lab_order_id";
pub const LAB_TEST_CODE: &str = "lab_test_code";
pub const LAB_NAME: &str = "lab_name";
pub const LAB_RESULT_VALUE: &str = "lab_result_value";
pub const LAB_RESULT_UNITS: &str = "lab_result_units";
pub const LAB_RESULT_DATE: &str = "lab_result_date";

pub const VISIT_ID: &str = "visit_id";
pub const VISIT_DATETIME: &str = "visit_datetime";
pub const VISIT_TYPE: &str = "visit_type";

/// Derived columns that never appear in the raw input.
pub const PATIENT_STATUS: &str = "patient_status";
pub const VISIT_DATE: &str = "visit_date";
pub const PROVIDER_ID: &str = "provider_id";
pub const LOCATION_ID: &str = "location_id";
pub const PRIMARY_DIAGNOSIS_ID: &str = "primary_diagnosis_id";
pub const SECONDARY_DIAGNOSIS_ID: &str = "secondary_diagnosis_id";
pub const TREATMENT_ID: &str = "treatment_id";

/// Every column the raw visit export must carry.
pub const RAW_COLUMNS: [&str; 47] = [
    PATIENT_ID,
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
    INSURANCE_ID,
    INSURANCE_PAYER_NAME,
    INSURANCE_POLICY_NUMBER,
    INSURANCE_GROUP_NUMBER,
    INSURANCE_PLAN_TYPE,
    BILLING_ID,
    BILLING_TOTAL_CHARGE,
    BILLING_AMOUNT_PAID,
    BILLING_DATE,
    BILLING_PAYMENT_STATUS,
    DOCTOR_NAME,
    DOCTOR_TITLE,
    DOCTOR_DEPARTMENT,
    CLINIC_NAME,
    ROOM_NUMBER,
    PRIMARY_DIAGNOSIS_CODE,
    PRIMARY_DIAGNOSIS_DESC,
    SECONDARY_DIAGNOSIS_CODE,
    SECONDARY_DIAGNOSIS_DESC,
    TREATMENT_CODE,
    TREATMENT_DESC,
    PRESCRIPTION_ID,
    PRESCRIPTION_DRUG_NAME,
    PRESCRIPTION_DOSAGE,
    PRESCRIPTION_FREQUENCY,
    PRESCRIPTION_DURATION_DAYS,
    LAB_ORDER_ID,
    LAB_TEST_CODE,
    LAB_NAME,
    LAB_RESULT_VALUE,
    LAB_RESULT_UNITS,
    LAB_RESULT_DATE,
    VISIT_ID,
    VISIT_DATETIME,
    VISIT_TYPE,
];

/// Position of a raw column in [`RAW_COLUMNS`].
pub fn raw_column_index(name: &str) -> Option<usize> {
    RAW_COLUMNS.iter().position(|column| *column == name)
}

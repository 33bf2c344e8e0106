//! End-to-end avoidable attendance scenarios
//!
//! Each test builds a small in-memory batch and runs the public entry points.

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use avoidable_attendances::{
    AttendanceColumns, AttendanceError, ClassifierConfig, classify, derive_avoidable_attendances,
};
use std::io::Write;
use std::sync::Arc;

fn strings(values: &[Option<&str>]) -> ArrayRef {
    Arc::new(StringArray::from(values.to_vec()))
}

/// Type, disposal, category, arrival mode, investigation, treatment
type Attendance<'a> = [Option<&'a str>; 6];

fn attendances(rows: &[Attendance<'_>]) -> RecordBatch {
    let column = |i: usize| strings(&rows.iter().map(|r| r[i]).collect::<Vec<_>>());
    RecordBatch::try_from_iter(vec![
        ("EDTYPE", column(0)),
        ("DISPOSAL", column(1)),
        ("CATEGORY", column(2)),
        ("ARRIVAL", column(3)),
        ("INVEST_01", column(4)),
        ("TREAT_01", column(5)),
    ])
    .unwrap()
}

fn config(standard: &str) -> ClassifierConfig {
    let columns = AttendanceColumns::new("EDTYPE", "DISPOSAL", "CATEGORY", "ARRIVAL")
        .with_investigations(["INVEST_01"])
        .with_treatments(["TREAT_01"]);
    ClassifierConfig::new(columns).with_coding_standard(standard)
}

#[test]
fn test_snomed_avoidable_attendance() {
    let batch = attendances(&[[
        Some("1"),
        Some("182992009"),
        Some("01"),
        Some("1048071000000103"),
        None,
        None,
    ]]);
    assert_eq!(classify(&batch, &config("snomed")).unwrap(), vec![true]);
}

#[test]
fn test_snomed_unrecognised_disposal() {
    let batch = attendances(&[[
        Some("1"),
        Some("999999"),
        Some("01"),
        Some("1048071000000103"),
        None,
        None,
    ]]);
    assert_eq!(classify(&batch, &config("snomed")).unwrap(), vec![false]);
}

#[test]
fn test_hes_ambulance_arrival_is_never_avoidable() {
    let batch = attendances(&[
        [Some("1"), Some("02"), Some("1"), Some("1"), None, None],
        [Some("01"), Some("3"), Some("01"), Some("1"), Some("06"), Some("99")],
        [Some("01"), Some("3"), Some("01"), Some("2"), Some("06"), Some("99")],
    ]);
    assert_eq!(
        classify(&batch, &config("HES")).unwrap(),
        vec![false, false, true]
    );
}

#[test]
fn test_unrecognised_investigation_or_treatment() {
    let batch = attendances(&[
        [Some("1"), Some("02"), Some("1"), Some("2"), Some("05"), None],
        [Some("1"), Some("02"), Some("1"), Some("2"), None, Some("08")],
        [Some("1"), Some("02"), Some("1"), Some("2"), Some("24"), Some("07")],
    ]);
    assert_eq!(
        classify(&batch, &config("hes")).unwrap(),
        vec![false, false, true]
    );
}

#[test]
fn test_missing_fixed_fields_are_not_avoidable() {
    let batch = attendances(&[
        [None, Some("02"), Some("1"), Some("2"), None, None],
        [Some("1"), None, Some("1"), Some("2"), None, None],
        [Some("1"), Some("02"), None, Some("2"), None, None],
        [Some("1"), Some("02"), Some("1"), None, None, None],
    ]);
    assert_eq!(
        classify(&batch, &config("hes")).unwrap(),
        vec![false, false, false, false]
    );
}

#[test]
fn test_without_investigation_or_treatment_columns() {
    let batch = attendances(&[[
        Some("1"),
        Some("02"),
        Some("1"),
        Some("2"),
        Some("not a code"),
        Some("not a code"),
    ]]);
    let verdicts =
        derive_avoidable_attendances(&batch, "EDTYPE", "DISPOSAL", "CATEGORY", "ARRIVAL", &[], &[], "hes", 1)
            .unwrap();
    assert_eq!(verdicts, vec![true]);
}

#[test]
fn test_invalid_standard_aborts() {
    let batch = attendances(&[[Some("1"), None, None, None, None, None]]);
    let err = classify(&batch, &config("icd10")).unwrap_err();
    assert!(matches!(err, AttendanceError::InvalidCodingStandard(ref s) if s == "icd10"));
}

#[test]
fn test_padded_standard_aborts() {
    let batch = attendances(&[[Some("1"), Some("02"), Some("1"), Some("2"), None, None]]);
    let err = derive_avoidable_attendances(&batch, "EDTYPE", "DISPOSAL", "CATEGORY", "ARRIVAL", &[], &[], " hes ", 1)
        .unwrap_err();
    assert!(matches!(err, AttendanceError::InvalidCodingStandard(ref s) if s == " hes "));
}

#[test]
fn test_zero_threads_aborts() {
    let batch = attendances(&[[Some("1"), None, None, None, None, None]]);
    let err = classify(&batch, &config("snomed").with_threads(0)).unwrap_err();
    assert!(matches!(err, AttendanceError::InvalidThreadCount(0)));
}

#[test]
fn test_non_string_column_aborts() {
    let batch = RecordBatch::try_from_iter(vec![
        ("EDTYPE", Arc::new(Int64Array::from(vec![1])) as ArrayRef),
        ("DISPOSAL", strings(&[Some("02")])),
        ("CATEGORY", strings(&[Some("1")])),
        ("ARRIVAL", strings(&[Some("2")])),
    ])
    .unwrap();
    let columns = AttendanceColumns::new("EDTYPE", "DISPOSAL", "CATEGORY", "ARRIVAL");
    let err = classify(&batch, &ClassifierConfig::new(columns)).unwrap_err();
    assert!(matches!(err, AttendanceError::ColumnType { ref column, index: 0, .. } if column == "EDTYPE"));
}

#[test]
fn test_unknown_column_aborts() {
    let batch = attendances(&[[Some("1"), None, None, None, None, None]]);
    let cfg = config("snomed");
    let cfg = ClassifierConfig {
        columns: cfg.columns.with_treatments(["TREAT_01", "TREAT_02"]),
        ..cfg
    };
    let err = classify(&batch, &cfg).unwrap_err();
    assert!(matches!(err, AttendanceError::ColumnNotFound { ref column } if column == "TREAT_02"));
}

#[test]
fn test_vocabulary_override_file() {
    let path = std::env::temp_dir().join(format!(
        "avoidable_attendances_vocab_{}.json",
        std::process::id()
    ));
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"{{
            "disposal": ["02"],
            "arrival_mode": ["1", "9"],
            "investigation": ["24"],
            "treatment": ["99"]
        }}"#
    )
    .unwrap();
    drop(file);

    let batch = attendances(&[
        [Some("1"), Some("02"), Some("1"), Some("9"), Some("24"), Some("99")],
        [Some("1"), Some("02"), Some("1"), Some("2"), Some("24"), Some("99")],
        [Some("1"), Some("03"), Some("1"), Some("2"), None, None],
    ]);
    let verdicts = classify(&batch, &config("hes").with_vocabulary_file(&path)).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(verdicts, vec![false, true, false]);
}

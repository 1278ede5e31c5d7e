//! End-to-end tests for the reconcile workflow

use lakeddl::report_sheets;

use crate::common::TestContext;

#[test]
fn test_reconcile_writes_all_report_sheets() {
    let ctx = TestContext::standard();
    lakeddl::run_reconcile(&ctx.config_path).expect("reconcile should succeed");

    for sheet in [
        report_sheets::IN_SOURCE_NOT_IN_TARGET,
        report_sheets::IN_SOURCE_NOT_IN_TARGET_EX_VIRTUAL,
        report_sheets::MISSING_DEFAULT_COLUMNS,
        report_sheets::DATATYPE_MISMATCH,
    ] {
        let content = ctx.read_report(sheet);
        assert!(
            content.starts_with("Entity Logical Name,Logical Name"),
            "sheet '{}' should carry the report headers",
            sheet
        );
    }
}

#[test]
fn test_reconcile_reports_source_columns_missing_in_target() {
    let ctx = TestContext::standard();
    lakeddl::run_reconcile(&ctx.config_path).expect("reconcile should succeed");

    let all = ctx.read_report(report_sheets::IN_SOURCE_NOT_IN_TARGET);
    assert!(all.contains("account,ghostcol"));
    assert!(all.contains("account,virtualcol"));

    let ex_virtual = ctx.read_report(report_sheets::IN_SOURCE_NOT_IN_TARGET_EX_VIRTUAL);
    assert!(ex_virtual.contains("account,ghostcol"));
    assert!(!ex_virtual.contains("virtualcol"));
}

#[test]
fn test_reconcile_reports_missing_default_columns_per_entity() {
    let ctx = TestContext::standard();
    lakeddl::run_reconcile(&ctx.config_path).expect("reconcile should succeed");

    let missing = ctx.read_report(report_sheets::MISSING_DEFAULT_COLUMNS);

    // account's target carries statecode and createdbyname but not entityimageid
    assert!(missing.contains("account,entityimageid"));
    assert!(!missing.contains("account,statecode"));
    assert!(!missing.contains("account,createdbyname"));

    // contact's target carries none of the default catalog columns
    assert!(missing.contains("contact,statecode"));
    assert!(missing.contains("contact,createdbyname"));
    assert!(missing.contains("contact,entityimageid"));
}

#[test]
fn test_reconcile_reports_type_mismatches() {
    let ctx = TestContext::standard();
    lakeddl::run_reconcile(&ctx.config_path).expect("reconcile should succeed");

    let mismatches = ctx.read_report(report_sheets::DATATYPE_MISMATCH);

    // Derived NVARCHAR(160) disagrees with the target's VARCHAR(8000)
    assert!(mismatches.contains("account,name,NVARCHAR(160),VARCHAR(8000)"));
    // Derived DECIMAL(38,4) disagrees with the target's bare decimal
    assert!(mismatches.contains("account,revenue,\"DECIMAL(38,4)\",decimal"));
    // INTEGER vs INTEGER matches case-insensitively and is not reported
    assert!(!mismatches.contains("numberofemployees"));
    // createdbyname exists only in the target catalog: with no source
    // column there is no derived type to disagree with
    assert!(!mismatches.contains("createdbyname"));
    // virtualcol is non-materialized and never type-compared
    assert!(!mismatches.contains("virtualcol"));
}

#[test]
fn test_reconcile_fails_on_missing_target_sheet() {
    let ctx = TestContext::standard();
    std::fs::remove_file(
        ctx.config_path
            .parent()
            .unwrap()
            .join("target")
            .join("Parquet_Metadata.csv"),
    )
    .unwrap();

    let result = lakeddl::run_reconcile(&ctx.config_path);
    let message = format!("{:#}", result.expect_err("missing sheet must abort the run"));
    assert!(message.contains("Parquet_Metadata"));
}

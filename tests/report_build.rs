//! End-to-end build: raw records through flattening, aggregation,
//! interpretation, and document composition.

use muni_report::aggregate::{certificate_status_counts, CategoryRows, NumericReport};
use muni_report::chrono::NaiveDate;
use muni_report::flatten::flatten_all;
use muni_report::record::{
    CertificateRecord, HouseholdRecord, MemberRef, PersonRef, RawRecord, RecordCategory,
    ResidentRecord,
};
use muni_report_render::interpret::certificate_interpretation;
use muni_report_render::{ReportEngine, ReportOptions};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
}

fn certificate(id: i64, status: &str) -> RawRecord {
    RawRecord::Certificate(CertificateRecord {
        certificate_id: Some(id),
        certificate_type: Some("Indigency".to_string()),
        status: Some(status.to_string()),
        resident: Some(PersonRef {
            id: Some(id),
            first_name: Some("Juan".to_string()),
            last_name: Some("Dela Cruz".to_string()),
        }),
        ..CertificateRecord::default()
    })
}

fn resident(id: i64, first: &str, gender: &str, birthdate: (i32, u32, u32)) -> RawRecord {
    RawRecord::Resident(ResidentRecord {
        resident_id: Some(id),
        first_name: Some(first.to_string()),
        last_name: Some("Santos".to_string()),
        gender: Some(gender.to_string()),
        birthdate: NaiveDate::from_ymd_opt(birthdate.0, birthdate.1, birthdate.2),
        purok: Some("Purok 1".to_string()),
        ..ResidentRecord::default()
    })
}

fn member(id: i64) -> MemberRef {
    MemberRef {
        id: Some(id),
        first_name: Some("Member".to_string()),
        last_name: Some("Santos".to_string()),
    }
}

fn fixture_rows() -> CategoryRows {
    let statuses = [
        "PENDING", "PENDING", "PENDING", "APPROVED", "APPROVED", "APPROVED", "APPROVED",
        "CLAIMED", "CLAIMED", "REJECTED",
    ];
    let certificates: Vec<RawRecord> = statuses
        .iter()
        .enumerate()
        .map(|(i, status)| certificate(i as i64 + 1, status))
        .collect();
    let residents = vec![
        resident(1, "Juan", "Male", (1990, 5, 1)),
        resident(2, "Maria", "Female", (1958, 3, 2)),
        resident(3, "Pedro", "Male", (2012, 7, 9)),
    ];
    let households = vec![RawRecord::Household(HouseholdRecord {
        household_id: Some(1),
        household_no: Some("HH-001".to_string()),
        members: vec![member(1), member(2)],
        staff_members: vec![member(3)],
        ..HouseholdRecord::default()
    })];

    CategoryRows {
        residents: flatten_all(&residents),
        certificates: flatten_all(&certificates),
        households: flatten_all(&households),
        ..CategoryRows::default()
    }
}

#[test]
fn certificate_scenario_matches_expected_series_and_text() {
    let rows = fixture_rows();
    let series = certificate_status_counts(&rows.certificates, "status");
    let pairs: Vec<(&str, f64)> = series.iter().map(|p| (p.name.as_str(), p.value)).collect();
    assert_eq!(
        pairs,
        [
            ("Pending", 3.0),
            ("Approved", 4.0),
            ("Claimed", 2.0),
            ("Rejected", 1.0),
        ]
    );
    let text = certificate_interpretation(&series);
    assert!(text.contains("Pending: 3 (30.0%)"));
    assert!(text.contains("Approved: 4 (40.0%)"));
}

#[test]
fn numeric_report_derives_cross_category_metrics() {
    let rows = fixture_rows();
    let report = NumericReport::compute(&rows, as_of());
    assert_eq!(report.total_certificates, 10);
    assert_eq!(report.certificates_pending, 3);
    assert_eq!(report.male_residents, 2);
    assert_eq!(report.female_residents, 1);
    assert_eq!(report.senior_residents, 1);
    assert_eq!(report.youth_residents, 1);
    assert_eq!(report.average_household_size, 3.0);
}

#[test]
fn full_document_includes_charts_and_senior_detail() {
    let rows = fixture_rows();
    let engine = ReportEngine::new(ReportOptions::new("Municipal Analytics Report", as_of()));
    let pages = engine.compose_report(&rows);
    assert!(!pages.is_empty());
    let text: Vec<String> = pages
        .iter()
        .flat_map(|p| p.text_contents())
        .map(str::to_string)
        .collect();
    let joined = text.join("\n");
    assert!(joined.contains("Certificate Requests by Status"));
    assert!(joined.contains("Residents by Gender"));
    assert!(joined.contains("Senior Citizens"));
    // Empty categories contribute no chart heading.
    assert!(!joined.contains("Complaints by Status"));
    assert!(!joined.contains("Staff by Position"));
}

#[test]
fn detail_report_reuses_chart_and_layout_primitives() {
    let rows = fixture_rows();
    let engine = ReportEngine::new(ReportOptions::new("Municipal Analytics Report", as_of()));
    let pages = engine.compose_category_report(RecordCategory::Certificates, &rows.certificates);
    let joined: String = pages
        .iter()
        .flat_map(|p| p.text_contents())
        .collect::<Vec<_>>()
        .join("\n");
    assert!(joined.contains("Certificate Requests by Status"));
    assert!(joined.contains("Indigency"));
}

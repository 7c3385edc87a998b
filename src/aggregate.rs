//! Statistics aggregator.
//!
//! Derives insertion-ordered series from flat rows (categorical counts, age
//! bands, canonical status counts) and computes the cross-category
//! [`NumericReport`] snapshot used by summary cards and the analytics page.
//!
//! Failure semantics throughout: a row missing the field an aggregation
//! reads is skipped for that dimension only, and every derived rate or
//! average defines division by zero as `0`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::record::{FieldValue, FlatRow, RecordCategory};

/// One aggregated category: a display name and its count/sum.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub name: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Sum of all series values.
pub fn series_total(series: &[SeriesPoint]) -> f64 {
    series.iter().map(|p| p.value).sum()
}

/// Value of a named series point, matched case-insensitively; `0` when
/// absent.
pub fn series_value(series: &[SeriesPoint], name: &str) -> f64 {
    series
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .map(|p| p.value)
        .unwrap_or(0.0)
}

/// Round to 1 decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / total` as a percentage rounded to 1 decimal place; `0` when
/// `total` is not positive.
pub fn percentage(part: f64, total: f64) -> f64 {
    if total <= 0.0 {
        0.0
    } else {
        round1(part / total * 100.0)
    }
}

/// Count rows grouped by the string form of `field`.
///
/// Groups appear in first-occurrence order. Rows without the field are
/// skipped.
pub fn count_by(rows: &[FlatRow], field: &str) -> Vec<SeriesPoint> {
    count_by_inner(rows, field, None)
}

/// Like [`count_by`], but rows missing the field (or carrying a null) are
/// grouped under `missing_label` instead of being skipped.
pub fn count_by_with_missing(
    rows: &[FlatRow],
    field: &str,
    missing_label: &str,
) -> Vec<SeriesPoint> {
    count_by_inner(rows, field, Some(missing_label))
}

fn count_by_inner(rows: &[FlatRow], field: &str, missing_label: Option<&str>) -> Vec<SeriesPoint> {
    let mut series: Vec<SeriesPoint> = Vec::new();
    for row in rows {
        let name = match row.get(field) {
            Some(FieldValue::Null) | None => match missing_label {
                Some(label) => label.to_string(),
                None => continue,
            },
            Some(value) => value.display_string(),
        };
        bump(&mut series, &name, 1.0);
    }
    series
}

fn bump(series: &mut Vec<SeriesPoint>, name: &str, amount: f64) {
    match series.iter_mut().find(|p| p.name == name) {
        Some(point) => point.value += amount,
        None => series.push(SeriesPoint::new(name, amount)),
    }
}

/// Fixed age bands, half-open with inclusive lower bounds.
pub const AGE_BANDS: [(&str, i64, i64); 4] = [
    ("Youth", 0, 18),
    ("Young Adult", 18, 35),
    ("Middle Age", 35, 60),
    ("Senior", 60, i64::MAX),
];

/// Age in whole years as `floor(days / 365.25)`.
pub fn age_in_years(birthdate: NaiveDate, today: NaiveDate) -> i64 {
    let days = (today - birthdate).num_days();
    (days as f64 / 365.25).floor() as i64
}

/// Bucket rows into the four fixed age bands by an ISO date field.
///
/// All four bands are always present, in order. Rows with a missing or
/// unparseable date, or a birthdate in the future, are skipped.
pub fn age_buckets(rows: &[FlatRow], field: &str, today: NaiveDate) -> Vec<SeriesPoint> {
    let mut series: Vec<SeriesPoint> = AGE_BANDS
        .iter()
        .map(|(name, _, _)| SeriesPoint::new(*name, 0.0))
        .collect();
    for row in rows {
        let Some(birthdate) = row.date(field) else {
            continue;
        };
        let age = age_in_years(birthdate, today);
        for (i, (_, lo, hi)) in AGE_BANDS.iter().enumerate() {
            if age >= *lo && age < *hi {
                series[i].value += 1.0;
                break;
            }
        }
    }
    series
}

/// Canonical certificate request status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CertificateStatus {
    Pending,
    Approved,
    Claimed,
    Rejected,
}

impl CertificateStatus {
    pub const ALL: [CertificateStatus; 4] =
        [Self::Pending, Self::Approved, Self::Claimed, Self::Rejected];

    /// Spelling-tolerant parse; comparison is exact afterwards.
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_status(raw).as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "claimed" => Some(Self::Claimed),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Claimed => "Claimed",
            Self::Rejected => "Rejected",
        }
    }
}

/// Canonical complaint status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Dismissed,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Resolved,
        Self::Dismissed,
    ];

    /// Spelling-tolerant parse: `"in progress"`, `"in-progress"` and
    /// `"in_progress"` all map to [`ComplaintStatus::InProgress`].
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_status(raw).as_str() {
            "pending" => Some(Self::Pending),
            "in progress" | "ongoing" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            "dismissed" => Some(Self::Dismissed),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Dismissed => "Dismissed",
        }
    }
}

fn normalize_status(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Count certificates per canonical status, preserving raw first-occurrence
/// names for the uppercase/lowercase spelling actually present in the data.
///
/// Unparseable statuses are appended as their own groups so the series sum
/// still equals the number of rows carrying the field.
pub fn certificate_status_counts(rows: &[FlatRow], field: &str) -> Vec<SeriesPoint> {
    canonical_status_counts(rows, field, |raw| {
        CertificateStatus::parse(raw).map(CertificateStatus::label)
    })
}

/// Count complaints per canonical status; same contract as
/// [`certificate_status_counts`].
pub fn complaint_status_counts(rows: &[FlatRow], field: &str) -> Vec<SeriesPoint> {
    canonical_status_counts(rows, field, |raw| {
        ComplaintStatus::parse(raw).map(ComplaintStatus::label)
    })
}

fn canonical_status_counts(
    rows: &[FlatRow],
    field: &str,
    parse: impl Fn(&str) -> Option<&'static str>,
) -> Vec<SeriesPoint> {
    let mut series: Vec<SeriesPoint> = Vec::new();
    for row in rows {
        let Some(raw) = row.text(field) else {
            continue;
        };
        match parse(raw) {
            Some(label) => bump(&mut series, label, 1.0),
            None => bump(&mut series, raw.trim(), 1.0),
        }
    }
    series
}

/// Per-category flattened rows for one report build.
///
/// Each category fetch writes to its own slot; nothing cross-category is
/// computed until every slot is filled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryRows {
    pub residents: Vec<FlatRow>,
    pub staff: Vec<FlatRow>,
    pub certificates: Vec<FlatRow>,
    pub complaints: Vec<FlatRow>,
    pub announcements: Vec<FlatRow>,
    pub households: Vec<FlatRow>,
}

impl CategoryRows {
    /// Rows for one category.
    pub fn rows(&self, category: RecordCategory) -> &[FlatRow] {
        match category {
            RecordCategory::Residents => &self.residents,
            RecordCategory::Staff => &self.staff,
            RecordCategory::Certificates => &self.certificates,
            RecordCategory::Complaints => &self.complaints,
            RecordCategory::Announcements => &self.announcements,
            RecordCategory::Households => &self.households,
        }
    }

    /// Mutable slot for one category.
    pub fn rows_mut(&mut self, category: RecordCategory) -> &mut Vec<FlatRow> {
        match category {
            RecordCategory::Residents => &mut self.residents,
            RecordCategory::Staff => &mut self.staff,
            RecordCategory::Certificates => &mut self.certificates,
            RecordCategory::Complaints => &mut self.complaints,
            RecordCategory::Announcements => &mut self.announcements,
            RecordCategory::Households => &mut self.households,
        }
    }
}

/// Immutable snapshot of all cross-category derived metrics for one build.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NumericReport {
    pub total_residents: usize,
    pub total_staff: usize,
    pub total_certificates: usize,
    pub total_complaints: usize,
    pub total_announcements: usize,
    pub total_households: usize,
    pub male_residents: usize,
    pub female_residents: usize,
    pub youth_residents: usize,
    pub young_adult_residents: usize,
    pub middle_age_residents: usize,
    pub senior_residents: usize,
    pub certificates_pending: usize,
    pub certificates_approved: usize,
    pub certificates_claimed: usize,
    pub certificates_rejected: usize,
    pub complaints_resolved: usize,
    /// Resolved complaints over all complaints, as a percentage (1 dp).
    pub resolution_rate: f64,
    /// Mean of `member_count + staff_member_count` over households (2 dp).
    pub average_household_size: f64,
}

impl NumericReport {
    /// Compute the snapshot from all category rows.
    pub fn compute(rows: &CategoryRows, today: NaiveDate) -> Self {
        let gender = count_by_with_missing(&rows.residents, "gender", "N/A");
        let ages = age_buckets(&rows.residents, "birthdate", today);
        let cert_status = certificate_status_counts(&rows.certificates, "status");
        let complaint_status = complaint_status_counts(&rows.complaints, "status");

        let resolved = series_value(&complaint_status, ComplaintStatus::Resolved.label());
        let total_complaints = rows.complaints.len();
        let resolution_rate = percentage(resolved, total_complaints as f64);

        let household_count = rows.households.len();
        let occupant_sum: f64 = rows
            .households
            .iter()
            .map(|h| {
                h.number("member_count").unwrap_or(0.0)
                    + h.number("staff_member_count").unwrap_or(0.0)
            })
            .sum();
        let average_household_size = if household_count == 0 {
            0.0
        } else {
            round2(occupant_sum / household_count as f64)
        };

        Self {
            total_residents: rows.residents.len(),
            total_staff: rows.staff.len(),
            total_certificates: rows.certificates.len(),
            total_complaints,
            total_announcements: rows.announcements.len(),
            total_households: household_count,
            male_residents: series_value(&gender, "Male") as usize,
            female_residents: series_value(&gender, "Female") as usize,
            youth_residents: series_value(&ages, "Youth") as usize,
            young_adult_residents: series_value(&ages, "Young Adult") as usize,
            middle_age_residents: series_value(&ages, "Middle Age") as usize,
            senior_residents: series_value(&ages, "Senior") as usize,
            certificates_pending: series_value(&cert_status, "Pending") as usize,
            certificates_approved: series_value(&cert_status, "Approved") as usize,
            certificates_claimed: series_value(&cert_status, "Claimed") as usize,
            certificates_rejected: series_value(&cert_status, "Rejected") as usize,
            complaints_resolved: resolved as usize,
            resolution_rate,
            average_household_size,
        }
    }

    /// Named metric list in export order, for the analytics table and the
    /// delimited summary export.
    pub fn metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("total_residents", self.total_residents as f64),
            ("total_staff", self.total_staff as f64),
            ("total_certificates", self.total_certificates as f64),
            ("total_complaints", self.total_complaints as f64),
            ("total_announcements", self.total_announcements as f64),
            ("total_households", self.total_households as f64),
            ("male_residents", self.male_residents as f64),
            ("female_residents", self.female_residents as f64),
            ("youth_residents", self.youth_residents as f64),
            ("young_adult_residents", self.young_adult_residents as f64),
            ("middle_age_residents", self.middle_age_residents as f64),
            ("senior_residents", self.senior_residents as f64),
            ("certificates_pending", self.certificates_pending as f64),
            ("certificates_approved", self.certificates_approved as f64),
            ("certificates_claimed", self.certificates_claimed as f64),
            ("certificates_rejected", self.certificates_rejected as f64),
            ("complaints_resolved", self.complaints_resolved as f64),
            ("resolution_rate", self.resolution_rate),
            ("average_household_size", self.average_household_size),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, FieldValue)]) -> FlatRow {
        let mut row = FlatRow::new();
        for (key, value) in pairs {
            row.insert(*key, value.clone());
        }
        row
    }

    fn text_row(pairs: &[(&str, &str)]) -> FlatRow {
        let mut row = FlatRow::new();
        for (key, value) in pairs {
            row.insert(*key, *value);
        }
        row
    }

    #[test]
    fn count_by_preserves_first_occurrence_order() {
        let rows = [
            text_row(&[("purok", "2")]),
            text_row(&[("purok", "1")]),
            text_row(&[("purok", "2")]),
            text_row(&[("purok", "3")]),
        ];
        let series = count_by(&rows, "purok");
        let names: Vec<&str> = series.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["2", "1", "3"]);
        assert_eq!(series[0].value, 2.0);
    }

    #[test]
    fn count_by_sum_equals_rows_with_field_present() {
        let rows = [
            text_row(&[("gender", "Male")]),
            text_row(&[("gender", "Female")]),
            text_row(&[("other", "x")]),
        ];
        let series = count_by(&rows, "gender");
        assert_eq!(series_total(&series), 2.0);
        let with_missing = count_by_with_missing(&rows, "gender", "N/A");
        assert_eq!(series_total(&with_missing), 3.0);
        assert_eq!(series_value(&with_missing, "n/a"), 1.0);
    }

    #[test]
    fn age_bands_use_half_open_intervals() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let rows = [
            text_row(&[("birthdate", "2010-06-01")]), // 15: Youth
            text_row(&[("birthdate", "2008-01-02")]), // 17 (one day short): Youth
            text_row(&[("birthdate", "1991-01-01")]), // 35: Middle Age
            text_row(&[("birthdate", "1950-01-01")]), // 76: Senior
            text_row(&[("birthdate", "not-a-date")]), // skipped
        ];
        let series = age_buckets(&rows, "birthdate", today);
        assert_eq!(series_value(&series, "Youth"), 2.0);
        assert_eq!(series_value(&series, "Young Adult"), 0.0);
        assert_eq!(series_value(&series, "Middle Age"), 1.0);
        assert_eq!(series_value(&series, "Senior"), 1.0);
        assert_eq!(series.len(), 4);
    }

    #[test]
    fn status_parse_tolerates_spelling_variants() {
        assert_eq!(
            ComplaintStatus::parse("In Progress"),
            Some(ComplaintStatus::InProgress)
        );
        assert_eq!(
            ComplaintStatus::parse("in-progress"),
            Some(ComplaintStatus::InProgress)
        );
        assert_eq!(
            ComplaintStatus::parse("IN_PROGRESS"),
            Some(ComplaintStatus::InProgress)
        );
        assert_eq!(
            CertificateStatus::parse("  APPROVED "),
            Some(CertificateStatus::Approved)
        );
        assert_eq!(CertificateStatus::parse("void"), None);
    }

    #[test]
    fn status_counts_keep_sum_invariant_with_unknown_statuses() {
        let rows = [
            text_row(&[("status", "PENDING")]),
            text_row(&[("status", "weird")]),
            text_row(&[("status", "approved")]),
        ];
        let series = certificate_status_counts(&rows, "status");
        assert_eq!(series_total(&series), 3.0);
        assert_eq!(series_value(&series, "Pending"), 1.0);
        assert_eq!(series_value(&series, "weird"), 1.0);
    }

    #[test]
    fn average_household_size_matches_fixture() {
        let rows = CategoryRows {
            households: vec![
                row(&[
                    ("member_count", FieldValue::Int(2)),
                    ("staff_member_count", FieldValue::Int(1)),
                ]),
                row(&[
                    ("member_count", FieldValue::Int(0)),
                    ("staff_member_count", FieldValue::Int(0)),
                ]),
            ],
            ..CategoryRows::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let report = NumericReport::compute(&rows, today);
        assert_eq!(report.average_household_size, 1.5);
    }

    #[test]
    fn division_by_zero_yields_zero_everywhere() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let report = NumericReport::compute(&CategoryRows::default(), today);
        assert_eq!(report.resolution_rate, 0.0);
        assert_eq!(report.average_household_size, 0.0);
        assert_eq!(percentage(3.0, 0.0), 0.0);
    }

    #[test]
    fn resolution_rate_rounds_to_one_decimal() {
        let rows = CategoryRows {
            complaints: vec![
                text_row(&[("status", "Resolved")]),
                text_row(&[("status", "Pending")]),
                text_row(&[("status", "in progress")]),
            ],
            ..CategoryRows::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let report = NumericReport::compute(&rows, today);
        assert_eq!(report.complaints_resolved, 1);
        assert_eq!(report.resolution_rate, 33.3);
    }
}

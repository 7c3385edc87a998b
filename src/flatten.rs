//! Record flattener.
//!
//! Projects a [`RawRecord`] into a [`FlatRow`]: scalar fields pass through,
//! single nested relations become renamed scalar fields, and relation arrays
//! become a `*_count` field plus indexed per-element fields. Unrecognized
//! nested values are skipped so the flat-row invariant always holds.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::record::{
    AnnouncementRecord, CertificateRecord, ComplaintRecord, FieldValue, FlatRow, HouseholdRecord,
    MemberRef, PersonRef, RawRecord, ResidentRecord, StaffRecord,
};

/// Projection into a single-level row.
///
/// Implemented for [`RawRecord`] (the real flattening) and for [`FlatRow`]
/// itself, where it is the identity: a flat row has no relation fields left
/// to match, so flattening twice equals flattening once.
pub trait Flatten {
    fn flatten(&self) -> FlatRow;
}

impl Flatten for FlatRow {
    fn flatten(&self) -> FlatRow {
        self.clone()
    }
}

impl Flatten for RawRecord {
    fn flatten(&self) -> FlatRow {
        match self {
            Self::Resident(r) => flatten_resident(r),
            Self::Staff(r) => flatten_staff(r),
            Self::Certificate(r) => flatten_certificate(r),
            Self::Complaint(r) => flatten_complaint(r),
            Self::Announcement(r) => flatten_announcement(r),
            Self::Household(r) => flatten_household(r),
        }
    }
}

fn put_text(row: &mut FlatRow, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        row.insert(key, value.as_str());
    }
}

fn put_int(row: &mut FlatRow, key: &str, value: Option<i64>) {
    if let Some(value) = value {
        row.insert(key, value);
    }
}

fn put_date(row: &mut FlatRow, key: &str, value: Option<NaiveDate>) {
    if let Some(value) = value {
        row.insert(key, value.format("%Y-%m-%d").to_string());
    }
}

fn put_person_name(row: &mut FlatRow, key: &str, person: &Option<PersonRef>) {
    if let Some(person) = person {
        row.insert(key, person.full_name());
    }
}

/// Copy scalar extra fields through; nested extras are silently skipped.
fn put_extras(row: &mut FlatRow, extra: &Map<String, Value>) {
    for (key, value) in extra {
        match FieldValue::from_scalar_json(value) {
            Some(scalar) => row.insert(key.as_str(), scalar),
            None => log::debug!("skipping nested extra field {key}"),
        }
    }
}

fn put_member_fields(row: &mut FlatRow, prefix: &str, members: &[MemberRef]) {
    row.insert(format!("{prefix}_count"), members.len() as i64);
    for (i, member) in members.iter().enumerate() {
        let n = i + 1;
        put_int(row, &format!("{prefix}_{n}_id"), member.id);
        put_text(row, &format!("{prefix}_{n}_first_name"), &member.first_name);
        put_text(row, &format!("{prefix}_{n}_last_name"), &member.last_name);
    }
}

fn flatten_resident(record: &ResidentRecord) -> FlatRow {
    let mut row = FlatRow::new();
    put_int(&mut row, "resident_id", record.resident_id);
    put_text(&mut row, "first_name", &record.first_name);
    put_text(&mut row, "middle_name", &record.middle_name);
    put_text(&mut row, "last_name", &record.last_name);
    put_text(&mut row, "gender", &record.gender);
    put_date(&mut row, "birthdate", record.birthdate);
    put_text(&mut row, "civil_status", &record.civil_status);
    put_text(&mut row, "occupation", &record.occupation);
    put_text(&mut row, "contact_number", &record.contact_number);
    put_text(&mut row, "purok", &record.purok);
    put_extras(&mut row, &record.extra);
    row
}

fn flatten_staff(record: &StaffRecord) -> FlatRow {
    let mut row = FlatRow::new();
    put_int(&mut row, "staff_id", record.staff_id);
    put_text(&mut row, "first_name", &record.first_name);
    put_text(&mut row, "last_name", &record.last_name);
    put_text(&mut row, "position", &record.position);
    put_text(&mut row, "gender", &record.gender);
    put_date(&mut row, "birthdate", record.birthdate);
    put_text(&mut row, "contact_number", &record.contact_number);
    put_text(&mut row, "status", &record.status);
    put_extras(&mut row, &record.extra);
    row
}

fn flatten_certificate(record: &CertificateRecord) -> FlatRow {
    let mut row = FlatRow::new();
    put_int(&mut row, "certificate_id", record.certificate_id);
    put_text(&mut row, "certificate_type", &record.certificate_type);
    put_text(&mut row, "purpose", &record.purpose);
    put_text(&mut row, "status", &record.status);
    put_date(&mut row, "requested_on", record.requested_on);
    put_date(&mut row, "issued_on", record.issued_on);
    if let Some(resident) = &record.resident {
        put_int(&mut row, "resident_id", resident.id);
        put_text(&mut row, "resident_first_name", &resident.first_name);
        put_text(&mut row, "resident_last_name", &resident.last_name);
    }
    put_person_name(&mut row, "approved_by_name", &record.approved_by);
    put_extras(&mut row, &record.extra);
    row
}

fn flatten_complaint(record: &ComplaintRecord) -> FlatRow {
    let mut row = FlatRow::new();
    put_int(&mut row, "complaint_id", record.complaint_id);
    put_text(&mut row, "subject", &record.subject);
    put_text(&mut row, "details", &record.details);
    put_text(&mut row, "status", &record.status);
    put_date(&mut row, "filed_on", record.filed_on);
    if let Some(category) = &record.category {
        put_text(&mut row, "category_name", &category.name);
    }
    put_person_name(&mut row, "complainant_name", &record.complainant);
    put_person_name(&mut row, "responded_by_name", &record.responded_by);
    put_extras(&mut row, &record.extra);
    row
}

fn flatten_announcement(record: &AnnouncementRecord) -> FlatRow {
    let mut row = FlatRow::new();
    put_int(&mut row, "announcement_id", record.announcement_id);
    put_text(&mut row, "title", &record.title);
    put_text(&mut row, "body", &record.body);
    put_text(&mut row, "audience", &record.audience);
    put_date(&mut row, "posted_on", record.posted_on);
    put_person_name(&mut row, "posted_by_name", &record.posted_by);
    put_extras(&mut row, &record.extra);
    row
}

fn flatten_household(record: &HouseholdRecord) -> FlatRow {
    let mut row = FlatRow::new();
    put_int(&mut row, "household_id", record.household_id);
    put_text(&mut row, "household_no", &record.household_no);
    put_text(&mut row, "purok", &record.purok);
    if let Some(head) = &record.head_resident {
        put_int(&mut row, "head_resident_id", head.id);
        row.insert("head_resident_name", head.full_name());
    }
    put_member_fields(&mut row, "member", &record.members);
    put_member_fields(&mut row, "staff_member", &record.staff_members);
    put_extras(&mut row, &record.extra);
    row
}

/// Flatten a batch of records.
pub fn flatten_all(records: &[RawRecord]) -> Vec<FlatRow> {
    records.iter().map(Flatten::flatten).collect()
}

//! Typed record model for the six categories served by the data layer.
//!
//! Upstream payloads are JSON-like and best-effort: fields may be missing,
//! relations may be absent, and unrecognized fields can appear at any time.
//! Each category therefore gets an explicit schema struct with optional
//! fields plus a flattened extra-fields bag, and [`RawRecord`] ties them
//! together as a tagged union.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Record category served by the upstream data-access layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordCategory {
    Residents,
    Staff,
    Certificates,
    Complaints,
    Announcements,
    Households,
}

impl RecordCategory {
    /// All categories in report order.
    pub const ALL: [RecordCategory; 6] = [
        Self::Residents,
        Self::Staff,
        Self::Certificates,
        Self::Complaints,
        Self::Announcements,
        Self::Households,
    ];

    /// Stable lowercase tag used in payloads and exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Residents => "residents",
            Self::Staff => "staff",
            Self::Certificates => "certificates",
            Self::Complaints => "complaints",
            Self::Announcements => "announcements",
            Self::Households => "households",
        }
    }

    /// Human-readable section title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Residents => "Residents",
            Self::Staff => "Staff",
            Self::Certificates => "Certificates",
            Self::Complaints => "Complaints",
            Self::Announcements => "Announcements",
            Self::Households => "Households",
        }
    }
}

impl fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar cell value in a flat row.
///
/// Nested mappings and arrays are never representable here; the flattener
/// replaces them with synthesized scalar fields before a row exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Convert a JSON value, returning `None` for nested objects/arrays.
    pub fn from_scalar_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Int(i))
                } else {
                    n.as_f64().map(Self::Float)
                }
            }
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Object(_) | Value::Array(_) => None,
        }
    }

    /// Numeric view, when the value is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Text view, when the value is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// String form used by free-text search and table cells.
    pub fn display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Single-level projection of a raw record.
///
/// Field order is insertion order, which downstream display and aggregation
/// rely on. Inserting an existing key replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    fields: Vec<(String, FieldValue)>,
}

impl FlatRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    /// Look up a field by exact key.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Text value of a field, when present and textual.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    /// Numeric value of a field, when present and numeric.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FieldValue::as_f64)
    }

    /// Date value of a field stored in ISO form.
    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        self.text(key)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }

    /// Display string of a field; empty when absent.
    pub fn display(&self, key: &str) -> String {
        self.get(key)
            .map(FieldValue::display_string)
            .unwrap_or_default()
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the row carries no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Nested person reference carried by certificate/complaint/announcement
/// payloads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonRef {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl PersonRef {
    /// `"First Last"` with absent parts omitted.
    pub fn full_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Nested complaint-category reference.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRef {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// Nested household-member reference.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberRef {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Resident master record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidentRecord {
    pub resident_id: Option<i64>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub civil_status: Option<String>,
    pub occupation: Option<String>,
    pub contact_number: Option<String>,
    pub purok: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Staff roster record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffRecord {
    pub staff_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub contact_number: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Certificate request record with resident and approver detail relations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateRecord {
    pub certificate_id: Option<i64>,
    pub certificate_type: Option<String>,
    pub purpose: Option<String>,
    pub status: Option<String>,
    pub requested_on: Option<NaiveDate>,
    pub issued_on: Option<NaiveDate>,
    pub resident: Option<PersonRef>,
    pub approved_by: Option<PersonRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Complaint record with category and responder relations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplaintRecord {
    pub complaint_id: Option<i64>,
    pub subject: Option<String>,
    pub details: Option<String>,
    pub status: Option<String>,
    pub filed_on: Option<NaiveDate>,
    pub category: Option<CategoryRef>,
    pub complainant: Option<PersonRef>,
    pub responded_by: Option<PersonRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Announcement record with author relation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnouncementRecord {
    pub announcement_id: Option<i64>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub audience: Option<String>,
    pub posted_on: Option<NaiveDate>,
    pub posted_by: Option<PersonRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Household record embedding member and staff-member arrays.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdRecord {
    pub household_id: Option<i64>,
    pub household_no: Option<String>,
    pub purok: Option<String>,
    pub head_resident: Option<PersonRef>,
    pub members: Vec<MemberRef>,
    pub staff_members: Vec<MemberRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Raw record as returned by the data layer, one variant per category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum RawRecord {
    Resident(ResidentRecord),
    Staff(StaffRecord),
    Certificate(CertificateRecord),
    Complaint(ComplaintRecord),
    Announcement(AnnouncementRecord),
    Household(HouseholdRecord),
}

impl RawRecord {
    /// Category this record belongs to.
    pub fn category(&self) -> RecordCategory {
        match self {
            Self::Resident(_) => RecordCategory::Residents,
            Self::Staff(_) => RecordCategory::Staff,
            Self::Certificate(_) => RecordCategory::Certificates,
            Self::Complaint(_) => RecordCategory::Complaints,
            Self::Announcement(_) => RecordCategory::Announcements,
            Self::Household(_) => RecordCategory::Households,
        }
    }
}

//! Upstream fetch boundary.
//!
//! The data-access layer is an external collaborator; this module only
//! defines the query shape, the [`RecordSource`] trait, and the join barrier
//! that fans out one fetch per category and waits for all of them. A failed
//! fetch for one category is logged and contributes zero rows rather than
//! aborting the build.

use core::fmt;
use core::future::Future;

use chrono::NaiveDate;

use crate::aggregate::CategoryRows;
use crate::flatten::Flatten;
use crate::record::{RawRecord, RecordCategory};

/// Optional date-range and single-entity filter for an upstream query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub entity_id: Option<i64>,
}

/// Upstream fetch failure.
#[derive(Debug)]
pub enum FetchError {
    /// The collaborator could not be reached or timed out.
    Unavailable(String),
    /// The collaborator answered with a payload that does not deserialize.
    Malformed(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(detail) => write!(f, "data source unavailable: {}", detail),
            Self::Malformed(detail) => write!(f, "malformed payload: {}", detail),
        }
    }
}

impl std::error::Error for FetchError {}

/// Per-category record query against the external data-access collaborator.
pub trait RecordSource {
    /// Fetch raw records for one category.
    fn fetch(
        &self,
        category: RecordCategory,
        query: &RecordQuery,
    ) -> impl Future<Output = Result<Vec<RawRecord>, FetchError>> + Send;
}

/// Fetch and flatten all six categories concurrently.
///
/// Each category writes into its own [`CategoryRows`] slot, so the fetches
/// share no mutable state; the `join!` is the barrier that guarantees no
/// cross-category aggregation starts before every slot is filled.
pub async fn fetch_all<S>(source: &S, query: &RecordQuery) -> CategoryRows
where
    S: RecordSource + Sync,
{
    let (residents, staff, certificates, complaints, announcements, households) = tokio::join!(
        fetch_category(source, RecordCategory::Residents, query),
        fetch_category(source, RecordCategory::Staff, query),
        fetch_category(source, RecordCategory::Certificates, query),
        fetch_category(source, RecordCategory::Complaints, query),
        fetch_category(source, RecordCategory::Announcements, query),
        fetch_category(source, RecordCategory::Households, query),
    );
    CategoryRows {
        residents,
        staff,
        certificates,
        complaints,
        announcements,
        households,
    }
}

async fn fetch_category<S>(
    source: &S,
    category: RecordCategory,
    query: &RecordQuery,
) -> Vec<crate::record::FlatRow>
where
    S: RecordSource + Sync,
{
    match source.fetch(category, query).await {
        Ok(records) => {
            log::debug!("fetched {} {} records", records.len(), category);
            records.iter().map(Flatten::flatten).collect()
        }
        Err(err) => {
            log::warn!("fetch failed for {}: {}; treating as zero rows", category, err);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CertificateRecord, ResidentRecord};

    struct StubSource;

    impl RecordSource for StubSource {
        async fn fetch(
            &self,
            category: RecordCategory,
            _query: &RecordQuery,
        ) -> Result<Vec<RawRecord>, FetchError> {
            match category {
                RecordCategory::Residents => Ok(vec![RawRecord::Resident(ResidentRecord {
                    resident_id: Some(1),
                    first_name: Some("Juan".to_string()),
                    ..ResidentRecord::default()
                })]),
                RecordCategory::Certificates => {
                    Ok(vec![RawRecord::Certificate(CertificateRecord {
                        certificate_id: Some(1),
                        status: Some("Pending".to_string()),
                        ..CertificateRecord::default()
                    })])
                }
                RecordCategory::Complaints => {
                    Err(FetchError::Unavailable("connection refused".to_string()))
                }
                _ => Ok(Vec::new()),
            }
        }
    }

    #[tokio::test]
    async fn failed_category_contributes_zero_rows_without_aborting() {
        let rows = fetch_all(&StubSource, &RecordQuery::default()).await;
        assert_eq!(rows.residents.len(), 1);
        assert_eq!(rows.certificates.len(), 1);
        assert!(rows.complaints.is_empty());
        assert_eq!(rows.certificates[0].text("status"), Some("Pending"));
    }
}

//! Report engine.
//!
//! Composes the full multi-page analytics document and single-category
//! detail reports from per-category flat rows, and produces the delimited
//! summary export. All drawing goes through the layout engine; the engine
//! itself only decides section order and section content.

use muni_report::aggregate::{
    age_buckets, certificate_status_counts, complaint_status_counts, count_by,
    count_by_with_missing, CategoryRows, NumericReport,
};
use muni_report::chrono::NaiveDate;
use muni_report::record::{FlatRow, RecordCategory};

use crate::interpret;
use crate::render_ir::RenderPage;
use crate::render_layout::{DocumentComposer, LayoutConfig};

/// Report composition options.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportOptions {
    pub layout: LayoutConfig,
    /// Banner title on the cover page.
    pub title: String,
    /// Shown on the cover subtitle when set.
    pub prepared_by: Option<String>,
    /// Report build date; also the reference date for age computation.
    pub as_of: NaiveDate,
}

impl ReportOptions {
    pub fn new(title: impl Into<String>, as_of: NaiveDate) -> Self {
        Self {
            layout: LayoutConfig::default(),
            title: title.into(),
            prepared_by: None,
            as_of,
        }
    }
}

/// Composes analytics documents from flattened category rows.
pub struct ReportEngine {
    opts: ReportOptions,
}

impl ReportEngine {
    pub fn new(opts: ReportOptions) -> Self {
        Self { opts }
    }

    /// Compose the full multi-page report.
    ///
    /// Section order: cover band, summary statistics table, numeric
    /// analytics table, per-category chart blocks, senior-citizen detail
    /// list. Categories with zero rows keep their summary-table line but
    /// get no chart block.
    pub fn compose_report(&self, rows: &CategoryRows) -> Vec<RenderPage> {
        let report = NumericReport::compute(rows, self.opts.as_of);
        let mut composer = DocumentComposer::new(self.opts.layout);

        composer.write_banner(&self.opts.title, Some(&self.cover_subtitle()));
        self.write_summary_table(&mut composer, rows);
        self.write_analytics_table(&mut composer, &report);
        self.write_category_charts(&mut composer, rows);
        self.write_senior_detail(&mut composer, rows);

        let pages = composer.finish();
        log::debug!("composed report with {} pages", pages.len());
        pages
    }

    /// Compose a single-category detail report reusing the same chart and
    /// layout primitives.
    pub fn compose_category_report(
        &self,
        category: RecordCategory,
        rows: &[FlatRow],
    ) -> Vec<RenderPage> {
        let mut composer = DocumentComposer::new(self.opts.layout);
        composer.write_banner(
            &format!("{} — {}", self.opts.title, category.title()),
            Some(&self.cover_subtitle()),
        );
        composer.write_paragraph(&format!(
            "{} records on file: {}.",
            category.title(),
            rows.len()
        ));
        self.write_category_chart(&mut composer, category, rows);
        let columns = detail_columns(category);
        let headers: Vec<&str> = columns.iter().map(|(header, _)| *header).collect();
        let table_rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| columns.iter().map(|(_, field)| row.display(field)).collect())
            .collect();
        composer.write_heading("Records");
        composer.write_table(&headers, &table_rows);
        composer.finish()
    }

    /// Delimited text export of every derived summary metric.
    pub fn summary_csv(&self, report: &NumericReport) -> String {
        let mut out = String::from("metric,value\n");
        for (name, value) in report.metrics() {
            out.push_str(name);
            out.push(',');
            if value.fract() == 0.0 {
                out.push_str(&format!("{}\n", value as i64));
            } else {
                out.push_str(&format!("{value}\n"));
            }
        }
        out
    }

    fn cover_subtitle(&self) -> String {
        match &self.opts.prepared_by {
            Some(name) => format!("As of {} — prepared by {}", self.opts.as_of, name),
            None => format!("As of {}", self.opts.as_of),
        }
    }

    fn write_summary_table(&self, composer: &mut DocumentComposer, rows: &CategoryRows) {
        composer.write_heading("Summary Statistics");
        let table: Vec<Vec<String>> = RecordCategory::ALL
            .iter()
            .map(|category| {
                vec![
                    category.title().to_string(),
                    rows.rows(*category).len().to_string(),
                ]
            })
            .collect();
        composer.write_table(&["Category", "Records"], &table);
    }

    fn write_analytics_table(&self, composer: &mut DocumentComposer, report: &NumericReport) {
        composer.write_heading("Report Analytics");
        let table: Vec<Vec<String>> = report
            .metrics()
            .iter()
            .map(|(name, value)| {
                let shown = if value.fract() == 0.0 {
                    format!("{}", *value as i64)
                } else {
                    format!("{value}")
                };
                vec![name.replace('_', " "), shown]
            })
            .collect();
        composer.write_table(&["Metric", "Value"], &table);
    }

    fn write_category_charts(&self, composer: &mut DocumentComposer, rows: &CategoryRows) {
        self.write_category_chart(composer, RecordCategory::Certificates, &rows.certificates);
        self.write_category_chart(composer, RecordCategory::Complaints, &rows.complaints);
        self.write_category_chart(composer, RecordCategory::Residents, &rows.residents);
        self.write_category_chart(composer, RecordCategory::Staff, &rows.staff);
        self.write_category_chart(composer, RecordCategory::Announcements, &rows.announcements);
    }

    /// Chart block for one category. Zero-row categories are skipped by the
    /// composer before any geometry is generated.
    fn write_category_chart(
        &self,
        composer: &mut DocumentComposer,
        category: RecordCategory,
        rows: &[FlatRow],
    ) {
        match category {
            RecordCategory::Certificates => {
                let series = certificate_status_counts(rows, "status");
                let text = interpret::certificate_interpretation(&series);
                composer.write_pie_block("Certificate Requests by Status", &series, &text);
            }
            RecordCategory::Complaints => {
                let series = complaint_status_counts(rows, "status");
                let text = interpret::complaint_interpretation(&series);
                composer.write_pie_block("Complaints by Status", &series, &text);
            }
            RecordCategory::Residents => {
                let gender = count_by_with_missing(rows, "gender", "N/A");
                let ages = age_buckets(rows, "birthdate", self.opts.as_of);
                let text = interpret::resident_interpretation(&gender, &ages);
                composer.write_pie_block("Residents by Gender", &gender, &text);
                if !rows.is_empty() {
                    composer.write_bar_block("Residents by Age Group", &ages, &text);
                }
            }
            RecordCategory::Staff => {
                let series = count_by(rows, "position");
                let text = interpret::staff_interpretation(&series);
                composer.write_bar_block("Staff by Position", &series, &text);
            }
            RecordCategory::Announcements => {
                let series = count_by(rows, "audience");
                let text = interpret::announcement_interpretation(&series);
                composer.write_bar_block("Announcements by Audience", &series, &text);
            }
            RecordCategory::Households => {}
        }
    }

    /// Detail list of the senior demographic subgroup, on its own section
    /// page with a banner band and table.
    fn write_senior_detail(&self, composer: &mut DocumentComposer, rows: &CategoryRows) {
        let seniors: Vec<&FlatRow> = rows
            .residents
            .iter()
            .filter(|row| {
                row.date("birthdate")
                    .map(|birthdate| {
                        muni_report::aggregate::age_in_years(birthdate, self.opts.as_of) >= 60
                    })
                    .unwrap_or(false)
            })
            .collect();
        if seniors.is_empty() {
            return;
        }
        composer.start_section("Senior Citizens", Some(&self.cover_subtitle()));
        let table: Vec<Vec<String>> = seniors
            .iter()
            .map(|row| {
                let name = format!(
                    "{} {}",
                    row.display("first_name"),
                    row.display("last_name")
                );
                let age = row
                    .date("birthdate")
                    .map(|b| muni_report::aggregate::age_in_years(b, self.opts.as_of).to_string())
                    .unwrap_or_default();
                vec![
                    name.trim().to_string(),
                    age,
                    row.display("gender"),
                    row.display("purok"),
                ]
            })
            .collect();
        composer.write_table(&["Name", "Age", "Gender", "Purok"], &table);
    }
}

/// Fixed detail-table columns per category.
fn detail_columns(category: RecordCategory) -> &'static [(&'static str, &'static str)] {
    match category {
        RecordCategory::Residents => &[
            ("First Name", "first_name"),
            ("Last Name", "last_name"),
            ("Gender", "gender"),
            ("Birthdate", "birthdate"),
            ("Purok", "purok"),
        ],
        RecordCategory::Staff => &[
            ("First Name", "first_name"),
            ("Last Name", "last_name"),
            ("Position", "position"),
            ("Status", "status"),
        ],
        RecordCategory::Certificates => &[
            ("Type", "certificate_type"),
            ("Status", "status"),
            ("Requested", "requested_on"),
            ("Resident", "resident_first_name"),
            ("Approved By", "approved_by_name"),
        ],
        RecordCategory::Complaints => &[
            ("Subject", "subject"),
            ("Category", "category_name"),
            ("Status", "status"),
            ("Filed", "filed_on"),
            ("Responded By", "responded_by_name"),
        ],
        RecordCategory::Announcements => &[
            ("Title", "title"),
            ("Audience", "audience"),
            ("Posted", "posted_on"),
            ("Posted By", "posted_by_name"),
        ],
        RecordCategory::Households => &[
            ("Household No", "household_no"),
            ("Purok", "purok"),
            ("Head", "head_resident_name"),
            ("Members", "member_count"),
        ],
    }
}

//! Deterministic interpretation text for chart blocks.
//!
//! Each formatter reads specific named series values (case-insensitively,
//! defaulting to 0 when absent) and composes a fixed template with 1-dp
//! percentages. The output feeds the right-hand column of a
//! chart-with-interpretation block.

use muni_report::aggregate::{percentage, series_total, series_value, SeriesPoint};

fn count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

fn part(series: &[SeriesPoint], name: &str, total: f64) -> String {
    let value = series_value(series, name);
    format!("{}: {} ({:.1}%)", name, count(value), percentage(value, total))
}

/// Certificate status summary, e.g. `Pending: 3 (30.0%)`.
pub fn certificate_interpretation(series: &[SeriesPoint]) -> String {
    let total = series_total(series);
    format!(
        "Certificate requests total {}. {}. {}. {}. {}.",
        count(total),
        part(series, "Pending", total),
        part(series, "Approved", total),
        part(series, "Claimed", total),
        part(series, "Rejected", total),
    )
}

/// Complaint status summary including the resolution rate.
pub fn complaint_interpretation(series: &[SeriesPoint]) -> String {
    let total = series_total(series);
    let resolved = series_value(series, "Resolved");
    format!(
        "Complaints filed total {}. {}. {}. {}. Resolution rate stands at {:.1}%.",
        count(total),
        part(series, "Pending", total),
        part(series, "In Progress", total),
        part(series, "Resolved", total),
        percentage(resolved, total),
    )
}

/// Resident demographics summary over the gender split and age bands.
pub fn resident_interpretation(gender: &[SeriesPoint], ages: &[SeriesPoint]) -> String {
    let total = series_total(gender);
    let largest = ages
        .iter()
        .max_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(core::cmp::Ordering::Equal))
        .filter(|band| band.value > 0.0);
    let age_note = match largest {
        Some(band) => format!(
            " The largest age group is {} with {} residents ({:.1}%).",
            band.name,
            count(band.value),
            percentage(band.value, series_total(ages)),
        ),
        None => String::new(),
    };
    format!(
        "Registered residents total {}. {}. {}.{}",
        count(total),
        part(gender, "Male", total),
        part(gender, "Female", total),
        age_note,
    )
}

/// Staff roster summary over the position breakdown.
pub fn staff_interpretation(positions: &[SeriesPoint]) -> String {
    let total = series_total(positions);
    let top = positions
        .iter()
        .max_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(core::cmp::Ordering::Equal));
    match top {
        Some(top) if top.value > 0.0 => format!(
            "Active staff total {}. The most common position is {} ({} of {}).",
            count(total),
            top.name,
            count(top.value),
            count(total),
        ),
        _ => format!("Active staff total {}.", count(total)),
    }
}

/// Announcement reach summary over the audience breakdown.
pub fn announcement_interpretation(audiences: &[SeriesPoint]) -> String {
    let total = series_total(audiences);
    let top = audiences
        .iter()
        .max_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(core::cmp::Ordering::Equal));
    match top {
        Some(top) if top.value > 0.0 => format!(
            "Announcements posted total {}. Most target {} ({:.1}%).",
            count(total),
            top.name,
            percentage(top.value, total),
        ),
        _ => format!("Announcements posted total {}.", count(total)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_template_reports_named_counts_with_percentages() {
        let series = [
            SeriesPoint::new("PENDING", 3.0),
            SeriesPoint::new("APPROVED", 4.0),
            SeriesPoint::new("CLAIMED", 2.0),
            SeriesPoint::new("REJECTED", 1.0),
        ];
        let text = certificate_interpretation(&series);
        assert!(text.contains("Pending: 3 (30.0%)"));
        assert!(text.contains("Approved: 4 (40.0%)"));
        assert!(text.contains("total 10"));
    }

    #[test]
    fn absent_series_names_default_to_zero() {
        let series = [SeriesPoint::new("Approved", 5.0)];
        let text = certificate_interpretation(&series);
        assert!(text.contains("Pending: 0 (0.0%)"));
        assert!(text.contains("Approved: 5 (100.0%)"));
    }

    #[test]
    fn empty_series_formats_all_zero_percentages() {
        let text = complaint_interpretation(&[]);
        assert!(text.contains("total 0"));
        assert!(text.contains("Resolution rate stands at 0.0%"));
    }

    #[test]
    fn resident_template_names_the_largest_age_band() {
        let gender = [
            SeriesPoint::new("Male", 6.0),
            SeriesPoint::new("Female", 4.0),
        ];
        let ages = [
            SeriesPoint::new("Youth", 1.0),
            SeriesPoint::new("Young Adult", 7.0),
            SeriesPoint::new("Middle Age", 2.0),
            SeriesPoint::new("Senior", 0.0),
        ];
        let text = resident_interpretation(&gender, &ages);
        assert!(text.contains("Male: 6 (60.0%)"));
        assert!(text.contains("largest age group is Young Adult"));
    }
}

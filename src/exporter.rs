use crate::job_parser::JobRecord;
use anyhow::Result;
use std::fs;
use std::path::Path;

/// Column order for tabular output. JSON output keeps `skills` as a real
/// sequence; CSV joins it with ", " (lossy for skill names containing
/// commas).
pub const CSV_HEADER: &[&str] = &[
    "scraped_at",
    "job_id",
    "posted_at",
    "payment_type",
    "budget",
    "skill_level",
    "title",
    "url",
    "description",
    "location",
    "rating",
    "proposals_count",
    "total_spent",
    "project_length",
    "weekly_hours",
    "skills",
    "query",
    "source",
];

/// Pretty-printed UTF-8 JSON array. An empty run still writes `[]`.
pub fn to_json(rows: &[JobRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(rows)?;
    fs::write(path, json)?;
    Ok(())
}

/// CSV with the fixed header; an empty run still writes a header-only file.
pub fn to_csv(rows: &[JobRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        let rating = row.rating.map(|v| v.to_string()).unwrap_or_default();
        let proposals = row
            .proposals_count
            .map(|v| v.to_string())
            .unwrap_or_default();
        let skills = row.skills.join(", ");
        writer.write_record(&[
            row.scraped_at.as_str(),
            row.job_id.as_str(),
            row.posted_at.as_str(),
            row.payment_type.as_str(),
            row.budget.as_str(),
            row.skill_level.as_str(),
            row.title.as_str(),
            row.url.as_str(),
            row.description.as_str(),
            row.location.as_str(),
            rating.as_str(),
            proposals.as_str(),
            row.total_spent.as_str(),
            row.project_length.as_str(),
            row.weekly_hours.as_str(),
            skills.as_str(),
            row.query.as_str(),
            row.source.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("upwork_exporter_tests_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    fn sample_record() -> JobRecord {
        JobRecord {
            scraped_at: "2024-05-01T10:00:00Z".to_string(),
            job_id: "0123456789".to_string(),
            posted_at: "2024-05-01T07:00:00Z".to_string(),
            payment_type: "Hourly".to_string(),
            budget: "$15.00-$30.00".to_string(),
            skill_level: "Expert".to_string(),
            skills: vec!["Rust".to_string(), "Tokio".to_string()],
            title: "Build a scraper".to_string(),
            url: "https://www.upwork.com/jobs/~0123456789abcdef".to_string(),
            description: "Collect listings nightly".to_string(),
            location: "United States".to_string(),
            rating: Some(4.9),
            proposals_count: Some(12),
            query: "rust developer".to_string(),
            source: "Upwork Jobs Search".to_string(),
            ..JobRecord::default()
        }
    }

    #[test]
    fn json_round_trips_field_for_field() {
        let record = sample_record();
        let json = serde_json::to_string_pretty(&[record.clone()]).unwrap();
        let back: Vec<JobRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![record]);
    }

    #[test]
    fn empty_run_still_writes_valid_files() {
        let json_path = temp_path("empty.json");
        let csv_path = temp_path("empty.csv");
        to_json(&[], &json_path).unwrap();
        to_csv(&[], &csv_path).unwrap();

        assert_eq!(fs::read_to_string(&json_path).unwrap(), "[]");
        let csv = fs::read_to_string(&csv_path).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("scraped_at,job_id,posted_at"));
    }

    #[test]
    fn csv_joins_skills_and_blanks_missing_numerics() {
        let mut record = sample_record();
        record.rating = None;
        record.proposals_count = None;
        let csv_path = temp_path("rows.csv");
        to_csv(&[record], &csv_path).unwrap();

        let csv = fs::read_to_string(&csv_path).unwrap();
        let data_line = csv.lines().nth(1).unwrap();
        // the joined skills field is quoted because it contains a comma
        assert!(data_line.contains("\"Rust, Tokio\""));
        assert!(data_line.contains(",,"));
    }

    #[test]
    fn csv_emits_numeric_cells_when_present() {
        let csv_path = temp_path("numeric.csv");
        to_csv(&[sample_record()], &csv_path).unwrap();
        let csv = fs::read_to_string(&csv_path).unwrap();
        let data_line = csv.lines().nth(1).unwrap();
        assert!(data_line.contains("4.9"));
        assert!(data_line.contains("12"));
    }
}

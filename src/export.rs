//! Single-policy exports: a titled field/value document for vehicle policies
//! and a one-row CSV for travel policies.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::models::{TravelPolicy, VehiclePolicy};

const DOCUMENT_TITLE: &str = "Insurance Policy Details";

/// Render a vehicle policy as a two-column text document
pub fn vehicle_policy_document(
    user_id: &str,
    policy: &VehiclePolicy,
    generated_at: DateTime<Utc>,
) -> String {
    let price = policy.price.to_string();
    let rows: [(&str, &str); 8] = [
        ("User ID", user_id),
        ("Insurance ID", &policy.insurance_id),
        ("Registration Number", &policy.registration_number),
        ("Make", &policy.make),
        ("Model", &policy.model),
        ("Insurance Type", &policy.insurance_type),
        ("Price", &price),
        ("Expiry Date", &policy.expiry_date),
    ];

    let key_width = rows
        .iter()
        .map(|(k, _)| k.len())
        .max()
        .unwrap_or(0)
        .max("Field".len());
    let value_width = rows
        .iter()
        .map(|(_, v)| v.chars().count())
        .max()
        .unwrap_or(0)
        .max("Value".len());
    let rule = format!("+-{}-+-{}-+", "-".repeat(key_width), "-".repeat(value_width));

    let mut out = String::new();
    out.push_str(DOCUMENT_TITLE);
    out.push('\n');
    out.push_str(&"=".repeat(DOCUMENT_TITLE.len()));
    out.push_str("\n\n");
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "| {:<kw$} | {:<vw$} |\n",
        "Field",
        "Value",
        kw = key_width,
        vw = value_width
    ));
    out.push_str(&rule);
    out.push('\n');
    for (key, value) in rows {
        out.push_str(&format!(
            "| {:<kw$} | {:<vw$} |\n",
            key,
            value,
            kw = key_width,
            vw = value_width
        ));
    }
    out.push_str(&rule);
    out.push_str(&format!(
        "\n\nGenerated {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out
}

/// Server ids end up in file names; keep only characters that cannot form a path
fn file_stem(insurance_id: &str) -> String {
    let stem: String = insurance_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "policy".to_string()
    } else {
        stem
    }
}

pub fn vehicle_policy_filename(policy: &VehiclePolicy) -> String {
    format!("Policy_{}.txt", file_stem(&policy.insurance_id))
}

/// Render a travel policy as a header record plus one data record
pub fn travel_policy_csv(policy: &TravelPolicy) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Policy ID", "Insurance Type", "Start Date", "End Date", "Price"])?;
    writer.write_record([
        policy.insurance_id.as_str(),
        policy.insurance_type.as_str(),
        policy.start_date.as_str(),
        policy.end_date.as_str(),
        policy.price.to_string().as_str(),
    ])?;
    let bytes = writer.into_inner().context("flushing CSV export")?;
    Ok(String::from_utf8(bytes)?)
}

pub fn travel_policy_filename(policy: &TravelPolicy) -> String {
    format!("{}_policy.csv", file_stem(&policy.insurance_id))
}

/// Write an export into `dir`, creating it if needed; `filename` must be a bare name
pub fn write_export(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let mut components = Path::new(filename).components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        bail!("refusing to export to {:?}", filename);
    }
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating export dir {}", dir.display()))?;
    }
    let path = dir.join(filename);
    fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Price;
    use chrono::TimeZone;

    fn vehicle_policy() -> VehiclePolicy {
        VehiclePolicy {
            insurance_id: "abc123".into(),
            registration_number: "AB12CDE".into(),
            make: "Ford".into(),
            model: "Focus".into(),
            insurance_type: "Premium".into(),
            price: Price::Text("180.00".into()),
            expiry_date: "2027-01-01".into(),
        }
    }

    #[test]
    fn test_vehicle_document_lists_every_field() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let doc = vehicle_policy_document("alice", &vehicle_policy(), at);

        assert!(doc.starts_with("Insurance Policy Details\n"));
        for expected in [
            "| User ID ",
            "alice",
            "| Registration Number | AB12CDE",
            "Premium",
            "180.00",
            "2027-01-01",
            "Generated 2026-01-02 03:04:05 UTC",
        ] {
            assert!(doc.contains(expected), "missing {expected:?} in\n{doc}");
        }
        assert_eq!(vehicle_policy_filename(&vehicle_policy()), "Policy_abc123.txt");
    }

    #[test]
    fn test_travel_csv() {
        let policy = TravelPolicy {
            insurance_id: "t-1".into(),
            insurance_type: "Long Term".into(),
            start_date: "2026-05-01".into(),
            end_date: "2026-11-01".into(),
            price: Price::base(200),
            ..Default::default()
        };
        assert_eq!(
            travel_policy_csv(&policy).unwrap(),
            "Policy ID,Insurance Type,Start Date,End Date,Price\nt-1,Long Term,2026-05-01,2026-11-01,200\n"
        );
        assert_eq!(travel_policy_filename(&policy), "t-1_policy.csv");
    }

    #[test]
    fn test_travel_csv_quotes_embedded_commas() {
        let policy = TravelPolicy {
            insurance_id: "t-1".into(),
            insurance_type: "Long Term, Family".into(),
            start_date: "a".into(),
            end_date: "b".into(),
            price: Price::base(200),
            ..Default::default()
        };
        let content = travel_policy_csv(&policy).unwrap();

        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 5);
        assert_eq!(&rows[0][1], "Long Term, Family");
    }

    #[test]
    fn test_filenames_drop_path_characters() {
        let mut policy = vehicle_policy();
        policy.insurance_id = "../../etc/x".into();
        assert_eq!(vehicle_policy_filename(&policy), "Policy_______etc_x.txt");

        let travel = TravelPolicy {
            insurance_id: "..".into(),
            ..Default::default()
        };
        assert_eq!(travel_policy_filename(&travel), "___policy.csv");
    }

    #[test]
    fn test_write_export_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let path = write_export(&target, "x.csv", "a,b").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "a,b");
    }

    #[test]
    fn test_write_export_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        for name in ["../out.csv", "a/b.csv", "..", "", "/tmp/x.csv"] {
            assert!(write_export(&target, name, "x").is_err(), "{name:?} accepted");
        }
        assert!(!dir.path().join("out.csv").exists());
    }
}

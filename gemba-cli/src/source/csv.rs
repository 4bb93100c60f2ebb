//! CSV export folder loader

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use csv::{ReaderBuilder, Trim};

use crate::migration::{Dataset, DatasetCatalog, DatasetSource, RawRow};
use crate::services::matching::extract_facility_name;

/// File-name markers that identify each export
mod markers {
    pub const INSPECTION_TREE: &str = "点検ツリー";
    pub const FACILITIES: &str = "施設情報";
    pub const EQUIPMENT: &str = "設備情報";
}

/// Which export a CSV file is, by its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    InspectionTree,
    LegacyFacilities,
    LegacyEquipment,
}

impl ExportKind {
    /// Classify a file name. Non-CSV files and unrelated exports give `None`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if !name.ends_with(".csv") {
            return None;
        }
        if name.contains(markers::INSPECTION_TREE) {
            Some(ExportKind::InspectionTree)
        } else if name.contains(markers::FACILITIES) {
            Some(ExportKind::LegacyFacilities)
        } else if name.contains(markers::EQUIPMENT) {
            Some(ExportKind::LegacyEquipment)
        } else {
            None
        }
    }
}

/// Parse CSV text into rows.
///
/// Quoted fields with doubled-quote escapes are supported, rows may have
/// different lengths, fields are trimmed, and rows with no non-blank field
/// are dropped. A leading byte-order mark is ignored.
pub fn parse_csv(content: &str) -> Result<Vec<RawRow>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to parse CSV record {}", idx + 1))?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }

    Ok(rows)
}

/// Read and parse a UTF-8 CSV file
pub fn read_csv_file(path: &Path) -> Result<Vec<RawRow>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
    parse_csv(&content).with_context(|| format!("Failed to parse CSV file: {}", path.display()))
}

/// Loads every recognised export from one folder
#[derive(Debug, Clone)]
pub struct FolderDatasetSource {
    dir: PathBuf,
}

impl FolderDatasetSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FolderDatasetSource { dir: dir.into() }
    }

    /// CSV file names in the folder, sorted for a stable discovery order
    fn file_names(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read CSV folder: {}", self.dir.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read folder entry")?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => log::warn!(
                    "Skipping file with a non UTF-8 name: {}",
                    entry.path().display()
                ),
            }
        }
        names.sort();
        Ok(names)
    }

    fn load_catalog(&self) -> Result<DatasetCatalog> {
        let mut catalog = DatasetCatalog::default();

        for name in self.file_names()? {
            let Some(kind) = ExportKind::from_file_name(&name) else {
                log::debug!("Ignoring {}", name);
                continue;
            };

            let rows = read_csv_file(&self.dir.join(&name))?;
            log::debug!("Loaded {} ({} rows) as {:?}", name, rows.len(), kind);

            match kind {
                ExportKind::InspectionTree => {
                    let tag = extract_facility_name(&name);
                    catalog.hierarchy.push(Dataset::new(name, tag, rows));
                }
                ExportKind::LegacyFacilities => catalog.legacy.facilities = Some(rows),
                ExportKind::LegacyEquipment => catalog.legacy.equipment = Some(rows),
            }
        }

        log::info!(
            "Loaded {} inspection trees from {}",
            catalog.dataset_count(),
            self.dir.display()
        );
        Ok(catalog)
    }
}

#[async_trait]
impl DatasetSource for FolderDatasetSource {
    async fn load(&self) -> Result<DatasetCatalog> {
        self.load_catalog()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gemba-cli-csv-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_quotes_and_blank_lines() {
        let rows = parse_csv("\u{feff}a,\"b,c\",\"say \"\"hi\"\"\"\n\n  \nd , e\r\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["a", "b,c", "say \"hi\""]);
        assert_eq!(rows[1], vec!["d", "e"]);
    }

    #[test]
    fn test_parse_ragged_rows() {
        let rows = parse_csv("01,,Main\n02,,,Room,extra\n").unwrap();
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 5);
    }

    #[test]
    fn test_parse_drops_rows_of_empty_fields() {
        let rows = parse_csv(",,\n01,,Main\n").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_export_kind_from_name() {
        assert_eq!(
            ExportKind::from_file_name("点検ツリー（北部）.csv"),
            Some(ExportKind::InspectionTree)
        );
        assert_eq!(
            ExportKind::from_file_name("取り扱いデータ - 施設情報.csv"),
            Some(ExportKind::LegacyFacilities)
        );
        assert_eq!(
            ExportKind::from_file_name("取り扱いデータ - 設備情報.csv"),
            Some(ExportKind::LegacyEquipment)
        );
        assert_eq!(ExportKind::from_file_name("点検ツリー（北部）.xlsx"), None);
        assert_eq!(ExportKind::from_file_name("資格一覧.csv"), None);
    }

    #[tokio::test]
    async fn test_folder_source_loads_catalog() {
        let dir = temp_dir();
        fs::write(dir.join("点検ツリー（南部水再生センター）.csv"), "01,,South\n").unwrap();
        fs::write(dir.join("点検ツリー（北部）.csv"), "01,,North\n02,,,Room\n").unwrap();
        fs::write(dir.join("取り扱いデータ - 設備情報.csv"), "h1,h2\nv1,v2\n").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();
        fs::create_dir(dir.join("archive.csv")).unwrap();

        let catalog = FolderDatasetSource::new(&dir).load().await.unwrap();

        assert_eq!(catalog.dataset_count(), 2);
        let tags: Vec<_> = catalog.hierarchy.iter().map(|d| d.facility_tag.as_str()).collect();
        assert_eq!(tags, vec!["北部", "南部"]);
        assert_eq!(catalog.hierarchy[0].rows.len(), 2);
        assert_eq!(catalog.legacy.equipment.as_ref().map(|r| r.len()), Some(2));
        assert!(catalog.legacy.facilities.is_none());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_non_utf8_file_name_is_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = temp_dir();
        fs::write(dir.join("点検ツリー（北部）.csv"), "01,,North\n").unwrap();
        fs::write(dir.join(OsStr::from_bytes(b"\xff\xfe.csv")), "01,,Broken\n").unwrap();

        let source = FolderDatasetSource::new(&dir);
        assert_eq!(source.file_names().unwrap(), vec!["点検ツリー（北部）.csv"]);
        assert_eq!(source.load().await.unwrap().dataset_count(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_missing_folder_is_an_error() {
        let source = FolderDatasetSource::new(std::env::temp_dir().join("gemba-cli-missing-dir"));
        assert!(source.load().await.is_err());
    }
}

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::*;
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, trace};

use crate::domain::TVError;

/// Field names in projection order.
pub const FIELDS: [&str; 4] = ["region_name", "region_alpha_code", "value", "ref_date"];

const EMBEDDED_DATA: &str = include_str!("../data/data.json");

/// One dataset entry. All fields are kept as display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub region_name: String,
    pub region_alpha_code: String,
    pub value: String,
    pub ref_date: String,
}

impl Record {
    pub fn new(
        region_name: impl Into<String>,
        region_alpha_code: impl Into<String>,
        value: impl Into<String>,
        ref_date: impl Into<String>,
    ) -> Self {
        Self {
            region_name: sanitize(region_name.into()),
            region_alpha_code: sanitize(region_alpha_code.into()),
            value: sanitize(value.into()),
            ref_date: sanitize(ref_date.into()),
        }
    }
}

// Keep each cell on a single terminal line.
fn sanitize(s: String) -> String {
    if s.contains('\n') {
        s.replace("\r\n", " ↵ ").replace('\n', " ↵ ")
    } else {
        s
    }
}

/// Anything that can hand out the records to display.
pub trait RecordSource {
    fn name(&self) -> String;
    fn load(&self) -> Result<Vec<Record>, TVError>;
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    region_name: Option<Value>,
    #[serde(default)]
    region_alpha_code: Option<Value>,
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    ref_date: Option<Value>,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        Record::new(
            json_display(raw.region_name),
            json_display(raw.region_alpha_code),
            json_display(raw.value),
            json_display(raw.ref_date),
        )
    }
}

// Missing and null fields render as empty strings.
fn json_display(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

/// The dataset compiled into the binary, or any JSON array of records.
#[derive(Debug, Clone)]
pub struct EmbeddedSource {
    json: String,
}

impl EmbeddedSource {
    pub fn from_json(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl Default for EmbeddedSource {
    fn default() -> Self {
        Self::from_json(EMBEDDED_DATA)
    }
}

impl RecordSource for EmbeddedSource {
    fn name(&self) -> String {
        "regions".to_string()
    }

    fn load(&self) -> Result<Vec<Record>, TVError> {
        let raw: Vec<RawRecord> = serde_json::from_str(&self.json)?;
        debug!("Decoded {} embedded records", raw.len());
        Ok(raw.into_iter().map(Record::from).collect())
    }
}

#[derive(Debug, PartialEq)]
enum FileType {
    CSV,
    JSON,
    PARQUET,
    ARROW,
}

/// A data file on disk, read with polars.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn detect_file_type(path: &Path) -> Result<FileType, TVError> {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_uppercase())
            .as_deref()
        {
            Some("CSV") => Ok(FileType::CSV),
            Some("JSON") => Ok(FileType::JSON),
            Some("PARQUET") | Some("PQ") => Ok(FileType::PARQUET),
            Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::ARROW),
            _ => Err(TVError::UnknownFileType),
        }
    }

    fn check_file(path: &Path) -> Result<(), TVError> {
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TVError::FileNotFound,
            ErrorKind::PermissionDenied => TVError::PermissionDenied,
            _ => TVError::IoError(e),
        })?;
        if !metadata.is_file() {
            return Err(TVError::LoadingFailed("Not a file!".into()));
        }
        Ok(())
    }

    fn read_frame(&self, file_type: FileType) -> Result<DataFrame, TVError> {
        let path = self.path.as_path();
        let df = match file_type {
            FileType::CSV => LazyCsvReader::new(PlPath::Local(path.into()))
                .with_has_header(true)
                .finish()?
                .collect()?,
            FileType::JSON => JsonReader::new(File::open(path)?).finish()?,
            FileType::PARQUET => {
                LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())?
                    .collect()?
            }
            FileType::ARROW => LazyFrame::scan_ipc(
                PlPath::Local(path.into()),
                polars::io::ipc::IpcScanOptions,
                UnifiedScanArgs::default(),
            )?
            .collect()?,
        };
        Ok(df)
    }

    /// Returns the field as display strings, or empty strings if the frame lacks it.
    fn load_field(df: &DataFrame, name: &str) -> Result<Vec<String>, PolarsError> {
        let present = df.get_column_names().iter().any(|c| c.as_str() == name);
        if !present {
            debug!("Field \"{name}\" missing, using empty values");
            return Ok(vec![String::new(); df.height()]);
        }

        let col = df.column(name)?.cast(&DataType::String)?;
        let series = col.str()?;
        let data = series
            .into_iter()
            .map(|value| value.map(str::to_string).unwrap_or_default())
            .collect();
        Ok(data)
    }
}

impl RecordSource for FileSource {
    fn name(&self) -> String {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("???")
            .to_string()
    }

    #[instrument(skip(self), fields(path = ?self.path))]
    fn load(&self) -> Result<Vec<Record>, TVError> {
        Self::check_file(&self.path)?;
        let file_type = Self::detect_file_type(&self.path)?;
        trace!("Loading {:?} as {:?}", self.path, file_type);

        let start_time = Instant::now();
        let df = self.read_frame(file_type)?;

        // One thread per field.
        let fields: Result<Vec<Vec<String>>, PolarsError> = FIELDS
            .par_iter()
            .map(|name| Self::load_field(&df, name))
            .collect();
        let mut fields = fields?.into_iter();

        let (Some(names), Some(codes), Some(values), Some(dates)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(TVError::LoadingFailed("Missing fields".into()));
        };

        let records: Vec<Record> = names
            .into_iter()
            .zip(codes)
            .zip(values)
            .zip(dates)
            .map(|(((name, code), value), date)| Record::new(name, code, value, date))
            .collect();

        info!(
            "Loading {} records took {}ms ...",
            records.len(),
            start_time.elapsed().as_millis()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_dataset_loads() {
        let records = EmbeddedSource::default().load().unwrap();
        assert!(!records.is_empty());
        assert_eq!(records[0], Record::new("Aruba", "ABW", "10", "2020"));
    }

    #[test]
    fn numbers_and_missing_fields_become_strings() {
        let json = r#"[
            {"region_name": "Aruba", "region_alpha_code": "ABW", "value": 10, "ref_date": "2020"},
            {"region_name": "Nowhere", "value": null}
        ]"#;
        let records = EmbeddedSource::from_json(json).load().unwrap();
        assert_eq!(records[0].value, "10");
        assert_eq!(records[1], Record::new("Nowhere", "", "", ""));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = EmbeddedSource::from_json("{not json").load().unwrap_err();
        assert!(matches!(err, TVError::JsonError(_)));
    }

    #[test]
    fn newlines_are_flattened() {
        let r = Record::new("a\nb", "", "", "");
        assert_eq!(r.region_name, "a ↵ b");
    }

    #[test]
    fn detects_file_types() {
        assert_eq!(
            FileSource::detect_file_type(Path::new("x.CSV")).unwrap(),
            FileType::CSV
        );
        assert_eq!(
            FileSource::detect_file_type(Path::new("x.pq")).unwrap(),
            FileType::PARQUET
        );
        assert!(matches!(
            FileSource::detect_file_type(Path::new("x.txt")),
            Err(TVError::UnknownFileType)
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let src = FileSource::new(PathBuf::from("/definitely/not/here.csv"));
        assert!(matches!(src.load(), Err(TVError::FileNotFound)));
    }

    #[test]
    fn csv_file_loads_and_fills_missing_columns() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "region_name,value").unwrap();
        writeln!(file, "Aruba,10").unwrap();
        writeln!(file, "Chile,19116").unwrap();
        file.flush().unwrap();

        let records = FileSource::new(file.path().to_path_buf()).load().unwrap();
        assert_eq!(
            records,
            vec![
                Record::new("Aruba", "", "10", ""),
                Record::new("Chile", "", "19116", ""),
            ]
        );
    }
}

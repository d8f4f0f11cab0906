//! Schema acquisition.
//!
//! A [`SchemaSource`] hands over one fully materialized [`DatabaseSchema`] or
//! a typed failure, never partial data. Live database drivers are outside this
//! crate; their query results enter through [`SnapshotSource`], which runs the
//! per-dialect row adapters in [`postgres`] and [`mysql`].

pub mod demo;
pub mod mysql;
pub mod postgres;

pub use demo::{demo_schema, DEFAULT_DEMO_NAME};

use crate::schema::{DatabaseSchema, Dialect, SchemaBuilder};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Failure to obtain a schema from a source
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no tables found in {0}")]
    NoTables(String),
    /// Message from an external collaborator, shown verbatim
    #[error("{0}")]
    Source(String),
}

impl AcquisitionError {
    fn io(path: &Path, source: io::Error) -> Self {
        AcquisitionError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Anything that can produce a complete schema in one request
pub trait SchemaSource {
    /// Short human-readable origin, e.g. the file path
    fn describe(&self) -> String;

    fn fetch_schema(&self) -> Result<DatabaseSchema, AcquisitionError>;
}

/// Normalizes one dialect's information_schema rows into the canonical model
pub trait RowAdapter {
    fn dialect(&self) -> Dialect;

    fn into_schema(self) -> DatabaseSchema;
}

/// Compression format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

impl Compression {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("gz" | "gzip") => Compression::Gzip,
            Some("bz2" | "bzip2") => Compression::Bzip2,
            Some("xz" | "lzma") => Compression::Xz,
            Some("zst" | "zstd") => Compression::Zstd,
            _ => Compression::None,
        }
    }

    pub fn wrap_reader<'a>(&self, reader: Box<dyn Read + 'a>) -> io::Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Compression::None => reader,
            Compression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
            Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
            Compression::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
            Compression::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        })
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Gzip => write!(f, "gzip"),
            Compression::Bzip2 => write!(f, "bzip2"),
            Compression::Xz => write!(f, "xz"),
            Compression::Zstd => write!(f, "zstd"),
        }
    }
}

/// Read a whole input file as text, decompressing by extension
pub fn read_input(path: &Path) -> Result<String, AcquisitionError> {
    let compression = Compression::from_path(path);
    debug!(path = %path.display(), %compression, "reading input");

    let file = File::open(path).map_err(|e| AcquisitionError::io(path, e))?;
    let mut reader = compression
        .wrap_reader(Box::new(file))
        .map_err(|e| AcquisitionError::io(path, e))?;

    let mut contents = String::new();
    reader
        .read_to_string(&mut contents)
        .map_err(|e| AcquisitionError::io(path, e))?;
    Ok(contents)
}

/// Path with any compression extension removed, e.g. `dump.sql.gz` -> `dump.sql`
fn strip_compression(path: &Path) -> PathBuf {
    match Compression::from_path(path) {
        Compression::None => path.to_path_buf(),
        _ => path.with_extension(""),
    }
}

/// Which adapter reads an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// Decide from the file extension
    #[default]
    Auto,
    Json,
    Sql,
    Snapshot,
}

impl SourceKind {
    /// `.json` files are schema documents, anything else is read as SQL DDL.
    /// Compression extensions are looked through.
    pub fn detect(path: &Path) -> SourceKind {
        let inner = strip_compression(path);
        match inner
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("json") => SourceKind::Json,
            _ => SourceKind::Sql,
        }
    }

    fn resolve(self, path: &Path) -> SourceKind {
        match self {
            SourceKind::Auto => SourceKind::detect(path),
            other => other,
        }
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(SourceKind::Auto),
            "json" => Ok(SourceKind::Json),
            "sql" | "ddl" => Ok(SourceKind::Sql),
            "snapshot" => Ok(SourceKind::Snapshot),
            _ => Err(format!(
                "Unknown source: {}. Valid options: auto, json, sql, snapshot",
                s
            )),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Auto => write!(f, "auto"),
            SourceKind::Json => write!(f, "json"),
            SourceKind::Sql => write!(f, "sql"),
            SourceKind::Snapshot => write!(f, "snapshot"),
        }
    }
}

/// Schema document in the canonical JSON shape
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SchemaSource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_schema(&self) -> Result<DatabaseSchema, AcquisitionError> {
        let contents = read_input(&self.path)?;
        serde_json::from_str(&contents).map_err(|source| AcquisitionError::Json {
            path: self.path.clone(),
            source,
        })
    }
}

/// SQL DDL script (CREATE TABLE / ALTER TABLE), optionally compressed
#[derive(Debug, Clone)]
pub struct DdlFileSource {
    path: PathBuf,
    dialect: Option<Dialect>,
    name: Option<String>,
}

impl DdlFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dialect: None,
            name: None,
        }
    }

    pub fn with_dialect(mut self, dialect: Option<Dialect>) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Schema name: explicit, else the file stem without compression/sql extensions
    fn schema_name(&self) -> Option<String> {
        self.name.clone().or_else(|| {
            strip_compression(&self.path)
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
    }
}

impl SchemaSource for DdlFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_schema(&self) -> Result<DatabaseSchema, AcquisitionError> {
        let sql = read_input(&self.path)?;
        let mut builder = SchemaBuilder::new();
        builder.parse_script(&sql);

        if builder.table_count() == 0 {
            return Err(AcquisitionError::NoTables(self.describe()));
        }
        debug!(tables = builder.table_count(), "parsed DDL");

        Ok(builder.build(self.schema_name(), self.dialect))
    }
}

/// information_schema query results, tagged with the dialect they came from
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "dialect", rename_all = "lowercase")]
pub enum Snapshot {
    #[serde(alias = "postgres", alias = "pg")]
    Postgresql(postgres::PostgresSnapshot),
    Mysql(mysql::MysqlSnapshot),
}

impl Snapshot {
    pub fn dialect(&self) -> Dialect {
        match self {
            Snapshot::Postgresql(s) => s.dialect(),
            Snapshot::Mysql(s) => s.dialect(),
        }
    }

    pub fn into_schema(self) -> DatabaseSchema {
        match self {
            Snapshot::Postgresql(s) => s.into_schema(),
            Snapshot::Mysql(s) => s.into_schema(),
        }
    }
}

/// JSON file holding a [`Snapshot`]
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SchemaSource for SnapshotSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_schema(&self) -> Result<DatabaseSchema, AcquisitionError> {
        let contents = read_input(&self.path)?;
        let snapshot: Snapshot =
            serde_json::from_str(&contents).map_err(|source| AcquisitionError::Json {
                path: self.path.clone(),
                source,
            })?;
        debug!(dialect = %snapshot.dialect(), "normalizing introspection rows");
        Ok(snapshot.into_schema())
    }
}

/// The built-in demo schema
#[derive(Debug, Clone, Default)]
pub struct DemoSource {
    name: Option<String>,
    dialect: Option<Dialect>,
}

impl DemoSource {
    pub fn new(name: Option<String>, dialect: Option<Dialect>) -> Self {
        Self { name, dialect }
    }
}

impl SchemaSource for DemoSource {
    fn describe(&self) -> String {
        "demo schema".to_string()
    }

    fn fetch_schema(&self) -> Result<DatabaseSchema, AcquisitionError> {
        Ok(demo_schema(self.name.as_deref(), self.dialect))
    }
}

/// Pick the source for an input file
pub fn open_source(
    path: &Path,
    kind: SourceKind,
    dialect: Option<Dialect>,
    name: Option<String>,
) -> Box<dyn SchemaSource> {
    match kind.resolve(path) {
        SourceKind::Json | SourceKind::Auto => Box::new(JsonFileSource::new(path)),
        SourceKind::Sql => Box::new(
            DdlFileSource::new(path)
                .with_dialect(dialect)
                .with_name(name),
        ),
        SourceKind::Snapshot => Box::new(SnapshotSource::new(path)),
    }
}

/// `data_type(len)` when a non-zero length is reported
pub(crate) fn length_qualified_type(data_type: String, length: Option<u64>) -> String {
    match length {
        Some(len) if len > 0 => format!("{}({})", data_type, len),
        _ => data_type,
    }
}

/// Drivers report "no default" as NULL or an empty string
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_source_kind() {
        assert_eq!(SourceKind::detect(Path::new("schema.json")), SourceKind::Json);
        assert_eq!(SourceKind::detect(Path::new("schema.json.gz")), SourceKind::Json);
        assert_eq!(SourceKind::detect(Path::new("dump.sql")), SourceKind::Sql);
        assert_eq!(SourceKind::detect(Path::new("dump.sql.zst")), SourceKind::Sql);
        assert_eq!(SourceKind::detect(Path::new("dump")), SourceKind::Sql);
    }

    #[test]
    fn test_compression_from_path() {
        assert_eq!(Compression::from_path(Path::new("a.sql.gz")), Compression::Gzip);
        assert_eq!(Compression::from_path(Path::new("a.sql.bz2")), Compression::Bzip2);
        assert_eq!(Compression::from_path(Path::new("a.sql.xz")), Compression::Xz);
        assert_eq!(Compression::from_path(Path::new("a.sql.zst")), Compression::Zstd);
        assert_eq!(Compression::from_path(Path::new("a.sql")), Compression::None);
    }

    #[test]
    fn test_length_qualified_type() {
        assert_eq!(length_qualified_type("varchar".into(), Some(255)), "varchar(255)");
        assert_eq!(length_qualified_type("int".into(), None), "int");
        assert_eq!(length_qualified_type("text".into(), Some(0)), "text");
    }

    #[test]
    fn test_ddl_schema_name_from_stem() {
        let source = DdlFileSource::new("dumps/shop.sql.gz");
        assert_eq!(source.schema_name().as_deref(), Some("shop"));
        let named = DdlFileSource::new("x.sql").with_name(Some("prod".to_string()));
        assert_eq!(named.schema_name().as_deref(), Some("prod"));
    }
}

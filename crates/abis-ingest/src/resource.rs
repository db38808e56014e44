//! A tabular source bound to a schema.
//!
//! The header is read when the resource is opened. Records are streamed once
//! in file order; calling [`Resource::records`] a second time continues where
//! the first stream stopped.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use abis_model::Schema;
use csv::{ReaderBuilder, StringRecord, StringRecordsIter};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::header::{delimiter_for, format_from_path, normalize_header};

type SourceReader = Box<dyn Read + Send>;

/// One raw data record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based position, header excluded.
    pub number: usize,
    pub cells: Vec<String>,
}

pub struct Resource {
    name: String,
    format: String,
    schema: Schema,
    header: Option<Vec<String>>,
    reader: Option<csv::Reader<SourceReader>>,
    emitted: usize,
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("format", &self.format)
            .field("header", &self.header)
            .field("emitted", &self.emitted)
            .finish_non_exhaustive()
    }
}

impl Resource {
    /// Open a file; the format comes from its extension.
    pub fn from_path(path: impl AsRef<Path>, schema: Schema) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| open_error(path, source))?;
        let mut reader = BufReader::new(file);
        check_encoding(path, &mut reader)?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();
        let format = format_from_path(path);
        debug!(path = %path.display(), %format, "opening resource");
        Self::from_reader(name, format, reader, schema)
    }

    /// Wrap any reader. Formats other than `csv` and `tsv` are kept as-is and
    /// yield no header and no records.
    pub fn from_reader<R>(
        name: impl Into<String>,
        format: impl Into<String>,
        reader: R,
        schema: Schema,
    ) -> Result<Self>
    where
        R: Read + Send + 'static,
    {
        let name = name.into();
        let format = format.into().trim().to_ascii_lowercase();
        let Some(delimiter) = delimiter_for(&format) else {
            warn!(resource = %name, %format, "resource format is not tabular");
            return Ok(Self {
                name,
                format,
                schema,
                header: None,
                reader: None,
                emitted: 0,
            });
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(Box::new(reader) as SourceReader);

        let mut first = StringRecord::new();
        let has_first = reader
            .read_record(&mut first)
            .map_err(|source| IngestError::Csv {
                resource: name.clone(),
                source,
            })?;
        let header = has_first
            .then(|| first.iter().map(normalize_header).collect::<Vec<_>>())
            .filter(|header| header.iter().any(|cell| !cell.is_empty()));
        debug!(
            resource = %name,
            columns = header.as_ref().map_or(0, Vec::len),
            "read resource header"
        );

        Ok(Self {
            name,
            format,
            schema,
            header,
            reader: Some(reader),
            emitted: 0,
        })
    }

    /// In-memory resource, mainly for tests and embedding.
    pub fn from_text(
        name: impl Into<String>,
        format: impl Into<String>,
        text: impl Into<String>,
        schema: Schema,
    ) -> Result<Self> {
        Self::from_reader(name, format, std::io::Cursor::new(text.into()), schema)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Normalized header labels; `None` when the source has no header row.
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Tabular format with a header row.
    pub fn is_tabular(&self) -> bool {
        self.reader.is_some() && self.header.is_some()
    }

    /// Stream the remaining records in order.
    pub fn records(&mut self) -> Records<'_> {
        Records {
            resource: &self.name,
            inner: if self.header.is_some() {
                self.reader.as_mut().map(csv::Reader::records)
            } else {
                None
            },
            emitted: &mut self.emitted,
        }
    }
}

/// Iterator over the data records of a [`Resource`].
pub struct Records<'r> {
    resource: &'r str,
    inner: Option<StringRecordsIter<'r, SourceReader>>,
    emitted: &'r mut usize,
}

impl Iterator for Records<'_> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.inner.as_mut()?.next()?;
        Some(match record {
            Ok(record) => {
                *self.emitted += 1;
                Ok(RawRecord {
                    number: *self.emitted,
                    cells: record.iter().map(str::to_string).collect(),
                })
            }
            Err(source) => Err(IngestError::Csv {
                resource: self.resource.to_string(),
                source,
            }),
        })
    }
}

fn open_error(path: &Path, source: std::io::Error) -> IngestError {
    if source.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Reject UTF-16 byte-order marks; a UTF-8 BOM is stripped from the header.
fn check_encoding(path: &Path, reader: &mut BufReader<File>) -> Result<()> {
    use std::io::BufRead;

    let buffer = reader.fill_buf().map_err(|source| IngestError::FileRead {
        path: PathBuf::from(path),
        source,
    })?;
    let encoding = match buffer.get(0..2) {
        Some([0xFF, 0xFE]) => "UTF-16 LE",
        Some([0xFE, 0xFF]) => "UTF-16 BE",
        _ => return Ok(()),
    };
    Err(IngestError::UnsupportedEncoding {
        path: path.to_path_buf(),
        encoding,
    })
}

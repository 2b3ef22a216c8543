//! Exporter: writes the rendered charts into a single multi-page PDF.
//!
//! One chart per page, in the order given. Every page references the same
//! Helvetica font resource the drawing backend writes text with.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use serde::Serialize;

use crate::charts::{Chart, FONT_RESOURCE};
use crate::error::{ExportError, ExportResult};
use crate::logs::{log_info, log_success};

/// Document title stored in the PDF info dictionary.
pub const DOCUMENT_TITLE: &str = "Google Play Store Analysis";

/// What was written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub pages: usize,
    pub bytes: u64,
}

/// Multi-page PDF writer
#[derive(Debug, Clone)]
pub struct PdfExporter {
    title: String,
    producer: String,
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self {
            title: DOCUMENT_TITLE.to_string(),
            producer: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl PdfExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble the document in memory.
    pub fn build(&self, charts: &[Chart]) -> ExportResult<Document> {
        if charts.is_empty() {
            return Err(ExportError::NoPages);
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { FONT_RESOURCE => font_id },
        });

        let kids: Vec<Object> = charts
            .iter()
            .map(|chart| add_page(&mut doc, chart, pages_id, resources_id).into())
            .collect();

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => kids.len() as i64,
                "Kids" => kids,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let created = Local::now().format("D:%Y%m%d%H%M%S").to_string();
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(self.title.as_str()),
            "Producer" => Object::string_literal(self.producer.as_str()),
            "CreationDate" => Object::string_literal(created),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        Ok(doc)
    }

    /// Write every chart as one page of the PDF at `path`, then flush and
    /// sync the file. A partially written file is removed on failure.
    pub fn export<P: AsRef<Path>>(&self, charts: &[Chart], path: P) -> ExportResult<ExportSummary> {
        let path = path.as_ref();
        log_info(format!("Exporting {} pages to {}...", charts.len(), path.display()));

        let mut doc = self.build(charts)?;

        let file = File::create(path).map_err(|source| ExportError::NotWritable {
            path: path.to_path_buf(),
            source,
        })?;

        if let Err(err) = write_document(&mut doc, file) {
            let _ = fs::remove_file(path);
            return Err(match err {
                WriteFailure::Io(source) => ExportError::NotWritable {
                    path: path.to_path_buf(),
                    source,
                },
                WriteFailure::Serialize(message) => ExportError::Serialize {
                    path: path.to_path_buf(),
                    message,
                },
            });
        }

        let bytes = fs::metadata(path)
            .map(|m| m.len())
            .map_err(|source| ExportError::NotWritable {
                path: path.to_path_buf(),
                source,
            })?;

        log_success(format!("Wrote {} pages ({} bytes)", charts.len(), bytes));
        Ok(ExportSummary {
            path: path.to_path_buf(),
            pages: charts.len(),
            bytes,
        })
    }
}

fn add_page(doc: &mut Document, chart: &Chart, parent: ObjectId, resources: ObjectId) -> ObjectId {
    let content_id = doc.add_object(Stream::new(dictionary! {}, chart.content.clone()));
    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(i64::from(chart.width)),
            Object::Integer(i64::from(chart.height)),
        ],
        "Contents" => content_id,
        "Resources" => resources,
    })
}

enum WriteFailure {
    Io(std::io::Error),
    Serialize(String),
}

fn write_document(doc: &mut Document, file: File) -> Result<(), WriteFailure> {
    let mut writer = BufWriter::new(file);
    doc.save_to(&mut writer)
        .map_err(|e| WriteFailure::Serialize(e.to_string()))?;
    writer.flush().map_err(WriteFailure::Io)?;
    let file = writer.into_inner().map_err(|e| WriteFailure::Io(e.into_error()))?;
    file.sync_all().map_err(WriteFailure::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartKind;
    use tempfile::TempDir;

    fn chart(kind: ChartKind) -> Chart {
        let (width, height) = kind.page_size();
        Chart {
            kind,
            title: kind.title().to_string(),
            width,
            height,
            content: b"BT /F1 12.0 Tf 1 0 0 1 20.00 20.00 Tm (hello) Tj ET\n".to_vec(),
        }
    }

    #[test]
    fn test_export_writes_one_page_per_chart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");
        let charts: Vec<Chart> = ChartKind::ALL.iter().map(|&k| chart(k)).collect();

        let summary = PdfExporter::new().export(&charts, &path).unwrap();
        assert_eq!(summary.pages, 9);
        assert!(summary.bytes > 0);

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 9);
    }

    #[test]
    fn test_page_sizes_follow_charts() {
        let charts = vec![chart(ChartKind::FreeVsPaid), chart(ChartKind::CategoryCounts)];
        let doc = PdfExporter::new().build(&charts).unwrap();

        let sizes: Vec<(i64, i64)> = doc
            .get_pages()
            .values()
            .map(|&id| {
                let page = doc.get_dictionary(id).unwrap();
                let media = page.get(b"MediaBox").unwrap().as_array().unwrap();
                (media[2].as_i64().unwrap(), media[3].as_i64().unwrap())
            })
            .collect();
        assert_eq!(sizes, vec![(432, 432), (864, 432)]);
    }

    #[test]
    fn test_info_dictionary() {
        let doc = PdfExporter::new().build(&[chart(ChartKind::RatingHistogram)]).unwrap();
        let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = doc.get_dictionary(info_id).unwrap();
        assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), DOCUMENT_TITLE.as_bytes());
        assert!(info.has(b"CreationDate"));
    }

    #[test]
    fn test_no_charts_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.pdf");
        let err = PdfExporter::new().export(&[], &path).unwrap_err();
        assert!(matches!(err, ExportError::NoPages));
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.pdf");
        let err = PdfExporter::new()
            .export(&[chart(ChartKind::RatingHistogram)], &path)
            .unwrap_err();
        assert!(matches!(err, ExportError::NotWritable { .. }));
    }
}

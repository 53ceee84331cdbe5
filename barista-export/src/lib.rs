pub mod csv_report;
pub mod pdf_report;

pub use csv_report::{render_orders_csv, render_summary_csv, CsvExporter};
pub use pdf_report::{render_orders_pdf, PdfExporter};

/// Export failures; all surfaced, never swallowed
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Report I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

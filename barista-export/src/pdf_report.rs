use crate::ExportError;
use barista_order::OrderSnapshot;
use barista_shared::OrderStatus;
use chrono::Utc;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

/// Single-page tabular PDF report for order snapshots.
///
/// Emits self-contained PDF 1.4 with one Helvetica content stream; no
/// external rendering dependency needed for a daily report this small.
pub struct PdfExporter {
    export_dir: PathBuf,
}

impl PdfExporter {
    pub fn new(export_dir: impl AsRef<Path>) -> Result<Self, ExportError> {
        let export_dir = export_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&export_dir)?;
        Ok(Self { export_dir })
    }

    pub fn export_orders(&self, orders: &[OrderSnapshot]) -> Result<PathBuf, ExportError> {
        let filename = format!("orders_{}.pdf", Utc::now().format("%Y%m%d_%H%M%S"));
        let path = self.export_dir.join(filename);
        std::fs::write(&path, render_orders_pdf(orders))?;
        tracing::info!(path = %path.display(), orders = orders.len(), "pdf report written");
        Ok(path)
    }
}

/// Render the report as PDF bytes
pub fn render_orders_pdf(orders: &[OrderSnapshot]) -> Vec<u8> {
    let mut lines = Vec::new();
    lines.push(format!(
        "Cafe Orders Report - {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(String::new());
    lines.push(format!(
        "{:<10} {:<12} {:>4} {:>8} {:>8}  {:<10} {:<9}",
        "ID", "Beverage", "Qty", "Unit", "Total", "Status", "Created"
    ));

    for order in orders {
        let id_short: String = order.id.to_string().chars().take(8).collect();
        lines.push(format!(
            "{:<10} {:<12} {:>4} {:>8} {:>8}  {:<10} {:<9}",
            id_short,
            order.beverage_name,
            order.quantity,
            money(order.unit_price),
            money(order.total_price),
            order.status.to_string(),
            order.created_at.format("%H:%M:%S"),
        ));
    }

    let revenue: Decimal = orders
        .iter()
        .filter(|order| order.status == OrderStatus::Completed)
        .map(|order| order.total_price)
        .sum();
    lines.push(String::new());
    lines.push(format!(
        "Orders: {}   Completed revenue: {} EUR",
        orders.len(),
        money(revenue)
    ));

    build_document(&lines)
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Assemble the PDF object graph around one text content stream
fn build_document(lines: &[String]) -> Vec<u8> {
    let mut content = String::from("BT\n/F1 9 Tf\n11 TL\n50 790 Td\n");
    for line in lines {
        content.push('(');
        content.push_str(&escape_pdf_text(line));
        content.push_str(") Tj\nT*\n");
    }
    content.push_str("ET\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ),
    ];

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", index + 1, body).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );

    out
}

fn escape_pdf_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            ch if ch.is_ascii() => escaped.push(ch),
            // Helvetica/WinAnsi cannot carry arbitrary unicode
            _ => escaped.push('?'),
        }
    }
    escaped
}

use crate::ExportError;
use barista_order::OrderSnapshot;
use barista_shared::OrderStatus;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// CSV report writer for order snapshots
pub struct CsvExporter {
    export_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(export_dir: impl AsRef<Path>) -> Result<Self, ExportError> {
        let export_dir = export_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&export_dir)?;
        Ok(Self { export_dir })
    }

    /// Write the full order report: one row per order plus a totals row
    pub fn export_orders(&self, orders: &[OrderSnapshot]) -> Result<PathBuf, ExportError> {
        let filename = format!("orders_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
        let path = self.export_dir.join(filename);
        std::fs::write(&path, render_orders_csv(orders)?)?;
        tracing::info!(path = %path.display(), orders = orders.len(), "orders report written");
        Ok(path)
    }

    /// Write the per-beverage summary report
    pub fn export_summary(&self, orders: &[OrderSnapshot]) -> Result<PathBuf, ExportError> {
        let filename = format!("summary_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
        let path = self.export_dir.join(filename);
        std::fs::write(&path, render_summary_csv(orders)?)?;
        tracing::info!(path = %path.display(), "summary report written");
        Ok(path)
    }
}

/// Render the order report to a CSV string
pub fn render_orders_csv(orders: &[OrderSnapshot]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    let mut writer = csv::Writer::from_writer(&mut buf);
    writer.write_record([
        "ID",
        "Beverage",
        "Quantity",
        "Unit Price (EUR)",
        "Total Price (EUR)",
        "Status",
        "Created",
        "Completed",
        "Duration (s)",
    ])?;

    for order in orders {
        let (completed, duration) = match order.completed_at {
            Some(at) => (
                at.format("%Y-%m-%d %H:%M:%S").to_string(),
                format!(
                    "{:.2}",
                    (at - order.created_at).num_milliseconds() as f64 / 1000.0
                ),
            ),
            None => (String::new(), String::new()),
        };

        writer.write_record([
            order.id.to_string(),
            order.beverage_name.clone(),
            order.quantity.to_string(),
            money(order.unit_price),
            money(order.total_price),
            order.status.to_string(),
            order.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            completed,
            duration,
        ])?;
    }

    let revenue: Decimal = orders
        .iter()
        .filter(|order| order.status == OrderStatus::Completed)
        .map(|order| order.total_price)
        .sum();
    writer.write_record([
        "TOTAL".to_string(),
        String::new(),
        orders.len().to_string(),
        String::new(),
        money(revenue),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
    ])?;

    writer.flush().map_err(ExportError::Io)?;
    drop(writer);
    Ok(String::from_utf8(buf).expect("csv output is valid utf-8"))
}

/// Render per-beverage count/quantity/revenue, revenue-descending
pub fn render_summary_csv(orders: &[OrderSnapshot]) -> Result<String, ExportError> {
    #[derive(Default)]
    struct Line {
        count: u32,
        quantity: u32,
        revenue: Decimal,
    }

    let mut stats: HashMap<&str, Line> = HashMap::new();
    for order in orders {
        let line = stats.entry(order.beverage_name.as_str()).or_default();
        line.count += 1;
        line.quantity += order.quantity;
        if order.status == OrderStatus::Completed {
            line.revenue += order.total_price;
        }
    }

    let mut lines: Vec<(&str, Line)> = stats.into_iter().collect();
    lines.sort_by(|a, b| b.1.revenue.cmp(&a.1.revenue).then(a.0.cmp(b.0)));

    let mut buf = Vec::new();
    let mut writer = csv::Writer::from_writer(&mut buf);
    writer.write_record(["Beverage", "Orders", "Total Quantity", "Revenue (EUR)"])?;
    for (beverage, line) in lines {
        writer.write_record([
            beverage.to_string(),
            line.count.to_string(),
            line.quantity.to_string(),
            money(line.revenue),
        ])?;
    }

    writer.flush().map_err(ExportError::Io)?;
    drop(writer);
    Ok(String::from_utf8(buf).expect("csv output is valid utf-8"))
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn snapshot(name: &str, quantity: u32, total: Decimal, status: OrderStatus) -> OrderSnapshot {
        let created = Utc::now() - Duration::minutes(5);
        OrderSnapshot {
            id: Uuid::new_v4(),
            beverage_name: name.to_string(),
            quantity,
            unit_price: total / Decimal::from(quantity),
            total_price: total,
            status,
            created_at: created,
            completed_at: matches!(status, OrderStatus::Completed)
                .then(|| created + Duration::seconds(42)),
        }
    }

    #[test]
    fn test_orders_csv_rows_and_totals() {
        let orders = vec![
            snapshot("Coffee", 2, dec!(5.00), OrderStatus::Completed),
            snapshot("Tea", 1, dec!(2.00), OrderStatus::Cancelled),
            snapshot("Beer", 3, dec!(10.50), OrderStatus::Completed),
        ];

        let report = render_orders_csv(&orders).unwrap();
        let lines: Vec<&str> = report.lines().collect();

        // Header + one row per order + totals row
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("ID,Beverage,Quantity"));
        assert!(lines[1].contains("Coffee,2,2.50,5.00,COMPLETED"));
        assert!(lines[2].contains("Tea,1,2.00,2.00,CANCELLED"));
        // Cancelled revenue excluded: 5.00 + 10.50
        assert!(lines[4].starts_with("TOTAL,,3,,15.50"));
    }

    #[test]
    fn test_completed_orders_carry_duration() {
        let orders = vec![snapshot("Latte", 1, dec!(3.50), OrderStatus::Completed)];
        let report = render_orders_csv(&orders).unwrap();
        assert!(report.contains("42.00"));
    }

    #[test]
    fn test_summary_sorted_by_revenue() {
        let orders = vec![
            snapshot("Tea", 1, dec!(2.00), OrderStatus::Completed),
            snapshot("Beer", 3, dec!(10.50), OrderStatus::Completed),
            snapshot("Beer", 2, dec!(7.00), OrderStatus::Completed),
            snapshot("Coffee", 1, dec!(2.50), OrderStatus::Processing),
        ];

        let report = render_summary_csv(&orders).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "Beverage,Orders,Total Quantity,Revenue (EUR)");
        assert_eq!(lines[1], "Beer,2,5,17.50");
        assert_eq!(lines[2], "Tea,1,1,2.00");
        // In-flight order counted but contributes no revenue
        assert_eq!(lines[3], "Coffee,1,1,0.00");
    }

    #[test]
    fn test_export_writes_file() {
        let dir = std::env::temp_dir().join(format!("barista-export-{}", Uuid::new_v4()));
        let exporter = CsvExporter::new(&dir).unwrap();
        let path = exporter
            .export_orders(&[snapshot("Juice", 2, dec!(5.60), OrderStatus::Completed)])
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Juice"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}

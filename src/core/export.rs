//! CSV export - Writes an [`ExportTable`] as a spreadsheet-friendly file.
//!
//! Output is UTF-8 with a leading byte order mark so spreadsheet tools pick
//! the right encoding for the Chinese labels. Every field is quoted.

use crate::{
    core::report::ExportTable,
    errors::{Error, Result},
};
use csv::{QuoteStyle, WriterBuilder};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes `table` to `writer`: BOM, header line, then one line per row.
///
/// # Errors
/// * `NothingToExport` - the table has no rows; nothing is written
pub fn write_csv<W: Write>(table: &ExportTable, mut writer: W) -> Result<()> {
    if table.is_empty() {
        return Err(Error::NothingToExport);
    }
    writer.write_all(BOM)?;

    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);
    csv.write_record(&table.header)?;
    for row in &table.rows {
        csv.write_record(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes `table` to `dir/file_name`, creating `dir` if needed.
#[instrument(skip(table), fields(rows = table.rows.len()))]
pub fn write_csv_file(table: &ExportTable, dir: &Path, file_name: &str) -> Result<PathBuf> {
    if table.is_empty() {
        return Err(Error::NothingToExport);
    }
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    let file = fs::File::create(&path)?;
    write_csv(table, file)?;
    info!("Exported {} orders to {}", table.rows.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::report::{EXPORT_HEADER, to_export_rows};
    use crate::test_utils::*;

    #[test]
    fn test_write_csv_starts_with_bom_and_quotes_fields() -> Result<()> {
        let order = order_fixture(1, "Alice", 80, day(2024, 5, 1));
        let table = to_export_rows([&order]);

        let mut out = Vec::new();
        write_csv(&table, &mut out)?;

        assert!(out.starts_with(BOM));
        let text = String::from_utf8(out[BOM.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        let quoted_header: Vec<String> =
            EXPORT_HEADER.iter().map(|h| format!("\"{h}\"")).collect();
        assert_eq!(lines.next().unwrap(), quoted_header.join(","));
        assert!(quoted_header[0].contains("訂單日期"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("\"2024-05-01\",\"餐食\",\"Alice\""));
        assert!(row.ends_with("\"80\",\"未付款\",\"準備中\""));
        assert!(lines.next().is_none());
        Ok(())
    }

    #[test]
    fn test_embedded_quotes_and_commas_are_escaped() -> Result<()> {
        let mut order = order_fixture(1, "Alice", 80, day(2024, 5, 1));
        order.combined_note = "say \"hi\", thanks".to_string();
        let table = to_export_rows([&order]);

        let mut out = Vec::new();
        write_csv(&table, &mut out)?;
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"say \"\"hi\"\", thanks\""));
        Ok(())
    }

    #[test]
    fn test_empty_table_is_refused() {
        let table = to_export_rows(Vec::<&crate::entities::OrderModel>::new());
        let mut out = Vec::new();
        assert!(matches!(write_csv(&table, &mut out), Err(Error::NothingToExport)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_csv_file() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("order-board-export-{}", std::process::id()));
        let order = order_fixture(1, "Alice", 80, day(2024, 5, 1));
        let table = to_export_rows([&order]);

        let path = write_csv_file(&table, &dir, "orders_export_all_2024-05-01.csv")?;
        let bytes = fs::read(&path)?;
        assert!(bytes.starts_with(BOM));
        fs::remove_dir_all(&dir)?;
        Ok(())
    }
}

//! Excel workbook export
//!
//! Writes an aggregation as one worksheet holding an Excel table. Column
//! styles, font size, row height and table style come from `export_config`
//! and are gathered into an [`XlsxLayout`] before anything is written.

use std::io::Write;

use rust_xlsxwriter::{Format, FormatAlign, Table, TableColumn, TableStyle, Workbook};

use crate::config::{ColumnData, ColumnStyle, ExportColumn, ExportConfig};
use crate::error::{BillAggError, BillAggResult};

use super::ExportTable;

pub const DEFAULT_FONT_SIZE: f64 = 11.0;
pub const DEFAULT_TABLE_STYLE: &str = "Table Style Light 2";

const SHEET_NAME_MAX_LEN: usize = 31;

const LIGHT_STYLES: [TableStyle; 21] = [
    TableStyle::Light1,
    TableStyle::Light2,
    TableStyle::Light3,
    TableStyle::Light4,
    TableStyle::Light5,
    TableStyle::Light6,
    TableStyle::Light7,
    TableStyle::Light8,
    TableStyle::Light9,
    TableStyle::Light10,
    TableStyle::Light11,
    TableStyle::Light12,
    TableStyle::Light13,
    TableStyle::Light14,
    TableStyle::Light15,
    TableStyle::Light16,
    TableStyle::Light17,
    TableStyle::Light18,
    TableStyle::Light19,
    TableStyle::Light20,
    TableStyle::Light21,
];

const MEDIUM_STYLES: [TableStyle; 28] = [
    TableStyle::Medium1,
    TableStyle::Medium2,
    TableStyle::Medium3,
    TableStyle::Medium4,
    TableStyle::Medium5,
    TableStyle::Medium6,
    TableStyle::Medium7,
    TableStyle::Medium8,
    TableStyle::Medium9,
    TableStyle::Medium10,
    TableStyle::Medium11,
    TableStyle::Medium12,
    TableStyle::Medium13,
    TableStyle::Medium14,
    TableStyle::Medium15,
    TableStyle::Medium16,
    TableStyle::Medium17,
    TableStyle::Medium18,
    TableStyle::Medium19,
    TableStyle::Medium20,
    TableStyle::Medium21,
    TableStyle::Medium22,
    TableStyle::Medium23,
    TableStyle::Medium24,
    TableStyle::Medium25,
    TableStyle::Medium26,
    TableStyle::Medium27,
    TableStyle::Medium28,
];

const DARK_STYLES: [TableStyle; 11] = [
    TableStyle::Dark1,
    TableStyle::Dark2,
    TableStyle::Dark3,
    TableStyle::Dark4,
    TableStyle::Dark5,
    TableStyle::Dark6,
    TableStyle::Dark7,
    TableStyle::Dark8,
    TableStyle::Dark9,
    TableStyle::Dark10,
    TableStyle::Dark11,
];

/// Parse an Excel table style name such as "Table Style Medium 9"
///
/// The "Table Style" prefix and the spaces are optional; "None" disables
/// table styling.
pub fn parse_table_style(name: &str) -> Option<TableStyle> {
    let compact: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    let compact = compact.strip_prefix("tablestyle").unwrap_or(&compact);
    if compact == "none" {
        return Some(TableStyle::None);
    }

    let digits = compact.find(|c: char| c.is_ascii_digit())?;
    let (kind, number) = compact.split_at(digits);
    let index = number.parse::<usize>().ok()?.checked_sub(1)?;
    let styles: &[TableStyle] = match kind {
        "light" => &LIGHT_STYLES,
        "medium" => &MEDIUM_STYLES,
        "dark" => &DARK_STYLES,
        _ => return None,
    };
    styles.get(index).copied()
}

fn parse_align(align: &str) -> Option<FormatAlign> {
    let align = match align.to_lowercase().replace(['_', ' '], "").as_str() {
        "general" => FormatAlign::General,
        "left" => FormatAlign::Left,
        "center" | "centre" => FormatAlign::Center,
        "right" => FormatAlign::Right,
        "fill" => FormatAlign::Fill,
        "justify" => FormatAlign::Justify,
        "centeracross" => FormatAlign::CenterAcross,
        "distributed" => FormatAlign::Distributed,
        "top" => FormatAlign::Top,
        "bottom" => FormatAlign::Bottom,
        "vcenter" | "verticalcenter" => FormatAlign::VerticalCenter,
        "vjustify" | "verticaljustify" => FormatAlign::VerticalJustify,
        "vdistributed" | "verticaldistributed" => FormatAlign::VerticalDistributed,
        _ => return None,
    };
    Some(align)
}

/// Check the spreadsheet settings of an export config
pub fn validate_layout(config: &ExportConfig) -> BillAggResult<()> {
    XlsxLayout::from_config(config).map(|_| ())
}

/// Presentation of one exported column
#[derive(Debug, Clone)]
struct ColumnLayout {
    width: Option<f64>,
    format: Format,
    numeric: bool,
}

/// Workbook presentation settings
#[derive(Clone)]
pub struct XlsxLayout {
    pub font_size: f64,
    pub row_height: Option<f64>,
    pub table_style: TableStyle,
    columns: Vec<ColumnLayout>,
}

impl XlsxLayout {
    /// Gather the layout from an export config
    pub fn from_config(config: &ExportConfig) -> BillAggResult<Self> {
        let font_size = config.font_size.unwrap_or(DEFAULT_FONT_SIZE);
        let style_name = config
            .table_style
            .as_deref()
            .unwrap_or(DEFAULT_TABLE_STYLE);
        let table_style = parse_table_style(style_name).ok_or_else(|| {
            BillAggError::Config(format!("invalid table_style: {}", style_name))
        })?;

        let columns = config
            .effective_columns()
            .iter()
            .map(|column| column_layout(column, font_size))
            .collect::<BillAggResult<Vec<_>>>()?;

        Ok(Self {
            font_size,
            row_height: config.row_height,
            table_style,
            columns,
        })
    }

    fn base_format(&self) -> Format {
        Format::new().set_font_size(self.font_size)
    }
}

fn column_layout(column: &ExportColumn, font_size: f64) -> BillAggResult<ColumnLayout> {
    let numeric = matches!(&column.data, ColumnData::ExtractedField { field } if field == "amount");
    let mut format = Format::new().set_font_size(font_size);
    let style = column.style.clone().unwrap_or_default();
    let ColumnStyle {
        width,
        align,
        number_format,
    } = style;

    if let Some(align) = align {
        let parsed = parse_align(&align).ok_or_else(|| {
            BillAggError::Config(format!(
                "export column \"{}\" has invalid align: {}",
                column.header, align
            ))
        })?;
        format = format.set_align(parsed);
    }
    if let Some(number_format) = number_format {
        format = format.set_num_format(number_format);
    }

    Ok(ColumnLayout {
        width,
        format,
        numeric,
    })
}

/// Worksheet names are limited to 31 characters and a few symbols are
/// reserved
fn sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(SHEET_NAME_MAX_LEN)
        .collect();
    let cleaned = cleaned.trim_matches('\'');
    if cleaned.is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Write an export table as an xlsx workbook
pub fn write_xlsx<W: Write>(
    table: &ExportTable,
    layout: &XlsxLayout,
    writer: &mut W,
) -> BillAggResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(&table.name))?;

    let base = layout.base_format();

    for (col, column) in layout.columns.iter().enumerate() {
        if let Some(width) = column.width {
            worksheet.set_column_width(col as u16, width)?;
        }
    }

    for (idx, row) in table.rows.iter().enumerate() {
        let row_num = idx as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            let column = layout.columns.get(col);
            let format = column.map(|c| &c.format).unwrap_or(&base);
            let number = column
                .filter(|c| c.numeric)
                .and_then(|_| value.parse::<f64>().ok());
            match number {
                Some(number) => {
                    worksheet.write_number_with_format(row_num, col as u16, number, format)?
                }
                None => worksheet.write_string_with_format(row_num, col as u16, value, format)?,
            };
        }
    }

    if let Some(height) = layout.row_height {
        for row_num in 0..=table.rows.len() as u32 {
            worksheet.set_row_height(row_num, height)?;
        }
    }

    if !table.headers.is_empty() {
        if table.rows.is_empty() {
            // An Excel table needs at least one data row
            for (col, header) in table.headers.iter().enumerate() {
                worksheet.write_string_with_format(0, col as u16, header, &base)?;
            }
        } else {
            let columns: Vec<TableColumn> = table
                .headers
                .iter()
                .map(|h| {
                    TableColumn::new()
                        .set_header(h.as_str())
                        .set_header_format(&base)
                })
                .collect();
            let excel_table = Table::new()
                .set_columns(&columns)
                .set_style(layout.table_style);
            worksheet.add_table(
                0,
                0,
                table.rows.len() as u32,
                table.headers.len() as u16 - 1,
                &excel_table,
            )?;
        }
    }

    let buffer = workbook.save_to_buffer()?;
    writer
        .write_all(&buffer)
        .map_err(|e| BillAggError::Export(e.to_string()))
}

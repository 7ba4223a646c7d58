use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::error::LoadError;
use super::model::{SalesRecord, SalesTable};

/// File read when no path is given.
pub const DEFAULT_SOURCE: &str = "sales.csv";

/// Day/month/year, e.g. `08/11/2016`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Source columns the loader projects. Anything else in the source is ignored.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "Customer ID",
    "Order Date",
    "Ship Date",
    "Ship Mode",
    "Segment",
    "State",
    "Category",
    "Sub-Category",
    "Sales",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "Customer ID": "...", "Order Date": "08/11/2016", ... }, ...]`
/// * `.parquet` – same column names; dates as `DD/MM/YYYY` strings or `Date32`
pub fn load_file(path: &Path) -> Result<SalesTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let undated = table
        .records()
        .iter()
        .filter(|r| r.order_date.is_none())
        .count();
    log::info!(
        "Loaded {} sales records from {} ({} without a valid order date)",
        table.len(),
        path.display(),
        undated
    );
    Ok(table)
}

/// Parse a `DD/MM/YYYY` date. Anything else, including impossible calendar
/// dates such as `31/02/2020`, yields `None`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(s, DATE_FORMAT) {
        Ok(d) => Some(d),
        Err(_) => {
            if !s.is_empty() {
                log::debug!("Coercing unparseable date '{s}' to null");
            }
            None
        }
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn missing_columns(present: impl Fn(&str) -> bool) -> Vec<String> {
    REQUIRED_COLUMNS
        .into_iter()
        .filter(|&c| !present(c))
        .map(|c| c.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Row shape shared by the CSV and JSON loaders
// ---------------------------------------------------------------------------

/// Every cell is optional: a JSON `null` or an empty CSV field loads as an
/// empty string, a null date or a null sale rather than failing the load.
#[derive(Debug, Clone, Deserialize)]
struct RawSalesRow {
    #[serde(rename = "Customer ID")]
    customer_id: Option<String>,
    #[serde(rename = "Order Date")]
    order_date: Option<String>,
    #[serde(rename = "Ship Date")]
    ship_date: Option<String>,
    #[serde(rename = "Ship Mode")]
    ship_mode: Option<String>,
    #[serde(rename = "Segment")]
    segment: Option<String>,
    #[serde(rename = "State")]
    state: Option<String>,
    #[serde(rename = "Category")]
    category: Option<String>,
    #[serde(rename = "Sub-Category")]
    sub_category: Option<String>,
    #[serde(rename = "Sales")]
    sales: Option<f64>,
}

impl RawSalesRow {
    fn into_record(self) -> SalesRecord {
        let mut record = SalesRecord {
            customer_id: self.customer_id.unwrap_or_default(),
            ship_date: self.ship_date.as_deref().and_then(parse_date),
            ship_mode: self.ship_mode.unwrap_or_default(),
            segment: self.segment.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            sub_category: self.sub_category.unwrap_or_default(),
            sales: finite(self.sales),
            ..Default::default()
        };
        record.set_order_date(self.order_date.as_deref().and_then(parse_date));
        record
    }
}

/// `NaN` and infinities count as missing sales.
fn finite(sales: Option<f64>) -> Option<f64> {
    sales.filter(|s| s.is_finite())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one sales record per line.
/// An empty `Sales` cell loads as null; a non-numeric one is an error.
fn load_csv(path: &Path) -> Result<SalesTable, LoadError> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers = reader.headers()?.clone();

    let missing = missing_columns(|c| headers.iter().any(|h| h == c));
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let records = reader
        .deserialize::<RawSalesRow>()
        .map(|row| row.map(RawSalesRow::into_record))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SalesTable::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Customer ID": "CG-12520", "Order Date": "08/11/2016", "Sales": 261.96, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<SalesTable, LoadError> {
    let rows: Vec<Map<String, JsonValue>> =
        serde_json::from_reader(std::io::BufReader::new(open(path)?))?;

    let missing = missing_columns(|c| rows.iter().all(|row| row.contains_key(c)));
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let records = rows
        .into_iter()
        .map(|row| serde_json::from_value::<RawSalesRow>(JsonValue::Object(row)))
        .map(|row| row.map(RawSalesRow::into_record))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SalesTable::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the [`REQUIRED_COLUMNS`].
///
/// Text columns may be any type Arrow can cast to Utf8. Date columns may be
/// `DD/MM/YYYY` strings or `Date32`. `Sales` must be numeric.
fn load_parquet(path: &Path) -> Result<SalesTable, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;

    let schema = builder.schema().clone();
    let missing = missing_columns(|c| schema.index_of(c).is_ok());
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }
    let sales_type = schema.field_with_name("Sales")?.data_type().clone();
    if !sales_type.is_numeric() {
        return Err(LoadError::ColumnType {
            column: "Sales".to_string(),
            found: sales_type.to_string(),
        });
    }

    let reader = builder.build()?;
    let mut records = Vec::new();

    for batch in reader {
        let batch = batch?;

        let customer_id = text_column(&batch, "Customer ID")?;
        let order_date = date_column(&batch, "Order Date")?;
        let ship_date = date_column(&batch, "Ship Date")?;
        let ship_mode = text_column(&batch, "Ship Mode")?;
        let segment = text_column(&batch, "Segment")?;
        let state = text_column(&batch, "State")?;
        let category = text_column(&batch, "Category")?;
        let sub_category = text_column(&batch, "Sub-Category")?;
        let sales = sales_column(&batch)?;

        for row in 0..batch.num_rows() {
            let mut record = SalesRecord {
                customer_id: customer_id[row].clone(),
                ship_date: ship_date[row],
                ship_mode: ship_mode[row].clone(),
                segment: segment[row].clone(),
                state: state[row].clone(),
                category: category[row].clone(),
                sub_category: sub_category[row].clone(),
                sales: sales[row],
                ..Default::default()
            };
            record.set_order_date(order_date[row]);
            records.push(record);
        }
    }

    Ok(SalesTable::from_records(records))
}

// -- Parquet / Arrow helpers --

fn column(batch: &RecordBatch, name: &str) -> Result<ArrayRef, LoadError> {
    batch
        .column_by_name(name)
        .cloned()
        .ok_or_else(|| LoadError::MissingColumns(vec![name.to_string()]))
}

/// Text cells; nulls become empty strings.
fn text_column(batch: &RecordBatch, name: &str) -> Result<Vec<String>, LoadError> {
    let utf8 = cast(&column(batch, name)?, &DataType::Utf8)?;
    Ok(utf8
        .as_string::<i32>()
        .iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect())
}

fn date_column(batch: &RecordBatch, name: &str) -> Result<Vec<Option<NaiveDate>>, LoadError> {
    let col = column(batch, name)?;
    if col.data_type() == &DataType::Date32 {
        let dates = col.as_primitive::<Date32Type>();
        return Ok((0..dates.len())
            .map(|i| {
                if dates.is_null(i) {
                    None
                } else {
                    dates.value_as_date(i)
                }
            })
            .collect());
    }

    let utf8 = cast(&col, &DataType::Utf8)?;
    Ok(utf8
        .as_string::<i32>()
        .iter()
        .map(|v| v.and_then(parse_date))
        .collect())
}

fn sales_column(batch: &RecordBatch) -> Result<Vec<Option<f64>>, LoadError> {
    let values = cast(&column(batch, "Sales")?, &DataType::Float64)?;
    Ok(values
        .as_primitive::<Float64Type>()
        .iter()
        .map(finite)
        .collect())
}

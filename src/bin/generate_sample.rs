use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use chrono::{Days, NaiveDate};
use parquet::arrow::ArrowWriter;
use sales_dashboard::data::loader::{DATE_FORMAT, DEFAULT_SOURCE};
use serde::Serialize;

const STATES: [&str; 8] = [
    "California",
    "New York",
    "Texas",
    "Washington",
    "Pennsylvania",
    "Florida",
    "Illinois",
    "Ohio",
];
const SEGMENTS: [&str; 3] = ["Consumer", "Corporate", "Home Office"];
const SHIP_MODES: [(&str, u64); 4] = [
    ("Standard Class", 5),
    ("Second Class", 3),
    ("First Class", 2),
    ("Same Day", 0),
];
const PRODUCTS: [(&str, &str, f64); 12] = [
    ("Furniture", "Bookcases", 420.0),
    ("Furniture", "Chairs", 380.0),
    ("Furniture", "Furnishings", 95.0),
    ("Furniture", "Tables", 610.0),
    ("Office Supplies", "Binders", 130.0),
    ("Office Supplies", "Paper", 55.0),
    ("Office Supplies", "Storage", 260.0),
    ("Office Supplies", "Labels", 30.0),
    ("Technology", "Phones", 370.0),
    ("Technology", "Accessories", 210.0),
    ("Technology", "Machines", 1150.0),
    ("Technology", "Copiers", 2200.0),
];

/// One output row, in the column layout of a typical retail export.
#[derive(Debug, Serialize)]
struct SampleRow {
    #[serde(rename = "Row ID")]
    row_id: i64,
    #[serde(rename = "Order ID")]
    order_id: String,
    #[serde(rename = "Order Date")]
    order_date: String,
    #[serde(rename = "Ship Date")]
    ship_date: String,
    #[serde(rename = "Ship Mode")]
    ship_mode: String,
    #[serde(rename = "Customer ID")]
    customer_id: String,
    #[serde(rename = "Segment")]
    segment: String,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Sub-Category")]
    sub_category: String,
    #[serde(rename = "Sales")]
    sales: f64,
}

/// SplitMix64: small, deterministic, good enough for fixture data.
struct SplitMix64(u64);

impl SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len() as u64) as usize]
    }
}

fn generate(n_rows: usize, rng: &mut SplitMix64) -> Result<Vec<SampleRow>> {
    let start = NaiveDate::from_ymd_opt(2015, 1, 1).context("start date")?;
    let mut rows = Vec::with_capacity(n_rows);

    for i in 0..n_rows {
        // four years of orders
        let order = start
            .checked_add_days(Days::new(rng.below(4 * 365)))
            .context("order date out of range")?;
        let &(ship_mode, lead_days) = rng.pick(&SHIP_MODES);
        let ship = order
            .checked_add_days(Days::new(lead_days + rng.below(2)))
            .context("ship date out of range")?;
        let &(category, sub_category, base_price) = rng.pick(&PRODUCTS);
        let quantity = 1 + rng.below(5) as i64;
        let sales = (base_price * quantity as f64 * (0.5 + rng.next_f64()) * 100.0).round() / 100.0;

        rows.push(SampleRow {
            row_id: i as i64 + 1,
            order_id: format!("US-{}-{:06}", order.format("%Y"), 100_000 + i),
            order_date: order.format(DATE_FORMAT).to_string(),
            ship_date: ship.format(DATE_FORMAT).to_string(),
            ship_mode: ship_mode.to_string(),
            customer_id: format!("CU-{:05}", rng.below(800)),
            segment: rng.pick(&SEGMENTS).to_string(),
            country: "United States".to_string(),
            state: rng.pick(&STATES).to_string(),
            category: category.to_string(),
            sub_category: sub_category.to_string(),
            sales,
        });
    }
    Ok(rows)
}

fn write_csv(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let text = |f: fn(&SampleRow) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Row ID", DataType::Int64, false),
        Field::new("Order ID", DataType::Utf8, false),
        Field::new("Order Date", DataType::Utf8, false),
        Field::new("Ship Date", DataType::Utf8, false),
        Field::new("Ship Mode", DataType::Utf8, false),
        Field::new("Customer ID", DataType::Utf8, false),
        Field::new("Segment", DataType::Utf8, false),
        Field::new("Country", DataType::Utf8, false),
        Field::new("State", DataType::Utf8, false),
        Field::new("Category", DataType::Utf8, false),
        Field::new("Sub-Category", DataType::Utf8, false),
        Field::new("Sales", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(rows.iter().map(|r| r.row_id).collect::<Vec<_>>())) as ArrayRef,
            text(|r| r.order_id.as_str()),
            text(|r| r.order_date.as_str()),
            text(|r| r.ship_date.as_str()),
            text(|r| r.ship_mode.as_str()),
            text(|r| r.customer_id.as_str()),
            text(|r| r.segment.as_str()),
            text(|r| r.country.as_str()),
            text(|r| r.state.as_str()),
            text(|r| r.category.as_str()),
            text(|r| r.sub_category.as_str()),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.sales).collect::<Vec<_>>())) as ArrayRef,
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;

    let preview = batch.slice(0, batch.num_rows().min(5));
    log::debug!("First rows:\n{}", pretty_format_batches(&[preview])?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_SOURCE.to_string()));
    let n_rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
        None => 2000,
    };

    let mut rng = SplitMix64(42);
    let rows = generate(n_rows, &mut rng)?;

    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_csv(&output, &rows)?,
        "parquet" | "pq" => write_parquet(&output, &rows)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    log::info!("Wrote {} sales rows to {}", rows.len(), output.display());
    println!("Wrote {} sales rows to {}", rows.len(), output.display());
    Ok(())
}

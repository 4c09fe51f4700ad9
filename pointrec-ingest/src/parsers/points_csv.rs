//! Point-history CSV export parser
//!
//! Expected header row (as exported by the loyalty back-office):
//!   처리일,고객ID,고객명,타입,포인트,토탈포인트,주문번호,주문상태,관리자메모,사용자메모,업체명
//!
//! Columns are located by header name, so reordered or partial exports still
//! parse; missing columns yield empty fields.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use pointrec_core::record::{TransactionRecord, TxKind};
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y/%m/%d";

struct Columns {
    processed_at: Option<usize>,
    customer_id: Option<usize>,
    customer_name: Option<usize>,
    kind: Option<usize>,
    point_delta: Option<usize>,
    reported_total: Option<usize>,
    order_number: Option<usize>,
    status: Option<usize>,
    admin_memo: Option<usize>,
    user_memo: Option<usize>,
    merchant: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Self {
        let col = |name: &str| headers.iter().position(|h| h.trim() == name);
        Self {
            processed_at: col("처리일"),
            customer_id: col("고객ID"),
            customer_name: col("고객명"),
            kind: col("타입"),
            point_delta: col("포인트"),
            reported_total: col("토탈포인트"),
            order_number: col("주문번호"),
            status: col("주문상태"),
            admin_memo: col("관리자메모"),
            user_memo: col("사용자메모"),
            merchant: col("업체명"),
        }
    }
}

/// Parse a point-history CSV file, returning one record per data row.
///
/// Field-level problems never fail the parse: numeric junk coerces to 0 and
/// unparseable timestamps become the empty string, which sorts first
/// downstream. Rows without a customer id (blank trailing lines) are skipped.
pub fn parse_points_csv(path: impl AsRef<Path>) -> Result<Vec<TransactionRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;

    let columns = Columns::resolve(&rdr.headers()?.clone());

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let trimmed = |idx: Option<usize>| field(&row, idx).trim().to_string();

        let customer_id = trimmed(columns.customer_id);
        if customer_id.is_empty() {
            continue;
        }

        records.push(TransactionRecord {
            customer_id,
            customer_name: trimmed(columns.customer_name),
            processed_at: normalize_timestamp(field(&row, columns.processed_at)),
            kind: TxKind::from_label(field(&row, columns.kind)),
            point_delta: parse_point(field(&row, columns.point_delta)),
            reported_total: parse_point(field(&row, columns.reported_total)),
            order_number: trimmed(columns.order_number),
            status: trimmed(columns.status),
            // Memos stay untrimmed: the aggregation layer owns their
            // normalization and distinguishes empty from whitespace-only.
            admin_memo: field(&row, columns.admin_memo).to_string(),
            user_memo: field(&row, columns.user_memo).to_string(),
            merchant: trimmed(columns.merchant),
        });
    }

    Ok(records)
}

fn field<'a>(row: &'a StringRecord, idx: Option<usize>) -> &'a str {
    idx.and_then(|i| row.get(i)).unwrap_or("")
}

/// Integer coercion with a float fallback for decimal exports; anything else
/// is 0.
fn parse_point(raw: &str) -> i64 {
    let cleaned = raw.trim().replace(',', "");
    if let Ok(n) = cleaned.parse::<i64>() {
        return n;
    }
    cleaned.parse::<f64>().map(|f| f.round() as i64).unwrap_or(0)
}

/// Keep timestamps the engine can sort lexically; blank out everything else.
fn normalize_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).is_ok()
        || NaiveDate::parse_from_str(raw, DATE_FORMAT).is_ok()
    {
        raw.to_string()
    } else {
        String::new()
    }
}

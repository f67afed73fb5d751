//! Load → clean → feature-engineer pipeline for the campus dataset.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::config::{DataConfig, ZeroDenominatorPolicy};
use crate::error::{EngineError, Result};

use super::dataset::Dataset;
use super::record::{RawRecord, Record};
use super::zone::{TimeSlot, Zone};

/// Meal type recorded when the source cell is empty.
const UNSPECIFIED_MEAL: &str = "Unspecified";

/// Accepted `Date` layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// A row after cleaning: every numeric cell present, categories still raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub date: Option<String>,
    pub zone: String,
    pub time_slot: String,
    pub meal_type: String,
    pub footfall: f64,
    pub prepared_qty: f64,
    pub orders: f64,
    pub passengers: f64,
    pub bus_capacity: f64,
    pub avg_delay_min: f64,
    pub response_time_hr: f64,
    pub satisfaction: f64,
    pub security_incidents: f64,
}

/// Runs the three pipeline stages over a CSV source.
///
/// Each stage is total over the record set: it either transforms every row or
/// fails the whole run.
#[derive(Debug, Clone)]
pub struct DataPipeline {
    source: PathBuf,
    policy: ZeroDenominatorPolicy,
}

impl DataPipeline {
    pub fn new(source: impl Into<PathBuf>, policy: ZeroDenominatorPolicy) -> Self {
        Self {
            source: source.into(),
            policy,
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(&config.path, config.zero_denominator)
    }

    /// Path the pipeline reads from (also used to label errors).
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Opens the source file and runs the full pipeline.
    ///
    /// # Errors
    ///
    /// `DataUnavailable` if the file cannot be opened, plus every error of
    /// [`DataPipeline::run_from_reader`].
    pub fn run(&self) -> Result<Dataset> {
        let file = File::open(&self.source)
            .map_err(|e| EngineError::data_unavailable(&self.source, e.to_string()))?;
        self.run_from_reader(io::BufReader::new(file))
    }

    /// Runs load, clean, and feature engineering over any CSV reader.
    ///
    /// # Errors
    ///
    /// `DataUnavailable`, `UnknownZone`, `UnknownTimeSlot`, `InvalidDate`,
    /// or `DivisionPolicy` depending on the failing stage.
    pub fn run_from_reader<R: Read>(&self, reader: R) -> Result<Dataset> {
        let raw = self.load(reader)?;
        let cleaned = self.clean(raw)?;
        let records = self.engineer(cleaned)?;
        info!(
            source = %self.source.display(),
            records = records.len(),
            "dataset processed"
        );
        Dataset::new(records).map_err(|e| match e {
            EngineError::DataUnavailable { reason, .. } => {
                EngineError::data_unavailable(&self.source, reason)
            }
            other => other,
        })
    }

    /// Parses every CSV row into a [`RawRecord`].
    pub fn load<R: Read>(&self, reader: R) -> Result<Vec<RawRecord>> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut raw = Vec::new();
        for (i, row) in rdr.deserialize::<RawRecord>().enumerate() {
            let record = row.map_err(|e| {
                EngineError::data_unavailable(&self.source, format!("data row {}: {e}", i + 1))
            })?;
            raw.push(record);
        }

        if raw.is_empty() {
            return Err(EngineError::data_unavailable(
                &self.source,
                "contains no records",
            ));
        }
        debug!(rows = raw.len(), "raw rows loaded");
        Ok(raw)
    }

    /// Coerces incident counts, fills missing numerics with column medians,
    /// and clips negative delays.
    ///
    /// Non-finite cells (`NaN`, `inf`) count as missing. Medians are computed
    /// over the remaining values of each column.
    pub fn clean(&self, raw: Vec<RawRecord>) -> Result<Vec<CleanRecord>> {
        let column = |name: &str, get: fn(&RawRecord) -> Option<f64>| -> Result<f64> {
            let mut values: Vec<f64> = raw.iter().filter_map(|r| finite(get(r))).collect();
            let missing = raw.len() - values.len();
            let fill = median(&mut values).ok_or_else(|| {
                EngineError::data_unavailable(&self.source, format!("column {name} has no values"))
            })?;
            if missing > 0 {
                warn!(column = name, missing, fill, "filled missing values with median");
            }
            Ok(fill)
        };

        let footfall = column("Footfall", |r| r.footfall)?;
        let prepared = column("Prepared_Qty", |r| r.prepared_qty)?;
        let orders = column("Orders", |r| r.orders)?;
        let passengers = column("Passengers", |r| r.passengers)?;
        let bus_capacity = column("Bus_Capacity", |r| r.bus_capacity)?;
        let delay = column("Avg_Delay_Min", |r| r.avg_delay_min)?;
        let response = column("Response_Time_hr", |r| r.response_time_hr)?;
        let satisfaction = column("Satisfaction", |r| r.satisfaction)?;

        let cleaned = raw
            .into_iter()
            .map(|r| CleanRecord {
                meal_type: r
                    .meal_type
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| UNSPECIFIED_MEAL.to_string()),
                date: r.date.filter(|d| !d.is_empty()),
                zone: r.zone,
                time_slot: r.time_slot,
                footfall: finite(r.footfall).unwrap_or(footfall),
                prepared_qty: finite(r.prepared_qty).unwrap_or(prepared),
                orders: finite(r.orders).unwrap_or(orders),
                passengers: finite(r.passengers).unwrap_or(passengers),
                bus_capacity: finite(r.bus_capacity).unwrap_or(bus_capacity),
                avg_delay_min: finite(r.avg_delay_min).unwrap_or(delay).max(0.0),
                response_time_hr: finite(r.response_time_hr).unwrap_or(response),
                satisfaction: finite(r.satisfaction).unwrap_or(satisfaction),
                security_incidents: finite(r.security_incidents).unwrap_or(0.0),
            })
            .collect();
        Ok(cleaned)
    }

    /// Resolves categories and computes every derived field.
    ///
    /// Zone capacity is resolved before the congestion index; an unknown zone,
    /// time slot, or unparseable date aborts the run.
    pub fn engineer(&self, rows: Vec<CleanRecord>) -> Result<Vec<Record>> {
        rows.into_iter()
            .enumerate()
            .map(|(i, row)| self.engineer_row(i + 1, row))
            .collect()
    }

    fn engineer_row(&self, row_no: usize, row: CleanRecord) -> Result<Record> {
        let zone: Zone = row.zone.parse().map_err(|()| EngineError::UnknownZone {
            zone: row.zone.clone(),
            row: row_no,
        })?;
        let time_slot: TimeSlot =
            row.time_slot
                .parse()
                .map_err(|()| EngineError::UnknownTimeSlot {
                    slot: row.time_slot.clone(),
                    row: row_no,
                })?;

        let date = row
            .date
            .map(|d| {
                parse_date(&d).ok_or_else(|| EngineError::InvalidDate {
                    date: d.clone(),
                    row: row_no,
                })
            })
            .transpose()?;

        let footfall = to_count(row.footfall);
        let prepared_qty = to_count(row.prepared_qty);
        let orders = to_count(row.orders);
        let passengers = to_count(row.passengers);
        let bus_capacity = to_count(row.bus_capacity);

        let zone_capacity = zone.capacity();
        let congestion_index = f64::from(footfall) / f64::from(zone_capacity);

        let waste_percent = self.ratio(
            "waste_percent",
            row_no,
            f64::from(prepared_qty) - f64::from(orders),
            prepared_qty,
        )?;
        let transport_utilization = self.ratio(
            "transport_utilization",
            row_no,
            f64::from(passengers),
            bus_capacity,
        )?;

        Ok(Record {
            date,
            zone,
            time_slot,
            meal_type: row.meal_type,
            footfall,
            prepared_qty,
            orders,
            passengers,
            bus_capacity,
            avg_delay_min: row.avg_delay_min,
            response_time_hr: row.response_time_hr,
            satisfaction: row.satisfaction,
            security_incidents: to_count(row.security_incidents),
            zone_capacity,
            congestion_index,
            waste_percent,
            transport_utilization,
            zone_encoded: zone.encoded(),
            time_slot_encoded: time_slot.encoded(),
        })
    }

    fn ratio(
        &self,
        column: &'static str,
        row: usize,
        numerator: f64,
        denominator: u32,
    ) -> Result<Option<f64>> {
        if denominator > 0 {
            return Ok(Some(numerator / f64::from(denominator)));
        }
        match self.policy {
            ZeroDenominatorPolicy::Exclude => Ok(None),
            ZeroDenominatorPolicy::Reject => Err(EngineError::DivisionPolicy { column, row }),
        }
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Parses a calendar date in any of [`DATE_FORMATS`], or a date with a
/// trailing `HH:MM:SS` time.
fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Median of the finite values; `None` when there are none.
fn median(values: &mut Vec<f64>) -> Option<f64> {
    values.retain(|v| v.is_finite());
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Rounds to the nearest non-negative integer count.
fn to_count(value: f64) -> u32 {
    if value.is_finite() {
        value.max(0.0).round() as u32
    } else {
        0
    }
}

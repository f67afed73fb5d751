//! Raw and processed record types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::zone::{TimeSlot, Zone};

/// One CSV row before cleaning.
///
/// Numeric cells that are empty or unparseable deserialize to `None` and are
/// filled during cleaning, as are non-finite values such as `NaN`. Columns not listed here are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Zone", default)]
    pub zone: String,
    #[serde(rename = "Time_Slot", default)]
    pub time_slot: String,
    #[serde(rename = "Meal_Type", default)]
    pub meal_type: Option<String>,
    #[serde(rename = "Footfall", default, deserialize_with = "csv::invalid_option")]
    pub footfall: Option<f64>,
    #[serde(rename = "Prepared_Qty", default, deserialize_with = "csv::invalid_option")]
    pub prepared_qty: Option<f64>,
    #[serde(rename = "Orders", default, deserialize_with = "csv::invalid_option")]
    pub orders: Option<f64>,
    #[serde(rename = "Passengers", default, deserialize_with = "csv::invalid_option")]
    pub passengers: Option<f64>,
    #[serde(rename = "Bus_Capacity", default, deserialize_with = "csv::invalid_option")]
    pub bus_capacity: Option<f64>,
    #[serde(rename = "Avg_Delay_Min", default, deserialize_with = "csv::invalid_option")]
    pub avg_delay_min: Option<f64>,
    #[serde(rename = "Response_Time_hr", default, deserialize_with = "csv::invalid_option")]
    pub response_time_hr: Option<f64>,
    #[serde(rename = "Satisfaction", default, deserialize_with = "csv::invalid_option")]
    pub satisfaction: Option<f64>,
    #[serde(
        rename = "Security_Incidents",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub security_incidents: Option<f64>,
}

/// One cleaned observation with its derived fields.
///
/// Built once by the pipeline and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub date: Option<NaiveDate>,
    pub zone: Zone,
    pub time_slot: TimeSlot,
    pub meal_type: String,
    pub footfall: u32,
    pub prepared_qty: u32,
    pub orders: u32,
    pub passengers: u32,
    pub bus_capacity: u32,
    pub avg_delay_min: f64,
    pub response_time_hr: f64,
    pub satisfaction: f64,
    pub security_incidents: u32,

    pub zone_capacity: u32,
    pub congestion_index: f64,
    /// `None` when `prepared_qty` is zero.
    pub waste_percent: Option<f64>,
    /// `None` when `bus_capacity` is zero.
    pub transport_utilization: Option<f64>,
    pub zone_encoded: u8,
    pub time_slot_encoded: u8,
}

impl Record {
    /// Unsold quantity; negative when orders exceed preparation.
    pub fn waste_qty(&self) -> i64 {
        i64::from(self.prepared_qty) - i64::from(self.orders)
    }
}

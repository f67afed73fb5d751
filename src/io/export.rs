//! CSV export of the processed dataset.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::data::Dataset;

/// Source columns followed by the derived ones.
///
/// The source half matches the input headers, so an exported file loads back
/// through the pipeline.
const HEADER: &str = "Date,Zone,Time_Slot,Meal_Type,Footfall,Prepared_Qty,Orders,\
                      Passengers,Bus_Capacity,Avg_Delay_Min,Response_Time_hr,Satisfaction,\
                      Security_Incidents,zone_capacity,congestion_index,waste_percent,\
                      transport_utilization,zone_encoded,time_slot_encoded";

/// Exports the processed dataset to a CSV file at the given path.
///
/// Undefined ratios are written as empty cells. Output is deterministic for
/// identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(dataset: &Dataset, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(dataset, buf)
}

/// Writes the processed dataset as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(dataset: &Dataset, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    let opt = |v: Option<f64>| v.map_or_else(String::new, |v| format!("{v:.6}"));
    for r in dataset {
        wtr.write_record(&[
            r.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            r.zone.to_string(),
            r.time_slot.to_string(),
            r.meal_type.clone(),
            r.footfall.to_string(),
            r.prepared_qty.to_string(),
            r.orders.to_string(),
            r.passengers.to_string(),
            r.bus_capacity.to_string(),
            r.avg_delay_min.to_string(),
            r.response_time_hr.to_string(),
            r.satisfaction.to_string(),
            r.security_incidents.to_string(),
            r.zone_capacity.to_string(),
            format!("{:.6}", r.congestion_index),
            opt(r.waste_percent),
            opt(r.transport_utilization),
            r.zone_encoded.to_string(),
            r.time_slot_encoded.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

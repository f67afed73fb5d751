//! Record builders shared by unit tests.

use crate::data::{Record, TimeSlot, Zone};

/// A record with consistent derived fields and neutral defaults.
///
/// Derived fields are recomputed by [`refresh`] after callers edit inputs.
pub fn record(zone: Zone, time_slot: TimeSlot, footfall: u32) -> Record {
    let mut r = Record {
        date: None,
        zone,
        time_slot,
        meal_type: "Lunch".to_string(),
        footfall,
        prepared_qty: 100,
        orders: 80,
        passengers: 30,
        bus_capacity: 40,
        avg_delay_min: 5.0,
        response_time_hr: 2.0,
        satisfaction: 3.5,
        security_incidents: 0,
        zone_capacity: 0,
        congestion_index: 0.0,
        waste_percent: None,
        transport_utilization: None,
        zone_encoded: 0,
        time_slot_encoded: 0,
    };
    refresh(&mut r);
    r
}

/// Recomputes the derived fields from the raw ones.
pub fn refresh(r: &mut Record) {
    r.zone_capacity = r.zone.capacity();
    r.congestion_index = f64::from(r.footfall) / f64::from(r.zone_capacity);
    r.waste_percent = (r.prepared_qty > 0)
        .then(|| (f64::from(r.prepared_qty) - f64::from(r.orders)) / f64::from(r.prepared_qty));
    r.transport_utilization =
        (r.bus_capacity > 0).then(|| f64::from(r.passengers) / f64::from(r.bus_capacity));
    r.zone_encoded = r.zone.encoded();
    r.time_slot_encoded = r.time_slot.encoded();
}

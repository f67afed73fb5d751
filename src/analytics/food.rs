//! Food preparation waste and demand model summary.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::{Dataset, Record, TimeSlot, Zone};
use crate::model::Metrics;

/// Waste totals for one group of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WasteGroup {
    /// Mean of the defined waste percents; `None` if the group has none.
    pub avg_waste_percent: Option<f64>,
    pub total_waste: i64,
    pub total_prepared: u64,
    pub total_orders: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealWaste {
    pub meal_type: String,
    #[serde(flatten)]
    pub waste: WasteGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneWaste {
    pub zone: Zone,
    #[serde(flatten)]
    pub waste: WasteGroup,
}

/// One waste trend bucket, keyed by date or by time slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub period: String,
    pub avg_waste_percent: Option<f64>,
    pub total_waste: i64,
}

/// Food waste summary across all records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodView {
    pub overall_waste_percent: Option<f64>,
    pub total_waste_qty: i64,
    /// Meal types in lexicographic order.
    pub by_meal_type: Vec<MealWaste>,
    /// Zones in enum order, absent zones omitted.
    pub by_zone: Vec<ZoneWaste>,
    pub waste_trend: Vec<TrendPoint>,
    pub demand_model: Metrics,
}

#[derive(Debug, Clone, Copy, Default)]
struct WasteAcc {
    waste_sum: f64,
    waste_n: usize,
    total_waste: i64,
    total_prepared: u64,
    total_orders: u64,
}

impl WasteAcc {
    fn push(&mut self, r: &Record) {
        if let Some(w) = r.waste_percent {
            self.waste_sum += w;
            self.waste_n += 1;
        }
        self.total_waste += r.waste_qty();
        self.total_prepared += u64::from(r.prepared_qty);
        self.total_orders += u64::from(r.orders);
    }

    fn finish(self) -> WasteGroup {
        WasteGroup {
            avg_waste_percent: (self.waste_n > 0).then(|| self.waste_sum / self.waste_n as f64),
            total_waste: self.total_waste,
            total_prepared: self.total_prepared,
            total_orders: self.total_orders,
        }
    }
}

impl FoodView {
    /// Aggregates waste by meal type, zone, and period.
    ///
    /// `demand_model` is the held-out fit of the demand regressor.
    pub fn compute(dataset: &Dataset, demand_model: Metrics) -> Self {
        let mut overall = WasteAcc::default();
        let mut meals: BTreeMap<&str, WasteAcc> = BTreeMap::new();
        let mut zones = [None::<WasteAcc>; Zone::ALL.len()];

        for r in dataset {
            overall.push(r);
            meals.entry(r.meal_type.as_str()).or_default().push(r);
            zones[r.zone.index()].get_or_insert_default().push(r);
        }

        let overall = overall.finish();
        Self {
            overall_waste_percent: overall.avg_waste_percent,
            total_waste_qty: overall.total_waste,
            by_meal_type: meals
                .into_iter()
                .map(|(meal, acc)| MealWaste {
                    meal_type: meal.to_string(),
                    waste: acc.finish(),
                })
                .collect(),
            by_zone: Zone::ALL
                .iter()
                .zip(zones)
                .filter_map(|(&zone, acc)| {
                    acc.map(|acc| ZoneWaste {
                        zone,
                        waste: acc.finish(),
                    })
                })
                .collect(),
            waste_trend: waste_trend(dataset),
            demand_model,
        }
    }
}

/// Per-date buckets when every record is dated, else per time slot.
fn waste_trend(dataset: &Dataset) -> Vec<TrendPoint> {
    let point = |period: String, acc: WasteAcc| {
        let g = acc.finish();
        TrendPoint {
            period,
            avg_waste_percent: g.avg_waste_percent,
            total_waste: g.total_waste,
        }
    };

    if dataset.iter().all(|r| r.date.is_some()) {
        let mut by_date: BTreeMap<NaiveDate, WasteAcc> = BTreeMap::new();
        for r in dataset {
            if let Some(date) = r.date {
                by_date.entry(date).or_default().push(r);
            }
        }
        by_date
            .into_iter()
            .map(|(date, acc)| point(date.format("%Y-%m-%d").to_string(), acc))
            .collect()
    } else {
        let mut slots = [None::<WasteAcc>; TimeSlot::ALL.len()];
        for r in dataset {
            slots[r.time_slot.index()].get_or_insert_default().push(r);
        }
        TimeSlot::ALL
            .iter()
            .zip(slots)
            .filter_map(|(slot, acc)| acc.map(|acc| point(slot.to_string(), acc)))
            .collect()
    }
}

//! Rule-based strategic interventions across the four operational domains.
//!
//! Each rule reads the already computed domain views, grades its finding
//! against fixed thresholds, and attaches a projected impact estimate. The
//! result is ordered by priority, then by projected impact.

use std::fmt;

use serde::Serialize;
use serde_json::{Value, json};

use crate::data::dataset::mean;
use crate::data::{Dataset, TimeSlot, Zone};
use crate::model::cache::satisfaction_features;
use crate::model::{RandomForest, TrainedModel};

use super::congestion::CongestionView;
use super::food::FoodView;
use super::satisfaction::ranked_importances;
use super::transport::TransportView;

const CONGESTION_HIGH: f64 = 0.70;
const CONGESTION_CRITICAL: f64 = 0.85;
const WASTE_HIGH: f64 = 0.20;
const WASTE_CRITICAL: f64 = 0.30;
const DELAY_HIGH_MIN: f64 = 5.0;
const DELAY_CRITICAL_MIN: f64 = 10.0;
/// Share of overcrowded runs (percent) that triggers a capacity intervention.
const OVERCROWDED_TRIGGER_PCT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
}

impl Priority {
    /// Grades `value` against ascending `high` and `critical` cut-offs.
    fn grade(value: f64, high: f64, critical: f64) -> Self {
        if value >= critical {
            Priority::Critical
        } else if value >= high {
            Priority::High
        } else {
            Priority::Medium
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Congestion,
    Food,
    Transport,
    Satisfaction,
}

/// One recommendation with its supporting figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intervention {
    pub id: &'static str,
    pub category: Category,
    pub priority: Priority,
    pub title: String,
    pub insight: String,
    pub recommendations: Vec<String>,
    pub metric: f64,
    pub metric_label: String,
    pub projected_impact: f64,
    pub projected_impact_label: &'static str,
    pub evidence: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterventionSummary {
    pub total_interventions: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub total_projected_impact: f64,
    pub domains: [Category; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterventionsView {
    pub summary: InterventionSummary,
    pub interventions: Vec<Intervention>,
}

/// Domain views the rules draw on.
pub struct Findings<'a> {
    pub dataset: &'a Dataset,
    pub congestion: &'a CongestionView,
    pub food: &'a FoodView,
    pub transport: &'a TransportView,
    pub satisfaction: &'a TrainedModel<RandomForest>,
}

impl InterventionsView {
    pub fn compute(findings: &Findings<'_>) -> Self {
        let mut interventions = Vec::new();
        interventions.extend(congestion_rules(findings.congestion));
        interventions.extend(food_rules(findings.food));
        interventions.extend(transport_rules(findings.dataset, findings.transport));
        interventions.extend(satisfaction_rules(findings.dataset, findings.satisfaction));

        interventions.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(b.projected_impact.total_cmp(&a.projected_impact))
        });

        let count = |p: Priority| interventions.iter().filter(|i| i.priority == p).count();
        let summary = InterventionSummary {
            total_interventions: interventions.len(),
            critical: count(Priority::Critical),
            high: count(Priority::High),
            medium: count(Priority::Medium),
            total_projected_impact: interventions.iter().map(|i| i.projected_impact).sum(),
            domains: [
                Category::Congestion,
                Category::Food,
                Category::Transport,
                Category::Satisfaction,
            ],
        };

        Self {
            summary,
            interventions,
        }
    }
}

/// `(value - reference) / reference` as a percentage; 0 for a zero reference.
fn pct_above(value: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        0.0
    } else {
        (value - reference) / reference * 100.0
    }
}

/// Largest `(key, value)` pair; the first wins ties.
fn max_by_value<K: Copy>(pairs: impl IntoIterator<Item = (K, f64)>) -> Option<(K, f64)> {
    pairs.into_iter().fold(None, |best, (k, v)| match best {
        Some((_, b)) if b >= v => best,
        _ => Some((k, v)),
    })
}

fn congestion_rules(view: &CongestionView) -> Vec<Intervention> {
    let cell_avg = mean(view.heatmap.iter().map(|c| c.congestion_index)).unwrap_or(0.0);
    let Some((worst_zone, worst_val)) = max_by_value(
        Zone::ALL
            .iter()
            .filter_map(|&z| view.zone_cell_mean(z).map(|m| (z, m))),
    ) else {
        return Vec::new();
    };
    let peak_slot = view.most_congested_time_slot;

    let mut hotspots = view.heatmap.clone();
    hotspots.sort_by(|a, b| b.congestion_index.total_cmp(&a.congestion_index));
    hotspots.truncate(3);

    let above = pct_above(worst_val, cell_avg);
    let mut out = vec![Intervention {
        id: "cong-1",
        category: Category::Congestion,
        priority: Priority::grade(worst_val, CONGESTION_HIGH, CONGESTION_CRITICAL),
        title: "Implement Dynamic Staggered Scheduling".to_string(),
        insight: format!(
            "Zone '{worst_zone}' records a mean congestion index of {worst_val:.2}, \
             {above:.1}% above the campus average ({cell_avg:.2}). \
             Peak pressure occurs during {peak_slot}."
        ),
        recommendations: vec![
            format!(
                "Stagger class start times in '{worst_zone}' by 15-minute intervals during {peak_slot}."
            ),
            "Show live crowd density at zone entry points to redirect foot traffic.".to_string(),
            "Open overflow corridors and temporary seating during peak periods.".to_string(),
        ],
        metric: worst_val,
        metric_label: "Peak zone congestion index".to_string(),
        projected_impact: (above * 0.6).clamp(0.0, 25.0),
        projected_impact_label: "Est. congestion reduction",
        evidence: json!({
            "worst_zone": worst_zone,
            "worst_zone_index": worst_val,
            "peak_time_slot": peak_slot,
            "campus_avg_congestion": cell_avg,
            "bottleneck_cells": view.bottleneck_count,
            "top_hotspots": hotspots,
        }),
    }];

    let n = view.bottleneck_count;
    if n > 0 {
        out.push(Intervention {
            id: "cong-2",
            category: Category::Congestion,
            priority: if n > 3 { Priority::High } else { Priority::Medium },
            title: "Deploy Sensor-Driven Entry and Flow Management".to_string(),
            insight: format!(
                "{n} zone/time-slot combinations reach the critical congestion threshold of \
                 {CONGESTION_CRITICAL}. These hotspots risk unsafe crowding."
            ),
            recommendations: vec![
                "Install occupancy sensors at bottleneck entries for real-time headcount."
                    .to_string(),
                "Feed live congestion into the campus app for crowd-aware routing.".to_string(),
                "Mark alternate walking paths away from the top hotspot zones.".to_string(),
            ],
            metric: n as f64,
            metric_label: "Critical bottleneck cells".to_string(),
            projected_impact: (n as f64 * 6.0).min(35.0),
            projected_impact_label: "Est. bottleneck reduction",
            evidence: json!({
                "bottleneck_count": n,
                "threshold": CONGESTION_CRITICAL,
                "top_hotspots": hotspots,
            }),
        });
    }
    out
}

fn food_rules(view: &FoodView) -> Vec<Intervention> {
    let Some(overall) = view.overall_waste_percent else {
        return Vec::new();
    };
    let mut out = Vec::new();

    let worst_meal = max_by_value(
        view.by_meal_type
            .iter()
            .filter_map(|m| m.waste.avg_waste_percent.map(|w| (m.meal_type.as_str(), w))),
    );
    if let Some((meal, meal_waste)) = worst_meal {
        let above = pct_above(meal_waste, overall);
        let total_prepared: u64 = view.by_zone.iter().map(|z| z.waste.total_prepared).sum();
        out.push(Intervention {
            id: "food-1",
            category: Category::Food,
            priority: Priority::grade(overall, WASTE_HIGH, WASTE_CRITICAL),
            title: "Demand Forecasting for Prep Quantities".to_string(),
            insight: format!(
                "Food waste averages {:.1}% of prepared quantities. '{meal}' is the worst meal \
                 type at {:.1}%, {above:.1}% above average. {} units were wasted out of \
                 {total_prepared} prepared.",
                overall * 100.0,
                meal_waste * 100.0,
                view.total_waste_qty,
            ),
            recommendations: vec![
                format!("Calibrate '{meal}' prep quantities with the demand model."),
                "Give kitchen managers live surplus alerts from order tracking.".to_string(),
                "Prepare 70% upfront and the rest in rolling batches.".to_string(),
            ],
            metric: meal_waste * 100.0,
            metric_label: format!("{meal} waste rate (%)"),
            projected_impact: (above * 0.5).clamp(0.0, 40.0),
            projected_impact_label: "Est. waste reduction",
            evidence: json!({
                "overall_waste_pct": overall * 100.0,
                "worst_meal_type": meal,
                "worst_meal_waste_pct": meal_waste * 100.0,
                "total_waste_units": view.total_waste_qty,
                "total_prepared_units": total_prepared,
                "demand_model": view.demand_model,
            }),
        });
    }

    let worst_zone = max_by_value(
        view.by_zone
            .iter()
            .filter_map(|z| z.waste.avg_waste_percent.map(|w| (z.zone, w))),
    );
    if let Some((zone, zone_waste)) = worst_zone {
        out.push(Intervention {
            id: "food-2",
            category: Category::Food,
            priority: if zone_waste > WASTE_HIGH {
                Priority::High
            } else {
                Priority::Medium
            },
            title: "Zone-Level Surplus Redistribution".to_string(),
            insight: format!(
                "Zone '{zone}' has the highest average food waste at {:.1}%, pointing to \
                 over-preparation against local demand.",
                zone_waste * 100.0
            ),
            recommendations: vec![
                format!("Share surplus between '{zone}' and adjacent lower-demand zones."),
                "Redistribute end-of-service surplus through campus food banks.".to_string(),
                "Set zone-level waste targets in monthly kitchen reviews.".to_string(),
            ],
            metric: zone_waste * 100.0,
            metric_label: format!("{zone} waste rate (%)"),
            projected_impact: (zone_waste * 60.0).clamp(0.0, 30.0),
            projected_impact_label: "Est. zone waste reduction",
            evidence: json!({
                "worst_zone": zone,
                "worst_zone_waste_pct": zone_waste * 100.0,
                "by_zone": view.by_zone,
            }),
        });
    }
    out
}

fn transport_rules(dataset: &Dataset, view: &TransportView) -> Vec<Intervention> {
    let avg_delay = view.avg_delay_min;
    let Some((delay_zone, zone_delay)) =
        max_by_value(view.by_zone.iter().map(|z| (z.zone, z.avg_delay)))
    else {
        return Vec::new();
    };
    let peak = max_by_value(TimeSlot::ALL.iter().filter_map(|&slot| {
        mean(
            dataset
                .iter()
                .filter(|r| r.time_slot == slot)
                .map(|r| r.avg_delay_min),
        )
        .map(|d| (slot, d))
    }));
    let (peak_slot, peak_delay) = match peak {
        Some((slot, d)) => (slot.to_string(), d),
        None => (String::from("n/a"), 0.0),
    };

    let mut out = vec![Intervention {
        id: "trans-1",
        category: Category::Transport,
        priority: Priority::grade(avg_delay, DELAY_HIGH_MIN, DELAY_CRITICAL_MIN),
        title: "Dynamic Fleet Scheduling and Route Optimisation".to_string(),
        insight: format!(
            "Average transport delay is {avg_delay:.1} minutes (max {:.1}). Delays peak \
             during '{peak_slot}' ({peak_delay:.1} min). Zone '{delay_zone}' has the highest \
             mean delay at {zone_delay:.1} min.",
            view.max_delay_min
        ),
        recommendations: vec![
            format!("Add bus frequency during '{peak_slot}', especially to and from '{delay_zone}'."),
            "Pre-position vehicles ahead of predicted peak demand.".to_string(),
            "Pilot an express shuttle between the two busiest zones at rush hour.".to_string(),
        ],
        metric: avg_delay,
        metric_label: "Avg delay (min)".to_string(),
        projected_impact: (avg_delay * 2.5).min(40.0),
        projected_impact_label: "Est. delay reduction",
        evidence: json!({
            "avg_delay_min": avg_delay,
            "max_delay_min": view.max_delay_min,
            "peak_time_slot": peak_slot,
            "peak_slot_delay": peak_delay,
            "worst_delay_zone": delay_zone,
            "worst_delay_val": zone_delay,
            "by_zone": view.by_zone,
        }),
    }];

    let pct = view.overcrowded_pct;
    if pct > OVERCROWDED_TRIGGER_PCT {
        let busiest = max_by_value(
            view.by_zone
                .iter()
                .filter_map(|z| z.avg_utilization.map(|u| (z.zone, u))),
        );
        let (util_zone, util_val) = match busiest {
            Some((z, u)) => (z.to_string(), u),
            None => (String::from("n/a"), 0.0),
        };
        out.push(Intervention {
            id: "trans-2",
            category: Category::Transport,
            priority: if pct > 25.0 {
                Priority::Critical
            } else {
                Priority::High
            },
            title: "Overcrowding Relief via Capacity Management".to_string(),
            insight: format!(
                "{pct:.1}% of transport runs exceed vehicle capacity. Zone '{util_zone}' \
                 averages {util_val:.2}x capacity load."
            ),
            recommendations: vec![
                "Offer seat reservation in the campus app to flatten demand spikes.".to_string(),
                format!("Keep standby vehicles for '{util_zone}' during peak slots."),
                "Match ride-shares to even out vehicle loads.".to_string(),
            ],
            metric: pct,
            metric_label: "Overcrowded runs (%)".to_string(),
            projected_impact: (pct * 0.8).min(35.0),
            projected_impact_label: "Est. overcrowding reduction",
            evidence: json!({
                "overcrowded_pct": pct,
                "avg_utilization": view.avg_utilization,
                "worst_util_zone": util_zone,
                "worst_util_val": util_val,
            }),
        });
    }
    out
}

/// Display name for a satisfaction model input.
fn readable(feature: &str) -> &str {
    match feature {
        "congestion_index" => "Congestion Index",
        "waste_percent" => "Food Waste Rate",
        "Avg_Delay_Min" => "Transport Delay",
        "Response_Time_hr" => "Service Response Time",
        other => other,
    }
}

/// Pearson correlation; `None` when either side has no variance.
fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let mx = mean(xs.iter().copied())?;
    let my = mean(ys.iter().copied())?;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        sxy += (x - mx) * (y - my);
        sxx += (x - mx).powi(2);
        syy += (y - my).powi(2);
    }
    (sxx > 0.0 && syy > 0.0).then(|| sxy / (sxx * syy).sqrt())
}

fn satisfaction_rules(dataset: &Dataset, model: &TrainedModel<RandomForest>) -> Vec<Intervention> {
    let ranked = ranked_importances(model);
    let Some(top) = ranked.first() else {
        return Vec::new();
    };
    let actual: Vec<f64> = dataset.iter().map(|r| r.satisfaction).collect();
    let avg = dataset.mean_satisfaction();
    let std = if actual.len() > 1 {
        (actual.iter().map(|s| (s - avg).powi(2)).sum::<f64>() / (actual.len() - 1) as f64).sqrt()
    } else {
        0.0
    };

    let columns: Vec<[f64; 4]> = dataset.iter().map(satisfaction_features).collect();
    let correlations: serde_json::Map<String, Value> = model
        .feature_names
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let xs: Vec<f64> = columns.iter().map(|c| c[j]).collect();
            (readable(name).to_string(), json!(pearson(&xs, &actual)))
        })
        .collect();

    let top_label = readable(top.feature);
    let top_pct = top.importance * 100.0;
    let priority = if avg < 3.0 {
        Priority::Critical
    } else if avg < 3.5 {
        Priority::High
    } else {
        Priority::Medium
    };

    let mut out = vec![Intervention {
        id: "sat-1",
        category: Category::Satisfaction,
        priority,
        title: format!("Reduce '{top_label}', the Top Satisfaction Driver"),
        insight: format!(
            "Feature importance shows '{top_label}' carries {top_pct:.1}% of the model's \
             explanatory weight (R² = {:.3}). Average satisfaction is {avg:.2}/5 \
             (std {std:.2}).",
            model.metrics.r2
        ),
        recommendations: vec![
            format!("Set a formal reduction target for '{top_label}' with weekly reviews."),
            format!("Fund the interventions that act on '{top_label}' first."),
            "Let students report issues instantly and respond within 24 hours.".to_string(),
        ],
        metric: top_pct,
        metric_label: format!("'{top_label}' importance (%)"),
        projected_impact: (top_pct * 0.4).min(30.0),
        projected_impact_label: "Est. satisfaction uplift",
        evidence: json!({
            "avg_satisfaction": avg,
            "satisfaction_std": std,
            "model_r2": model.metrics.r2,
            "model_mae": model.metrics.mae,
            "top_driver": top.feature,
            "feature_importances": ranked,
            "correlations": correlations,
        }),
    }];

    let zone_means: Vec<(Zone, f64)> = Zone::ALL
        .iter()
        .filter_map(|&z| {
            mean(dataset.iter().filter(|r| r.zone == z).map(|r| r.satisfaction)).map(|m| (z, m))
        })
        .collect();
    let lowest = zone_means
        .iter()
        .copied()
        .fold(None, |best: Option<(Zone, f64)>, (z, m)| match best {
            Some((_, b)) if b <= m => best,
            _ => Some((z, m)),
        });
    if let Some((zone, zone_sat)) = lowest {
        let gap = -pct_above(zone_sat, avg);
        out.push(Intervention {
            id: "sat-2",
            category: Category::Satisfaction,
            priority: if gap > 10.0 {
                Priority::High
            } else {
                Priority::Medium
            },
            title: format!("Targeted Satisfaction Recovery in Zone '{zone}'"),
            insight: format!(
                "Zone '{zone}' has the lowest average satisfaction at {zone_sat:.2}/5, \
                 {gap:.1}% below the campus mean of {avg:.2}."
            ),
            recommendations: vec![
                format!("Run monthly experience audits in '{zone}'."),
                format!("Prioritise seating, lighting, and network upgrades in '{zone}'."),
                "Assign a coordinator to the zone for a 90-day improvement sprint.".to_string(),
            ],
            metric: zone_sat,
            metric_label: format!("Zone '{zone}' satisfaction"),
            projected_impact: (gap * 0.6).clamp(0.0, 25.0),
            projected_impact_label: "Est. satisfaction uplift",
            evidence: json!({
                "lowest_zone": zone,
                "lowest_zone_sat": zone_sat,
                "campus_avg_sat": avg,
                "gap_pct": gap,
                "zone_satisfaction": zone_means
                    .iter()
                    .map(|(z, m)| json!({ "zone": z, "avg_satisfaction": m }))
                    .collect::<Vec<_>>(),
            }),
        });
    }

    if let Some(second) = ranked.get(1) {
        let second_label = readable(second.feature);
        let second_pct = second.importance * 100.0;
        let combined = top_pct + second_pct;
        out.push(Intervention {
            id: "sat-3",
            category: Category::Satisfaction,
            priority: Priority::Medium,
            title: format!("Co-Optimise '{top_label}' and '{second_label}'"),
            insight: format!(
                "'{top_label}' ({top_pct:.1}%) and '{second_label}' ({second_pct:.1}%) together \
                 carry {combined:.1}% of the model's explanatory weight."
            ),
            recommendations: vec![
                "Form a joint facilities, catering, and transport working group.".to_string(),
                "Track both metrics together in bi-weekly operations reviews.".to_string(),
                "Pilot combined changes in one zone before a campus-wide rollout.".to_string(),
            ],
            metric: combined,
            metric_label: "Combined driver importance (%)".to_string(),
            projected_impact: (combined * 0.35).min(35.0),
            projected_impact_label: "Est. compound satisfaction uplift",
            evidence: json!({
                "top_driver_label": top_label,
                "top_driver_importance_pct": top_pct,
                "second_driver_label": second_label,
                "second_driver_importance_pct": second_pct,
                "combined_importance_pct": combined,
            }),
        });
    }
    out
}

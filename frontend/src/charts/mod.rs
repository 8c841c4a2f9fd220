//! Chart.js configurations for the statistics tab and the registry of live
//! chart instances.

mod canvas;

use std::collections::HashMap;

use log::error;
use serde_json::{json, Value};

pub use canvas::CanvasSurface;

use crate::models::{
    FilamentAverage, FilamentUsage, MonthlyCost, MonthlyCount, StatisticsBundle, UploaderActivity,
};

const PALETTE: [&str; 10] = [
    "#6366f1", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#06b6d4", "#ec4899", "#14b8a6",
    "#f97316", "#a855f7",
];
const TICK_COLOR: &str = "#94a3b8";
const GRID_COLOR: &str = "#334155";
const LEGEND_COLOR: &str = "#f1f5f9";

/// Display regions on the statistics tab, one chart each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartRegion {
    PrintsPerMonth,
    CostsPerMonth,
    FilamentOverTime,
    TopUploaders,
    AvgPerFilament,
}

impl ChartRegion {
    pub const ALL: [ChartRegion; 5] = [
        ChartRegion::PrintsPerMonth,
        ChartRegion::CostsPerMonth,
        ChartRegion::FilamentOverTime,
        ChartRegion::TopUploaders,
        ChartRegion::AvgPerFilament,
    ];

    pub fn canvas_id(self) -> &'static str {
        match self {
            ChartRegion::PrintsPerMonth => "prints-per-month-chart",
            ChartRegion::CostsPerMonth => "costs-per-month-chart",
            ChartRegion::FilamentOverTime => "filament-over-time-chart",
            ChartRegion::TopUploaders => "top-uploaders-chart",
            ChartRegion::AvgPerFilament => "avg-per-filament-chart",
        }
    }

    pub fn has_data(self, bundle: &StatisticsBundle) -> bool {
        match self {
            ChartRegion::PrintsPerMonth => !bundle.prints_per_month.is_empty(),
            ChartRegion::CostsPerMonth => !bundle.costs_per_month.is_empty(),
            ChartRegion::FilamentOverTime => !bundle.filament_over_time.is_empty(),
            ChartRegion::TopUploaders => !bundle.top_uploaders.is_empty(),
            ChartRegion::AvgPerFilament => !bundle.avg_per_filament.is_empty(),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartRegion::PrintsPerMonth => "Prints per month",
            ChartRegion::CostsPerMonth => "Costs per month",
            ChartRegion::FilamentOverTime => "Filament usage over time",
            ChartRegion::TopUploaders => "Top uploaders",
            ChartRegion::AvgPerFilament => "Average grams per filament",
        }
    }
}

fn axis() -> Value {
    json!({
        "ticks": { "color": TICK_COLOR },
        "grid": { "color": GRID_COLOR }
    })
}

fn counting_axis() -> Value {
    json!({
        "beginAtZero": true,
        "ticks": { "stepSize": 1, "color": TICK_COLOR },
        "grid": { "color": GRID_COLOR }
    })
}

fn value_axis() -> Value {
    json!({
        "beginAtZero": true,
        "ticks": { "color": TICK_COLOR },
        "grid": { "color": GRID_COLOR }
    })
}

fn single_bar(
    labels: Vec<String>,
    label: &str,
    data: Vec<f64>,
    fill: &str,
    border: &str,
    y: Value,
) -> Value {
    json!({
        "type": "bar",
        "data": {
            "labels": labels,
            "datasets": [{
                "label": label,
                "data": data,
                "backgroundColor": fill,
                "borderColor": border,
                "borderWidth": 1
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": true,
            "plugins": { "legend": { "display": false } },
            "scales": { "y": y, "x": axis() }
        }
    })
}

pub fn prints_per_month_config(points: &[MonthlyCount]) -> Value {
    single_bar(
        points.iter().map(|p| p.month.clone()).collect(),
        "Prints",
        points.iter().map(|p| f64::from(p.count)).collect(),
        "#6366f1",
        "#4f46e5",
        counting_axis(),
    )
}

pub fn costs_per_month_config(points: &[MonthlyCost]) -> Value {
    single_bar(
        points.iter().map(|p| p.month.clone()).collect(),
        "Cost (CHF)",
        points.iter().map(|p| p.total_cost).collect(),
        "#10b981",
        "#059669",
        value_axis(),
    )
}

pub fn avg_per_filament_config(points: &[FilamentAverage]) -> Value {
    single_bar(
        points.iter().map(|p| p.filament_name.clone()).collect(),
        "Avg grams per print",
        points.iter().map(|p| p.avg_grams).collect(),
        "#f59e0b",
        "#d97706",
        value_axis(),
    )
}

pub fn top_uploaders_config(points: &[UploaderActivity]) -> Value {
    json!({
        "type": "bar",
        "data": {
            "labels": points.iter().map(|p| p.uploader.clone()).collect::<Vec<_>>(),
            "datasets": [{
                "label": "Prints",
                "data": points.iter().map(|p| p.print_count).collect::<Vec<_>>(),
                "backgroundColor": "#8b5cf6",
                "borderColor": "#7c3aed",
                "borderWidth": 1
            }]
        },
        "options": {
            "indexAxis": "y",
            "responsive": true,
            "maintainAspectRatio": true,
            "plugins": { "legend": { "display": false } },
            "scales": { "x": counting_axis(), "y": axis() }
        }
    })
}

/// Usage grid with every category present for every period.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    /// Distinct periods, ascending.
    pub periods: Vec<String>,
    /// One `(category, values)` per category in first-seen order; each
    /// `values` has exactly `periods.len()` entries.
    pub series: Vec<(String, Vec<f64>)>,
}

/// Pivots `(period, category, grams)` points into aligned series, filling
/// absent pairs with zero. Repeated pairs are summed.
pub fn align_by_category(points: &[FilamentUsage]) -> AlignedSeries {
    let mut categories: Vec<String> = Vec::new();
    for point in points {
        if !categories.contains(&point.filament_name) {
            categories.push(point.filament_name.clone());
        }
    }

    let mut periods: Vec<String> = points.iter().map(|p| p.month.clone()).collect();
    periods.sort();
    periods.dedup();

    let period_index: HashMap<&str, usize> = periods
        .iter()
        .enumerate()
        .map(|(i, p)| (p.as_str(), i))
        .collect();

    let mut series: Vec<(String, Vec<f64>)> = categories
        .into_iter()
        .map(|category| (category, vec![0.0; periods.len()]))
        .collect();

    for point in points {
        let slot = period_index[point.month.as_str()];
        if let Some((_, values)) = series
            .iter_mut()
            .find(|(category, _)| *category == point.filament_name)
        {
            values[slot] += point.grams;
        }
    }

    AlignedSeries { periods, series }
}

pub fn filament_over_time_config(points: &[FilamentUsage]) -> Value {
    let aligned = align_by_category(points);
    let datasets: Vec<Value> = aligned
        .series
        .iter()
        .enumerate()
        .map(|(index, (category, values))| {
            let color = PALETTE[index % PALETTE.len()];
            json!({
                "label": category,
                "data": values,
                "borderColor": color,
                "backgroundColor": format!("{}33", color),
                "tension": 0.4,
                "fill": false
            })
        })
        .collect();

    json!({
        "type": "line",
        "data": { "labels": aligned.periods, "datasets": datasets },
        "options": {
            "responsive": true,
            "maintainAspectRatio": true,
            "plugins": { "legend": { "display": true, "labels": { "color": LEGEND_COLOR } } },
            "scales": { "y": value_axis(), "x": axis() }
        }
    })
}

pub fn chart_configs(bundle: &StatisticsBundle) -> Vec<(ChartRegion, Value)> {
    ChartRegion::ALL
        .iter()
        .map(|region| {
            let config = match region {
                ChartRegion::PrintsPerMonth => prints_per_month_config(&bundle.prints_per_month),
                ChartRegion::CostsPerMonth => costs_per_month_config(&bundle.costs_per_month),
                ChartRegion::FilamentOverTime => {
                    filament_over_time_config(&bundle.filament_over_time)
                }
                ChartRegion::TopUploaders => top_uploaders_config(&bundle.top_uploaders),
                ChartRegion::AvgPerFilament => avg_per_filament_config(&bundle.avg_per_filament),
            };
            (*region, config)
        })
        .collect()
}

/// Where charts get drawn. The browser implementation is [`CanvasSurface`].
pub trait ChartSurface {
    type Handle;

    fn mount(&self, region: ChartRegion, config: &Value) -> Result<Self::Handle, String>;
    fn unmount(&self, handle: Self::Handle);
}

/// Owns the live chart per region; drawing a region always destroys the
/// chart previously bound to it.
pub struct ChartAdapter<S: ChartSurface> {
    surface: S,
    live: HashMap<ChartRegion, S::Handle>,
}

impl<S: ChartSurface> ChartAdapter<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            live: HashMap::new(),
        }
    }

    pub fn render(&mut self, region: ChartRegion, config: &Value) -> bool {
        if let Some(previous) = self.live.remove(&region) {
            self.surface.unmount(previous);
        }
        match self.surface.mount(region, config) {
            Ok(handle) => {
                self.live.insert(region, handle);
                true
            }
            Err(err) => {
                error!("could not draw {:?}: {}", region, err);
                false
            }
        }
    }

    /// Redraws every region from a fresh bundle; returns how many charts are
    /// now live.
    pub fn render_bundle(&mut self, bundle: &StatisticsBundle) -> usize {
        for (region, config) in chart_configs(bundle) {
            self.render(region, &config);
        }
        self.live_count()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn clear(&mut self) {
        for (_, handle) in self.live.drain() {
            self.surface.unmount(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn usage(month: &str, name: &str, grams: f64) -> FilamentUsage {
        FilamentUsage {
            month: month.to_string(),
            filament_name: name.to_string(),
            grams,
        }
    }

    #[test]
    fn aligned_series_cover_every_period() {
        let points = vec![
            usage("2024-02", "PLA", 100.0),
            usage("2024-01", "PETG", 40.0),
            usage("2024-03", "PLA", 25.0),
            usage("2024-01", "PLA", 10.0),
        ];
        let aligned = align_by_category(&points);
        assert_eq!(aligned.periods, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(
            aligned.series,
            vec![
                ("PLA".to_string(), vec![10.0, 100.0, 25.0]),
                ("PETG".to_string(), vec![40.0, 0.0, 0.0]),
            ]
        );
        for (_, values) in &aligned.series {
            assert_eq!(values.len(), aligned.periods.len());
        }
    }

    #[test]
    fn duplicate_pairs_are_summed() {
        let aligned = align_by_category(&[
            usage("2024-01", "PLA", 10.0),
            usage("2024-01", "PLA", 5.0),
        ]);
        assert_eq!(aligned.series, vec![("PLA".to_string(), vec![15.0])]);
    }

    #[test]
    fn empty_usage_yields_empty_chart() {
        let aligned = align_by_category(&[]);
        assert!(aligned.periods.is_empty());
        assert!(aligned.series.is_empty());
        let config = filament_over_time_config(&[]);
        assert_eq!(config["data"]["datasets"], json!([]));
    }

    #[test]
    fn line_config_uses_palette_with_alpha() {
        let config = filament_over_time_config(&[
            usage("2024-01", "PLA", 10.0),
            usage("2024-02", "PETG", 20.0),
        ]);
        assert_eq!(config["type"], "line");
        assert_eq!(config["data"]["labels"], json!(["2024-01", "2024-02"]));
        let datasets = config["data"]["datasets"].as_array().unwrap();
        assert_eq!(datasets[1]["borderColor"], "#10b981");
        assert_eq!(datasets[1]["backgroundColor"], "#10b98133");
        assert_eq!(datasets[1]["data"], json!([0.0, 20.0]));
    }

    #[test]
    fn empty_bundle_has_no_chart_data() {
        let bundle = StatisticsBundle {
            filament_over_time: vec![usage("2024-01", "PLA", 1.0)],
            ..StatisticsBundle::default()
        };
        assert!(ChartRegion::FilamentOverTime.has_data(&bundle));
        assert!(!ChartRegion::PrintsPerMonth.has_data(&bundle));
    }

    #[test]
    fn top_uploaders_is_horizontal() {
        let config = top_uploaders_config(&[UploaderActivity {
            uploader: "Alex".to_string(),
            print_count: 4,
            total_grams: 400.0,
            avg_grams: 100.0,
        }]);
        assert_eq!(config["options"]["indexAxis"], "y");
        assert_eq!(config["data"]["datasets"][0]["data"], json!([4]));
    }

    #[derive(Clone, Default)]
    struct FakeSurface {
        next: Rc<RefCell<u32>>,
        alive: Rc<RefCell<Vec<(ChartRegion, u32)>>>,
        destroyed: Rc<RefCell<u32>>,
    }

    impl ChartSurface for FakeSurface {
        type Handle = u32;

        fn mount(&self, region: ChartRegion, _config: &Value) -> Result<u32, String> {
            let mut next = self.next.borrow_mut();
            *next += 1;
            self.alive.borrow_mut().push((region, *next));
            Ok(*next)
        }

        fn unmount(&self, handle: u32) {
            self.alive.borrow_mut().retain(|(_, h)| *h != handle);
            *self.destroyed.borrow_mut() += 1;
        }
    }

    #[test]
    fn redraw_destroys_previous_instance() {
        let surface = FakeSurface::default();
        let mut adapter = ChartAdapter::new(surface.clone());
        let bundle = StatisticsBundle::default();

        assert_eq!(adapter.render_bundle(&bundle), 5);
        assert_eq!(adapter.render_bundle(&bundle), 5);

        assert_eq!(*surface.destroyed.borrow(), 5);
        let alive = surface.alive.borrow();
        assert_eq!(alive.len(), 5);
        for region in ChartRegion::ALL {
            assert_eq!(alive.iter().filter(|(r, _)| *r == region).count(), 1);
        }
    }

    #[test]
    fn clear_destroys_everything() {
        let surface = FakeSurface::default();
        let mut adapter = ChartAdapter::new(surface.clone());
        adapter.render_bundle(&StatisticsBundle::default());
        adapter.clear();
        assert_eq!(adapter.live_count(), 0);
        assert!(surface.alive.borrow().is_empty());
    }

    struct BrokenSurface;

    impl ChartSurface for BrokenSurface {
        type Handle = ();

        fn mount(&self, _region: ChartRegion, _config: &Value) -> Result<(), String> {
            Err("canvas missing".to_string())
        }

        fn unmount(&self, _handle: ()) {}
    }

    #[test]
    fn failed_mount_leaves_region_empty() {
        let mut adapter = ChartAdapter::new(BrokenSurface);
        assert!(!adapter.render(ChartRegion::PrintsPerMonth, &json!({})));
        assert_eq!(adapter.live_count(), 0);
    }
}

//! Pure mappings from backend records to what each panel displays.
//!
//! Nothing here touches the DOM; the Yew components in `components/` turn
//! these view models into markup.

use crate::format::{format_currency, format_date, format_grams};
use crate::models::{FilamentType, PaymentStatus, Print, SummaryRow, TotalStats};

/// A collection panel: either rows to show or an explicit empty state.
#[derive(Debug, Clone, PartialEq)]
pub enum Grid<T> {
    Empty(&'static str),
    Items(T),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSlot {
    Photo(String),
    Placeholder,
}

/// Treats blank references and paths without a file extension as missing.
pub fn image_slot(image_path: Option<&str>) -> ImageSlot {
    match image_path.map(str::trim) {
        Some(path) if !path.is_empty() && has_extension(path) => ImageSlot::Photo(path.to_string()),
        _ => ImageSlot::Placeholder,
    }
}

fn has_extension(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .and_then(|file| file.rsplit_once('.'))
        .is_some_and(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusBadge {
    pub label: &'static str,
    pub class: &'static str,
}

pub fn status_badge(status: PaymentStatus) -> StatusBadge {
    match status {
        PaymentStatus::Open => StatusBadge {
            label: "🔴 Open",
            class: "rounded-full bg-red-500/15 px-2 py-0.5 text-xs font-semibold text-red-300",
        },
        PaymentStatus::Paid => StatusBadge {
            label: "✅ Paid",
            class: "rounded-full bg-emerald-500/15 px-2 py-0.5 text-xs font-semibold text-emerald-300",
        },
    }
}

/// Controls shown on admin cards.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminControls {
    pub toggle_label: &'static str,
    pub toggle_class: &'static str,
    /// Status the toggle button will set.
    pub toggle_to: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintCard {
    pub id: i64,
    pub title: String,
    pub uploader: String,
    pub filament: String,
    pub grams: String,
    pub price: String,
    pub created: Option<String>,
    pub link: Option<String>,
    pub image: ImageSlot,
    pub badge: StatusBadge,
    pub admin: Option<AdminControls>,
}

fn print_card(print: &Print) -> PrintCard {
    PrintCard {
        id: print.id,
        title: print.name.clone(),
        uploader: print.uploader.clone(),
        filament: print
            .filament_name
            .clone()
            .unwrap_or_else(|| format!("#{}", print.filament_type_id)),
        grams: format_grams(print.filament_grams),
        price: format_currency(print.price),
        created: print
            .created_at
            .as_deref()
            .map(|ts| format_date(ts).to_string()),
        link: print
            .link
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string),
        image: image_slot(print.image_path.as_deref()),
        badge: status_badge(print.payment_status),
        admin: None,
    }
}

pub fn print_grid(prints: &[Print]) -> Grid<Vec<PrintCard>> {
    if prints.is_empty() {
        return Grid::Empty("No prints yet.");
    }
    Grid::Items(prints.iter().map(print_card).collect())
}

pub fn admin_grid(prints: &[Print]) -> Grid<Vec<PrintCard>> {
    if prints.is_empty() {
        return Grid::Empty("No prints match these filters.");
    }
    Grid::Items(
        prints
            .iter()
            .map(|print| {
                let mut card = print_card(print);
                card.admin = Some(match print.payment_status {
                    PaymentStatus::Open => AdminControls {
                        toggle_label: "💰 Mark paid",
                        toggle_class: "rounded-lg bg-emerald-600 px-3 py-1 text-xs hover:bg-emerald-500",
                        toggle_to: PaymentStatus::Paid,
                    },
                    PaymentStatus::Paid => AdminControls {
                        toggle_label: "↩️ Mark open",
                        toggle_class: "rounded-lg bg-amber-600 px-3 py-1 text-xs hover:bg-amber-500",
                        toggle_to: PaymentStatus::Open,
                    },
                });
                card
            })
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilamentRow {
    pub id: i64,
    pub name: String,
    pub price_per_kg: String,
}

pub fn filament_table(filaments: &[FilamentType]) -> Grid<Vec<FilamentRow>> {
    if filaments.is_empty() {
        return Grid::Empty("No filaments yet.");
    }
    Grid::Items(
        filaments
            .iter()
            .map(|f| FilamentRow {
                id: f.id,
                name: f.name.clone(),
                price_per_kg: format!("{} / kg", format_currency(f.price_per_kg)),
            })
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Options for the filament selector, e.g. `PLA (CHF 25.00/kg)`.
pub fn filament_options(filaments: &[FilamentType], selected: Option<i64>) -> Vec<SelectOption> {
    filaments
        .iter()
        .map(|f| SelectOption {
            value: f.id.to_string(),
            label: format!("{} ({}/kg)", f.name, format_currency(f.price_per_kg)),
            selected: selected == Some(f.id),
        })
        .collect()
}

/// Amounts differing by less than half a cent count as equal.
const CENT_TOLERANCE: f64 = 0.005;

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
    pub uploader: String,
    pub prints: u32,
    pub open: f64,
    pub paid: f64,
    /// Always `open + paid`, whatever the server sent.
    pub total: f64,
    /// The server's `total_amount` disagreed with `open + paid`.
    pub diverges: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTotals {
    pub prints: u32,
    pub open: f64,
    pub paid: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub lines: Vec<SummaryLine>,
    pub totals: SummaryTotals,
}

/// Per-uploader rows plus a grand total row summed from those rows.
pub fn summary_table(rows: &[SummaryRow]) -> Grid<SummaryTable> {
    if rows.is_empty() {
        return Grid::Empty("No data yet.");
    }
    let lines: Vec<SummaryLine> = rows
        .iter()
        .map(|row| {
            let total = row.open_amount + row.paid_amount;
            SummaryLine {
                uploader: row.uploader.clone(),
                prints: row.total_prints,
                open: row.open_amount,
                paid: row.paid_amount,
                total,
                diverges: (total - row.total_amount).abs() >= CENT_TOLERANCE,
            }
        })
        .collect();
    let totals = lines.iter().fold(SummaryTotals::default(), |acc, line| SummaryTotals {
        prints: acc.prints + line.prints,
        open: acc.open + line.open,
        paid: acc.paid + line.paid,
        total: acc.total + line.total,
    });
    Grid::Items(SummaryTable { lines, totals })
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub icon: &'static str,
}

pub fn stat_cards(stats: &TotalStats) -> Vec<StatCard> {
    vec![
        StatCard {
            title: "Total prints",
            value: stats.total_prints.unwrap_or(0).to_string(),
            icon: "🖨️",
        },
        StatCard {
            title: "Filament used",
            value: format!("{:.1}g", stats.total_filament.unwrap_or(0.0)),
            icon: "🧵",
        },
        StatCard {
            title: "Total cost",
            value: format_currency(stats.total_cost.unwrap_or(0.0)),
            icon: "💰",
        },
        StatCard {
            title: "Average per print",
            value: format_currency(stats.avg_price_per_print.unwrap_or(0.0)),
            icon: "📊",
        },
    ]
}

use serde::{Deserialize, Deserializer, Serialize};

/// Accepts `null` or a missing field wherever the backend sums over an
/// empty set.
fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "offen")]
    Open,
    #[serde(rename = "bezahlt")]
    Paid,
}

impl PaymentStatus {
    pub fn toggled(self) -> Self {
        match self {
            PaymentStatus::Open => PaymentStatus::Paid,
            PaymentStatus::Paid => PaymentStatus::Open,
        }
    }

    /// Value the backend expects in form fields and query strings.
    pub fn wire_value(self) -> &'static str {
        match self {
            PaymentStatus::Open => "offen",
            PaymentStatus::Paid => "bezahlt",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "offen" => Some(PaymentStatus::Open),
            "bezahlt" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentStatus::Open => "Open",
            PaymentStatus::Paid => "Paid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Print {
    pub id: i64,
    pub name: String,
    pub uploader: String,
    pub filament_type_id: i64,
    pub filament_grams: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub price: f64,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub filament_name: Option<String>,
    #[serde(default)]
    pub price_per_kg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FilamentType {
    pub id: i64,
    pub name: String,
    pub price_per_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SummaryRow {
    pub uploader: String,
    pub total_prints: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub open_amount: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub paid_amount: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TotalStats {
    #[serde(default)]
    pub total_prints: Option<u32>,
    #[serde(default)]
    pub total_filament: Option<f64>,
    #[serde(default)]
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub avg_price_per_print: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MonthlyCount {
    pub month: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MonthlyCost {
    pub month: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FilamentUsage {
    pub month: String,
    pub filament_name: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub grams: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UploaderActivity {
    pub uploader: String,
    pub print_count: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_grams: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub avg_grams: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FilamentAverage {
    pub filament_name: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub avg_grams: f64,
    pub print_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StatisticsBundle {
    #[serde(default)]
    pub total_stats: TotalStats,
    #[serde(default)]
    pub prints_per_month: Vec<MonthlyCount>,
    #[serde(default)]
    pub costs_per_month: Vec<MonthlyCost>,
    #[serde(default)]
    pub filament_over_time: Vec<FilamentUsage>,
    #[serde(default)]
    pub top_uploaders: Vec<UploaderActivity>,
    #[serde(default)]
    pub avg_per_filament: Vec<FilamentAverage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// `{id, message}` reply some mutation endpoints send instead of the record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MutationAck {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Reply<T> {
    Record(T),
    Ack(MutationAck),
}

/// Admin grid filters; unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrintFilters {
    pub uploader: Option<String>,
    pub status: Option<PaymentStatus>,
}

#[cfg(test)]
impl PrintFilters {
    pub fn matches(&self, print: &Print) -> bool {
        self.uploader
            .as_ref()
            .map_or(true, |uploader| &print.uploader == uploader)
            && self
                .status
                .map_or(true, |status| print.payment_status == status)
    }
}

/// Editable fields shared by the submission and edit forms.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintFields {
    pub name: String,
    pub uploader: String,
    pub filament_type_id: i64,
    pub filament_grams: f64,
    pub link: Option<String>,
}

/// Inclusive `YYYY-MM-DD` bounds for the statistics query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_listing_payload() {
        let raw = r#"{
            "id": 7, "name": "Vase", "uploader": "Alex", "image_path": null,
            "link": "", "filament_grams": 120.0, "filament_type_id": 3,
            "payment_status": "offen", "price": 3.0,
            "created_at": "2024-03-01 10:00:00", "filament_name": "PLA", "price_per_kg": 25.0
        }"#;
        let print: Print = serde_json::from_str(raw).unwrap();
        assert_eq!(print.payment_status, PaymentStatus::Open);
        assert_eq!(print.filament_name.as_deref(), Some("PLA"));
        assert!(print.image_path.is_none());
    }

    #[test]
    fn null_price_and_amounts_decode_as_zero() {
        let raw = r#"{"id":1,"name":"x","uploader":"y","filament_type_id":1,"filament_grams":0,"price":null,"payment_status":"bezahlt"}"#;
        let print: Print = serde_json::from_str(raw).unwrap();
        assert_eq!(print.price, 0.0);
        assert_eq!(print.payment_status, PaymentStatus::Paid);

        let row: SummaryRow = serde_json::from_str(
            r#"{"uploader":"y","total_prints":1,"open_amount":null,"paid_amount":2.5,"total_amount":null}"#,
        )
        .unwrap();
        assert_eq!(row.open_amount, 0.0);
        assert_eq!(row.total_amount, 0.0);
    }

    #[test]
    fn toggle_is_an_involution() {
        for status in [PaymentStatus::Open, PaymentStatus::Paid] {
            assert_ne!(status.toggled(), status);
            assert_eq!(status.toggled().toggled(), status);
            assert_eq!(PaymentStatus::from_wire(status.wire_value()), Some(status));
        }
    }

    #[test]
    fn reply_accepts_record_or_ack() {
        let ack: Reply<FilamentType> =
            serde_json::from_str(r#"{"id": 4, "message": "Filament created"}"#).unwrap();
        assert_eq!(
            ack,
            Reply::Ack(MutationAck {
                id: Some(4),
                message: Some("Filament created".to_string())
            })
        );
        let record: Reply<FilamentType> =
            serde_json::from_str(r#"{"id": 4, "name": "PETG", "price_per_kg": 30.0}"#).unwrap();
        assert!(matches!(record, Reply::Record(f) if f.name == "PETG"));
    }

    #[test]
    fn statistics_tolerate_missing_series() {
        let bundle: StatisticsBundle =
            serde_json::from_str(r#"{"total_stats": {"total_prints": 0, "total_cost": null}}"#)
                .unwrap();
        assert_eq!(bundle.total_stats.total_prints, Some(0));
        assert!(bundle.filament_over_time.is_empty());
    }

    #[test]
    fn filters_combine() {
        let raw = r#"{"id":1,"name":"x","uploader":"Alex","filament_type_id":1,"filament_grams":1,"payment_status":"offen"}"#;
        let print: Print = serde_json::from_str(raw).unwrap();
        let both = PrintFilters {
            uploader: Some("Alex".to_string()),
            status: Some(PaymentStatus::Paid),
        };
        assert!(!both.matches(&print));
        assert!(PrintFilters::default().matches(&print));
    }
}

//! Browser-independent description of every backend call.

use crate::models::{DateRange, PaymentStatus, PrintFields, PrintFilters};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone)]
pub enum Body {
    Empty,
    /// `application/x-www-form-urlencoded`
    UrlEncoded(Vec<(&'static str, String)>),
    /// `multipart/form-data`, optionally carrying one file.
    Multipart {
        fields: Vec<(&'static str, String)>,
        file: Option<(&'static str, web_sys::File)>,
    },
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    /// Whether the bearer token must be attached.
    pub auth: bool,
    /// Filament writes whose 400 / 500 answers mean a constraint conflict.
    pub conflict_on_rejection: bool,
    pub body: Body,
}

fn encode_pairs(pairs: &[(&'static str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Drops blank values so an unset filter never reaches the backend.
fn non_empty(key: &'static str, value: Option<&str>) -> Option<(&'static str, String)> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| (key, v.to_string()))
}

fn print_form(fields: &PrintFields) -> Vec<(&'static str, String)> {
    vec![
        ("name", fields.name.clone()),
        ("uploader", fields.uploader.clone()),
        ("filament_grams", fields.filament_grams.to_string()),
        ("filament_type_id", fields.filament_type_id.to_string()),
        ("link", fields.link.clone().unwrap_or_default()),
    ]
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            auth: false,
            conflict_on_rejection: false,
            body: Body::Empty,
        }
    }

    fn authorized(mut self) -> Self {
        self.auth = true;
        self
    }

    fn conflicting(mut self) -> Self {
        self.conflict_on_rejection = true;
        self
    }

    fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    pub fn url(&self, base: &str) -> String {
        let mut url = format!("{}{}", base.trim_end_matches('/'), self.path);
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&encode_pairs(&self.query));
        }
        url
    }

    /// Serialized body for [`Body::UrlEncoded`].
    pub fn url_encoded_body(&self) -> Option<String> {
        match &self.body {
            Body::UrlEncoded(fields) => Some(encode_pairs(fields)),
            _ => None,
        }
    }

    pub fn login(username: &str, password: &str) -> Self {
        Self::new(Method::Post, "/api/login").body(Body::UrlEncoded(vec![
            ("username", username.to_string()),
            ("password", password.to_string()),
        ]))
    }

    pub fn verify() -> Self {
        Self::new(Method::Get, "/api/verify").authorized()
    }

    pub fn list_prints(filters: &PrintFilters) -> Self {
        let mut request = Self::new(Method::Get, "/api/prints");
        request.query = [
            non_empty("uploader", filters.uploader.as_deref()),
            non_empty("status", filters.status.map(PaymentStatus::wire_value)),
        ]
        .into_iter()
        .flatten()
        .collect();
        request
    }

    pub fn get_print(id: i64) -> Self {
        Self::new(Method::Get, format!("/api/prints/{}", id))
    }

    pub fn create_print(fields: &PrintFields, image: Option<web_sys::File>) -> Self {
        Self::new(Method::Post, "/api/prints").body(Body::Multipart {
            fields: print_form(fields),
            file: image.map(|file| ("image", file)),
        })
    }

    pub fn update_print(id: i64, fields: &PrintFields, status: PaymentStatus) -> Self {
        let mut form = print_form(fields);
        form.push(("payment_status", status.wire_value().to_string()));
        Self::new(Method::Put, format!("/api/prints/{}", id))
            .authorized()
            .body(Body::Multipart {
                fields: form,
                file: None,
            })
    }

    pub fn set_print_status(id: i64, status: PaymentStatus) -> Self {
        Self::new(Method::Patch, format!("/api/prints/{}/status", id))
            .authorized()
            .body(Body::Multipart {
                fields: vec![("payment_status", status.wire_value().to_string())],
                file: None,
            })
    }

    pub fn delete_print(id: i64) -> Self {
        Self::new(Method::Delete, format!("/api/prints/{}", id)).authorized()
    }

    pub fn list_filaments() -> Self {
        Self::new(Method::Get, "/api/filaments")
    }

    pub fn create_filament(name: &str, price_per_kg: f64) -> Self {
        Self::new(Method::Post, "/api/filaments")
            .authorized()
            .conflicting()
            .body(Body::Multipart {
                fields: vec![
                    ("name", name.to_string()),
                    ("price_per_kg", price_per_kg.to_string()),
                ],
                file: None,
            })
    }

    pub fn update_filament(id: i64, name: &str, price_per_kg: f64) -> Self {
        Self::new(Method::Put, format!("/api/filaments/{}", id))
            .authorized()
            .conflicting()
            .body(Body::Multipart {
                fields: vec![
                    ("name", name.to_string()),
                    ("price_per_kg", price_per_kg.to_string()),
                ],
                file: None,
            })
    }

    pub fn delete_filament(id: i64) -> Self {
        Self::new(Method::Delete, format!("/api/filaments/{}", id))
            .authorized()
            .conflicting()
    }

    pub fn list_uploaders() -> Self {
        Self::new(Method::Get, "/api/uploaders")
    }

    pub fn summary() -> Self {
        Self::new(Method::Get, "/api/summary").authorized()
    }

    pub fn statistics(range: &DateRange) -> Self {
        let mut request = Self::new(Method::Get, "/api/statistics");
        request.query = [
            non_empty("start_date", range.start.as_deref()),
            non_empty("end_date", range.end.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect();
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(body: &Body) -> &[(&'static str, String)] {
        match body {
            Body::Empty => &[],
            Body::UrlEncoded(fields) | Body::Multipart { fields, .. } => fields,
        }
    }

    fn vase() -> PrintFields {
        PrintFields {
            name: "Vase".to_string(),
            uploader: "Alex".to_string(),
            filament_type_id: 3,
            filament_grams: 120.0,
            link: None,
        }
    }

    #[test]
    fn unset_filters_are_omitted() {
        let request = ApiRequest::list_prints(&PrintFilters::default());
        assert_eq!(request.url(""), "/api/prints");
        assert!(!request.auth);
    }

    #[test]
    fn filters_are_encoded_together() {
        let request = ApiRequest::list_prints(&PrintFilters {
            uploader: Some("Anna Maria".to_string()),
            status: Some(PaymentStatus::Paid),
        });
        assert_eq!(
            request.url("http://host:8000/"),
            "http://host:8000/api/prints?uploader=Anna%20Maria&status=bezahlt"
        );
    }

    #[test]
    fn blank_uploader_filter_is_dropped() {
        let request = ApiRequest::list_prints(&PrintFilters {
            uploader: Some("  ".to_string()),
            status: Some(PaymentStatus::Open),
        });
        assert_eq!(request.url(""), "/api/prints?status=offen");
    }

    #[test]
    fn admin_endpoints_require_auth() {
        let fields = vase();
        let protected = [
            ApiRequest::verify(),
            ApiRequest::update_print(1, &fields, PaymentStatus::Open),
            ApiRequest::set_print_status(1, PaymentStatus::Paid),
            ApiRequest::delete_print(1),
            ApiRequest::create_filament("PLA", 25.0),
            ApiRequest::update_filament(1, "PLA", 25.0),
            ApiRequest::delete_filament(1),
            ApiRequest::summary(),
        ];
        assert!(protected.iter().all(|r| r.auth));

        let public = [
            ApiRequest::login("admin", "pw"),
            ApiRequest::list_prints(&PrintFilters::default()),
            ApiRequest::get_print(1),
            ApiRequest::create_print(&fields, None),
            ApiRequest::list_filaments(),
            ApiRequest::list_uploaders(),
            ApiRequest::statistics(&DateRange::default()),
        ];
        assert!(public.iter().all(|r| !r.auth));
    }

    #[test]
    fn only_filament_writes_treat_rejections_as_conflicts() {
        assert!(ApiRequest::create_filament("PLA", 25.0).conflict_on_rejection);
        assert!(ApiRequest::update_filament(2, "PLA", 25.0).conflict_on_rejection);
        assert!(ApiRequest::delete_filament(2).conflict_on_rejection);
        assert!(!ApiRequest::create_print(&vase(), None).conflict_on_rejection);
    }

    #[test]
    fn login_is_form_encoded() {
        let request = ApiRequest::login("admin", "p&ss word");
        assert_eq!(request.method, Method::Post);
        assert_eq!(
            request.url_encoded_body().as_deref(),
            Some("username=admin&password=p%26ss%20word")
        );
    }

    #[test]
    fn status_patch_sends_wire_value() {
        let request = ApiRequest::set_print_status(9, PaymentStatus::Paid);
        assert_eq!(request.method, Method::Patch);
        assert_eq!(request.path, "/api/prints/9/status");
        assert_eq!(
            fields(&request.body),
            &[("payment_status", "bezahlt".to_string())]
        );
    }

    #[test]
    fn update_carries_all_fields_and_status() {
        let request = ApiRequest::update_print(4, &vase(), PaymentStatus::Open);
        let keys: Vec<_> = fields(&request.body).iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec![
                "name",
                "uploader",
                "filament_grams",
                "filament_type_id",
                "link",
                "payment_status"
            ]
        );
    }

    #[test]
    fn statistics_range_is_optional() {
        assert_eq!(
            ApiRequest::statistics(&DateRange::default()).url(""),
            "/api/statistics"
        );
        let range = DateRange {
            start: Some("2024-01-01".to_string()),
            end: None,
        };
        assert_eq!(
            ApiRequest::statistics(&range).url(""),
            "/api/statistics?start_date=2024-01-01"
        );
    }
}

//! Typed client for the print-ledger REST backend.

mod request;

use std::rc::Rc;

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;

pub use request::{ApiRequest, Body, Method};

use crate::config::API_BASE_URL;
use crate::error::ApiError;
use crate::models::{
    AccessToken, DateRange, FilamentType, PaymentStatus, Print, PrintFields, PrintFilters, Reply,
    StatisticsBundle, SummaryRow,
};
use crate::session::TokenStore;

/// One async operation per backend resource.
#[async_trait(?Send)]
pub trait Backend {
    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, ApiError>;
    async fn verify(&self) -> Result<(), ApiError>;
    async fn list_prints(&self, filters: &PrintFilters) -> Result<Vec<Print>, ApiError>;
    async fn get_print(&self, id: i64) -> Result<Print, ApiError>;
    async fn create_print(
        &self,
        fields: &PrintFields,
        image: Option<web_sys::File>,
    ) -> Result<Print, ApiError>;
    async fn update_print(
        &self,
        id: i64,
        fields: &PrintFields,
        status: PaymentStatus,
    ) -> Result<Print, ApiError>;
    async fn set_print_status(&self, id: i64, status: PaymentStatus) -> Result<Print, ApiError>;
    async fn delete_print(&self, id: i64) -> Result<(), ApiError>;
    async fn list_filaments(&self) -> Result<Vec<FilamentType>, ApiError>;
    async fn create_filament(&self, name: &str, price_per_kg: f64)
        -> Result<FilamentType, ApiError>;
    async fn update_filament(
        &self,
        id: i64,
        name: &str,
        price_per_kg: f64,
    ) -> Result<FilamentType, ApiError>;
    async fn delete_filament(&self, id: i64) -> Result<(), ApiError>;
    async fn list_uploaders(&self) -> Result<Vec<String>, ApiError>;
    async fn get_summary(&self) -> Result<Vec<SummaryRow>, ApiError>;
    async fn get_statistics(&self, range: &DateRange) -> Result<StatisticsBundle, ApiError>;
}

pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Turns a print mutation reply into the full record. The backend usually
/// answers with a bare `{id, message}` acknowledgement, in which case the
/// print is read back by the acknowledged id or, failing that, the id the
/// request addressed.
pub async fn resolve_print(
    backend: &dyn Backend,
    reply: Reply<Print>,
    request_id: Option<i64>,
) -> Result<Print, ApiError> {
    match reply {
        Reply::Record(print) => Ok(print),
        Reply::Ack(ack) => {
            let id = ack
                .id
                .or(request_id)
                .ok_or_else(|| ApiError::Decode("mutation reply carried no id".to_string()))?;
            backend.get_print(id).await
        }
    }
}

/// Filament acknowledgements carry no record; the submitted values are
/// what the backend stored.
pub fn resolve_filament(
    reply: Reply<FilamentType>,
    request_id: Option<i64>,
    name: &str,
    price_per_kg: f64,
) -> Result<FilamentType, ApiError> {
    match reply {
        Reply::Record(filament) => Ok(filament),
        Reply::Ack(ack) => Ok(FilamentType {
            id: ack
                .id
                .or(request_id)
                .ok_or_else(|| ApiError::Decode("filament reply carried no id".to_string()))?,
            name: name.to_string(),
            price_per_kg,
        }),
    }
}

fn js_error(value: JsValue) -> ApiError {
    ApiError::Network(format!("{:?}", value))
}

fn multipart(
    fields: &[(&'static str, String)],
    file: Option<&(&'static str, web_sys::File)>,
) -> Result<web_sys::FormData, ApiError> {
    let form = web_sys::FormData::new().map_err(js_error)?;
    for (key, value) in fields {
        form.append_with_str(key, value).map_err(js_error)?;
    }
    if let Some((key, file)) = file {
        form.append_with_blob_and_filename(key, file, &file.name())
            .map_err(js_error)?;
    }
    Ok(form)
}

/// [`Backend`] over `fetch`, reading the bearer token from the session's
/// token store on every protected call.
pub struct HttpBackend {
    base: String,
    tokens: Rc<dyn TokenStore>,
}

impl HttpBackend {
    pub fn new(tokens: Rc<dyn TokenStore>) -> Self {
        Self::with_base(API_BASE_URL, tokens)
    }

    pub fn with_base(base: &str, tokens: Rc<dyn TokenStore>) -> Self {
        Self {
            base: base.to_string(),
            tokens,
        }
    }

    fn builder(&self, request: &ApiRequest) -> Result<RequestBuilder, ApiError> {
        let url = request.url(&self.base);
        debug!("{:?} {}", request.method, url);
        let mut builder = match request.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Patch => Request::patch(&url),
            Method::Delete => Request::delete(&url),
        };
        if request.auth {
            let token = self
                .tokens
                .load()
                .ok_or_else(|| ApiError::Auth("no session token".to_string()))?;
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }
        Ok(builder)
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn execute(&self, request: ApiRequest) -> Result<String, ApiError> {
        let builder = self.builder(&request)?;
        let sent = match &request.body {
            Body::Empty => builder.send().await,
            Body::UrlEncoded(_) => {
                let body = request.url_encoded_body().unwrap_or_default();
                builder
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(body)
                    .map_err(|e| ApiError::Network(e.to_string()))?
                    .send()
                    .await
            }
            Body::Multipart { fields, file } => {
                let form = multipart(fields, file.as_ref())?;
                builder
                    .body(form)
                    .map_err(|e| ApiError::Network(e.to_string()))?
                    .send()
                    .await
            }
        };
        let response = sent.map_err(|e| {
            warn!("{} failed: {}", request.path, e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if response.ok() {
            return Ok(text);
        }

        warn!("{} answered {}: {}", request.path, status, text);
        Err(if request.conflict_on_rejection {
            ApiError::from_write_status(status, &text)
        } else {
            ApiError::from_status(status, &text)
        })
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let text = self.execute(request).await?;
        decode(&text)
    }
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, ApiError> {
        self.call(ApiRequest::login(username, password)).await
    }

    async fn verify(&self) -> Result<(), ApiError> {
        self.execute(ApiRequest::verify()).await.map(|_| ())
    }

    async fn list_prints(&self, filters: &PrintFilters) -> Result<Vec<Print>, ApiError> {
        self.call(ApiRequest::list_prints(filters)).await
    }

    async fn get_print(&self, id: i64) -> Result<Print, ApiError> {
        self.call(ApiRequest::get_print(id)).await
    }

    async fn create_print(
        &self,
        fields: &PrintFields,
        image: Option<web_sys::File>,
    ) -> Result<Print, ApiError> {
        let reply = self.call(ApiRequest::create_print(fields, image)).await?;
        resolve_print(self, reply, None).await
    }

    async fn update_print(
        &self,
        id: i64,
        fields: &PrintFields,
        status: PaymentStatus,
    ) -> Result<Print, ApiError> {
        let reply = self
            .call(ApiRequest::update_print(id, fields, status))
            .await?;
        resolve_print(self, reply, Some(id)).await
    }

    async fn set_print_status(&self, id: i64, status: PaymentStatus) -> Result<Print, ApiError> {
        let reply = self.call(ApiRequest::set_print_status(id, status)).await?;
        resolve_print(self, reply, Some(id)).await
    }

    async fn delete_print(&self, id: i64) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete_print(id)).await.map(|_| ())
    }

    async fn list_filaments(&self) -> Result<Vec<FilamentType>, ApiError> {
        self.call(ApiRequest::list_filaments()).await
    }

    async fn create_filament(
        &self,
        name: &str,
        price_per_kg: f64,
    ) -> Result<FilamentType, ApiError> {
        let reply = self
            .call(ApiRequest::create_filament(name, price_per_kg))
            .await?;
        resolve_filament(reply, None, name, price_per_kg)
    }

    async fn update_filament(
        &self,
        id: i64,
        name: &str,
        price_per_kg: f64,
    ) -> Result<FilamentType, ApiError> {
        let reply = self
            .call(ApiRequest::update_filament(id, name, price_per_kg))
            .await?;
        resolve_filament(reply, Some(id), name, price_per_kg)
    }

    async fn delete_filament(&self, id: i64) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete_filament(id)).await.map(|_| ())
    }

    async fn list_uploaders(&self) -> Result<Vec<String>, ApiError> {
        self.call(ApiRequest::list_uploaders()).await
    }

    async fn get_summary(&self) -> Result<Vec<SummaryRow>, ApiError> {
        self.call(ApiRequest::summary()).await
    }

    async fn get_statistics(&self, range: &DateRange) -> Result<StatisticsBundle, ApiError> {
        self.call(ApiRequest::statistics(range)).await
    }
}

//! Toolkit-independent state machines behind each page.
//!
//! A controller owns its panel state, turns actions into backend calls and
//! calls `notify` whenever a re-render is due. Pages only read snapshots and
//! dispatch actions.

mod admin;
mod login;
mod public;

pub use admin::{AdminAction, AdminController, AdminState, AdminTab, EditDraft};
pub use login::{LoginAction, LoginController};
pub use public::{PublicAction, PublicController, PublicState, PublicTab};

use log::debug;

use crate::error::ApiError;
use crate::models::PrintFields;

/// Yes/no prompt shown before destructive actions.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// `window.confirm`; answers no when there is no window.
pub struct WindowConfirm;

impl Confirm for WindowConfirm {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Hands out increasing tickets; only the newest one may commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

/// What happened to a response handed to [`Panel::settle`].
#[derive(Debug, PartialEq)]
pub enum Settled {
    Stale,
    Committed,
    Failed(ApiError),
}

/// Data behind one region of a page, with its loading and error state.
/// A failed refresh keeps the previous data.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    seq: RequestSeq,
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            seq: RequestSeq::default(),
        }
    }
}

impl<T> Panel<T> {
    pub fn begin(&mut self) -> Ticket {
        self.loading = true;
        self.seq.issue()
    }

    pub fn settle(&mut self, ticket: Ticket, result: Result<T, ApiError>) -> Settled {
        if !self.seq.is_current(ticket) {
            debug!("dropping superseded response {:?}", ticket);
            return Settled::Stale;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                Settled::Committed
            }
            Err(err) => {
                self.error = Some(err.user_message());
                Settled::Failed(err)
            }
        }
    }

    /// Nothing was ever loaded and the last attempt failed.
    pub fn failed(&self) -> bool {
        self.data.is_none() && self.error.is_some()
    }
}

/// Inputs of the submission and edit forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Uploader,
    Filament,
    Grams,
    Link,
    Status,
}

/// Checks raw form input before anything is sent.
pub fn validate_print(
    name: &str,
    uploader: &str,
    filament_type_id: Option<i64>,
    grams: &str,
    link: &str,
) -> Result<PrintFields, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("a name is required".to_string()));
    }
    let uploader = uploader.trim();
    if uploader.is_empty() {
        return Err(ApiError::Validation("an uploader is required".to_string()));
    }
    let filament_type_id = filament_type_id
        .ok_or_else(|| ApiError::Validation("choose a filament type".to_string()))?;
    let grams: f64 = grams
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation("grams must be a number".to_string()))?;
    if !grams.is_finite() || grams < 0.0 {
        return Err(ApiError::Validation(
            "grams must not be negative".to_string(),
        ));
    }
    let link = link.trim();
    Ok(PrintFields {
        name: name.to_string(),
        uploader: uploader.to_string(),
        filament_type_id,
        filament_grams: grams,
        link: (!link.is_empty()).then(|| link.to_string()),
    })
}

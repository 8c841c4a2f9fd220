use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};

use super::{validate_print, Confirm, FormField, Panel, Settled};
use crate::api::Backend;
use crate::error::ApiError;
use crate::models::{FilamentType, PaymentStatus, Print, PrintFields, PrintFilters, SummaryRow};
use crate::session::Session;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminTab {
    #[default]
    Prints,
    Summary,
    Filaments,
}

/// Working copy of a print inside the edit modal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditDraft {
    pub id: i64,
    pub name: String,
    pub uploader: String,
    pub filament_type_id: Option<i64>,
    pub grams: String,
    pub link: String,
    pub status: PaymentStatus,
    pub error: Option<String>,
    pub saving: bool,
}

impl EditDraft {
    fn from_print(print: &Print) -> Self {
        Self {
            id: print.id,
            name: print.name.clone(),
            uploader: print.uploader.clone(),
            filament_type_id: Some(print.filament_type_id),
            grams: print.filament_grams.to_string(),
            link: print.link.clone().unwrap_or_default(),
            status: print.payment_status,
            error: None,
            saving: false,
        }
    }

    fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Uploader => self.uploader = value,
            FormField::Filament => self.filament_type_id = value.parse().ok(),
            FormField::Grams => self.grams = value,
            FormField::Link => self.link = value,
            FormField::Status => {
                if let Some(status) = PaymentStatus::from_wire(&value) {
                    self.status = status;
                }
            }
        }
    }

    pub fn validate(&self) -> Result<PrintFields, ApiError> {
        validate_print(
            &self.name,
            &self.uploader,
            self.filament_type_id,
            &self.grams,
            &self.link,
        )
    }
}

/// The filament form on the filaments tab; adds a new type unless
/// `editing` names an existing one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilamentDraft {
    pub editing: Option<i64>,
    pub name: String,
    pub price: String,
    pub error: Option<String>,
}

impl FilamentDraft {
    fn validate(&self) -> Result<(String, f64), ApiError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("a name is required".to_string()));
        }
        let price: f64 = self
            .price
            .trim()
            .parse()
            .map_err(|_| ApiError::Validation("price must be a number".to_string()))?;
        if !price.is_finite() || price < 0.0 {
            return Err(ApiError::Validation("price must not be negative".to_string()));
        }
        Ok((name.to_string(), price))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminState {
    /// Set once the stored token passed verification.
    pub ready: bool,
    pub tab: AdminTab,
    pub filters: PrintFilters,
    pub prints: Panel<Vec<Print>>,
    pub summary: Panel<Vec<SummaryRow>>,
    pub filaments: Panel<Vec<FilamentType>>,
    pub uploaders: Vec<String>,
    pub editor: Option<EditDraft>,
    pub new_filament: FilamentDraft,
    pub lightbox: Option<String>,
    /// Failure of the last grid action (toggle, delete, opening the editor).
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdminAction {
    Start,
    SelectTab(AdminTab),
    /// Empty means all uploaders.
    FilterUploader(String),
    /// Wire status value; empty means any status.
    FilterStatus(String),
    Refresh,
    OpenEditor(i64),
    Edit(FormField, String),
    SubmitEdit,
    CancelEdit,
    ToggleStatus { id: i64, to: PaymentStatus },
    DeletePrint(i64),
    NewFilamentName(String),
    NewFilamentPrice(String),
    EditFilament(i64),
    CancelFilamentEdit,
    SaveFilament,
    DeleteFilament(i64),
    ShowImage(String),
    CloseLightbox,
    DismissNotice,
    Logout,
}

pub struct AdminController {
    backend: Rc<dyn Backend>,
    session: Session,
    confirm: Rc<dyn Confirm>,
    state: RefCell<AdminState>,
    notify: Rc<dyn Fn()>,
}

impl AdminController {
    pub fn new(
        backend: Rc<dyn Backend>,
        session: Session,
        confirm: Rc<dyn Confirm>,
        notify: Rc<dyn Fn()>,
    ) -> Self {
        Self {
            backend,
            session,
            confirm,
            state: RefCell::new(AdminState::default()),
            notify,
        }
    }

    pub fn snapshot(&self) -> AdminState {
        self.state.borrow().clone()
    }

    fn update(&self, change: impl FnOnce(&mut AdminState)) {
        change(&mut self.state.borrow_mut());
        (self.notify)();
    }

    /// Ends the session on an auth failure; anything else is left to the
    /// caller's inline message.
    fn check_auth(&self, err: &ApiError) -> bool {
        if err.is_auth() {
            warn!("admin call rejected, ending session: {}", err);
            self.session.invalidate();
            true
        } else {
            false
        }
    }

    /// Returns false once an auth failure has ended the session.
    fn settled(&self, outcome: Settled) -> bool {
        let signed_in = match &outcome {
            Settled::Failed(err) => {
                warn!("admin panel failed to load: {}", err);
                !self.check_auth(err)
            }
            _ => true,
        };
        (self.notify)();
        signed_in
    }

    fn action_failed(&self, err: ApiError) {
        if !self.check_auth(&err) {
            self.update(|s| s.notice = Some(err.user_message()));
        }
    }

    pub async fn dispatch(&self, action: AdminAction) {
        match action {
            AdminAction::Start => self.start().await,
            AdminAction::SelectTab(tab) => {
                self.update(|s| s.tab = tab);
                match tab {
                    AdminTab::Prints => {}
                    AdminTab::Summary => {
                        self.load_summary().await;
                    }
                    AdminTab::Filaments => {
                        self.load_filaments().await;
                    }
                }
            }
            AdminAction::FilterUploader(uploader) => {
                let uploader = uploader.trim().to_string();
                self.update(|s| s.filters.uploader = (!uploader.is_empty()).then_some(uploader));
                self.load_prints().await;
            }
            AdminAction::FilterStatus(status) => {
                self.update(|s| s.filters.status = PaymentStatus::from_wire(&status));
                self.load_prints().await;
            }
            AdminAction::Refresh => {
                self.load_prints().await;
                self.load_summary().await;
            }
            AdminAction::OpenEditor(id) => self.open_editor(id).await,
            AdminAction::Edit(field, value) => self.update(|s| {
                if let Some(draft) = s.editor.as_mut() {
                    draft.set(field, value);
                }
            }),
            AdminAction::SubmitEdit => self.submit_edit().await,
            AdminAction::CancelEdit => self.update(|s| s.editor = None),
            AdminAction::ToggleStatus { id, to } => self.toggle(id, to).await,
            AdminAction::DeletePrint(id) => self.delete_print(id).await,
            AdminAction::NewFilamentName(name) => self.update(|s| s.new_filament.name = name),
            AdminAction::NewFilamentPrice(price) => self.update(|s| s.new_filament.price = price),
            AdminAction::EditFilament(id) => self.update(|s| {
                let found = s
                    .filaments
                    .data
                    .as_ref()
                    .and_then(|list| list.iter().find(|f| f.id == id).cloned());
                if let Some(filament) = found {
                    s.new_filament = FilamentDraft {
                        editing: Some(filament.id),
                        name: filament.name,
                        price: filament.price_per_kg.to_string(),
                        error: None,
                    };
                }
            }),
            AdminAction::CancelFilamentEdit => {
                self.update(|s| s.new_filament = FilamentDraft::default())
            }
            AdminAction::SaveFilament => self.save_filament().await,
            AdminAction::DeleteFilament(id) => self.delete_filament(id).await,
            AdminAction::ShowImage(path) => self.update(|s| s.lightbox = Some(path)),
            AdminAction::CloseLightbox => self.update(|s| s.lightbox = None),
            AdminAction::DismissNotice => self.update(|s| s.notice = None),
            AdminAction::Logout => {
                info!("signing out");
                self.session.sign_out();
            }
        }
    }

    async fn start(&self) {
        if self.session.ensure_authenticated().is_none() {
            return;
        }
        if !self.session.verify(self.backend.as_ref()).await {
            return;
        }
        self.update(|s| s.ready = true);
        let signed_in = self.load_summary().await
            && self.load_prints().await
            && self.load_uploaders().await
            && self.load_filaments().await;
        if !signed_in {
            info!("admin start stopped: session ended");
        }
    }

    async fn load_prints(&self) -> bool {
        let (ticket, filters) = {
            let mut state = self.state.borrow_mut();
            (state.prints.begin(), state.filters.clone())
        };
        (self.notify)();
        let result = self.backend.list_prints(&filters).await;
        let outcome = self.state.borrow_mut().prints.settle(ticket, result);
        self.settled(outcome)
    }

    async fn load_summary(&self) -> bool {
        let ticket = self.state.borrow_mut().summary.begin();
        (self.notify)();
        let result = self.backend.get_summary().await;
        let outcome = self.state.borrow_mut().summary.settle(ticket, result);
        self.settled(outcome)
    }

    async fn load_filaments(&self) -> bool {
        let ticket = self.state.borrow_mut().filaments.begin();
        (self.notify)();
        let result = self.backend.list_filaments().await;
        let outcome = self.state.borrow_mut().filaments.settle(ticket, result);
        self.settled(outcome)
    }

    /// Keeps the previous options on failure and surfaces the error in the
    /// notice above the filter bar.
    async fn load_uploaders(&self) -> bool {
        match self.backend.list_uploaders().await {
            Ok(uploaders) => {
                self.update(|s| s.uploaders = uploaders);
                true
            }
            Err(err) => {
                warn!("could not load uploaders: {}", err);
                if self.check_auth(&err) {
                    return false;
                }
                self.update(|s| {
                    s.notice = Some(format!("Uploader filter unavailable. {}", err.user_message()))
                });
                true
            }
        }
    }

    async fn open_editor(&self, id: i64) {
        let print = match self.backend.get_print(id).await {
            Ok(print) => print,
            Err(err) => return self.action_failed(err),
        };
        let filaments = match self.backend.list_filaments().await {
            Ok(filaments) => filaments,
            Err(err) => return self.action_failed(err),
        };
        self.update(|s| {
            s.filaments.data = Some(filaments);
            s.editor = Some(EditDraft::from_print(&print));
        });
    }

    async fn submit_edit(&self) {
        let Some(draft) = self.state.borrow().editor.clone() else {
            return;
        };
        let fields = match draft.validate() {
            Ok(fields) => fields,
            Err(err) => {
                return self.update(|s| {
                    if let Some(editor) = s.editor.as_mut() {
                        editor.error = Some(err.user_message());
                    }
                })
            }
        };
        self.update(|s| {
            if let Some(editor) = s.editor.as_mut() {
                editor.saving = true;
                editor.error = None;
            }
        });

        match self
            .backend
            .update_print(draft.id, &fields, draft.status)
            .await
        {
            Ok(print) => {
                info!("updated print {}", print.id);
                self.update(|s| s.editor = None);
                self.load_prints().await;
                self.load_summary().await;
                self.load_uploaders().await;
            }
            Err(err) => {
                if !self.check_auth(&err) {
                    self.update(|s| {
                        if let Some(editor) = s.editor.as_mut() {
                            editor.saving = false;
                            editor.error = Some(err.user_message());
                        }
                    });
                }
            }
        }
    }

    async fn toggle(&self, id: i64, to: PaymentStatus) {
        match self.backend.set_print_status(id, to).await {
            Ok(_) => {
                self.load_prints().await;
                self.load_summary().await;
            }
            Err(err) => self.action_failed(err),
        }
    }

    async fn delete_print(&self, id: i64) {
        if !self
            .confirm
            .confirm("Do you really want to delete this print?")
        {
            return;
        }
        match self.backend.delete_print(id).await {
            Ok(()) => {
                self.load_prints().await;
                self.load_summary().await;
                self.load_uploaders().await;
            }
            Err(err) => self.action_failed(err),
        }
    }

    async fn save_filament(&self) {
        let draft = self.state.borrow().new_filament.clone();
        let (name, price) = match draft.validate() {
            Ok(valid) => valid,
            Err(err) => return self.update(|s| s.new_filament.error = Some(err.user_message())),
        };
        let saved = match draft.editing {
            Some(id) => self.backend.update_filament(id, &name, price).await,
            None => self.backend.create_filament(&name, price).await,
        };
        match saved {
            Ok(filament) => {
                info!("saved filament {} ({})", filament.name, filament.id);
                self.update(|s| s.new_filament = FilamentDraft::default());
                self.load_filaments().await;
            }
            Err(err) => {
                if !self.check_auth(&err) {
                    self.update(|s| s.new_filament.error = Some(err.user_message()));
                }
            }
        }
    }

    async fn delete_filament(&self, id: i64) {
        if !self
            .confirm
            .confirm("Do you really want to delete this filament type?")
        {
            return;
        }
        match self.backend.delete_filament(id).await {
            Ok(()) => {
                self.update(|s| s.new_filament.error = None);
                self.load_filaments().await;
            }
            Err(ApiError::Conflict(detail)) => {
                warn!("filament {} not deleted: {}", id, detail);
                self.update(|s| {
                    s.new_filament.error =
                        Some("Could not delete this filament type. Is it still in use?".to_string())
                });
            }
            Err(err) => {
                if !self.check_auth(&err) {
                    self.update(|s| s.new_filament.error = Some(err.user_message()));
                }
            }
        }
    }
}

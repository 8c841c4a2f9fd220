//! In-memory doubles for the browser and the backend, used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::api::Backend;
use crate::controller::Confirm;
use crate::error::ApiError;
use crate::models::{
    AccessToken, DateRange, FilamentType, PaymentStatus, Print, PrintFields, PrintFilters,
    StatisticsBundle, SummaryRow,
};
use crate::session::{Navigator, Route, Session, TokenStore};

pub struct MemoryTokens {
    token: RefCell<Option<String>>,
}

impl MemoryTokens {
    pub fn new(token: Option<&str>) -> Self {
        Self {
            token: RefCell::new(token.map(str::to_string)),
        }
    }
}

impl TokenStore for MemoryTokens {
    fn load(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn save(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.borrow_mut() = None;
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: RefCell<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.borrow_mut().push(route);
    }
}

/// Answers every confirmation prompt with a fixed choice.
pub struct ScriptedConfirm {
    answer: Cell<bool>,
    asked: Cell<u32>,
}

impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer: Cell::new(answer),
            asked: Cell::new(0),
        }
    }

    pub fn asked(&self) -> u32 {
        self.asked.get()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, _message: &str) -> bool {
        self.asked.set(self.asked.get() + 1);
        self.answer.get()
    }
}

/// Everything a test needs around a controller.
pub struct Harness {
    pub backend: Rc<FakeBackend>,
    pub tokens: Rc<MemoryTokens>,
    pub navigator: Rc<RecordingNavigator>,
    pub session: Session,
    pub confirm: Rc<ScriptedConfirm>,
    pub redraws: Rc<Cell<u32>>,
}

impl Harness {
    pub fn new(token: Option<&str>) -> Self {
        let tokens = Rc::new(MemoryTokens::new(token));
        let navigator = Rc::new(RecordingNavigator::default());
        let session = Session::new(tokens.clone(), navigator.clone());
        Self {
            backend: Rc::new(FakeBackend::new(tokens.clone())),
            tokens,
            navigator,
            session,
            confirm: Rc::new(ScriptedConfirm::answering(true)),
            redraws: Rc::new(Cell::new(0)),
        }
    }

    pub fn signed_in() -> Self {
        Self::new(Some(FakeBackend::VALID_TOKEN))
    }

    pub fn notifier(&self) -> Rc<dyn Fn()> {
        let redraws = self.redraws.clone();
        Rc::new(move || redraws.set(redraws.get() + 1))
    }
}

#[derive(Default)]
struct FakeState {
    prints: Vec<Print>,
    filaments: Vec<FilamentType>,
    statistics: StatisticsBundle,
    next_id: i64,
    fail_listing: bool,
    fail_uploaders: bool,
    expire_after_verify: bool,
}

/// Backend double that enforces the same rules as the real server: auth on
/// admin endpoints, unique filament names, referenced filaments cannot be
/// deleted, price derived from grams and the filament rate.
pub struct FakeBackend {
    tokens: Rc<dyn TokenStore>,
    state: RefCell<FakeState>,
    calls: RefCell<Vec<String>>,
    gates: RefCell<VecDeque<oneshot::Receiver<()>>>,
}

impl FakeBackend {
    pub const VALID_TOKEN: &'static str = "valid-token";
    pub const PASSWORD: &'static str = "admin123";

    pub fn new(tokens: Rc<dyn TokenStore>) -> Self {
        Self {
            tokens,
            state: RefCell::new(FakeState {
                next_id: 1,
                ..FakeState::default()
            }),
            calls: RefCell::new(Vec::new()),
            gates: RefCell::new(VecDeque::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn prints(&self) -> Vec<Print> {
        self.state.borrow().prints.clone()
    }

    pub fn filaments(&self) -> Vec<FilamentType> {
        self.state.borrow().filaments.clone()
    }

    pub fn add_filament(&self, name: &str, price_per_kg: f64) -> i64 {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.filaments.push(FilamentType {
            id,
            name: name.to_string(),
            price_per_kg,
        });
        id
    }

    pub fn add_print(&self, name: &str, uploader: &str, filament_id: i64, grams: f64) -> i64 {
        let fields = PrintFields {
            name: name.to_string(),
            uploader: uploader.to_string(),
            filament_type_id: filament_id,
            filament_grams: grams,
            link: None,
        };
        self.insert_print(&fields, None).id
    }

    pub fn set_statistics(&self, bundle: StatisticsBundle) {
        self.state.borrow_mut().statistics = bundle;
    }

    pub fn fail_listing(&self, fail: bool) {
        self.state.borrow_mut().fail_listing = fail;
    }

    pub fn fail_uploaders(&self, fail: bool) {
        self.state.borrow_mut().fail_uploaders = fail;
    }

    /// The token passes the next `verify` and is rejected from then on.
    pub fn expire_after_verify(&self) {
        self.state.borrow_mut().expire_after_verify = true;
    }

    /// Makes the next `list_prints` call hold its answer until the returned
    /// sender fires (or is dropped).
    pub fn gate_next_listing(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().push_back(rx);
        tx
    }

    fn record(&self, call: &str) {
        self.calls.borrow_mut().push(call.to_string());
    }

    fn authorize(&self) -> Result<(), ApiError> {
        match self.tokens.load() {
            Some(token) if token == Self::VALID_TOKEN => Ok(()),
            _ => Err(ApiError::Auth("Invalid token".to_string())),
        }
    }

    fn priced(&self, fields: &PrintFields) -> Result<(f64, String, f64), ApiError> {
        let state = self.state.borrow();
        let filament = state
            .filaments
            .iter()
            .find(|f| f.id == fields.filament_type_id)
            .ok_or_else(|| ApiError::Validation("unknown filament type".to_string()))?;
        Ok((
            fields.filament_grams / 1000.0 * filament.price_per_kg,
            filament.name.clone(),
            filament.price_per_kg,
        ))
    }

    fn insert_print(&self, fields: &PrintFields, image_path: Option<String>) -> Print {
        let (price, filament_name, price_per_kg) = self.priced(fields).unwrap_or_default();
        let mut state = self.state.borrow_mut();
        let print = Print {
            id: state.next_id,
            name: fields.name.clone(),
            uploader: fields.uploader.clone(),
            filament_type_id: fields.filament_type_id,
            filament_grams: fields.filament_grams,
            price,
            link: fields.link.clone().filter(|l| !l.is_empty()),
            image_path,
            payment_status: PaymentStatus::Open,
            created_at: Some("2024-03-01 10:00:00".to_string()),
            filament_name: Some(filament_name),
            price_per_kg: Some(price_per_kg),
        };
        state.next_id += 1;
        state.prints.insert(0, print.clone());
        print
    }

    fn find_print(&self, id: i64) -> Result<Print, ApiError> {
        self.state
            .borrow()
            .prints
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Print not found".to_string()))
    }
}

#[async_trait(?Send)]
impl Backend for FakeBackend {
    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, ApiError> {
        self.record("login");
        if username == "admin" && password == Self::PASSWORD {
            Ok(AccessToken {
                access_token: Self::VALID_TOKEN.to_string(),
                token_type: Some("bearer".to_string()),
            })
        } else {
            Err(ApiError::Auth("Invalid credentials".to_string()))
        }
    }

    async fn verify(&self) -> Result<(), ApiError> {
        self.record("verify");
        self.authorize()?;
        if self.state.borrow().expire_after_verify {
            self.tokens.save("expired");
        }
        Ok(())
    }

    async fn list_prints(&self, filters: &PrintFilters) -> Result<Vec<Print>, ApiError> {
        self.record("list_prints");
        let answer = if self.state.borrow().fail_listing {
            Err(ApiError::Network("connection refused".to_string()))
        } else {
            Ok(self
                .state
                .borrow()
                .prints
                .iter()
                .filter(|p| filters.matches(p))
                .cloned()
                .collect())
        };
        let gate = self.gates.borrow_mut().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        answer
    }

    async fn get_print(&self, id: i64) -> Result<Print, ApiError> {
        self.record("get_print");
        self.find_print(id)
    }

    async fn create_print(
        &self,
        fields: &PrintFields,
        image: Option<web_sys::File>,
    ) -> Result<Print, ApiError> {
        self.record("create_print");
        self.priced(fields)?;
        let image_path = image.map(|_| "/uploads/upload.jpg".to_string());
        Ok(self.insert_print(fields, image_path))
    }

    async fn update_print(
        &self,
        id: i64,
        fields: &PrintFields,
        status: PaymentStatus,
    ) -> Result<Print, ApiError> {
        self.record("update_print");
        self.authorize()?;
        let (price, filament_name, price_per_kg) = self.priced(fields)?;
        let mut state = self.state.borrow_mut();
        let print = state
            .prints
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound("Print not found".to_string()))?;
        print.name = fields.name.clone();
        print.uploader = fields.uploader.clone();
        print.filament_type_id = fields.filament_type_id;
        print.filament_grams = fields.filament_grams;
        print.link = fields.link.clone();
        print.payment_status = status;
        print.price = price;
        print.filament_name = Some(filament_name);
        print.price_per_kg = Some(price_per_kg);
        Ok(print.clone())
    }

    async fn set_print_status(&self, id: i64, status: PaymentStatus) -> Result<Print, ApiError> {
        self.record("set_print_status");
        self.authorize()?;
        let mut state = self.state.borrow_mut();
        let print = state
            .prints
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound("Print not found".to_string()))?;
        print.payment_status = status;
        Ok(print.clone())
    }

    async fn delete_print(&self, id: i64) -> Result<(), ApiError> {
        self.record("delete_print");
        self.authorize()?;
        let mut state = self.state.borrow_mut();
        let before = state.prints.len();
        state.prints.retain(|p| p.id != id);
        if state.prints.len() == before {
            return Err(ApiError::NotFound("Print not found".to_string()));
        }
        Ok(())
    }

    async fn list_filaments(&self) -> Result<Vec<FilamentType>, ApiError> {
        self.record("list_filaments");
        let mut filaments = self.state.borrow().filaments.clone();
        filaments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(filaments)
    }

    async fn create_filament(
        &self,
        name: &str,
        price_per_kg: f64,
    ) -> Result<FilamentType, ApiError> {
        self.record("create_filament");
        self.authorize()?;
        if self.state.borrow().filaments.iter().any(|f| f.name == name) {
            return Err(ApiError::Conflict("UNIQUE constraint failed: filaments.name".to_string()));
        }
        let id = self.add_filament(name, price_per_kg);
        Ok(FilamentType {
            id,
            name: name.to_string(),
            price_per_kg,
        })
    }

    async fn update_filament(
        &self,
        id: i64,
        name: &str,
        price_per_kg: f64,
    ) -> Result<FilamentType, ApiError> {
        self.record("update_filament");
        self.authorize()?;
        let mut state = self.state.borrow_mut();
        if state.filaments.iter().any(|f| f.name == name && f.id != id) {
            return Err(ApiError::Conflict("UNIQUE constraint failed: filaments.name".to_string()));
        }
        let filament = state
            .filaments
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| ApiError::NotFound("Filament not found".to_string()))?;
        filament.name = name.to_string();
        filament.price_per_kg = price_per_kg;
        Ok(filament.clone())
    }

    async fn delete_filament(&self, id: i64) -> Result<(), ApiError> {
        self.record("delete_filament");
        self.authorize()?;
        let mut state = self.state.borrow_mut();
        if state.prints.iter().any(|p| p.filament_type_id == id) {
            return Err(ApiError::Conflict("FOREIGN KEY constraint failed".to_string()));
        }
        state.filaments.retain(|f| f.id != id);
        Ok(())
    }

    async fn list_uploaders(&self) -> Result<Vec<String>, ApiError> {
        self.record("list_uploaders");
        if self.state.borrow().fail_uploaders {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        let mut uploaders: Vec<String> = self
            .state
            .borrow()
            .prints
            .iter()
            .map(|p| p.uploader.clone())
            .collect();
        uploaders.sort();
        uploaders.dedup();
        Ok(uploaders)
    }

    async fn get_summary(&self) -> Result<Vec<SummaryRow>, ApiError> {
        self.record("get_summary");
        self.authorize()?;
        let state = self.state.borrow();
        let mut rows: Vec<SummaryRow> = Vec::new();
        for print in &state.prints {
            let index = match rows.iter().position(|r| r.uploader == print.uploader) {
                Some(index) => index,
                None => {
                    rows.push(SummaryRow {
                        uploader: print.uploader.clone(),
                        total_prints: 0,
                        open_amount: 0.0,
                        paid_amount: 0.0,
                        total_amount: 0.0,
                    });
                    rows.len() - 1
                }
            };
            let row = &mut rows[index];
            row.total_prints += 1;
            match print.payment_status {
                PaymentStatus::Open => row.open_amount += print.price,
                PaymentStatus::Paid => row.paid_amount += print.price,
            }
            row.total_amount += print.price;
        }
        rows.sort_by(|a, b| a.uploader.cmp(&b.uploader));
        Ok(rows)
    }

    async fn get_statistics(&self, _range: &DateRange) -> Result<StatisticsBundle, ApiError> {
        self.record("get_statistics");
        Ok(self.state.borrow().statistics.clone())
    }
}

use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};

use crate::api::Backend;
use crate::error::ApiError;
use crate::session::{Route, Session};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginAction {
    Username(String),
    Password(String),
    Submit,
    Back,
}

pub struct LoginController {
    backend: Rc<dyn Backend>,
    session: Session,
    state: RefCell<LoginState>,
    notify: Rc<dyn Fn()>,
}

impl LoginController {
    pub fn new(backend: Rc<dyn Backend>, session: Session, notify: Rc<dyn Fn()>) -> Self {
        Self {
            backend,
            session,
            state: RefCell::new(LoginState::default()),
            notify,
        }
    }

    pub fn snapshot(&self) -> LoginState {
        self.state.borrow().clone()
    }

    fn update(&self, change: impl FnOnce(&mut LoginState)) {
        change(&mut self.state.borrow_mut());
        (self.notify)();
    }

    pub async fn dispatch(&self, action: LoginAction) {
        match action {
            LoginAction::Username(value) => self.update(|s| s.username = value),
            LoginAction::Password(value) => self.update(|s| s.password = value),
            LoginAction::Submit => self.submit().await,
            LoginAction::Back => self.session.navigate(Route::Public),
        }
    }

    async fn submit(&self) {
        let (username, password) = {
            let state = self.state.borrow();
            (state.username.trim().to_string(), state.password.clone())
        };
        if username.is_empty() || password.is_empty() {
            return self
                .update(|s| s.error = Some("Please enter username and password.".to_string()));
        }
        self.update(|s| {
            s.busy = true;
            s.error = None;
        });

        match self.backend.login(&username, &password).await {
            Ok(token) => {
                info!("signed in as {}", username);
                self.session.sign_in(&token.access_token);
                self.update(|s| *s = LoginState::default());
                self.session.navigate(Route::Admin);
            }
            Err(err) => {
                warn!("login failed: {}", err);
                let message = match err {
                    ApiError::Auth(_) => "Invalid username or password.".to_string(),
                    other => other.user_message(),
                };
                self.update(|s| {
                    s.busy = false;
                    s.password.clear();
                    s.error = Some(message);
                });
            }
        }
    }
}

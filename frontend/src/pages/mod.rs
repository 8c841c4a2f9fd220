mod admin;
mod login;
mod public;
mod statistics;

use std::rc::Rc;

pub use admin::AdminPage;
pub use login::LoginPage;
pub use public::PublicPage;

use crate::api::Backend;
use crate::session::Session;

/// Session and backend handed to every page.
#[derive(Clone)]
pub struct AppContext {
    pub session: Session,
    pub backend: Rc<dyn Backend>,
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.backend) as *const (),
            Rc::as_ptr(&other.backend) as *const (),
        )
    }
}

#[derive(yew::Properties, PartialEq)]
pub struct PageProps {
    pub ctx: AppContext,
}

mod api;
mod charts;
mod components;
mod config;
mod controller;
mod error;
mod format;
mod models;
mod pages;
mod session;
#[cfg(test)]
mod testing;
mod view;

use std::rc::Rc;

use log::{error, info};
use yew::prelude::*;

use api::{Backend, HttpBackend};
use pages::{AdminPage, AppContext, LoginPage, PublicPage};
use session::{LocalStorageTokens, Navigator, Route, Session};

fn current_route() -> Route {
    web_sys::window()
        .and_then(|window| window.location().hash().ok())
        .map(|hash| Route::from_hash(&hash))
        .unwrap_or(Route::Public)
}

/// Switches the app's route state and mirrors it into the location hash.
struct HashNavigator {
    route: UseStateHandle<Route>,
}

impl Navigator for HashNavigator {
    fn navigate(&self, route: Route) {
        info!("navigating to {:?}", route);
        if let Some(window) = web_sys::window() {
            if window.location().set_hash(route.hash()).is_err() {
                error!("could not update location hash");
            }
        }
        self.route.set(route);
    }
}

#[function_component(App)]
fn app() -> Html {
    let route = use_state(current_route);

    let ctx = {
        let route = route.clone();
        use_memo(
            move |_| {
                let session = Session::new(
                    Rc::new(LocalStorageTokens),
                    Rc::new(HashNavigator { route }),
                );
                let backend: Rc<dyn Backend> = Rc::new(HttpBackend::new(session.tokens()));
                AppContext { session, backend }
            },
            (),
        )
    };
    let ctx = (*ctx).clone();

    match *route {
        Route::Public => html! { <PublicPage ctx={ctx} /> },
        Route::Login => html! { <LoginPage ctx={ctx} /> },
        Route::Admin => html! { <AdminPage ctx={ctx} /> },
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}

use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};

use super::{validate_print, FormField, Panel, Settled};
use crate::api::Backend;
use crate::format::format_currency;
use crate::models::{DateRange, FilamentType, Print, PrintFilters, StatisticsBundle};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PublicTab {
    #[default]
    Submit,
    Prints,
    Statistics,
}

/// The "submit a print" form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionDraft {
    pub name: String,
    pub uploader: String,
    pub filament_type_id: Option<i64>,
    pub grams: String,
    pub link: String,
    pub image: Option<web_sys::File>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub submitting: bool,
    /// Bumped on every reset so the file input can be re-created empty.
    pub generation: u32,
}

impl SubmissionDraft {
    fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Uploader => self.uploader = value,
            FormField::Filament => self.filament_type_id = value.parse().ok(),
            FormField::Grams => self.grams = value,
            FormField::Link => self.link = value,
            FormField::Status => {}
        }
    }

    fn reset(&mut self, success: String) {
        *self = SubmissionDraft {
            success: Some(success),
            generation: self.generation + 1,
            ..SubmissionDraft::default()
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublicState {
    pub tab: PublicTab,
    pub prints: Panel<Vec<Print>>,
    pub filaments: Panel<Vec<FilamentType>>,
    pub statistics: Panel<StatisticsBundle>,
    /// Date inputs as typed; applied on `ApplyRange`.
    pub range: DateRange,
    /// Increments whenever a fresh statistics bundle is committed, so the
    /// page knows to redraw its charts.
    pub stats_revision: u64,
    pub draft: SubmissionDraft,
    pub lightbox: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PublicAction {
    Start,
    SelectTab(PublicTab),
    Draft(FormField, String),
    AttachImage(Option<web_sys::File>),
    Submit,
    RangeStart(String),
    RangeEnd(String),
    ApplyRange,
    ResetRange,
    ShowImage(String),
    CloseLightbox,
}

fn non_blank(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

pub struct PublicController {
    backend: Rc<dyn Backend>,
    state: RefCell<PublicState>,
    notify: Rc<dyn Fn()>,
}

impl PublicController {
    pub fn new(backend: Rc<dyn Backend>, notify: Rc<dyn Fn()>) -> Self {
        Self {
            backend,
            state: RefCell::new(PublicState::default()),
            notify,
        }
    }

    pub fn snapshot(&self) -> PublicState {
        self.state.borrow().clone()
    }

    fn update(&self, change: impl FnOnce(&mut PublicState)) {
        change(&mut self.state.borrow_mut());
        (self.notify)();
    }

    fn settled(&self, what: &str, outcome: Settled) {
        if let Settled::Failed(err) = &outcome {
            warn!("could not load {}: {}", what, err);
        }
        (self.notify)();
    }

    pub async fn dispatch(&self, action: PublicAction) {
        match action {
            PublicAction::Start => {
                self.load_filaments().await;
                self.load_prints().await;
            }
            PublicAction::SelectTab(tab) => {
                self.update(|s| s.tab = tab);
                match tab {
                    PublicTab::Submit => {}
                    PublicTab::Prints => self.load_prints().await,
                    PublicTab::Statistics => self.load_statistics().await,
                }
            }
            PublicAction::Draft(field, value) => self.update(|s| {
                s.draft.set(field, value);
                s.draft.success = None;
            }),
            PublicAction::AttachImage(file) => self.update(|s| s.draft.image = file),
            PublicAction::Submit => self.submit().await,
            PublicAction::RangeStart(date) => self.update(|s| s.range.start = non_blank(date)),
            PublicAction::RangeEnd(date) => self.update(|s| s.range.end = non_blank(date)),
            PublicAction::ApplyRange => self.load_statistics().await,
            PublicAction::ResetRange => {
                self.update(|s| s.range = DateRange::default());
                self.load_statistics().await;
            }
            PublicAction::ShowImage(path) => self.update(|s| s.lightbox = Some(path)),
            PublicAction::CloseLightbox => self.update(|s| s.lightbox = None),
        }
    }

    async fn load_prints(&self) {
        let ticket = self.state.borrow_mut().prints.begin();
        (self.notify)();
        let result = self.backend.list_prints(&PrintFilters::default()).await;
        let outcome = self.state.borrow_mut().prints.settle(ticket, result);
        self.settled("prints", outcome);
    }

    async fn load_filaments(&self) {
        let ticket = self.state.borrow_mut().filaments.begin();
        (self.notify)();
        let result = self.backend.list_filaments().await;
        let outcome = self.state.borrow_mut().filaments.settle(ticket, result);
        self.settled("filaments", outcome);
    }

    async fn load_statistics(&self) {
        let (ticket, range) = {
            let mut state = self.state.borrow_mut();
            (state.statistics.begin(), state.range.clone())
        };
        (self.notify)();
        let result = self.backend.get_statistics(&range).await;
        let outcome = {
            let mut state = self.state.borrow_mut();
            let outcome = state.statistics.settle(ticket, result);
            if outcome == Settled::Committed {
                state.stats_revision += 1;
            }
            outcome
        };
        self.settled("statistics", outcome);
    }

    async fn submit(&self) {
        let (fields, image) = {
            let state = self.state.borrow();
            let draft = &state.draft;
            (
                validate_print(
                    &draft.name,
                    &draft.uploader,
                    draft.filament_type_id,
                    &draft.grams,
                    &draft.link,
                ),
                draft.image.clone(),
            )
        };
        let fields = match fields {
            Ok(fields) => fields,
            Err(err) => {
                return self.update(|s| {
                    s.draft.error = Some(err.user_message());
                    s.draft.success = None;
                })
            }
        };
        self.update(|s| {
            s.draft.submitting = true;
            s.draft.error = None;
        });

        match self.backend.create_print(&fields, image).await {
            Ok(print) => {
                info!("submitted print {} for {}", print.id, print.uploader);
                let message = format!(
                    "Print \"{}\" saved. Price: {}",
                    print.name,
                    format_currency(print.price)
                );
                self.update(|s| s.draft.reset(message));
                self.load_prints().await;
            }
            Err(err) => {
                warn!("submission failed: {}", err);
                self.update(|s| {
                    s.draft.submitting = false;
                    s.draft.error = Some(err.user_message());
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::models::{MonthlyCount, PaymentStatus, TotalStats};
    use crate::testing::Harness;
    use crate::view::{print_grid, status_badge, Grid, ImageSlot};

    fn controller(h: &Harness) -> PublicController {
        PublicController::new(h.backend.clone(), h.notifier())
    }

    fn fill(ctrl: &PublicController, field: FormField, value: &str) {
        block_on(ctrl.dispatch(PublicAction::Draft(field, value.to_string())));
    }

    #[test]
    fn vase_submission_appears_as_open_with_placeholder() {
        let h = Harness::new(None);
        let pla = h.backend.add_filament("PLA", 25.0);
        let ctrl = controller(&h);
        block_on(ctrl.dispatch(PublicAction::Start));
        assert_eq!(
            print_grid(&ctrl.snapshot().prints.data.unwrap()),
            Grid::Empty("No prints yet.")
        );

        fill(&ctrl, FormField::Name, "Vase");
        fill(&ctrl, FormField::Uploader, "Alex");
        fill(&ctrl, FormField::Filament, &pla.to_string());
        fill(&ctrl, FormField::Grams, "120");
        block_on(ctrl.dispatch(PublicAction::Submit));

        let state = ctrl.snapshot();
        assert_eq!(state.draft.success.as_deref(), Some("Print \"Vase\" saved. Price: CHF 3.00"));
        assert!(state.draft.name.is_empty());
        assert_eq!(state.draft.generation, 1);

        let Grid::Items(cards) = print_grid(&state.prints.data.unwrap()) else {
            panic!("listing should contain the new print");
        };
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Vase");
        assert_eq!(cards[0].image, ImageSlot::Placeholder);
        assert_eq!(cards[0].badge, status_badge(PaymentStatus::Open));
        assert_eq!(cards[0].price, "CHF 3.00");
    }

    #[test]
    fn invalid_submission_is_not_sent() {
        let h = Harness::new(None);
        let ctrl = controller(&h);
        fill(&ctrl, FormField::Name, "Vase");
        fill(&ctrl, FormField::Grams, "120");
        block_on(ctrl.dispatch(PublicAction::Submit));
        assert!(ctrl.snapshot().draft.error.is_some());
        assert!(h.backend.calls().is_empty());
    }

    #[test]
    fn statistics_refetch_on_every_activation() {
        let h = Harness::new(None);
        h.backend.set_statistics(StatisticsBundle {
            total_stats: TotalStats {
                total_prints: Some(3),
                ..TotalStats::default()
            },
            prints_per_month: vec![MonthlyCount {
                month: "2024-03".to_string(),
                count: 3,
            }],
            ..StatisticsBundle::default()
        });
        let ctrl = controller(&h);
        block_on(ctrl.dispatch(PublicAction::SelectTab(PublicTab::Statistics)));
        block_on(ctrl.dispatch(PublicAction::SelectTab(PublicTab::Submit)));
        block_on(ctrl.dispatch(PublicAction::SelectTab(PublicTab::Statistics)));

        let state = ctrl.snapshot();
        assert_eq!(state.tab, PublicTab::Statistics);
        assert_eq!(state.stats_revision, 2);
        assert_eq!(
            state.statistics.data.unwrap().total_stats.total_prints,
            Some(3)
        );
        assert_eq!(
            h.backend
                .calls()
                .iter()
                .filter(|c| *c == "get_statistics")
                .count(),
            2
        );
    }

    #[test]
    fn reset_range_clears_both_dates_and_refetches() {
        let h = Harness::new(None);
        let ctrl = controller(&h);
        block_on(ctrl.dispatch(PublicAction::RangeStart("2024-01-01".to_string())));
        block_on(ctrl.dispatch(PublicAction::RangeEnd("2024-06-30".to_string())));
        block_on(ctrl.dispatch(PublicAction::ApplyRange));
        assert_eq!(ctrl.snapshot().range.end.as_deref(), Some("2024-06-30"));

        block_on(ctrl.dispatch(PublicAction::ResetRange));
        let state = ctrl.snapshot();
        assert_eq!(state.range, DateRange::default());
        assert_eq!(state.stats_revision, 2);
    }

    #[test]
    fn listing_failure_shows_failed_state() {
        let h = Harness::new(None);
        h.backend.fail_listing(true);
        let ctrl = controller(&h);
        block_on(ctrl.dispatch(PublicAction::SelectTab(PublicTab::Prints)));
        let state = ctrl.snapshot();
        assert!(state.prints.failed());
        assert_eq!(state.prints.error.as_deref(), Some("Could not reach the server."));
    }

    #[test]
    fn lightbox_toggles() {
        let h = Harness::new(None);
        let ctrl = controller(&h);
        block_on(ctrl.dispatch(PublicAction::ShowImage("/uploads/a.png".to_string())));
        assert!(ctrl.snapshot().lightbox.is_some());
        block_on(ctrl.dispatch(PublicAction::CloseLightbox));
        assert!(ctrl.snapshot().lightbox.is_none());
    }
}

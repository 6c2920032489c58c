//! View controller: decides which screen is on display.
//!
//! A primary view is chosen from the top navigation; a secondary view is an
//! overlay reached through some other action and, while present, is what gets
//! rendered. Every operation here is total: it replaces `ViewState` wholesale and
//! cannot fail.

use log::debug;

/// Top-level tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimaryView {
    #[default]
    Home,
    Flashcards,
    Planner,
    Insights,
    AiTutor,
}

impl PrimaryView {
    /// Tab order in the navigation bar.
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::Flashcards,
        Self::Planner,
        Self::Insights,
        Self::AiTutor,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Flashcards => "Flashcards",
            Self::Planner => "Planner",
            Self::Insights => "Insights",
            Self::AiTutor => "AI Tutor",
        }
    }
}

/// Overlay screen, not reachable from the tab bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryView {
    Course,
    Creator,
    Timer,
    Settings,
    Integrations,
}

impl SecondaryView {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Course => "Course",
            Self::Creator => "Flashcard Creator",
            Self::Timer => "Study Timer",
            Self::Settings => "Settings",
            Self::Integrations => "Integrations",
        }
    }
}

/// The screen the render layer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveScreen {
    Primary(PrimaryView),
    Secondary(SecondaryView),
}

impl ActiveScreen {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary(v) => v.label(),
            Self::Secondary(v) => v.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub primary_view: PrimaryView,
    pub secondary_view: Option<SecondaryView>,
    pub selected_course_id: Option<String>,
}

impl ViewState {
    /// Overlay wins over the tab. Recomputed on every call.
    pub fn active_screen(&self) -> ActiveScreen {
        match self.secondary_view {
            Some(overlay) => ActiveScreen::Secondary(overlay),
            None => ActiveScreen::Primary(self.primary_view),
        }
    }

    /// Tab drawn as selected: Home while an overlay is up.
    pub fn nav_highlight(&self) -> PrimaryView {
        match self.secondary_view {
            Some(_) => PrimaryView::Home,
            None => self.primary_view,
        }
    }
}

/// A navigation request, one per controller operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NavigateToCourse(String),
    NavigateToFlashcards,
    NavigateToCreator,
    StartStudySession(String),
    BackToHome,
    OpenSettings,
    OpenIntegrations,
    ChangeMainView(PrimaryView),
    CloseOverlay,
}

/// One-shot message for the presentation layer (shown once, then dropped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: &'static str,
    pub description: &'static str,
}

const STUDY_SESSION_STARTED: Notification = Notification {
    title: "Starting study session",
    description: "Your study timer has been activated.",
};

#[derive(Debug, Default)]
pub struct ViewController {
    state: ViewState,
    notifications: Vec<Notification>,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn active_screen(&self) -> ActiveScreen {
        self.state.active_screen()
    }

    pub fn nav_highlight(&self) -> PrimaryView {
        self.state.nav_highlight()
    }

    pub fn selected_course_id(&self) -> Option<&str> {
        self.state.selected_course_id.as_deref()
    }

    pub fn navigate_to_course(&mut self, course_id: impl Into<String>) {
        let course_id = course_id.into();
        self.transition("navigate_to_course", |s| ViewState {
            secondary_view: Some(SecondaryView::Course),
            selected_course_id: Some(course_id),
            ..s
        });
    }

    pub fn navigate_to_flashcards(&mut self) {
        self.transition("navigate_to_flashcards", |s| ViewState {
            primary_view: PrimaryView::Flashcards,
            secondary_view: None,
            ..s
        });
    }

    pub fn navigate_to_creator(&mut self) {
        self.open_overlay("navigate_to_creator", SecondaryView::Creator);
    }

    /// Opens the timer. The course id is not kept in `ViewState`; the shell owns the timer.
    pub fn start_study_session(&mut self, course_id: &str) {
        debug!("Study session requested for course '{course_id}'");
        self.open_overlay("start_study_session", SecondaryView::Timer);
        self.notifications.push(STUDY_SESSION_STARTED);
    }

    /// Leaves `selected_course_id` as it was.
    pub fn back_to_home(&mut self) {
        self.change_main_view(PrimaryView::Home);
    }

    pub fn open_settings(&mut self) {
        self.open_overlay("open_settings", SecondaryView::Settings);
    }

    pub fn open_integrations(&mut self) {
        self.open_overlay("open_integrations", SecondaryView::Integrations);
    }

    pub fn change_main_view(&mut self, view: PrimaryView) {
        self.transition("change_main_view", |s| ViewState {
            primary_view: view,
            secondary_view: None,
            ..s
        });
    }

    pub fn close_overlay(&mut self) {
        self.transition("close_overlay", |s| ViewState {
            secondary_view: None,
            ..s
        });
    }

    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::NavigateToCourse(id) => self.navigate_to_course(id),
            Command::NavigateToFlashcards => self.navigate_to_flashcards(),
            Command::NavigateToCreator => self.navigate_to_creator(),
            Command::StartStudySession(id) => self.start_study_session(&id),
            Command::BackToHome => self.back_to_home(),
            Command::OpenSettings => self.open_settings(),
            Command::OpenIntegrations => self.open_integrations(),
            Command::ChangeMainView(view) => self.change_main_view(view),
            Command::CloseOverlay => self.close_overlay(),
        }
    }

    /// Drain pending notifications; each is returned exactly once.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn open_overlay(&mut self, op: &str, overlay: SecondaryView) {
        self.transition(op, |s| ViewState {
            secondary_view: Some(overlay),
            ..s
        });
    }

    fn transition(&mut self, op: &str, next: impl FnOnce(ViewState) -> ViewState) {
        let before = self.state.active_screen();
        self.state = next(std::mem::take(&mut self.state));
        debug!(
            "{op}: {:?} -> {:?} (course: {:?})",
            before,
            self.state.active_screen(),
            self.state.selected_course_id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OVERLAYS: [SecondaryView; 5] = [
        SecondaryView::Course,
        SecondaryView::Creator,
        SecondaryView::Timer,
        SecondaryView::Settings,
        SecondaryView::Integrations,
    ];

    #[test]
    fn starts_on_home() {
        let vc = ViewController::new();
        assert_eq!(vc.state(), &ViewState::default());
        assert_eq!(vc.active_screen(), ActiveScreen::Primary(PrimaryView::Home));
        assert_eq!(vc.selected_course_id(), None);
    }

    #[test]
    fn overlay_takes_precedence_over_every_tab() {
        for primary in PrimaryView::ALL {
            for overlay in OVERLAYS {
                let state = ViewState {
                    primary_view: primary,
                    secondary_view: Some(overlay),
                    selected_course_id: None,
                };
                assert_eq!(state.active_screen(), ActiveScreen::Secondary(overlay));
                assert_eq!(state.nav_highlight(), PrimaryView::Home);
            }
        }
    }

    #[test]
    fn change_main_view_is_idempotent() {
        for view in PrimaryView::ALL {
            let mut once = ViewController::new();
            once.open_settings();
            once.change_main_view(view);

            let mut twice = ViewController::new();
            twice.open_settings();
            twice.change_main_view(view);
            twice.change_main_view(view);

            assert_eq!(once.state(), twice.state());
            assert_eq!(twice.nav_highlight(), view);
        }
    }

    #[test]
    fn course_selection_survives_creator() {
        let mut vc = ViewController::new();
        vc.navigate_to_course("c1");
        vc.navigate_to_creator();
        assert_eq!(vc.selected_course_id(), Some("c1"));
        assert_eq!(
            vc.active_screen(),
            ActiveScreen::Secondary(SecondaryView::Creator)
        );
    }

    #[test]
    fn back_to_home_resets_views_from_any_state() {
        let setups: [fn(&mut ViewController); 4] = [
            |vc| vc.navigate_to_course("crn4020"),
            |vc| vc.change_main_view(PrimaryView::Insights),
            |vc| {
                vc.navigate_to_flashcards();
                vc.open_settings();
            },
            |vc| vc.start_study_session("cop4600"),
        ];
        for setup in setups {
            let mut vc = ViewController::new();
            setup(&mut vc);
            vc.back_to_home();
            assert_eq!(vc.state().primary_view, PrimaryView::Home);
            assert_eq!(vc.state().secondary_view, None);
        }
    }

    // Observed behavior, kept on purpose: going home remembers the last course.
    #[test]
    fn back_to_home_keeps_selected_course() {
        let mut vc = ViewController::new();
        vc.navigate_to_course("crn4020");
        vc.back_to_home();
        assert_eq!(vc.selected_course_id(), Some("crn4020"));
    }

    #[test]
    fn course_then_flashcards_scenario() {
        let mut vc = ViewController::new();
        vc.navigate_to_course("crn4020");
        assert_eq!(
            vc.state(),
            &ViewState {
                primary_view: PrimaryView::Home,
                secondary_view: Some(SecondaryView::Course),
                selected_course_id: Some("crn4020".into()),
            }
        );

        vc.navigate_to_flashcards();
        assert_eq!(
            vc.state(),
            &ViewState {
                primary_view: PrimaryView::Flashcards,
                secondary_view: None,
                selected_course_id: Some("crn4020".into()),
            }
        );
    }

    #[test]
    fn study_session_notifies_once_and_drops_course_id() {
        let mut vc = ViewController::new();
        vc.start_study_session("cis4930");
        assert_eq!(vc.active_screen(), ActiveScreen::Secondary(SecondaryView::Timer));
        assert_eq!(vc.selected_course_id(), None);

        let first = vc.take_notifications();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].title, "Starting study session");
        assert!(vc.take_notifications().is_empty());
    }

    #[test]
    fn close_overlay_returns_to_tab() {
        let mut vc = ViewController::new();
        vc.change_main_view(PrimaryView::Planner);
        vc.open_settings();
        vc.open_integrations();
        assert_eq!(
            vc.active_screen(),
            ActiveScreen::Secondary(SecondaryView::Integrations)
        );
        vc.close_overlay();
        assert_eq!(vc.active_screen(), ActiveScreen::Primary(PrimaryView::Planner));
    }

    #[test]
    fn dispatch_routes_commands() {
        let mut direct = ViewController::new();
        direct.navigate_to_course("eng102");
        direct.navigate_to_creator();
        direct.change_main_view(PrimaryView::AiTutor);

        let mut routed = ViewController::new();
        for cmd in [
            Command::NavigateToCourse("eng102".into()),
            Command::NavigateToCreator,
            Command::ChangeMainView(PrimaryView::AiTutor),
        ] {
            routed.dispatch(cmd);
        }
        assert_eq!(direct.state(), routed.state());
    }
}

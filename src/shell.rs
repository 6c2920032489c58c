//! Terminal shell: draws whatever the view controller says is active, styled by
//! the theme engine.
//!
//! `App` is stored as cursive user data. Buttons never touch the screen directly;
//! they dispatch a `Command` (or call a theme setter) and then `refresh`, which
//! rebuilds the single screen layer from current state. Nothing is cached between
//! refreshes.

use chrono::{Local, NaiveDateTime};
use cursive::Cursive;
use cursive::event::Key;
use cursive::theme::ColorStyle;
use cursive::traits::*;
use cursive::utils::markup::StyledString;
use cursive::views::{
    Button, Checkbox, Dialog, DummyView, EditView, LinearLayout, SelectView, TextView,
};

use log::{debug, info, warn};

use crate::course_colors::{self, CourseColors, DEFAULT_COURSES};
use crate::study_time::{StudyLog, StudyTimer, format_duration};
use crate::theme::customization::{
    CardStyle, Customization, FontFamily, FontSize, Palette, Spacing,
};
use crate::theme::{ThemeEngine, terminal_color};
use crate::view::{ActiveScreen, Command, PrimaryView, SecondaryView, ViewController};

/// Everything the shell owns for one running instance.
pub struct App {
    pub view: ViewController,
    pub theme: ThemeEngine,
    pub courses: CourseColors,
    pub study: StudyLog,
    /// Running study timer, if the timer screen was opened with a course.
    pub timer: Option<StudyTimer>,
}

impl App {
    pub fn new(theme: ThemeEngine) -> Self {
        Self {
            view: ViewController::new(),
            theme,
            courses: CourseColors::default(),
            study: StudyLog::default(),
            timer: None,
        }
    }
}

/// Install `app`, bind global keys and draw the first screen.
pub fn launch(siv: &mut Cursive, app: App) {
    siv.set_user_data(app);

    siv.add_global_callback('q', |s| s.quit());
    siv.add_global_callback('h', |s| navigate(s, Command::BackToHome));
    siv.add_global_callback('s', |s| navigate(s, Command::OpenSettings));
    siv.add_global_callback(Key::Esc, |s| navigate(s, Command::CloseOverlay));

    refresh(siv);
}

impl App {
    /// Dispatch `command`. Starting a study session starts a timer; leaving the
    /// timer screen any way other than `stop_timer` discards it.
    fn apply(&mut self, command: Command, now: NaiveDateTime) {
        if let Command::StartStudySession(course_id) = &command {
            self.timer = Some(StudyTimer::start(course_id, now));
        }
        self.view.dispatch(command);
        if self.view.active_screen() != ActiveScreen::Secondary(SecondaryView::Timer) {
            if let Some(timer) = self.timer.take() {
                debug!("Timer for '{}' discarded", timer.course_id());
            }
        }
    }

    /// Record the running timer as a session and close the timer screen.
    fn stop_timer(&mut self, now: NaiveDateTime) {
        if let Some(timer) = self.timer.take() {
            self.study.record(timer.stop(now));
        }
        self.apply(Command::CloseOverlay, now);
    }
}

fn navigate(siv: &mut Cursive, command: Command) {
    let now = Local::now().naive_local();
    siv.with_user_data(|app: &mut App| app.apply(command, now));
    refresh(siv);
}

fn stop_timer(siv: &mut Cursive) {
    let now = Local::now().naive_local();
    siv.with_user_data(|app: &mut App| app.stop_timer(now));
    refresh(siv);
}

fn adjust_theme(siv: &mut Cursive, edit: impl FnOnce(&mut ThemeEngine)) {
    siv.with_user_data(|app: &mut App| edit(&mut app.theme));
    refresh(siv);
}

fn adjust_courses(siv: &mut Cursive, edit: impl FnOnce(&mut CourseColors)) {
    siv.with_user_data(|app: &mut App| edit(&mut app.courses));
    refresh(siv);
}

/// Re-apply the theme and rebuild the screen layer, then surface notifications.
fn refresh(siv: &mut Cursive) {
    let Some(app) = siv.user_data::<App>() else {
        return;
    };
    debug!("Rendering {:?}", app.view.state());
    let theme = app.theme.terminal_theme();
    let notifications = app.view.take_notifications();
    let screen = render(app);

    siv.set_theme(theme);
    while siv.pop_layer().is_some() {}
    siv.add_layer(screen);

    for n in notifications {
        info!("Notification: {}", n.title);
        siv.add_layer(
            Dialog::text(n.description)
                .title(n.title)
                .dismiss_button("OK"),
        );
    }
}

fn render(app: &App) -> Dialog {
    let screen = app.view.active_screen();
    let pad = app.theme.state().customization.spacing.padding();

    let body = LinearLayout::vertical()
        .child(nav_bar(app.view.nav_highlight()))
        .child(DummyView)
        .child(screen_body(app, screen))
        .child(DummyView)
        .child(TextView::new(format!(
            "[q] quit  [h] home  [s] settings  [esc] close    {}",
            app.theme.tokens().root_class
        )));

    Dialog::around(body)
        .title(format!("Tailored - {}", screen.label()))
        .padding_lrtb(pad * 2, pad * 2, pad, pad)
}

fn nav_bar(highlight: PrimaryView) -> LinearLayout {
    let mut bar = LinearLayout::horizontal();
    for view in PrimaryView::ALL {
        let label = if view == highlight {
            format!("[{}]", view.label())
        } else {
            view.label().to_string()
        };
        bar.add_child(Button::new_raw(
            format!(" {label} "),
            move |s| navigate(s, Command::ChangeMainView(view)),
        ));
    }
    bar.add_child(DummyView.full_width());
    bar.add_child(Button::new("Settings", |s| navigate(s, Command::OpenSettings)));
    bar
}

fn screen_body(app: &App, screen: ActiveScreen) -> LinearLayout {
    match screen {
        ActiveScreen::Primary(PrimaryView::Home) => home(),
        ActiveScreen::Primary(PrimaryView::Flashcards) => placeholder(
            "Review the flashcards generated from your course material.",
            ("Back", Command::BackToHome),
        ),
        ActiveScreen::Primary(PrimaryView::Planner) => placeholder(
            "Upcoming assignments and study blocks for the week.",
            ("Home", Command::BackToHome),
        ),
        ActiveScreen::Primary(PrimaryView::Insights) => insights(app),
        ActiveScreen::Primary(PrimaryView::AiTutor) => placeholder(
            "Ask the tutor about anything in your enrolled courses.",
            ("Back", Command::BackToHome),
        ),
        ActiveScreen::Secondary(SecondaryView::Course) => course(app),
        ActiveScreen::Secondary(SecondaryView::Creator) => creator(app),
        ActiveScreen::Secondary(SecondaryView::Timer) => timer(app),
        ActiveScreen::Secondary(SecondaryView::Settings) => settings(app),
        ActiveScreen::Secondary(SecondaryView::Integrations) => placeholder(
            "Connect Canvas, calendars and note apps.",
            ("Done", Command::CloseOverlay),
        ),
    }
}

fn placeholder(text: &str, (label, command): (&str, Command)) -> LinearLayout {
    LinearLayout::vertical()
        .child(TextView::new(text))
        .child(DummyView)
        .child(Button::new(label, move |s| navigate(s, command.clone())))
}

fn home() -> LinearLayout {
    let courses = SelectView::<String>::new()
        .with_all(DEFAULT_COURSES.iter().map(|(id, _)| (id.to_uppercase(), (*id).to_string())))
        .on_submit(|s, id: &String| navigate(s, Command::NavigateToCourse(id.clone())))
        .with_name("courses");

    LinearLayout::vertical()
        .child(TextView::new("Your courses (enter to open):"))
        .child(courses)
        .child(DummyView)
        .child(
            LinearLayout::horizontal()
                .child(Button::new("Start study session", |s| {
                    let course = s
                        .call_on_name("courses", |v: &mut SelectView<String>| v.selection())
                        .flatten()
                        .map(|id| (*id).clone())
                        .unwrap_or_default();
                    navigate(s, Command::StartStudySession(course));
                }))
                .child(DummyView)
                .child(Button::new("Flashcards", |s| {
                    navigate(s, Command::NavigateToFlashcards)
                })),
        )
}

fn course(app: &App) -> LinearLayout {
    let id = app.view.selected_course_id().unwrap_or_default().to_string();
    let color = app.courses.color(&id);
    let heading = StyledString::styled(
        format!(" {} ", id.to_uppercase()),
        ColorStyle::new(terminal_color(&color.foreground), terminal_color(&color.primary)),
    );
    // Tinted card strip below the heading.
    let strip = StyledString::styled(
        format!(" {} ", color.primary),
        ColorStyle::new(terminal_color(&color.dark), terminal_color(&color.light)),
    );

    let preset_id = id.clone();
    let presets = SelectView::<&'static str>::new()
        .popup()
        .with_all(course_colors::preset_names().map(|n| (course_colors::preset_display_name(n), n)))
        .on_submit(move |s, name: &&'static str| {
            let (id, name) = (preset_id.clone(), *name);
            adjust_courses(s, move |c| {
                c.set_preset(&id, name);
            });
        });

    let reset_id = id.clone();
    let study_id = id;
    LinearLayout::vertical()
        .child(TextView::new(heading))
        .child(TextView::new(strip))
        .child(DummyView)
        .child(
            LinearLayout::horizontal()
                .child(TextView::new("Course color  "))
                .child(presets)
                .child(DummyView)
                .child(Button::new("Reset", move |s| {
                    let id = reset_id.clone();
                    adjust_courses(s, move |c| c.reset(&id));
                })),
        )
        .child(DummyView)
        .child(
            LinearLayout::horizontal()
                .child(Button::new("Flashcards", |s| {
                    navigate(s, Command::NavigateToFlashcards)
                }))
                .child(Button::new("Create", |s| navigate(s, Command::NavigateToCreator)))
                .child(Button::new("Study", move |s| {
                    navigate(s, Command::StartStudySession(study_id.clone()))
                }))
                .child(Button::new("Back", |s| navigate(s, Command::BackToHome))),
        )
}

fn timer(app: &App) -> LinearLayout {
    let today = Local::now().date_naive();
    let status = match &app.timer {
        Some(t) => format!(
            "Studying {} since {}. Stay focused!",
            t.course_id().to_uppercase(),
            t.started().format("%H:%M")
        ),
        None => "No study timer running.".to_string(),
    };
    LinearLayout::vertical()
        .child(TextView::new(status))
        .child(TextView::new(format!(
            "Studied today: {}",
            format_duration(app.study.today_seconds(today))
        )))
        .child(TextView::new(match app.study.sessions().last() {
            Some(last) => format!(
                "Last session: {} {}-{}",
                last.course_name,
                last.start.format("%H:%M"),
                last.end.format("%H:%M")
            ),
            None => String::new(),
        }))
        .child(DummyView)
        .child(
            LinearLayout::horizontal()
                .child(Button::new("Stop", stop_timer))
                .child(Button::new("Discard", |s| navigate(s, Command::CloseOverlay))),
        )
}

fn insights(app: &App) -> LinearLayout {
    let today = Local::now().date_naive();
    let total = app.study.month_total(today);

    let mut layout = LinearLayout::vertical()
        .child(TextView::new(format!(
            "This month: {:.1} h over {} sessions   Today: {}   Streak: {} days",
            total.hours,
            total.sessions,
            format_duration(app.study.today_seconds(today)),
            app.study.streak(today)
        )))
        .child(DummyView)
        .child(TextView::new("By course"));

    let by_course = app.study.hours_by_course(today);
    if by_course.is_empty() {
        layout.add_child(TextView::new("  Nothing logged this month."));
    }
    for c in by_course {
        let color = app.courses.color(&c.course_id);
        let mut line = StyledString::styled(
            format!(" {:<8} ", c.course_name),
            ColorStyle::new(terminal_color(&color.foreground), terminal_color(&color.primary)),
        );
        line.append_plain(format!(" {:.1} h", c.hours));
        layout.add_child(TextView::new(line));
    }

    layout.add_child(DummyView);
    layout.add_child(TextView::new("Last 7 days"));
    for d in app.study.weekly_hours(today) {
        // One block per half hour.
        let bar = "#".repeat((d.hours * 2.0).round() as usize);
        layout.add_child(TextView::new(format!(
            "  {} {} {:>4.1} {bar}",
            d.day,
            d.date.format("%m-%d"),
            d.hours
        )));
    }

    layout.add_child(DummyView);
    layout.add_child(TextView::new("Activity"));
    for share in app.study.activity_distribution(today) {
        let mut line = StyledString::styled("  ", ColorStyle::back(terminal_color(share.kind.color())));
        line.append_plain(format!(" {:<17} {:>3}%", share.kind.label(), share.percent));
        layout.add_child(TextView::new(line));
    }

    layout.add_child(DummyView);
    layout.add_child(
        LinearLayout::horizontal()
            .child(Button::new("Home", |s| navigate(s, Command::BackToHome)))
            .child(Button::new("Clear log", |s| {
                s.with_user_data(|app: &mut App| app.study.clear());
                refresh(s);
            })),
    );
    layout
}

fn creator(app: &App) -> LinearLayout {
    let target = app.view.selected_course_id().unwrap_or("no course");
    LinearLayout::vertical()
        .child(TextView::new(format!("New flashcards for {target}.")))
        .child(DummyView)
        .child(
            LinearLayout::horizontal()
                .child(Button::new("View flashcards", |s| {
                    navigate(s, Command::NavigateToFlashcards)
                }))
                .child(Button::new("Back", |s| navigate(s, Command::CloseOverlay))),
        )
}

/// Label + control on one line.
fn row(label: &str, control: impl View) -> LinearLayout {
    LinearLayout::horizontal()
        .child(TextView::new(format!("{label:<16}")))
        .child(control)
}

/// Popup selector over a closed enum, pre-selected on `current`.
fn choice<T>(
    all: &[T],
    current: T,
    label: fn(T) -> &'static str,
    apply: fn(&mut ThemeEngine, T),
) -> SelectView<T>
where
    T: Copy + PartialEq + Send + Sync + 'static,
{
    let selected = all.iter().position(|v| *v == current).unwrap_or(0);
    SelectView::<T>::new()
        .popup()
        .with_all(all.iter().map(|v| (label(*v), *v)))
        .selected(selected)
        .on_submit(move |s, v: &T| {
            let v = *v;
            adjust_theme(s, move |t| apply(t, v));
        })
}

fn settings(app: &App) -> LinearLayout {
    let state = app.theme.state();
    let c = &state.customization;
    let tokens = app.theme.tokens();

    let accent = EditView::new()
        .content(c.accent_color.clone())
        .on_submit(|s, _| apply_accent(s))
        .with_name("accent")
        .fixed_width(10);

    LinearLayout::vertical()
        .child(row(
            "Color theme",
            choice(&Palette::ALL, state.palette, Palette::label, ThemeEngine::set_palette),
        ))
        .child(row(
            "Dark mode",
            Checkbox::new()
                .with_checked(state.dark_mode)
                .on_change(|s, on| adjust_theme(s, move |t| t.set_dark_mode(on))),
        ))
        .child(row(
            "Font size",
            choice(&FontSize::ALL, c.font_size, FontSize::label, ThemeEngine::set_font_size),
        ))
        .child(row(
            "Font family",
            choice(
                &FontFamily::ALL,
                c.font_family,
                FontFamily::label,
                ThemeEngine::set_font_family,
            ),
        ))
        .child(row(
            "Card style",
            choice(&CardStyle::ALL, c.card_style, CardStyle::label, ThemeEngine::set_card_style),
        ))
        .child(row(
            "Spacing",
            choice(&Spacing::ALL, c.spacing, Spacing::label, ThemeEngine::set_spacing),
        ))
        .child(DummyView)
        .child(row(
            "Accent color",
            LinearLayout::horizontal()
                .child(accent)
                .child(Button::new("Apply", apply_accent))
                .child(Button::new("Reset", |s| {
                    adjust_theme(s, ThemeEngine::reset_accent_color)
                })),
        ))
        .child(TextView::new("").with_name("accent_error"))
        .child(TextView::new(format!(
            "classes: {}",
            tokens.style_classes.iter().collect::<Vec<_>>().join(" ")
        )))
        .child(TextView::new(
            tokens
                .css_variables
                .iter()
                .map(|(name, value)| format!("{name}: {value}"))
                .collect::<Vec<_>>()
                .join("\n"),
        ))
        .child(DummyView)
        .child(
            LinearLayout::horizontal()
                .child(Button::new("Integrations", |s| {
                    navigate(s, Command::OpenIntegrations)
                }))
                .child(Button::new("Defaults", |s| {
                    adjust_theme(s, |t| {
                        if let Err(e) = t.set_customization(Customization::default()) {
                            warn!("Could not restore default appearance: {e}");
                        }
                    })
                }))
                .child(Button::new("Reset course colors", |s| {
                    adjust_courses(s, CourseColors::reset_all)
                }))
                .child(Button::new("Close", |s| navigate(s, Command::CloseOverlay))),
        )
}

/// Read the accent field; on rejection keep the screen and show why.
fn apply_accent(siv: &mut Cursive) {
    let Some(input) = siv.call_on_name("accent", |v: &mut EditView| v.get_content()) else {
        return;
    };
    match siv.with_user_data(|app: &mut App| app.theme.set_accent_color(&input)) {
        Some(Ok(())) => refresh(siv),
        Some(Err(e)) => {
            siv.call_on_name("accent_error", |v: &mut TextView| {
                v.set_content(e.to_string())
            });
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn nine_am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .unwrap()
    }

    fn app() -> App {
        App::new(ThemeEngine::default())
    }

    #[test]
    fn stop_records_session_for_started_course() {
        let mut app = app();
        app.apply(Command::NavigateToCourse("crn4020".into()), nine_am());
        app.apply(Command::StartStudySession("cop4600".into()), nine_am());
        assert_eq!(app.timer.as_ref().map(StudyTimer::course_id), Some("cop4600"));
        // The view keeps the course that was browsed, not the one being timed.
        assert_eq!(app.view.selected_course_id(), Some("crn4020"));

        app.stop_timer(nine_am() + Duration::minutes(45));
        assert!(app.timer.is_none());
        assert_eq!(app.view.active_screen(), ActiveScreen::Primary(PrimaryView::Home));

        let sessions = app.study.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].course_id, "cop4600");
        assert_eq!(sessions[0].duration_secs, 45 * 60);
    }

    #[test]
    fn leaving_timer_screen_discards_timer() {
        let mut app = app();
        app.apply(Command::StartStudySession("eng102".into()), nine_am());
        app.apply(Command::OpenSettings, nine_am());
        assert!(app.timer.is_none());

        app.apply(Command::StartStudySession("eng102".into()), nine_am());
        app.apply(Command::CloseOverlay, nine_am());
        assert!(app.timer.is_none());
        assert!(app.study.sessions().is_empty());
    }

    #[test]
    fn stop_without_timer_only_closes() {
        let mut app = app();
        app.apply(Command::OpenSettings, nine_am());
        app.stop_timer(nine_am());
        assert!(app.study.sessions().is_empty());
        assert_eq!(app.view.active_screen(), ActiveScreen::Primary(PrimaryView::Home));
    }
}

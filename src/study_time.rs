//! Study time log and the aggregates shown on the Insights screen.
//!
//! Sessions are kept in memory for the lifetime of the app. Every aggregate takes
//! `today` explicitly; the shell passes `chrono::Local::now().date_naive()`.

use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use log::{debug, info};

/// How the time was spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Timer,
    Flashcard,
    Quiz,
    Reading,
    Manual,
}

impl ActivityKind {
    pub const ALL: [Self; 5] = [
        Self::Timer,
        Self::Flashcard,
        Self::Quiz,
        Self::Reading,
        Self::Manual,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Timer => "Study Timer",
            Self::Flashcard => "Flashcards",
            Self::Quiz => "Practice Quizzes",
            Self::Reading => "Reading",
            Self::Manual => "Manual Entry",
        }
    }

    /// Chart color for this activity.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Timer => "#2563EB",
            Self::Flashcard => "#D97706",
            Self::Quiz => "#C084FC",
            Self::Reading => "#059669",
            Self::Manual => "#EAB308",
        }
    }
}

/// One finished block of study.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySession {
    pub course_id: String,
    pub course_name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_secs: u64,
    pub kind: ActivityKind,
    /// Calendar day the session is credited to (the day it ended).
    pub date: NaiveDate,
}

impl StudySession {
    pub fn new(
        course_id: &str,
        course_name: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        kind: ActivityKind,
    ) -> Self {
        let duration_secs = u64::try_from((end - start).num_seconds()).unwrap_or(0);
        Self {
            course_id: course_id.to_string(),
            course_name: course_name.to_string(),
            start,
            end,
            duration_secs,
            kind,
            date: end.date(),
        }
    }
}

/// A running study timer. Stopping it yields the session to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyTimer {
    course_id: String,
    started: NaiveDateTime,
}

impl StudyTimer {
    pub fn start(course_id: &str, now: NaiveDateTime) -> Self {
        debug!("Timer started for '{course_id}' at {now}");
        Self {
            course_id: course_id.to_string(),
            started: now,
        }
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn started(&self) -> NaiveDateTime {
        self.started
    }

    pub fn stop(self, now: NaiveDateTime) -> StudySession {
        let name = self.course_id.to_uppercase();
        StudySession::new(&self.course_id, &name, self.started, now, ActivityKind::Timer)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseHours {
    pub course_id: String,
    pub course_name: String,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayHours {
    /// Short weekday name, e.g. `Mon`.
    pub day: String,
    pub date: NaiveDate,
    pub hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthTotal {
    pub hours: f64,
    pub sessions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityShare {
    pub kind: ActivityKind,
    /// Rounded percentage of this month's study seconds.
    pub percent: u8,
}

/// Seconds to hours, rounded to one decimal.
pub fn round_hours(secs: u64) -> f64 {
    (secs as f64 / 3600.0 * 10.0).round() / 10.0
}

/// `1h 05m` / `12m`.
pub fn format_duration(secs: u64) -> String {
    let (hours, mins) = (secs / 3600, (secs % 3600) / 60);
    if hours > 0 {
        format!("{hours}h {mins:02}m")
    } else {
        format!("{mins}m")
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudyLog {
    sessions: Vec<StudySession>,
}

impl StudyLog {
    pub fn sessions(&self) -> &[StudySession] {
        &self.sessions
    }

    pub fn record(&mut self, session: StudySession) {
        info!(
            "Recorded {} of {:?} for {}",
            format_duration(session.duration_secs),
            session.kind,
            session.course_id
        );
        self.sessions.push(session);
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    // Sessions that started in the same calendar month as `today`.
    fn month(&self, today: NaiveDate) -> impl Iterator<Item = &StudySession> {
        self.sessions.iter().filter(move |s| {
            s.start.year() == today.year() && s.start.month() == today.month()
        })
    }

    fn seconds_on(&self, date: NaiveDate) -> u64 {
        self.sessions
            .iter()
            .filter(|s| s.date == date)
            .map(|s| s.duration_secs)
            .sum()
    }

    /// Hours per course this month, in order of first appearance.
    pub fn hours_by_course(&self, today: NaiveDate) -> Vec<CourseHours> {
        let mut totals: Vec<(&StudySession, u64)> = Vec::new();
        for session in self.month(today) {
            match totals.iter_mut().find(|(s, _)| s.course_id == session.course_id) {
                Some((_, secs)) => *secs += session.duration_secs,
                None => totals.push((session, session.duration_secs)),
            }
        }
        totals
            .into_iter()
            .map(|(s, secs)| CourseHours {
                course_id: s.course_id.clone(),
                course_name: s.course_name.clone(),
                hours: round_hours(secs),
            })
            .collect()
    }

    /// The seven days ending at `today`, oldest first.
    pub fn weekly_hours(&self, today: NaiveDate) -> Vec<DayHours> {
        (0..7u64)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(back)))
            .map(|date| DayHours {
                day: date.format("%a").to_string(),
                date,
                hours: round_hours(self.seconds_on(date)),
            })
            .collect()
    }

    pub fn month_total(&self, today: NaiveDate) -> MonthTotal {
        let (secs, sessions) = self
            .month(today)
            .fold((0, 0), |(secs, n), s| (secs + s.duration_secs, n + 1));
        MonthTotal {
            hours: round_hours(secs),
            sessions,
        }
    }

    pub fn today_seconds(&self, today: NaiveDate) -> u64 {
        self.seconds_on(today)
    }

    /// Consecutive days with at least one session, counting back from `today`.
    pub fn streak(&self, today: NaiveDate) -> u32 {
        let days: HashSet<NaiveDate> = self.sessions.iter().map(|s| s.date).collect();
        let mut streak = 0;
        let mut day = Some(today);
        while let Some(d) = day.filter(|d| days.contains(d)) {
            streak += 1;
            day = d.pred_opt();
        }
        streak
    }

    /// Share of this month's time per activity, in `ActivityKind::ALL` order.
    /// With no time logged every share is zero.
    pub fn activity_distribution(&self, today: NaiveDate) -> Vec<ActivityShare> {
        let mut secs = [0u64; ActivityKind::ALL.len()];
        for s in self.month(today) {
            if let Some(i) = ActivityKind::ALL.iter().position(|k| *k == s.kind) {
                secs[i] += s.duration_secs;
            }
        }
        let total: u64 = secs.iter().sum();

        ActivityKind::ALL
            .iter()
            .zip(secs)
            .map(|(&kind, s)| ActivityShare {
                kind,
                percent: if total == 0 {
                    0
                } else {
                    (s as f64 / total as f64 * 100.0).round() as u8
                },
            })
            .collect()
    }
}

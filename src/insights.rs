//! Dashboard aggregates computed from already-loaded tasks and moods.

use std::collections::HashMap;

use serde::Serialize;
use time::{Date, Duration};

use crate::auth::repo_types::User;
use crate::moods::repo_types::MoodLog;
use crate::tasks::repo_types::Task;

pub const TIP_STRESS: &str = "Stress is running high. Try short Pomodoro sessions and take more breaks.";
pub const TIP_MOMENTUM: &str = "Start with one small task to build momentum.";
pub const TIP_MORNING: &str = "Try studying early in the morning and keep distractions away.";
pub const TIP_KEEP_GOING: &str = "You're doing great! Keep up this pace.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub tasks_done: usize,
    pub tasks_total: usize,
    pub productivity_score: f64,
    pub avg_mood: f64,
    pub avg_stress: f64,
    pub tip: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPoint {
    pub day: String,
    pub mood: i32,
    pub stress: i32,
    pub productivity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub when: &'static str,
    #[serde(rename = "where")]
    pub place: &'static str,
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn percent_done<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> (usize, usize, f64) {
    let (mut done, mut total) = (0usize, 0usize);
    for t in tasks {
        total += 1;
        if t.is_done() {
            done += 1;
        }
    }
    let pct = if total == 0 {
        0.0
    } else {
        done as f64 * 100.0 / total as f64
    };
    (done, total, pct)
}

fn mean(values: impl ExactSizeIterator<Item = i32>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let sum: i64 = values.map(i64::from).sum();
    sum as f64 / n as f64
}

pub fn weekly_summary(tasks: &[Task], moods: &[MoodLog]) -> WeeklySummary {
    let (tasks_done, tasks_total, productivity) = percent_done(tasks);
    let avg_mood = mean(moods.iter().map(|m| m.mood));
    let avg_stress = mean(moods.iter().map(|m| m.stress));
    // Thresholds see the unrounded values.
    WeeklySummary {
        tasks_done,
        tasks_total,
        productivity_score: round2(productivity),
        avg_mood: round2(avg_mood),
        avg_stress: round2(avg_stress),
        tip: personal_tip(avg_stress, avg_mood, productivity),
    }
}

/// First matching rule wins.
pub fn personal_tip(avg_stress: f64, avg_mood: f64, productivity: f64) -> &'static str {
    if avg_stress >= 7.0 {
        TIP_STRESS
    } else if productivity < 50.0 {
        TIP_MOMENTUM
    } else if avg_mood < 3.0 {
        TIP_MORNING
    } else {
        TIP_KEEP_GOING
    }
}

/// One point per day in `start..=end`. Days without a mood entry report 0.
pub fn growth_series(start: Date, end: Date, tasks: &[Task], moods: &[MoodLog]) -> Vec<GrowthPoint> {
    let mut mood_by_date: HashMap<Date, &MoodLog> = HashMap::new();
    for m in moods {
        mood_by_date.insert(m.date, m);
    }

    let mut tasks_by_date: HashMap<Date, Vec<&Task>> = HashMap::new();
    for t in tasks {
        if let Some(due) = t.due_date.filter(|d| (start..=end).contains(d)) {
            tasks_by_date.entry(due).or_default().push(t);
        }
    }

    let mut out = Vec::new();
    let mut day = start;
    while day <= end {
        let mood = mood_by_date.get(&day);
        let (_, _, productivity) =
            percent_done(tasks_by_date.get(&day).into_iter().flatten().copied());
        let productivity = round2(productivity);
        out.push(GrowthPoint {
            day: day.weekday().to_string()[..3].to_string(),
            mood: mood.map_or(0, |m| m.mood),
            stress: mood.map_or(0, |m| m.stress),
            productivity,
        });
        day += Duration::days(1);
    }
    out
}

pub fn best_study_window(preference: Option<&str>) -> &'static str {
    match preference.map(str::to_ascii_lowercase).as_deref() {
        Some("morning") => "08:00-11:00",
        Some("afternoon") => "13:00-16:00",
        Some("evening") => "19:00-22:00",
        _ => "09:00-12:00",
    }
}

/// Weekday of the most stressful entry; the earliest date wins a tie.
pub fn stress_peak_day(moods: &[MoodLog]) -> String {
    moods
        .iter()
        .max_by(|a, b| a.stress.cmp(&b.stress).then(b.date.cmp(&a.date)))
        .map(|m| m.date.weekday().to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

const STUDY_TIP: Suggestion = Suggestion {
    kind: "Study Tip",
    title: "Use the Pomodoro Technique for better focus",
    when: "Anytime",
    place: "AI Recommendation",
};

const WELLNESS: Suggestion = Suggestion {
    kind: "Wellness",
    title: "Mindfulness and Stress Management Workshop",
    when: "Wednesday 2:00 PM",
    place: "Student Wellness Center",
};

const ANALYTICS: Suggestion = Suggestion {
    kind: "Analytics",
    title: "Review your weekly progress dashboard",
    when: "Weekly",
    place: "StudyBuddy Dashboard",
};

pub fn suggestions(user: &User, tasks: &[Task]) -> Vec<Suggestion> {
    let mut out = Vec::with_capacity(5);

    let done = tasks.iter().filter(|t| t.is_done()).count();
    let rate = if tasks.is_empty() {
        0.0
    } else {
        done as f64 / tasks.len() as f64
    };
    if rate < 0.3 {
        out.push(Suggestion {
            kind: "Study Strategy",
            title: "Break down large tasks into smaller chunks",
            when: "Today",
            place: "AI Recommendation",
        });
    } else if rate > 0.8 {
        out.push(Suggestion {
            kind: "Goal Setting",
            title: "Set more challenging academic goals",
            when: "This week",
            place: "AI Recommendation",
        });
    }

    match user.productivity_preference.as_deref() {
        Some("morning") => out.push(Suggestion {
            kind: "Morning Routine",
            title: "Join the Early Bird Study Group",
            when: "Daily 7:00 AM",
            place: "Library Study Room 1",
        }),
        Some("evening") => out.push(Suggestion {
            kind: "Evening Study",
            title: "Night Owl Study Session",
            when: "Daily 8:00 PM",
            place: "24/7 Study Hall",
        }),
        _ => {}
    }

    out.extend([STUDY_TIP, WELLNESS, ANALYTICS]);
    out
}

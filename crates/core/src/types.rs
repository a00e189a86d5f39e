use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Canonical contest platform. Upstream sources spell these inconsistently,
/// so parsing is a case-insensitive substring match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Platform {
    Codeforces,
    LeetCode,
    CodeChef,
    AtCoder,
    Other(String),
}

impl Platform {
    pub fn normalize(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("codeforces") {
            Platform::Codeforces
        } else if lower.contains("leetcode") {
            Platform::LeetCode
        } else if lower.contains("codechef") {
            Platform::CodeChef
        } else if lower.contains("atcoder") {
            Platform::AtCoder
        } else {
            Platform::Other(raw.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Platform::Codeforces => "Codeforces",
            Platform::LeetCode => "LeetCode",
            Platform::CodeChef => "CodeChef",
            Platform::AtCoder => "AtCoder",
            Platform::Other(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.name().to_string()
    }
}

impl From<String> for Platform {
    fn from(raw: String) -> Self {
        Platform::normalize(&raw)
    }
}

/// Difficulty label derived from contest-name heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Mixed,
}

impl Difficulty {
    pub fn from_contest_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("div. 1") {
            Difficulty::Hard
        } else if lower.contains("div. 2") {
            Difficulty::Medium
        } else if lower.contains("div. 3") || lower.contains("beginner") {
            Difficulty::Easy
        } else {
            Difficulty::Mixed
        }
    }
}

/// One contest occurrence, normalized from whichever upstream listed it.
/// Ephemeral: rebuilt on every aggregation pass, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    pub id: String,
    pub name: String,
    pub platform: Platform,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: i64,
    pub link: String,
    pub difficulty: Difficulty,
    pub is_live: bool,
    pub is_upcoming: bool,
}

impl Contest {
    /// Builds a contest with `is_live`/`is_upcoming` derived from `now` vs
    /// `[start, end)`, so the two flags can never both be set.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        platform: Platform,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        link: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let name = name.into();
        let difficulty = Difficulty::from_contest_name(&name);
        Self {
            id: id.into(),
            name,
            platform,
            start_time,
            end_time,
            duration_seconds: (end_time - start_time).num_seconds(),
            link: link.into(),
            difficulty,
            is_live: now >= start_time && now < end_time,
            is_upcoming: now < start_time,
        }
    }
}

/// Countdown label shown next to a contest: `"LIVE NOW"` once started,
/// otherwise the coarsest two non-zero units, floored.
pub fn time_until_start(start_time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if start_time <= now {
        return "LIVE NOW".to_string();
    }

    let diff = start_time - now;
    let days = diff.num_days();
    let hours = diff.num_hours();
    let minutes = diff.num_minutes();

    if days > 0 {
        format!("{}d {}h", days, hours % 24)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

/// Reminder lead time before a contest start. Each window maps to one
/// preference flag and one scan band per dispatcher invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderWindow {
    Before60,
    Before30,
    Before10,
    Live,
}

/// Half-width of the scan band around each window target.
pub const BAND_TOLERANCE_MINUTES: i64 = 2;

impl ReminderWindow {
    pub const ALL: [ReminderWindow; 4] = [
        ReminderWindow::Before60,
        ReminderWindow::Before30,
        ReminderWindow::Before10,
        ReminderWindow::Live,
    ];

    pub fn minutes(self) -> i64 {
        match self {
            ReminderWindow::Before60 => 60,
            ReminderWindow::Before30 => 30,
            ReminderWindow::Before10 => 10,
            ReminderWindow::Live => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReminderWindow::Before60 => "60m",
            ReminderWindow::Before30 => "30m",
            ReminderWindow::Before10 => "10m",
            ReminderWindow::Live => "live",
        }
    }

    /// Tolerance band `[target - 2m, target + 2m]` around `now + window`.
    /// Contests whose start time falls inside the band are due this cycle.
    pub fn band(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let target = now + Duration::minutes(self.minutes());
        let tolerance = Duration::minutes(BAND_TOLERANCE_MINUTES);
        (target - tolerance, target + tolerance)
    }
}

/// Notification content handed to a delivery channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub data: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, h, m, 0).unwrap()
    }

    #[test]
    fn test_platform_normalize_case_insensitive() {
        assert_eq!(Platform::normalize("codeforces"), Platform::Codeforces);
        assert_eq!(Platform::normalize("CodeForces"), Platform::Codeforces);
        assert_eq!(Platform::normalize("LEETCODE"), Platform::LeetCode);
        assert_eq!(Platform::normalize("codechef"), Platform::CodeChef);
        assert_eq!(Platform::normalize("AtCoder"), Platform::AtCoder);
    }

    #[test]
    fn test_platform_normalize_substring_match() {
        assert_eq!(
            Platform::normalize("www.codechef.com"),
            Platform::CodeChef
        );
        assert_eq!(
            Platform::normalize("atcoder beginner"),
            Platform::AtCoder
        );
    }

    #[test]
    fn test_platform_normalize_unknown_preserved() {
        let platform = Platform::normalize("TopCoder");
        assert_eq!(platform, Platform::Other("TopCoder".to_string()));
        assert_eq!(platform.name(), "TopCoder");
    }

    #[test]
    fn test_difficulty_heuristics() {
        assert_eq!(
            Difficulty::from_contest_name("Codeforces Round 990 (Div. 1)"),
            Difficulty::Hard
        );
        assert_eq!(
            Difficulty::from_contest_name("Codeforces Round 990 (Div. 2)"),
            Difficulty::Medium
        );
        assert_eq!(
            Difficulty::from_contest_name("Codeforces Round 990 (Div. 3)"),
            Difficulty::Easy
        );
        assert_eq!(
            Difficulty::from_contest_name("AtCoder Beginner Contest 340"),
            Difficulty::Easy
        );
        assert_eq!(
            Difficulty::from_contest_name("Weekly Contest 380"),
            Difficulty::Mixed
        );
    }

    #[test]
    fn test_contest_live_and_upcoming_mutually_exclusive() {
        let start = t(12, 0);
        let end = t(14, 0);

        let before = Contest::new("c1", "Round", Platform::Codeforces, start, end, "l", t(10, 0));
        assert!(before.is_upcoming && !before.is_live);

        let during = Contest::new("c1", "Round", Platform::Codeforces, start, end, "l", t(13, 0));
        assert!(during.is_live && !during.is_upcoming);

        let after = Contest::new("c1", "Round", Platform::Codeforces, start, end, "l", t(15, 0));
        assert!(!after.is_live && !after.is_upcoming);
    }

    #[test]
    fn test_contest_live_at_exact_start() {
        let contest =
            Contest::new("c1", "Round", Platform::Codeforces, t(12, 0), t(14, 0), "l", t(12, 0));
        assert!(contest.is_live);
        assert!(!contest.is_upcoming);
    }

    #[test]
    fn test_contest_not_live_at_exact_end() {
        let contest =
            Contest::new("c1", "Round", Platform::Codeforces, t(12, 0), t(14, 0), "l", t(14, 0));
        assert!(!contest.is_live);
        assert!(!contest.is_upcoming);
    }

    #[test]
    fn test_contest_duration_derived() {
        let contest =
            Contest::new("c1", "Round", Platform::Codeforces, t(12, 0), t(14, 0), "l", t(10, 0));
        assert_eq!(contest.duration_seconds, 7200);
    }

    #[test]
    fn test_time_until_start_live_now() {
        assert_eq!(time_until_start(t(12, 0), t(12, 0)), "LIVE NOW");
        assert_eq!(time_until_start(t(12, 0), t(13, 0)), "LIVE NOW");
    }

    #[test]
    fn test_time_until_start_minutes_only() {
        assert_eq!(time_until_start(t(12, 45), t(12, 0)), "45m");
    }

    #[test]
    fn test_time_until_start_hours_and_minutes() {
        assert_eq!(time_until_start(t(15, 30), t(12, 0)), "3h 30m");
    }

    #[test]
    fn test_time_until_start_days_and_hours() {
        let start = Utc.with_ymd_and_hms(2025, 6, 17, 18, 0, 0).unwrap();
        assert_eq!(time_until_start(start, t(12, 0)), "2d 6h");
    }

    #[test]
    fn test_time_until_start_truncates_never_rounds_up() {
        // 59 minutes 59 seconds left is still "59m".
        let start = Utc.with_ymd_and_hms(2025, 6, 15, 12, 59, 59).unwrap();
        assert_eq!(time_until_start(start, t(12, 0)), "59m");
    }

    #[test]
    fn test_time_until_start_monotonically_non_increasing() {
        let start = Utc.with_ymd_and_hms(2025, 6, 16, 12, 0, 0).unwrap();
        let labels: Vec<String> = (0..=26)
            .map(|h| time_until_start(start, t(0, 0) + Duration::hours(h)))
            .collect();
        // Once "LIVE NOW" appears it never goes away.
        let first_live = labels.iter().position(|l| l == "LIVE NOW").unwrap();
        assert!(labels[first_live..].iter().all(|l| l == "LIVE NOW"));
    }

    #[test]
    fn test_window_minutes_and_labels() {
        assert_eq!(ReminderWindow::Before60.minutes(), 60);
        assert_eq!(ReminderWindow::Before30.minutes(), 30);
        assert_eq!(ReminderWindow::Before10.minutes(), 10);
        assert_eq!(ReminderWindow::Live.minutes(), 0);
        assert_eq!(ReminderWindow::Live.label(), "live");
        assert_eq!(ReminderWindow::Before60.label(), "60m");
    }

    #[test]
    fn test_window_band_tolerance() {
        let now = t(12, 0);
        let (from, to) = ReminderWindow::Before30.band(now);
        assert_eq!(from, t(12, 28));
        assert_eq!(to, t(12, 32));

        let (from, to) = ReminderWindow::Live.band(now);
        assert_eq!(from, t(11, 58));
        assert_eq!(to, t(12, 2));
    }
}

use std::str::FromStr;

use chrono::{NaiveDate, TimeZone, Utc};

use crate::api::{ContentError, Time, MAX_CONTENT_CHARS};

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Language of every user-facing string
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Locale {
    #[default]
    English,
    Korean,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Locale, String> {
        let lang = s.split(['-', '_']).next().unwrap_or(s);
        match &lang.to_ascii_lowercase() as &str {
            "en" => Ok(Locale::English),
            "ko" => Ok(Locale::Korean),
            _ => Err(format!("unsupported locale {s:?}, expected \"en\" or \"ko\"")),
        }
    }
}

impl Locale {
    pub fn minutes_ago(&self, minutes: i64) -> String {
        match self {
            Locale::English => format!("{minutes} minutes ago"),
            Locale::Korean => format!("{minutes}분 전"),
        }
    }

    pub fn hours_ago(&self, hours: i64) -> String {
        match self {
            Locale::English => format!("{hours} hours ago"),
            Locale::Korean => format!("{hours}시간 전"),
        }
    }

    pub fn yesterday(&self) -> &'static str {
        match self {
            Locale::English => "yesterday",
            Locale::Korean => "어제",
        }
    }

    pub fn date(&self, date: NaiveDate) -> String {
        match self {
            Locale::English => date.format("%Y-%m-%d").to_string(),
            Locale::Korean => date.format("%Y. %m. %d.").to_string(),
        }
    }

    pub fn edited_marker(&self) -> &'static str {
        match self {
            Locale::English => "(edited)",
            Locale::Korean => "(수정됨)",
        }
    }

    pub fn create_failed(&self) -> &'static str {
        match self {
            Locale::English => "Failed to post the comment.",
            Locale::Korean => "댓글 작성에 실패했습니다.",
        }
    }

    pub fn update_failed(&self) -> &'static str {
        match self {
            Locale::English => "Failed to edit the comment.",
            Locale::Korean => "댓글 수정에 실패했습니다.",
        }
    }

    pub fn delete_failed(&self) -> &'static str {
        match self {
            Locale::English => "Failed to delete the comment.",
            Locale::Korean => "댓글 삭제에 실패했습니다.",
        }
    }

    pub fn confirm_delete(&self) -> &'static str {
        match self {
            Locale::English => "Delete this comment?",
            Locale::Korean => "댓글을 삭제하시겠습니까?",
        }
    }

    pub fn invalid_content(&self, err: ContentError) -> String {
        match (self, err) {
            (Locale::English, ContentError::Empty) => String::from("The comment is empty."),
            (Locale::Korean, ContentError::Empty) => String::from("댓글 내용을 입력하세요."),
            (Locale::English, ContentError::TooLong { .. }) => {
                format!("Comments are limited to {MAX_CONTENT_CHARS} characters.")
            }
            (Locale::Korean, ContentError::TooLong { .. }) => {
                format!("댓글은 {MAX_CONTENT_CHARS}자까지 작성할 수 있습니다.")
            }
        }
    }

    pub fn char_counter(&self, chars: usize) -> String {
        match self {
            Locale::English => format!("{chars}/{MAX_CONTENT_CHARS}"),
            Locale::Korean => format!("{chars}/{MAX_CONTENT_CHARS}자"),
        }
    }

    pub fn comment_count(&self) -> &'static str {
        match self {
            Locale::English => "Comments",
            Locale::Korean => "댓글",
        }
    }

    pub fn login_required(&self) -> &'static str {
        match self {
            Locale::English => "Log in to write a comment.",
            Locale::Korean => "댓글을 작성하려면 로그인이 필요합니다.",
        }
    }

    pub fn no_comments(&self) -> &'static str {
        match self {
            Locale::English => "Be the first to comment!",
            Locale::Korean => "첫 번째 댓글을 작성해보세요!",
        }
    }

    pub fn compose_placeholder(&self) -> &'static str {
        match self {
            Locale::English => "Write a comment...",
            Locale::Korean => "댓글을 작성하세요...",
        }
    }

    pub fn submit(&self, in_flight: bool) -> &'static str {
        match (self, in_flight) {
            (Locale::English, false) => "Post",
            (Locale::English, true) => "Posting...",
            (Locale::Korean, false) => "댓글 등록",
            (Locale::Korean, true) => "등록 중...",
        }
    }

    pub fn save(&self) -> &'static str {
        match self {
            Locale::English => "Save",
            Locale::Korean => "수정 완료",
        }
    }

    pub fn cancel(&self) -> &'static str {
        match self {
            Locale::English => "Cancel",
            Locale::Korean => "취소",
        }
    }

    pub fn edit(&self) -> &'static str {
        match self {
            Locale::English => "Edit",
            Locale::Korean => "수정",
        }
    }

    pub fn delete(&self) -> &'static str {
        match self {
            Locale::English => "Delete",
            Locale::Korean => "삭제",
        }
    }
}

/// Labels timestamps relative to a given "now".
///
/// Less than an hour old gives minutes, less than a day gives hours, less
/// than two days gives "yesterday", and anything older gives the calendar
/// date in `tz`. Counts are floored, so a 30 second old timestamp is
/// "0 minutes ago".
#[derive(Clone, Debug)]
pub struct TimeFormatter<Tz: TimeZone> {
    tz: Tz,
    locale: Locale,
}

impl TimeFormatter<Utc> {
    pub fn utc(locale: Locale) -> TimeFormatter<Utc> {
        TimeFormatter::new(Utc, locale)
    }
}

impl<Tz: TimeZone> TimeFormatter<Tz> {
    pub fn new(tz: Tz, locale: Locale) -> TimeFormatter<Tz> {
        TimeFormatter { tz, locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn format(&self, timestamp: Time, now: Time) -> String {
        // timestamps from the future (clock skew) count as just posted
        let elapsed = (now - timestamp).num_milliseconds().max(0);
        if elapsed < MS_PER_HOUR {
            self.locale.minutes_ago(elapsed / MS_PER_MINUTE)
        } else if elapsed < MS_PER_DAY {
            self.locale.hours_ago(elapsed / MS_PER_HOUR)
        } else if elapsed < 2 * MS_PER_DAY {
            String::from(self.locale.yesterday())
        } else {
            self.locale
                .date(timestamp.with_timezone(&self.tz).date_naive())
        }
    }

    pub fn format_now(&self, timestamp: Time) -> String {
        self.format(timestamp, Utc::now())
    }
}

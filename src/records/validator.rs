use chrono::NaiveDate;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

use super::{
    errors::RowIssue,
    models::{GameResult, RawRow, RejectedRow, MAX_SCORE},
};

/// Date layouts accepted in the `date` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum DateFormat {
    /// `YYYY-MM-DD`
    #[strum(serialize = "ymd")]
    YearMonthDay,
    /// `DD/MM/YYYY`
    #[strum(serialize = "dmy")]
    DayMonthYear,
    /// `MM/DD/YYYY`
    #[strum(serialize = "mdy")]
    MonthDayYear,
    /// `DD-MM-YYYY`
    #[strum(serialize = "dmy-dash")]
    DayMonthYearDashed,
}

impl DateFormat {
    /// Order tried when no explicit format is configured.
    pub const FIRST_MATCH_ORDER: [DateFormat; 4] = [
        DateFormat::YearMonthDay,
        DateFormat::DayMonthYear,
        DateFormat::MonthDayYear,
        DateFormat::DayMonthYearDashed,
    ];

    pub const fn pattern(self) -> &'static str {
        match self {
            DateFormat::YearMonthDay => "%Y-%m-%d",
            DateFormat::DayMonthYear => "%d/%m/%Y",
            DateFormat::MonthDayYear => "%m/%d/%Y",
            DateFormat::DayMonthYearDashed => "%d-%m-%Y",
        }
    }

    pub fn parse(self, text: &str) -> Option<NaiveDate> {
        if !self.has_four_digit_year(text) {
            return None;
        }
        NaiveDate::parse_from_str(text, self.pattern()).ok()
    }

    pub fn render(self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }

    // chrono's %Y accepts any digit count, so "15-01-20" would otherwise
    // read as the year 15.
    fn has_four_digit_year(self, text: &str) -> bool {
        let year = match self {
            DateFormat::YearMonthDay => text.split('-').next(),
            DateFormat::DayMonthYear | DateFormat::MonthDayYear => text.split('/').nth(2),
            DateFormat::DayMonthYearDashed => text.split('-').nth(2),
        };
        year.is_some_and(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))
    }
}

/// How ambiguous dates such as `01/02/2024` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePolicy {
    /// Try [`DateFormat::FIRST_MATCH_ORDER`] and keep the first success.
    #[default]
    FirstMatch,
    /// Only the declared format is accepted.
    Explicit(DateFormat),
}

impl DatePolicy {
    fn candidates(&self) -> &[DateFormat] {
        match self {
            DatePolicy::FirstMatch => &DateFormat::FIRST_MATCH_ORDER,
            DatePolicy::Explicit(format) => std::slice::from_ref(format),
        }
    }

    /// Format used when rendering a record back into sheet text.
    pub fn primary(&self) -> DateFormat {
        match self {
            DatePolicy::FirstMatch => DateFormat::YearMonthDay,
            DatePolicy::Explicit(format) => *format,
        }
    }
}

impl FromStr for DatePolicy {
    type Err = strum::ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("auto") {
            return Ok(DatePolicy::FirstMatch);
        }
        DateFormat::from_str(value).map(DatePolicy::Explicit)
    }
}

/// Turns raw sheet rows into [`GameResult`]s.
///
/// Pure: diagnostics are returned to the caller, never logged here.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    date_policy: DatePolicy,
}

impl Validator {
    pub fn new(date_policy: DatePolicy) -> Self {
        Self { date_policy }
    }

    pub fn date_policy(&self) -> DatePolicy {
        self.date_policy
    }

    /// Validates every field of the row, collecting all issues before
    /// deciding.
    pub fn validate(&self, row: RawRow) -> Result<GameResult, RejectedRow> {
        let player = normalize_player(&row.player);
        let date = self.parse_date(&row.date);
        let score = parse_score(&row.score);

        match (player, date, score) {
            (Ok(player), Ok(date), Ok(score)) => Ok(GameResult::new(player, date, score)),
            (player, date, score) => {
                let issues = [player.err(), date.err(), score.err()]
                    .into_iter()
                    .flatten()
                    .collect();
                Err(RejectedRow::new(row, issues))
            }
        }
    }

    pub fn parse_date(&self, raw: &str) -> Result<NaiveDate, RowIssue> {
        let text = raw.trim();
        self.date_policy
            .candidates()
            .iter()
            .find_map(|format| format.parse(text))
            .ok_or_else(|| RowIssue::UnparseableDate(raw.to_string()))
    }

    /// Renders a validated record as sheet text that validates back to the
    /// same record under this validator's policy.
    pub fn to_raw(&self, game: &GameResult, row_number: usize) -> RawRow {
        RawRow::new(
            row_number,
            game.player(),
            self.date_policy.primary().render(game.date()),
            game.score().to_string(),
        )
    }
}

/// Trims, collapses internal whitespace and title-cases a player name.
pub fn normalize_player(raw: &str) -> Result<String, RowIssue> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(RowIssue::EmptyPlayer);
    }
    Ok(title_case(&collapsed))
}

// Upper-cases the first letter of every alphabetic run and lower-cases the
// rest, so "o'brien" becomes "O'Brien".
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut inside_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if inside_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            inside_word = true;
        } else {
            out.push(ch);
            inside_word = false;
        }
    }
    out
}

/// Parses a score cell. Whole-valued floats such as `"18000.0"` are
/// accepted because spreadsheet exports often render integers that way.
pub fn parse_score(raw: &str) -> Result<u32, RowIssue> {
    let text = raw.trim();

    let value = match text.parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            let float = text
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .ok_or_else(|| RowIssue::ScoreNotNumeric(raw.to_string()))?;
            if float.fract() != 0.0 {
                return Err(RowIssue::ScoreNotWhole(raw.to_string()));
            }
            if !(0.0..=f64::from(MAX_SCORE)).contains(&float) {
                return Err(RowIssue::ScoreOutOfRange(raw.to_string()));
            }
            float as i64
        }
    };

    u32::try_from(value)
        .ok()
        .filter(|score| *score <= MAX_SCORE)
        .ok_or_else(|| RowIssue::ScoreOutOfRange(raw.to_string()))
}

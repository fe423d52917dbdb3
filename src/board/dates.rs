use chrono::{Locale, NaiveDate, NaiveTime};

use super::BallColor;

/// Display string for tasks without a selected date.
pub const NO_DATE: &str = "Sin fecha";

/// es-ES long-form due date, first letter upper-cased:
/// "Lunes, 24 de agosto de 2026, 5:30 PM".
pub fn format_due(date: NaiveDate, time: Option<NaiveTime>) -> String {
    let time = time.unwrap_or(NaiveTime::MIN);
    let dt = date.and_time(time);
    let formatted = chrono::format::DelayedFormat::new_with_locale(
        Some(dt.date()),
        Some(dt.time()),
        chrono::format::StrftimeItems::new_with_locale(
            "%A, %-d de %B de %Y, %-I:%M %p",
            Locale::es_ES,
        ),
        Locale::es_ES,
    )
    .to_string();
    capitalize_first(&formatted)
}

/// es-ES header date: "Hoy es sábado 23 de agosto de 2026".
pub fn format_today(today: NaiveDate) -> String {
    let formatted = today
        .format_localized("%A %-d de %B de %Y", Locale::es_ES)
        .to_string();
    format!("Hoy es {formatted}")
}

/// Urgency color for a dated task: due within 3 days red, within 7 yellow,
/// later green. Days are counted from local midnight, so a task due today
/// is red.
pub fn color_for_date(date: NaiveDate, today: NaiveDate) -> BallColor {
    let diff_days = (date - today).num_days();
    if diff_days <= 3 {
        BallColor::Red
    } else if diff_days <= 7 {
        BallColor::Yellow
    } else {
        BallColor::Green
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_due_is_spanish_and_capitalized() {
        let formatted = format_due(day(2026, 8, 24), NaiveTime::from_hms_opt(17, 30, 0));
        assert!(formatted.starts_with("Lunes"), "got: {formatted}");
        assert!(formatted.contains("24 de agosto de 2026"), "got: {formatted}");
        assert!(formatted.contains("5:30"), "got: {formatted}");
    }

    #[test]
    fn test_format_due_defaults_to_midnight() {
        let formatted = format_due(day(2026, 8, 24), None);
        assert!(formatted.contains("12:00"), "got: {formatted}");
    }

    #[test]
    fn test_format_today_has_prefix_and_no_comma() {
        let formatted = format_today(day(2026, 8, 23));
        assert!(formatted.starts_with("Hoy es "), "got: {formatted}");
        assert!(!formatted.contains(','), "got: {formatted}");
        assert!(formatted.contains("23 de agosto de 2026"), "got: {formatted}");
    }

    #[test]
    fn test_color_thresholds() {
        let today = day(2026, 8, 23);
        assert_eq!(color_for_date(today, today), BallColor::Red);
        assert_eq!(color_for_date(day(2026, 8, 26), today), BallColor::Red);
        assert_eq!(color_for_date(day(2026, 8, 27), today), BallColor::Yellow);
        assert_eq!(color_for_date(day(2026, 8, 30), today), BallColor::Yellow);
        assert_eq!(color_for_date(day(2026, 8, 31), today), BallColor::Green);
        // Overdue counts as red too
        assert_eq!(color_for_date(day(2026, 8, 1), today), BallColor::Red);
    }
}

//! Formatting of bill fields for display.
//!
//! Values that cannot be parsed are shown as the store returned them rather
//! than failing the whole page.

use std::{cmp::Ordering, sync::OnceLock};

use numfmt::{Formatter, Precision};
use time::{Date, Month, format_description::BorrowedFormatItem, macros::format_description};

use super::core::{BillRecord, BillStatus};

const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a stored bill date, e.g. "2004-04-04".
pub fn parse_bill_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), ISO_DATE_FORMAT).ok()
}

fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan.",
        Month::February => "Fév.",
        Month::March => "Mar.",
        Month::April => "Avr.",
        Month::May => "Mai",
        Month::June => "Juin",
        Month::July => "Juil.",
        Month::August => "Août",
        Month::September => "Sep.",
        Month::October => "Oct.",
        Month::November => "Nov.",
        Month::December => "Déc.",
    }
}

/// Format a stored bill date as a short French date, e.g. "4 Avr. 04".
///
/// Returns `raw` unchanged if it is not a valid date.
pub fn format_date(raw: &str) -> String {
    match parse_bill_date(raw) {
        Some(date) => format!(
            "{} {} {:02}",
            date.day(),
            month_abbreviation(date.month()),
            date.year().rem_euclid(100)
        ),
        None => raw.to_owned(),
    }
}

/// Translate a stored bill status into its French label.
///
/// Returns `raw` unchanged if it is not a known status.
pub fn format_status(raw: &str) -> String {
    match BillStatus::parse(raw) {
        Some(status) => status.label().to_owned(),
        None => raw.to_owned(),
    }
}

/// Round `amount` to the nearest cent.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Format an amount in euros rounded to the cent, e.g. "€1,348.00".
pub fn format_amount(amount: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("€")
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-€")
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    // numfmt switches to scientific notation for small fractions and
    // truncates decimals, so it only ever formats whole euros.
    let cents = (amount * 100.0).round() as i64;
    let euros = cents.unsigned_abs() / 100;
    let remainder = cents.unsigned_abs() % 100;

    let formatted_euros = match (cents < 0, euros) {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        (false, 0) => "€0".to_owned(),
        (true, 0) => "-€0".to_owned(),
        (false, euros) => positive_fmt.fmt_string(euros as f64),
        (true, euros) => negative_fmt.fmt_string(euros as f64),
    };

    format!("{formatted_euros}.{remainder:02}")
}

/// Sort bills latest first.
///
/// Bills whose date cannot be parsed go last, in their original order.
pub fn sort_latest_first(bills: &mut [BillRecord]) {
    bills.sort_by(|a, b| {
        match (parse_bill_date(&a.date), parse_bill_date(&b.date)) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

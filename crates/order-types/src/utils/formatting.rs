//! String formatting utilities.
//!
//! Provides functions for formatting monetary amounts and dates for display
//! in the Brazilian Portuguese conventions used by the status labels.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol prepended to formatted amounts.
const CURRENCY_SYMBOL: &str = "R$";

/// Formats an amount as currency with two decimal places.
///
/// Uses `.` as the thousands separator and `,` as the decimal separator,
/// e.g. `1234.5` becomes `"R$ 1.234,50"`.
pub fn format_currency(amount: Decimal) -> String {
	let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
	let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
		"-"
	} else {
		""
	};
	let plain = format!("{:.2}", rounded.abs());
	let (integer_part, fraction_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

	format!(
		"{}{} {},{}",
		sign,
		CURRENCY_SYMBOL,
		group_thousands(integer_part),
		fraction_part
	)
}

/// Formats a timestamp as `dd/MM/yyyy HH:mm:ss`.
pub fn format_order_date(date: &DateTime<Utc>) -> String {
	date.format("%d/%m/%Y %H:%M:%S").to_string()
}

fn group_thousands(digits: &str) -> String {
	let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, ch) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			grouped.push('.');
		}
		grouped.push(ch);
	}
	grouped
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	fn dec(s: &str) -> Decimal {
		s.parse().unwrap()
	}

	#[test]
	fn test_format_currency() {
		assert_eq!(format_currency(dec("100")), "R$ 100,00");
		assert_eq!(format_currency(dec("0.5")), "R$ 0,50");
		assert_eq!(format_currency(dec("1234.567")), "R$ 1.234,57");
		assert_eq!(format_currency(dec("1234567.8")), "R$ 1.234.567,80");
		assert_eq!(format_currency(dec("999.999")), "R$ 1.000,00");
		assert_eq!(format_currency(dec("-12.3")), "-R$ 12,30");
	}

	#[test]
	fn test_format_order_date() {
		let date = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
		assert_eq!(format_order_date(&date), "05/03/2024 14:07:09");
	}
}

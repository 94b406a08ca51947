use chrono::{Datelike, NaiveDate, NaiveDateTime};
use crates::domain::entities::distribution_codes::DistributionCodeEntity;
use crates::domain::value_objects::enums::ejv_batch_types::EjvBatchType;
use rust_decimal::Decimal;

/// Non-printable field delimiter required by the accounting feed.
pub const DELIMITER: char = '\u{1d}';

#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Renders an amount with two fixed fraction digits, zero-left-padded to
/// 15 characters (`12.5` -> `"000000000012.50"`).
pub fn format_amount(amount: Decimal) -> String {
    format!("{:0>15}", format!("{amount:.2}"))
}

/// GL code combination for a distribution: the coordinate fields, a fixed
/// ten-zero suffix, then 16 trailing spaces.
pub fn distribution_string(code: &DistributionCodeEntity) -> String {
    format!(
        "{}{}{}{}{}0000000000{:<16}",
        code.client, code.responsibility_centre, code.service_line, code.stob, code.project_code, ""
    )
}

/// Fiscal years roll over at the start of April.
pub fn fiscal_year(date: NaiveDate) -> i32 {
    if date.month() > 3 {
        date.year() + 1
    } else {
        date.year()
    }
}

pub fn batch_file_name(feeder_number: &str, local_now: NaiveDateTime) -> String {
    format!("INBOX.F{}.{}", feeder_number, local_now.format("%Y%m%d%H%M%S"))
}

pub fn effective_date(local_today: NaiveDate) -> String {
    local_today.format("%Y%m%d").to_string()
}

/// Truncates to 100 characters, then right-pads with spaces to exactly 100.
pub fn pad_description(description: &str) -> String {
    let truncated: String = description.chars().take(100).collect();
    format!("{truncated:<100}")
}

/// Assembles one partner's batch records, tracking the control-unit count
/// (1 per journal header, 2 per credit/debit line pair) and the cumulative
/// monetary total carried by the trailer.
pub struct EjvBatchWriter {
    prefix: String,
    feeder_number: String,
    fiscal_year: i32,
    batch_number: String,
    journal_batch_name: String,
    content: String,
    control_unit: u64,
    batch_total: Decimal,
}

impl EjvBatchWriter {
    pub fn new(
        feeder_number: &str,
        batch_type: EjvBatchType,
        fiscal_year: i32,
        file_id: i64,
        ministry_prefix: &str,
    ) -> Self {
        let batch_number = format!("{file_id:0>9}");
        Self {
            prefix: format!("{}{}", feeder_number, batch_type.as_str()),
            feeder_number: feeder_number.to_string(),
            fiscal_year,
            journal_batch_name: format!("{ministry_prefix}{batch_number}{:<14}", ""),
            batch_number,
            content: String::new(),
            control_unit: 0,
            batch_total: Decimal::ZERO,
        }
    }

    /// Journal name for a partner: ministry prefix + partner code,
    /// left-justified to 10 characters.
    pub fn journal_name(ministry_prefix: &str, partner_code: &str) -> String {
        format!("{:<10}", format!("{ministry_prefix}{partner_code}"))
    }

    pub fn add_batch_header(&mut self, message_version: &str) {
        self.content.push_str(&format!(
            "{}BH{DELIMITER}{}{}{}{}{DELIMITER}{LINE_SEPARATOR}",
            self.prefix, self.feeder_number, self.fiscal_year, self.batch_number, message_version
        ));
    }

    /// One journal header carrying the group total, then a credit and a
    /// debit detail line per line item, each carrying that line's total.
    pub fn add_journal(
        &mut self,
        journal_name: &str,
        effective_date: &str,
        credit_distribution: &str,
        debit_distribution: &str,
        line_totals: &[Decimal],
        description: &str,
    ) {
        let total: Decimal = line_totals.iter().copied().sum();
        self.batch_total += total;

        self.content.push_str(&format!(
            "{}JH{DELIMITER}{}{}{}ACAD{:<100}{:<110}{DELIMITER}{LINE_SEPARATOR}",
            self.prefix,
            journal_name,
            self.journal_batch_name,
            format_amount(total),
            "",
            ""
        ));
        self.control_unit += 1;

        let mut line_number: u32 = 0;
        for line_total in line_totals {
            line_number += 1;
            self.content.push_str(&format!(
                "{}JD{DELIMITER}{}{:0>5}{}{}{:<9}{}C{}{:<110}{DELIMITER}{LINE_SEPARATOR}",
                self.prefix,
                journal_name,
                line_number,
                effective_date,
                credit_distribution,
                "",
                format_amount(*line_total),
                description,
                ""
            ));
            line_number += 1;
            self.content.push_str(&format!(
                "{}JD{DELIMITER}{}{:0>5}{}{}{:<9}{}D{}{:<110}{DELIMITER}{LINE_SEPARATOR}",
                self.prefix,
                journal_name,
                line_number,
                effective_date,
                debit_distribution,
                "",
                format_amount(*line_total),
                description,
                ""
            ));
            self.control_unit += 2;
        }
    }

    pub fn add_trailer(&mut self) {
        self.content.push_str(&format!(
            "{}BT{DELIMITER}{}{}{}{:0>15}{}{DELIMITER}{LINE_SEPARATOR}",
            self.prefix,
            self.feeder_number,
            self.fiscal_year,
            self.batch_number,
            self.control_unit,
            format_amount(self.batch_total)
        ));
    }

    pub fn control_unit(&self) -> u64 {
        self.control_unit
    }

    pub fn batch_total(&self) -> Decimal {
        self.batch_total
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

//! Payroll total derivation.

use crate::models::PayrollRecord;

/// Recomputes every derived monetary field of a payroll record.
///
/// - `total_allowances` = sum of allowance categories
/// - `gross_salary` = `base_salary + total_allowances`
/// - `total_deductions` = sum of deduction categories
/// - `net_salary` = `gross_salary - total_deductions`
///
/// Inputs are taken as stored; no percentage derivation happens here.
pub fn derive_payroll_fields(mut record: PayrollRecord) -> PayrollRecord {
    record.total_allowances = record.allowances.total();
    record.gross_salary = record.base_salary + record.total_allowances;
    record.total_deductions = record.deductions.total();
    record.net_salary = record.gross_salary - record.total_deductions;
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Allowances, Deductions, PayPeriod, PayrollStatus};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn record_with(base: &str, allowances: Allowances, deductions: Deductions) -> PayrollRecord {
        PayrollRecord {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            period: PayPeriod::new(6, 2025).unwrap(),
            base_salary: dec(base),
            allowances,
            total_allowances: dec("999999"),
            gross_salary: dec("999999"),
            deductions,
            total_deductions: dec("999999"),
            net_salary: dec("999999"),
            status: PayrollStatus::Pending,
            pay_date: None,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_net_salary_example() {
        let record = derive_payroll_fields(record_with(
            "75000",
            Allowances {
                house_rent: dec("3000"),
                medical: dec("1000"),
                transport: dec("500"),
                special: dec("500"),
            },
            Deductions {
                provident_fund: dec("1000"),
                income_tax: dec("800"),
                professional_tax: dec("200"),
            },
        ));
        assert_eq!(record.total_allowances, dec("5000"));
        assert_eq!(record.gross_salary, dec("80000"));
        assert_eq!(record.total_deductions, dec("2000"));
        assert_eq!(record.net_salary, dec("78000"));
    }

    #[test]
    fn test_stale_totals_are_overwritten() {
        let record = derive_payroll_fields(record_with(
            "1000",
            Allowances::default(),
            Deductions::default(),
        ));
        assert_eq!(record.total_allowances, Decimal::ZERO);
        assert_eq!(record.gross_salary, dec("1000"));
        assert_eq!(record.net_salary, dec("1000"));
    }

    #[test]
    fn test_deductions_exceeding_gross_give_negative_net() {
        let record = derive_payroll_fields(record_with(
            "100",
            Allowances::default(),
            Deductions {
                professional_tax: dec("200"),
                ..Deductions::default()
            },
        ));
        assert_eq!(record.net_salary, dec("-100"));
    }
}

//! Salary structure derivation.
//!
//! Allowance and deduction categories are fixed percentages of the base
//! salary. The percentages are constants of the engine, not configuration.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{Allowances, Deductions, SalaryStructure};

/// House rent allowance, 20% of base.
pub const HOUSE_RENT_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

/// Medical allowance, 6.67% of base.
pub const MEDICAL_RATE: Decimal = Decimal::from_parts(667, 0, 0, false, 4);

/// Transport allowance, 4% of base.
pub const TRANSPORT_RATE: Decimal = Decimal::from_parts(4, 0, 0, false, 2);

/// Special allowance, 2.67% of base.
pub const SPECIAL_RATE: Decimal = Decimal::from_parts(267, 0, 0, false, 4);

/// Provident fund contribution, 12% of base.
pub const PROVIDENT_FUND_RATE: Decimal = Decimal::from_parts(12, 0, 0, false, 2);

/// Income tax withholding, 10% of base.
pub const INCOME_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Flat monthly professional tax.
pub const PROFESSIONAL_TAX: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

fn share(base: Decimal, rate: Decimal) -> Decimal {
    (base * rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Builds the salary structure implied by `base_salary`.
///
/// Amounts are rounded to cents. A zero base still carries the flat
/// professional tax.
///
/// # Example
///
/// ```
/// use hr_ledger::calculation::recalculate_salary_structure;
/// use rust_decimal::Decimal;
///
/// let salary = recalculate_salary_structure(Decimal::new(30000, 0));
/// assert_eq!(salary.allowances.house_rent, Decimal::new(6000, 0));
/// assert_eq!(salary.deductions.provident_fund, Decimal::new(3600, 0));
/// assert_eq!(salary.deductions.professional_tax, Decimal::new(200, 0));
/// ```
pub fn recalculate_salary_structure(base_salary: Decimal) -> SalaryStructure {
    SalaryStructure {
        base_salary,
        allowances: Allowances {
            house_rent: share(base_salary, HOUSE_RENT_RATE),
            medical: share(base_salary, MEDICAL_RATE),
            transport: share(base_salary, TRANSPORT_RATE),
            special: share(base_salary, SPECIAL_RATE),
        },
        deductions: Deductions {
            provident_fund: share(base_salary, PROVIDENT_FUND_RATE),
            income_tax: share(base_salary, INCOME_TAX_RATE),
            professional_tax: PROFESSIONAL_TAX,
        },
        overridden: false,
    }
}

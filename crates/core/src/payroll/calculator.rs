//! Labor cost arithmetic
//!
//! All money is integer won. Percent rates are converted to thousandths of a
//! percent so `3.545%` becomes `3545` and every step is an integer multiply
//! followed by a floor division. Intermediates are `i128`; a result that does
//! not fit back in `i64` is reported rather than wrapped.

use smartcon_domain::{
    pay_for_days, InsuranceBreakdown, PayrollConfig, PayrollLine, PayrollRow, Result,
    SmartconError, TaxBreakdown,
};

/// `round(percent * 1000)`
fn rate_milli(percent: f64) -> i128 {
    (percent * 1000.0).round() as i128
}

/// `floor(amount * percent / 100)`
pub fn apply_rate(amount: i64, percent: f64) -> Option<i64> {
    let scaled = i128::from(amount).checked_mul(rate_milli(percent))?;
    i64::try_from(scaled.div_euclid(100_000)).ok()
}

/// Split a combined tax amount into income tax and local resident tax.
pub fn split_tax(total: i64) -> TaxBreakdown {
    // |income| <= |total|, so the narrowing cannot fail.
    let income = i64::try_from((i128::from(total) * 10).div_euclid(11)).unwrap_or(total);
    TaxBreakdown { income, resident: total.saturating_sub(income).max(0) }
}

/// `(reported, remaining)` man-days. Without split reporting everything is
/// reported.
pub fn split_days(total: f64, config: &PayrollConfig) -> (f64, f64) {
    if !config.split_reporting {
        return (total, 0.0);
    }
    let reported = total.min(config.split_threshold_days.max(0.0));
    (reported, total - reported)
}

/// Compute one payroll line. Fails with `InvalidInput` when an amount for
/// the row does not fit in whole won.
pub fn calculate(row: &PayrollRow, config: &PayrollConfig) -> Result<PayrollLine> {
    let out_of_range = || {
        SmartconError::InvalidInput(format!("{}: 금액이 허용 범위를 벗어났습니다", row.worker_name))
    };
    let rate = |amount: i64, percent: f64| apply_rate(amount, percent).ok_or_else(out_of_range);

    let gross = pay_for_days(row.man_days, row.unit_price).ok_or_else(out_of_range)?;
    let (reported_days, remaining_days) = split_days(row.man_days, config);
    let reported_gross =
        pay_for_days(reported_days, row.unit_price).ok_or_else(out_of_range)?.min(gross);
    let remaining_gross = gross.checked_sub(reported_gross).ok_or_else(out_of_range)?;

    let insurance_applied =
        config.insurance_mode && reported_days >= config.insurance_threshold_days;
    let insurance = if insurance_applied {
        let health = rate(reported_gross, config.health_rate)?;
        InsuranceBreakdown {
            pension: rate(reported_gross, config.pension_rate)?,
            health,
            care: rate(health, config.care_rate)?,
            employment: rate(reported_gross, config.employment_rate)?,
        }
    } else {
        InsuranceBreakdown::default()
    };

    // In insurance mode the reported portion is covered by insurance and only
    // the remainder is taxed, whether or not the worker met the threshold.
    let tax_base = if config.insurance_mode { remaining_gross } else { reported_gross };
    let tax = split_tax(rate(tax_base, config.tax_rate)?);

    let deductions_total = config
        .active_deduction_keys()
        .filter_map(|key| row.deductions.get(key))
        .try_fold(0_i64, |sum, amount| sum.checked_add(*amount))
        .ok_or_else(out_of_range)?;

    let net_pay = tax
        .total()
        .checked_add(insurance.total())
        .and_then(|withheld| withheld.checked_add(deductions_total))
        .and_then(|withheld| gross.checked_sub(withheld))
        .ok_or_else(out_of_range)?;

    Ok(PayrollLine {
        worker_id: row.worker_id.clone(),
        worker_name: row.worker_name.clone(),
        id_number: row.id_number.clone(),
        salary_model: row.salary_model,
        unit_price: row.unit_price,
        total_days: row.man_days,
        reported_days,
        remaining_days,
        gross,
        reported_gross,
        remaining_gross,
        insurance_applied,
        tax,
        insurance,
        deductions_total,
        net_pay,
    })
}

//! Integer won arithmetic shared by report totals and payroll.

/// `floor(days * unit_price)`, with days taken to two decimal places.
///
/// `None` when `days` is not finite or the amount does not fit in `i64`.
pub fn pay_for_days(days: f64, unit_price: i64) -> Option<i64> {
    if !days.is_finite() {
        return None;
    }
    let hundredths = (days * 100.0).round() as i128;
    let amount = hundredths.checked_mul(i128::from(unit_price))?.div_euclid(100);
    i64::try_from(amount).ok()
}

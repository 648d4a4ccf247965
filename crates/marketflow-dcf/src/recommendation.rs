//! Upside and recommendation classification.

use marketflow_core::Recommendation;

/// Upside (percent) at or below which a ticker is `AVOID`.
pub const AVOID_AT_OR_BELOW: f64 = -50.0;
/// Upside (percent) below which a ticker is `SELL`.
pub const SELL_BELOW: f64 = -20.0;
/// Upside (percent) at or above which a ticker is `BUY`.
pub const BUY_AT_OR_ABOVE: f64 = 20.0;
/// Upside (percent) at or above which a ticker is `STRONG BUY`.
pub const STRONG_BUY_AT_OR_ABOVE: f64 = 50.0;

/// Percentage upside of `intrinsic` over `price`.
///
/// Returns `None` when the price is not positive (or not finite), rather
/// than dividing by it.
#[must_use]
pub fn upside_pct(intrinsic: f64, price: f64) -> Option<f64> {
    (price.is_finite() && price > 0.0).then(|| (intrinsic - price) / price * 100.0)
}

/// Classify an upside percentage.
///
/// | upside            | label      |
/// |-------------------|------------|
/// | undefined or NaN  | AVOID      |
/// | u ≤ −50           | AVOID      |
/// | −50 < u < −20     | SELL       |
/// | −20 ≤ u < 20      | HOLD       |
/// | 20 ≤ u < 50       | BUY        |
/// | u ≥ 50            | STRONG BUY |
///
/// # Example
///
/// ```
/// use marketflow_core::Recommendation;
/// use marketflow_dcf::classify;
///
/// assert_eq!(classify(Some(50.0)), Recommendation::StrongBuy);
/// assert_eq!(classify(Some(-50.0)), Recommendation::Avoid);
/// assert_eq!(classify(None), Recommendation::Avoid);
/// ```
#[must_use]
pub fn classify(upside: Option<f64>) -> Recommendation {
    match upside {
        Some(u) if u.is_nan() => Recommendation::Avoid,
        None => Recommendation::Avoid,
        Some(u) if u <= AVOID_AT_OR_BELOW => Recommendation::Avoid,
        Some(u) if u < SELL_BELOW => Recommendation::Sell,
        Some(u) if u < BUY_AT_OR_ABOVE => Recommendation::Hold,
        Some(u) if u < STRONG_BUY_AT_OR_ABOVE => Recommendation::Buy,
        Some(_) => Recommendation::StrongBuy,
    }
}

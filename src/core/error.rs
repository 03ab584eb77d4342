/// Structural failures of a cost calculation.
///
/// Numeric anomalies (non-finite intermediates) never end up here: the
/// pipeline normalises them to zero-effect instead, so that a displayed
/// currency value can never be `NaN`.
#[derive(Debug, Eq, PartialEq, derive_more::Display, derive_more::Error)]
pub enum CostError {
    /// The caller supplied structurally invalid input. Never retried.
    #[display("invalid session input: {reason}")]
    InvalidInput { reason: &'static str },

    /// No prices are published for the requested date (or hours).
    /// The caller may retry once the day-ahead prices are out.
    #[display("no electricity prices available for the requested date")]
    NoPriceData,
}

impl CostError {
    pub(crate) const fn invalid_input(reason: &'static str) -> Self {
        Self::InvalidInput { reason }
    }
}

use crate::error::ConversionError;
use crate::exchange_rate::RateSnapshot;
use crate::expression;

/// Converts the amount typed as `amount_expr` from one currency to another.
///
/// The result is not rounded; display precision is up to the caller.
pub fn convert(
    amount_expr: &str,
    from: &str,
    to: &str,
    snapshot: &RateSnapshot,
) -> Result<f64, ConversionError> {
    if from.is_empty() || to.is_empty() {
        return Err(ConversionError::MissingCurrency);
    }
    let from_rate = lookup(snapshot, from)?;
    let to_rate = lookup(snapshot, to)?;

    let amount = expression::evaluate(amount_expr).map_err(|source| ConversionError::Amount {
        input: amount_expr.to_string(),
        source,
    })?;

    Ok(amount * from_rate / to_rate)
}

fn lookup(snapshot: &RateSnapshot, code: &str) -> Result<f64, ConversionError> {
    snapshot
        .rate(code)
        .ok_or_else(|| ConversionError::UnknownCurrency(code.to_string()))
}

use crate::schema::{Currency, FxTable};

/// Converts an amount between USD and ARS at the given monthly ARS-per-USD
/// rate.
///
/// Same-currency "conversions" return the amount untouched even when the rate
/// is missing. A missing or zero rate makes a cross-currency conversion
/// undefined (`None`); parity is never assumed on the caller's behalf.
pub fn convert(amount: f64, from: Currency, to: Currency, fx_rate: Option<f64>) -> Option<f64> {
    if from == to {
        return Some(amount);
    }

    let rate = match fx_rate {
        Some(r) if r != 0.0 => r,
        _ => return None,
    };

    // Two currencies and from != to, so the direction follows from `from`.
    match from {
        Currency::Usd => Some(amount * rate),
        Currency::Ars => Some(amount / rate),
    }
}

/// Like [`convert`], but a missing or zero monthly rate falls back to the
/// caller-supplied rate instead of producing `None`. This is the only
/// sanctioned way to default a conversion; a zero fallback still yields
/// `None`.
pub fn convert_with_fallback(
    amount: f64,
    from: Currency,
    to: Currency,
    fx_rate: Option<f64>,
    fallback_rate: f64,
) -> Option<f64> {
    let effective = match fx_rate {
        Some(r) if r != 0.0 => Some(r),
        _ => Some(fallback_rate),
    };
    convert(amount, from, to, effective)
}

/// Converts an annual amount using the arithmetic mean of the published
/// monthly rates. Months without a rate are excluded from the mean; if no
/// month has one, the cross-currency conversion is `None`.
pub fn convert_annual(amount: f64, from: Currency, to: Currency, fx: &FxTable) -> Option<f64> {
    if from == to {
        return Some(amount);
    }
    convert(amount, from, to, fx.mean_rate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MONTHS_PER_YEAR;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_same_currency_is_identity() {
        assert_eq!(
            convert(1000.0, Currency::Usd, Currency::Usd, None),
            Some(1000.0)
        );
        assert_eq!(
            convert(1000.0, Currency::Ars, Currency::Ars, Some(0.0)),
            Some(1000.0)
        );
    }

    #[test]
    fn test_missing_or_zero_rate_is_undefined() {
        assert_eq!(convert(1000.0, Currency::Usd, Currency::Ars, None), None);
        assert_eq!(
            convert(1000.0, Currency::Ars, Currency::Usd, Some(0.0)),
            None
        );
    }

    #[test]
    fn test_directional_conversion() {
        let ars = convert(100.0, Currency::Usd, Currency::Ars, Some(950.0)).unwrap();
        assert!((ars - 95_000.0).abs() < TOL);

        let usd = convert(95_000.0, Currency::Ars, Currency::Usd, Some(950.0)).unwrap();
        assert!((usd - 100.0).abs() < TOL);
    }

    #[test]
    fn test_round_trip() {
        for rate in [0.5, 1.0, 350.25, 1234.56] {
            let there = convert(777.77, Currency::Usd, Currency::Ars, Some(rate)).unwrap();
            let back = convert(there, Currency::Ars, Currency::Usd, Some(rate)).unwrap();
            assert!((back - 777.77).abs() < TOL, "rate {}: got {}", rate, back);
        }
    }

    #[test]
    fn test_fallback_rate() {
        let converted =
            convert_with_fallback(10.0, Currency::Usd, Currency::Ars, None, 1000.0).unwrap();
        assert!((converted - 10_000.0).abs() < TOL);

        // Published rate wins over the fallback.
        let converted =
            convert_with_fallback(10.0, Currency::Usd, Currency::Ars, Some(900.0), 1000.0).unwrap();
        assert!((converted - 9_000.0).abs() < TOL);

        // A zero fallback is still undefined.
        assert_eq!(
            convert_with_fallback(10.0, Currency::Usd, Currency::Ars, None, 0.0),
            None
        );
    }

    #[test]
    fn test_annual_mean_conversion() {
        let mut rates = [None; MONTHS_PER_YEAR];
        rates[0] = Some(800.0);
        rates[1] = Some(1200.0);
        let fx = FxTable::new(rates);

        let ars = convert_annual(100.0, Currency::Usd, Currency::Ars, &fx).unwrap();
        assert!((ars - 100_000.0).abs() < TOL);

        assert_eq!(
            convert_annual(100.0, Currency::Usd, Currency::Ars, &FxTable::default()),
            None
        );
        assert_eq!(
            convert_annual(100.0, Currency::Usd, Currency::Usd, &FxTable::default()),
            Some(100.0)
        );
    }
}

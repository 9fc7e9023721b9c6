//! Daily closing price representation.

use chrono::NaiveDate;

use super::error::InvalidInput;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        PricePoint { date, close }
    }
}

/// Price must be strictly positive and finite.
pub fn check_price(date: NaiveDate, price: f64) -> Result<(), InvalidInput> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(InvalidInput::NonPositivePrice { date, price })
    }
}

/// Dates must be strictly ascending (which also rules out duplicates).
pub fn check_ascending<I>(dates: I) -> Result<(), InvalidInput>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut previous: Option<NaiveDate> = None;
    for date in dates {
        match previous {
            Some(prev) if date <= prev => {
                return Err(InvalidInput::DatesNotAscending {
                    previous: prev,
                    date,
                });
            }
            _ => {}
        }
        previous = Some(date);
    }
    Ok(())
}

/// Validate a whole price series: ascending dates, positive closes.
pub fn validate_prices(prices: &[PricePoint]) -> Result<(), InvalidInput> {
    check_ascending(prices.iter().map(|p| p.date))?;
    for p in prices {
        check_price(p.date, p.close)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn check_price_rejects_zero_negative_and_nan() {
        assert!(check_price(d(1), 1.0).is_ok());
        assert!(check_price(d(1), 0.0).is_err());
        assert!(check_price(d(1), -5.0).is_err());
        assert!(check_price(d(1), f64::NAN).is_err());
        assert!(check_price(d(1), f64::INFINITY).is_err());
    }

    #[test]
    fn check_ascending_accepts_gaps() {
        assert!(check_ascending([d(1), d(2), d(5), d(9)]).is_ok());
        assert!(check_ascending(std::iter::empty()).is_ok());
    }

    #[test]
    fn check_ascending_rejects_duplicates() {
        let err = check_ascending([d(1), d(2), d(2)]).unwrap_err();
        assert_eq!(
            err,
            InvalidInput::DatesNotAscending {
                previous: d(2),
                date: d(2)
            }
        );
    }

    #[test]
    fn check_ascending_rejects_out_of_order() {
        let err = check_ascending([d(3), d(1)]).unwrap_err();
        assert!(matches!(err, InvalidInput::DatesNotAscending { .. }));
    }

    #[test]
    fn validate_prices_reports_first_bad_close() {
        let prices = vec![
            PricePoint::new(d(1), 10.0),
            PricePoint::new(d(2), 0.0),
            PricePoint::new(d(3), -1.0),
        ];
        let err = validate_prices(&prices).unwrap_err();
        assert_eq!(
            err,
            InvalidInput::NonPositivePrice {
                date: d(2),
                price: 0.0
            }
        );
    }
}

// src/domain/metrics.rs

/// Price per square metre. Only defined when both sides are strictly positive.
pub fn price_per_area(price: f64, surface: f64) -> Option<f64> {
    if price > 0.0 && surface > 0.0 {
        Some(price / surface)
    } else {
        None
    }
}

/// Monthly payment of an amortized loan, rounded to cents.
/// A 0 % rate spreads the amount evenly; a negative rate, a non-positive
/// amount or a zero duration gives 0.0.
pub fn monthly_payment(amount: f64, annual_rate_pct: f64, years: u32) -> f64 {
    if !(amount > 0.0) || !(annual_rate_pct >= 0.0) || years == 0 {
        return 0.0;
    }

    let monthly_rate = annual_rate_pct / 100.0 / 12.0;
    let payments = f64::from(years * 12);
    let payment = if monthly_rate == 0.0 {
        amount / payments
    } else {
        amount * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-payments))
    };

    round_cents(payment)
}

/// Monthly rent minus the loan payment. Positive means the rent covers it.
pub fn rent_difference(monthly_rent: Option<f64>, payment: f64) -> Option<f64> {
    let rent = monthly_rent.filter(|r| r.is_finite())?;
    (payment > 0.0).then(|| round_cents(rent - payment))
}

/// Loan parameters used for every estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    pub annual_rate_pct: f64,
    pub years: u32,
}

/// What buying a listing would cost per month, next to what it rents for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanEstimate {
    pub monthly_payment: f64,
    pub monthly_rent: Option<f64>,
    pub rent_difference: Option<f64>,
}

impl LoanEstimate {
    /// `None` for listings without a price.
    pub fn for_price(price: f64, terms: LoanTerms, monthly_rent: Option<f64>) -> Option<Self> {
        if !(price > 0.0) {
            return None;
        }
        let monthly_payment = monthly_payment(price, terms.annual_rate_pct, terms.years);
        Some(Self {
            monthly_payment,
            monthly_rent,
            rent_difference: rent_difference(monthly_rent, monthly_payment),
        })
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

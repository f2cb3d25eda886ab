use chrono::NaiveDate;
use kredi_core::amortization::{calculate_schedule, CommissionMode, LoanRequest, LoanScheme};
use kredi_core::{AccrualBasis, KrediError, Money, PaymentFrequency};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Helpers
// ===========================================================================

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
}

fn loan(scheme: LoanScheme, principal: Money, annual_rate: Decimal, term: u32) -> LoanRequest {
    LoanRequest::new(principal, annual_rate, term, scheme, start())
}

fn principal_sum(req: &LoanRequest) -> Money {
    calculate_schedule(req)
        .unwrap()
        .result
        .installments
        .iter()
        .map(|r| r.principal_payment)
        .sum()
}

// ===========================================================================
// Equal principal
// ===========================================================================

#[test]
fn test_equal_principal_constant_principal_portion() {
    let req = loan(LoanScheme::EqualPrincipal, dec!(120000), dec!(0.12), 12);
    let out = calculate_schedule(&req).unwrap();
    let rows = &out.result.installments;

    assert_eq!(rows.len(), 12);
    for row in rows {
        assert_eq!(row.principal_payment, dec!(10000));
    }
    assert_eq!(rows[0].interest_payment, dec!(1200));
    assert_eq!(rows[11].remaining_principal, Decimal::ZERO);
}

#[test]
fn test_equal_principal_balance_decreases_linearly() {
    let req = loan(LoanScheme::EqualPrincipal, dec!(120000), dec!(0.12), 12);
    let rows = calculate_schedule(&req).unwrap().result.installments;
    for (i, row) in rows.iter().enumerate() {
        let expected = dec!(120000) - dec!(10000) * Decimal::from(i as u32 + 1);
        assert_eq!(row.remaining_principal, expected);
    }
}

#[test]
fn test_equal_principal_sums_with_awkward_division() {
    for term in [7u32, 11, 13, 36, 120] {
        let req = loan(LoanScheme::EqualPrincipal, dec!(1000000), dec!(0.45), term);
        assert_eq!(principal_sum(&req), dec!(1000000), "term {term}");
    }
}

#[test]
fn test_equal_principal_longer_term_smaller_principal_portion() {
    let short = calculate_schedule(&loan(LoanScheme::EqualPrincipal, dec!(120000), dec!(0.12), 12)).unwrap();
    let long = calculate_schedule(&loan(LoanScheme::EqualPrincipal, dec!(120000), dec!(0.12), 24)).unwrap();
    assert!(long.result.installments[0].principal_payment < short.result.installments[0].principal_payment);
}

// ===========================================================================
// Equal installment
// ===========================================================================

#[test]
fn test_equal_installment_reference_payment() {
    let req = LoanRequest {
        bsmv_rate: Decimal::ZERO,
        ..loan(LoanScheme::EqualInstallment, dec!(120000), dec!(0.12), 12)
    };
    let out = calculate_schedule(&req).unwrap();
    assert_eq!(out.result.level_installment, Some(dec!(10661.85)));
    assert_eq!(out.result.installments[11].remaining_principal, Decimal::ZERO);
}

#[test]
fn test_equal_installment_constant_payment() {
    let req = loan(LoanScheme::EqualInstallment, dec!(500000), dec!(0.36), 36);
    let out = calculate_schedule(&req).unwrap();
    let level = out.result.level_installment.unwrap();
    let rows = &out.result.installments;

    for row in rows {
        assert!(
            (row.installment_amount - level).abs() <= dec!(0.02),
            "installment {} = {} vs level {level}",
            row.installment_number,
            row.installment_amount
        );
    }
    assert_eq!(rows.last().unwrap().remaining_principal, Decimal::ZERO);
    assert_eq!(principal_sum(&req), dec!(500000));
}

fn assert_level_over_long_term(principal: Money, annual_rate: Decimal, term: u32) {
    let req = loan(LoanScheme::EqualInstallment, principal, annual_rate, term);
    let out = calculate_schedule(&req).unwrap();
    let level = out.result.level_installment.unwrap();
    let rows = &out.result.installments;

    assert_eq!(rows.len(), term as usize);
    let worst = rows
        .iter()
        .map(|r| (r.installment_amount - level).abs())
        .max()
        .unwrap();
    assert!(worst <= dec!(0.02), "term {term}: drift {worst} from level {level}");
    assert_eq!(rows.last().unwrap().remaining_principal, Decimal::ZERO);
    assert_eq!(principal_sum(&req), principal);
}

#[test]
fn test_equal_installment_twenty_years_at_fifty_percent() {
    assert_level_over_long_term(dec!(1000000), dec!(0.50), 240);
}

#[test]
fn test_equal_installment_maximum_term_at_sixty_percent() {
    assert_level_over_long_term(dec!(5000000), dec!(0.60), 600);
}

#[test]
fn test_equal_installment_longer_term_smaller_payment() {
    let mut previous: Option<Money> = None;
    for term in [6u32, 12, 24, 48] {
        let out = calculate_schedule(&loan(LoanScheme::EqualInstallment, dec!(200000), dec!(0.40), term)).unwrap();
        let level = out.result.level_installment.unwrap();
        if let Some(prev) = previous {
            assert!(level < prev, "term {term}: {level} !< {prev}");
        }
        previous = Some(level);
    }
}

#[test]
fn test_zero_rate_matches_equal_principal() {
    let installment = calculate_schedule(&loan(LoanScheme::EqualInstallment, dec!(120000), dec!(0), 12)).unwrap();
    let principal = calculate_schedule(&loan(LoanScheme::EqualPrincipal, dec!(120000), dec!(0), 12)).unwrap();
    assert_eq!(installment.result.level_installment, Some(dec!(10000)));
    assert_eq!(
        installment.result.installments[0].principal_payment,
        principal.result.installments[0].principal_payment
    );
}

#[test]
fn test_equal_installment_semiannual() {
    let req = LoanRequest {
        frequency: PaymentFrequency::SemiAnnual,
        ..loan(LoanScheme::EqualInstallment, dec!(300000), dec!(0.30), 4)
    };
    let out = calculate_schedule(&req).unwrap();
    // 15% per half-year on 300,000
    assert_eq!(out.result.installments[0].interest_payment, dec!(45000));
    assert_eq!(out.result.installments[0].accrual_days, 180);
    assert_eq!(out.result.installments[3].remaining_principal, Decimal::ZERO);
}

// ===========================================================================
// Commission, tax and cost
// ===========================================================================

#[test]
fn test_upfront_commission_outside_installments() {
    let req = LoanRequest {
        commission_rate: dec!(0.02),
        ..loan(LoanScheme::EqualInstallment, dec!(100000), dec!(0.30), 12)
    };
    let out = calculate_schedule(&req).unwrap();
    assert_eq!(out.result.installments.len(), 12);
    let charge = out.result.upfront_charge.unwrap();
    assert_eq!(charge.payment_date, start());
    assert_eq!(charge.commission, dec!(2000));
    assert_eq!(charge.bsmv, dec!(100));
    assert!(out.result.installments.iter().all(|r| r.commission_payment.is_zero()));
}

#[test]
fn test_amortized_commission_spread_over_rows() {
    let req = LoanRequest {
        commission_rate: dec!(0.012),
        commission_mode: CommissionMode::Amortized,
        ..loan(LoanScheme::EqualPrincipal, dec!(100000), dec!(0.30), 12)
    };
    let out = calculate_schedule(&req).unwrap();
    assert!(out.result.upfront_charge.is_none());
    let rows = &out.result.installments;
    assert_eq!(rows[0].commission_payment, dec!(100));
    // 2,500 interest × 5% + 100 commission × 5%
    assert_eq!(rows[0].bsmv, dec!(130));
    let total: Money = rows.iter().map(|r| r.commission_payment).sum();
    assert_eq!(total, dec!(1200));
}

#[test]
fn test_all_in_rate_tracks_nominal_without_extras() {
    let req = LoanRequest {
        bsmv_rate: Decimal::ZERO,
        holidays: kredi_core::calendar::HolidayCalendarKind::WeekendsOnly,
        ..loan(LoanScheme::EqualPrincipal, dec!(120000), dec!(0.12), 12)
    };
    let out = calculate_schedule(&req).unwrap();
    let all_in = out.result.cost.all_in_rate;
    // Actual-day maturity vs 30/360 interest keeps it close to, not exactly, 12%
    assert!((all_in - dec!(0.12)).abs() < dec!(0.005), "got {all_in}");
}

#[test]
fn test_actual_accrual_changes_interest() {
    let fixed = calculate_schedule(&loan(LoanScheme::EqualPrincipal, dec!(100000), dec!(0.30), 6)).unwrap();
    let actual = calculate_schedule(&LoanRequest {
        accrual_basis: AccrualBasis::Actual,
        ..loan(LoanScheme::EqualPrincipal, dec!(100000), dec!(0.30), 6)
    })
    .unwrap();
    assert_eq!(
        fixed.result.totals.total_principal,
        actual.result.totals.total_principal
    );
    assert!(actual.result.installments.iter().any(|r| r.accrual_days != 30));
}

// ===========================================================================
// Validation
// ===========================================================================

#[test]
fn test_invalid_inputs_are_reported_by_field() {
    let cases = [
        (LoanRequest { principal: dec!(-5), ..loan(LoanScheme::EqualPrincipal, dec!(1), dec!(0.1), 1) }, "principal"),
        (LoanRequest { term: 0, ..loan(LoanScheme::EqualPrincipal, dec!(1000), dec!(0.1), 1) }, "term"),
        (LoanRequest { term: 601, ..loan(LoanScheme::EqualPrincipal, dec!(1000), dec!(0.1), 1) }, "term"),
        (LoanRequest { annual_rate: dec!(-0.1), ..loan(LoanScheme::EqualInstallment, dec!(1000), dec!(0.1), 1) }, "annual_rate"),
        (LoanRequest { commission_rate: dec!(1.5), ..loan(LoanScheme::EqualInstallment, dec!(1000), dec!(0.1), 1) }, "commission_rate"),
    ];

    for (req, expected_field) in cases {
        match calculate_schedule(&req) {
            Err(KrediError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected InvalidInput on {expected_field}, got {other:?}"),
        }
    }
}

//! Federal income tax pipeline.
//!
//! Turns one [`TaxInput`] plus one year's [`TaxYearParameters`] into a
//! [`TaxBreakdown`]. The steps run in a fixed order because later steps
//! consume earlier results:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Self-employment tax; half becomes an above-the-line deduction |
//! | 2    | Adjusted gross income |
//! | 3    | Deduction selection (standard + age/blind increments vs. itemized) |
//! | 4    | Split capital gains; ordinary income and taxable ordinary before QBI |
//! | 5    | QBI deduction (20% of QBI, capped at 20% of income) |
//! | 6    | Adjusted taxable ordinary income |
//! | 7    | Ordinary tax via the bracket walk |
//! | 8    | Capital-gains tax, stacked on top of ordinary income |
//! | 9    | Net investment income tax |
//! | 10   | Additional Medicare tax |
//! | 11   | Child tax credit (step-function phase-out) |
//! | 12   | Total before AMT, floored at zero |
//! | 13   | Alternative minimum tax |
//! | 14   | Total federal tax |
//! | 15   | Estimated quarterly payment |
//!
//! # Simplifications
//!
//! The AMT here is a deliberate simplification of the Form 6251 worksheet:
//! the tentative minimum tax is compared against ordinary plus capital-gains
//! tax only; SE tax, NIIT, the Additional Medicare tax, and credits are all
//! outside the comparison, and capital gains get no AMT-specific rate
//! treatment. Likewise the QBI deduction carries no SSTB or wage limits, and
//! the NIIT has no de minimis carve-outs. The NIIT investment-income term is
//! intentionally not floored at zero, so a net capital loss flows through.

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::brackets::compute_bracket_tax;
use crate::calculations::common::{max, round_half_up, round_rate};
use crate::error::TaxEngineError;
use crate::models::{
    DeductionType, FilingStatus, TaxBreakdown, TaxInput, TaxYearParameters,
};
use crate::providers::TaxYearDataProvider;
use crate::validation;

/// Portion of self-employment income subject to SE tax.
fn se_net_earnings_factor() -> Decimal {
    Decimal::new(9235, 4)
}

/// Net investment income tax rate (3.8%).
fn niit_rate() -> Decimal {
    Decimal::new(38, 3)
}

/// NIIT thresholds are statutory and unindexed, so they are not part of the
/// per-year parameter tables.
fn niit_threshold(status: FilingStatus) -> Decimal {
    match status {
        FilingStatus::Single | FilingStatus::HeadOfHousehold => Decimal::from(200_000),
        FilingStatus::MarriedFilingJointly => Decimal::from(250_000),
        FilingStatus::MarriedFilingSeparately => Decimal::from(125_000),
    }
}

/// Convenience entry point that resolves the year's parameter table first.
///
/// # Errors
///
/// Fails with [`TaxEngineError::UnsupportedTaxYear`] when the provider has
/// no table for the request's year; otherwise as
/// [`FederalTaxPipeline::calculate`].
pub fn calculate_federal_tax(
    provider: &dyn TaxYearDataProvider,
    input: &TaxInput,
) -> Result<TaxBreakdown, TaxEngineError> {
    let params = provider
        .get(input.tax_year)
        .ok_or(TaxEngineError::UnsupportedTaxYear(input.tax_year))?;
    FederalTaxPipeline::new(params).calculate(input)
}

/// Input with all defaults resolved, so the calculation steps never touch
/// an `Option`.
#[derive(Debug, Clone)]
struct ResolvedInput {
    filing_status: FilingStatus,
    gross_income: Decimal,
    w2_income: Decimal,
    se_income: Decimal,
    long_term_gains: Decimal,
    short_term_gains: Decimal,
    above_the_line: Decimal,
    itemized: Decimal,
    dependents: u32,
    additional_deduction_conditions: u32,
    qbi: Decimal,
    iso_exercise_spread: Decimal,
    state_tax_deducted: Decimal,
}

impl ResolvedInput {
    fn resolve(input: &TaxInput) -> Self {
        let capital_gains = input.capital_gains.unwrap_or_default();
        let long_term_gains = if input.capital_gains_are_short_term {
            Decimal::ZERO
        } else {
            capital_gains
        };
        let short_term_gains = input.short_term_capital_gains.unwrap_or(
            if input.capital_gains_are_short_term {
                capital_gains
            } else {
                Decimal::ZERO
            },
        );

        let additional_deduction_conditions = [
            input.age_65_or_older,
            input.blind,
            input.spouse_age_65_or_older,
            input.spouse_blind,
        ]
        .into_iter()
        .filter(|flag| *flag)
        .count() as u32;

        Self {
            filing_status: input.filing_status,
            gross_income: input.gross_income,
            w2_income: input.w2_income.unwrap_or_default(),
            se_income: input.self_employment_income.unwrap_or_default(),
            long_term_gains,
            short_term_gains,
            above_the_line: input.above_the_line_deductions.unwrap_or_default(),
            itemized: input.itemized_deductions.unwrap_or_default(),
            dependents: input.dependents,
            additional_deduction_conditions,
            qbi: input.qualified_business_income.unwrap_or_default(),
            iso_exercise_spread: input.iso_exercise_spread.unwrap_or_default(),
            state_tax_deducted: input.state_tax_deducted.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SeTax {
    tax: Decimal,
    /// Deductible employer-equivalent half.
    deduction: Decimal,
}

/// Calculator for one year's federal tax.
#[derive(Debug, Clone)]
pub struct FederalTaxPipeline<'a> {
    params: &'a TaxYearParameters,
}

impl<'a> FederalTaxPipeline<'a> {
    pub fn new(params: &'a TaxYearParameters) -> Self {
        Self { params }
    }

    /// Runs the full pipeline and returns a fresh breakdown.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError::InvalidInput`] with every field violation
    /// found, or [`TaxEngineError::Calculation`] when the parameter table
    /// itself is malformed. Never returns a partial breakdown.
    pub fn calculate(&self, input: &TaxInput) -> Result<TaxBreakdown, TaxEngineError> {
        let violations = validation::validate(input);
        if !violations.is_empty() {
            return Err(TaxEngineError::InvalidInput(violations));
        }
        self.params
            .validate()
            .map_err(|e| TaxEngineError::Calculation(e.to_string()))?;

        let resolved = ResolvedInput::resolve(input);
        let status = resolved.filing_status;

        // Step 1: self-employment tax; half is deductible above the line.
        let se = self.self_employment_tax(resolved.se_income);

        // Step 2: adjusted gross income.
        let agi = resolved.gross_income - resolved.above_the_line - se.deduction;

        // Step 3: deduction selection. Ties favor the standard deduction.
        let standard = self.standard_deduction(status, resolved.additional_deduction_conditions);
        let (deduction_type, deduction_amount) = select_deduction(resolved.itemized, standard);

        // Step 4: gains split; long-term gains leave the ordinary base.
        let ordinary_income = resolved.gross_income - resolved.long_term_gains;
        let taxable_ordinary_before_qbi = max(
            ordinary_income - resolved.above_the_line - se.deduction - deduction_amount,
            Decimal::ZERO,
        );

        // Steps 5-6: QBI deduction, then the ordinary base it reduces.
        let qbi_deduction = self.qbi_deduction(
            resolved.qbi,
            taxable_ordinary_before_qbi,
            resolved.long_term_gains,
        );
        let adjusted_taxable_ordinary =
            max(taxable_ordinary_before_qbi - qbi_deduction, Decimal::ZERO);

        // Step 7: ordinary tax. The breakdown keeps exact per-bracket
        // amounts; nothing is rounded inside the walk.
        let ordinary = compute_bracket_tax(adjusted_taxable_ordinary, self.params.brackets.get(status));

        // Step 8: capital-gains tiers fill up starting where ordinary
        // income ends.
        let capital_gains_tax =
            self.capital_gains_tax(status, resolved.long_term_gains, adjusted_taxable_ordinary);

        // Step 9: net investment income tax.
        let investment_income = resolved.long_term_gains + resolved.short_term_gains;
        let net_investment_income_tax =
            self.net_investment_income_tax(status, agi, investment_income);

        // Step 10: Additional Medicare tax on earned income.
        let additional_medicare_tax =
            self.additional_medicare_tax(status, resolved.w2_income + resolved.se_income);

        // Step 11: child tax credit.
        let child_tax_credit = self.child_tax_credit(status, resolved.dependents, agi);

        // Step 12: credits cannot push the pre-AMT total below zero.
        let total_before_amt = max(
            ordinary.total + capital_gains_tax + se.tax + net_investment_income_tax
                + additional_medicare_tax
                - child_tax_credit,
            Decimal::ZERO,
        );

        // Step 13: AMT against ordinary plus capital-gains tax only.
        let alternative_minimum_tax = self.alternative_minimum_tax(
            &resolved,
            taxable_ordinary_before_qbi,
            deduction_type,
            ordinary.total + capital_gains_tax,
        );

        // Steps 14-15.
        let total_federal_tax = round_half_up(total_before_amt + alternative_minimum_tax);
        let estimated_quarterly_payment = (total_federal_tax / Decimal::from(4)).ceil();

        let effective_rate = if resolved.gross_income.is_zero() {
            Decimal::ZERO
        } else {
            round_rate(total_federal_tax / resolved.gross_income)
        };

        Ok(TaxBreakdown {
            tax_year: self.params.tax_year,
            filing_status: status,
            adjusted_gross_income: round_half_up(agi),
            deduction_type,
            deduction_amount,
            qbi_deduction,
            taxable_income: max(agi - deduction_amount - qbi_deduction, Decimal::ZERO),
            bracket_breakdown: ordinary.breakdown,
            ordinary_income_tax: ordinary.total,
            capital_gains_tax,
            self_employment_tax: se.tax,
            net_investment_income_tax,
            additional_medicare_tax,
            alternative_minimum_tax,
            child_tax_credit,
            total_federal_tax,
            effective_rate,
            marginal_rate: ordinary.marginal_rate,
            estimated_quarterly_payment,
        })
    }

    /// Step 1. SS and Medicare shares are doubled because a self-employed
    /// taxpayer owes both halves.
    fn self_employment_tax(
        &self,
        se_income: Decimal,
    ) -> SeTax {
        if se_income <= Decimal::ZERO {
            if se_income < Decimal::ZERO {
                warn!(
                    se_income = %se_income,
                    "self-employment income is negative; no SE tax due"
                );
            }
            return SeTax {
                tax: Decimal::ZERO,
                deduction: Decimal::ZERO,
            };
        }

        let net_earnings = se_income * se_net_earnings_factor();
        let ss_tax = net_earnings.min(self.params.social_security.wage_base)
            * self.params.social_security.tax_rate
            * Decimal::TWO;
        let medicare_tax = net_earnings * self.params.medicare.tax_rate * Decimal::TWO;
        let tax = round_half_up(ss_tax + medicare_tax);

        SeTax {
            tax,
            deduction: round_half_up(tax / Decimal::TWO),
        }
    }

    /// Step 3. One increment per true condition among taxpayer/spouse
    /// age-65 and blindness.
    fn standard_deduction(
        &self,
        status: FilingStatus,
        additional_conditions: u32,
    ) -> Decimal {
        *self.params.standard_deduction.get(status)
            + *self.params.additional_deduction.get(status) * Decimal::from(additional_conditions)
    }

    /// Step 5. 20% of QBI, capped at 20% of ordinary taxable income plus
    /// long-term gains.
    fn qbi_deduction(
        &self,
        qbi: Decimal,
        taxable_ordinary_before_qbi: Decimal,
        long_term_gains: Decimal,
    ) -> Decimal {
        let twenty_percent = Decimal::new(20, 2);
        round_half_up(
            (qbi * twenty_percent)
                .min((taxable_ordinary_before_qbi + long_term_gains) * twenty_percent),
        )
    }

    /// Step 8. Gains stack on top of ordinary income: each preferential
    /// tier only has room left above the ordinary base.
    fn capital_gains_tax(
        &self,
        status: FilingStatus,
        gains: Decimal,
        ordinary_floor: Decimal,
    ) -> Decimal {
        if gains <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let mut remaining = gains;
        let mut floor = ordinary_floor;
        let mut tax = Decimal::ZERO;

        for tier in self.params.capital_gains_brackets.get(status) {
            let taxable = match tier.threshold {
                Some(threshold) => remaining.min(max(threshold - floor, Decimal::ZERO)),
                None => remaining,
            };
            tax += taxable * tier.rate;
            floor += taxable;
            remaining -= taxable;
            if remaining <= Decimal::ZERO {
                break;
            }
        }

        round_half_up(tax)
    }

    /// Step 9. The investment-income term is deliberately not floored: a
    /// net capital loss carries through the `min` and reduces the result.
    fn net_investment_income_tax(
        &self,
        status: FilingStatus,
        agi: Decimal,
        investment_income: Decimal,
    ) -> Decimal {
        let excess_agi = max(agi - niit_threshold(status), Decimal::ZERO);
        round_half_up(niit_rate() * investment_income.min(excess_agi))
    }

    /// Step 10.
    fn additional_medicare_tax(
        &self,
        status: FilingStatus,
        earned_income: Decimal,
    ) -> Decimal {
        let threshold = *self.params.medicare.additional_tax_threshold.get(status);
        round_half_up(
            self.params.medicare.additional_tax_rate * max(earned_income - threshold, Decimal::ZERO),
        )
    }

    /// Step 11. The phase-out is a step function: every started $1,000 of
    /// AGI above the threshold costs a full `phaseout_rate`.
    fn child_tax_credit(
        &self,
        status: FilingStatus,
        dependents: u32,
        agi: Decimal,
    ) -> Decimal {
        if dependents == 0 {
            return Decimal::ZERO;
        }

        let credit = Decimal::from(dependents) * self.params.child_tax_credit.amount;
        let phaseout_start = *self.params.child_tax_credit.phaseout_start.get(status);
        if agi <= phaseout_start {
            return credit;
        }

        let steps = ((agi - phaseout_start) / Decimal::from(1000)).ceil();
        max(
            credit - steps * self.params.child_tax_credit.phaseout_rate,
            Decimal::ZERO,
        )
    }

    /// Step 13. The state-tax addback only applies when the taxpayer
    /// itemized, since the standard deduction never contained it.
    fn alternative_minimum_tax(
        &self,
        resolved: &ResolvedInput,
        taxable_ordinary_before_qbi: Decimal,
        deduction_type: DeductionType,
        regular_tax: Decimal,
    ) -> Decimal {
        let state_tax_addback = match deduction_type {
            DeductionType::Itemized => resolved.state_tax_deducted,
            DeductionType::Standard => Decimal::ZERO,
        };
        let amt_income = taxable_ordinary_before_qbi
            + resolved.long_term_gains
            + resolved.iso_exercise_spread
            + state_tax_addback;

        let status = resolved.filing_status;
        let phased_out = max(
            amt_income - *self.params.amt.phaseout_start.get(status),
            Decimal::ZERO,
        ) * Decimal::new(25, 2);
        let exemption = max(
            *self.params.amt.exemption.get(status) - phased_out,
            Decimal::ZERO,
        );
        let amt_base = max(amt_income - exemption, Decimal::ZERO);

        let rate26 = Decimal::new(26, 2);
        let rate28 = Decimal::new(28, 2);
        let rate28_threshold = self.params.amt.rate28_threshold;
        let tentative = if amt_base <= rate28_threshold {
            amt_base * rate26
        } else {
            rate28_threshold * rate26 + (amt_base - rate28_threshold) * rate28
        };

        round_half_up(max(tentative - regular_tax, Decimal::ZERO))
    }
}

/// Step 3 selection: itemized wins only when strictly greater.
fn select_deduction(
    itemized: Decimal,
    standard: Decimal,
) -> (DeductionType, Decimal) {
    if itemized > standard {
        (DeductionType::Itemized, itemized)
    } else {
        (DeductionType::Standard, standard)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;
    use crate::models::{
        AmtParameters, ByFilingStatus, CapitalGainsBracket, ChildTaxCreditParameters,
        MedicareParameters, SaltCapParameters, SocialSecurityParameters, TaxBracket,
    };

    /// Initializes tracing subscriber for tests that verify log output.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn brackets(bounds: &[(i64, Option<i64>, &str)]) -> Vec<TaxBracket> {
        bounds
            .iter()
            .map(|(min, max, rate)| {
                TaxBracket::new(
                    Decimal::from(*min),
                    max.map(Decimal::from),
                    rate.parse().unwrap(),
                )
            })
            .collect()
    }

    fn gains_tiers(first: i64, second: i64) -> Vec<CapitalGainsBracket> {
        vec![
            CapitalGainsBracket {
                rate: dec!(0),
                threshold: Some(Decimal::from(first)),
            },
            CapitalGainsBracket {
                rate: dec!(0.15),
                threshold: Some(Decimal::from(second)),
            },
            CapitalGainsBracket {
                rate: dec!(0.20),
                threshold: None,
            },
        ]
    }

    /// Full 2024 parameter table.
    fn params_2024() -> TaxYearParameters {
        TaxYearParameters {
            tax_year: 2024,
            brackets: ByFilingStatus {
                single: brackets(&[
                    (0, Some(11600), "0.10"),
                    (11600, Some(47150), "0.12"),
                    (47150, Some(100525), "0.22"),
                    (100525, Some(191950), "0.24"),
                    (191950, Some(243725), "0.32"),
                    (243725, Some(609350), "0.35"),
                    (609350, None, "0.37"),
                ]),
                married_filing_jointly: brackets(&[
                    (0, Some(23200), "0.10"),
                    (23200, Some(94300), "0.12"),
                    (94300, Some(201050), "0.22"),
                    (201050, Some(383900), "0.24"),
                    (383900, Some(487450), "0.32"),
                    (487450, Some(731200), "0.35"),
                    (731200, None, "0.37"),
                ]),
                married_filing_separately: brackets(&[
                    (0, Some(11600), "0.10"),
                    (11600, Some(47150), "0.12"),
                    (47150, Some(100525), "0.22"),
                    (100525, Some(191950), "0.24"),
                    (191950, Some(243725), "0.32"),
                    (243725, Some(365600), "0.35"),
                    (365600, None, "0.37"),
                ]),
                head_of_household: brackets(&[
                    (0, Some(16550), "0.10"),
                    (16550, Some(63100), "0.12"),
                    (63100, Some(100500), "0.22"),
                    (100500, Some(191950), "0.24"),
                    (191950, Some(243700), "0.32"),
                    (243700, Some(609350), "0.35"),
                    (609350, None, "0.37"),
                ]),
            },
            standard_deduction: ByFilingStatus {
                single: dec!(14600),
                married_filing_jointly: dec!(29200),
                married_filing_separately: dec!(14600),
                head_of_household: dec!(21900),
            },
            additional_deduction: ByFilingStatus {
                single: dec!(1950),
                married_filing_jointly: dec!(1550),
                married_filing_separately: dec!(1550),
                head_of_household: dec!(1950),
            },
            capital_gains_brackets: ByFilingStatus {
                single: gains_tiers(47025, 518900),
                married_filing_jointly: gains_tiers(94050, 583750),
                married_filing_separately: gains_tiers(47025, 291850),
                head_of_household: gains_tiers(63000, 551350),
            },
            social_security: SocialSecurityParameters {
                tax_rate: dec!(0.062),
                wage_base: dec!(168600),
            },
            medicare: MedicareParameters {
                tax_rate: dec!(0.0145),
                additional_tax_rate: dec!(0.009),
                additional_tax_threshold: ByFilingStatus {
                    single: dec!(200000),
                    married_filing_jointly: dec!(250000),
                    married_filing_separately: dec!(125000),
                    head_of_household: dec!(200000),
                },
            },
            child_tax_credit: ChildTaxCreditParameters {
                amount: dec!(2000),
                phaseout_start: ByFilingStatus {
                    single: dec!(200000),
                    married_filing_jointly: dec!(400000),
                    married_filing_separately: dec!(200000),
                    head_of_household: dec!(200000),
                },
                phaseout_rate: dec!(50),
            },
            amt: AmtParameters {
                exemption: ByFilingStatus {
                    single: dec!(85700),
                    married_filing_jointly: dec!(133300),
                    married_filing_separately: dec!(66650),
                    head_of_household: dec!(85700),
                },
                phaseout_start: ByFilingStatus {
                    single: dec!(609350),
                    married_filing_jointly: dec!(1218700),
                    married_filing_separately: dec!(609350),
                    head_of_household: dec!(609350),
                },
                rate28_threshold: dec!(232600),
            },
            salt_cap: SaltCapParameters {
                base: dec!(10000),
                married_separate: dec!(5000),
                enhanced_cap: None,
                enhanced_agi_threshold: None,
            },
            obbb_deductions: None,
        }
    }

    fn single_input(gross: Decimal) -> TaxInput {
        TaxInput::new(2024, FilingStatus::Single, gross)
    }

    // =========================================================================
    // wage-earner baseline tests
    // =========================================================================

    #[test]
    fn single_filer_at_100k_uses_standard_deduction() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);

        let result = pipeline.calculate(&single_input(dec!(100000))).unwrap();

        assert_eq!(result.deduction_type, DeductionType::Standard);
        assert_eq!(result.deduction_amount, dec!(14600));
        assert_eq!(result.taxable_income, dec!(85400));
        // 1160 + 4266 + 8415
        assert_eq!(result.ordinary_income_tax, dec!(13841.00));
        assert_eq!(result.marginal_rate, dec!(0.22));
        assert_eq!(result.total_federal_tax, dec!(13841.00));
        assert_eq!(result.effective_rate, dec!(0.1384));
        // ceil(13841 / 4)
        assert_eq!(result.estimated_quarterly_payment, dec!(3461));
    }

    #[test]
    fn single_filer_at_50k() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);

        let result = pipeline.calculate(&single_input(dec!(50000))).unwrap();

        assert_eq!(result.taxable_income, dec!(35400));
        // 1160 + 23800 × 12%
        assert_eq!(result.ordinary_income_tax, dec!(4016.00));
        assert_eq!(result.marginal_rate, dec!(0.12));
    }

    #[test]
    fn zero_gross_income_yields_zero_tax_and_rates() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);

        let result = pipeline.calculate(&single_input(dec!(0))).unwrap();

        assert_eq!(result.total_federal_tax, dec!(0.00));
        assert_eq!(result.effective_rate, dec!(0));
        assert_eq!(result.marginal_rate, dec!(0));
        assert_eq!(result.bracket_breakdown, vec![]);
    }

    #[test]
    fn repeated_calls_produce_identical_breakdowns() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(123456.78));
        input.self_employment_income = Some(dec!(20000));
        input.capital_gains = Some(dec!(10000));
        input.dependents = 1;

        let first = pipeline.calculate(&input).unwrap();
        let second = pipeline.calculate(&input).unwrap();

        assert_eq!(first, second);
    }

    // =========================================================================
    // deduction selection tests
    // =========================================================================

    #[test]
    fn age_and_blind_flags_each_add_an_increment() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(100000));
        input.age_65_or_older = true;
        input.blind = true;

        let result = pipeline.calculate(&input).unwrap();

        // 14600 + 2 × 1950
        assert_eq!(result.deduction_amount, dec!(18500));
    }

    #[test]
    fn spouse_flags_add_increments_for_joint_filers() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = TaxInput::new(2024, FilingStatus::MarriedFilingJointly, dec!(150000));
        input.age_65_or_older = true;
        input.spouse_age_65_or_older = true;
        input.spouse_blind = true;

        let result = pipeline.calculate(&input).unwrap();

        // 29200 + 3 × 1550
        assert_eq!(result.deduction_amount, dec!(33850));
    }

    #[test]
    fn itemized_equal_to_standard_keeps_standard() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(100000));
        input.itemized_deductions = Some(dec!(14600));

        let result = pipeline.calculate(&input).unwrap();

        assert_eq!(result.deduction_type, DeductionType::Standard);
        assert_eq!(result.deduction_amount, dec!(14600));
    }

    #[test]
    fn itemized_above_standard_wins() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(100000));
        input.itemized_deductions = Some(dec!(20000));

        let result = pipeline.calculate(&input).unwrap();

        assert_eq!(result.deduction_type, DeductionType::Itemized);
        assert_eq!(result.taxable_income, dec!(80000));
    }

    // =========================================================================
    // self-employment tax tests
    // =========================================================================

    #[test]
    fn se_tax_doubles_both_shares_and_deducts_half() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(100000));
        input.self_employment_income = Some(dec!(100000));

        let result = pipeline.calculate(&input).unwrap();

        // Net earnings 92350; SS 92350 × 12.4% = 11451.40;
        // Medicare 92350 × 2.9% = 2678.15
        assert_eq!(result.self_employment_tax, dec!(14129.55));
        assert_eq!(result.adjusted_gross_income, dec!(92935.22));
        // Ordinary base: 100000 - 7064.78 - 14600 = 78335.22
        assert_eq!(result.ordinary_income_tax, dec!(12286.7484));
        assert_eq!(result.total_federal_tax, dec!(26416.30));
    }

    #[test]
    fn se_tax_social_security_share_caps_at_wage_base() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(300000));
        input.self_employment_income = Some(dec!(300000));

        let result = pipeline.calculate(&input).unwrap();

        // Net earnings 277050 capped at 168600 for SS: 168600 × 12.4% =
        // 20906.40; Medicare 277050 × 2.9% = 8034.45
        assert_eq!(result.self_employment_tax, dec!(28940.85));
    }

    #[test]
    fn negative_se_income_owes_no_se_tax() {
        let _guard = init_test_tracing();
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(100000));
        input.self_employment_income = Some(dec!(-8000));

        let result = pipeline.calculate(&input).unwrap();

        assert_eq!(result.self_employment_tax, dec!(0));
        assert_eq!(result.adjusted_gross_income, dec!(100000));
    }

    // =========================================================================
    // capital gains tests
    // =========================================================================

    #[test]
    fn long_term_gains_stack_above_ordinary_income() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(100000));
        input.capital_gains = Some(dec!(20000));

        let result = pipeline.calculate(&input).unwrap();

        // Ordinary base 65400 already exceeds the 0% tier cap of 47025,
        // so all 20000 lands in the 15% tier.
        assert_eq!(result.ordinary_income_tax, dec!(9441.00));
        assert_eq!(result.capital_gains_tax, dec!(3000.00));
        assert_eq!(result.taxable_income, dec!(85400));
        assert_eq!(result.total_federal_tax, dec!(12441.00));
    }

    #[test]
    fn gains_within_zero_tier_are_untaxed() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(50000));
        input.capital_gains = Some(dec!(10000));

        let result = pipeline.calculate(&input).unwrap();

        // Ordinary base 25400 leaves 21625 of room in the 0% tier.
        assert_eq!(result.capital_gains_tax, dec!(0.00));
        assert_eq!(result.ordinary_income_tax, dec!(2816.00));
    }

    #[test]
    fn short_term_flag_keeps_gains_in_ordinary_income() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(100000));
        input.capital_gains = Some(dec!(20000));
        input.capital_gains_are_short_term = true;

        let result = pipeline.calculate(&input).unwrap();

        assert_eq!(result.capital_gains_tax, dec!(0.00));
        // Nothing left the ordinary base.
        assert_eq!(result.ordinary_income_tax, dec!(13841.00));
    }

    // =========================================================================
    // QBI deduction tests
    // =========================================================================

    #[test]
    fn qbi_deduction_is_twenty_percent_of_qbi() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(100000));
        input.qualified_business_income = Some(dec!(50000));

        let result = pipeline.calculate(&input).unwrap();

        assert_eq!(result.qbi_deduction, dec!(10000.00));
        assert_eq!(result.taxable_income, dec!(75400));
        // 1160 + 4266 + 28250 × 22%
        assert_eq!(result.ordinary_income_tax, dec!(11641.00));
    }

    #[test]
    fn qbi_deduction_caps_at_twenty_percent_of_income() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(20000));
        input.qualified_business_income = Some(dec!(100000));

        let result = pipeline.calculate(&input).unwrap();

        // Ordinary base is 5400, so the cap is 1080, not 20000.
        assert_eq!(result.qbi_deduction, dec!(1080.00));
        assert_eq!(result.taxable_income, dec!(4320));
    }

    // =========================================================================
    // NIIT tests
    // =========================================================================

    #[test]
    fn niit_taxes_investment_income_above_the_threshold() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(250000));
        input.capital_gains = Some(dec!(50000));

        let result = pipeline.calculate(&input).unwrap();

        // min(50000, 250000 - 200000) × 3.8%
        assert_eq!(result.net_investment_income_tax, dec!(1900.00));
    }

    #[test]
    fn niit_is_zero_below_the_agi_threshold() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(100000));
        input.capital_gains = Some(dec!(20000));

        let result = pipeline.calculate(&input).unwrap();

        assert_eq!(result.net_investment_income_tax, dec!(0.00));
    }

    #[test]
    fn niit_term_goes_negative_on_net_capital_loss() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(250000));
        input.capital_gains = Some(dec!(-30000));
        input.short_term_capital_gains = Some(dec!(-20000));

        let result = pipeline.calculate(&input).unwrap();

        // The loss passes through min() unfloored and offsets other tax.
        assert_eq!(result.net_investment_income_tax, dec!(-1900.00));
        // Ordinary base grows to 265400 because the long-term loss is
        // backed out of gross income: tax 63264.75, minus the NIIT term.
        assert_eq!(result.total_federal_tax, dec!(61364.75));
    }

    // =========================================================================
    // Additional Medicare tax tests
    // =========================================================================

    #[test]
    fn additional_medicare_applies_above_earned_income_threshold() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(250000));
        input.w2_income = Some(dec!(250000));

        let result = pipeline.calculate(&input).unwrap();

        // (250000 - 200000) × 0.9%
        assert_eq!(result.additional_medicare_tax, dec!(450.00));
    }

    #[test]
    fn additional_medicare_threshold_depends_on_status() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = TaxInput::new(2024, FilingStatus::MarriedFilingSeparately, dec!(150000));
        input.w2_income = Some(dec!(150000));

        let result = pipeline.calculate(&input).unwrap();

        // MFS threshold is 125000.
        assert_eq!(result.additional_medicare_tax, dec!(225.00));
    }

    // =========================================================================
    // child tax credit tests
    // =========================================================================

    #[test]
    fn child_tax_credit_scales_with_dependents() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = TaxInput::new(2024, FilingStatus::MarriedFilingJointly, dec!(150000));
        input.dependents = 2;

        let result = pipeline.calculate(&input).unwrap();

        assert_eq!(result.child_tax_credit, dec!(4000));
        // 10852 + 5830 - 4000
        assert_eq!(result.total_federal_tax, dec!(12682.00));
    }

    #[test]
    fn child_tax_credit_phases_out_in_thousand_dollar_steps() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);

        let mut at_ten_steps = single_input(dec!(210000));
        at_ten_steps.dependents = 1;
        let mut at_eleven_steps = single_input(dec!(210001));
        at_eleven_steps.dependents = 1;

        let ten = pipeline.calculate(&at_ten_steps).unwrap();
        let eleven = pipeline.calculate(&at_eleven_steps).unwrap();

        // One extra dollar of AGI starts a new $1,000 step.
        assert_eq!(ten.child_tax_credit, dec!(1500));
        assert_eq!(eleven.child_tax_credit, dec!(1450));
    }

    #[test]
    fn child_tax_credit_floors_at_zero() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(300000));
        input.dependents = 1;

        let result = pipeline.calculate(&input).unwrap();

        assert_eq!(result.child_tax_credit, dec!(0));
    }

    // =========================================================================
    // AMT tests
    // =========================================================================

    #[test]
    fn iso_exercise_spread_triggers_amt() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(100000));
        input.iso_exercise_spread = Some(dec!(300000));

        let result = pipeline.calculate(&input).unwrap();

        // AMT income 385400, exemption 85700, base 299700:
        // 232600 × 26% + 67100 × 28% = 79264; minus regular 13841.
        assert_eq!(result.alternative_minimum_tax, dec!(65423.00));
        assert_eq!(result.total_federal_tax, dec!(79264.00));
    }

    #[test]
    fn amt_exemption_phases_down_and_state_tax_adds_back_when_itemizing() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(100000));
        input.itemized_deductions = Some(dec!(20000));
        input.state_tax_deducted = Some(dec!(10000));
        input.iso_exercise_spread = Some(dec!(600000));

        let result = pipeline.calculate(&input).unwrap();

        // AMT income 690000; exemption 85700 - 25% × 80650 = 65537.50;
        // base 624462.50; tentative 170197.50; regular tax 12653.
        assert_eq!(result.alternative_minimum_tax, dec!(157544.50));
    }

    #[test]
    fn state_tax_is_not_added_back_under_the_standard_deduction() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut with_addback = single_input(dec!(100000));
        with_addback.state_tax_deducted = Some(dec!(10000));

        let result = pipeline.calculate(&with_addback).unwrap();

        // Standard deduction chosen, so the state-tax field is inert.
        assert_eq!(result.alternative_minimum_tax, dec!(0.00));
    }

    #[test]
    fn no_amt_when_regular_tax_exceeds_tentative() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);

        let result = pipeline.calculate(&single_input(dec!(400000))).unwrap();

        assert_eq!(result.alternative_minimum_tax, dec!(0.00));
    }

    // =========================================================================
    // error tests
    // =========================================================================

    #[test]
    fn invalid_input_aggregates_all_violations() {
        let params = params_2024();
        let pipeline = FederalTaxPipeline::new(&params);
        let mut input = single_input(dec!(-1));
        input.itemized_deductions = Some(dec!(-50));

        let err = pipeline.calculate(&input).unwrap_err();

        let fields: Vec<_> = err.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["gross_income", "itemized_deductions"]);
    }

    #[test]
    fn malformed_parameter_table_is_a_calculation_error() {
        let mut params = params_2024();
        params.brackets.single[1].min_income = dec!(99999);
        let pipeline = FederalTaxPipeline::new(&params);

        let err = pipeline.calculate(&single_input(dec!(50000))).unwrap_err();

        assert!(matches!(err, TaxEngineError::Calculation(_)));
    }

    #[test]
    fn unsupported_year_fails_at_the_provider_boundary() {
        struct OneYear(TaxYearParameters);
        impl TaxYearDataProvider for OneYear {
            fn get(&self, year: i32) -> Option<&TaxYearParameters> {
                (year == self.0.tax_year).then_some(&self.0)
            }
            fn supported_years(&self) -> Vec<i32> {
                vec![self.0.tax_year]
            }
        }

        let provider = OneYear(params_2024());

        let ok = calculate_federal_tax(&provider, &single_input(dec!(50000)));
        assert!(ok.is_ok());

        let err = calculate_federal_tax(&provider, &TaxInput::new(2023, FilingStatus::Single, dec!(50000)))
            .unwrap_err();
        assert_eq!(err, TaxEngineError::UnsupportedTaxYear(2023));
    }
}

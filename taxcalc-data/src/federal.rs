//! Bundled federal parameter tables.
//!
//! One hand-authored [`TaxYearParameters`] per supported year, transcribed
//! from the published schedules. 2025 carries the revised standard
//! deductions, the 2200 child tax credit, the enhanced SALT cap with its
//! 500000 AGI phase-down threshold, and the new per-category deduction
//! caps.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use taxcalc_core::models::{
    AmtParameters, ByFilingStatus, CapitalGainsBracket, ChildTaxCreditParameters,
    MedicareParameters, ObbbDeductions, SaltCapParameters, SocialSecurityParameters, TaxBracket,
    TaxYearParameters,
};
use taxcalc_core::providers::TaxYearDataProvider;

fn money(amount: i64) -> Decimal {
    Decimal::from(amount)
}

fn rate(mantissa: i64, scale: u32) -> Decimal {
    Decimal::new(mantissa, scale)
}

fn schedule(rows: &[(i64, Option<i64>, i64, u32)]) -> Vec<TaxBracket> {
    rows.iter()
        .map(|(min, max, mantissa, scale)| {
            TaxBracket::new(money(*min), max.map(money), rate(*mantissa, *scale))
        })
        .collect()
}

fn gains_tiers(zero_up_to: i64, fifteen_up_to: i64) -> Vec<CapitalGainsBracket> {
    vec![
        CapitalGainsBracket {
            rate: Decimal::ZERO,
            threshold: Some(money(zero_up_to)),
        },
        CapitalGainsBracket {
            rate: rate(15, 2),
            threshold: Some(money(fifteen_up_to)),
        },
        CapitalGainsBracket {
            rate: rate(20, 2),
            threshold: None,
        },
    ]
}

/// 2024 parameter table.
pub fn year_2024() -> TaxYearParameters {
    TaxYearParameters {
        tax_year: 2024,
        brackets: ByFilingStatus {
            single: schedule(&[
                (0, Some(11_600), 10, 2),
                (11_600, Some(47_150), 12, 2),
                (47_150, Some(100_525), 22, 2),
                (100_525, Some(191_950), 24, 2),
                (191_950, Some(243_725), 32, 2),
                (243_725, Some(609_350), 35, 2),
                (609_350, None, 37, 2),
            ]),
            married_filing_jointly: schedule(&[
                (0, Some(23_200), 10, 2),
                (23_200, Some(94_300), 12, 2),
                (94_300, Some(201_050), 22, 2),
                (201_050, Some(383_900), 24, 2),
                (383_900, Some(487_450), 32, 2),
                (487_450, Some(731_200), 35, 2),
                (731_200, None, 37, 2),
            ]),
            married_filing_separately: schedule(&[
                (0, Some(11_600), 10, 2),
                (11_600, Some(47_150), 12, 2),
                (47_150, Some(100_525), 22, 2),
                (100_525, Some(191_950), 24, 2),
                (191_950, Some(243_725), 32, 2),
                (243_725, Some(365_600), 35, 2),
                (365_600, None, 37, 2),
            ]),
            head_of_household: schedule(&[
                (0, Some(16_550), 10, 2),
                (16_550, Some(63_100), 12, 2),
                (63_100, Some(100_500), 22, 2),
                (100_500, Some(191_950), 24, 2),
                (191_950, Some(243_700), 32, 2),
                (243_700, Some(609_350), 35, 2),
                (609_350, None, 37, 2),
            ]),
        },
        standard_deduction: ByFilingStatus {
            single: money(14_600),
            married_filing_jointly: money(29_200),
            married_filing_separately: money(14_600),
            head_of_household: money(21_900),
        },
        additional_deduction: ByFilingStatus {
            single: money(1_950),
            married_filing_jointly: money(1_550),
            married_filing_separately: money(1_550),
            head_of_household: money(1_950),
        },
        capital_gains_brackets: ByFilingStatus {
            single: gains_tiers(47_025, 518_900),
            married_filing_jointly: gains_tiers(94_050, 583_750),
            married_filing_separately: gains_tiers(47_025, 291_850),
            head_of_household: gains_tiers(63_000, 551_350),
        },
        social_security: SocialSecurityParameters {
            tax_rate: rate(62, 3),
            wage_base: money(168_600),
        },
        medicare: MedicareParameters {
            tax_rate: rate(145, 4),
            additional_tax_rate: rate(9, 3),
            additional_tax_threshold: ByFilingStatus {
                single: money(200_000),
                married_filing_jointly: money(250_000),
                married_filing_separately: money(125_000),
                head_of_household: money(200_000),
            },
        },
        child_tax_credit: ChildTaxCreditParameters {
            amount: money(2_000),
            phaseout_start: ByFilingStatus {
                single: money(200_000),
                married_filing_jointly: money(400_000),
                married_filing_separately: money(200_000),
                head_of_household: money(200_000),
            },
            phaseout_rate: money(50),
        },
        amt: AmtParameters {
            exemption: ByFilingStatus {
                single: money(85_700),
                married_filing_jointly: money(133_300),
                married_filing_separately: money(66_650),
                head_of_household: money(85_700),
            },
            phaseout_start: ByFilingStatus {
                single: money(609_350),
                married_filing_jointly: money(1_218_700),
                married_filing_separately: money(609_350),
                head_of_household: money(609_350),
            },
            rate28_threshold: money(232_600),
        },
        salt_cap: SaltCapParameters {
            base: money(10_000),
            married_separate: money(5_000),
            enhanced_cap: None,
            enhanced_agi_threshold: None,
        },
        obbb_deductions: None,
    }
}

/// 2025 parameter table.
pub fn year_2025() -> TaxYearParameters {
    TaxYearParameters {
        tax_year: 2025,
        brackets: ByFilingStatus {
            single: schedule(&[
                (0, Some(11_925), 10, 2),
                (11_925, Some(48_475), 12, 2),
                (48_475, Some(103_350), 22, 2),
                (103_350, Some(197_300), 24, 2),
                (197_300, Some(250_525), 32, 2),
                (250_525, Some(626_350), 35, 2),
                (626_350, None, 37, 2),
            ]),
            married_filing_jointly: schedule(&[
                (0, Some(23_850), 10, 2),
                (23_850, Some(96_950), 12, 2),
                (96_950, Some(206_700), 22, 2),
                (206_700, Some(394_600), 24, 2),
                (394_600, Some(501_050), 32, 2),
                (501_050, Some(751_600), 35, 2),
                (751_600, None, 37, 2),
            ]),
            married_filing_separately: schedule(&[
                (0, Some(11_925), 10, 2),
                (11_925, Some(48_475), 12, 2),
                (48_475, Some(103_350), 22, 2),
                (103_350, Some(197_300), 24, 2),
                (197_300, Some(250_525), 32, 2),
                (250_525, Some(375_800), 35, 2),
                (375_800, None, 37, 2),
            ]),
            head_of_household: schedule(&[
                (0, Some(17_000), 10, 2),
                (17_000, Some(64_850), 12, 2),
                (64_850, Some(103_350), 22, 2),
                (103_350, Some(197_300), 24, 2),
                (197_300, Some(250_500), 32, 2),
                (250_500, Some(626_350), 35, 2),
                (626_350, None, 37, 2),
            ]),
        },
        standard_deduction: ByFilingStatus {
            single: money(15_750),
            married_filing_jointly: money(31_500),
            married_filing_separately: money(15_750),
            head_of_household: money(23_625),
        },
        additional_deduction: ByFilingStatus {
            single: money(2_000),
            married_filing_jointly: money(1_600),
            married_filing_separately: money(1_600),
            head_of_household: money(2_000),
        },
        capital_gains_brackets: ByFilingStatus {
            single: gains_tiers(48_350, 533_400),
            married_filing_jointly: gains_tiers(96_700, 600_050),
            married_filing_separately: gains_tiers(48_350, 300_000),
            head_of_household: gains_tiers(64_750, 566_700),
        },
        social_security: SocialSecurityParameters {
            tax_rate: rate(62, 3),
            wage_base: money(176_100),
        },
        medicare: MedicareParameters {
            tax_rate: rate(145, 4),
            additional_tax_rate: rate(9, 3),
            additional_tax_threshold: ByFilingStatus {
                single: money(200_000),
                married_filing_jointly: money(250_000),
                married_filing_separately: money(125_000),
                head_of_household: money(200_000),
            },
        },
        child_tax_credit: ChildTaxCreditParameters {
            amount: money(2_200),
            phaseout_start: ByFilingStatus {
                single: money(200_000),
                married_filing_jointly: money(400_000),
                married_filing_separately: money(200_000),
                head_of_household: money(200_000),
            },
            phaseout_rate: money(50),
        },
        amt: AmtParameters {
            exemption: ByFilingStatus {
                single: money(88_100),
                married_filing_jointly: money(137_000),
                married_filing_separately: money(68_500),
                head_of_household: money(88_100),
            },
            phaseout_start: ByFilingStatus {
                single: money(626_350),
                married_filing_jointly: money(1_252_700),
                married_filing_separately: money(626_350),
                head_of_household: money(626_350),
            },
            rate28_threshold: money(239_100),
        },
        salt_cap: SaltCapParameters {
            base: money(10_000),
            married_separate: money(5_000),
            enhanced_cap: Some(money(40_000)),
            enhanced_agi_threshold: Some(money(500_000)),
        },
        obbb_deductions: Some(ObbbDeductions {
            tips_deduction_cap: money(25_000),
            overtime_deduction_cap: money(12_500),
            senior_bonus_deduction: money(6_000),
            car_loan_interest_cap: money(10_000),
        }),
    }
}

/// All bundled year tables, keyed by tax year.
#[derive(Debug, Clone)]
pub struct BundledYearTables {
    years: BTreeMap<i32, TaxYearParameters>,
}

impl BundledYearTables {
    pub fn new() -> Self {
        let years = [year_2024(), year_2025()]
            .into_iter()
            .map(|params| (params.tax_year, params))
            .collect();
        Self { years }
    }
}

impl Default for BundledYearTables {
    fn default() -> Self {
        Self::new()
    }
}

impl TaxYearDataProvider for BundledYearTables {
    fn get(&self, year: i32) -> Option<&TaxYearParameters> {
        self.years.get(&year)
    }

    fn supported_years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn bundled_tables_pass_structural_validation() {
        for year in [year_2024(), year_2025()] {
            assert_eq!(year.validate(), Ok(()), "year {}", year.tax_year);
        }
    }

    #[test]
    fn provider_supports_exactly_the_bundled_years() {
        let tables = BundledYearTables::new();

        assert_eq!(tables.supported_years(), vec![2024, 2025]);
        assert!(tables.get(2024).is_some());
        assert!(tables.get(2023).is_none());
    }

    #[test]
    fn standard_deductions_match_the_published_amounts() {
        assert_eq!(year_2024().standard_deduction.single, dec!(14600));
        assert_eq!(year_2025().standard_deduction.single, dec!(15750));
        assert_eq!(year_2025().standard_deduction.married_filing_jointly, dec!(31500));
    }

    #[test]
    fn only_2025_carries_the_enhanced_salt_cap() {
        assert_eq!(year_2024().salt_cap.enhanced_cap, None);
        assert_eq!(year_2025().salt_cap.enhanced_cap, Some(dec!(40000)));
        assert_eq!(year_2025().salt_cap.enhanced_agi_threshold, Some(dec!(500000)));
    }

    #[test]
    fn only_2025_carries_the_new_deduction_caps() {
        assert_eq!(year_2024().obbb_deductions, None);

        let caps = year_2025().obbb_deductions.unwrap();
        assert_eq!(caps.tips_deduction_cap, dec!(25000));
        assert_eq!(caps.senior_bonus_deduction, dec!(6000));
    }

    #[test]
    fn wage_base_rises_between_years() {
        assert_eq!(year_2024().social_security.wage_base, dec!(168600));
        assert_eq!(year_2025().social_security.wage_base, dec!(176100));
    }
}

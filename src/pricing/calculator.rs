use rust_decimal::Decimal;

use crate::pricing::{PricingEntry, QuoteResponse, Region, ServiceType};

/// Flat fee schedule in naira
pub struct FeeCalculator;

impl FeeCalculator {
    /// Fee for a service in a region
    pub fn fee_for(service: ServiceType, region: Region) -> Decimal {
        let naira: i64 = match (service, region) {
            (ServiceType::LinkOne, Region::LagosAbuja) => 130_000,
            (ServiceType::LinkOne, Region::OtherStates) => 120_000,
            (ServiceType::LinkTwo, Region::LagosAbuja) => 100_000,
            (ServiceType::LinkTwo, Region::OtherStates) => 90_000,
            (ServiceType::Medical, _) => 240_000,
            (ServiceType::Origin, _) => 250_000,
            (ServiceType::NormalRelocate, Region::LagosAbuja) => 130_000,
            (ServiceType::NormalRelocate, Region::OtherStates) => 120_000,
            (ServiceType::ExpressRelocate, Region::LagosAbuja) => 230_000,
            (ServiceType::ExpressRelocate, Region::OtherStates) => 210_000,
        };
        Decimal::from(naira)
    }

    /// Compute the fee for an application
    ///
    /// Pure function of its inputs; an unset service type costs nothing.
    pub fn calculate(service: Option<ServiceType>, state_of_choices: &str) -> Decimal {
        match service {
            Some(service) => {
                Self::fee_for(service, Region::from_state_of_choices(state_of_choices))
            }
            None => Decimal::ZERO,
        }
    }

    /// Build a quote, including the rate label shown for region-priced services
    pub fn quote(service: Option<ServiceType>, state_of_choices: &str) -> QuoteResponse {
        let region = Region::from_state_of_choices(state_of_choices);
        let rate_label = service
            .filter(|s| s.is_region_priced())
            .map(|_| region.rate_label().to_string());

        QuoteResponse {
            service_type: service,
            region,
            amount: Self::calculate(service, state_of_choices),
            rate_label,
        }
    }
}

/// Rows for the public pricing table, in display order
pub fn pricing_table() -> Vec<PricingEntry> {
    ServiceType::ALL
        .iter()
        .map(|&service| PricingEntry {
            service_type: service,
            name: service.display_name().to_string(),
            description: service.description().to_string(),
            lagos_abuja: FeeCalculator::fee_for(service, Region::LagosAbuja),
            other_states: FeeCalculator::fee_for(service, Region::OtherStates),
            region_priced: service.is_region_priced(),
            note: (service == ServiceType::Origin)
                .then(|| "Terms and conditions apply".to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_link_one_fees() {
        assert_eq!(
            FeeCalculator::calculate(Some(ServiceType::LinkOne), "Lagos"),
            dec!(130000)
        );
        assert_eq!(
            FeeCalculator::calculate(Some(ServiceType::LinkOne), "Enugu"),
            dec!(120000)
        );
    }

    #[test]
    fn test_link_two_fees() {
        assert_eq!(
            FeeCalculator::calculate(Some(ServiceType::LinkTwo), "abuja"),
            dec!(100000)
        );
        assert_eq!(
            FeeCalculator::calculate(Some(ServiceType::LinkTwo), "Kaduna"),
            dec!(90000)
        );
    }

    #[test]
    fn test_medical_is_flat() {
        assert_eq!(
            FeeCalculator::calculate(Some(ServiceType::Medical), "Lagos"),
            dec!(240000)
        );
        assert_eq!(
            FeeCalculator::calculate(Some(ServiceType::Medical), "Sokoto"),
            dec!(240000)
        );
    }

    #[test]
    fn test_origin_is_flat() {
        assert_eq!(
            FeeCalculator::calculate(Some(ServiceType::Origin), "Abuja"),
            dec!(250000)
        );
        assert_eq!(
            FeeCalculator::calculate(Some(ServiceType::Origin), ""),
            dec!(250000)
        );
    }

    #[test]
    fn test_relocation_fees() {
        assert_eq!(
            FeeCalculator::calculate(Some(ServiceType::NormalRelocate), "Lagos, Oyo"),
            dec!(130000)
        );
        assert_eq!(
            FeeCalculator::calculate(Some(ServiceType::NormalRelocate), "Oyo"),
            dec!(120000)
        );
        assert_eq!(
            FeeCalculator::calculate(Some(ServiceType::ExpressRelocate), "ABUJA"),
            dec!(230000)
        );
        assert_eq!(
            FeeCalculator::calculate(Some(ServiceType::ExpressRelocate), "Rivers"),
            dec!(210000)
        );
    }

    #[test]
    fn test_unset_service_is_free() {
        assert_eq!(FeeCalculator::calculate(None, "Lagos"), Decimal::ZERO);
    }

    #[test]
    fn test_substring_match_counts_as_lagos() {
        // "Lagos" anywhere in the free text selects the higher rate
        assert_eq!(
            FeeCalculator::calculate(Some(ServiceType::LinkOne), "Ogun (near lagosian border)"),
            dec!(130000)
        );
    }

    #[test]
    fn test_quote_rate_label_only_for_region_priced() {
        let quote = FeeCalculator::quote(Some(ServiceType::LinkOne), "Abuja");
        assert_eq!(quote.rate_label.as_deref(), Some("Lagos/Abuja rate applied"));

        let quote = FeeCalculator::quote(Some(ServiceType::Medical), "Abuja");
        assert!(quote.rate_label.is_none());
        assert_eq!(quote.amount, dec!(240000));

        let quote = FeeCalculator::quote(None, "Abuja");
        assert!(quote.rate_label.is_none());
        assert_eq!(quote.amount, Decimal::ZERO);
    }

    #[test]
    fn test_pricing_table_matches_calculator() {
        let table = pricing_table();
        assert_eq!(table.len(), 6);
        for row in &table {
            assert_eq!(
                row.lagos_abuja,
                FeeCalculator::calculate(Some(row.service_type), "Lagos")
            );
            assert_eq!(
                row.other_states,
                FeeCalculator::calculate(Some(row.service_type), "Benue")
            );
        }
        let origin = table
            .iter()
            .find(|r| r.service_type == ServiceType::Origin)
            .unwrap();
        assert_eq!(origin.note.as_deref(), Some("Terms and conditions apply"));
    }
}

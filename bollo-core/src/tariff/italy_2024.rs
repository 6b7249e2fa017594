//! Built-in tariff table: averaged Italian rates for 2024.
//!
//! A complete table would carry a full region × class matrix; regions here
//! share the national per-kW rates and differ only by multiplier.

use std::collections::BTreeMap;

use rust_decimal_macros::dec;

use super::{BaseRate, ExemptionRules, TariffTable};
use crate::models::{EmissionsClass, Region};

impl TariffTable {
    pub fn italy_2024() -> Self {
        let base_rates = BTreeMap::from([
            (EmissionsClass::Euro0, BaseRate::new(dec!(3.00), dec!(4.50))),
            (EmissionsClass::Euro1, BaseRate::new(dec!(2.90), dec!(4.35))),
            (EmissionsClass::Euro2, BaseRate::new(dec!(2.80), dec!(4.20))),
            (EmissionsClass::Euro3, BaseRate::new(dec!(2.70), dec!(4.05))),
            (EmissionsClass::Euro4, BaseRate::new(dec!(2.58), dec!(3.87))),
            (EmissionsClass::Euro5, BaseRate::new(dec!(2.58), dec!(3.87))),
            (EmissionsClass::Euro6, BaseRate::new(dec!(2.58), dec!(3.87))),
        ]);

        let regional_modifiers = BTreeMap::from([
            (Region::Abruzzo, dec!(1.10)),
            (Region::Basilicata, dec!(1.00)),
            (Region::Calabria, dec!(1.10)),
            (Region::Campania, dec!(1.15)),
            (Region::EmiliaRomagna, dec!(1.00)),
            (Region::FriuliVeneziaGiulia, dec!(0.90)),
            (Region::Lazio, dec!(1.10)),
            (Region::Liguria, dec!(1.10)),
            (Region::Lombardia, dec!(1.00)),
            (Region::Marche, dec!(1.10)),
            (Region::Molise, dec!(1.10)),
            (Region::Piemonte, dec!(1.10)),
            (Region::Puglia, dec!(1.10)),
            (Region::Sardegna, dec!(1.00)),
            (Region::Sicilia, dec!(1.00)),
            (Region::Toscana, dec!(1.10)),
            (Region::TrentinoAltoAdige, dec!(0.90)),
            (Region::Umbria, dec!(1.10)),
            (Region::ValleDAosta, dec!(1.00)),
            (Region::Veneto, dec!(1.10)),
        ]);

        // Domiciliazione bancaria
        let direct_debit_discounts = BTreeMap::from([
            (Region::Lombardia, dec!(0.15)),
            (Region::EmiliaRomagna, dec!(0.10)),
            (Region::Veneto, dec!(0.10)),
            (Region::Abruzzo, dec!(0.10)),
            (Region::Molise, dec!(0.10)),
            (Region::Sardegna, dec!(0.10)),
            (Region::TrentinoAltoAdige, dec!(0.10)),
        ]);

        let exemptions = ExemptionRules {
            electric_years: 5,
            hybrid_by_region: BTreeMap::from([
                (Region::Lombardia, 5),
                (Region::Veneto, 3),
                (Region::Piemonte, 5),
                (Region::Lazio, 0),
                (Region::EmiliaRomagna, 0),
                (Region::Toscana, 0),
            ]),
            hybrid_default_years: 0,
        };

        Self {
            base_rates,
            regional_modifiers,
            direct_debit_discounts,
            exemptions,
        }
    }
}

impl Default for TariffTable {
    fn default() -> Self {
        Self::italy_2024()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::FuelType;

    #[test]
    fn built_in_table_passes_validation() {
        let table = TariffTable::italy_2024();

        let rebuilt = TariffTable::new(
            table.base_rates.clone(),
            table.regional_modifiers.clone(),
            table.direct_debit_discounts.clone(),
            table.exemptions.clone(),
        );

        assert_eq!(rebuilt, Ok(table));
    }

    #[test]
    fn every_region_has_a_modifier() {
        let table = TariffTable::italy_2024();

        for region in Region::ALL {
            assert!(
                table.regional_modifiers.contains_key(&region),
                "missing modifier for {region}"
            );
        }
    }

    #[test]
    fn every_class_has_a_rate() {
        let classes: Vec<_> = TariffTable::italy_2024().defined_classes().collect();

        assert_eq!(classes, EmissionsClass::ALL.to_vec());
    }

    #[test]
    fn lombardia_direct_debit_is_fifteen_percent() {
        let table = TariffTable::default();

        assert_eq!(table.direct_debit_discount(Region::Lombardia), dec!(0.15));
        assert_eq!(table.direct_debit_discount(Region::Lazio), Decimal::ZERO);
    }

    #[test]
    fn hybrid_policy_varies_by_region() {
        let table = TariffTable::default();

        assert_eq!(table.exemption_years(FuelType::Hybrid, Region::Lombardia), 5);
        assert_eq!(table.exemption_years(FuelType::Hybrid, Region::Veneto), 3);
        assert_eq!(table.exemption_years(FuelType::Hybrid, Region::Lazio), 0);
        assert_eq!(table.exemption_years(FuelType::Hybrid, Region::Puglia), 0);
        assert_eq!(table.exemption_years(FuelType::Electric, Region::Puglia), 5);
    }
}

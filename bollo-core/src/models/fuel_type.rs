use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::code::{UnknownCode, normalize_code};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FuelType {
    Petrol,
    Diesel,
    Lpg,
    NaturalGas,
    Hybrid,
    Electric,
}

impl FuelType {
    pub const ALL: [FuelType; 6] = [
        Self::Petrol,
        Self::Diesel,
        Self::Lpg,
        Self::NaturalGas,
        Self::Hybrid,
        Self::Electric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Petrol => "petrol",
            Self::Diesel => "diesel",
            Self::Lpg => "lpg",
            Self::NaturalGas => "natural-gas",
            Self::Hybrid => "hybrid",
            Self::Electric => "electric",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Petrol => "Petrol",
            Self::Diesel => "Diesel",
            Self::Lpg => "LPG",
            Self::NaturalGas => "Natural gas",
            Self::Hybrid => "Hybrid",
            Self::Electric => "Electric",
        }
    }

    /// Label printed on the Italian registration document (libretto).
    pub fn italian_label(&self) -> &'static str {
        match self {
            Self::Petrol => "Benzina",
            Self::Diesel => "Diesel",
            Self::Lpg => "GPL",
            Self::NaturalGas => "Metano",
            Self::Hybrid => "Ibrida",
            Self::Electric => "Elettrica",
        }
    }

    /// LPG and natural gas vehicles pay a reduced ecological rate.
    pub fn is_ecological(&self) -> bool {
        matches!(self, Self::Lpg | Self::NaturalGas)
    }

    /// Parses the English code or the Italian label, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = normalize_code(s);
        Self::ALL.into_iter().find(|fuel| {
            normalize_code(fuel.as_str()) == wanted || normalize_code(fuel.italian_label()) == wanted
        })
    }
}

impl fmt::Display for FuelType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FuelType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownCode::new("fuel type", s))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_english_codes() {
        assert_eq!(FuelType::parse("petrol"), Some(FuelType::Petrol));
        assert_eq!(FuelType::parse("natural-gas"), Some(FuelType::NaturalGas));
        assert_eq!(FuelType::parse("LPG"), Some(FuelType::Lpg));
    }

    #[test]
    fn parse_accepts_italian_labels() {
        assert_eq!(FuelType::parse("Benzina"), Some(FuelType::Petrol));
        assert_eq!(FuelType::parse("GPL"), Some(FuelType::Lpg));
        assert_eq!(FuelType::parse("Metano"), Some(FuelType::NaturalGas));
        assert_eq!(FuelType::parse("Ibrida"), Some(FuelType::Hybrid));
        assert_eq!(FuelType::parse("elettrica"), Some(FuelType::Electric));
    }

    #[test]
    fn parse_rejects_unknown_fuel() {
        assert_eq!(FuelType::parse("hydrogen"), None);
        assert!("kerosene".parse::<FuelType>().is_err());
    }

    #[test]
    fn only_lpg_and_natural_gas_are_ecological() {
        let ecological: Vec<_> = FuelType::ALL
            .into_iter()
            .filter(FuelType::is_ecological)
            .collect();

        assert_eq!(ecological, vec![FuelType::Lpg, FuelType::NaturalGas]);
    }
}

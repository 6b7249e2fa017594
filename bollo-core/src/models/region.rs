use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::code::{UnknownCode, normalize_code};

/// The twenty Italian regions. Each region sets its own bollo modifier,
/// direct-debit discount and hybrid exemption policy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    Abruzzo,
    Basilicata,
    Calabria,
    Campania,
    EmiliaRomagna,
    FriuliVeneziaGiulia,
    Lazio,
    Liguria,
    Lombardia,
    Marche,
    Molise,
    Piemonte,
    Puglia,
    Sardegna,
    Sicilia,
    Toscana,
    TrentinoAltoAdige,
    Umbria,
    ValleDAosta,
    Veneto,
}

impl Region {
    pub const ALL: [Region; 20] = [
        Self::Abruzzo,
        Self::Basilicata,
        Self::Calabria,
        Self::Campania,
        Self::EmiliaRomagna,
        Self::FriuliVeneziaGiulia,
        Self::Lazio,
        Self::Liguria,
        Self::Lombardia,
        Self::Marche,
        Self::Molise,
        Self::Piemonte,
        Self::Puglia,
        Self::Sardegna,
        Self::Sicilia,
        Self::Toscana,
        Self::TrentinoAltoAdige,
        Self::Umbria,
        Self::ValleDAosta,
        Self::Veneto,
    ];

    /// Stable code used for storage and CSV files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abruzzo => "abruzzo",
            Self::Basilicata => "basilicata",
            Self::Calabria => "calabria",
            Self::Campania => "campania",
            Self::EmiliaRomagna => "emilia-romagna",
            Self::FriuliVeneziaGiulia => "friuli-venezia-giulia",
            Self::Lazio => "lazio",
            Self::Liguria => "liguria",
            Self::Lombardia => "lombardia",
            Self::Marche => "marche",
            Self::Molise => "molise",
            Self::Piemonte => "piemonte",
            Self::Puglia => "puglia",
            Self::Sardegna => "sardegna",
            Self::Sicilia => "sicilia",
            Self::Toscana => "toscana",
            Self::TrentinoAltoAdige => "trentino-alto-adige",
            Self::Umbria => "umbria",
            Self::ValleDAosta => "valle-d-aosta",
            Self::Veneto => "veneto",
        }
    }

    /// Display name as written on Italian forms.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Abruzzo => "Abruzzo",
            Self::Basilicata => "Basilicata",
            Self::Calabria => "Calabria",
            Self::Campania => "Campania",
            Self::EmiliaRomagna => "Emilia Romagna",
            Self::FriuliVeneziaGiulia => "Friuli Venezia Giulia",
            Self::Lazio => "Lazio",
            Self::Liguria => "Liguria",
            Self::Lombardia => "Lombardia",
            Self::Marche => "Marche",
            Self::Molise => "Molise",
            Self::Piemonte => "Piemonte",
            Self::Puglia => "Puglia",
            Self::Sardegna => "Sardegna",
            Self::Sicilia => "Sicilia",
            Self::Toscana => "Toscana",
            Self::TrentinoAltoAdige => "Trentino Alto Adige",
            Self::Umbria => "Umbria",
            Self::ValleDAosta => "Valle d'Aosta",
            Self::Veneto => "Veneto",
        }
    }

    /// Parses a stable code or a display name, ignoring case and separators.
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = normalize_code(s);
        Self::ALL
            .into_iter()
            .find(|region| normalize_code(region.as_str()) == wanted)
    }
}

impl fmt::Display for Region {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Region {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownCode::new("region", s))
    }
}

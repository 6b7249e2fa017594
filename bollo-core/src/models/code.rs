use thiserror::Error;

/// Returned when a string does not name a known region, fuel type or
/// emissions class.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownCode {
    pub(crate) fn new(
        kind: &'static str,
        value: &str,
    ) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Lowercases and strips the separators people type in region and fuel
/// names, so `"Valle d'Aosta"`, `"valle-d-aosta"` and `"VALLE_D_AOSTA"`
/// compare equal.
pub(crate) fn normalize_code(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_' | '\'' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_code_strips_separators_and_case() {
        assert_eq!(normalize_code("Valle d'Aosta"), "valledaosta");
        assert_eq!(normalize_code(" EMILIA_ROMAGNA "), "emiliaromagna");
        assert_eq!(normalize_code("natural-gas"), "naturalgas");
    }

    #[test]
    fn unknown_code_message_names_kind_and_value() {
        let err = UnknownCode::new("region", "Atlantis");

        assert_eq!(err.to_string(), "unknown region 'Atlantis'");
    }
}

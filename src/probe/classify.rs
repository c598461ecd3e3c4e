//! HTTP status classification

use serde::Serialize;

/// Coarse class of an HTTP status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusClass {
    Success,
    Redirection,
    ClientError,
    ServerError,
    NonStandard,
}

impl StatusClass {
    /// Human message shown next to the code
    pub fn message(&self) -> &'static str {
        match self {
            StatusClass::Success => "Éxito: el sitio respondió correctamente.",
            StatusClass::Redirection => "Redirección: la URL puede haber sido movida o redirigida.",
            StatusClass::ClientError => "Error del cliente: revisa la dirección o tus permisos.",
            StatusClass::ServerError => "Error del servidor: el sitio tiene problemas internos.",
            StatusClass::NonStandard => "Código HTTP no estándar o poco común.",
        }
    }
}

/// Map a status code to its class. Total over all inputs.
pub fn classify(code: u16) -> StatusClass {
    match code {
        200..=299 => StatusClass::Success,
        300..=399 => StatusClass::Redirection,
        400..=499 => StatusClass::ClientError,
        500..=599 => StatusClass::ServerError,
        _ => StatusClass::NonStandard,
    }
}

/// Classifier message for a status code
pub fn describe(code: u16) -> &'static str {
    classify(code).message()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(classify(199), StatusClass::NonStandard);
        assert_eq!(classify(200), StatusClass::Success);
        assert_eq!(classify(299), StatusClass::Success);
        assert_eq!(classify(300), StatusClass::Redirection);
        assert_eq!(classify(404), StatusClass::ClientError);
        assert_eq!(classify(599), StatusClass::ServerError);
        assert_eq!(classify(600), StatusClass::NonStandard);
        assert_eq!(classify(0), StatusClass::NonStandard);
    }

    #[test]
    fn test_messages() {
        assert_eq!(describe(404), "Error del cliente: revisa la dirección o tus permisos.");
        assert_eq!(describe(102), "Código HTTP no estándar o poco común.");
    }

    proptest! {
        #[test]
        fn prop_class_follows_hundreds_digit(code in any::<u16>()) {
            let expected = match code / 100 {
                2 => StatusClass::Success,
                3 => StatusClass::Redirection,
                4 => StatusClass::ClientError,
                5 => StatusClass::ServerError,
                _ => StatusClass::NonStandard,
            };
            prop_assert_eq!(classify(code), expected);
        }
    }
}

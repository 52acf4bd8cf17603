//! Session bootstrap - credentials supplied by the host environment.

use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::ValidationError;

/// Query parameters that may carry the credential, in order of preference.
const CREDENTIAL_PARAMS: [&str; 2] = ["key", "apiKey"];

/// Extracts the credential from a launch URL's `key` or `apiKey` query
/// parameter.
///
/// `key` wins over `apiKey`; blank values are ignored. Returns `Ok(None)`
/// when neither parameter carries a value.
pub fn credential_from_launch_url(url: &str) -> Result<Option<SecretString>, ValidationError> {
    let url = Url::parse(url)
        .map_err(|e| ValidationError::invalid_format("launch_url", e.to_string()))?;

    for name in CREDENTIAL_PARAMS {
        let found = url
            .query_pairs()
            .filter(|(param, _)| param == name)
            .map(|(_, value)| value.trim().to_string())
            .find(|value| !value.is_empty());
        if let Some(value) = found {
            return Ok(Some(SecretString::new(value)));
        }
    }

    Ok(None)
}

/// First non-blank credential among `candidates`.
pub fn first_credential<I>(candidates: I) -> Option<SecretString>
where
    I: IntoIterator<Item = Option<SecretString>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|c| !c.expose_secret().trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exposed(c: Option<SecretString>) -> Option<String> {
        c.map(|c| c.expose_secret().clone())
    }

    #[test]
    fn key_parameter_is_extracted() {
        let c = credential_from_launch_url("https://quiz.example/?key=abc123").unwrap();
        assert_eq!(exposed(c), Some("abc123".to_string()));
    }

    #[test]
    fn api_key_parameter_is_fallback() {
        let c = credential_from_launch_url("https://quiz.example/?apiKey=xyz").unwrap();
        assert_eq!(exposed(c), Some("xyz".to_string()));
    }

    #[test]
    fn key_is_preferred_over_api_key() {
        let c = credential_from_launch_url("https://quiz.example/?apiKey=second&key=first").unwrap();
        assert_eq!(exposed(c), Some("first".to_string()));
    }

    #[test]
    fn blank_key_falls_through_to_api_key() {
        let c = credential_from_launch_url("https://quiz.example/?key=&apiKey=used").unwrap();
        assert_eq!(exposed(c), Some("used".to_string()));
    }

    #[test]
    fn percent_encoding_is_decoded() {
        let c = credential_from_launch_url("https://quiz.example/?key=a%2Bb").unwrap();
        assert_eq!(exposed(c), Some("a+b".to_string()));
    }

    #[test]
    fn no_parameter_yields_none() {
        assert!(credential_from_launch_url("https://quiz.example/?lang=nb")
            .unwrap()
            .is_none());
    }

    #[test]
    fn malformed_url_is_invalid_format() {
        let err = credential_from_launch_url("not a url").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn first_credential_skips_blank_and_missing() {
        let picked = first_credential([
            None,
            Some(SecretString::new("  ".to_string())),
            Some(SecretString::new("real".to_string())),
            Some(SecretString::new("later".to_string())),
        ]);
        assert_eq!(exposed(picked), Some("real".to_string()));
    }
}

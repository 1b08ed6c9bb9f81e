use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps a secret (session token, payment transaction id) so that it never shows up in
/// `Debug`/`Display` output, including `tracing` fields.
///
/// Serialization still writes the real value: request bodies need it.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Masked<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_value() {
        let token = Masked::new("eyJhbGciOi.secret".to_string());
        assert_eq!(format!("{:?}", token), "********");
        assert_eq!(token.to_string(), "********");
        assert_eq!(token.expose(), "eyJhbGciOi.secret");
    }

    #[test]
    fn test_serializes_real_value() {
        let txn = Masked::new("TXN-42".to_string());
        assert_eq!(serde_json::to_string(&txn).unwrap(), "\"TXN-42\"");

        let back: Masked<String> = serde_json::from_str("\"TXN-42\"").unwrap();
        assert_eq!(back, txn);
    }
}

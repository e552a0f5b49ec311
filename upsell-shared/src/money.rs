use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use std::fmt;

/// A money amount exactly as the platform reported it.
///
/// Amounts are never rounded or converted locally. A JSON number is kept as
/// its JSON text so `"10.00"` and `10.50` both survive untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(String);

impl Amount {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for blank text or anything that parses to zero ("0", "0.00").
    pub fn is_zero(&self) -> bool {
        let raw = self.0.trim();
        if raw.is_empty() {
            return true;
        }
        matches!(raw.parse::<f64>(), Ok(v) if v == 0.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Amount {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for Amount {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Raw text, so a number keeps its trailing zeros
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let text = raw.get().trim();

        if text.starts_with('"') {
            return serde_json::from_str::<String>(text).map(Amount).map_err(D::Error::custom);
        }
        match serde_json::from_str::<serde_json::Number>(text) {
            Ok(_) => Ok(Amount(text.to_string())),
            Err(_) => Err(D::Error::custom(format!("expected amount as string or number, got {}", text))),
        }
    }
}

/// Render an amount for display: missing or zero is "Free", anything else is `$<amount>`.
pub fn format_currency(amount: Option<&Amount>) -> String {
    match amount {
        Some(a) if !a.is_zero() => format!("${}", a),
        _ => "Free".to_string(),
    }
}

/// A summary line value. Shows a dash while the changeset is still being calculated.
pub fn money_line(amount: Option<&Amount>, loading: bool) -> String {
    if loading {
        "-".to_string()
    } else {
        format_currency(amount)
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlanId(pub String);

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a plan permits auto-renewal. The source data carries this as a
/// `Yes`/`No` string column, so the flag keeps a stable string rendering for
/// display and explanations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoRenewal {
    Yes,
    No,
}

impl AutoRenewal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" => Self::Yes,
            _ => Self::No,
        }
    }

    pub fn allowed(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    /// Non-negative list price.
    pub price: f64,
    pub auto_renewal: AutoRenewal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_renewal_parses_yes_variants_and_defaults_to_no() {
        assert_eq!(AutoRenewal::parse("Yes"), AutoRenewal::Yes);
        assert_eq!(AutoRenewal::parse("yes"), AutoRenewal::Yes);
        assert_eq!(AutoRenewal::parse("No"), AutoRenewal::No);
        assert_eq!(AutoRenewal::parse(""), AutoRenewal::No);
        assert!(AutoRenewal::Yes.allowed());
        assert!(!AutoRenewal::No.allowed());
    }
}

//! Role and classification enums shared across stores.

use serde::{Deserialize, Serialize};

/// Account role in the mock account table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Sees the admin panel on the dashboard.
    Admin,
    /// Regular shopper.
    Buyer,
    /// Read-mostly visitor account.
    Guest,
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Buyer => write!(f, "buyer"),
            Self::Guest => write!(f, "guest"),
        }
    }
}

impl std::str::FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "buyer" => Ok(Self::Buyer),
            "guest" => Ok(Self::Guest),
            _ => Err(format!("invalid account role: {s}")),
        }
    }
}

/// Interactive fixture a special catalog product renders instead of
/// ordinary product content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecialType {
    /// Embedded frame with its own button.
    Iframe,
    /// Open shadow root with an encapsulated button.
    #[serde(rename = "shadowdom")]
    ShadowDom,
    /// Browser alert raised immediately on interaction.
    InstantAlert,
    /// Sequence of popups after fixed delays.
    TimedPopup,
    /// Confirm dialog that must be accepted or dismissed.
    ConfirmDialog,
    /// Stacked modal layers.
    ModalPopup,
}

impl SpecialType {
    /// All special types in catalog order.
    pub const ALL: [Self; 6] = [
        Self::Iframe,
        Self::ShadowDom,
        Self::InstantAlert,
        Self::TimedPopup,
        Self::ConfirmDialog,
        Self::ModalPopup,
    ];

    /// Wire name, as shown on the product badge.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Iframe => "iframe",
            Self::ShadowDom => "shadowdom",
            Self::InstantAlert => "instant-alert",
            Self::TimedPopup => "timed-popup",
            Self::ConfirmDialog => "confirm-dialog",
            Self::ModalPopup => "modal-popup",
        }
    }
}

impl std::fmt::Display for SpecialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SpecialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("invalid special type: {s}"))
    }
}

/// Classification of a canned test scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Happy path.
    Positive,
    /// Expected failure surfaced to the user.
    Negative,
    /// Boundary or unusual input.
    Edge,
}

impl std::fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Edge => write!(f, "edge"),
        }
    }
}

impl std::str::FromStr for ScenarioKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "edge" => Ok(Self::Edge),
            _ => Err(format!("invalid scenario kind: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_special_type_wire_names() {
        for kind in SpecialType::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.as_str().parse::<SpecialType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_account_role_roundtrip() {
        for role in [AccountRole::Admin, AccountRole::Buyer, AccountRole::Guest] {
            assert_eq!(role.to_string().parse::<AccountRole>().unwrap(), role);
        }
        assert!("root".parse::<AccountRole>().is_err());
    }

    #[test]
    fn test_scenario_kind_parse() {
        assert_eq!("edge".parse::<ScenarioKind>().unwrap(), ScenarioKind::Edge);
        assert!("flaky".parse::<ScenarioKind>().is_err());
    }
}

//! Canned automation-test scenario catalog.
//!
//! The catalog is compiled in from `data/scenarios.yaml`. Every scenario has
//! human-readable steps; most also carry a structured [`Step`] script that
//! [`snippets`] renders into Selenium or Playwright source.

pub mod snippets;

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

use testmart_core::{Route, ScenarioKind};

pub use snippets::{Framework, SnippetError, render};

const CATALOG: &str = include_str!("../../data/scenarios.yaml");

static SCENARIOS: LazyLock<Vec<Scenario>> = LazyLock::new(|| {
    serde_yaml::from_str(CATALOG).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to parse scenario catalog");
        Vec::new()
    })
});

/// Storefront area a scenario exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    Authentication,
    Products,
    SpecialProducts,
    Cart,
    Checkout,
}

impl Area {
    /// All areas in page order.
    pub const ALL: [Self; 5] = [
        Self::Authentication,
        Self::Products,
        Self::SpecialProducts,
        Self::Cart,
        Self::Checkout,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Products => "products",
            Self::SpecialProducts => "special_products",
            Self::Cart => "cart",
            Self::Checkout => "checkout",
        }
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Area {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|area| area.as_str() == normalized)
            .ok_or_else(|| format!("invalid scenario area: {s}"))
    }
}

/// Something a script step acts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    /// A `data-testid` value.
    TestId(String),
    /// A raw CSS selector, for elements without a test id.
    Css { css: String },
}

impl Target {
    /// CSS selector for the target.
    #[must_use]
    pub fn css(&self) -> String {
        match self {
            Self::TestId(id) => format!("[data-testid=\"{id}\"]"),
            Self::Css { css } => css.clone(),
        }
    }
}

/// One structured script step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Navigate {
        #[serde(with = "route_path")]
        to: Route,
    },
    Fill {
        target: Target,
        value: String,
    },
    Click {
        target: Target,
    },
    /// Open a dropdown and pick one of its options.
    Select {
        target: Target,
        option: Target,
    },
    ExpectVisible {
        target: Target,
    },
    /// The target's text contains `text`.
    ExpectText {
        target: Target,
        text: String,
    },
    /// Accept the browser dialog raised by the previous step, optionally
    /// checking its message.
    AcceptDialog {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    WithinFrame {
        frame: Target,
        steps: Vec<Step>,
    },
    WithinShadowHost {
        host: Target,
        steps: Vec<Step>,
    },
}

/// A canned test scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Stable id such as `AUTH_001`.
    pub id: String,
    pub area: Area,
    pub kind: ScenarioKind,
    pub title: String,
    /// Human-readable instructions.
    pub steps: Vec<String>,
    pub expected: String,
    pub test_data: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub script: Vec<Step>,
}

impl Scenario {
    /// Whether the scenario can be rendered to automation source.
    #[must_use]
    pub fn has_script(&self) -> bool {
        !self.script.is_empty()
    }
}

/// Every scenario in catalog order.
#[must_use]
pub fn all() -> &'static [Scenario] {
    &SCENARIOS
}

/// Look up a scenario by id, ignoring ASCII case.
#[must_use]
pub fn find(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id.eq_ignore_ascii_case(id))
}

/// Scenarios matching both filters; `None` matches everything.
#[must_use]
pub fn filter(area: Option<Area>, kind: Option<ScenarioKind>) -> Vec<&'static Scenario> {
    SCENARIOS
        .iter()
        .filter(|s| area.is_none_or(|area| s.area == area))
        .filter(|s| kind.is_none_or(|kind| s.kind == kind))
        .collect()
}

mod route_path {
    use serde::{Deserialize, Deserializer, Serializer};

    use testmart_core::Route;

    pub fn serialize<S: Serializer>(route: &Route, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&route.path())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Route, D::Error> {
        let path = String::deserialize(deserializer)?;
        Ok(Route::parse(&path))
    }
}

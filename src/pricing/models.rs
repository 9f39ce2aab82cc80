use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Posting services offered by the portal
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    LinkOne,
    LinkTwo,
    Medical,
    Origin,
    NormalRelocate,
    ExpressRelocate,
}

impl ServiceType {
    pub const ALL: [ServiceType; 6] = [
        ServiceType::LinkOne,
        ServiceType::LinkTwo,
        ServiceType::Medical,
        ServiceType::Origin,
        ServiceType::NormalRelocate,
        ServiceType::ExpressRelocate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::LinkOne => "link_one",
            ServiceType::LinkTwo => "link_two",
            ServiceType::Medical => "medical",
            ServiceType::Origin => "origin",
            ServiceType::NormalRelocate => "normal_relocate",
            ServiceType::ExpressRelocate => "express_relocate",
        }
    }

    /// Label shown to applicants and in exports
    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceType::LinkOne => "Link One",
            ServiceType::LinkTwo => "Link Two",
            ServiceType::Medical => "Medical",
            ServiceType::Origin => "Origin",
            ServiceType::NormalRelocate => "Normal Relocation",
            ServiceType::ExpressRelocate => "Express Relocation",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ServiceType::LinkOne => "Standard direct posting service",
            ServiceType::LinkTwo => "Alternative posting option",
            ServiceType::Medical => "Medical personnel posting",
            ServiceType::Origin => "State of origin posting",
            ServiceType::NormalRelocate => "Standard relocation request",
            ServiceType::ExpressRelocate => "Priority relocation request",
        }
    }

    /// Whether the fee depends on the region in the state of choices.
    /// Medical and origin postings are charged a flat fee.
    pub fn is_region_priced(&self) -> bool {
        !matches!(self, ServiceType::Medical | ServiceType::Origin)
    }

    /// Parse a service type, accepting surrounding whitespace and any case
    pub fn from_str(s: &str) -> Result<Self, String> {
        let normalized = s.trim().to_lowercase();
        ServiceType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("Invalid service type: {}", s))
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pricing region derived from the applicant's state of choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    LagosAbuja,
    OtherStates,
}

impl Region {
    /// Lagos/Abuja rate applies when the free-text choice mentions either city
    pub fn from_state_of_choices(state_of_choices: &str) -> Self {
        let lowered = state_of_choices.to_lowercase();
        if lowered.contains("lagos") || lowered.contains("abuja") {
            Region::LagosAbuja
        } else {
            Region::OtherStates
        }
    }

    pub fn rate_label(&self) -> &'static str {
        match self {
            Region::LagosAbuja => "Lagos/Abuja rate applied",
            Region::OtherStates => "Other states rate applied",
        }
    }
}

/// One row of the public pricing table
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PricingEntry {
    pub service_type: ServiceType,
    #[schema(example = "Link One")]
    pub name: String,
    pub description: String,
    /// Fee when the state of choices includes Lagos or Abuja
    #[schema(value_type = f64, example = 130000)]
    pub lagos_abuja: Decimal,
    /// Fee for every other state
    #[schema(value_type = f64, example = 120000)]
    pub other_states: Decimal,
    pub region_priced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Query parameters for a fee quote
#[derive(Debug, Deserialize, IntoParams)]
pub struct QuoteQuery {
    /// Service type; an empty or missing value quotes zero
    pub service_type: Option<String>,
    /// Free-text state of choices, e.g. "Lagos, Ogun"
    #[serde(default)]
    pub state_of_choices: String,
}

/// Fee quote for a (service type, state of choices) pair
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    pub service_type: Option<ServiceType>,
    pub region: Region,
    #[schema(value_type = f64, example = 130000)]
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_label: Option<String>,
}

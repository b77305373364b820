//! The Provider entity (SPEC_FULL.md §3.2).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub specialty_code: String,
    #[serde(default)]
    pub tier: Option<String>,
    pub network_id: String,
    #[serde(default)]
    pub service_location: Option<String>,
}

impl Provider {
    /// `"PCP"` iff `specialty_code` is in the plan's cached PCP specialty
    /// set, else `None` — the designation is derived, never carried on the
    /// wire (SPEC_FULL.md §3.2).
    pub fn designation(&self, pcp_specialties: &std::collections::HashSet<String>) -> Option<&'static str> {
        if pcp_specialties.contains(&self.specialty_code) {
            Some("PCP")
        } else {
            None
        }
    }
}

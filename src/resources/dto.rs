use serde::{Deserialize, Serialize};

use crate::resources::repo_types::{Resource, ResourceRegistration};

/// Query string of `GET /resources`. Blank values are treated as absent.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFilter {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub search: Option<String>,
    pub difficulty: Option<String>,
    pub target_audience: Option<String>,
    pub is_free: Option<String>,
}

fn present(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ResourceFilter {
    pub fn matches(&self, r: &Resource) -> bool {
        if let Some(category) = present(&self.category) {
            if r.category != category {
                return false;
            }
        }
        if let Some(kind) = present(&self.resource_type) {
            if r.resource_type != kind {
                return false;
            }
        }
        if let Some(difficulty) = present(&self.difficulty) {
            if r.difficulty.as_deref() != Some(difficulty) {
                return false;
            }
        }
        if let Some(audience) = present(&self.target_audience) {
            match r.target_audience.as_deref() {
                Some(a) if a == audience || a == "all" => {}
                _ => return false,
            }
        }
        if present(&self.is_free).is_some_and(|v| v.eq_ignore_ascii_case("true")) && !r.is_free {
            return false;
        }
        if let Some(needle) = present(&self.search) {
            let needle = needle.to_lowercase();
            let in_title = r.title.to_lowercase().contains(&needle);
            let in_description = r
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Serialize)]
pub struct ResourceListResponse {
    pub resources: Vec<Resource>,
    pub total: usize,
    pub filters: ResourceFilter,
}

#[derive(Debug, Serialize)]
pub struct UpcomingResponse {
    pub events: Vec<Resource>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct TypesResponse {
    pub types: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct RegistrationsResponse {
    pub registrations: Vec<ResourceRegistration>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub registration: ResourceRegistration,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatusResponse {
    pub is_registered: bool,
}

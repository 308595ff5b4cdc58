//! Shared types for the API layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::config::ServerConfig;
use crate::models::enums::{ExtractionProfile, ParameterCategory};
use crate::pipeline::extraction::ParameterDefinition;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<ServerConfig>,
}

impl ApiContext {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Resolve an optional profile name against the configured default.
    pub fn resolve_profile(&self, requested: Option<&str>) -> Result<ExtractionProfile, ApiError> {
        match requested.map(str::trim).filter(|p| !p.is_empty()) {
            Some(name) => Ok(name.to_lowercase().parse::<ExtractionProfile>()?),
            None => Ok(self.config.default_profile),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Request / response shapes
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub profile: Option<String>,
    /// Result already produced for this text by another analyzer; used
    /// when it validates, otherwise extraction runs as usual.
    #[serde(default, rename = "externalResult")]
    pub external_result: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub profile: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    pub category: ParameterCategory,
    pub profile: ExtractionProfile,
}

impl From<&ParameterDefinition> for CatalogEntry {
    fn from(definition: &ParameterDefinition) -> Self {
        Self {
            key: definition.key.as_str(),
            name: definition.display_name,
            unit: definition.unit,
            category: definition.category,
            profile: definition.profile,
        }
    }
}

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::CatalogError;
use super::types::PassRecord;

/// Satellite header of a prediction-service response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SatelliteInfo {
    pub satid: u32,
    pub satname: String,
    #[serde(default)]
    pub transactionscount: u32,
    #[serde(default)]
    pub passescount: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PassDocument {
    ServiceError {
        error: String,
    },
    Response {
        info: SatelliteInfo,
        #[serde(default)]
        passes: Vec<PassRecord>,
    },
    Many(Vec<PassRecord>),
    Single(PassRecord),
}

/// Passes loaded from a saved prediction response.
#[derive(Debug, Clone)]
pub struct PassCatalog {
    pub satellite: Option<SatelliteInfo>,
    pub passes: Vec<PassRecord>,
}

impl PassCatalog {
    /// Accepts a full `visualpasses` response, a bare array of passes, or a
    /// single pass object.
    pub fn from_str(json: &str) -> Result<Self, CatalogError> {
        let catalog = match serde_json::from_str(json)? {
            PassDocument::ServiceError { error } => return Err(CatalogError::Service(error)),
            PassDocument::Response { info, passes } => PassCatalog {
                satellite: Some(info),
                passes,
            },
            PassDocument::Many(passes) => PassCatalog {
                satellite: None,
                passes,
            },
            PassDocument::Single(pass) => PassCatalog {
                satellite: None,
                passes: vec![pass],
            },
        };
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_str(&content)?;
        log::debug!(
            "Loaded {} passes from {}",
            catalog.passes.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn get(&self, index: usize) -> Result<&PassRecord, CatalogError> {
        self.passes
            .get(index)
            .ok_or(CatalogError::IndexOutOfRange {
                index,
                len: self.passes.len(),
            })
    }

    pub fn satellite_name(&self) -> Option<&str> {
        self.satellite.as_ref().map(|s| s.satname.as_str())
    }
}

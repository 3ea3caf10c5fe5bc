//! Equipment client: CRUD plus assignment and spreadsheet import.

use std::path::Path;
use tracing::info;

use super::{QueryParams, Resource, ResourceClient};
use crate::error::ClientError;
use crate::models::{
    Equipment, EquipmentAssignment, EquipmentDraft, EquipmentPatch, EquipmentStatus,
    EquipmentType, ImportOutcome,
};
use crate::pipeline::ApiRequest;

pub struct EquipmentResource;

impl Resource for EquipmentResource {
    const PATH: &'static str = "/equipment";
    const NAME: &'static str = "equipment";

    type Record = Equipment;
    type Draft = EquipmentDraft;
    type Patch = EquipmentPatch;
    type Filter = EquipmentFilter;
}

pub type EquipmentClient = ResourceClient<EquipmentResource>;

/// Server-side filters for the equipment list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EquipmentFilter {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub equipment_type: Option<EquipmentType>,
    pub status: Option<EquipmentStatus>,
}

impl QueryParams for EquipmentFilter {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(skip) = self.skip {
            params.push(("skip".to_string(), skip.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(equipment_type) = self.equipment_type {
            params.push(("equipment_type".to_string(), equipment_type.to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status".to_string(), status.to_string()));
        }
        params
    }
}

impl ResourceClient<EquipmentResource> {
    /// Assign a piece of equipment to an employee.
    pub async fn assign(
        &self,
        equipment_id: i64,
        employee_id: i64,
        notes: Option<String>,
    ) -> Result<Equipment, ClientError> {
        let body = EquipmentAssignment {
            equipment_id,
            employee_id,
            notes,
        };
        let request = ApiRequest::post("/equipment/assign").json(&body)?;
        let equipment: Equipment = self.pipeline().send_json(request).await?;
        info!(equipment_id, employee_id, "Equipment assigned");
        Ok(equipment)
    }

    /// Upload a spreadsheet of equipment rows.
    pub async fn import(&self, path: &Path) -> Result<ImportOutcome, ClientError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ClientError::InvalidRequest(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "import.xlsx".to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        self.import_bytes(&file_name, mime.essence_str(), bytes).await
    }

    pub async fn import_bytes(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<ImportOutcome, ClientError> {
        let size = bytes.len();
        let request = ApiRequest::post("/equipment/import").file("file", file_name, mime, bytes);
        let outcome: ImportOutcome = self.pipeline().send_json(request).await?;
        info!(file = file_name, size, "Equipment spreadsheet imported");
        Ok(outcome)
    }
}

//! Equipment records and write payloads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentType {
    Pc,
    Laptop,
    Monitor,
    Phone,
    Accessory,
}

impl EquipmentType {
    pub const ALL: [EquipmentType; 5] = [
        EquipmentType::Pc,
        EquipmentType::Laptop,
        EquipmentType::Monitor,
        EquipmentType::Phone,
        EquipmentType::Accessory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pc => "pc",
            Self::Laptop => "laptop",
            Self::Monitor => "monitor",
            Self::Phone => "phone",
            Self::Accessory => "accessory",
        }
    }

    /// Plural label used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pc => "PCs",
            Self::Laptop => "Laptops",
            Self::Monitor => "Monitors",
            Self::Phone => "Phones",
            Self::Accessory => "Accessories",
        }
    }
}

impl std::fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EquipmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pc" => Ok(Self::Pc),
            "laptop" => Ok(Self::Laptop),
            "monitor" | "screen" => Ok(Self::Monitor),
            "phone" => Ok(Self::Phone),
            "accessory" => Ok(Self::Accessory),
            _ => Err(format!("Unknown equipment type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCondition {
    New,
    Used,
    OutOfService,
}

impl std::fmt::Display for EquipmentCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Used => write!(f, "used"),
            Self::OutOfService => write!(f, "out_of_service"),
        }
    }
}

impl std::str::FromStr for EquipmentCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "new" => Ok(Self::New),
            "used" => Ok(Self::Used),
            "out_of_service" => Ok(Self::OutOfService),
            _ => Err(format!("Unknown equipment condition: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    InStock,
    Assigned,
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InStock => write!(f, "in_stock"),
            Self::Assigned => write!(f, "assigned"),
        }
    }
}

impl std::str::FromStr for EquipmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "in_stock" | "stock" => Ok(Self::InStock),
            "assigned" => Ok(Self::Assigned),
            _ => Err(format!("Unknown equipment status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: i64,
    pub serial_number: String,
    pub model: String,
    pub equipment_type: EquipmentType,
    pub condition: EquipmentCondition,
    pub status: EquipmentStatus,
    pub location_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Payload for creating equipment.
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentDraft {
    pub serial_number: String,
    pub model: String,
    pub equipment_type: EquipmentType,
    pub condition: EquipmentCondition,
    pub status: EquipmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EquipmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_type: Option<EquipmentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<EquipmentCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EquipmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
}

impl EquipmentPatch {
    pub fn is_empty(&self) -> bool {
        self.serial_number.is_none()
            && self.model.is_none()
            && self.equipment_type.is_none()
            && self.condition.is_none()
            && self.status.is_none()
            && self.location_id.is_none()
            && self.employee_id.is_none()
    }
}

/// Body of `POST /equipment/assign`.
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentAssignment {
    pub equipment_id: i64,
    pub employee_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Outcome reported by a spreadsheet import.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportOutcome {
    pub detail: String,
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub site: String,
    pub floor: String,
    pub room: String,
    pub exact_position: Option<String>,
}

impl Location {
    /// Short label such as `HQ - 2 - B204`.
    pub fn label(&self) -> String {
        format!("{} - {} - {}", self.site, self.floor, self.room)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationDraft {
    pub site: String,
    pub floor: String,
    pub room: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_position: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LocationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_position: Option<String>,
}

impl LocationPatch {
    pub fn is_empty(&self) -> bool {
        self.site.is_none()
            && self.floor.is_none()
            && self.room.is_none()
            && self.exact_position.is_none()
    }
}

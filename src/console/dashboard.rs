use tracing::{debug, warn};

use crate::api::{ApiClients, EquipmentFilter, PageFilter};
use crate::error::ClientError;
use crate::models::{Employee, Equipment, EquipmentStatus, EquipmentType, Location};
use crate::router::ViewScope;

/// Number of records shown in the "recent equipment" panel.
pub const RECENT_LIMIT: usize = 5;

/// A dashboard panel: its content, or the message of the request that failed.
pub type Section<T> = Result<T, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentSummary {
    pub total: usize,
    pub in_stock: usize,
    pub assigned: usize,
    /// Non-zero counts only, in [`EquipmentType::ALL`] order.
    pub by_type: Vec<(EquipmentType, usize)>,
    pub recent: Vec<Equipment>,
}

impl EquipmentSummary {
    pub fn from_records(equipment: &[Equipment]) -> Self {
        let count_status =
            |status: EquipmentStatus| equipment.iter().filter(|e| e.status == status).count();

        let by_type = EquipmentType::ALL
            .iter()
            .map(|t| (*t, equipment.iter().filter(|e| e.equipment_type == *t).count()))
            .filter(|(_, count)| *count > 0)
            .collect();

        Self {
            total: equipment.len(),
            in_stock: count_status(EquipmentStatus::InStock),
            assigned: count_status(EquipmentStatus::Assigned),
            by_type,
            recent: equipment.iter().take(RECENT_LIMIT).cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub equipment: Section<EquipmentSummary>,
    pub employee_count: Section<usize>,
    pub location_count: Section<usize>,
}

impl DashboardSummary {
    /// Load the three collections concurrently and summarize them.
    ///
    /// Sections fail independently. The only error returned is
    /// [`ClientError::Cancelled`], once the dashboard has been left.
    pub async fn load(clients: &ApiClients, scope: &ViewScope) -> Result<Self, ClientError> {
        let equipment_filter = EquipmentFilter::default();
        let page = PageFilter::default();

        let (equipment, employees, locations) = tokio::join!(
            scope.run(clients.equipment.list(&equipment_filter)),
            scope.run(clients.employees.list(&page)),
            scope.run(clients.locations.list(&page)),
        );

        let summary = Self {
            equipment: section("equipment", equipment)?
                .map(|e| EquipmentSummary::from_records(&e)),
            employee_count: section("employees", employees)?.map(|e| e.len()),
            location_count: section("locations", locations)?.map(|l| l.len()),
        };
        debug!(
            equipment = summary.equipment.as_ref().map(|e| e.total).ok(),
            employees = summary.employee_count.as_ref().ok().copied(),
            locations = summary.location_count.as_ref().ok().copied(),
            "Dashboard loaded"
        );
        Ok(summary)
    }

    pub fn from_records(
        equipment: Vec<Equipment>,
        employees: &[Employee],
        locations: &[Location],
    ) -> Self {
        Self {
            equipment: Ok(EquipmentSummary::from_records(&equipment)),
            employee_count: Ok(employees.len()),
            location_count: Ok(locations.len()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.equipment.is_ok() && self.employee_count.is_ok() && self.location_count.is_ok()
    }
}

/// Turn one request outcome into a panel. Cancellation aborts the whole dashboard.
fn section<T>(name: &str, result: Result<T, ClientError>) -> Result<Section<T>, ClientError> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
        Err(e) => {
            warn!(section = name, error = %e, "Dashboard section failed");
            Ok(Err(e.message()))
        }
    }
}

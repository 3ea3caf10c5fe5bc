//! Console views and their paths.

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Equipment,
    EquipmentNew,
    EquipmentEdit(i64),
    Employees,
    EmployeeNew,
    EmployeeEdit(i64),
    Locations,
    Chatbot,
}

impl Route {
    /// Resolve a path. The root and unknown paths fall back to the dashboard.
    pub fn parse(path: &str) -> Route {
        let segments: Vec<&str> = path
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            ["login"] => Route::Login,
            ["dashboard"] => Route::Dashboard,
            ["equipment"] => Route::Equipment,
            ["equipment", "new"] => Route::EquipmentNew,
            ["equipment", "edit", id] => id
                .parse()
                .map(Route::EquipmentEdit)
                .unwrap_or(Route::Dashboard),
            ["employees"] => Route::Employees,
            ["employees", "new"] => Route::EmployeeNew,
            ["employees", "edit", id] => id
                .parse()
                .map(Route::EmployeeEdit)
                .unwrap_or(Route::Dashboard),
            ["locations"] => Route::Locations,
            ["chatbot"] => Route::Chatbot,
            _ => Route::Dashboard,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Equipment => "/equipment".to_string(),
            Route::EquipmentNew => "/equipment/new".to_string(),
            Route::EquipmentEdit(id) => format!("/equipment/edit/{}", id),
            Route::Employees => "/employees".to_string(),
            Route::EmployeeNew => "/employees/new".to_string(),
            Route::EmployeeEdit(id) => format!("/employees/edit/{}", id),
            Route::Locations => "/locations".to_string(),
            Route::Chatbot => "/chatbot".to_string(),
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login)
    }

    /// Roles required on top of authentication, if any.
    pub fn required_roles(&self) -> Option<&'static [Role]> {
        match self {
            Route::EquipmentNew
            | Route::EquipmentEdit(_)
            | Route::EmployeeNew
            | Route::EmployeeEdit(_) => Some(Role::EDITORS),
            _ => None,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/equipment/new"), Route::EquipmentNew);
        assert_eq!(Route::parse("/equipment/edit/42"), Route::EquipmentEdit(42));
        assert_eq!(Route::parse("employees/edit/7/"), Route::EmployeeEdit(7));
        assert_eq!(Route::parse("/chatbot"), Route::Chatbot);
    }

    #[test]
    fn test_parse_falls_back_to_dashboard() {
        assert_eq!(Route::parse("/"), Route::Dashboard);
        assert_eq!(Route::parse(""), Route::Dashboard);
        assert_eq!(Route::parse("/reports/2024"), Route::Dashboard);
        assert_eq!(Route::parse("/equipment/edit/abc"), Route::Dashboard);
    }

    #[test]
    fn test_path_round_trip() {
        for route in [
            Route::Login,
            Route::Dashboard,
            Route::Equipment,
            Route::EquipmentNew,
            Route::EquipmentEdit(3),
            Route::Employees,
            Route::EmployeeNew,
            Route::EmployeeEdit(9),
            Route::Locations,
            Route::Chatbot,
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_role_requirements() {
        assert_eq!(Route::EquipmentNew.required_roles(), Some(Role::EDITORS));
        assert_eq!(Route::Equipment.required_roles(), None);
        assert!(Route::Login.is_public());
        assert!(!Route::Dashboard.is_public());
    }
}

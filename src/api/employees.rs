use super::{PageFilter, Resource, ResourceClient};
use crate::models::{Employee, EmployeeDraft, EmployeePatch};

pub struct EmployeeResource;

impl Resource for EmployeeResource {
    const PATH: &'static str = "/employees";
    const NAME: &'static str = "employee";

    type Record = Employee;
    type Draft = EmployeeDraft;
    type Patch = EmployeePatch;
    type Filter = PageFilter;
}

pub type EmployeeClient = ResourceClient<EmployeeResource>;

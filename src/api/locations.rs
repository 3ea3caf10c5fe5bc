use super::{PageFilter, Resource, ResourceClient};
use crate::models::{Location, LocationDraft, LocationPatch};

pub struct LocationResource;

impl Resource for LocationResource {
    const PATH: &'static str = "/locations";
    const NAME: &'static str = "location";

    type Record = Location;
    type Draft = LocationDraft;
    type Patch = LocationPatch;
    type Filter = PageFilter;
}

pub type LocationClient = ResourceClient<LocationResource>;

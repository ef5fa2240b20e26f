use crate::{
    common::error::Result,
    fields::{FieldMap, Representation},
    json,
    model::Resource,
    sync::{evaluate, PeerFilter, SyncVerdict},
    text,
};
use serde::Serialize;
use serde_json::Value;

/// The resources of one `drbdsetup status` report, and the form they were reported in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    representation: Representation,
    resources: Vec<Resource>,
}

impl StatusReport {
    /// Parse a text report.
    pub fn from_text(report: &str) -> Result<Self> {
        Ok(Self {
            representation: Representation::Text,
            resources: text::parse(report)?,
        })
    }

    /// Parse a JSON report.
    pub fn from_json_str(report: &str) -> Result<Self> {
        Ok(Self {
            representation: Representation::Json,
            resources: json::parse(report)?,
        })
    }

    /// Build from an already decoded JSON report.
    pub fn from_json_value(report: &Value) -> Result<Self> {
        Ok(Self {
            representation: Representation::Json,
            resources: json::normalize(report)?,
        })
    }

    /// Parse a report of the given representation, or of the detected one if none is given.
    pub fn parse(report: &str, representation: Option<Representation>) -> Result<Self> {
        match representation.unwrap_or_else(|| Representation::detect(report)) {
            Representation::Text => Self::from_text(report),
            Representation::Json => Self::from_json_str(report),
        }
    }

    /// The form the report was in.
    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// The field names of the form the report was in.
    pub fn fields(&self) -> &'static FieldMap {
        self.representation.fields()
    }

    /// All resources, in report order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// The resource with the given name.
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.name == name)
    }

    /// Drop every resource but the one with the given name.
    pub fn retain_resource(&mut self, name: &str) {
        self.resources.retain(|resource| resource.name == name);
    }

    /// Check whether a resource of this report has finished synchronising.
    pub fn verdict(&self, resource: &Resource, filter: &PeerFilter) -> SyncVerdict {
        evaluate(resource, self.fields(), filter)
    }

    /// True if a resource of this report has finished synchronising.
    pub fn is_synced(&self, resource: &Resource, filter: &PeerFilter) -> bool {
        self.verdict(resource, filter).is_synced()
    }

    /// The resources which haven't finished synchronising, with the reason.
    pub fn unsynced(&self, filter: &PeerFilter) -> Vec<(&Resource, SyncVerdict)> {
        self.resources
            .iter()
            .map(|resource| (resource, self.verdict(resource, filter)))
            .filter(|(_, verdict)| !verdict.is_synced())
            .collect()
    }
}

use crate::{
    common::{
        constants::CONNECTED,
        error::{Decode, DocumentError, MissingField, NotAnArray, Result, WrongType},
    },
    fields::{FieldMap, JSON_FIELDS},
    model::{Details, PeerNode, PeerStatus, PeerVolume, Resource, Role, Volume},
};
use serde_json::{Map, Value};
use snafu::{OptionExt, ResultExt};
use tracing::debug;

/// Decode the output of `drbdsetup status --json` into resources.
pub fn parse(document: &str) -> Result<Vec<Resource>> {
    let value: Value = serde_json::from_str(document).context(Decode)?;
    normalize(&value)
}

/// Project a decoded `drbdsetup status --json` document onto resources. The document is an
/// array with one object per resource, a lone resource object is accepted as well.
pub fn normalize(document: &Value) -> Result<Vec<Resource>> {
    let entries = match document {
        Value::Array(entries) => entries.iter().collect::<Vec<_>>(),
        Value::Object(_) => vec![document],
        other => {
            return Err(NotAnArray {
                found: type_name(other),
            }
            .build()
            .into())
        }
    };

    let resources = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| resource(&JSON_FIELDS, Object::new(entry, format!("[{index}]"))?))
        .collect::<Result<Vec<_>, DocumentError>>()?;
    for resource in &resources {
        debug!(
            resource = %resource.name,
            volumes = resource.volumes.len(),
            peers = resource.peers.len(),
            "Parsed resource"
        );
    }
    Ok(resources)
}

fn resource(fields: &FieldMap, object: Object) -> Result<Resource, DocumentError> {
    let mut resource = Resource::new(
        object.str(fields.resource_name)?,
        object
            .optional_str(fields.resource_role)?
            .map(Role::from)
            .unwrap_or(Role::Unknown),
    );

    for device in object.objects(fields.volumes)? {
        resource.volumes.push(volume(fields, device)?);
    }
    for connection in object.objects(fields.connections)? {
        resource.peers.push(peer_node(fields, connection)?);
    }
    resource.details = object.details(&[
        fields.resource_name,
        fields.resource_role,
        fields.volumes,
        fields.connections,
    ]);
    Ok(resource)
}

fn volume(fields: &FieldMap, object: Object) -> Result<Volume, DocumentError> {
    let mut skip = vec![fields.volume_index, fields.disk_state];
    let pending_writes = match fields.pending_writes {
        Some(pending) => {
            skip.push(pending);
            Some(object.u64(pending)?)
        }
        None => None,
    };

    Ok(Volume {
        index: Some(object.index(fields.volume_index)?),
        disk_state: object.str(fields.disk_state)?.to_string(),
        pending_writes,
        details: object.details(&skip),
    })
}

fn peer_node(fields: &FieldMap, object: Object) -> Result<PeerNode, DocumentError> {
    let connection = object.optional_str(fields.connection_state)?;
    let role = object.optional_str(fields.peer_role)?;
    let status = match (connection, role) {
        (Some(CONNECTED), Some(role)) | (None, Some(role)) => PeerStatus::Role(role.to_string()),
        (Some(connection), _) => PeerStatus::Connection(connection.to_string()),
        (None, None) => {
            return MissingField {
                path: object.path.clone(),
                field: fields.connection_state,
            }
            .fail()
        }
    };

    let mut peer = PeerNode::new(object.str(fields.peer_name)?, status);
    for device in object.objects(fields.peer_volumes)? {
        peer.volumes.push(PeerVolume {
            index: Some(device.index(fields.volume_index)?),
            peer_disk_state: device.str(fields.peer_disk_state)?.to_string(),
            details: device.details(&[fields.volume_index, fields.peer_disk_state]),
        });
    }
    peer.details = object.details(&[
        fields.peer_name,
        fields.peer_role,
        fields.connection_state,
        fields.peer_volumes,
    ]);
    Ok(peer)
}

/// A JSON object along with its path in the document, for error reporting.
struct Object<'a> {
    path: String,
    map: &'a Map<String, Value>,
}

impl<'a> Object<'a> {
    fn new(value: &'a Value, path: String) -> Result<Self, DocumentError> {
        match value {
            Value::Object(map) => Ok(Self { path, map }),
            _ => WrongType {
                path,
                field: "",
                expected: "an object",
            }
            .fail(),
        }
    }

    fn field(&self, field: &str) -> Result<&'a Value, DocumentError> {
        self.map.get(field).context(MissingField {
            path: self.path.as_str(),
            field,
        })
    }

    fn wrong_type<T>(&self, field: &str, expected: &str) -> Result<T, DocumentError> {
        WrongType {
            path: self.path.as_str(),
            field,
            expected,
        }
        .fail()
    }

    fn str(&self, field: &str) -> Result<&'a str, DocumentError> {
        match self.field(field)? {
            Value::String(value) => Ok(value.as_str()),
            _ => self.wrong_type(field, "a string"),
        }
    }

    fn optional_str(&self, field: &str) -> Result<Option<&'a str>, DocumentError> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.as_str())),
            Some(_) => self.wrong_type(field, "a string"),
        }
    }

    fn u64(&self, field: &str) -> Result<u64, DocumentError> {
        match self.field(field)?.as_u64() {
            Some(value) => Ok(value),
            None => self.wrong_type(field, "an unsigned integer"),
        }
    }

    /// Volume numbers are integers, older tools wrote them as strings.
    fn index(&self, field: &str) -> Result<String, DocumentError> {
        match self.field(field)? {
            Value::Number(number) => Ok(number.to_string()),
            Value::String(value) => Ok(value.clone()),
            _ => self.wrong_type(field, "a number"),
        }
    }

    fn objects(&self, field: &str) -> Result<Vec<Object<'a>>, DocumentError> {
        match self.field(field)? {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| Object::new(item, format!("{}.{field}[{index}]", self.path)))
                .collect(),
            _ => self.wrong_type(field, "an array"),
        }
    }

    /// The scalar fields not named in `skip`, rendered as strings.
    fn details(&self, skip: &[&str]) -> Details {
        self.map
            .iter()
            .filter(|(key, _)| !skip.contains(&key.as_str()))
            .filter_map(|(key, value)| {
                let value = match value {
                    Value::String(value) => value.clone(),
                    Value::Number(_) | Value::Bool(_) => value.to_string(),
                    Value::Null | Value::Array(_) | Value::Object(_) => return None,
                };
                Some((key.clone(), value))
            })
            .collect()
    }
}

fn type_name(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
    .to_string()
}

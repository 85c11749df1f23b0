//! The network location entity that gets moved between databases
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use time::{OffsetDateTime, macros::format_description};

use crate::{Result, value::ColumnValue};

/// Static metadata about an entity that is persisted in a database table
pub trait Entity {
    /// The physical name of the table backing this entity
    fn table_name() -> &'static str;

    /// The columns of the table, in the order used for reads and inserts
    fn columns() -> &'static [&'static str];
}

/// How a network location came to be known to this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LocationType {
    /// discovered automatically on the local network
    Dynamic,
    /// added explicitly by a user
    Static,
    /// reserved by the platform itself
    Reserved,
}

/// A single network location entry.
///
/// Records are moved between databases verbatim, so every column of the
/// backing table is held as the value sqlite stored, without interpreting
/// or validating it.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct LocationRecord {
    pub id: ColumnValue,
    pub base_url: ColumnValue,
    pub nickname: ColumnValue,
    pub application: ColumnValue,
    pub kolibri_version: ColumnValue,
    pub instance_id: ColumnValue,
    pub device_name: ColumnValue,
    pub operating_system: ColumnValue,
    pub subset_of_users_device: ColumnValue,
    pub connection_status: ColumnValue,
    pub location_type: ColumnValue,
    pub added: ColumnValue,
    pub last_accessed: ColumnValue,
}

const COLUMNS: [&str; 13] = [
    "id",
    "base_url",
    "nickname",
    "application",
    "kolibri_version",
    "instance_id",
    "device_name",
    "operating_system",
    "subset_of_users_device",
    "connection_status",
    "location_type",
    "added",
    "last_accessed",
];

impl Entity for LocationRecord {
    fn table_name() -> &'static str {
        "discovery_networklocation"
    }

    fn columns() -> &'static [&'static str] {
        &COLUMNS
    }
}

impl LocationRecord {
    /// Create a new static location for `base_url` with a freshly generated id
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let now = OffsetDateTime::now_utc().format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]"
        ))?;
        let empty = || ColumnValue::from("");
        Ok(Self {
            id: Self::new_id().into(),
            base_url: ColumnValue::Text(base_url.into()),
            nickname: empty(),
            application: empty(),
            kolibri_version: empty(),
            instance_id: empty(),
            device_name: empty(),
            operating_system: empty(),
            subset_of_users_device: ColumnValue::Integer(0),
            connection_status: ColumnValue::Integer(0),
            location_type: LocationType::Static.to_string().into(),
            added: now.as_str().into(),
            last_accessed: now.into(),
        })
    }

    /// The location type, if the stored value names one
    pub fn location_type(&self) -> Option<LocationType> {
        self.location_type
            .as_text()
            .and_then(|s| LocationType::from_str(s).ok())
    }

    /// Generate a random 32 character hex identifier
    fn new_id() -> String {
        format!("{:032x}", rand::random::<u128>())
    }
}

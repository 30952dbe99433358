//! Remote table schema
//!
//! Translation between local shoot records (camelCase) and rows of the
//! remote `shoots` table (snake_case columns). Nested JSON columns such as
//! `client` and `payment` keep their camelCase keys.

use crate::models::{
    ClientInfo, Location, MediaBundle, Patch, Payment, PersonRef, ShootField, ShootRecord,
    ShootStatus, ShootUpdate,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of the remote shoots table.
///
/// Absent optional values serialize as `null`; `null` or missing columns
/// deserialize as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteShootRow {
    pub id: String,
    pub scheduled_date: String,
    #[serde(default)]
    pub time: Option<String>,
    pub client: ClientInfo,
    pub location: Location,
    pub photographer: PersonRef,
    #[serde(default)]
    pub editor: Option<PersonRef>,
    #[serde(default)]
    pub services: Option<Vec<String>>,
    pub payment: Payment,
    pub status: ShootStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub completed_date: Option<String>,
    #[serde(default)]
    pub media: Option<MediaBundle>,
    #[serde(default)]
    pub tour_links: Option<Value>,
}

impl From<&ShootRecord> for RemoteShootRow {
    fn from(record: &ShootRecord) -> Self {
        Self {
            id: record.id.clone(),
            scheduled_date: record.scheduled_date.clone(),
            time: Some(record.time.clone()),
            client: record.client.clone(),
            location: record.location.clone(),
            photographer: record.photographer.clone(),
            editor: record.editor.clone(),
            services: Some(record.services.clone()),
            payment: record.payment.clone(),
            status: record.status,
            notes: record.notes.clone(),
            created_by: Some(record.created_by.clone()),
            completed_date: record.completed_date.clone(),
            media: record.media.clone(),
            tour_links: record.tour_links.clone(),
        }
    }
}

/// Empty strings from the remote count as unset
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<RemoteShootRow> for ShootRecord {
    fn from(row: RemoteShootRow) -> Self {
        Self {
            id: row.id,
            scheduled_date: row.scheduled_date,
            time: row.time.unwrap_or_default(),
            status: row.status,
            client: row.client,
            location: row.location,
            photographer: row.photographer,
            editor: row.editor,
            services: row.services.unwrap_or_default(),
            payment: row.payment,
            notes: non_empty(row.notes),
            completed_date: non_empty(row.completed_date),
            media: row.media,
            tour_links: row.tour_links.filter(|links| !links.is_null()),
            created_by: row.created_by.unwrap_or_default(),
        }
    }
}

/// Remote column backing an updatable field
pub fn column_name(field: ShootField) -> &'static str {
    match field {
        ShootField::ScheduledDate => "scheduled_date",
        ShootField::Time => "time",
        ShootField::Status => "status",
        ShootField::Client => "client",
        ShootField::Location => "location",
        ShootField::Photographer => "photographer",
        ShootField::Editor => "editor",
        ShootField::Services => "services",
        ShootField::Payment => "payment",
        ShootField::Notes => "notes",
        ShootField::CompletedDate => "completed_date",
        ShootField::Media => "media",
        ShootField::TourLinks => "tour_links",
    }
}

fn put<T: Serialize>(
    columns: &mut Map<String, Value>,
    field: ShootField,
    value: Option<&T>,
) -> Result<(), serde_json::Error> {
    if let Some(value) = value {
        columns.insert(column_name(field).to_string(), serde_json::to_value(value)?);
    }
    Ok(())
}

fn put_patch<T: Serialize>(
    columns: &mut Map<String, Value>,
    field: ShootField,
    patch: &Patch<T>,
) -> Result<(), serde_json::Error> {
    match patch.as_ref() {
        Patch::Keep => {}
        Patch::Clear => {
            columns.insert(column_name(field).to_string(), Value::Null);
        }
        Patch::Set(value) => {
            columns.insert(column_name(field).to_string(), serde_json::to_value(value)?);
        }
    }
    Ok(())
}

/// Translate a partial update into remote columns.
///
/// Only provided fields appear; cleared fields are sent as `null`.
pub fn update_columns(update: &ShootUpdate) -> Result<Map<String, Value>, serde_json::Error> {
    let mut columns = Map::new();

    put(&mut columns, ShootField::ScheduledDate, update.scheduled_date.as_ref())?;
    put(&mut columns, ShootField::Time, update.time.as_ref())?;
    put(&mut columns, ShootField::Status, update.status.as_ref())?;
    put(&mut columns, ShootField::Client, update.client.as_ref())?;
    put(&mut columns, ShootField::Location, update.location.as_ref())?;
    put(&mut columns, ShootField::Photographer, update.photographer.as_ref())?;
    put_patch(&mut columns, ShootField::Editor, &update.editor)?;
    put(&mut columns, ShootField::Services, update.services.as_ref())?;
    put(&mut columns, ShootField::Payment, update.payment.as_ref())?;
    put_patch(&mut columns, ShootField::Notes, &update.notes)?;
    put_patch(&mut columns, ShootField::CompletedDate, &update.completed_date)?;
    put_patch(&mut columns, ShootField::Media, &update.media)?;
    put_patch(&mut columns, ShootField::TourLinks, &update.tour_links)?;

    Ok(columns)
}

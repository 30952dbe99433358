//! Derived views over the local cache
//!
//! Pure functions over a snapshot of shoot records. Nothing here is cached;
//! views are recomputed from the current snapshot on every call.

use crate::models::{
    ClientSummary, PersonRef, PersonSummary, Principal, Role, ShootRecord, ShootStatus,
};
use std::collections::HashMap;

/// Whether a record with `actual` status belongs in a `wanted` listing.
///
/// `scheduled` is a status group here: it also takes in `booked` shoots.
pub fn status_matches(actual: ShootStatus, wanted: ShootStatus) -> bool {
    actual == wanted || (wanted == ShootStatus::Scheduled && actual == ShootStatus::Booked)
}

/// Whether `record` belongs to the client `principal`.
///
/// Name, email or company may match; company only counts when the principal
/// has a non-empty one.
fn belongs_to_client(record: &ShootRecord, principal: &Principal) -> bool {
    let matches_company = principal.company.as_deref().is_some_and(|company| {
        !company.is_empty() && record.client.company.as_deref() == Some(company)
    });

    record.client.name == principal.name
        || record.client.email == principal.email
        || matches_company
}

/// Shoots with `status` visible to `principal`.
///
/// Client principals only see their own shoots; every other role (or no
/// principal at all) sees everything.
pub fn shoots_by_status(
    records: &[ShootRecord],
    status: ShootStatus,
    principal: Option<&Principal>,
) -> Vec<ShootRecord> {
    let client = principal.filter(|p| p.role == Role::Client);

    records
        .iter()
        .filter(|record| client.map_or(true, |p| belongs_to_client(record, p)))
        .filter(|record| status_matches(record.status, status))
        .cloned()
        .collect()
}

/// Group items by name, keeping the first-seen details and counting the rest.
/// Output order is first-appearance order.
fn tally<'a, T: 'a, S>(
    items: impl Iterator<Item = &'a T>,
    name: impl Fn(&T) -> &str,
    first_seen: impl Fn(&T) -> S,
    bump: impl Fn(&mut S),
) -> Vec<S> {
    let mut summaries = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for item in items {
        let key = name(item);
        if key.is_empty() {
            continue;
        }

        match positions.get(key) {
            Some(&position) => bump(&mut summaries[position]),
            None => {
                positions.insert(key.to_string(), summaries.len());
                summaries.push(first_seen(item));
            }
        }
    }

    summaries
}

fn person_summaries<'a>(people: impl Iterator<Item = &'a PersonRef>) -> Vec<PersonSummary> {
    tally(
        people,
        |person| person.name.as_str(),
        |person| PersonSummary {
            name: person.name.clone(),
            avatar: person.avatar.clone(),
            shoot_count: 1,
        },
        |summary| summary.shoot_count += 1,
    )
}

pub fn unique_photographers(records: &[ShootRecord]) -> Vec<PersonSummary> {
    person_summaries(records.iter().map(|record| &record.photographer))
}

pub fn unique_editors(records: &[ShootRecord]) -> Vec<PersonSummary> {
    person_summaries(records.iter().filter_map(|record| record.editor.as_ref()))
}

pub fn unique_clients(records: &[ShootRecord]) -> Vec<ClientSummary> {
    tally(
        records.iter().map(|record| &record.client),
        |client| client.name.as_str(),
        |client| ClientSummary {
            name: client.name.clone(),
            email: Some(client.email.clone()).filter(|email| !email.is_empty()),
            company: client.company.clone(),
            phone: client.phone.clone(),
            shoot_count: 1,
        },
        |summary| summary.shoot_count += 1,
    )
}

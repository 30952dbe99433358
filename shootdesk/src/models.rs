//! Shoot data model
//!
//! Rust structs for shoot records and the values derived from them.
//! Records persist locally as camelCase JSON; the remote table uses
//! snake_case columns (see `remote::schema`).

use crate::config;
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of a shoot. Transitions are unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShootStatus {
    Scheduled,
    Booked,
    Completed,
    Pending,
}

impl ShootStatus {
    pub const ALL: [ShootStatus; 4] = [
        ShootStatus::Scheduled,
        ShootStatus::Booked,
        ShootStatus::Completed,
        ShootStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShootStatus::Scheduled => "scheduled",
            ShootStatus::Booked => "booked",
            ShootStatus::Completed => "completed",
            ShootStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for ShootStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShootStatus {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ShootStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| AppError::InvalidStatus(s.to_string()))
    }
}

/// Client the shoot is booked for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_shoots: Option<u32>,
}

/// Property address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub full_address: String,
}

/// Photographer or editor assigned to a shoot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Quote and payment breakdown, in dollars; `tax_rate` is a percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub base_quote: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total_quote: f64,
    #[serde(default)]
    pub total_paid: f64,
}

impl Payment {
    pub fn balance_due(&self) -> f64 {
        self.total_quote - self.total_paid
    }

    /// Every amount must be finite; JSON has no encoding for NaN or infinity
    pub fn validate(&self) -> Result<(), AppError> {
        let amounts = [
            ("baseQuote", self.base_quote),
            ("taxRate", self.tax_rate),
            ("taxAmount", self.tax_amount),
            ("totalQuote", self.total_quote),
            ("totalPaid", self.total_paid),
        ];

        match amounts.iter().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(AppError::InvalidPayment(format!("{} is {}", name, value))),
            None => Ok(()),
        }
    }
}

/// A single delivered media file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub url: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Delivered media grouped by kind
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaBundle {
    #[serde(default)]
    pub images: Vec<MediaFile>,
    #[serde(default)]
    pub videos: Vec<MediaFile>,
    #[serde(default)]
    pub documents: Vec<MediaFile>,
}

impl MediaBundle {
    pub fn len(&self) -> usize {
        self.images.len() + self.videos.len() + self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A scheduled or completed property media session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShootRecord {
    /// Locally generated UUID, remote-assigned UUID, or a legacy local-only id
    pub id: String,
    /// "yyyy-MM-dd"
    pub scheduled_date: String,
    #[serde(default)]
    pub time: String,
    pub status: ShootStatus,
    pub client: ClientInfo,
    pub location: Location,
    pub photographer: PersonRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<PersonRef>,
    #[serde(default)]
    pub services: Vec<String>,
    pub payment: Payment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaBundle>,
    /// Virtual tour links; the shape is owned by the tour provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tour_links: Option<serde_json::Value>,
    #[serde(default)]
    pub created_by: String,
}

/// Three-state field of a partial update
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    /// Not provided; the current value is preserved
    Keep,
    /// Explicitly cleared
    Clear,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T> Patch<T> {
    pub fn is_provided(&self) -> bool {
        !matches!(self, Patch::Keep)
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Keep => Patch::Keep,
            Patch::Clear => Patch::Clear,
            Patch::Set(value) => Patch::Set(value),
        }
    }
}

impl<T: Clone> Patch<T> {
    fn merge_into(&self, slot: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Clear => *slot = None,
            Patch::Set(value) => *slot = Some(value.clone()),
        }
    }
}

// A missing key stays `Keep` through `#[serde(default)]`; an explicit null
// lands here as `Clear`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        })
    }
}

/// Fields of a shoot record that can be updated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShootField {
    ScheduledDate,
    Time,
    Status,
    Client,
    Location,
    Photographer,
    Editor,
    Services,
    Payment,
    Notes,
    CompletedDate,
    Media,
    TourLinks,
}

/// Partial update of a shoot record.
///
/// Required fields are plain options (absent means "keep"); optional fields
/// use [`Patch`] so that "not provided" and "explicitly cleared" differ.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShootUpdate {
    pub scheduled_date: Option<String>,
    pub time: Option<String>,
    pub status: Option<ShootStatus>,
    pub client: Option<ClientInfo>,
    pub location: Option<Location>,
    pub photographer: Option<PersonRef>,
    pub editor: Patch<PersonRef>,
    pub services: Option<Vec<String>>,
    pub payment: Option<Payment>,
    pub notes: Patch<String>,
    pub completed_date: Patch<String>,
    pub media: Patch<MediaBundle>,
    pub tour_links: Patch<serde_json::Value>,
}

impl ShootUpdate {
    pub fn status(status: ShootStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn notes(notes: Option<String>) -> Self {
        Self {
            notes: notes.map_or(Patch::Clear, Patch::Set),
            ..Self::default()
        }
    }

    pub fn media(media: MediaBundle) -> Self {
        Self {
            media: Patch::Set(media),
            ..Self::default()
        }
    }

    /// Fields carried by this update, in declaration order
    pub fn provided_fields(&self) -> Vec<ShootField> {
        let presence = [
            (self.scheduled_date.is_some(), ShootField::ScheduledDate),
            (self.time.is_some(), ShootField::Time),
            (self.status.is_some(), ShootField::Status),
            (self.client.is_some(), ShootField::Client),
            (self.location.is_some(), ShootField::Location),
            (self.photographer.is_some(), ShootField::Photographer),
            (self.editor.is_provided(), ShootField::Editor),
            (self.services.is_some(), ShootField::Services),
            (self.payment.is_some(), ShootField::Payment),
            (self.notes.is_provided(), ShootField::Notes),
            (self.completed_date.is_provided(), ShootField::CompletedDate),
            (self.media.is_provided(), ShootField::Media),
            (self.tour_links.is_provided(), ShootField::TourLinks),
        ];

        presence
            .into_iter()
            .filter_map(|(present, field)| present.then_some(field))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.provided_fields().is_empty()
    }

    /// Shallow merge: provided fields replace the record's, the rest stay.
    pub fn merge_into(&self, record: &mut ShootRecord) {
        if let Some(date) = &self.scheduled_date {
            record.scheduled_date = date.clone();
        }
        if let Some(time) = &self.time {
            record.time = time.clone();
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(client) = &self.client {
            record.client = client.clone();
        }
        if let Some(location) = &self.location {
            record.location = location.clone();
        }
        if let Some(photographer) = &self.photographer {
            record.photographer = photographer.clone();
        }
        self.editor.merge_into(&mut record.editor);
        if let Some(services) = &self.services {
            record.services = services.clone();
        }
        if let Some(payment) = &self.payment {
            record.payment = payment.clone();
        }
        self.notes.merge_into(&mut record.notes);
        self.completed_date.merge_into(&mut record.completed_date);
        self.media.merge_into(&mut record.media);
        self.tour_links.merge_into(&mut record.tour_links);
    }
}

/// Role of a signed-in principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Superadmin,
    #[default]
    Client,
    Photographer,
    Editor,
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::Superadmin),
            "client" => Ok(Role::Client),
            "photographer" => Ok(Role::Photographer),
            "editor" => Ok(Role::Editor),
            other => Err(AppError::Generic(format!("Unknown role: {}", other))),
        }
    }
}

/// The signed-in user, as provided by the authentication collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Photographer or editor with the number of shoots they appear on
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub shoot_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub shoot_count: usize,
}

/// Partial booking input; anything left out gets a placeholder default
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShootDraft {
    pub scheduled_date: Option<String>,
    pub time: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_company: Option<String>,
    pub address: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub full_address: Option<String>,
    pub photographer_name: Option<String>,
    pub photographer_avatar: Option<String>,
    pub services: Option<Vec<String>>,
    pub base_quote: Option<f64>,
    pub tax_rate: Option<f64>,
    pub tax_amount: Option<f64>,
    pub total_quote: Option<f64>,
    pub total_paid: Option<f64>,
    pub status: Option<ShootStatus>,
    pub notes: Option<String>,
}

/// Blank strings count as "not filled in"
fn filled(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ShootDraft {
    /// Build a new record with a fresh UUID v4.
    ///
    /// A signed-in principal supplies `createdBy` and, when they have them,
    /// the client's company and phone.
    ///
    /// Fails with `InvalidPayment` when an amount is not finite.
    pub fn into_record(
        self,
        principal: Option<&Principal>,
        today: NaiveDate,
    ) -> Result<ShootRecord, AppError> {
        let text = |value: Option<String>, default: &str| {
            filled(value).unwrap_or_else(|| default.to_string())
        };

        let payment = Payment {
            base_quote: self.base_quote.unwrap_or(config::DEFAULT_BASE_QUOTE),
            tax_rate: self.tax_rate.unwrap_or(config::DEFAULT_TAX_RATE),
            tax_amount: self.tax_amount.unwrap_or(config::DEFAULT_TAX_AMOUNT),
            total_quote: self.total_quote.unwrap_or(config::DEFAULT_TOTAL_QUOTE),
            total_paid: self.total_paid.unwrap_or(0.0),
        };
        payment.validate()?;

        let mut client = ClientInfo {
            name: text(self.client_name, config::DEFAULT_CLIENT_NAME),
            email: text(self.client_email, config::DEFAULT_CLIENT_EMAIL),
            company: Some(filled(self.client_company).unwrap_or_default()),
            phone: None,
            total_shoots: Some(0),
        };

        if let Some(principal) = principal {
            if principal.company.is_some() {
                client.company = principal.company.clone();
            }
            if principal.phone.is_some() {
                client.phone = principal.phone.clone();
            }
        }

        Ok(ShootRecord {
            id: Uuid::new_v4().to_string(),
            scheduled_date: filled(self.scheduled_date)
                .unwrap_or_else(|| today.format(config::SCHEDULED_DATE_FORMAT).to_string()),
            time: text(self.time, config::DEFAULT_SHOOT_TIME),
            status: self.status.unwrap_or(ShootStatus::Scheduled),
            client,
            location: Location {
                address: text(self.address, config::DEFAULT_ADDRESS),
                address2: Some(filled(self.address2).unwrap_or_default()),
                city: text(self.city, config::DEFAULT_CITY),
                state: text(self.state, config::DEFAULT_STATE),
                zip: text(self.zip, config::DEFAULT_ZIP),
                full_address: text(self.full_address, config::DEFAULT_FULL_ADDRESS),
            },
            photographer: PersonRef {
                name: text(self.photographer_name, config::DEFAULT_PHOTOGRAPHER_NAME),
                avatar: Some(text(
                    self.photographer_avatar,
                    config::DEFAULT_PHOTOGRAPHER_AVATAR,
                )),
            },
            editor: None,
            services: self
                .services
                .filter(|services| !services.is_empty())
                .unwrap_or_else(|| vec![config::DEFAULT_SERVICE.to_string()]),
            payment,
            notes: filled(self.notes),
            completed_date: None,
            media: None,
            tour_links: None,
            created_by: principal
                .map(|p| p.name.clone())
                .unwrap_or_else(|| config::SYSTEM_CREATOR.to_string()),
        })
    }
}

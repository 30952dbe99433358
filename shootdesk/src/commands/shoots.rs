//! Shoot-related commands
//!
//! Listing, booking, updating and deleting shoots, plus the per-person
//! summaries shown on the dashboard.

use chrono::Utc;
use clap::Args;
use serde::Serialize;
use shootdesk::app::AppState;
use shootdesk::config;
use shootdesk::error::{AppError, Result};
use shootdesk::models::{
    ClientSummary, Patch, PersonSummary, ShootDraft, ShootRecord, ShootStatus, ShootUpdate,
};
use shootdesk::services::history::{media_from_uploads, HistoryFilter, UploadedFile};
use shootdesk::services::RemoteSync;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only shoots with this status (scheduled also lists booked shoots)
    #[arg(long)]
    pub status: Option<ShootStatus>,

    /// Use the shoot-history listing, where the status filter is literal and
    /// the address and photographer filters apply
    #[arg(long)]
    pub history: bool,

    /// Case-insensitive substring of the full address (history only)
    #[arg(long, default_value = "", requires = "history")]
    pub address: String,

    /// Exact photographer name (history only)
    #[arg(long, default_value = "", requires = "history")]
    pub photographer: String,
}

/// List shoots visible to the signed-in principal
pub fn list_shoots(state: &AppState, args: ListArgs) -> Vec<ShootRecord> {
    let service = &state.shoots_service;

    let shoots = match args.status {
        Some(status) if args.history => service.history_shoots_by_status(status),
        Some(status) => service.get_client_shoots_by_status(status),
        None => service.shoots(),
    };

    if !args.history {
        return shoots;
    }

    HistoryFilter {
        address: args.address,
        photographer: args.photographer,
    }
    .apply(shoots)
}

/// A shoot with its outstanding balance
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShootView {
    #[serde(flatten)]
    pub shoot: ShootRecord,
    pub balance_due: f64,
}

/// Get a shoot by ID
pub fn get_shoot(state: &AppState, id: &str) -> Result<ShootView> {
    let shoot = state
        .shoots_service
        .get_shoot(id)
        .ok_or_else(|| AppError::ShootNotFound(id.to_string()))?;

    Ok(ShootView {
        balance_due: shoot.payment.balance_due(),
        shoot,
    })
}

#[derive(Args, Debug, Default)]
pub struct BookArgs {
    /// Scheduled date, yyyy-MM-dd (defaults to today)
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub time: Option<String>,
    #[arg(long)]
    pub client_name: Option<String>,
    #[arg(long)]
    pub client_email: Option<String>,
    #[arg(long)]
    pub client_company: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub zip: Option<String>,
    #[arg(long)]
    pub photographer: Option<String>,
    /// Service name; repeat for several
    #[arg(long = "service")]
    pub services: Vec<String>,
    #[arg(long)]
    pub base_quote: Option<f64>,
    #[arg(long)]
    pub tax_rate: Option<f64>,
    #[arg(long)]
    pub status: Option<ShootStatus>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl BookArgs {
    fn into_draft(self) -> ShootDraft {
        // Quote totals follow from the base quote and tax rate when either is given
        let (tax_amount, total_quote) = match (self.base_quote, self.tax_rate) {
            (None, None) => (None, None),
            (base, rate) => {
                let base = base.unwrap_or(config::DEFAULT_BASE_QUOTE);
                let rate = rate.unwrap_or(config::DEFAULT_TAX_RATE);
                let tax = (base * rate).round() / 100.0;
                (Some(tax), Some(base + tax))
            }
        };

        let full_address = self.address.as_ref().map(|address| {
            format!(
                "{}, {}, {} {}",
                address,
                self.city.as_deref().unwrap_or(config::DEFAULT_CITY),
                self.state.as_deref().unwrap_or(config::DEFAULT_STATE),
                self.zip.as_deref().unwrap_or(config::DEFAULT_ZIP),
            )
        });

        ShootDraft {
            scheduled_date: self.date,
            time: self.time,
            client_name: self.client_name,
            client_email: self.client_email,
            client_company: self.client_company,
            address: self.address,
            city: self.city,
            state: self.state,
            zip: self.zip,
            full_address,
            photographer_name: self.photographer,
            services: Some(self.services),
            base_quote: self.base_quote,
            tax_rate: self.tax_rate,
            tax_amount,
            total_quote,
            status: self.status,
            notes: self.notes,
            ..ShootDraft::default()
        }
    }
}

/// Book a new shoot
pub fn book_shoot(state: &AppState, args: BookArgs) -> Result<(ShootRecord, RemoteSync)> {
    state.shoots_service.new_shoot(args.into_draft())
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// ID of the shoot to update
    pub id: String,

    #[arg(long)]
    pub status: Option<ShootStatus>,

    /// New notes; pass an empty string to clear them
    #[arg(long)]
    pub notes: Option<String>,

    /// Completion date, yyyy-MM-dd
    #[arg(long)]
    pub completed_date: Option<String>,

    /// Full partial update as JSON; null clears a field
    #[arg(long, conflicts_with_all = ["status", "notes", "completed_date"])]
    pub json: Option<String>,
}

impl UpdateArgs {
    fn into_update(self) -> Result<ShootUpdate> {
        if let Some(json) = self.json {
            return Ok(serde_json::from_str(&json)?);
        }

        let mut update = ShootUpdate {
            status: self.status,
            ..ShootUpdate::default()
        };
        if let Some(notes) = self.notes {
            update.notes = if notes.is_empty() {
                Patch::Clear
            } else {
                Patch::Set(notes)
            };
        }
        if let Some(date) = self.completed_date {
            update.completed_date = Patch::Set(date);
        }

        Ok(update)
    }
}

/// Update a shoot; fails when the remote rejects the change
pub async fn update_shoot(state: &AppState, args: UpdateArgs) -> Result<ShootRecord> {
    let id = args.id.clone();
    let update = args.into_update()?;

    if update.is_empty() {
        return Err(AppError::Generic("Nothing to update".to_string()));
    }

    state.shoots_service.update_shoot(&id, update).await
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// ID of the shoot the media belongs to
    pub id: String,

    /// Delivered file as url,filename,mime-type; repeat for several
    #[arg(long = "file", required = true)]
    pub files: Vec<UploadedFile>,
}

/// Attach delivered media to a shoot, replacing any earlier media
pub async fn upload_media(state: &AppState, args: UploadArgs) -> Result<ShootRecord> {
    let media = media_from_uploads(&args.files, Utc::now());
    tracing::info!("Attaching {} media files to shoot {}", media.len(), args.id);

    state
        .shoots_service
        .update_shoot(&args.id, ShootUpdate::media(media))
        .await
}

/// Delete a shoot
pub fn delete_shoot(state: &AppState, id: &str) -> Result<RemoteSync> {
    state.shoots_service.delete_shoot(id)
}

pub fn list_photographers(state: &AppState) -> Vec<PersonSummary> {
    state.shoots_service.get_unique_photographers()
}

pub fn list_editors(state: &AppState) -> Vec<PersonSummary> {
    state.shoots_service.get_unique_editors()
}

pub fn list_clients(state: &AppState) -> Vec<ClientSummary> {
    state.shoots_service.get_unique_clients()
}

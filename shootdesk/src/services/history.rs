//! Shoot history view
//!
//! Filtering used by the shoot-history page. Its status filter is a
//! separate implementation from `queries::shoots_by_status` and does NOT
//! treat `booked` as part of `scheduled`; its company match also accepts two
//! missing companies as equal. Both differences are intentional until the
//! product decides which behaviour is right.

use crate::error::AppError;
use crate::models::{MediaBundle, MediaFile, Principal, Role, ShootRecord, ShootStatus};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::str::FromStr;

/// Shoots with exactly `status`, narrowed to the principal's own when they
/// are a client.
pub fn history_shoots_by_status(
    records: &[ShootRecord],
    status: ShootStatus,
    principal: Option<&Principal>,
) -> Vec<ShootRecord> {
    let client = principal.filter(|p| p.role == Role::Client);

    records
        .iter()
        .filter(|record| {
            client.map_or(true, |p| {
                record.client.name == p.name
                    || record.client.company == p.company
                    || record.client.email == p.email
            })
        })
        .filter(|record| record.status == status)
        .cloned()
        .collect()
}

/// Address / photographer narrowing applied on top of a status listing.
/// Empty criteria match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryFilter {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub photographer: String,
}

impl HistoryFilter {
    pub fn matches(&self, record: &ShootRecord) -> bool {
        let matches_address = self.address.is_empty()
            || record
                .location
                .full_address
                .to_lowercase()
                .contains(&self.address.to_lowercase());

        let matches_photographer =
            self.photographer.is_empty() || record.photographer.name == self.photographer;

        matches_address && matches_photographer
    }

    pub fn apply(&self, records: Vec<ShootRecord>) -> Vec<ShootRecord> {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }
}

/// A file handed over by the upload dialog
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub url: String,
    pub filename: String,
    pub mime_type: String,
}

/// Parses `url,filename,mime-type`; the URL itself may not contain commas
impl FromStr for UploadedFile {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ',').map(str::trim);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(url), Some(filename), Some(mime_type))
                if !url.is_empty() && !filename.is_empty() && mime_type.contains('/') =>
            {
                Ok(Self {
                    url: url.to_string(),
                    filename: filename.to_string(),
                    mime_type: mime_type.to_string(),
                })
            }
            _ => Err(AppError::Generic(format!(
                "Expected url,filename,mime-type but got {:?}",
                s
            ))),
        }
    }
}

/// Sort uploads into images, videos and documents by MIME type
pub fn media_from_uploads(files: &[UploadedFile], uploaded_at: DateTime<Utc>) -> MediaBundle {
    let mut media = MediaBundle::default();

    for file in files {
        let entry = MediaFile {
            url: file.url.clone(),
            filename: file.filename.clone(),
            uploaded_at,
        };

        if file.mime_type.starts_with("image/") {
            media.images.push(entry);
        } else if file.mime_type.starts_with("video/") {
            media.videos.push(entry);
        } else {
            media.documents.push(entry);
        }
    }

    media
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::shoot;
    use crate::services::queries::shoots_by_status;

    #[test]
    fn test_history_filter_does_not_fold_booked_into_scheduled() {
        let records = vec![
            shoot("a", ShootStatus::Scheduled),
            shoot("b", ShootStatus::Booked),
        ];

        let history = history_shoots_by_status(&records, ShootStatus::Scheduled, None);
        let facade = shoots_by_status(&records, ShootStatus::Scheduled, None);

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, "a");
        assert_eq!(facade.len(), 2);
    }

    #[test]
    fn test_history_company_match_accepts_both_missing() {
        let mut record = shoot("a", ShootStatus::Completed);
        record.client.company = None;

        let principal = Principal {
            id: "u1".to_string(),
            name: "Someone Else".to_string(),
            email: "else@test".to_string(),
            company: None,
            phone: None,
            role: Role::Client,
        };

        let history =
            history_shoots_by_status(&[record.clone()], ShootStatus::Completed, Some(&principal));
        let facade = shoots_by_status(&[record], ShootStatus::Completed, Some(&principal));

        assert_eq!(history.len(), 1);
        assert!(facade.is_empty());
    }

    #[test]
    fn test_address_and_photographer_filter() {
        let mut downtown = shoot("a", ShootStatus::Scheduled);
        downtown.location.full_address = "9 Pine St, Seattle, WA".to_string();
        let harbor = shoot("b", ShootStatus::Scheduled);

        let filter = HistoryFilter {
            address: "PINE".to_string(),
            photographer: String::new(),
        };
        let result = filter.apply(vec![downtown.clone(), harbor.clone()]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "a");

        let filter = HistoryFilter {
            address: String::new(),
            photographer: "Nobody".to_string(),
        };
        assert!(filter.apply(vec![downtown.clone(), harbor.clone()]).is_empty());

        assert_eq!(HistoryFilter::default().apply(vec![downtown, harbor]).len(), 2);
    }

    #[test]
    fn test_media_from_uploads_groups_by_mime_type() {
        let files = vec![
            UploadedFile {
                url: "blob:1".to_string(),
                filename: "front.jpg".to_string(),
                mime_type: "image/jpeg".to_string(),
            },
            UploadedFile {
                url: "blob:2".to_string(),
                filename: "walkthrough.mp4".to_string(),
                mime_type: "video/mp4".to_string(),
            },
            UploadedFile {
                url: "blob:3".to_string(),
                filename: "floorplan.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
            },
        ];
        let now = Utc::now();

        let media = media_from_uploads(&files, now);

        assert_eq!(media.images.len(), 1);
        assert_eq!(media.videos[0].filename, "walkthrough.mp4");
        assert_eq!(media.documents[0].uploaded_at, now);
        assert_eq!(media.len(), 3);
    }

    #[test]
    fn test_uploaded_file_from_cli_triple() {
        let file: UploadedFile = "https://cdn.test/a.jpg, a.jpg, image/jpeg".parse().unwrap();
        assert_eq!(file.url, "https://cdn.test/a.jpg");
        assert_eq!(file.filename, "a.jpg");
        assert_eq!(file.mime_type, "image/jpeg");

        assert!("https://cdn.test/a.jpg,a.jpg".parse::<UploadedFile>().is_err());
        assert!(",a.jpg,image/jpeg".parse::<UploadedFile>().is_err());
        assert!("u,a.jpg,jpeg".parse::<UploadedFile>().is_err());
    }
}

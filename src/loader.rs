use std::path::Path;

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{LoadError, ParseError};
use crate::fetch;
use crate::sample;
use crate::sheet::normalize::defaults::policy_for;
use crate::sheet::normalize::NormalizeOptions;
use crate::sheet::{self, SheetLayout};
use crate::store::{ApartmentStore, Catalog};

/// Where the CSV comes from for one load.
#[derive(Debug, Clone)]
pub enum Origin<'a> {
    Remote,
    File(&'a Path),
}

/// Parse CSV text into a store. Placeholders follow the configured policy.
pub fn parse_text(text: &str, settings: &Settings, layout: &SheetLayout) -> Result<ApartmentStore, ParseError> {
    let options = NormalizeOptions {
        office_prefix: settings.office_prefix.clone(),
    };
    let mut policy = policy_for(settings.fallback, settings.seed);
    let parsed = sheet::parse(text, layout, &options, policy.as_mut())?;
    Ok(ApartmentStore::from_sheet(parsed))
}

pub async fn try_load(origin: Origin<'_>, settings: &Settings) -> Result<ApartmentStore, LoadError> {
    let text = match origin {
        Origin::Remote => {
            let client = fetch::build_client()?;
            fetch::fetch_csv(&client, &settings.sheet_url, settings.fetch_timeout_secs).await?
        }
        Origin::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.display().to_string(),
                source,
            })?,
    };
    Ok(parse_text(&text, settings, &SheetLayout::default())?)
}

/// Load apartments, falling back to the sample building on any failure.
pub async fn load(origin: Origin<'_>, settings: &Settings) -> ApartmentStore {
    match try_load(origin, settings).await {
        Ok(store) => {
            info!(records = store.len(), "Loaded apartments from sheet");
            store
        }
        Err(e) => {
            warn!(error = %e, "Sheet unavailable, using sample apartments");
            sample::store(&settings.office_prefix)
        }
    }
}

/// Build a fresh store and publish it over the current one.
pub async fn reload(catalog: &Catalog, origin: Origin<'_>, settings: &Settings) {
    let store = load(origin, settings).await;
    let previous = catalog.publish(store);
    info!(previous = previous.len(), "Catalog reloaded");
}

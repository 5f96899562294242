// libs/catalog-cell/src/services/catalog.rs
use std::collections::BTreeSet;

use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{is_unavailable, SupabaseClient};

use crate::models::{CatalogError, CityRow, LocationLink, PracticeLocation, Specialty};

/// Read-only access to provisioned reference data: specialties, practice
/// locations and the doctor-to-location association. Nothing here mutates.
pub struct CatalogService {
    supabase: SupabaseClient,
}

impl CatalogService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_specialties(&self) -> Result<Vec<Specialty>, CatalogError> {
        debug!("Fetching specialty list");

        let specialties: Vec<Specialty> = self
            .supabase
            .request(
                Method::GET,
                "/rest/v1/specialties?select=id,code,name&order=name.asc",
                None,
            )
            .await
            .map_err(store_error)?;

        Ok(specialties)
    }

    /// Distinct city names, ascending. The store has no DISTINCT projection,
    /// so rows are deduplicated here; a BTreeSet keeps the ordering stable.
    pub async fn list_cities(&self) -> Result<Vec<String>, CatalogError> {
        debug!("Fetching distinct cities");

        let rows: Vec<CityRow> = self
            .supabase
            .request(Method::GET, "/rest/v1/locations?select=city", None)
            .await
            .map_err(store_error)?;

        let cities: BTreeSet<String> = rows.into_iter().map(|r| r.city).collect();
        Ok(cities.into_iter().collect())
    }

    pub async fn locations_for(&self, doctor_id: i64) -> Result<Vec<PracticeLocation>, CatalogError> {
        debug!("Fetching practice locations for doctor {}", doctor_id);

        let links: Vec<LocationLink> = self
            .supabase
            .request(
                Method::GET,
                &format!(
                    "/rest/v1/doctor_locations?doctor_id=eq.{}&select=location_id",
                    doctor_id
                ),
                None,
            )
            .await
            .map_err(store_error)?;

        if links.is_empty() {
            return Ok(vec![]);
        }

        let id_list = links
            .iter()
            .map(|l| l.location_id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let locations: Vec<PracticeLocation> = self
            .supabase
            .request(
                Method::GET,
                &format!(
                    "/rest/v1/locations?id=in.({})&select=city,zip,street&order=city.asc",
                    id_list
                ),
                None,
            )
            .await
            .map_err(store_error)?;

        Ok(locations)
    }
}

fn store_error(e: anyhow::Error) -> CatalogError {
    if is_unavailable(&e) {
        CatalogError::StoreUnavailable
    } else {
        CatalogError::Database(e.to_string())
    }
}

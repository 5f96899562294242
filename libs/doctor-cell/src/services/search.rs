// libs/doctor-cell/src/services/search.rs
use std::collections::{HashMap, HashSet};

use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{is_unavailable, SupabaseClient};

use crate::models::{
    Doctor, DoctorError, DoctorLink, DoctorSearchQuery, DoctorSummary, LocationId, SpecialtyName,
    MAX_SEARCH_RESULTS,
};

/// Resolves the doctor directory result set from optional predicates.
///
/// Ordering is (specialty name, last name, first name, id) ascending. The id
/// tie-break keeps repeated identical queries deterministic, so the caller's
/// fixed-size pagination never shifts between requests.
pub struct DoctorSearchService {
    supabase: SupabaseClient,
}

impl DoctorSearchService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn search(&self, query: &DoctorSearchQuery) -> Result<Vec<DoctorSummary>, DoctorError> {
        debug!("Searching doctors with filters: {:?}", query);

        let specialty_names = self.specialty_names().await?;

        let mut path =
            "/rest/v1/doctors?select=id,first_name,last_name,specialty_id,phone,email".to_string();
        if let Some(specialty_id) = query.specialty_id {
            path.push_str(&format!("&specialty_id=eq.{}", specialty_id));
        }

        let doctors: Vec<Doctor> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(store_error)?;

        // The city predicate holds when the doctor has at least one practice
        // location in exactly that city.
        let doctors_in_city = match &query.city {
            Some(city) => match self.doctors_in_city(city).await? {
                Some(ids) => Some(ids),
                None => return Ok(vec![]),
            },
            None => None,
        };

        let mut results: Vec<DoctorSummary> = doctors
            .into_iter()
            .filter(|d| {
                doctors_in_city
                    .as_ref()
                    .map_or(true, |ids| ids.contains(&d.id))
            })
            .filter(|d| {
                query
                    .q
                    .as_deref()
                    .map_or(true, |q| matches_name(&d.first_name, &d.last_name, q))
            })
            .map(|d| DoctorSummary {
                id: d.id,
                first_name: d.first_name,
                last_name: d.last_name,
                specialty: specialty_names
                    .get(&d.specialty_id)
                    .cloned()
                    .unwrap_or_default(),
                phone: d.phone,
                email: d.email,
            })
            .collect();

        sort_results(&mut results);
        results.truncate(MAX_SEARCH_RESULTS);

        debug!("Search matched {} doctors", results.len());
        Ok(results)
    }

    async fn specialty_names(&self) -> Result<HashMap<i64, String>, DoctorError> {
        let specialties: Vec<SpecialtyName> = self
            .supabase
            .request(Method::GET, "/rest/v1/specialties?select=id,name", None)
            .await
            .map_err(store_error)?;

        Ok(specialties.into_iter().map(|s| (s.id, s.name)).collect())
    }

    /// Doctor ids with a practice location in the given city, or `None` when
    /// no location exists there at all (the whole result set is empty then).
    async fn doctors_in_city(&self, city: &str) -> Result<Option<HashSet<i64>>, DoctorError> {
        let locations: Vec<LocationId> = self
            .supabase
            .request(
                Method::GET,
                &format!(
                    "/rest/v1/locations?city=eq.{}&select=id",
                    urlencoding::encode(city)
                ),
                None,
            )
            .await
            .map_err(store_error)?;

        if locations.is_empty() {
            return Ok(None);
        }

        let id_list = locations
            .iter()
            .map(|l| l.id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let links: Vec<DoctorLink> = self
            .supabase
            .request(
                Method::GET,
                &format!(
                    "/rest/v1/doctor_locations?location_id=in.({})&select=doctor_id",
                    id_list
                ),
                None,
            )
            .await
            .map_err(store_error)?;

        Ok(Some(links.into_iter().map(|l| l.doctor_id).collect()))
    }
}

/// Case-insensitive substring match against `"first last"`. A substring, not
/// a prefix or token match: "na sch" finds nobody, "a sch" finds "Lena Schulz".
fn matches_name(first_name: &str, last_name: &str, query: &str) -> bool {
    let full = format!("{} {}", first_name, last_name).to_lowercase();
    full.contains(&query.to_lowercase())
}

fn sort_results(results: &mut [DoctorSummary]) {
    results.sort_by(|a, b| {
        a.specialty
            .cmp(&b.specialty)
            .then_with(|| a.last_name.cmp(&b.last_name))
            .then_with(|| a.first_name.cmp(&b.first_name))
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn store_error(e: anyhow::Error) -> DoctorError {
    if is_unavailable(&e) {
        DoctorError::StoreUnavailable
    } else {
        DoctorError::Database(e.to_string())
    }
}

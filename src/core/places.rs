//! Site management: create, rename, delete, look up, wipe.

use crate::core::ledger::Ledger;
use crate::core::writer::WriteOp;
use crate::errors::{AppError, AppResult};
use crate::models::place::short_id;
use crate::models::{Place, PlaceId, Rates};
use chrono::Utc;

const MIN_NAME_LEN: usize = 2;
const MIN_PREFIX_LEN: usize = 4;

fn validate_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(AppError::Validation(format!(
            "site name must be at least {} characters",
            MIN_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_rate(label: &str, value: f64) -> AppResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!(
            "{} rate must be a number >= 0 (got {})",
            label, value
        )));
    }
    Ok(value)
}

pub fn add_place(
    ledger: &Ledger,
    name: &str,
    worker_rate: f64,
    labourer_rate: f64,
) -> AppResult<Place> {
    let name = validate_name(name)?;
    let worker = validate_rate("worker", worker_rate)?;
    let labourer = validate_rate("labourer", labourer_rate)?;

    let place = Place::new(&name, Rates::new(worker, labourer));
    ledger.submit(WriteOp::PutPlace(place.clone()));
    Ok(place)
}

pub fn rename_place(ledger: &Ledger, place_id: &PlaceId, name: &str) -> AppResult<Place> {
    let name = validate_name(name)?;
    let mut place = ledger
        .place(place_id)
        .ok_or_else(|| AppError::PlaceNotFound(short_id(place_id)))?;

    place.name = name;
    place.updated_at = Utc::now();
    ledger.submit(WriteOp::PutPlace(place.clone()));
    Ok(place)
}

/// Delete a site together with all of its records.
pub fn delete_place(ledger: &Ledger, place_id: &PlaceId) -> AppResult<Place> {
    let place = ledger
        .place(place_id)
        .ok_or_else(|| AppError::PlaceNotFound(short_id(place_id)))?;
    ledger.submit(WriteOp::DeletePlace(*place_id));
    Ok(place)
}

/// Find a site by full id, unique id prefix (at least 4 characters) or
/// case-insensitive name.
pub fn resolve_place(ledger: &Ledger, query: &str) -> AppResult<Place> {
    let q = query.trim();
    if q.is_empty() {
        return Err(AppError::Validation("site must not be empty".into()));
    }
    let places = ledger.places();

    if let Some(p) = places.iter().find(|p| p.id.to_string() == q) {
        return Ok(p.clone());
    }

    let lower = q.to_lowercase();
    let by_name: Vec<&Place> = places
        .iter()
        .filter(|p| p.name.to_lowercase() == lower)
        .collect();
    match by_name.as_slice() {
        [one] => return Ok((*one).clone()),
        [] => {}
        _ => {
            return Err(AppError::Validation(format!(
                "more than one site is named '{}'; use its id instead",
                q
            )));
        }
    }

    if q.len() >= MIN_PREFIX_LEN {
        let by_prefix: Vec<&Place> = places
            .iter()
            .filter(|p| p.id.to_string().starts_with(&lower))
            .collect();
        match by_prefix.as_slice() {
            [one] => return Ok((*one).clone()),
            [] => {}
            _ => {
                return Err(AppError::Validation(format!(
                    "id prefix '{}' matches more than one site",
                    q
                )));
            }
        }
    }

    Err(AppError::PlaceNotFound(q.to_string()))
}

/// Delete every site and record of the ledger's user.
pub fn clear(ledger: &Ledger) {
    tracing::info!(user = %ledger.session(), "clearing all data");
    ledger.submit(WriteOp::Clear);
}

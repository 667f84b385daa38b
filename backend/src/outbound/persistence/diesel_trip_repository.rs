//! PostgreSQL-backed `TripRepository` implementation using Diesel ORM.
//!
//! Seat reservation and detail rewrites are single guarded `UPDATE`
//! statements, so PostgreSQL row locking serialises concurrent bookings and
//! `current_bookings` never passes `max_people`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{DetailsUpdate, TripPersistenceError, TripRepository};
use crate::domain::{SeatReservation, Trip, TripDetails, TripId, TripRecord, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewTripRow, TripDetailsUpdate, TripRow};
use super::pool::DbPool;
use super::schema::trips;

/// Diesel-backed implementation of the [`TripRepository`] port.
#[derive(Clone)]
pub struct DieselTripRepository {
    pool: DbPool,
}

impl DieselTripRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn diesel_error(error: diesel::result::Error) -> TripPersistenceError {
    map_diesel_error(
        &error,
        TripPersistenceError::query,
        TripPersistenceError::connection,
    )
}

fn row_to_trip(row: TripRow) -> Trip {
    Trip::restore(TripRecord {
        id: TripId::from_uuid(row.id),
        details: TripDetails {
            title: row.title,
            destination: row.destination,
            description: row.description,
            price: row.price,
            duration: row.duration,
            start_date: row.start_date,
            end_date: row.end_date,
            max_people: row.max_people,
            image: row.image,
        },
        current_bookings: row.current_bookings,
        created_by: UserId::from_uuid(row.created_by),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn new_row(trip: &Trip) -> NewTripRow<'_> {
    let details = trip.details();
    NewTripRow {
        id: *trip.id().as_uuid(),
        title: &details.title,
        destination: &details.destination,
        description: &details.description,
        price: details.price,
        duration: details.duration,
        start_date: details.start_date,
        end_date: details.end_date,
        max_people: details.max_people,
        current_bookings: trip.current_bookings(),
        image: &details.image,
        created_by: *trip.created_by().as_uuid(),
        created_at: trip.created_at(),
        updated_at: trip.updated_at(),
    }
}

fn details_update(details: &TripDetails, updated_at: DateTime<Utc>) -> TripDetailsUpdate<'_> {
    TripDetailsUpdate {
        title: &details.title,
        destination: &details.destination,
        description: &details.description,
        price: details.price,
        duration: details.duration,
        start_date: details.start_date,
        end_date: details.end_date,
        max_people: details.max_people,
        image: &details.image,
        updated_at,
    }
}

#[async_trait]
impl TripRepository for DieselTripRepository {
    async fn list(&self) -> Result<Vec<Trip>, TripPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TripPersistenceError::connection))?;
        let rows: Vec<TripRow> = trips::table
            .order((trips::created_at.asc(), trips::id.asc()))
            .select(TripRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(row_to_trip).collect())
    }

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, TripPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TripPersistenceError::connection))?;
        let row = trips::table
            .filter(trips::id.eq(id.as_uuid()))
            .select(TripRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(row_to_trip))
    }

    async fn insert(&self, trip: &Trip) -> Result<(), TripPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TripPersistenceError::connection))?;
        diesel::insert_into(trips::table)
            .values(&new_row(trip))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }

    async fn update_details(
        &self,
        id: &TripId,
        details: &TripDetails,
        updated_at: DateTime<Utc>,
    ) -> Result<DetailsUpdate, TripPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TripPersistenceError::connection))?;
        let uuid: Uuid = *id.as_uuid();

        let updated = diesel::update(
            trips::table
                .filter(trips::id.eq(uuid))
                .filter(trips::current_bookings.le(details.max_people)),
        )
        .set(&details_update(details, updated_at))
        .returning(TripRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(diesel_error)?;
        if let Some(row) = updated {
            return Ok(DetailsUpdate::Updated(row_to_trip(row)));
        }

        let current: Option<i32> = trips::table
            .filter(trips::id.eq(uuid))
            .select(trips::current_bookings)
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(match current {
            Some(current_bookings) => DetailsUpdate::CapacityConflict { current_bookings },
            None => DetailsUpdate::NotFound,
        })
    }

    async fn delete(&self, id: &TripId) -> Result<bool, TripPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TripPersistenceError::connection))?;
        let removed = diesel::delete(trips::table.filter(trips::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(removed > 0)
    }

    async fn reserve_seat(
        &self,
        id: &TripId,
        at: DateTime<Utc>,
    ) -> Result<SeatReservation, TripPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TripPersistenceError::connection))?;
        let uuid: Uuid = *id.as_uuid();

        let reserved = diesel::update(
            trips::table
                .filter(trips::id.eq(uuid))
                .filter(trips::current_bookings.lt(trips::max_people)),
        )
        .set((
            trips::current_bookings.eq(trips::current_bookings + 1),
            trips::updated_at.eq(at),
        ))
        .returning(TripRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(diesel_error)?;
        if let Some(row) = reserved {
            return Ok(SeatReservation::Reserved(row_to_trip(row)));
        }

        let exists: bool = diesel::select(diesel::dsl::exists(
            trips::table.filter(trips::id.eq(uuid)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(if exists {
            SeatReservation::FullyBooked
        } else {
            SeatReservation::NotFound
        })
    }
}

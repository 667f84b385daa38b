//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        /// Lower-cased login email; unique.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Varchar,
        is_admin -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bookable trips.
    ///
    /// A check constraint keeps `current_bookings` between zero and
    /// `max_people`.
    trips (id) {
        id -> Uuid,
        title -> Varchar,
        destination -> Varchar,
        description -> Text,
        price -> Float8,
        duration -> Int4,
        start_date -> Timestamptz,
        end_date -> Timestamptz,
        max_people -> Int4,
        current_bookings -> Int4,
        image -> Varchar,
        created_by -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, trips);

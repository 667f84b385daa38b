//! Trip data model, field validation, and the booking capacity rules.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Error, UserId};

/// Image used when a trip is created without one.
pub const DEFAULT_TRIP_IMAGE: &str = "https://via.placeholder.com/400x200";

/// Stable trip identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(Uuid);

impl TripId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for TripId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Trip payload fields, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripField {
    Title,
    Destination,
    Description,
    Price,
    Duration,
    StartDate,
    EndDate,
    MaxPeople,
    Image,
}

impl TripField {
    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Destination => "destination",
            Self::Description => "description",
            Self::Price => "price",
            Self::Duration => "duration",
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
            Self::MaxPeople => "maxPeople",
            Self::Image => "image",
        }
    }

    fn missing_message(self) -> &'static str {
        match self {
            Self::Title => "Please add a trip title",
            Self::Destination => "Please add a destination",
            Self::Description => "Please add a description",
            Self::Price => "Please add a price",
            Self::Duration => "Please add duration",
            Self::StartDate => "Please add start date",
            Self::EndDate => "Please add end date",
            Self::MaxPeople => "Please add max people",
            Self::Image => "Please add an image",
        }
    }
}

impl fmt::Display for TripField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for trip payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum TripValidationError {
    /// A required field was absent.
    Missing(TripField),
    /// A text field was present but blank.
    Blank(TripField),
    /// Price was negative or not finite.
    InvalidPrice,
    /// An integer field was zero or negative.
    NotPositive(TripField),
    /// `endDate` does not fall after `startDate`.
    EndNotAfterStart,
    /// `maxPeople` would drop below the seats already booked.
    BelowCurrentBookings { current_bookings: i32 },
    /// The value could not be read as the field's type.
    Unreadable(TripField),
}

impl TripValidationError {
    /// Field the failure relates to.
    pub fn field(&self) -> TripField {
        match self {
            Self::Missing(field)
            | Self::Blank(field)
            | Self::NotPositive(field)
            | Self::Unreadable(field) => *field,
            Self::InvalidPrice => TripField::Price,
            Self::EndNotAfterStart => TripField::EndDate,
            Self::BelowCurrentBookings { .. } => TripField::MaxPeople,
        }
    }

    /// Machine readable reason, reported alongside the field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing(_) => "missing",
            Self::Blank(_) => "blank",
            Self::InvalidPrice => "negative",
            Self::NotPositive(_) => "not_positive",
            Self::EndNotAfterStart => "date_order",
            Self::BelowCurrentBookings { .. } => "below_current_bookings",
            Self::Unreadable(_) => "invalid",
        }
    }
}

impl fmt::Display for TripValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(field) => f.write_str(field.missing_message()),
            Self::Blank(field) => write!(f, "{field} must not be empty"),
            Self::InvalidPrice => write!(f, "Price must be a non-negative number"),
            Self::NotPositive(field) => write!(f, "{field} must be a positive integer"),
            Self::EndNotAfterStart => write!(f, "End date must be after start date"),
            Self::BelowCurrentBookings { current_bookings } => write!(
                f,
                "maxPeople must be at least the current bookings ({current_bookings})"
            ),
            Self::Unreadable(field @ (TripField::StartDate | TripField::EndDate)) => {
                write!(f, "{field} must be a date")
            }
            Self::Unreadable(field @ (TripField::Duration | TripField::MaxPeople)) => {
                write!(f, "{field} must be a whole number")
            }
            Self::Unreadable(field) => write!(f, "{field} must be a number"),
        }
    }
}

impl std::error::Error for TripValidationError {}

impl From<TripValidationError> for Error {
    fn from(value: TripValidationError) -> Self {
        Error::invalid_request(value.to_string())
            .with_details(json!({ "field": value.field().as_str(), "code": value.code() }))
    }
}

/// Raw trip fields supplied by a caller.
///
/// Used as the full payload on create and as a partial patch on update, where
/// `None` means "keep the stored value".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripInput {
    pub title: Option<String>,
    pub destination: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub duration: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub max_people: Option<i32>,
    pub image: Option<String>,
}

/// Validated descriptive fields of a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripDetails {
    #[schema(example = "Alpine Escape")]
    pub title: String,
    #[schema(example = "Zermatt")]
    pub destination: String,
    #[schema(example = "Five days of hiking under the Matterhorn.")]
    pub description: String,
    #[schema(example = 1299.0)]
    pub price: f64,
    #[schema(example = 5)]
    pub duration: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[schema(example = 12)]
    pub max_people: i32,
    #[schema(example = "https://via.placeholder.com/400x200")]
    pub image: String,
}

fn required_text(value: Option<String>, field: TripField) -> Result<String, TripValidationError> {
    match value {
        None => Err(TripValidationError::Missing(field)),
        Some(text) => present_text(text, field),
    }
}

fn present_text(text: String, field: TripField) -> Result<String, TripValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TripValidationError::Blank(field));
    }
    Ok(trimmed.to_owned())
}

fn checked_price(price: f64) -> Result<f64, TripValidationError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(TripValidationError::InvalidPrice)
    }
}

fn checked_positive(value: i32, field: TripField) -> Result<i32, TripValidationError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(TripValidationError::NotPositive(field))
    }
}

fn image_or_default(image: Option<String>) -> String {
    image
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
        .unwrap_or_else(|| DEFAULT_TRIP_IMAGE.to_owned())
}

impl TripDetails {
    /// Validate a complete create payload.
    ///
    /// Fields are checked in declaration order so the first failure reported
    /// is the first offending field; the date range is checked last.
    ///
    /// # Examples
    /// ```
    /// use chrono::{Duration, Utc};
    /// use travel_backend::domain::{TripDetails, TripInput, DEFAULT_TRIP_IMAGE};
    ///
    /// let start = Utc::now();
    /// let details = TripDetails::try_from_input(TripInput {
    ///     title: Some("Alpine Escape".into()),
    ///     destination: Some("Zermatt".into()),
    ///     description: Some("Hiking".into()),
    ///     price: Some(0.0),
    ///     duration: Some(5),
    ///     start_date: Some(start),
    ///     end_date: Some(start + Duration::days(5)),
    ///     max_people: Some(10),
    ///     image: None,
    /// })
    /// .unwrap();
    /// assert_eq!(details.image, DEFAULT_TRIP_IMAGE);
    /// ```
    pub fn try_from_input(input: TripInput) -> Result<Self, TripValidationError> {
        let TripInput {
            title,
            destination,
            description,
            price,
            duration,
            start_date,
            end_date,
            max_people,
            image,
        } = input;

        let details = Self {
            title: required_text(title, TripField::Title)?,
            destination: required_text(destination, TripField::Destination)?,
            description: required_text(description, TripField::Description)?,
            price: checked_price(price.ok_or(TripValidationError::Missing(TripField::Price))?)?,
            duration: checked_positive(
                duration.ok_or(TripValidationError::Missing(TripField::Duration))?,
                TripField::Duration,
            )?,
            start_date: start_date.ok_or(TripValidationError::Missing(TripField::StartDate))?,
            end_date: end_date.ok_or(TripValidationError::Missing(TripField::EndDate))?,
            max_people: checked_positive(
                max_people.ok_or(TripValidationError::Missing(TripField::MaxPeople))?,
                TripField::MaxPeople,
            )?,
            image: image_or_default(image),
        };
        details.check_date_order()?;
        Ok(details)
    }

    fn check_date_order(&self) -> Result<(), TripValidationError> {
        if self.start_date < self.end_date {
            Ok(())
        } else {
            Err(TripValidationError::EndNotAfterStart)
        }
    }

    /// Overwrite every field present in `patch`, validating each one.
    fn merged(&self, patch: TripInput) -> Result<Self, TripValidationError> {
        let mut next = self.clone();
        if let Some(title) = patch.title {
            next.title = present_text(title, TripField::Title)?;
        }
        if let Some(destination) = patch.destination {
            next.destination = present_text(destination, TripField::Destination)?;
        }
        if let Some(description) = patch.description {
            next.description = present_text(description, TripField::Description)?;
        }
        if let Some(price) = patch.price {
            next.price = checked_price(price)?;
        }
        if let Some(duration) = patch.duration {
            next.duration = checked_positive(duration, TripField::Duration)?;
        }
        if let Some(start_date) = patch.start_date {
            next.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            next.end_date = end_date;
        }
        if let Some(max_people) = patch.max_people {
            next.max_people = checked_positive(max_people, TripField::MaxPeople)?;
        }
        if patch.image.is_some() {
            next.image = image_or_default(patch.image);
        }
        next.check_date_order()?;
        Ok(next)
    }
}

/// A bookable trip.
///
/// ## Invariants
/// - `0 <= current_bookings <= details.max_people`.
/// - `details.start_date < details.end_date`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    id: TripId,
    details: TripDetails,
    current_bookings: i32,
    created_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Every stored column of a trip, used by adapters to rehydrate records.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub id: TripId,
    pub details: TripDetails,
    pub current_bookings: i32,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of attempting to take one seat on a trip.
#[derive(Debug, Clone, PartialEq)]
pub enum SeatReservation {
    /// A seat was taken; carries the updated trip.
    Reserved(Trip),
    /// The trip exists but has no remaining capacity.
    FullyBooked,
    /// No trip with the requested id exists.
    NotFound,
}

impl Trip {
    /// Build a brand new trip with no bookings.
    pub fn create(id: TripId, details: TripDetails, created_by: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            details,
            current_bookings: 0,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a trip from storage. Stored rows already satisfy the
    /// invariants, so no validation runs here.
    pub fn restore(record: TripRecord) -> Self {
        let TripRecord {
            id,
            details,
            current_bookings,
            created_by,
            created_at,
            updated_at,
        } = record;
        Self {
            id,
            details,
            current_bookings,
            created_by,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> TripId {
        self.id
    }

    pub fn details(&self) -> &TripDetails {
        &self.details
    }

    pub fn current_bookings(&self) -> i32 {
        self.current_bookings
    }

    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether at least one seat remains.
    pub fn is_open(&self) -> bool {
        self.current_bookings < self.details.max_people
    }

    /// Take one seat if the trip is open. Returns `false` when full.
    pub fn reserve_seat(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_open() {
            return false;
        }
        self.current_bookings += 1;
        self.updated_at = now;
        true
    }

    /// Apply a merge-on-presence patch, returning the updated trip.
    ///
    /// Absent fields keep their stored value. The merged trip must keep its
    /// dates ordered and must not drop capacity below the seats already sold.
    pub fn patched(&self, patch: TripInput, now: DateTime<Utc>) -> Result<Self, TripValidationError> {
        let details = self.details.merged(patch)?;
        if details.max_people < self.current_bookings {
            return Err(TripValidationError::BelowCurrentBookings {
                current_bookings: self.current_bookings,
            });
        }
        Ok(Self {
            details,
            updated_at: now,
            ..self.clone()
        })
    }

    /// Decompose into storable columns.
    pub fn into_record(self) -> TripRecord {
        TripRecord {
            id: self.id,
            details: self.details,
            current_bookings: self.current_bookings,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

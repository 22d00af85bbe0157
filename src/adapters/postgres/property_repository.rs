//! PostgreSQL implementation of PropertyRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{corrupt, db_error, int4, require_row, uint};
use crate::domain::foundation::{DomainError, Money, PartnerId, PropertyId, Timestamp};
use crate::domain::property::{FeatureWindow, Property, PropertyDetails};
use crate::ports::PropertyRepository;

const COLUMNS: &str = "id, partner_id, name, property_type, location, price_per_night, units, \
     capacity, amenities, images, is_active, feature_start, feature_end, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresPropertyRepository {
    pool: PgPool,
}

impl PostgresPropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PropertyRow {
    id: Uuid,
    partner_id: Uuid,
    name: String,
    property_type: String,
    location: String,
    price_per_night: i64,
    units: i32,
    capacity: i32,
    amenities: Vec<String>,
    images: Vec<String>,
    is_active: bool,
    feature_start: Option<DateTime<Utc>>,
    feature_end: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PropertyRow> for Property {
    type Error = DomainError;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        let feature = match (row.feature_start, row.feature_end) {
            (Some(start), Some(end)) => Some(
                FeatureWindow::from_bounds(
                    Timestamp::from_datetime(start),
                    Timestamp::from_datetime(end),
                )
                .map_err(|e| corrupt("feature window", e))?,
            ),
            (None, None) => None,
            _ => return Err(corrupt("feature window", "half-open")),
        };

        Ok(Property {
            id: PropertyId::from_uuid(row.id),
            partner_id: PartnerId::from_uuid(row.partner_id),
            details: PropertyDetails {
                name: row.name,
                property_type: row.property_type,
                location: row.location,
                price_per_night: Money::new(row.price_per_night),
                units: uint("units", row.units)?,
                capacity: uint("capacity", row.capacity)?,
                amenities: row.amenities.into_iter().collect(),
                images: row.images,
            },
            is_active: row.is_active,
            feature,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn feature_bounds(property: &Property) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match &property.feature {
        Some(window) => (
            Some(*window.start().as_datetime()),
            Some(*window.end().as_datetime()),
        ),
        None => (None, None),
    }
}

#[async_trait]
impl PropertyRepository for PostgresPropertyRepository {
    async fn save(&self, property: &Property) -> Result<(), DomainError> {
        let (feature_start, feature_end) = feature_bounds(property);
        let details = &property.details;
        sqlx::query(
            r#"
            INSERT INTO properties (
                id, partner_id, name, property_type, location, price_per_night, units,
                capacity, amenities, images, is_active, feature_start, feature_end,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(property.id.as_uuid())
        .bind(property.partner_id.as_uuid())
        .bind(&details.name)
        .bind(&details.property_type)
        .bind(&details.location)
        .bind(details.price_per_night.amount())
        .bind(int4("units", details.units)?)
        .bind(int4("capacity", details.capacity)?)
        .bind(details.amenities.iter().cloned().collect::<Vec<String>>())
        .bind(&details.images)
        .bind(property.is_active)
        .bind(feature_start)
        .bind(feature_end)
        .bind(property.created_at.as_datetime())
        .bind(property.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert property"))?;
        Ok(())
    }

    async fn update(&self, property: &Property) -> Result<(), DomainError> {
        let (feature_start, feature_end) = feature_bounds(property);
        let details = &property.details;
        let result = sqlx::query(
            r#"
            UPDATE properties SET
                name = $2,
                property_type = $3,
                location = $4,
                price_per_night = $5,
                units = $6,
                capacity = $7,
                amenities = $8,
                images = $9,
                is_active = $10,
                feature_start = $11,
                feature_end = $12,
                updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(property.id.as_uuid())
        .bind(&details.name)
        .bind(&details.property_type)
        .bind(&details.location)
        .bind(details.price_per_night.amount())
        .bind(int4("units", details.units)?)
        .bind(int4("capacity", details.capacity)?)
        .bind(details.amenities.iter().cloned().collect::<Vec<String>>())
        .bind(&details.images)
        .bind(property.is_active)
        .bind(feature_start)
        .bind(feature_end)
        .bind(property.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("update property"))?;
        require_row(result, "Property", property.id)
    }

    async fn find_by_id(&self, id: &PropertyId) -> Result<Option<Property>, DomainError> {
        let row: Option<PropertyRow> =
            sqlx::query_as(&format!("SELECT {} FROM properties WHERE id = $1", COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("fetch property"))?;
        row.map(Property::try_from).transpose()
    }

    async fn list_by_partner(&self, partner_id: &PartnerId) -> Result<Vec<Property>, DomainError> {
        let rows: Vec<PropertyRow> = sqlx::query_as(&format!(
            "SELECT {} FROM properties WHERE partner_id = $1 ORDER BY created_at DESC",
            COLUMNS
        ))
        .bind(partner_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list partner properties"))?;
        rows.into_iter().map(Property::try_from).collect()
    }

    async fn list_all(&self) -> Result<Vec<Property>, DomainError> {
        let rows: Vec<PropertyRow> = sqlx::query_as(&format!(
            "SELECT {} FROM properties ORDER BY created_at DESC",
            COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list properties"))?;
        rows.into_iter().map(Property::try_from).collect()
    }
}

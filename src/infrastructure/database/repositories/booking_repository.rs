//! SeaORM implementation of BookingRepository

use async_trait::async_trait;
use log::{debug, warn};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};

use super::{read_err, write_err};
use crate::domain::booking::{
    Booking, BookingDraft, BookingFilter, BookingRepository, BookingStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::booking;

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> Booking {
    Booking {
        id: m.id,
        service_id: m.service_id,
        customer_id: m.customer_id,
        provider_id: m.provider_id,
        status: BookingStatus::from_db_str(&m.status),
        created_at: m.created_at,
    }
}

fn insert_err(e: DbErr, draft: &BookingDraft) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            warn!(
                "Active booking already exists for service {} / customer {}",
                draft.service_id, draft.customer_id
            );
            DomainError::AlreadyBooked {
                service_id: draft.service_id.clone(),
                customer_id: draft.customer_id.clone(),
            }
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            DomainError::InsertFailed(format!("Unknown service {}", draft.service_id))
        }
        _ => write_err(e),
    }
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn find(&self, filter: &BookingFilter) -> DomainResult<Vec<Booking>> {
        let mut query = booking::Entity::find();

        if let Some(service_id) = &filter.service_id {
            query = query.filter(booking::Column::ServiceId.eq(service_id.as_str()));
        }
        if let Some(customer_id) = &filter.customer_id {
            query = query.filter(booking::Column::CustomerId.eq(customer_id.as_str()));
        }
        if !filter.status_in.is_empty() {
            query = query.filter(
                booking::Column::Status.is_in(filter.status_in.iter().map(|s| s.as_str())),
            );
        }

        let models = query
            .order_by_asc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(read_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn insert(&self, draft: BookingDraft) -> DomainResult<Booking> {
        let id = uuid::Uuid::new_v4().to_string();
        debug!(
            "Inserting booking {} for service {} / customer {}",
            id, draft.service_id, draft.customer_id
        );

        let model = booking::ActiveModel {
            id: Set(id.clone()),
            service_id: Set(draft.service_id.clone()),
            customer_id: Set(draft.customer_id.clone()),
            provider_id: Set(draft.provider_id.clone()),
            status: Set(draft.status.as_str().to_string()),
            created_at: Set(draft.created_at),
        };

        booking::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| insert_err(e, &draft))?;

        Ok(draft.into_booking(id))
    }
}

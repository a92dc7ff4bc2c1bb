//! SeaORM implementation of ServiceRepository

use std::str::FromStr;

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::{read_err, write_err};
use crate::domain::service::{category_key, Service, ServiceFilter, ServiceRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::service;

pub struct SeaOrmServiceRepository {
    db: DatabaseConnection,
}

impl SeaOrmServiceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: service::Model) -> DomainResult<Service> {
    let price = Decimal::from_str(&m.price).map_err(|e| {
        DomainError::FetchFailed(format!("Corrupt price {:?} on service {}: {}", m.price, m.id, e))
    })?;

    Ok(Service {
        id: m.id,
        title: m.title,
        description: m.description,
        price,
        category: m.category,
        city: m.city,
        provider_id: m.provider_id,
        is_active: m.is_active,
        created_at: m.created_at,
    })
}

fn domain_to_active(s: Service) -> service::ActiveModel {
    let key = s.category_key();
    service::ActiveModel {
        id: Set(s.id),
        title: Set(s.title),
        description: Set(s.description),
        price: Set(s.price.normalize().to_string()),
        category: Set(s.category),
        category_key: Set(key),
        city: Set(s.city),
        provider_id: Set(s.provider_id),
        is_active: Set(s.is_active),
        created_at: Set(s.created_at),
    }
}

// ── ServiceRepository impl ──────────────────────────────────────

#[async_trait]
impl ServiceRepository for SeaOrmServiceRepository {
    async fn find_active(&self, filter: &ServiceFilter) -> DomainResult<Vec<Service>> {
        let mut query = service::Entity::find().filter(service::Column::IsActive.eq(true));

        if let Some(category) = &filter.category {
            query = query.filter(service::Column::CategoryKey.eq(category_key(category)));
        }
        if let Some(city) = &filter.city {
            query = query.filter(service::Column::City.eq(city.as_str()));
        }

        let models = query
            .order_by_asc(service::Column::CreatedAt)
            .order_by_asc(service::Column::Id)
            .all(&self.db)
            .await
            .map_err(read_err)?;

        debug!("Fetched {} active services for {:?}", models.len(), filter);
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Service>> {
        let model = service::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(read_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn save(&self, s: Service) -> DomainResult<()> {
        s.validate()?;
        debug!("Saving service: {}", s.id);

        service::Entity::insert(domain_to_active(s))
            .on_conflict(
                OnConflict::column(service::Column::Id)
                    .update_columns([
                        service::Column::Title,
                        service::Column::Description,
                        service::Column::Price,
                        service::Column::Category,
                        service::Column::CategoryKey,
                        service::Column::City,
                        service::Column::ProviderId,
                        service::Column::IsActive,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(write_err)?;
        Ok(())
    }
}

//! SeaORM implementation of ProviderRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::{read_err, write_err};
use crate::domain::provider::{Provider, ProviderRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::provider;

pub struct SeaOrmProviderRepository {
    db: DatabaseConnection,
}

impl SeaOrmProviderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: provider::Model) -> Provider {
    Provider {
        id: m.id,
        display_name: m.display_name,
    }
}

#[async_trait]
impl ProviderRepository for SeaOrmProviderRepository {
    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Provider>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = provider::Entity::find()
            .filter(provider::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(read_err)?;

        debug!("Resolved {} of {} providers", models.len(), ids.len());
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn save(&self, p: Provider) -> DomainResult<()> {
        debug!("Saving provider: {}", p.id);

        let model = provider::ActiveModel {
            id: Set(p.id),
            display_name: Set(p.display_name),
        };
        provider::Entity::insert(model)
            .on_conflict(
                OnConflict::column(provider::Column::Id)
                    .update_column(provider::Column::DisplayName)
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(write_err)?;
        Ok(())
    }
}

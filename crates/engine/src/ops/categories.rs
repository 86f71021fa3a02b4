use api_types::category::{CategoryNew, CategoryUpdate};
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{Category, ResultEngine, categories, generate_id, validation};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    pub async fn categories(&self) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find().all(&self.database).await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    pub async fn category(&self, category_id: &str) -> ResultEngine<Option<Category>> {
        let model = categories::Entity::find_by_id(category_id.to_string())
            .one(&self.database)
            .await?;
        Ok(model.map(Category::from))
    }

    pub async fn create_category(&self, input: CategoryNew) -> ResultEngine<Category> {
        validation::category_insert(&input)?;

        let category = Category {
            id: input.id.unwrap_or_else(generate_id),
            name: normalize_required_name(input.name.as_deref().unwrap_or_default()),
            description: normalize_optional_text(input.description.as_deref()),
        };
        let model = categories::ActiveModel::from(&category)
            .insert(&self.database)
            .await?;
        Ok(Category::from(model))
    }

    pub async fn update_category(
        &self,
        category_id: &str,
        patch: CategoryUpdate,
    ) -> ResultEngine<Category> {
        validation::category_update(&patch)?;

        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, category_id).await?;
            let mut active: categories::ActiveModel = model.clone().into();
            if let Some(name) = patch.name.as_deref() {
                active.name = ActiveValue::Set(normalize_required_name(name));
            }
            if let Some(description) = &patch.description {
                active.description = ActiveValue::Set(normalize_optional_text(description.as_deref()));
            }

            if !active.is_changed() {
                Ok(Category::from(model))
            } else {
                let updated = active.update(&db_tx).await?;
                Ok(Category::from(updated))
            }
        })
    }

    /// Delete a category and untag every expense that carried it.
    pub async fn delete_category(&self, category_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, category_id).await?;
            categories::Entity::delete_by_id(category_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}

//! Cookbook (recipe) wire types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// One recipe as returned by `GET /cookbook/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDto {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub ingredients: Option<Vec<RecipeIngredientDto>>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// One ingredient line inside a recipe, referencing an inventory SKU.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientDto {
    pub sku: String,
    pub qty: f64,
}

/// Body of `PUT /cookbook/{id}`. Only present fields are changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_parses_with_ingredients() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000002",
            "name": "Margherita",
            "category": "pizza",
            "price": 11.5,
            "ingredients": [{"sku": "TOM-001", "qty": 0.2}, {"sku": "MOZ-001", "qty": 0.15}]
        }"#;
        let recipe: RecipeDto = serde_json::from_str(json).expect("deserialize");
        assert_eq!(recipe.ingredients.as_ref().map(Vec::len), Some(2));
        assert!(recipe.active.is_none());
    }

    #[test]
    fn update_request_serializes_only_present_fields() {
        let req = UpdateRecipeRequest {
            price: Some(12.0),
            ..Default::default()
        };
        let json = serde_json::to_string(&req).expect("serialize");
        assert_eq!(json, r#"{"price":12.0}"#);
    }
}

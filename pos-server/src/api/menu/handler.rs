//! Menu Catalog Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::MenuItem;
use validator::Validate;

use crate::core::ServerState;
use crate::utils::validation::{MAX_QUERY_LEN_U64, validate};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize, Validate)]
pub struct MenuQuery {
    #[validate(length(max = MAX_QUERY_LEN_U64))]
    pub q: Option<String>,
    #[validate(length(max = MAX_QUERY_LEN_U64))]
    pub category: Option<String>,
}

/// GET /api/menu?q=&category=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    validate(&query)?;
    let items = state
        .catalog
        .search(query.q.as_deref(), query.category.as_deref())
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(items))
}

/// GET /api/menu/categories
pub async fn categories(State(state): State<ServerState>) -> AppResult<Json<Vec<String>>> {
    let categories = state
        .catalog
        .categories()
        .into_iter()
        .map(str::to_string)
        .collect();
    Ok(Json(categories))
}

/// GET /api/menu/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    state.catalog.get(id).cloned().map(Json).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::MenuItemNotFound,
            format!("Menu item {} not found", id),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::MAX_QUERY_LEN;

    #[test]
    fn test_menu_query_bounds() {
        let query = MenuQuery {
            q: Some("naan".into()),
            category: None,
        };
        assert!(query.validate().is_ok());

        let query = MenuQuery {
            q: None,
            category: Some("b".repeat(MAX_QUERY_LEN + 1)),
        };
        assert!(validate(&query).is_err());
    }
}

use tracing::{error, info};
use uuid::Uuid;

use super::dto::SearchPage;
use super::lookup::{FoodItem, LookupError};
use super::repo;
use crate::state::AppState;

pub const PAGE_SIZE: usize = 6;

/// Slice out `page` (1-based). Missing or zero pages read as the first,
/// pages past the end as the last. There is always at least one page.
pub fn paginate<T: Clone>(items: &[T], page: Option<u32>, per_page: usize) -> (Vec<T>, u32, u32) {
    let num_pages = items.len().div_ceil(per_page).max(1) as u32;
    let page = page.unwrap_or(1).clamp(1, num_pages);
    let start = (page as usize - 1) * per_page;
    let end = (start + per_page).min(items.len());
    (items[start.min(end)..end].to_vec(), page, num_pages)
}

/// Searches the external catalogue and caches every hit in the local one.
/// An unreachable catalogue yields an empty page.
pub async fn search(st: &AppState, query: &str, page: Option<u32>) -> anyhow::Result<SearchPage> {
    let query = query.trim();
    let foods = if query.is_empty() {
        Vec::new()
    } else {
        match st.foods.search_foods(query).await {
            Ok(foods) => foods,
            Err(e) => {
                error!(error = %e, query, "food search failed");
                Vec::new()
            }
        }
    };

    for food in &foods {
        repo::insert_if_absent(&st.db, food).await?;
    }

    let (items, page, num_pages) = paginate(&foods, page, PAGE_SIZE);
    Ok(SearchPage {
        query: query.to_string(),
        page,
        num_pages,
        total: foods.len(),
        items,
    })
}

/// Catalog id and content for an external id, fetching and caching it on a
/// miss. `None` when neither catalogue knows the food.
pub async fn resolve(st: &AppState, fdc_id: i64) -> anyhow::Result<Option<(Uuid, FoodItem)>> {
    if let Some(row) = repo::find_by_fdc_id(&st.db, fdc_id).await? {
        return Ok(Some((row.id, row.into())));
    }

    let food = match st.foods.lookup_food_by_external_id(fdc_id).await {
        Ok(food) => food,
        Err(LookupError::NotFound(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    repo::insert_if_absent(&st.db, &food).await?;
    info!(fdc_id, name = %food.name, "food added to catalog");

    Ok(repo::find_by_fdc_id(&st.db, fdc_id)
        .await?
        .map(|row| (row.id, row.into())))
}

#[cfg(test)]
mod services_tests {
    use super::*;

    #[test]
    fn first_page_by_default() {
        let items: Vec<u32> = (1..=14).collect();
        let (page, n, total) = paginate(&items, None, 6);
        assert_eq!(page, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(n, 1);
        assert_eq!(total, 3);
    }

    #[test]
    fn last_page_is_partial_and_overflow_clamps() {
        let items: Vec<u32> = (1..=14).collect();
        assert_eq!(paginate(&items, Some(3), 6).0, vec![13, 14]);
        let (page, n, _) = paginate(&items, Some(99), 6);
        assert_eq!(page, vec![13, 14]);
        assert_eq!(n, 3);
        assert_eq!(paginate(&items, Some(0), 6).1, 1);
    }

    #[test]
    fn empty_results_have_one_empty_page() {
        let (page, n, total) = paginate::<u32>(&[], Some(4), 6);
        assert!(page.is_empty());
        assert_eq!((n, total), (1, 1));
    }

    #[tokio::test]
    async fn blank_query_skips_lookup() {
        let state = AppState::fake();
        let page = search(&state, "   ", None).await.unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.num_pages, 1);
    }
}

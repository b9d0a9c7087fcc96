use std::time::Duration;

use gallery::error::AppError;
use gallery::models::catalog::{CatalogQuery, CatalogSort};

use crate::common::{PNG_BYTES, TestApp};

fn page(page: u64, viewer: Option<&str>) -> CatalogQuery {
    CatalogQuery {
        page,
        page_size: None,
        sort: CatalogSort::Popularity,
        viewer_email: viewer.map(str::to_string),
    }
}

mod pagination {
    use super::*;

    #[tokio::test]
    async fn last_page_is_partial() {
        let app = TestApp::spawn().await;
        app.seed_assets(23).await;

        let first = app.state.catalog.list(&page(0, None)).await.unwrap();
        assert_eq!(first.items.len(), 8);
        assert_eq!(first.pagination.total, 23);
        assert_eq!(first.pagination.total_pages, 3);
        assert!(first.pagination.has_next);
        assert!(!first.pagination.has_previous);

        let last = app.state.catalog.list(&page(2, None)).await.unwrap();
        assert_eq!(last.items.len(), 7);
        assert_eq!(last.pagination.total_pages, 3);
        assert!(!last.pagination.has_next);
        assert!(last.pagination.has_previous);

        let numbers: Vec<u64> = last.page_window.iter().map(|l| l.display_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(last.page_window[2].is_current);
    }

    #[tokio::test]
    async fn pages_do_not_overlap() {
        let app = TestApp::spawn().await;
        app.seed_assets(23).await;

        let mut seen = Vec::new();
        for index in 0..3 {
            let listing = app.state.catalog.list(&page(index, None)).await.unwrap();
            seen.extend(listing.items.into_iter().map(|i| i.blob_key));
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 23);
    }

    #[tokio::test]
    async fn beyond_last_page_is_empty() {
        let app = TestApp::spawn().await;
        app.seed_assets(3).await;

        let listing = app.state.catalog.list(&page(5, None)).await.unwrap();
        assert!(listing.items.is_empty());
        assert_eq!(listing.pagination.total_pages, 1);
        assert!(!listing.pagination.has_next);
    }

    #[tokio::test]
    async fn largest_page_index_is_empty() {
        let app = TestApp::spawn().await;
        app.seed_assets(3).await;

        let query = CatalogQuery {
            page_size: Some(1),
            ..page(u64::MAX, None)
        };
        let listing = app.state.catalog.list(&query).await.unwrap();
        assert!(listing.items.is_empty());
        assert_eq!(listing.pagination.total_pages, 3);
        assert!(!listing.pagination.has_next);

        let numbers: Vec<u64> = listing.page_window.iter().map(|l| l.display_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn zero_page_size_is_rejected() {
        let app = TestApp::spawn().await;
        let query = CatalogQuery {
            page_size: Some(0),
            ..page(0, None)
        };
        let err = app.state.catalog.list(&query).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

mod ordering {
    use super::*;

    #[tokio::test]
    async fn most_favorited_first_ties_by_creation() {
        let app = TestApp::spawn().await;
        let keys = app.seed_assets(4).await;
        app.seed_viewer("a@example.com").await;
        app.seed_viewer("b@example.com").await;

        let favorites = &app.state.favorites;
        favorites.toggle(&keys[2], "a@example.com").await.unwrap();
        favorites.toggle(&keys[2], "b@example.com").await.unwrap();
        favorites.toggle(&keys[3], "a@example.com").await.unwrap();

        let listing = app.state.catalog.list(&page(0, None)).await.unwrap();
        let order: Vec<&str> = listing.items.iter().map(|i| i.blob_key.as_str()).collect();
        assert_eq!(
            order,
            vec![keys[2].as_str(), keys[3].as_str(), keys[0].as_str(), keys[1].as_str()]
        );

        let counts: Vec<u64> = listing.items.iter().map(|i| i.favorite_count).collect();
        assert_eq!(counts, vec![2, 1, 0, 0]);
    }

    #[tokio::test]
    async fn newest_sort_reverses_creation_order() {
        let app = TestApp::spawn().await;
        let keys = app.seed_assets(3).await;

        let query = CatalogQuery {
            sort: CatalogSort::Newest,
            ..page(0, None)
        };
        let listing = app.state.catalog.list(&query).await.unwrap();
        let order: Vec<&str> = listing.items.iter().map(|i| i.blob_key.as_str()).collect();
        assert_eq!(order, vec![keys[2].as_str(), keys[1].as_str(), keys[0].as_str()]);
    }
}

mod viewer_annotation {
    use super::*;

    #[tokio::test]
    async fn is_favorited_matches_favorite_rows() {
        let app = TestApp::spawn().await;
        let keys = app.seed_assets(3).await;
        app.seed_viewer("fan@example.com").await;
        app.seed_viewer("other@example.com").await;
        app.state
            .favorites
            .toggle(&keys[1], "fan@example.com")
            .await
            .unwrap();

        let listing = app
            .state
            .catalog
            .list(&page(0, Some("fan@example.com")))
            .await
            .unwrap();
        for item in &listing.items {
            assert_eq!(item.is_favorited, item.blob_key == keys[1], "{}", item.blob_key);
        }

        let other = app
            .state
            .catalog
            .list(&page(0, Some("other@example.com")))
            .await
            .unwrap();
        assert!(other.items.iter().all(|i| !i.is_favorited));
    }

    #[tokio::test]
    async fn absent_or_unknown_viewer_sees_nothing_favorited() {
        let app = TestApp::spawn().await;
        let keys = app.seed_assets(2).await;
        app.seed_viewer("fan@example.com").await;
        app.state
            .favorites
            .toggle(&keys[0], "fan@example.com")
            .await
            .unwrap();

        for viewer in [None, Some(""), Some("nobody@example.com")] {
            let listing = app.state.catalog.list(&page(0, viewer)).await.unwrap();
            assert_eq!(listing.items.len(), 2);
            assert!(listing.items.iter().all(|i| !i.is_favorited), "{viewer:?}");
        }
    }
}

mod display {
    use super::*;

    #[tokio::test]
    async fn unsigned_store_falls_back_to_download_path() {
        let app = TestApp::spawn().await;
        let key = app.seed_asset("sunrise").await;

        let listing = app.state.catalog.list(&page(0, None)).await.unwrap();
        let item = &listing.items[0];
        assert_eq!(item.fallback_path, format!("/download/{key}"));
        assert_eq!(item.display_url, item.fallback_path);
        assert_eq!(item.prompt, "sunrise");

        let url = app.state.catalog.display_url(&key).await.unwrap();
        assert_eq!(url, format!("/download/{key}"));
    }
}

mod favorites_listing {
    use super::*;

    #[tokio::test]
    async fn lists_only_the_viewers_favorites() {
        let app = TestApp::spawn().await;
        let keys = app.seed_assets(3).await;
        app.seed_viewer("fan@example.com").await;
        app.seed_viewer("other@example.com").await;

        let favorites = &app.state.favorites;
        favorites.toggle(&keys[0], "fan@example.com").await.unwrap();
        favorites.toggle(&keys[2], "fan@example.com").await.unwrap();
        favorites.toggle(&keys[1], "other@example.com").await.unwrap();

        let items = app.state.catalog.favorites("fan@example.com").await.unwrap();
        let listed: Vec<&str> = items.iter().map(|i| i.blob_key.as_str()).collect();
        assert_eq!(listed, vec![keys[2].as_str(), keys[0].as_str()]);
        assert!(items.iter().all(|i| i.is_favorited));
    }

    #[tokio::test]
    async fn most_recently_favorited_first() {
        let app = TestApp::spawn().await;
        let keys = app.seed_assets(3).await;
        app.seed_viewer("fan@example.com").await;

        // Neither ascending nor descending by asset id.
        let favorites = &app.state.favorites;
        for index in [2, 0, 1] {
            favorites.toggle(&keys[index], "fan@example.com").await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let items = app.state.catalog.favorites("fan@example.com").await.unwrap();
        let listed: Vec<&str> = items.iter().map(|i| i.blob_key.as_str()).collect();
        assert_eq!(
            listed,
            vec![keys[1].as_str(), keys[0].as_str(), keys[2].as_str()]
        );

        // Re-favoriting moves an asset back to the front.
        favorites.toggle(&keys[2], "fan@example.com").await.unwrap();
        favorites.toggle(&keys[2], "fan@example.com").await.unwrap();

        let items = app.state.catalog.favorites("fan@example.com").await.unwrap();
        let listed: Vec<&str> = items.iter().map(|i| i.blob_key.as_str()).collect();
        assert_eq!(
            listed,
            vec![keys[2].as_str(), keys[1].as_str(), keys[0].as_str()]
        );
    }

    #[tokio::test]
    async fn unknown_viewer_has_no_favorites() {
        let app = TestApp::spawn().await;
        app.seed_assets(1).await;

        assert!(app.state.catalog.favorites("ghost@example.com").await.unwrap().is_empty());
        assert!(app.state.catalog.favorites("").await.unwrap().is_empty());
    }
}

mod download {
    use super::*;

    #[tokio::test]
    async fn returns_stored_bytes() {
        let app = TestApp::spawn().await;
        let key = app.seed_asset("sunrise").await;

        let download = app.state.catalog.download(&key).await.unwrap();
        assert_eq!(download.bytes, PNG_BYTES);
        assert_eq!(download.content_type, "image/png");
    }

    #[tokio::test]
    async fn missing_blob_is_not_found() {
        let app = TestApp::spawn().await;
        let err = app
            .state
            .catalog
            .download("0000_generated_image.png")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

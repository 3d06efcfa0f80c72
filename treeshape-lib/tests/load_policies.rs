//! End-to-end runs of each load policy against an in-memory service.

mod common;

use std::sync::atomic::Ordering;

use common::{RecordingService, ids, init_logger, org_chart};
use tokio_util::sync::CancellationToken;
use treeshape_lib::engine::{EngineConfig, TreeEngine};
use treeshape_lib::hooks::QueryHooks;
use treeshape_lib::model::{LoadMode, LoadOperation, Node, Page, QueryParameter};

fn engine(service: &std::sync::Arc<RecordingService>, config: EngineConfig) -> TreeEngine {
    TreeEngine::builder()
        .shared_service(service.clone())
        .config(config)
        .build()
        .expect("valid config")
}

// =============================================================================
// Sync
// =============================================================================

mod sync_mode {
    use super::*;

    #[tokio::test]
    async fn test_whole_tree_nested() {
        init_logger();
        let service = RecordingService::new(org_chart());
        let engine = engine(&service, EngineConfig::default());

        let tree = engine
            .tree(&mut QueryParameter::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(ids(&tree.roots), ["1", "4"]);
        assert_eq!(ids(&tree.roots[0].children), ["3", "2"]);
        assert_eq!(tree.total, 9);
        // 6 is hidden
        assert_eq!(tree.count(), 8);
        assert!(tree.find("6").is_none());

        assert_eq!(tree.find("1").unwrap().leaf, Some(false));
        assert_eq!(tree.find("3").unwrap().leaf, Some(true));
        assert_eq!(tree.find("9").unwrap().leaf, Some(true));
        assert!(tree.find("1").unwrap().expanded.is_none());

        let query = service.last_query().unwrap();
        assert_eq!(query.page, Some(1));
        assert_eq!(query.page_size, Some(10_000));
        assert_eq!(service.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(service.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_visible_child_keeps_parent_open() {
        init_logger();
        let service = RecordingService::new(vec![
            Node::new("1").with_parent("").with_level(1).with_sort_id(1),
            Node::new("2").with_parent("1").with_level(2).with_sort_id(1),
            Node::new("3").with_parent("1").with_level(2).with_sort_id(2).hidden(true),
        ]);
        let engine = engine(&service, EngineConfig::default());

        let tree = engine
            .tree(&mut QueryParameter::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(ids(&tree.roots), ["1"]);
        assert_eq!(tree.roots[0].leaf, Some(false));
        assert_eq!(ids(&tree.roots[0].children), ["2"]);
        assert_eq!(tree.roots[0].children[0].leaf, Some(true));
    }

    #[tokio::test]
    async fn test_expand_all_opens_everything() {
        init_logger();
        let service = RecordingService::new(org_chart());
        let engine = engine(&service, EngineConfig::default().expand_all(true));

        let table = engine
            .table(&mut QueryParameter::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(table.rows.iter().all(Node::is_expanded));
    }

    #[tokio::test]
    async fn test_flat_rows_in_tree_order() {
        init_logger();
        let service = RecordingService::new(org_chart());
        let engine = engine(&service, EngineConfig::default());

        let table = engine
            .table(&mut QueryParameter::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(ids(&table.rows), ["1", "3", "2", "5", "4", "7", "8", "9"]);
        assert_eq!(table.find("8").and_then(|r| r.parent_id.as_deref()), Some("7"));
    }

    #[tokio::test]
    async fn test_concurrent_runs_share_engine() {
        init_logger();
        let service = RecordingService::new(org_chart());
        let engine = engine(&service, EngineConfig::default());
        let other = engine.clone();
        let cancel = CancellationToken::new();

        let mut first_query = QueryParameter::new();
        let mut second_query = QueryParameter::new();
        let (first, second) = tokio::join!(
            engine.tree(&mut first_query, &cancel),
            other.table(&mut second_query, &cancel),
        );

        assert_eq!(first.unwrap().count(), 8);
        assert_eq!(second.unwrap().rows.len(), 8);
        assert_eq!(service.fetches.load(Ordering::SeqCst), 2);
    }

    struct DeepestOnly;

    impl QueryHooks for DeepestOnly {
        fn before_query(&self, query: &mut QueryParameter) {
            query.level = Some(3);
        }
    }

    #[tokio::test]
    async fn test_backfill_restores_truncated_chains() {
        init_logger();
        let service = RecordingService::new(org_chart());
        let engine = TreeEngine::builder()
            .shared_service(service.clone())
            .hooks(DeepestOnly)
            .build()
            .unwrap();

        let tree = engine
            .tree(&mut QueryParameter::new(), &CancellationToken::new())
            .await
            .unwrap();

        // Level 3 holds 5, 6 and 8; their ancestors come from one batch lookup.
        assert_eq!(service.lookups.load(Ordering::SeqCst), 1);
        assert_eq!(tree.total, 3);
        assert_eq!(ids(&tree.roots), ["1", "4"]);
        assert_eq!(tree.find("7").map(|n| ids(&n.children)), Some(vec!["8"]));
        assert!(tree.find("9").is_none());
    }

    #[tokio::test]
    async fn test_pathless_chain_is_backfilled_level_by_level() {
        init_logger();
        let service = RecordingService::new(vec![
            Node::new("1").with_level(1).with_sort_id(1),
            Node::new("2").with_parent("1").with_level(2).with_sort_id(1),
            Node::new("3").with_parent("2").with_level(3).with_sort_id(1),
        ]);
        let engine = TreeEngine::builder()
            .shared_service(service.clone())
            .hooks(DeepestOnly)
            .build()
            .unwrap();

        let tree = engine
            .tree(&mut QueryParameter::new(), &CancellationToken::new())
            .await
            .unwrap();

        // Without paths each lookup only reaches one level further up.
        assert_eq!(service.lookups.load(Ordering::SeqCst), 2);
        assert_eq!(ids(&tree.roots), ["1"]);
        assert_eq!(tree.find("2").map(|n| ids(&n.children)), Some(vec!["3"]));
        assert_eq!(tree.count(), 3);
    }
}

// =============================================================================
// Async
// =============================================================================

mod async_mode {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default().with_load_mode(LoadMode::Async)
    }

    #[tokio::test]
    async fn test_query_fetches_top_level_only() {
        init_logger();
        let service = RecordingService::new(org_chart());
        let engine = engine(&service, config());

        let tree = engine
            .tree(&mut QueryParameter::new().with_page(1, 50), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(ids(&tree.roots), ["1", "4"]);
        assert!(tree.roots.iter().all(|n| n.children.is_empty()));
        assert!(tree.roots.iter().all(|n| n.leaf == Some(false)));
        assert_eq!(tree.total, 2);

        let query = service.last_query().unwrap();
        assert_eq!(query.level, Some(1));
        assert_eq!(query.page_size, Some(50));
    }

    #[tokio::test]
    async fn test_first_load_opens_path_to_selection() {
        init_logger();
        let service = RecordingService::new(org_chart());
        let engine = engine(&service, config().first_load(true).with_preselected_keys(["9"]));

        let tree = engine
            .tree(&mut QueryParameter::new(), &CancellationToken::new())
            .await
            .unwrap();

        for id in ["4", "7", "8"] {
            assert_eq!(tree.find(id).unwrap().expanded, Some(true), "{id} should be open");
        }
        assert!(tree.find("1").unwrap().expanded.is_none());
        assert!(tree.find("9").unwrap().expanded.is_none());
        assert_eq!(tree.find("8").map(|n| ids(&n.children)), Some(vec!["9"]));
        assert_eq!(service.child_lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_preselection_ignored_after_first_load() {
        init_logger();
        let service = RecordingService::new(org_chart());
        let engine = engine(&service, config().with_preselected_keys(["9"]));

        let tree = engine
            .tree(&mut QueryParameter::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(tree.count(), 2);
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_load_children_returns_one_level() {
        init_logger();
        let service = RecordingService::new(org_chart());
        let engine = engine(
            &service,
            config()
                .with_operation(LoadOperation::LoadChildren)
                .with_max_page_size(200)
                .expand_all(true),
        );

        let mut query = QueryParameter::children_of("1").with_page(4, 10);
        let tree = engine.tree(&mut query, &CancellationToken::new()).await.unwrap();

        assert_eq!(ids(&tree.roots), ["3", "2"]);
        assert!(tree.roots.iter().all(|n| n.leaf == Some(false)));
        // single level: nothing to open
        assert!(tree.roots.iter().all(|n| n.expanded.is_none()));

        assert_eq!(query.parent_key(), Some("1"));
        assert_eq!((query.page, query.page_size), (Some(1), Some(200)));
        assert_eq!(service.lookups.load(Ordering::SeqCst), 0);
    }
}

// =============================================================================
// RootAsync
// =============================================================================

mod root_async_mode {
    use super::*;
    use treeshape_lib::error::{DataError, Error};

    fn config() -> EngineConfig {
        EngineConfig::default().with_load_mode(LoadMode::RootAsync)
    }

    #[tokio::test]
    async fn test_query_behaves_like_async_root() {
        init_logger();
        let service = RecordingService::new(org_chart());
        let engine = engine(&service, config().expand_for_root_async_root(true));

        let tree = engine
            .tree(&mut QueryParameter::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(ids(&tree.roots), ["1", "4"]);
        assert!(tree.roots.iter().all(|n| n.is_expanded() && !n.is_leaf()));
    }

    #[tokio::test]
    async fn test_load_children_fetches_subtree_without_clicked_node() {
        init_logger();
        let service = RecordingService::new(org_chart());
        let engine = engine(&service, config().with_operation(LoadOperation::LoadChildren));

        let mut query = QueryParameter::children_of("4");
        let page: Page = engine.fetch(&mut query, &CancellationToken::new()).await.unwrap();

        assert_eq!(page.total(), 3);
        assert!(!page.contains("4"));
        assert_eq!(ids(page.nodes()), ["7", "8", "9"]);

        assert_eq!(query.path.as_deref(), Some("/4/"));
        assert_eq!(query.parent_id, None);
        assert_eq!(query.level, None);
        assert_eq!(service.lookups.load(Ordering::SeqCst), 1);
        assert_eq!(service.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_subtree_leaves_and_expansion() {
        init_logger();
        let service = RecordingService::new(org_chart());
        let engine = engine(
            &service,
            config().with_operation(LoadOperation::LoadChildren).expand_all(true),
        );

        let tree = engine
            .tree(&mut QueryParameter::children_of("4"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(ids(&tree.roots), ["7"]);
        assert_eq!(tree.find("7").unwrap().expanded, Some(true));
        assert_eq!(tree.find("8").unwrap().expanded, Some(true));
        assert_eq!(tree.find("9").unwrap().leaf, Some(true));
        assert!(tree.find("9").unwrap().expanded.is_none());
    }

    #[tokio::test]
    async fn test_unknown_clicked_node() {
        init_logger();
        let service = RecordingService::new(org_chart());
        let engine = engine(&service, config().with_operation(LoadOperation::LoadChildren));

        let err = engine
            .tree(&mut QueryParameter::children_of("42"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Data(DataError::NodeNotFound { ref id }) if id == "42"));
        assert_eq!(service.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_clicked_node_without_path() {
        init_logger();
        let service = RecordingService::new(vec![Node::new("1").with_level(1)]);
        let engine = engine(&service, config().with_operation(LoadOperation::LoadChildren));

        let err = engine
            .tree(&mut QueryParameter::children_of("1"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Data(DataError::MissingPath { .. })));
    }
}

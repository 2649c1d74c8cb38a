//! End-to-end crawl tests against a deterministic in-memory site

use crate::support::{
    doc, page, test_config, two_level_site, SiteRenderer, UnwritableStore, ROOT,
};
use doc_ripple::crawler::Coordinator;
use doc_ripple::output::{ContentConverter, RawConverter};
use doc_ripple::state::PageState;
use doc_ripple::HarvestError;
use doc_ripple::storage::MetadataStore;
use std::collections::BTreeSet;
use std::sync::atomic::Ordering;
use tempfile::TempDir;

#[tokio::test]
async fn test_start_with_two_children() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), 10, 1);
    let metadata_path = config.output.metadata_path();

    let renderer = SiteRenderer::new(vec![
        (doc(""), page("A", &[doc("b"), doc("c")])),
        (doc("b"), page("B", &[doc("b/deeper")])),
        (doc("c"), page("C", &[doc("c/deeper")])),
    ]);

    let mut coordinator = Coordinator::builder(config)
        .renderer(renderer.clone())
        .build()
        .unwrap();
    let stats = coordinator.run().await;

    assert_eq!(stats.total_pages, 3);
    assert_eq!(stats.new_pages, 3);
    assert_eq!(stats.errors, 0);
    assert_eq!(coordinator.frontier().pending_len(), 0);

    let (visited, _) = coordinator.frontier().snapshot();
    let expected: BTreeSet<String> = [doc(""), doc("b"), doc("c")].into_iter().collect();
    assert_eq!(visited, expected);

    let persisted = MetadataStore::open(&metadata_path);
    assert!(persisted.checkpoint().is_none());
    assert_eq!(persisted.stats().total_pages, 3);
    assert!(persisted.stats().finished_at.is_some());
    assert!(persisted.last_crawl_at().is_some());
}

#[tokio::test]
async fn test_depth_bound_excludes_grandchildren() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), 100, 1);

    let renderer = SiteRenderer::new(vec![
        (
            doc(""),
            page(
                "Root",
                &[
                    doc("one"),
                    doc("two"),
                    doc("three"),
                    doc("two/#anchor"),
                    "https://elsewhere.example.org/page".to_string(),
                ],
            ),
        ),
        (doc("one"), page("One", &[doc("one/child")])),
        (doc("two"), page("Two", &[doc("two/child")])),
        (doc("three"), page("Three", &[doc("three/child")])),
    ]);

    let mut coordinator = Coordinator::builder(config)
        .renderer(renderer.clone())
        .build()
        .unwrap();
    coordinator.run().await;

    assert_eq!(coordinator.frontier().visited_count(), 1 + 3);
    assert!(renderer.calls().iter().all(|url| !url.ends_with("/child")));
    assert_eq!(coordinator.stats().total_pages, 4);
}

#[tokio::test]
async fn test_breadth_first_order() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), 100, 2);
    let renderer = SiteRenderer::new(two_level_site());

    let mut coordinator = Coordinator::builder(config)
        .renderer(renderer.clone())
        .build()
        .unwrap();
    coordinator.run().await;

    assert_eq!(
        renderer.calls(),
        vec![
            doc(""),
            doc("swiftui"),
            doc("uikit"),
            doc("foundation"),
            doc("swiftui/view"),
            doc("swiftui/text"),
            doc("uikit/uiview"),
            doc("foundation/url"),
        ]
    );

    let depths: Vec<u32> = renderer
        .calls()
        .iter()
        .map(|url| coordinator.store().fingerprint(url).unwrap().depth)
        .collect();
    assert!(depths.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_shared_links_render_once() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), 100, 2);
    let renderer = SiteRenderer::new(two_level_site());

    let mut coordinator = Coordinator::builder(config)
        .renderer(renderer.clone())
        .build()
        .unwrap();
    let stats = coordinator.run().await;

    let calls = renderer.calls();
    let unique: BTreeSet<&String> = calls.iter().collect();
    assert_eq!(unique.len(), calls.len());
    assert_eq!(stats.total_pages, calls.len() as u64);
}

#[tokio::test]
async fn test_single_failure_is_isolated() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), 100, 1);
    let children: Vec<String> = ["a", "b", "c", "d"].iter().map(|p| doc(p)).collect();

    let mut pages = vec![(doc(""), page("Root", &children))];
    for child in &children {
        pages.push((child.clone(), page(child, &[])));
    }
    let renderer = SiteRenderer::new(pages).fail_on(&doc("c"));

    let mut coordinator = Coordinator::builder(config)
        .renderer(renderer)
        .build()
        .unwrap();
    let stats = coordinator.run().await;

    assert_eq!(stats.total_pages, 5);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.new_pages, 4);

    let store = coordinator.store();
    assert_eq!(store.fingerprints().len(), 4);
    assert!(store.fingerprint(&doc("c")).is_none());
    for fingerprint in store.fingerprints().values() {
        assert!(fingerprint.storage_path.exists());
    }
}

#[tokio::test]
async fn test_hanging_render_times_out() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path(), 100, 1);
    config.crawler.page_load_timeout = 50;

    let renderer = SiteRenderer::new(vec![
        (doc(""), page("Root", &[doc("slow"), doc("fast")])),
        (doc("fast"), page("Fast", &[])),
    ])
    .hang_on(&doc("slow"));

    let mut coordinator = Coordinator::builder(config)
        .renderer(renderer.clone())
        .build()
        .unwrap();

    assert_eq!(coordinator.step().await, Some(PageState::StatsUpdated));
    assert_eq!(coordinator.step().await, Some(PageState::ErrorRecorded));
    assert_eq!(coordinator.step().await, Some(PageState::StatsUpdated));
    assert_eq!(coordinator.step().await, None);

    assert_eq!(coordinator.stats().errors, 1);
    assert_eq!(coordinator.stats().total_pages, 3);

    tokio::task::yield_now().await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert_eq!(renderer.cancellations(), 1);
}

#[tokio::test]
async fn test_unwritable_store_does_not_stop_crawl() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), 10, 1);
    let store = UnwritableStore::default();

    let renderer = SiteRenderer::new(vec![
        (doc(""), page("A", &[doc("b"), doc("c")])),
        (doc("b"), page("B", &[])),
        (doc("c"), page("C", &[])),
    ]);

    let mut coordinator = Coordinator::builder(config)
        .renderer(renderer)
        .document_store(store.clone())
        .build()
        .unwrap();
    let stats = coordinator.run().await;

    assert_eq!(stats.total_pages, 3);
    assert_eq!(stats.new_pages, 3);
    assert_eq!(stats.errors, 0);
    assert!(store.attempts.load(Ordering::SeqCst) >= 4);
}

#[tokio::test]
async fn test_read_only_metadata_target() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path(), 10, 1);
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    config.output.metadata_path = blocker.join("meta.json").display().to_string();

    let renderer = SiteRenderer::new(vec![
        (doc(""), page("A", &[doc("b")])),
        (doc("b"), page("B", &[])),
    ]);

    let mut coordinator = Coordinator::builder(config)
        .renderer(renderer)
        .build()
        .unwrap();
    let stats = coordinator.run().await;

    assert_eq!(stats.total_pages, 2);
    assert_eq!(stats.errors, 0);
}

#[tokio::test]
async fn test_page_limit_stops_crawl() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), 3, 2);
    let metadata_path = config.output.metadata_path();
    let renderer = SiteRenderer::new(two_level_site());

    let mut coordinator = Coordinator::builder(config)
        .renderer(renderer.clone())
        .build()
        .unwrap();
    let stats = coordinator.run().await;

    assert_eq!(stats.total_pages, 3);
    assert_eq!(renderer.calls().len(), 3);
    assert!(coordinator.frontier().pending_len() > 0);
    assert!(MetadataStore::open(&metadata_path).checkpoint().is_none());
}

#[tokio::test]
async fn test_artifact_layout() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), 100, 2);
    let output_dir = config.output.output_directory();
    let renderer = SiteRenderer::new(two_level_site());

    let mut coordinator = Coordinator::builder(config)
        .renderer(renderer)
        .build()
        .unwrap();
    coordinator.run().await;

    let view = output_dir.join("swiftui").join("view.md");
    let content = std::fs::read_to_string(&view).unwrap();
    assert!(content.starts_with("# View\n"));
    assert!(content.contains(&format!("Source: <{}>", doc("swiftui/view"))));

    assert!(output_dir.join("root").join("index.md").exists());
    assert!(output_dir.join("swiftui").join("index.md").exists());

    let fingerprint = coordinator.store().fingerprint(&doc("swiftui/view")).unwrap();
    assert_eq!(fingerprint.category, "swiftui");
    assert_eq!(fingerprint.storage_path, view);
    assert_eq!(fingerprint.depth, 2);
}

/// Refuses to convert one page
struct RejectingConverter {
    reject: String,
}

impl ContentConverter for RejectingConverter {
    fn to_artifact(&self, raw: &str, url: &str) -> Result<String, HarvestError> {
        if url == self.reject {
            return Err(HarvestError::Conversion {
                url: url.to_string(),
                message: "unsupported markup".to_string(),
            });
        }
        RawConverter.to_artifact(raw, url)
    }
}

#[tokio::test]
async fn test_raw_converter_writes_rendered_text() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), 100, 0);
    let output_dir = config.output.output_directory();
    let root = page("Root", &[]);

    let mut coordinator = Coordinator::builder(config)
        .renderer(SiteRenderer::new(vec![(doc(""), root.clone())]))
        .converter(RawConverter)
        .build()
        .unwrap();
    coordinator.run().await;

    let written = std::fs::read_to_string(output_dir.join("root").join("index.md")).unwrap();
    assert_eq!(written, root);
}

#[tokio::test]
async fn test_conversion_failure_is_isolated() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), 100, 2);

    let mut coordinator = Coordinator::builder(config)
        .renderer(SiteRenderer::new(two_level_site()))
        .converter(RejectingConverter {
            reject: doc("uikit"),
        })
        .build()
        .unwrap();
    let stats = coordinator.run().await;

    assert_eq!(stats.errors, 1);
    assert_eq!(stats.new_pages, 6);
    assert!(coordinator.store().fingerprint(&doc("uikit")).is_none());
    assert!(coordinator.store().fingerprint(&doc("foundation/url")).is_some());
}

#[tokio::test]
async fn test_second_run_skips_unchanged_start() {
    let dir = TempDir::new().unwrap();

    let mut first = Coordinator::builder(test_config(dir.path(), 100, 2))
        .renderer(SiteRenderer::new(two_level_site()))
        .build()
        .unwrap();
    first.run().await;

    let renderer = SiteRenderer::new(two_level_site());
    let mut second = Coordinator::builder(test_config(dir.path(), 100, 2))
        .renderer(renderer.clone())
        .build()
        .unwrap();
    let stats = second.run().await;

    assert_eq!(stats.total_pages, 1);
    assert_eq!(stats.skipped_pages, 1);
    assert_eq!(renderer.calls(), vec![ROOT.to_string()]);
}

#[tokio::test]
async fn test_expand_unchanged_detects_deep_edit() {
    let dir = TempDir::new().unwrap();

    let mut first = Coordinator::builder(test_config(dir.path(), 100, 2))
        .renderer(SiteRenderer::new(two_level_site()))
        .build()
        .unwrap();
    first.run().await;

    let edited: Vec<(String, String)> = two_level_site()
        .into_iter()
        .map(|(url, body)| {
            if url == doc("swiftui/text") {
                (url, page("Text (revised)", &[]))
            } else {
                (url, body)
            }
        })
        .collect();

    let mut config = test_config(dir.path(), 100, 2);
    config.crawler.expand_unchanged = true;
    let mut second = Coordinator::builder(config)
        .renderer(SiteRenderer::new(edited))
        .build()
        .unwrap();
    let stats = second.run().await;

    assert_eq!(stats.total_pages, 8);
    assert_eq!(stats.updated_pages, 1);
    assert_eq!(stats.skipped_pages, 7);
    assert_eq!(stats.new_pages, 0);

    let text = std::fs::read_to_string(
        second
            .store()
            .fingerprint(&doc("swiftui/text"))
            .unwrap()
            .storage_path
            .clone(),
    )
    .unwrap();
    assert!(text.contains("Text (revised)"));
}

#[tokio::test]
async fn test_missing_artifact_is_rewritten() {
    let dir = TempDir::new().unwrap();
    let renderer = SiteRenderer::new(vec![(doc(""), page("Root", &[]))]);

    let mut first = Coordinator::builder(test_config(dir.path(), 10, 0))
        .renderer(renderer.clone())
        .build()
        .unwrap();
    first.run().await;

    let artifact = first.store().fingerprint(ROOT).unwrap().storage_path.clone();
    std::fs::remove_file(&artifact).unwrap();

    let mut second = Coordinator::builder(test_config(dir.path(), 10, 0))
        .renderer(renderer)
        .build()
        .unwrap();
    let stats = second.run().await;

    assert_eq!(stats.updated_pages, 1);
    assert!(artifact.exists());
}

#[tokio::test]
async fn test_force_recrawl_rewrites_everything() {
    let dir = TempDir::new().unwrap();

    let mut first = Coordinator::builder(test_config(dir.path(), 100, 2))
        .renderer(SiteRenderer::new(two_level_site()))
        .build()
        .unwrap();
    first.run().await;

    let mut config = test_config(dir.path(), 100, 2);
    config.crawler.force_recrawl = true;
    let mut second = Coordinator::builder(config)
        .renderer(SiteRenderer::new(two_level_site()))
        .build()
        .unwrap();
    let stats = second.run().await;

    assert_eq!(stats.total_pages, 8);
    assert_eq!(stats.updated_pages, 8);
    assert_eq!(stats.skipped_pages, 0);
}

#[tokio::test]
async fn test_volatile_markup_and_stabilized_hashing() {
    let with_token = |token: &str| {
        vec![(
            doc(""),
            format!(
                r#"<html><head><meta name="session" content="{}"></head><body><p>Stable</p></body></html>"#,
                token
            ),
        )]
    };

    // Raw hashing sees the session token change as a content change.
    let raw_dir = TempDir::new().unwrap();
    for (token, expected_updates) in [("s1", 0), ("s2", 1)] {
        let mut coordinator = Coordinator::builder(test_config(raw_dir.path(), 10, 0))
            .renderer(SiteRenderer::new(with_token(token)))
            .build()
            .unwrap();
        assert_eq!(coordinator.run().await.updated_pages, expected_updates);
    }

    let stable_dir = TempDir::new().unwrap();
    for (token, expected_skips) in [("s1", 0), ("s2", 1)] {
        let mut config = test_config(stable_dir.path(), 10, 0);
        config.hashing.volatile_patterns =
            vec![r#"<meta name="session" content="[^"]*">"#.to_string()];
        let mut coordinator = Coordinator::builder(config)
            .renderer(SiteRenderer::new(with_token(token)))
            .build()
            .unwrap();
        assert_eq!(coordinator.run().await.skipped_pages, expected_skips);
    }
}

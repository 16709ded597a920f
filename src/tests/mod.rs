use std::path::Path;

use crate::{
    ArticleCollection, ErrorDetail,
    config::Config,
    render::{self, Renderer},
    source::{self, AnySource},
};

const SCENARIO: &str = "src/tests/scenario1";

async fn scenario() -> (Config, AnySource) {
    let config = tokio::fs::read_to_string(format!("{SCENARIO}/config.yaml"))
        .await
        .unwrap();
    let config: Config = serde_yaml::from_str(&config).unwrap();
    let source = config.source(Path::new(SCENARIO));
    (config, source)
}

#[tokio::test]
async fn test_local_listing() {
    let (config, source) = scenario().await;
    let source_ids = config.resolve_source_ids(&source).await.unwrap();
    assert_eq!(
        source_ids,
        [
            "docker-containerization-guide.md",
            "getting-started-with-csharp.md",
            "software-architecture-patterns.md",
            "web-performance-optimization.md",
        ]
    );
}

#[tokio::test]
async fn test_load_scenario() {
    let (config, source) = scenario().await;
    let source_ids = config.resolve_source_ids(&source).await.unwrap();
    let (collection, report) =
        ArticleCollection::load_with_report(&source_ids, &source, &config.reading).await;

    let ids = collection
        .articles()
        .iter()
        .map(|article| article.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        ids,
        [
            "docker-containerization-guide",
            "software-architecture-patterns",
            "getting-started-with-csharp",
        ]
    );
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(
        report.dropped[0].context.source_id,
        "web-performance-optimization.md"
    );
    assert!(matches!(
        *report.dropped[0].detail,
        ErrorDetail::ContentSniff(_)
    ));

    let docker = collection.get("docker-containerization-guide").unwrap();
    assert_eq!(docker.title, "Docker Guide: Containers in Practice");
    assert_eq!(docker.tags, ["docker", "containers", "devops"]);
    assert!(docker.excerpt.starts_with("Containers package an application"));
    assert!(docker.excerpt.ends_with("..."));
    assert_eq!(docker.excerpt.chars().count(), 153);
    assert_eq!(docker.read_time, "1 min");

    let csharp = collection.get("getting-started-with-csharp").unwrap();
    assert_eq!(csharp.excerpt, "A gentle first tour of the C# language.");
    assert_eq!(csharp.read_time, "4 min");
}

#[tokio::test]
async fn test_filter_scenario() {
    let (config, source) = scenario().await;
    let source_ids = config.resolve_source_ids(&source).await.unwrap();
    let mut collection = ArticleCollection::load(&source_ids, &source).await;

    collection.set_category_filter("backend");
    collection.set_search_query("docker");
    assert_eq!(collection.filtered_view().len(), 1);
    collection.set_search_query("kubernetes");
    assert!(collection.filtered_view().is_empty());

    let stats = collection.stats();
    assert_eq!((stats.shown, stats.total, stats.category_count), (0, 3, 3));
}

#[tokio::test]
async fn test_probe_discovery() {
    let (config, source) = scenario().await;
    let found = source::discover(&source, &config.probe).await;
    // a probe only checks that the fetch succeeds
    assert_eq!(
        found,
        [
            "getting-started-with-csharp.md",
            "docker-containerization-guide.md",
            "web-performance-optimization.md",
        ]
    );
    let missing = source::discover(&source, &["no-such-article".to_owned()]).await;
    assert!(missing.is_empty());
}

#[tokio::test]
async fn test_render_scenario_article() {
    let (_, source) = scenario().await;
    let collection = ArticleCollection::load(
        &["docker-containerization-guide.md".to_owned()],
        &source,
    )
    .await;
    let article = collection.get("docker-containerization-guide").unwrap();

    let full = render::render_html(&article.content, Renderer::Full);
    assert!(full.contains(r#"<h2 id="building-an-image">"#), "{full}");
    assert!(full.contains(r#"class="language-dockerfile""#), "{full}");
    assert!(full.contains(r#"target="_blank" rel="noopener">the docs</a>"#), "{full}");

    let basic = render::render_html(&article.content, Renderer::Basic);
    assert!(basic.contains("<h2>Building an image</h2>"), "{basic}");
    assert!(basic.contains("<code>docker build</code>"), "{basic}");
}

#[tokio::test]
async fn test_round_trip_loaded_articles() {
    let (config, source) = scenario().await;
    let source_ids = config.resolve_source_ids(&source).await.unwrap();
    let collection = ArticleCollection::load(&source_ids, &source).await;
    for article in collection.articles() {
        let reparsed = crate::parse(&article.to_markdown(), &article.source_id);
        assert_eq!(&reparsed, article);
    }
}

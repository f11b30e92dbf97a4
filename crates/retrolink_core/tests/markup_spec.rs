use retrolink_core::fallback::FallbackTable;
use retrolink_core::markup::{
    audit_routes, FsMarkupSource, MarkupAvailability, MarkupError, MarkupSource,
};
use retrolink_core::RouteId;
use std::fs;

fn write_view(root: &std::path::Path, route: &str, html: &str) {
    let dir = root.join(route);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{}.html", route)), html).unwrap();
}

#[tokio::test]
async fn test_fs_source_reads_route_markup() {
    let root = tempfile::tempdir().unwrap();
    write_view(root.path(), "games", "<h1>Games</h1>");

    let source = FsMarkupSource::new(root.path());
    let route = RouteId::new("games");

    assert_eq!(source.path_for(&route), root.path().join("games/games.html"));
    assert_eq!(source.fetch(&route).await.unwrap(), "<h1>Games</h1>");
}

#[tokio::test]
async fn test_fs_source_missing_view() {
    let root = tempfile::tempdir().unwrap();
    let source = FsMarkupSource::new(root.path());

    let err = source.fetch(&RouteId::new("chat")).await.unwrap_err();
    assert!(matches!(err, MarkupError::NotFound(ref r) if r.as_str() == "chat"));
}

#[tokio::test]
async fn test_fs_source_rejects_paths_outside_root() {
    let root = tempfile::tempdir().unwrap();
    let outside = root.path().join("secret");
    fs::create_dir_all(&outside).unwrap();
    fs::write(outside.join("secret.html"), "nope").unwrap();

    let views = root.path().join("modules");
    fs::create_dir_all(&views).unwrap();
    let source = FsMarkupSource::new(&views);

    assert!(source.fetch(&RouteId::new("../secret")).await.is_err());
    assert!(source.fetch(&RouteId::new("..")).await.is_err());
}

#[tokio::test]
async fn test_audit_reports_fallbacks() {
    let root = tempfile::tempdir().unwrap();
    write_view(root.path(), "home", "<h1>Home</h1>");

    let source = FsMarkupSource::new(root.path());
    let mut fallback = FallbackTable::new(RouteId::new("home"));
    fallback.insert(RouteId::new("games"), "<p>games</p>");
    let routes = [RouteId::new("home"), RouteId::new("games")];

    let report = audit_routes(&source, &fallback, &routes).await;

    assert_eq!(report[0].availability, MarkupAvailability::Fetchable);
    assert_eq!(report[1].availability, MarkupAvailability::Fallback);
    assert!(report[1].detail.as_deref().unwrap().contains("not found"));

    // Nothing to fall back on at all
    let empty = FallbackTable::new(RouteId::new("home"));
    let report = audit_routes(&source, &empty, &routes[1..]).await;
    assert_eq!(report[0].availability, MarkupAvailability::Missing);
}

//! Path classification behavior observed end to end: prefix stripping,
//! canonical redirects, and fallthrough for paths outside the app.

mod common;

use common::{proxy_config, start_mock_origin, start_proxy, test_client};

#[tokio::test]
async fn app_prefix_is_stripped_before_forwarding() {
    let upstream = start_mock_origin(200, &[("content-type", "text/html")], "<html>stats</html>").await;
    let (proxy, shutdown) = start_proxy(proxy_config(upstream.origin())).await;

    let response = test_client()
        .get(format!("{proxy}/a2-parking/stats?period=week"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "<html>stats</html>");

    let seen = upstream.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].path, "/stats");
    assert_eq!(seen[0].query.as_deref(), Some("period=week"));

    shutdown.trigger();
}

#[tokio::test]
async fn app_root_maps_to_upstream_root() {
    let upstream = start_mock_origin(200, &[("content-type", "text/html")], "<html>map</html>").await;
    let (proxy, shutdown) = start_proxy(proxy_config(upstream.origin())).await;

    let response = test_client()
        .get(format!("{proxy}/a2-parking/"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(upstream.requests()[0].path, "/");

    shutdown.trigger();
}

#[tokio::test]
async fn bare_app_prefix_redirects_to_trailing_slash() {
    let upstream = start_mock_origin(200, &[], "unused").await;
    let (proxy, shutdown) = start_proxy(proxy_config(upstream.origin())).await;

    let response = test_client()
        .get(format!("{proxy}/a2-parking"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 301);
    assert_eq!(response.headers().get("location").unwrap(), "/a2-parking/");
    assert_eq!(upstream.hits(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn bare_prefix_redirect_keeps_the_query() {
    let upstream = start_mock_origin(200, &[], "unused").await;
    let (proxy, shutdown) = start_proxy(proxy_config(upstream.origin())).await;

    let response = test_client()
        .get(format!("{proxy}/a2-parking?ward=3"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 301);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/a2-parking/?ward=3"
    );
    assert_eq!(upstream.hits(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn lookalike_prefix_is_not_forwarded() {
    let upstream = start_mock_origin(200, &[], "unused").await;
    let (proxy, shutdown) = start_proxy(proxy_config(upstream.origin())).await;

    let response = test_client()
        .get(format!("{proxy}/a2-parkingfoo"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    assert_eq!(upstream.hits(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn unrelated_path_falls_through_to_passthrough_origin() {
    let upstream = start_mock_origin(200, &[], "unused").await;
    let site = start_mock_origin(200, &[("content-type", "image/x-icon")], "icon-bytes").await;

    let mut config = proxy_config(upstream.origin());
    config.passthrough.origin = Some(site.origin());
    let (proxy, shutdown) = start_proxy(config).await;

    let response = test_client()
        .get(format!("{proxy}/favicon.ico"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "icon-bytes");

    assert_eq!(upstream.hits(), 0);
    assert_eq!(site.hits(), 1);
    assert_eq!(site.requests()[0].path, "/favicon.ico");

    shutdown.trigger();
}

#[tokio::test]
async fn unrelated_path_without_passthrough_is_404() {
    let upstream = start_mock_origin(200, &[], "unused").await;
    let (proxy, shutdown) = start_proxy(proxy_config(upstream.origin())).await;

    let response = test_client().get(format!("{proxy}/")).send().await.unwrap();
    assert_eq!(response.status(), 404);

    let blog = test_client()
        .get(format!("{proxy}/blog/posts/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(blog.status(), 404);

    assert_eq!(upstream.hits(), 0);

    shutdown.trigger();
}

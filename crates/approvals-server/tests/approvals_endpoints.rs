use std::sync::Arc;

use approvals_core::{ApprovalStore, Grant, GrantStatus, InMemoryApprovalStore, Principal};
use approvals_server::{AppConfig, build_app};
use serde_json::Value;
use tokio::task::JoinHandle;

const TOKEN: &str = "marissa-token";

fn config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.approvals
        .links
        .insert("home".to_string(), "/".to_string());
    cfg
}

async fn start_server(
    store: Arc<InMemoryApprovalStore>,
) -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let app = build_app(&config(), store as Arc<dyn ApprovalStore>);

    // Bind to an ephemeral port
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

async fn seeded_store() -> Arc<InMemoryApprovalStore> {
    let store = Arc::new(InMemoryApprovalStore::new());
    store
        .insert(
            &Principal::bearer(TOKEN),
            vec![
                Grant::new("app1", "read", GrantStatus::Approved),
                Grant::new("app2", "openid", GrantStatus::Pending),
                Grant::new("app1", "write", GrantStatus::Approved),
            ],
        )
        .await;
    store
}

fn status_of(grants: &[Grant], client_id: &str, scope: &str) -> Option<GrantStatus> {
    grants
        .iter()
        .find(|g| g.client_id == client_id && g.scope == scope)
        .map(|g| g.status)
}

#[tokio::test]
async fn approvals_page_requires_bearer_token() {
    let (base, shutdown_tx, handle) = start_server(seeded_store().await).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/approvals"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers()
            .get("www-authenticate")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );
    assert!(resp.headers().contains_key("x-request-id"));

    // GET /healthz is open
    let resp = client.get(format!("{base}/healthz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn approvals_page_renders_grouped_grants() {
    let (base, shutdown_tx, handle) = start_server(seeded_store().await).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/approvals"))
        .bearer_auth(TOKEN)
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-42")
    );
    let html = resp.text().await.unwrap();

    // Clients in first-seen order, app1 grants kept together
    let read = html.find("app1-read").expect("app1 read");
    let write = html.find("app1-write").expect("app1 write");
    let openid = html.find("app2-openid").expect("app2 openid");
    assert!(read < write && write < openid);
    assert!(html.contains("value=\"app1-read\" checked>"));
    assert!(html.contains("value=\"app2-openid\">"));
    assert!(html.contains("<a href=\"/\">home</a>"));

    // Another user sees an empty page
    let html = client
        .get(format!("{base}/approvals"))
        .bearer_auth("someone-else")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("not granted any application"));

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn posting_selection_replaces_approvals() {
    let store = seeded_store().await;
    let (base, shutdown_tx, handle) = start_server(store.clone()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/approvals"))
        .bearer_auth(TOKEN)
        .form(&[
            ("checkedScopes", "app1-read"),
            ("checkedScopes", "app2-openid"),
            ("checkedScopes", "not-a-known-grant"),
            ("checkedScopes", "garbage"),
        ])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let html = resp.text().await.unwrap();
    assert!(html.contains("value=\"app1-write\">"));
    assert!(html.contains("value=\"app2-openid\" checked>"));

    let grants = store.grants(&Principal::bearer(TOKEN)).await;
    assert_eq!(grants.len(), 3);
    assert_eq!(status_of(&grants, "app1", "read"), Some(GrantStatus::Approved));
    assert_eq!(status_of(&grants, "app1", "write"), Some(GrantStatus::Denied));
    assert_eq!(status_of(&grants, "app2", "openid"), Some(GrantStatus::Approved));

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn posting_without_selection_denies_everything() {
    let store = seeded_store().await;
    let (base, shutdown_tx, handle) = start_server(store.clone()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/approvals"))
        .bearer_auth(TOKEN)
        .form(&[] as &[(&str, &str)])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let html = resp.text().await.unwrap();
    assert!(!html.contains(" checked>"));

    let grants = store.grants(&Principal::bearer(TOKEN)).await;
    assert_eq!(grants.len(), 3);
    assert!(grants.iter().all(|g| g.status == GrantStatus::Denied));

    // Unauthenticated posts never reach the store
    let resp = client
        .post(format!("{base}/approvals"))
        .form(&[("checkedScopes", "app1-read")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let grants = store.grants(&Principal::bearer(TOKEN)).await;
    assert!(grants.iter().all(|g| g.status == GrantStatus::Denied));

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

/// Values of the checked boxes on a rendered approvals page.
fn checked_values(html: &str) -> Vec<String> {
    html.split("<input ")
        .skip(1)
        .filter_map(|input| {
            let tag = &input[..input.find('>')?];
            if !tag.ends_with(" checked") {
                return None;
            }
            let start = tag.find("value=\"")? + "value=\"".len();
            let end = start + tag[start..].find('"')?;
            Some(tag[start..end].replace("&amp;", "&"))
        })
        .collect()
}

#[tokio::test]
async fn resubmitting_rendered_page_keeps_statuses() {
    let principal = Principal::bearer(TOKEN);
    let seeded = vec![
        Grant::new("my-app", "read", GrantStatus::Approved),
        Grant::new("my", "app-read", GrantStatus::Pending),
        Grant::new("50%", "read", GrantStatus::Approved),
        Grant::new("my", "app", GrantStatus::Denied),
    ];
    let store = Arc::new(InMemoryApprovalStore::new());
    store.insert(&principal, seeded.clone()).await;
    let (base, shutdown_tx, handle) = start_server(store.clone()).await;
    let client = reqwest::Client::new();

    let html = client
        .get(format!("{base}/approvals"))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let checked = checked_values(&html);
    assert_eq!(checked.len(), 2);

    let form: Vec<(&str, &str)> = checked
        .iter()
        .map(|value| ("checkedScopes", value.as_str()))
        .collect();
    let resp = client
        .post(format!("{base}/approvals"))
        .bearer_auth(TOKEN)
        .form(&form)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let grants = store.grants(&principal).await;
    assert_eq!(grants.len(), seeded.len());
    assert_eq!(status_of(&grants, "my-app", "read"), Some(GrantStatus::Approved));
    assert_eq!(status_of(&grants, "50%", "read"), Some(GrantStatus::Approved));
    // Pending is not a checked box, so it becomes an explicit denial
    assert_eq!(status_of(&grants, "my", "app-read"), Some(GrantStatus::Denied));
    assert_eq!(status_of(&grants, "my", "app"), Some(GrantStatus::Denied));

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

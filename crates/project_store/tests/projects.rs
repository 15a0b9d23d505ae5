mod common;

use std::sync::Arc;

use api_client::ScriptFile;
use chrono::{DateTime, Utc};
use common::{remote_project, sample_projects, store_with, Failure, MockApi};
use entities::{Project, ProjectStatus};
use project_store::StoreError;
use serde_json::json;
use session_storage::MemoryStorage;
use tokio::sync::Notify;

async fn loaded_store(api: Arc<MockApi>) -> project_store::ProjectStore {
    let store = store_with(api, Arc::new(MemoryStorage::new()));
    store.fetch_projects().await.unwrap();
    store
}

#[tokio::test]
async fn test_fetch_projects_transforms_records() {
    let store = loaded_store(MockApi::with_projects(sample_projects())).await;

    let projects = store.projects().await;
    assert_eq!(projects.len(), 3);
    assert_eq!(projects[0].status, ProjectStatus::Active);
    assert_eq!(projects[1].status, ProjectStatus::Review);
    assert_eq!(projects[2].status, ProjectStatus::Completed);
    assert_eq!(projects[2].status_color(), "bg-green-400 text-black");
    assert_eq!(projects[0].budget.as_deref(), Some("$5K"));
    assert_eq!(projects[0].due_date.as_deref(), Some("TBD"));
    assert!(store.error().await.is_none());
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_fetch_failure_keeps_collection_and_sets_error() {
    let api = MockApi::with_projects(sample_projects());
    let store = loaded_store(api.clone()).await;

    api.fail("get_projects", Failure::Bare(503));
    let err = store.fetch_projects().await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch projects");
    assert_eq!(store.error().await.as_deref(), Some("Failed to fetch projects"));
    assert_eq!(store.projects().await.len(), 3);
    assert!(!store.is_loading());

    api.recover("get_projects");
    store.fetch_projects().await.unwrap();
    assert!(store.error().await.is_none());
}

#[tokio::test]
async fn test_superseded_fetch_is_discarded() {
    let api = MockApi::with_projects(vec![remote_project("old", "Old Cut", "draft")]);
    let store = Arc::new(store_with(api.clone(), Arc::new(MemoryStorage::new())));

    let gate = Arc::new(Notify::new());
    api.hold_next_fetch(gate.clone());

    let slow = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_projects().await }
    });
    while api.call_count("get_projects") == 0 {
        tokio::task::yield_now().await;
    }
    assert!(store.is_loading());

    api.set_projects(vec![remote_project("new", "New Cut", "review")]);
    store.fetch_projects().await.unwrap();

    // The slow fetch is still running, so the store is still loading.
    assert!(store.is_loading());

    gate.notify_one();
    let slow_result = slow.await.unwrap().unwrap();
    assert_eq!(slow_result[0].id, "old");

    let projects = store.projects().await;
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, "new");
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_fetch_pending_at_logout_is_discarded() {
    let api = MockApi::with_projects(sample_projects());
    let store = Arc::new(store_with(api.clone(), Arc::new(MemoryStorage::new())));
    store
        .login(common::ADMIN_EMAIL, common::ADMIN_PASSWORD)
        .await
        .unwrap();

    let gate = Arc::new(Notify::new());
    api.hold_next_fetch(gate.clone());
    let pending = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_projects().await }
    });
    while api.call_count("get_projects") < 2 {
        tokio::task::yield_now().await;
    }

    store.logout().await;
    gate.notify_one();
    pending.await.unwrap().unwrap();

    assert!(!store.is_logged_in().await);
    assert!(store.projects().await.is_empty());
    assert!(store.selected_project_id().await.is_none());
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_superseded_fetch_failure_leaves_error_alone() {
    let api = MockApi::with_projects(sample_projects());
    let store = Arc::new(store_with(api.clone(), Arc::new(MemoryStorage::new())));

    api.fail("get_projects", Failure::Message(500, "Database unavailable"));
    let gate = Arc::new(Notify::new());
    api.hold_next_fetch(gate.clone());
    let slow = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_projects().await }
    });
    while api.call_count("get_projects") == 0 {
        tokio::task::yield_now().await;
    }

    api.recover("get_projects");
    store.fetch_projects().await.unwrap();

    gate.notify_one();
    let err = slow.await.unwrap().unwrap_err();
    assert_eq!(err.to_string(), "Database unavailable");

    assert!(store.error().await.is_none());
    assert_eq!(store.projects().await.len(), 3);
}

#[tokio::test]
async fn test_create_project_prepends() {
    let api = MockApi::with_projects(sample_projects());
    let store = loaded_store(api.clone()).await;

    let created = store
        .create_project_with_script(
            "Open Water",
            "A survival drama",
            ScriptFile::new("open_water.fountain", b"FADE IN:".to_vec()),
        )
        .await
        .unwrap();

    assert_eq!(created.title, "Open Water");
    assert_eq!(created.description.as_deref(), Some("A survival drama"));
    let projects = store.projects().await;
    assert_eq!(projects.len(), 4);
    assert_eq!(projects[0].id, created.id);
}

#[tokio::test]
async fn test_create_project_rejects_unsupported_file() {
    let api = MockApi::new();
    let store = store_with(api.clone(), Arc::new(MemoryStorage::new()));

    let err = store
        .create_project_with_script(
            "Open Water",
            "",
            ScriptFile::new("open_water.docx", vec![1, 2, 3]),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::UnsupportedScriptFile { .. }));
    assert!(store.error().await.unwrap().contains("pdf, txt, fountain"));
    assert_eq!(api.call_count("create_project"), 0);
}

#[tokio::test]
async fn test_create_project_failure_propagates() {
    let api = MockApi::new();
    api.fail("create_project", Failure::Message(500, "File analysis failed"));
    let store = store_with(api, Arc::new(MemoryStorage::new()));

    let err = store
        .create_project_with_script("Open Water", "", ScriptFile::new("a.pdf", vec![]))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "File analysis failed");
    assert_eq!(store.error().await.as_deref(), Some("File analysis failed"));
    assert!(store.projects().await.is_empty());
}

#[tokio::test]
async fn test_update_analysis_patches_local_project() {
    let api = MockApi::with_projects(sample_projects());
    let store = loaded_store(api.clone()).await;

    let analysis = json!({
        "scenes": [{"number": 1, "heading": "INT. DINER - NIGHT", "characters": ["MAE"]}]
    });
    store
        .update_project_analysis("p2", analysis.clone())
        .await
        .unwrap();

    let project = store
        .projects()
        .await
        .into_iter()
        .find(|p| p.id == "p2")
        .unwrap();
    assert_eq!(project.analysis_data, Some(analysis.clone()));
    assert_eq!(
        project.script_breakdown.unwrap().scenes[0].heading,
        "INT. DINER - NIGHT"
    );

    assert_eq!(store.get_project_analysis("p2").await.unwrap(), analysis);
}

#[tokio::test]
async fn test_analysis_failures_set_error() {
    let api = MockApi::with_projects(sample_projects());
    let store = loaded_store(api.clone()).await;

    api.fail("get_project_analysis", Failure::Bare(404));
    let err = store.get_project_analysis("p1").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch project analysis");

    api.fail("update_project_analysis", Failure::Detail(403, "Not your project"));
    let err = store
        .update_project_analysis("p1", json!({"scenes": []}))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Not your project");

    let project = store.projects().await.into_iter().next().unwrap();
    assert!(project.analysis_data.is_none());
}

#[tokio::test]
async fn test_select_by_id_or_title() {
    let store = loaded_store(MockApi::with_projects(sample_projects())).await;

    assert!(store.set_selected_project("p2").await);
    let by_id = store.selected_project().await.unwrap();

    assert!(store.set_selected_project("Night Shift").await);
    assert_eq!(store.selected_project_id().await.as_deref(), Some("p1"));

    assert!(store.set_selected_project("Harbor Lights").await);
    let by_title = store.selected_project().await.unwrap();
    assert_eq!(by_id, by_title);

    assert!(!store.set_selected_project("missing").await);
    assert_eq!(store.selected_project_id().await.as_deref(), Some("p2"));
}

#[tokio::test]
async fn test_dangling_selection_yields_none() {
    let store = loaded_store(MockApi::with_projects(sample_projects())).await;
    store.set_selected_project("p3").await;

    store.set_projects(vec![Project::new("Replacement")]).await;

    assert_eq!(store.selected_project_id().await.as_deref(), Some("p3"));
    assert!(store.selected_project().await.is_none());
}

#[tokio::test]
async fn test_update_status_after_server_confirms() {
    let api = MockApi::with_projects(sample_projects());
    let store = loaded_store(api.clone()).await;

    store
        .update_project_status("Night Shift", ProjectStatus::Completed)
        .await
        .unwrap();

    assert!(api.calls().contains(&"update_project p1 completed".to_string()));
    let project = store.projects().await.into_iter().next().unwrap();
    assert_eq!(project.status, ProjectStatus::Completed);
    assert_eq!(project.status_color(), "bg-green-400 text-black");
}

#[tokio::test]
async fn test_update_status_failure_leaves_project() {
    let api = MockApi::with_projects(sample_projects());
    let store = loaded_store(api.clone()).await;

    api.fail("update_project", Failure::Message(500, "Update rejected"));
    let err = store
        .update_project_status("p1", ProjectStatus::Review)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Update rejected");
    assert_eq!(store.error().await.as_deref(), Some("Update rejected"));
    let project = store.projects().await.into_iter().next().unwrap();
    assert_eq!(project.status, ProjectStatus::Active);
}

#[tokio::test]
async fn test_update_status_unknown_project_is_noop() {
    let api = MockApi::with_projects(sample_projects());
    let store = loaded_store(api.clone()).await;

    store
        .update_project_status("missing", ProjectStatus::Review)
        .await
        .unwrap();
    assert_eq!(api.call_count("update_project"), 0);
}

#[tokio::test]
async fn test_remove_project() {
    let api = MockApi::with_projects(sample_projects());
    let store = loaded_store(api.clone()).await;
    store.set_selected_project("p2").await;

    store.remove_project("p2").await.unwrap();

    let projects = store.projects().await;
    assert_eq!(projects.len(), 2);
    assert!(projects.iter().all(|p| p.id != "p2"));
    assert!(store.selected_project_id().await.is_none());

    // Legacy title lookup.
    store.remove_project("Last Reel").await.unwrap();
    assert_eq!(store.projects().await.len(), 1);
}

#[tokio::test]
async fn test_remove_project_failure_leaves_collection() {
    let api = MockApi::with_projects(sample_projects());
    let store = loaded_store(api.clone()).await;

    api.fail("delete_project", Failure::Network);
    let err = store.remove_project("p1").await.unwrap_err();

    assert!(matches!(err, StoreError::Api { .. }));
    assert_eq!(store.error().await.as_deref(), Some("Failed to delete project"));
    assert_eq!(store.projects().await.len(), 3);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_prototype_actions() {
    let store = store_with(MockApi::new(), Arc::new(MemoryStorage::new()))
        .with_projects(vec![Project::new("Seed One"), Project::new("Seed Two")]);

    assert_eq!(store.selected_project().await.unwrap().title, "Seed One");

    let mut added = Project::new("Added");
    added.created_at = DateTime::<Utc>::UNIX_EPOCH;
    store.add_project(added).await;

    let projects = store.projects().await;
    assert_eq!(projects.len(), 3);
    assert_eq!(projects[2].title, "Added");
    assert!(projects[2].created_at > DateTime::<Utc>::UNIX_EPOCH);
}

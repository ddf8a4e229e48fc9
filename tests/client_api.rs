//! DM API client tests against a mock server

mod common;

use common::helpers::{TOKEN, api_path, start_dm_api};
use dm_api::{DM_JOB_APPLICATION_ID, Error, JobSpecification, StartJobOptions, TEST_PRODUCT_ID};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{body_string_contains, header, method, path, query_param, query_param_is_missing},
};

#[tokio::test]
async fn test_get_version() {
    let (server, api) = start_dm_api().await;
    Mock::given(method("GET"))
        .and(path(api_path("/version")))
        .and(header("Authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "1.2.3"})))
        .expect(1)
        .mount(&server)
        .await;

    let version = api.get_version(TOKEN).await.unwrap();
    assert_eq!(version, json!({"version": "1.2.3"}));
}

#[tokio::test]
async fn test_ping_unexpected_status() {
    let (server, api) = start_dm_api().await;
    Mock::given(method("GET"))
        .and(path(api_path("/account-server/namespace")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = api.ping(TOKEN).await.unwrap_err();
    assert!(matches!(
        &err,
        Error::UnexpectedStatus { context, status: 401 } if context == "Failed ping"
    ));
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_non_json_body_is_empty_object() {
    let (server, api) = start_dm_api().await;
    Mock::given(method("DELETE"))
        .and(path(api_path("/project/project-1")))
        .respond_with(ResponseTemplate::new(200).set_body_string("deleted"))
        .mount(&server)
        .await;

    let result = api.delete_project(TOKEN, "project-1").await.unwrap();
    assert_eq!(result, json!({}));
}

#[tokio::test]
async fn test_create_project() {
    let (server, api) = start_dm_api().await;
    Mock::given(method("POST"))
        .and(path(api_path("/project")))
        .and(body_string_contains(format!("tier_product_id={}", TEST_PRODUCT_ID)))
        .and(body_string_contains("name=test-project"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"project_id": "project-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let created = api
        .create_project(TOKEN, "test-project", TEST_PRODUCT_ID)
        .await
        .unwrap();
    assert_eq!(created["project_id"], "project-1");
}

#[tokio::test]
async fn test_create_project_expects_created() {
    let (server, api) = start_dm_api().await;
    Mock::given(method("POST"))
        .and(path(api_path("/project")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = api
        .create_project(TOKEN, "test-project", TEST_PRODUCT_ID)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed creating project (status=200)");
}

#[tokio::test]
async fn test_list_project_files() {
    let (server, api) = start_dm_api().await;
    Mock::given(method("GET"))
        .and(path(api_path("/file")))
        .and(query_param("project_id", "project-1"))
        .and(query_param("path", "/work"))
        .and(query_param("include_hidden", "false"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"files": [{"file_name": "100.smi"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let listing = api
        .list_project_files(TOKEN, "project-1", "/work", false)
        .await
        .unwrap();
    assert_eq!(listing["files"][0]["file_name"], "100.smi");
}

#[rstest]
#[case("work")]
#[case("")]
#[tokio::test]
async fn test_project_path_must_be_absolute(#[case] project_path: &str) {
    let (_server, api) = start_dm_api().await;

    let result = api
        .list_project_files(TOKEN, "project-1", project_path, false)
        .await;
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[tokio::test]
async fn test_put_skips_existing_files() {
    let (server, api) = start_dm_api().await;
    let dir = TempDir::new().unwrap();
    let existing = dir.path().join("a.smi");
    let fresh = dir.path().join("b.smi");
    std::fs::write(&existing, "C\tmethane\n").unwrap();
    std::fs::write(&fresh, "CC\tethane\n").unwrap();

    Mock::given(method("GET"))
        .and(path(api_path("/file")))
        .and(query_param("project_id", "project-1"))
        .and(query_param("path", "/work"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"files": [{"file_name": "a.smi"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("/project/project-1/file")))
        .and(body_string_contains("filename=\"b.smi\""))
        .and(body_string_contains("CC\tethane"))
        .and(body_string_contains("/work"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let result = api
        .put_unmanaged_project_files(TOKEN, "project-1", &[&existing, &fresh], "/work", false)
        .await
        .unwrap();
    assert_eq!(result, json!({}));
}

#[tokio::test]
async fn test_put_force_skips_listing() {
    let (server, api) = start_dm_api().await;
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.smi");
    std::fs::write(&file, "C\n").unwrap();

    Mock::given(method("GET"))
        .and(path(api_path("/file")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"files": [{"file_name": "a.smi"}]})),
        )
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("/project/project-1/file")))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    api.put_unmanaged_project_files(TOKEN, "project-1", &[&file], "/", true)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_put_to_missing_path_uploads_everything() {
    let (server, api) = start_dm_api().await;
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.smi");
    std::fs::write(&file, "C\n").unwrap();

    Mock::given(method("GET"))
        .and(path(api_path("/file")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("/project/project-1/file")))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    api.put_unmanaged_project_files(TOKEN, "project-1", &[&file], "/new", false)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_put_missing_source_file() {
    let (server, api) = start_dm_api().await;
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.smi");

    Mock::given(method("GET"))
        .and(path(api_path("/file")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"files": []})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = api
        .put_unmanaged_project_files(TOKEN, "project-1", &[&missing], "/", false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoSuchFile(p) if p == missing));
}

#[tokio::test]
async fn test_put_failure_stops_upload() {
    let (server, api) = start_dm_api().await;
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a.smi");
    let second = dir.path().join("b.smi");
    std::fs::write(&first, "C\n").unwrap();
    std::fs::write(&second, "CC\n").unwrap();

    Mock::given(method("PUT"))
        .and(path(api_path("/project/project-1/file")))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = api
        .put_unmanaged_project_files(TOKEN, "project-1", &[&first, &second], "/work", true)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed putting file /work/a.smi (status=500)");
}

#[tokio::test]
async fn test_put_without_api_url() {
    let api = dm_api::DmApi::with_settings(&dm_api::Settings::default());

    let result = api
        .put_unmanaged_project_files(TOKEN, "project-1", &["does-not-matter.smi"], "/", false)
        .await;
    assert!(matches!(result, Err(Error::NoApiUrl)));
}

#[tokio::test]
async fn test_delete_files_one_request_each() {
    let (server, api) = start_dm_api().await;
    for file in ["a.smi", "b.smi"] {
        Mock::given(method("DELETE"))
            .and(path(api_path("/file")))
            .and(query_param("project_id", "project-1"))
            .and(query_param("path", "/work"))
            .and(query_param("file", file))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }

    let result = api
        .delete_unmanaged_project_files(TOKEN, "project-1", &["a.smi", "b.smi"], "/work")
        .await
        .unwrap();
    assert_eq!(result, json!({}));
}

#[tokio::test]
async fn test_delete_files_stops_on_failure() {
    let (server, api) = start_dm_api().await;
    Mock::given(method("DELETE"))
        .and(path(api_path("/file")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = api
        .delete_unmanaged_project_files(TOKEN, "project-1", &["a.smi", "b.smi"], "/")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_get_project_file_writes_local_file() {
    let (server, api) = start_dm_api().await;
    let dir = TempDir::new().unwrap();
    let local_file = dir.path().join("foo.smi");

    Mock::given(method("GET"))
        .and(path(api_path("/project/project-1/file")))
        .and(query_param("path", "/work"))
        .and(query_param("file", "foo.smi"))
        .and(header("Authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("CCO\tethanol\n"))
        .expect(1)
        .mount(&server)
        .await;

    api.get_unmanaged_project_file(TOKEN, "project-1", "foo.smi", &local_file, "/work")
        .await
        .unwrap();
    assert_eq!(std::fs::read_to_string(&local_file).unwrap(), "CCO\tethanol\n");
}

#[tokio::test]
async fn test_get_project_file_with_callback_token() {
    let (server, api) = start_dm_api().await;
    let dir = TempDir::new().unwrap();
    let local_file = dir.path().join("foo.smi");

    Mock::given(method("GET"))
        .and(path(api_path("/project/project-1/file-with-token")))
        .and(query_param("path", "/"))
        .and(query_param("file", "foo.smi"))
        .and(query_param("token", "callback-1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8, 1, 2, 3]))
        .expect(1)
        .mount(&server)
        .await;

    api.get_unmanaged_project_file_with_token(
        "callback-1",
        "project-1",
        "foo.smi",
        &local_file,
        "/",
    )
    .await
    .unwrap();
    assert_eq!(std::fs::read(&local_file).unwrap(), vec![0u8, 1, 2, 3]);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_start_job_instance() {
    let (server, api) = start_dm_api().await;
    Mock::given(method("GET"))
        .and(path(api_path(&format!("/application/{}", DM_JOB_APPLICATION_ID))))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"versions": ["2.0.0", "1.0.0"]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("/instance")))
        .and(body_string_contains(format!("application_id={}", DM_JOB_APPLICATION_ID)))
        .and(body_string_contains("application_version=2.0.0"))
        .and(body_string_contains("as_name=test-job"))
        .and(body_string_contains("project_id=project-1"))
        .and(body_string_contains("specification="))
        .and(body_string_contains("callback_url="))
        .and(body_string_contains("generate_callback_token=true"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"instance_id": "instance-1", "task_id": "task-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let spec = JobSpecification::new("im-test", "nop", "1.0.0");
    let options = StartJobOptions::new()
        .with_callback_url("https://example.com/callback")
        .with_generate_callback_token(true);
    let started = api
        .start_job_instance(TOKEN, "project-1", "test-job", &spec, &options)
        .await
        .unwrap();

    assert_eq!(started["instance_id"], "instance-1");
    assert_eq!(started["task_id"], "task-1");
}

#[tokio::test]
async fn test_start_job_without_operator() {
    let (server, api) = start_dm_api().await;
    Mock::given(method("GET"))
        .and(path(api_path(&format!("/application/{}", DM_JOB_APPLICATION_ID))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"versions": []})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let spec = JobSpecification::new("im-test", "nop", "1.0.0");
    let err = api
        .start_job_instance(TOKEN, "project-1", "test-job", &spec, &StartJobOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(&err, Error::JobOperator(msg) if msg == "No Job operator installed"));
}

#[tokio::test]
async fn test_start_job_operator_lookup_fails() {
    let (server, api) = start_dm_api().await;
    Mock::given(method("GET"))
        .and(path(api_path(&format!("/application/{}", DM_JOB_APPLICATION_ID))))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let spec = JobSpecification::new("im-test", "nop", "1.0.0");
    let err = api
        .start_job_instance(TOKEN, "project-1", "test-job", &spec, &StartJobOptions::default())
        .await
        .unwrap_err();
    assert!(
        matches!(&err, Error::JobOperator(msg) if msg == "Failed getting Job operator version")
    );
}

#[tokio::test]
async fn test_get_task_event_parameters() {
    let (server, api) = start_dm_api().await;
    Mock::given(method("GET"))
        .and(path(api_path("/task/task-1")))
        .and(query_param_is_missing("event_prior_ordinal"))
        .and(query_param_is_missing("event_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": false})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/task/task-2")))
        .and(query_param("event_prior_ordinal", "4"))
        .and(query_param("event_limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(api.get_task(TOKEN, "task-1", 0, 0).await.unwrap()["done"], false);
    assert_eq!(api.get_task(TOKEN, "task-2", 4, 10).await.unwrap()["done"], true);
}

#[tokio::test]
async fn test_get_job_by_name() {
    let (server, api) = start_dm_api().await;
    Mock::given(method("GET"))
        .and(path(api_path("/job/get-by-name")))
        .and(query_param("collection", "im-test"))
        .and(query_param("name", "nop"))
        .and(query_param("version", "1.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let job = api
        .get_job_by_name(TOKEN, "im-test", "nop", "1.0.0")
        .await
        .unwrap();
    assert_eq!(job["id"], 7);
}

#[tokio::test]
async fn test_get_job_needs_positive_id() {
    let (_server, api) = start_dm_api().await;
    assert!(matches!(
        api.get_job(TOKEN, 0).await,
        Err(Error::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_project_instances_and_delete() {
    let (server, api) = start_dm_api().await;
    Mock::given(method("GET"))
        .and(path(api_path("/instance")))
        .and(query_param("project_id", "project-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"instances": [{"id": "instance-1"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api_path("/instance/instance-1")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let instances = api.get_project_instances(TOKEN, "project-1").await.unwrap();
    assert_eq!(instances["instances"][0]["id"], "instance-1");
    assert_eq!(api.delete_instance(TOKEN, "instance-1").await.unwrap(), json!({}));
}

#[tokio::test]
async fn test_delete_instance_token_is_unauthenticated() {
    let (server, api) = start_dm_api().await;
    Mock::given(method("DELETE"))
        .and(path(api_path("/instance/instance-1/token/callback-1")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    api.delete_instance_token("instance-1", "callback-1")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_set_admin_state() {
    let (server, api) = start_dm_api().await;
    Mock::given(method("PATCH"))
        .and(path(api_path("/user/account")))
        .and(body_string_contains("become_admin=true"))
        .and(body_string_contains("impersonate=dmit-user"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = api
        .set_admin_state(TOKEN, true, Some("dmit-user"))
        .await
        .unwrap();
    assert_eq!(result, json!({}));
}

#[tokio::test]
async fn test_insecure_endpoint_still_talks_http() {
    let server = wiremock::MockServer::start().await;
    let mut settings = common::helpers::create_test_settings(&server);
    settings.api.verify_ssl_cert = false;
    let api = dm_api::DmApi::with_settings(&settings);

    Mock::given(method("GET"))
        .and(path(api_path("/project")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"projects": []})))
        .expect(1)
        .mount(&server)
        .await;

    let projects = api.get_available_projects(TOKEN).await.unwrap();
    assert_eq!(projects, json!({"projects": []}));
}

//! User profile HTTP client tests against a mock server

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use professional_refdata::config::UserProfileConfig;
use professional_refdata::models::{IdamStatus, UserProfileCreationRequest};
use professional_refdata::services::{UserProfileClient, UserProfileGateway};
use professional_refdata::utils::AppError;

fn client_for(server: &MockServer, timeout_secs: u64) -> UserProfileClient {
    UserProfileClient::new(&UserProfileConfig {
        url: server.uri(),
        timeout_secs,
    })
    .expect("Failed to build client")
}

#[tokio::test]
async fn test_fetch_users_sends_ids_and_sorts_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/userprofile/users"))
        .and(query_param("showdeleted", "false"))
        .and(body_json(json!({ "userIds": ["b-2", "a-1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userProfiles": [
                {
                    "idamId": "b-2",
                    "firstName": "Bea",
                    "lastName": "Two",
                    "email": "bea@example.com",
                    "idamStatus": "SUSPENDED",
                    "roles": []
                },
                {
                    "idamId": "a-1",
                    "firstName": "Al",
                    "lastName": "One",
                    "email": "al@example.com",
                    "idamStatus": "ACTIVE",
                    "roles": ["pui-case-manager"]
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profiles = client_for(&server, 5)
        .fetch_users_by_identifiers(&["b-2".to_string(), "a-1".to_string()], false)
        .await
        .unwrap();

    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0].user_identifier, "a-1");
    assert_eq!(profiles[0].idam_status, Some(IdamStatus::Active));
    assert_eq!(profiles[0].roles, vec!["pui-case-manager".to_string()]);
    assert_eq!(profiles[1].user_identifier, "b-2");
    assert_eq!(profiles[1].idam_status, Some(IdamStatus::Suspended));
}

#[tokio::test]
async fn test_fetch_users_not_found_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/userprofile/users"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let profiles = client_for(&server, 5)
        .fetch_users_by_identifiers(&["a-1".to_string()], true)
        .await
        .unwrap();

    assert!(profiles.is_empty());
}

#[tokio::test]
async fn test_fetch_users_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/userprofile/users"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client_for(&server, 5)
        .fetch_users_by_identifiers(&["a-1".to_string()], false)
        .await;

    assert!(matches!(result, Err(AppError::UserProfile(_))));
}

#[tokio::test]
async fn test_fetch_status_by_email() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/userprofile"))
        .and(query_param("email", "admin@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userIdentifier": "a-1",
            "idamStatus": "PENDING"
        })))
        .mount(&server)
        .await;

    let status = client_for(&server, 5)
        .fetch_status_by_email("admin@example.com")
        .await
        .unwrap();

    assert_eq!(status, Some(IdamStatus::Pending));
}

#[tokio::test]
async fn test_fetch_status_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/userprofile"))
        .and(query_param("email", "missing@example.com"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/userprofile"))
        .and(query_param("email", "blank@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "idamStatus": " " })))
        .mount(&server)
        .await;

    let client = client_for(&server, 5);

    assert_eq!(
        client.fetch_status_by_email("missing@example.com").await.unwrap(),
        None
    );
    assert_eq!(
        client.fetch_status_by_email("blank@example.com").await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_delete_profiles_reports_body_status() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/userprofile/users"))
        .and(body_json(json!({ "userIds": ["a-1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 204,
            "message": "User profiles deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server, 5)
        .delete_profiles(&["a-1".to_string()])
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(response.message, "User profiles deleted");
}

#[tokio::test]
async fn test_delete_profiles_falls_back_to_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/userprofile/users"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let response = client_for(&server, 5)
        .delete_profiles(&[])
        .await
        .unwrap();

    assert_eq!(response.status_code, 400);
    assert_eq!(response.message, "Bad Request");
}

#[tokio::test]
async fn test_create_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/userprofile"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "idamId": "new-user-1",
            "idamRegistrationResponse": 201
        })))
        .mount(&server)
        .await;

    let request = UserProfileCreationRequest::for_super_user(
        "admin@example.com",
        "Ada",
        "Admin",
        vec!["pui-user-manager".to_string()],
    );
    let response = client_for(&server, 5).create_profile(&request).await.unwrap();

    assert!(response.is_user_created());
    assert_eq!(response.idam_id.as_deref(), Some("new-user-1"));

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["email"], "admin@example.com");
    assert_eq!(body["userType"], "EXTERNAL");
    assert_eq!(body["resendInvite"], false);
}

#[tokio::test]
async fn test_create_profile_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/userprofile"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let request =
        UserProfileCreationRequest::for_super_user("admin@example.com", "Ada", "Admin", vec![]);
    let result = client_for(&server, 5).create_profile(&request).await;

    assert!(matches!(result, Err(AppError::UserProfile(_))));
}

#[tokio::test]
async fn test_request_timeout_maps_to_user_profile_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/userprofile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "idamStatus": "ACTIVE" }))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let result = client_for(&server, 1)
        .fetch_status_by_email("slow@example.com")
        .await;

    assert!(matches!(result, Err(AppError::UserProfile(_))));
}

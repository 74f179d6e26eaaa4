//! Session and profile endpoints against a wiremock backend.

use helpdesk_models::{ProfileUpdate, SignupRequest};
use helpdesk_sdk::{
    reveal_or_empty, BackendClient, ExposeSecret, PassphraseCipher, SdkError, SecretCipher,
    Session,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> BackendClient {
    BackendClient::with_http(reqwest::Client::new(), &format!("{}/v1", server.uri()))
}

fn auth_body(sealed_key: Option<&str>) -> Value {
    json!({
        "tokens": "tok-abc",
        "user": {
            "_id": "u1",
            "email": "agent@acme.io",
            "firstName": "Grace",
            "lastName": "Hopper",
            "freshdeskDomain": "acme",
            "freshdeskApiKey": sealed_key
        }
    })
}

#[tokio::test]
async fn login_returns_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/user/login"))
        .and(body_json(json!({ "email": "agent@acme.io", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(None)))
        .expect(1)
        .mount(&server)
        .await;

    let session = client_for(&server)
        .login("agent@acme.io", "hunter2")
        .await
        .unwrap();

    assert_eq!(session.token, "tok-abc");
    assert_eq!(session.user.id, "u1");
    assert_eq!(session.user.display_name(), "Grace Hopper");
    assert!(!format!("{session:?}").contains("tok-abc"));
}

#[tokio::test]
async fn rejected_login_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/user/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid credentials" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .login("agent@acme.io", "wrong")
        .await
        .unwrap_err();

    match err {
        SdkError::Auth(message) => assert_eq!(message, "invalid credentials"),
        other => panic!("expected Auth, got {other:?}"),
    }
}

#[tokio::test]
async fn signup_sends_plaintext_key_and_gets_it_back_sealed() {
    let server = MockServer::start().await;
    let cipher = PassphraseCipher::with_default_passphrase();
    let sealed = cipher.protect("fd-api-key");
    Mock::given(method("POST"))
        .and(path("/v1/user/signup"))
        .respond_with(ResponseTemplate::new(201).set_body_json(auth_body(Some(sealed.as_str()))))
        .mount(&server)
        .await;

    let request = SignupRequest {
        first_name: "Grace".into(),
        last_name: "Hopper".into(),
        email: "agent@acme.io".into(),
        password: "hunter2".into(),
        freshdesk_domain: "acme".into(),
        freshdesk_api_key: "fd-api-key".into(),
    };
    let session = client_for(&server).signup(&request).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let body: Value = received[0].body_json().unwrap();
    assert_eq!(body["freshdeskApiKey"], "fd-api-key");

    let key = reveal_or_empty(&cipher, session.user.freshdesk_api_key.as_ref());
    assert_eq!(key.expose_secret(), "fd-api-key");
}

#[tokio::test]
async fn profile_key_is_revealed_client_side() {
    let server = MockServer::start().await;
    let cipher = PassphraseCipher::with_default_passphrase();
    let sealed = cipher.protect("fd-api-key");
    let profile = auth_body(Some(sealed.as_str()))["user"].clone();
    Mock::given(method("GET"))
        .and(path("/v1/user"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(None)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let session = client.login("agent@acme.io", "hunter2").await.unwrap();
    let profile = client.authenticated(&session).profile().await.unwrap();

    let key = reveal_or_empty(&cipher, profile.freshdesk_api_key.as_ref());
    assert_eq!(key.expose_secret(), "fd-api-key");
}

#[tokio::test]
async fn profile_key_sealed_by_openssl_is_revealed() {
    // `printf '"fd_live_key"' | openssl enc -aes-256-cbc -md md5 -pass pass:"secret key 123" -a`
    let server = MockServer::start().await;
    let profile = auth_body(Some("U2FsdGVkX1+7LjiMce1SAEjbI6d61ZU+xc+L02LrDbo="))["user"].clone();
    Mock::given(method("GET"))
        .and(path("/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile))
        .mount(&server)
        .await;
    let session: Session = serde_json::from_value(json!({
        "token": "tok-abc",
        "user": { "_id": "u1" }
    }))
    .unwrap();

    let profile = client_for(&server)
        .authenticated(&session)
        .profile()
        .await
        .unwrap();

    let cipher = PassphraseCipher::with_default_passphrase();
    let key = reveal_or_empty(&cipher, profile.freshdesk_api_key.as_ref());
    assert_eq!(key.expose_secret(), "fd_live_key");
}

#[tokio::test]
async fn undecryptable_profile_key_reveals_empty() {
    let cipher = PassphraseCipher::with_default_passphrase();
    let other = PassphraseCipher::new("another passphrase").unwrap();
    let sealed = other.protect("fd-api-key");

    let key = reveal_or_empty(&cipher, Some(&sealed));
    assert_eq!(key.expose_secret(), "");
    assert_eq!(reveal_or_empty(&cipher, None).expose_secret(), "");
}

#[tokio::test]
async fn update_profile_puts_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(None)))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/user/u1"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = client.login("agent@acme.io", "hunter2").await.unwrap();
    let update = ProfileUpdate {
        freshdesk_domain: Some("acme-support".into()),
        freshdesk_api_key: Some("new-key".into()),
        ..ProfileUpdate::default()
    };

    client
        .authenticated(&session)
        .update_profile(&session.user.id, &update)
        .await
        .unwrap();
    session.user.apply(&update);

    let received = server.received_requests().await.unwrap();
    let put = received.iter().find(|r| r.method.as_str() == "PUT").unwrap();
    let body: ProfileUpdate = put.body_json().unwrap();
    assert_eq!(body, update);
    let raw: Value = put.body_json().unwrap();
    assert!(raw.get("firstName").is_none());
    assert_eq!(raw["freshdeskApiKey"], "new-key");

    assert_eq!(session.user.freshdesk_domain.as_deref(), Some("acme-support"));
    assert_eq!(session.user.freshdesk_api_key, None);
}

#[tokio::test]
async fn update_profile_failure_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/user/u1"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "error": "conflict" })))
        .mount(&server)
        .await;
    let session: Session = serde_json::from_value(json!({
        "token": "tok-abc",
        "user": { "_id": "u1" }
    }))
    .unwrap();

    let err = client_for(&server)
        .authenticated(&session)
        .update_profile("u1", &ProfileUpdate::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(409));
}

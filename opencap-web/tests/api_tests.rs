#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! End-to-end tests of the HTTP surface over `MemoryStore`.

use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use async_trait::async_trait;
use base64::prelude::*;
use opencap_app::adapters::MemoryStore;
use opencap_app::AppStateBuilder;
use opencap_core::auth::{SigningAlgorithm, TokenService};
use opencap_core::traits::DomainResolver;
use opencap_resolver::{DomainAdvertisement, ResolverResult, SrvTarget};
use opencap_web::error::not_implemented;
use opencap_web::messages::{
    AliasAddressResponse, AssociateDomainResponse, DomainResponse, ErrorBody, LoginResponse,
    LookupResponse,
};
use opencap_web::{configure, WebState};
use serde_json::json;
use tokio::sync::RwLock;

const DOMAIN: &str = "example.com";
const PASSWORD: &str = "Sup3r$ecret";
const P2PKH: &str = "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2";
const KEY: [u8; 32] = [0x5a; 32];

/// Resolver whose advertised key can be swapped between requests.
#[derive(Default)]
struct StubResolver {
    public_key: RwLock<Option<[u8; 32]>>,
}

#[async_trait]
impl DomainResolver for StubResolver {
    async fn resolve(&self, domain: &str) -> ResolverResult<DomainAdvertisement> {
        Ok(DomainAdvertisement {
            domain: domain.to_string(),
            servers: vec![SrvTarget {
                host: format!("cap.{domain}"),
                port: 443,
                priority: 0,
                weight: 10,
            }],
            public_key: *self.public_key.read().await,
            dns_signature: true,
        })
    }
}

fn state(resolver: Arc<StubResolver>) -> web::Data<WebState> {
    let tokens = TokenService::new(
        b"api-test-secret",
        SigningAlgorithm::HS256,
        chrono::Duration::seconds(600),
    )
    .unwrap();
    let app = AppStateBuilder::new()
        .registry(Arc::new(MemoryStore::new()))
        .resolver(resolver)
        .token_service(Arc::new(tokens))
        .pbkdf2_iterations(1_000)
        .build()
        .unwrap();
    web::Data::new(WebState::new(app))
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(configure)
                .default_service(web::to(not_implemented)),
        )
        .await
    };
}

fn address_uri(username: &str, address_type: u16) -> String {
    format!("/v1/domains/{DOMAIN}/users/{username}/types/{address_type}")
}

fn users_uri() -> String {
    format!("/v1/domains/{DOMAIN}/users")
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Register `username` and log in, yielding a token.
macro_rules! signup {
    ($app:expr, $username:expr) => {{
        let req = test::TestRequest::post()
            .uri(&users_uri())
            .set_json(json!({ "username": $username, "password": PASSWORD }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/v1/auth")
            .set_json(json!({ "username": $username, "domain": DOMAIN, "password": PASSWORD }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: LoginResponse = test::read_body_json(resp).await;
        body.jwt
    }};
}

#[actix_web::test]
async fn end_to_end_address_lifecycle() {
    let state = state(Arc::new(StubResolver::default()));
    let app = test_app!(state);
    let token = signup!(app, "alice");

    let req = test::TestRequest::put()
        .uri(&address_uri("alice", 100))
        .insert_header(bearer(&token))
        .set_json(json!({ "sub_type": 0, "address": BASE64_STANDARD.encode(P2PKH) }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&address_uri("alice", 100))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: LookupResponse = test::read_body_json(resp).await;
    assert_eq!(body.sub_type, 0);
    assert_eq!(BASE64_STANDARD.decode(body.address).unwrap(), P2PKH.as_bytes());
    assert!(body.extensions.is_empty());

    let req = test::TestRequest::delete()
        .uri(&address_uri("alice", 100))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&address_uri("alice", 100))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.code, 404);
}

#[actix_web::test]
async fn put_replaces_previous_record() {
    let state = state(Arc::new(StubResolver::default()));
    let app = test_app!(state);
    let token = signup!(app, "alice");

    for (sub_type, payload) in [(0u8, [1u8; 20]), (1, [2; 20])] {
        let req = test::TestRequest::put()
            .uri(&address_uri("alice", 0))
            .insert_header(bearer(&token))
            .set_json(json!({ "sub_type": sub_type, "address": BASE64_STANDARD.encode(payload) }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri(&address_uri("alice", 0)).to_request();
    let body: LookupResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.sub_type, 1);
    assert_eq!(BASE64_STANDARD.decode(body.address).unwrap(), vec![2; 20]);
}

#[actix_web::test]
async fn invalid_address_is_rejected() {
    let state = state(Arc::new(StubResolver::default()));
    let app = test_app!(state);
    let token = signup!(app, "alice");

    // Last character flipped
    let req = test::TestRequest::put()
        .uri(&address_uri("alice", 100))
        .insert_header(bearer(&token))
        .set_json(json!({
            "sub_type": 0,
            "address": BASE64_STANDARD.encode("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN3"),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri(&address_uri("alice", 100))
        .insert_header(bearer(&token))
        .set_json(json!({ "sub_type": 0, "address": "not base64!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.message, "Address must be valid base64");

    let req = test::TestRequest::put()
        .uri(&address_uri("alice", 9999))
        .insert_header(bearer(&token))
        .set_json(json!({ "sub_type": 0, "address": BASE64_STANDARD.encode(P2PKH) }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri(&format!("/v1/domains/{DOMAIN}/users/alice/types/bitcoin"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn gate_rejects_bad_headers_and_mismatches() {
    let state = state(Arc::new(StubResolver::default()));
    let app = test_app!(state);
    let alice = signup!(app, "alice");
    let _bob = signup!(app, "bob");

    let body = json!({ "sub_type": 0, "address": BASE64_STANDARD.encode(P2PKH) });

    let req = test::TestRequest::put()
        .uri(&address_uri("bob", 100))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(err.message, "Bad auth header");

    let req = test::TestRequest::put()
        .uri(&address_uri("bob", 100))
        .insert_header((header::AUTHORIZATION, format!("Token {alice}")))
        .set_json(&body)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::put()
        .uri(&address_uri("bob", 100))
        .insert_header(bearer("not.a.token"))
        .set_json(&body)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    // Valid token for alice aimed at bob
    let req = test::TestRequest::put()
        .uri(&address_uri("bob", 100))
        .insert_header(bearer(&alice))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let err: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(err.code, 401);
    assert_eq!(err.message, "Usernames do not match");

    let req = test::TestRequest::delete()
        .uri("/v1/domains/example.org/users/alice")
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let err: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(err.message, "Domains do not match");

    let req = test::TestRequest::get().uri(&address_uri("bob", 100)).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn account_creation_and_login_errors() {
    let state = state(Arc::new(StubResolver::default()));
    let app = test_app!(state);
    let _token = signup!(app, "alice");

    let req = test::TestRequest::post()
        .uri(&users_uri())
        .set_json(json!({ "username": "alice", "password": PASSWORD }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );

    let req = test::TestRequest::post()
        .uri(&users_uri())
        .set_json(json!({ "username": "carol", "password": "short" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::post()
        .uri("/v1/auth")
        .set_json(json!({ "username": "alice", "domain": DOMAIN, "password": "Wr0ng$pass" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::post()
        .uri("/v1/auth")
        .set_json(json!({ "username": "nobody", "domain": DOMAIN, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(err.message, "User not found");

    let req = test::TestRequest::post()
        .uri("/v1/auth")
        .insert_header(header::ContentType::json())
        .set_payload("{not json")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn json_bodies_without_content_type() {
    let state = state(Arc::new(StubResolver::default()));
    let app = test_app!(state);

    let body = json!({ "username": "alice", "password": PASSWORD }).to_string();
    let req = test::TestRequest::post()
        .uri(&users_uri())
        .set_payload(body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let body = json!({ "username": "alice", "domain": DOMAIN, "password": PASSWORD }).to_string();
    let req = test::TestRequest::post()
        .uri("/v1/auth")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: LoginResponse = test::read_body_json(resp).await;
    assert!(!body.jwt.is_empty());
}

#[actix_web::test]
async fn delete_user_cascades() {
    let state = state(Arc::new(StubResolver::default()));
    let app = test_app!(state);
    let token = signup!(app, "alice");

    for (address_type, payload) in [(100u16, P2PKH.as_bytes().to_vec()), (0, vec![7; 20])] {
        let req = test::TestRequest::put()
            .uri(&address_uri("alice", address_type))
            .insert_header(bearer(&token))
            .set_json(json!({ "sub_type": 0, "address": BASE64_STANDARD.encode(payload) }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::delete()
        .uri(&format!("/v1/domains/{DOMAIN}/users/alice"))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    for address_type in [100u16, 0] {
        let req = test::TestRequest::get()
            .uri(&address_uri("alice", address_type))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    let req = test::TestRequest::delete()
        .uri(&format!("/v1/domains/{DOMAIN}/users/alice"))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn alias_lookup() {
    let state = state(Arc::new(StubResolver::default()));
    let app = test_app!(state);
    let token = signup!(app, "alice");

    let req = test::TestRequest::put()
        .uri(&address_uri("alice", 100))
        .insert_header(bearer(&token))
        .set_json(json!({ "sub_type": 0, "address": BASE64_STANDARD.encode(P2PKH) }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/v1/addresses?alias=alice%24example.com&address_type=100")
        .to_request();
    let body: LookupResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(BASE64_STANDARD.decode(body.address).unwrap(), P2PKH.as_bytes());

    let req = test::TestRequest::get()
        .uri("/v1/addresses?alias=alice%40example.com")
        .to_request();
    let body: Vec<AliasAddressResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].address_type, 100);

    let req = test::TestRequest::get()
        .uri("/v1/addresses?alias=notanalias")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri("/v1/addresses?alias=alice%24example.com&address_type=102")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn domain_association_tracks_advertised_key() {
    let resolver = Arc::new(StubResolver::default());
    *resolver.public_key.write().await = Some(KEY);
    let state = state(Arc::clone(&resolver));
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/v1/domains/example.com").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::post()
        .uri("/v1/domains")
        .set_json(json!({ "domain": DOMAIN }))
        .to_request();
    let body: AssociateDomainResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.domain, DOMAIN);
    assert_eq!(body.primary.host, "cap.example.com");
    assert_eq!(body.primary.port, 443);
    assert_eq!(body.servers.len(), 1);
    assert_eq!(body.public_key.as_deref(), Some(hex::encode(KEY).as_str()));
    assert!(body.dns_signature);

    let req = test::TestRequest::get().uri("/v1/domains/example.com").to_request();
    let body: DomainResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.public_key, hex::encode(KEY));

    // Key withdrawn from DNS: the stored key is revoked
    *resolver.public_key.write().await = None;
    let req = test::TestRequest::post()
        .uri("/v1/domains")
        .set_json(json!({ "domain": DOMAIN }))
        .to_request();
    let body: AssociateDomainResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.public_key, None);

    let req = test::TestRequest::get().uri("/v1/domains/example.com").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn unmatched_routes_answer_501() {
    let state = state(Arc::new(StubResolver::default()));
    let app = test_app!(state);

    for req in [
        test::TestRequest::get().uri("/v2/anything").to_request(),
        test::TestRequest::get().uri("/v1/nothing/here").to_request(),
        test::TestRequest::patch().uri(&address_uri("alice", 100)).to_request(),
        test::TestRequest::get().uri("/v1/auth").to_request(),
    ] {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.code, 501);
        assert_eq!(body.message, "Method not implemented");
    }
}

#[actix_web::test]
async fn pretty_json_when_enabled() {
    let resolver = Arc::new(StubResolver::default());
    let tokens =
        TokenService::new(b"pretty", SigningAlgorithm::HS384, chrono::Duration::seconds(60))
            .unwrap();
    let app_state = AppStateBuilder::new()
        .registry(Arc::new(MemoryStore::new()))
        .resolver(resolver)
        .token_service(Arc::new(tokens))
        .build()
        .unwrap();
    let state = web::Data::new(WebState::new(app_state).with_pretty_json(true));
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/v1/domains")
        .set_json(json!({ "domain": DOMAIN }))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("\n  \"domain\""));
}

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use mongodb::bson::oid::ObjectId;
use serde_json::Value;

use social_feed::AppState;
use social_feed::middleware::auth::TokenVerifier;
use social_feed::post::post_service::PostService;
use social_feed::post::post_store::MemoryPostStore;
use social_feed::user::model::UserProfile;
use social_feed::user::store::MemoryUserStore;

pub const SECRET: &str = "integration-secret";

pub struct TestUser {
    pub id: ObjectId,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token))
    }
}

pub struct TestApp {
    pub state: AppState,
    pub ada: TestUser,
    pub bob: TestUser,
}

pub async fn setup() -> TestApp {
    let users = Arc::new(MemoryUserStore::new());
    let verifier = TokenVerifier::new(SECRET, 1);

    let mut issued = Vec::new();
    for name in ["ada", "bob"] {
        let id = ObjectId::new();
        users
            .insert(UserProfile {
                id,
                name: name.to_string(),
                avatar: format!("//www.gravatar.com/avatar/{}", name),
            })
            .await;
        let token = verifier.issue(&id).expect("token");
        issued.push(TestUser { id, token });
    }
    let bob = issued.pop().expect("bob");
    let ada = issued.pop().expect("ada");

    let service = PostService::new(Arc::new(MemoryPostStore::new()), users);

    TestApp {
        state: AppState::new(service, verifier),
        ada,
        bob,
    }
}

/// ObjectIds serialize to JSON as `{ "$oid": "<hex>" }`.
pub fn oid(value: &Value) -> String {
    value["$oid"].as_str().expect("object id").to_string()
}

/// Calls the service and returns the status with the decoded JSON body (`Null` if empty).
pub async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

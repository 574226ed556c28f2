use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use studybuddy_backend::config::Prompts;
use studybuddy_backend::errors::GatewayError;
use studybuddy_backend::gateway::ModelGateway;
use studybuddy_backend::{build_router, AppState};

/// Replays canned replies in order and remembers every prompt it was sent.
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(replies: Vec<Result<String, GatewayError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GatewayError::EmptyResponse))
    }
}

pub fn app(gateway: Arc<ScriptedGateway>) -> Router {
    build_router(Arc::new(AppState::with_gateway(gateway, Prompts::default())))
}

pub fn app_with_ttl(gateway: Arc<ScriptedGateway>, ttl: Duration) -> Router {
    build_router(Arc::new(AppState::with_gateway(gateway, Prompts::default()).with_session_ttl(ttl)))
}

/// Ten photosynthesis questions; the correct answer is always the first option.
pub fn photosynthesis_questions() -> Vec<Value> {
    let rows: [(&str, [&str; 4]); 10] = [
        ("Which pigment absorbs light in plants?", ["Chlorophyll", "Melanin", "Hemoglobin", "Keratin"]),
        ("Which gas do plants take in for photosynthesis?", ["Carbon dioxide", "Oxygen", "Nitrogen", "Helium"]),
        ("Where do the light reactions happen?", ["Thylakoid membrane", "Stroma", "Nucleus", "Cell wall"]),
        ("What is released as a by-product?", ["Oxygen", "Methane", "Ammonia", "Carbon monoxide"]),
        ("What is the name of the carbon-fixing cycle?", ["Calvin cycle", "Krebs cycle", "Urea cycle", "Cori cycle"]),
        ("Which enzyme fixes CO2 in the Calvin cycle?", ["RuBisCO", "Amylase", "Lipase", "Pepsin"]),
        ("Which organelle hosts photosynthesis?", ["Chloroplast", "Mitochondrion", "Ribosome", "Lysosome"]),
        ("What sugar is the main product?", ["Glucose", "Lactose", "Sucrose", "Maltose"]),
        ("What molecule is split to supply electrons?", ["Water", "Glucose", "ATP", "NADPH"]),
        ("Which energy carrier is made in the light reactions?", ["ATP", "DNA", "RNA", "Cholesterol"]),
    ];
    rows.iter()
        .map(|(q, opts)| json!({ "question": q, "options": opts, "answer": opts[0] }))
        .collect()
}

pub fn fenced(questions: &[Value]) -> String {
    format!(
        "Here is your quiz:\n```json\n{}\n```",
        json!({ "questions": questions })
    )
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(req.body(body).expect("request build should succeed"))
        .await
        .expect("router should respond");

    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be JSON")
    };
    (status, value)
}

/// Creates a session and returns its id.
pub async fn new_session(app: &Router) -> String {
    let (status, body) = send(app, Method::POST, "/api/v1/quiz/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["session"]["phase"], "empty");
    body["sessionId"].as_str().expect("sessionId").to_string()
}

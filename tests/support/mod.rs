//! Scripted in-process HTTP backend shared by the behavior tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tickerlens_core::{ApiClient, HttpClient, HttpError, HttpRequest, HttpResponse};

pub const BASE_URL: &str = "http://backend.test/api/v1";

/// One scripted outcome for a route.
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(HttpResponse),
    Fail(HttpError),
}

#[derive(Debug)]
struct Route {
    fragment: String,
    delay: Duration,
    replies: VecDeque<Reply>,
}

/// Fake backend. A request is answered by the route with the longest URL
/// fragment it contains; each route replays its queue and then repeats the
/// last reply. Unmatched requests get a 404.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, fragment: &str, replies: Vec<Reply>) {
        self.route_with_delay(fragment, Duration::ZERO, replies);
    }

    pub fn route_with_delay(&self, fragment: &str, delay: Duration, replies: Vec<Reply>) {
        self.routes.lock().expect("routes lock").push(Route {
            fragment: fragment.to_owned(),
            delay,
            replies: replies.into(),
        });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn count(&self, fragment: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.url.contains(fragment))
            .count()
    }

    fn next_reply(&self, url: &str) -> (Duration, Reply) {
        let mut routes = self.routes.lock().expect("routes lock");
        let route = routes
            .iter_mut()
            .filter(|route| url.contains(&route.fragment))
            .max_by_key(|route| route.fragment.len());

        match route {
            Some(route) => {
                let reply = if route.replies.len() > 1 {
                    route.replies.pop_front()
                } else {
                    route.replies.front().cloned()
                };
                let reply = reply.unwrap_or_else(|| Reply::Respond(HttpResponse::new(404, "")));
                (route.delay, reply)
            }
            None => (
                Duration::ZERO,
                Reply::Respond(HttpResponse::new(404, r#"{"detail": "Not Found"}"#)),
            ),
        }
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            self.requests
                .lock()
                .expect("requests lock")
                .push(request.clone());
            let (delay, reply) = self.next_reply(&request.url);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match reply {
                Reply::Respond(response) => Ok(response),
                Reply::Fail(error) => Err(error),
            }
        })
    }
}

pub fn api(http: &Arc<ScriptedHttpClient>) -> ApiClient {
    ApiClient::new(http.clone(), BASE_URL)
}

pub fn ok(data: Value) -> Reply {
    Reply::Respond(HttpResponse::ok_json(
        json!({ "status": "success", "data": data }).to_string(),
    ))
}

pub fn status(code: u16, body: Value) -> Reply {
    Reply::Respond(HttpResponse::new(code, body.to_string()))
}

pub fn search_body(tickers: &[&str]) -> Value {
    let results = tickers
        .iter()
        .map(|ticker| json!({ "ticker": ticker, "name": format!("{ticker} Corp"), "score": 0.9 }))
        .collect::<Vec<_>>();
    json!({ "results": results, "total": tickers.len() })
}

pub fn suggestions_body(texts: &[&str]) -> Value {
    json!({ "suggestions": texts })
}

//! Scripted [`Transport`] for exercising the Horizon client without a network.
//!
//! Routes are matched by URL fragments in registration order: the first
//! route whose fragments all occur in the requested URL answers. Unmatched
//! URLs get a 404 status error. Every request is logged.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::adapter::horizon::Transport;
use crate::error::{Error, Result};

enum Reply {
    Body(String),
    Status(u16),
    Failure(String),
}

struct Route {
    fragments: Vec<String>,
    reply: Reply,
}

impl Route {
    fn matches(&self, url: &str) -> bool {
        self.fragments.iter().all(|fragment| url.contains(fragment))
    }
}

/// Canned HTTP responses keyed by URL fragments.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs containing `fragment` with `body`.
    pub fn route(self, fragment: &str, body: impl Into<String>) -> Self {
        self.route_all(&[fragment], body)
    }

    /// Answer URLs containing every one of `fragments` with `body`.
    pub fn route_all(self, fragments: &[&str], body: impl Into<String>) -> Self {
        self.push(fragments, Reply::Body(body.into()))
    }

    /// Answer URLs containing `fragment` with a non-success `status`.
    pub fn status(self, fragment: &str, status: u16) -> Self {
        self.push(&[fragment], Reply::Status(status))
    }

    /// Fail URLs containing `fragment` as if the connection broke.
    pub fn fail(self, fragment: &str, message: &str) -> Self {
        self.push(&[fragment], Reply::Failure(message.to_string()))
    }

    fn push(mut self, fragments: &[&str], reply: Reply) -> Self {
        self.routes.push(Route {
            fragments: fragments.iter().map(|f| (*f).to_string()).collect(),
            reply,
        });
        self
    }

    /// Every requested URL, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests whose URL contains `fragment`.
    pub fn count_matching(&self, fragment: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.contains(fragment))
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());

        let Some(route) = self.routes.iter().find(|route| route.matches(url)) else {
            return Err(Error::Status {
                status: 404,
                url: url.to_string(),
            });
        };
        match &route.reply {
            Reply::Body(body) => Ok(body.clone()),
            Reply::Status(status) => Err(Error::Status {
                status: *status,
                url: url.to_string(),
            }),
            Reply::Failure(message) => Err(Error::Transport(message.clone())),
        }
    }
}

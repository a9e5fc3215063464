//! BDD test world for the homework bot

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use cucumber::World;
use homework_bot::engine::TickOutcome;
use homework_bot::io::{HttpClient, HttpResponse};
use homework_bot::{HomeworkBot, HomeworkBotError};

/// Stands in for both the review API (GET) and Telegram (POST)
#[derive(Debug, Default)]
pub struct FakeHttp {
    pub api_script: Mutex<VecDeque<homework_bot::Result<HttpResponse>>>,
    pub requested_from: Mutex<Vec<String>>,
    pub sent_texts: Mutex<Vec<String>>,
    pub telegram_failing: Mutex<bool>,
}

impl FakeHttp {
    pub fn push_api(&self, response: homework_bot::Result<HttpResponse>) {
        self.api_script.lock().unwrap().push_back(response);
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent_texts.lock().unwrap().clone()
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested_from.lock().unwrap().clone()
    }
}

fn param<'a>(params: &[(&str, &'a str)], name: &str) -> Option<&'a str> {
    params.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
}

#[async_trait::async_trait]
impl HttpClient for FakeHttp {
    async fn get(
        &self,
        _url: &str,
        _headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> homework_bot::Result<HttpResponse> {
        let from_date = param(query, "from_date").unwrap_or_default().to_string();
        self.requested_from.lock().unwrap().push(from_date.clone());

        self.api_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(HttpResponse {
                    status: 200,
                    reason: "OK".to_string(),
                    body: format!(r#"{{"homeworks": [], "current_date": {}}}"#, from_date),
                })
            })
    }

    async fn post_form(
        &self,
        _url: &str,
        params: &[(&str, &str)],
    ) -> homework_bot::Result<HttpResponse> {
        if *self.telegram_failing.lock().unwrap() {
            return Err(HomeworkBotError::Transport("connection reset".to_string()));
        }
        let text = param(params, "text").unwrap_or_default().to_string();
        self.sent_texts.lock().unwrap().push(text);
        Ok(HttpResponse {
            status: 200,
            reason: "OK".to_string(),
            body: r#"{"ok":true,"result":{"message_id":1}}"#.to_string(),
        })
    }
}

#[derive(Debug, Default, World)]
pub struct HomeworkBotWorld {
    pub http: Arc<FakeHttp>,
    pub env: HashMap<String, String>,
    pub bot: Option<HomeworkBot>,
    pub build_error: Option<HomeworkBotError>,
    pub outcomes: Vec<TickOutcome>,
}

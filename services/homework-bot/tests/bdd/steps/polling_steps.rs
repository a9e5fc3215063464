//! BDD step definitions for the polling feature

use cucumber::{given, then, when};

use homework_bot::io::HttpResponse;
use homework_bot::verdict::HomeworkStatus;
use homework_bot::HomeworkBotError;

use crate::steps::startup_steps::build_bot;
use crate::world::HomeworkBotWorld;

fn ok(body: String) -> homework_bot::Result<HttpResponse> {
    Ok(HttpResponse {
        status: 200,
        reason: "OK".to_string(),
        body,
    })
}

fn message(world: &HomeworkBotWorld, index: usize) -> String {
    let sent = world.http.sent();
    sent.get(index - 1)
        .cloned()
        .unwrap_or_else(|| panic!("message {} not sent, got {:?}", index, sent))
}

#[given(expr = "the bot started at {int} with a retry period of {int} seconds")]
fn bot_started(world: &mut HomeworkBotWorld, start: i64, retry_period: u64) {
    build_bot(world, start, retry_period);
    assert!(
        world.build_error.is_none(),
        "build failed: {:?}",
        world.build_error
    );
}

#[given(expr = "the API reports no homeworks at {int}")]
fn api_reports_empty(world: &mut HomeworkBotWorld, date: i64) {
    world.http.push_api(ok(format!(
        r#"{{"homeworks": [], "current_date": {}}}"#,
        date
    )));
}

#[given(expr = "the API reports {string} as {string} at {int}")]
fn api_reports_status(world: &mut HomeworkBotWorld, name: String, status: String, date: i64) {
    let body = serde_json::json!({
        "homeworks": [{"homework_name": name, "status": status}],
        "current_date": date
    });
    world.http.push_api(ok(body.to_string()));
}

#[given(expr = "the API responds with status {int} {string} and body {string}")]
fn api_responds_status(world: &mut HomeworkBotWorld, status: u16, reason: String, body: String) {
    world.http.push_api(Ok(HttpResponse {
        status,
        reason,
        body,
    }));
}

#[given(expr = "the API returns the body {string}")]
fn api_returns_body(world: &mut HomeworkBotWorld, body: String) {
    world.http.push_api(ok(body));
}

#[given("the API reports homeworks without a current date")]
fn api_omits_current_date(world: &mut HomeworkBotWorld) {
    world.http.push_api(ok(r#"{"homeworks": []}"#.to_string()));
}

#[given("the API is unreachable")]
fn api_unreachable(world: &mut HomeworkBotWorld) {
    world.http.push_api(Err(HomeworkBotError::Transport(
        "connection refused".to_string(),
    )));
}

#[given("Telegram is failing")]
fn telegram_failing(world: &mut HomeworkBotWorld) {
    *world.http.telegram_failing.lock().unwrap() = true;
}

#[when("Telegram recovers")]
fn telegram_recovers(world: &mut HomeworkBotWorld) {
    *world.http.telegram_failing.lock().unwrap() = false;
}

#[when(expr = "the bot polls {int} time(s)")]
async fn bot_polls(world: &mut HomeworkBotWorld, times: usize) {
    let bot = world.bot.as_mut().expect("bot not built");
    for _ in 0..times {
        let outcome = bot.engine_mut().tick().await;
        world.outcomes.push(outcome);
    }
}

#[then(expr = "{int} message(s) should have been sent")]
fn messages_sent(world: &mut HomeworkBotWorld, count: usize) {
    let sent = world.http.sent();
    assert_eq!(sent.len(), count, "sent: {:?}", sent);
}

#[then(expr = "message {int} should be the {string} verdict for {string}")]
fn message_is_verdict(world: &mut HomeworkBotWorld, index: usize, status: String, name: String) {
    let status: HomeworkStatus = status.parse().expect("unknown status in feature");
    let expected = format!(
        "Changed status of check for \"{}\". {}",
        name,
        status.verdict()
    );
    assert_eq!(message(world, index), expected);
}

#[then(expr = "message {int} should start with {string}")]
fn message_starts_with(world: &mut HomeworkBotWorld, index: usize, prefix: String) {
    let text = message(world, index);
    assert!(text.starts_with(&prefix), "{text}");
}

#[then(expr = "message {int} should contain {string}")]
fn message_contains(world: &mut HomeworkBotWorld, index: usize, fragment: String) {
    let text = message(world, index);
    assert!(text.contains(&fragment), "{text}");
}

#[then(expr = "message {int} should be {string}")]
fn message_equals(world: &mut HomeworkBotWorld, index: usize, expected: String) {
    assert_eq!(message(world, index), expected);
}

#[then(expr = "the API should have been asked from {string}")]
fn cursors_requested(world: &mut HomeworkBotWorld, expected: String) {
    let expected: Vec<String> = expected.split(',').map(|s| s.trim().to_string()).collect();
    assert_eq!(world.http.requested(), expected);
}

#[then(expr = "the cursor should be {int}")]
fn cursor_is(world: &mut HomeworkBotWorld, cursor: i64) {
    let bot = world.bot.as_ref().expect("bot not built");
    assert_eq!(bot.engine().state().cursor, cursor);
}

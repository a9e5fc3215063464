//! BDD step definitions for the startup credential check

use cucumber::{given, then, when};

use homework_bot::config::{PRACTICUM_TOKEN_VAR, TELEGRAM_CHAT_ID_VAR, TELEGRAM_TOKEN_VAR};
use homework_bot::{Config, HomeworkBotBuilder, HomeworkBotError};

use crate::world::HomeworkBotWorld;

/// Build the bot from the world's environment, keeping the fake HTTP client
pub fn build_bot(world: &mut HomeworkBotWorld, start: i64, retry_period: u64) {
    let mut config = Config::default();
    config.polling.retry_period_seconds = retry_period;
    config.logging.file = None;
    let env = world.env.clone();
    config.resolve_secrets_from(|name| env.get(name).cloned());

    match HomeworkBotBuilder::new(config)
        .with_http_client(world.http.clone())
        .with_start_time(start)
        .build()
    {
        Ok(bot) => world.bot = Some(bot),
        Err(e) => world.build_error = Some(e),
    }
}

#[given("a bot configured with all credentials")]
fn all_credentials(world: &mut HomeworkBotWorld) {
    for (name, value) in [
        (PRACTICUM_TOKEN_VAR, "practicum-token"),
        (TELEGRAM_TOKEN_VAR, "123:telegram-token"),
        (TELEGRAM_CHAT_ID_VAR, "4242"),
    ] {
        world.env.insert(name.to_string(), value.to_string());
    }
}

#[given(expr = "the {word} variable is empty")]
fn variable_empty(world: &mut HomeworkBotWorld, name: String) {
    world.env.insert(name, String::new());
}

#[when("the bot is built")]
fn bot_is_built(world: &mut HomeworkBotWorld) {
    build_bot(world, 10_000, 600);
}

#[then(expr = "building should fail naming {word}")]
fn building_fails(world: &mut HomeworkBotWorld, name: String) {
    assert!(world.bot.is_none(), "bot was built unexpectedly");
    let err = world.build_error.as_ref().expect("no build error recorded");
    assert!(
        matches!(err, HomeworkBotError::Config(msg) if msg.contains(&name)),
        "unexpected error: {err}"
    );
}

#[then("building should succeed")]
fn building_succeeds(world: &mut HomeworkBotWorld) {
    assert!(
        world.build_error.is_none(),
        "build failed: {:?}",
        world.build_error
    );
    assert!(world.bot.is_some());
}

#[then("no request should have been made")]
fn no_requests(world: &mut HomeworkBotWorld) {
    assert!(world.http.requested().is_empty());
    assert!(world.http.sent().is_empty());
}

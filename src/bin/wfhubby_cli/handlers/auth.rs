#![deny(clippy::all, clippy::pedantic)]

use serde_json::json;

use crate::args::AuthCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: AuthCmd) -> Result<(), CliError> {
    match cmd {
        AuthCmd::Login { username, password } => login(ctx, &username, &password).await,
        AuthCmd::Logout => logout(ctx).await,
        AuthCmd::Status => status(ctx),
    }
}

async fn login(ctx: &Ctx, username: &str, password: &str) -> Result<(), CliError> {
    let response = ctx.api.login(username, password).await?;
    print_json(&json!({
        "authenticated": ctx.api.is_authenticated(),
        "token_type": response.token_type,
        "session_file": ctx.settings.session.token_file,
    }))
}

async fn logout(ctx: &Ctx) -> Result<(), CliError> {
    ctx.api.logout().await?;
    print_json(&json!({ "authenticated": false }))
}

fn status(ctx: &Ctx) -> Result<(), CliError> {
    print_json(&json!({
        "authenticated": ctx.api.is_authenticated(),
        "api": ctx.api.endpoint(&[]).as_str(),
    }))
}

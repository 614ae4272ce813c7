#![deny(clippy::all, clippy::pedantic)]

use std::path::Path;

use serde_json::json;
use wfhubby::domain::draft::ImageUpload;

use crate::args::UploadsCmd;
use crate::client::{CliError, Ctx};
use crate::io::{file_name, read_bytes};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: UploadsCmd) -> Result<(), CliError> {
    match cmd {
        UploadsCmd::Image { file } => image(ctx, &file).await,
    }
}

async fn image(ctx: &Ctx, file: &Path) -> Result<(), CliError> {
    let upload = ImageUpload::from_bytes(file_name(file)?, read_bytes(file)?);
    let url = ctx.admin().upload_cover(upload).await?;
    print_json(&json!({ "url": url }))
}

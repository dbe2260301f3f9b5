#[macro_use]
extern crate log;

use std::sync::Arc;

use anyhow::Result;
use structopt::StructOpt;

use firemap::{App, Flags};

#[tokio::main]
async fn main() -> Result<()> {
    fireutil::logger::setup();
    let flags = Flags::from_args();

    let app = App::load(&flags)?;
    info!("Allowing requests from {}", app.cors_origin);
    firemap::serve(Arc::new(app), flags.addr()).await
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! `OrdoPlay` dope sheet dump tool
//!
//! Loads a dope sheet description (RON), builds the summary keylist and one
//! keylist per channel, and prints their key columns:
//!
//! ```text
//! ordoplay_dopesheet scene.dopesheet.ron [keylist_settings.ron]
//! ```
//!
//! A settings file, when given, replaces the document's own settings.

mod document;
mod report;

use document::DopeSheet;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn run(path: PathBuf, settings: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let mut sheet = DopeSheet::load(&path)?;
    if let Some(settings) = settings {
        sheet = sheet.with_settings_file(&settings)?;
    }

    let summary = sheet.summary()?;
    print!("{}", report::format_keylist("Summary", &summary)?);

    for channel in &sheet.channels {
        let keylist = sheet.channel(channel)?;
        print!("{}", report::format_keylist(channel.name(), &keylist)?);
    }
    Ok(())
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("ordoplay_editor_dopesheet=info".parse().unwrap());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let Some(path) = args.next() else {
        eprintln!("usage: ordoplay_dopesheet <dopesheet.ron> [keylist_settings.ron]");
        std::process::exit(2);
    };

    tracing::info!("Starting OrdoPlay dope sheet dump v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(path, args.next()) {
        tracing::error!("Dope sheet dump failed: {e}");
        std::process::exit(1);
    }
}

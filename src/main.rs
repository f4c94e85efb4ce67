mod app;
mod audio;
mod catalog;
mod config;
mod error;
mod i18n;
mod mpris;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()?;
    Ok(())
}

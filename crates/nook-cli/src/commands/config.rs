use crate::ConfigAction;
use anyhow::{Context, Result};
use nook_infrastructure::{ConfigService, NookPaths};

pub fn run(paths: &NookPaths, action: &ConfigAction) -> Result<()> {
    let service = ConfigService::new(paths.clone());

    match action {
        ConfigAction::Show => {
            let config = service.load().context("Failed to load configuration")?;
            println!("api_base_url = {}", config.base_url());
            println!("page_size = {}", config.page_size);
            println!("request_timeout_secs = {}", config.request_timeout_secs);
            match &config.token_file {
                Some(path) => println!("token_file = {}", path.display()),
                None => {
                    let path = paths.session_file()?;
                    println!("token_file = {} (default)", path.display());
                }
            }
        }
        ConfigAction::Init { api_url, page_size } => {
            let mut config = service
                .load_file()
                .context("Failed to read existing configuration")?
                .unwrap_or_default();
            config.api_base_url = api_url.clone();
            if let Some(size) = page_size {
                config.page_size = *size;
            }
            let path = service.save(&config)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

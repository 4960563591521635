use std::env;
use std::path::PathBuf;

use navconfig::Settings;
use navcovers::{CoverResolver, CoverStore, ImgurUploader};
use navrpc::poll::PollLoop;
use navrpc::presence::DiscordPresence;
use navsubsonic::SubsonicClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Seul argument accepté : un chemin explicite vers config.yaml
    let config_path = env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load_default(config_path.as_deref())?;

    let client = SubsonicClient::new(&settings.navidrome)?;

    let store = CoverStore::load(settings.cache_file_path());
    info!(entries = store.len(), "Cover cache ready");
    let uploader = ImgurUploader::new(settings.integration.imgur_client_id.clone())?;
    let covers = CoverResolver::new(
        &client,
        store,
        uploader,
        settings.image.clone(),
        settings.integration.discord_asset_name.clone(),
    );

    // Sans client Discord joignable, autant s'arrêter tout de suite
    let presence = DiscordPresence::connect(&settings.integration.discord_client_id)?;

    info!(
        server = %settings.navidrome.base_url,
        interval = ?settings.poll_interval(),
        "NavRPC started"
    );

    PollLoop::new(
        &client,
        covers,
        presence,
        settings.general.strip_title_suffixes,
    )
    .run(settings.poll_interval());

    Ok(())
}

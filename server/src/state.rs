use std::sync::Arc;

use crate::{
    cache::{AssetCacheManager, FsOrigin},
    config::Config,
    mail::{Mailer, SmtpMailer},
};

pub struct AppState {
    pub config: Config,
    pub mailer: Arc<dyn Mailer>,
    pub assets: AssetCacheManager,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let mailer = SmtpMailer::from_config(&config).expect("SMTP transport misconfigured!");
        mailer.verify().await;

        let assets = AssetCacheManager::new(Arc::new(FsOrigin::new(&config.site_dir)));
        assets.install().await.expect("Static assets misconfigured!");
        assets.activate();

        Arc::new(Self {
            config,
            mailer: Arc::new(mailer),
            assets,
        })
    }
}

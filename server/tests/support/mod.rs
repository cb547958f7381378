use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sachiva::{
    cache::{AssetCacheManager, FsOrigin},
    config::Config,
    mail::{ComposedMessage, MailError, Mailer},
    router,
    state::AppState,
};
use tempfile::TempDir;

/// Records sends instead of talking to SMTP; optionally fails every send.
pub struct StubMailer {
    fail: bool,
    pub sent: Mutex<Vec<ComposedMessage>>,
}

impl StubMailer {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Mailer for StubMailer {
    async fn send(&self, message: &ComposedMessage) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Smtp("connection refused".to_string()));
        }

        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub fn write_site(dir: &TempDir) {
    let root = dir.path();
    std::fs::write(
        root.join("index.html"),
        "<html><body>Sachiva home</body></html>",
    )
    .unwrap();
    std::fs::write(
        root.join("contact.html"),
        "<html><body>Sachiva contact</body></html>",
    )
    .unwrap();
    std::fs::create_dir_all(root.join("css")).unwrap();
    std::fs::write(root.join("css/style.min.css"), "body{color:#333}").unwrap();
    std::fs::create_dir_all(root.join("js")).unwrap();
    std::fs::write(root.join("js/custom.min.js"), "/* noop */").unwrap();
}

pub struct TestApp {
    pub address: String,
    pub mailer: Arc<StubMailer>,
    _site: TempDir,
}

/// Boot the real router on an ephemeral port with a stub mailer and a
/// freshly installed asset cache over a temporary site directory.
pub async fn spawn_app(fail_mail: bool) -> TestApp {
    let site = tempfile::tempdir().unwrap();
    write_site(&site);

    let mailer = Arc::new(StubMailer::new(fail_mail));

    let assets = AssetCacheManager::new(Arc::new(FsOrigin::new(site.path())));
    assets.install().await.unwrap();
    assets.activate();

    let state = Arc::new(AppState {
        config: Config {
            port: 0,
            mail_user: "owner@example.com".to_string(),
            mail_password: "app-password".to_string(),
            site_dir: site.path().to_path_buf(),
        },
        mailer: mailer.clone(),
        assets,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    TestApp {
        address,
        mailer,
        _site: site,
    }
}

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::{
    accounts::repo::{PgUserRepo, UserRepo},
    auth::JwtKeys,
    config::AppConfig,
    db,
    mail::{LogMailer, Mailer, SmtpMailer},
    tasks::repo::{PgTaskRepo, TaskRepo},
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub users: Arc<dyn UserRepo>,
    pub tasks: Arc<dyn TaskRepo>,
    pub mailer: Arc<dyn Mailer>,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config).await?;

        let mailer = match &config.smtp {
            Some(smtp) => match SmtpMailer::new(smtp) {
                Ok(m) => {
                    info!(host = %smtp.host, port = smtp.port, "smtp mailer configured");
                    Arc::new(m) as Arc<dyn Mailer>
                }
                Err(e) => {
                    warn!(error = %e, "smtp mailer unusable, verification links will only be logged");
                    Arc::new(LogMailer) as Arc<dyn Mailer>
                }
            },
            None => {
                info!("SMTP_HOST not set, verification links will only be logged");
                Arc::new(LogMailer) as Arc<dyn Mailer>
            }
        };

        Ok(Self::from_parts(
            db.clone(),
            config,
            Arc::new(PgUserRepo::new(db.clone())),
            Arc::new(PgTaskRepo::new(db)),
            mailer,
        ))
    }

    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        tasks: Arc<dyn TaskRepo>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            jwt: JwtKeys::new(&config.jwt),
            db,
            config,
            users,
            tasks,
            mailer,
        }
    }
}

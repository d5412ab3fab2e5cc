use std::sync::Arc;
use std::time::Duration;

use crate::auth::repo::UserStore;
use crate::config::AppConfig;
use crate::recognition::{PlateRecognizer, RecognitionClient};
use crate::vehicles::repo::VehicleStore;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub vehicles: Arc<VehicleStore>,
    pub config: Arc<AppConfig>,
    pub recognizer: Arc<dyn RecognitionClient>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let recognizer = Arc::new(PlateRecognizer::new(
            &config.plate_service_base_url,
            Duration::from_secs(config.plate_service_timeout_secs),
        )?) as Arc<dyn RecognitionClient>;
        Ok(Self::from_parts(config, recognizer))
    }

    pub fn from_parts(config: Arc<AppConfig>, recognizer: Arc<dyn RecognitionClient>) -> Self {
        Self {
            users: Arc::new(UserStore::new(&config.admin)),
            vehicles: Arc::new(VehicleStore::new()),
            config,
            recognizer,
        }
    }

    pub fn fake() -> Self {
        use crate::recognition::RecognizeReply;

        Self::fake_with_recognition(Ok(RecognizeReply {
            success: true,
            plate: Some("ABC123".into()),
            message: None,
        }))
    }

    /// Test state with a canned recognition outcome instead of the HTTP
    /// client.
    pub fn fake_with_recognition(
        reply: Result<crate::recognition::RecognizeReply, String>,
    ) -> Self {
        use async_trait::async_trait;
        use bytes::Bytes;

        use crate::config::AdminConfig;
        use crate::recognition::RecognizeReply;

        struct FakeRecognizer {
            reply: Result<RecognizeReply, String>,
        }

        #[async_trait]
        impl RecognitionClient for FakeRecognizer {
            async fn recognize(
                &self,
                _body: Bytes,
                _content_type: &str,
            ) -> anyhow::Result<RecognizeReply> {
                match &self.reply {
                    Ok(reply) => Ok(reply.clone()),
                    Err(message) => Err(anyhow::anyhow!(message.clone())),
                }
            }
        }

        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            admin: AdminConfig {
                enabled: true,
                email: "admin@parallax.local".into(),
                password: "Admin1234!".into(),
            },
            plate_service_base_url: "http://127.0.0.1:9".into(),
            plate_service_timeout_secs: 1,
        });

        Self::from_parts(config, Arc::new(FakeRecognizer { reply }))
    }
}

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

use super::{BoxError, NotificationSink};

/// AWS SES v2 plain-text sender
#[derive(Clone)]
pub struct SesSink {
    ses: SesClient,
    from: String,
}

impl SesSink {
    pub fn new(ses: SesClient, from: String) -> Self {
        Self { ses, from }
    }

    /// Client from the default AWS credential chain; `SES_REGION` overrides the region
    pub async fn from_env(from: String) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let ses = if let Ok(ses_region) = std::env::var("SES_REGION") {
            let ses_config = aws_config
                .to_builder()
                .region(aws_config::Region::new(ses_region))
                .build();
            SesClient::new(&ses_config)
        } else {
            SesClient::new(&aws_config)
        };
        Self::new(ses, from)
    }
}

#[async_trait::async_trait]
impl NotificationSink for SesSink {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), BoxError> {
        let subject = Content::builder().data(subject).build()?;
        let body = Body::builder()
            .text(Content::builder().data(body).build()?)
            .build();

        let message = Message::builder().subject(subject).body(body).build();

        self.ses
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await?;

        tracing::info!(to = to, "Receipt email sent");
        Ok(())
    }
}

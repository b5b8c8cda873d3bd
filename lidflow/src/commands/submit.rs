use anyhow::bail;
use clap::Args;
use lidflow_client::{ContactFormValues, SubmissionState};
use lidflow_config::Config;
use url::Url;

use crate::environment::{ConfigProvider, Provider};

/// Submit the contact form like a visitor of the site would
#[derive(Debug, Args)]
pub struct SubmitCommand {
    #[arg(long)]
    name: String,
    /// Email address, messenger handle or phone number
    #[arg(long)]
    contact: String,
    #[arg(long, default_value = "")]
    message: String,
    /// Base url of the site [default: client.base_url of the config]
    #[arg(long)]
    base_url: Option<Url>,
}

impl SubmitCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        let mut config_provider = ConfigProvider::new(&config)?;
        if let Some(base_url) = &self.base_url {
            config_provider =
                config_provider.with_client_base_url(base_url, config.client.timeout.into())?;
        }

        let mut form = Provider::new(config_provider).contact_form()?;
        *form.values_mut() = ContactFormValues {
            name: self.name,
            contact: self.contact,
            message: self.message,
        };

        match form.submit().await {
            SubmissionState::Success => {
                println!("Your request has been sent.");
                Ok(())
            }
            SubmissionState::Error(err) => bail!("{err}"),
            state => bail!("Submission did not settle: {state:?}"),
        }
    }
}

use std::sync::Arc;

use crate::config::Settings;
use crate::form::FormClient;
use crate::translate::ChainState;

/// Process-wide state, read-only after start-up.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub chain: ChainState,
    pub form_client: FormClient,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let chain = ChainState::initialize(&settings);
        Self::with_chain(settings, chain)
    }

    pub fn with_chain(settings: Settings, chain: ChainState) -> anyhow::Result<Self> {
        let form_client = FormClient::new(settings.form_api_url())?;
        Ok(Self {
            settings: Arc::new(settings),
            chain,
            form_client,
        })
    }
}

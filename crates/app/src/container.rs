//! Dependency container
//!
//! Builds the object graph on first use and hands out shared handles
//! afterwards. Each component is constructed at most once per process.

use micswitch_core::application::{ListSourcesUseCase, SwitchSourceUseCase};
use micswitch_core::domain::audio::{AudioSystemClient, Result};
use micswitch_core::domain::config::Config;
use std::sync::{Arc, OnceLock};

use crate::presentation::launcher::LauncherPresenter;

type ClientFactory = Box<dyn Fn(&Config) -> Result<Arc<dyn AudioSystemClient>> + Send + Sync>;

pub struct Container {
    config: Config,
    client_factory: ClientFactory,
    audio_client: OnceLock<Arc<dyn AudioSystemClient>>,
    list_use_case: OnceLock<Arc<ListSourcesUseCase>>,
    switch_use_case: OnceLock<Arc<SwitchSourceUseCase>>,
    presenter: OnceLock<Arc<LauncherPresenter>>,
}

impl Container {
    /// Container using the platform's audio client
    pub fn new(config: Config) -> Self {
        Self::with_client_factory(config, micswitch_infra::audio_client)
    }

    /// Container around an already built client
    pub fn with_client(config: Config, client: Arc<dyn AudioSystemClient>) -> Self {
        Self::with_client_factory(config, move |_| Ok(client.clone()))
    }

    pub fn with_client_factory<F>(config: Config, factory: F) -> Self
    where
        F: Fn(&Config) -> Result<Arc<dyn AudioSystemClient>> + Send + Sync + 'static,
    {
        Self {
            config,
            client_factory: Box::new(factory),
            audio_client: OnceLock::new(),
            list_use_case: OnceLock::new(),
            switch_use_case: OnceLock::new(),
            presenter: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fails when the platform has no usable client
    pub fn audio_client(&self) -> Result<Arc<dyn AudioSystemClient>> {
        if let Some(client) = self.audio_client.get() {
            return Ok(client.clone());
        }
        let client = (self.client_factory)(&self.config)?;
        Ok(self.audio_client.get_or_init(|| client).clone())
    }

    pub fn list_sources_use_case(&self) -> Result<Arc<ListSourcesUseCase>> {
        if let Some(use_case) = self.list_use_case.get() {
            return Ok(use_case.clone());
        }
        let use_case = Arc::new(ListSourcesUseCase::new(self.audio_client()?));
        Ok(self.list_use_case.get_or_init(|| use_case).clone())
    }

    pub fn switch_source_use_case(&self) -> Result<Arc<SwitchSourceUseCase>> {
        if let Some(use_case) = self.switch_use_case.get() {
            return Ok(use_case.clone());
        }
        let use_case = Arc::new(SwitchSourceUseCase::new(self.audio_client()?));
        Ok(self.switch_use_case.get_or_init(|| use_case).clone())
    }

    pub fn presenter(&self) -> Result<Arc<LauncherPresenter>> {
        if let Some(presenter) = self.presenter.get() {
            return Ok(presenter.clone());
        }
        let presenter = Arc::new(LauncherPresenter::new(
            self.list_sources_use_case()?,
            self.config.max_sources_display(),
            self.config.notification_expire_time(),
        ));
        Ok(self.presenter.get_or_init(|| presenter).clone())
    }
}

//! Export configuration
//!
//! Settings come from the environment (see [`ExportConfig::from_env`]) or
//! from [`ExportConfig::builder`]; there are no command-line flags.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Collection datasets are uploaded to unless configured otherwise.
pub const DEFAULT_COLLECTION: &str = "playground";

/// Linking template file name, relative to the repository root.
pub const DEFAULT_LINKING_TEMPLATE: &str = "linking_template.yaml";

/// Environment variable names read by [`ExportConfig::from_env`].
pub mod env {
    /// Base URL of the Dataverse installation
    pub const URL: &str = "DATAVERSE_URL";
    /// API token sent as `X-Dataverse-key`
    pub const API_TOKEN: &str = "DATAVERSE_API_TOKEN";
    /// Target collection alias
    pub const COLLECTION: &str = "DATAVERSE_COLLECTION";
    /// Location of the remote data model contract
    pub const SCHEMA_URL: &str = "DVC_SCHEMA_URL";
    /// Citation author name
    pub const AUTHOR: &str = "DATAVERSE_AUTHOR";
    /// Citation contact email
    pub const CONTACT_EMAIL: &str = "DATAVERSE_CONTACT_EMAIL";
}

/// Runtime settings of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    repo_root: PathBuf,
    server_url: Option<String>,
    api_token: Option<String>,
    collection: String,
    schema_url: Option<String>,
    linking_template: PathBuf,
    author: Option<String>,
    contact_email: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ExportConfig {
    /// Create a builder with defaults: repository `.`, collection
    /// `playground`, no credentials.
    #[must_use]
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder::default()
    }

    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut builder = Self::builder();
        if let Some(url) = get(env::URL) {
            builder = builder.server_url(url);
        }
        if let Some(token) = get(env::API_TOKEN) {
            builder = builder.api_token(token);
        }
        if let Some(collection) = get(env::COLLECTION) {
            builder = builder.collection(collection);
        }
        if let Some(schema_url) = get(env::SCHEMA_URL) {
            builder = builder.schema_url(schema_url);
        }
        if let Some(author) = get(env::AUTHOR) {
            builder = builder.author(author);
        }
        if let Some(email) = get(env::CONTACT_EMAIL) {
            builder = builder.contact_email(email);
        }
        builder.build()
    }

    /// Get the repository root.
    #[must_use]
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Get the target collection alias.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Get the remote data model contract URL, if configured.
    #[must_use]
    pub fn schema_url(&self) -> Option<&str> {
        self.schema_url.as_deref()
    }

    /// Get the linking template path, resolved against the repository root.
    #[must_use]
    pub fn linking_template(&self) -> PathBuf {
        self.repo_root.join(&self.linking_template)
    }

    /// Get the citation author, if configured.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Get the citation contact email, if configured.
    #[must_use]
    pub fn contact_email(&self) -> Option<&str> {
        self.contact_email.as_deref()
    }

    /// Get the server URL and API token.
    ///
    /// # Errors
    ///
    /// `Error::Config` naming the first missing setting.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let url = self
            .server_url
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{} is not set", env::URL)))?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "{} must be an http(s) URL, got '{url}'",
                env::URL
            )));
        }
        let token = self
            .api_token
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{} is not set", env::API_TOKEN)))?;
        Ok((url, token))
    }
}

/// Builder for `ExportConfig`.
#[derive(Debug, Clone)]
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl Default for ExportConfigBuilder {
    fn default() -> Self {
        Self {
            config: ExportConfig {
                repo_root: PathBuf::from("."),
                server_url: None,
                api_token: None,
                collection: DEFAULT_COLLECTION.to_string(),
                schema_url: None,
                linking_template: PathBuf::from(DEFAULT_LINKING_TEMPLATE),
                author: None,
                contact_email: None,
            },
        }
    }
}

impl ExportConfigBuilder {
    /// Set the repository root.
    #[must_use]
    pub fn repo_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.repo_root = root.into();
        self
    }

    /// Set the Dataverse base URL.
    #[must_use]
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.config.server_url = Some(url.into());
        self
    }

    /// Set the API token.
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.config.api_token = Some(token.into());
        self
    }

    /// Set the target collection alias.
    #[must_use]
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.config.collection = collection.into();
        self
    }

    /// Set the remote data model contract URL.
    #[must_use]
    pub fn schema_url(mut self, url: impl Into<String>) -> Self {
        self.config.schema_url = Some(url.into());
        self
    }

    /// Set the linking template path (relative to the repository root).
    #[must_use]
    pub fn linking_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.linking_template = path.into();
        self
    }

    /// Set the citation author.
    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.config.author = Some(author.into());
        self
    }

    /// Set the citation contact email.
    #[must_use]
    pub fn contact_email(mut self, email: impl Into<String>) -> Self {
        self.config.contact_email = Some(email.into());
        self
    }

    /// Build the `ExportConfig`.
    #[must_use]
    pub fn build(self) -> ExportConfig {
        self.config
    }
}

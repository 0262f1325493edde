use fractic_server_error::ServerError;

use crate::errors::InvalidConfig;

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

/// Binds a data source to one chart of accounts.
///
/// Can be written in RON:
///
/// ```ron
/// (coa_id: "main", channel_capacity: 16)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde_derive::Deserialize)]
pub struct DataSourceConfig {
    pub coa_id: String,
    /// Transactions buffered between the producer and the reader of a stream.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl DataSourceConfig {
    pub fn new(coa_id: impl Into<String>) -> Self {
        Self {
            coa_id: coa_id.into(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn from_ron(s: &str) -> Result<Self, ServerError> {
        let config: DataSourceConfig =
            ron::from_str(s).map_err(|e| InvalidConfig::with_debug("invalid RON", &e))?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<(), ServerError> {
        if self.coa_id.is_empty() {
            return Err(InvalidConfig::new("coa_id must not be empty"));
        }
        if self.channel_capacity == 0 {
            return Err(InvalidConfig::new("channel_capacity must be at least 1"));
        }
        Ok(())
    }
}

use std::sync::Arc;

use common::ledger::LedgerClient;
use common::segment::ProtocolConfig;

use super::config::Config;

/// Main service state - the ledger client and protocol wiring shared by
/// every handler
#[derive(Clone)]
pub struct State {
    ledger: Arc<dyn LedgerClient>,
    proto: ProtocolConfig,
}

impl State {
    pub fn from_config(
        config: &Config,
        ledger: Arc<dyn LedgerClient>,
    ) -> Result<Self, StateSetupError> {
        let proto = config.protocol();
        if proto.chunk_size == 0 {
            return Err(StateSetupError::InvalidChunkSize);
        }
        tracing::info!(
            chunk_size = proto.chunk_size,
            segment_code = %proto.segment_code_hash,
            "service state ready"
        );
        Ok(Self { ledger, proto })
    }

    pub fn ledger(&self) -> &Arc<dyn LedgerClient> {
        &self.ledger
    }

    pub fn protocol(&self) -> &ProtocolConfig {
        &self.proto
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("chunk size must be positive")]
    InvalidChunkSize,
}

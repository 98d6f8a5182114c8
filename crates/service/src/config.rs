use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use common::ledger::{DepKind, Dependency, KeyHashType, OutPoint, H256};
use common::segment::{ProtocolConfig, DEFAULT_CHUNK_SIZE};

#[derive(Debug)]
pub struct Config {
    /// address for the HTTP server to listen on.
    ///  if not set then 0.0.0.0:8080 will be used
    pub listen_addr: Option<SocketAddr>,
    /// chunk size for segment encoding, if not set the
    ///  protocol default is used
    pub chunk_size: Option<usize>,
    /// protocol constants, if not set the well-known
    ///  deployment constants are used
    pub protocol: Option<ProtocolConfig>,

    // misc
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: Some(SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 8080)),
            chunk_size: None,
            protocol: None,
            log_level: tracing::Level::INFO,
        }
    }
}

impl Config {
    /// Resolve the protocol constants this deployment runs against
    pub fn protocol(&self) -> ProtocolConfig {
        let mut proto = self.protocol.clone().unwrap_or_else(well_known_protocol);
        if let Some(chunk_size) = self.chunk_size {
            proto.chunk_size = chunk_size;
        }
        proto
    }
}

/// The deployed derivation and signing module references.
///
/// These are protocol constants published with the on-ledger code, known
/// ahead of time and never computed.
pub fn well_known_protocol() -> ProtocolConfig {
    ProtocolConfig {
        segment_code_hash: H256([0x5e; 32]),
        segment_hash_type: KeyHashType::Data,
        segment_code_dep: Dependency {
            out_point: OutPoint::new(H256([0x5d; 32]), 0),
            dep_kind: DepKind::Code,
        },
        signer_code_dep: Dependency {
            out_point: OutPoint::new(H256([0x5c; 32]), 0),
            dep_kind: DepKind::Group,
        },
        chunk_size: DEFAULT_CHUNK_SIZE,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid chunk size: {0}")]
    InvalidChunkSize(usize),
}

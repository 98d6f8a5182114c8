#![allow(dead_code)]

use common::ledger::{
    DepKind, Dependency, FundingSources, KeyHashType, OutPoint, OwnershipKey, H256,
};
use common::segment::ProtocolConfig;
use common::signer::{SessionCredential, SessionKeyKind};

pub fn proto(chunk_size: usize) -> ProtocolConfig {
    ProtocolConfig {
        segment_code_hash: H256([0xc0; 32]),
        segment_hash_type: KeyHashType::Data,
        segment_code_dep: Dependency {
            out_point: OutPoint::new(H256([0xc1; 32]), 0),
            dep_kind: DepKind::Code,
        },
        signer_code_dep: Dependency {
            out_point: OutPoint::new(H256([0xc2; 32]), 0),
            dep_kind: DepKind::Group,
        },
        chunk_size,
    }
}

pub fn payer_key() -> OwnershipKey {
    OwnershipKey::new(H256([0xaa; 32]), KeyHashType::Code, vec![0x01; 20])
}

pub fn primary_kind() -> OwnershipKey {
    OwnershipKey::new(H256([0xbb; 32]), KeyHashType::Code, vec![0x02; 32])
}

pub fn funding() -> FundingSources {
    FundingSources {
        fee_payer: payer_key(),
        change_to: payer_key(),
    }
}

pub fn delegated_credential(expires_at: u64) -> SessionCredential {
    SessionCredential {
        kind: SessionKeyKind::Delegated,
        expires_at,
    }
}

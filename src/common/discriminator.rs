//! Discriminator registry
//!
//! Every Anchor account and event starts with an 8-byte tag: the first eight
//! bytes of `sha256("<namespace>:<TypeName>")`. The tags for the records this
//! crate understands are computed once into a table indexed by [`RecordType`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::DecodeError;

pub const DISCRIMINATOR_LEN: usize = 8;

pub type Discriminator = [u8; DISCRIMINATOR_LEN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    Global,
    BondingCurve,
    CreateEvent,
    TradeEvent,
    CompleteEvent,
    SetParamsEvent,
}

impl RecordType {
    pub const ALL: [RecordType; 6] = [
        RecordType::Global,
        RecordType::BondingCurve,
        RecordType::CreateEvent,
        RecordType::TradeEvent,
        RecordType::CompleteEvent,
        RecordType::SetParamsEvent,
    ];

    pub const fn namespace(&self) -> &'static str {
        match self {
            RecordType::Global | RecordType::BondingCurve => "account",
            _ => "event",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            RecordType::Global => "Global",
            RecordType::BondingCurve => "BondingCurve",
            RecordType::CreateEvent => "CreateEvent",
            RecordType::TradeEvent => "TradeEvent",
            RecordType::CompleteEvent => "CompleteEvent",
            RecordType::SetParamsEvent => "SetParamsEvent",
        }
    }

    /// Name as hashed by the program, e.g. `account:Global`
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.namespace(), self.name())
    }

    #[inline]
    pub fn discriminator(&self) -> Discriminator {
        DISCRIMINATORS[*self as usize]
    }
}

static DISCRIMINATORS: Lazy<[Discriminator; 6]> =
    Lazy::new(|| RecordType::ALL.map(|record| discriminator_for(&record.qualified_name())));

/// First eight bytes of the SHA-256 digest of `name`
pub fn discriminator_for(name: &str) -> Discriminator {
    let digest = Sha256::digest(name.as_bytes());
    let mut tag = [0u8; DISCRIMINATOR_LEN];
    tag.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    tag
}

/// Leading tag of `buffer`, if it is long enough to carry one
pub fn extract(buffer: &[u8]) -> Option<Discriminator> {
    buffer.get(..DISCRIMINATOR_LEN).and_then(|tag| tag.try_into().ok())
}

/// Whether `buffer` starts with the tag of `record`
pub fn verify(buffer: &[u8], record: RecordType) -> bool {
    extract(buffer) == Some(record.discriminator())
}

/// Like [`verify`] but reports why the buffer was rejected
pub fn require(buffer: &[u8], record: RecordType) -> Result<(), DecodeError> {
    let actual = extract(buffer).ok_or(DecodeError::TooShort {
        expected: DISCRIMINATOR_LEN,
        actual: buffer.len(),
    })?;
    let expected = record.discriminator();
    if actual != expected {
        return Err(DecodeError::DiscriminatorMismatch { expected, actual });
    }
    Ok(())
}

/// Record type registered under `tag`
pub fn lookup(tag: &Discriminator) -> Option<RecordType> {
    RecordType::ALL.into_iter().find(|record| record.discriminator() == *tag)
}

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::common::discriminator::RecordType;

/// Emitted when a new token and its bonding curve are created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEvent {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub mint: Pubkey,
    pub bonding_curve: Pubkey,
    pub user: Pubkey,
}

/// Emitted on every buy and sell against a bonding curve
///
/// The reserves are the curve's virtual reserves after the trade settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub mint: Pubkey,
    pub sol_amount: u64,
    pub token_amount: u64,
    pub is_buy: bool,
    pub user: Pubkey,
    pub timestamp: i64,
    pub virtual_sol_reserves: u64,
    pub virtual_token_reserves: u64,
}

/// Emitted when a bonding curve completes and stops trading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteEvent {
    pub user: Pubkey,
    pub mint: Pubkey,
    pub bonding_curve: Pubkey,
    pub timestamp: i64,
}

/// Emitted when the authority updates the global parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetParamsEvent {
    pub fee_recipient: Pubkey,
    pub initial_virtual_token_reserves: u64,
    pub initial_virtual_sol_reserves: u64,
    pub initial_real_token_reserves: u64,
    pub token_total_supply: u64,
    pub fee_basis_points: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PumpFunEvent {
    Create(CreateEvent),
    Trade(TradeEvent),
    Complete(CompleteEvent),
    SetParams(SetParamsEvent),
}

impl PumpFunEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PumpFunEvent::Create(_) => EventKind::Create,
            PumpFunEvent::Trade(_) => EventKind::Trade,
            PumpFunEvent::Complete(_) => EventKind::Complete,
            PumpFunEvent::SetParams(_) => EventKind::SetParams,
        }
    }
}

/// Event variant tag, used as the listener registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Create,
    Trade,
    Complete,
    SetParams,
}

impl EventKind {
    pub const ALL: [EventKind; 4] =
        [EventKind::Create, EventKind::Trade, EventKind::Complete, EventKind::SetParams];

    pub const fn record_type(&self) -> RecordType {
        match self {
            EventKind::Create => RecordType::CreateEvent,
            EventKind::Trade => RecordType::TradeEvent,
            EventKind::Complete => RecordType::CompleteEvent,
            EventKind::SetParams => RecordType::SetParamsEvent,
        }
    }

    pub fn from_record_type(record: RecordType) -> Option<Self> {
        match record {
            RecordType::CreateEvent => Some(EventKind::Create),
            RecordType::TradeEvent => Some(EventKind::Trade),
            RecordType::CompleteEvent => Some(EventKind::Complete),
            RecordType::SetParamsEvent => Some(EventKind::SetParams),
            RecordType::Global | RecordType::BondingCurve => None,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.record_type().name())
    }
}

/// Where and when an event was observed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub slot: u64,
    pub signature: String,
    /// Local receive time, unix milliseconds
    pub received_at_ms: i64,
}

impl EventMetadata {
    pub fn new(slot: u64, signature: impl Into<String>) -> Self {
        Self {
            slot,
            signature: signature.into(),
            received_at_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Implemented by the four event structs so listeners can be registered per
/// variant and receive the concrete type
pub trait PumpFunEventType: Send + Sync + 'static {
    const KIND: EventKind;

    fn from_event(event: &PumpFunEvent) -> Option<&Self>;
}

macro_rules! impl_event_type {
    ($ty:ident, $variant:ident) => {
        impl PumpFunEventType for $ty {
            const KIND: EventKind = EventKind::$variant;

            fn from_event(event: &PumpFunEvent) -> Option<&Self> {
                match event {
                    PumpFunEvent::$variant(e) => Some(e),
                    _ => None,
                }
            }
        }

        impl From<$ty> for PumpFunEvent {
            fn from(event: $ty) -> Self {
                PumpFunEvent::$variant(event)
            }
        }
    };
}

impl_event_type!(CreateEvent, Create);
impl_event_type!(TradeEvent, Trade);
impl_event_type!(CompleteEvent, Complete);
impl_event_type!(SetParamsEvent, SetParams);

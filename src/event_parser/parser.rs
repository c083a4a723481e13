//! Event payload decoding
//!
//! A payload is the 8-byte event tag followed by the variant's fields. Bytes
//! past the end of the known layout are ignored, newer program versions
//! append fields to existing events.

use base64::engine::general_purpose;
use base64::Engine;

use crate::common::discriminator::{self, DISCRIMINATOR_LEN};
use crate::common::layout::{decode_record, encode_record, Field, FieldType, FieldValue, Schema};
use crate::error::{DecodeError, EventError};
use crate::event_parser::types::{
    CompleteEvent, CreateEvent, EventKind, PumpFunEvent, SetParamsEvent, TradeEvent,
};

/// Log line prefix under which Anchor emits event payloads
pub const PROGRAM_DATA: &str = "Program data: ";

pub const CREATE_EVENT_SCHEMA: &Schema = &[
    Field::new("name", FieldType::String),
    Field::new("symbol", FieldType::String),
    Field::new("uri", FieldType::String),
    Field::new("mint", FieldType::Pubkey),
    Field::new("bonding_curve", FieldType::Pubkey),
    Field::new("user", FieldType::Pubkey),
];

pub const TRADE_EVENT_SCHEMA: &Schema = &[
    Field::new("mint", FieldType::Pubkey),
    Field::new("sol_amount", FieldType::U64),
    Field::new("token_amount", FieldType::U64),
    Field::new("is_buy", FieldType::Bool),
    Field::new("user", FieldType::Pubkey),
    Field::new("timestamp", FieldType::I64),
    Field::new("virtual_sol_reserves", FieldType::U64),
    Field::new("virtual_token_reserves", FieldType::U64),
];

pub const COMPLETE_EVENT_SCHEMA: &Schema = &[
    Field::new("user", FieldType::Pubkey),
    Field::new("mint", FieldType::Pubkey),
    Field::new("bonding_curve", FieldType::Pubkey),
    Field::new("timestamp", FieldType::I64),
];

pub const SET_PARAMS_EVENT_SCHEMA: &Schema = &[
    Field::new("fee_recipient", FieldType::Pubkey),
    Field::new("initial_virtual_token_reserves", FieldType::U64),
    Field::new("initial_virtual_sol_reserves", FieldType::U64),
    Field::new("initial_real_token_reserves", FieldType::U64),
    Field::new("token_total_supply", FieldType::U64),
    Field::new("fee_basis_points", FieldType::U64),
];

pub const fn schema_for(kind: EventKind) -> &'static Schema {
    match kind {
        EventKind::Create => CREATE_EVENT_SCHEMA,
        EventKind::Trade => TRADE_EVENT_SCHEMA,
        EventKind::Complete => COMPLETE_EVENT_SCHEMA,
        EventKind::SetParams => SET_PARAMS_EVENT_SCHEMA,
    }
}

/// Decodes one tagged event payload
///
/// # Arguments
/// * `payload` - Raw event bytes, tag included
///
/// # Returns
/// The decoded event. Tags that are not one of the four event types,
/// account tags included, fail with `EventError::UnknownVariant`.
pub fn decode_event(payload: &[u8]) -> Result<PumpFunEvent, EventError> {
    let tag = discriminator::extract(payload).ok_or(DecodeError::TooShort {
        expected: DISCRIMINATOR_LEN,
        actual: payload.len(),
    })?;
    let kind = discriminator::lookup(&tag)
        .and_then(EventKind::from_record_type)
        .ok_or(EventError::UnknownVariant(tag))?;

    let mut fields = decode_record(payload, DISCRIMINATOR_LEN, schema_for(kind))?.reader();
    let event = match kind {
        EventKind::Create => PumpFunEvent::Create(CreateEvent {
            name: fields.string()?,
            symbol: fields.string()?,
            uri: fields.string()?,
            mint: fields.pubkey()?,
            bonding_curve: fields.pubkey()?,
            user: fields.pubkey()?,
        }),
        EventKind::Trade => PumpFunEvent::Trade(TradeEvent {
            mint: fields.pubkey()?,
            sol_amount: fields.u64()?,
            token_amount: fields.u64()?,
            is_buy: fields.bool()?,
            user: fields.pubkey()?,
            timestamp: fields.i64()?,
            virtual_sol_reserves: fields.u64()?,
            virtual_token_reserves: fields.u64()?,
        }),
        EventKind::Complete => PumpFunEvent::Complete(CompleteEvent {
            user: fields.pubkey()?,
            mint: fields.pubkey()?,
            bonding_curve: fields.pubkey()?,
            timestamp: fields.i64()?,
        }),
        EventKind::SetParams => PumpFunEvent::SetParams(SetParamsEvent {
            fee_recipient: fields.pubkey()?,
            initial_virtual_token_reserves: fields.u64()?,
            initial_virtual_sol_reserves: fields.u64()?,
            initial_real_token_reserves: fields.u64()?,
            token_total_supply: fields.u64()?,
            fee_basis_points: fields.u64()?,
        }),
    };
    Ok(event)
}

/// Wire form of an event, tag included
pub fn encode_event(event: &PumpFunEvent) -> Result<Vec<u8>, DecodeError> {
    let values = match event {
        PumpFunEvent::Create(e) => vec![
            FieldValue::String(e.name.clone()),
            FieldValue::String(e.symbol.clone()),
            FieldValue::String(e.uri.clone()),
            FieldValue::Pubkey(e.mint),
            FieldValue::Pubkey(e.bonding_curve),
            FieldValue::Pubkey(e.user),
        ],
        PumpFunEvent::Trade(e) => vec![
            FieldValue::Pubkey(e.mint),
            FieldValue::U64(e.sol_amount),
            FieldValue::U64(e.token_amount),
            FieldValue::Bool(e.is_buy),
            FieldValue::Pubkey(e.user),
            FieldValue::I64(e.timestamp),
            FieldValue::U64(e.virtual_sol_reserves),
            FieldValue::U64(e.virtual_token_reserves),
        ],
        PumpFunEvent::Complete(e) => vec![
            FieldValue::Pubkey(e.user),
            FieldValue::Pubkey(e.mint),
            FieldValue::Pubkey(e.bonding_curve),
            FieldValue::I64(e.timestamp),
        ],
        PumpFunEvent::SetParams(e) => vec![
            FieldValue::Pubkey(e.fee_recipient),
            FieldValue::U64(e.initial_virtual_token_reserves),
            FieldValue::U64(e.initial_virtual_sol_reserves),
            FieldValue::U64(e.initial_real_token_reserves),
            FieldValue::U64(e.token_total_supply),
            FieldValue::U64(e.fee_basis_points),
        ],
    };

    let kind = event.kind();
    let body = encode_record(schema_for(kind), &values)?;
    let mut out = Vec::with_capacity(DISCRIMINATOR_LEN + body.len());
    out.extend_from_slice(&kind.record_type().discriminator());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Pulls the base64 event payloads out of a transaction's log lines
///
/// Lines without the `Program data: ` prefix, or whose body is not valid
/// base64, are skipped.
pub fn extract_payloads(logs: &[String]) -> Vec<Vec<u8>> {
    logs.iter()
        .filter_map(|line| line.strip_prefix(PROGRAM_DATA))
        .filter_map(|data| general_purpose::STANDARD.decode(data.trim()).ok())
        .collect()
}

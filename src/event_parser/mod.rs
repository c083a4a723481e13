pub mod dispatcher;
pub mod parser;
pub mod types;

pub use dispatcher::{DispatchStats, EventDispatcher, ListenerId};
pub use parser::{decode_event, encode_event};
pub use types::{
    CompleteEvent, CreateEvent, EventKind, EventMetadata, PumpFunEvent, PumpFunEventType,
    SetParamsEvent, TradeEvent,
};

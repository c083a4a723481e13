//! Typed listener registry
//!
//! Listeners are registered per event variant and receive the concrete event
//! struct. Dispatch clones the matching callbacks out of the registry and
//! invokes them after the lock is released, so a callback may add or remove
//! listeners itself.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::EventError;
use crate::event_parser::parser::{decode_event, extract_payloads};
use crate::event_parser::types::{EventKind, EventMetadata, PumpFunEvent, PumpFunEventType};

/// Handle returned by [`EventDispatcher::add_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&PumpFunEvent, &EventMetadata) + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStats {
    /// Payloads decoded and handed to listeners
    pub decoded: u64,
    /// Payloads dropped because they could not be decoded
    pub skipped: u64,
}

#[derive(Default)]
pub struct EventDispatcher {
    listeners: RwLock<HashMap<EventKind, Vec<(ListenerId, Listener)>>>,
    next_id: AtomicU64,
    decoded: AtomicU64,
    skipped: AtomicU64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for one event variant
    ///
    /// # Arguments
    /// * `callback` - Invoked with the decoded event and where it was observed
    ///
    /// # Returns
    /// Id to pass to [`EventDispatcher::remove_listener`]
    pub fn add_listener<E, F>(&self, callback: F) -> ListenerId
    where
        E: PumpFunEventType,
        F: Fn(&E, &EventMetadata) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let listener: Listener = Arc::new(move |event: &PumpFunEvent, metadata: &EventMetadata| {
            if let Some(event) = E::from_event(event) {
                callback(event, metadata);
            }
        });

        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(E::KIND)
            .or_default()
            .push((id, listener));
        debug!("Registered {} listener {:?}", E::KIND, id);
        id
    }

    /// Removes exactly the listener registered under `id`
    ///
    /// # Returns
    /// Whether a listener was removed
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        for entries in listeners.values_mut() {
            if let Some(position) = entries.iter().position(|(entry_id, _)| *entry_id == id) {
                entries.remove(position);
                return true;
            }
        }
        false
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Decodes `payload` and delivers it to every listener of its variant
    ///
    /// # Arguments
    /// * `payload` - Raw event bytes, tag included
    /// * `slot` - Slot of the transaction that emitted the event
    /// * `signature` - Signature of that transaction
    ///
    /// # Returns
    /// The variant delivered. Payloads that fail to decode are logged and
    /// counted as skipped; the dispatcher stays usable.
    pub fn dispatch(
        &self,
        payload: &[u8],
        slot: u64,
        signature: &str,
    ) -> Result<EventKind, EventError> {
        let event = match decode_event(payload) {
            Ok(event) => event,
            Err(e) => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
                warn!("Skipping undecodable event in {} (slot {}): {}", signature, slot, e);
                return Err(e);
            }
        };
        self.decoded.fetch_add(1, Ordering::Relaxed);

        let kind = event.kind();
        let metadata = EventMetadata::new(slot, signature);
        let callbacks: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map(|entries| entries.iter().map(|(_, listener)| Arc::clone(listener)).collect())
            .unwrap_or_default();

        debug!("Dispatching {} from {} to {} listener(s)", kind, signature, callbacks.len());
        for callback in callbacks {
            callback(&event, &metadata);
        }
        Ok(kind)
    }

    /// Dispatches every event payload found in a transaction's log lines
    ///
    /// # Returns
    /// Number of events delivered
    pub fn dispatch_logs(&self, logs: &[String], slot: u64, signature: &str) -> usize {
        extract_payloads(logs)
            .iter()
            .filter(|payload| self.dispatch(payload, slot, signature).is_ok())
            .count()
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            decoded: self.decoded.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::event_parser::parser::{encode_event, PROGRAM_DATA};
    use crate::event_parser::types::{CompleteEvent, TradeEvent};
    use base64::engine::general_purpose;
    use base64::Engine;
    use solana_sdk::pubkey::Pubkey;
    use std::sync::Mutex;

    fn trade_payload(sol_amount: u64) -> Vec<u8> {
        encode_event(&PumpFunEvent::Trade(TradeEvent {
            mint: Pubkey::new_unique(),
            sol_amount,
            token_amount: 42,
            is_buy: false,
            user: Pubkey::new_unique(),
            timestamp: 1_718_000_000,
            virtual_sol_reserves: 30_000_000_000,
            virtual_token_reserves: 1_073_000_000_000_000,
        }))
        .unwrap()
    }

    #[test]
    fn test_unknown_payload_is_skipped_and_next_is_delivered() {
        let dispatcher = EventDispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        dispatcher.add_listener::<TradeEvent, _>(move |trade, metadata| {
            let entry = (trade.sol_amount, metadata.slot, metadata.signature.clone());
            sink.lock().unwrap().push(entry);
        });

        let mut unknown = vec![0xab; 8];
        unknown.extend_from_slice(&[0u8; 32]);
        assert_eq!(
            dispatcher.dispatch(&unknown, 10, "sig-unknown"),
            Err(EventError::UnknownVariant([0xab; 8]))
        );
        assert_eq!(dispatcher.stats(), DispatchStats { decoded: 0, skipped: 1 });

        assert_eq!(dispatcher.dispatch(&trade_payload(7), 11, "sig-trade"), Ok(EventKind::Trade));
        assert_eq!(dispatcher.stats(), DispatchStats { decoded: 1, skipped: 1 });
        assert_eq!(*seen.lock().unwrap(), vec![(7, 11, "sig-trade".to_string())]);
    }

    #[test]
    fn test_truncated_payload_counts_as_skipped() {
        let dispatcher = EventDispatcher::new();
        let payload = trade_payload(1);
        assert_eq!(
            dispatcher.dispatch(&payload[..20], 1, "sig"),
            Err(EventError::Decode(DecodeError::TooShort {
                expected: payload.len(),
                actual: 20
            }))
        );
        assert_eq!(dispatcher.stats().skipped, 1);
    }

    #[test]
    fn test_listeners_only_see_their_variant() {
        let dispatcher = EventDispatcher::new();
        let completes = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&completes);
        dispatcher.add_listener::<CompleteEvent, _>(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        dispatcher.dispatch(&trade_payload(1), 1, "sig").unwrap();
        assert_eq!(completes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_remove_listener_leaves_others() {
        let dispatcher = EventDispatcher::new();
        let first = Arc::new(AtomicU64::new(0));
        let second = Arc::new(AtomicU64::new(0));

        let counter = Arc::clone(&first);
        let first_id = dispatcher.add_listener::<TradeEvent, _>(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&second);
        dispatcher.add_listener::<TradeEvent, _>(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        dispatcher.dispatch(&trade_payload(1), 1, "a").unwrap();
        assert!(dispatcher.remove_listener(first_id));
        assert!(!dispatcher.remove_listener(first_id));
        dispatcher.dispatch(&trade_payload(2), 2, "b").unwrap();

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 2);
        assert_eq!(dispatcher.listener_count(EventKind::Trade), 1);
    }

    #[test]
    fn test_callback_may_remove_itself() {
        let dispatcher = Arc::new(EventDispatcher::new());
        let calls = Arc::new(AtomicU64::new(0));
        let slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));

        let (inner, counter, own_id) =
            (Arc::clone(&dispatcher), Arc::clone(&calls), Arc::clone(&slot));
        let id = dispatcher.add_listener::<TradeEvent, _>(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *own_id.lock().unwrap() {
                inner.remove_listener(id);
            }
        });
        *slot.lock().unwrap() = Some(id);

        dispatcher.dispatch(&trade_payload(1), 1, "a").unwrap();
        dispatcher.dispatch(&trade_payload(1), 2, "b").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_dispatch_and_registration() {
        const DISPATCHERS: u64 = 4;
        const ROUNDS: u64 = 500;

        let dispatcher = Arc::new(EventDispatcher::new());
        let delivered = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&delivered);
        dispatcher.add_listener::<TradeEvent, _>(move |trade, _| {
            counter.fetch_add(trade.sol_amount, Ordering::SeqCst);
        });

        let churn = {
            let dispatcher = Arc::clone(&dispatcher);
            std::thread::spawn(move || {
                for _ in 0..ROUNDS {
                    let id = dispatcher.add_listener::<TradeEvent, _>(|_, _| {});
                    let other = dispatcher.add_listener::<CompleteEvent, _>(|_, _| {});
                    assert!(dispatcher.remove_listener(id));
                    assert!(dispatcher.remove_listener(other));
                }
            })
        };

        let workers: Vec<_> = (0..DISPATCHERS)
            .map(|worker| {
                let dispatcher = Arc::clone(&dispatcher);
                std::thread::spawn(move || {
                    let payload = trade_payload(1);
                    for round in 0..ROUNDS {
                        let signature = format!("sig-{}-{}", worker, round);
                        assert_eq!(
                            dispatcher.dispatch(&payload, round, &signature),
                            Ok(EventKind::Trade)
                        );
                        assert!(dispatcher.dispatch(&[0xff; 8], round, &signature).is_err());
                    }
                })
            })
            .collect();

        churn.join().unwrap();
        for worker in workers {
            worker.join().unwrap();
        }

        let total = DISPATCHERS * ROUNDS;
        assert_eq!(dispatcher.stats(), DispatchStats { decoded: total, skipped: total });
        assert_eq!(delivered.load(Ordering::SeqCst), total);
        assert_eq!(dispatcher.listener_count(EventKind::Trade), 1);
        assert_eq!(dispatcher.listener_count(EventKind::Complete), 0);
    }

    #[test]
    fn test_dispatch_logs() {
        let dispatcher = EventDispatcher::new();
        let logs = vec![
            "Program log: Instruction: Sell".to_string(),
            format!("{}{}", PROGRAM_DATA, general_purpose::STANDARD.encode(trade_payload(3))),
            format!("{}{}", PROGRAM_DATA, general_purpose::STANDARD.encode([0u8; 16])),
            format!("{}{}", PROGRAM_DATA, general_purpose::STANDARD.encode(trade_payload(4))),
        ];

        assert_eq!(dispatcher.dispatch_logs(&logs, 99, "sig"), 2);
        assert_eq!(dispatcher.stats(), DispatchStats { decoded: 2, skipped: 1 });
    }
}

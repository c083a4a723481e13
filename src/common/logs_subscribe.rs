use std::sync::Arc;

use futures::StreamExt;
use log::{debug, error, info};
use solana_client::{
    nonblocking::pubsub_client::PubsubClient,
    rpc_config::{RpcTransactionLogsConfig, RpcTransactionLogsFilter},
};
use solana_sdk::commitment_config::CommitmentConfig;
use tokio::sync::{mpsc, oneshot};

use crate::common::subscription_handle::SubscriptionHandle;
use crate::constants::pumpfun::accounts;
use crate::error::{ClientError, ClientResult};
use crate::event_parser::EventDispatcher;

/// Subscribes to transaction logs mentioning the Pump.fun program and feeds
/// every event they carry to `dispatcher`
///
/// # Arguments
/// * `ws_url` - Websocket endpoint
/// * `commitment` - Commitment level of the notifications
/// * `dispatcher` - Receives the event payloads
///
/// # Returns
/// A handle once the subscription is confirmed. Failed transactions are
/// skipped since their events never landed.
pub async fn logs_subscription(
    ws_url: &str,
    commitment: CommitmentConfig,
    dispatcher: Arc<EventDispatcher>,
) -> ClientResult<SubscriptionHandle> {
    let client = PubsubClient::new(ws_url)
        .await
        .map_err(|e| ClientError::Subscription(e.to_string()))?;

    let logs_filter = RpcTransactionLogsFilter::Mentions(vec![accounts::PUMPFUN.to_string()]);
    let logs_config = RpcTransactionLogsConfig { commitment: Some(commitment) };

    let (unsub_tx, mut unsub_rx) = mpsc::channel::<()>(1);
    let (ready_tx, ready_rx) = oneshot::channel::<ClientResult<()>>();

    let task = tokio::spawn(async move {
        let subscription = client.logs_subscribe(logs_filter, logs_config).await;
        let (mut stream, unsubscribe) = match subscription {
            Ok(subscription) => subscription,
            Err(e) => {
                let _ = ready_tx.send(Err(ClientError::Subscription(e.to_string())));
                return;
            }
        };
        let _ = ready_tx.send(Ok(()));
        info!("Subscribed to Pump.fun program logs");

        loop {
            tokio::select! {
                _ = unsub_rx.recv() => break,
                msg = stream.next() => match msg {
                    Some(msg) => {
                        if msg.value.err.is_some() {
                            continue;
                        }
                        let delivered = dispatcher.dispatch_logs(
                            &msg.value.logs,
                            msg.context.slot,
                            &msg.value.signature,
                        );
                        debug!("{} event(s) from {}", delivered, msg.value.signature);
                    }
                    None => {
                        error!("Pump.fun log subscription stream ended");
                        break;
                    }
                },
            }
        }

        unsubscribe().await;
        info!("Unsubscribed from Pump.fun program logs");
    });

    match ready_rx.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(e),
        Err(_) => return Err(ClientError::Subscription("subscription task exited".to_string())),
    }

    Ok(SubscriptionHandle {
        task,
        unsub_fn: Box::new(move || {
            let _ = unsub_tx.try_send(());
        }),
    })
}

//! Event Monitor: per-network worker
//!
//! One subscription, one sequential loop:
//!     event → heartbeat check → decode → classify each msg → deliver
//!
//! Event N is fully handled before event N+1 is read. A slow sink stalls the
//! loop; the subscription buffer is the only queue.
//!
//! The loop ends when the subscription channel closes or the shutdown flag
//! flips to true. There is no resubscription.

use super::classify::classify;
use super::types::{HeightTracker, MonitorSettings, MonitorState, MonitorStats};
use crate::codec::{BinaryCodec, Codec};
use crate::error::{Result, ValidationError};
use crate::msg::decode_tx;
use crate::notify::NotificationSink;
use crate::rpc::event_query::EventQuery;
use crate::rpc::{EventSource, RawEvent};
use futures::StreamExt;
use tokio::sync::watch;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

pub struct NetworkMonitor<S, N, C = BinaryCodec> {
    source: S,
    sink: N,
    codec: C,
    settings: MonitorSettings,
    state: MonitorState,
    stats: MonitorStats,
    heights: HeightTracker,
}

impl<S: EventSource, N: NotificationSink> NetworkMonitor<S, N, BinaryCodec> {
    pub fn new(source: S, sink: N, settings: MonitorSettings) -> Self {
        Self::with_codec(source, sink, BinaryCodec, settings)
    }
}

impl<S: EventSource, N: NotificationSink, C: Codec> NetworkMonitor<S, N, C> {
    pub fn with_codec(source: S, sink: N, codec: C, settings: MonitorSettings) -> Self {
        Self {
            source,
            sink,
            codec,
            settings,
            state: MonitorState::Idle,
            stats: MonitorStats::default(),
            heights: HeightTracker::default(),
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Subscribe and process events until the stream closes or `shutdown`
    /// becomes true. Fails only before the first event: invalid filter or
    /// subscription refused.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<MonitorStats> {
        if self.state != MonitorState::Idle {
            warn!("{}: monitor already ran", self.settings.name);
            return Ok(self.stats);
        }

        let name = self.settings.name.clone();
        if let Err(e) = EventQuery::parse(&self.settings.event_query) {
            self.state = MonitorState::Terminated;
            return Err(ValidationError::QuerySyntax(e.to_string()).into());
        }
        if *shutdown.borrow() {
            self.state = MonitorState::Terminated;
            return Ok(self.stats);
        }

        let rx = match self
            .source
            .subscribe(&self.settings.event_query, self.settings.buffer_size)
            .await
        {
            Ok(rx) => rx,
            Err(e) => {
                self.state = MonitorState::Terminated;
                return Err(e.into());
            }
        };
        self.state = MonitorState::Subscribed;
        info!("starting watch {}", name);

        let mut events = ReceiverStream::new(rx);
        let mut shutdown_live = true;

        loop {
            tokio::select! {
                changed = shutdown.changed(), if shutdown_live => {
                    match changed {
                        Ok(()) if *shutdown.borrow() => {
                            info!("{}: shutdown requested", name);
                            break;
                        }
                        Ok(()) => {}
                        // sender gone: nobody can ask us to stop anymore
                        Err(_) => shutdown_live = false,
                    }
                }
                next = events.next() => {
                    match next {
                        Some(event) => self.handle_event(event).await,
                        None => {
                            warn!("{}: subscription closed", name);
                            break;
                        }
                    }
                }
            }
        }

        self.state = MonitorState::Terminated;
        info!(
            "{} monitor stopped | events={} decode_failures={} dispatched={} last_height={}",
            name,
            self.stats.events,
            self.stats.decode_failures,
            self.stats.dispatched,
            self.stats.last_height
        );
        Ok(self.stats)
    }

    async fn handle_event(&mut self, event: RawEvent) {
        self.stats.events += 1;

        if let Some(heartbeat) = self
            .heights
            .observe(event.height, self.settings.heartbeat_interval)
        {
            self.stats.last_height = event.height;
            if heartbeat {
                info!("{} receive height {}", self.settings.name, event.height);
            }
        }

        let tx = match decode_tx(&self.codec, &event.tx) {
            Ok(tx) => tx,
            Err(e) => {
                self.stats.decode_failures += 1;
                warn!(
                    "{}: parse tx error at height {}: {}",
                    self.settings.name, event.height, e
                );
                return;
            }
        };

        for msg in &tx.msgs {
            match classify(msg) {
                Some(alert) => {
                    let text = alert.render(self.settings.network, &self.settings.name);
                    self.sink.deliver(&text).await;
                    self.stats.dispatched += 1;
                }
                None => debug!("{}: ignoring {}", self.settings.name, msg.route()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClientError, TransportError};
    use crate::msg::{DexListMsg, Msg, StdSignMsg, SubmitProposalMsg, TokenIssueMsg};
    use crate::notify::RecordingSink;
    use crate::types::{AccAddress, ChainNetwork, Fixed8, ProposalKind};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Hands out one pre-built channel
    struct ChannelSource {
        rx: Mutex<Option<mpsc::Receiver<RawEvent>>>,
        queries: Mutex<Vec<String>>,
    }

    impl ChannelSource {
        fn new(rx: mpsc::Receiver<RawEvent>) -> Self {
            Self {
                rx: Mutex::new(Some(rx)),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl EventSource for ChannelSource {
        async fn subscribe(
            &self,
            query: &str,
            _buffer: usize,
        ) -> std::result::Result<mpsc::Receiver<RawEvent>, TransportError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.rx
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| TransportError::Websocket("already subscribed".into()))
        }
    }

    fn encode(msgs: Vec<Msg>) -> Vec<u8> {
        let sign = StdSignMsg {
            chain_id: "test".into(),
            account_number: 0,
            sequence: 0,
            memo: String::new(),
            msgs,
            source: 0,
            data: Vec::new(),
        };
        sign.to_std_tx(&BinaryCodec)
            .unwrap()
            .encode(&BinaryCodec)
            .unwrap()
    }

    fn issue(symbol: &str) -> Msg {
        Msg::TokenIssue(TokenIssueMsg {
            from: AccAddress([1u8; 20]),
            name: "n".into(),
            symbol: symbol.into(),
            total_supply: Fixed8(10),
            mintable: false,
        })
    }

    fn list(base: &str) -> Msg {
        Msg::DexList(DexListMsg {
            from: AccAddress([1u8; 20]),
            proposal_id: 1,
            base_asset_symbol: base.into(),
            quote_asset_symbol: "BNB".into(),
            init_price: Fixed8(1),
        })
    }

    fn proposal(kind: ProposalKind) -> Msg {
        Msg::SubmitProposal(SubmitProposalMsg::new(
            "t",
            "d",
            kind,
            AccAddress([1u8; 20]),
            1,
            Duration::from_secs(60),
        ))
    }

    fn other() -> Msg {
        Msg::Other {
            route: "cosmos-sdk/Send".into(),
            value: vec![1, 2, 3],
        }
    }

    fn monitor(
        rx: mpsc::Receiver<RawEvent>,
    ) -> (Arc<RecordingSink>, NetworkMonitor<ChannelSource, Arc<RecordingSink>>) {
        let sink = Arc::new(RecordingSink::default());
        let mut settings = MonitorSettings::new("testnet", ChainNetwork::Testnet);
        settings.heartbeat_interval = 2;
        let monitor = NetworkMonitor::new(ChannelSource::new(rx), Arc::clone(&sink), settings);
        (sink, monitor)
    }

    #[tokio::test]
    async fn test_dispatches_recognized_in_order() {
        let (tx, rx) = mpsc::channel(16);
        let stream = vec![
            encode(vec![issue("AAA-000")]),
            encode(vec![other()]),
            encode(vec![proposal(ProposalKind::Text)]),
            encode(vec![list("BBB-111")]),
            encode(vec![other(), proposal(ProposalKind::ListTradingPair)]),
            encode(vec![issue("CCC-222")]),
        ];
        for (i, bz) in stream.into_iter().enumerate() {
            tx.send(RawEvent { height: i as i64 + 1, tx: bz }).await.unwrap();
        }
        drop(tx);

        let (sink, mut monitor) = monitor(rx);
        let (_stop_tx, stop_rx) = watch::channel(false);
        let stats = monitor.run(stop_rx).await.unwrap();

        let delivered = sink.delivered();
        assert_eq!(delivered.len(), 4);
        assert!(delivered[0].contains("token: AAA-000"));
        assert!(delivered[1].contains("pair: BBB-111_BNB"));
        assert!(delivered[2].starts_with("list proposal:"));
        assert!(delivered[3].contains("token: CCC-222"));
        assert!(delivered.iter().all(|t| t.ends_with("net testnet")));

        assert_eq!(stats.events, 6);
        assert_eq!(stats.dispatched, 4);
        assert_eq!(stats.decode_failures, 0);
        assert_eq!(stats.last_height, 6);
        assert_eq!(monitor.state(), MonitorState::Terminated);
    }

    #[tokio::test]
    async fn test_malformed_event_is_skipped() {
        let (tx, rx) = mpsc::channel(16);
        tx.send(RawEvent { height: 1, tx: encode(vec![issue("AAA-000")]) }).await.unwrap();
        tx.send(RawEvent { height: 2, tx: vec![0xde, 0xad, 0xbe, 0xef] }).await.unwrap();
        tx.send(RawEvent { height: 2, tx: Vec::new() }).await.unwrap();
        tx.send(RawEvent { height: 3, tx: encode(vec![issue("BBB-000")]) }).await.unwrap();
        drop(tx);

        let (sink, mut monitor) = monitor(rx);
        let (_stop_tx, stop_rx) = watch::channel(false);
        let stats = monitor.run(stop_rx).await.unwrap();

        assert_eq!(sink.delivered().len(), 2);
        assert!(sink.delivered()[1].contains("BBB-000"));
        assert_eq!(stats.decode_failures, 2);
        assert_eq!(stats.events, 4);
    }

    #[tokio::test]
    async fn test_shutdown_stops_open_subscription() {
        let (tx, rx) = mpsc::channel(16);
        let (sink, mut monitor) = monitor(rx);
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let stats = monitor.run(stop_rx).await;
            (stats, monitor.state())
        });

        tx.send(RawEvent { height: 5, tx: encode(vec![list("XYZ-000")]) }).await.unwrap();
        // wait for the event to be handled before stopping
        for _ in 0..100 {
            if !sink.delivered().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        stop_tx.send(true).unwrap();

        let (stats, state) = handle.await.unwrap();
        assert_eq!(stats.unwrap().dispatched, 1);
        assert_eq!(state, MonitorState::Terminated);
        // sender still alive: the stop came from the flag, not a closed channel
        drop(tx);
    }

    #[tokio::test]
    async fn test_invalid_filter_never_subscribes() {
        let (_tx, rx) = mpsc::channel(1);
        let (_sink, mut monitor) = monitor(rx);
        monitor.settings.event_query = "tm.event = ".into();

        let (_stop_tx, stop_rx) = watch::channel(false);
        let err = monitor.run(stop_rx).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidParameter(_)));
        assert!(monitor.source.queries.lock().unwrap().is_empty());
        assert_eq!(monitor.state(), MonitorState::Terminated);
    }

    #[tokio::test]
    async fn test_subscription_refused() {
        let (_tx, rx) = mpsc::channel(1);
        let (_sink, mut monitor) = monitor(rx);
        // drain the only channel so subscribe fails
        monitor.source.rx.lock().unwrap().take();

        let (_stop_tx, stop_rx) = watch::channel(false);
        let err = monitor.run(stop_rx).await.unwrap_err();
        assert!(matches!(err, ClientError::Query(TransportError::Websocket(_))));
    }
}

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::order::{ReplyOrder, Sequencer};
use super::transport::{Reply, Transport, TransportError};
use crate::input::InputField;
use crate::transcript::{Entry, Transcript};

/// How a single exchange ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// The server answered with this reply text.
    Replied(String),
    /// The server answered with a status other than 200.
    Rejected { status: u16 },
    /// The request never completed or the reply could not be decoded.
    Failed(String),
}

/// One in-flight request/response cycle.
///
/// Dropping it does not cancel the exchange; the reply is still rendered.
#[derive(Debug)]
pub struct PendingExchange {
    handle: JoinHandle<ExchangeOutcome>,
}

impl PendingExchange {
    /// Waits for the exchange to be handled and returns how it ended.
    pub async fn wait(self) -> ExchangeOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => ExchangeOutcome::Failed(format!("exchange task ended abnormally: {e}")),
        }
    }
}

/// Moves text from the input field into the transcript and onto the wire.
pub struct ChatInputHandler {
    input: Arc<dyn InputField>,
    transcript: Arc<dyn Transcript>,
    transport: Arc<dyn Transport>,
    sequencer: Option<Arc<Sequencer>>,
}

impl ChatInputHandler {
    pub fn new(
        input: Arc<dyn InputField>,
        transcript: Arc<dyn Transcript>,
        transport: Arc<dyn Transport>,
        order: ReplyOrder,
    ) -> Self {
        let sequencer = match order {
            ReplyOrder::Arrival => None,
            ReplyOrder::Submission => Some(Arc::new(Sequencer::default())),
        };
        Self {
            input,
            transcript,
            transport,
            sequencer,
        }
    }

    pub const fn order(&self) -> ReplyOrder {
        if self.sequencer.is_some() {
            ReplyOrder::Submission
        } else {
            ReplyOrder::Arrival
        }
    }

    /// Submits the current contents of the input field.
    ///
    /// Returns `None` without touching anything when the field is blank.
    /// Otherwise the user entry is appended, the request is spawned onto the
    /// current tokio runtime and the field is cleared before this returns;
    /// the reply is rendered whenever the response arrives.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn submit(&self) -> Option<PendingExchange> {
        let text = self.input.value();
        if text.trim().is_empty() {
            return None;
        }

        self.transcript.append(Entry::user(text.clone()));

        let slot = self.sequencer.as_ref().map(|sequencer| Slot {
            ticket: sequencer.ticket(),
            sequencer: Arc::clone(sequencer),
            transcript: Arc::clone(&self.transcript),
            settled: false,
        });
        let transport = Arc::clone(&self.transport);
        let transcript = Arc::clone(&self.transcript);

        debug!(chars = text.chars().count(), "Dispatching message");
        let handle = tokio::spawn(async move {
            let result = transport.send(&text).await;
            settle(result, transcript.as_ref(), slot)
        });

        self.input.clear();

        Some(PendingExchange { handle })
    }
}

/// A place in the submission order.
///
/// Dropping an unsettled slot releases it without an entry.
struct Slot {
    sequencer: Arc<Sequencer>,
    ticket: u64,
    transcript: Arc<dyn Transcript>,
    settled: bool,
}

impl Slot {
    fn settle(mut self, entry: Option<Entry>) {
        self.settled = true;
        self.release(entry);
    }

    fn release(&self, entry: Option<Entry>) {
        let transcript = self.transcript.as_ref();
        self.sequencer.complete(self.ticket, entry, |entry| show(transcript, entry));
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        if !self.settled {
            self.release(None);
        }
    }
}

fn settle(
    result: Result<Reply, TransportError>,
    transcript: &dyn Transcript,
    slot: Option<Slot>,
) -> ExchangeOutcome {
    let (outcome, entry) = match result {
        Ok(Reply::Message(text)) => {
            debug!(chars = text.chars().count(), "Reply received");
            let entry = Entry::bot(text.clone());
            (ExchangeOutcome::Replied(text), Some(entry))
        }
        Ok(Reply::Status(status)) => {
            error!(status, "Request failed");
            (ExchangeOutcome::Rejected { status }, None)
        }
        Err(e) => {
            error!(error = %e, "Exchange failed");
            (ExchangeOutcome::Failed(e.to_string()), None)
        }
    };

    match slot {
        Some(slot) => slot.settle(entry),
        None => {
            if let Some(entry) = entry {
                show(transcript, entry);
            }
        }
    }

    outcome
}

fn show(transcript: &dyn Transcript, entry: Entry) {
    transcript.append(entry);
    transcript.scroll_to_bottom();
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::input::LineBuffer;
    use crate::transcript::MemoryTranscript;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::io;
    use std::sync::Mutex;
    use tokio::sync::oneshot;
    use tracing_subscriber::fmt::MakeWriter;

    type Gate = oneshot::Sender<Result<Reply, TransportError>>;

    /// Transport whose replies are released by the test, one gate per text.
    struct GatedTransport {
        transcript: Arc<MemoryTranscript>,
        gates: Mutex<HashMap<String, oneshot::Receiver<Result<Reply, TransportError>>>>,
        sent: Mutex<Vec<(String, Vec<Entry>)>>,
    }

    impl GatedTransport {
        fn new(transcript: Arc<MemoryTranscript>) -> Self {
            Self {
                transcript,
                gates: Mutex::new(HashMap::new()),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn gate(&self, text: &str) -> Gate {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(text.to_string(), rx);
            tx
        }

        fn sent_texts(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|(text, _)| text.clone())
                .collect()
        }

        /// Transcript contents observed when `text` went out.
        fn seen_at_send(&self, text: &str) -> Vec<Entry> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .find(|(sent, _)| sent == text)
                .map(|(_, seen)| seen.clone())
                .expect("text was never sent")
        }
    }

    #[async_trait]
    impl Transport for GatedTransport {
        async fn send(&self, text: &str) -> Result<Reply, TransportError> {
            self.sent
                .lock()
                .unwrap()
                .push((text.to_string(), self.transcript.entries()));
            let gate = self
                .gates
                .lock()
                .unwrap()
                .remove(text)
                .expect("no gate for text");
            gate.await.expect("gate dropped")
        }
    }

    struct Fixture {
        input: Arc<LineBuffer>,
        transcript: Arc<MemoryTranscript>,
        transport: Arc<GatedTransport>,
        handler: ChatInputHandler,
    }

    fn fixture(order: ReplyOrder) -> Fixture {
        let input = Arc::new(LineBuffer::new());
        let transcript = Arc::new(MemoryTranscript::new());
        let transport = Arc::new(GatedTransport::new(Arc::clone(&transcript)));
        let handler = ChatInputHandler::new(
            input.clone(),
            transcript.clone(),
            transport.clone(),
            order,
        );
        Fixture {
            input,
            transcript,
            transport,
            handler,
        }
    }

    fn type_and_submit(fx: &Fixture, text: &str) -> PendingExchange {
        fx.input.set_value(text);
        fx.handler.submit().expect("submission was ignored")
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let fx = fixture(ReplyOrder::Arrival);

        for blank in ["", "   ", "\t", " \n "] {
            fx.input.set_value(blank);
            assert!(fx.handler.submit().is_none());
            assert_eq!(fx.input.value(), blank);
        }

        assert!(fx.transcript.entries().is_empty());
        assert!(fx.transport.sent_texts().is_empty());
    }

    #[tokio::test]
    async fn test_hello_round_trip() {
        let fx = fixture(ReplyOrder::Arrival);
        let gate = fx.transport.gate("hello");

        let pending = type_and_submit(&fx, "hello");

        assert_eq!(fx.input.value(), "");
        assert_eq!(fx.transcript.lines(), vec!["You: hello"]);

        gate.send(Ok(Reply::Message("hi there".to_string()))).unwrap();
        let outcome = pending.wait().await;

        assert_eq!(outcome, ExchangeOutcome::Replied("hi there".to_string()));
        assert_eq!(fx.transcript.lines(), vec!["You: hello", "Bot: hi there"]);
        assert_eq!(fx.transcript.scroll_count(), 1);
    }

    #[tokio::test]
    async fn test_user_entry_precedes_request() {
        let fx = fixture(ReplyOrder::Arrival);
        let gate = fx.transport.gate("first");

        let pending = type_and_submit(&fx, "first");
        gate.send(Ok(Reply::Message("ok".to_string()))).unwrap();
        pending.wait().await;

        assert_eq!(fx.transport.sent_texts(), vec!["first"]);
        assert_eq!(fx.transport.seen_at_send("first"), vec![Entry::user("first")]);
    }

    #[tokio::test]
    async fn test_raw_text_is_sent_untrimmed() {
        let fx = fixture(ReplyOrder::Arrival);
        let gate = fx.transport.gate("  padded ");

        let pending = type_and_submit(&fx, "  padded ");
        gate.send(Ok(Reply::Message("ok".to_string()))).unwrap();
        pending.wait().await;

        assert_eq!(fx.transport.sent_texts(), vec!["  padded "]);
        assert_eq!(fx.transcript.entries()[0], Entry::user("  padded "));
    }

    #[tokio::test]
    async fn test_server_error_logs_status_and_adds_no_reply() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let fx = fixture(ReplyOrder::Arrival);
        let gate = fx.transport.gate("T");

        let pending = type_and_submit(&fx, "T");
        gate.send(Ok(Reply::Status(500))).unwrap();
        let outcome = pending.wait().await;

        assert_eq!(outcome, ExchangeOutcome::Rejected { status: 500 });
        assert_eq!(fx.transcript.lines(), vec!["You: T"]);
        assert_eq!(fx.transcript.scroll_count(), 0);

        let logged = logs.contents();
        assert!(logged.contains("Request failed"), "logs: {logged}");
        assert!(logged.contains("status=500"), "logs: {logged}");
    }

    #[tokio::test]
    async fn test_transport_failure_adds_no_reply() {
        let fx = fixture(ReplyOrder::Arrival);
        let gate = fx.transport.gate("T");

        let pending = type_and_submit(&fx, "T");
        let decode_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        gate.send(Err(TransportError::Decode(decode_error))).unwrap();
        let outcome = pending.wait().await;

        assert!(matches!(outcome, ExchangeOutcome::Failed(msg) if msg.contains("malformed")));
        assert_eq!(fx.transcript.lines(), vec!["You: T"]);
    }

    #[tokio::test]
    async fn test_overlapping_replies_land_in_arrival_order() {
        let fx = fixture(ReplyOrder::Arrival);
        let gate_a = fx.transport.gate("A");
        let gate_b = fx.transport.gate("B");

        let pending_a = type_and_submit(&fx, "A");
        let pending_b = type_and_submit(&fx, "B");

        gate_b.send(Ok(Reply::Message("B-reply".to_string()))).unwrap();
        pending_b.wait().await;
        gate_a.send(Ok(Reply::Message("A-reply".to_string()))).unwrap();
        pending_a.wait().await;

        assert_eq!(
            fx.transcript.lines(),
            vec!["You: A", "You: B", "Bot: B-reply", "Bot: A-reply"]
        );
    }

    #[tokio::test]
    async fn test_submission_order_holds_back_early_reply() {
        let fx = fixture(ReplyOrder::Submission);
        assert_eq!(fx.handler.order(), ReplyOrder::Submission);
        let gate_a = fx.transport.gate("A");
        let gate_b = fx.transport.gate("B");

        let pending_a = type_and_submit(&fx, "A");
        let pending_b = type_and_submit(&fx, "B");

        gate_b.send(Ok(Reply::Message("B-reply".to_string()))).unwrap();
        assert_eq!(
            pending_b.wait().await,
            ExchangeOutcome::Replied("B-reply".to_string())
        );
        assert_eq!(fx.transcript.lines(), vec!["You: A", "You: B"]);

        gate_a.send(Ok(Reply::Message("A-reply".to_string()))).unwrap();
        pending_a.wait().await;

        assert_eq!(
            fx.transcript.lines(),
            vec!["You: A", "You: B", "Bot: A-reply", "Bot: B-reply"]
        );
        assert_eq!(fx.transcript.scroll_count(), 2);
    }

    #[tokio::test]
    async fn test_submission_order_skips_rejected_exchange() {
        let fx = fixture(ReplyOrder::Submission);
        let gate_a = fx.transport.gate("A");
        let gate_b = fx.transport.gate("B");

        let pending_a = type_and_submit(&fx, "A");
        let pending_b = type_and_submit(&fx, "B");

        gate_b.send(Ok(Reply::Message("B-reply".to_string()))).unwrap();
        pending_b.wait().await;
        gate_a.send(Ok(Reply::Status(503))).unwrap();
        assert_eq!(
            pending_a.wait().await,
            ExchangeOutcome::Rejected { status: 503 }
        );

        assert_eq!(
            fx.transcript.lines(),
            vec!["You: A", "You: B", "Bot: B-reply"]
        );
    }

    #[tokio::test]
    async fn test_input_cleared_before_reply_arrives() {
        let fx = fixture(ReplyOrder::Arrival);
        let gate = fx.transport.gate("slow");

        let pending = type_and_submit(&fx, "slow");
        tokio::task::yield_now().await;

        assert_eq!(fx.input.value(), "");
        assert_eq!(fx.transcript.lines(), vec!["You: slow"]);

        gate.send(Ok(Reply::Message("done".to_string()))).unwrap();
        pending.wait().await;
        assert_eq!(fx.transcript.lines(), vec!["You: slow", "Bot: done"]);
    }

    struct PanickingTransport;

    #[async_trait]
    impl Transport for PanickingTransport {
        async fn send(&self, text: &str) -> Result<Reply, TransportError> {
            if text == "boom" {
                panic!("transport blew up");
            }
            Ok(Reply::Message(format!("{text}-reply")))
        }
    }

    #[tokio::test]
    async fn test_submission_order_survives_panicking_exchange() {
        let input = Arc::new(LineBuffer::new());
        let transcript = Arc::new(MemoryTranscript::new());
        let handler = ChatInputHandler::new(
            input.clone(),
            transcript.clone(),
            Arc::new(PanickingTransport),
            ReplyOrder::Submission,
        );

        input.set_value("boom");
        let first = handler.submit().unwrap();
        input.set_value("after");
        let second = handler.submit().unwrap();

        let outcome = first.wait().await;
        assert!(matches!(outcome, ExchangeOutcome::Failed(msg) if msg.contains("abnormally")));
        assert_eq!(
            second.wait().await,
            ExchangeOutcome::Replied("after-reply".to_string())
        );
        assert_eq!(
            transcript.lines(),
            vec!["You: boom", "You: after", "Bot: after-reply"]
        );
    }
}

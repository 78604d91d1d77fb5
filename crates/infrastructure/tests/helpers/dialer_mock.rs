use super::collector_mock::{CollectorBehaviour, CollectorEvent, MockCollector};
use async_trait::async_trait;
use dnstap_relay_domain::DomainError;
use dnstap_relay_infrastructure::dnstap::{BoxedStream, Dialer};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Instant;
use tokio::sync::mpsc;

const DUPLEX_BUFFER: usize = 64 * 1024;

#[derive(Debug, Clone, Copy)]
pub enum DialOutcome {
    Fail,
    Connect(CollectorBehaviour),
}

/// Dialer that plays back a script of outcomes, then repeats `fallback`.
/// Successful dials hand out one end of an in-memory duplex pipe with a
/// `MockCollector` session on the other.
pub struct ScriptedDialer {
    script: Mutex<VecDeque<DialOutcome>>,
    fallback: DialOutcome,
    attempts: Mutex<Vec<Instant>>,
    sessions: Mutex<usize>,
    events: mpsc::UnboundedSender<CollectorEvent>,
}

impl ScriptedDialer {
    pub fn new(
        script: Vec<DialOutcome>,
        fallback: DialOutcome,
        events: mpsc::UnboundedSender<CollectorEvent>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            attempts: Mutex::new(Vec::new()),
            sessions: Mutex::new(0),
            events,
        }
    }

    pub fn always(outcome: DialOutcome, events: mpsc::UnboundedSender<CollectorEvent>) -> Self {
        Self::new(Vec::new(), outcome, events)
    }

    pub fn attempts(&self) -> Vec<Instant> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }
}

#[async_trait]
impl Dialer for ScriptedDialer {
    async fn dial(&self) -> Result<BoxedStream, DomainError> {
        self.attempts.lock().unwrap().push(Instant::now());
        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);

        match outcome {
            DialOutcome::Fail => Err(DomainError::TransportConnect {
                server: self.describe(),
                reason: "connection refused".to_string(),
            }),
            DialOutcome::Connect(behaviour) => {
                let session = {
                    let mut sessions = self.sessions.lock().unwrap();
                    let session = *sessions;
                    *sessions += 1;
                    session
                };
                let (client, server) = tokio::io::duplex(DUPLEX_BUFFER);
                MockCollector::serve(server, behaviour, session, self.events.clone());
                Ok(Box::new(client))
            }
        }
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

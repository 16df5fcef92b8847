//! Refresh cyklus: stáhne odpovědi, postaví nový [`Cluster`] a rozešle událost.
//!
//! Běží vždy nejvýš jeden refresh. Nový snapshot se uloží jen tehdy, když je
//! jeho pořadové číslo vyšší než u posledního uloženého; selhaný fetch nechá
//! poslední dobrý snapshot beze změny.

use anyhow::Result;
use std::future::Future;
use std::sync::Arc;

use crate::error::RefreshError;
use crate::es::payloads::ClusterPayloads;
use crate::models::{Cluster, ClusterChanges};

/// Zdroj odpovědí pro snapshot (typicky [`crate::es::EsClient`])
pub trait ClusterSource {
    fn fetch(&self) -> impl Future<Output = Result<ClusterPayloads>> + Send;
}

/// Událost po každém uloženém snapshotu
#[derive(Debug, Clone)]
pub struct ClusterEvent {
    pub sequence: u64,
    pub cluster: Arc<Cluster>,
}

impl ClusterEvent {
    pub fn changes(&self) -> &ClusterChanges {
        &self.cluster.changes
    }
}

#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Committed(Arc<Cluster>),
    /// Jiný refresh ještě běží, nic se nestahovalo
    InFlight,
    /// Odpověď dorazila pozdě, mezitím byl uložen novější stav
    Stale { sequence: u64 },
}

/// Povolení k jednomu refreshi, vydává [`ClusterMonitor::begin_refresh`]
#[derive(Debug)]
pub struct RefreshTicket {
    sequence: u64,
}

impl RefreshTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

type Subscriber = Box<dyn FnMut(&ClusterEvent) + Send>;

#[derive(Default)]
pub struct ClusterMonitor {
    cluster: Option<Arc<Cluster>>,
    in_flight: Option<u64>,
    next_sequence: u64,
    committed_sequence: u64,
    subscribers: Vec<Subscriber>,
}

impl ClusterMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poslední uložený snapshot
    pub fn cluster(&self) -> Option<&Arc<Cluster>> {
        self.cluster.as_ref()
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Subscriber se volá synchronně po každém uloženém snapshotu
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&ClusterEvent) + Send + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    /// `None`, pokud už jeden refresh běží
    pub fn begin_refresh(&mut self) -> Option<RefreshTicket> {
        if let Some(sequence) = self.in_flight {
            tracing::debug!("Refresh #{} still in flight, skipping", sequence);
            return None;
        }

        self.next_sequence += 1;
        self.in_flight = Some(self.next_sequence);
        tracing::debug!("Starting refresh #{}", self.next_sequence);

        Some(RefreshTicket {
            sequence: self.next_sequence,
        })
    }

    /// Dokončí refresh s výsledkem fetchu
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<ClusterPayloads>,
    ) -> Result<RefreshOutcome, RefreshError> {
        if self.in_flight == Some(ticket.sequence) {
            self.in_flight = None;
        }

        if ticket.sequence <= self.committed_sequence {
            tracing::warn!(
                "Discarding refresh #{}, #{} is already committed",
                ticket.sequence,
                self.committed_sequence
            );
            return Ok(RefreshOutcome::Stale {
                sequence: ticket.sequence,
            });
        }

        let payloads = match result {
            Ok(payloads) => payloads,
            Err(e) => {
                tracing::error!("Refresh #{} failed: {:#}", ticket.sequence, e);
                return Err(RefreshError::Fetch(e));
            }
        };

        let cluster = Arc::new(Cluster::new(&payloads, self.cluster.as_deref()));
        self.cluster = Some(Arc::clone(&cluster));
        self.committed_sequence = ticket.sequence;

        tracing::info!(
            "Cluster {} [{}]: {} nodes, {} indices (refresh #{})",
            cluster.name,
            cluster.status,
            cluster.number_of_nodes(),
            cluster.total_indices(),
            ticket.sequence
        );

        let event = ClusterEvent {
            sequence: ticket.sequence,
            cluster: Arc::clone(&cluster),
        };
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }

        Ok(RefreshOutcome::Committed(cluster))
    }

    /// Vzdá rozběhnutý refresh, aniž by se čekalo na výsledek
    pub fn abandon_refresh(&mut self, ticket: RefreshTicket) {
        if self.in_flight == Some(ticket.sequence) {
            self.in_flight = None;
            tracing::debug!("Refresh #{} abandoned", ticket.sequence);
        }
    }

    /// Zrušení vráceného future (timeout, `select!`) refresh vzdá
    pub async fn refresh<S: ClusterSource>(&mut self, source: &S) -> Result<RefreshOutcome, RefreshError> {
        let Some(ticket) = self.begin_refresh() else {
            return Ok(RefreshOutcome::InFlight);
        };
        let mut guard = PendingRefresh {
            monitor: self,
            ticket: Some(ticket),
        };

        let result = source.fetch().await;

        match guard.ticket.take() {
            Some(ticket) => guard.monitor.complete_refresh(ticket, result),
            None => Ok(RefreshOutcome::InFlight),
        }
    }

    /// Zahodí snapshot (např. po přepnutí na jiný host); odpovědi na
    /// rozběhnuté refreshe se pak zahodí jako zastaralé
    pub fn reset(&mut self) {
        self.cluster = None;
        self.in_flight = None;
        self.committed_sequence = self.next_sequence;
    }
}

/// Drží ticket po dobu fetche, při dropu ho vrátí monitoru
struct PendingRefresh<'a> {
    monitor: &'a mut ClusterMonitor,
    ticket: Option<RefreshTicket>,
}

impl Drop for PendingRefresh<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.monitor.abandon_refresh(ticket);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Vrací připravené odpovědi popořadě, `None` znamená chybu fetchu
    struct ScriptedSource {
        responses: Mutex<VecDeque<Option<ClusterPayloads>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Option<ClusterPayloads>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    impl ClusterSource for ScriptedSource {
        async fn fetch(&self) -> Result<ClusterPayloads> {
            let next = self.responses.lock().unwrap().pop_front().flatten();
            next.ok_or_else(|| anyhow!("connection refused"))
        }
    }

    /// Fetch, který nikdy neskončí
    struct StuckSource;

    impl ClusterSource for StuckSource {
        async fn fetch(&self) -> Result<ClusterPayloads> {
            std::future::pending().await
        }
    }

    fn payloads(nodes: &[&str]) -> ClusterPayloads {
        let state_nodes: serde_json::Map<String, serde_json::Value> = nodes
            .iter()
            .map(|id| (id.to_string(), json!({ "name": id })))
            .collect();

        ClusterPayloads {
            health: serde_json::from_value(json!({ "cluster_name": "prod", "status": "yellow" })).unwrap(),
            state: serde_json::from_value(json!({ "cluster_name": "prod", "nodes": state_nodes })).unwrap(),
            ..Default::default()
        }
    }

    fn committed(outcome: RefreshOutcome) -> Arc<Cluster> {
        match outcome {
            RefreshOutcome::Committed(cluster) => cluster,
            other => panic!("expected committed snapshot, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refresh_commits_and_notifies() {
        let source = ScriptedSource::new(vec![Some(payloads(&["A"])), Some(payloads(&["A", "B"]))]);
        let events = Arc::new(Mutex::new(Vec::new()));

        let mut monitor = ClusterMonitor::new();
        let sink = Arc::clone(&events);
        monitor.subscribe(move |event| {
            let joins: Vec<String> = event
                .changes()
                .node_joins()
                .map(|nodes| nodes.iter().map(|n| n.id.clone()).collect())
                .unwrap_or_default();
            sink.lock().unwrap().push((event.sequence, joins));
        });

        let first = committed(monitor.refresh(&source).await.unwrap());
        assert_eq!(first.number_of_nodes(), 1);
        assert!(!first.changes.has_changes());

        let second = committed(monitor.refresh(&source).await.unwrap());
        assert_eq!(second.number_of_nodes(), 2);
        assert!(second.changes.has_joins());

        let events = events.lock().unwrap();
        assert_eq!(*events, vec![(1, vec![]), (2, vec!["B".to_string()])]);
        assert!(!monitor.is_refreshing());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_snapshot() {
        let source = ScriptedSource::new(vec![Some(payloads(&["A"])), None, Some(payloads(&["A"]))]);
        let mut monitor = ClusterMonitor::new();

        let first = committed(monitor.refresh(&source).await.unwrap());

        let err = monitor.refresh(&source).await.unwrap_err();
        assert!(matches!(err, RefreshError::Fetch(_)));
        assert!(Arc::ptr_eq(monitor.cluster().unwrap(), &first));
        assert!(!monitor.is_refreshing());

        // Další refresh porovnává s posledním dobrým snapshotem
        let third = committed(monitor.refresh(&source).await.unwrap());
        assert!(!third.changes.has_changes());
    }

    #[test]
    fn test_only_one_refresh_in_flight() {
        let mut monitor = ClusterMonitor::new();

        let ticket = monitor.begin_refresh().unwrap();
        assert!(monitor.is_refreshing());
        assert!(monitor.begin_refresh().is_none());

        monitor.complete_refresh(ticket, Ok(payloads(&["A"]))).unwrap();
        assert!(!monitor.is_refreshing());
        assert!(monitor.begin_refresh().is_some());
    }

    #[test]
    fn test_late_response_after_reset_is_discarded() {
        let mut monitor = ClusterMonitor::new();
        let ticket = monitor.begin_refresh().unwrap();

        monitor.reset();
        let fresh = monitor.begin_refresh().unwrap();
        assert!(fresh.sequence() > ticket.sequence());
        monitor.complete_refresh(fresh, Ok(payloads(&["B"]))).unwrap();

        let outcome = monitor.complete_refresh(ticket, Ok(payloads(&["A"]))).unwrap();
        assert!(matches!(outcome, RefreshOutcome::Stale { sequence: 1 }));
        assert_eq!(monitor.cluster().unwrap().nodes[0].id, "B");
    }

    #[test]
    fn test_late_failure_after_reset_is_ignored() {
        let mut monitor = ClusterMonitor::new();
        let ticket = monitor.begin_refresh().unwrap();
        monitor.reset();

        let outcome = monitor.complete_refresh(ticket, Err(anyhow!("timeout"))).unwrap();
        assert!(matches!(outcome, RefreshOutcome::Stale { .. }));
        assert!(monitor.cluster().is_none());
    }

    #[tokio::test]
    async fn test_refresh_skipped_while_in_flight() {
        let source = ScriptedSource::new(vec![Some(payloads(&["A"]))]);
        let mut monitor = ClusterMonitor::new();

        let ticket = monitor.begin_refresh().unwrap();
        let outcome = monitor.refresh(&source).await.unwrap();
        assert!(matches!(outcome, RefreshOutcome::InFlight));

        monitor.complete_refresh(ticket, Ok(payloads(&["A"]))).unwrap();
        assert!(monitor.cluster().is_some());
    }

    #[tokio::test]
    async fn test_dropped_refresh_releases_in_flight() {
        let mut monitor = ClusterMonitor::new();

        let timed_out = tokio::time::timeout(Duration::from_millis(20), monitor.refresh(&StuckSource)).await;
        assert!(timed_out.is_err());
        assert!(!monitor.is_refreshing());

        let source = ScriptedSource::new(vec![Some(payloads(&["A"]))]);
        let cluster = committed(monitor.refresh(&source).await.unwrap());
        assert_eq!(cluster.number_of_nodes(), 1);
    }

    #[test]
    fn test_abandoned_ticket_completes_as_stale() {
        let mut monitor = ClusterMonitor::new();
        let abandoned = monitor.begin_refresh().unwrap();
        let sequence = abandoned.sequence();
        monitor.abandon_refresh(abandoned);
        assert!(!monitor.is_refreshing());

        let fresh = monitor.begin_refresh().unwrap();
        monitor.complete_refresh(fresh, Ok(payloads(&["B"]))).unwrap();

        // Pozdní odpověď se stejným pořadovým číslem už nic nepřepíše
        let late = RefreshTicket { sequence };
        let outcome = monitor.complete_refresh(late, Ok(payloads(&["A"]))).unwrap();
        assert!(matches!(outcome, RefreshOutcome::Stale { sequence: 1 }));
        assert_eq!(monitor.cluster().unwrap().nodes[0].id, "B");
    }
}

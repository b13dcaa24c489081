//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Port and method an interaction was recorded for.
type PortMethod = (String, String);

/// Replays interactions from a loaded cassette, serving them sequentially
/// per port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<PortMethod, VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethod, VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Take the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the given
    /// port/method combination, listing what the cassette does contain.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        };

        queue.pop_front().unwrap_or_else(|| {
            panic!(
                "Cassette exhausted: all interactions for port={port:?} method={method:?} \
                 have been consumed."
            )
        })
    }

    /// Number of interactions not yet served for the given port and method.
    #[must_use]
    pub fn remaining(&self, port: &str, method: &str) -> usize {
        self.queues.get(&(port.to_string(), method.to_string())).map_or(0, VecDeque::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        }
    }

    fn interaction(seq: u64, port: &str, method: &str, stdout: &str) -> Interaction {
        Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input: json!({}),
            output: json!({"Ok": {"exit_code": 0, "stdout": stdout, "stderr": ""}}),
        }
    }

    #[test]
    fn replay_interleaved_ports_in_order() {
        let cassette = make_cassette(vec![
            interaction(0, "command", "run", "1"),
            interaction(1, "other", "call", "x"),
            interaction(2, "command", "run", "2"),
        ]);

        let mut replayer = CassetteReplayer::new(&cassette);

        let i1 = replayer.next_interaction("command", "run");
        assert_eq!(i1.seq, 0);
        assert_eq!(i1.output["Ok"]["stdout"], "1");

        let i2 = replayer.next_interaction("other", "call");
        assert_eq!(i2.seq, 1);

        let i3 = replayer.next_interaction("command", "run");
        assert_eq!(i3.seq, 2);
        assert_eq!(i3.output["Ok"]["stdout"], "2");
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn exhausted_replayer_panics_with_descriptive_message() {
        let cassette = make_cassette(vec![interaction(0, "command", "run", "")]);

        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("command", "run"); // consumes the only one
        let _ = replayer.next_interaction("command", "run"); // should panic
    }

    #[test]
    #[should_panic(expected = "no interactions recorded")]
    fn unknown_port_panics() {
        let cassette = make_cassette(vec![]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("unknown", "method");
    }

    #[test]
    fn remaining_counts_unserved_interactions() {
        let cassette = make_cassette(vec![
            interaction(0, "command", "run", "1"),
            interaction(1, "command", "run", "2"),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);
        assert_eq!(replayer.remaining("command", "run"), 2);
        let _ = replayer.next_interaction("command", "run");
        assert_eq!(replayer.remaining("command", "run"), 1);
        assert_eq!(replayer.remaining("other", "call"), 0);
    }
}

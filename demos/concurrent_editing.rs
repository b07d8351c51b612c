//! Collaborative editing over an unreliable channel.
//!
//! This example showcases:
//! - Several replicas editing the same document at the same time
//! - Operations delivered late, out of order and more than once
//! - An `Inbox` per replica holding back operations that arrive early
//! - Every replica converging once all operations are delivered
//!
//! Run with: cargo run --example concurrent_editing

use std::collections::VecDeque;

use rga_text::{Identifier, Inbox, Operation, Replica, SiteId};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// A deterministic shuffling channel: every message is delivered, twice for
/// some, in a scrambled order.
struct Channel {
    queue: VecDeque<(usize, Operation)>,
    state: u64,
}

impl Channel {
    fn new(seed: u64) -> Self {
        Channel {
            queue: VecDeque::new(),
            state: seed,
        }
    }

    fn next_random(&mut self) -> u64 {
        // xorshift64
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    fn broadcast(&mut self, from: usize, op: Operation) {
        if self.next_random() % 4 == 0 {
            self.queue.push_back((from, op.clone()));
        }
        let at = (self.next_random() as usize) % (self.queue.len() + 1);
        self.queue.insert(at, (from, op));
    }

    fn receive(&mut self) -> Option<(usize, Operation)> {
        self.queue.pop_front()
    }
}

fn main() -> rga_text::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("=== Concurrent RGA CRDT Example ===");

    let names = ["ada", "grace", "linus", "margaret"];
    let mut replicas = names
        .iter()
        .map(|name| SiteId::new(*name).map(Replica::new))
        .collect::<rga_text::Result<Vec<_>>>()?;
    let mut inboxes: Vec<Inbox> = names.iter().map(|_| Inbox::new()).collect();
    let mut channel = Channel::new(0x9E37_79B9_7F4A_7C15);

    // Everyone starts from a shared greeting
    let greeting = replicas[0].insert_str(&Identifier::HEAD, "hi ")?;
    for op in greeting {
        channel.broadcast(0, op);
    }

    let words = ["one ", "two ", "three ", "four "];
    for round in 0..3 {
        for (index, replica) in replicas.iter_mut().enumerate() {
            // Type after whatever this replica currently sees last
            let after = replica.document().last_id();
            let word = words[(index + round) % words.len()];
            for op in replica.insert_str(&after, word)? {
                channel.broadcast(index, op);
            }

            // Delete the first visible character now and then
            if (index + round) % 3 == 0 {
                if let Some(first) = replica.document().id_at(0) {
                    let op = replica.delete(&first);
                    channel.broadcast(index, op);
                }
            }
        }

        // Deliver about half of the traffic between rounds
        let in_flight = channel.queue.len() / 2;
        for _ in 0..in_flight {
            deliver(&mut channel, &mut replicas, &mut inboxes)?;
        }
        for (name, replica) in names.iter().zip(&replicas) {
            info!(round, replica = name, text = %replica.document(), "mid-session view");
        }
    }

    while !channel.queue.is_empty() {
        deliver(&mut channel, &mut replicas, &mut inboxes)?;
    }

    let reference = replicas[0].document().text();
    for ((name, replica), inbox) in names.iter().zip(&replicas).zip(&inboxes) {
        info!(
            replica = name,
            text = %replica.document(),
            elements = replica.document().total_len(),
            parked = inbox.pending(),
            "final view"
        );
        assert_eq!(replica.document().text(), reference);
    }
    info!(text = %reference, "all replicas converged");
    Ok(())
}

fn deliver(channel: &mut Channel, replicas: &mut [Replica], inboxes: &mut [Inbox]) -> rga_text::Result<()> {
    if let Some((from, op)) = channel.receive() {
        for (index, (replica, inbox)) in replicas.iter_mut().zip(inboxes.iter_mut()).enumerate() {
            if index != from {
                inbox.deliver(replica, op.clone())?;
            }
        }
    }
    Ok(())
}

//! Simple standalone example of RGA CRDT usage.
//!
//! Two users type concurrently, exchange operations and end up with the same
//! text.
//!
//! Run with: cargo run --example simple
//! Set RUST_LOG=rga_text=debug to watch operations being generated and applied.

use rga_text::{Identifier, Replica, SiteId};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> rga_text::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("=== Simple RGA CRDT Example ===");

    let mut alice = Replica::new(SiteId::new("alice")?);
    let mut bob = Replica::new(SiteId::new("bob")?);

    // Alice types "Hello", Bob concurrently types "World!" from the start
    let alice_ops = alice.insert_str(&Identifier::HEAD, "Hello")?;
    let bob_ops = bob.insert_str(&Identifier::HEAD, "World!")?;

    info!(alice = %alice.document(), bob = %bob.document(), "before synchronization");

    for op in &bob_ops {
        alice.apply(op)?;
    }
    for op in &alice_ops {
        bob.apply(op)?;
    }

    info!(alice = %alice.document(), bob = %bob.document(), "after synchronization");
    assert_eq!(alice.document().text(), bob.document().text());

    // Bob deletes Alice's "H", Alice sees it once the delete arrives
    let delete = bob.delete(alice_ops[0].id());
    alice.apply(&delete)?;
    info!(alice = %alice.document(), bob = %bob.document(), "after deleting 'H'");

    // A late joiner forks Alice's state and keeps typing on its own site
    let mut carol = alice.fork(SiteId::new("carol")?)?;
    let last = carol.document().last_id();
    let op = carol.insert(&last, '?')?;
    info!(carol = %carol.document(), alice = %alice.document(), "carol forked and typed");

    alice.apply(&op)?;
    bob.apply(&op)?;
    info!(text = %alice.document(), "everyone converged");

    alice.document().dump();
    Ok(())
}

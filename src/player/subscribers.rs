use super::PlayerEvent;
use crossbeam_channel::{Receiver, Sender};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct Subscription {
    pub id: SubscriptionId,
    pub events: Receiver<PlayerEvent>,
}

#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    senders: Vec<(SubscriptionId, Sender<PlayerEvent>)>,
}

impl Subscribers {
    pub(crate) fn subscribe(&mut self) -> Subscription {
        let (tx, rx) = crossbeam_channel::unbounded();
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.senders.push((id, tx));

        Subscription { id, events: rx }
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.senders.len();
        self.senders.retain(|(sub, _)| *sub != id);
        self.senders.len() != before
    }

    /// Receivers that were dropped without unsubscribing are pruned here
    pub(crate) fn publish(&mut self, event: PlayerEvent) {
        self.senders.retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    pub(crate) fn len(&self) -> usize {
        self.senders.len()
    }
}

use orbis_core::{Action, ActorId, Claim, Event, Hand, State};
use tracing::debug;

use super::Task;
use crate::job::Job;

/// How far a held item reaches.
pub const USE_REACH: f64 = 1.0;

/// Applies a held item to a receiver.
///
/// The receiver is either named or the closest entity absorbing one of the
/// item's claims. The first claim the receiver absorbs decides the effect:
/// pain strikes it, while food and cargo are accepted without effect.
#[derive(Debug)]
pub struct UseItemTask {
    performer: ActorId,
    item: ActorId,
    receiver: Option<ActorId>,
    hand: Hand,
    job: Option<Job>,
}

impl UseItemTask {
    /// Use `item`, held in `hand`, on `receiver` or on the closest entity
    /// that absorbs what the item delivers.
    pub fn new(performer: ActorId, item: ActorId, receiver: Option<ActorId>, hand: Hand) -> Self {
        Self {
            performer,
            item,
            receiver,
            hand,
            job: None,
        }
    }
}

impl Task for UseItemTask {
    fn name(&self) -> &'static str {
        "use_item"
    }

    fn start(&mut self, state: &mut State) -> Vec<Action> {
        let held = state
            .get_entity(self.performer)
            .and_then(|e| e.features.inventory.as_ref())
            .and_then(|inv| inv.get_hand(self.hand));
        if held != Some(self.item) {
            debug!(entity = %self.performer, hand = %self.hand, "item not in hand");
            return Vec::new();
        }
        let Some(claims) = state
            .get_entity(self.item)
            .map(|item| item.features.delivery_claims())
        else {
            return Vec::new();
        };

        if self.receiver.is_none() {
            self.receiver = state.find_closest_absorbing_within(self.performer, &claims, USE_REACH);
        }
        let Some(receiver_id) = self.receiver else {
            debug!(entity = %self.performer, "no receiver within reach");
            return Vec::new();
        };
        let in_reach = state
            .calculate_distance(self.performer, receiver_id)
            .is_some_and(|d| d <= USE_REACH);
        let Some(receiver) = state.get_entity(receiver_id).filter(|_| in_reach) else {
            debug!(entity = %self.performer, receiver = %receiver_id, "receiver out of reach");
            return Vec::new();
        };

        match receiver.features.first_absorbed(&claims) {
            Some(Claim::Pain) => {
                let Some(variant) = receiver.features.damageable.as_ref().map(|d| d.variant())
                else {
                    return Vec::new();
                };
                self.job = Some(Job::damage(
                    self.performer,
                    receiver_id,
                    self.item,
                    self.hand,
                    vec![Event::Finished {
                        entity: self.performer,
                    }],
                ));
                vec![Action::Damage {
                    dealer: self.performer,
                    receiver: receiver_id,
                    variant,
                    hand: self.hand,
                }]
            }
            Some(Claim::Food) | Some(Claim::Cargo) | None => Vec::new(),
        }
    }

    fn take_job(&mut self) -> Option<Job> {
        self.job.take()
    }

    fn finish(&mut self, _state: &mut State) -> Vec<Action> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use orbis_core::{DamageVariant, EntityKind};

    use super::*;
    use crate::job::JobKind;
    use crate::task::testing::{at, carry, entity, world};

    fn armed_pirate(spruce_at: f64) -> State {
        let mut state = world(vec![
            entity(1, EntityKind::Pirate, at(0.0)),
            entity(2, EntityKind::Axe, at(0.0)),
            entity(3, EntityKind::Spruce, at(spruce_at)),
        ]);
        carry(&mut state, ActorId(1), ActorId(2), None);
        state
    }

    #[test]
    fn axe_on_spruce_strikes() {
        let mut state = armed_pirate(0.05);
        let mut task = UseItemTask::new(ActorId(1), ActorId(2), None, Hand::Left);
        assert_eq!(
            task.start(&mut state),
            vec![Action::Damage {
                dealer: ActorId(1),
                receiver: ActorId(3),
                variant: DamageVariant::Chop,
                hand: Hand::Left,
            }]
        );
        let job = task.take_job().unwrap();
        assert!(matches!(
            job.kind(),
            JobKind::Damage { receiver, item, .. } if *receiver == ActorId(3) && *item == ActorId(2)
        ));
    }

    #[test]
    fn nothing_in_reach_is_noop() {
        let mut state = armed_pirate(0.5);
        let mut task = UseItemTask::new(ActorId(1), ActorId(2), None, Hand::Left);
        assert!(task.start(&mut state).is_empty());
        assert!(task.take_job().is_none());
    }

    #[test]
    fn explicit_receiver_out_of_reach_is_noop() {
        let mut state = armed_pirate(0.5);
        let mut task = UseItemTask::new(ActorId(1), ActorId(2), Some(ActorId(3)), Hand::Left);
        assert!(task.start(&mut state).is_empty());
        assert!(task.take_job().is_none());
    }

    #[test]
    fn cargo_claim_is_accepted_without_effect() {
        let mut state = world(vec![
            entity(1, EntityKind::Pirate, at(0.0)),
            entity(2, EntityKind::Gold, at(0.0)),
            entity(3, EntityKind::Pirate, at(0.01)),
        ]);
        carry(&mut state, ActorId(1), ActorId(2), None);
        let mut task = UseItemTask::new(ActorId(1), ActorId(2), None, Hand::Left);
        assert!(task.start(&mut state).is_empty());
        assert!(task.take_job().is_none());
    }

    #[test]
    fn wrong_hand_is_noop() {
        let mut state = armed_pirate(0.05);
        let mut task = UseItemTask::new(ActorId(1), ActorId(2), None, Hand::Right);
        assert!(task.start(&mut state).is_empty());
        assert!(task.take_job().is_none());
    }
}

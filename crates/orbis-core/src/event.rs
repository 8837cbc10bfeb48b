use crate::craft::Assembly;
use crate::entity::ActorId;
use crate::feature::DamageVariant;
use crate::inventory::Hand;

/// How an inventory update combines a hand slot with a pocket slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateVariant {
    /// Exchange the two slots.
    Swap,
    /// Combine two stacks of the same essence.
    Merge,
}

/// An intent or signal delivered to a single entity.
///
/// Events are pure payload: they carry no behaviour. Every variant names
/// the entity it is addressed to.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Pick up where you left off (also sent once at start-up).
    Resume {
        /// Addressee.
        entity: ActorId,
    },
    /// Abandon the current activity.
    Stop {
        /// Addressee.
        entity: ActorId,
    },
    /// The current activity's job ran to completion.
    Finished {
        /// Addressee.
        entity: ActorId,
    },
    /// Wrap up the current activity now instead of at its deadline.
    Conclude {
        /// Addressee.
        entity: ActorId,
    },
    /// Start walking along a bearing until told otherwise.
    StartMoving {
        /// Addressee.
        entity: ActorId,
        /// Direction of travel, radians from north.
        bearing: f64,
    },
    /// Use whatever is in `hand` (or pick something up with it).
    HandActivation {
        /// Addressee.
        entity: ActorId,
        /// The hand being activated.
        hand: Hand,
        /// Explicit target, or `None` to pick the closest suitable one.
        object: Option<ActorId>,
    },
    /// Rearrange a hand slot against a pocket slot.
    InventorySwap {
        /// Addressee.
        entity: ActorId,
        /// The hand slot involved.
        hand: Hand,
        /// The pocket slot involved.
        inventory_index: usize,
        /// Swap the two slots or merge their stacks.
        variant: UpdateVariant,
    },
    /// Craft something from inventory items.
    Craft {
        /// Addressee.
        entity: ActorId,
        /// Recipe and source items.
        assembly: Assembly,
    },
    /// Damage dealt to the addressee.
    Damage {
        /// Addressee (the receiver).
        entity: ActorId,
        /// Who dealt the damage.
        dealer: ActorId,
        /// Kind of damage dealt.
        variant: DamageVariant,
        /// Amount of health to subtract.
        amount: u32,
    },
}

impl Event {
    /// The entity this event is addressed to.
    pub fn target(&self) -> ActorId {
        match self {
            Self::Resume { entity }
            | Self::Stop { entity }
            | Self::Finished { entity }
            | Self::Conclude { entity }
            | Self::StartMoving { entity, .. }
            | Self::HandActivation { entity, .. }
            | Self::InventorySwap { entity, .. }
            | Self::Craft { entity, .. }
            | Self::Damage { entity, .. } => *entity,
        }
    }

    /// Short variant name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Resume { .. } => "resume",
            Self::Stop { .. } => "stop",
            Self::Finished { .. } => "finished",
            Self::Conclude { .. } => "conclude",
            Self::StartMoving { .. } => "start_moving",
            Self::HandActivation { .. } => "hand_activation",
            Self::InventorySwap { .. } => "inventory_swap",
            Self::Craft { .. } => "craft",
            Self::Damage { .. } => "damage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_event_names_its_target() {
        let id = ActorId(7);
        let events = [
            Event::Resume { entity: id },
            Event::Finished { entity: id },
            Event::StartMoving {
                entity: id,
                bearing: 1.0,
            },
            Event::HandActivation {
                entity: id,
                hand: Hand::Left,
                object: Some(ActorId(9)),
            },
            Event::Damage {
                entity: id,
                dealer: ActorId(1),
                variant: DamageVariant::Chop,
                amount: 100,
            },
        ];
        assert!(events.iter().all(|e| e.target() == id));
    }

    #[test]
    fn event_names_are_stable() {
        assert_eq!(Event::Stop { entity: ActorId(1) }.name(), "stop");
        assert_eq!(
            Event::Craft {
                entity: ActorId(1),
                assembly: Assembly::new("axe", Vec::new()),
            }
            .name(),
            "craft"
        );
    }
}

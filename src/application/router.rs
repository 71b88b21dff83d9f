//! Routing of input batches to the gate's output channels.
//!
//! A gate has two outputs, `"allow"` and `"block"`. The whole input batch is
//! forwarded to exactly one of them, chosen by the decision. Items are moved
//! through untouched.

use crate::domain::policy::Decision;

/// Output channel of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Receives batches that passed the gate
    Allow,
    /// Receives batches that were held back
    Block,
}

impl Channel {
    /// Channel names in output order.
    pub const NAMES: [&'static str; 2] = ["allow", "block"];

    /// Channel name.
    pub fn name(&self) -> &'static str {
        Self::NAMES[self.index()]
    }

    /// Position of the channel among the outputs.
    pub fn index(&self) -> usize {
        match self {
            Channel::Allow => 0,
            Channel::Block => 1,
        }
    }
}

impl From<Decision> for Channel {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Allow => Channel::Allow,
            Decision::Block => Channel::Block,
        }
    }
}

impl Decision {
    /// Output channel selected by this decision.
    pub fn channel(&self) -> Channel {
        Channel::from(*self)
    }
}

/// A batch of items bound for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedBatch<T> {
    /// Selected channel
    pub channel: Channel,
    /// The input items, unchanged
    pub items: Vec<T>,
}

impl<T> RoutedBatch<T> {
    /// Route `items` according to `decision`.
    pub fn route(decision: Decision, items: Vec<T>) -> Self {
        Self {
            channel: decision.channel(),
            items,
        }
    }

    /// Check if the batch goes to the allow channel.
    pub fn is_allowed(&self) -> bool {
        self.channel == Channel::Allow
    }

    /// Spread the batch over both outputs.
    ///
    /// The selected channel's slot holds the items, the other slot is empty.
    pub fn into_outputs(self) -> [Vec<T>; 2] {
        let mut outputs = [Vec::new(), Vec::new()];
        outputs[self.channel.index()] = self.items;
        outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names_and_indices() {
        assert_eq!(Channel::Allow.name(), "allow");
        assert_eq!(Channel::Block.name(), "block");
        assert_eq!(Channel::Allow.index(), 0);
        assert_eq!(Channel::Block.index(), 1);
    }

    #[test]
    fn test_decision_selects_channel() {
        assert_eq!(Decision::Allow.channel(), Channel::Allow);
        assert_eq!(Decision::Block.channel(), Channel::Block);
    }

    #[test]
    fn test_allowed_batch_fills_first_output() {
        let batch = RoutedBatch::route(Decision::Allow, vec!["a", "b"]);
        assert!(batch.is_allowed());

        let [allow, block] = batch.into_outputs();
        assert_eq!(allow, vec!["a", "b"]);
        assert!(block.is_empty());
    }

    #[test]
    fn test_blocked_batch_fills_second_output() {
        let batch = RoutedBatch::route(Decision::Block, vec![1, 2, 3]);
        assert!(!batch.is_allowed());

        let [allow, block] = batch.into_outputs();
        assert!(allow.is_empty());
        assert_eq!(block, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_batch_still_routed() {
        let batch: RoutedBatch<u8> = RoutedBatch::route(Decision::Block, Vec::new());
        assert_eq!(batch.channel, Channel::Block);
        assert!(batch.items.is_empty());
    }
}

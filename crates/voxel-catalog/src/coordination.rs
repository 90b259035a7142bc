use std::fmt;

use voxel_core::{BbValue, Blackboard, Status};

/// Blackboard leaves used to announce and respect claims on shared work.
///
/// Channels that were never written read as `false`. Reads and writes are not atomic across
/// agents: two agents can both see a channel unclaimed in the same frame and both claim it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coordination {
    /// Write `value`; always succeeds.
    Sender { channel: String, value: BbValue },
    /// Write `false`, releasing the channel; always succeeds.
    StopSender { channel: String },
    /// Succeeds while the channel holds one of `allowed`.
    Receiver { channel: String, allowed: Vec<BbValue> },
    /// Succeeds while the channel holds none of `excluded`.
    InverseReceiver { channel: String, excluded: Vec<BbValue> },
}

impl Coordination {
    pub fn channel(&self) -> &str {
        match self {
            Coordination::Sender { channel, .. }
            | Coordination::StopSender { channel }
            | Coordination::Receiver { channel, .. }
            | Coordination::InverseReceiver { channel, .. } => channel,
        }
    }

    pub fn tick(&self, agent: &str, blackboard: &Blackboard) -> Status {
        match self {
            Coordination::Sender { channel, value } => {
                if blackboard.read(channel) != *value {
                    tracing::debug!(agent, channel = %channel, value = %value, "channel written");
                }
                blackboard.set(channel.as_str(), value.clone());
                Status::Success
            }
            Coordination::StopSender { channel } => {
                if blackboard.read(channel) != BbValue::FALSE {
                    tracing::debug!(agent, channel = %channel, "channel released");
                }
                blackboard.set(channel.as_str(), BbValue::FALSE);
                Status::Success
            }
            Coordination::Receiver { channel, allowed } => {
                allowed.contains(&blackboard.read(channel)).into()
            }
            Coordination::InverseReceiver { channel, excluded } => {
                (!excluded.contains(&blackboard.read(channel))).into()
            }
        }
    }
}

fn list(f: &mut fmt::Formatter<'_>, values: &[BbValue]) -> fmt::Result {
    f.write_str("[")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{v}")?;
    }
    f.write_str("]")
}

impl fmt::Display for Coordination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordination::Sender { channel, value } => write!(f, "Sender({channel} <- {value})"),
            Coordination::StopSender { channel } => write!(f, "StopSender({channel})"),
            Coordination::Receiver { channel, allowed } => {
                write!(f, "Receiver({channel} in ")?;
                list(f, allowed)?;
                f.write_str(")")
            }
            Coordination::InverseReceiver { channel, excluded } => {
                write!(f, "InverseReceiver({channel} not in ")?;
                list(f, excluded)?;
                f.write_str(")")
            }
        }
    }
}

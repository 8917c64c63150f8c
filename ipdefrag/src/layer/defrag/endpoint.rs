use std::collections::HashMap;

use crate::layer::{Error, Result};
use crate::time::{Expiration, Instant};
use crate::wire::{Datagram, FlowKey};

use super::{Agent, Config};

/// Routes fragments to one reassembly agent per flow.
///
/// Datagrams that are not fragments pass through unchanged. All state of a flow is dropped when
/// its datagram is complete, when one of its fragments is rejected, or once it expired.
#[derive(Debug, Default)]
pub struct Defragmenter {
    /// The agents of all incomplete flows.
    flows: HashMap<FlowKey, Flow>,

    /// The reassembly policy.
    config: Config,
}

#[derive(Debug)]
struct Flow {
    agent: Agent,
    expires: Expiration,
}

impl Defragmenter {
    /// Create a defragmenter without any flow.
    pub fn new(config: Config) -> Self {
        Defragmenter {
            flows: HashMap::new(),
            config,
        }
    }

    /// The reassembly policy.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process one datagram at the current time.
    ///
    /// See [`defrag_at`].
    ///
    /// [`defrag_at`]: #method.defrag_at
    pub fn defrag(&mut self, datagram: Datagram) -> Result<Option<Datagram>> {
        self.defrag_at(datagram, Instant::now())
    }

    /// Process one datagram at the given time.
    ///
    /// Returns the datagram itself if it is not a fragment, the reassembled datagram if this was
    /// the missing fragment of its flow, or `Ok(None)` while its flow is still incomplete. An error
    /// has discarded the flow of the fragment. A flow that expired before `now` is discarded and
    /// the fragment starts a new one.
    pub fn defrag_at(&mut self, datagram: Datagram, now: Instant) -> Result<Option<Datagram>> {
        let repr = datagram.repr();
        if !repr.is_fragmented() {
            return Ok(Some(datagram));
        }

        let key = repr.flow_key();
        let stale = self.flows.get(&key)
            .map_or(false, |flow| flow.expires.has_passed(now));
        if stale {
            net_debug!("defrag: flow {} expired", key);
            self.flows.remove(&key);
        }

        if !self.flows.contains_key(&key) && self.flows.len() >= self.config.max_flows {
            self.expire(now);
            if self.flows.len() >= self.config.max_flows {
                net_debug!("defrag: no room for flow {}", key);
                return Err(Error::Exhausted);
            }
        }

        let expires = Expiration::after(now, self.config.flow_timeout);
        let flow = self.flows.entry(key).or_insert_with(|| {
            net_debug!("defrag: new flow {} expiring {}", key, expires);
            Flow { agent: Agent::new(), expires }
        });

        let result = flow.agent.consume(datagram);
        let idle = flow.agent.is_empty();
        match &result {
            // Only empty fragments leave nothing behind, they need no slot.
            Ok(None) if idle => {
                self.flows.remove(&key);
            },
            Ok(None) => (),
            Ok(Some(_)) => {
                self.flows.remove(&key);
            },
            Err(err) => {
                net_debug!("defrag: flow {} discarded: {}", key, err);
                self.flows.remove(&key);
            },
        }

        result
    }

    /// Discard all flows whose deadline passed, returning their number.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.flows.len();
        self.flows.retain(|key, flow| {
            let expired = flow.expires.has_passed(now);
            if expired {
                net_debug!("defrag: flow {} expired", key);
            }
            !expired
        });
        before - self.flows.len()
    }

    /// Discard the flow with the given key.
    ///
    /// Returns `false` if no such flow is being reassembled.
    pub fn remove(&mut self, key: &FlowKey) -> bool {
        self.flows.remove(key).is_some()
    }

    /// Query if a flow is being reassembled.
    pub fn contains(&self, key: &FlowKey) -> bool {
        self.flows.contains_key(key)
    }

    /// The reassembly state of a flow.
    pub fn agent(&self, key: &FlowKey) -> Option<&Agent> {
        self.flows.get(key).map(|flow| &flow.agent)
    }

    /// The number of flows being reassembled.
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Query if no flow is being reassembled.
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Discard all flows.
    pub fn clear(&mut self) {
        self.flows.clear();
    }
}

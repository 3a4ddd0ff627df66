use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{ClientId, RedistributionPolicy, SaleId};

/// all events emitted by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // redistribution events
    QuotasRedistributed {
        sale_id: SaleId,
        policy: RedistributionPolicy,
        redistributed_balance: Money,
        absorbed_numbers: Vec<u32>,
        timestamp: DateTime<Utc>,
    },

    // arrears events
    ClientInArrears {
        client_id: ClientId,
        total_overdue: Money,
        overdue_quota_count: u32,
        timestamp: DateTime<Utc>,
    },
    ArrearsNotified {
        client_id: ClientId,
        timestamp: DateTime<Utc>,
    },
    ArrearsNotificationFailed {
        client_id: ClientId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

//! Shared test fixtures: order builders, proptest strategies, an in-memory
//! key-value store, a scripted order source, and a recording decision sink.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use crate::decider::{Decision, DecisionSink};
use crate::persistence::{KvError, PersistentKeyValueStore};
use crate::source::{OrderSource, SourceError};
use crate::types::{LineItem, MenuItemSnapshot, Order, OrderId, OrderStatus};

/// A minimal order with the given id and status.
pub fn order_with_status(id: u64, status: OrderStatus) -> Order {
    Order {
        id: OrderId(id),
        status,
        customer_name: "Test Customer".to_string(),
        customer_email: "customer@example.com".to_string(),
        items: vec![LineItem {
            quantity: 1,
            notes: None,
            menu_item: MenuItemSnapshot {
                name: "House Special".to_string(),
                price_cents: 1200,
            },
        }],
        total_amount: 1200,
        created_at: "2026-08-01T11:00:00Z".parse().unwrap(),
    }
}

// ─── proptest strategies ───

pub fn arb_order_status() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just(OrderStatus::Pending),
        Just(OrderStatus::Accepted),
        Just(OrderStatus::Preparing),
        Just(OrderStatus::Ready),
        Just(OrderStatus::Delivered),
        Just(OrderStatus::Finished),
        Just(OrderStatus::Completed),
    ]
}

pub fn arb_line_item() -> impl Strategy<Value = LineItem> {
    (
        1u32..10,
        prop::option::of("[a-zA-Z ]{0,30}"),
        "[a-zA-Z ]{1,20}",
        100i64..10000,
    )
        .prop_map(|(quantity, notes, name, price_cents)| LineItem {
            quantity,
            notes,
            menu_item: MenuItemSnapshot { name, price_cents },
        })
}

pub fn arb_order() -> impl Strategy<Value = Order> {
    (
        1u64..1000,
        arb_order_status(),
        "[a-zA-Z ]{1,20}",
        "[a-z]{1,10}@example\\.com",
        prop::collection::vec(arb_line_item(), 0..4),
        0i64..100000,
        946684800i64..4102444800i64,
    )
        .prop_map(
            |(id, status, customer_name, customer_email, items, total_amount, secs)| Order {
                id: OrderId(id),
                status,
                customer_name,
                customer_email,
                items,
                total_amount,
                created_at: chrono::DateTime::from_timestamp(secs, 0).unwrap(),
            },
        )
}

/// A snapshot of orders with unique ids, as the backend would return.
pub fn arb_order_snapshot() -> impl Strategy<Value = Vec<Order>> {
    prop::collection::vec(arb_order(), 0..8).prop_map(|orders| {
        let mut seen = Vec::new();
        orders
            .into_iter()
            .filter(|o| {
                if seen.contains(&o.id) {
                    false
                } else {
                    seen.push(o.id);
                    true
                }
            })
            .collect()
    })
}

// ─── in-memory key-value store ───

/// Non-durable store for tests; optionally fails every write to exercise the
/// degraded persistence mode.
#[derive(Debug, Default, Clone)]
pub struct MemoryKvStore {
    values: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        MemoryKvStore::default()
    }

    pub fn failing_writes() -> Self {
        MemoryKvStore {
            values: HashMap::new(),
            fail_writes: true,
        }
    }
}

impl PersistentKeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        if self.fail_writes {
            return Err(KvError::Io(std::io::Error::other("injected write failure")));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ─── scripted order source ───

/// Replays scripted responses in order; an exhausted script answers with an
/// empty list, matching a quiet backend.
#[derive(Debug, Default)]
pub struct ScriptedOrderSource {
    active: Mutex<VecDeque<Result<Vec<Order>, String>>>,
    finished: Mutex<VecDeque<Result<Vec<Order>, String>>>,
}

impl ScriptedOrderSource {
    pub fn new() -> Self {
        ScriptedOrderSource::default()
    }

    pub fn push_active(&self, orders: Vec<Order>) {
        self.active.lock().unwrap().push_back(Ok(orders));
    }

    pub fn push_active_error(&self, message: &str) {
        self.active
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub fn push_finished(&self, orders: Vec<Order>) {
        self.finished.lock().unwrap().push_back(Ok(orders));
    }

    pub fn push_finished_error(&self, message: &str) {
        self.finished
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    fn pop(queue: &Mutex<VecDeque<Result<Vec<Order>, String>>>) -> Result<Vec<Order>, SourceError> {
        match queue.lock().unwrap().pop_front() {
            Some(Ok(orders)) => Ok(orders),
            Some(Err(message)) => Err(SourceError::Unavailable(message)),
            None => Ok(Vec::new()),
        }
    }
}

impl OrderSource for ScriptedOrderSource {
    async fn list_active_orders(&self) -> Result<Vec<Order>, SourceError> {
        Self::pop(&self.active)
    }

    async fn list_recently_finished_orders(&self) -> Result<Vec<Order>, SourceError> {
        Self::pop(&self.finished)
    }
}

// ─── recording decision sink ───

/// Collects every decision delivered to the presentation boundary.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink(Arc<Mutex<Vec<Decision>>>);

impl RecordingSink {
    pub fn decisions(&self) -> Vec<Decision> {
        self.0.lock().unwrap().clone()
    }
}

impl DecisionSink for RecordingSink {
    fn on_decision(&mut self, decision: &Decision) {
        self.0.lock().unwrap().push(decision.clone());
    }
}

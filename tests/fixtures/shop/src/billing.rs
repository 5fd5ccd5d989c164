use crate::orders::model::Order;
use crate::util::*;
use std::collections::HashMap;

pub struct Invoice {
    pub order_id: u64,
    pub amounts: HashMap<u64, f64>,
}

pub enum Status {
    Draft,
    Paid,
}

impl Invoice {
    pub fn new(order_id: u64) -> Self {
        Self {
            order_id,
            amounts: HashMap::new(),
        }
    }

    pub fn add(&mut self, order: &Order) {
        self.amounts.insert(order.id, round_cents(order.total()));
    }
}

use super::super::util::round_cents;
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
pub struct Order {
    pub id: u64,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Default, Serialize)]
pub struct OrderLine {
    pub price: f64,
}

impl Order {
    pub fn total(&self) -> f64 {
        round_cents(self.lines.iter().map(|l| l.price).sum())
    }
}

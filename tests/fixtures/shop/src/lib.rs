pub mod billing;
pub mod orders;
mod util;

use crate::orders::Order;
use std::fmt::Debug;

pub fn run() {
    let _ = Order::default();
}

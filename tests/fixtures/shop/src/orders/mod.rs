pub mod model;

use crate::billing::Invoice;
pub use self::model::{Order, OrderLine};

pub trait Repository {
    fn find(&self, id: u64) -> Option<Order>;
}

pub fn invoice_for(order: &Order) -> Invoice {
    Invoice::new(order.id)
}

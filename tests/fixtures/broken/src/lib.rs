use crate::parts::Gear;

pub fn assemble(gear: Gear {
    gear.turn();
}

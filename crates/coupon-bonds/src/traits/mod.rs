//! Bond traits.

mod bond;

pub use bond::Bond;

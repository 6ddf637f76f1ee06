mod cubes;
mod dense;
mod enclosure;
mod random_objects;

pub use self::{cubes::*, dense::*, enclosure::*, random_objects::*};

pub mod startup;

pub mod shutdown;

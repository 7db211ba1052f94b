pub mod energy_totals;

pub use energy_totals::EnergyTotalsSink;

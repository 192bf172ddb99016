//! [`AllianceSource`] – where the current alliance colour comes from.
//!
//! The colour is unknown until the driver station or field system reports
//! it; sources return `None` in that state and callers must not guess.

use yall_bus::Table;
use yall_types::Alliance;

/// Field-management table published by the driver station.
pub const FMS_TABLE: &str = "FMSInfo";
/// Boolean entry inside [`FMS_TABLE`].
pub const IS_RED_ALLIANCE_KEY: &str = "IsRedAlliance";

/// Reports the robot's alliance colour, if known.
pub trait AllianceSource: Send + Sync {
    fn current_alliance(&self) -> Option<Alliance>;
}

/// A fixed answer, e.g. from configuration or in tests.
impl AllianceSource for Option<Alliance> {
    fn current_alliance(&self) -> Option<Alliance> {
        *self
    }
}

impl<F> AllianceSource for F
where
    F: Fn() -> Option<Alliance> + Send + Sync,
{
    fn current_alliance(&self) -> Option<Alliance> {
        self()
    }
}

/// Reads `FMSInfo/IsRedAlliance` from the bus; absent means unknown.
#[derive(Debug, Clone)]
pub struct FmsAlliance {
    table: Table,
}

impl FmsAlliance {
    /// `table` must be the [`FMS_TABLE`] handle.
    pub fn new(table: Table) -> Self {
        Self { table }
    }
}

impl AllianceSource for FmsAlliance {
    fn current_alliance(&self) -> Option<Alliance> {
        self.table.read_bool(IS_RED_ALLIANCE_KEY).map(|is_red| {
            if is_red {
                Alliance::Red
            } else {
                Alliance::Blue
            }
        })
    }
}

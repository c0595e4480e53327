//! Domain entities: sites, daily records and derived week buckets.

pub mod place;
pub mod record;
pub mod week;

pub use place::{Place, PlaceId, Rates};
pub use record::{AdditionalCost, Attendance, DailyRecord, RecordId};
pub use week::{WeekKey, WeeklyBucket};

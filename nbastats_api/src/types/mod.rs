mod envelope;
pub use self::envelope::{ResultSet, Row, StatsResponse};

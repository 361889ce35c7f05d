mod common;
pub use self::common::{Query, SeasonType};

mod shots;
pub use self::shots::{ContextMeasure, ShotChartQuery};

mod games;
pub use self::games::GameFinderQuery;

mod players;
pub use self::players::PlayerIndexQuery;

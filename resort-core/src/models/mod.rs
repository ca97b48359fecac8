mod day_bucket;
mod promotion;
mod rate_table;
mod room_type;
mod season;

pub use day_bucket::{DayBucket, night_count, stay_nights};
pub use promotion::{Promotion, PromotionSelection};
pub use rate_table::{
    AllInclusiveRateEntry, AllInclusiveRateTable, DEFAULT_HOTEL, DecasRateEntry, DecasRateTable,
    pick_default_hotel,
};
pub use room_type::{DecasRoomType, RoomCounts};
pub use season::Season;

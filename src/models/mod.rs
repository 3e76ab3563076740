mod container_type;
mod measure;
mod order_line;
mod producer_type;
mod table_key;
mod week_day;

pub use container_type::{
    allowed_container_types, ContainerType, MAIN_PRODUCER_CONTAINERS, SHARED_CONTAINERS,
    TROPICAL_CONTAINERS,
};
pub use measure::Measure;
pub use order_line::OrderLine;
pub use producer_type::ProducerType;
pub use table_key::TableKey;
pub use week_day::{reserved_day_for, WeekDay};
